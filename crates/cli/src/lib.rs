//! CLI utilities for BarberGo development tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Progress indicators
//! - Status messages

#![warn(missing_docs)]

pub mod output;
pub mod progress;
