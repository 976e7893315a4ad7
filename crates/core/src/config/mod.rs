//! Tool configuration loading and schema definitions
//!
//! Optional `barbergo-tools.toml`; every field has a default so the tools work
//! out of the box in a standard Flutter checkout.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
