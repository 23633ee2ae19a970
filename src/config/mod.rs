//! Configuration: operational constants and the service `Config` struct.

mod constants;
mod types;

pub use constants::*;
pub use types::Config;
