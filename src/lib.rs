pub mod catalog;
pub mod config;
pub mod core;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod router;
pub mod server;
pub mod transport;

pub use core::types::*;
pub use router::{FallbackRouter, FallbackRouterBuilder};
