pub mod adapters;
pub mod core;
pub mod error;
pub mod extract;
pub mod projection;
pub mod utils;
