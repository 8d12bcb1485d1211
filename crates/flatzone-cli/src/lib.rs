//! # flatzone-cli
//!
//! Command-line front end for the flatzone DNS server.
//!
//! - `flatzone serve` (the default) answers queries from a YAML zone database
//! - `flatzone check` validates a database without starting the server

pub mod cli;
pub mod logging;

pub use cli::run;
