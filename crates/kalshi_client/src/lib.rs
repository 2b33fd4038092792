//! Kalshi market-data client library.
//!
//! Read-only REST access to the public market endpoints, plus the parser
//! that turns raw market records into structured contracts.

pub mod parser;
pub mod rest;

pub use parser::ContractParser;
pub use rest::KalshiRestClient;
