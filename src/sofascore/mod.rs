//! Client for the football statistics API: paced fetching, wire types and
//! extraction into pipeline records.

pub mod extract;
pub mod http;
pub mod types;

pub use http::{Fetcher, PermitPool};
