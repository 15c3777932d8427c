//! Plain HTTP GET access to badge upstreams
//!
//! - `Fetch` is the seam handlers depend on
//! - `HttpFetcher` is the reqwest-backed implementation

pub mod index;
