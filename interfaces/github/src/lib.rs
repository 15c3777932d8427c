//! GitHub upstream shapes used by the badges
//!
//! - `packages`: container package version listings and package page URLs
//! - `search`: code search URLs for workflow usage counts

pub mod packages;
pub mod search;
