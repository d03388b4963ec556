//! Mars real-estate API module
//!
//! This module provides the remote data service used by the overview
//! controller: the `PropertySource` seam and its HTTP implementation.

pub mod types;
pub mod client;
pub mod errors;

pub use types::*;
pub use errors::MarsApiError;
pub use client::{MarsApiClient, PropertySource};
