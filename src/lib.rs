//! marsfeed: Mars real-estate listing feed
//!
//! Fetches listings from the Mars API and publishes fetch status, the current
//! listing and the pending navigation target as observable state.

pub mod config;
pub mod mars;
pub mod models;
pub mod observable;
pub mod overview;
pub mod view;

pub use overview::{ControllerOptions, FetchOutcome, PropertyFeedController};
