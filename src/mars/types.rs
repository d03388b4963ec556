//! Mars API endpoints and constants

/// Mars API endpoints and constants
pub struct MarsApi;

impl MarsApi {
    /// Base URL for the Mars real-estate API
    pub const BASE_URL: &'static str = "https://mars.udacity.com/";
    /// Property listing endpoint, relative to the base URL
    pub const REALESTATE_ENDPOINT: &'static str = "realestate";
    /// Query parameter carrying the filter value
    pub const FILTER_PARAM: &'static str = "filter";
}
