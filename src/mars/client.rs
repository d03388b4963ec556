//! Mars API client

use crate::config::Config;
use crate::mars::{MarsApi, MarsApiError};
use crate::models::{MarsProperty, PropertyFilter};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

/// Remote data service the overview controller fetches listings from
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch the listing matching `filter`
    async fn fetch_properties(&self, filter: PropertyFilter) -> Result<Vec<MarsProperty>, MarsApiError>;

    /// Get the name of the source, used in logs
    fn source_name(&self) -> &'static str;
}

/// HTTP/JSON implementation of [`PropertySource`] against the Mars API
pub struct MarsApiClient {
    client: Client,
    endpoint: Url,
    timeout_seconds: u64,
}

impl MarsApiClient {
    pub fn new(config: &Config) -> Result<Self, MarsApiError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        let endpoint = realestate_url(&config.base_url)?;

        Ok(Self {
            client,
            endpoint,
            timeout_seconds: config.http.timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PropertySource for MarsApiClient {
    async fn fetch_properties(&self, filter: PropertyFilter) -> Result<Vec<MarsProperty>, MarsApiError> {
        debug!("Requesting {}?{}={}", self.endpoint, MarsApi::FILTER_PARAM, filter);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[(MarsApi::FILTER_PARAM, filter.as_str())])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(MarsApiError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        let properties = parse_listing(filter, &body)?;
        debug!("Received {} properties for filter {}", properties.len(), filter);
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "Mars API"
    }
}

impl MarsApiClient {
    fn classify(&self, err: reqwest::Error) -> MarsApiError {
        if err.is_timeout() {
            MarsApiError::Timeout(self.timeout_seconds)
        } else {
            MarsApiError::Http(err)
        }
    }
}

/// Resolve the listing endpoint against `base_url`. A missing trailing slash
/// on the base is tolerated so the last path segment is kept.
fn realestate_url(base_url: &str) -> Result<Url, MarsApiError> {
    let invalid = |reason: String| MarsApiError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(MarsApi::REALESTATE_ENDPOINT)
        .map_err(|e| invalid(e.to_string()))
}

/// Decode a listing body. The API answers with a bare JSON array.
fn parse_listing(filter: PropertyFilter, body: &str) -> Result<Vec<MarsProperty>, MarsApiError> {
    serde_json::from_str(body).map_err(|source| MarsApiError::ApiResponseError {
        filter: filter.as_str().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realestate_url() {
        assert_eq!(
            realestate_url("https://mars.udacity.com/").unwrap().as_str(),
            "https://mars.udacity.com/realestate"
        );
        assert_eq!(
            realestate_url("http://localhost:8080/api").unwrap().as_str(),
            "http://localhost:8080/api/realestate"
        );
        assert!(matches!(
            realestate_url("mars"),
            Err(MarsApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_listing_deserialization() {
        let sample_response = r#"[
            {
                "price": 450000,
                "id": "424905",
                "type": "buy",
                "img_src": "http://mars.jpl.nasa.gov/msl-raw-images/msss/01000/mcam/1000MR0044631300503690E01_DXXX.jpg"
            },
            {
                "price": 8000000,
                "id": "424906",
                "type": "rent",
                "img_src": "http://mars.jpl.nasa.gov/msl-raw-images/msss/01000/mcam/1000ML0044631300305227E03_DXXX.jpg"
            }
        ]"#;

        let parsed = parse_listing(PropertyFilter::ShowAll, sample_response).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "424905");
        assert!(!parsed[0].is_rental());
        assert!(parsed[1].is_rental());
    }

    #[test]
    fn test_listing_decode_error_names_filter() {
        let err = parse_listing(PropertyFilter::ShowRent, r#"{"error":"nope"}"#).unwrap_err();
        match err {
            MarsApiError::ApiResponseError { filter, .. } => assert_eq!(filter, "rent"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_client_uses_configured_base_url() {
        let config = Config {
            base_url: "http://127.0.0.1:9/mars/".to_string(),
            ..Config::default()
        };
        let client = MarsApiClient::new(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9/mars/realestate");
        assert_eq!(client.source_name(), "Mars API");
    }
}
