//! Client facade owning configuration, registry, and transport.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::debug;

use super::league::LeagueApi;
use super::matches::MatchApi;
use super::url;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::region::Location;
use crate::throttle::ThrottleRegistry;
use crate::transport::{ApiRequest, HttpTransport, Transport};

/// Entry point for callers: builds URLs, attaches credentials, and funnels
/// every request through the throttle registry.
///
/// Cloning is cheap; clones share the registry and the transport, so all
/// callers draw from the same budgets.
pub struct ApiClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    registry: Arc<ThrottleRegistry>,
    transport: Arc<T>,
}

impl ApiClient<HttpTransport> {
    /// Create a client using the reqwest-backed transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client around an injected transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let registry = Arc::new(ThrottleRegistry::new(&config.throttle)?);
        Ok(Self {
            config,
            registry,
            transport: Arc::new(transport),
        })
    }

    /// Match endpoints.
    pub fn matches(&self) -> MatchApi<'_, T> {
        MatchApi::new(self)
    }

    /// League endpoints.
    pub fn leagues(&self) -> LeagueApi<'_, T> {
        LeagueApi::new(self)
    }

    /// The shared throttle registry.
    pub fn registry(&self) -> &ThrottleRegistry {
        &self.registry
    }

    /// Issue a GET for `path` under `location` and decode the JSON body.
    pub(crate) async fn get<D>(
        &self,
        location: Location,
        method: &'static str,
        path: &str,
        query: &[(&str, Option<String>)],
    ) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let base = url::inject(&self.config.base_url, &[("region", location.id())]);
        let full = url::with_query(&format!("{base}{path}"), query);
        debug!(method, url = %full, "Issuing request");

        let request = ApiRequest::get(full)
            .header(self.config.auth_header.clone(), self.config.api_key.clone());
        let deadline = self
            .config
            .request_timeout()
            .map(|timeout| Instant::now() + timeout);
        let response = self
            .registry
            .dispatch_until(self.transport.as_ref(), location, method, &request, deadline)
            .await?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            registry: Arc::clone(&self.registry),
            transport: Arc::clone(&self.transport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::{FloodgateError, TransportError};
    use crate::region::Region;
    use crate::transport::ApiResponse;

    /// Hands back a fixed response and logs every request it sees.
    struct CapturingTransport {
        requests: Arc<Mutex<Vec<ApiRequest>>>,
        status: u16,
        body: String,
    }

    impl CapturingTransport {
        fn new(status: u16, body: &str) -> (Self, Arc<Mutex<Vec<ApiRequest>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let transport = Self {
                requests: Arc::clone(&log),
                status,
                body: body.to_string(),
            };
            (transport, log)
        }
    }

    #[async_trait]
    impl Transport for CapturingTransport {
        async fn execute(
            &self,
            request: &ApiRequest,
        ) -> std::result::Result<ApiResponse, TransportError> {
            self.requests.lock().push(request.clone());
            Ok(ApiResponse {
                status: self.status,
                headers: HashMap::new(),
                body: self.body.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_builds_the_url_and_attaches_credentials() {
        let (transport, log) = CapturingTransport::new(200, "[1, 2]");
        let client = ApiClient::with_transport(ClientConfig::new("secret"), transport).unwrap();

        let decoded: Vec<u32> = client
            .get(
                Location::Region(Region::Eune),
                "test.listing",
                "/items",
                &[("page", Some("3".to_string())), ("filter", None)],
            )
            .await
            .unwrap();

        assert_eq!(decoded, vec![1, 2]);
        let requests = log.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://eun1.api.riotgames.com/lol/items?page=3"
        );
        assert!(requests[0]
            .headers
            .contains(&("X-Riot-Token".to_string(), "secret".to_string())));
    }

    #[tokio::test]
    async fn test_undecodable_bodies_surface_as_decode_errors() {
        let (transport, _log) = CapturingTransport::new(200, "not json");
        let client = ApiClient::with_transport(ClientConfig::new("secret"), transport).unwrap();

        let err = client
            .get::<Vec<u32>>(Location::Region(Region::Na), "test.listing", "/items", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, FloodgateError::Decode(_)));
    }

    #[tokio::test]
    async fn test_error_statuses_surface_with_the_url() {
        let (transport, _log) = CapturingTransport::new(404, "not found");
        let client = ApiClient::with_transport(ClientConfig::new("secret"), transport).unwrap();

        let err = client
            .get::<Vec<u32>>(Location::Region(Region::Na), "test.listing", "/items", &[])
            .await
            .unwrap_err();

        match err {
            FloodgateError::Http { status, url, body } => {
                assert_eq!(status, 404);
                assert_eq!(url, "https://na1.api.riotgames.com/lol/items");
                assert_eq!(body, "not found");
            }
            other => panic!("expected an http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clones_share_the_registry() {
        let (transport, _log) = CapturingTransport::new(200, "[]");
        let client = ApiClient::with_transport(ClientConfig::new("secret"), transport).unwrap();
        let clone = client.clone();

        assert!(std::ptr::eq(client.registry(), clone.registry()));
    }
}
