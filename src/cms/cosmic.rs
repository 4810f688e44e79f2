//! Cosmic objects API client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{CmsError, ContentSource, Query};
use crate::config::CmsConfig;

/// Envelope of a find response
#[derive(Debug, Deserialize)]
pub struct ObjectsResponse {
    #[serde(default)]
    pub objects: Vec<Value>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub skip: Option<u64>,
}

/// Read-only client for one Cosmic bucket
pub struct CosmicClient {
    client: reqwest::Client,
    api_url: String,
    bucket_slug: String,
    read_key: String,
}

impl CosmicClient {
    /// Build a client from configuration
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        if config.bucket_slug.is_empty() {
            return Err(CmsError::Config("bucket slug is empty".to_string()));
        }
        if config.read_key.is_empty() {
            return Err(CmsError::Config("read key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("novaworks/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CmsError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bucket_slug: config.bucket_slug.clone(),
            read_key: config.read_key.clone(),
        })
    }

    fn objects_url(&self) -> String {
        format!("{}/buckets/{}/objects", self.api_url, self.bucket_slug)
    }

    /// Query string parameters for a find request
    fn params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("read_key", self.read_key.clone()),
            ("query", query.selector().to_string()),
            ("depth", query.depth.to_string()),
        ];
        if let Some(props) = query.props_param() {
            params.push(("props", props));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(sort) = &query.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

#[async_trait]
impl ContentSource for CosmicClient {
    async fn find(&self, query: &Query) -> Result<Vec<Value>, CmsError> {
        tracing::debug!(
            "GET {} type={} filters={}",
            self.objects_url(),
            query.object_type,
            query.filters.len()
        );

        let response = self
            .client
            .get(self.objects_url())
            .query(&self.params(query))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CmsError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CmsError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: ObjectsResponse = response
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))?;

        tracing::debug!(
            "CMS returned {} of {} {}",
            body.objects.len(),
            body.total.unwrap_or(body.objects.len() as u64),
            query.object_type
        );

        Ok(body.objects)
    }

    fn name(&self) -> &'static str {
        "cosmic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::RetryingSource;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> CmsConfig {
        let mut config = CmsConfig::default();
        config.bucket_slug = "nova-works".to_string();
        config.read_key = "read-key".to_string();
        config.write_key = Some("write-key".to_string());
        config
    }

    #[test]
    fn test_requires_credentials() {
        let mut missing = config();
        missing.read_key.clear();
        assert!(matches!(
            CosmicClient::new(&missing),
            Err(CmsError::Config(_))
        ));
    }

    #[test]
    fn test_objects_url() {
        let client = CosmicClient::new(&config()).unwrap();
        assert_eq!(
            client.objects_url(),
            "https://api.cosmicjs.com/v3/buckets/nova-works/objects"
        );
    }

    #[test]
    fn test_params_never_carry_write_key() {
        let client = CosmicClient::new(&config()).unwrap();
        let query = Query::new("projects")
            .filter("metadata.featured", true)
            .props(&["id", "slug"])
            .depth(1)
            .limit(3);
        let params = client.params(&query);

        assert!(params.contains(&("read_key", "read-key".to_string())));
        assert!(params.contains(&(
            "query",
            r#"{"type":"projects","metadata.featured":true}"#.to_string()
        )));
        assert!(params.contains(&("props", "id,slug".to_string())));
        assert!(params.contains(&("depth", "1".to_string())));
        assert!(params.contains(&("limit", "3".to_string())));
        assert!(params.iter().all(|(_, v)| v != "write-key"));
    }

    async fn mock_client() -> (MockServer, CosmicClient) {
        let server = MockServer::start().await;
        let mut config = config();
        config.api_url = server.uri();
        let client = CosmicClient::new(&config).unwrap();
        (server, client)
    }

    fn objects_path() -> wiremock::matchers::PathExactMatcher {
        path("/buckets/nova-works/objects")
    }

    #[tokio::test]
    async fn test_find_returns_objects() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(objects_path())
            .and(query_param("read_key", "read-key"))
            .and(query_param("query", r#"{"type":"projects"}"#))
            .and(query_param("props", "id,slug"))
            .and(query_param("depth", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objects": [{"id": "1", "slug": "acme"}, {"id": "2", "slug": "orbit"}],
                "total": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = Query::new("projects").props(&["id", "slug"]).depth(1);
        let objects = client.find(&query).await.unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1]["slug"], "orbit");
    }

    #[tokio::test]
    async fn test_find_maps_404_to_not_found() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(objects_path())
            .respond_with(ResponseTemplate::new(404).set_body_string("No objects found"))
            .mount(&server)
            .await;

        let err = client.find(&Query::new("projects")).await.unwrap_err();
        assert_eq!(err, CmsError::NotFound);
    }

    #[tokio::test]
    async fn test_find_maps_server_error_to_upstream() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(objects_path())
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client.find(&Query::new("projects")).await.unwrap_err();
        match err {
            CmsError::Upstream { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_rejects_malformed_body() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(objects_path())
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client.find(&Query::new("projects")).await.unwrap_err();
        assert!(matches!(err, CmsError::Decode(_)));
    }

    #[tokio::test]
    async fn test_retrying_client_does_not_repeat_404() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(objects_path())
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = RetryingSource::new(Arc::new(client))
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2));
        let err = source
            .find_one(&Query::new("projects").filter("slug", "missing"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn test_response_envelope() {
        let body: ObjectsResponse =
            serde_json::from_str(r#"{"objects":[{"id":"1"}],"total":1,"limit":10,"skip":0}"#)
                .unwrap();
        assert_eq!(body.objects.len(), 1);
        assert_eq!(body.total, Some(1));
        assert_eq!(body.skip, Some(0));
    }
}
