//! Generic JSON-over-HTTP client for the LMS base URL.
//!
//! `get/post/put/delete(path, body?, headers?)` with HTTP status codes mapped
//! onto [`ApiError`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;

use edusync_core::error::ApiError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A buffered response with a success status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Error body shapes returned by the API.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "Message")]
    message: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message.or(e.detail).or(e.title))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Build the `Authorization: Bearer <token>` header.
pub fn bearer_headers(token: &str) -> Result<HeaderMap, ApiError> {
    let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        ApiError::AuthenticationFailed("token contains invalid header characters".into())
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Percent-encode `value` as a single URL path segment.
///
/// Empty and dot segments are rejected since the URL parser would collapse
/// them into a different path.
pub fn path_segment(value: &str) -> Result<String, ApiError> {
    if matches!(value, "" | "." | "..") {
        return Err(ApiError::InvalidRequest(format!(
            "'{value}' is not a valid identifier"
        )));
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, ApiError> {
        self.send(Method::GET, path, None, headers).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, ApiError> {
        self.send(Method::POST, path, body, headers).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, ApiError> {
        self.send(Method::PUT, path, body, headers).await
    }

    pub async fn delete(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, ApiError> {
        self.send(Method::DELETE, path, None, headers).await
    }

    /// Send one request and map the status code.
    #[instrument(skip(self, body, headers), fields(base_url = %self.base_url))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                ApiError::Network(format!("API not reachable at {}: {e}", self.base_url))
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        tracing::debug!(status, bytes = text.len(), "response received");

        match status {
            401 => Err(ApiError::AuthenticationFailed(error_message(&text))),
            403 => Err(ApiError::PermissionDenied(error_message(&text))),
            404 => Err(ApiError::NotFound(path.to_string())),
            s if s >= 400 => Err(ApiError::Api {
                status: s,
                message: error_message(&text),
            }),
            _ => Ok(HttpResponse { status, body: text }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn error_message_prefers_structured_fields() {
        assert_eq!(error_message(r#"{"message":"bad input"}"#), "bad input");
        assert_eq!(
            error_message(r#"{"title":"Bad Request","detail":"score missing"}"#),
            "score missing"
        );
        assert_eq!(error_message(r#"{"title":"Forbidden"}"#), "Forbidden");
        assert_eq!(error_message("plain text\n"), "plain text");
    }

    #[test]
    fn url_joining() {
        let client = HttpClient::new("http://localhost:5000/api/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.url("/Assessments/1"),
            "http://localhost:5000/api/Assessments/1"
        );
        assert_eq!(client.url("Results"), "http://localhost:5000/api/Results");
    }

    #[test]
    fn path_segment_encodes_separators() {
        assert_eq!(path_segment("a1").unwrap(), "a1");
        assert_eq!(path_segment("../Course").unwrap(), "..%2FCourse");
        assert_eq!(path_segment("a1?x=1#frag").unwrap(), "a1%3Fx%3D1%23frag");
        assert!(matches!(path_segment(".."), Err(ApiError::InvalidRequest(_))));
        assert!(matches!(path_segment(""), Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn post_sends_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Results"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(serde_json::json!({"score": 3})))
            .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&server.uri(), 5).unwrap();
        let response = client
            .post(
                "/Results",
                Some(&serde_json::json!({"score": 3})),
                Some(bearer_headers("tok").unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let server = MockServer::start().await;
        for (p, status) in [("/a", 401), ("/b", 403), ("/c", 404), ("/d", 500)] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(
                    ResponseTemplate::new(status).set_body_json(serde_json::json!({"message": "nope"})),
                )
                .mount(&server)
                .await;
        }

        let client = HttpClient::new(&server.uri(), 5).unwrap();
        assert!(matches!(
            client.get("/a", None).await,
            Err(ApiError::AuthenticationFailed(m)) if m == "nope"
        ));
        assert!(matches!(
            client.get("/b", None).await,
            Err(ApiError::PermissionDenied(_))
        ));
        assert!(matches!(client.get("/c", None).await, Err(ApiError::NotFound(_))));
        assert!(matches!(
            client.get("/d", None).await,
            Err(ApiError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn put_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/Course/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/Course/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = HttpClient::new(&server.uri(), 5).unwrap();
        let body = serde_json::json!({"title": "Rust"});
        assert_eq!(
            client.put("/Course/1", Some(&body), None).await.unwrap().status,
            204
        );
        assert_eq!(client.delete("/Course/1", None).await.unwrap().status, 204);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = HttpClient::new("http://127.0.0.1:9", 2).unwrap();
        let err = client.get("/Assessments", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_) | ApiError::Timeout(_)));
    }
}
