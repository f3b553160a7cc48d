//! Practicum adapter (homework statuses).
//!
//! Implements the `hwbot-core` HomeworkApi port over the Practicum user API.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;

use hwbot_core::{config::Config, errors::Error, ports::HomeworkApi, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a finished HTTP exchange.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP transport, injectable for tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` with the given query pairs and `Authorization` header value.
    ///
    /// Only transport problems are errors; any HTTP status is a response.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        authorization: &str,
    ) -> Result<HttpResponse>;
}

#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        authorization: &str,
    ) -> Result<HttpResponse> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {url}: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("reading response body: {e}")))?;

        tracing::debug!("GET {url} -> {status} ({} bytes)", body.len());
        Ok(HttpResponse { status, body })
    }
}

#[derive(Clone)]
pub struct PracticumClient {
    token: String,
    endpoint: String,
    http: Arc<dyn HttpClient>,
}

impl PracticumClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = ReqwestHttpClient::new(REQUEST_TIMEOUT)?;
        Ok(Self::with_http(
            cfg.practicum_token.clone(),
            cfg.endpoint.clone(),
            Arc::new(http),
        ))
    }

    pub fn with_http(
        token: impl Into<String>,
        endpoint: impl Into<String>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            token: token.into(),
            endpoint: endpoint.into(),
            http,
        }
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn homework_statuses(&self, from_date: i64) -> Result<Value> {
        let authorization = format!("OAuth {}", self.token);
        let query = [("from_date", from_date.to_string())];

        let resp = match self.http.get(&self.endpoint, &query, &authorization).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("homework API request failed: {e}");
                return Err(e);
            }
        };

        if resp.status != 200 {
            tracing::error!("homework API returned status {}", resp.status);
            return Err(Error::BadStatus(resp.status));
        }

        let value = serde_json::from_str::<Value>(&resp.body).map_err(|e| {
            tracing::error!("homework API returned invalid JSON: {e}");
            Error::MalformedBody(e.to_string())
        })?;

        tracing::info!("received homework API response");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeHttp {
        reply: Mutex<Option<Result<HttpResponse>>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>, String)>>,
    }

    impl FakeHttp {
        fn replying(reply: Result<HttpResponse>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn ok(status: u16, body: &str) -> Arc<Self> {
            Self::replying(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }))
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttp {
        async fn get(
            &self,
            url: &str,
            query: &[(&str, String)],
            authorization: &str,
        ) -> Result<HttpResponse> {
            self.calls.lock().unwrap().push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                authorization.to_string(),
            ));
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(Error::Transport("no reply".to_string())))
        }
    }

    fn client(http: Arc<FakeHttp>) -> PracticumClient {
        PracticumClient::with_http("yp-token", "https://example.test/statuses/", http)
    }

    #[tokio::test]
    async fn sends_oauth_header_and_from_date() {
        let http = FakeHttp::ok(200, r#"{"homeworks": [], "current_date": 1000}"#);
        let value = client(http.clone()).homework_statuses(123).await.unwrap();

        assert_eq!(value["current_date"], 1000);
        let calls = http.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (url, query, auth) = &calls[0];
        assert_eq!(url, "https://example.test/statuses/");
        assert_eq!(query, &vec![("from_date".to_string(), "123".to_string())]);
        assert_eq!(auth, "OAuth yp-token");
    }

    #[tokio::test]
    async fn non_200_status_is_a_bad_status() {
        let http = FakeHttp::ok(401, r#"{"code": "not_authenticated"}"#);
        let err = client(http).homework_statuses(0).await.unwrap_err();
        assert!(matches!(err, Error::BadStatus(401)), "{err:?}");
    }

    #[tokio::test]
    async fn invalid_json_is_a_malformed_body() {
        let http = FakeHttp::ok(200, "<html>maintenance</html>");
        let err = client(http).homework_statuses(0).await.unwrap_err();
        assert!(matches!(err, Error::MalformedBody(_)), "{err:?}");
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let http = FakeHttp::replying(Err(Error::Transport("dns failure".to_string())));
        let err = client(http).homework_statuses(0).await.unwrap_err();
        match err {
            Error::Transport(msg) => assert_eq!(msg, "dns failure"),
            other => panic!("expected Error::Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reqwest_connection_refused_is_a_transport_error() {
        let http = ReqwestHttpClient::new(Duration::from_secs(5)).unwrap();
        let err = http
            .get("http://127.0.0.1:1/statuses/", &[], "OAuth x")
            .await
            .unwrap_err();
        match err {
            Error::Transport(msg) => {
                assert!(msg.starts_with("GET http://127.0.0.1:1/statuses/:"), "{msg}")
            }
            other => panic!("expected Error::Transport, got {other:?}"),
        }
    }
}
