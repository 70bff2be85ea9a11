//! HTTP helpers for JSON APIs with consistent timeouts and error handling. Every
//! request goes through one client that carries the session cookie jar and one
//! response pipeline where hooks (such as the session guard) observe statuses.
//! The helpers never read cookie values; the jar is opaque to callers.

use super::guard::ResponseHook;
use crate::{config::AppConfig, errors::AppError};
use reqwest::{Client, Method, RequestBuilder, Response};
use reqwest_cookie_store::CookieStoreMutex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, debug, info_span};
use url::Url;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Cookie-carrying API client. The jar is bound at construction, so there is
/// no per-call way to send a request without the session cookie.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
    hooks: Arc<[Arc<dyn ResponseHook>]>,
}

impl ApiClient {
    #[must_use]
    pub fn builder(config: &AppConfig, jar: Arc<CookieStoreMutex>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout,
            jar,
            hooks: Vec::new(),
        }
    }

    /// Same client and cookie jar, without response hooks. For calls whose
    /// caller records the resulting session state itself.
    #[must_use]
    pub fn without_hooks(&self) -> Self {
        Self {
            hooks: Arc::from(Vec::new()),
            ..self.clone()
        }
    }

    /// Fetches JSON and decodes it into `T`.
    ///
    /// # Errors
    /// Returns `AppError` on transport failure, non-2xx status, or decode failure.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.send(Method::GET, path, None, self.timeout).await?;
        decode_json(response).await
    }

    /// Fetches a path with an explicit timeout and returns the JSON body, or
    /// `None` when the body is empty or not JSON.
    ///
    /// # Errors
    /// Returns `AppError` on transport failure or non-2xx status.
    pub async fn get_optional_json(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<Option<Value>, AppError> {
        let response = self.send(Method::GET, path, None, timeout).await?;
        let body = response.text().await.map_err(map_request_error)?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&body).ok())
    }

    /// Posts JSON and decodes a JSON response.
    ///
    /// # Errors
    /// Returns `AppError` on encode failure, transport failure, non-2xx status, or decode failure.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let response = self
            .send(Method::POST, path, Some(payload), self.timeout)
            .await?;
        decode_json(response).await
    }

    /// Posts an empty body and ignores the response body.
    ///
    /// # Errors
    /// Returns `AppError` on transport failure or non-2xx status.
    pub async fn post_empty(&self, path: &str) -> Result<(), AppError> {
        self.send(Method::POST, path, None, self.timeout).await?;
        Ok(())
    }

    /// Builds the request, applies the timeout, runs the response hooks and
    /// turns non-2xx responses into `AppError::Http`.
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<Vec<u8>>,
        timeout: Duration,
    ) -> Result<Response, AppError> {
        let url = build_url(&self.base_url, path);
        let span = info_span!("api.request", http.method = %method, url = %url);

        async move {
            debug!("sending request");
            let mut request: RequestBuilder = self.http.request(method, url).timeout(timeout);
            if let Some(payload) = payload {
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(payload);
            }

            let response = request.send().await.map_err(map_request_error)?;
            let status = response.status();
            debug!(status = status.as_u16(), "received response");

            for hook in self.hooks.iter() {
                hook.on_response(status);
            }

            if status.is_success() {
                Ok(response)
            } else {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Http {
                    status: status.as_u16(),
                    message: error_message(&body),
                })
            }
        }
        .instrument(span)
        .await
    }
}

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    jar: Arc<CookieStoreMutex>,
    hooks: Vec<Arc<dyn ResponseHook>>,
}

impl ApiClientBuilder {
    /// Registers a hook that observes the status of every response.
    #[must_use]
    pub fn response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// # Errors
    /// Returns `AppError::Config` if the base URL is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<ApiClient, AppError> {
        let base_url = parse_base_url(&self.base_url)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(self.jar)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(ApiClient {
            http,
            base_url,
            timeout: self.timeout,
            hooks: self.hooks.into(),
        })
    }
}

/// Parses the API base URL, accepting only absolute `http`/`https` URLs.
///
/// # Errors
/// Returns `AppError::Config` when the URL is malformed or uses another scheme.
pub fn parse_base_url(base_url: &str) -> Result<Url, AppError> {
    let url = Url::parse(base_url.trim())
        .map_err(|err| AppError::Config(format!("Invalid API base URL {base_url}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::Config(format!(
            "Invalid API base URL {base_url}: unsupported scheme {scheme}"
        ))),
    }
}

/// Joins the base URL and the path, keeping any path prefix of the base.
fn build_url(base_url: &Url, path: &str) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{}/{}", base, path.trim().trim_start_matches('/'))
}

/// Maps transport errors into `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    response
        .json::<T>()
        .await
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Prefers the `message` field of a JSON error body, then the trimmed and
/// truncated raw body.
fn error_message(body: &str) -> String {
    let server_message = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match server_message {
        Some(message) if !message.trim().is_empty() => message,
        _ => sanitize_body(body),
    }
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{
        net::TcpListener,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn config_for(base_url: &str) -> AppConfig {
        AppConfig {
            api_base_url: base_url.to_string(),
            ..AppConfig::default()
        }
    }

    fn empty_jar() -> Arc<CookieStoreMutex> {
        Arc::new(CookieStoreMutex::default())
    }

    #[derive(Default)]
    struct CountingHook {
        seen: AtomicUsize,
    }

    impl ResponseHook for CountingHook {
        fn on_response(&self, _status: reqwest::StatusCode) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn build_url_keeps_base_path_prefix() -> Result<(), AppError> {
        let base = parse_base_url("https://api.loyalty.dev/api/")?;
        assert_eq!(
            build_url(&base, "/merchant/login"),
            "https://api.loyalty.dev/api/merchant/login"
        );
        let base = parse_base_url("http://localhost:3000")?;
        assert_eq!(
            build_url(&base, "merchant/logout"),
            "http://localhost:3000/merchant/logout"
        );
        Ok(())
    }

    #[test]
    fn parse_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(AppError::Config(message)) if message.contains("unsupported scheme")
        ));
        assert!(matches!(parse_base_url("not a url"), Err(AppError::Config(_))));
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(error_message("  upstream down  "), "upstream down");
        assert_eq!(error_message(""), "Request failed.");
        assert_eq!(error_message(r#"{"message":""}"#), r#"{"message":""}"#);
    }

    #[test]
    fn sanitize_body_truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_CHARS + 50);
        assert_eq!(sanitize_body(&body).chars().count(), MAX_ERROR_CHARS);
    }

    #[tokio::test]
    async fn post_json_sends_body_and_decodes_response() -> Result<(), AppError> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rewards"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "Free coffee"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::builder(&config_for(&server.uri()), empty_jar())
            .build()?;
        let created: Value = client
            .post_json("/rewards", &json!({"name": "Free coffee"}))
            .await?;
        assert_eq!(created, json!({"id": 7}));
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_becomes_http_error() -> Result<(), AppError> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customers"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({"message": "Bad filter"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::builder(&config_for(&server.uri()), empty_jar())
            .build()?;
        let result: Result<Value, AppError> = client.get_json("/customers").await;
        assert_eq!(
            result,
            Err(AppError::Http {
                status: 422,
                message: "Bad filter".to_string()
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn hooks_observe_every_response() -> Result<(), AppError> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let hook = Arc::new(CountingHook::default());
        let client = ApiClient::builder(&config_for(&server.uri()), empty_jar())
            .response_hook(hook.clone())
            .build()?;

        let _: Value = client.get_json("/ok").await?;
        let broken: Result<Value, AppError> = client.get_json("/broken").await;
        assert_eq!(broken.err().and_then(|err| err.status()), Some(500));
        assert_eq!(hook.seen.load(Ordering::SeqCst), 2);

        let _: Value = client.without_hooks().get_json("/ok").await?;
        assert_eq!(hook.seen.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn get_optional_json_tolerates_empty_and_non_json_bodies() -> Result<(), AppError> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&server)
            .await;

        let client = ApiClient::builder(&config_for(&server.uri()), empty_jar())
            .build()?;
        let timeout = Duration::from_secs(1);
        assert_eq!(client.get_optional_json("/empty", timeout).await?, None);
        assert_eq!(client.get_optional_json("/text", timeout).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() -> Result<(), AppError> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = ApiClient::builder(&config_for(&server.uri()), empty_jar())
            .build()?;
        let result = client
            .get_optional_json("/slow", Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
        Ok(())
    }
}
