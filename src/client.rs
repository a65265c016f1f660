use crate::config::Config;
use crate::errors::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use tracing::error;

/// Thin wrapper around `reqwest::Client` carrying the API base URL,
/// default headers and request timeout. Every non-2xx response is logged
/// with its body and converted into `ApiError::Status` before the caller
/// sees it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base_url =
            Url::parse(&config.api_base_url).map_err(|e| ApiError::Url(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { http, base_url })
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Response> {
        let request = self.http.get(self.endpoint(path)?).query(query);
        self.send(path, request).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> ApiResult<Response> {
        let request = self.http.post(self.endpoint(path)?).multipart(form);
        self.send(path, request).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ApiResult<Response> {
        let request = self.http.put(self.endpoint(path)?).json(body);
        self.send(path, request).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Response> {
        let request = self.http.delete(self.endpoint(path)?);
        self.send(path, request).await
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        // A leading slash would discard the /api/v1 prefix on join
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Url(e.to_string()))
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(path, "network error: {}", e);
                return Err(e.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(path, %status, "api error: {}", body);
        Err(ApiError::Status { status, body })
    }
}
