use async_trait::async_trait;
use reqwest::{
    StatusCode, Url,
    header::{ACCEPT, HeaderValue},
};
use tracing::{debug, instrument};

use crate::{
    config::ClientConfig,
    error::{ApiErrorResponse, ForecastError},
    model::WeatherSample,
    query::ForecastQuery,
};

const HOURLY_FORECAST_PATH: &str = "weather/forecast/hourly";
const API_KEY_HEADER: &str = "apikey";

/// Source of hourly forecasts. Implemented by [`Client`]; callers can swap
/// in their own implementation in tests.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn hourly_forecast(
        &self,
        query: &ForecastQuery,
    ) -> Result<Vec<WeatherSample>, ForecastError>;
}

/// HTTP client for the ClimaCell API.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    api_key: HeaderValue,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the public API with the default 30 second timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ForecastError> {
        Self::with_config(api_key, &ClientConfig::default())
    }

    pub fn with_config(
        api_key: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self, ForecastError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            ForecastError::InvalidEndpoint(format!("{}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ForecastError::InvalidEndpoint(format!(
                "{}: not usable as a base URL",
                config.base_url
            )));
        }
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut api_key = HeaderValue::from_str(&api_key.into())
            .map_err(|_| ForecastError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ForecastError::HttpClient)?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ForecastError> {
        self.base_url
            .join(path)
            .map_err(|e| ForecastError::InvalidEndpoint(format!("{path}: {e}")))
    }

    /// Fetches the hourly forecast matching `query`.
    ///
    /// The body is read in full before the status is inspected, so the
    /// connection is released on every path. Nothing is retried.
    #[instrument(skip(self, query))]
    pub async fn hourly_forecast(
        &self,
        query: &ForecastQuery,
    ) -> Result<Vec<WeatherSample>, ForecastError> {
        let url = query.to_url(&self.endpoint(HOURLY_FORECAST_PATH)?);
        debug!(url = %url, "Fetching hourly forecast");

        let res = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, self.api_key.clone())
            .send()
            .await
            .map_err(ForecastError::Network)?;

        let status = res.status();
        let body = res.bytes().await.map_err(ForecastError::Network)?;
        debug!(status = %status, bytes = body.len(), "Received hourly forecast response");

        decode_response(status, &body)
    }
}

#[async_trait]
impl ForecastProvider for Client {
    async fn hourly_forecast(
        &self,
        query: &ForecastQuery,
    ) -> Result<Vec<WeatherSample>, ForecastError> {
        Client::hourly_forecast(self, query).await
    }
}

fn decode_response(status: StatusCode, body: &[u8]) -> Result<Vec<WeatherSample>, ForecastError> {
    match status {
        StatusCode::OK => Ok(serde_json::from_slice(body)?),
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::INTERNAL_SERVER_ERROR => {
            let mut err: ApiErrorResponse = serde_json::from_slice(body)?;
            if err.status_code == 0 {
                err.status_code = status.as_u16();
            }
            Err(ForecastError::Api(err))
        }
        other => Err(ForecastError::UnexpectedStatus(other.as_u16())),
    }
}
