use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::dev_backend::DevBackend;
use super::dto::{
    AttendanceRequest, AttendanceResponse, CompletionResponse, SignInRequest, SignInResponse,
};
use crate::config::AppConfig;
use crate::domain::{
    models::{
        AttendanceAck, AttendanceSubmission, AuthSession, CompletionAck, CompletionSubmission,
        RatingCategory,
    },
    ports::outbound::{AttendanceGateway, AuthGateway, RatingGateway, ReachabilityProbe},
    GatewayError,
};

/// REST client for the Asset Tracker API.
///
/// Implements every outbound gateway port plus the reachability probe. In dev
/// mode all calls are served by an in-memory [`DevBackend`] instead.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    probe_timeout: Duration,
    dev_backend: Option<DevBackend>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| GatewayError::unknown(format!("Invalid API URL {}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: None,
            probe_timeout,
            dev_backend: None,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    pub fn dev() -> Result<Self, GatewayError> {
        let mut client = Self::new(
            "http://localhost",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )?;
        client.dev_backend = Some(DevBackend::new());
        Ok(client)
    }

    /// Attach the bearer token of the signed-in session.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn dev_backend(&self) -> Option<&DevBackend> {
        self.dev_backend.as_ref()
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url.join(path).map_err(|e| {
            GatewayError::unknown(format!("Failed to build URL for path {}: {}", path, e))
        })
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<Response, GatewayError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(format!("{}: {}", call_name, e)))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            tracing::warn!(%status, "{} returned error", call_name);
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, GatewayError> {
        let response = self.send(request, call_name).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Unreachable(format!("{}: {}", call_name, e)))?;
        serde_json::from_slice(&body)
            .map_err(|e| GatewayError::Malformed(format!("{} response: {}", call_name, e)))
    }
}

#[async_trait]
impl ReachabilityProbe for ApiClient {
    /// Any HTTP answer from the base URL counts, whatever its status.
    async fn is_connected(&self) -> bool {
        if self.dev_backend.is_some() {
            return true;
        }

        match self
            .client
            .head(self.base_url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Reachability probe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl AttendanceGateway for ApiClient {
    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceAck, GatewayError> {
        if let Some(dev) = &self.dev_backend {
            dev.record_attendance(submission);
            return Ok(AttendanceAck::Accepted);
        }

        let response: AttendanceResponse = self
            .get_json(
                self.client
                    .post(self.endpoint("/attendance")?)
                    .json(&AttendanceRequest::from(submission)),
                "POST /attendance",
            )
            .await?;
        Ok(response.into())
    }
}

#[async_trait]
impl RatingGateway for ApiClient {
    async fn fetch_categories(&self) -> Result<Vec<RatingCategory>, GatewayError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.categories());
        }

        self.get_json(
            self.client
                .get(self.endpoint("/maintenance/rating-categories")?),
            "GET /maintenance/rating-categories",
        )
        .await
    }

    async fn submit_completion(
        &self,
        submission: &CompletionSubmission,
    ) -> Result<CompletionAck, GatewayError> {
        if let Some(dev) = &self.dev_backend {
            dev.record_completion(submission);
            return Ok(CompletionAck::Successful);
        }

        let response: CompletionResponse = self
            .get_json(
                self.client
                    .post(self.endpoint("/maintenance/complete")?)
                    .json(submission),
                "POST /maintenance/complete",
            )
            .await?;
        Ok(response.into())
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthSession, GatewayError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.sign_in(username));
        }

        let response: SignInResponse = self
            .get_json(
                self.client
                    .post(self.endpoint("/auth/login")?)
                    .json(&SignInRequest { username, password }),
                "POST /auth/login",
            )
            .await?;
        Ok(response.into())
    }
}
