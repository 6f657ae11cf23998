use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{BodyCompositionInput, Domain, NutritionInput, ReadinessInput, StrengthInput},
    protocol::{
        BodyCompositionResponse, HealthResponse, NutritionResponse, OneRepMaxResponse,
        ReadinessResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    error::InferenceError,
    results::{BodyCompositionResult, NutritionResult, ReadinessResult, StrengthResult},
};

/// The external fuzzy-inference service, one call per domain.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn readiness(&self, input: &ReadinessInput) -> Result<ReadinessResult, InferenceError>;
    async fn body_composition(
        &self,
        input: &BodyCompositionInput,
    ) -> Result<BodyCompositionResult, InferenceError>;
    async fn one_rep_max(&self, input: &StrengthInput) -> Result<StrengthResult, InferenceError>;
    async fn nutrition(&self, input: &NutritionInput) -> Result<NutritionResult, InferenceError>;
}

/// JSON-over-HTTP client for the inference service.
///
/// No request timeout is configured here; the caller owns timeout policy through the
/// `reqwest::Client` it passes in.
pub struct HttpInferenceClient {
    http: Client,
    base_url: Url,
}

impl HttpInferenceClient {
    pub fn new(base_url: &str) -> Result<Self, InferenceError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, InferenceError> {
        let mut base_url =
            Url::parse(base_url.trim()).map_err(|err| InferenceError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(InferenceError::InvalidUrl(format!(
                "'{base_url}' cannot be used as a base url"
            )));
        }
        // Without a trailing slash, `join` would replace the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, domain: Domain) -> Result<Url, InferenceError> {
        self.base_url
            .join(domain.endpoint_path())
            .map_err(|err| InferenceError::InvalidUrl(err.to_string()))
    }

    async fn post<Req, Resp>(&self, domain: Domain, body: &Req) -> Result<Resp, InferenceError>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(domain)?;
        debug!(%domain, %url, "posting inference request");
        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| InferenceError::Unreachable {
                domain,
                reason: err.to_string(),
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(InferenceError::Status {
                domain,
                status: status.as_u16(),
            });
        }

        res.json::<Resp>()
            .await
            .map_err(|err| InferenceError::Malformed {
                domain,
                reason: err.to_string(),
            })
    }

    /// `GET /health`. Failures are attributed to the readiness domain, which doubles as the
    /// connectivity probe.
    pub async fn health(&self) -> Result<HealthResponse, InferenceError> {
        let url = self
            .base_url
            .join("health")
            .map_err(|err| InferenceError::InvalidUrl(err.to_string()))?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| InferenceError::Unreachable {
                domain: Domain::Readiness,
                reason: err.to_string(),
            })?;
        let status = res.status();
        if !status.is_success() {
            return Err(InferenceError::Status {
                domain: Domain::Readiness,
                status: status.as_u16(),
            });
        }
        res.json().await.map_err(|err| InferenceError::Malformed {
            domain: Domain::Readiness,
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn readiness(&self, input: &ReadinessInput) -> Result<ReadinessResult, InferenceError> {
        let response: ReadinessResponse = self.post(Domain::Readiness, input).await?;
        response.try_into()
    }

    async fn body_composition(
        &self,
        input: &BodyCompositionInput,
    ) -> Result<BodyCompositionResult, InferenceError> {
        let response: BodyCompositionResponse = self.post(Domain::BodyComposition, input).await?;
        response.try_into()
    }

    async fn one_rep_max(&self, input: &StrengthInput) -> Result<StrengthResult, InferenceError> {
        let response: OneRepMaxResponse = self.post(Domain::Strength, input).await?;
        response.try_into()
    }

    async fn nutrition(&self, input: &NutritionInput) -> Result<NutritionResult, InferenceError> {
        let response: NutritionResponse = self.post(Domain::Nutrition, input).await?;
        response.try_into()
    }
}

#[cfg(test)]
#[path = "tests/inference_tests.rs"]
mod tests;
