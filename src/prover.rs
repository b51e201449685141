//! Proof backend client.
//!
//! The backend turns a paid subscription into a zero-knowledge receipt: it
//! takes the payer, the subscription contract, the period and the
//! attestation signature, proves `hasPaid(user, period)` against the chain
//! and returns the seal, journal and user commitment.
//!
//! Endpoints:
//!
//! - `GET /health`
//! - `POST /generate-proof` ([`GenerateProofRequest`] → [`GenerateProofResponse`])
//! - `POST /verify-proof` ([`VerifyProofRequest`] → [`VerifyProofResponse`])

use crate::catalog::PeriodId;
use crate::config::ProverConfig;
use crate::error::{Error, Result};
use crate::redemption::ProofVerifier;
use alloy_primitives::{Address, Bytes};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Request body of `POST /generate-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateProofRequest {
    /// Account that paid and signed the attestation.
    pub user_address: Address,
    /// Subscription contract holding the payment record.
    pub payment_receiver: Address,
    /// Period paid for.
    pub month: PeriodId,
    /// Attestation signature.
    pub signature: Bytes,
}

/// Response of `POST /generate-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateProofResponse {
    /// Whether proving succeeded.
    pub success: bool,
    /// Backend message.
    pub message: String,
    /// Backend-assigned proof id.
    pub proof_id: String,
    /// Public outputs, hex encoded.
    pub journal: String,
    /// Receipt seal, hex encoded.
    pub seal: String,
    /// User commitment, hex encoded.
    pub commitment: String,
    /// Unix time the proof was produced.
    pub timestamp: u64,
}

/// Request body of `POST /verify-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyProofRequest {
    /// Pasted proof.
    pub proof: String,
    /// Public commitment the proof is bound to.
    pub commitment: String,
    /// Period access is claimed for.
    pub month_year: PeriodId,
}

/// Response of `POST /verify-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyProofResponse {
    /// Whether access is granted.
    pub access_granted: bool,
    /// Denial reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Service the proof was checked for.
    #[serde(default)]
    pub verified_service: Option<String>,
    /// Period the proof was checked for.
    #[serde(default)]
    pub verified_month_year: Option<u64>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` when up.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Backend clock, Unix seconds.
    pub timestamp: u64,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: String,
    error_code: String,
    #[serde(default)]
    details: Option<String>,
}

/// HTTP client for the proof backend.
#[derive(Debug, Clone)]
pub struct ProverClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProverClient {
    /// Client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Client for the configured backend, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ProverConfig, timeout: Duration) -> Result<Option<Self>> {
        config
            .url
            .as_deref()
            .map(|url| Self::new(url, timeout))
            .transpose()
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness check.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        debug!("GET {url}");
        let response = self.http.get(&url).send().await?;
        Self::parse(response).await
    }

    /// Ask the backend to prove a payment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prover`] if the backend refuses or reports failure,
    /// or a transport error.
    pub async fn generate_proof(
        &self,
        request: &GenerateProofRequest,
    ) -> Result<GenerateProofResponse> {
        info!(
            "Requesting proof for {} period {}",
            request.user_address, request.month
        );
        let response: GenerateProofResponse = self.post("generate-proof", request).await?;
        if !response.success {
            warn!("Proof generation failed: {}", response.message);
            return Err(Error::Prover(response.message));
        }
        info!("Proof {} generated", response.proof_id);
        Ok(response)
    }

    /// Ask the backend whether a proof grants access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prover`] if the backend refuses the request, or a
    /// transport error. A denial is a successful response with
    /// `access_granted == false`.
    pub async fn verify_proof(
        &self,
        request: &VerifyProofRequest,
    ) -> Result<VerifyProofResponse> {
        self.post("verify-proof", request).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}/{path}", self.base_url);
        debug!("POST {url}");
        let response = self.http.post(&url).json(body).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => match err.details {
                Some(details) => format!("{} ({}): {details}", err.error, err.error_code),
                None => format!("{} ({})", err.error, err.error_code),
            },
            Err(_) => format!("backend returned {status}"),
        };
        Err(Error::Prover(message))
    }
}

/// Redemption check backed by `POST /verify-proof`.
#[derive(Debug, Clone)]
pub struct BackendVerifier {
    client: ProverClient,
    commitment: String,
    period: PeriodId,
}

impl BackendVerifier {
    /// Check proofs against `commitment` for `period`.
    #[must_use]
    pub fn new(client: ProverClient, commitment: impl Into<String>, period: PeriodId) -> Self {
        Self {
            client,
            commitment: commitment.into(),
            period,
        }
    }
}

impl ProofVerifier for BackendVerifier {
    async fn verify(&self, proof: &str) -> Result<()> {
        let request = VerifyProofRequest {
            proof: proof.to_string(),
            commitment: self.commitment.clone(),
            month_year: self.period,
        };
        let response = self.client.verify_proof(&request).await?;
        if response.access_granted {
            Ok(())
        } else {
            Err(Error::Prover(
                response
                    .reason
                    .unwrap_or_else(|| "access denied".to_string()),
            ))
        }
    }
}
