use std::time::Duration;

use serde::Deserialize;

use crate::config::BotCheckConfig;
use crate::error::{DocentError, Result};

/// Server-side verification of client bot-check tokens.
///
/// When no configuration is present the verifier is a no-op, so unconfigured
/// deployments accept requests without a token.
#[derive(Clone)]
pub struct BotScoreVerifier {
    client: reqwest::Client,
    config: Option<BotCheckConfig>,
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl BotScoreVerifier {
    pub fn new(config: Option<BotCheckConfig>) -> Result<Self> {
        let timeout_secs = config.as_ref().map(|c| c.timeout_secs).unwrap_or(10);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Verify a client token against the configured endpoint.
    ///
    /// A missing token is a client error. A verification service that cannot
    /// be reached is an upstream error, not a rejection. A reachable service
    /// that says no, or reports a score under the threshold, rejects the
    /// request. A success response without a score also rejects: it means
    /// the token was not issued for score-based verification.
    pub async fn verify(&self, token: Option<&str>) -> Result<()> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DocentError::Validation("botToken is required".to_string()))?;

        let response: SiteVerifyResponse = self
            .client
            .post(&config.verify_url)
            .form(&[("secret", config.secret.as_str()), ("response", token)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            tracing::debug!(
                error_codes = ?response.error_codes,
                "Bot check token rejected by verifier"
            );
            return Err(DocentError::Forbidden(
                "Bot check verification failed".to_string(),
            ));
        }

        let score = response.score.unwrap_or(0.0);
        if score < config.min_score {
            tracing::debug!(score, min_score = config.min_score, "Bot score below threshold");
            return Err(DocentError::Forbidden(
                "Bot check score too low".to_string(),
            ));
        }

        Ok(())
    }
}
