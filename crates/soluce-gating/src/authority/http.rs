//! HTTP license authority: `POST {base_url}/validate`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use soluce_core::Tier;

use super::{AuthorityError, AuthorityVerdict, LicenseAuthority};
use crate::license_key::LicenseKey;

#[derive(Debug, Clone, Serialize)]
pub struct ValidateRequest<'a> {
    pub key: &'a str,
    pub product: &'a str,
    pub request_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ValidateResponse {
    pub fn into_verdict(self) -> AuthorityVerdict {
        if self.valid {
            AuthorityVerdict::Valid {
                tier: self.tier.as_deref().map(Tier::normalize),
                expires_at: self.expires_at,
                email: self.email,
            }
        } else {
            AuthorityVerdict::Rejected {
                reason: self
                    .message
                    .unwrap_or_else(|| "License key is not valid".to_string()),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpLicenseAuthority {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLicenseAuthority {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthorityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/validate", self.base_url)
    }
}

impl LicenseAuthority for HttpLicenseAuthority {
    async fn validate(
        &self,
        key: &LicenseKey,
        product: &str,
    ) -> Result<AuthorityVerdict, AuthorityError> {
        let request = ValidateRequest {
            key: key.as_str(),
            product,
            request_id: uuid::Uuid::new_v4().to_string(),
        };
        debug!(request_id = %request.request_id, key = %key, "Validating license online");

        let resp = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if status.is_server_error() {
            return Err(AuthorityError::Unreachable(format!("HTTP {status}")));
        }

        match resp.json::<ValidateResponse>().await {
            Ok(body) => Ok(body.into_verdict()),
            // A 4xx without a readable body is still a definitive answer.
            Err(_) if status.is_client_error() => Ok(AuthorityVerdict::Rejected {
                reason: format!("License server refused the key (HTTP {status})"),
            }),
            Err(e) => Err(AuthorityError::BadResponse(e.to_string())),
        }
    }
}
