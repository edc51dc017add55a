use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised by the eligibility dependencies.
///
/// None of these block the quote flow: the guard downgrades every failure to
/// a fail-open outcome with a warning.
#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("ip lookup failed: {0}")]
    IpLookup(String),
    #[error("eligibility service failed: {0}")]
    Remote(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Coarse device hints supplied by the browser.
///
/// Only ever hashed; the raw values are neither persisted nor forwarded.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DeviceHints {
    pub user_agent: Option<String>,
    pub locale: Option<String>,
    pub timezone_offset_minutes: Option<i32>,
    pub screen: Option<String>,
}

/// Input to one eligibility check.
#[derive(Debug, Clone, Default)]
pub struct EligibilityRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hints: DeviceHints,
}

impl EligibilityRequest {
    /// The check only runs once some contact detail exists to key it by.
    pub fn has_contact(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

/// Result of one eligibility check.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EligibilityOutcome {
    pub is_eligible: bool,
    pub reason: Option<String>,
    pub warnings: Vec<String>,
}

/// Decision returned by the remote checker.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDecision {
    pub eligible: bool,
    pub reason: Option<String>,
}

/// Contact details plus fingerprint submitted to the remote checker.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EligibilityClaim {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fingerprint: String,
}

/// Resolves the caller's public IP address.
#[async_trait]
pub trait IpResolver: Send + Sync {
    async fn public_ip(&self) -> Result<String, EligibilityError>;
}

/// Server-side checker holding the email/phone/fingerprint history.
#[async_trait]
pub trait PromoEligibilityApi: Send + Sync {
    async fn check(&self, claim: &EligibilityClaim) -> Result<RemoteDecision, EligibilityError>;
}

/// One-way fingerprint of the caller: SHA-256 over the public IP and the
/// opaquely encoded device hints, hex encoded. Neither input survives.
pub fn fingerprint(ip: &str, hints: &DeviceHints) -> String {
    let encoded = format!(
        "{}|{}|{}|{}",
        hints.user_agent.as_deref().unwrap_or_default(),
        hints.locale.as_deref().unwrap_or_default(),
        hints
            .timezone_offset_minutes
            .map(|offset| offset.to_string())
            .unwrap_or_default(),
        hints.screen.as_deref().unwrap_or_default(),
    );

    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hasher.update(b"|");
    hasher.update(encoded.as_bytes());
    hex::encode(hasher.finalize())
}

/// Gate to the promotional pricing model.
pub struct EligibilityGuard<I, A> {
    ip_resolver: I,
    api: A,
}

impl<I, A> EligibilityGuard<I, A>
where
    I: IpResolver,
    A: PromoEligibilityApi,
{
    pub fn new(ip_resolver: I, api: A) -> Self {
        Self { ip_resolver, api }
    }

    /// Check whether the caller may claim the promotional model.
    ///
    /// Returns `None` without touching the network when no contact detail is
    /// present. Every dependency failure fails open: the caller stays
    /// eligible and the warning is logged for manual review.
    pub async fn check(&self, request: &EligibilityRequest) -> Option<EligibilityOutcome> {
        if !request.has_contact() {
            return None;
        }

        let outcome = match self.enforce(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("eligibility check failed open: {err}");
                EligibilityOutcome {
                    is_eligible: true,
                    reason: None,
                    warnings: vec![format!(
                        "eligibility could not be verified, allowing by policy: {err}"
                    )],
                }
            }
        };

        Some(outcome)
    }

    async fn enforce(
        &self,
        request: &EligibilityRequest,
    ) -> Result<EligibilityOutcome, EligibilityError> {
        let ip = self.ip_resolver.public_ip().await?;
        let claim = EligibilityClaim {
            email: request.email.clone(),
            phone: request.phone.clone(),
            fingerprint: fingerprint(&ip, &request.hints),
        };

        let decision = self.api.check(&claim).await?;

        Ok(EligibilityOutcome {
            is_eligible: decision.eligible,
            reason: decision.reason,
            warnings: Vec::new(),
        })
    }
}

/// IP resolver backed by one external GET.
pub struct HttpIpResolver {
    client: reqwest::Client,
    lookup_url: String,
}

impl HttpIpResolver {
    pub fn new(lookup_url: impl Into<String>) -> Result<Self, EligibilityError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            lookup_url: lookup_url.into(),
        })
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn public_ip(&self) -> Result<String, EligibilityError> {
        let response = self.client.get(&self.lookup_url).send().await?;
        if !response.status().is_success() {
            return Err(EligibilityError::IpLookup(format!(
                "lookup answered {}",
                response.status()
            )));
        }

        let ip = response.text().await?.trim().to_string();
        if ip.is_empty() {
            return Err(EligibilityError::IpLookup("empty lookup response".into()));
        }

        Ok(ip)
    }
}

/// Remote checker client.
pub struct RestPromoEligibilityApi {
    client: reqwest::Client,
    service_url: String,
}

impl RestPromoEligibilityApi {
    pub fn new(service_url: impl Into<String>) -> Result<Self, EligibilityError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            service_url: service_url.into(),
        })
    }
}

#[async_trait]
impl PromoEligibilityApi for RestPromoEligibilityApi {
    async fn check(&self, claim: &EligibilityClaim) -> Result<RemoteDecision, EligibilityError> {
        let response = self
            .client
            .post(&self.service_url)
            .json(claim)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EligibilityError::Remote(format!(
                "checker answered {}",
                response.status()
            )));
        }

        Ok(response.json::<RemoteDecision>().await?)
    }
}

#[cfg(test)]
mockall::mock! {
    pub IpResolver {}

    #[async_trait]
    impl IpResolver for IpResolver {
        async fn public_ip(&self) -> Result<String, EligibilityError>;
    }
}

#[cfg(test)]
mockall::mock! {
    pub PromoEligibilityApi {}

    #[async_trait]
    impl PromoEligibilityApi for PromoEligibilityApi {
        async fn check(&self, claim: &EligibilityClaim) -> Result<RemoteDecision, EligibilityError>;
    }
}
