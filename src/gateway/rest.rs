use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::gateway::{
    CompletedRedirectFlow, CreateGatewayPayment, CreateGatewaySubscription, CreateRedirectFlow,
    CustomerDetails, DirectDebitGateway, GatewayCustomerRef, GatewayError, GatewayPaymentRef,
    GatewayResult, GatewaySubscriptionRef, RedirectFlow,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the hosted direct-debit gateway.
pub struct RestDirectDebitGateway {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl RestDirectDebitGateway {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl DirectDebitGateway for RestDirectDebitGateway {
    async fn create_customer(
        &self,
        details: &CustomerDetails,
    ) -> GatewayResult<GatewayCustomerRef> {
        self.post("/customers", details).await
    }

    async fn create_redirect_flow(
        &self,
        request: &CreateRedirectFlow,
    ) -> GatewayResult<RedirectFlow> {
        self.post("/redirect_flows", request).await
    }

    async fn complete_redirect_flow(
        &self,
        flow_id: &str,
        session_token: &str,
    ) -> GatewayResult<CompletedRedirectFlow> {
        #[derive(Serialize)]
        struct CompleteBody<'a> {
            session_token: &'a str,
        }

        let path = format!("/redirect_flows/{flow_id}/actions/complete");
        self.post(&path, &CompleteBody { session_token }).await
    }

    async fn create_payment(
        &self,
        request: &CreateGatewayPayment,
    ) -> GatewayResult<GatewayPaymentRef> {
        self.post("/payments", request).await
    }

    async fn create_subscription(
        &self,
        request: &CreateGatewaySubscription,
    ) -> GatewayResult<GatewaySubscriptionRef> {
        self.post("/subscriptions", request).await
    }
}
