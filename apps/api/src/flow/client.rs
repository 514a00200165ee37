use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::cancel::payload::{
    AcceptDownsellRequest, CancelAction, CancelSubscriptionRequest, CancellationResponse,
    ErrorResponse, GetVariantRequest, VariantResponse,
};
use crate::models::cancellation::{CancellationRow, Variant};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// The backend calls the wizard makes. One call per button press, no retries.
#[async_trait]
pub trait CancelApi: Send + Sync {
    async fn get_variant(&self, user_id: Uuid) -> Result<Variant, ClientError>;

    async fn cancel_subscription(
        &self,
        req: CancelSubscriptionRequest,
    ) -> Result<CancellationRow, ClientError>;

    async fn accept_downsell(
        &self,
        req: AcceptDownsellRequest,
    ) -> Result<CancellationRow, ClientError>;
}

/// Talks to `POST {base_url}/api/cancel`.
#[derive(Clone)]
pub struct HttpCancelClient {
    client: Client,
    endpoint: String,
}

impl HttpCancelClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            endpoint: format!("{}/api/cancel", base_url.trim_end_matches('/')),
        })
    }

    async fn post<T: DeserializeOwned>(&self, action: &CancelAction) -> Result<T, ClientError> {
        let response = self.client.post(&self.endpoint).json(action).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Cancel API answered {status}");
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CancelApi for HttpCancelClient {
    async fn get_variant(&self, user_id: Uuid) -> Result<Variant, ClientError> {
        let response: VariantResponse = self
            .post(&CancelAction::GetVariant(GetVariantRequest { user_id }))
            .await?;
        Ok(response.variant)
    }

    async fn cancel_subscription(
        &self,
        req: CancelSubscriptionRequest,
    ) -> Result<CancellationRow, ClientError> {
        let response: CancellationResponse =
            self.post(&CancelAction::CancelSubscription(req)).await?;
        Ok(response.cancellation)
    }

    async fn accept_downsell(
        &self,
        req: AcceptDownsellRequest,
    ) -> Result<CancellationRow, ClientError> {
        let response: CancellationResponse = self.post(&CancelAction::AcceptDownsell(req)).await?;
        Ok(response.cancellation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HttpCancelClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.endpoint, "http://localhost:8080/api/cancel");
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_http_error() {
        // `.invalid` never resolves.
        let client = HttpCancelClient::new("http://cancel-api.invalid").unwrap();
        let err = client.get_variant(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
