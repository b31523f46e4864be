use async_trait::async_trait;
use engine::{
    Currency, GatewayOrder, GatewayOrderStatus, OrderRequest, PaymentGateway, ResultEngine,
};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// Credentials and endpoint of the gateway.
#[derive(Clone, Debug, Deserialize)]
pub struct RazorpayConfig {
    /// API root, e.g. `https://api.razorpay.com/v1`.
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
}

#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("base_url", &self.config.base_url)
            .field("key_id", &self.config.key_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OrderBody {
    id: String,
    amount: i64,
    currency: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    description: Option<String>,
    code: Option<String>,
}

impl RazorpayClient {
    pub fn new(client: Client, config: RazorpayConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn read_order(resp: Response) -> Result<GatewayOrder, GatewayError> {
        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorEnvelope>().await {
                Ok(ErrorEnvelope { error }) => error
                    .description
                    .or(error.code)
                    .unwrap_or_else(|| "gateway error".to_string()),
                Err(_) => "gateway error".to_string(),
            };
            return Err(GatewayError::Api { status, message });
        }
        order_from_body(resp.json::<OrderBody>().await?)
    }

    async fn post_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let body = CreateOrderBody {
            amount: request.amount_minor,
            currency: request.currency.code(),
            receipt: &request.receipt,
        };
        let resp = self
            .client
            .post(self.url("/orders"))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await?;
        Self::read_order(resp).await
    }

    async fn get_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        if order_id.is_empty() || order_id.contains('/') {
            return Err(GatewayError::InvalidResponse(format!(
                "refusing malformed order id {order_id:?}"
            )));
        }
        let resp = self
            .client
            .get(self.url(&format!("/orders/{order_id}")))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await?;
        Self::read_order(resp).await
    }
}

fn order_from_body(body: OrderBody) -> Result<GatewayOrder, GatewayError> {
    let status = match body.status.as_str() {
        "created" => GatewayOrderStatus::Created,
        "attempted" => GatewayOrderStatus::Attempted,
        "paid" => GatewayOrderStatus::Paid,
        other => {
            return Err(GatewayError::InvalidResponse(format!(
                "unknown order status {other}"
            )));
        }
    };
    let currency = Currency::try_from(body.currency.as_str())
        .map_err(|_| GatewayError::InvalidResponse(format!("unknown currency {}", body.currency)))?;
    Ok(GatewayOrder {
        id: body.id,
        amount_minor: body.amount,
        currency,
        status,
    })
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &OrderRequest) -> ResultEngine<GatewayOrder> {
        match self.post_order(request).await {
            Ok(order) => {
                tracing::debug!(order_id = %order.id, receipt = %request.receipt, "gateway order created");
                Ok(order)
            }
            Err(err) => {
                tracing::error!(%err, receipt = %request.receipt, "gateway order creation failed");
                Err(err.into())
            }
        }
    }

    async fn fetch_order(&self, order_id: &str) -> ResultEngine<GatewayOrder> {
        self.get_order(order_id).await.map_err(|err| {
            tracing::error!(%err, order_id, "gateway order lookup failed");
            err.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(status: &str, currency: &str) -> OrderBody {
        OrderBody {
            id: "order_1".to_string(),
            amount: 5000,
            currency: currency.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn order_body_maps_statuses() {
        assert_eq!(
            order_from_body(body("paid", "INR")).unwrap().status,
            GatewayOrderStatus::Paid
        );
        assert_eq!(
            order_from_body(body("attempted", "INR")).unwrap().status,
            GatewayOrderStatus::Attempted
        );
        assert!(matches!(
            order_from_body(body("refunded", "INR")),
            Err(GatewayError::InvalidResponse(_))
        ));
        assert!(matches!(
            order_from_body(body("paid", "USD")),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = RazorpayClient::new(
            Client::new(),
            RazorpayConfig {
                base_url: "https://gateway.test/v1/".to_string(),
                key_id: "key".to_string(),
                key_secret: "secret".to_string(),
            },
        );
        assert_eq!(client.url("/orders"), "https://gateway.test/v1/orders");
        assert!(!format!("{client:?}").contains("secret"));
    }
}
