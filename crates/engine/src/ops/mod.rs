use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{Currency, EngineError, PaymentGateway, ResultEngine};

mod expenses;
mod goals;
mod identity;
mod payments;
mod splits;
mod transfer;
mod wallet;

pub use payments::{CreditTarget, PaymentCredit};
pub use transfer::GoalTransfer;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    gateway: Option<Arc<dyn PaymentGateway>>,
    currency: Currency,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Currency used for payment orders.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn gateway(&self) -> ResultEngine<&Arc<dyn PaymentGateway>> {
        self.gateway
            .as_ref()
            .ok_or_else(|| EngineError::Upstream("payment gateway not configured".to_string()))
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    gateway: Option<Arc<dyn PaymentGateway>>,
    currency: Currency,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the payment gateway used for orders and payment verification.
    pub fn payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> EngineBuilder {
        self.gateway = Some(gateway);
        self
    }

    pub fn currency(mut self, currency: Currency) -> EngineBuilder {
        self.currency = currency;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.gateway.is_none() {
            tracing::warn!("engine built without a payment gateway; payments are disabled");
        }
        Ok(Engine {
            database: self.database,
            gateway: self.gateway,
            currency: self.currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_required_text_trims() {
        assert_eq!(normalize_required_text("  Bike ", "title").unwrap(), "Bike");
        assert_eq!(
            normalize_required_text("   ", "title").unwrap_err(),
            EngineError::InvalidInput("title must not be empty".to_string())
        );
    }

    #[test]
    fn normalize_optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" lunch ")),
            Some("lunch".to_string())
        );
    }
}
