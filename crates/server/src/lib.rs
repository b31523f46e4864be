use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use uuid::Uuid;

pub use auth::{EngineIdentityProvider, Identity, IdentityProvider};
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod auth;
mod expenses;
mod goals;
mod payment;
mod server;
mod splits;
mod wallet;

pub mod types {
    pub mod goal {
        pub use api_types::goal::{
            GoalActivityResponse, GoalActivityView, GoalListResponse, GoalNew, GoalTransferView,
            GoalUpdate, GoalView, GoalWithdraw,
        };
    }

    pub mod wallet {
        pub use api_types::wallet::{
            WalletAmount, WalletTransactionView, WalletTransactionsResponse, WalletView,
        };
    }

    pub mod split {
        pub use api_types::split::{SplitListResponse, SplitNew, SplitUpdate, SplitView};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseListResponse, ExpenseNew, ExpenseQuery, ExpenseSummaryView, ExpenseView,
        };
    }

    pub mod payment {
        pub use api_types::payment::{ConfirmPayment, CreateOrder, OrderView, PaymentConfirmed};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::PaymentNotConfirmed(_) => StatusCode::PAYMENT_REQUIRED,
        EngineError::Upstream(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidInput(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Upstream(message) => {
            tracing::warn!("payment gateway error: {message}");
            "payment gateway unavailable".to_string()
        }
        other if other.is_validation() => {
            tracing::debug!("rejected request: {other}");
            other.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Parse a path id; a malformed id is a bad request.
fn parse_id(value: &str, label: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(value).map_err(|_| ServerError::Generic(format!("invalid {label} id")))
}

fn currency_view(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Inr => api_types::Currency::Inr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res = ServerError::from(EngineError::InsufficientFunds("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unconfirmed_payment_maps_to_402() {
        let res =
            ServerError::from(EngineError::PaymentNotConfirmed("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn upstream_maps_to_502() {
        let res = ServerError::from(EngineError::Upstream("timeout".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::from(EngineError::Unauthorized("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid", "goal").is_err());
        assert!(parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8", "goal").is_ok());
    }
}
