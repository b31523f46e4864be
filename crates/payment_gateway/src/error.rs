use engine::EngineError;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("gateway replied {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl From<GatewayError> for EngineError {
    fn from(err: GatewayError) -> Self {
        EngineError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_become_upstream() {
        let err = GatewayError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "amount too small".to_string(),
        };
        assert_eq!(
            EngineError::from(err),
            EngineError::Upstream("gateway replied 400 Bad Request: amount too small".to_string())
        );
    }
}
