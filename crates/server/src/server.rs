use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{
    EngineIdentityProvider, IdentityProvider, ServerError, expenses, goals, payment, splits,
    wallet,
};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl ServerState {
    /// State whose tokens are verified against the engine's token table.
    pub fn new(engine: Arc<Engine>) -> Self {
        let identity = Arc::new(EngineIdentityProvider::new(engine.clone()));
        Self { engine, identity }
    }

    pub fn with_identity(engine: Arc<Engine>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { engine, identity }
    }
}

async fn auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(EngineError::Unauthorized("missing bearer token".to_string()).into());
    };

    let identity = state.identity.verify(bearer.token()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/activity", get(goals::activity))
        .route("/goals/{id}", put(goals::update).delete(goals::delete))
        .route("/goals/{id}/withdraw", post(goals::withdraw))
        .route("/wallet", get(wallet::get).post(wallet::get))
        .route("/wallet/deposit", post(wallet::deposit))
        .route("/wallet/withdraw", post(wallet::withdraw))
        .route("/wallet/transactions", get(wallet::transactions))
        .route("/splits", get(splits::list).post(splits::create))
        .route("/splits/{id}", put(splits::update).delete(splits::delete))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/summary", get(expenses::summary))
        .route("/expenses/{id}", axum::routing::delete(expenses::delete))
        .route("/payment/create-order", post(payment::create_order))
        .route("/payment/confirm", post(payment::confirm))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(state: ServerState, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
