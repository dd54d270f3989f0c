use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};

use std::{future::Future, sync::Arc};

use crate::{accounts, categories, currencies, operations, statistics};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Log method, path and outcome of every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::info!(%method, %uri, status = %response.status(), "request served");
    response
}

pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };
    Router::new()
        .route(
            "/currencies",
            get(currencies::list)
                .post(currencies::reconcile)
                .delete(currencies::delete),
        )
        .route(
            "/accounts",
            get(accounts::list)
                .post(accounts::reconcile)
                .delete(accounts::delete),
        )
        .route(
            "/categories",
            get(categories::list)
                .post(categories::reconcile)
                .delete(categories::delete),
        )
        .route(
            "/operations",
            get(operations::list)
                .post(operations::reconcile)
                .delete(operations::delete),
        )
        .route("/statistics/accounts", get(statistics::accounts))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Bind `bind:port` and serve until Ctrl-C.
pub async fn run(engine: Engine, bind: &str, port: u16) {
    let listener = match tokio::net::TcpListener::bind((bind, port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener, shutdown_signal()).await {
        tracing::error!("server failed: {err}");
    }
}

/// Serve on `listener` until `shutdown` resolves. In-flight requests are
/// allowed to finish.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine)))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    }
}
