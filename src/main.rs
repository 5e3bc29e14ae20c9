mod config;
mod dom;
mod extract;
mod page;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let engine = page::static_engine::StaticEngine::new(config.engine.clone());
    tracing::info!(
        user_agent = %config.engine.user_agent,
        budget_secs = config.extraction.budget.as_secs(),
        "static engine initialized"
    );

    let state = state::AppState::new(Arc::new(engine), config.extraction);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "svg-harvest listening");
    axum::serve(listener, app).await.expect("server failed");
}
