use hostelconnect_functions::{app, config::AppConfig, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SUPABASE_URL and friends.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("starting with {:?}", config);

    let state = AppState::from_config(&config);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 HostelConnect functions listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}
