use engine::StaticCredentials;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "sikas={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let credentials = StaticCredentials::new(settings.auth.users);
    if credentials.is_empty() {
        tracing::warn!("no users in [auth.users], every request will be rejected");
    }

    let engine = engine::Engine::builder()
        .store(&settings.store.path)
        .verifier(credentials)
        .currency(settings.app.currency)
        .build();
    tracing::info!(store = settings.store.path.as_str(), "using transaction file");

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    server::run_with_listener(engine, listener).await?;

    Ok(())
}
