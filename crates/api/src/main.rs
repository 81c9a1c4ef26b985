use assetforge_api::app;
use assetforge_api::config::ApiConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    assetforge_observability::init();

    let config = ApiConfig::from_env();

    let app = match app::build_app(&config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to wire services");
            std::process::exit(1);
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
