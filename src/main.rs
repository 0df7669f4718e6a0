// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_manager::api_client::HttpProductApi;
use product_manager::manager::ProductManager;
use product_manager::router::build_router;
use product_manager::state::{AppConfig, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Inicjalizacja systemu logowania (tracing), poziom z RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_manager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Inicjalizacja ekranu zarządzania produktami...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Nieprawidłowa konfiguracja: {}", err);
            std::process::exit(1);
        }
    };
    tracing::info!("Serwis produktów: {}", config.api.base_url());

    let api = match HttpProductApi::new(config.api.clone()) {
        Ok(api) => api,
        Err(err) => {
            tracing::error!("Nie można utworzyć klienta HTTP: {}", err);
            std::process::exit(1);
        }
    };

    let app_state = AppState {
        manager: Arc::new(ProductManager::new(Arc::new(api))),
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = build_router(app_state);

    tracing::info!("Serwer nasłuchuje na {}", config.bind_addr);
    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Nie można powiązać adresu {}: {}", config.bind_addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Błąd serwera: {}", e);
    }
}
