use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use menu_ocr::api::{create_router, AppState};
use menu_ocr::config::{Config, ResponseVariant};
use menu_ocr::ocr::OcrProvider;

#[derive(Parser)]
#[command(name = "menu-ocr")]
#[command(about = "OCR web service for uploaded images and seasonal menus")]
struct Args {
    /// Address to listen on (overrides OCR_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides OCR_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Response shape of POST /ocr: `text` or `menu_week` (overrides OCR_VARIANT)
    #[arg(long)]
    variant: Option<ResponseVariant>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_ocr=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(variant) = args.variant {
        config.server.variant = variant;
    }

    tracing::info!("Initializing OCR engine (languages: {})...", config.ocr.languages);
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - /ocr requests will return 503");
    }
    match config.ocr.max_image_dimension {
        Some(dim) => tracing::info!("Images larger than {}px are downscaled", dim),
        None => tracing::info!("Image downscaling disabled"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let variant = config.server.variant;

    let state = AppState::new(config, ocr).map_err(|e| {
        anyhow::anyhow!("Invalid OCR_MENU_WEEK_PATTERN: {e}")
    })?;
    tracing::info!("Menu week pattern: {}", state.menu_week.pattern());
    let app = create_router(state);

    tracing::info!("Menu OCR starting on http://{}", addr);
    tracing::info!("  Upload page:  http://{}/", addr);
    tracing::info!("  POST /ocr:    {} variant", variant);
    tracing::info!("  API docs:     http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
