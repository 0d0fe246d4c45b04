// src/main.rs

use std::{net::SocketAddr, sync::Arc};

use dotenvy::dotenv;
use quizgate::config::{Config, DATABASE_FILE, resolve_data_dir};
use quizgate::routes;
use quizgate::state::AppState;
use quizgate::store::SqliteUserStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Bootstrap on a stdout-only subscriber: the log file lives in the data dir.
    let bootstrap = fmt().with_target(false).finish();
    let (config, data_dir) = tracing::subscriber::with_default(bootstrap, || {
        let config = Config::from_env();
        let data_dir = resolve_data_dir(&config.data_dir, &std::env::temp_dir());
        (config, data_dir)
    });

    // Storage location is the only fatal startup condition.
    let data_dir = match data_dir {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            std::process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "quizgate.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!("Using data dir {}", data_dir.display());

    let db_path = data_dir.join(DATABASE_FILE);
    let store = match SqliteUserStore::open(&db_path).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open account store: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Account store ready at {}", db_path.display());

    let port = config.port;
    let state = AppState::new(Arc::new(store), config);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}
