use std::sync::Arc;

use chrono::{Local, Utc};

use gratitude_board::{
    board::{BoardController, countdown, presenter::BoardView},
    calendar, config,
    handlers::rest::{self, AppState},
    storage::{
        self,
        device::{AnyStore, FileStore, MemoryStore},
        local::LocalBackend,
    },
};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {e}");
        panic!("failed to load configuration: {e}");
    });
    tracing::info!("Successfully loaded board config");

    // Device store, kept in memory if the directory is unusable
    let store = match FileStore::new(&cfg.store.dir).await {
        Ok(store) => AnyStore::File(store),
        Err(e) => {
            tracing::warn!(
                "Device store at {} unavailable, notes will only last this session: {e}",
                cfg.store.dir.display()
            );
            AnyStore::Memory(MemoryStore::new())
        }
    };
    let local = Arc::new(LocalBackend::new(store, cfg.store.key.clone()));

    let backend = storage::select_backend(&cfg.backend, local.clone()).unwrap_or_else(|e| {
        tracing::error!("Failed to set up remote backend: {e}");
        panic!("failed to set up remote backend: {e}");
    });

    // Holiday header and countdown
    let target = calendar::next_occurrence(&Local::now()).unwrap_or_else(|| {
        tracing::error!("No upcoming holiday within the supported calendar");
        panic!("no upcoming holiday within the supported calendar");
    });
    let view = Arc::new(BoardView::new(calendar::format_holiday(target.date_naive())));
    tracing::info!("Counting down to {}", target);
    tokio::spawn(countdown::run(
        target.with_timezone(&Utc),
        view.clone(),
        cfg.countdown_interval,
    ));

    let controller = Arc::new(BoardController::new(backend, local, view.clone()));
    tokio::spawn({
        let controller = controller.clone();
        async move { controller.start().await }
    });

    let router = rest::router(AppState { controller, view });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Gratitude board listening on {}", addr),
        Err(e) => tracing::warn!("Listening, but the local address is unknown: {e}"),
    }

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}
