use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use departure_board::board::{Board, Poller};
use departure_board::config::BoardConfig;
use departure_board::departures::mock::FileSource;
use departure_board::departures::{DeparturesClient, DeparturesSource};
use departure_board::timetable::ZonedClock;
use departure_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BoardConfig::from_env()?;

    match config.mock_file.clone() {
        Some(path) => {
            warn!(path = %path.display(), "serving departures from mock file");
            let source = FileSource::new(path)?;
            serve(config, source).await
        }
        None => {
            info!(base_url = %config.departures.base_url, "using departures service");
            let source = DeparturesClient::new(config.departures.clone())?;
            serve(config, source).await
        }
    }
}

async fn serve<S: DeparturesSource>(config: BoardConfig, source: S) -> Result<(), Box<dyn Error>> {
    let source = Arc::new(source);
    let board = Arc::new(Board::new(config.display_limit));
    let poller = Poller::start(source.clone(), board.clone(), config.poll_interval);
    let clock = ZonedClock::new(config.timezone);

    let timezone = clock.timezone();
    let state = AppState::new(board, poller, source, clock);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, %timezone, "departure board listening");
    info!("  GET  /            - Live board");
    info!("  GET  /timetable   - Static timetable");
    info!("  GET  /api/board   - Board as JSON");
    info!("  POST /retry       - Fetch departures now");
    info!("  GET  /health      - Departures service health");

    // Dropping the router on shutdown drops the poller handle, which stops polling.
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await?;

    Ok(())
}
