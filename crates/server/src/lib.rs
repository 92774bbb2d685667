//! # crashplan-server
//!
//! The HTTP intake surface for the accident investigation planner. It plays
//! the role of the original single-page form: collect one case record per
//! submission, drive the plan generator, and hand the structured plan (and
//! the plain-text question export) back to the operator.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

use config::Config;
use router::create_router;
use state::build_app_state;
use tracing::info;

/// The main entry point for running the server.
pub async fn run(listener: tokio::net::TcpListener, config: Config) -> anyhow::Result<()> {
    let app_state = build_app_state(config)?;
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
