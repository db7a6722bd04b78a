use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod config;
mod dbus_interface;
mod engine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("vcamd starting");

    let config = config::Config::from_env();
    let mut board = vcam_hw::resolve_board(&config.board)
        .with_context(|| format!("loading board profile {}", config.board))?;
    if let Some(adapter) = config.i2c_adapter {
        board.sensor.adapter = adapter;
    }

    let engine = engine::spawn_engine(board, config.device_config(), config.auto_init)
        .context("starting camera engine")?;

    let service = dbus_interface::VcamService { engine };
    let _conn = zbus::connection::Builder::system()?
        .name("org.freedesktop.Vcam1")?
        .serve_at("/org/freedesktop/Vcam1", service)?
        .build()
        .await
        .context("registering on the system bus")?;

    tracing::info!("vcamd ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("vcamd shutting down");

    Ok(())
}
