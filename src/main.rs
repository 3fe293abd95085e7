use std::io;
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use hostbridge::bridge::builtin::register_builtins;
use hostbridge::bridge::{ChannelRouter, Dispatcher, HostPlatform, MethodRegistry};
use hostbridge::model::config::BridgeConfig;
use hostbridge::msg::Msg;
use hostbridge::transport;

fn main() -> Result<()> {
    let config = BridgeConfig::load()?;

    // Initialize logging to file (never stdout, it carries frames)
    let log_dir = directories::ProjectDirs::from("", "", "hostbridge")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("hostbridge"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "hostbridge.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_filter));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .init();

    tracing::info!(channels = ?config.bridge.channels, "hostbridge starting");

    let mut registry = MethodRegistry::new();
    register_builtins(&mut registry)?;
    let registry = registry.seal();
    tracing::info!(methods = ?registry.method_names(), "methods available");

    let platform = Arc::new(HostPlatform::new(&config.platform));
    let router = ChannelRouter::new(
        config.bridge.channels.clone(),
        Dispatcher::new(registry, platform),
    );

    // Reader thread: stdin lines forwarded as Msg
    let (tx, rx) = mpsc::channel::<Msg>();
    transport::spawn_reader(io::BufReader::new(io::stdin()), tx);

    let served = transport::serve(&router, rx, io::stdout().lock());
    if let Err(e) = &served {
        tracing::error!("serve loop failed: {e}");
    }
    served.context("serve loop failed")?;

    tracing::info!("hostbridge stopped");
    Ok(())
}
