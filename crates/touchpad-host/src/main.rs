//! Touchpad Bridge host entry point.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() + CLI overrides
//!  └─ open_event_source()        -- stdin / file / relay command
//!  └─ open_pointer_device()      -- uinput / SendInput / dry-run
//!  └─ spawn_line_reader()        -- lines -> engine queue
//!  └─ spawn_foreground_watcher() -- optional focus probe
//!  └─ Engine::run()              -- until ctrl-c, SIGTERM, or end of stream
//! ```
//!
//! The event source is opened before the virtual device, so a bad source
//! never leaves a stray device registered with the OS.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use touchpad_core::{EventLineParser, GestureTracker};
use touchpad_host::application::{
    context::SharedContext, emit_pointer::PointerEmitter, run_engine::Engine,
};
use touchpad_host::infrastructure::{
    event_source::{open_event_source, spawn_line_reader, EventSource},
    foreground::spawn_foreground_watcher,
    pointer_device::open_pointer_device,
    storage::config::{config_file_path, load_config, save_config, AppConfig, DeviceBackend},
};

/// Turns a phone's touchscreen event stream into a virtual touchpad.
#[derive(Debug, Parser)]
#[command(name = "touchpad-host", version, about)]
struct Args {
    /// Config file to use instead of the platform default.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log pointer actions instead of injecting them.
    #[arg(long)]
    dry_run: bool,

    /// Read event lines from this file instead of stdin or the relay command.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.app.log_level);

    if args.init_config {
        let path = match args.config {
            Some(path) => path,
            None => config_file_path()?,
        };
        save_config(&config, &path)?;
        info!("configuration written to {}", path.display());
        return Ok(());
    }

    if args.dry_run {
        config.device.backend = DeviceBackend::DryRun;
    }
    if let Some(input) = args.input {
        config.source.path = Some(input);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let result = runtime.block_on(run(config));
    // A blocked stdin read would otherwise hold the runtime open.
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Touchpad Bridge host starting");
    let context = SharedContext::new();

    let EventSource {
        reader,
        child,
        description,
    } = open_event_source(&config.source).await?;
    info!("reading events from {description}");

    let device = open_pointer_device(&config.device).context("creating virtual pointer")?;

    let parser = match &config.source.device_filter {
        Some(filter) => EventLineParser::with_device_filter(filter.clone()),
        None => EventLineParser::new(),
    };
    let engine = Engine::new(
        parser,
        GestureTracker::new(config.gesture.clone()),
        PointerEmitter::new(device),
        Arc::clone(&context),
    );

    let reader_task = spawn_line_reader(reader, engine.sender(), Arc::clone(&context));
    let watcher_task = spawn_foreground_watcher(config.foreground.clone(), Arc::clone(&context));

    // The engine logs its own counters when it stops.
    engine.run(shutdown_signal()).await;

    reader_task.abort();
    if let Some(task) = watcher_task {
        task.abort();
    }
    drop(child);

    info!("Touchpad Bridge host stopped");
    Ok(())
}

/// Resolves on ctrl-c, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("ctrl-c handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("shutdown signal received"),
        () = terminate => info!("terminate signal received"),
    }
}
