//! PM1006 Exporter Binary
//!
//! Reads a PM1006 sensor on a serial port and serves its readings for Prometheus.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pm1006_exporter::{
    list_ports, open_port, run_acquisition, start_web_server, AppState, DecoderConfig,
    FrameDecoder, PrometheusSink, SensorConfig, SensorError, WebConfig, DEFAULT_BAUD_RATE,
    DEFAULT_READ_TIMEOUT_MS, DEFAULT_WEB_PORT,
};
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pm1006_exporter")]
#[command(about = "PM1006 particulate sensor exporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Reads PM1.0/PM2.5/PM10 frames from a PM1006 sensor and serves them as Prometheus gauges")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Serial device the sensor is attached to (e.g. /dev/ttyUSB0)
    device: Option<String>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Serial baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Serial read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    read_timeout_ms: u64,

    /// Path the Prometheus exposition is served on
    #[arg(long, default_value = "/metrics")]
    metrics_path: String,

    /// Send permissive CORS headers
    #[arg(long)]
    cors: bool,

    /// Do not publish readings from frames with a bad checksum
    #[arg(long)]
    reject_bad_checksum: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available serial ports and exit
    Ports,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match (&cli.command, &cli.device) {
        (Some(Commands::Ports), _) => ports_command(),
        (None, Some(device)) => serve_command(&cli, device).await,
        (None, None) => {
            // No device given: show what could be used, then fail.
            ports_command()?;
            error!("{}", usage_line(std::env::args().next()));
            std::process::exit(1);
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli, directives.as_deref()))
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// CLI flags pick the level unless `RUST_LOG` carries directives of its own.
fn log_filter(cli: &Cli, directives: Option<&str>) -> EnvFilter {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

fn usage_line(program: Option<String>) -> String {
    let program = program.unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    format!("Usage: {} [serial port]", program)
}

fn ports_command() -> anyhow::Result<()> {
    match list_ports() {
        Ok(ports) => {
            for port in ports {
                info!("Found port: {} ({})", port.name, port.kind);
            }
            Ok(())
        }
        Err(SensorError::NoPortsFound) => {
            error!("No serial ports found!");
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to enumerate serial ports"),
    }
}

async fn serve_command(cli: &Cli, device: &str) -> anyhow::Result<()> {
    info!("Starting PM1006 exporter...");

    let sensor_config = SensorConfig::new(device)
        .with_baud_rate(cli.baud)
        .with_read_timeout_ms(cli.read_timeout_ms)
        .with_reject_on_checksum_failure(cli.reject_bad_checksum);

    let port = open_port(&sensor_config)?;

    let sink = Arc::new(PrometheusSink::new());
    let handle = sink.handle();
    let decoder = FrameDecoder::new(
        sink,
        DecoderConfig {
            reject_on_checksum_failure: sensor_config.reject_on_checksum_failure,
        },
    );

    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_metrics_path(&cli.metrics_path)
        .with_cors(cli.cors);
    let state = AppState::new(handle, device, &web_config.metrics_path);

    info!("Configuration:");
    info!("  - Device: {} @ {} baud", sensor_config.device, sensor_config.baud_rate);
    info!("  - Bind address: {}", web_config.bind_address());
    info!(
        "  - Reject bad checksums: {}",
        sensor_config.reject_on_checksum_failure
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut acquisition = tokio::spawn(run_acquisition(
        BufReader::new(port),
        decoder,
        shutdown_rx.clone(),
    ));
    let mut server = tokio::spawn(start_web_server(web_config, state, shutdown_rx));

    let result = tokio::select! {
        res = &mut acquisition => {
            shutdown_tx.send_replace(true);
            let _ = server.await;
            res.context("Acquisition task failed")?
                .context("Sensor stream terminated")
        }
        res = &mut server => {
            shutdown_tx.send_replace(true);
            let _ = acquisition.await;
            res.context("Web server task failed")?
                .context("Web server stopped")
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            shutdown_tx.send_replace(true);
            let _ = server.await;
            let _ = acquisition.await;
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
