use blescan_monitor::config::ConfigLoader;
use blescan_monitor::error::AppError;
use blescan_monitor::filter::ScanFilter;
use blescan_monitor::monitor::Monitor;
use blescan_monitor::port::LinkSettings;
use blescan_monitor::reader::LineReader;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
///
/// Flags override environment variables, which override the config file.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Stream BLE advertisement reports from a scanner dongle over a serial link."
)]
struct Args {
    /// Serial port the scanner is attached to
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Read timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Device type the scanner should report
    #[arg(long)]
    device_type: Option<String>,

    /// Bluetooth address of the sensor
    #[arg(short, long)]
    address: Option<String>,

    /// Explicit path to a configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let config = loader.into_config();

    init_tracing(&config.logging.level);

    let port = args
        .port
        .clone()
        .unwrap_or_else(|| config.serial.port_or_placeholder());
    let settings = LinkSettings {
        baud_rate: args.baud.unwrap_or(config.serial.default_baud),
        timeout: args
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.serial.timeout()),
    };
    let filter = ScanFilter::new(
        args.device_type.as_deref().unwrap_or(&config.filter.device_type),
        args.address.as_deref().unwrap_or(&config.filter.address),
    )?;

    let reader = LineReader::new(config.serial.line_ending.as_bytes().to_vec())
        .with_max_line(config.serial.max_line_len);
    let mut monitor = Monitor::connect(&port, &settings, reader)?;

    let running = monitor.stop_flag();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })?;

    monitor.subscribe(&filter)?;
    info!(%filter, "subscribed; streaming reports");

    let stdout = io::stdout();
    monitor.run(&mut stdout.lock())?;

    Ok(())
}

/// Diagnostics go to stderr so stdout stays a clean line stream.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
