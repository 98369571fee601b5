//! # WiiClassic Keyboard
//!
//! Use a Wii Classic Controller on the Raspberry Pi I2C bus as a keyboard.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Load configuration and apply command-line overrides
//!    - Set up logging with tracing subscriber
//!    - Open the I2C bus and initialize the controller
//!    - Create the uinput virtual keyboard
//!
//! 2. **Main Loop**
//!    - Run one poll cycle every `poll_interval_us`
//!    - The first `warmup_cycles` reads are discarded
//!    - A failed read is fatal
//!
//! 3. **Shutdown**
//!    - ZL + Select: keyboard is destroyed and the machine is halted
//!    - Ctrl+C: held keys are released and the process exits
//!
//! # Examples
//!
//! ```bash
//! sudo wiiclassic-keyboard --config /etc/wiiclassic-keyboard.toml --verbose
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wiiclassic_keyboard::bus::WiiClassicI2c;
use wiiclassic_keyboard::config::{Config, LoggingConfig};
use wiiclassic_keyboard::engine::{CycleOutcome, EngineOptions, PollEngine};
use wiiclassic_keyboard::output::{ShellSystemControl, VirtualKeyboard};

/// Number of poll cycles between status log messages
const LOG_INTERVAL_CYCLES: u64 = 10_000;

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "wiiclassic-keyboard.log";

#[derive(Debug, Parser)]
#[command(name = "wiiclassic-keyboard")]
#[command(version, about = "Wii Classic Controller (I2C) to virtual keyboard bridge")]
struct Cli {
    /// Configuration file (TOML). Built-in defaults are used when omitted.
    #[arg(short, long, env = "WIICLASSIC_CONFIG")]
    config: Option<PathBuf>,

    /// Log every raw packet and decoded controller state
    #[arg(short, long)]
    verbose: bool,

    /// Number of startup reads to discard
    #[arg(long)]
    warmup_cycles: Option<u32>,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if self.verbose {
            config.input.verbose = true;
        }
        if let Some(cycles) = self.warmup_cycles {
            config.input.warmup_cycles = cycles;
        }
        Ok(config)
    }
}

/// Set up stdout logging, plus a daily-rolling file when `log_dir` is set.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must be kept alive so buffered file output is flushed on exit.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    let _log_guard = init_logging(&config.logging);

    info!("WiiClassic keyboard v{} starting...", env!("CARGO_PKG_VERSION"));

    let source = WiiClassicI2c::open(&config.i2c).context("Failed to set up the controller")?;
    let sink = VirtualKeyboard::create(&config.input.device_name)
        .context("Failed to create the virtual keyboard")?;
    let system = ShellSystemControl::new(config.volume.clone(), config.shutdown.clone());

    let options = EngineOptions {
        warmup_cycles: config.input.warmup_cycles,
        verbose: config.input.verbose,
    };
    let mut engine = PollEngine::new(source, sink, system, options);

    let mut poll_interval = interval(Duration::from_micros(config.i2c.poll_interval_us));
    poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(
        "Polling every {}us, discarding first {} reads",
        config.i2c.poll_interval_us, options.warmup_cycles
    );
    info!("Press ZL + Select to halt, Ctrl+C to exit");

    let mut cycles: u64 = 0;

    // Main poll loop. A poll cycle blocks this thread for the bus delays
    // (seven of them, each at most 100ms by config validation), so Ctrl+C
    // is observed between cycles.
    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                match engine.poll_once() {
                    Ok(CycleOutcome::Terminated) => {
                        info!("Shutdown combo handled, stopping");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Controller read failed: {}", e);
                        if let Err(e) = engine.release_all() {
                            warn!("Failed to release keys: {}", e);
                        }
                        return Err(e).context("Lost the controller");
                    }
                }

                cycles += 1;
                if cycles % LOG_INTERVAL_CYCLES == 0 {
                    debug!("Polled {} cycles (volume step {})", cycles, engine.volume_step());
                }
            }

            _ = &mut ctrl_c => {
                info!("Received Ctrl+C, shutting down...");
                if let Err(e) = engine.release_all() {
                    warn!("Failed to release keys: {}", e);
                }
                break;
            }
        }
    }

    info!("Total poll cycles: {}", cycles);
    Ok(())
}
