mod console;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{info, warn};

use snake_gait::{doctor as gait_doctor, gait_feed, GaitLibrary};
use snake_master::port::{list_ports, open_serial};
use snake_master::{Controller, DeviceSession, LinkConfig, LoopReport};
use snake_proto::{encode_legacy_command, CommandKind};

use console::Flow;

#[derive(Debug, Parser)]
#[command(name = "snake", version, about = "Snake robot gait controller")]
struct Cli {
    #[arg(long, default_value = "snake.toml")]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check config and gait library without touching the robot.
    Doctor,
    /// List the gaits in the library.
    Gaits,
    /// List serial ports visible to this host.
    Ports,
    /// Encode a text command (id:R|S:amp:freq:phase, joined by &) and print the frame.
    Encode { command: String },
    /// Wait for the master to report its slaves.
    Discover,
    /// Drive the robot; reads operator commands from stdin.
    Run {
        #[arg(long)]
        gait: Option<String>,
        #[arg(long)]
        speed: Option<f64>,
        /// Start in absolute mode (Individual Control only).
        #[arg(long)]
        absolute: bool,
    },
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    #[serde(default)]
    link: LinkConfig,
    gaits: GaitsCfg,
}

#[derive(Debug, serde::Deserialize)]
struct GaitsCfg {
    path: String,
    default: Option<String>,
    speed: Option<f64>,
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path))?;
    toml::from_str(&s).context("parse config toml")
}

/// Gait file paths are relative to the config file.
fn gait_path(config_path: &str, cfg: &Config) -> PathBuf {
    let p = Path::new(&cfg.gaits.path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    Path::new(config_path).parent().unwrap_or(Path::new("")).join(p)
}

fn load_library(config_path: &str, cfg: &Config) -> Result<GaitLibrary> {
    let path = gait_path(config_path, cfg);
    GaitLibrary::load(&path).with_context(|| format!("load gait library {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Encode { command } => encode(&command),
        Command::Ports => ports(),
        Command::Doctor => doctor(&cli.config),
        Command::Gaits => gaits(&cli.config),
        Command::Discover => discover(&cli.config).await,
        Command::Run { gait, speed, absolute } => run(&cli.config, gait, speed, absolute).await,
    }
}

fn encode(command: &str) -> Result<()> {
    let frame = encode_legacy_command(command).context("encode command")?;
    println!("{}", hex::encode(&frame));
    Ok(())
}

fn ports() -> Result<()> {
    for p in list_ports()? {
        println!("{} {}", p.name, p.description);
    }
    Ok(())
}

fn doctor(config_path: &str) -> Result<()> {
    info!("doctor: starting");
    let cfg = load_config(config_path)?;

    let dev = cfg.link.serial_dev()?;
    anyhow::ensure!(cfg.link.baud() > 0, "link.baud invalid");
    anyhow::ensure!(!cfg.link.discovery_timeout().is_zero(), "link.discovery_timeout_ms must be > 0");
    info!("doctor: master link {} @ {}", dev, cfg.link.baud());

    let lib = load_library(config_path, &cfg)?;
    for w in gait_doctor::check_library(&lib) {
        warn!("doctor: {}", w);
    }
    if let Some(id) = &cfg.gaits.default {
        lib.get(id).context("gaits.default")?;
    }
    if let Some(speed) = cfg.gaits.speed {
        gait_doctor::check_speed(speed)?;
    }

    info!("doctor: OK");
    Ok(())
}

fn gaits(config_path: &str) -> Result<()> {
    let cfg = load_config(config_path)?;
    let lib = load_library(config_path, &cfg)?;
    for id in lib.ids() {
        println!("{}", id);
    }
    Ok(())
}

async fn discover(config_path: &str) -> Result<()> {
    let cfg = load_config(config_path)?;
    let dev = cfg.link.serial_dev()?;
    let port = open_serial(&dev, cfg.link.baud(), cfg.link.read_timeout())?;
    let timeout = cfg.link.discovery_timeout();

    let session = tokio::task::spawn_blocking(move || DeviceSession::discover(port, timeout))
        .await
        .context("discovery task")??;
    println!("SLAVES: {}", session.slave_count());
    Ok(())
}

async fn run(config_path: &str, gait: Option<String>, speed: Option<f64>, absolute: bool) -> Result<()> {
    info!("run: starting");
    let cfg = load_config(config_path)?;
    let lib = load_library(config_path, &cfg)?;

    let (mut writer, reader) = gait_feed();
    writer.set_speed(speed.or(cfg.gaits.speed).unwrap_or(1.0))?;
    if let Some(id) = gait.or_else(|| cfg.gaits.default.clone()) {
        writer.select(lib.get(&id)?);
    }
    if absolute {
        writer.set_kind(CommandKind::Absolute)?;
    }

    let dev = cfg.link.serial_dev()?;
    let port = open_serial(&dev, cfg.link.baud(), cfg.link.read_timeout())?;
    let timeout = cfg.link.discovery_timeout();

    // Serial I/O blocks; the loop gets its own thread.
    let mut worker = tokio::task::spawn_blocking(move || Controller::new(port, reader, timeout).run());

    // Stdin gets a plain thread too so a pending read never holds up shutdown.
    let (tx_line, mut rx_line) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx_line.blocking_send(line).is_err() {
                break;
            }
        }
    });
    println!("{}", console::HELP);

    loop {
        tokio::select! {
            // only ends early on discovery or write failure
            res = &mut worker => {
                let report = res.context("control loop task")??;
                print_report(&report);
                return Ok(());
            }
            line = rx_line.recv() => {
                let Some(line) = line else { break };
                match console::parse_line(&line) {
                    Ok(Some(cmd)) => {
                        if console::apply(cmd, &mut writer, &lib) == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("console: {:#}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // closing the feed is what stops the loop
    drop(writer);
    let report = worker.await.context("control loop task")??;
    print_report(&report);
    Ok(())
}

fn print_report(report: &LoopReport) {
    println!(
        "slaves={} iterations={} sent={} dropped={} bytes={}",
        report.slave_count,
        report.iterations,
        report.stats.frames_sent,
        report.stats.frames_dropped,
        report.stats.bytes_written
    );
    if let Some(reason) = &report.stats.last_drop {
        println!("last drop: {}", reason);
    }
}
