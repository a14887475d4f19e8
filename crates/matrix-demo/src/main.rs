//! Random pixel demo for the Troyka LED matrix.
//!
//! Every tick turns one random pixel on and another one off, the way the
//! module's reference sketch does.
//!
//! ```text
//! matrix-demo --bus /dev/i2c-1 --address 0x60 --size 8x8
//! matrix-demo --emulate --frames 200
//! RUST_LOG=led_matrix=trace matrix-demo --emulate
//! ```

// Host binary: no embedded lint restrictions on panics or debug output.
#![allow(clippy::print_stdout, clippy::use_debug)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod emulator;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use embedded_hal::i2c::I2c;
use led_matrix::{LedMatrix, MatrixSize, Update, DEFAULT_ADDRESS};
use rand::Rng;
use tracing_subscriber::EnvFilter;

use crate::emulator::EmulatedMatrix;

#[derive(Parser)]
#[command(name = "matrix-demo")]
#[command(about = "Random pixel demo for the Troyka LED matrix", long_about = None)]
#[command(version)]
struct Cli {
    /// Linux i2c-dev device the module is wired to
    #[arg(long, default_value = "/dev/i2c-1")]
    bus: std::path::PathBuf,

    /// 7-bit I²C address (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_address, default_value = "0x60")]
    address: u8,

    /// Matrix layout
    #[arg(long, value_enum, default_value_t = SizeArg::S8x8)]
    size: SizeArg,

    /// Row current limit (0-15, masked)
    #[arg(long, default_value_t = 0)]
    current: u8,

    /// Delay between ticks in milliseconds
    #[arg(long, default_value_t = 50)]
    interval_ms: u64,

    /// Stop after this many ticks (runs forever when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Render to the terminal instead of talking to hardware
    #[arg(long)]
    emulate: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    #[value(name = "8x8")]
    S8x8,
    #[value(name = "7x9")]
    S7x9,
    #[value(name = "6x10")]
    S6x10,
    #[value(name = "5x11")]
    S5x11,
}

impl From<SizeArg> for MatrixSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::S8x8 => MatrixSize::Size8x8,
            SizeArg::S7x9 => MatrixSize::Size7x9,
            SizeArg::S6x10 => MatrixSize::Size6x10,
            SizeArg::S5x11 => MatrixSize::Size5x11,
        }
    }
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    match parsed {
        Ok(addr) if addr <= 0x7F => Ok(addr),
        Ok(addr) => Err(format!("{addr:#x} is not a 7-bit address")),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.emulate {
        tracing::info!(address = cli.address, "running against terminal emulator");
        return run(EmulatedMatrix::new(cli.address), &cli);
    }
    run_hardware(&cli)
}

#[cfg(target_os = "linux")]
fn run_hardware(cli: &Cli) -> Result<()> {
    let i2c = linux_embedded_hal::I2cdev::new(&cli.bus)
        .with_context(|| format!("Failed to open {}", cli.bus.display()))?;
    tracing::info!(bus = %cli.bus.display(), address = cli.address, "opened i2c bus");
    run(i2c, cli)
}

#[cfg(not(target_os = "linux"))]
fn run_hardware(_cli: &Cli) -> Result<()> {
    anyhow::bail!("i2c-dev is only available on Linux; use --emulate")
}

fn run<I>(i2c: I, cli: &Cli) -> Result<()>
where
    I: I2c,
    I::Error: core::fmt::Debug,
{
    let mut matrix = LedMatrix::new(i2c, cli.address, cli.size)
        .map_err(|e| anyhow!("{e}"))
        .context("Failed to initialise LED matrix")?;
    matrix
        .set_current_limit(cli.current)
        .map_err(|e| anyhow!("{e}"))
        .context("Failed to set current limit")?;
    matrix
        .clear(Update::Immediate)
        .map_err(|e| anyhow!("{e}"))
        .context("Failed to clear display")?;

    if cli.address != DEFAULT_ADDRESS {
        tracing::debug!(address = cli.address, "using non-default address");
    }

    let mut rng = rand::rng();
    let interval = Duration::from_millis(cli.interval_ms);
    let mut tick: u64 = 0;
    while cli.frames.map_or(true, |limit| tick < limit) {
        matrix
            .draw_pixel(rng.random_range(0..8), rng.random_range(0..8), Update::Immediate)
            .map_err(|e| anyhow!("{e}"))
            .context("Failed to draw pixel")?;
        matrix
            .clear_pixel(rng.random_range(0..8), rng.random_range(0..8), Update::Immediate)
            .map_err(|e| anyhow!("{e}"))
            .context("Failed to clear pixel")?;
        tick = tick.saturating_add(1);
        tracing::trace!(tick, "tick");
        std::thread::sleep(interval);
    }

    tracing::info!(ticks = tick, "done");
    Ok(())
}
