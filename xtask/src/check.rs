use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Embedded target the driver must keep building for.
const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

/// A `cargo` invocation whose failure aborts the whole check.
struct Step {
    label: &'static str,
    args: &'static [&'static str],
}

const REQUIRED: &[Step] = &[
    Step {
        label: "driver (no_std)",
        args: &["check", "-p", "led-matrix", "--target", EMBEDDED_TARGET],
    },
    Step {
        label: "driver (no_std + defmt)",
        args: &[
            "check",
            "-p",
            "led-matrix",
            "--target",
            EMBEDDED_TARGET,
            "--features",
            "defmt",
        ],
    },
    Step {
        label: "driver (host + tracing)",
        args: &["check", "-p", "led-matrix", "--features", "std,tracing"],
    },
    Step {
        label: "demo binary",
        args: &["check", "-p", "matrix-demo"],
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking LED matrix builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in REQUIRED {
        println!("{}", format!("  Checking {}...", step.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(step.args)
            .output()
            .with_context(|| format!("Failed to check {}", step.label))?;

        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} check failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} check failed", step.label);
        }

        println!(
            "{}",
            format!(
                "  ✓ {} passed in {:.2}s",
                step.label,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
    }

    // Lints are advisory: report, but don't fail the run.
    println!("{}", "  Running clippy lints...".cyan());
    let clippy_start = Instant::now();

    let clippy_output = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()
        .context("Failed to run clippy")?;

    if clippy_output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ Clippy passed in {:.2}s",
                clippy_start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&clippy_output.stderr));
    }
    println!();

    println!("{}", "  Checking code formatting...".cyan());

    let fmt_output = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;

    if fmt_output.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
