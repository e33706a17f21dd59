use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for parallax-scene")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and tests, then replay the demo script
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests (includes WGSL validation)
    Test,
    /// Run the particle emitter benchmark
    Bench,
    /// Validate the demo config and replay the demo input script headlessly
    Demo,
}

const DEMO_CONFIG: &str = "demos/scene.yaml";
const DEMO_SCRIPT: &str = "demos/hover.yaml";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            demo()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => bench()?,
        Commands::Demo => demo()?,
    }

    Ok(())
}

/// Run `cargo <args>`, failing with `what` if it exits non-zero.
fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> {what}: cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn bench() -> Result<()> {
    cargo(
        "bench",
        &["bench", "-p", "parallax-particles", "--bench", "bench_particles"],
    )
}

fn demo() -> Result<()> {
    cargo(
        "validate demo config",
        &[
            "run",
            "-q",
            "-p",
            "parallax-cli",
            "--",
            "validate-config",
            DEMO_CONFIG,
        ],
    )?;
    cargo(
        "replay demo script",
        &[
            "run",
            "-q",
            "-p",
            "parallax-cli",
            "--",
            "simulate",
            "--ticks",
            "120",
            "--config",
            DEMO_CONFIG,
            "--script",
            DEMO_SCRIPT,
        ],
    )
}
