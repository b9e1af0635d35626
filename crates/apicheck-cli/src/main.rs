//! apicheck CLI - Data-driven HTTP API integration-test runner

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apicheck_core::{Config, DEFAULT_SUITE_WORKERS, DEFAULT_TARGETED_WORKERS, RunSummary};
use apicheck_runner::{HttpExecutor, Scheduler, store, wait_until_healthy};

#[derive(Parser)]
#[command(name = "apicheck")]
#[command(about = "Validate a running HTTP API against declarative test fixtures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: .apicheck.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fixtures against the service
    Run {
        /// Glob pattern for a targeted run (default: full suite from config)
        pattern: Option<String>,

        /// Service base URL (overrides config)
        #[arg(short, long)]
        base_url: Option<String>,

        /// Worker pool size (default: 10 full suite, 3 targeted)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Skip the health-check gate before the full suite
        #[arg(long)]
        skip_health_check: bool,
    },

    /// List discovered fixtures and their step counts
    List {
        /// Glob pattern (default: from config)
        pattern: Option<String>,
    },

    /// Initialize config file
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let cfg = if let Some(path) = path {
        Config::load(std::path::Path::new(path))?
    } else {
        Config::load_default()?
    };
    Ok(cfg)
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            pattern,
            base_url,
            workers,
            skip_health_check,
        } => {
            let cfg = load_config(cli.config.as_deref())?;
            let base_url = base_url.unwrap_or_else(|| cfg.base_url.clone());

            let targeted = pattern.is_some();
            let pattern = pattern.unwrap_or_else(|| cfg.fixtures.clone());
            let workers = workers.or(cfg.workers).unwrap_or(if targeted {
                DEFAULT_TARGETED_WORKERS
            } else {
                DEFAULT_SUITE_WORKERS
            });

            // The full suite waits for the service; a targeted run is
            // assumed to be against a service already known to be up.
            if !targeted && !skip_health_check {
                wait_until_healthy(
                    &base_url,
                    &cfg.health_path,
                    Duration::from_secs(cfg.health_timeout_secs),
                    Duration::from_secs(1),
                )?;
            }

            let executor = HttpExecutor::new(
                base_url.clone(),
                cfg.headers.clone(),
                cfg.request_timeout_secs.map(Duration::from_secs),
            )?;

            let summary = Scheduler::new(workers).run_all(&pattern, &executor)?;
            print_summary(&summary, &pattern);
            Ok(summary.exit_code())
        }

        Commands::List { pattern } => {
            let cfg = load_config(cli.config.as_deref())?;
            let pattern = pattern.unwrap_or_else(|| cfg.fixtures.clone());

            let mut total = 0usize;
            let mut broken = 0usize;
            for (path, parsed) in store::load(&pattern)? {
                total += 1;
                match parsed {
                    Ok(fixture) => {
                        let steps = fixture.len();
                        let noun = if steps == 1 { "step" } else { "steps" };
                        println!("  {} ({steps} {noun})", path.display());
                    }
                    Err(e) => {
                        broken += 1;
                        println!("  {} (PARSE ERROR: {e})", path.display());
                    }
                }
            }
            println!("\n{total} fixtures ({broken} broken)");
            Ok(if broken > 0 { 1 } else { 0 })
        }

        Commands::Init => {
            let config_path = ".apicheck.toml";
            if std::path::Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - base_url: service under test");
            println!("  - fixtures: glob pattern for fixture discovery");
            println!("  - headers: auth tokens, API keys");
            Ok(0)
        }
    }
}

fn print_summary(summary: &RunSummary, pattern: &str) {
    if summary.total == 0 {
        eprintln!("Error: no fixtures matched '{pattern}'.");
        return;
    }

    let icon = if summary.all_passed() { "PASS" } else { "FAIL" };
    println!(
        "\n{icon}: {} fixtures, {} passed, {} failed",
        summary.total,
        summary.passed,
        summary.failed()
    );

    if !summary.load_errors.is_empty() {
        println!("\nBroken fixtures ({}):", summary.load_errors.len());
        for err in &summary.load_errors {
            println!("  {}: {}", err.path, err.message);
        }
    }

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() {
        println!("\nFailures ({}):", failures.len());
        for outcome in failures {
            let Err(failure) = &outcome.result else {
                continue;
            };
            println!("  {}", outcome.fixture);
            println!("    step {} ({}): {}", failure.index, failure.url, failure.error);
            if let Some(description) = &failure.description {
                println!("    description: {description}");
            }
            if let Some(body) = &failure.response_body {
                println!("    response: {body}");
            }
        }
    }
}
