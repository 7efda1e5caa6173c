#[macro_use]
extern crate tracing;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cipherbench::crypto::{self, Provider};
use cipherbench::{BenchConfig, CipherSuite, ProviderReport};

/// Measure symmetric cipher throughput across crypto providers.
#[derive(Parser, Debug)]
#[command(name = "cipherbench", version)]
struct Cli {
    /// Only run this provider. Repeatable.
    #[arg(long = "provider", value_name = "NAME")]
    providers: Vec<String>,

    /// Message size in bytes. Repeatable. Defaults to 64, 512 and 1024.
    #[arg(long = "size", value_name = "BYTES")]
    sizes: Vec<usize>,

    /// Fixed iteration count for every size.
    #[arg(long, conflicts_with = "budget")]
    iterations: Option<u64>,

    /// Byte budget per size, iterations = budget / size.
    #[arg(long, value_name = "BYTES")]
    budget: Option<u64>,

    /// Only run this cipher suite, e.g. AES-256-GCM. Repeatable.
    #[arg(long = "suite", value_name = "NAME")]
    suites: Vec<String>,

    /// Log progress every N seconds.
    #[arg(long, value_name = "SECS")]
    progress: Option<u64>,

    /// Print one JSON object per provider run instead of text lines.
    #[arg(long)]
    json: bool,

    /// List providers and their cipher suites, then exit.
    #[arg(long)]
    list: bool,
}

fn init_log() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cipherbench=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_log();
    let cli = Cli::parse();
    debug!("cli: {:?}", cli);

    let providers = select_providers(&cli.providers)?;

    if cli.list {
        for p in &providers {
            let suites: Vec<_> = p.cipher_suites().iter().map(|s| s.name()).collect();
            println!("{}: {}", p.name(), suites.join(", "));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let bench = config_from(&cli)?.build().context("invalid benchmark config")?;

    let json = cli.json;
    let report = bench.run_each(&providers, |r| print_report(r, json));

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn select_providers(names: &[String]) -> anyhow::Result<Vec<&'static dyn Provider>> {
    let all = crypto::providers_from_feature_flags();
    if all.is_empty() {
        bail!("No crypto provider compiled in. Enable one of: openssl, rust-crypto, aws-lc-rs");
    }

    if names.is_empty() {
        return Ok(all);
    }

    names
        .iter()
        .map(|n| crypto::provider_by_name(n).with_context(|| format!("unknown provider: {}", n)))
        .collect()
}

fn config_from(cli: &Cli) -> anyhow::Result<BenchConfig> {
    let mut config = BenchConfig::new();

    if !cli.sizes.is_empty() {
        config = config.set_message_sizes(&cli.sizes);
    }
    if let Some(n) = cli.iterations {
        config = config.set_iterations(n);
    }
    if let Some(b) = cli.budget {
        config = config.set_iteration_budget(b);
    }
    if let Some(secs) = cli.progress {
        config = config.set_progress_interval(Some(Duration::from_secs(secs)));
    }
    if !cli.suites.is_empty() {
        let suites = cli
            .suites
            .iter()
            .map(|s| s.parse::<CipherSuite>())
            .collect::<Result<Vec<_>, _>>()?;
        config = config.set_suites(Some(&suites));
    }

    Ok(config)
}

fn print_report(report: &ProviderReport, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize report: {}", e),
        }
    } else if !report.is_empty() {
        println!("{}", report);
    }
}
