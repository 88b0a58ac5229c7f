// Entry point for the `runner-fleet` command-line tool.
//
// Reads provider settings from the environment, applies command-line
// overrides, connects, and runs one inspection or maintenance command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fleet_common::{ProviderSettings, SecretMasker, TraceEventType, TraceManager, TraceSetting};
use fleet_reconciler::FleetClient;
use fleet_sdk::FleetPackage;
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "runner-fleet", version, about = "Inspect and maintain a self-hosted runner fleet")]
struct Args {
    /// Organization that owns the runners.
    #[arg(long)]
    org: Option<String>,

    /// API base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Static token.
    #[arg(long)]
    token: Option<String>,

    /// App id for app authentication.
    #[arg(long)]
    app_id: Option<u64>,

    /// Installation id for app authentication.
    #[arg(long)]
    installation_id: Option<u64>,

    /// Path to the app private key PEM file.
    #[arg(long)]
    pem_path: Option<std::path::PathBuf>,

    /// Skip TLS certificate verification.
    #[arg(long)]
    insecure: bool,

    /// Include per-call diagnostics in the log output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List runner groups.
    Groups,
    /// List runners, optionally in one group.
    Runners {
        #[arg(long)]
        group: Option<u64>,
    },
    /// List downloadable runner applications.
    Downloads,
    /// Create a registration token.
    RegistrationToken,
    /// Create a removal token.
    RemoveToken,
    /// Delete an offline runner.
    DeleteRunner { runner_id: u64 },
}

fn main() {
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to build Tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let exit_code = runtime.block_on(async move {
        match run(args).await {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!("runner-fleet failed: {:#}", e);
                1
            }
        }
    });

    std::process::exit(exit_code);
}

async fn run(args: Args) -> Result<()> {
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting", FleetPackage::user_agent());

    let settings = settings_from(&args)?;
    let trace_manager = TraceManager::with_setting(
        Arc::new(SecretMasker::new()),
        TraceSetting {
            level: if args.verbose {
                TraceEventType::Verbose
            } else {
                TraceEventType::Information
            },
        },
    );
    let client = FleetClient::connect(&settings, trace_manager)
        .await
        .context("failed to connect")?;

    match args.command {
        Command::Groups => {
            let groups = client.runner_groups().list().await.context("failed to list runner groups")?;
            print_json(&groups)
        }
        Command::Runners { group } => {
            let runners = client.runners().list(group).await.context("failed to list runners")?;
            print_json(&runners)
        }
        Command::Downloads => {
            let apps = client
                .org()
                .runner_applications()
                .await
                .context("failed to list runner applications")?;
            print_json(&apps)
        }
        Command::RegistrationToken => {
            let token = client
                .org()
                .registration_token()
                .await
                .context("failed to create registration token")?;
            println!("{}", token.token);
            Ok(())
        }
        Command::RemoveToken => {
            let token = client.org().remove_token().await.context("failed to create removal token")?;
            println!("{}", token.token);
            Ok(())
        }
        Command::DeleteRunner { runner_id } => {
            client
                .runners()
                .delete(runner_id)
                .await
                .with_context(|| format!("failed to delete runner {runner_id}"))?;
            tracing::info!("Runner {} deleted", runner_id);
            Ok(())
        }
    }
}

/// Environment settings with command-line values taking precedence.
fn settings_from(args: &Args) -> Result<ProviderSettings> {
    let mut settings = ProviderSettings::from_env().context("invalid environment settings")?;

    if let Some(org) = &args.org {
        settings.organization = org.clone();
    }
    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(token) = &args.token {
        settings.token = Some(token.clone());
    }
    if let Some(app_id) = args.app_id {
        settings.app_auth.app_id = Some(app_id);
    }
    if let Some(installation_id) = args.installation_id {
        settings.app_auth.installation_id = Some(installation_id);
    }
    if let Some(path) = &args.pem_path {
        let pem = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read private key from {}", path.display()))?;
        settings.app_auth.pem = Some(pem);
    }
    if args.insecure {
        settings.insecure = true;
    }

    Ok(settings)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
