use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;

use clusterdeck::config::Config;
use clusterdeck::discovery::{self, Deps};
use clusterdeck::model::login_command;

#[derive(Parser)]
#[command(name = "clusterdeck")]
#[command(about = "Operator console for ephemeral test clusters", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to ~/.config/clusterdeck/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover all clusters and print their status
    Clusters {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe one cluster and print its details
    Info {
        name: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the kubeadmin password for a cluster
    Password { name: String },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let deps = Arc::new(Deps::production(config));

    match cli.command {
        None => clusterdeck::tui::run(deps),
        Some(Commands::Clusters { json }) => clusters(&deps, json),
        Some(Commands::Info { name, json }) => info(&deps, &name, json),
        Some(Commands::Password { name }) => {
            let password = deps.credentials.password(&name)?;
            println!("{}", password);
            Ok(())
        }
    }
}

fn clusters(deps: &Arc<Deps>, json: bool) -> Result<()> {
    let names = deps.registry.list_candidates()?;
    let outcome = discovery::run_batch(deps, &names, deps.config.deadline());

    if json {
        let rows: Vec<_> = outcome
            .records
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "status": r.status.label(),
                    "accessible": r.accessible,
                    "ocp_version": r.ocp_version,
                    "mtv_version": r.mtv_version,
                    "cnv_version": r.cnv_version,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for record in &outcome.records {
        println!(
            "{:<24} {:<8} ocp={:<10} mtv={:<14} cnv={}",
            record.name,
            record.status.label(),
            record.ocp_version,
            record.mtv_version,
            record.cnv_version
        );
    }
    Ok(())
}

fn info(deps: &Arc<Deps>, name: &str, json: bool) -> Result<()> {
    let outcome = discovery::run_single(deps, name);
    let Some(detail) = outcome.detail else {
        anyhow::bail!(
            "{}",
            outcome
                .error
                .unwrap_or_else(|| format!("{} is not accessible", name))
        );
    };
    // A password read failure downgrades to a warning; the probe succeeded.
    if let Some(err) = &outcome.error {
        eprintln!("warning: {}", err);
    }
    let password = outcome.credential.map(|c| c.password);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "name": detail.name,
                "ocp_version": detail.ocp_version,
                "mtv_version": detail.mtv_version,
                "cnv_version": detail.cnv_version,
                "bundle": detail.bundle,
                "console_url": detail.console_url,
                "password": password,
            }))?
        );
        return Ok(());
    }

    println!("Name:        {}", detail.name);
    println!("OCP version: {}", detail.ocp_version);
    println!("MTV version: {}", detail.mtv_display());
    println!("CNV version: {}", detail.cnv_version);
    println!("Console URL: {}", detail.console_url);
    if let Some(password) = password {
        println!("Password:    {}", password);
        println!(
            "Login:       {}",
            login_command(&deps.config.api_url(&detail.name), &password)
        );
    }
    Ok(())
}
