//! hostinfo - show OS name, system path and physical memory figures

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hostinfo::core::config::save_target;
use hostinfo::display::{render_memory_status, render_overview};
use hostinfo::platform;
use hostinfo::{AppConfig, HostInfo, HostQuery, RegistryLookup, RegistryRoot};

#[derive(Parser)]
#[command(name = "hostinfo")]
#[command(about = "Show OS name, system path and physical memory", long_about = None)]
struct Cli {
    /// Config file (default: per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log the cause of every failed query
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show OS name, system path and memory (default)
    Overview,

    /// Show the full memory-status snapshot
    Memory,

    /// Read one registry value
    Registry {
        /// Hive: HKCU, HKLM, HKU, HKCR or HKCC
        root: RegistryRoot,

        /// Key path below the hive
        subpath: String,

        /// Value name
        name: String,

        /// Report the failure reason instead of the placeholder
        #[arg(long)]
        strict: bool,
    },

    /// Show configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config.as_deref())?;

    // Logs go to stderr so stdout stays clean for JSON
    let default_level = if cli.verbose {
        Level::DEBUG.to_string()
    } else {
        config.log_level.clone()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let info = HostInfo::from_config(&config);
    let json = cli.json || config.json;
    debug!("Using {} backend", info.source().backend_name());

    match cli.command.unwrap_or(Commands::Overview) {
        Commands::Overview => {
            let overview = info.overview();
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                println!("{}", render_overview(&overview));
            }
        }

        Commands::Memory => match info.try_memory_status() {
            Ok(status) if json => println!("{}", serde_json::to_string_pretty(&status)?),
            Ok(status) => println!("{}", render_memory_status(&status)),
            Err(e) => {
                eprintln!("Memory status unavailable: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        },

        Commands::Registry { root, subpath, name, strict } => {
            if !platform::has_registry() {
                warn!("No configuration registry on {}", platform::platform_name());
            }
            if strict {
                let lookup = RegistryLookup::new(root, subpath, name);
                match info.try_registry_value(&lookup) {
                    Ok(value) => println!("{}", value),
                    Err(e) => {
                        eprintln!("{}: {} ({})", lookup, e, e.kind());
                        return Ok(ExitCode::FAILURE);
                    }
                }
            } else {
                println!("{}", info.registry_value(root, &subpath, &name));
            }
        }

        Commands::Config { save } => {
            println!("Current Configuration:");
            println!("{}", toml::to_string_pretty(&config)?);

            if save {
                let path = save_target(cli.config.as_deref())
                    .ok_or("no config directory on this platform")?;
                config.save(&path)?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
