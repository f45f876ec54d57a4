//! evernote-path: inspect browse paths and repository settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use evernote_repository::{AdminConfig, RepositoryOptions, strings};
use node_path::{Mode, Node, build_breadcrumb, decode_path};

#[derive(Parser, Debug)]
#[command(name = "evernote-path")]
#[command(about = "Inspect Evernote repository paths and settings")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the path of a node
    Encode {
        /// Mode of the node (all, notebooks, stack, notebook, tags, searchs, note, mysearch)
        mode: String,

        /// Id of the node (guid, stack name or search text)
        #[arg(default_value = "")]
        value: String,

        /// Display name
        #[arg(long, default_value = "")]
        name: String,

        /// Path of the parent node
        #[arg(long, default_value = "")]
        parent: String,
    },

    /// Print the nodes of a path
    Decode { path: String },

    /// Print the breadcrumb of a path
    Breadcrumb { path: String },

    /// Validate the admin configuration and instance options
    ConfigCheck {
        /// Admin configuration (JSON)
        config: PathBuf,

        /// Instance options (JSON)
        #[arg(long)]
        options: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigSummary<'a> {
    api_url: &'a str,
    sandbox: bool,
    ssl_compatibility_mode: bool,
    options: &'a RepositoryOptions,
}

fn load_options(path: Option<&Path>) -> Result<RepositoryOptions> {
    let Some(path) = path else {
        debug!("No options file, using defaults");
        return Ok(RepositoryOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| "Failed to parse repository options")
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so output can be piped
    let default_filter = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Encode {
            mode,
            value,
            name,
            parent,
        } => {
            let mode = Mode::from(mode);
            if let Mode::Other(raw) = &mode {
                info!("Unknown mode '{}', encoding as is", raw);
            }
            println!("{}", Node::new(mode, value, name).encode(&parent));
        }
        Command::Decode { path } => print_json(&decode_path(&path))?,
        Command::Breadcrumb { path } => {
            print_json(&build_breadcrumb(&path, &strings::crumb_labels()))?
        }
        Command::ConfigCheck { config, options } => {
            let admin = AdminConfig::load(&config)?.with_env_overrides();
            admin
                .validate()
                .with_context(|| format!("Invalid configuration in {:?}", config))?;
            let options = load_options(options.as_deref())?;

            print_json(&ConfigSummary {
                api_url: admin.api_url(),
                sandbox: admin.use_sandbox_api,
                ssl_compatibility_mode: admin.ssl_compatibility_mode,
                options: &options,
            })?;
        }
    }

    Ok(())
}
