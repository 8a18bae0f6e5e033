#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident map server binary.
//!
//! Configuration comes from the environment (see
//! [`accident_map_server::config`]); command-line flags override it.

use std::path::PathBuf;

use accident_map_server::ServerConfig;
use clap::Parser;

#[derive(Parser)]
#[command(name = "accident_map_server", about = "Accident map web server")]
struct Cli {
    /// Prompt for the server settings before starting
    #[arg(short, long)]
    interactive: bool,
    /// Address to bind to (overrides `BIND_ADDR`)
    #[arg(long)]
    bind: Option<String>,
    /// Port to listen on (overrides `PORT`)
    #[arg(short, long)]
    port: Option<u16>,
    /// Accident CSV file (overrides `ACCIDENTS_CSV`)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Reference table TOML (overrides `REFERENCE_TABLE`)
    #[arg(long)]
    reference_table: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data) = cli.data {
        config.dataset_path = data;
    }
    if let Some(reference_table) = cli.reference_table {
        config.reference_table = Some(reference_table);
    }

    if cli.interactive {
        accident_map_server::interactive::run(config).await
    } else {
        accident_map_server::run_server(config).await
    }
}
