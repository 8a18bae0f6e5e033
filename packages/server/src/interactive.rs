//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port and dataset path before
//! starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the value already in `config`; the answers are
/// written back into it before delegating to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: ServerConfig) -> std::io::Result<()> {
    println!("Accident Map Server");
    println!();

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| config.bind_addr.clone());

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    let dataset: String = Input::new()
        .with_prompt("Accident CSV")
        .default(config.dataset_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| config.dataset_path.display().to_string());
    config.dataset_path = PathBuf::from(dataset);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.bind_addr, config.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
