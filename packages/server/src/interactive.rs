//! Interactive mode for the server.
//!
//! Prompts for the bind address, port, and data file locations before
//! starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address, port, boundary archive, and incident CSV,
/// starting from the environment's values, and passes the result to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Crime Dashboard Server");
    println!();

    let defaults = ServerConfig::from_env();

    let bind_addr = prompt("Bind address", defaults.bind_addr.clone());
    let port = prompt("Port", defaults.port.to_string());
    let boundaries = prompt(
        "Boundary archive (zip)",
        defaults.boundaries_path.display().to_string(),
    );
    let incidents = prompt(
        "Heatmap incident CSV",
        defaults.incidents_path.display().to_string(),
    );

    let config = prompted_config(defaults, bind_addr, &port, boundaries, incidents);

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

/// Applies the prompted answers over `defaults`. An unparseable port keeps
/// the default.
fn prompted_config(
    defaults: ServerConfig,
    bind_addr: String,
    port: &str,
    boundaries: String,
    incidents: String,
) -> ServerConfig {
    let port = port.trim().parse().unwrap_or_else(|_| {
        log::warn!("Invalid port '{port}', using {}", defaults.port);
        defaults.port
    });

    ServerConfig {
        bind_addr,
        port,
        boundaries_path: PathBuf::from(boundaries),
        incidents_path: PathBuf::from(incidents),
        ..defaults
    }
}

fn prompt(label: &str, default: String) -> String {
    Input::new()
        .with_prompt(label)
        .default(default.clone())
        .interact_text()
        .unwrap_or(default)
}
