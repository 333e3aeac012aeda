mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::ShareItClient;
use output::{OutputConfig, OutputFormat};
use shareit::config;
use std::process;

/// CLI for the ShareIt rental service
#[derive(Parser, Debug)]
#[clap(name = "shareit-cli", about = "CLI for the ShareIt rental service")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "SHAREIT_URL", global = true)]
    server_url: Option<String>,

    /// ID of the user to act as
    #[clap(short, long = "user", env = "SHAREIT_USER_ID", global = true)]
    user_id: Option<i32>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(commands::user::UserCommands),
    /// Manage and search items
    #[command(subcommand)]
    Item(commands::item::ItemCommands),
    /// Book items and handle bookings of your items
    #[command(subcommand)]
    Booking(commands::booking::BookingCommands),
    /// Ask for items nobody offers yet
    #[command(subcommand)]
    Request(commands::request::RequestCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file `server_url` > local server
/// on the configured port. A broken config file is only an error when it is
/// actually consulted.
fn resolve_server_url(cli_url: Option<String>) -> Result<String, String> {
    match cli_url {
        Some(url) => Ok(url),
        None => Ok(config::file_config(config::get_config_dir_path())?.client_url()),
    }
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is shareit running?\n  {}",
            err_string
        );
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = match resolve_server_url(cli.server_url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let client = ShareItClient::new(server_url, cli.user_id);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::User(cmd) => commands::user::execute(&client, cmd, &output_config).await,
        Commands::Item(cmd) => commands::item::execute(&client, cmd, &output_config).await,
        Commands::Booking(cmd) => commands::booking::execute(&client, cmd, &output_config).await,
        Commands::Request(cmd) => commands::request::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
