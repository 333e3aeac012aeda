use clap::Subcommand;

use crate::client::ShareItClient;
use crate::output::{self, OutputConfig};

/// Item request commands, all acting as the user given by `--user`
#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// List your own requests
    List,
    /// Page through other users' requests, oldest first
    All {
        /// Index of the first request to show
        #[clap(long, default_value_t = 0)]
        from: i64,
        /// Maximum number of requests to show
        #[clap(long, default_value_t = 10)]
        size: i64,
    },
    /// Ask for an item nobody offers yet
    Create {
        /// What you are looking for
        description: String,
    },
    /// Get a request with the items offered for it
    Get {
        /// The request ID
        id: i32,
    },
}

/// Executes an item request command
pub async fn execute(
    client: &ShareItClient,
    cmd: RequestCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        RequestCommands::List => {
            let requests = client.list_own_requests().await?;
            output::print_requests(&requests, config);
        }
        RequestCommands::All { from, size } => {
            let requests = client.list_other_requests(from, size).await?;
            output::print_requests(&requests, config);
        }
        RequestCommands::Create { description } => {
            let request = client.create_request(description).await?;
            output::print_request(&request, config);
        }
        RequestCommands::Get { id } => {
            let request = client.get_request(id).await?;
            output::print_request(&request, config);
        }
    }
    Ok(())
}
