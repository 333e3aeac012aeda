use clap::Subcommand;

use crate::client::ShareItClient;
use crate::output::{self, OutputConfig};

/// User management commands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List all users
    List,
    /// Register a new user
    Create {
        /// Display name
        #[clap(long)]
        name: String,
        /// Email address, unique across users
        #[clap(long)]
        email: String,
    },
    /// Get a specific user by ID
    Get {
        /// The user ID
        id: i32,
    },
    /// Update a user's name or email
    Update {
        /// The user ID
        id: i32,
        /// New name
        #[clap(long)]
        name: Option<String>,
        /// New email address
        #[clap(long)]
        email: Option<String>,
    },
    /// Delete a user along with everything they own
    Delete {
        /// The user ID
        id: i32,
    },
}

/// Executes a user command
pub async fn execute(
    client: &ShareItClient,
    cmd: UserCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        UserCommands::List => {
            let users = client.list_users().await?;
            output::print_users(&users, config);
        }
        UserCommands::Create { name, email } => {
            let user = client.create_user(name, email).await?;
            output::print_user(&user, config);
        }
        UserCommands::Get { id } => {
            let user = client.get_user(id).await?;
            output::print_user(&user, config);
        }
        UserCommands::Update { id, name, email } => {
            let user = client.update_user(id, name, email).await?;
            output::print_user(&user, config);
        }
        UserCommands::Delete { id } => {
            let user = client.delete_user(id).await?;
            output::print_success(&format!("Deleted user {} ({})", user.get_id(), user.get_email()), config);
        }
    }
    Ok(())
}
