use clap::Subcommand;
use shareit::dto::UpdateItemDto;

use crate::client::ShareItClient;
use crate::output::{self, OutputConfig};

/// Item management commands
///
/// Everything except `search` acts as the user given by `--user`.
#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List your items with their bookings and comments
    List,
    /// List a new item
    Create {
        /// The item name
        #[clap(long)]
        name: String,
        /// The item description
        #[clap(long)]
        description: String,
        /// List the item as unavailable
        #[clap(long)]
        unavailable: bool,
        /// The item request this item answers
        #[clap(long)]
        request_id: Option<i32>,
    },
    /// Get a specific item by ID
    Get {
        /// The item ID
        id: i32,
    },
    /// Search available items by name or description
    Search {
        /// Text to look for, case-insensitively
        text: String,
    },
    /// Update one of your items
    Update {
        /// The item ID
        id: i32,
        /// New name
        #[clap(long)]
        name: Option<String>,
        /// New description
        #[clap(long)]
        description: Option<String>,
        /// Whether the item can be booked
        #[clap(long)]
        available: Option<bool>,
    },
    /// Delete one of your items
    Delete {
        /// The item ID
        id: i32,
    },
    /// Comment on an item you have rented
    Comment {
        /// The item ID
        id: i32,
        /// The comment text
        text: String,
    },
}

/// Executes an item command
pub async fn execute(
    client: &ShareItClient,
    cmd: ItemCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ItemCommands::List => {
            let items = client.list_items().await?;
            output::print_item_details_list(&items, config);
        }
        ItemCommands::Create {
            name,
            description,
            unavailable,
            request_id,
        } => {
            let item = client
                .create_item(name, description, !unavailable, request_id)
                .await?;
            output::print_item(&item, config);
        }
        ItemCommands::Get { id } => {
            let item = client.get_item(id).await?;
            output::print_item_details(&item, config);
        }
        ItemCommands::Search { text } => {
            let items = client.search_items(&text).await?;
            output::print_items(&items, config);
        }
        ItemCommands::Update {
            id,
            name,
            description,
            available,
        } => {
            let update = UpdateItemDto { name, description, available };
            let item = client.update_item(id, update).await?;
            output::print_item(&item, config);
        }
        ItemCommands::Delete { id } => {
            client.delete_item(id).await?;
            output::print_success(&format!("Deleted item {}", id), config);
        }
        ItemCommands::Comment { id, text } => {
            let comment = client.add_comment(id, text).await?;
            output::print_comment(&comment, config);
        }
    }
    Ok(())
}
