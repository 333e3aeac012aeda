use chrono::NaiveDateTime;
use clap::Subcommand;
use shareit::dto::BookingState;

use crate::client::ShareItClient;
use crate::output::{self, OutputConfig};

/// Booking commands, all acting as the user given by `--user`
#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// List bookings you made
    List {
        /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED
        #[clap(long, default_value = "ALL")]
        state: BookingState,
    },
    /// List bookings of items you own
    Owner {
        /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED
        #[clap(long, default_value = "ALL")]
        state: BookingState,
    },
    /// Book an item
    Create {
        /// The item to book
        #[clap(long)]
        item_id: i32,
        /// Start of the rental, e.g. 2026-05-01T10:00:00 (UTC)
        #[clap(long)]
        start: NaiveDateTime,
        /// End of the rental (UTC)
        #[clap(long)]
        end: NaiveDateTime,
    },
    /// Get a booking you made or one of your items' bookings
    Get {
        /// The booking ID
        id: i32,
    },
    /// Approve a booking of one of your items
    Approve {
        /// The booking ID
        id: i32,
    },
    /// Reject a booking of one of your items
    Reject {
        /// The booking ID
        id: i32,
    },
}

/// Executes a booking command
pub async fn execute(
    client: &ShareItClient,
    cmd: BookingCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        BookingCommands::List { state } => {
            let bookings = client.list_bookings(state).await?;
            output::print_bookings(&bookings, config);
        }
        BookingCommands::Owner { state } => {
            let bookings = client.list_owner_bookings(state).await?;
            output::print_bookings(&bookings, config);
        }
        BookingCommands::Create { item_id, start, end } => {
            let booking = client.create_booking(item_id, start, end).await?;
            output::print_booking(&booking, config);
        }
        BookingCommands::Get { id } => {
            let booking = client.get_booking(id).await?;
            output::print_booking(&booking, config);
        }
        BookingCommands::Approve { id } => {
            let booking = client.approve_booking(id, true).await?;
            output::print_booking(&booking, config);
        }
        BookingCommands::Reject { id } => {
            let booking = client.approve_booking(id, false).await?;
            output::print_booking(&booking, config);
        }
    }
    Ok(())
}
