use clap::ValueEnum;
use serde::Serialize;
use shareit::dto::{BookingDto, CommentDto, ItemDetailsDto, ItemRequestDto};
use shareit::models::{Item, User};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// Pretty-printed JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs)
    pub quiet: bool,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

/// Prints `ids` one per line in quiet mode, or `empty` when there is nothing
///
/// Returns true when the caller still has to print the table.
fn table_needed(ids: impl Iterator<Item = i32>, empty: &str, config: &OutputConfig) -> bool {
    let ids: Vec<i32> = ids.collect();
    if ids.is_empty() {
        if !config.quiet {
            println!("{}", empty);
        }
        return false;
    }
    if config.quiet {
        for id in ids {
            println!("{}", id);
        }
        return false;
    }
    true
}

fn id_width(ids: impl Iterator<Item = i32>) -> usize {
    ids.map(|id| id.to_string().len()).max().unwrap_or(2).max(2)
}

/// Prints a list of users in the specified format
pub fn print_users(users: &[User], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !table_needed(users.iter().map(User::get_id), "No users found.", config) {
                return;
            }
            let id_w = id_width(users.iter().map(User::get_id));
            let name_w = users.iter().map(|u| u.get_name().len()).max().unwrap_or(4).max(4);
            println!("{:<id_w$}  {:<name_w$}  EMAIL", "ID", "NAME");
            for user in users {
                println!("{:<id_w$}  {:<name_w$}  {}", user.get_id(), user.get_name(), user.get_email());
            }
        }
        OutputFormat::Json => print_json(users),
    }
}

/// Prints a single user in the specified format
pub fn print_user(user: &User, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.get_id());
                return;
            }
            println!("ID:    {}", user.get_id());
            println!("Name:  {}", user.get_name());
            println!("Email: {}", user.get_email());
        }
        OutputFormat::Json => print_json(user),
    }
}

fn availability(item: &Item) -> &'static str {
    if item.is_available() { "available" } else { "unavailable" }
}

/// Prints a list of plain items in the specified format
pub fn print_items(items: &[Item], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !table_needed(items.iter().map(Item::get_id), "No items found.", config) {
                return;
            }
            let id_w = id_width(items.iter().map(Item::get_id));
            let name_w = items.iter().map(|i| i.get_name().len()).max().unwrap_or(4).max(4);
            println!("{:<id_w$}  {:<name_w$}  {:>5}  STATUS", "ID", "NAME", "OWNER");
            for item in items {
                println!(
                    "{:<id_w$}  {:<name_w$}  {:>5}  {}",
                    item.get_id(),
                    item.get_name(),
                    item.get_owner_id(),
                    availability(item),
                );
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Prints a single plain item in the specified format
pub fn print_item(item: &Item, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", item.get_id());
                return;
            }
            println!("ID:          {}", item.get_id());
            println!("Name:        {}", item.get_name());
            println!("Description: {}", item.get_description());
            println!("Status:      {}", availability(item));
            println!("Owner:       {}", item.get_owner_id());
            if let Some(request_id) = item.get_request_id() {
                println!("Request:     {}", request_id);
            }
        }
        OutputFormat::Json => print_json(item),
    }
}

/// Prints items with their bookings and comments
pub fn print_item_details_list(items: &[ItemDetailsDto], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !table_needed(items.iter().map(|d| d.item.get_id()), "No items found.", config) {
                return;
            }
            for (i, details) in items.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_item_details(details, config);
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Prints an item with its bookings and comments
pub fn print_item_details(details: &ItemDetailsDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            print_item(&details.item, config);
            if config.quiet {
                return;
            }
            if let Some(last) = &details.last_booking {
                println!(
                    "Last:        #{} by user {} ({} to {})",
                    last.id,
                    last.booker_id,
                    last.start.format(DATE_FORMAT),
                    last.end.format(DATE_FORMAT),
                );
            }
            if let Some(next) = &details.next_booking {
                println!(
                    "Next:        #{} by user {} ({} to {})",
                    next.id,
                    next.booker_id,
                    next.start.format(DATE_FORMAT),
                    next.end.format(DATE_FORMAT),
                );
            }
            for comment in &details.comments {
                println!("  {} ({}): {}", comment.author_name, comment.created.format(DATE_FORMAT), comment.text);
            }
        }
        OutputFormat::Json => print_json(details),
    }
}

/// Prints a freshly added comment
pub fn print_comment(comment: &CommentDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", comment.id);
                return;
            }
            println!("ID:      {}", comment.id);
            println!("Author:  {}", comment.author_name);
            println!("Created: {}", comment.created.format(DATE_FORMAT));
            println!("Text:    {}", comment.text);
        }
        OutputFormat::Json => print_json(comment),
    }
}

/// Prints a list of bookings in the specified format
pub fn print_bookings(bookings: &[BookingDto], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !table_needed(bookings.iter().map(|b| b.id), "No bookings found.", config) {
                return;
            }
            let id_w = id_width(bookings.iter().map(|b| b.id));
            let item_w = bookings.iter().map(|b| b.item.get_name().len()).max().unwrap_or(4).max(4);
            println!("{:<id_w$}  {:<item_w$}  {:<16}  {:<16}  {:<8}  BOOKER", "ID", "ITEM", "START", "END", "STATUS");
            for booking in bookings {
                println!(
                    "{:<id_w$}  {:<item_w$}  {:<16}  {:<16}  {:<8}  {}",
                    booking.id,
                    booking.item.get_name(),
                    booking.start.format(DATE_FORMAT).to_string(),
                    booking.end.format(DATE_FORMAT).to_string(),
                    booking.status.as_str(),
                    booking.booker.get_name(),
                );
            }
        }
        OutputFormat::Json => print_json(bookings),
    }
}

/// Prints a single booking in the specified format
pub fn print_booking(booking: &BookingDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", booking.id);
                return;
            }
            println!("ID:     {}", booking.id);
            println!("Item:   {} (#{})", booking.item.get_name(), booking.item.get_id());
            println!("Booker: {} (#{})", booking.booker.get_name(), booking.booker.get_id());
            println!("Start:  {}", booking.start.format(DATE_FORMAT));
            println!("End:    {}", booking.end.format(DATE_FORMAT));
            println!("Status: {}", booking.status);
        }
        OutputFormat::Json => print_json(booking),
    }
}

/// Prints a list of item requests in the specified format
pub fn print_requests(requests: &[ItemRequestDto], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !table_needed(requests.iter().map(|r| r.id), "No requests found.", config) {
                return;
            }
            let id_w = id_width(requests.iter().map(|r| r.id));
            println!("{:<id_w$}  {:<16}  {:>5}  DESCRIPTION", "ID", "CREATED", "ITEMS");
            for request in requests {
                println!(
                    "{:<id_w$}  {:<16}  {:>5}  {}",
                    request.id,
                    request.created.format(DATE_FORMAT).to_string(),
                    request.items.len(),
                    request.description,
                );
            }
        }
        OutputFormat::Json => print_json(requests),
    }
}

/// Prints a single item request with its answering items
pub fn print_request(request: &ItemRequestDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", request.id);
                return;
            }
            println!("ID:          {}", request.id);
            println!("Requester:   {}", request.requester_id);
            println!("Created:     {}", request.created.format(DATE_FORMAT));
            println!("Description: {}", request.description);
            if !request.items.is_empty() {
                println!();
                print_items(&request.items, config);
            }
        }
        OutputFormat::Json => print_json(request),
    }
}

/// Prints a simple success message (for operations that don't return data)
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({"status": "ok", "message": message})),
    }
}
