//! CLI binary for browsing print shops and placing print orders.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use printhub_rs::PrintHubBlocking;
use printhub_rs::error::PrintHubError;
use printhub_rs::geo::{Coordinates, FixedLocator, PositionSource};
use printhub_rs::models::{
    ColorMode, Maneuver, NaiveDate, NaiveTime, Order, OrderId, OrderStatus, PaperSize, Shop,
    ShopId, UserId,
};
use printhub_rs::notifications::{HistoryEntry, HistoryFilter, NotificationCenter, Receipt};
use printhub_rs::order::{DraftFile, OrderDraft};
use printhub_rs::shop_list::{ShopFilter, ShopListing};
use printhub_rs::storage::{BlockingStorage, FileStorage};

/// Environment variable overriding the backend URL.
const API_URL_ENV: &str = "PRINTHUB_API_URL";
/// Environment variable overriding the routing service URL.
const ROUTING_URL_ENV: &str = "PRINTHUB_ROUTING_URL";
/// Environment variable overriding the upload service URL.
const UPLOAD_URL_ENV: &str = "PRINTHUB_UPLOAD_URL";
/// Environment variable overriding the upload cloud name.
const CLOUD_NAME_ENV: &str = "PRINTHUB_CLOUD_NAME";
/// Environment variable overriding the upload preset.
const UPLOAD_PRESET_ENV: &str = "PRINTHUB_UPLOAD_PRESET";
/// Environment variable naming the ordering customer.
const USER_ID_ENV: &str = "PRINTHUB_USER_ID";
/// Environment variable with the current latitude.
const LAT_ENV: &str = "PRINTHUB_LAT";
/// Environment variable with the current longitude.
const LON_ENV: &str = "PRINTHUB_LON";

/// Placeholder for missing values.
const DASH: &str = "\u{2014}";

/// PrintHub CLI: find nearby print shops and order prints.
#[derive(Debug, Parser)]
#[command(name = "printhub", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List shops with walking distances, filtered and paged.
    Shops(ShopsArgs),
    /// Show one shop's details.
    Shop {
        /// Shop id.
        id: String,
    },
    /// Walking directions to a shop.
    Route {
        /// Shop id.
        id: String,
    },
    /// Estimate pages and price of files without ordering.
    Quote(QuoteArgs),
    /// Upload files and place an order.
    Order(OrderArgs),
    /// List notifications of recent orders.
    Notifications {
        /// Mark a notification read and show its receipt.
        #[arg(long, value_name = "ORDER_ID")]
        open: Option<String>,
        /// Drop every notification.
        #[arg(long, conflicts_with = "open")]
        clear: bool,
    },
    /// Show an order receipt.
    Receipt {
        /// Order id.
        id: String,
    },
    /// List past orders, optionally filtered.
    History(HistoryArgs),
    /// Set an order's status (pending, processing, completed, cancelled).
    Status {
        /// Order id.
        id: String,
        /// New status.
        status: OrderStatus,
    },
}

/// Arguments for the `shops` subcommand.
#[derive(Debug, Args)]
struct ShopsArgs {
    /// Accent-insensitive search over name and address.
    #[arg(long)]
    search: Option<String>,
    /// Sort: all, nearby or top-rated.
    #[arg(long, default_value = "all")]
    filter: ShopFilter,
    /// Page to show (1-based).
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Skip locating and distance lookups.
    #[arg(long)]
    no_distances: bool,
}

/// Print options shared by `quote` and `order`.
#[derive(Debug, Args)]
struct PrintOptions {
    /// Paper size: A4, A5 or A3.
    #[arg(long, default_value = "A4")]
    size: PaperSize,
    /// Print in black and white instead of color.
    #[arg(long)]
    mono: bool,
    /// Copies of each file.
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

/// Arguments for the `quote` subcommand.
#[derive(Debug, Args)]
struct QuoteArgs {
    /// Files to price.
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Print options applied to every file.
    #[command(flatten)]
    options: PrintOptions,
}

/// Arguments for the `order` subcommand.
#[derive(Debug, Args)]
struct OrderArgs {
    /// Shop receiving the order.
    #[arg(long)]
    shop: String,
    /// Pickup date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    /// Pickup time (HH:MM).
    #[arg(long, value_parser = parse_time)]
    time: NaiveTime,
    /// Note for the shop.
    #[arg(long, default_value = "")]
    note: String,
    /// Print options applied to every file.
    #[command(flatten)]
    options: PrintOptions,
    /// Files to print.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Arguments for the `history` subcommand.
#[derive(Debug, Args)]
struct HistoryArgs {
    /// Pickup date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Exact shop name.
    #[arg(long)]
    shop: Option<String>,
    /// Case-insensitive substring of a file name.
    #[arg(long)]
    file: Option<String>,
}

/// Service endpoints and identity read from the environment.
#[derive(Debug, Default)]
struct Settings {
    /// Backend URL override.
    api_url: Option<String>,
    /// Routing service URL override.
    routing_url: Option<String>,
    /// Upload service URL override.
    upload_url: Option<String>,
    /// Upload cloud name override.
    cloud_name: Option<String>,
    /// Upload preset override.
    upload_preset: Option<String>,
    /// Ordering customer.
    user_id: Option<UserId>,
    /// Current position, when known.
    position: Option<Coordinates>,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a time string in `HH:MM` format for clap.
fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|err| format!("{err}"))
}

/// Reads a non-empty environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|val| !val.trim().is_empty())
}

/// Parses a latitude/longitude pair.
fn parse_position(lat: &str, lon: &str) -> Option<Coordinates> {
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    valid.then_some(Coordinates::new(latitude, longitude))
}

/// Reads settings from the environment, printing an error for an
/// unusable position.
fn read_settings() -> io::Result<Option<Settings>> {
    let position = match (env_var(LAT_ENV), env_var(LON_ENV)) {
        (Some(lat), Some(lon)) => {
            let Some(coords) = parse_position(&lat, &lon) else {
                let mut err = io::stderr().lock();
                writeln!(
                    err,
                    "{} {}/{} is not a valid position: {lat}, {lon}",
                    "error:".red().bold(),
                    LAT_ENV.bold(),
                    LON_ENV.bold()
                )?;
                return Ok(None);
            };
            Some(coords)
        }
        (None, None) => None,
        (Some(_), None) | (None, Some(_)) => {
            let mut err = io::stderr().lock();
            writeln!(
                err,
                "{} {} and {} must be set together",
                "error:".red().bold(),
                LAT_ENV.bold(),
                LON_ENV.bold()
            )?;
            return Ok(None);
        }
    };
    Ok(Some(Settings {
        api_url: env_var(API_URL_ENV),
        routing_url: env_var(ROUTING_URL_ENV),
        upload_url: env_var(UPLOAD_URL_ENV),
        cloud_name: env_var(CLOUD_NAME_ENV),
        upload_preset: env_var(UPLOAD_PRESET_ENV),
        user_id: env_var(USER_ID_ENV).map(UserId::from),
        position,
    }))
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let command = match cli.command {
        Command::Quote(args) => return cmd_quote(&args),
        other => other,
    };

    let Some(settings) = read_settings()? else {
        return Ok(ExitCode::FAILURE);
    };

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to initialize storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = match build_client(settings, storage) {
        Ok(client) => client,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&client, command)
}

/// Creates the storage backend, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> printhub_rs::Result<FileStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStorage::default_dir()?,
    };
    FileStorage::new(dir)
}

/// Builds the blocking facade from environment settings.
fn build_client<S: BlockingStorage>(
    settings: Settings,
    storage: S,
) -> printhub_rs::Result<PrintHubBlocking<S>> {
    let mut builder = PrintHubBlocking::builder().storage(storage);
    if let Some(url) = settings.api_url {
        builder = builder.api_url(url);
    }
    if let Some(url) = settings.routing_url {
        builder = builder.routing_url(url);
    }
    if let Some(url) = settings.upload_url {
        builder = builder.upload_url(url);
    }
    if let Some(name) = settings.cloud_name {
        builder = builder.cloud_name(name);
    }
    if let Some(preset) = settings.upload_preset {
        builder = builder.upload_preset(preset);
    }
    if let Some(user_id) = settings.user_id {
        builder = builder.user_id(user_id);
    }
    if let Some(coords) = settings.position {
        builder = builder.locator(FixedLocator(coords));
    }
    builder.build()
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: BlockingStorage>(
    client: &PrintHubBlocking<S>,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Shops(args) => cmd_shops(client, &args),
        Command::Shop { id } => cmd_shop(client, &ShopId::from(id)),
        Command::Route { id } => cmd_route(client, &ShopId::from(id)),
        Command::Quote(args) => cmd_quote(&args),
        Command::Order(args) => cmd_order(client, &args),
        Command::Notifications { open, clear } => {
            cmd_notifications(client, open.map(OrderId::from), clear)
        }
        Command::Receipt { id } => cmd_receipt(client, &OrderId::from(id)),
        Command::History(args) => cmd_history(client, &args),
        Command::Status { id, status } => cmd_status(client, &OrderId::from(id), status),
    }
}

/// Prints a failed operation and returns the failure exit code.
fn fail(action: &str, err: &PrintHubError) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {action} failed: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Executes the `shops` subcommand.
fn cmd_shops<S: BlockingStorage>(
    client: &PrintHubBlocking<S>,
    args: &ShopsArgs,
) -> io::Result<ExitCode> {
    let mut listing = if args.no_distances {
        let spinner = make_spinner("Fetching shops...");
        let fetched = client.shops();
        spinner.finish_and_clear();
        match fetched {
            Ok(shops) => ShopListing::new(shops),
            Err(err) => return fail("fetching shops", &err),
        }
    } else {
        let spinner = make_spinner("Locating and measuring walking distances...");
        let fetched = client.nearby_shops();
        spinner.finish_and_clear();
        match fetched {
            Ok(nearby) => {
                print_position_note(nearby.position.source, nearby.position.coords)?;
                if !nearby.report.is_complete() {
                    writeln!(
                        io::stderr().lock(),
                        "{} {} distances could not be resolved",
                        "warning:".yellow().bold(),
                        nearby.report.failed.len()
                    )?;
                }
                nearby.listing
            }
            Err(err) => return fail("fetching shops", &err),
        }
    };

    listing.set_filter(args.filter);
    if let Some(search) = args.search.as_deref() {
        listing.set_search(search);
    }
    listing.go_to_page(args.page);
    print_listing(&listing)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `shop` subcommand.
fn cmd_shop<S: BlockingStorage>(client: &PrintHubBlocking<S>, id: &ShopId) -> io::Result<ExitCode> {
    match client.shop(id) {
        Ok(shop) => {
            let distance = client.cached_distances().ok().and_then(|known| known.get(id).copied());
            print_shop(&shop, distance.map(|d| (d.distance_km, d.minutes)))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("fetching shop", &err),
    }
}

/// Executes the `route` subcommand.
fn cmd_route<S: BlockingStorage>(client: &PrintHubBlocking<S>, id: &ShopId) -> io::Result<ExitCode> {
    let spinner = make_spinner("Finding a walking route...");
    let shop = match client.shop(id) {
        Ok(shop) => shop,
        Err(err) => {
            spinner.finish_and_clear();
            return fail("fetching shop", &err);
        }
    };
    let position = match client.locate() {
        Ok(position) => position,
        Err(err) => {
            spinner.finish_and_clear();
            return fail("locating", &err);
        }
    };
    let routed = client.route_to(position.coords, &shop);
    spinner.finish_and_clear();
    match routed {
        Ok(route) => {
            print_position_note(position.source, position.coords)?;
            let mut out = io::stdout().lock();
            writeln!(
                out,
                "{} {} {}",
                "Route to".green().bold(),
                shop.name.bold(),
                format_args!("({} km, {} min)", route.distance.distance_km, route.distance.minutes).dimmed()
            )?;
            writeln!(out)?;
            drop(out);
            print_maneuvers(&route.maneuvers)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("routing", &err),
    }
}

/// Loads files as drafts with the given print options, printing an error
/// for the first unreadable file.
fn load_drafts(files: &[PathBuf], options: &PrintOptions) -> io::Result<Option<Vec<DraftFile>>> {
    let color = if options.mono {
        ColorMode::Monochrome
    } else {
        ColorMode::Color
    };
    let mut drafts = Vec::with_capacity(files.len());
    for path in files {
        match DraftFile::from_path(path) {
            Ok(file) => drafts.push(
                file.with_quantity(options.quantity)
                    .with_size(options.size)
                    .with_color(color),
            ),
            Err(err) => {
                writeln!(
                    io::stderr().lock(),
                    "{} cannot read {}: {err}",
                    "error:".red().bold(),
                    path.display()
                )?;
                return Ok(None);
            }
        }
    }
    Ok(Some(drafts))
}

/// Executes the `quote` subcommand: prices files locally.
fn cmd_quote(args: &QuoteArgs) -> io::Result<ExitCode> {
    let Some(drafts) = load_drafts(&args.files, &args.options)? else {
        return Ok(ExitCode::FAILURE);
    };
    print_quote(&drafts)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `order` subcommand.
fn cmd_order<S: BlockingStorage>(
    client: &PrintHubBlocking<S>,
    args: &OrderArgs,
) -> io::Result<ExitCode> {
    let Some(files) = load_drafts(&args.files, &args.options)? else {
        return Ok(ExitCode::FAILURE);
    };
    let shop_id = ShopId::from(args.shop.as_str());
    let shop = match client.shop(&shop_id) {
        Ok(shop) => shop,
        Err(err) => return fail("fetching shop", &err),
    };

    let mut draft = OrderDraft::new(shop_id);
    for file in files {
        draft.add_file(file);
    }
    draft.set_pickup_date(args.date);
    draft.set_pickup_time(args.time);
    draft.set_note(args.note.as_str());
    print_quote(draft.files())?;

    let spinner = make_spinner(&format!("Uploading {} files and placing the order...", draft.files().len()));
    let submitted = client.submit_order(&shop, &draft);
    spinner.finish_and_clear();
    match submitted {
        Ok(order) => {
            writeln!(
                io::stdout().lock(),
                "{} order {} at {} ({})",
                "Order placed!".green().bold(),
                order.id.bold(),
                shop.name,
                format_vnd(order.total_amount)
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(PrintHubError::InvalidOrder(errors)) => {
            let mut err = io::stderr().lock();
            for (field, message) in errors.iter() {
                writeln!(err, "{} {field}: {message}", "error:".red().bold())?;
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => fail("ordering", &err),
    }
}

/// Executes the `notifications` subcommand.
fn cmd_notifications<S: BlockingStorage>(
    client: &PrintHubBlocking<S>,
    open: Option<OrderId>,
    clear: bool,
) -> io::Result<ExitCode> {
    if clear {
        return match client.clear_notifications() {
            Ok(()) => {
                writeln!(io::stdout().lock(), "{}", "Notifications cleared.".dimmed())?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => fail("clearing notifications", &err),
        };
    }
    if let Some(id) = open {
        return match client.open_notification(&id) {
            Ok(receipt) => {
                print_receipt(&receipt)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => fail("opening notification", &err),
        };
    }
    match client.notification_center() {
        Ok(center) => {
            print_notifications(&center, Utc::now())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("reading notifications", &err),
    }
}

/// Executes the `receipt` subcommand.
fn cmd_receipt<S: BlockingStorage>(client: &PrintHubBlocking<S>, id: &OrderId) -> io::Result<ExitCode> {
    let spinner = make_spinner("Fetching receipt...");
    let fetched = client.receipt(id);
    spinner.finish_and_clear();
    match fetched {
        Ok(receipt) => {
            print_receipt(&receipt)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("fetching receipt", &err),
    }
}

/// Executes the `history` subcommand.
fn cmd_history<S: BlockingStorage>(
    client: &PrintHubBlocking<S>,
    args: &HistoryArgs,
) -> io::Result<ExitCode> {
    let filter = HistoryFilter {
        date: args.date,
        shop_name: args.shop.clone(),
        file_name: args.file.clone(),
    };
    let spinner = make_spinner("Fetching order history...");
    let fetched = client.order_history(&filter);
    spinner.finish_and_clear();
    match fetched {
        Ok(entries) => {
            print_history(&entries)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("fetching history", &err),
    }
}

/// Executes the `status` subcommand.
fn cmd_status<S: BlockingStorage>(
    client: &PrintHubBlocking<S>,
    id: &OrderId,
    status: OrderStatus,
) -> io::Result<ExitCode> {
    match client.update_order_status(id, status) {
        Ok(order) => {
            writeln!(
                io::stdout().lock(),
                "{} order {} is now {}",
                "Updated!".green().bold(),
                order.id.bold(),
                order.status.label()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("updating status", &err),
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Formats an amount in VND with dot thousands separators.
fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len().saturating_mul(2));
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push_str(" đ");
    grouped
}

/// Formats a distance cell.
fn distance_cell(distance: Option<(f64, u32)>) -> Cell {
    distance.map_or_else(
        || Cell::new(DASH).fg(Color::DarkGrey),
        |(km, minutes)| Cell::new(format!("{km} km · {minutes} min")),
    )
}

/// Formats how long ago something happened.
fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created_at);
    if age.num_minutes() < 1 {
        "just now".to_owned()
    } else if age.num_hours() < 1 {
        format!("{} min ago", age.num_minutes())
    } else {
        format!("{} h ago", age.num_hours())
    }
}

/// Prints where the distances are measured from, unless it came from the
/// device.
fn print_position_note(source: PositionSource, coords: Coordinates) -> io::Result<()> {
    let note = match source {
        PositionSource::Device => return Ok(()),
        PositionSource::Cached => "using last known position",
        PositionSource::Fallback => "position unavailable, using default",
    };
    writeln!(
        io::stderr().lock(),
        "{} {note} ({:.4}, {:.4})",
        "note:".cyan(),
        coords.latitude,
        coords.longitude
    )
}

/// Prints the current page of a shop listing.
fn print_listing(listing: &ShopListing) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let items = listing.page_items();
    if items.is_empty() {
        writeln!(out, "{}", "No shops found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Id").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Address").fg(Color::Cyan),
        Cell::new("Rating").fg(Color::Cyan),
        Cell::new("Walk").fg(Color::Cyan),
    ]);
    for item in items {
        let shop = &item.shop;
        _ = table.add_row(vec![
            Cell::new(&shop.id),
            Cell::new(&shop.name),
            Cell::new(&shop.address),
            Cell::new(format!("{:.1} ({})", shop.rating, shop.review_count)),
            distance_cell(item.distance.map(|d| (d.distance_km, d.minutes))),
        ]);
    }

    let pagination = listing.pagination();
    writeln!(
        out,
        "{} {}",
        format_args!("Shops · {}", listing.filter()).green().bold(),
        format_args!("({} found)", listing.results().len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    if pagination.controls_visible() {
        writeln!(
            out,
            "{}",
            format_args!("page {} of {}", pagination.current(), pagination.page_count()).dimmed()
        )?;
    }
    Ok(())
}

/// Prints one shop's details.
fn print_shop(shop: &Shop, distance: Option<(f64, u32)>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", shop.name.green().bold())?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Address:".bold(), shop.address)?;
    writeln!(
        out,
        "  {} {:.1} ({} reviews)",
        "Rating:".bold(),
        shop.rating,
        shop.review_count
    )?;
    if let Some(phone) = shop.phone.as_deref() {
        writeln!(out, "  {} {phone}", "Phone:".bold())?;
    }
    if let Some(email) = shop.email.as_deref() {
        writeln!(out, "  {} {email}", "Email:".bold())?;
    }
    if let Some(hours) = shop.open_time.as_deref() {
        writeln!(out, "  {} {hours}", "Hours:".bold())?;
    }
    if let Some((km, minutes)) = distance {
        writeln!(out, "  {} {km} km, {minutes} min", "Walk:".bold())?;
    }
    Ok(())
}

/// Prints turn-by-turn instructions.
fn print_maneuvers(maneuvers: &[Maneuver]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if maneuvers.is_empty() {
        writeln!(out, "{}", "No instructions available.".dimmed())?;
        return Ok(());
    }
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Instruction").fg(Color::Cyan),
        Cell::new("Distance").fg(Color::Cyan),
    ]);
    for (step, maneuver) in maneuvers.iter().enumerate() {
        _ = table.add_row(vec![
            Cell::new(step.saturating_add(1)),
            Cell::new(&maneuver.instruction),
            Cell::new(format!("{:.2} km", maneuver.length)),
        ]);
    }
    writeln!(out, "{table}")
}

/// Prints per-file page estimates and prices with a total.
fn print_quote(files: &[DraftFile]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("File").fg(Color::Cyan),
        Cell::new("Pages").fg(Color::Cyan),
        Cell::new("Options").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
    ]);
    let mut total: u64 = 0;
    for file in files {
        total = total.saturating_add(file.price());
        _ = table.add_row(vec![
            Cell::new(file.name()),
            Cell::new(format!("{} ({})", file.pages(), file.estimate().method.label())),
            Cell::new(format!("{} · {} · x{}", file.size(), file.color(), file.quantity())),
            Cell::new(format_vnd(file.price())),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(out, "{} {}", "Total:".bold(), format_vnd(total).green().bold())
}

/// Prints the notification list with the toast, if any.
fn print_notifications(center: &NotificationCenter, now: DateTime<Utc>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if let Some(fresh) = center.toast(now) {
        writeln!(
            out,
            "{} order {} placed at {}",
            "New!".yellow().bold(),
            fresh.id,
            fresh.shop_name
        )?;
    }
    if center.items().is_empty() {
        writeln!(out, "{}", "No notifications.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Order").fg(Color::Cyan),
        Cell::new("Shop").fg(Color::Cyan),
        Cell::new("Pickup").fg(Color::Cyan),
        Cell::new("When").fg(Color::Cyan),
    ]);
    for item in center.items() {
        let order_cell = if center.is_read(&item.id) {
            Cell::new(&item.id).fg(Color::DarkGrey)
        } else {
            Cell::new(&item.id).fg(Color::Yellow)
        };
        _ = table.add_row(vec![
            order_cell,
            Cell::new(&item.shop_name),
            Cell::new(item.date.map_or_else(|| DASH.to_owned(), |date| date.to_string())),
            Cell::new(format_age(item.created_at, now)),
        ]);
    }
    writeln!(
        out,
        "{} {}",
        "Notifications".green().bold(),
        format_args!("({} unread)", center.unread_count()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")
}

/// Prints a table of an order's files.
fn order_files_table(order: &Order) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("File").fg(Color::Cyan),
        Cell::new("Pages").fg(Color::Cyan),
        Cell::new("Options").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
    ]);
    for file in &order.files {
        _ = table.add_row(vec![
            Cell::new(&file.name),
            Cell::new(file.pages),
            Cell::new(format!("{} · {} · x{}", file.size, file.format, file.quantity)),
            Cell::new(format_vnd(file.price)),
        ]);
    }
    table
}

/// Prints an order receipt.
fn print_receipt(receipt: &Receipt) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let order = &receipt.order;
    let shop = &receipt.shop;
    writeln!(
        out,
        "{} {}",
        format_args!("Order {}", order.id).green().bold(),
        format_args!("({})", order.status.label()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Shop:".bold(), shop.name)?;
    writeln!(out, "  {} {}", "Address:".bold(), shop.address)?;
    writeln!(
        out,
        "  {} {} {}",
        "Pickup:".bold(),
        order.pickup_date,
        order.pickup_time.format("%H:%M")
    )?;
    if !order.note.is_empty() {
        writeln!(out, "  {} {}", "Note:".bold(), order.note)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", order_files_table(order))?;
    writeln!(
        out,
        "{} {} {}",
        "Total:".bold(),
        format_vnd(order.total_amount).green().bold(),
        format_args!("({} copies)", receipt.copies()).dimmed()
    )
}

/// Prints past orders.
fn print_history(entries: &[HistoryEntry]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if entries.is_empty() {
        writeln!(out, "{}", "No orders found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Order").fg(Color::Cyan),
        Cell::new("Shop").fg(Color::Cyan),
        Cell::new("Pickup").fg(Color::Cyan),
        Cell::new("Files").fg(Color::Cyan),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);
    for entry in entries {
        let notification = &entry.notification;
        let files: Vec<&str> = entry.files().iter().map(|file| file.name.as_str()).collect();
        let pickup = entry.order.as_ref().map_or_else(
            || notification.date.map_or_else(|| DASH.to_owned(), |date| date.to_string()),
            |order| format!("{} {}", order.pickup_date, order.pickup_time.format("%H:%M")),
        );
        let status_cell = match entry.order.as_ref().map(|order| order.status) {
            Some(OrderStatus::Completed) => Cell::new(OrderStatus::Completed.label()).fg(Color::Green),
            Some(OrderStatus::Cancelled) => Cell::new(OrderStatus::Cancelled.label()).fg(Color::Red),
            Some(status) => Cell::new(status.label()).fg(Color::Yellow),
            None => Cell::new(DASH).fg(Color::DarkGrey),
        };
        _ = table.add_row(vec![
            Cell::new(&notification.id),
            Cell::new(&notification.shop_name),
            Cell::new(pickup),
            Cell::new(if files.is_empty() { DASH.to_owned() } else { files.join(", ") }),
            Cell::new(
                entry
                    .order
                    .as_ref()
                    .map_or_else(|| DASH.to_owned(), |order| format_vnd(order.total_amount)),
            ),
            status_cell,
        ]);
    }
    writeln!(
        out,
        "{} {}",
        "Orders".green().bold(),
        format_args!("({})", entries.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeDelta;
    use printhub_rs::models::Notification;
    use printhub_rs::storage::InMemoryStorage;

    /// Creates a client over in-memory storage; nothing here touches the
    /// network.
    fn offline_client() -> PrintHubBlocking<InMemoryStorage> {
        build_client(Settings::default(), InMemoryStorage::new()).unwrap()
    }

    #[test]
    fn parse_date_valid_and_invalid() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_date("01/06/2025").is_err());
    }

    #[test]
    fn parse_time_accepts_hours_and_minutes() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn parse_position_checks_ranges() {
        let coords = parse_position("21.0285", " 105.8542 ").unwrap();
        assert!((coords.latitude - 21.0285).abs() < 1e-9);
        assert!(parse_position("91", "0").is_none());
        assert!(parse_position("north", "0").is_none());
    }

    #[test]
    fn format_vnd_groups_thousands() {
        assert_eq!(format_vnd(0), "0 đ");
        assert_eq!(format_vnd(1000), "1.000 đ");
        assert_eq!(format_vnd(1_234_000), "1.234.000 đ");
    }

    #[test]
    fn format_age_buckets() {
        let now = DateTime::from_timestamp(1_750_000_000, 0).unwrap();
        assert_eq!(format_age(now, now), "just now");
        assert_eq!(format_age(now - TimeDelta::minutes(5), now), "5 min ago");
        assert_eq!(format_age(now - TimeDelta::hours(3), now), "3 h ago");
    }

    #[test]
    fn cli_parses_shops_arguments() {
        let cli = Cli::try_parse_from([
            "printhub", "shops", "--search", "ha noi", "--filter", "top-rated", "--page", "2",
        ])
        .unwrap();
        let Command::Shops(args) = cli.command else {
            panic!("expected shops command");
        };
        assert_eq!(args.search.as_deref(), Some("ha noi"));
        assert_eq!(args.filter, ShopFilter::TopRated);
        assert_eq!(args.page, 2);
    }

    #[test]
    fn cli_order_requires_files() {
        let parsed = Cli::try_parse_from([
            "printhub", "order", "--shop", "1", "--date", "2025-06-01", "--time", "10:00",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parses_status() {
        let cli = Cli::try_parse_from(["printhub", "status", "7", "completed"]).unwrap();
        let Command::Status { id, status } = cli.command else {
            panic!("expected status command");
        };
        assert_eq!(id, "7");
        assert_eq!(status, OrderStatus::Completed);
    }

    #[test]
    fn cmd_quote_prices_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("poster.png");
        std::fs::write(&image, [0_u8; 32]).unwrap();
        let args = QuoteArgs {
            files: vec![image],
            options: PrintOptions {
                size: PaperSize::A4,
                mono: true,
                quantity: 2,
            },
        };
        assert_eq!(cmd_quote(&args).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn cmd_quote_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = QuoteArgs {
            files: vec![dir.path().join("missing.pdf")],
            options: PrintOptions {
                size: PaperSize::A3,
                mono: false,
                quantity: 1,
            },
        };
        assert_eq!(cmd_quote(&args).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn cmd_notifications_empty() {
        let client = offline_client();
        assert_eq!(
            cmd_notifications(&client, None, false).unwrap(),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn cmd_notifications_clear() {
        let client = offline_client();
        client
            .storage()
            .set_notifications(vec![Notification {
                id: OrderId::from("1"),
                shop_name: "Copy 24h".to_owned(),
                created_at: Utc::now(),
                date: None,
            }])
            .unwrap();
        assert_eq!(
            cmd_notifications(&client, None, true).unwrap(),
            ExitCode::SUCCESS
        );
        assert!(client.storage().notifications().unwrap().is_empty());
    }

    #[test]
    fn print_empty_outputs() {
        print_listing(&ShopListing::new(Vec::new())).unwrap();
        print_history(&[]).unwrap();
        print_maneuvers(&[]).unwrap();
        print_notifications(&NotificationCenter::default(), Utc::now()).unwrap();
    }

    #[test]
    fn make_spinner_creates_spinner() {
        let spinner = make_spinner("Testing...");
        spinner.finish_and_clear();
    }
}
