//! Accolades - student opportunity catalog
//!
//! Command-line front end for the catalog core: browse and filter a catalog,
//! classify deadlines, compute the next query string for a filter change,
//! validate submissions, and cache catalog snapshots.
//!
//! # Usage
//!
//! ```bash
//! accolades list                                   # Open opportunities from the configured catalog
//! accolades list -q "category=internship&cost=Paid"
//! accolades list --search hack --expired --sort closing-soon
//! accolades urgency 2026-01-08 --today 2026-01-05
//! accolades explore                                # Category swimlanes + closing soon
//! accolades show hackmit-2026                      # Detail by id or slug
//! accolades query "category=research" --search ai  # Next minimal query string
//! accolades validate submission.json
//! accolades --catalog data.json snapshot save latest
//! accolades config set closing_soon_limit 8
//! ```

use accolades::config;
use accolades::core::catalog::{self, urgency_of};
use accolades::core::filter_state::{
    self, FilterParams, FilterState, FilterUpdate, KEY_CATEGORY, KEY_COST, KEY_EXPIRED,
    KEY_MODE, KEY_SEARCH,
};
use accolades::core::snapshots;
use accolades::core::urgency::{Urgency, classify_deadline_str};
use accolades::utils::{format_date, truncate_text};
use accolades::validators::Submission;
use accolades::{Error, Opportunity, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "accolades")]
#[command(about = "Accolades - browse and filter student opportunities", long_about = None)]
struct Cli {
    /// Catalog file (JSON array of rows or {"opportunities": [...]})
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Evaluate deadlines as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortOrder {
    /// Catalog order
    None,
    /// Ascending by deadline, unknown deadlines last
    ClosingSoon,
}

/// Filter flags shared by commands that take a filter; each overrides the query string
#[derive(clap::Args)]
struct FilterArgs {
    /// Starting query string, e.g. "category=internship&search=google"
    #[arg(short, long, default_value = "")]
    query: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    mode: Option<String>,
    #[arg(long)]
    cost: Option<String>,
    /// Include opportunities whose deadline has passed
    #[arg(long)]
    expired: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List opportunities matching a filter
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value = "none")]
        sort: SortOrder,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Classify a deadline
    Urgency {
        /// Deadline as stored by the backend (date or timestamp)
        deadline: String,
    },
    /// Show category swimlanes and the closing-soon strip
    Explore,
    /// Show one opportunity by id or slug
    Show { id_or_slug: String },
    /// Print the minimal query string after applying filter changes
    Query {
        #[command(flatten)]
        filters: FilterArgs,
        /// Flip the expired toggle
        #[arg(long, conflicts_with = "expired")]
        toggle_expired: bool,
        /// Drop every filter key
        #[arg(long)]
        reset: bool,
    },
    /// Validate a submission JSON file
    Validate { path: PathBuf },
    /// Manage cached catalog snapshots
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
    /// Show or change settings in config.json
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set a key (catalog_path, snapshot_name, closing_soon_limit,
    /// show_expired_by_default); an empty value resets it
    Set { key: String, value: String },
}

#[derive(Subcommand)]
enum SnapshotCommands {
    /// Save the current catalog under a name
    Save { name: String },
    /// List saved snapshots
    List,
}

/// Opportunity with its computed urgency, for JSON output
#[derive(Serialize)]
struct Listed<'a> {
    #[serde(flatten)]
    opportunity: &'a Opportunity,
    urgency: Urgency,
}

fn main() -> ExitCode {
    let _ = accolades::utils::ensure_dirs();
    init_logging();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(handle_cli(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(hint) = e.suggestion() {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(mut log_path) = accolades::utils::get_state_dir() {
        log_path.push("accolades.log");
        if let Ok(file) = std::fs::File::create(log_path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Wall-clock now, or noon of `--today` in the local offset
fn resolve_now(today: Option<NaiveDate>) -> DateTime<FixedOffset> {
    let now = Local::now().fixed_offset();
    match today {
        Some(date) => date
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
            .and_local_timezone(*now.offset())
            .single()
            .unwrap_or(now),
        None => now,
    }
}

/// Raw flag values go into the parameter map so they take the same
/// normalization path as a query string.
fn params_from_args(args: &FilterArgs) -> FilterParams {
    let mut params = FilterParams::from_query(&args.query);
    for (key, value) in [
        (KEY_CATEGORY, &args.category),
        (KEY_SEARCH, &args.search),
        (KEY_MODE, &args.mode),
        (KEY_COST, &args.cost),
    ] {
        if let Some(value) = value {
            params = params.with(key, value.clone());
        }
    }
    if args.expired {
        params = params.with(KEY_EXPIRED, "true");
    }
    params
}

fn warn_ignored_values(params: &FilterParams, state: &FilterState) {
    let checks = [
        (KEY_CATEGORY, state.category.is_all()),
        (KEY_MODE, state.mode.is_all()),
        (KEY_COST, state.cost.is_all()),
    ];
    for (key, fell_back) in checks {
        if fell_back
            && let Some(value) = params.get(key)
            && !value.eq_ignore_ascii_case("all")
        {
            tracing::warn!("Ignoring unrecognized {} value {:?}", key, value);
            eprintln!("Note: unrecognized {key} {value:?}, showing all");
        }
    }
}

fn print_row(opportunity: &Opportunity, now: &DateTime<FixedOffset>) {
    let (badge, due) = match urgency_of(opportunity, now) {
        Urgency::Known(info) => (
            format!("{:<12} {:>9}", info.label, info.days_left_label()),
            opportunity
                .deadline
                .map(|d| format_date(d.date_in(&now.timezone())))
                .unwrap_or_default(),
        ),
        Urgency::Unknown => (format!("{:<12} {:>9}", "Unknown", "-"), "no deadline".into()),
    };
    let mode = opportunity.mode.map_or("-", |m| m.as_str());
    let cost = if opportunity.is_paid { "Paid" } else { "Free" };
    println!(
        "{badge}  {:<40} {:<24} {:<10} {:<8} {:<4}  {due}",
        truncate_text(&opportunity.title, 40),
        truncate_text(&opportunity.organization, 24),
        opportunity.category.as_str(),
        mode,
        cost,
    );
}

async fn handle_cli(cli: Cli) -> Result<()> {
    let Cli {
        catalog: catalog_path,
        today,
        command,
    } = cli;
    let config = config::load_config().await;
    let now = resolve_now(today);
    let source = config.catalog_source(catalog_path.as_deref());

    match command {
        Commands::List {
            filters,
            sort,
            json,
        } => {
            let catalog = snapshots::load_source(&source).await?;
            let params = params_from_args(&filters);
            let mut state = FilterState::parse(&params);
            if config.show_expired_by_default && params.get(KEY_EXPIRED).is_none() {
                state.show_expired = true;
            }
            warn_ignored_values(&params, &state);

            let mut visible = catalog::apply_filters(&catalog, &state, &now);
            if sort == SortOrder::ClosingSoon {
                visible = catalog::sort_closing_soon(visible, &now.timezone());
            }

            if json {
                let listed: Vec<Listed> = visible
                    .iter()
                    .map(|&opportunity| Listed {
                        opportunity,
                        urgency: urgency_of(opportunity, &now),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for opportunity in &visible {
                    print_row(opportunity, &now);
                }
                println!();
                println!("{} of {} opportunities", visible.len(), catalog.len());
                let query = state.to_params().to_query();
                if !query.is_empty() {
                    println!("Filter: ?{query}");
                }
            }
        }
        Commands::Urgency { deadline } => match classify_deadline_str(&deadline, &now) {
            Urgency::Known(info) => {
                println!("Status: {} ({})", info.label, info.status);
                println!("Days remaining: {}", info.days_remaining);
                println!("Badge: {}", info.days_left_label());
                println!("Color: {} on {}", info.color, info.bg_color);
                if info.pulse {
                    println!("Pulse: yes");
                }
            }
            Urgency::Unknown => {
                println!("Status: unknown (could not parse deadline {deadline:?})");
            }
        },
        Commands::Explore => {
            let catalog = snapshots::load_source(&source).await?;
            let feed = catalog::explore_feed(&catalog, &now, config.closing_soon_limit());

            if let Some(featured) = feed.featured {
                println!("Featured");
                print_row(featured, &now);
                println!();
            }
            println!("Trending");
            for opportunity in &feed.trending {
                print_row(opportunity, &now);
            }
            println!();
            println!("Closing soon");
            for opportunity in &feed.closing_soon {
                print_row(opportunity, &now);
            }
            for (category, items) in &feed.swimlanes {
                println!();
                println!("{} ({})", category.display_name(), items.len());
                for opportunity in items {
                    print_row(opportunity, &now);
                }
            }
        }
        Commands::Show { id_or_slug } => {
            let catalog = snapshots::load_source(&source).await?;
            let opportunity = catalog::find_by_id(&catalog, &id_or_slug)
                .or_else(|| catalog::find_by_slug(&catalog, &id_or_slug))
                .ok_or_else(|| {
                    Error::validation("id", format!("No opportunity matches {id_or_slug:?}"))
                })?;

            println!("{}", opportunity.title);
            println!("{}", opportunity.organization);
            println!(
                "Category: {}  Mode: {}  Cost: {}",
                opportunity.category.display_name(),
                opportunity.mode.map_or("-", |m| m.as_str()),
                if opportunity.is_paid { "Paid" } else { "Free" }
            );
            if let Some(location) = &opportunity.location {
                println!("Location: {location}");
            }
            match urgency_of(opportunity, &now) {
                Urgency::Known(info) => println!(
                    "Deadline: {} ({}, {})",
                    opportunity
                        .deadline
                        .map(|d| format_date(d.date_in(&now.timezone())))
                        .unwrap_or_default(),
                    info.label,
                    info.days_left_label()
                ),
                Urgency::Unknown => println!("Deadline: unknown"),
            }
            if !opportunity.tags.is_empty() {
                println!("Tags: {}", opportunity.tags.join(", "));
            }
            if !opportunity.url.is_empty() {
                println!("Apply: {}", opportunity.url);
            }
            println!("Link: /opportunities/{}", opportunity.effective_slug());
            if !opportunity.description.is_empty() {
                println!();
                println!("{}", opportunity.description);
            }
        }
        Commands::Query {
            filters,
            toggle_expired,
            reset,
        } => {
            let current = FilterParams::from_query(&filters.query);
            let mut next = if reset {
                filter_state::reset(&current)
            } else {
                current.clone()
            };

            let flags = params_from_args(&FilterArgs {
                query: String::new(),
                ..filters
            });
            let flagged = FilterState::parse(&flags);
            let mut update = FilterUpdate::new();
            if flags.get(KEY_CATEGORY).is_some() {
                update = update.category(flagged.category);
            }
            if flags.get(KEY_SEARCH).is_some() {
                update = update.search(flagged.search.clone());
            }
            if flags.get(KEY_MODE).is_some() {
                update = update.mode(flagged.mode);
            }
            if flags.get(KEY_COST).is_some() {
                update = update.cost(flagged.cost);
            }
            if flags.get(KEY_EXPIRED).is_some() {
                update = update.show_expired(true);
            }
            next = filter_state::serialize(&next, &update);
            if toggle_expired {
                next = filter_state::toggle_expired(&next);
            }

            let query = next.to_query();
            if query.is_empty() {
                println!("(no parameters)");
            } else {
                println!("?{query}");
            }
        }
        Commands::Validate { path } => {
            let json = tokio::fs::read_to_string(&path).await?;
            let submission: Submission = serde_json::from_str(&json)?;
            let errors = submission.errors();
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("✗ {error}");
                }
                return Err(Error::validation(
                    "submission",
                    format!("{} field(s) invalid", errors.len()),
                ));
            }
            let row = submission.validate(now.with_timezone(&chrono::Utc))?;
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        Commands::Snapshot { command } => match command {
            SnapshotCommands::Save { name } => {
                let catalog = snapshots::load_source(&source).await?;
                let path = snapshots::save_snapshot(&name, &catalog).await?;
                println!("✓ Saved {} opportunities to {}", catalog.len(), path.display());
            }
            SnapshotCommands::List => {
                let names = snapshots::list_snapshots().await?;
                let active = config.snapshot_name.as_deref();
                println!("Snapshots (* = configured):");
                for name in names {
                    if Some(name.as_str()) == active {
                        println!("  * {name}");
                    } else {
                        println!("    {name}");
                    }
                }
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                if let Some(path) = config::config_path() {
                    println!("# {}", path.display());
                }
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Set { key, value } => {
                let mut config = config;
                config.set(&key, &value)?;
                config::save_config(&config).await?;
                println!("✓ {key} updated");
            }
        },
    }
    Ok(())
}
