use chrono::{DateTime, Duration, Local, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tally_core::*;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal drink and reminder tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretend the current time is this RFC 3339 instant (for testing)
    #[arg(long, global = true, hide = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a drink from the menu, or a custom one
    Drink {
        /// Menu id (see `tally menu`)
        #[arg(required_unless_present = "name")]
        id: Option<String>,

        /// Custom drink name
        #[arg(long, conflicts_with = "id", requires_all = ["volume_ml", "abv"])]
        name: Option<String>,

        /// Custom drink volume in millilitres
        #[arg(long, requires = "name")]
        volume_ml: Option<f64>,

        /// Custom drink alcohol fraction (0.05 for 5%)
        #[arg(long, requires = "name")]
        abv: Option<f64>,
    },

    /// Show the current alcohol level (default)
    Bac,

    /// List logged drinks
    Drinks,

    /// Clear the drink log
    Reset {
        /// Append the log to the CSV archive first
        #[arg(long)]
        archive: bool,
    },

    /// Show the drink menu
    Menu,

    /// Record that the reminder event just happened
    Texted,

    /// Show time since the last reminder event
    Reminder,
}

/// Files under the data directory
struct DataPaths {
    drinks: PathBuf,
    reminder: PathBuf,
    archive: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            drinks: data_dir.join("drinks.json"),
            reminder: data_dir.join("reminder.json"),
            archive: data_dir.join("drinks_archive.csv"),
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    tally_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    let menu = default_menu();
    let errors = menu.validate();
    if !errors.is_empty() {
        eprintln!("Drink menu validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid drink menu".into()));
    }

    // One recomputation per invocation
    let ctx = DashboardContext::from_config(&config, cli.now.unwrap_or_else(Utc::now))?;

    match cli.command {
        Some(Commands::Drink {
            id,
            name,
            volume_ml,
            abv,
        }) => {
            let drink = match (id, name, volume_ml, abv) {
                (Some(id), _, _, _) => menu
                    .get(&id)
                    .map(DrinkPreset::to_new_drink)
                    .ok_or(Error::UnknownDrink(id))?,
                (None, Some(name), Some(volume_ml), Some(abv)) => {
                    NewDrink::new(name, volume_ml, abv)
                }
                _ => return Err(Error::Other("Specify a menu id or --name/--volume-ml/--abv".into())),
            };
            cmd_drink(&paths, &ctx, menu, drink, &config)
        }
        Some(Commands::Drinks) => cmd_drinks(&paths),
        Some(Commands::Reset { archive }) => cmd_reset(&paths, archive),
        Some(Commands::Menu) => cmd_menu(menu),
        Some(Commands::Texted) => cmd_texted(&paths, &ctx),
        Some(Commands::Reminder) => cmd_reminder(&paths, &ctx),
        Some(Commands::Bac) | None => cmd_bac(&paths, &ctx, &config),
    }
}

fn parse_now(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{}': {}", s, e))
}

fn cmd_drink(
    paths: &DataPaths,
    ctx: &DashboardContext,
    menu: &DrinkMenu,
    drink: NewDrink,
    config: &Config,
) -> Result<()> {
    let store = EventLogStore::new(&paths.drinks);
    let name = drink.name.clone();
    let events = store.append(drink, ctx.now)?;

    println!("✓ Added: {}", name);

    for milestone in milestones_reached(&events, menu) {
        println!(
            "🔓 {} x {}: you've unlocked {}!",
            milestone.count, milestone.drink_name, milestone.reward
        );
    }

    println!();
    display_alcohol(&alcohol_view(ctx, &events), config);
    Ok(())
}

fn cmd_bac(paths: &DataPaths, ctx: &DashboardContext, config: &Config) -> Result<()> {
    let events = EventLogStore::new(&paths.drinks).load();
    display_alcohol(&alcohol_view(ctx, &events), config);
    Ok(())
}

fn cmd_drinks(paths: &DataPaths) -> Result<()> {
    let events = EventLogStore::new(&paths.drinks).load();

    if events.is_empty() {
        println!("No drinks logged.");
        return Ok(());
    }

    for event in &events {
        let when = event
            .occurred_at()
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        println!(
            "  {}  {}  ({} ml, {:.0}%)",
            when,
            event.name,
            event.volume_ml,
            event.abv * 100.0
        );
    }
    println!("{} drinks logged", events.len());
    Ok(())
}

fn cmd_reset(paths: &DataPaths, archive: bool) -> Result<()> {
    let store = EventLogStore::new(&paths.drinks);

    if archive {
        let events = store.load();
        let count = archive_events(&events, &paths.archive)?;
        if count > 0 {
            println!("✓ Archived {} drinks to {}", count, paths.archive.display());
        }
    }

    store.reset()?;
    println!("✓ Drink log has been reset.");
    Ok(())
}

fn cmd_menu(menu: &DrinkMenu) -> Result<()> {
    for drink in &menu.drinks {
        println!(
            "  {:<12} {:<24} {:>4} ml  {:>3.0}%",
            drink.id,
            drink.name,
            drink.volume_ml,
            drink.abv * 100.0
        );
    }
    Ok(())
}

fn cmd_texted(paths: &DataPaths, ctx: &DashboardContext) -> Result<()> {
    ReminderCache::new(&paths.reminder).record_now(ctx.now)?;
    println!("✓ Recorded. Counter reset.");
    Ok(())
}

fn cmd_reminder(paths: &DataPaths, ctx: &DashboardContext) -> Result<()> {
    let last = ReminderCache::new(&paths.reminder).get_last_time(ctx.now);
    let view = reminder_view(ctx, last);

    println!(
        "Last time: {}",
        view.last.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("Not texted for: {}", format_elapsed(view.elapsed));

    match view.tier {
        ReminderTier::Critical => println!("💔 \"We're so done\""),
        ReminderTier::Warning => println!("🌹 \"You better buy me flowers\""),
        ReminderTier::DangerZone => println!("❗ You're in the danger zone"),
        ReminderTier::Safe => println!("You're safe for now."),
    }

    if let Some((tier, remaining)) = view.until_next {
        println!(
            "{} seconds until {}",
            remaining.num_seconds(),
            tier.label().replace('_', " ")
        );
    }
    Ok(())
}

fn display_alcohol(view: &AlcoholView, config: &Config) {
    println!("Your alcohol level is: {:.5} ‰", view.metric);

    match view.tier {
        AlcoholTier::OverLimit => println!(
            "You are above the legal driving limit ({}‰).",
            config.alcohol.legal_limit
        ),
        AlcoholTier::UnderLimit => println!("You are below the limit... for now."),
        AlcoholTier::Sober => println!("You have no alcohol in your blood."),
    }

    if !view.counts.is_empty() {
        println!();
        println!("Your drink counts:");
        for (name, count) in &view.counts {
            println!("  {}: {}", name, count);
        }
    }
}

/// "1 days, 2 hours, 3 minutes, 4 seconds", dropping days when zero
fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!(
            "{} days, {} hours, {} minutes, {} seconds",
            days, hours, minutes, seconds
        )
    } else {
        format!("{} hours, {} minutes, {} seconds", hours, minutes, seconds)
    }
}
