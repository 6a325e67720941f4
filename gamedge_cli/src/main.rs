use clap::{Parser, Subcommand};
use colored::*;
use gamedge_cli::app::{App, Page};
use gamedge_cli::config::{AppConfig, ConfigManager, get_config};
use gamedge_cli::error::{CliError, CliResult, ErrorContext};
use gamedge_cli::output::{OutputFormat, OutputFormatter, create_formatter};
use gamedge_core::domain::DEFAULT_PAGE_SIZE;
use gamedge_core::{Company, DiscoveryCategory, Game, Pagination};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "gamedge")]
#[command(author, version, about = "Gamedge - Video game discovery with a throttled local cache", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format (text or json); defaults to output.default_format
    #[arg(short, long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Copy)]
struct PageArgs {
    /// Index of the first item
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Number of items
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u32,
}

impl PageArgs {
    fn pagination(&self) -> CliResult<Pagination> {
        Ok(Pagination::new(self.offset, self.limit)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show discovery lists
    Discover {
        /// Category to show, or "all"
        #[arg(short, long, default_value = "all")]
        category: String,

        #[command(flatten)]
        page: PageArgs,

        /// Only read the local cache
        #[arg(long)]
        no_refresh: bool,
    },

    /// Search games by name
    Search {
        query: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show a game with its related games
    Game { id: i64 },

    /// Like a game
    Like { id: i64 },

    /// Remove a like
    Unlike { id: i64 },

    /// Flip the like state of a game
    Toggle { id: i64 },

    /// List liked games, most recent first
    Likes {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show gaming news
    News {
        #[command(flatten)]
        page: PageArgs,

        /// Only read the local cache
        #[arg(long)]
        no_refresh: bool,
    },

    /// Inspect refresh throttling
    Throttle {
        #[command(subcommand)]
        command: ThrottleCommand,
    },

    /// Show local storage statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ThrottleCommand {
    /// List recorded refresh times
    List,

    /// Print the cache key for a query
    Key {
        #[command(subcommand)]
        query: KeyQuery,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum KeyQuery {
    /// Discovery list of one category
    Discovery { category: String },

    /// Games developed by a company
    Company {
        id: i64,

        /// Developed game ids
        #[arg(long, value_delimiter = ',')]
        games: Vec<i64>,
    },

    /// Games similar to a game
    Similar {
        id: i64,

        /// Similar game ids
        #[arg(long, value_delimiter = ',')]
        games: Vec<i64>,
    },

    /// News feed
    Articles,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., throttle.discovery_timeout_secs)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., throttle.discovery_timeout_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("gamedge_core", log::LevelFilter::Debug)
            .filter_module("gamedge_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let debug = cli.debug;
    if let Err(e) = run(cli).await {
        eprint!("{}", e.format_for_user(debug));
        std::process::exit(e.exit_code() as i32);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let command = match cli.command {
        Commands::Config { command } => return config_command(command),
        command => command,
    };

    let config = get_config().map_err(|e| {
        CliError::general(&format!("Failed to load configuration: {e}"))
            .with_suggestion("Run 'gamedge config list' to inspect the configuration")
    })?;
    let format =
        OutputFormat::from_string(cli.format.as_deref().unwrap_or(&config.output.default_format))?;
    let formatter = create_formatter(format, config.output.color_enabled);

    // Key derivation needs no stores
    let command = match command {
        Commands::Throttle {
            command: ThrottleCommand::Key { query, page },
        } => return key_command(&config, query, page),
        command => command,
    };

    let app = App::new(&config).await?;

    match command {
        Commands::Discover {
            category,
            page,
            no_refresh,
        } => discover_command(&app, formatter.as_ref(), &category, page, !no_refresh).await?,
        Commands::Search { query, page } => {
            let games = app.search(&query, page.pagination()?).await?;
            print!("{}", formatter.format_games(&games)?);
        }
        Commands::Game { id } => {
            let info = app.game_info(id).await?;
            print!("{}", formatter.format_game_info(&info)?);
        }
        Commands::Like { id } => {
            app.like(id).await?;
            eprintln!("{}", format!("Liked game {id}").green());
        }
        Commands::Unlike { id } => {
            app.unlike(id).await?;
            eprintln!("{}", format!("Removed like from game {id}").green());
        }
        Commands::Toggle { id } => {
            let liked = app.toggle_like(id).await?;
            let state = if liked { "liked" } else { "not liked" };
            eprintln!("{}", format!("Game {id} is now {state}").green());
        }
        Commands::Likes { page } => {
            let games = app.liked_games(page.pagination()?).await?;
            print!("{}", formatter.format_games(&games)?);
        }
        Commands::News { page, no_refresh } => {
            let page = app.news(page.pagination()?, !no_refresh).await?;
            report_refresh_error(&page);
            print!("{}", formatter.format_articles(&page.items)?);
        }
        Commands::Throttle {
            command: ThrottleCommand::List,
        } => {
            let entries = app.throttle_entries().await?;
            print!(
                "{}",
                formatter.format_throttle_entries(&entries, app.now_millis())?
            );
        }
        Commands::Stats => match app.stats().await? {
            Some(stats) => {
                println!("Games:          {}", stats.game_count);
                println!("Articles:       {}", stats.article_count);
                println!("Liked games:    {}", stats.liked_game_count);
                println!("Refresh keys:   {}", stats.refresh_key_count);
            }
            None => eprintln!("{}", "No database configured; storage is in memory.".yellow()),
        },
        Commands::Throttle {
            command: ThrottleCommand::Key { .. },
        }
        | Commands::Config { .. } => {}
    }

    Ok(())
}

fn parse_category(value: &str) -> CliResult<DiscoveryCategory> {
    DiscoveryCategory::from_str(value).map_err(|_| {
        let known: Vec<&str> = DiscoveryCategory::ALL.iter().map(|c| c.as_str()).collect();
        CliError::unknown_value("category", value, &known)
    })
}

/// Print a refresh failure as a notice; cached data is still shown
fn report_refresh_error<T>(page: &Page<T>) {
    if let Some(e) = &page.refresh_error {
        eprintln!("{}", e.user_message().yellow());
    }
}

async fn discover_command(
    app: &App,
    formatter: &dyn OutputFormatter,
    category: &str,
    page: PageArgs,
    refresh: bool,
) -> CliResult<()> {
    let pagination = page.pagination()?;

    if category.eq_ignore_ascii_case("all") {
        let (report, pages) = app.discover_all(pagination, refresh).await?;
        if let Some(report) = report {
            log::debug!("{}", formatter.format_refresh_report(&report)?.trim_end());
            for (category, e) in report.errors() {
                eprintln!(
                    "{}",
                    format!("{category}: {}", e.user_message()).yellow()
                );
            }
        }
        print!("{}", formatter.format_discovery(&pages)?);
        return Ok(());
    }

    let category = parse_category(category)?;
    let page = app.discover(category, pagination, refresh).await?;
    report_refresh_error(&page);
    print!("{}", formatter.format_discovery(&[(category, page.items)])?);
    Ok(())
}

fn key_command(config: &AppConfig, query: KeyQuery, page: PageArgs) -> CliResult<()> {
    use gamedge_core::throttling::{DefaultKeyProvider, KeyProvider};

    let keys = DefaultKeyProvider;
    let pagination = page.pagination()?;
    let policies = config.throttle.policies();

    let (key, policy) = match query {
        KeyQuery::Discovery { category } => (
            keys.discovery_games_key(parse_category(&category)?, pagination),
            policies.discovery(),
        ),
        KeyQuery::Company { id, games } => {
            let company = Company {
                id,
                developed_games: games,
                ..Company::default()
            };
            (
                keys.company_developed_games_key(&company, pagination),
                policies.company_developed_games(),
            )
        }
        KeyQuery::Similar { id, games } => {
            let game = Game {
                id,
                similar_games: games,
                ..Game::default()
            };
            (
                keys.similar_games_key(&game, pagination),
                policies.similar_games(),
            )
        }
        KeyQuery::Articles => (keys.articles_key(pagination), policies.articles()),
    };

    println!("{key}");
    eprintln!("Refresh window: {}s", policy.timeout().as_secs());
    Ok(())
}

fn config_command(command: ConfigCommand) -> CliResult<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            let value = manager
                .get(&key)
                .map_err(|e| CliError::misuse(&format!("{e:#}")))?;
            println!("{value}");
        }
        ConfigCommand::Set { key, value } => {
            manager
                .set(&key, &value)
                .map_err(|e| CliError::misuse(&format!("{e:#}")))?;
            eprintln!("{}", format!("Set {key} = {value}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;
            if items.is_empty() {
                eprintln!("No configuration values set. Using defaults.");
                eprintln!("Config file: {}", manager.get_config_path().display());
                return Ok(());
            }

            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());
            eprintln!();

            // Group items by section
            let mut sections: std::collections::BTreeMap<String, Vec<(String, String)>> =
                std::collections::BTreeMap::new();

            for (key, value) in items {
                let section = key.split('.').next().unwrap_or("general").to_string();
                sections.entry(section).or_default().push((key, value));
            }

            for (section, mut items) in sections {
                println!("[{}]", section.yellow());
                items.sort_by(|a, b| a.0.cmp(&b.0));

                for (key, value) in items {
                    let display_key = key.split_once('.').map(|(_, rest)| rest).unwrap_or(&key);
                    println!("  {} = {}", display_key.cyan(), value);
                }
                println!();
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}
