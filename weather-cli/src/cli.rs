use anyhow::Context;
use chrono::{Local, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use weather_core::{
    Config, ErrorLog, Forecast, ForecastOutcome, OpenWeatherProvider, SearchOutcome, Session,
    UnitSystem, WeatherService, provider::provider_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather viewer")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Prefix conditions with Weather Icons glyphs (needs the icon font).
    #[arg(long, global = true)]
    pub glyphs: bool,

    /// Without a subcommand the interactive viewer starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and request settings.
    Configure,

    /// Look up a city, make it current and show its forecast.
    Search {
        /// Free-text city name.
        query: String,

        #[arg(long)]
        hourly: bool,
    },

    /// Show the forecast for the current city without touching history.
    Show {
        /// City to show instead of the current one.
        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        hourly: bool,
    },

    /// Switch the measurement system.
    Units { units: UnitsArg },

    /// Manage favourite cities.
    Favourite {
        #[command(subcommand)]
        action: FavouriteAction,
    },

    /// List recently searched cities, or forget one.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    List,
    /// Remove a city from the search history.
    Remove { city: String },
}

#[derive(Debug, Subcommand)]
pub enum FavouriteAction {
    /// Add a city (default: the current city).
    Add { city: Option<String> },
    /// Remove a city (default: the current city).
    Remove { city: Option<String> },
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for UnitSystem {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => UnitSystem::Metric,
            UnitsArg::Imperial => UnitSystem::Imperial,
        }
    }
}

pub type Service = WeatherService<OpenWeatherProvider>;

/// Loaded configuration and output options shared by every command.
pub struct App {
    pub config: Config,
    pub glyphs: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(Command::Configure) = self.command {
            return configure();
        }

        let config = Config::load()?;
        let store = config.state_store()?;
        let mut session = Session::new(store.load());

        let app = App {
            config,
            glyphs: self.glyphs,
        };

        let result = match self.command {
            None => interactive::run(&app, &mut session).await,
            Some(command) => run_command(&app, &mut session, command).await,
        };

        // Saved even when the command failed.
        store.save(&session.into_state());
        result
    }
}

async fn run_command(app: &App, session: &mut Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Configure => configure(),
        Command::Search { query, hourly } => {
            let service = app.service()?;
            if let Some(forecast) = search(&service, session, &query).await {
                print_forecast(app, session, &forecast, hourly);
            }
            Ok(())
        }
        Command::Show { city, hourly } => {
            let service = app.service()?;
            let city = city.unwrap_or_else(|| session.state().current_city.clone());
            match service.forecast(&city, session.state().units).await {
                ForecastOutcome::Ready(forecast) => print_forecast(app, session, &forecast, hourly),
                ForecastOutcome::NotFound => print_not_found(&city),
                ForecastOutcome::Unavailable => print_unavailable(),
            }
            Ok(())
        }
        Command::Units { units } => {
            session.set_units(units.into());
            println!("Units set to {}.", session.state().units);
            Ok(())
        }
        Command::Favourite { action } => {
            favourite(session, action);
            Ok(())
        }
        Command::History { action } => {
            match action.unwrap_or(HistoryAction::List) {
                HistoryAction::List => print!("{}", render::history(session.state())),
                HistoryAction::Remove { city } => {
                    if session.remove_from_history(&city) {
                        println!("Removed {city} from history.");
                    } else {
                        println!("{city} is not in the history.");
                    }
                }
            }
            Ok(())
        }
    }
}

fn favourite(session: &mut Session, action: FavouriteAction) {
    let current = session.state().current_city.clone();
    match action {
        FavouriteAction::Add { city } => {
            let city = city.unwrap_or(current);
            session.add_favourite(&city);
            println!("Added {city} to favourites.");
        }
        FavouriteAction::Remove { city } => {
            let city = city.unwrap_or(current);
            if session.remove_favourite(&city) {
                println!("Removed {city} from favourites.");
            } else {
                println!("{city} is not a favourite.");
            }
        }
        FavouriteAction::List => print!("{}", render::favourites(session.state())),
    }
}

/// Resolve `query`; on success the city becomes current and its forecast is
/// returned. Not-found and unavailable are reported to the user here.
pub async fn search(service: &Service, session: &mut Session, query: &str) -> Option<Forecast> {
    match service.search(query).await {
        SearchOutcome::Found(location) => {
            session.open_city(&location.name);
            Some(service.forecast_for(location, session.state().units).await)
        }
        SearchOutcome::NotFound => {
            print_not_found(query);
            None
        }
        SearchOutcome::Unavailable => {
            print_unavailable();
            None
        }
    }
}

pub fn print_not_found(query: &str) {
    println!("No city found matching '{}'.", query.trim());
}

pub fn print_unavailable() {
    println!("The weather service is unavailable right now. Try again later.");
}

pub fn print_forecast(app: &App, session: &Session, forecast: &Forecast, hourly: bool) {
    let view = render::View {
        hourly,
        glyphs: app.glyphs,
        favourite: session.state().is_favourite(&forecast.location.name),
    };
    print!("{}", render::forecast(forecast, view, &Local, Utc::now()));
}

impl App {
    pub fn service(&self) -> anyhow::Result<Service> {
        let provider = provider_from_config(&self.config)?;
        let errors: ErrorLog = self.config.error_log()?;
        Ok(WeatherService::new(provider, errors))
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let timeout = inquire::CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout().as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read request timeout")?;
    config.request_timeout_secs = Some(timeout);

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    if !config.is_configured() {
        println!("Note: no API key is stored yet; searches will fail until one is set.");
    }
    Ok(())
}
