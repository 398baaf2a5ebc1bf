use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use clap::{ArgAction, Args, Parser, Subcommand};
use climacell_core::{Client, Config, ForecastQuery, Reading, UnitSystem, WeatherSample};
use inquire::{Password, PasswordDisplayMode};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climacell", version, about = "ClimaCell hourly forecast CLI")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key in the config file.
    Configure,

    /// Show the hourly temperature forecast.
    Hourly(HourlyArgs),
}

#[derive(Debug, Args)]
pub struct HourlyArgs {
    /// Latitude of the location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the location.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// ClimaCell location id, as an alternative to coordinates.
    #[arg(long)]
    pub location_id: Option<String>,

    /// Unit system: "si" or "us".
    #[arg(long)]
    pub unit_system: Option<UnitSystem>,

    /// Comma-separated weather fields to request.
    #[arg(long, value_delimiter = ',', default_value = "temp")]
    pub fields: Vec<String>,

    /// Start of the forecast range (RFC 3339).
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<DateTime<FixedOffset>>,

    /// End of the forecast range (RFC 3339).
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<FixedOffset>>,
}

impl HourlyArgs {
    fn to_query(&self) -> ForecastQuery {
        let mut query = ForecastQuery::new().with_fields(self.fields.iter().cloned());

        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            query = query.with_coordinate(lat, lon);
        }
        if let Some(id) = &self.location_id {
            query = query.with_location_id(id.clone());
        }
        if let Some(unit_system) = self.unit_system {
            query = query.with_unit_system(unit_system);
        }
        if let Some(start) = self.start {
            query = query.with_start_time(start);
        }
        if let Some(end) = self.end {
            query = query.with_end_time(end);
        }

        query
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Hourly(args) => hourly(&args).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("ClimaCell API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

async fn hourly(args: &HourlyArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = config.resolve_api_key()?;
    let client = Client::with_config(api_key, &config.client)?;

    let samples = client
        .hourly_forecast(&args.to_query())
        .await
        .context("Hourly forecast request failed")?;
    info!(count = samples.len(), "Received forecast samples");

    for sample in &samples {
        println!("{}", describe_temperature(sample));
    }

    Ok(())
}

fn describe_temperature(sample: &WeatherSample) -> String {
    let at = sample.observed_at().to_rfc3339();
    match (sample.temperature(), &sample.temp) {
        (Reading::Present(value), Some(temp)) => {
            format!("The temperature at {at} is {value} degrees {}", temp.units)
        }
        _ => format!("No temperature data available at {at}"),
    }
}
