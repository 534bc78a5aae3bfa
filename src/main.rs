use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use indoor_map_config::config::{default_config_path, load_config_state, save_config};
use indoor_map_config::core::{DialogResult, SeriesUpdate};
use indoor_map_config::sources::{LogAlertSink, ScriptedDialogHost, StaticMapDataProvider};
use indoor_map_config::{InitDefaults, MapConfigurator};
use indoor_map_core::{DialogOutcome, Threshold};
use indoor_map_types::ThresholdId;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// indoor-map-config - Configure a data point indoor map widget
#[derive(Parser, Debug)]
#[command(name = "indoor-map-config")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Widget configuration file (defaults to the user config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Provider fixture with map configurations, devices and series
    #[arg(short = 'p', long = "provider", value_name = "FIXTURE")]
    provider: PathBuf,

    /// Zoom level for newly initialized configurations
    #[arg(long = "default-zoom", value_name = "LEVEL")]
    default_zoom: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the initialized configuration and the resolved series
    Show,
    /// Select a map configuration and resolve its series
    SelectMap {
        /// Map configuration id
        id: String,
    },
    /// Select the primary measurement
    SelectMeasurement {
        /// Series as "fragment.series"
        data_point: String,
    },
    /// Add or replace a threshold given as JSON (an id is generated if missing)
    ThresholdSave {
        json: String,
    },
    /// Delete the threshold with this id
    ThresholdDelete {
        id: String,
    },
    /// Replace the series shown in marker popups
    PopupSet {
        /// Series as "fragment.series"
        data_points: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info, Level 2: debug, Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    info!("Using widget configuration {}", config_path.display());

    let defaults = InitDefaults {
        zoom_level: cli.default_zoom.unwrap_or(InitDefaults::default().zoom_level),
    };
    let provider = Arc::new(StaticMapDataProvider::load_from_path(&cli.provider)?);
    let dialogs = Arc::new(ScriptedDialogHost::new());
    let configurator = MapConfigurator::new(
        load_config_state(&config_path)?,
        &defaults,
        provider,
        Arc::new(LogAlertSink),
        dialogs.clone(),
    );

    let update = configurator.load().await?;
    report_series_update(update.as_ref());

    let mutated = run_command(&configurator, &dialogs, cli.command).await?;

    let session = configurator.session().await;
    let config = configurator.into_config();
    if mutated {
        save_config(&config, &config_path)?;
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    if let Some(series) = session.data_point_series {
        println!("Supported series: {}", series.join(", "));
    }
    Ok(())
}

/// Apply one command; returns whether the configuration changed
async fn run_command(
    configurator: &MapConfigurator,
    dialogs: &ScriptedDialogHost,
    command: Command,
) -> Result<bool> {
    let mutated = match command {
        Command::Show => false,
        Command::SelectMap { id } => {
            let update = configurator.map_configuration_changed(&id).await?;
            report_series_update(Some(&update));
            true
        }
        Command::SelectMeasurement { data_point } => {
            configurator.measurement_changed(&data_point).await?;
            true
        }
        Command::ThresholdSave { json } => {
            let threshold = parse_threshold(&json)?;
            let existing = find_threshold(configurator, |t| t.id == threshold.id).await;

            dialogs.push_threshold_outcome(DialogOutcome::Saved(threshold));
            let result = match existing {
                Some(existing) => configurator.edit_threshold(existing).await?,
                None => configurator.add_threshold().await?,
            };
            result == DialogResult::Saved
        }
        Command::ThresholdDelete { id } => {
            match find_threshold(configurator, |t| t.id.to_string() == id).await {
                Some(existing) => {
                    dialogs.push_threshold_outcome(DialogOutcome::Deleted(existing.clone()));
                    configurator.edit_threshold(existing).await?
                        == DialogResult::Deleted { removed: true }
                }
                None => {
                    warn!("No threshold with id '{}'", id);
                    false
                }
            }
        }
        Command::PopupSet { data_points } => {
            dialogs.push_popup_outcome(DialogOutcome::Saved(data_points));
            configurator.edit_popup_datapoints().await? == DialogResult::Saved
        }
    };
    Ok(mutated)
}

async fn find_threshold(
    configurator: &MapConfigurator,
    predicate: impl Fn(&Threshold) -> bool,
) -> Option<Threshold> {
    configurator
        .config()
        .await
        .legend
        .thresholds
        .into_iter()
        .find(|t| predicate(t))
}

/// Parse a threshold argument, generating an id when none is given
fn parse_threshold(json: &str) -> Result<Threshold> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("threshold must be a JSON object")?;
    let serde_json::Value::Object(mut fields) = value else {
        return Err(anyhow!("threshold must be a JSON object"));
    };
    let id = match fields.remove("id") {
        Some(id) => serde_json::from_value(id).context("threshold id must be a string or number")?,
        None => ThresholdId::generate(),
    };
    Ok(Threshold { id, fields })
}

fn report_series_update(update: Option<&SeriesUpdate>) {
    match update {
        Some(SeriesUpdate::Applied {
            selected_data_point: Some(data_point),
        }) => info!("Selected data point {}", data_point),
        Some(SeriesUpdate::Applied {
            selected_data_point: None,
        }) => info!("Stored measurement is not among the supported series"),
        Some(SeriesUpdate::Stale) => info!("Series resolution was superseded"),
        None => info!("No map configuration selected yet"),
    }
}
