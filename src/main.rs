use chrono::Duration;
use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crudsel::cache::fingerprint;
use crudsel::{Action, Config, SelectOptions, Selector, Store};

#[derive(Parser, Debug)]
#[command(name = "crudsel")]
#[command(about = "Inspect cache freshness in a store snapshot")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/crudsel/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Store snapshot (JSON) to select from
  #[arg(short, long)]
  store: Option<PathBuf>,

  /// Cache period override for this run, in seconds
  #[arg(short, long)]
  interval_secs: Option<i64>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Select the collection of MODEL fetched with PARAMS
  Collection {
    model: String,
    /// Fetch params as JSON
    #[arg(short, long, default_value = "{}")]
    params: String,
  },
  /// Select one record
  Record { model: String, id: String },
  /// Select one record, or an empty object when it is not ready
  RecordOrEmpty { model: String, id: String },
  /// Report the status of a write action
  Status { model: String, action_key: String },
  /// Select whatever a FETCH / FETCH_ONE action (as JSON) would fetch
  Select { action: String },
  /// Print the fingerprint of a params object
  Fingerprint { params: String },
}

fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;
  let _log_guard = crudsel::logging::init(&config.log)?;

  let selector = Selector::from_config(&config);
  let opts = match args.interval_secs {
    Some(secs) => SelectOptions::with_interval(
      Duration::try_seconds(secs).ok_or_else(|| eyre!("Interval out of range: {}", secs))?,
    ),
    None => SelectOptions::default(),
  };

  let load_store = || -> Result<Store> {
    let path = args
      .store
      .as_deref()
      .ok_or_else(|| eyre!("--store is required for this command"))?;
    Store::load(path)
  };

  match &args.command {
    Command::Collection { model, params } => {
      let params = parse_json("params", params)?;
      let store = load_store()?;
      print_json(&selector.select_collection(model, &store, &params, &opts))
    }
    Command::Record { model, id } => {
      let store = load_store()?;
      print_json(&selector.get_record_selection(model, Some(id.as_str()), &store, &opts))
    }
    Command::RecordOrEmpty { model, id } => {
      let store = load_store()?;
      print_json(&selector.select_record_or_empty_object(
        model,
        Some(id.as_str()),
        &store,
        &opts,
      ))
    }
    Command::Status { model, action_key } => {
      let store = load_store()?;
      print_json(&selector.select_action_status(model, &store, action_key))
    }
    Command::Select { action } => {
      let action: Action = serde_json::from_str(action)
        .map_err(|e| eyre!("Failed to parse action JSON: {}", e))?;
      let store = load_store()?;
      let selection = selector.select(&action, &store, &opts)?;
      print_json(&selection)
    }
    Command::Fingerprint { params } => print_json(&fingerprint(&parse_json("params", params)?)),
  }
}

fn parse_json(what: &str, raw: &str) -> Result<Value> {
  serde_json::from_str(raw).map_err(|e| eyre!("Failed to parse {} JSON: {}", what, e))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let out =
    serde_json::to_string_pretty(value).map_err(|e| eyre!("Failed to render output: {}", e))?;
  println!("{}", out);
  Ok(())
}
