use anyhow::{Context, Result};
use clap::Parser;
use fiscalsim::dashboard::policy_rows;
use fiscalsim::{game_over_summary, Dashboard, JsonFileStore};
use fiscalsim_core::catalog::standard_initial_state;
use fiscalsim_core::state::EventKind;
use fiscalsim_core::{
    EventLogObserver, GameSession, ObserverRegistry, PolicyId, Ruleset, SeededRng, SimConfig,
    TurnRecord,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of years to play
    #[arg(short, long, default_value_t = 1)]
    turns: u32,

    /// Seed for the event roll (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Set a slider, e.g. `--set corp_tax=25`
    #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_level)]
    levels: Vec<(String, f64)>,

    /// Switch a toggle policy on
    #[arg(long, value_name = "ID")]
    enable: Vec<String>,

    /// Switch a toggle policy off
    #[arg(long, value_name = "ID")]
    disable: Vec<String>,

    /// Save file to resume from and write back to
    #[arg(long)]
    save: Option<PathBuf>,

    /// JSON file overriding engine constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write one JSON line per resolved turn to this file
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Print the policy board and exit
    #[arg(long)]
    list_policies: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_level(arg: &str) -> Result<(String, f64), String> {
    let (id, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{arg}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad value for {id}: {e}"))?;
    Ok((id.trim().to_string(), value))
}

fn load_rules(config: Option<&PathBuf>) -> Result<Ruleset> {
    let mut rules = Ruleset::standard();
    if let Some(path) = config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        rules.config = SimConfig::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        rules.initial_state = standard_initial_state(&rules.config);
        log::info!("Loaded config overrides from {}", path.display());
    }
    rules.validate()?;
    Ok(rules)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    log::info!("Starting fiscalsim...");

    let rules = Arc::new(load_rules(args.config.as_ref())?);

    let mut store = args.save.as_ref().map(JsonFileStore::open).transpose()?;
    let mut session = match &store {
        Some(store) => GameSession::restore(rules, store)?,
        None => GameSession::new(rules),
    };

    for (id, value) in &args.levels {
        session.set_level(&PolicyId::new(id.as_str()), *value)?;
    }
    for id in &args.enable {
        session.set_enabled(&PolicyId::new(id.as_str()), true)?;
    }
    for id in &args.disable {
        session.set_enabled(&PolicyId::new(id.as_str()), false)?;
    }

    if args.list_policies {
        for row in policy_rows(&session) {
            println!("{:<20} {:<28} {}", row.id.as_str(), row.name, row.value);
        }
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(seed) => SeededRng::new(seed),
        None => SeededRng::from_entropy(),
    };

    let mut registry = ObserverRegistry::new();
    if let Some(path) = &args.events_out {
        let observer = EventLogObserver::file(path)
            .with_context(|| format!("creating {}", path.display()))?;
        registry.register(Box::new(observer));
    }

    println!("{}", Dashboard::from_session(&session));

    for _ in 0..args.turns {
        let result = session.end_turn(&mut rng)?;
        registry.notify(&TurnRecord::from_result(&result));

        println!("{}", Dashboard::from_session(&session));
        for event in result.event_log.iter().filter(|e| e.kind != EventKind::Lose) {
            println!("  {}: {}", event.title, event.description);
        }

        if let Some(summary) = game_over_summary(session.state(), &result.event_log) {
            println!("\n{summary}");
            if let Some(store) = store.as_mut() {
                session.acknowledge_game_over(store)?;
            }
            break;
        }
    }

    if let Some(store) = store.as_mut() {
        if session.state().turns_played() > 0 || !session.selection().is_empty() {
            session.save(store)?;
            log::info!("Saved game to {}", store.path().display());
        }
    }

    log::info!("Finished in {}", session.state().year);

    Ok(())
}
