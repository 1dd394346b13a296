use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use color_score::Rgb;
use colorete::assets::AssetLoader;
use colorete::models::{AppConfig, ResultsSummary, RoundRecord};
use colorete::services::{
    load_results, play_again, register_player, session_store, share_results, EngineObserver,
    FileShareTarget, GameEngine, GamePhase, InMemoryStore, JsonFileStore, PickerState,
    SessionStore, TokioScheduler,
};

#[derive(Parser)]
#[command(name = "colorete")]
#[command(about = "Colorete - how well do you remember a color?")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the player
    Start {
        /// Player name
        #[arg(short, long)]
        name: String,
    },
    /// Play a session in the terminal
    Play {
        /// Register this player before starting
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the results of the last session
    Results {
        /// Append the share text to this file
        #[arg(long)]
        share_to: Option<PathBuf>,
    },
    /// Clear stored results to play again
    Reset,
    /// Write the embedded config.yaml to the filesystem
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Start { name }) => run_start_command(&name),
        Some(Commands::Play { name }) => run_play_command(name).await,
        Some(Commands::Results { share_to }) => run_results_command(share_to.as_deref()),
        Some(Commands::Reset) => run_reset_command(),
        Some(Commands::Init { force }) => run_init_command(force),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Config plus the store it points at
struct Context {
    config: AppConfig,
    store: Arc<dyn SessionStore>,
}

fn load_context() -> anyhow::Result<Context> {
    let loader = AssetLoader::from_env();
    if let Err(e) = loader.seed_if_configured() {
        tracing::warn!(%e, "Failed to seed config file");
    }
    let config = AppConfig::load_from_assets(&loader);

    let store_path = std::env::var("STORE_FILE")
        .ok()
        .map(PathBuf::from)
        .or_else(|| config.store.path.clone());

    let store: Arc<dyn SessionStore> = match store_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using file store");
            Arc::new(JsonFileStore::open(path)?)
        }
        None => {
            tracing::warn!("No store path configured, results will not outlive this process");
            Arc::new(InMemoryStore::new())
        }
    };

    Ok(Context { config, store })
}

fn run_start_command(name: &str) -> anyhow::Result<()> {
    init_tracing("colorete=warn");
    let ctx = load_context()?;

    let player = register_player(ctx.store.as_ref(), name)?;
    println!("Welcome, {player}! Run 'colorete play' to start.");
    Ok(())
}

/// What the engine reports to the terminal loop
enum UiEvent {
    Phase(GamePhase),
    RoundEnded(RoundRecord),
    Complete,
}

/// Forwards engine notifications to the terminal loop
struct ChannelObserver {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl EngineObserver for ChannelObserver {
    fn on_state_change(&self, phase: &GamePhase) {
        let _ = self.tx.send(UiEvent::Phase(phase.clone()));
    }

    fn on_round_end(&self, _round: u32, record: &RoundRecord) {
        let _ = self.tx.send(UiEvent::RoundEnded(record.clone()));
    }

    fn on_session_complete(&self, _history: &[RoundRecord]) {
        let _ = self.tx.send(UiEvent::Complete);
    }
}

/// Two-cell-wide truecolor block, or the raw text if it is not a color
fn swatch(color: &str) -> String {
    match color.parse::<Rgb>() {
        Ok(rgb) => format!(
            "\x1b[48;2;{};{};{}m      \x1b[0m {}",
            rgb.r,
            rgb.g,
            rgb.b,
            rgb.to_hex()
        ),
        Err(_) => color.to_string(),
    }
}

async fn run_play_command(name: Option<String>) -> anyhow::Result<()> {
    init_tracing("colorete=info");
    let ctx = load_context()?;

    if let Some(name) = name {
        register_player(ctx.store.as_ref(), &name)?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let picker = PickerState::new();
    let engine = GameEngine::builder(
        ctx.config.game.clone(),
        Arc::new(TokioScheduler::current()?),
        ctx.store.clone(),
    )
    .picker(Arc::new(picker.clone()))
    .observer(Arc::new(ChannelObserver { tx }))
    .build();

    if let Err(e) = engine.start() {
        if e.redirects_to_start() {
            println!("No player registered. Run 'colorete start --name <NAME>' first.");
            return Ok(());
        }
        return Err(e.into());
    }

    println!("Memorize each color, then type it as #RRGGBB. Empty line submits, Ctrl-C quits.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(UiEvent::Phase(phase)) => show_phase(&engine, &phase),
                Some(UiEvent::RoundEnded(record)) => show_round(&record),
                Some(UiEvent::Complete) | None => break,
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match line.trim() {
                    "" | "submit" => {
                        engine.submit();
                    }
                    color => {
                        picker.select(color);
                        println!("  selected {}", swatch(color));
                    }
                },
                None => stdin_open = false,
            },
            _ = &mut ctrl_c => {
                engine.cancel();
                println!("\nSession abandoned.");
                return Ok(());
            }
        }
    }

    match load_results(ctx.store.as_ref(), &ctx.config.results, &ctx.config.game) {
        Ok(summary) => print_summary(&summary),
        Err(e) => println!("No results to show: {e}"),
    }
    Ok(())
}

fn show_phase(engine: &GameEngine, phase: &GamePhase) {
    match phase {
        GamePhase::Countdown { remaining: 0 } => println!("Go!"),
        GamePhase::Countdown { remaining } => println!("{remaining}..."),
        GamePhase::RoundActive {
            round,
            time_remaining,
        } if *time_remaining == engine.config().seconds_per_round => {
            let snapshot = engine.snapshot();
            let target = snapshot.target_color.unwrap_or_default();
            println!(
                "\nRound {round}/{}: {}",
                snapshot.total_rounds,
                swatch(&target)
            );
        }
        GamePhase::RoundActive { time_remaining, .. } if *time_remaining <= 3 => {
            println!("  {time_remaining}s left");
        }
        _ => {}
    }
}

fn show_round(record: &RoundRecord) {
    println!(
        "  target   {}\n  yours    {}\n  {} points ({}% similar)",
        swatch(&record.target_color),
        swatch(&record.selected_color),
        record.score,
        record.similarity()
    );
}

fn print_summary(summary: &ResultsSummary) {
    println!("\nResults for {}", summary.player_name);
    for round in &summary.displayed_rounds {
        println!(
            "  Round {}: {} vs {}  {:>3} pts  {:>3}% similar",
            round.number,
            swatch(&round.record.target_color),
            swatch(&round.record.selected_color),
            round.record.score,
            round.similarity
        );
    }
    println!(
        "\n  {} / {} points ({:.0}%)",
        summary.total_score,
        summary.max_possible_score,
        summary.percentage()
    );
    println!("  {}", summary.feedback());
}

fn run_results_command(share_to: Option<&Path>) -> anyhow::Result<()> {
    init_tracing("colorete=warn");
    let ctx = load_context()?;

    let summary = match load_results(ctx.store.as_ref(), &ctx.config.results, &ctx.config.game)
    {
        Ok(summary) => summary,
        Err(e) if e.redirects_to_start() => {
            println!("No finished session. Run 'colorete start --name <NAME>' and play first.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    print_summary(&summary);

    if let Some(path) = share_to {
        let target = FileShareTarget::new(path);
        match share_results(&target, &summary) {
            Some(_) => println!("\nShared to {}", path.display()),
            None => println!("\nCould not share to {}", path.display()),
        }
    }
    Ok(())
}

fn run_reset_command() -> anyhow::Result<()> {
    init_tracing("colorete=warn");
    let ctx = load_context()?;

    play_again(ctx.store.as_ref())?;
    println!("Results cleared. Run 'colorete play' for another round.");
    Ok(())
}

fn run_init_command(force: bool) -> anyhow::Result<()> {
    init_tracing("colorete=warn");
    let report = AssetLoader::from_env().init(force)?;

    if !report.written.is_empty() {
        println!("Wrote {} files:", report.written.len());
        for f in &report.written {
            println!("  - {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "Skipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let store_file = std::env::var("STORE_FILE").ok();

    println!("Colorete v{VERSION}\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  STORE_FILE  = {}",
        store_file.as_deref().unwrap_or("(not set)")
    );

    let loader = AssetLoader::new(config_file.clone().map(PathBuf::from));
    let config = AppConfig::load_from_assets(&loader);

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("\nConfig:  {config_source}");
    println!(
        "  {} rounds of {}s, countdown from {}",
        config.game.total_rounds, config.game.seconds_per_round, config.game.countdown_from
    );
    println!(
        "  first round: {:?}, max score: {:?}",
        config.results.first_round, config.results.max_score
    );

    let store_path = store_file
        .map(PathBuf::from)
        .or_else(|| config.store.path.clone());
    println!("\nStore:");
    match store_path {
        Some(path) => match JsonFileStore::open(&path) {
            Ok(store) => {
                let player = session_store::read_player_name(&store).ok().flatten();
                let rounds = session_store::read_history(&store)
                    .ok()
                    .flatten()
                    .map_or(0, |h| h.len());
                println!("  {}", path.display());
                println!("  Player: {}", player.as_deref().unwrap_or("(none)"));
                println!("  Stored rounds: {rounds}");
            }
            Err(e) => println!("  {} (unreadable: {e})", path.display()),
        },
        None => println!("  in memory"),
    }

    println!("\nCommands:");
    println!("  colorete start    Register the player");
    println!("  colorete play     Play a session");
    println!("  colorete results  Show the last results");
    println!("  colorete reset    Clear results to play again");
    println!("  colorete init     Write the default config.yaml");
    println!("\nRun 'colorete --help' for more details.");
}
