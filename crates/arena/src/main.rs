//! Batch runner for the MCTS agent.
//!
//! Plays independent skirmishes in parallel, one seeded agent per game, and
//! reports how the agent fared.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use spire_core::{Combat, Outcome};
use spire_mcts::games::{Scenario, Skirmish};
use spire_mcts::{Agent, MctsAgent, MctsConfig, RandomAgent};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Safety net against combats that never end.
const MAX_DECISIONS: usize = 10_000;

/// Spire MCTS arena.
#[derive(Parser)]
#[command(name = "spire-arena")]
#[command(about = "Play batches of skirmishes with the MCTS agent")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play skirmishes and report the results.
    Play {
        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// MCTS iterations per decision (overrides the config file).
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Preset encounter: starter, basic, swarm or lowhp.
        #[arg(long, default_value = "starter")]
        scenario: Scenario,

        /// Agent to play with.
        #[arg(short, long, value_enum, default_value = "mcts")]
        bot: Bot,

        /// Base seed. Game `i` uses `seed + i`.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// UCB-1 exploration coefficient (overrides the config file).
        #[arg(long)]
        exploration: Option<f64>,

        /// Selection softmax temperature (overrides the config file).
        #[arg(long)]
        temperature: Option<f64>,

        /// TOML file with MCTS parameters.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Which agent plays the games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
enum Bot {
    /// Stochastic UCB-1 tree search.
    Mcts,
    /// Uniformly random legal actions, as a baseline.
    Random,
}

/// Result of one skirmish.
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    seed: u64,
    outcome: Outcome,
    turns: u32,
    player_health: u32,
    /// Health taken off the opponents, summed.
    damage_dealt: u32,
    /// `damage_dealt` over the opponents' total max health.
    damage_ratio: f64,
    decisions: usize,
}

/// Aggregate over a batch of skirmishes.
#[derive(Debug, Serialize)]
struct Summary {
    scenario: String,
    bot: Bot,
    games: usize,
    wins: usize,
    losses: usize,
    win_rate: f64,
    mean_turns: f64,
    mean_health: f64,
    mean_damage_dealt: f64,
    mean_damage_ratio: f64,
    config: MctsConfig,
    elapsed_secs: f64,
}

impl Summary {
    fn new(
        scenario: Scenario,
        bot: Bot,
        records: &[GameRecord],
        config: MctsConfig,
        elapsed_secs: f64,
    ) -> Self {
        let games = records.len();
        let wins = records.iter().filter(|r| r.outcome == Outcome::Win).count();
        let mean = |total: f64| {
            if games == 0 {
                0.0
            } else {
                total / games as f64
            }
        };
        Self {
            scenario: scenario.to_string(),
            bot,
            games,
            wins,
            losses: games - wins,
            win_rate: mean(wins as f64),
            mean_turns: mean(records.iter().map(|r| f64::from(r.turns)).sum()),
            mean_health: mean(records.iter().map(|r| f64::from(r.player_health)).sum()),
            mean_damage_dealt: mean(records.iter().map(|r| f64::from(r.damage_dealt)).sum()),
            mean_damage_ratio: mean(records.iter().map(|r| r.damage_ratio).sum()),
            config,
            elapsed_secs,
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Load the config file if any, then apply command-line overrides.
fn load_config(
    path: Option<&Path>,
    iterations: Option<usize>,
    exploration: Option<f64>,
    temperature: Option<f64>,
) -> Result<MctsConfig> {
    let mut config = match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            MctsConfig::from_toml_str(&source)
                .with_context(|| format!("Failed to load config file: {:?}", path))?
        }
        None => MctsConfig::default(),
    };

    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }
    if let Some(exploration) = exploration {
        config.exploration = exploration;
    }
    if let Some(temperature) = temperature {
        config.temperature = temperature;
    }
    config.validate().context("Invalid MCTS configuration")?;
    Ok(config)
}

/// Play one skirmish of `scenario` to the end.
fn play_game<A: Agent>(
    combat: &Skirmish,
    scenario: Scenario,
    agent: &mut A,
    seed: u64,
) -> GameRecord {
    let mut state = combat.scenario(scenario, seed);
    let mut decisions = 0;

    while !combat.is_terminal(&state) && decisions < MAX_DECISIONS {
        let action = agent.choose_action(combat, &state);
        debug!(seed, turn = state.turn(), %action, "decision");
        combat.apply(&mut state, action);
        decisions += 1;
    }

    // A combat cut off by the decision cap counts as lost.
    let outcome = combat.outcome(&state).unwrap_or(Outcome::Loss);
    let vitals = combat.vitals(&state);
    let damage_dealt = vitals.opponent_max_health.saturating_sub(vitals.opponent_health);
    info!(
        seed,
        ?outcome,
        turns = state.turn(),
        health = state.player_health(),
        damage_dealt,
        "game finished"
    );

    GameRecord {
        seed,
        outcome,
        turns: state.turn(),
        player_health: state.player_health(),
        damage_dealt,
        damage_ratio: vitals.damage_ratio(),
        decisions,
    }
}

/// Play `games` skirmishes in parallel, game `i` seeded with `seed + i`.
fn play_games(
    config: &MctsConfig,
    bot: Bot,
    scenario: Scenario,
    games: usize,
    seed: u64,
) -> Vec<GameRecord> {
    let combat = Skirmish::default();
    (0..games)
        .into_par_iter()
        .map(|i| {
            let game_seed = seed.wrapping_add(i as u64);
            let rng = ChaCha8Rng::seed_from_u64(game_seed);
            match bot {
                Bot::Mcts => {
                    let mut agent = MctsAgent::new(config.clone(), rng);
                    play_game(&combat, scenario, &mut agent, game_seed)
                }
                Bot::Random => {
                    play_game(&combat, scenario, &mut RandomAgent::new(rng), game_seed)
                }
            }
        })
        .collect()
}

fn print_summary(summary: &Summary) {
    println!("Scenario:     {} ({} bot)", summary.scenario, bot_name(summary.bot));
    println!("Games:        {}", summary.games);
    println!(
        "Wins:         {} ({:.1}%)",
        summary.wins,
        summary.win_rate * 100.0
    );
    println!("Losses:       {}", summary.losses);
    println!("Mean turns:   {:.1}", summary.mean_turns);
    println!("Mean health:  {:.1}", summary.mean_health);
    println!(
        "Mean damage:  {:.1} ({:.1}% of opponent health)",
        summary.mean_damage_dealt,
        summary.mean_damage_ratio * 100.0
    );
    if summary.bot == Bot::Mcts {
        println!("Iterations:   {} per decision", summary.config.iterations);
    }
    println!("Completed in {:.2}s", summary.elapsed_secs);
}

fn bot_name(bot: Bot) -> &'static str {
    match bot {
        Bot::Mcts => "mcts",
        Bot::Random => "random",
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_play(
    games: usize,
    iterations: Option<usize>,
    scenario: Scenario,
    bot: Bot,
    seed: u64,
    exploration: Option<f64>,
    temperature: Option<f64>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config.as_deref(), iterations, exploration, temperature)?;
    info!(
        games,
        seed,
        %scenario,
        bot = bot_name(bot),
        iterations = config.iterations,
        "starting batch"
    );

    let start = Instant::now();
    let records = play_games(&config, bot, scenario, games, seed);
    let summary = Summary::new(
        scenario,
        bot,
        &records,
        config,
        start.elapsed().as_secs_f64(),
    );

    if json {
        let out = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", out);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Play {
            games,
            iterations,
            scenario,
            bot,
            seed,
            exploration,
            temperature,
            config,
            json,
        } => cmd_play(
            games,
            iterations,
            scenario,
            bot,
            seed,
            exploration,
            temperature,
            config,
            json,
        ),
    }
}
