use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use truehue::achievements::AchievementBook;
use truehue::config::{ConfigStore, EngineConfig};
use truehue::high_scores::HighScores;
use truehue::leaderboard::LocalLeaderboard;
use truehue::lifecycle::GameState;
use truehue::mode::{GameMode, RoundKind};
use truehue::palette::Rgb;
use truehue::round::Round;
use truehue::session::{GameEvent, GameSession};
use truehue_engine::store::{DirStore, SharedStore};

#[derive(Debug, Parser)]
#[command(name = "truehue")]
#[command(about = "Color-matching quiz in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play one run.
    Play {
        #[arg(long, default_value = "classic")]
        mode: GameMode,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the best local runs for a mode.
    Leaderboard {
        #[arg(long, default_value = "classic")]
        mode: GameMode,
        #[arg(long)]
        limit: Option<usize>,
    },
    Achievements,
    Scores,
    /// Print the effective config and where it is read from.
    Config {
        /// Write the effective config to the config path.
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_store = ConfigStore::from_env();
    let config = config_store.load();
    let dir_store = DirStore::new(config.resolve_data_dir());
    log::debug!("using data dir {}", dir_store.root().display());
    let store = dir_store.shared();

    match cli.command {
        Commands::Play { mode, seed } => cmd_play(store, config, mode, seed),
        Commands::Leaderboard { mode, limit } => {
            cmd_leaderboard(store, limit.unwrap_or(config.leaderboard_limit), mode)
        }
        Commands::Achievements => cmd_achievements(store),
        Commands::Scores => cmd_scores(store),
        Commands::Config { write } => cmd_config(&config_store, &config, write),
    }
}

fn cmd_config(store: &ConfigStore, config: &EngineConfig, write: bool) -> Result<()> {
    if write {
        store
            .save(config)
            .with_context(|| format!("failed to write {}", store.path().display()))?;
        println!("wrote {}", store.path().display());
    } else {
        println!("# {}", store.path().display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn cmd_play(store: SharedStore, config: EngineConfig, mode: GameMode, seed: Option<u64>) -> Result<()> {
    let mut session = GameSession::open(store, config, seed);
    session.start_game(mode);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut last = Instant::now();

    while session.state() == GameState::Playing {
        let Some(round) = session.current_round().cloned() else {
            bail!("no round to play");
        };
        print_round(&session, &round)?;

        let Some(line) = lines.next() else {
            session.reset_game();
            return Ok(());
        };
        let line = line.context("failed to read answer")?;

        // Time spent thinking counts against the chrono clock.
        let now = Instant::now();
        session.advance(now - last);
        last = now;
        if session.state() != GameState::Playing {
            break;
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            session.end_game();
            break;
        }
        match mode.rules().round {
            RoundKind::Match => match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => {
                    session.submit_answer(true);
                }
                "n" | "no" => {
                    session.submit_answer(false);
                }
                _ => println!("answer y, n or q"),
            },
            RoundKind::FindColor => match answer.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    session.select_option(n - 1);
                }
                _ => println!("answer with an option number or q"),
            },
        }

        for event in session.drain_events() {
            match event {
                GameEvent::Answered { correct: true } => println!("correct! score {}", session.score()),
                GameEvent::Answered { correct: false } => println!("wrong."),
                GameEvent::TimeUp => println!("time is up!"),
                _ => {}
            }
        }
    }

    let Some(outcome) = session.last_outcome() else {
        return Ok(());
    };
    println!();
    println!(
        "{} run over: final score {} (rank {})",
        outcome.result.mode.display_name(),
        outcome.result.final_score,
        outcome.entry.rank
    );
    if outcome.new_high_score {
        println!("new high score!");
    }
    for achievement in &outcome.unlocked {
        println!(
            "unlocked: {} - {}",
            achievement.kind.title(),
            achievement.kind.description()
        );
    }
    Ok(())
}

fn print_round(session: &GameSession, round: &Round) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out)?;
    if session.mode().rules().timed {
        writeln!(out, "[{}s left, {:?}]", session.time_remaining(), session.time_band())?;
    }
    match round.options() {
        None => {
            writeln!(
                out,
                "{}  - does the word match its color? (y/n)",
                swatch_text(&round.displayed_name, round.displayed_color.color)
            )?;
        }
        Some(options) => {
            writeln!(out, "find: {}", round.displayed_name)?;
            for (i, option) in options.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, swatch_text("\u{2588}\u{2588}\u{2588}\u{2588}", option.color))?;
            }
        }
    }
    write!(out, "> ")?;
    out.flush().context("failed to flush stdout")
}

fn swatch_text(text: &str, color: Rgb) -> String {
    format!("\x1b[1;38;2;{};{};{}m{text}\x1b[0m", color.r, color.g, color.b)
}

fn cmd_leaderboard(store: SharedStore, limit: usize, mode: GameMode) -> Result<()> {
    let board = LocalLeaderboard::load(store);
    let entries = board.top_scores(mode, limit);
    if entries.is_empty() {
        println!("no {} runs yet", mode.display_name());
        return Ok(());
    }
    println!("{} leaderboard", mode.display_name());
    for entry in entries {
        println!(
            "{:>3}. {:<16} {:>4}  {}",
            entry.rank,
            entry.player_name,
            entry.score,
            entry.date.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_achievements(store: SharedStore) -> Result<()> {
    let book = AchievementBook::load(store);
    println!(
        "{}/{} unlocked",
        book.unlocked_count(),
        book.achievements().len()
    );
    for achievement in book.achievements() {
        let status = match achievement.unlocked_date {
            Some(date) if achievement.is_unlocked => date.format("%Y-%m-%d").to_string(),
            _ if achievement.is_unlocked => "unlocked".to_string(),
            _ => "locked".to_string(),
        };
        println!(
            "{:<18} {:<36} {}",
            achievement.kind.title(),
            achievement.kind.description(),
            status
        );
    }
    Ok(())
}

fn cmd_scores(store: SharedStore) -> Result<()> {
    let scores = HighScores::load(store);
    for mode in GameMode::ALL {
        println!(
            "{:<12} {}",
            mode.display_name(),
            scores.get(mode).unwrap_or(0)
        );
    }
    Ok(())
}
