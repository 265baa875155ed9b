//! `match_runner`: the external front door for a match (SPEC_FULL.md §4.9).
//!
//! Parses a `MatchConfig` overlay from CLI flags (and, optionally, a TOML
//! file), creates the two named shared-memory regions, spawns the two
//! player processes, seeds the authoritative `State`, and drives
//! `MainDriver` to completion. Prints the `GameResult` as JSON (or pretty
//! text with `--pretty`) and exits with a status reflecting the winner, so
//! the binary is scriptable from a tournament harness.

mod map_file;

use std::path::PathBuf;
use std::process::Command;

use cc_core::{player2_base_position, PlayerId, PLAYER1_BASE_POSITION, SHM_FILE_NAMES};
use cc_drivers::{GameResult, MainDriver, MatchConfig, PlayerStatus, SharedMemoryMain, WinType};
use cc_logger::ProtobufReplayLogger;
use cc_state::State;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// CLI overlay on top of `MatchConfig`'s compiled-in defaults. Precedence
/// is compiled defaults -> `--config` TOML file -> these flags
/// (SPEC_FULL.md §4.8).
#[derive(Parser, Debug)]
#[command(name = "match_runner")]
#[command(about = "Runs one deterministic two-player match and writes its replay")]
struct Args {
    /// TOML file overlaying the compiled-in `MatchConfig` defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Alternate map file; omit to use the bundled default map.
    #[arg(long)]
    map_path: Option<PathBuf>,

    /// Player 1's command line, e.g. `--player1 "python3 bot1.py"`.
    #[arg(long)]
    player1: Option<String>,

    /// Player 2's command line.
    #[arg(long)]
    player2: Option<String>,

    #[arg(long)]
    num_turns: Option<u64>,

    #[arg(long)]
    game_duration_ms: Option<u64>,

    /// Where to write the length-delimited protobuf replay.
    #[arg(long)]
    replay_path: Option<PathBuf>,

    /// Print the result as human-readable text instead of JSON.
    #[arg(long)]
    pretty: bool,
}

fn load_config(args: &Args) -> Result<MatchConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            toml::from_str(&text)?
        }
        None => MatchConfig::default(),
    };

    if let Some(path) = &args.map_path {
        config.map_path = Some(path.clone());
    }
    if let Some(cmd) = &args.player1 {
        config.player_commands[PlayerId::Player1.index()] =
            cmd.split_whitespace().map(str::to_string).collect();
    }
    if let Some(cmd) = &args.player2 {
        config.player_commands[PlayerId::Player2.index()] =
            cmd.split_whitespace().map(str::to_string).collect();
    }
    if let Some(n) = args.num_turns {
        config.num_turns = n;
    }
    if let Some(ms) = args.game_duration_ms {
        config.game_duration_ms = ms;
    }
    if let Some(path) = &args.replay_path {
        config.replay_path = path.clone();
    }
    Ok(config)
}

fn spawn_player(argv: &[String]) -> Result<std::process::Child, Box<dyn std::error::Error>> {
    let (program, rest) = argv.split_first().ok_or("player command line is empty")?;
    Ok(Command::new(program).args(rest).spawn()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let map = match &config.map_path {
        Some(path) => map_file::load(path)?,
        None => map_file::default_map(),
    };

    let shared = [
        SharedMemoryMain::create(&config.shared_memory_names[0])?,
        SharedMemoryMain::create(&config.shared_memory_names[1])?,
    ];
    shared[0].write_name_file(&PathBuf::from(SHM_FILE_NAMES[0]))?;
    shared[1].write_name_file(&PathBuf::from(SHM_FILE_NAMES[1]))?;

    tracing::info!(
        shm1 = config.shared_memory_names[0],
        shm2 = config.shared_memory_names[1],
        "shared-memory regions ready"
    );

    let child1 = spawn_player(&config.player_commands[0])?;
    let child2 = spawn_player(&config.player_commands[1])?;
    let child_pids = [child1.id() as i32, child2.id() as i32];

    let mut state = State::new(map);
    let base_positions = [PLAYER1_BASE_POSITION.to_double(), player2_base_position().to_double()];
    state.seed_starting_bots(config.num_bots_start, base_positions);

    let logger = ProtobufReplayLogger::new(state.map().cells().to_vec());

    let driver = MainDriver::new(config, state, Box::new(logger), shared, child_pids);
    let result = driver.start()?;

    if args.pretty {
        print_pretty(&result);
    } else {
        println!("{}", to_json(&result));
    }

    std::process::exit(exit_code(&result));
}

fn exit_code(result: &GameResult) -> i32 {
    match result.winner {
        Some(PlayerId::Player1) => 0,
        Some(PlayerId::Player2) => 1,
        _ => 2,
    }
}

fn winner_label(winner: Option<PlayerId>) -> &'static str {
    match winner {
        Some(PlayerId::Player1) => "player1",
        Some(PlayerId::Player2) => "player2",
        _ => "none",
    }
}

fn win_type_label(win_type: WinType) -> &'static str {
    match win_type {
        WinType::Score => "score",
        WinType::Timeout => "timeout",
        WinType::ExceededInstructionLimit => "exceeded_instruction_limit",
        WinType::None => "none",
    }
}

fn status_label(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Normal => "normal",
        PlayerStatus::Timeout => "timeout",
        PlayerStatus::ExceededInstructionLimit => "exceeded_instruction_limit",
        PlayerStatus::RuntimeError => "runtime_error",
        PlayerStatus::Undefined => "undefined",
    }
}

fn to_json(result: &GameResult) -> serde_json::Value {
    serde_json::json!({
        "winner": winner_label(result.winner),
        "win_type": win_type_label(result.win_type),
        "players": [
            { "status": status_label(result.player_results[0].status), "score": result.player_results[0].score },
            { "status": status_label(result.player_results[1].status), "score": result.player_results[1].score },
        ],
    })
}

fn print_pretty(result: &GameResult) {
    println!("winner:   {}", winner_label(result.winner));
    println!("win_type: {}", win_type_label(result.win_type));
    for (i, player_result) in result.player_results.iter().enumerate() {
        println!(
            "player{}:  status={} score={}",
            i + 1,
            status_label(player_result.status),
            player_result.score
        );
    }
}
