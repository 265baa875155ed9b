//! Black-box `MainDriver` scenarios against the public API only, matching
//! the corpus's `tests/integration.rs` convention (SPEC_FULL.md §8).
//!
//! Real player processes are replaced by `NullPlayer` threads that open the
//! same named shared-memory region the host created and simply clear the
//! baton, optionally never releasing it (to drive the timeout/cancellation
//! scenarios) or reporting instruction counts above budget.

use std::process::{Child, Command};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cc_drivers::{MainDriver, MatchConfig, PlayerStatus, SharedMemoryMain, WinType};
use cc_state::{Map, NullLogger, State};

fn unique_name(tag: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("cc-drivers-test-{tag}-{}-{nanos}", std::process::id())
}

/// A real child process standing in for a player's OS process, so SIGTERM
/// delivery in the timeout scenario has a legitimate target.
fn sleeper_child() -> Child {
    Command::new("sleep").arg("30").spawn().expect("spawn a throwaway sleep(1) child")
}

/// Runs a `NullPlayer`: opens the host's region by name and immediately
/// clears the baton every time it observes the host setting it, until
/// `stop` is raised. `always_busy` players never clear the baton (used to
/// drive the timeout/cancellation scenarios).
fn spawn_null_player(name: String, stop: Arc<AtomicBool>, always_busy: bool) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let region = SharedMemoryMain::open(&name).expect("open region opened by the host");
        while !stop.load(Ordering::Acquire) {
            if region.buffer().is_player_running.load(Ordering::Acquire) && !always_busy {
                region.buffer().is_player_running.store(false, Ordering::Release);
            }
            thread::sleep(Duration::from_millis(1));
        }
    })
}

fn base_config(num_turns: u64, game_duration_ms: u64) -> MatchConfig {
    let mut config = MatchConfig::default();
    config.num_turns = num_turns;
    config.game_duration_ms = game_duration_ms;
    config
}

#[tokio::test]
async fn score_tie_after_a_full_match_with_no_bots() {
    let name1 = unique_name("tie-p1");
    let name2 = unique_name("tie-p2");
    let host = [SharedMemoryMain::create(&name1).unwrap(), SharedMemoryMain::create(&name2).unwrap()];

    let stop = Arc::new(AtomicBool::new(false));
    let players = [
        spawn_null_player(name1, stop.clone(), false),
        spawn_null_player(name2, stop.clone(), false),
    ];

    let mut child1 = sleeper_child();
    let mut child2 = sleeper_child();

    let state = State::new(Map::empty(20));
    let config = base_config(3, 5_000);
    let driver = MainDriver::new(config, state, Box::new(NullLogger), host, [child1.id() as i32, child2.id() as i32]);

    let result =
        tokio::task::spawn_blocking(move || driver.start()).await.expect("join").expect("no host error");

    assert_eq!(result.win_type, WinType::Score);
    assert_eq!(result.winner, None, "neither player scored, so the match ties");
    assert_eq!(result.player_results[0].score, 0);
    assert_eq!(result.player_results[1].score, 0);

    stop.store(true, Ordering::Release);
    for player in players {
        let _ = player.join();
    }
    let _ = child1.kill();
    let _ = child2.kill();
}

#[tokio::test]
async fn clean_timeout_win_when_one_player_never_releases_the_baton() {
    let name1 = unique_name("timeout-p1");
    let name2 = unique_name("timeout-p2");
    let host = [SharedMemoryMain::create(&name1).unwrap(), SharedMemoryMain::create(&name2).unwrap()];

    let stop = Arc::new(AtomicBool::new(false));
    let players = [
        spawn_null_player(name1, stop.clone(), false),
        // Player 2 never releases the baton: stands in for S1.
        spawn_null_player(name2, stop.clone(), true),
    ];

    let mut child1 = sleeper_child();
    let mut child2 = sleeper_child();

    let state = State::new(Map::empty(20));
    // A short deadline keeps the test fast; the turn loop's own budget
    // checks are independent of wall-clock turn count.
    let config = base_config(1000, 50);
    let driver = MainDriver::new(config, state, Box::new(NullLogger), host, [child1.id() as i32, child2.id() as i32]);

    let result =
        tokio::task::spawn_blocking(move || driver.start()).await.expect("join").expect("no host error");

    assert_eq!(result.win_type, WinType::Timeout);
    assert_eq!(result.winner, Some(cc_core::PlayerId::Player1));
    assert_eq!(result.player_results[1].status, PlayerStatus::Timeout);

    stop.store(true, Ordering::Release);
    for player in players {
        let _ = player.join();
    }
    let _ = child1.kill();
    let _ = child2.kill();
}

#[tokio::test]
async fn cancellation_mid_turn_yields_an_undefined_result() {
    let name1 = unique_name("cancel-p1");
    let name2 = unique_name("cancel-p2");
    let host = [SharedMemoryMain::create(&name1).unwrap(), SharedMemoryMain::create(&name2).unwrap()];

    let stop = Arc::new(AtomicBool::new(false));
    // Both players stall, so the driver is guaranteed to still be spinning
    // on the baton when the cancel flag lands.
    let players = [
        spawn_null_player(name1, stop.clone(), true),
        spawn_null_player(name2, stop.clone(), true),
    ];

    let mut child1 = sleeper_child();
    let mut child2 = sleeper_child();

    let state = State::new(Map::empty(20));
    let config = base_config(1000, 60_000);
    let driver = MainDriver::new(config, state, Box::new(NullLogger), host, [child1.id() as i32, child2.id() as i32]);
    let cancel = driver.cancel_handle();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        cancel.store(true, Ordering::Release);
    });

    let result =
        tokio::task::spawn_blocking(move || driver.start()).await.expect("join").expect("no host error");

    assert_eq!(result.win_type, WinType::None);
    assert_eq!(result.winner, None);
    assert_eq!(result.player_results[0].status, PlayerStatus::Undefined);
    assert_eq!(result.player_results[1].status, PlayerStatus::Undefined);

    stop.store(true, Ordering::Release);
    for player in players {
        let _ = player.join();
    }
    let _ = child1.kill();
    let _ = child2.kill();
}
