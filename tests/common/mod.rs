//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use creature_match::board::Board;
use creature_match::cards::Card;
use creature_match::core::{EngineConfig, PlayerSlot};
use creature_match::providers::{CatalogProvider, MemoryStore, RecordingSleeper, StaticCatalog};
use creature_match::round::RoundController;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

pub type TestController =
    RoundController<CatalogProvider<StaticCatalog, RecordingSleeper>, MemoryStore>;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once. Level comes from `TEST_LOG`, then
/// `RUST_LOG`, then `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A catalog large enough for every level offset, without evolutions.
pub fn plain_catalog() -> StaticCatalog {
    StaticCatalog::generated(1500)
}

/// Same size, with three-stage evolution chains.
pub fn evolving_catalog() -> StaticCatalog {
    StaticCatalog::generated(1500).with_generated_evolutions()
}

pub fn controller(config: EngineConfig) -> TestController {
    controller_with(config, plain_catalog())
}

pub fn controller_with(config: EngineConfig, catalog: StaticCatalog) -> TestController {
    init_logging();
    let provider = CatalogProvider::new(catalog).with_sleeper(RecordingSleeper::new());
    RoundController::new(config, provider, MemoryStore::new())
}

pub fn board(controller: &TestController, slot: PlayerSlot) -> &Board {
    controller.board(slot).expect("boards are dealt")
}

pub fn active_board(controller: &TestController) -> &Board {
    let slot = controller.active_player().expect("round in progress");
    board(controller, slot)
}

fn pair_where(board: &Board, accept: impl Fn(&Card) -> bool) -> Option<[usize; 2]> {
    let available = board.available_positions();
    for (i, &a) in available.iter().enumerate() {
        let card = board.card(a)?;
        if !accept(card) {
            continue;
        }
        let partner = available[i + 1..]
            .iter()
            .copied()
            .find(|&b| board.card(b).map(Card::creature_id) == Some(card.creature_id()));
        if let Some(b) = partner {
            return Some([a, b]);
        }
    }
    None
}

/// Two available cards of the same creature.
pub fn matching_pair(board: &Board) -> Option<[usize; 2]> {
    pair_where(board, |_| true)
}

/// A matching pair that will not evolve.
pub fn plain_pair(board: &Board) -> Option<[usize; 2]> {
    pair_where(board, |card| card.evolution_target().is_none())
}

/// A matching pair that evolves when matched.
pub fn evolving_pair(board: &Board) -> Option<[usize; 2]> {
    pair_where(board, |card| card.evolution_target().is_some())
}

/// Two available cards of different creatures.
pub fn mismatched_pair(board: &Board) -> Option<[usize; 2]> {
    let available = board.available_positions();
    let first = *available.first()?;
    let creature = board.card(first)?.creature_id();
    let second = available
        .iter()
        .copied()
        .find(|&i| board.card(i).map(Card::creature_id) != Some(creature))?;
    Some([first, second])
}

/// Flip both cards for the human on turn. Returns whether both were accepted.
pub fn pick_pair(controller: &mut TestController, [a, b]: [usize; 2]) -> bool {
    controller.pick_card(a) && controller.pick_card(b)
}

/// Match every remaining pair on the active board, resolving evolutions.
/// Leaves the level-complete step pending.
pub fn clear_active_board(controller: &mut TestController) {
    let slot = controller.active_player().expect("round in progress");
    while let Some(pair) = matching_pair(board(controller, slot)) {
        assert!(pick_pair(controller, pair));
        controller.advance(ms(1000)).unwrap();
        if board(controller, slot).pending_evolution().is_some() {
            assert!(controller.resolve_evolution(slot));
        }
    }
}
