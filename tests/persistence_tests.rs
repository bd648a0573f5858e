//! File-backed progress through a real round.

mod common;

use common::{init_logging, matching_pair, ms, plain_catalog};
use creature_match::core::{EngineConfig, GameMode, PlayerSlot};
use creature_match::providers::{
    CatalogProvider, FileStore, PersistenceStore, RecordingSleeper, StaticCatalog,
};
use creature_match::round::{RoundController, RoundPhase};
use tempfile::TempDir;

type FileController = RoundController<CatalogProvider<StaticCatalog, RecordingSleeper>, FileStore>;

fn file_controller(config: EngineConfig, store: FileStore) -> FileController {
    init_logging();
    let provider = CatalogProvider::new(plain_catalog()).with_sleeper(RecordingSleeper::new());
    RoundController::new(config, provider, store)
}

fn clear_board(controller: &mut FileController) {
    while let Some(pair) = controller.board(PlayerSlot::Player1).and_then(matching_pair) {
        assert!(pick_pair_file(controller, pair));
        controller.advance(ms(1000)).unwrap();
    }
}

fn pick_pair_file(controller: &mut FileController, [a, b]: [usize; 2]) -> bool {
    controller.pick_card(a) && controller.pick_card(b)
}

#[test]
fn test_progress_survives_a_new_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress").join("save.bin");

    let mut controller = file_controller(EngineConfig::default(), FileStore::new(&path));
    controller.start_round(GameMode::Single).unwrap();
    clear_board(&mut controller);
    controller.advance(ms(800 + 3000)).unwrap();
    assert_eq!(controller.session().unwrap().level(), 2);
    let score = controller.session().unwrap().score(PlayerSlot::Player1);
    assert!(score > 0);
    drop(controller);

    let mut reopened = FileStore::new(&path);
    assert_eq!(reopened.high_score(GameMode::Single), score);
    assert_eq!(reopened.highest_level_reached(), 2);
    assert_eq!(reopened.high_score(GameMode::VsComputer), 0);
}

#[test]
fn test_stored_record_must_be_beaten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.bin");
    FileStore::new(&path).set_high_score(GameMode::Single, 1000).unwrap();

    let config = EngineConfig::default().with_final_level(Some(1));
    let mut controller = file_controller(config, FileStore::new(&path));
    controller.start_round(GameMode::Single).unwrap();
    clear_board(&mut controller);
    controller.advance(ms(800)).unwrap();

    assert_eq!(controller.phase(), RoundPhase::RoundComplete);
    assert!(!controller.session().unwrap().is_new_high_score());
    assert_eq!(controller.store_mut().high_score(GameMode::Single), 1000);
}

#[test]
fn test_corrupt_save_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.bin");
    std::fs::write(&path, b"not a save file").unwrap();

    let mut controller = file_controller(EngineConfig::default(), FileStore::new(&path));
    controller.start_round(GameMode::Single).unwrap();
    let pair = controller.board(PlayerSlot::Player1).and_then(matching_pair).unwrap();
    assert!(pick_pair_file(&mut controller, pair));
    controller.advance(ms(1000)).unwrap();

    assert_eq!(FileStore::new(&path).high_score(GameMode::Single), 10);
}

#[test]
fn test_clear_all_forgets_progress() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.bin");
    let mut store = FileStore::new(&path);
    store.set_high_score(GameMode::Multiplayer, 40).unwrap();
    store.set_highest_level_reached(7).unwrap();

    store.clear_all().unwrap();

    assert!(!path.exists());
    let mut reopened = FileStore::new(&path);
    assert_eq!(reopened.high_score(GameMode::Multiplayer), 0);
    assert_eq!(reopened.highest_level_reached(), 1);
}
