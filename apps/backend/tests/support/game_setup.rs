//! Game setup helpers for integration tests
//!
//! Builds a `GameFlowService` over an in-memory repository with prepared
//! decks, and seats two players.

use std::sync::Arc;

use backend_test_support::unique_helpers::unique_game_id;
use koikoi_backend::adapters::InMemoryGameRepository;
use koikoi_backend::domain::fixtures::CardFixtures;
use koikoi_backend::domain::CardId;
use koikoi_backend::error::AppError;
use koikoi_backend::realtime::GameEventHub;
use koikoi_backend::repos::GameRepository;
use koikoi_backend::services::deck_provider::FixedDeckProvider;
use koikoi_backend::{EngineConfig, EventEnvelope, GameFlowService};

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";

/// No timers, no instant special rules, two rounds.
pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        action_timeout_seconds: 0,
        display_timeout_seconds: 0,
        total_rounds: 2,
        deterministic_deck: false,
        special_rules: false,
    }
}

/// Default timers, no instant special rules, two rounds.
pub fn timed_config() -> EngineConfig {
    EngineConfig {
        total_rounds: 2,
        special_rules: false,
        ..EngineConfig::default()
    }
}

/// No timers, instant special rules on, two rounds.
pub fn instant_rules_config() -> EngineConfig {
    EngineConfig {
        special_rules: true,
        ..quiet_config()
    }
}

pub fn card(code: &str) -> CardId {
    CardFixtures::parse_hardcoded(&[code])[0]
}

/// Alice (dealer) sweeps the January triple with 0111; 1211 is drawn next.
pub fn triple_layout() -> Vec<CardId> {
    CardFixtures::arranged_deck(
        &["0111", "0221", "0231", "0421", "0521", "0621", "0721", "0821"],
        &["0241", "0242", "0431", "0531", "0631", "0731", "0841", "0921"],
        &["0131", "0141", "0142", "0311", "0331", "1021", "1031", "1111"],
        &["1211"],
    )
}

/// Alice's 0341 double-matches the March pair; 1041 drawn next double-matches October.
pub fn double_layout() -> Vec<CardId> {
    CardFixtures::arranged_deck(
        &["0111", "0221", "0231", "0341", "0421", "0521", "0621", "0721"],
        &["0241", "0242", "0431", "0531", "0631", "0731", "0841", "0921"],
        &["0131", "0141", "0142", "0311", "0331", "1021", "1031", "1111"],
        &["1041"],
    )
}

/// Alice's 0341 takes the cherry curtain and the drawn 0941 takes the sake
/// cup: Hanami-zake.
pub fn hanami_layout() -> Vec<CardId> {
    CardFixtures::arranged_deck(
        &["0111", "0221", "0231", "0341", "0421", "0521", "0621", "0721"],
        &["0241", "0242", "0431", "0531", "0631", "0731", "0841", "0821"],
        &["0311", "0921", "1021", "1111", "1211", "0131", "0441", "0541"],
        &["0941"],
    )
}

/// Alice (dealer) is dealt all four February cards; nothing else triggers.
pub fn teshi_layout() -> Vec<CardId> {
    CardFixtures::arranged_deck(
        &["0221", "0231", "0241", "0242", "0421", "0521", "0621", "0721"],
        &["0111", "0131", "0141", "0431", "0531", "0631", "0731", "0841"],
        &["0311", "0921", "1021", "1111", "1211", "0331", "0441", "0541"],
        &[],
    )
}

pub struct TestGame {
    pub service: GameFlowService,
    pub game_id: String,
    pub alice_token: String,
    pub bob_token: String,
}

pub fn service_with(
    config: EngineConfig,
    repo: Arc<dyn GameRepository>,
    decks: Vec<Vec<CardId>>,
) -> GameFlowService {
    GameFlowService::new(
        repo,
        Arc::new(GameEventHub::new()),
        Arc::new(FixedDeckProvider::new(decks)),
        config,
    )
}

/// Seat alice then bob on a fresh game. Returns the events of bob's join,
/// which start the game and deal round 1 from the first deck.
pub async fn started_game(
    config: EngineConfig,
    decks: Vec<Vec<CardId>>,
) -> Result<(TestGame, Vec<EventEnvelope>), AppError> {
    let service = service_with(config, Arc::new(InMemoryGameRepository::new()), decks);
    seat_both(service).await
}

pub async fn seat_both(service: GameFlowService) -> Result<(TestGame, Vec<EventEnvelope>), AppError> {
    let game_id = unique_game_id();
    let alice = service.join_game(&game_id, ALICE, "Alice", None).await?;
    let bob = service.join_game(&game_id, BOB, "Bob", None).await?;
    Ok((
        TestGame {
            service,
            game_id,
            alice_token: alice.session_token,
            bob_token: bob.session_token,
        },
        bob.events,
    ))
}

pub fn event_names(events: &[EventEnvelope]) -> Vec<&'static str> {
    events.iter().map(|e| e.event.name()).collect()
}
