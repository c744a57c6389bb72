//! Whole matches between bots, start to finish.

use koikoi_backend::ai::{GreedyPlayer, RandomPlayer, SelfPlay};
use koikoi_backend::domain::game::GameStatus;
use koikoi_backend::error::AppError;
use koikoi_backend::protocol::GameEvent;
use koikoi_backend::EngineConfig;
use koikoi_backend::GameFlowService;

use backend_test_support::unique_helpers::unique_game_id;

fn config(total_rounds: u32) -> EngineConfig {
    EngineConfig {
        action_timeout_seconds: 0,
        display_timeout_seconds: 0,
        total_rounds,
        deterministic_deck: false,
        special_rules: true,
    }
}

#[tokio::test]
async fn bots_play_a_match_to_the_end() -> Result<(), AppError> {
    let service = GameFlowService::in_memory(config(3));
    let game_id = unique_game_id();
    let mut feed = service.subscribe(&game_id);

    let snapshot = SelfPlay::new(service.clone(), game_id.clone())
        .seat("greedy", "Greedy", Box::new(GreedyPlayer::new()))
        .seat("random", "Random", Box::new(RandomPlayer::new(Some(42))))
        .run(2_000)
        .await?;

    assert_eq!(snapshot.status, GameStatus::Finished);
    assert_eq!(snapshot.rounds_played, 3);

    let mut events = Vec::new();
    while let Ok(envelope) = feed.receiver.try_recv() {
        events.push(envelope);
    }
    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    let expected: Vec<u64> = (1..=snapshot.event_seq).collect();
    assert_eq!(seqs, expected, "event stream must be gapless and ordered");

    let rounds_ended = events
        .iter()
        .filter(|e| matches!(e.event, GameEvent::RoundEnded { .. }))
        .count();
    assert_eq!(rounds_ended, 3);
    match &events.last().unwrap().event {
        GameEvent::GameFinished { final_scores, .. } => {
            assert_eq!(final_scores, &snapshot.cumulative_scores);
        }
        other => panic!("last event should finish the game, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn seeded_bots_replay_identically() -> Result<(), AppError> {
    let mut cfg = config(2);
    cfg.deterministic_deck = true;
    // catalog order deals four-of-a-month hands
    cfg.special_rules = false;

    let mut finals = Vec::new();
    for _ in 0..2 {
        let service = GameFlowService::in_memory(cfg.clone());
        let snapshot = SelfPlay::new(service, unique_game_id())
            .seat("a", "A", Box::new(RandomPlayer::new(Some(7))))
            .seat("b", "B", Box::new(RandomPlayer::new(Some(8))))
            .run(2_000)
            .await?;
        finals.push(snapshot.cumulative_scores);
    }
    assert_eq!(finals[0], finals[1]);
    Ok(())
}
