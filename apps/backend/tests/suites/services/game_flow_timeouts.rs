//! Action and display timeouts re-enter the locked command path.

use std::sync::Arc;
use std::time::Duration;

use koikoi_backend::domain::round::{Decision, FlowState};
use koikoi_backend::error::AppError;
use koikoi_backend::protocol::GameEvent;

use crate::support::failing_repo::FailingRepository;
use crate::support::game_setup::{
    card, event_names, hanami_layout, seat_both, service_with, started_game, timed_config,
    triple_layout, ALICE, BOB,
};

#[tokio::test(start_paused = true)]
async fn idle_player_gets_the_default_play() -> Result<(), AppError> {
    let (game, _) = started_game(timed_config(), vec![triple_layout()]).await?;
    let mut feed = game.service.subscribe(&game.game_id);
    // alice's join moved nothing; bob's started the game
    assert_eq!(game.service.pending_timeout(&game.game_id), Some(1));

    tokio::time::sleep(Duration::from_secs(16)).await;

    // lowest hand card is 0111, which sweeps the January triple
    let forced = feed.receiver.try_recv().expect("timeout should have played");
    let GameEvent::TurnCompleted {
        player_id,
        hand_card_play,
        next_state,
        ..
    } = forced.event
    else {
        panic!("expected turn_completed, got {:?}", forced.event);
    };
    assert_eq!(player_id, ALICE);
    assert_eq!(hand_card_play.unwrap().played_card, card("0111"));
    assert_eq!(next_state.active_player_id, BOB);

    // and bob is now on the clock
    assert_eq!(game.service.pending_timeout(&game.game_id), Some(2));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn acting_first_disarms_the_timer() -> Result<(), AppError> {
    let (game, _) = started_game(timed_config(), vec![triple_layout()]).await?;

    tokio::time::sleep(Duration::from_secs(10)).await;
    game.service
        .play_hand_card(&game.game_id, ALICE, card("0221"), None)
        .await?;
    let after_play = game.service.get_snapshot(&game.game_id).await?;

    // alice's original deadline passes without effect
    tokio::time::sleep(Duration::from_secs(10)).await;
    let later = game.service.get_snapshot(&game.game_id).await?;
    assert_eq!(later.event_seq, after_play.event_seq);
    assert_eq!(
        later.current_round.unwrap().active_player_id,
        BOB.to_string()
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn pending_decision_times_out_to_end_round() -> Result<(), AppError> {
    let (game, _) = started_game(timed_config(), vec![hanami_layout()]).await?;
    let events = game
        .service
        .play_hand_card(&game.game_id, ALICE, card("0341"), None)
        .await?;
    let GameEvent::DecisionRequired {
        action_timeout_seconds,
        ..
    } = &events[0].event
    else {
        panic!("expected decision_required");
    };
    assert_eq!(*action_timeout_seconds, 15);
    let mut feed = game.service.subscribe(&game.game_id);

    tokio::time::sleep(Duration::from_secs(16)).await;

    let made = feed.receiver.try_recv().expect("decision forced");
    let GameEvent::DecisionMade { decision, .. } = made.event else {
        panic!("expected decision_made");
    };
    assert_eq!(decision, Decision::EndRound);
    let ended = feed.receiver.try_recv().expect("round ended");
    let GameEvent::RoundEnded {
        display_timeout_seconds,
        ..
    } = ended.event
    else {
        panic!("expected round_ended");
    };
    assert_eq!(display_timeout_seconds, Some(5));

    // the display timeout deals round 2 without confirmations
    tokio::time::sleep(Duration::from_secs(6)).await;
    let dealt = feed.receiver.try_recv().expect("next round dealt");
    let GameEvent::RoundDealt {
        round_no,
        next_state,
        ..
    } = dealt.event
    else {
        panic!("expected round_dealt");
    };
    assert_eq!(round_no, 2);
    assert_eq!(next_state.flow_state, FlowState::AwaitingHandPlay);
    assert_eq!(next_state.active_player_id, BOB);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rejoining_keeps_the_running_deadline() -> Result<(), AppError> {
    let (game, _) = started_game(timed_config(), vec![triple_layout()]).await?;
    let armed = game.service.pending_timeout(&game.game_id);

    // reconnecting every 7s must not push the 15s deadline out
    for _ in 0..2 {
        tokio::time::sleep(Duration::from_secs(7)).await;
        let rejoined = game
            .service
            .join_game(&game.game_id, ALICE, "Alice", Some(game.alice_token.clone()))
            .await?;
        assert_eq!(event_names(&rejoined.events), ["game_snapshot_restore"]);
        assert_eq!(game.service.pending_timeout(&game.game_id), armed);
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = game.service.get_snapshot(&game.game_id).await?;
    let round = snapshot.current_round.unwrap();
    assert_eq!(round.active_player_id, BOB.to_string());
    assert_eq!(round.deck.len(), 23);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn one_confirmation_keeps_the_display_deadline() -> Result<(), AppError> {
    let (game, _) = started_game(timed_config(), vec![hanami_layout()]).await?;
    let svc = &game.service;
    svc.play_hand_card(&game.game_id, ALICE, card("0341"), None)
        .await?;
    svc.make_decision(&game.game_id, ALICE, Decision::EndRound)
        .await?;
    let armed = svc.pending_timeout(&game.game_id);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let events = svc.confirm_continue(&game.game_id, BOB).await?;
    assert_eq!(event_names(&events), ["continue_confirmed"]);
    assert_eq!(svc.pending_timeout(&game.game_id), armed);

    // 5s after the round ended, not after the confirmation
    tokio::time::sleep(Duration::from_secs(3)).await;
    let snapshot = svc.get_snapshot(&game.game_id).await?;
    assert_eq!(snapshot.current_round.unwrap().round_no, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_forced_play_is_retried() -> Result<(), AppError> {
    let repo = Arc::new(FailingRepository::new());
    let service = service_with(timed_config(), repo.clone(), vec![triple_layout()]);
    let (game, _) = seat_both(service).await?;
    let armed = game.service.pending_timeout(&game.game_id);
    let mut feed = game.service.subscribe(&game.game_id);

    repo.fail_saves(true);
    tokio::time::sleep(Duration::from_millis(15_500)).await;
    assert!(feed.receiver.try_recv().is_err());
    // the first retry is armed one second out with the same marker
    assert_eq!(game.service.pending_timeout(&game.game_id), armed);

    repo.fail_saves(false);
    tokio::time::sleep(Duration::from_secs(1)).await;
    let forced = feed.receiver.try_recv().expect("retry should have played");
    let GameEvent::TurnCompleted { player_id, .. } = forced.event else {
        panic!("expected turn_completed, got {:?}", forced.event);
    };
    assert_eq!(player_id, ALICE);
    assert_ne!(game.service.pending_timeout(&game.game_id), armed);
    Ok(())
}
