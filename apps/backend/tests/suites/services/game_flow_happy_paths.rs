//! Commands through the full pipeline: validate, persist, sequence, publish.

use koikoi_backend::domain::game::GameStatus;
use koikoi_backend::domain::round::{Decision, FlowState, RoundEndReason};
use koikoi_backend::error::AppError;
use koikoi_backend::errors::ErrorCode;
use koikoi_backend::protocol::GameEvent;

use crate::support::game_setup::{
    card, double_layout, event_names, hanami_layout, instant_rules_config, quiet_config,
    started_game, teshi_layout, triple_layout, ALICE, BOB,
};

#[tokio::test]
async fn second_join_starts_and_deals() -> Result<(), AppError> {
    let (game, events) = started_game(quiet_config(), vec![triple_layout()]).await?;

    assert_eq!(event_names(&events), ["game_started", "round_dealt"]);
    // alice's join emitted seq 1
    assert_eq!(events[0].seq, 2);
    assert_eq!(events[1].seq, 3);

    let GameEvent::RoundDealt {
        round_no,
        dealer_id,
        hands,
        field,
        deck_remaining,
        next_state,
        ..
    } = &events[1].event
    else {
        panic!("expected round_dealt, got {:?}", events[1].event);
    };
    assert_eq!(*round_no, 1);
    assert_eq!(dealer_id, ALICE);
    assert_eq!(hands[ALICE].len(), 8);
    assert_eq!(hands[BOB].len(), 8);
    assert_eq!(field.len(), 8);
    assert_eq!(*deck_remaining, 24);
    assert_eq!(next_state.flow_state, FlowState::AwaitingHandPlay);
    assert_eq!(next_state.active_player_id, ALICE);

    let snapshot = game.service.get_snapshot(&game.game_id).await?;
    assert_eq!(snapshot.status, GameStatus::InProgress);
    assert_eq!(snapshot.event_seq, 3);
    Ok(())
}

#[tokio::test]
async fn triple_match_captures_all_four() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![triple_layout()]).await?;

    let events = game
        .service
        .play_hand_card(&game.game_id, ALICE, card("0111"), None)
        .await?;
    assert_eq!(event_names(&events), ["turn_completed"]);

    let GameEvent::TurnCompleted {
        hand_card_play,
        draw_card_play,
        deck_remaining,
        next_state,
        ..
    } = &events[0].event
    else {
        panic!("expected turn_completed");
    };
    assert_eq!(hand_card_play.as_ref().unwrap().captured_cards.len(), 4);
    assert_eq!(draw_card_play.as_ref().unwrap().played_card, card("1211"));
    assert_eq!(*deck_remaining, 23);
    assert_eq!(next_state.active_player_id, BOB);

    let snapshot = game.service.get_snapshot(&game.game_id).await?;
    let round = snapshot.current_round.unwrap();
    assert_eq!(round.player_state(ALICE).unwrap().depository.len(), 4);
    assert!(round.cards_conserved());
    Ok(())
}

#[tokio::test]
async fn double_matches_wait_for_selection() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![double_layout()]).await?;
    let svc = &game.service;

    let events = svc
        .play_hand_card(&game.game_id, ALICE, card("0341"), None)
        .await?;
    assert_eq!(event_names(&events), ["selection_required"]);
    let GameEvent::SelectionRequired {
        possible_targets, ..
    } = &events[0].event
    else {
        panic!("expected selection_required");
    };
    assert_eq!(possible_targets, &vec![card("0311"), card("0331")]);

    // hand side resolved; the drawn 1041 now double-matches October
    let events = svc
        .select_target(&game.game_id, ALICE, card("0341"), card("0331"))
        .await?;
    assert_eq!(event_names(&events), ["selection_required"]);

    let events = svc
        .select_target(&game.game_id, ALICE, card("1041"), card("1031"))
        .await?;
    assert_eq!(event_names(&events), ["turn_progress_after_selection"]);
    let GameEvent::TurnProgressAfterSelection {
        hand_card_play,
        draw_card_play,
        next_state,
        ..
    } = &events[0].event
    else {
        panic!("expected turn_progress_after_selection");
    };
    assert_eq!(
        hand_card_play.as_ref().unwrap().captured_cards,
        vec![card("0331"), card("0341")]
    );
    assert_eq!(
        draw_card_play.as_ref().unwrap().captured_cards,
        vec![card("1031"), card("1041")]
    );
    assert_eq!(next_state.active_player_id, BOB);
    Ok(())
}

#[tokio::test]
async fn end_round_scores_and_next_round_waits_for_both() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![hanami_layout()]).await?;
    let svc = &game.service;

    let events = svc
        .play_hand_card(&game.game_id, ALICE, card("0341"), None)
        .await?;
    assert_eq!(event_names(&events), ["decision_required"]);

    let events = svc
        .make_decision(&game.game_id, ALICE, Decision::EndRound)
        .await?;
    assert_eq!(event_names(&events), ["decision_made", "round_ended"]);
    let GameEvent::RoundEnded {
        reason,
        scoring_data,
        updated_total_scores,
        display_timeout_seconds,
        ..
    } = &events[1].event
    else {
        panic!("expected round_ended");
    };
    assert_eq!(*reason, RoundEndReason::Scored);
    assert_eq!(scoring_data.as_ref().unwrap().score.final_score, 3);
    assert_eq!(updated_total_scores[ALICE], 3);
    assert_eq!(updated_total_scores[BOB], 0);
    assert_eq!(*display_timeout_seconds, None);

    let snapshot = svc.get_snapshot(&game.game_id).await?;
    assert!(snapshot.current_round.is_none());
    assert_eq!(snapshot.rounds_played, 1);
    assert_eq!(snapshot.dealer_id.as_deref(), Some(BOB));

    let events = svc.confirm_continue(&game.game_id, ALICE).await?;
    assert_eq!(event_names(&events), ["continue_confirmed"]);
    // confirming twice changes nothing
    assert!(svc.confirm_continue(&game.game_id, ALICE).await?.is_empty());

    let events = svc.confirm_continue(&game.game_id, BOB).await?;
    assert_eq!(event_names(&events), ["round_dealt"]);
    let GameEvent::RoundDealt {
        round_no,
        dealer_id,
        next_state,
        ..
    } = &events[0].event
    else {
        panic!("expected round_dealt");
    };
    assert_eq!(*round_no, 2);
    assert_eq!(dealer_id, BOB);
    assert_eq!(next_state.active_player_id, BOB);
    Ok(())
}

#[tokio::test]
async fn koikoi_doubles_the_next_score() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![hanami_layout()]).await?;
    let svc = &game.service;

    svc.play_hand_card(&game.game_id, ALICE, card("0341"), None)
        .await?;
    let events = svc
        .make_decision(&game.game_id, ALICE, Decision::KoiKoi)
        .await?;
    assert_eq!(event_names(&events), ["decision_made"]);
    let GameEvent::DecisionMade {
        updated_multipliers,
        next_state,
        ..
    } = &events[0].event
    else {
        panic!("expected decision_made");
    };
    assert_eq!(updated_multipliers.koi_multiplier, 2);
    assert_eq!(next_state.active_player_id, BOB);
    assert_eq!(next_state.flow_state, FlowState::AwaitingHandPlay);
    Ok(())
}

#[tokio::test]
async fn leaving_hands_the_game_to_the_opponent() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![triple_layout()]).await?;

    let events = game.service.leave_game(&game.game_id, BOB).await?;
    assert_eq!(event_names(&events), ["game_finished"]);
    let GameEvent::GameFinished { winner_id, .. } = &events[0].event else {
        panic!("expected game_finished");
    };
    assert_eq!(winner_id.as_deref(), Some(ALICE));

    let snapshot = game.service.get_snapshot(&game.game_id).await?;
    assert_eq!(snapshot.status, GameStatus::Finished);
    assert!(snapshot.current_round.is_none());
    assert_eq!(game.service.pending_timeout(&game.game_id), None);
    Ok(())
}

#[tokio::test]
async fn last_round_finishes_the_game() -> Result<(), AppError> {
    let mut config = quiet_config();
    config.total_rounds = 1;
    let (game, _) = started_game(config, vec![hanami_layout()]).await?;
    let svc = &game.service;

    svc.play_hand_card(&game.game_id, ALICE, card("0341"), None)
        .await?;
    let events = svc
        .make_decision(&game.game_id, ALICE, Decision::EndRound)
        .await?;
    assert_eq!(
        event_names(&events),
        ["decision_made", "round_ended", "game_finished"]
    );
    let GameEvent::GameFinished {
        winner_id,
        final_scores,
    } = &events[2].event
    else {
        panic!("expected game_finished");
    };
    assert_eq!(winner_id.as_deref(), Some(ALICE));
    assert_eq!(final_scores[ALICE], 3);

    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, [5, 6, 7]);
    Ok(())
}

#[tokio::test]
async fn teshi_at_the_deal_ends_the_round_unplayed() -> Result<(), AppError> {
    let (game, events) = started_game(instant_rules_config(), vec![teshi_layout()]).await?;

    assert_eq!(
        event_names(&events),
        ["game_started", "round_dealt", "round_ended"]
    );
    let GameEvent::RoundDealt { next_state, .. } = &events[1].event else {
        panic!("expected round_dealt");
    };
    assert_eq!(next_state.flow_state, FlowState::RoundEnded);

    let GameEvent::RoundEnded {
        reason,
        scoring_data,
        updated_total_scores,
        ..
    } = &events[2].event
    else {
        panic!("expected round_ended");
    };
    assert_eq!(*reason, RoundEndReason::InstantTeshi);
    let scoring = scoring_data.as_ref().unwrap();
    assert_eq!(scoring.winner_id.as_deref(), Some(ALICE));
    assert!(scoring.yaku.is_empty());
    assert_eq!(scoring.score.base_score, 6);
    assert_eq!(scoring.score.koi_multiplier, 1);
    assert!(!scoring.score.is_doubled);
    assert_eq!(scoring.score.final_score, 6);
    assert_eq!(updated_total_scores[ALICE], 6);
    assert_eq!(updated_total_scores[BOB], 0);

    let snapshot = game.service.get_snapshot(&game.game_id).await?;
    assert_eq!(snapshot.status, GameStatus::InProgress);
    assert!(snapshot.current_round.is_none());
    assert_eq!(snapshot.rounds_played, 1);
    assert_eq!(snapshot.dealer_id.as_deref(), Some(BOB));

    // the table waits on confirmations like after a played round
    let err = game
        .service
        .play_hand_card(&game.game_id, ALICE, card("0421"), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    Ok(())
}

#[tokio::test]
async fn teshi_in_the_only_round_finishes_the_game() -> Result<(), AppError> {
    let mut config = instant_rules_config();
    config.total_rounds = 1;
    let (game, events) = started_game(config, vec![teshi_layout()]).await?;

    assert_eq!(
        event_names(&events),
        ["game_started", "round_dealt", "round_ended", "game_finished"]
    );
    let GameEvent::GameFinished {
        winner_id,
        final_scores,
    } = &events[3].event
    else {
        panic!("expected game_finished");
    };
    assert_eq!(winner_id.as_deref(), Some(ALICE));
    assert_eq!(final_scores[ALICE], 6);

    let snapshot = game.service.get_snapshot(&game.game_id).await?;
    assert_eq!(snapshot.status, GameStatus::Finished);
    assert!(snapshot.current_round.is_none());
    Ok(())
}
