//! Rejected commands: right error code, nothing persisted, nothing emitted.

use koikoi_backend::domain::round::Decision;
use koikoi_backend::error::AppError;
use koikoi_backend::errors::ErrorCode;
use koikoi_backend::protocol::{CommandKind, GameCommand, GameEvent, SuggestedAction};

use crate::support::game_setup::{card, quiet_config, started_game, triple_layout, ALICE, BOB};

fn code_of<T: std::fmt::Debug>(result: Result<T, AppError>) -> ErrorCode {
    result.unwrap_err().code()
}

#[tokio::test]
async fn rule_violations_map_to_turn_errors() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![triple_layout()]).await?;
    let svc = &game.service;
    let id = game.game_id.as_str();
    let before = svc.get_snapshot(id).await?;
    let mut feed = svc.subscribe(id);

    assert_eq!(
        code_of(svc.play_hand_card(id, BOB, card("0241"), None).await),
        ErrorCode::WrongPlayer
    );
    assert_eq!(
        code_of(svc.play_hand_card(id, ALICE, card("0241"), None).await),
        ErrorCode::InvalidCard
    );
    assert_eq!(
        code_of(svc.select_target(id, ALICE, card("0111"), card("0131")).await),
        ErrorCode::InvalidState
    );
    assert_eq!(
        code_of(svc.make_decision(id, ALICE, Decision::KoiKoi).await),
        ErrorCode::InvalidState
    );
    assert_eq!(
        code_of(svc.confirm_continue(id, ALICE).await),
        ErrorCode::InvalidState
    );

    let err = svc
        .play_hand_card(id, ALICE, card("0241"), None)
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
    match err.to_error_event() {
        GameEvent::TurnError { error_code, .. } => assert_eq!(error_code, ErrorCode::InvalidCard),
        other => panic!("expected turn_error, got {other:?}"),
    }

    assert_eq!(svc.get_snapshot(id).await?, before);
    assert!(feed.receiver.try_recv().is_err());
    Ok(())
}

#[tokio::test]
async fn unknown_game_is_not_recoverable() {
    let (game, _) = started_game(quiet_config(), vec![triple_layout()])
        .await
        .unwrap();
    let err = game
        .service
        .execute(GameCommand::new(
            "no-such-game",
            ALICE,
            CommandKind::PlayHandCard {
                card_id: card("0111"),
                selected_target: None,
            },
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    assert!(!err.is_recoverable());
    match err.to_error_event() {
        GameEvent::GameError {
            recoverable,
            suggested_action,
            ..
        } => {
            assert!(!recoverable);
            assert_eq!(suggested_action, SuggestedAction::ReturnToMatchmaking);
        }
        other => panic!("expected game_error, got {other:?}"),
    }
    assert_eq!(
        game.service.get_snapshot("no-such-game").await.unwrap_err().code(),
        ErrorCode::GameNotFound
    );
}

#[tokio::test]
async fn seats_are_validated() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![triple_layout()]).await?;
    let svc = &game.service;
    let id = game.game_id.as_str();

    assert_eq!(
        code_of(svc.join_game(id, "carol", "Carol", None).await),
        ErrorCode::InvalidState
    );
    assert_eq!(
        code_of(svc.join_game(id, "dave", "   ", None).await),
        ErrorCode::ValidationError
    );
    assert_eq!(
        code_of(svc.leave_game(id, "carol").await),
        ErrorCode::WrongPlayer
    );
    assert_eq!(
        code_of(svc.confirm_continue(id, "carol").await),
        ErrorCode::WrongPlayer
    );
    Ok(())
}

#[tokio::test]
async fn commands_deserialize_from_wire_json() -> Result<(), AppError> {
    let (game, _) = started_game(quiet_config(), vec![triple_layout()]).await?;
    let raw = format!(
        r#"{{"game_id":"{}","player_id":"alice","kind":{{"type":"play_hand_card","card_id":"0111"}}}}"#,
        game.game_id
    );
    let command: GameCommand = serde_json::from_str(&raw).unwrap();
    let events = game.service.execute(command).await?;
    assert_eq!(events[0].event.name(), "turn_completed");

    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["event"]["type"], "turn_completed");
    assert_eq!(json["event"]["next_state"]["flow_state"], "AWAITING_HAND_PLAY");
    Ok(())
}
