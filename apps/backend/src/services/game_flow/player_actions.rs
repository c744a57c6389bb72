use tracing::{debug, info};

use super::mutation::LoadMode;
use super::GameFlowService;
use crate::domain::game::Game;
use crate::domain::round::{Decision, DecisionStep, RoundEndReason, TurnOutcome, TurnStep};
use crate::domain::CardId;
use crate::error::AppError;
use crate::protocol::{EventEnvelope, GameEvent, NextState, YakuUpdate};

impl GameFlowService {
    /// Play a card from the hand; the draw follows in the same command.
    pub async fn play_hand_card(
        &self,
        game_id: &str,
        player_id: &str,
        card: CardId,
        selected_target: Option<CardId>,
    ) -> Result<Vec<EventEnvelope>, AppError> {
        self.run_mutation(game_id, LoadMode::Existing, |svc, game| {
            svc.apply_hand_play(game, player_id, card, selected_target)
        })
        .await
    }

    /// Resolve a pending double match.
    pub async fn select_target(
        &self,
        game_id: &str,
        player_id: &str,
        source_card: CardId,
        target: CardId,
    ) -> Result<Vec<EventEnvelope>, AppError> {
        self.run_mutation(game_id, LoadMode::Existing, |svc, game| {
            svc.apply_selection(game, player_id, source_card, target)
        })
        .await
    }

    /// Koi-Koi or end the round after forming yaku.
    pub async fn make_decision(
        &self,
        game_id: &str,
        player_id: &str,
        decision: Decision,
    ) -> Result<Vec<EventEnvelope>, AppError> {
        self.run_mutation(game_id, LoadMode::Existing, |svc, game| {
            svc.apply_decision(game, player_id, decision)
        })
        .await
    }

    pub(super) fn apply_hand_play(
        &self,
        game: &mut Game,
        player_id: &str,
        card: CardId,
        selected_target: Option<CardId>,
    ) -> Result<Vec<GameEvent>, AppError> {
        game.require_in_progress()?;
        let rules = game.ruleset.clone();
        let step = game
            .round_mut()?
            .play_hand_card(player_id, card, selected_target, &rules)?;
        debug!(game_id = %game.id, player_id, card = %card, "Hand card played");
        self.turn_events(game, step, false)
    }

    pub(super) fn apply_selection(
        &self,
        game: &mut Game,
        player_id: &str,
        source_card: CardId,
        target: CardId,
    ) -> Result<Vec<GameEvent>, AppError> {
        game.require_in_progress()?;
        let rules = game.ruleset.clone();
        let step = game
            .round_mut()?
            .select_target(player_id, source_card, target, &rules)?;
        debug!(game_id = %game.id, player_id, card = %source_card, target = %target, "Target selected");
        self.turn_events(game, step, true)
    }

    pub(super) fn apply_decision(
        &self,
        game: &mut Game,
        player_id: &str,
        decision: Decision,
    ) -> Result<Vec<GameEvent>, AppError> {
        game.require_in_progress()?;
        let round = game.round_mut()?;
        let DecisionStep {
            player_id,
            decision,
            outcome,
        } = round.make_decision(player_id, decision)?;
        info!(game_id = %game.id, player_id = %player_id, ?decision, "Decision made");

        let round = game.round()?;
        let mut events = vec![GameEvent::DecisionMade {
            player_id,
            decision,
            updated_multipliers: round.multipliers(),
            next_state: NextState::of(round),
        }];
        if let TurnOutcome::RoundEnded(outcome) = outcome {
            events.extend(self.finish_round(game, &outcome));
        }
        Ok(events)
    }

    /// Events for one resolved turn step: the primary event first, then any
    /// round or game lifecycle events it caused.
    fn turn_events(
        &self,
        game: &mut Game,
        step: TurnStep,
        after_selection: bool,
    ) -> Result<Vec<GameEvent>, AppError> {
        let action_timeout_seconds = self.inner.config.action_timeout_seconds;
        let round = game.round()?;
        let deck_remaining = round.deck.len();
        let TurnStep {
            player_id,
            hand_card_play,
            draw_card_play,
            outcome,
        } = step;

        let primary = |yaku_update: Option<YakuUpdate>| {
            let next_state = NextState::of(round);
            if after_selection {
                GameEvent::TurnProgressAfterSelection {
                    player_id: player_id.clone(),
                    hand_card_play: hand_card_play.clone(),
                    draw_card_play: draw_card_play.clone(),
                    yaku_update,
                    deck_remaining,
                    next_state,
                }
            } else {
                GameEvent::TurnCompleted {
                    player_id: player_id.clone(),
                    hand_card_play: hand_card_play.clone(),
                    draw_card_play: draw_card_play.clone(),
                    deck_remaining,
                    next_state,
                }
            }
        };

        let events = match outcome {
            TurnOutcome::SelectionRequired {
                source,
                source_card,
                possible_targets,
            } => vec![GameEvent::SelectionRequired {
                player_id: player_id.clone(),
                source,
                source_card,
                possible_targets,
                hand_card_play: hand_card_play.clone(),
                action_timeout_seconds,
            }],
            TurnOutcome::DecisionRequired {
                new_yaku,
                active_yaku,
            } => vec![GameEvent::DecisionRequired {
                player_id: player_id.clone(),
                hand_card_play: hand_card_play.clone(),
                draw_card_play: draw_card_play.clone(),
                yaku_update: YakuUpdate {
                    new_yaku,
                    all_active_yaku: active_yaku,
                },
                current_multipliers: round.multipliers(),
                action_timeout_seconds,
            }],
            TurnOutcome::TurnPassed => vec![primary(None)],
            TurnOutcome::RoundEnded(outcome) => {
                let yaku_update = (outcome.reason == RoundEndReason::Scored).then(|| YakuUpdate {
                    new_yaku: outcome.yaku.clone(),
                    all_active_yaku: outcome.yaku.clone(),
                });
                let mut events = vec![primary(yaku_update)];
                events.extend(self.finish_round(game, &outcome));
                events
            }
        };
        Ok(events)
    }
}
