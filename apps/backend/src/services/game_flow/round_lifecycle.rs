use tracing::info;

use super::GameFlowService;
use crate::domain::game::Game;
use crate::domain::game_transition::{apply_round_outcome, GameTransition};
use crate::domain::round::{RoundEndReason, RoundOutcome};
use crate::error::AppError;
use crate::protocol::events::ScoringData;
use crate::protocol::{GameEvent, NextState};

impl GameFlowService {
    /// Deal the next round. An instant special rule ends it on the spot, in
    /// which case the round-end events follow `RoundDealt`.
    pub(super) fn deal_round(&self, game: &mut Game) -> Result<Vec<GameEvent>, AppError> {
        let game_id = game.id.clone();
        let round_no = game.rounds_played + 1;
        let deck = self.inner.decks.deck_for(game, round_no);
        let round = game.begin_round(&deck)?;

        info!(
            game_id = %game_id,
            round_no,
            dealer_id = %round.dealer_id,
            "Round dealt"
        );

        let hands = round
            .player_states
            .iter()
            .map(|state| (state.player_id.clone(), state.hand.iter().copied().collect()))
            .collect();
        let mut events = vec![GameEvent::RoundDealt {
            round_no: round.round_no,
            dealer_id: round.dealer_id.clone(),
            field: round.field.clone(),
            hands,
            deck_remaining: round.deck.len(),
            action_timeout_seconds: self.inner.config.action_timeout_seconds,
            next_state: NextState::of(round),
        }];

        if let Some(outcome) = round.outcome.clone() {
            info!(game_id = %game_id, round_no, reason = ?outcome.reason, "Round ended at the deal");
            events.extend(self.finish_round(game, &outcome));
        }
        Ok(events)
    }

    /// Fold an ended round into the game: `RoundEnded`, then `GameFinished`
    /// when that was the last round.
    pub(super) fn finish_round(&self, game: &mut Game, outcome: &RoundOutcome) -> Vec<GameEvent> {
        let transition = apply_round_outcome(game, outcome);

        let scoring_data = match outcome.reason {
            RoundEndReason::Scored | RoundEndReason::InstantTeshi | RoundEndReason::InstantKuttsuki => {
                Some(ScoringData {
                    winner_id: outcome.winner_id.clone(),
                    yaku: outcome.yaku.clone(),
                    score: outcome.score,
                })
            }
            RoundEndReason::Drawn | RoundEndReason::InstantFieldTeshi => None,
        };
        let display_timeout_seconds = match transition {
            GameTransition::NextRound => self.inner.config.display_timeout().map(|d| d.as_secs()),
            GameTransition::GameFinished { .. } => None,
        };

        info!(
            game_id = %game.id,
            round_no = outcome.round_no,
            reason = ?outcome.reason,
            winner_id = ?outcome.winner_id,
            points = outcome.score.final_score,
            "Round ended"
        );

        let mut events = vec![GameEvent::RoundEnded {
            round_no: outcome.round_no,
            reason: outcome.reason,
            scoring_data,
            updated_total_scores: game.cumulative_scores.clone(),
            display_timeout_seconds,
        }];
        if let GameTransition::GameFinished { winner_id } = transition {
            info!(game_id = %game.id, winner_id = ?winner_id, "Game finished");
            events.push(GameEvent::GameFinished {
                winner_id,
                final_scores: game.cumulative_scores.clone(),
            });
        }
        events
    }
}
