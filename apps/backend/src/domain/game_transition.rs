//! Round Transition Service: folds a finished round into the game.

use crate::domain::game::{ConnectionStatus, Game, GameStatus, PlayerId};
use crate::domain::round::{RoundEndReason, RoundOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTransition {
    /// Scores updated, dealer rotated; the next round is waiting to be dealt.
    NextRound,
    /// The game is over.
    GameFinished { winner_id: Option<PlayerId> },
}

/// Record `outcome` and dispatch to the scored or drawn transition.
pub fn apply_round_outcome(game: &mut Game, outcome: &RoundOutcome) -> GameTransition {
    game.last_round_result = Some(outcome.clone());
    match (&outcome.winner_id, outcome.reason) {
        (Some(winner), RoundEndReason::Scored)
        | (Some(winner), RoundEndReason::InstantTeshi)
        | (Some(winner), RoundEndReason::InstantKuttsuki) => {
            transition_after_round_scored(game, winner, outcome.score.final_score)
        }
        _ => transition_after_round_draw(game),
    }
}

pub fn transition_after_round_scored(game: &mut Game, winner: &str, score: u32) -> GameTransition {
    *game.cumulative_scores.entry(winner.to_string()).or_insert(0) += score;
    close_round(game)
}

pub fn transition_after_round_draw(game: &mut Game) -> GameTransition {
    close_round(game)
}

/// The remaining player wins; scores are left as they are.
pub fn transition_after_player_leave(game: &mut Game, leaving: &str) -> GameTransition {
    let winner_id = game.opponent_of(leaving).cloned();
    game.set_connection(leaving, ConnectionStatus::Left);
    game.current_round = None;
    game.pending_continue_confirmations.clear();
    game.status = GameStatus::Finished;
    game.winner_id = winner_id.clone();
    GameTransition::GameFinished { winner_id }
}

fn close_round(game: &mut Game) -> GameTransition {
    game.rounds_played += 1;
    game.current_round = None;
    game.pending_continue_confirmations.clear();

    if game.rounds_played >= game.ruleset.total_rounds {
        game.status = GameStatus::Finished;
        game.winner_id = game.leading_player();
        return GameTransition::GameFinished {
            winner_id: game.winner_id.clone(),
        };
    }

    let next_dealer = game
        .dealer_id
        .as_deref()
        .and_then(|dealer| game.opponent_of(dealer))
        .cloned();
    if next_dealer.is_some() {
        game.dealer_id = next_dealer;
    }
    GameTransition::NextRound
}
