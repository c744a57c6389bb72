//! One hand of Koi-Koi: the turn state machine and its card containers.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::DECK_SIZE;
use crate::domain::dealing::{deal, DeckError};
use crate::domain::game::PlayerId;
use crate::domain::matching::{
    add_to_field, analyze_match, execute_capture, remove_from_field, MatchError, MatchResult,
};
use crate::domain::rules::{Ruleset, SpecialRules, PLAYERS};
use crate::domain::scoring::{calculate_final_score, instant_score, koi_multiplier, ScoreBreakdown};
use crate::domain::special_rules::check_instant_end;
use crate::domain::yaku::{detect_new_yaku, detect_yaku, total_points, Yaku};
use crate::domain::CardId;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    AwaitingHandPlay,
    AwaitingSelection,
    AwaitingDecision,
    RoundEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    KoiKoi,
    EndRound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundEndReason {
    Scored,
    Drawn,
    InstantTeshi,
    InstantKuttsuki,
    InstantFieldTeshi,
}

/// Where the card awaiting a target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionSource {
    HandCard,
    DrawnCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundState {
    pub player_id: PlayerId,
    pub hand: BTreeSet<CardId>,
    pub depository: BTreeSet<CardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KoiStatus {
    pub player_id: PlayerId,
    pub times_continued: u32,
    /// Yaku held at the last Koi-Koi; only improvements over it prompt a new decision.
    pub last_yaku_snapshot: Vec<Yaku>,
}

/// Summary of one card being played or drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlay {
    pub played_card: CardId,
    /// Field cards taken by the played card.
    pub matched_cards: Vec<CardId>,
    /// Everything moved to the depository, played card included. Empty when
    /// the card was laid on the field.
    pub captured_cards: Vec<CardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub source: SelectionSource,
    /// The card waiting for a target. It has left the hand or deck and is
    /// not on the field yet.
    pub source_card: CardId,
    pub possible_targets: Vec<CardId>,
    /// Hand-card half of the turn when the drawn card is the one waiting.
    pub hand_card_play: Option<CardPlay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub active_yaku: Vec<Yaku>,
    pub new_yaku: Vec<Yaku>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round_no: u32,
    pub reason: RoundEndReason,
    pub winner_id: Option<PlayerId>,
    pub yaku: Vec<Yaku>,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMultiplier {
    pub player_id: PlayerId,
    pub times_continued: u32,
}

/// Koi-Koi standing for display; `koi_multiplier` is what a score would get now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multipliers {
    pub players: Vec<PlayerMultiplier>,
    pub koi_multiplier: u32,
}

/// What the acting player (or the timeout) has to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    SelectionRequired {
        source: SelectionSource,
        source_card: CardId,
        possible_targets: Vec<CardId>,
    },
    DecisionRequired {
        new_yaku: Vec<Yaku>,
        active_yaku: Vec<Yaku>,
    },
    /// Control went to the opponent.
    TurnPassed,
    RoundEnded(RoundOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnStep {
    pub player_id: PlayerId,
    pub hand_card_play: Option<CardPlay>,
    pub draw_card_play: Option<CardPlay>,
    pub outcome: TurnOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionStep {
    pub player_id: PlayerId,
    pub decision: Decision,
    pub outcome: TurnOutcome,
}

/// Nearest legal default for whatever the round is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForcedAction {
    PlayHandCard {
        player_id: PlayerId,
        card: CardId,
        selected_target: Option<CardId>,
    },
    SelectTarget {
        player_id: PlayerId,
        source_card: CardId,
        target: CardId,
    },
    MakeDecision {
        player_id: PlayerId,
        decision: Decision,
    },
}

#[derive(Debug, Error)]
pub enum RoundError {
    /// The command broke a rule; the round is unchanged from the caller's view.
    #[error(transparent)]
    Rejected(#[from] DomainError),
    #[error("capture invariant violated: {0}")]
    Capture(#[from] MatchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based.
    pub round_no: u32,
    pub dealer_id: PlayerId,
    pub field: Vec<CardId>,
    /// Draw from the front.
    pub deck: Vec<CardId>,
    pub player_states: [PlayerRoundState; PLAYERS],
    pub flow_state: FlowState,
    pub active_player_id: PlayerId,
    pub koi_statuses: [KoiStatus; PLAYERS],
    /// Present only in `AwaitingSelection`.
    pub pending_selection: Option<PendingSelection>,
    /// Present only in `AwaitingDecision`.
    pub pending_decision: Option<PendingDecision>,
    /// Set once the round reaches `RoundEnded`.
    pub outcome: Option<RoundOutcome>,
}

impl Round {
    /// Deal a fresh round. Hands follow `player_ids` order; the dealer acts first.
    pub fn deal(
        round_no: u32,
        deck: &[CardId],
        player_ids: &[PlayerId; PLAYERS],
        dealer_id: &PlayerId,
    ) -> Result<Self, DeckError> {
        if !player_ids.contains(dealer_id) {
            return Err(DeckError::InvalidPlayerCount);
        }
        let dealt = deal(deck, player_ids)?;
        let [first, second] = dealt.hands;

        let player_state = |player_id: &PlayerId, hand: Vec<CardId>| PlayerRoundState {
            player_id: player_id.clone(),
            hand: hand.into_iter().collect(),
            depository: BTreeSet::new(),
        };
        let koi_status = |player_id: &PlayerId| KoiStatus {
            player_id: player_id.clone(),
            times_continued: 0,
            last_yaku_snapshot: Vec::new(),
        };

        Ok(Self {
            round_no,
            dealer_id: dealer_id.clone(),
            field: dealt.field,
            deck: dealt.deck_remainder,
            player_states: [
                player_state(&player_ids[0], first),
                player_state(&player_ids[1], second),
            ],
            flow_state: FlowState::AwaitingHandPlay,
            active_player_id: dealer_id.clone(),
            koi_statuses: [koi_status(&player_ids[0]), koi_status(&player_ids[1])],
            pending_selection: None,
            pending_decision: None,
            outcome: None,
        })
    }

    /// End the round at deal time if the layout triggers an enabled special rule.
    pub fn apply_instant_end(&mut self, rules: &SpecialRules) -> Option<RoundOutcome> {
        let dealer_seat = self.seat_of(&self.dealer_id)?;
        let other_seat = 1 - dealer_seat;
        let hands = [
            (
                &self.player_states[dealer_seat].player_id,
                &self.player_states[dealer_seat].hand,
            ),
            (
                &self.player_states[other_seat].player_id,
                &self.player_states[other_seat].hand,
            ),
        ];
        let instant = check_instant_end(&hands, &self.field, rules)?;

        let outcome = RoundOutcome {
            round_no: self.round_no,
            reason: instant.reason,
            winner_id: instant.winner_id,
            yaku: Vec::new(),
            score: instant_score(instant.points),
        };
        Some(self.close(outcome))
    }

    pub fn seat_of(&self, player_id: &str) -> Option<usize> {
        self.player_states
            .iter()
            .position(|p| p.player_id == player_id)
    }

    pub fn player_state(&self, player_id: &str) -> Option<&PlayerRoundState> {
        self.seat_of(player_id).map(|seat| &self.player_states[seat])
    }

    pub fn koi_status(&self, player_id: &str) -> Option<&KoiStatus> {
        self.seat_of(player_id).map(|seat| &self.koi_statuses[seat])
    }

    pub fn is_ended(&self) -> bool {
        self.flow_state == FlowState::RoundEnded
    }

    pub fn koikoi_declared(&self) -> bool {
        self.koi_statuses.iter().any(|k| k.times_continued > 0)
    }

    pub fn multipliers(&self) -> Multipliers {
        Multipliers {
            players: self
                .koi_statuses
                .iter()
                .map(|k| PlayerMultiplier {
                    player_id: k.player_id.clone(),
                    times_continued: k.times_continued,
                })
                .collect(),
            koi_multiplier: koi_multiplier(self.koikoi_declared()),
        }
    }

    /// Every card the round owns, pending card included.
    pub fn all_cards(&self) -> Vec<CardId> {
        let mut cards: Vec<CardId> = self.field.iter().chain(self.deck.iter()).copied().collect();
        for p in &self.player_states {
            cards.extend(p.hand.iter().chain(p.depository.iter()).copied());
        }
        if let Some(pending) = &self.pending_selection {
            cards.push(pending.source_card);
        }
        cards
    }

    /// All 48 cards accounted for, each in exactly one container.
    pub fn cards_conserved(&self) -> bool {
        let cards = self.all_cards();
        let unique: HashSet<CardId> = cards.iter().copied().collect();
        cards.len() == DECK_SIZE && unique.len() == DECK_SIZE
    }

    fn require_turn(&self, expected: FlowState, player_id: &str) -> Result<usize, DomainError> {
        if self.flow_state != expected {
            return Err(DomainError::invalid_state(format!(
                "Round is {:?}, not {expected:?}",
                self.flow_state
            )));
        }
        if self.active_player_id != player_id {
            return Err(DomainError::wrong_player(format!(
                "Waiting for {}, not {player_id}",
                self.active_player_id
            )));
        }
        self.seat_of(player_id)
            .ok_or_else(|| DomainError::wrong_player(format!("{player_id} is not in this round")))
    }

    /// Play `card` from the active player's hand, then draw.
    ///
    /// On a double match `selected_target` settles the choice inline; without
    /// one the turn parks in `AwaitingSelection`.
    pub fn play_hand_card(
        &mut self,
        player_id: &str,
        card: CardId,
        selected_target: Option<CardId>,
        rules: &Ruleset,
    ) -> Result<TurnStep, RoundError> {
        let seat = self.require_turn(FlowState::AwaitingHandPlay, player_id)?;
        if !self.player_states[seat].hand.contains(&card) {
            return Err(DomainError::invalid_card(format!("{card} is not in your hand")).into());
        }

        let result = analyze_match(card, &self.field);
        let chosen = match &result {
            MatchResult::DoubleMatch { targets } => match selected_target {
                Some(target) if targets.contains(&target) => Some(target),
                Some(target) => {
                    return Err(DomainError::invalid_selection(format!(
                        "{target} does not match {card}"
                    ))
                    .into());
                }
                None => {
                    self.player_states[seat].hand.remove(&card);
                    let outcome =
                        self.park_selection(SelectionSource::HandCard, card, targets.to_vec(), None);
                    return Ok(TurnStep {
                        player_id: player_id.to_string(),
                        hand_card_play: None,
                        draw_card_play: None,
                        outcome,
                    });
                }
            },
            _ => None,
        };

        self.player_states[seat].hand.remove(&card);
        let hand_play = self.resolve_capture(seat, card, chosen, &result)?;
        self.draw_and_finish(seat, Some(hand_play), rules)
    }

    /// Settle the pending double match and continue the same turn.
    pub fn select_target(
        &mut self,
        player_id: &str,
        source_card: CardId,
        target: CardId,
        rules: &Ruleset,
    ) -> Result<TurnStep, RoundError> {
        let seat = self.require_turn(FlowState::AwaitingSelection, player_id)?;
        let pending = self
            .pending_selection
            .clone()
            .ok_or_else(|| DomainError::invalid_state("No selection is pending"))?;
        if pending.source_card != source_card {
            return Err(DomainError::invalid_card(format!(
                "{source_card} is not the card awaiting a target"
            ))
            .into());
        }
        if !pending.possible_targets.contains(&target) {
            return Err(DomainError::invalid_selection(format!(
                "{target} is not a possible target for {source_card}"
            ))
            .into());
        }

        self.pending_selection = None;
        let result = analyze_match(source_card, &self.field);
        let play = self.resolve_capture(seat, source_card, Some(target), &result)?;

        match pending.source {
            SelectionSource::HandCard => self.draw_and_finish(seat, Some(play), rules),
            SelectionSource::DrawnCard => {
                Ok(self.finish_turn(seat, pending.hand_card_play, Some(play), rules))
            }
        }
    }

    pub fn make_decision(
        &mut self,
        player_id: &str,
        decision: Decision,
    ) -> Result<DecisionStep, RoundError> {
        let seat = self.require_turn(FlowState::AwaitingDecision, player_id)?;
        let pending = self
            .pending_decision
            .take()
            .ok_or_else(|| DomainError::invalid_state("No decision is pending"))?;

        let outcome = match decision {
            Decision::KoiKoi => {
                let koi = &mut self.koi_statuses[seat];
                koi.times_continued += 1;
                koi.last_yaku_snapshot = pending.active_yaku;
                self.advance_turn(seat)
            }
            Decision::EndRound => TurnOutcome::RoundEnded(self.score_for(seat, pending.active_yaku)),
        };

        Ok(DecisionStep {
            player_id: player_id.to_string(),
            decision,
            outcome,
        })
    }

    /// The action a timeout injects for the active player; `None` once ended.
    pub fn forced_action(&self) -> Option<ForcedAction> {
        let player_id = self.active_player_id.clone();
        match self.flow_state {
            FlowState::AwaitingHandPlay => {
                let seat = self.seat_of(&player_id)?;
                let card = *self.player_states[seat].hand.iter().next()?;
                let selected_target = match analyze_match(card, &self.field) {
                    MatchResult::DoubleMatch { targets } => Some(targets[0]),
                    _ => None,
                };
                Some(ForcedAction::PlayHandCard {
                    player_id,
                    card,
                    selected_target,
                })
            }
            FlowState::AwaitingSelection => {
                let pending = self.pending_selection.as_ref()?;
                Some(ForcedAction::SelectTarget {
                    player_id,
                    source_card: pending.source_card,
                    target: *pending.possible_targets.first()?,
                })
            }
            FlowState::AwaitingDecision => Some(ForcedAction::MakeDecision {
                player_id,
                decision: Decision::EndRound,
            }),
            FlowState::RoundEnded => None,
        }
    }

    fn park_selection(
        &mut self,
        source: SelectionSource,
        source_card: CardId,
        possible_targets: Vec<CardId>,
        hand_card_play: Option<CardPlay>,
    ) -> TurnOutcome {
        self.pending_selection = Some(PendingSelection {
            source,
            source_card,
            possible_targets: possible_targets.clone(),
            hand_card_play,
        });
        self.flow_state = FlowState::AwaitingSelection;
        TurnOutcome::SelectionRequired {
            source,
            source_card,
            possible_targets,
        }
    }

    fn resolve_capture(
        &mut self,
        seat: usize,
        card: CardId,
        chosen: Option<CardId>,
        result: &MatchResult,
    ) -> Result<CardPlay, MatchError> {
        let captured = execute_capture(card, chosen, result)?;
        if captured.is_empty() {
            self.field = add_to_field(&self.field, card);
            return Ok(CardPlay {
                played_card: card,
                matched_cards: Vec::new(),
                captured_cards: Vec::new(),
            });
        }

        self.field = remove_from_field(&self.field, &captured);
        self.player_states[seat]
            .depository
            .extend(captured.iter().copied());
        Ok(CardPlay {
            played_card: card,
            matched_cards: captured.iter().copied().filter(|c| *c != card).collect(),
            captured_cards: captured.into_iter().collect(),
        })
    }

    fn draw_and_finish(
        &mut self,
        seat: usize,
        hand_play: Option<CardPlay>,
        rules: &Ruleset,
    ) -> Result<TurnStep, RoundError> {
        if self.deck.is_empty() {
            return Ok(self.finish_turn(seat, hand_play, None, rules));
        }
        let drawn = self.deck.remove(0);
        let result = analyze_match(drawn, &self.field);

        if let MatchResult::DoubleMatch { targets } = &result {
            let outcome = self.park_selection(
                SelectionSource::DrawnCard,
                drawn,
                targets.to_vec(),
                hand_play.clone(),
            );
            return Ok(TurnStep {
                player_id: self.player_states[seat].player_id.clone(),
                hand_card_play: hand_play,
                draw_card_play: None,
                outcome,
            });
        }

        let draw_play = self.resolve_capture(seat, drawn, None, &result)?;
        Ok(self.finish_turn(seat, hand_play, Some(draw_play), rules))
    }

    /// Re-detect yaku after both halves of the turn resolved.
    fn finish_turn(
        &mut self,
        seat: usize,
        hand_card_play: Option<CardPlay>,
        draw_card_play: Option<CardPlay>,
        rules: &Ruleset,
    ) -> TurnStep {
        let current = detect_yaku(&self.player_states[seat].depository, rules);
        let new_yaku = detect_new_yaku(&self.koi_statuses[seat].last_yaku_snapshot, &current);

        let outcome = if new_yaku.is_empty() {
            self.advance_turn(seat)
        } else if self.player_states[seat].hand.is_empty() {
            TurnOutcome::RoundEnded(self.score_for(seat, current))
        } else {
            self.pending_decision = Some(PendingDecision {
                active_yaku: current.clone(),
                new_yaku: new_yaku.clone(),
            });
            self.flow_state = FlowState::AwaitingDecision;
            TurnOutcome::DecisionRequired {
                new_yaku,
                active_yaku: current,
            }
        };

        TurnStep {
            player_id: self.player_states[seat].player_id.clone(),
            hand_card_play,
            draw_card_play,
            outcome,
        }
    }

    fn advance_turn(&mut self, seat: usize) -> TurnOutcome {
        let hands_empty = self.player_states.iter().all(|p| p.hand.is_empty());
        if hands_empty || self.deck.is_empty() {
            let outcome = RoundOutcome {
                round_no: self.round_no,
                reason: RoundEndReason::Drawn,
                winner_id: None,
                yaku: Vec::new(),
                score: calculate_final_score(0, false),
            };
            return TurnOutcome::RoundEnded(self.close(outcome));
        }

        self.active_player_id = self.player_states[1 - seat].player_id.clone();
        self.flow_state = FlowState::AwaitingHandPlay;
        TurnOutcome::TurnPassed
    }

    fn score_for(&mut self, seat: usize, yaku: Vec<Yaku>) -> RoundOutcome {
        let score = calculate_final_score(total_points(&yaku), self.koikoi_declared());
        let outcome = RoundOutcome {
            round_no: self.round_no,
            reason: RoundEndReason::Scored,
            winner_id: Some(self.player_states[seat].player_id.clone()),
            yaku,
            score,
        };
        self.close(outcome)
    }

    fn close(&mut self, outcome: RoundOutcome) -> RoundOutcome {
        self.flow_state = FlowState::RoundEnded;
        self.pending_selection = None;
        self.pending_decision = None;
        self.outcome = Some(outcome.clone());
        outcome
    }
}
