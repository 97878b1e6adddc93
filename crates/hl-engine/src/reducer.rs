//! The hand state machine (C5): pure `HandState -> (HandState, events)`
//! transitions driving blinds, dealing, betting rounds, showdown, and
//! settlement. No reducer here ever touches a clock directly or mutates
//! its input; every transition returns a freshly built `HandState`.

use hl_cards::Deck;
use hl_core::{Chips, Clock, Position};

use crate::betting::{self};
use crate::errors::{BettingError, ReducerError};
use crate::events::{EventKind, EventSequencer, GameEvent, HandEndReason};
use crate::hand::{HandId, HandState, RecordedAction};
use crate::phase::Phase;
use crate::player::PlayerStatus;
use crate::pots::{self, Pot};
use crate::showdown;
use crate::street::Street;
use crate::table::{PotAward, TableId, TableState};

/// Result of a reducer step: the new hand state plus the events emitted by
/// this transition, in emission order.
pub struct ReducerResult {
    pub hand: HandState,
    pub events: Vec<GameEvent>,
}

/// Starts a new hand from a lobby-assembled `TableState` (player stacks and
/// sit-in/sit-out status already current, dealer at its prior position) and
/// an externally supplied, ordered 52-card deck. Rotates the dealer button,
/// posts blinds, deals hole cards, and hands off to the first preflop
/// actor — the WAITING -> BLINDS -> PREFLOP span of the state machine.
pub fn start_hand(
    mut table: TableState,
    mut deck: Deck,
    hand_id: HandId,
    table_id: TableId,
    clock: &dyn Clock,
) -> Result<ReducerResult, ReducerError> {
    let eligible = table
        .players
        .iter()
        .filter(|p| !matches!(p.status, PlayerStatus::Out))
        .count();
    if eligible < 2 {
        return Err(ReducerError::NotEnoughPlayers(eligible));
    }

    let n = table.players.len();
    table.dealer_index = first_eligible_from(&table, table.dealer_index);
    table.hand_number += 1;
    table.street = Street::Waiting;
    table.community_cards.clear();
    table.winners.clear();
    table.winning_hand_description = None;
    table.pot = 0;
    for player in table.players.iter_mut() {
        player.reset_for_new_hand();
        player.is_dealer = false;
    }
    table.players[table.dealer_index].is_dealer = true;

    log::debug!("hand {hand_id} starting on table {table_id}, dealer at seat {}", table.dealer_index);
    let mut sequencer = EventSequencer::new(hand_id, table_id);
    let mut events = Vec::new();
    events.push(sequencer.emit(
        clock,
        EventKind::HandStarted { hand_number: table.hand_number, dealer_index: table.dealer_index },
    ));

    table = betting::post_blinds(&table);
    let sb_seat = table.players[(table.dealer_index + if n == 2 { 0 } else { 1 }) % n].seat;
    let bb_seat = table.players[(table.dealer_index + if n == 2 { 1 } else { 2 }) % n].seat;
    events.push(sequencer.emit(
        clock,
        EventKind::BlindsPosted { small_blind_seat: sb_seat, big_blind_seat: bb_seat, pot: table.pot },
    ));

    deal_hole_cards(&mut table, &mut deck)?;
    events.push(sequencer.emit(clock, EventKind::HoleCardsDealt));

    let phase = Phase::Preflop;
    if let Some(seat) = table.active_player_index {
        events.push(sequencer.emit(clock, EventKind::PlayerToAct { seat }));
    }

    let now = clock.now_millis();
    let mut hand = HandState::new(hand_id, table_id, table, deck, now);
    hand.phase = phase;
    hand.next_sequence = sequencer.next_sequence();
    Ok(ReducerResult { hand, events })
}

/// Applies one player action, advances the betting round, and then
/// auto-progresses through street transitions, the runout of an all-in
/// hand, and showdown/settlement as far as the state machine allows
/// without further player input.
pub fn apply_player_action(
    hand: &HandState,
    seat: Position,
    action: crate::action::Action,
    clock: &dyn Clock,
) -> Result<ReducerResult, ReducerError> {
    let street = betting_street_of(hand.phase).ok_or_else(|| ReducerError::WrongPhase {
        command: "player_action",
        phase: hand.phase.to_string(),
    })?;

    if hand.table.active_player_index != Some(seat) {
        let actual = hand.table.active_player_index.unwrap_or(seat);
        return Err(ReducerError::Betting(BettingError::NotYourTurn { expected: actual, actual: seat }));
    }

    let mut sequencer = EventSequencer::resume(hand.hand_id, hand.table_id, hand.next_sequence);
    let mut events = Vec::new();

    let mut table = betting::apply_action(&hand.table, seat, action)?;
    events.push(sequencer.emit(clock, EventKind::PlayerActed { seat, action }));

    let mut action_history = hand.action_history.clone();
    action_history.push(RecordedAction { seat, action, street });

    let mut deck = hand.deck.clone();
    let mut phase = hand.phase;

    if !betting::is_round_complete(&table) {
        if let Some(next_seat) = table.active_player_index {
            events.push(sequencer.emit(clock, EventKind::PlayerToAct { seat: next_seat }));
        }
    } else {
        events.push(sequencer.emit(clock, EventKind::BettingRoundComplete));
        phase = advance(&mut table, &mut deck, &mut sequencer, clock, &mut events)?;
    }

    let now = clock.now_millis();
    let mut next_hand = HandState {
        hand_id: hand.hand_id,
        table_id: hand.table_id,
        table,
        deck,
        phase,
        start_time: hand.start_time,
        last_action_time: now,
        action_history,
        next_sequence: sequencer.next_sequence(),
    };
    next_hand.next_sequence = sequencer.next_sequence();
    Ok(ReducerResult { hand: next_hand, events })
}

/// Drives the state machine from "this street's betting round just
/// finished" through however many automatic steps follow: settlement on an
/// all-fold, a runout to the river on an all-in with nobody left to act,
/// the next street's deal, or full showdown resolution. Returns the phase
/// the hand is left in; stops as soon as a real player decision is needed.
fn advance(
    table: &mut TableState,
    deck: &mut Deck,
    sequencer: &mut EventSequencer,
    clock: &dyn Clock,
    events: &mut Vec<GameEvent>,
) -> Result<Phase, ReducerError> {
    loop {
        if table.contenders_count() <= 1 {
            settle(table, &[], HandEndReason::AllFold, sequencer, clock, events);
            return Ok(Phase::Complete);
        }

        if table.street == Street::River {
            run_showdown(table, sequencer, clock, events)?;
            return Ok(Phase::Complete);
        }

        let next_street = table.street.next_betting_street().expect("not river, has a next street");
        let count = next_street.newly_revealed();
        let mut dealt = Vec::with_capacity(count);
        for _ in 0..count {
            dealt.push(deck.draw().ok_or(ReducerError::DeckExhausted)?);
        }
        table.community_cards.extend_from_slice(&dealt);
        table.street = next_street;
        *table = betting::start_new_street(table);

        events.push(sequencer.emit(clock, EventKind::StreetChanged { street: next_street }));
        events.push(sequencer.emit(clock, EventKind::CommunityCardsDealt { cards: dealt }));

        if table.acting_players_count() >= 2 {
            if let Some(seat) = table.active_player_index {
                events.push(sequencer.emit(clock, EventKind::PlayerToAct { seat }));
            }
            return Ok(phase_for_street(table.street));
        }
        // Nobody left who can act (an all-in runout): keep dealing streets
        // automatically without waiting for a command.
    }
}

fn run_showdown(
    table: &mut TableState,
    sequencer: &mut EventSequencer,
    clock: &dyn Clock,
    events: &mut Vec<GameEvent>,
) -> Result<(), ReducerError> {
    events.push(sequencer.emit(clock, EventKind::ShowdownStarted));
    for player in table.players.iter().filter(|p| p.status.contests_pots()) {
        let hole = player.hole.ok_or(ReducerError::DeckExhausted)?;
        events.push(sequencer.emit(clock, EventKind::HandRevealed { seat: player.seat, hole }));
    }

    let pots = pots::build_pots(&table.players);
    let (awards, description) =
        showdown::resolve_showdown(&table.players, &table.community_cards, &pots, table.dealer_index);
    settle(table, &awards, HandEndReason::Showdown, sequencer, clock, events);
    table.winning_hand_description = description;
    Ok(())
}

/// Distributes the given pot awards (or, for an all-fold settlement,
/// awards every pot wholesale to the sole remaining contender), credits
/// player stacks, zeroes the pot, and emits `POT_AWARDED`/`HAND_ENDED`.
fn settle(
    table: &mut TableState,
    precomputed_awards: &[PotAward],
    reason: HandEndReason,
    sequencer: &mut EventSequencer,
    clock: &dyn Clock,
    events: &mut Vec<GameEvent>,
) {
    let awards: Vec<PotAward> = if precomputed_awards.is_empty() {
        let pots = pots::build_pots(&table.players);
        award_uncontested(&pots)
    } else {
        precomputed_awards.to_vec()
    };

    for award in &awards {
        if let Some(player) = table.players.iter_mut().find(|p| p.id == award.player_id) {
            player.stack += award.amount;
        }
        events.push(sequencer.emit(clock, EventKind::PotAwarded(award.clone())));
    }

    table.winners = awards;
    table.pot = 0;
    table.street = Street::Complete;
    table.active_player_index = None;
    log::debug!("hand ended ({reason:?}), {} pot award(s)", table.winners.len());
    events.push(sequencer.emit(clock, EventKind::HandEnded { reason }));
}

/// Every pot in an all-fold settlement has exactly one eligible player
/// (everyone else folded); award each pot's full amount to them.
fn award_uncontested(pots: &[Pot]) -> Vec<PotAward> {
    let mut amounts: std::collections::HashMap<crate::player::PlayerId, Chips> = std::collections::HashMap::new();
    for pot in pots {
        debug_assert_eq!(pot.eligible.len(), 1, "all-fold settlement must leave exactly one eligible player per pot");
        if let Some(&winner) = pot.eligible.first() {
            *amounts.entry(winner).or_insert(0) += pot.amount;
        }
    }
    amounts
        .into_iter()
        .map(|(player_id, amount)| PotAward { player_id, amount, pot_label: "main".to_string() })
        .collect()
}

fn deal_hole_cards(table: &mut TableState, deck: &mut Deck) -> Result<(), ReducerError> {
    let n = table.players.len();
    let order: Vec<usize> = (1..=n)
        .map(|step| (table.dealer_index + step) % n)
        .filter(|&i| table.players[i].status.is_active())
        .collect();
    let mut hole: std::collections::HashMap<usize, Vec<hl_cards::Card>> =
        order.iter().map(|&i| (i, Vec::with_capacity(2))).collect();
    for _ in 0..2 {
        for &i in &order {
            let card = deck.draw().ok_or(ReducerError::DeckExhausted)?;
            hole.get_mut(&i).expect("seeded above").push(card);
        }
    }
    for &i in &order {
        let cards = hole.remove(&i).expect("seeded above");
        table.players[i].hole = Some([cards[0], cards[1]]);
    }
    Ok(())
}

fn first_eligible_from(table: &TableState, from: Position) -> Position {
    let n = table.players.len();
    for step in 0..n {
        let candidate = (from + step) % n;
        if !matches!(table.players[candidate].status, PlayerStatus::Out) {
            return candidate;
        }
    }
    from
}

fn betting_street_of(phase: Phase) -> Option<Street> {
    match phase {
        Phase::Preflop => Some(Street::Preflop),
        Phase::Flop => Some(Street::Flop),
        Phase::Turn => Some(Street::Turn),
        Phase::River => Some(Street::River),
        _ => None,
    }
}

fn phase_for_street(street: Street) -> Phase {
    match street {
        Street::Preflop => Phase::Preflop,
        Street::Flop => Phase::Flop,
        Street::Turn => Phase::Turn,
        Street::River => Phase::River,
        Street::Showdown => Phase::Showdown,
        Street::Waiting | Street::Complete => Phase::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::player::{Player, PlayerId};
    use hl_cards::Deck;
    use hl_core::{FixedClock, ID};

    fn heads_up_hand(stack: Chips) -> (HandState, FixedClock) {
        let p1 = Player::new(PlayerId::default(), "p1", 0, stack);
        let p2 = Player::new(PlayerId::default(), "p2", 1, stack);
        let table = TableState::new(vec![p1, p2], 5, 10);
        let clock = FixedClock::ticking_from(0, 1);
        let result = start_hand(table, Deck::canonical(), ID::default(), ID::default(), &clock).unwrap();
        (result.hand, clock)
    }

    #[test]
    fn s1_fold_wins_blinds_heads_up() {
        let (hand, clock) = heads_up_hand(1000);
        let acting = hand.table.active_player_index.unwrap();
        let result = apply_player_action(&hand, acting, Action::Fold, &clock).unwrap();
        assert_eq!(result.hand.phase, Phase::Complete);
        let stacks: Vec<Chips> = result.hand.table.players.iter().map(|p| p.stack).collect();
        assert_eq!(stacks.iter().sum::<Chips>(), 2000);
        // SB folds preflop heads-up -> BB wins the 15-chip pot: 995 and 1005.
        assert!(stacks.contains(&995));
        assert!(stacks.contains(&1005));
        let ended = result
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::HandEnded { reason: HandEndReason::AllFold }));
        assert!(ended);
    }

    #[test]
    fn s2_all_in_runout_deals_all_five_community_cards() {
        let (hand, clock) = heads_up_hand(50);
        let acting = hand.table.active_player_index.unwrap();
        let result = apply_player_action(&hand, acting, Action::AllIn, &clock).unwrap();
        let other = result.hand.table.active_player_index.unwrap();
        let result = apply_player_action(&result.hand, other, Action::Call, &clock).unwrap();
        assert_eq!(result.hand.table.community_cards.len(), 5);
        assert_eq!(result.hand.phase, Phase::Complete);
        let stacks: Vec<Chips> = result.hand.table.players.iter().map(|p| p.stack).collect();
        assert_eq!(stacks.iter().sum::<Chips>(), 100);
    }

    #[test]
    fn sequence_numbers_stay_monotonic_across_calls() {
        let (hand, clock) = heads_up_hand(1000);
        let acting = hand.table.active_player_index.unwrap();
        let result = apply_player_action(&hand, acting, Action::Call, &clock).unwrap();
        let sequences: Vec<u64> = result.events.iter().map(|e| e.sequence).collect();
        let mut sorted = sequences.clone();
        sorted.sort();
        assert_eq!(sequences, sorted);
        assert!(sequences.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn wrong_turn_is_rejected_without_mutating_state() {
        let (hand, clock) = heads_up_hand(1000);
        let acting = hand.table.active_player_index.unwrap();
        let other = 1 - acting;
        let err = apply_player_action(&hand, other, Action::Call, &clock).unwrap_err();
        assert!(matches!(err, ReducerError::Betting(BettingError::NotYourTurn { .. })));
    }
}
