use hl_core::{Chips, Position};

use crate::action::{Action, ValidActions};
use crate::errors::BettingError;
use crate::player::PlayerStatus;
use crate::table::TableState;

/// Chips a player still needs to put in to match the table's current bet.
fn to_call(table: &TableState, seat: Position) -> Chips {
    let player = table.player_at(seat).expect("seat checked by caller");
    (table.current_bet - player.current_bet).max(0)
}

pub fn valid_actions(table: &TableState, seat: Position) -> Result<ValidActions, BettingError> {
    let player = table
        .player_at(seat)
        .ok_or(BettingError::NoSuchSeat(seat))?;
    if !player.status.is_active() {
        return Ok(ValidActions::default());
    }

    let owed = to_call(table, seat);
    let stack = player.stack;
    let reachable = player.current_bet + stack; // target level if player shoves everything in

    let can_bet = table.current_bet == 0 && stack > 0;
    let max_bet = reachable;
    let min_bet = table.big_blind.min(max_bet);

    let min_raise_target = (table.current_bet + table.min_raise).min(reachable);
    let can_raise = table.current_bet > 0 && reachable > table.current_bet && stack > owed;

    Ok(ValidActions {
        can_fold: true,
        can_check: owed == 0,
        can_call: owed > 0,
        call_amount: owed.min(stack),
        can_bet,
        min_bet,
        max_bet,
        can_raise,
        min_raise: min_raise_target,
        max_raise: reachable,
        can_all_in: stack > 0,
        all_in_amount: stack,
    })
}

pub fn apply_action(
    table: &TableState,
    seat: Position,
    action: Action,
) -> Result<TableState, BettingError> {
    let mut table = table.clone();
    let index = table
        .players
        .iter()
        .position(|p| p.seat == seat)
        .ok_or(BettingError::NoSuchSeat(seat))?;
    if !table.players[index].status.is_active() {
        return Err(BettingError::PlayerNotActive(seat));
    }

    let owed = to_call(&table, seat);
    match action {
        Action::Fold => {
            table.players[index].status = PlayerStatus::Folded;
            mark_acted(&mut table, index);
        }
        Action::Check => {
            if owed != 0 {
                return Err(BettingError::CannotCheck(table.current_bet));
            }
            mark_acted(&mut table, index);
        }
        Action::Call => {
            if owed == 0 {
                return Err(BettingError::NothingToCall);
            }
            let committed = table.players[index].commit(owed);
            table.pot += committed;
            mark_acted(&mut table, index);
        }
        Action::Bet { to } => {
            if table.current_bet != 0 {
                return Err(BettingError::CannotBet(table.current_bet));
            }
            let reachable = table.players[index].current_bet + table.players[index].stack;
            let minimum = table.big_blind.min(reachable);
            if to < minimum {
                return Err(BettingError::BelowMinimum { amount: to, minimum });
            }
            if to > reachable {
                return Err(BettingError::AboveMaximum { amount: to, maximum: reachable });
            }
            let committed = table.players[index].commit(to - table.players[index].current_bet);
            table.pot += committed;
            table.current_bet = table.players[index].current_bet;
            table.min_raise = table.current_bet;
            reopen_action(&mut table, index);
        }
        Action::Raise { to } => {
            if table.current_bet == 0 {
                return Err(BettingError::CannotRaiseWithoutBet);
            }
            let reachable = table.players[index].current_bet + table.players[index].stack;
            let minimum = (table.current_bet + table.min_raise).min(reachable);
            if to < minimum {
                return Err(BettingError::BelowMinimum { amount: to, minimum });
            }
            if to > reachable {
                return Err(BettingError::AboveMaximum { amount: to, maximum: reachable });
            }
            let raise_size = to - table.current_bet;
            let committed = table.players[index].commit(to - table.players[index].current_bet);
            table.pot += committed;
            table.current_bet = table.players[index].current_bet;
            table.min_raise = raise_size;
            reopen_action(&mut table, index);
        }
        Action::AllIn => {
            let stack = table.players[index].stack;
            let committed = table.players[index].commit(stack);
            table.pot += committed;
            let new_level = table.players[index].current_bet;
            if new_level > table.current_bet {
                let raise_size = new_level - table.current_bet;
                let is_full_raise = raise_size >= table.min_raise;
                table.current_bet = new_level;
                if is_full_raise {
                    table.min_raise = raise_size;
                    reopen_action(&mut table, index);
                } else {
                    // Under-sized all-in raise: becomes the new bar to meet
                    // but does not reopen action for players already acted.
                    mark_acted(&mut table, index);
                }
            } else {
                mark_acted(&mut table, index);
            }
        }
    }

    table.actions_this_round += 1;
    advance_active_player(&mut table);
    Ok(table)
}

fn mark_acted(table: &mut TableState, index: usize) {
    table.acted_since_raise[index] = true;
}

/// A full raise/bet: the actor is marked acted, every other still-active
/// player's "acted since last raise" flag is cleared so their action
/// reopens, and the raiser is recorded.
fn reopen_action(table: &mut TableState, index: usize) {
    for (i, flag) in table.acted_since_raise.iter_mut().enumerate() {
        *flag = i == index;
    }
    table.last_raiser_index = Some(table.players[index].seat);
}

fn advance_active_player(table: &mut TableState) {
    if table.acting_players_count() == 0 {
        table.active_player_index = None;
        return;
    }
    let start = table.active_player_index.unwrap_or(0);
    let n = table.players.len();
    for step in 1..=n {
        let candidate = (start + step) % n;
        if table.players[candidate].status.is_active() {
            table.active_player_index = Some(candidate);
            return;
        }
    }
    table.active_player_index = None;
}

/// A street's betting round is complete once every player still able to
/// act has acted since the last *full* raise. `acted_since_raise` already
/// encodes exactly that: `reopen_action` (called only on full raises)
/// clears it for everyone but the raiser, while an undersized all-in
/// leaves it untouched, so a player who called before an undersized
/// shove is not asked to act again even though `current_bet` moved past
/// what they've put in. An empty set of still-active players (everyone
/// remaining is all-in or folded) is vacuously complete.
pub fn is_round_complete(table: &TableState) -> bool {
    if table.contenders_count() <= 1 {
        return true;
    }
    table
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.status.is_active())
        .all(|(i, _)| table.acted_since_raise[i])
}

/// Posts small and big blinds, rotates the button, and sets up the first
/// preflop action. Heads-up, the dealer posts the small blind and acts
/// first preflop; otherwise the seats left of the dealer post SB and BB
/// and the seat left of the big blind acts first.
pub fn post_blinds(table: &TableState) -> TableState {
    let mut table = table.clone();
    let n = table.players.len();
    debug_assert!(n >= 2, "post_blinds requires at least two players");

    let (sb_index, bb_index, first_to_act) = if n == 2 {
        (table.dealer_index, 1 - table.dealer_index, table.dealer_index)
    } else {
        let sb = (table.dealer_index + 1) % n;
        let bb = (table.dealer_index + 2) % n;
        let first = (table.dealer_index + 3) % n;
        (sb, bb, first)
    };

    let sb_amount = table.small_blind.min(table.players[sb_index].stack);
    let committed = table.players[sb_index].commit(sb_amount);
    table.pot += committed;

    let bb_amount = table.big_blind.min(table.players[bb_index].stack);
    let committed = table.players[bb_index].commit(bb_amount);
    table.pot += committed;

    table.current_bet = table.players[bb_index].current_bet;
    table.min_raise = table.big_blind;
    table.last_raiser_index = Some(table.players[bb_index].seat);
    table.acted_since_raise = vec![false; n];
    table.active_player_index = Some(first_to_act);
    table.actions_this_round = 0;
    table.street = crate::street::Street::Preflop;
    table
}

/// Resets per-street betting fields and hands the first action of the new
/// street to the first active player left of the dealer, the way
/// `post_blinds` hands off the first preflop action.
pub fn start_new_street(table: &TableState) -> TableState {
    let mut table = table.clone();
    let n = table.players.len();
    for player in table.players.iter_mut() {
        player.reset_for_new_street();
    }
    table.current_bet = 0;
    table.min_raise = table.big_blind;
    table.last_raiser_index = None;
    table.actions_this_round = 0;
    table.acted_since_raise = vec![false; n];
    table.active_player_index = first_active_from(&table, table.dealer_index);
    table
}

/// First active (can-act) seat starting the search just after `from`,
/// wrapping around the table; `None` if nobody can act.
fn first_active_from(table: &TableState, from: Position) -> Option<Position> {
    let n = table.players.len();
    for step in 1..=n {
        let candidate = (from + step) % n;
        if table.players[candidate].status.is_active() {
            return Some(candidate);
        }
    }
    None
}
