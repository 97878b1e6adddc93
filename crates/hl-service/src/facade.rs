//! Game service facade: the single entry point client requests pass
//! through before reaching the hand reducers. One coordinator per table
//! owns its state and its subscriber channels, but exposes a
//! request/response API instead of an actor loop, since this facade must
//! serve many independent request styles (HTTP, in-process tests, a
//! future socket layer) rather than one fixed `Player` trait.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use hl_cards::Deck;
use hl_core::{Chips, Clock, Config, Position, ID};
use hl_engine::{
    reducer, Action, GameEvent, HandEndReason, HandId, HandState, Player, PlayerId, PlayerStatus,
    ReducerError, TableId, TableState, ValidActions,
};
use hl_ledger::{Ledger, PotWinner, RakeBreakdown, SettlementAttribution, SettlementRecorder, TopUpBoundary};
use hl_snapshot::{InMemorySnapshotStore, RecoveryManager, SnapshotInput, SnapshotStore, SnapshotWriter};

use crate::errors::{FacadeError, ResponseCode};

const MAX_SEATS: usize = 9;

/// One table's live runtime: its lobby state (between hands), the hand in
/// progress if any, and the subscriber channels that receive every event
/// a hand emits.
pub struct TableRuntime {
    pub table_id: TableId,
    pub config: Config,
    pub lobby: TableState,
    pub hand: Option<HandState>,
    pub last_result: Option<HandResultView>,
    subscribers: Vec<UnboundedSender<GameEvent>>,
    snapshot_version: u64,
}

impl TableRuntime {
    fn new(table_id: TableId, config: Config) -> Self {
        Self {
            table_id,
            lobby: TableState::new(Vec::new(), config.small_blind, config.big_blind),
            config,
            hand: None,
            last_result: None,
            subscribers: Vec::new(),
            snapshot_version: 0,
        }
    }

    fn broadcast(&mut self, events: &[GameEvent]) {
        self.subscribers.retain(|tx| {
            for event in events {
                if tx.send(event.clone()).is_err() {
                    return false;
                }
            }
            true
        });
    }
}

/// A read-only view of a table's current state, as `getGameState`
/// returns it to a caller.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GameStateView {
    pub table_id: TableId,
    pub hand_in_progress: bool,
    pub table: TableState,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HandResultView {
    pub hand_id: HandId,
    pub reason: HandEndReason,
    pub winners: Vec<hl_engine::PotAward>,
    pub winning_hand_description: Option<String>,
    pub final_stacks: Vec<(PlayerId, Chips)>,
}

/// Orchestrates every table this process hosts, plus the shared ledger
/// and boundaries the concurrency model designates as the one globally
/// visible resource (guarded here by a single `Mutex`).
pub struct GameService {
    tables: HashMap<uuid::Uuid, TableRuntime>,
    ledger: Arc<Mutex<Ledger>>,
    settlement_recorder: SettlementRecorder,
    topup_boundary: Arc<Mutex<TopUpBoundary>>,
    snapshot_store: Box<dyn SnapshotStore>,
    snapshot_writer: SnapshotWriter,
    recovery: RecoveryManager,
    clock: Box<dyn Clock>,
}

impl GameService {
    pub fn new(clock: Box<dyn Clock>, config: Config) -> Self {
        Self {
            tables: HashMap::new(),
            ledger: Arc::new(Mutex::new(Ledger::new())),
            settlement_recorder: SettlementRecorder::new(),
            topup_boundary: Arc::new(Mutex::new(TopUpBoundary::new())),
            snapshot_store: Box::new(InMemorySnapshotStore::new()),
            snapshot_writer: SnapshotWriter::new(),
            recovery: RecoveryManager::new(config.reconnect_grace_period),
            clock,
        }
    }

    pub fn ledger(&self) -> Arc<Mutex<Ledger>> {
        self.ledger.clone()
    }
    pub fn topup_boundary(&self) -> Arc<Mutex<TopUpBoundary>> {
        self.topup_boundary.clone()
    }

    pub fn create_table(&mut self, table_id: TableId, config: Config) {
        self.tables.entry(table_id.inner()).or_insert_with(|| TableRuntime::new(table_id, config));
    }

    fn table_mut(&mut self, table_id: TableId) -> Result<&mut TableRuntime, FacadeError> {
        self.tables
            .get_mut(&table_id.inner())
            .ok_or_else(|| FacadeError::new(ResponseCode::PlayerNotFound, "no such table"))
    }

    /// Subscribe to every event a table's hands emit from now on,
    /// one `UnboundedSender<Event>` per subscriber, with cancellation on
    /// `drop` rather than an explicit unsubscribe call.
    pub fn subscribe(&mut self, table_id: TableId) -> Result<UnboundedReceiver<GameEvent>, FacadeError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.table_mut(table_id)?.subscribers.push(tx);
        Ok(rx)
    }

    pub fn join_table(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        name: impl Into<String>,
        buy_in: Chips,
    ) -> Result<Position, FacadeError> {
        let runtime = self.table_mut(table_id)?;
        if runtime.hand.is_some() {
            return Err(FacadeError::new(ResponseCode::HandNotInProgress, "cannot join mid-hand"));
        }
        if runtime.lobby.players.len() >= MAX_SEATS {
            return Err(FacadeError::new(ResponseCode::TableFull, "table is full"));
        }
        if runtime.lobby.players.iter().any(|p| p.id == player_id) {
            return Err(FacadeError::new(ResponseCode::SeatTaken, "player already seated"));
        }
        if buy_in < runtime.config.buy_in_min() || buy_in > runtime.config.buy_in_max() {
            return Err(FacadeError::new(
                ResponseCode::InvalidAmount,
                format!("buy-in {buy_in} outside [{}, {}]", runtime.config.buy_in_min(), runtime.config.buy_in_max()),
            ));
        }
        let taken: std::collections::HashSet<Position> = runtime.lobby.players.iter().map(|p| p.seat).collect();
        let seat = (0..MAX_SEATS).find(|s| !taken.contains(s)).expect("checked table-full above");
        runtime.lobby.players.push(Player::new(player_id, name, seat, buy_in));
        Ok(seat)
    }

    pub fn leave_table(&mut self, table_id: TableId, player_id: PlayerId) -> Result<(), FacadeError> {
        let runtime = self.table_mut(table_id)?;
        if runtime.hand.is_some() {
            return Err(FacadeError::new(ResponseCode::HandNotInProgress, "cannot leave mid-hand"));
        }
        let before = runtime.lobby.players.len();
        runtime.lobby.players.retain(|p| p.id != player_id);
        if runtime.lobby.players.len() == before {
            return Err(FacadeError::new(ResponseCode::PlayerNotFound, "player not seated at this table"));
        }
        Ok(())
    }

    pub fn rebuy(&mut self, table_id: TableId, player_id: PlayerId, amount: Chips) -> Result<Chips, FacadeError> {
        if amount <= 0 {
            return Err(FacadeError::new(ResponseCode::InvalidAmount, "rebuy amount must be positive"));
        }
        let runtime = self.table_mut(table_id)?;
        let max = runtime.config.buy_in_max();
        let player = runtime
            .lobby
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| FacadeError::new(ResponseCode::PlayerNotFound, "player not seated at this table"))?;
        if player.stack + amount > max {
            return Err(FacadeError::new(ResponseCode::InvalidAmount, format!("rebuy would exceed max buy-in of {max}")));
        }
        player.stack += amount;
        Ok(player.stack)
    }

    /// Starts a hand dealing from `deck`. The deck is always supplied by
    /// the caller, assembled deterministically for replay, or via
    /// `Deck::shuffled` with a caller-owned rng for live play, so the
    /// facade itself never generates card order.
    pub fn start_hand(&mut self, table_id: TableId, deck: Deck) -> Result<Vec<GameEvent>, FacadeError> {
        let runtime = self.table_mut(table_id)?;
        if runtime.hand.is_some() {
            return Err(FacadeError::new(ResponseCode::HandNotInProgress, "a hand is already in progress"));
        }
        let lobby = runtime.lobby.clone();
        let hand_id = HandId::default();
        let result = reducer::start_hand(lobby, deck, hand_id, table_id, self.clock.as_ref())
            .map_err(FacadeError::from)?;
        runtime.hand = Some(result.hand);
        runtime.broadcast(&result.events);
        self.snapshot_if_meaningful(table_id);
        Ok(result.events)
    }

    pub fn get_valid_actions(&self, table_id: TableId, seat: Position) -> Result<ValidActions, FacadeError> {
        let runtime = self
            .tables
            .get(&table_id.inner())
            .ok_or_else(|| FacadeError::new(ResponseCode::PlayerNotFound, "no such table"))?;
        let hand = runtime
            .hand
            .as_ref()
            .ok_or_else(|| FacadeError::new(ResponseCode::HandNotInProgress, "no hand in progress"))?;
        hl_engine::betting::valid_actions(&hand.table, seat)
            .map_err(|e| FacadeError::from(ReducerError::Betting(e)))
    }

    pub fn process_action(
        &mut self,
        table_id: TableId,
        seat: Position,
        action: Action,
    ) -> Result<Vec<GameEvent>, FacadeError> {
        let runtime = self.table_mut(table_id)?;
        let hand = runtime
            .hand
            .as_ref()
            .ok_or_else(|| FacadeError::new(ResponseCode::HandNotInProgress, "no hand in progress"))?;

        let result = reducer::apply_player_action(hand, seat, action, self.clock.as_ref()).map_err(FacadeError::from)?;
        let hand_complete = result.hand.phase == hl_engine::Phase::Complete;
        let events = result.events;

        if hand_complete {
            let winners = result.hand.table.winners.clone();
            let description = result.hand.table.winning_hand_description.clone();
            let reason = events
                .iter()
                .find_map(|e| match &e.kind {
                    hl_engine::EventKind::HandEnded { reason } => Some(*reason),
                    _ => None,
                })
                .unwrap_or(HandEndReason::Showdown);
            let final_stacks = result.hand.table.players.iter().map(|p| (p.id, p.stack)).collect();

            if !winners.is_empty() {
                let attribution = SettlementAttribution {
                    hand_id: result.hand.hand_id,
                    table_id,
                    club_id: None,
                    agent_id: None,
                    state_version: result.hand.table.hand_number,
                    pot_winners: winners
                        .iter()
                        .map(|w| PotWinner { player_id: w.player_id, amount: w.amount, pot_label: w.pot_label.clone() })
                        .collect(),
                    rake: RakeBreakdown::default(),
                };
                let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
                let mut topup_boundary = self.topup_boundary.lock().expect("topup boundary mutex poisoned");
                topup_boundary.begin_settlement(table_id);
                let settled = self
                    .settlement_recorder
                    .record_settlement(&mut ledger, self.clock.as_ref(), &attribution)
                    .map_err(|e| FacadeError::new(ResponseCode::InternalError, e.to_string()));
                topup_boundary.end_settlement(table_id);
                settled?;
            }

            runtime.last_result = Some(HandResultView {
                hand_id: result.hand.hand_id,
                reason,
                winners,
                winning_hand_description: description,
                final_stacks,
            });
            runtime.lobby = result.hand.table.clone();
            runtime.hand = None;
        } else {
            runtime.hand = Some(result.hand);
        }

        runtime.broadcast(&events);
        self.snapshot_if_meaningful(table_id);
        Ok(events)
    }

    pub fn get_game_state(&self, table_id: TableId) -> Result<GameStateView, FacadeError> {
        let runtime = self
            .tables
            .get(&table_id.inner())
            .ok_or_else(|| FacadeError::new(ResponseCode::PlayerNotFound, "no such table"))?;
        let table = runtime.hand.as_ref().map(|h| h.table.clone()).unwrap_or_else(|| runtime.lobby.clone());
        Ok(GameStateView { table_id, hand_in_progress: runtime.hand.is_some(), table })
    }

    pub fn get_hand_result(&self, table_id: TableId) -> Result<HandResultView, FacadeError> {
        self.tables
            .get(&table_id.inner())
            .and_then(|r| r.last_result.clone())
            .ok_or_else(|| FacadeError::new(ResponseCode::HandNotInProgress, "no completed hand to report"))
    }

    /// A pending action beyond the deadline becomes a deterministic fold,
    /// fed through the normal reducer path rather than cancelled
    /// out-of-band (per the concurrency model's cancellation policy).
    pub fn apply_action_timeout(&mut self, table_id: TableId, seat: Position) -> Result<Vec<GameEvent>, FacadeError> {
        self.process_action(table_id, seat, Action::Fold)
    }

    fn snapshot_if_meaningful(&mut self, table_id: TableId) {
        let Some(runtime) = self.tables.get_mut(&table_id.inner()) else { return };
        runtime.snapshot_version += 1;
        let version = runtime.snapshot_version;
        let input = SnapshotInput {
            table_id,
            config: runtime.config,
            game_state: runtime.hand.as_ref().map(|h| h.table.clone()).unwrap_or_else(|| runtime.lobby.clone()),
            hand_id: runtime.hand.as_ref().map(|h| h.hand_id),
            hand_number: runtime.hand.as_ref().map(|h| h.table.hand_number).unwrap_or(runtime.lobby.hand_number),
            dealer_index: runtime.hand.as_ref().map(|h| h.table.dealer_index).unwrap_or(runtime.lobby.dealer_index),
        };
        let snapshot = self.snapshot_writer.build(self.clock.as_ref(), version, input);
        if let Err(err) = self.snapshot_store.save(snapshot) {
            log::warn!("snapshot write for table {table_id} failed: {err}");
        }
    }

    pub fn recover_table(&mut self, table_id: TableId) -> Result<hl_snapshot::RecoveredTable, FacadeError> {
        self.recovery
            .recover(self.snapshot_store.as_ref(), table_id)
            .map_err(|e| FacadeError::new(ResponseCode::InternalError, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::FixedClock;

    fn service() -> GameService {
        GameService::new(Box::new(FixedClock::ticking_from(0, 1)), Config::default())
    }

    #[test]
    fn join_start_and_fold_settles_blinds_heads_up() {
        let mut service = service();
        let table_id: TableId = ID::default();
        service.create_table(table_id, Config::default());
        let p1 = PlayerId::default();
        let p2 = PlayerId::default();
        service.join_table(table_id, p1, "p1", 1000).unwrap();
        service.join_table(table_id, p2, "p2", 1000).unwrap();

        service.start_hand(table_id, Deck::canonical()).unwrap();
        let state = service.get_game_state(table_id).unwrap();
        assert!(state.hand_in_progress);
        let acting = state.table.active_player_index.unwrap();

        let events = service.process_action(table_id, acting, Action::Fold).unwrap();
        assert!(events.iter().any(|e| matches!(e.kind, hl_engine::EventKind::HandEnded { .. })));

        let result = service.get_hand_result(table_id).unwrap();
        let total: Chips = result.final_stacks.iter().map(|(_, s)| *s).sum();
        assert_eq!(total, 2000);

        let state = service.get_game_state(table_id).unwrap();
        assert!(!state.hand_in_progress);
    }

    #[test]
    fn joining_full_table_is_rejected() {
        let mut service = service();
        let table_id: TableId = ID::default();
        service.create_table(table_id, Config::default());
        for i in 0..MAX_SEATS {
            service.join_table(table_id, PlayerId::default(), format!("p{i}"), 1000).unwrap();
        }
        let err = service.join_table(table_id, PlayerId::default(), "overflow", 1000).unwrap_err();
        assert_eq!(err.code(), ResponseCode::TableFull);
    }

    #[test]
    fn buy_in_outside_bounds_is_rejected() {
        let mut service = service();
        let table_id: TableId = ID::default();
        service.create_table(table_id, Config::default());
        let err = service.join_table(table_id, PlayerId::default(), "p1", 1).unwrap_err();
        assert_eq!(err.code(), ResponseCode::InvalidAmount);
    }

    #[test]
    fn acting_out_of_turn_is_rejected() {
        let mut service = service();
        let table_id: TableId = ID::default();
        service.create_table(table_id, Config::default());
        let p1 = PlayerId::default();
        let p2 = PlayerId::default();
        service.join_table(table_id, p1, "p1", 1000).unwrap();
        service.join_table(table_id, p2, "p2", 1000).unwrap();
        service.start_hand(table_id, Deck::canonical()).unwrap();
        let acting = service.get_game_state(table_id).unwrap().table.active_player_index.unwrap();
        let wrong_seat = 1 - acting;
        let err = service.process_action(table_id, wrong_seat, Action::Call).unwrap_err();
        assert_eq!(err.code(), ResponseCode::NotYourTurn);
    }

    #[test]
    fn subscribers_receive_every_broadcast_event() {
        let mut service = service();
        let table_id: TableId = ID::default();
        service.create_table(table_id, Config::default());
        let mut rx = service.subscribe(table_id).unwrap();
        service.join_table(table_id, PlayerId::default(), "p1", 1000).unwrap();
        service.join_table(table_id, PlayerId::default(), "p2", 1000).unwrap();
        service.start_hand(table_id, Deck::canonical()).unwrap();
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert!(received > 0);
    }
}
