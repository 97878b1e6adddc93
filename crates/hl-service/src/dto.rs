//! Wire-protocol DTO shapes (§6). An external collaborator (the socket
//! transport) would serialize these; this crate defines the shapes only,
//! keeping the pure domain model separate from transport framing.
use hl_core::{Chips, Millis, Position, Sequence, ID};
use hl_engine::{Action, GameEvent, PlayerId, TableId};

use crate::errors::ResponseCode;

/// Header every wire message carries, client- or server-originated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageHeader {
    pub message_id: String,
    pub timestamp: Millis,
    pub sequence: Sequence,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    Authenticate { token: String },
    JoinTable { table_id: TableId, buy_in: Chips },
    LeaveTable { table_id: TableId },
    PlayerAction { table_id: TableId, action: Action },
    RequestState { table_id: TableId },
    RequestValidActions { table_id: TableId },
    Rebuy { table_id: TableId, amount: Chips },
    Ping,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Authenticated { player_id: PlayerId },
    Error { code: ResponseCode, detail: String },
    TableJoined { table_id: TableId, seat: Position },
    TableLeft { table_id: TableId },
    PlayerJoined { table_id: TableId, player_id: PlayerId, seat: Position },
    PlayerLeft { table_id: TableId, player_id: PlayerId },
    ActionResult { table_id: TableId, accepted: bool, code: Option<ResponseCode> },
    GameState { table_id: TableId, state: Box<crate::facade::GameStateView> },
    ValidActions { table_id: TableId, valid: hl_engine::ValidActions },
    GameEvent { table_id: TableId, event: GameEvent },
    HandResult { table_id: TableId, result: crate::facade::HandResultView },
    RebuyResult { table_id: TableId, accepted: bool, new_stack: Option<Chips> },
    Pong,
}

/// A single wrapped message with its header, as it would appear on the wire.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Envelope<M> {
    pub header: MessageHeader,
    pub message: M,
}

pub type ClientEnvelope = Envelope<ClientMessage>;
pub type ServerEnvelope = Envelope<ServerMessage>;

pub type AdminId = ID<hl_core::marker::Admin>;
