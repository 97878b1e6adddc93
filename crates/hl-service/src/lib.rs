//! Game service facade: request validation and dispatch into the hand
//! reducers, event subscriptions, and the wire-protocol DTOs a transport
//! layer would serialize. Nothing below this crate ever sees a socket.
#![allow(dead_code)]
mod constants;
mod dto;
mod errors;
mod facade;

pub use constants::{ENGINE_CAPABILITIES, ENGINE_RESTRICTIONS};
pub use dto::{ClientEnvelope, ClientMessage, Envelope, MessageHeader, ServerEnvelope, ServerMessage};
pub use errors::{FacadeError, ResponseCode};
pub use facade::{GameService, GameStateView, HandResultView, TableRuntime};
