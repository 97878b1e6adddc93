//! Process entry point.
//!
//! Wires ambient logging and shutdown handling around the game service
//! facade. The facade is transport-agnostic; this binary does not
//! open a socket — that wire layer is an external collaborator — so the
//! main loop here just keeps the process alive and polls for the soft
//! shutdown signal between table housekeeping ticks.

use std::time::Duration;

use hl_core::{Config, SystemClock};
use hl_service::GameService;

#[tokio::main]
async fn main() {
    hl_core::runtime::init_logging();
    hl_core::runtime::install_hard_interrupt();
    hl_core::runtime::install_soft_interrupt();

    let config = Config::from_env();
    let _service = GameService::new(Box::new(SystemClock), config);
    log::info!("game service initialized, awaiting table activity");

    while !hl_core::interrupted() {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    log::warn!("shutdown signal observed, exiting");
}
