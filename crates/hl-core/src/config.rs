//! Runtime configuration for a table, its ledger, and its snapshot store.
//!
//! Every tunable here has a hardcoded default matching the constants a
//! reference deployment would use; `Config::from_env` lets a binary override
//! any of them without touching the reducers or the ledger.
use std::time::Duration;

use crate::Chips;

/// Big blind used when a table is created without an explicit stake.
pub const DEFAULT_BIG_BLIND: Chips = 10;
/// Small blind used when a table is created without an explicit stake.
pub const DEFAULT_SMALL_BLIND: Chips = 5;
/// Starting stack for a freshly seated player, in chips.
pub const DEFAULT_STARTING_STACK: Chips = 1000;
/// Maximum re-raises per betting round before action is capped.
pub const MAX_RAISE_REPEATS: usize = 8;
/// Minimum buy-in, expressed as a multiple of the big blind.
pub const BUY_IN_MIN_BB: Chips = 10;
/// Maximum buy-in, expressed as a multiple of the big blind.
pub const BUY_IN_MAX_BB: Chips = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub starting_stack: Chips,
    pub max_raise_repeats: usize,
    pub buy_in_min_bb: Chips,
    pub buy_in_max_bb: Chips,
    pub action_timeout: Duration,
    pub snapshot_min_interval: Duration,
    pub reconnect_grace_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            starting_stack: DEFAULT_STARTING_STACK,
            max_raise_repeats: MAX_RAISE_REPEATS,
            buy_in_min_bb: BUY_IN_MIN_BB,
            buy_in_max_bb: BUY_IN_MAX_BB,
            action_timeout: Duration::from_secs(30),
            snapshot_min_interval: Duration::from_millis(500),
            reconnect_grace_period: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn buy_in_min(&self) -> Chips {
        self.buy_in_min_bb * self.big_blind
    }
    pub fn buy_in_max(&self) -> Chips {
        self.buy_in_max_bb * self.big_blind
    }

    /// Overlay environment-variable overrides onto the defaults. Unset or
    /// unparsable variables are silently ignored in favor of the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_chips("HL_SMALL_BLIND") {
            config.small_blind = v;
        }
        if let Some(v) = env_chips("HL_BIG_BLIND") {
            config.big_blind = v;
        }
        if let Some(v) = env_chips("HL_STARTING_STACK") {
            config.starting_stack = v;
        }
        if let Some(v) = env_duration("HL_ACTION_TIMEOUT_SECS") {
            config.action_timeout = v;
        }
        if let Some(v) = env_duration("HL_RECONNECT_GRACE_SECS") {
            config.reconnect_grace_period = v;
        }
        config
    }
}

fn env_chips(key: &str) -> Option<Chips> {
    std::env::var(key).ok()?.trim().parse().ok()
}
fn env_duration(key: &str) -> Option<Duration> {
    let secs: u64 = std::env::var(key).ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}
