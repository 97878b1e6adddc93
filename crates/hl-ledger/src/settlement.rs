//! Turns the outcome of one settled hand (C7) into ledger entries: a debit
//! for every contributing player already lives in the ledger as part of
//! play, so settlement only ever credits — pot winners, and whatever
//! combination of club/agent/platform rake the table is configured with.
//! Kept independent of `hl-engine`'s `PotAward`/table types: the caller
//! (the service facade) is responsible for translating a hand's
//! outcome into a `SettlementAttribution`, so the ledger never needs to
//! know how a pot was computed, only how it was divided.
use hl_core::{Chips, Clock, ID};

use crate::chain::{Ledger, LedgerBatch};
use crate::entry::{EntryInput, Party, Source};
use crate::errors::SettlementError;

/// One player's share of a settled pot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotWinner {
    pub player_id: ID<hl_core::marker::Player>,
    pub amount: Chips,
    pub pot_label: String,
}

/// How a hand's rake, if any, is divided once the pot winners are paid.
/// `club_share + agent_share.amount + platform_share` must equal the
/// attribution's declared `rake_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RakeBreakdown {
    pub rake_total: Chips,
    pub club_share: Chips,
    pub agent_share: Chips,
    pub platform_share: Chips,
}

/// Everything needed to record one hand's settlement as ledger entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementAttribution {
    pub hand_id: ID<hl_core::marker::Hand>,
    pub table_id: ID<hl_core::marker::Table>,
    pub club_id: Option<ID<hl_core::marker::Club>>,
    pub agent_id: Option<ID<hl_core::marker::Agent>>,
    pub state_version: u64,
    pub pot_winners: Vec<PotWinner>,
    pub rake: RakeBreakdown,
}

impl SettlementAttribution {
    fn validate(&self) -> Result<(), SettlementError> {
        if self.pot_winners.is_empty() && self.rake.rake_total == 0 {
            return Err(SettlementError::EmptyAttribution);
        }
        let computed = self.rake.club_share + self.rake.agent_share + self.rake.platform_share;
        if computed != self.rake.rake_total {
            return Err(SettlementError::RakeMismatch {
                rake_total: self.rake.rake_total,
                computed,
            });
        }
        if self.rake.agent_share != 0 && self.agent_id.is_none() {
            return Err(SettlementError::AgentShareWithoutAgent {
                amount: self.rake.agent_share,
            });
        }
        Ok(())
    }
}

/// Records settlements (C7) as append-only ledger batches. Holds no state
/// of its own beyond a reference to the ledger it writes into; the caller
/// owns the `Mutex` (or other exclusion) around that ledger.
#[derive(Debug, Default)]
pub struct SettlementRecorder;

impl SettlementRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Validate the attribution, then append one entry per pot winner and
    /// one per non-zero rake share, all chained as a single batch so a
    /// hand's settlement is never partially visible.
    pub fn record_settlement(
        &self,
        ledger: &mut Ledger,
        clock: &dyn Clock,
        attribution: &SettlementAttribution,
    ) -> Result<LedgerBatch, SettlementError> {
        attribution.validate()?;

        let pot_total = attribution.pot_winners.iter().map(|w| w.amount).sum::<Chips>() + attribution.rake.rake_total;

        let mut inputs = Vec::with_capacity(attribution.pot_winners.len() + 3);
        for winner in &attribution.pot_winners {
            inputs.push(
                EntryInput::new(
                    Source::HandSettlement,
                    Party::Player { id: winner.player_id },
                    winner.amount,
                    format!("pot award ({})", winner.pot_label),
                )
                .with_table(attribution.table_id)
                .with_hand(attribution.hand_id)
                .with_state_version(attribution.state_version)
                .with_metadata("potLabel", winner.pot_label.clone())
                .with_metadata("potTotal", pot_total.to_string()),
            );
        }

        if attribution.rake.club_share != 0 {
            let club_id = attribution.club_id.expect("club share without a club id");
            inputs.push(
                EntryInput::new(Source::HandSettlement, Party::Club { id: club_id }, attribution.rake.club_share, "rake: club share")
                    .with_table(attribution.table_id)
                    .with_hand(attribution.hand_id)
                    .with_state_version(attribution.state_version)
                    .with_metadata("potTotal", pot_total.to_string()),
            );
        }
        if attribution.rake.agent_share != 0 {
            let agent_id = attribution.agent_id.expect("validated above");
            inputs.push(
                EntryInput::new(Source::HandSettlement, Party::Agent { id: agent_id }, attribution.rake.agent_share, "rake: agent share")
                    .with_table(attribution.table_id)
                    .with_hand(attribution.hand_id)
                    .with_state_version(attribution.state_version)
                    .with_metadata("potTotal", pot_total.to_string()),
            );
        }
        if attribution.rake.platform_share != 0 {
            inputs.push(
                EntryInput::new(Source::HandSettlement, Party::Platform, attribution.rake.platform_share, "rake: platform share")
                    .with_table(attribution.table_id)
                    .with_hand(attribution.hand_id)
                    .with_state_version(attribution.state_version)
                    .with_metadata("potTotal", pot_total.to_string()),
            );
        }

        Ok(ledger.append_batch(clock, inputs))
    }
}
