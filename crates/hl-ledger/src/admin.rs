//! Manual, reason-coded credits. An `AdminCreditIntent` never writes
//! the ledger directly: it is validated on its own terms (registered
//! admin, non-empty note) and then translated into a freshly allocated
//! `TopUpIntent` so it flows through the exact same boundary as an
//! external top-up, inheriting idempotency, timing, and vocabulary
//! enforcement for free rather than re-implementing them.
use std::collections::{BTreeMap, HashSet};

use hl_core::{Chips, Clock, ID};

use crate::boundary::{TopUpBoundary, TopUpIntent, TopUpOutcome};
use crate::chain::Ledger;
use crate::errors::BoundaryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminCreditReason {
    OfflineBuyin,
    Promotion,
    Testing,
    Correction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCreditIntent {
    pub intent_id: String,
    pub admin_id: ID<hl_core::marker::Admin>,
    pub player_id: ID<hl_core::marker::Player>,
    pub club_id: ID<hl_core::marker::Club>,
    pub table_id: Option<ID<hl_core::marker::Table>>,
    pub amount: Chips,
    pub reason: AdminCreditReason,
    pub note: String,
}

/// Wraps a `TopUpBoundary` with an admin registry and reason-code
/// validation. Admin-credit entries are TopUp entries underneath, so they
/// can never carry `source = HAND_SETTLEMENT` or CLUB/AGENT/PLATFORM
/// attribution — the wrapped boundary only ever produces `PLAYER` deltas.
#[derive(Debug, Default)]
pub struct AdminCreditService {
    registered_admins: HashSet<uuid::Uuid>,
}

impl AdminCreditService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_admin(&mut self, admin_id: ID<hl_core::marker::Admin>) {
        self.registered_admins.insert(admin_id.inner());
    }

    fn validate(&self, intent: &AdminCreditIntent) -> Vec<BoundaryError> {
        let mut errors = Vec::new();
        if !self.registered_admins.contains(&intent.admin_id.inner()) {
            errors.push(BoundaryError::UnregisteredAdmin(intent.admin_id.to_string()));
        }
        if intent.note.trim().is_empty() {
            errors.push(BoundaryError::EmptyNote);
        }
        if intent.amount <= 0 {
            errors.push(BoundaryError::InvalidAmount(intent.amount));
        }
        errors
    }

    /// Validate, then hand off to the wrapped `TopUpBoundary` using a
    /// freshly allocated top-up intent id derived from this admin-credit
    /// intent's own id, so the two idempotency spaces never collide.
    pub fn process(
        &self,
        boundary: &mut TopUpBoundary,
        ledger: &mut Ledger,
        clock: &dyn Clock,
        intent: AdminCreditIntent,
    ) -> TopUpOutcome {
        let errors = self.validate(&intent);
        if !errors.is_empty() {
            return TopUpOutcome::Rejected(errors);
        }

        let mut metadata = BTreeMap::new();
        metadata.insert("adminId".to_string(), intent.admin_id.to_string());
        metadata.insert("reason".to_string(), format!("{:?}", intent.reason));
        metadata.insert("note".to_string(), intent.note.clone());
        metadata.insert("adminCreditIntentId".to_string(), intent.intent_id.clone());

        let topup = TopUpIntent {
            intent_id: format!("admin-credit:{}", intent.intent_id),
            player_id: intent.player_id,
            club_id: intent.club_id,
            table_id: intent.table_id,
            amount: intent.amount,
            requested_at: clock.now_millis(),
            metadata,
        };
        boundary.process(ledger, clock, topup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::FixedClock;

    fn intent(admin: ID<hl_core::marker::Admin>, id: &str, amount: Chips) -> AdminCreditIntent {
        AdminCreditIntent {
            intent_id: id.to_string(),
            admin_id: admin,
            player_id: ID::default(),
            club_id: ID::default(),
            table_id: None,
            amount,
            reason: AdminCreditReason::OfflineBuyin,
            note: "manual correction".to_string(),
        }
    }

    #[test]
    fn registered_admin_credit_writes_a_player_only_entry() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let mut service = AdminCreditService::new();
        let admin = ID::default();
        service.register_admin(admin);

        let outcome = service.process(&mut boundary, &mut ledger, &clock, intent(admin, "a1", 1000));
        match outcome {
            TopUpOutcome::Accepted(entry) => {
                assert!(entry.affected_party.is_player());
                assert_eq!(entry.source, crate::entry::Source::TopUp);
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
    }

    #[test]
    fn unregistered_admin_is_rejected() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let service = AdminCreditService::new();
        let outcome = service.process(&mut boundary, &mut ledger, &clock, intent(ID::default(), "a1", 1000));
        assert!(matches!(outcome, TopUpOutcome::Rejected(ref e) if e.iter().any(|e| matches!(e, BoundaryError::UnregisteredAdmin(_)))));
    }

    #[test]
    fn empty_note_is_rejected() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let mut service = AdminCreditService::new();
        let admin = ID::default();
        service.register_admin(admin);
        let mut bad = intent(admin, "a1", 1000);
        bad.note = "   ".to_string();
        let outcome = service.process(&mut boundary, &mut ledger, &clock, bad);
        assert!(matches!(outcome, TopUpOutcome::Rejected(ref e) if e.iter().any(|e| matches!(e, BoundaryError::EmptyNote))));
    }

    #[test]
    fn two_admin_credits_for_distinct_players_keep_the_ledger_clean() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let mut service = AdminCreditService::new();
        let admin = ID::default();
        service.register_admin(admin);

        service.process(&mut boundary, &mut ledger, &clock, intent(admin, "a1", 1000));
        service.process(&mut boundary, &mut ledger, &clock, intent(admin, "a2", 2000));

        assert_eq!(ledger.len(), 2);
        assert!(ledger.verify_integrity().is_ok());
        assert!(ledger.entries().iter().all(|e| e.affected_party.is_player()));
    }
}
