//! The only door external value can walk through (C9): every chip that
//! enters the system from outside play does so as a `TopUpIntent` that
//! this boundary validates, deduplicates by intent id, and time-gates
//! against any table currently settling a hand, before handing it to
//! `Ledger::append`. `AdminCredit` is a thin wrapper around this
//! same path, not a second door.
use std::collections::{BTreeMap, HashSet};

use hl_core::{Chips, Clock, Millis, ID};

use crate::chain::Ledger;
use crate::entry::{EntryInput, LedgerEntry, Party, Source};
use crate::errors::BoundaryError;

/// Keyword fragments that may never appear (case-insensitively) in a
/// boundary intent's metadata key or value. This is a vocabulary fence,
/// not a business rule: the engine and ledger model chip movement only,
/// never currency, wallets, or payment rails.
const FORBIDDEN_FRAGMENTS: &[&str] = &[
    "currency", "wallet", "payment", "crypto", "blockchain", "bitcoin", "ethereum", "token",
    "bank", "withdrawal", "deposit", "transfer", "invoice", "creditcard", "paypal", "stripe",
];

/// Metadata keys that are forbidden outright regardless of their value.
const FORBIDDEN_KEYS: &[&str] = &["currency", "walletId", "paymentMethod", "cardNumber", "iban"];

fn scan_vocabulary(metadata: &BTreeMap<String, String>, context: &'static str) -> Vec<BoundaryError> {
    let mut errors = Vec::new();
    for (key, value) in metadata {
        let lower_key = key.to_lowercase();
        if FORBIDDEN_KEYS.iter().any(|forbidden| lower_key == forbidden.to_lowercase()) {
            errors.push(BoundaryError::ForbiddenVocabulary(key.clone(), context, "forbidden key".to_string()));
            continue;
        }
        let lower_value = value.to_lowercase();
        if let Some(hit) = FORBIDDEN_FRAGMENTS.iter().find(|frag| lower_key.contains(**frag) || lower_value.contains(**frag)) {
            errors.push(BoundaryError::ForbiddenVocabulary(key.clone(), context, format!("matches forbidden term \"{hit}\"")));
        }
    }
    errors
}

/// An external request to credit a player's stack from outside play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpIntent {
    pub intent_id: String,
    pub player_id: ID<hl_core::marker::Player>,
    pub club_id: ID<hl_core::marker::Club>,
    pub table_id: Option<ID<hl_core::marker::Table>>,
    pub amount: Chips,
    pub requested_at: Millis,
    pub metadata: BTreeMap<String, String>,
}

impl TopUpIntent {
    fn validate(&self) -> Vec<BoundaryError> {
        let mut errors = Vec::new();
        if self.intent_id.is_empty() || self.intent_id.len() > 256 {
            errors.push(BoundaryError::InvalidIntentId);
        }
        if self.amount <= 0 {
            errors.push(BoundaryError::InvalidAmount(self.amount));
        }
        errors.extend(scan_vocabulary(&self.metadata, "TopUpIntent"));
        errors
    }
}

/// Outcome of submitting an intent to the boundary. Modeled as a plain
/// enum rather than `Result` because a duplicate is an expected, reportable
/// outcome, not a failure of the caller's request.
#[derive(Debug, Clone, PartialEq)]
pub enum TopUpOutcome {
    Accepted(LedgerEntry),
    Duplicate,
    Rejected(Vec<BoundaryError>),
}

/// Validates, deduplicates, and time-gates `TopUpIntent`s, then writes
/// exactly one ledger entry per accepted intent. Owns its own "processed
/// intent id" set and settlement-window set; both are table-independent
/// shared state and, per the concurrency model, must be guarded by the
/// caller with a mutex if shared across threads.
#[derive(Debug, Default)]
pub struct TopUpBoundary {
    processed: HashSet<String>,
    settling_tables: HashSet<uuid::Uuid>,
}

impl TopUpBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_settlement(&mut self, table_id: ID<hl_core::marker::Table>) {
        self.settling_tables.insert(table_id.inner());
    }
    pub fn end_settlement(&mut self, table_id: ID<hl_core::marker::Table>) {
        self.settling_tables.remove(&table_id.inner());
    }
    pub fn is_settling(&self, table_id: ID<hl_core::marker::Table>) -> bool {
        self.settling_tables.contains(&table_id.inner())
    }

    pub fn has_processed(&self, intent_id: &str) -> bool {
        self.processed.contains(intent_id)
    }

    /// Validate and, if accepted, append the resulting ledger entry.
    pub fn process(&mut self, ledger: &mut Ledger, clock: &dyn Clock, intent: TopUpIntent) -> TopUpOutcome {
        if self.has_processed(&intent.intent_id) {
            return TopUpOutcome::Duplicate;
        }

        let mut errors = intent.validate();
        if let Some(table_id) = intent.table_id {
            if self.is_settling(table_id) {
                errors.push(BoundaryError::ForbiddenTiming(table_id.to_string()));
            }
        }
        if !errors.is_empty() {
            return TopUpOutcome::Rejected(errors);
        }

        let mut metadata = intent.metadata.clone();
        metadata.insert("intentId".to_string(), intent.intent_id.clone());
        metadata.insert("requestedAt".to_string(), intent.requested_at.to_string());

        let mut input = EntryInput::new(Source::TopUp, Party::Player { id: intent.player_id }, intent.amount, "external top-up")
            .with_club(intent.club_id);
        if let Some(table_id) = intent.table_id {
            input = input.with_table(table_id);
        }
        input.metadata = metadata;

        let entry = ledger.append(clock, input);
        self.processed.insert(intent.intent_id);
        TopUpOutcome::Accepted(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::FixedClock;

    fn intent(id: &str, amount: Chips) -> TopUpIntent {
        TopUpIntent {
            intent_id: id.to_string(),
            player_id: ID::default(),
            club_id: ID::default(),
            table_id: None,
            amount,
            requested_at: 0,
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn accepted_topup_writes_one_player_credit_entry() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let outcome = boundary.process(&mut ledger, &clock, intent("t1", 500));
        match outcome {
            TopUpOutcome::Accepted(entry) => {
                assert_eq!(entry.delta, 500);
                assert_eq!(entry.source, Source::TopUp);
                assert!(entry.affected_party.is_player());
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn resubmitting_the_same_intent_id_is_a_duplicate_not_a_second_entry() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        boundary.process(&mut ledger, &clock, intent("t1", 500));
        let second = boundary.process(&mut ledger, &clock, intent("t1", 500));
        assert_eq!(second, TopUpOutcome::Duplicate);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let outcome = boundary.process(&mut ledger, &clock, intent("t1", 0));
        assert!(matches!(outcome, TopUpOutcome::Rejected(_)));
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn forbidden_vocabulary_in_metadata_is_rejected() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let mut bad = intent("t1", 500);
        bad.metadata.insert("walletId".to_string(), "abc".to_string());
        let outcome = boundary.process(&mut ledger, &clock, bad);
        assert!(matches!(outcome, TopUpOutcome::Rejected(_)));
    }

    #[test]
    fn topup_during_active_settlement_is_rejected() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        let mut boundary = TopUpBoundary::new();
        let table_id = ID::default();
        boundary.begin_settlement(table_id);
        let mut during = intent("t1", 500);
        during.table_id = Some(table_id);
        let outcome = boundary.process(&mut ledger, &clock, during);
        assert!(matches!(outcome, TopUpOutcome::Rejected(ref errs) if errs.iter().any(|e| matches!(e, BoundaryError::ForbiddenTiming(_)))));

        boundary.end_settlement(table_id);
        let mut after = intent("t2", 500);
        after.table_id = Some(table_id);
        let outcome = boundary.process(&mut ledger, &clock, after);
        assert!(matches!(outcome, TopUpOutcome::Accepted(_)));
    }
}
