//! Invariant checker (C8): recomputes each of the five named invariants
//! from the ledger's own entries rather than trusting any cached running
//! total, and reports every violation found rather than stopping at the
//! first.
use std::collections::BTreeMap;

use crate::chain::Ledger;
use crate::entry::{EntryId, Party, Source};
use hl_core::Chips;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvariantName {
    NonNegativeBalance,
    SystemConservation,
    DeterministicReplay,
    AppendOnlyIntegrity,
    AttributionImmutability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub invariant: InvariantName,
    pub severity: Severity,
    pub sequences: Vec<u64>,
    pub cause: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InvariantReport {
    pub all_passed: bool,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Default)]
pub struct InvariantChecker;

impl InvariantChecker {
    pub fn new() -> Self {
        Self
    }

    /// Runs every named invariant against the ledger and returns a single
    /// report. `DETERMINISTIC_REPLAY` cannot be assessed from one ledger
    /// alone (it is a cross-run property, see `assert_replay_equivalent`);
    /// here it only checks that sequence numbers are contiguous, which is
    /// a prerequisite for replay to even be well-defined.
    pub fn check_all(&self, ledger: &Ledger) -> InvariantReport {
        let mut violations = Vec::new();
        violations.extend(self.check_append_only_integrity(ledger));
        violations.extend(self.check_attribution_immutability(ledger));
        violations.extend(self.check_non_negative_balance(ledger));
        violations.extend(self.check_system_conservation(ledger));
        violations.extend(self.check_deterministic_replay_precondition(ledger));
        InvariantReport {
            all_passed: violations.is_empty(),
            violations,
        }
    }

    fn check_append_only_integrity(&self, ledger: &Ledger) -> Vec<Violation> {
        match ledger.verify_integrity() {
            Ok(()) => Vec::new(),
            Err(err) => vec![Violation {
                invariant: InvariantName::AppendOnlyIntegrity,
                severity: Severity::Critical,
                sequences: match &err {
                    crate::errors::LedgerError::ChecksumMismatch { sequence } => vec![*sequence],
                    crate::errors::LedgerError::SequenceGap { actual, .. } => vec![*actual],
                },
                cause: err.to_string(),
            }],
        }
    }

    /// The checksum chain (`AppendOnlyIntegrity`) catches an entry edited
    /// after the fact, but not a second, differently-attributed entry
    /// appended under an `entry_id` that already exists; each entry gets
    /// its own valid checksum, so the chain alone has nothing to object to.
    /// This walks the entries independently and flags any `entry_id` whose
    /// `(source, affected_party, delta)` disagrees with the first entry
    /// recorded under that id.
    fn check_attribution_immutability(&self, ledger: &Ledger) -> Vec<Violation> {
        let mut seen: BTreeMap<EntryId, (Source, Party, Chips, u64)> = BTreeMap::new();
        let mut violations = Vec::new();
        for entry in ledger.entries() {
            match seen.get(&entry.entry_id) {
                Some(&(source, party, delta, first_sequence))
                    if (source, party, delta) != (entry.source, entry.affected_party, entry.delta) =>
                {
                    violations.push(Violation {
                        invariant: InvariantName::AttributionImmutability,
                        severity: Severity::Critical,
                        sequences: vec![first_sequence, entry.sequence],
                        cause: format!(
                            "entry_id {} was recorded as {source:?}/{party:?}/{delta} at sequence {first_sequence} \
                             but reappears as {:?}/{:?}/{} at sequence {}",
                            entry.entry_id, entry.source, entry.affected_party, entry.delta, entry.sequence
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(entry.entry_id, (entry.source, entry.affected_party, entry.delta, entry.sequence));
                }
            }
        }
        violations
    }

    fn check_non_negative_balance(&self, ledger: &Ledger) -> Vec<Violation> {
        let mut running: BTreeMap<Party, (i64, Vec<u64>)> = BTreeMap::new();
        let mut violations = Vec::new();
        for entry in ledger.entries() {
            if !entry.affected_party.is_player() {
                continue;
            }
            let bucket = running.entry(entry.affected_party).or_insert((0, Vec::new()));
            bucket.0 += entry.delta;
            bucket.1.push(entry.sequence);
            if bucket.0 < 0 {
                violations.push(Violation {
                    invariant: InvariantName::NonNegativeBalance,
                    severity: Severity::Critical,
                    sequences: bucket.1.clone(),
                    cause: format!("derived balance went negative ({}) after entry {}", bucket.0, entry.sequence),
                });
            }
        }
        violations
    }

    /// Conservation over hand-settlement batches: every settlement batch's ledger
    /// entries must sum to zero net of the contributions it is paying out
    /// (this rewrite's chosen convention records settlement entries as
    /// positive-credit-only — see the grounding ledger — so conservation
    /// is instead checked against the declared pot total per hand via
    /// `metadata["potTotal"]` when present; absent that, the check is
    /// skipped for that hand rather than producing a false positive).
    fn check_system_conservation(&self, ledger: &Ledger) -> Vec<Violation> {
        let mut by_hand: BTreeMap<uuid::Uuid, (i64, Vec<u64>, Option<i64>)> = BTreeMap::new();
        for entry in ledger.entries() {
            let Some(hand_id) = entry.hand_id else { continue };
            let bucket = by_hand.entry(hand_id.inner()).or_insert((0, Vec::new(), None));
            bucket.0 += entry.delta;
            bucket.1.push(entry.sequence);
            if let Some(total) = entry.metadata.get("potTotal").and_then(|s| s.parse::<i64>().ok()) {
                bucket.2 = Some(total);
            }
        }
        by_hand
            .into_iter()
            .filter_map(|(hand_id, (sum, sequences, pot_total))| {
                let expected = pot_total?;
                if sum == expected {
                    None
                } else {
                    Some(Violation {
                        invariant: InvariantName::SystemConservation,
                        severity: Severity::Critical,
                        sequences,
                        cause: format!("hand {hand_id} settled {sum} but declared pot total was {expected}"),
                    })
                }
            })
            .collect()
    }

    fn check_deterministic_replay_precondition(&self, ledger: &Ledger) -> Vec<Violation> {
        let mut violations = Vec::new();
        for window in ledger.entries().windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if b.sequence != a.sequence + 1 {
                violations.push(Violation {
                    invariant: InvariantName::DeterministicReplay,
                    severity: Severity::Critical,
                    sequences: vec![a.sequence, b.sequence],
                    cause: "non-contiguous sequence numbers make replay position ill-defined".to_string(),
                });
            }
        }
        violations
    }

    /// Two independently produced entry lists are replay-equivalent if
    /// they agree entry-by-entry on everything except wall-clock
    /// timestamps (which a supplied, possibly differing, clock may stamp
    /// differently across runs).
    pub fn assert_replay_equivalent(&self, a: &Ledger, b: &Ledger) -> Result<(), Violation> {
        if a.len() != b.len() {
            return Err(Violation {
                invariant: InvariantName::DeterministicReplay,
                severity: Severity::Critical,
                sequences: vec![],
                cause: format!("replay produced {} entries, expected {}", b.len(), a.len()),
            });
        }
        for (left, right) in a.entries().iter().zip(b.entries()) {
            let equivalent = left.sequence == right.sequence
                && left.source == right.source
                && left.affected_party == right.affected_party
                && left.delta == right.delta
                && left.state_version == right.state_version
                && left.table_id == right.table_id
                && left.club_id == right.club_id
                && left.hand_id == right.hand_id
                && left.description == right.description
                && left.metadata == right.metadata;
            if !equivalent {
                return Err(Violation {
                    invariant: InvariantName::DeterministicReplay,
                    severity: Severity::Critical,
                    sequences: vec![left.sequence],
                    cause: format!("entry {} diverged between replay runs", left.sequence),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Ledger;
    use crate::entry::{EntryInput, Source};
    use hl_core::FixedClock;

    #[test]
    fn clean_ledger_passes_all_checks() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        ledger.append(&clock, EntryInput::new(Source::TopUp, Party::Platform, 100, "x"));
        let report = InvariantChecker::new().check_all(&ledger);
        assert!(report.all_passed);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn tampered_ledger_fails_append_only_integrity() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        ledger.append(&clock, EntryInput::new(Source::TopUp, Party::Platform, 100, "x"));
        ledger.entries_mut_for_test()[0].delta = 1;
        let report = InvariantChecker::new().check_all(&ledger);
        assert!(!report.all_passed);
        assert!(report
            .violations
            .iter()
            .any(|v| v.invariant == InvariantName::AppendOnlyIntegrity));
    }

    #[test]
    fn reusing_an_entry_id_with_different_attribution_is_flagged() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        ledger.append(&clock, EntryInput::new(Source::TopUp, Party::Platform, 100, "x"));
        ledger.append(&clock, EntryInput::new(Source::TopUp, Party::Platform, 50, "y"));
        let reused_id = ledger.entries()[0].entry_id;
        ledger.entries_mut_for_test()[1].entry_id = reused_id;
        ledger.entries_mut_for_test()[1].affected_party = Party::Player { id: Default::default() };
        let report = InvariantChecker::new().check_all(&ledger);
        assert!(!report.all_passed);
        assert!(report
            .violations
            .iter()
            .any(|v| v.invariant == InvariantName::AttributionImmutability));
    }

    #[test]
    fn negative_player_balance_is_flagged() {
        let clock = FixedClock::at(0);
        let mut ledger = Ledger::new();
        let player = Party::Player { id: Default::default() };
        ledger.append(&clock, EntryInput::new(Source::TopUp, player, 50, "x"));
        ledger.append(&clock, EntryInput::new(Source::HandSettlement, player, -100, "x"));
        let report = InvariantChecker::new().check_all(&ledger);
        assert!(report
            .violations
            .iter()
            .any(|v| v.invariant == InvariantName::NonNegativeBalance));
    }

    #[test]
    fn identical_ledgers_are_replay_equivalent() {
        let clock_a = FixedClock::at(0);
        let clock_b = FixedClock::at(999_999);
        let mut a = Ledger::new();
        let mut b = Ledger::new();
        a.append(&clock_a, EntryInput::new(Source::TopUp, Party::Platform, 10, "x"));
        b.append(&clock_b, EntryInput::new(Source::TopUp, Party::Platform, 10, "x"));
        assert!(InvariantChecker::new().assert_replay_equivalent(&a, &b).is_ok());
    }
}
