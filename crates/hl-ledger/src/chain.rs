//! The append-only ledger itself (C6): a `Vec<LedgerEntry>` whose tail is
//! always hash-chained to its predecessor, so that truncating, reordering,
//! or editing any prior entry is detectable by `verify_integrity`.
use hl_core::{Clock, Sequence};

use crate::canonical::{entry_checksum, genesis_checksum};
use crate::entry::{BatchId, EntryId, EntryInput, LedgerEntry};
use crate::errors::LedgerError;

/// A batch groups entries appended together (e.g. all the pot-payout
/// entries of a single settlement) under one id, without weakening the
/// chain: each entry inside a batch is still individually checksummed and
/// chained to the entry before it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerBatch {
    pub batch_id: BatchId,
    pub entries: Vec<LedgerEntry>,
}

/// Append-only value ledger. Callers are expected to guard concurrent
/// access with a `Mutex<Ledger>` (or similar) at the boundary that owns
/// it; `Ledger` itself assumes single-writer access to each `append*`
/// call, matching the "append path is exclusive" rule.
#[derive(Debug)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    tail_checksum: [u8; 32],
    next_sequence: Sequence,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            tail_checksum: genesis_checksum(),
            next_sequence: 1,
        }
    }

    /// Rehydrate a ledger from entries already known to be valid (e.g. read
    /// back from a store). Does not re-verify the chain; call
    /// `verify_integrity` afterward if the source is untrusted.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        let tail_checksum = entries.last().map(|e| e.checksum).unwrap_or_else(genesis_checksum);
        let next_sequence = entries.last().map(|e| e.sequence + 1).unwrap_or(1);
        Self {
            entries,
            tail_checksum,
            next_sequence,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Direct mutable access for tests that need to simulate tampering
    /// with an already-appended entry; production code never calls this.
    #[cfg(test)]
    pub fn entries_mut_for_test(&mut self) -> &mut Vec<LedgerEntry> {
        &mut self.entries
    }

    fn append_one(&mut self, clock: &dyn Clock, input: EntryInput) -> LedgerEntry {
        let entry_id = EntryId::default();
        let sequence = self.next_sequence;
        let timestamp = clock.now_millis();
        let checksum = entry_checksum(
            self.tail_checksum,
            entry_id,
            sequence,
            timestamp,
            input.source,
            &input.affected_party,
            input.delta,
            input.state_version,
            input.table_id,
            input.club_id,
            input.hand_id,
            &input.description,
            &input.metadata,
        );
        let entry = LedgerEntry {
            entry_id,
            sequence,
            timestamp,
            source: input.source,
            affected_party: input.affected_party,
            delta: input.delta,
            state_version: input.state_version,
            table_id: input.table_id,
            club_id: input.club_id,
            hand_id: input.hand_id,
            description: input.description,
            metadata: input.metadata,
            checksum,
        };
        self.tail_checksum = checksum;
        self.next_sequence += 1;
        self.entries.push(entry.clone());
        entry
    }

    /// Append a single entry, chaining it to the current tail.
    pub fn append(&mut self, clock: &dyn Clock, input: EntryInput) -> LedgerEntry {
        self.append_one(clock, input)
    }

    /// Append several entries as one logical batch (e.g. a settlement's pot
    /// payouts). Each entry is still chained individually, in the order
    /// given, so the batch leaves no gap for a partial-apply ambiguity.
    pub fn append_batch(&mut self, clock: &dyn Clock, inputs: Vec<EntryInput>) -> LedgerBatch {
        let batch_id = BatchId::default();
        let entries = inputs.into_iter().map(|input| self.append_one(clock, input)).collect();
        LedgerBatch { batch_id, entries }
    }

    /// Recompute every entry's checksum from its fields and the previous
    /// entry's checksum, and check it against the stored value. Returns the
    /// first mismatch found, if any.
    pub fn verify_integrity(&self) -> Result<(), LedgerError> {
        let mut previous = genesis_checksum();
        let mut expected_sequence = 1u64;
        for entry in &self.entries {
            if entry.sequence != expected_sequence {
                return Err(LedgerError::SequenceGap {
                    expected: expected_sequence,
                    actual: entry.sequence,
                });
            }
            let recomputed = entry_checksum(
                previous,
                entry.entry_id,
                entry.sequence,
                entry.timestamp,
                entry.source,
                &entry.affected_party,
                entry.delta,
                entry.state_version,
                entry.table_id,
                entry.club_id,
                entry.hand_id,
                &entry.description,
                &entry.metadata,
            );
            if recomputed != entry.checksum {
                return Err(LedgerError::ChecksumMismatch { sequence: entry.sequence });
            }
            previous = entry.checksum;
            expected_sequence += 1;
        }
        Ok(())
    }

    /// Sum of every entry's delta attributed to a given party. Used by the
    /// invariant checker (C8) to recompute balances from scratch rather
    /// than trust a cached running total.
    pub fn balance_of(&self, party: &crate::entry::Party) -> hl_core::Chips {
        self.entries
            .iter()
            .filter(|e| &e.affected_party == party)
            .map(|e| e.delta)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Party, Source};
    use hl_core::FixedClock;

    fn input(delta: i64) -> EntryInput {
        EntryInput::new(Source::TopUp, Party::Platform, delta, "test")
    }

    #[test]
    fn appended_entries_chain_and_verify() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        ledger.append(&clock, input(100));
        ledger.append(&clock, input(-50));
        ledger.append(&clock, input(25));
        assert_eq!(ledger.len(), 3);
        assert!(ledger.verify_integrity().is_ok());
    }

    #[test]
    fn tampering_with_an_entry_breaks_verification() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        ledger.append(&clock, input(100));
        ledger.append(&clock, input(-50));
        ledger.entries[0].delta = 999;
        assert!(matches!(
            ledger.verify_integrity(),
            Err(LedgerError::ChecksumMismatch { sequence: 1 })
        ));
    }

    #[test]
    fn truncating_the_chain_is_detected_by_sequence_gap() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        ledger.append(&clock, input(100));
        ledger.append(&clock, input(-50));
        ledger.entries.remove(0);
        assert!(matches!(
            ledger.verify_integrity(),
            Err(LedgerError::SequenceGap { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn batch_append_chains_every_member() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        let batch = ledger.append_batch(&clock, vec![input(10), input(20), input(-30)]);
        assert_eq!(batch.entries.len(), 3);
        assert!(ledger.verify_integrity().is_ok());
        assert_eq!(ledger.balance_of(&Party::Platform), 0);
    }

    #[test]
    fn rehydrated_ledger_resumes_sequence_and_tail() {
        let clock = FixedClock::at(1_000);
        let mut ledger = Ledger::new();
        ledger.append(&clock, input(100));
        ledger.append(&clock, input(50));
        let entries = ledger.entries().to_vec();

        let mut resumed = Ledger::from_entries(entries);
        let appended = resumed.append(&clock, input(1));
        assert_eq!(appended.sequence, 3);
        assert!(resumed.verify_integrity().is_ok());
    }
}
