//! Property-based tests for the transition registry.
//!
//! These tests use proptest to check registry invariants across many
//! randomly generated transactions.

use proptest::prelude::*;
use transition_table::fsm::{validate, Transaction, TransitionRegistry};

prop_compose! {
    fn field()(value in "[a-z]{1,6}") -> String {
        value
    }
}

prop_compose! {
    // Empty about a quarter of the time.
    fn maybe_empty_field()(value in prop_oneof![1 => Just(String::new()), 3 => "[a-z]{1,6}"]) -> String {
        value
    }
}

prop_compose! {
    fn valid_transaction()(
        namespace in field(),
        current in field(),
        event in field(),
        target in field(),
    ) -> Transaction {
        Transaction::new(namespace, current, event, target)
    }
}

prop_compose! {
    fn any_transaction()(
        namespace in maybe_empty_field(),
        current in maybe_empty_field(),
        event in maybe_empty_field(),
        target in maybe_empty_field(),
    ) -> Transaction {
        Transaction::new(namespace, current, event, target)
    }
}

proptest! {
    #[test]
    fn added_transaction_is_found(t in valid_transaction()) {
        let registry = TransitionRegistry::new();
        registry.add(t.clone());

        let found = registry.get_target_transition(&t.namespace, &t.current_status, &t.event);
        prop_assert_eq!(found.as_deref(), Some(&t));
    }

    #[test]
    fn invalid_adds_leave_the_registry_unchanged(
        seed in prop::collection::vec(valid_transaction(), 0..8),
        t in any_transaction(),
    ) {
        let registry = TransitionRegistry::new();
        for s in seed {
            registry.add(s);
        }
        let before = registry.snapshot();

        registry.add(t.clone());
        let after = registry.snapshot();

        if validate(Some(&t)).is_err() {
            prop_assert_eq!(before.namespaces, after.namespaces);
        } else {
            prop_assert!(after.transactions().any(|stored| stored == &t));
        }
    }

    #[test]
    fn last_add_wins(t in valid_transaction(), other_target in field()) {
        let registry = TransitionRegistry::new();
        registry.add(t.clone());
        registry.add(Transaction::new(
            t.namespace.clone(),
            t.current_status.clone(),
            t.event.clone(),
            other_target.clone(),
        ));

        let found = registry
            .get_target_transition(&t.namespace, &t.current_status, &t.event)
            .unwrap();
        prop_assert_eq!(&found.target_status, &other_target);
        prop_assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removal_ignores_target(t in valid_transaction(), probe_target in maybe_empty_field()) {
        let registry = TransitionRegistry::new();
        registry.add(t.clone());

        registry.remove_by_transaction(&Transaction::new(
            t.namespace.clone(),
            t.current_status.clone(),
            t.event.clone(),
            probe_target,
        ));

        prop_assert!(registry
            .get_target_transition(&t.namespace, &t.current_status, &t.event)
            .is_none());
        prop_assert!(registry.is_empty());
    }

    #[test]
    fn namespaces_are_isolated(
        t in valid_transaction(),
        other_namespace in field(),
    ) {
        prop_assume!(other_namespace != t.namespace);
        let registry = TransitionRegistry::new();
        registry.add(t.clone());

        prop_assert!(registry
            .get_target_transition(&other_namespace, &t.current_status, &t.event)
            .is_none());

        registry.remove_namespace(&other_namespace);
        prop_assert_eq!(registry.len(), 1);

        registry.remove_namespace(&t.namespace);
        prop_assert!(registry.is_empty());
    }

    #[test]
    fn len_counts_distinct_keys(ts in prop::collection::vec(valid_transaction(), 0..32)) {
        let registry = TransitionRegistry::new();
        let mut keys = std::collections::HashSet::new();
        for t in ts {
            keys.insert((t.namespace.clone(), t.key()));
            registry.add(t);
        }

        prop_assert_eq!(registry.len(), keys.len());
        prop_assert_eq!(registry.snapshot().len(), keys.len());
    }
}
