//! Property-based tests for lifecycle transitions.

use proptest::prelude::*;

use super::service::{PurchaseOrderTransition, Transition, WorkflowService};
use super::types::{DocumentStatus, PurchaseOrderStatus};

fn status_strategy() -> impl Strategy<Value = PurchaseOrderStatus> {
    prop_oneof![
        Just(PurchaseOrderStatus::Draft),
        Just(PurchaseOrderStatus::Pending),
        Just(PurchaseOrderStatus::Approved),
        Just(PurchaseOrderStatus::Received),
        Just(PurchaseOrderStatus::Cancelled),
    ]
}

fn transition_strategy() -> impl Strategy<Value = PurchaseOrderTransition> {
    prop_oneof![
        Just(PurchaseOrderTransition::Submit),
        Just(PurchaseOrderTransition::Approve),
        Just(PurchaseOrderTransition::Receive),
        Just(PurchaseOrderTransition::Cancel),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A transition succeeds exactly from its start statuses and lands on its target.
    #[test]
    fn prop_check_matches_table(status in status_strategy(), transition in transition_strategy()) {
        let result = WorkflowService::check(transition, "PO000001", status);
        if transition.from_statuses().contains(&status) {
            prop_assert_eq!(result, Ok(transition.to_status()));
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Terminal statuses have no way out.
    #[test]
    fn prop_terminal_statuses_are_final(
        from in status_strategy(),
        transition in transition_strategy(),
    ) {
        prop_assume!(from.is_terminal());
        prop_assert!(WorkflowService::check(transition, "PO000001", from).is_err());
    }

    /// Applying the same transition twice never succeeds the second time.
    #[test]
    fn prop_transition_not_repeatable(transition in transition_strategy()) {
        let start = transition.from_statuses()[0];
        let after = WorkflowService::check(transition, "PO000001", start);
        prop_assert!(after.is_ok());
        let again = WorkflowService::check(transition, "PO000001", after.unwrap());
        prop_assert!(again.is_err());
    }
}
