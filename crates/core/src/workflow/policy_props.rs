//! Property-based tests for the role policy.

use proptest::prelude::*;
use uuid::Uuid;

use super::error::WorkflowError;
use super::policy::{Action, Actor, Policy, Precondition, Role};

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Viewer),
        Just(Role::Staff),
        Just(Role::Accountant),
        Just(Role::Manager),
        Just(Role::Admin),
    ]
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::CreateJournalEntry),
        Just(Action::PostJournalEntry),
        Just(Action::ReverseJournalEntry),
        Just(Action::CreatePurchaseOrder),
        Just(Action::SubmitPurchaseOrder),
        Just(Action::ApprovePurchaseOrder),
        Just(Action::ReceivePurchaseOrder),
        Just(Action::CancelPurchaseOrder),
        Just(Action::CreateFinancialTransaction),
        Just(Action::ApproveFinancialTransaction),
        Just(Action::RejectFinancialTransaction),
        Just(Action::ManageSuppliers),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Acting on someone else's document is allowed exactly when the role meets the minimum.
    #[test]
    fn prop_role_threshold(role in role_strategy(), action in action_strategy()) {
        let policy = Policy::default();
        let rule = *policy.rule_for(action).unwrap();
        let actor = Actor::new(Uuid::new_v4(), role);

        let result = policy.authorize(&actor, action, Some(Uuid::new_v4()));
        prop_assert_eq!(result.is_ok(), role >= rule.min_role);
        if role < rule.min_role {
            let is_insufficient = matches!(result, Err(WorkflowError::InsufficientRole { .. }));
            prop_assert!(is_insufficient);
        }
    }

    /// Segregation of duties holds for every role, admins included.
    #[test]
    fn prop_creator_never_decides(role in role_strategy(), action in action_strategy()) {
        let policy = Policy::default();
        let rule = *policy.rule_for(action).unwrap();
        prop_assume!(rule.precondition == Precondition::NotCreator);
        prop_assume!(role >= rule.min_role);

        let actor = Actor::new(Uuid::new_v4(), role);
        prop_assert_eq!(
            policy.authorize(&actor, action, Some(actor.id)),
            Err(WorkflowError::CreatorCannotAct(action))
        );
    }
}
