use super::{adjustment, approx, generated_ledger, raw_expense, user};
use crate::constants::CONSERVATION_TOLERANCE;
use crate::core::balance::{Balances, compute_balances};

#[test]
fn test_equal_split_with_payer_included() {
    let members = vec![user("a"), user("b"), user("c")];
    let expenses = vec![raw_expense("e1", 90.0, "a", &["a", "b", "c"])];

    let balances = compute_balances(&members, &expenses, &[]);

    assert!(approx(balances.get("a").unwrap(), 60.0));
    assert!(approx(balances.get("b").unwrap(), -30.0));
    assert!(approx(balances.get("c").unwrap(), -30.0));
}

#[test]
fn test_group_of_three_keeps_member_order() {
    let members = vec![user("a"), user("b"), user("c")];
    let expenses = vec![raw_expense("e1", 120.0, "a", &["a", "b", "c"])];

    let balances = compute_balances(&members, &expenses, &[]);
    let ordered: Vec<(&str, f64)> = balances.iter().collect();

    assert_eq!(ordered, vec![("a", 80.0), ("b", -40.0), ("c", -40.0)]);
}

#[test]
fn test_members_without_expenses_start_at_zero() {
    let members = vec![user("a"), user("b"), user("idle")];
    let expenses = vec![raw_expense("e1", 50.0, "a", &["a", "b"])];

    let balances = compute_balances(&members, &expenses, &[]);

    assert_eq!(balances.len(), 3);
    assert_eq!(balances.get("idle"), Some(0.0));
}

#[test]
fn test_payer_outside_participants_is_credited_in_full() {
    let members = vec![user("a"), user("b"), user("c")];
    let expenses = vec![raw_expense("e1", 100.0, "a", &["b", "c"])];

    let balances = compute_balances(&members, &expenses, &[]);

    assert!(approx(balances.get("a").unwrap(), 100.0));
    assert!(approx(balances.get("b").unwrap(), -50.0));
    assert!(approx(balances.get("c").unwrap(), -50.0));
}

#[test]
fn test_malformed_expenses_are_skipped() {
    let _ = env_logger::try_init();
    let members = vec![user("a"), user("b")];
    let expenses = vec![
        raw_expense("nan", f64::NAN, "a", &["a", "b"]),
        raw_expense("neg", -20.0, "a", &["a", "b"]),
        raw_expense("inf", f64::INFINITY, "b", &["a", "b"]),
        raw_expense("empty", 30.0, "b", &[]),
        raw_expense("ok", 10.0, "a", &["a", "b"]),
    ];

    let balances = compute_balances(&members, &expenses, &[]);

    assert!(approx(balances.get("a").unwrap(), 5.0));
    assert!(approx(balances.get("b").unwrap(), -5.0));
}

#[test]
fn test_adjustment_moves_money_from_sender_to_receiver() {
    let members = vec![user("a"), user("b"), user("c")];
    let expenses = vec![raw_expense("e1", 120.0, "a", &["a", "b", "c"])];
    let adjustments = vec![adjustment("b", "a", 40.0)];

    let balances = compute_balances(&members, &expenses, &adjustments);

    assert!(approx(balances.get("a").unwrap(), 40.0));
    assert!(approx(balances.get("b").unwrap(), 0.0));
    assert!(approx(balances.get("c").unwrap(), -40.0));
}

#[test]
fn test_adjustment_with_non_member_is_skipped_alone() {
    let members = vec![user("a"), user("b")];
    let expenses = vec![raw_expense("e1", 20.0, "a", &["a", "b"])];
    let adjustments = vec![
        adjustment("b", "former", 10.0),
        adjustment("b", "a", 4.0),
        adjustment("a", "b", f64::NAN),
    ];

    let balances = compute_balances(&members, &expenses, &adjustments);

    assert!(approx(balances.get("a").unwrap(), 6.0));
    assert!(approx(balances.get("b").unwrap(), -6.0));
    assert!(!balances.contains("former"));
}

#[test]
fn test_expense_that_would_overflow_a_balance_is_skipped() {
    let members = vec![user("a"), user("b")];
    let expenses = vec![
        raw_expense("huge1", 1.7e308, "a", &["b"]),
        raw_expense("huge2", 1.7e308, "a", &["b"]),
        raw_expense("ok", 10.0, "b", &["a", "b"]),
    ];
    let adjustments = vec![adjustment("a", "b", 1.7e308)];

    let balances = compute_balances(&members, &expenses, &adjustments);

    assert!(balances.iter().all(|(_, amount)| amount.is_finite()), "{:?}", balances);
    assert_eq!(balances.get("a").unwrap(), 1.7e308 - 5.0);
    assert_eq!(balances.get("b").unwrap(), -1.7e308 + 5.0);
}

#[test]
fn test_balances_keep_first_seen_order_and_serialize_as_pairs() {
    let mut balances = Balances::new();
    balances.credit("b", 3.0);
    balances.credit("a", -1.0);
    balances.credit("b", -1.0);

    let order: Vec<&str> = balances.iter().map(|(id, _)| id).collect();
    assert_eq!(order, vec!["b", "a"]);
    assert_eq!(balances.get("b"), Some(2.0));
    assert!(!balances.contains("c"));

    let json = serde_json::to_value(&balances).unwrap();
    assert_eq!(json, serde_json::json!([["b", 2.0], ["a", -1.0]]));
    let decoded: Balances = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, balances);
    assert_eq!(decoded.get("a"), Some(-1.0));
}

#[test]
fn test_empty_ledger_is_settled() {
    let balances = compute_balances(&[user("a"), user("b")], &[], &[]);
    assert!(balances.is_settled());
    assert_eq!(balances.total(), 0.0);
}

#[test]
fn test_balances_always_sum_to_zero() {
    for seed in 1..20 {
        let (members, expenses) = generated_ledger(seed, 2 + (seed as usize % 6), 40);
        let adjustments = vec![adjustment("u0", "u1", 12.34), adjustment("u1", "u0", 3.21)];
        let balances = compute_balances(&members, &expenses, &adjustments);
        assert!(
            balances.total().abs() < CONSERVATION_TOLERANCE,
            "seed {} total {}",
            seed,
            balances.total()
        );
    }
}

#[test]
fn test_recomputation_is_idempotent() {
    let (members, expenses) = generated_ledger(42, 5, 30);
    let adjustments = vec![adjustment("u2", "u3", 7.5)];

    let first = compute_balances(&members, &expenses, &adjustments);
    let second = compute_balances(&members, &expenses, &adjustments);

    assert_eq!(first, second);
    assert_eq!(first.to_map(), second.to_map());
}
