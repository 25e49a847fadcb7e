use super::{adjustment, generated_ledger, raw_expense, user};
use crate::constants::SETTLEMENT_EPSILON;
use crate::core::balance::{Balances, compute_balances};
use crate::core::models::{Adjustment, AdjustmentKind, Payment};
use crate::core::settlement::{Strategy, apply_payments, compute_settlement};

fn balances(entries: &[(&str, f64)]) -> Balances {
    entries.iter().map(|(id, amount)| (id.to_string(), *amount)).collect()
}

fn sample_maps() -> Vec<Balances> {
    vec![
        balances(&[("a", 80.0), ("b", -40.0), ("c", -40.0)]),
        balances(&[("a", -50.0), ("b", -10.0), ("c", 60.0)]),
        balances(&[("d1", -4.0), ("d2", -6.0), ("c1", 6.0), ("c2", 4.0)]),
        balances(&[("a", 33.34), ("b", -16.67), ("c", -16.67), ("d", 0.0)]),
        balances(&[("a", -5.0), ("b", -3.0), ("c", -2.0), ("d", 5.0), ("e", 5.0)]),
        balances(&[("a", 12.5), ("b", -7.25), ("c", 1.75), ("d", -9.0), ("e", 2.0)]),
    ]
}

#[test]
fn test_standard_settlement_for_single_payer() {
    let sheet = balances(&[("a", 80.0), ("b", -40.0), ("c", -40.0)]);

    let payments = compute_settlement(&sheet, Strategy::Standard);

    assert_eq!(payments, vec![Payment::new("b", "a", 40.0), Payment::new("c", "a", 40.0)]);
}

#[test]
fn test_simplified_matches_standard_when_already_minimal() {
    let sheet = balances(&[("a", 80.0), ("b", -40.0), ("c", -40.0)]);

    let standard = compute_settlement(&sheet, Strategy::Standard);
    let simplified = compute_settlement(&sheet, Strategy::Simplified);

    assert_eq!(simplified, standard);
}

#[test]
fn test_simplified_two_pointer_sweep() {
    let sheet = balances(&[("a", -50.0), ("b", -10.0), ("c", 60.0)]);

    let payments = compute_settlement(&sheet, Strategy::Simplified);

    assert_eq!(payments, vec![Payment::new("a", "c", 50.0), Payment::new("b", "c", 10.0)]);
}

#[test]
fn test_standard_walks_creditors_in_input_order() {
    let sheet = balances(&[("d1", -4.0), ("d2", -6.0), ("c1", 6.0), ("c2", 4.0)]);

    let payments = compute_settlement(&sheet, Strategy::Standard);

    assert_eq!(
        payments,
        vec![
            Payment::new("d1", "c1", 4.0),
            Payment::new("d2", "c1", 2.0),
            Payment::new("d2", "c2", 4.0),
        ]
    );
}

#[test]
fn test_simplified_uses_fewer_payments() {
    let sheet = balances(&[("d1", -4.0), ("d2", -6.0), ("c1", 6.0), ("c2", 4.0)]);

    let standard = compute_settlement(&sheet, Strategy::Standard);
    let simplified = compute_settlement(&sheet, Strategy::Simplified);

    assert_eq!(simplified.len(), 2);
    assert!(simplified.len() <= standard.len());
}

#[test]
fn test_settled_balances_produce_no_payments() {
    let sheet = balances(&[("a", 0.004), ("b", -0.004), ("c", 0.0)]);

    assert!(compute_settlement(&sheet, Strategy::Standard).is_empty());
    assert!(compute_settlement(&sheet, Strategy::Simplified).is_empty());
    assert!(compute_settlement(&Balances::new(), Strategy::Simplified).is_empty());
}

#[test]
fn test_every_strategy_settles_every_sample() {
    for strategy in [Strategy::Standard, Strategy::Simplified] {
        for sheet in sample_maps() {
            let payments = compute_settlement(&sheet, strategy);
            let after = apply_payments(&sheet, &payments);
            assert!(after.is_settled(), "{:?} left {:?}", strategy, after);
            assert!(payments.iter().all(|p| p.amount > 0.0 && p.payer != p.payee));
        }
    }
}

#[test]
fn test_each_debtor_sends_exactly_what_they_owe() {
    for strategy in [Strategy::Standard, Strategy::Simplified] {
        for sheet in sample_maps() {
            let payments = compute_settlement(&sheet, strategy);
            for (user_id, balance) in sheet.iter().filter(|(_, b)| *b < -SETTLEMENT_EPSILON) {
                let sent: f64 = payments
                    .iter()
                    .filter(|p| p.payer == user_id)
                    .map(|p| p.amount)
                    .sum();
                assert!((sent + balance).abs() < SETTLEMENT_EPSILON, "{} sent {}", user_id, sent);
            }
        }
    }
}

#[test]
fn test_payments_recorded_as_adjustments_zero_the_ledger() {
    let members = vec![user("a"), user("b"), user("c"), user("d")];
    let expenses = vec![
        raw_expense("e1", 120.0, "a", &["a", "b", "c", "d"]),
        raw_expense("e2", 45.5, "b", &["a", "b", "c"]),
        raw_expense("e3", 19.99, "d", &["c", "d"]),
    ];

    for strategy in [Strategy::Standard, Strategy::Simplified] {
        let sheet = compute_balances(&members, &expenses, &[]);
        let adjustments: Vec<Adjustment> = compute_settlement(&sheet, strategy)
            .into_iter()
            .map(|p| Adjustment::new(user(&p.payer), user(&p.payee), p.amount, AdjustmentKind::Settlement))
            .collect();

        let after = compute_balances(&members, &expenses, &adjustments);
        assert!(after.is_settled(), "{:?} left {:?}", strategy, after);
    }
}

#[test]
fn test_strategy_follows_simplify_flag() {
    assert_eq!(Strategy::from_simplify_flag(true), Strategy::Simplified);
    assert_eq!(Strategy::from_simplify_flag(false), Strategy::Standard);
}

#[test]
fn test_non_finite_balances_are_left_out() {
    let _ = env_logger::try_init();
    let sheets = [
        balances(&[("x", f64::INFINITY), ("y", f64::NEG_INFINITY), ("c", 10.0), ("d", -10.0)]),
        balances(&[("x", f64::NAN), ("c", 10.0), ("d", -10.0)]),
        balances(&[("d", -10.0), ("x", f64::NEG_INFINITY), ("c", 10.0), ("y", f64::NAN)]),
    ];

    for strategy in [Strategy::Standard, Strategy::Simplified] {
        for sheet in &sheets {
            let payments = compute_settlement(sheet, strategy);
            assert_eq!(payments, vec![Payment::new("d", "c", 10.0)], "{:?} on {:?}", strategy, sheet);
        }
        let unsettleable = balances(&[("x", f64::INFINITY), ("y", f64::INFINITY), ("z", f64::NAN)]);
        assert!(compute_settlement(&unsettleable, strategy).is_empty());
    }
}

#[test]
fn test_overflowing_ledger_still_settles() {
    let members = vec![user("a"), user("b")];
    let expenses = vec![
        raw_expense("huge1", 1.7e308, "a", &["b"]),
        raw_expense("huge2", 1.7e308, "a", &["b"]),
    ];
    let sheet = compute_balances(&members, &expenses, &[]);

    for strategy in [Strategy::Standard, Strategy::Simplified] {
        let payments = compute_settlement(&sheet, strategy);
        assert_eq!(payments, vec![Payment::new("b", "a", 1.7e308)]);
    }
}

#[test]
fn test_generated_ledgers_settle_under_both_strategies() {
    for seed in 1..20 {
        let people = 2 + (seed as usize % 6);
        let (members, expenses) = generated_ledger(seed, people, 40);
        let adjustments = vec![adjustment("u0", "u1", 12.34)];
        let sheet = compute_balances(&members, &expenses, &adjustments);

        for strategy in [Strategy::Standard, Strategy::Simplified] {
            let payments = compute_settlement(&sheet, strategy);
            assert!(payments.len() < people, "seed {} {:?}: {} payments", seed, strategy, payments.len());
            assert!(payments.iter().all(|p| p.amount > 0.0 && p.payer != p.payee));

            let settlements: Vec<Adjustment> = payments
                .iter()
                .map(|p| Adjustment::new(user(&p.payer), user(&p.payee), p.amount, AdjustmentKind::Settlement))
                .collect();
            let recorded: Vec<Adjustment> = adjustments.iter().cloned().chain(settlements).collect();
            let after = compute_balances(&members, &expenses, &recorded);
            assert!(after.is_settled(), "seed {} {:?} left {:?}", seed, strategy, after);
        }
    }
}
