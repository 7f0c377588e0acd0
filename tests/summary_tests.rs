// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::models::Transaction;
use fintrack::summary::{Summary, summarize};
use rust_decimal::Decimal;

fn txs(amounts: &[f64]) -> Vec<Transaction> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, a)| Transaction::new(i as i64, "T", *a, None, None).unwrap())
        .collect()
}

#[test]
fn empty_collection_sums_to_zero() {
    assert_eq!(summarize(&[]), Summary::default());
}

#[test]
fn income_and_expense_are_split_by_sign() {
    let s = summarize(&txs(&[100.0, -40.0, -10.0, 0.0]));
    assert_eq!(s.income, Decimal::from(100));
    assert_eq!(s.expense, Decimal::from(-50));
    assert_eq!(s.balance, Decimal::from(50));
}

#[test]
fn balance_is_income_plus_expense() {
    let cases: [&[f64]; 4] = [
        &[0.5, 0.25, -0.75],
        &[-19.75, -0.25, 1234.5, 7.0],
        &[-1.0, -2.0, -3.0],
        &[0.0, 0.0],
    ];
    for amounts in cases {
        let s = summarize(&txs(amounts));
        assert_eq!(s.balance, s.income + s.expense, "{amounts:?}");
        assert!(s.income >= Decimal::ZERO);
        assert!(s.expense <= Decimal::ZERO);
    }
}
