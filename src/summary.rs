// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;

/// Totals over a whole collection. `expense` is zero or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
}

pub fn summarize(txs: &[Transaction]) -> Summary {
    let mut s = Summary::default();
    for t in txs {
        let amt = t.amount();
        if amt > Decimal::ZERO {
            s.income += amt;
        } else if amt < Decimal::ZERO {
            s.expense += amt;
        }
        s.balance += amt;
    }
    s
}
