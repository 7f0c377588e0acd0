// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_policy;
use crate::store::Ledger;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let ledger = Ledger::open(conn, load_policy(m))?;
    let s = ledger.summary();
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![vec![
            fmt_money(&s.balance),
            fmt_money(&s.income),
            fmt_money(&s.expense),
        ]];
        println!("{}", pretty_table(&["Balance", "Income", "Expense"], rows));
    }
    Ok(())
}
