// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_policy;
use crate::store::Ledger;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub name: String,
    pub count: usize,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = category_rows(conn, sub)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
            let rows = data
                .into_iter()
                .map(|r| vec![r.name, r.count.to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Transactions"], rows));
        }
    }
    Ok(())
}

pub fn category_rows(conn: &Connection, m: &clap::ArgMatches) -> Result<Vec<CategoryRow>> {
    let ledger = Ledger::open(conn, load_policy(m))?;
    Ok(ledger
        .store()
        .categories()
        .into_iter()
        .map(|(name, count)| CategoryRow { name, count })
        .collect())
}
