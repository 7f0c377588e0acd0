// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::Transaction;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Problems in the stored collection as `[issue, detail]` rows. Never fails on
/// bad records; only storage errors are returned.
pub fn findings(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for (i, raw) in db::load_raw(conn)?.iter().enumerate() {
        // 1) Records that would not load
        let t = match Transaction::from_raw(raw) {
            Ok(t) => t,
            Err(e) => {
                rows.push(vec!["invalid_record".into(), format!("#{}: {}", i, e)]);
                continue;
            }
        };

        // 2) Ids must be unique for edit and delete to hit one record
        if !seen.insert(t.id()) {
            rows.push(vec!["duplicate_id".into(), format!("#{}: id {}", i, t.id())]);
        }

        // 3) Dates that drop out of every date window
        if t.date().parse().is_none() {
            rows.push(vec![
                "unparseable_date".into(),
                format!("#{}: '{}'", i, t.date()),
            ]);
        }
    }
    Ok(rows)
}
