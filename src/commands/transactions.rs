// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_policy;
use crate::models::{Transaction, TxDate};
use crate::query::{CategoryFilter, Criteria, DateWindow, SortKey};
use crate::store::Ledger;
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_id, pretty_table, today,
};
use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn text_arg(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name).map(|s| s.trim().to_string())
}

fn date_arg(sub: &clap::ArgMatches) -> Result<Option<TxDate>> {
    let date = match sub.get_one::<String>("date").map(|s| s.trim()) {
        Some(s) if !s.is_empty() => Some(TxDate::from(parse_date(s)?)),
        _ => None,
    };
    Ok(date)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let description = text_arg(sub, "description").unwrap_or_default();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = date_arg(sub)?;
    let category = text_arg(sub, "category");

    let mut ledger = Ledger::open(conn, load_policy(sub))?;
    let t = ledger.add(&description, amount, date, category)?;
    println!(
        "Recorded {} on {} '{}' ({}) as #{}",
        fmt_money(&t.amount()),
        t.date(),
        t.description(),
        t.category(),
        t.id()
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let description = text_arg(sub, "description");
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_amount(s))
        .transpose()?;
    let date = date_arg(sub)?;
    let category = text_arg(sub, "category");

    let mut ledger = Ledger::open(conn, load_policy(sub))?;
    if ledger.edit(id, description.as_deref(), amount, date, category)? {
        println!("Updated transaction #{}", id);
    } else {
        println!("No transaction #{}", id);
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let mut ledger = Ledger::open(conn, load_policy(sub))?;
    if ledger.delete(id)? {
        println!("Removed transaction #{}", id);
    } else {
        println!("No transaction #{}", id);
    }
    Ok(())
}

pub fn criteria_from(sub: &clap::ArgMatches) -> Result<Criteria> {
    let search = sub.get_one::<String>("search").cloned().unwrap_or_default();
    let category = sub
        .get_one::<String>("category")
        .map(|s| CategoryFilter::from(s.trim()))
        .unwrap_or_default();
    let window = match sub.get_one::<String>("window") {
        Some(w) => w.parse::<DateWindow>()?,
        None => DateWindow::All,
    };
    let sort = sub
        .get_one::<String>("sort")
        .map(|s| SortKey::from(s.as_str()))
        .unwrap_or_default();
    if sort == SortKey::Unsorted {
        debug!("unrecognised sort key; keeping filter order");
    }
    debug!(sort = sort.as_str(), ?window, ?category, "list criteria");
    Ok(Criteria {
        search,
        category,
        window,
        sort,
    })
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let criteria = criteria_from(sub)?;
    let ledger = Ledger::open(conn, load_policy(sub))?;
    Ok(ledger.view(&criteria, today()))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let criteria = criteria_from(sub)?;
    let ledger = Ledger::open(conn, load_policy(sub))?;
    let data = ledger.view(&criteria, today());
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.id().to_string(),
                t.date().to_string(),
                t.description().to_string(),
                t.category().to_string(),
                fmt_money(&t.amount()),
            ]
        })
        .collect();
    if rows.is_empty() {
        println!("No transactions found.");
    } else {
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Description", "Category", "Amount"], rows)
        );
    }
    let s = ledger.summary();
    println!(
        "Balance {}  Income {}  Expense {}",
        fmt_money(&s.balance),
        fmt_money(&s.income),
        fmt_money(&s.expense)
    );
    Ok(())
}
