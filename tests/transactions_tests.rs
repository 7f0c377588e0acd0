// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::commands::{categories, doctor, load_policy, transactions};
use fintrack::store::{Ledger, LoadPolicy};
use fintrack::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    db::put_blob(
        &conn,
        db::TRANSACTIONS_KEY,
        r#"[
            {"id": 1, "description": "Rent", "amount": -500, "date": "2025-01-01", "category": "Housing"},
            {"id": 2, "description": "Salary", "amount": 200, "date": "2025-01-02", "category": "Work"},
            {"id": 3, "description": "Coffee", "amount": -50, "date": "2025-01-03", "category": "Food"}
        ]"#,
    )
    .unwrap();
    conn
}

fn run_tx(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

fn list_ids(conn: &Connection, args: &[&str]) -> Vec<i64> {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            transactions::query_rows(conn, list_m)
                .unwrap()
                .iter()
                .map(|t| t.id())
                .collect()
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_defaults_to_newest_first() {
    let conn = setup();
    assert_eq!(list_ids(&conn, &["fintrack", "tx", "list"]), [3, 2, 1]);
}

#[test]
fn list_sorts_by_magnitude() {
    let conn = setup();
    let ids = list_ids(&conn, &["fintrack", "tx", "list", "--sort", "amount-desc"]);
    assert_eq!(ids, [1, 2, 3]);
}

#[test]
fn list_filters_by_search_and_category() {
    let conn = setup();
    assert_eq!(
        list_ids(&conn, &["fintrack", "tx", "list", "--search", "SAL"]),
        [2]
    );
    assert_eq!(
        list_ids(&conn, &["fintrack", "tx", "list", "--category", "Food"]),
        [3]
    );
}

#[test]
fn list_unknown_sort_keeps_stored_order() {
    let conn = setup();
    let ids = list_ids(&conn, &["fintrack", "tx", "list", "--sort", "whatever"]);
    assert_eq!(ids, [1, 2, 3]);
}

#[test]
fn list_rejects_bad_window() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "list", "--window", "soon"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let err = transactions::query_rows(&conn, list_m).unwrap_err();
            assert!(err.to_string().contains("Invalid date window"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_edit_rm_round_trip() {
    let conn = setup();
    run_tx(
        &conn,
        &[
            "fintrack",
            "tx",
            "add",
            "--description",
            " Groceries ",
            "--amount",
            "-42.5",
            "--date",
            "2025-01-04",
        ],
    )
    .unwrap();

    let ledger = Ledger::open(&conn, LoadPolicy::Strict).unwrap();
    let added = ledger.store().transactions().last().unwrap().clone();
    assert_eq!(added.description(), "Groceries");
    assert_eq!(added.amount(), Decimal::new(-425, 1));
    assert_eq!(added.category(), "Uncategorized");
    assert!(added.id() > 3);

    let id = added.id().to_string();
    run_tx(
        &conn,
        &["fintrack", "tx", "edit", "--id", &id, "--category", "Food"],
    )
    .unwrap();
    let ledger = Ledger::open(&conn, LoadPolicy::Strict).unwrap();
    let edited = ledger.store().get(added.id()).unwrap();
    assert_eq!(edited.category(), "Food");
    assert_eq!(edited.description(), "Groceries");
    assert_eq!(edited.date().as_str(), "2025-01-04");

    run_tx(&conn, &["fintrack", "tx", "rm", "--id", &format!(" {} ", id)]).unwrap();
    let ledger = Ledger::open(&conn, LoadPolicy::Strict).unwrap();
    assert_eq!(ledger.store().len(), 3);
}

#[test]
fn add_reports_validation_errors() {
    let conn = setup();
    let err = run_tx(
        &conn,
        &["fintrack", "tx", "add", "--description", "  ", "--amount", "5"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("description"));

    let err = run_tx(
        &conn,
        &["fintrack", "tx", "add", "--description", "X", "--amount", "inf"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("amount"));

    let err = run_tx(
        &conn,
        &["fintrack", "tx", "add", "--description", "X", "--amount", "ten"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid amount"));

    let ledger = Ledger::open(&conn, LoadPolicy::Strict).unwrap();
    assert_eq!(ledger.store().len(), 3);
}

#[test]
fn edit_of_unknown_id_changes_nothing() {
    let conn = setup();
    let before = db::get_blob(&conn, db::TRANSACTIONS_KEY).unwrap();
    run_tx(
        &conn,
        &["fintrack", "tx", "edit", "--id", "999", "--amount", "1"],
    )
    .unwrap();
    assert_eq!(db::get_blob(&conn, db::TRANSACTIONS_KEY).unwrap(), before);
}

#[test]
fn skip_invalid_flag_selects_policy() {
    let m = cli::build_cli().get_matches_from(["fintrack", "--skip-invalid", "summary"]);
    let (_, sub) = m.subcommand().unwrap();
    assert_eq!(load_policy(sub), LoadPolicy::SkipInvalid);

    let m = cli::build_cli().get_matches_from(["fintrack", "summary"]);
    let (_, sub) = m.subcommand().unwrap();
    assert_eq!(load_policy(sub), LoadPolicy::Strict);
}

#[test]
fn category_rows_count_usage() {
    let conn = setup();
    let m = cli::build_cli().get_matches_from(["fintrack", "category", "list"]);
    let (_, cat_m) = m.subcommand().unwrap();
    let (_, list_m) = cat_m.subcommand().unwrap();
    let rows = categories::category_rows(&conn, list_m).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Food", "Housing", "Work"]);
    assert!(rows.iter().all(|r| r.count == 1));
}

#[test]
fn doctor_reports_problems_without_failing() {
    let conn = setup();
    db::put_blob(
        &conn,
        db::TRANSACTIONS_KEY,
        r#"[
            {"id": 1, "description": "Ok", "amount": 1, "date": "2025-01-01"},
            {"id": 1, "description": "Dup", "amount": 2, "date": "2025-01-01"},
            {"id": 2, "description": "", "amount": 3},
            {"id": 3, "description": "Odd", "amount": 4, "date": "01/02/2025"}
        ]"#,
    )
    .unwrap();
    let issues: Vec<String> = doctor::findings(&conn)
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(issues, ["duplicate_id", "invalid_record", "unparseable_date"]);
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let conn = setup();
    assert!(doctor::findings(&conn).unwrap().is_empty());
}
