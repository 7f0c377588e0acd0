// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{RawTransaction, Transaction};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

/// Storage key holding the serialized transaction collection.
pub const TRANSACTIONS_KEY: &str = "transactions";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "opened storage");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS storage(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

pub fn get_blob(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM storage WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()
        .with_context(|| format!("Read storage key '{}'", key))?;
    Ok(v)
}

pub fn put_blob(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO storage(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )
    .with_context(|| format!("Write storage key '{}'", key))?;
    Ok(())
}

/// Read the stored transaction records without validating them.
///
/// A missing entry is an empty collection. Anything other than a JSON array of
/// objects is an error.
pub fn load_raw(conn: &Connection) -> Result<Vec<RawTransaction>> {
    let Some(blob) = get_blob(conn, TRANSACTIONS_KEY)? else {
        return Ok(Vec::new());
    };
    let value: Value = serde_json::from_str(&blob)
        .with_context(|| format!("Stored '{}' is not valid JSON", TRANSACTIONS_KEY))?;
    let Value::Array(items) = value else {
        return Err(anyhow!("Stored '{}' is not a JSON array", TRANSACTIONS_KEY));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<RawTransaction>(item)
                .with_context(|| format!("Stored transaction #{} is not an object", i))
        })
        .collect()
}

/// Replace the stored collection with `txs`, followed by `unparsed` records
/// written back as they were read.
pub fn save_transactions(
    conn: &Connection,
    txs: &[Transaction],
    unparsed: &[RawTransaction],
) -> Result<()> {
    let mut items = Vec::with_capacity(txs.len() + unparsed.len());
    for t in txs {
        items.push(serde_json::to_value(t)?);
    }
    for r in unparsed {
        items.push(serde_json::to_value(r)?);
    }
    let blob = serde_json::to_string(&items)?;
    put_blob(conn, TRANSACTIONS_KEY, &blob)?;
    debug!(count = txs.len(), unparsed = unparsed.len(), "saved transactions");
    Ok(())
}
