// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{IdSequence, RawTransaction, Transaction, TxDate, decimal_amount};
use crate::query::{self, Criteria};
use crate::summary::{self, Summary};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// What to do with a stored record that fails validation on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Abort the whole load on the first bad record.
    #[default]
    Strict,
    /// Leave bad records out of the collection and keep going. They are
    /// written back unchanged, after the valid ones, on the next save.
    SkipInvalid,
}

/// In-memory, insertion-ordered transaction collection.
///
/// The store is the only owner of the live collection. Queries and summaries
/// borrow it through [`TransactionStore::transactions`] or take a copy with
/// [`TransactionStore::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    items: Vec<Transaction>,
    ids: IdSequence,
    // Stored records that failed validation under `LoadPolicy::SkipInvalid`.
    skipped: Vec<RawTransaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(items: Vec<Transaction>) -> Self {
        let mut ids = IdSequence::default();
        for t in &items {
            ids.observe(t.id());
        }
        Self {
            items,
            ids,
            skipped: Vec::new(),
        }
    }

    pub fn add(&mut self, t: Transaction) {
        self.ids.observe(t.id());
        self.items.push(t);
    }

    /// Replace the transaction with the same id, keeping its position.
    /// Returns `false` and changes nothing when no transaction has that id.
    pub fn update(&mut self, t: Transaction) -> bool {
        match self.items.iter_mut().find(|x| x.id() == t.id()) {
            Some(slot) => {
                *slot = t;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id() != id);
        self.items.len() != before
    }

    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.items.iter().find(|t| t.id() == id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.items
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_id(&mut self) -> i64 {
        self.ids.next_id()
    }

    pub fn id_sequence(&mut self) -> &mut IdSequence {
        &mut self.ids
    }

    /// Records left out by the last [`LoadPolicy::SkipInvalid`] load.
    pub fn skipped(&self) -> &[RawTransaction] {
        &self.skipped
    }

    /// Distinct categories in use with their transaction counts, by name.
    pub fn categories(&self) -> BTreeMap<String, usize> {
        let mut out = BTreeMap::new();
        for t in &self.items {
            *out.entry(t.category().to_string()).or_insert(0) += 1;
        }
        out
    }

    /// Replace the collection with what is in storage.
    ///
    /// Every record goes back through [`Transaction::from_raw`]. Under
    /// [`LoadPolicy::Strict`] a bad record fails the load and the store keeps
    /// its previous contents.
    pub fn load(&mut self, conn: &Connection, policy: LoadPolicy) -> Result<()> {
        let raw = db::load_raw(conn)?;
        let mut items = Vec::with_capacity(raw.len());
        let mut skipped = Vec::new();
        for (i, r) in raw.into_iter().enumerate() {
            match Transaction::from_raw(&r) {
                Ok(t) => items.push(t),
                Err(e) if policy == LoadPolicy::SkipInvalid => {
                    warn!(index = i, error = %e, "skipping invalid stored transaction");
                    skipped.push(r);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Stored transaction #{} is invalid", i));
                }
            }
        }
        debug!(count = items.len(), skipped = skipped.len(), "loaded transactions");
        let mut store = Self::from_transactions(items);
        for id in skipped.iter().filter_map(RawTransaction::integer_id) {
            store.ids.observe(id);
        }
        store.skipped = skipped;
        *self = store;
        Ok(())
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        db::save_transactions(conn, &self.items, &self.skipped)
    }
}

/// A store bound to its storage. Every mutation is written through before the
/// call returns.
pub struct Ledger<'c> {
    conn: &'c Connection,
    store: TransactionStore,
}

impl<'c> Ledger<'c> {
    pub fn open(conn: &'c Connection, policy: LoadPolicy) -> Result<Self> {
        let mut store = TransactionStore::new();
        store.load(conn, policy)?;
        Ok(Self { conn, store })
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn add(
        &mut self,
        description: &str,
        amount: f64,
        date: Option<TxDate>,
        category: Option<String>,
    ) -> Result<Transaction> {
        let t = Transaction::create_new(
            self.store.id_sequence(),
            description,
            amount,
            date,
            category,
        )?;
        self.store.add(t.clone());
        self.persist()?;
        info!(id = t.id(), amount = %t.amount(), "added transaction");
        Ok(t)
    }

    /// Replace transaction `id`. Fields left as `None` keep their current value.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is unknown.
    pub fn edit(
        &mut self,
        id: i64,
        description: Option<&str>,
        amount: Option<f64>,
        date: Option<TxDate>,
        category: Option<String>,
    ) -> Result<bool> {
        let Some(current) = self.store.get(id) else {
            warn!(id, "edit of unknown transaction ignored");
            return Ok(false);
        };
        let amount = match amount {
            Some(a) => decimal_amount(a)?,
            None => current.amount(),
        };
        let t = Transaction::with_amount(
            id,
            description.unwrap_or(current.description()),
            amount,
            date.or_else(|| Some(current.date().clone())),
            category.or_else(|| Some(current.category().to_string())),
        )?;
        self.store.update(t);
        self.persist()?;
        info!(id, "updated transaction");
        Ok(true)
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        if !self.store.delete(id) {
            warn!(id, "delete of unknown transaction ignored");
            return Ok(false);
        }
        self.persist()?;
        info!(id, "deleted transaction");
        Ok(true)
    }

    pub fn view(&self, criteria: &Criteria, today: NaiveDate) -> Vec<Transaction> {
        query::view(self.store.transactions(), criteria, today)
    }

    pub fn summary(&self) -> Summary {
        summary::summarize(self.store.transactions())
    }

    fn persist(&self) -> Result<()> {
        self.store.save(self.conn).inspect_err(|e| {
            error!(error = %e, "failed to save transactions; in-memory change kept");
        })
    }
}
