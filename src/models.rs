// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Category given to transactions recorded without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid id {0}: expected an integer")]
    Id(String),
    #[error("Invalid description: must be non-empty text")]
    Description,
    #[error("Invalid amount {0}: expected a finite number with an exact decimal value")]
    Amount(String),
}

/// Calendar date of a transaction, kept as the text it was recorded with.
///
/// Stored data may hold dates that do not parse; those are carried through
/// untouched and only matter to date-based filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxDate(String);

impl TxDate {
    pub fn today() -> Self {
        Self::from(Local::now().date_naive())
    }

    pub fn parse(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for TxDate {
    fn from(d: NaiveDate) -> Self {
        Self(d.format("%Y-%m-%d").to_string())
    }
}

impl From<&str> for TxDate {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TxDate {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TxDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One signed money movement. Positive amounts are income, negative are expenses.
///
/// Records are never mutated in place; an edit builds a new `Transaction` with
/// the same id and replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: i64,
    description: String,
    #[serde(serialize_with = "serialize_amount")]
    amount: Decimal,
    date: TxDate,
    category: String,
}

impl Transaction {
    /// Validate and build a transaction.
    ///
    /// `date` defaults to today (local time) and `category` to
    /// [`UNCATEGORIZED`] when missing or empty.
    ///
    /// # Errors
    ///
    /// Fails when `description` is empty or `amount` is not finite or has no
    /// exact decimal form (see [`decimal_amount`]).
    pub fn new(
        id: i64,
        description: impl Into<String>,
        amount: f64,
        date: Option<TxDate>,
        category: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_amount(id, description, decimal_amount(amount)?, date, category)
    }

    /// Same as [`Transaction::new`] for an amount that is already a `Decimal`.
    pub fn with_amount(
        id: i64,
        description: impl Into<String>,
        amount: Decimal,
        date: Option<TxDate>,
        category: Option<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::Description);
        }
        let date = date
            .filter(|d| !d.as_str().trim().is_empty())
            .unwrap_or_else(TxDate::today);
        let category = category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        Ok(Self {
            id,
            description,
            amount,
            date,
            category,
        })
    }

    /// Build a transaction with a freshly issued id.
    pub fn create_new(
        ids: &mut IdSequence,
        description: impl Into<String>,
        amount: f64,
        date: Option<TxDate>,
        category: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(ids.next_id(), description, amount, date, category)
    }

    /// Rebuild a transaction from its stored form, applying the same checks
    /// and defaults as [`Transaction::new`].
    pub fn from_raw(raw: &RawTransaction) -> Result<Self, ValidationError> {
        let id = integer_id(&raw.id).ok_or_else(|| ValidationError::Id(raw.id.to_string()))?;
        let description = match &raw.description {
            Value::String(s) => s.clone(),
            _ => return Err(ValidationError::Description),
        };
        let amount = raw
            .amount
            .as_f64()
            .ok_or_else(|| ValidationError::Amount(raw.amount.to_string()))?;
        let date = match &raw.date {
            Value::Null => None,
            Value::String(s) => Some(TxDate::from(s.as_str())),
            other => Some(TxDate::from(other.to_string())),
        };
        let category = match &raw.category {
            Value::String(s) => Some(s.clone()),
            _ => None,
        };
        Self::new(id, description, amount, date, category)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> &TxDate {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Convert a user or stored amount to a `Decimal`.
///
/// The decimal must read back as the same `f64`. Values that would be rounded
/// on the way, like `1e-30` (becomes 0) or `0.1 + 0.2` (becomes 0.3), are
/// rejected instead of silently changing sign or size.
pub fn decimal_amount(amount: f64) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::Amount(amount.to_string());
    if !amount.is_finite() {
        return Err(invalid());
    }
    let d = Decimal::try_from(amount).map_err(|_| invalid())?;
    match d.to_string().parse::<f64>() {
        Ok(back) if back == amount => Ok(d),
        _ => Err(invalid()),
    }
}

// Written as the `f64` that `decimal_amount` accepted, so a reload gives the
// same `Decimal` back.
fn serialize_amount<S: Serializer>(d: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    let f = d
        .to_string()
        .parse::<f64>()
        .map_err(serde::ser::Error::custom)?;
    s.serialize_f64(f)
}

/// A transaction record exactly as found in storage, before validation.
///
/// Every field is an untyped JSON value so that malformed records surface as a
/// [`ValidationError`] naming the field rather than as a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub description: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub date: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub category: Value,
    /// Fields this version does not know about, kept so a record can be
    /// written back as it was read.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RawTransaction {
    /// The record's id, if it is one a valid transaction could carry.
    pub fn integer_id(&self) -> Option<i64> {
        integer_id(&self.id)
    }
}

fn integer_id(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Issues transaction ids.
///
/// Ids follow the wall clock in milliseconds, so they stay in line with ids
/// already on disk, but never repeat or go backwards: each id is at least one
/// more than the previous one.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    pub fn starting_after(last: i64) -> Self {
        Self { last }
    }

    /// Make sure future ids are greater than `id`.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }

    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
