// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering and ordering of the transaction list.

use crate::models::Transaction;
use anyhow::{Result, anyhow};
use chrono::{Days, NaiveDate};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == "All" {
            Self::All
        } else {
            Self::Only(s.to_string())
        }
    }
}

/// Trailing window of days ending today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    Days(u32),
}

impl DateWindow {
    /// Inclusive `(start, end)` bounds for `today`, or `None` for no bound.
    pub fn bounds(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::All => None,
            Self::Days(d) => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(d)))
                    .unwrap_or(NaiveDate::MIN);
                Some((start, today))
            }
        }
    }
}

impl FromStr for DateWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<u32>()
            .map(Self::Days)
            .map_err(|_| anyhow!("Invalid date window '{}', expected 'All' or a number of days", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    NameAsc,
    NameDesc,
    /// Keep filter order.
    Unsorted,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Unsorted => "none",
        }
    }

    pub fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::DateDesc => b.date().parse().cmp(&a.date().parse()),
            Self::DateAsc => a.date().parse().cmp(&b.date().parse()),
            Self::AmountDesc => b.amount().abs().cmp(&a.amount().abs()),
            Self::AmountAsc => a.amount().abs().cmp(&b.amount().abs()),
            Self::NameAsc => compare_text(a.description(), b.description()),
            Self::NameDesc => compare_text(b.description(), a.description()),
            Self::Unsorted => Ordering::Equal,
        }
    }
}

/// Unknown keys map to [`SortKey::Unsorted`].
impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s.trim() {
            "date-desc" => Self::DateDesc,
            "date-asc" => Self::DateAsc,
            "amount-desc" => Self::AmountDesc,
            "amount-asc" => Self::AmountAsc,
            "name-asc" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            _ => Self::Unsorted,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search: String,
    pub category: CategoryFilter,
    pub window: DateWindow,
    pub sort: SortKey,
}

fn matches_with(
    t: &Transaction,
    needle: &str,
    category: &CategoryFilter,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> bool {
    if !needle.is_empty() && !t.description().to_lowercase().contains(needle) {
        return false;
    }
    if let CategoryFilter::Only(c) = category {
        if t.category() != c {
            return false;
        }
    }
    match bounds {
        None => true,
        Some((start, end)) => t
            .date()
            .parse()
            .is_some_and(|d| d >= start && d <= end),
    }
}

/// Case-folded comparison first so "apple" and "Banana" sort alphabetically;
/// the raw text breaks ties.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filtered, sorted copy of `txs`. `txs` is left untouched.
pub fn view(txs: &[Transaction], criteria: &Criteria, today: NaiveDate) -> Vec<Transaction> {
    let needle = criteria.search.to_lowercase();
    let bounds = criteria.window.bounds(today);
    let mut out: Vec<Transaction> = txs
        .iter()
        .filter(|t| matches_with(t, &needle, &criteria.category, bounds))
        .cloned()
        .collect();
    out.sort_by(|a, b| criteria.sort.compare(a, b));
    out
}
