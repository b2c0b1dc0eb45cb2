//! Domain records returned by and submitted to the WieBetaaltWat API.
//!
//! # Design
//! These are the flattened, typed views callers work with. The nested JSON
//! envelopes the API actually speaks live in `wire` and never leave the
//! crate. Monetary fields are [`Money`] (integer cents) throughout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A shared expense list ("lijst") the account belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseList {
    pub id: String,
    pub name: String,
}

/// A list member and their running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub nickname: String,
    pub balance: Money,
}

impl Member {
    /// Balance in euros (`fractional / 100`).
    pub fn balance_major(&self) -> f64 {
        self.balance.to_major()
    }
}

/// A non-deleted expense as shown in a list overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    pub amount: Money,
    /// `amount` formatted for display, e.g. `€12.50`.
    pub value: String,
}

/// Input for creating an expense.
///
/// `amount` is in euros and is truncated to whole cents before it is split.
/// Without a `date` the expense is booked on today's local date.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub payer_id: String,
    pub participant_ids: Vec<String>,
    pub amount: f64,
    pub date: Option<NaiveDate>,
}

/// One participant's portion of a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub member_id: String,
    pub amount: Money,
    pub multiplier: u32,
}

impl ExpenseShare {
    /// Divide `total` evenly over `participant_ids`, one share each.
    ///
    /// Shares are whole cents and the remainder is not redistributed:
    /// 1000 cents over three participants yields three shares of 333.
    pub fn split_evenly(total: Money, participant_ids: &[String]) -> Vec<Self> {
        let portion = total.split_evenly(participant_ids.len());
        participant_ids
            .iter()
            .map(|id| ExpenseShare {
                member_id: id.clone(),
                amount: portion,
                multiplier: 1,
            })
            .collect()
    }
}

/// How to identify a member when looking up a single balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef<'a> {
    /// Matched case-insensitively.
    Nickname(&'a str),
    /// Matched exactly.
    Id(&'a str),
}
