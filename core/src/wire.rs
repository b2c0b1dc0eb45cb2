//! JSON envelopes exchanged with the API.
//!
//! The API wraps every record in a single-key object (`{"list": {...}}`,
//! `{"member_total": {...}}`). These structs mirror that nesting exactly so
//! serde reports a missing or mistyped field by path instead of the mapper
//! indexing into untyped values.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Expense, ExpenseList, ExpenseShare, Member};

#[derive(Debug, Serialize)]
pub(crate) struct SignInPayload<'a> {
    pub user: SignInUser<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignInUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExpensePayload<'a> {
    pub expense: ExpenseBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExpenseBody<'a> {
    pub name: &'a str,
    pub payed_by_id: &'a str,
    pub payed_on: String,
    pub amount: Money,
    pub shares_attributes: Vec<ExpenseShare>,
}

/// `amount`/`balance_total` objects; only the cent count is consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct MoneyRecord {
    pub fractional: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListsEnvelope {
    pub data: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListEntry {
    pub list: ListRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BalanceEnvelope {
    pub balance: BalanceRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BalanceRecord {
    pub member_totals: Vec<MemberTotalEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberTotalEntry {
    pub member_total: MemberTotal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberTotal {
    pub member: MemberRecord,
    pub balance_total: MoneyRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberRecord {
    pub id: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpensesEnvelope {
    pub data: Vec<ExpenseEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpenseEntry {
    pub expense: ExpenseRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpenseRecord {
    pub name: String,
    pub status: String,
    pub amount: MoneyRecord,
}

impl ListEntry {
    pub fn into_list(self) -> ExpenseList {
        ExpenseList {
            id: self.list.id,
            name: self.list.name,
        }
    }
}

impl MemberTotalEntry {
    pub fn into_member(self) -> Member {
        let total = self.member_total;
        Member {
            id: total.member.id,
            nickname: total.member.nickname,
            balance: Money::from_minor(total.balance_total.fractional),
        }
    }
}

impl ExpenseRecord {
    pub fn is_deleted(&self) -> bool {
        self.status == "deleted"
    }

    pub fn into_expense(self) -> Expense {
        let amount = Money::from_minor(self.amount.fractional);
        Expense {
            description: self.name,
            amount,
            value: amount.to_euro(),
        }
    }
}
