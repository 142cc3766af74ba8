// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const ACCOUNT_TYPES: [&str; 5] = ["Checking", "Savings", "Investment", "Business", "Credit Card"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub currency: String,
    pub r#type: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub currency: String,
    pub r#type: String,
    pub balance: Decimal,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub r#type: Option<String>,
    pub balance: Option<Decimal>,
}

impl AccountPatch {
    pub fn apply(self, account: &mut Account) {
        if let Some(v) = self.name {
            account.name = v;
        }
        if let Some(v) = self.currency {
            account.currency = v;
        }
        if let Some(v) = self.r#type {
            account.r#type = v;
        }
        if let Some(v) = self.balance {
            account.balance = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }

    /// Money flows in for deposits and out for everything else.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Deposit => amount.abs(),
            TransactionType::Withdrawal | TransactionType::Transfer => -amount.abs(),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(anyhow::anyhow!(
                "Unknown transaction type '{}', expected deposit, withdrawal or transfer",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub r#type: TransactionType,
    pub amount: Decimal, // sign encodes direction
    pub currency: String,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub to_account_id: Option<i64>,
    pub date: Option<DateTime<Utc>>, // defaults to now
}

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub account_id: Option<i64>,
    pub r#type: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub to_account_id: Option<i64>,
}

impl TransactionPatch {
    /// Merges the given fields. A new type or amount re-signs the amount to
    /// match the type, and only transfers keep a destination account.
    pub fn apply(self, tx: &mut Transaction) {
        let resign = self.r#type.is_some() || self.amount.is_some();
        if let Some(v) = self.account_id {
            tx.account_id = v;
        }
        if let Some(v) = self.r#type {
            tx.r#type = v;
        }
        if let Some(v) = self.amount {
            tx.amount = v;
        }
        if let Some(v) = self.currency {
            tx.currency = v;
        }
        if let Some(v) = self.description {
            tx.description = v;
        }
        if let Some(v) = self.category {
            tx.category = v;
        }
        if let Some(v) = self.date {
            tx.date = v;
        }
        if let Some(v) = self.status {
            tx.status = v;
        }
        if let Some(v) = self.to_account_id {
            tx.to_account_id = Some(v);
        }

        if resign {
            tx.amount = tx.r#type.signed(tx.amount);
        }
        if tx.r#type != TransactionType::Transfer {
            tx.to_account_id = None;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_income: Decimal,  // base currency
    pub total_expenses: Decimal, // base currency, positive magnitude
    pub transaction_count: usize,
    pub categories: BTreeMap<String, usize>,
}
