// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::accounts::sample_accounts;
use super::{
    atomically, load, modify, next_id, read_collection, write_collection, Result, ACCOUNTS_KEY,
    TRANSACTIONS_KEY,
};
use crate::currency::{add_saturating, Exchange};
use crate::models::{
    Account, NewTransaction, Transaction, TransactionPatch, TransactionStats, TransactionType,
};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub account_id: Option<i64>,
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>, // inclusive
    pub to: Option<DateTime<Utc>>,   // inclusive
    pub limit: Option<usize>,
}

impl TransactionQuery {
    fn matches(&self, tx: &Transaction) -> bool {
        self.account_id.is_none_or(|id| tx.account_id == id)
            && self.category.as_deref().is_none_or(|c| tx.category == c)
            && self.from.is_none_or(|d| tx.date >= d)
            && self.to.is_none_or(|d| tx.date <= d)
    }
}

pub fn sample_transactions() -> Vec<Transaction> {
    use TransactionType::*;

    let now = Utc::now();
    let sample = |id: i64, account_id: i64, kind, cents: i64, ccy: &str, what: &str, cat: &str, days| {
        Transaction {
            id,
            account_id,
            r#type: kind,
            amount: Decimal::new(cents, 2),
            currency: ccy.into(),
            description: what.into(),
            category: cat.into(),
            date: now - Duration::days(days),
            status: STATUS_COMPLETED.into(),
            to_account_id: None,
        }
    };
    let mut transfer = sample(3, 1, Transfer, -50000, "USD", "Transfer to Savings", "Transfer", 3);
    transfer.to_account_id = Some(2);
    vec![
        sample(1, 1, Deposit, 150000, "USD", "Salary Deposit", "Income", 1),
        sample(2, 2, Withdrawal, -25000, "EUR", "Grocery Shopping", "Food", 2),
        transfer,
        sample(4, 3, Deposit, 89025, "GBP", "Investment Return", "Investment", 4),
        sample(5, 1, Withdrawal, -7550, "USD", "Gas Station", "Transportation", 5),
    ]
}

/// Newest first; equal dates fall back to the higher id.
fn sort_desc(txs: &mut [Transaction]) {
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

pub fn query(conn: &Connection, q: &TransactionQuery) -> Result<Vec<Transaction>> {
    let mut txs: Vec<Transaction> = load(conn, TRANSACTIONS_KEY, sample_transactions)?
        .into_iter()
        .filter(|t| q.matches(t))
        .collect();
    sort_desc(&mut txs);
    if let Some(limit) = q.limit {
        txs.truncate(limit);
    }
    Ok(txs)
}

pub fn list(conn: &Connection, account_id: Option<i64>) -> Result<Vec<Transaction>> {
    query(
        conn,
        &TransactionQuery {
            account_id,
            ..Default::default()
        },
    )
}

pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<Transaction>> {
    query(
        conn,
        &TransactionQuery {
            limit: Some(limit),
            ..Default::default()
        },
    )
}

pub fn by_category(conn: &Connection, category: &str) -> Result<Vec<Transaction>> {
    query(
        conn,
        &TransactionQuery {
            category: Some(category.to_string()),
            ..Default::default()
        },
    )
}

pub fn by_date_range(
    conn: &Connection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Transaction>> {
    query(
        conn,
        &TransactionQuery {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        },
    )
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    Ok(load(conn, TRANSACTIONS_KEY, sample_transactions)?
        .into_iter()
        .find(|t| t.id == id))
}

/// Records a transaction. Account balances are not adjusted; see
/// [`apply_to_balances`] and [`create_and_apply`] for the explicit opt-in.
pub fn create(conn: &Connection, new: NewTransaction) -> Result<Transaction> {
    atomically(conn, |c| insert(c, new))
}

/// Records `new` and posts it to the balances as one storage transaction:
/// if posting fails the transaction is not recorded either.
pub fn create_and_apply(
    conn: &Connection,
    fx: &Exchange,
    new: NewTransaction,
) -> Result<(Transaction, Vec<Account>)> {
    atomically(conn, |c| {
        let tx = insert(c, new)?;
        let touched = post(c, fx, &tx)?;
        Ok((tx, touched))
    })
}

// Callers own the surrounding storage transaction.
fn insert(c: &Connection, new: NewTransaction) -> Result<Transaction> {
    let mut txs = read_collection(c, TRANSACTIONS_KEY, sample_transactions)?;
    let now = Utc::now();
    let tx = Transaction {
        id: next_id(now, txs.iter().map(|t| t.id)),
        account_id: new.account_id,
        r#type: new.r#type,
        amount: new.amount,
        currency: new.currency,
        description: new.description,
        category: new.category,
        date: new.date.unwrap_or(now),
        status: STATUS_COMPLETED.to_string(),
        to_account_id: new.to_account_id,
    };
    txs.insert(0, tx.clone());
    write_collection(c, TRANSACTIONS_KEY, &txs)?;
    debug!("created transaction {} on account {}", tx.id, tx.account_id);
    Ok(tx)
}

pub fn update(conn: &Connection, id: i64, patch: TransactionPatch) -> Result<Option<Transaction>> {
    modify(conn, TRANSACTIONS_KEY, sample_transactions, |txs| {
        let tx = txs.iter_mut().find(|t| t.id == id)?;
        patch.apply(tx);
        Some(tx.clone())
    })
}

pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    modify(conn, TRANSACTIONS_KEY, sample_transactions, |txs| {
        let before = txs.len();
        txs.retain(|t| t.id != id);
        txs.len() != before
    })
}

/// Income and expense totals converted into `base`, plus a per-category count.
pub fn stats(
    conn: &Connection,
    account_id: Option<i64>,
    fx: &Exchange,
    base: &str,
) -> Result<TransactionStats> {
    let txs = list(conn, account_id)?;
    let mut stats = TransactionStats {
        transaction_count: txs.len(),
        ..Default::default()
    };
    for tx in &txs {
        let amount = fx.convert(tx.amount, &tx.currency, base);
        if amount > Decimal::ZERO {
            stats.total_income = add_saturating(stats.total_income, amount);
        } else {
            stats.total_expenses = add_saturating(stats.total_expenses, amount.abs());
        }
        *stats.categories.entry(tx.category.clone()).or_insert(0) += 1;
    }
    Ok(stats)
}

/// Posts `tx` to the stored balances: the signed amount to its account and,
/// for transfers, the converted magnitude to the destination. Both accounts
/// are written in a single storage transaction. Returns the accounts touched.
pub fn apply_to_balances(conn: &Connection, fx: &Exchange, tx: &Transaction) -> Result<Vec<Account>> {
    atomically(conn, |c| post(c, fx, tx))
}

fn post(c: &Connection, fx: &Exchange, tx: &Transaction) -> Result<Vec<Account>> {
    let mut accounts = read_collection(c, ACCOUNTS_KEY, sample_accounts)?;
    let mut touched = Vec::new();

    if let Some(src) = accounts.iter_mut().find(|a| a.id == tx.account_id) {
        let delta = fx.convert(tx.amount, &tx.currency, &src.currency);
        src.balance = add_saturating(src.balance, delta);
        touched.push(src.clone());
    }
    if tx.r#type == TransactionType::Transfer {
        if let Some(dst_id) = tx.to_account_id {
            if let Some(dst) = accounts.iter_mut().find(|a| a.id == dst_id) {
                let delta = fx.convert(tx.amount.abs(), &tx.currency, &dst.currency);
                dst.balance = add_saturating(dst.balance, delta);
                touched.push(dst.clone());
            }
        }
    }

    write_collection(c, ACCOUNTS_KEY, &accounts)?;
    debug!("applied transaction {} to {} account(s)", tx.id, touched.len());
    Ok(touched)
}
