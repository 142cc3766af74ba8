// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, modify, next_id, Result, ACCOUNTS_KEY};
use crate::currency::{add_saturating, Exchange};
use crate::models::{Account, AccountPatch, NewAccount};
use chrono::Utc;
use log::debug;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn sample_accounts() -> Vec<Account> {
    let now = Utc::now();
    vec![
        Account {
            id: 1,
            name: "US Dollar Account".into(),
            currency: "USD".into(),
            r#type: "Checking".into(),
            balance: Decimal::new(542050, 2),
            created_at: now,
        },
        Account {
            id: 2,
            name: "Euro Savings".into(),
            currency: "EUR".into(),
            r#type: "Savings".into(),
            balance: Decimal::new(325075, 2),
            created_at: now,
        },
        Account {
            id: 3,
            name: "British Pound".into(),
            currency: "GBP".into(),
            r#type: "Investment".into(),
            balance: Decimal::new(189025, 2),
            created_at: now,
        },
    ]
}

pub fn list(conn: &Connection) -> Result<Vec<Account>> {
    load(conn, ACCOUNTS_KEY, sample_accounts)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Account>> {
    Ok(list(conn)?.into_iter().find(|a| a.id == id))
}

pub fn create(conn: &Connection, new: NewAccount) -> Result<Account> {
    modify(conn, ACCOUNTS_KEY, sample_accounts, |accounts| {
        let now = Utc::now();
        let account = Account {
            id: next_id(now, accounts.iter().map(|a| a.id)),
            name: new.name,
            currency: new.currency,
            r#type: new.r#type,
            balance: new.balance,
            created_at: now,
        };
        accounts.push(account.clone());
        debug!("created account {} ({})", account.id, account.name);
        account
    })
}

/// Returns the updated record, or `None` when no account has `id`.
pub fn update(conn: &Connection, id: i64, patch: AccountPatch) -> Result<Option<Account>> {
    modify(conn, ACCOUNTS_KEY, sample_accounts, |accounts| {
        let account = accounts.iter_mut().find(|a| a.id == id)?;
        patch.apply(account);
        Some(account.clone())
    })
}

pub fn update_balance(conn: &Connection, id: i64, balance: Decimal) -> Result<Option<Account>> {
    update(
        conn,
        id,
        AccountPatch {
            balance: Some(balance),
            ..Default::default()
        },
    )
}

/// Transactions referencing the account are left untouched.
pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    modify(conn, ACCOUNTS_KEY, sample_accounts, |accounts| {
        let before = accounts.len();
        accounts.retain(|a| a.id != id);
        accounts.len() != before
    })
}

/// Sum of every stored balance, converted into `base`.
pub fn total_balance(conn: &Connection, fx: &Exchange, base: &str) -> Result<Decimal> {
    let accounts = list(conn)?;
    Ok(accounts
        .iter()
        .map(|a| fx.convert(a.balance, &a.currency, base))
        .fold(Decimal::ZERO, add_saturating))
}
