// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::accounts::{account_row, ACCOUNT_HEADERS};
use super::transactions::{transaction_row, TRANSACTION_HEADERS};
use crate::currency::Exchange;
use crate::models::{Account, Transaction};
use crate::store::{accounts, transactions};
use crate::utils::{get_base_currency, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

const RECENT: usize = 5;

/// Everything the home view shows.
#[derive(Debug, Clone)]
pub struct Summary {
    pub base: String,
    pub total: Decimal,
    pub accounts: Vec<Account>,
    pub recent: Vec<Transaction>,
}

pub fn build(conn: &Connection, fx: &Exchange) -> Result<Summary> {
    let base = get_base_currency(conn)?;
    Ok(Summary {
        total: accounts::total_balance(conn, fx, &base)?,
        accounts: accounts::list(conn).context("Failed to load accounts")?,
        recent: transactions::recent(conn, RECENT).context("Failed to load transactions")?,
        base,
    })
}

pub fn handle(conn: &Connection, fx: &Exchange) -> Result<()> {
    let s = build(conn, fx)?;
    println!("Total balance: {}", fx.format(s.total, &s.base));
    println!(
        "{}",
        pretty_table(&ACCOUNT_HEADERS, s.accounts.iter().map(|a| account_row(fx, a)).collect())
    );
    if s.recent.is_empty() {
        println!("No transactions yet.");
    } else {
        println!("Recent transactions:");
        println!(
            "{}",
            pretty_table(
                &TRANSACTION_HEADERS,
                s.recent.iter().map(|t| transaction_row(fx, t)).collect(),
            )
        );
    }
    Ok(())
}
