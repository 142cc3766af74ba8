// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Exchange;
use crate::models::{Account, AccountPatch, NewAccount, ACCOUNT_TYPES};
use crate::store::accounts;
use crate::utils::{arg, base_currency_arg, maybe_print_json, parse_decimal, pretty_table, short_date};
use anyhow::{Context, Result};
use log::warn;
use rusqlite::Connection;

pub fn handle(conn: &Connection, fx: &Exchange, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, fx, sub)?,
        Some(("list", sub)) => list(conn, fx, sub)?,
        Some(("show", sub)) => show(conn, fx, sub)?,
        Some(("update", sub)) => update(conn, fx, sub)?,
        Some(("set-balance", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing account id")?;
            let balance = parse_decimal(arg(sub, "balance")?)?;
            match accounts::update_balance(conn, id, balance)? {
                Some(a) => println!("Balance of '{}' set to {}", a.name, fx.format(a.balance, &a.currency)),
                None => anyhow::bail!("Account {} not found", id),
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing account id")?;
            if accounts::delete(conn, id).context("Failed to delete account")? {
                println!("Removed account {}", id);
            } else {
                anyhow::bail!("Account {} not found", id);
            }
        }
        Some(("total", sub)) => {
            let base = base_currency_arg(conn, sub)?;
            let total = accounts::total_balance(conn, fx, &base)?;
            println!("Total balance: {}", fx.format(total, &base));
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?.trim();
    if name.is_empty() {
        anyhow::bail!("Account name must not be empty");
    }
    let ccy = arg(sub, "currency")?.to_uppercase();
    let typ = arg(sub, "type")?;
    let balance = parse_decimal(arg(sub, "balance")?)?;

    if !fx.catalog().is_supported(&ccy) {
        warn!("{} is not in the currency catalog; it will convert at parity", ccy);
    }
    if !ACCOUNT_TYPES.contains(&typ) {
        warn!("non-standard account type '{}'", typ);
    }

    let account = accounts::create(
        conn,
        NewAccount {
            name: name.to_string(),
            currency: ccy,
            r#type: typ.to_string(),
            balance,
        },
    )
    .context("Failed to create account")?;
    println!(
        "Added account '{}' #{} ({}, {})",
        account.name,
        account.id,
        account.r#type,
        fx.format(account.balance, &account.currency)
    );
    Ok(())
}

pub fn account_row(fx: &Exchange, a: &Account) -> Vec<String> {
    vec![
        a.id.to_string(),
        a.name.clone(),
        a.r#type.clone(),
        a.currency.clone(),
        fx.format(a.balance, &a.currency),
        short_date(&a.created_at),
    ]
}

pub const ACCOUNT_HEADERS: [&str; 6] = ["ID", "Name", "Type", "Currency", "Balance", "Created"];

fn list(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let data = accounts::list(conn).context("Failed to load accounts")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data.iter().map(|a| account_row(fx, a)).collect();
        println!("{}", pretty_table(&ACCOUNT_HEADERS, rows));
    }
    Ok(())
}

fn show(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing account id")?;
    let account = accounts::get(conn, id)?.with_context(|| format!("Account {} not found", id))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &account)? {
        println!("{}", pretty_table(&ACCOUNT_HEADERS, vec![account_row(fx, &account)]));
    }
    Ok(())
}

fn update(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing account id")?;
    let patch = AccountPatch {
        name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
        currency: sub.get_one::<String>("currency").map(|s| s.to_uppercase()),
        r#type: sub.get_one::<String>("type").cloned(),
        balance: sub
            .get_one::<String>("balance")
            .map(|s| parse_decimal(s))
            .transpose()?,
    };
    let account = accounts::update(conn, id, patch)
        .context("Failed to update account")?
        .with_context(|| format!("Account {} not found", id))?;
    println!("{}", pretty_table(&ACCOUNT_HEADERS, vec![account_row(fx, &account)]));
    Ok(())
}
