// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Exchange;
use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};
use crate::store::{accounts, transactions, transactions::TransactionQuery};
use crate::utils::{
    arg, base_currency_arg, end_of_day, maybe_print_json, parse_date, parse_decimal,
    parse_timestamp, pretty_table, short_date,
};
use anyhow::{Context, Result};
use log::warn;
use rusqlite::Connection;

pub fn handle(conn: &Connection, fx: &Exchange, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, fx, sub)?,
        Some(("list", sub)) => list(conn, fx, sub)?,
        Some(("show", sub)) => show(conn, fx, sub)?,
        Some(("update", sub)) => update(conn, fx, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing transaction id")?;
            if transactions::delete(conn, id).context("Failed to delete transaction")? {
                println!("Removed transaction {}", id);
            } else {
                anyhow::bail!("Transaction {} not found", id);
            }
        }
        Some(("stats", sub)) => stats(conn, fx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let account_id = *sub.get_one::<i64>("account").context("Missing account")?;
    let kind: TransactionType = arg(sub, "type")?.parse()?;
    let amount = kind.signed(parse_decimal(arg(sub, "amount")?)?);
    let to_account_id = sub.get_one::<i64>("to").copied();

    let account = accounts::get(conn, account_id)
        .context("Failed to load accounts")?
        .with_context(|| format!("Account {} not found", account_id))?;
    if kind != TransactionType::Transfer && to_account_id.is_some() {
        warn!("--to is only used by transfers; ignoring");
    }
    check_transfer_target(conn, kind, account_id, to_account_id)?;

    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.to_uppercase(),
        None => account.currency.clone(),
    };
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_timestamp(s))
        .transpose()?;

    let new = NewTransaction {
        account_id,
        r#type: kind,
        amount,
        currency,
        description: arg(sub, "description")?.to_string(),
        category: arg(sub, "category")?.to_string(),
        to_account_id: if kind == TransactionType::Transfer {
            to_account_id
        } else {
            None
        },
        date,
    };
    let (tx, touched) = if sub.get_flag("apply-balance") {
        transactions::create_and_apply(conn, fx, new).context("Failed to record transaction")?
    } else {
        let tx = transactions::create(conn, new).context("Failed to record transaction")?;
        (tx, Vec::new())
    };
    println!(
        "Recorded {} #{} of {} on '{}'",
        tx.r#type,
        tx.id,
        fx.format(tx.amount, &tx.currency),
        account.name
    );
    for a in touched {
        println!("  '{}' balance now {}", a.name, fx.format(a.balance, &a.currency));
    }
    Ok(())
}

/// Transfers need a live destination other than the source account.
fn check_transfer_target(
    conn: &Connection,
    kind: TransactionType,
    account_id: i64,
    to_account_id: Option<i64>,
) -> Result<()> {
    match (kind, to_account_id) {
        (TransactionType::Transfer, None) => anyhow::bail!("Transfers need --to <account id>"),
        (TransactionType::Transfer, Some(to)) if to == account_id => {
            anyhow::bail!("Cannot transfer an account to itself")
        }
        (TransactionType::Transfer, Some(to)) => {
            accounts::get(conn, to)?.with_context(|| format!("Account {} not found", to))?;
        }
        _ => {}
    }
    Ok(())
}

fn signed_display(fx: &Exchange, tx: &Transaction) -> String {
    let s = fx.format(tx.amount, &tx.currency);
    if tx.amount > rust_decimal::Decimal::ZERO {
        format!("+{}", s)
    } else {
        s
    }
}

pub fn transaction_row(fx: &Exchange, tx: &Transaction) -> Vec<String> {
    vec![
        tx.id.to_string(),
        short_date(&tx.date),
        tx.account_id.to_string(),
        tx.r#type.to_string(),
        tx.description.clone(),
        tx.category.clone(),
        signed_display(fx, tx),
        tx.to_account_id.map(|id| id.to_string()).unwrap_or_default(),
        tx.status.clone(),
    ]
}

pub const TRANSACTION_HEADERS: [&str; 9] = [
    "ID", "Date", "Account", "Type", "Description", "Category", "Amount", "To", "Status",
];

/// Builds the storage query from `tx list` arguments.
pub fn query_from_args(sub: &clap::ArgMatches) -> Result<TransactionQuery> {
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_timestamp(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s).map(end_of_day))
        .transpose()?;
    Ok(TransactionQuery {
        account_id: sub.get_one::<i64>("account").copied(),
        category: sub.get_one::<String>("category").cloned(),
        from,
        to,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

fn list(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let q = query_from_args(sub)?;
    let data = transactions::query(conn, &q).context("Failed to load transactions")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data.iter().map(|t| transaction_row(fx, t)).collect();
        println!("{}", pretty_table(&TRANSACTION_HEADERS, rows));
    }
    Ok(())
}

fn show(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing transaction id")?;
    let tx = transactions::get(conn, id)?
        .with_context(|| format!("Transaction {} not found", id))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tx)? {
        println!("{}", pretty_table(&TRANSACTION_HEADERS, vec![transaction_row(fx, &tx)]));
    }
    Ok(())
}

fn update(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing transaction id")?;
    let patch = TransactionPatch {
        account_id: sub.get_one::<i64>("account").copied(),
        r#type: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TransactionType>())
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        currency: sub.get_one::<String>("currency").map(|s| s.to_uppercase()),
        description: sub.get_one::<String>("description").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_timestamp(s))
            .transpose()?,
        status: sub.get_one::<String>("status").cloned(),
        to_account_id: sub.get_one::<i64>("to").copied(),
    };

    // Validate the merged record before anything is written.
    let mut merged = transactions::get(conn, id)
        .context("Failed to load transactions")?
        .with_context(|| format!("Transaction {} not found", id))?;
    let relinks =
        patch.account_id.is_some() || patch.r#type.is_some() || patch.to_account_id.is_some();
    patch.clone().apply(&mut merged);
    if let Some(account_id) = patch.account_id {
        accounts::get(conn, account_id)?
            .with_context(|| format!("Account {} not found", account_id))?;
    }
    if relinks {
        if merged.r#type != TransactionType::Transfer && patch.to_account_id.is_some() {
            warn!("--to is only used by transfers; ignoring");
        }
        check_transfer_target(conn, merged.r#type, merged.account_id, merged.to_account_id)?;
    }

    let tx = transactions::update(conn, id, patch)
        .context("Failed to update transaction")?
        .with_context(|| format!("Transaction {} not found", id))?;
    println!("{}", pretty_table(&TRANSACTION_HEADERS, vec![transaction_row(fx, &tx)]));
    Ok(())
}

fn stats(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let base = base_currency_arg(conn, sub)?;
    let account_id = sub.get_one::<i64>("account").copied();
    let s = transactions::stats(conn, account_id, fx, &base)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Transactions", "Income", "Expenses"],
            vec![vec![
                s.transaction_count.to_string(),
                fx.format(s.total_income, &base),
                fx.format(s.total_expenses, &base),
            ]],
        )
    );
    let rows = s
        .categories
        .iter()
        .map(|(cat, n)| vec![cat.clone(), n.to_string()])
        .collect();
    println!("{}", pretty_table(&["Category", "Count"], rows));
    Ok(())
}
