// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{accounts, transactions};
use crate::utils::arg;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;

    let names: HashMap<i64, String> = accounts::list(conn)
        .context("Failed to load accounts")?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    // Oldest first, the order a ledger is read in
    let mut txs = transactions::list(conn, None).context("Failed to load transactions")?;
    txs.reverse();
    let account_name = |id: i64| names.get(&id).cloned().unwrap_or_default();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "account", "type", "amount", "currency", "description", "category",
                "status", "to_account",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_rfc3339(),
                    account_name(t.account_id),
                    t.r#type.to_string(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.description.clone(),
                    t.category.clone(),
                    t.status.clone(),
                    t.to_account_id.map(account_name).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date.to_rfc3339(), "account": account_name(t.account_id),
                        "type": t.r#type, "amount": t.amount.to_string(), "currency": t.currency,
                        "description": t.description, "category": t.category, "status": t.status,
                        "toAccount": t.to_account_id.map(account_name),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            anyhow::bail!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
