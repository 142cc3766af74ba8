// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Exchange;
use crate::models::TransactionType;
use crate::store::{accounts, transactions};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(kind: &'static str, detail: String) -> Self {
        Issue { kind, detail }
    }
}

pub fn find_issues(conn: &Connection, fx: &Exchange) -> Result<Vec<Issue>> {
    let accts = accounts::list(conn)?;
    let txs = transactions::list(conn, None)?;
    let by_id: HashMap<i64, &str> = accts.iter().map(|a| (a.id, a.currency.as_str())).collect();
    let mut issues = Vec::new();

    // 1) Currencies outside the catalog (they convert at parity)
    let mut unknown = BTreeSet::new();
    for ccy in accts.iter().map(|a| &a.currency).chain(txs.iter().map(|t| &t.currency)) {
        if !fx.catalog().is_supported(ccy) {
            unknown.insert(ccy.clone());
        }
    }
    for ccy in unknown {
        issues.push(Issue::new("unsupported_currency", ccy));
    }

    for tx in &txs {
        // 2) Transactions whose account was deleted
        match by_id.get(&tx.account_id) {
            None => issues.push(Issue::new(
                "orphaned_transaction",
                format!("#{} -> account {}", tx.id, tx.account_id),
            )),
            Some(ccy) if *ccy != tx.currency => issues.push(Issue::new(
                "currency_mismatch",
                format!("#{} is {} but account {} is {}", tx.id, tx.currency, tx.account_id, ccy),
            )),
            Some(_) => {}
        }

        // 3) Transfers without a live destination
        if tx.r#type == TransactionType::Transfer {
            match tx.to_account_id {
                None => issues.push(Issue::new("transfer_without_target", format!("#{}", tx.id))),
                Some(to) if !by_id.contains_key(&to) => issues.push(Issue::new(
                    "dangling_transfer",
                    format!("#{} -> account {}", tx.id, to),
                )),
                Some(_) => {}
            }
        }
    }
    Ok(issues)
}

pub fn handle(conn: &Connection, fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let issues = find_issues(conn, fx)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &issues)? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
