// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence for the account and transaction collections.
//!
//! Each collection is a JSON array stored under a fixed key in the `kv`
//! table. An absent key is seeded with sample data on first access.
//! Read-modify-write sequences run inside an IMMEDIATE transaction, so two
//! writers touching the same collection serialize instead of one silently
//! overwriting the other.

pub mod accounts;
pub mod transactions;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub const ACCOUNTS_KEY: &str = "multi_currency_accounts";
pub const TRANSACTIONS_KEY: &str = "multi_currency_transactions";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt collection '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize collection '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub fn get_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| r.get(0))
        .optional()?;
    Ok(v)
}

pub fn put_raw(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// Runs `f` inside an IMMEDIATE transaction and commits if it succeeds.
pub fn atomically<R>(conn: &Connection, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

/// Reads a collection, seeding (and persisting) it when the key is absent.
pub(crate) fn read_collection<T>(conn: &Connection, key: &str, seed: fn() -> Vec<T>) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    match get_raw(conn, key)? {
        Some(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        }),
        None => {
            let items = seed();
            info!("seeding '{}' with {} sample records", key, items.len());
            write_collection(conn, key, &items)?;
            Ok(items)
        }
    }
}

pub(crate) fn write_collection<T: Serialize>(conn: &Connection, key: &str, items: &[T]) -> Result<()> {
    let text = serde_json::to_string(items).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    put_raw(conn, key, &text)
}

pub(crate) fn load<T>(conn: &Connection, key: &str, seed: fn() -> Vec<T>) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    atomically(conn, |c| read_collection(c, key, seed))
}

/// Read-modify-write of one collection; the closure's result is passed through.
pub(crate) fn modify<T, R>(
    conn: &Connection,
    key: &str,
    seed: fn() -> Vec<T>,
    f: impl FnOnce(&mut Vec<T>) -> R,
) -> Result<R>
where
    T: Serialize + DeserializeOwned,
{
    atomically(conn, |c| {
        let mut items = read_collection(c, key, seed)?;
        let out = f(&mut items);
        write_collection(c, key, &items)?;
        Ok(out)
    })
}

/// Clock-derived id, bumped past `existing` so rapid inserts never collide.
pub(crate) fn next_id(now: DateTime<Utc>, existing: impl Iterator<Item = i64>) -> i64 {
    let clock = now.timestamp_millis();
    match existing.max() {
        Some(max) if max >= clock => {
            debug!("clock id {} already taken, using {}", clock, max + 1);
            max + 1
        }
        _ => clock,
    }
}
