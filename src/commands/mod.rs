// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod doctor;
pub mod exporter;
pub mod fx;
pub mod summary;
pub mod transactions;

use crate::store;
use anyhow::Result;
use rusqlite::Connection;

/// Touches both collections so a fresh database gets its sample data.
pub fn init(conn: &Connection) -> Result<()> {
    store::accounts::list(conn)?;
    store::transactions::list(conn, None)?;
    Ok(())
}
