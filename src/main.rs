// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use log::{debug, LevelFilter};
use std::path::PathBuf;

use walletfx::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();

    let db_override = matches.get_one::<PathBuf>("db");
    let conn = db::open_or_init(db_override.map(PathBuf::as_path))?;
    let fx = utils::load_exchange(matches.get_one::<PathBuf>("rates").map(PathBuf::as_path))?;
    debug!(
        "rate table: {} currencies against {}",
        fx.rates().iter().count(),
        fx.rates().reference()
    );

    match matches.subcommand() {
        Some(("init", _)) => {
            commands::init(&conn)?;
            match db_override {
                Some(p) => println!("Database initialized at {}", p.display()),
                None => println!("Database initialized at {}", db::db_path()?.display()),
            }
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, &fx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &fx, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, &fx, sub)?,
        Some(("summary", _)) => commands::summary::handle(&conn, &fx)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, &fx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
