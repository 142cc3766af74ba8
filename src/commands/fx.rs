// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Exchange;
use crate::utils::{arg, get_base_currency, maybe_print_json, parse_decimal, pretty_table, set_base_currency};
use anyhow::Result;
use log::warn;
use rusqlite::Connection;

pub fn handle(conn: &Connection, fx: &Exchange, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currencies", _)) => list_currencies(conn, fx)?,
        Some(("rates", _)) => list_rates(fx),
        Some(("rate", sub)) => {
            let from = arg(sub, "from")?.to_uppercase();
            let to = arg(sub, "to")?.to_uppercase();
            warn_unsupported(fx, &[from.as_str(), to.as_str()]);
            println!("{}", fx.format_exchange_rate(&from, &to, None));
        }
        Some(("convert", sub)) => convert_amount(fx, sub)?,
        Some(("format", sub)) => {
            let ccy = arg(sub, "currency")?.to_uppercase();
            println!("{}", fx.format_input(arg(sub, "amount")?, &ccy));
        }
        Some(("set-base", sub)) => {
            let ccy = arg(sub, "currency")?.to_uppercase();
            warn_unsupported(fx, &[ccy.as_str()]);
            set_base_currency(conn, &ccy)?;
            println!("Base currency set to {}", ccy);
        }
        _ => {}
    }
    Ok(())
}

fn warn_unsupported(fx: &Exchange, codes: &[&str]) {
    for code in codes {
        if !fx.catalog().is_supported(code) {
            warn!("{} is not a supported currency; treating it at parity", code);
        }
    }
}

fn list_currencies(conn: &Connection, fx: &Exchange) -> Result<()> {
    let base = get_base_currency(conn)?;
    let data = fx
        .catalog()
        .currencies()
        .iter()
        .map(|c| {
            vec![
                c.code.clone(),
                c.name.clone(),
                c.symbol.clone(),
                if c.code == base { "*".into() } else { String::new() },
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Code", "Name", "Symbol", "Base"], data));
    Ok(())
}

fn list_rates(fx: &Exchange) {
    let reference = fx.rates().reference();
    let data = fx
        .rates()
        .iter()
        .map(|(code, rate)| {
            vec![
                code.to_string(),
                rate.to_string(),
                fx.format_exchange_rate(reference, code, None),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Code", "Rate", "Per reference unit"], data));
}

fn convert_amount(fx: &Exchange, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let from = arg(sub, "from")?.to_uppercase();
    let to = arg(sub, "to")?.to_uppercase();
    warn_unsupported(fx, &[from.as_str(), to.as_str()]);

    let res = fx.calculate_exchange_amount(amount, &from, &to);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &res)? {
        println!("{} -> {}", res.formatted_original, res.formatted_converted);
        println!("{}", res.formatted_rate);
    }
    Ok(())
}
