// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("walletfx")
        .about("Multi-currency accounts, transaction history and exchange previews")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Database file (default: platform data dir)"),
        )
        .arg(
            Arg::new("rates")
                .long("rates")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON rate table replacing the built-in one"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v debug, -vv trace)"),
        )
        .subcommand(Command::new("init").about("Create the database and seed sample data"))
        .subcommand(account_cmd())
        .subcommand(tx_cmd())
        .subcommand(fx_cmd())
        .subcommand(Command::new("summary").about("Total balance, accounts and recent activity"))
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export all transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check stored data for inconsistencies")
                .args(json_args()),
        )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts")
        .subcommand(
            Command::new("add")
                .about("Create an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("currency").long("currency").default_value("USD"))
                .arg(Arg::new("type").long("type").default_value("Checking"))
                .arg(Arg::new("balance").long("balance").default_value("0")),
        )
        .subcommand(Command::new("list").about("List accounts").args(json_args()))
        .subcommand(
            Command::new("show")
                .about("Show one account")
                .arg(id_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("update")
                .about("Change account fields")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("currency").long("currency"))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("balance").long("balance")),
        )
        .subcommand(
            Command::new("set-balance")
                .about("Overwrite the stored balance")
                .arg(id_arg())
                .arg(Arg::new("balance").required(true).allow_negative_numbers(true)),
        )
        .subcommand(Command::new("rm").about("Delete an account").arg(id_arg()))
        .subcommand(
            Command::new("total")
                .about("Sum of all balances in one currency")
                .arg(Arg::new("base").long("base").help("Defaults to the stored base currency")),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Manage transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(["deposit", "withdrawal", "transfer"]),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_negative_numbers(true),
                )
                .arg(Arg::new("currency").long("currency").help("Defaults to the account currency"))
                .arg(Arg::new("description").long("description").default_value(""))
                .arg(Arg::new("category").long("category").default_value("Other"))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(value_parser!(i64))
                        .help("Destination account for transfers"),
                )
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD or RFC 3339"))
                .arg(
                    Arg::new("apply-balance")
                        .long("apply-balance")
                        .action(ArgAction::SetTrue)
                        .help("Also post the amount to the stored account balances (recorded only if that succeeds)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("from").long("from").help("YYYY-MM-DD, inclusive"))
                .arg(Arg::new("to").long("to").help("YYYY-MM-DD, inclusive"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("show")
                .about("Show one transaction")
                .arg(id_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("update")
                .about("Change transaction fields")
                .arg(id_arg())
                .arg(
                    Arg::new("account")
                        .long("account")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["deposit", "withdrawal", "transfer"]),
                )
                .arg(Arg::new("amount").long("amount").allow_negative_numbers(true))
                .arg(Arg::new("currency").long("currency"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("status").long("status"))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(value_parser!(i64))
                        .help("Destination account for transfers"),
                ),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(
            Command::new("stats")
                .about("Income, expenses and category counts")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("base").long("base").help("Defaults to the stored base currency"))
                .args(json_args()),
        )
}

fn fx_cmd() -> Command {
    Command::new("fx")
        .about("Currencies, rates and exchange previews")
        .subcommand(Command::new("currencies").about("List supported currencies"))
        .subcommand(Command::new("rates").about("Show the rate table"))
        .subcommand(
            Command::new("rate")
                .about("Directional rate between two currencies")
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true)),
        )
        .subcommand(
            Command::new("convert")
                .about("Preview an exchange")
                .arg(Arg::new("amount").required(true).allow_negative_numbers(true))
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true))
                .args(json_args()),
        )
        .subcommand(
            Command::new("format")
                .about("Render an amount the way the wallet displays it")
                .arg(Arg::new("amount").required(true).allow_negative_numbers(true))
                .arg(Arg::new("currency").required(true)),
        )
        .subcommand(
            Command::new("set-base")
                .about("Currency used for totals and stats")
                .arg(Arg::new("currency").required(true)),
        )
}
