// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use walletfx::currency::{CurrencyCatalog, Exchange, RateTable};
use walletfx::models::{NewTransaction, TransactionPatch, TransactionType};
use walletfx::store::{accounts, transactions};
use walletfx::{cli, commands, db};

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn ids(txs: &[walletfx::models::Transaction]) -> Vec<i64> {
    txs.iter().map(|t| t.id).collect()
}

fn deposit(account_id: i64, amount: rust_decimal::Decimal) -> NewTransaction {
    NewTransaction {
        account_id,
        r#type: TransactionType::Deposit,
        amount,
        currency: "USD".into(),
        description: "Refund".into(),
        category: "Income".into(),
        to_account_id: None,
        date: None,
    }
}

#[test]
fn seeded_history_is_newest_first() {
    let conn = setup();
    let all = transactions::list(&conn, None).unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3, 4, 5]);
    assert_eq!(all[2].to_account_id, Some(2));
    assert!(all.iter().all(|t| t.status == "completed"));
}

#[test]
fn account_filter_keeps_date_order() {
    let conn = setup();
    transactions::create(
        &conn,
        NewTransaction {
            date: Some(Utc::now() - Duration::days(30)),
            ..deposit(1, dec!(1))
        },
    )
    .unwrap();
    let old = transactions::create(
        &conn,
        NewTransaction {
            date: Some(Utc::now() - Duration::hours(36)),
            ..deposit(1, dec!(2))
        },
    )
    .unwrap();
    let for_one = transactions::list(&conn, Some(1)).unwrap();
    assert_eq!(for_one.len(), 5);
    assert_eq!(for_one[0].id, 1);
    assert_eq!(for_one[1].id, old.id);
    assert!(for_one.windows(2).all(|w| w[0].date >= w[1].date));
}

#[test]
fn create_stamps_and_prepends() {
    let conn = setup();
    let tx = transactions::create(&conn, deposit(3, dec!(42))).unwrap();
    assert!(tx.id > 5);
    assert_eq!(tx.status, "completed");
    assert_eq!(transactions::recent(&conn, 1).unwrap()[0].id, tx.id);
    assert_eq!(transactions::get(&conn, tx.id).unwrap().unwrap().amount, dec!(42));
}

#[test]
fn create_leaves_balances_alone() {
    let conn = setup();
    let before = accounts::get(&conn, 1).unwrap().unwrap().balance;
    transactions::create(&conn, deposit(1, dec!(1000))).unwrap();
    assert_eq!(accounts::get(&conn, 1).unwrap().unwrap().balance, before);
}

#[test]
fn category_and_range_filters() {
    let conn = setup();
    assert_eq!(ids(&transactions::by_category(&conn, "Food").unwrap()), vec![2]);
    assert!(transactions::by_category(&conn, "Nope").unwrap().is_empty());

    let now = Utc::now();
    let window = transactions::by_date_range(&conn, now - Duration::hours(60), now).unwrap();
    assert_eq!(ids(&window), vec![1, 2]);
    assert_eq!(transactions::recent(&conn, 3).unwrap().len(), 3);
}

#[test]
fn update_and_delete() {
    let conn = setup();
    let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let tx = transactions::update(
        &conn,
        2,
        TransactionPatch {
            amount: Some(dec!(-260)),
            date: Some(when),
            status: Some("pending".into()),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(tx.amount, dec!(-260));
    assert_eq!(tx.description, "Grocery Shopping");
    assert_eq!(tx.status, "pending");
    // moved to the back of the history by its new date
    assert_eq!(transactions::list(&conn, None).unwrap().last().unwrap().id, 2);

    assert!(transactions::update(&conn, 999, TransactionPatch::default()).unwrap().is_none());
    assert!(transactions::delete(&conn, 2).unwrap());
    assert!(!transactions::delete(&conn, 2).unwrap());
    assert_eq!(transactions::list(&conn, None).unwrap().len(), 4);
}

#[test]
fn stats_split_income_and_expenses() {
    let conn = setup();
    let fx = Exchange::new(
        CurrencyCatalog::default(),
        RateTable::new("USD", BTreeMap::new()).unwrap(),
    );
    let s = transactions::stats(&conn, Some(1), &fx, "USD").unwrap();
    assert_eq!(s.transaction_count, 3);
    assert_eq!(s.total_income, dec!(1500));
    assert_eq!(s.total_expenses, dec!(575.50));
    assert_eq!(s.categories.get("Transfer"), Some(&1));
    assert_eq!(s.categories.len(), 3);

    let all = transactions::stats(&conn, None, &fx, "USD").unwrap();
    assert_eq!(all.transaction_count, 5);
    assert_eq!(all.total_income, dec!(2390.25));
    assert_eq!(all.total_expenses, dec!(825.50));
}

#[test]
fn apply_to_balances_moves_both_sides_of_a_transfer() {
    let conn = setup();
    let fx = Exchange::default();
    let tx = transactions::create(
        &conn,
        NewTransaction {
            account_id: 1,
            r#type: TransactionType::Transfer,
            amount: dec!(-100),
            currency: "USD".into(),
            description: "To euros".into(),
            category: "Transfer".into(),
            to_account_id: Some(2),
            date: None,
        },
    )
    .unwrap();
    let touched = transactions::apply_to_balances(&conn, &fx, &tx).unwrap();
    assert_eq!(touched.len(), 2);
    assert_eq!(accounts::get(&conn, 1).unwrap().unwrap().balance, dec!(5320.50));
    assert_eq!(accounts::get(&conn, 2).unwrap().unwrap().balance, dec!(3341.75));
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["walletfx", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let q = commands::transactions::query_from_args(list_m).unwrap();
            let rows = transactions::query(&conn, &q).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].id, 1);
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn cli_add_records_signed_amount() {
    let conn = setup();
    let fx = Exchange::default();
    let matches = cli::build_cli().get_matches_from([
        "walletfx", "tx", "add", "--account", "2", "--type", "withdrawal", "--amount", "12.5",
        "--category", "Food", "--apply-balance",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    commands::transactions::handle(&conn, &fx, tx_m).unwrap();

    let latest = &transactions::recent(&conn, 1).unwrap()[0];
    assert_eq!(latest.amount, dec!(-12.5));
    assert_eq!(latest.currency, "EUR");
    assert_eq!(latest.to_account_id, None);
    assert_eq!(accounts::get(&conn, 2).unwrap().unwrap().balance, dec!(3238.25));
}

#[test]
fn cli_rejects_transfer_without_target() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "walletfx", "tx", "add", "--account", "1", "--type", "transfer", "--amount", "5",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    assert!(commands::transactions::handle(&conn, &Exchange::default(), tx_m).is_err());
    assert_eq!(transactions::list(&conn, None).unwrap().len(), 5);
}

fn run_tx(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["walletfx", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    commands::transactions::handle(conn, &Exchange::default(), tx_m)
}

#[test]
fn retyping_resigns_the_amount() {
    let conn = setup();
    let tx = transactions::update(
        &conn,
        5,
        TransactionPatch {
            r#type: Some(TransactionType::Deposit),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(tx.amount, dec!(75.50));

    // a positive amount on a withdrawal is stored as an outflow
    let tx = transactions::update(
        &conn,
        2,
        TransactionPatch {
            amount: Some(dec!(30)),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(tx.amount, dec!(-30));

    // leaving transfer drops the destination
    let tx = transactions::update(
        &conn,
        3,
        TransactionPatch {
            r#type: Some(TransactionType::Deposit),
            to_account_id: Some(3),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(tx.amount, dec!(500));
    assert_eq!(tx.to_account_id, None);
}

#[test]
fn patch_moves_account_and_retargets_transfer() {
    let conn = setup();
    let tx = transactions::update(
        &conn,
        3,
        TransactionPatch {
            account_id: Some(2),
            to_account_id: Some(3),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(tx.account_id, 2);
    assert_eq!(tx.to_account_id, Some(3));
    assert_eq!(tx.amount, dec!(-500));
}

#[test]
fn cli_update_type_keeps_sign_in_step() {
    let conn = setup();
    run_tx(&conn, &["update", "5", "--type", "deposit"]).unwrap();
    let tx = transactions::get(&conn, 5).unwrap().unwrap();
    assert_eq!(tx.r#type, TransactionType::Deposit);
    assert_eq!(tx.amount, dec!(75.50));

    let fx = Exchange::default();
    let s = transactions::stats(&conn, Some(1), &fx, "USD").unwrap();
    assert_eq!(s.total_income, dec!(1575.50));
    assert_eq!(s.total_expenses, dec!(500));
}

#[test]
fn cli_update_to_transfer_needs_a_target() {
    let conn = setup();
    assert!(run_tx(&conn, &["update", "2", "--type", "transfer"]).is_err());
    assert!(run_tx(&conn, &["update", "2", "--type", "transfer", "--to", "2"]).is_err());
    assert!(run_tx(&conn, &["update", "2", "--type", "transfer", "--to", "99"]).is_err());
    let untouched = transactions::get(&conn, 2).unwrap().unwrap();
    assert_eq!(untouched.r#type, TransactionType::Withdrawal);

    run_tx(&conn, &["update", "2", "--type", "transfer", "--to", "1"]).unwrap();
    let tx = transactions::get(&conn, 2).unwrap().unwrap();
    assert_eq!(tx.r#type, TransactionType::Transfer);
    assert_eq!(tx.to_account_id, Some(1));
    assert_eq!(tx.amount, dec!(-250));

    assert!(run_tx(&conn, &["update", "2", "--account", "42"]).is_err());
    run_tx(&conn, &["update", "2", "--account", "3", "--to", "2"]).unwrap();
    let tx = transactions::get(&conn, 2).unwrap().unwrap();
    assert_eq!((tx.account_id, tx.to_account_id), (3, Some(2)));
}

#[test]
fn stats_and_balances_saturate_on_overflow() {
    let conn = setup();
    let huge: rust_decimal::Decimal = format!("5{}", "0".repeat(28)).parse().unwrap();
    for _ in 0..2 {
        transactions::create(&conn, deposit(1, huge)).unwrap();
    }
    let fx = Exchange::default();
    let s = transactions::stats(&conn, None, &fx, "USD").unwrap();
    assert_eq!(s.total_income, rust_decimal::Decimal::MAX);

    accounts::update_balance(&conn, 1, huge).unwrap();
    let tx = transactions::create(&conn, deposit(1, huge)).unwrap();
    transactions::apply_to_balances(&conn, &fx, &tx).unwrap();
    assert_eq!(
        accounts::get(&conn, 1).unwrap().unwrap().balance,
        rust_decimal::Decimal::MAX
    );
}

#[test]
fn create_and_apply_is_all_or_nothing() {
    let conn = setup();
    let fx = Exchange::default();
    let (tx, touched) = transactions::create_and_apply(&conn, &fx, deposit(1, dec!(10))).unwrap();
    assert_eq!(touched.len(), 1);
    assert_eq!(touched[0].balance, dec!(5430.50));
    assert_eq!(transactions::recent(&conn, 1).unwrap()[0].id, tx.id);

    walletfx::store::put_raw(&conn, walletfx::store::ACCOUNTS_KEY, "not json").unwrap();
    assert!(transactions::create_and_apply(&conn, &fx, deposit(1, dec!(10))).is_err());
    assert_eq!(transactions::list(&conn, None).unwrap().len(), 6);
}
