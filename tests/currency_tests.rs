// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use walletfx::currency::{add_saturating, parse_amount, CurrencyCatalog, Exchange, RateTable, RateTableError};

fn codes(fx: &Exchange) -> Vec<String> {
    fx.catalog().currencies().iter().map(|c| c.code.clone()).collect()
}

#[test]
fn formats_usd_with_grouping_and_sign() {
    let fx = Exchange::default();
    assert_eq!(fx.format(dec!(1234.5), "USD"), "$1,234.50");
    assert_eq!(fx.format(dec!(-1234.5), "USD"), "-$1,234.50");
    assert_eq!(fx.format(dec!(0), "USD"), "$0.00");
    assert_eq!(fx.format(dec!(1234567.891), "USD"), "$1,234,567.89");
    assert_eq!(fx.format(dec!(999.995), "USD"), "$1,000.00");
    assert_eq!(fx.format(dec!(12.5), "GBP"), "£12.50");
    assert_eq!(fx.format(dec!(12.5), "CAD"), "C$12.50");
}

#[test]
fn formats_jpy_without_decimals() {
    let fx = Exchange::default();
    assert_eq!(fx.format(dec!(1234.5), "JPY"), "¥1,235");
    assert_eq!(fx.format(dec!(1234.4), "JPY"), "¥1,234");
    // digits come from the magnitude, the sign from the raw amount
    assert_eq!(fx.format(dec!(-1234.5), "JPY"), "-¥1,235");
}

#[test]
fn formats_eur_with_trailing_symbol() {
    let fx = Exchange::default();
    assert_eq!(fx.format(dec!(1234.5), "EUR"), "1,234.50 €");
    assert_eq!(fx.format(dec!(-0.5), "EUR"), "-0.50 €");
}

#[test]
fn unknown_code_is_its_own_symbol() {
    let fx = Exchange::default();
    assert_eq!(fx.format(dec!(1234.5), "XYZ"), "XYZ1,234.50");
    assert_eq!(fx.catalog().symbol_of("XYZ"), "XYZ");
    assert_eq!(fx.catalog().name_of("XYZ"), "XYZ");
}

#[test]
fn catalog_lookups_are_exact() {
    let catalog = CurrencyCatalog::default();
    assert_eq!(catalog.currencies().len(), 10);
    assert_eq!(catalog.symbol_of("NZD"), "NZ$");
    assert_eq!(catalog.name_of("SEK"), "Swedish Krona");
    assert!(catalog.is_supported("CHF"));
    assert!(!catalog.is_supported("chf"));
    assert!(!catalog.is_supported("XYZ"));
}

#[test]
fn convert_uses_reference_hop() {
    let fx = Exchange::default();
    assert_eq!(fx.convert(dec!(100), "USD", "EUR"), dec!(91));
    assert_eq!(fx.convert(dec!(80), "GBP", "USD"), dec!(100));
    // unknown codes sit at parity with the reference currency
    assert_eq!(fx.convert(dec!(10), "XYZ", "EUR"), dec!(9.1));
    assert_eq!(fx.convert(dec!(10), "USD", "XYZ"), dec!(10));
}

#[test]
fn convert_to_same_currency_is_identity() {
    let fx = Exchange::default();
    let amounts = [dec!(0), dec!(1), dec!(-42.42), dec!(0.0000001), dec!(123456789.123)];
    let mut all = codes(&fx);
    all.push("XYZ".into());
    for code in &all {
        for amount in amounts {
            assert_eq!(fx.convert(amount, code, code), amount);
        }
    }
}

#[test]
fn exchange_rate_matches_unit_conversion() {
    let fx = Exchange::default();
    let all = codes(&fx);
    for a in &all {
        for b in &all {
            assert_eq!(fx.exchange_rate(a, b), fx.convert(Decimal::ONE, a, b), "{a}->{b}");
        }
    }
    assert_eq!(fx.exchange_rate("EUR", "EUR"), Decimal::ONE);
}

#[test]
fn exchange_rates_are_reciprocal() {
    let fx = Exchange::default();
    let all = codes(&fx);
    let tolerance = dec!(0.000000000001);
    for a in &all {
        for b in &all {
            let product = fx.exchange_rate(a, b) * fx.exchange_rate(b, a);
            assert!((product - Decimal::ONE).abs() < tolerance, "{a}<->{b}: {product}");
        }
    }
}

#[test]
fn exchange_preview_is_consistent_with_parts() {
    let fx = Exchange::default();
    let res = fx.calculate_exchange_amount(dec!(250), "USD", "JPY");
    assert_eq!(res.original_amount, dec!(250));
    assert_eq!(res.converted_amount, fx.convert(dec!(250), "USD", "JPY"));
    assert_eq!(res.rate, fx.exchange_rate("USD", "JPY"));
    assert_eq!(res.from_currency, "USD");
    assert_eq!(res.to_currency, "JPY");
    assert_eq!(res.formatted_original, "$250.00");
    assert_eq!(res.formatted_converted, "¥37,375");
    assert_eq!(res.formatted_rate, "1 USD = 149.5000 JPY");

    for (amount, from, to) in [(dec!(-12.5), "GBP", "EUR"), (dec!(1000000), "SEK", "NZD")] {
        let res = fx.calculate_exchange_amount(amount, from, to);
        assert_eq!(res.converted_amount, fx.convert(amount, from, to));
        assert_eq!(res.formatted_converted, fx.format(res.converted_amount, to));
    }
}

#[test]
fn rate_sentence_rounds_to_four_places() {
    let fx = Exchange::default();
    assert_eq!(fx.format_exchange_rate("USD", "EUR", None), "1 USD = 0.9100 EUR");
    assert_eq!(fx.format_exchange_rate("JPY", "USD", None), "1 JPY = 0.0067 USD");
    assert_eq!(
        fx.format_exchange_rate("USD", "EUR", Some(dec!(2))),
        "1 USD = 2.0000 EUR"
    );
}

#[test]
fn parses_loose_amount_text() {
    assert_eq!(parse_amount("$1,234.50"), dec!(1234.50));
    assert_eq!(parse_amount("-€ 12"), dec!(-12));
    assert_eq!(parse_amount("abc"), Decimal::ZERO);
    assert_eq!(parse_amount("-"), Decimal::ZERO);
    assert_eq!(parse_amount(".5"), dec!(0.5));
    let fx = Exchange::default();
    assert_eq!(fx.format_input("1,200.5", "EUR"), "1,200.50 €");
}

#[test]
fn parse_amount_reads_longest_numeric_prefix() {
    assert_eq!(parse_amount("1.2.3"), dec!(1.2));
    assert_eq!(parse_amount("$1,234.50 - $20"), dec!(1234.5));
    assert_eq!(parse_amount("12-"), dec!(12));
    assert_eq!(parse_amount("--3"), Decimal::ZERO);
}

#[test]
fn parse_amount_saturates_past_decimal_range() {
    let thirty = "9".repeat(30);
    assert_eq!(parse_amount(&thirty), Decimal::MAX);
    assert_eq!(parse_amount(&format!("-{}", thirty)), Decimal::MIN);
    // a 29-digit value that still fits is kept exactly
    let fits = format!("1{}", "0".repeat(28));
    assert_eq!(parse_amount(&fits), fits.parse::<Decimal>().unwrap());
    // surplus fractional digits are dropped rather than zeroing the value
    let long_frac = format!("1.{}", "1".repeat(40));
    assert!(parse_amount(&long_frac) > dec!(1.1));
}

#[test]
fn add_saturating_clamps_instead_of_panicking() {
    assert_eq!(add_saturating(Decimal::MAX, Decimal::MAX), Decimal::MAX);
    assert_eq!(add_saturating(Decimal::MIN, dec!(-1)), Decimal::MIN);
    assert_eq!(add_saturating(Decimal::MAX, dec!(-1)), Decimal::MAX - dec!(1));
    assert_eq!(add_saturating(dec!(2), dec!(3)), dec!(5));
}

#[test]
fn substitute_rate_table() {
    let table = RateTable::from_json(r#"{"reference":"USD","rates":{"USD":"1","EUR":"0.5"}}"#)
        .unwrap();
    let fx = Exchange::new(CurrencyCatalog::default(), table);
    assert_eq!(fx.convert(dec!(10), "USD", "EUR"), dec!(5));
    // GBP is absent from this table, so it falls back to parity
    assert_eq!(fx.convert(dec!(10), "GBP", "USD"), dec!(10));

    let parity = RateTable::new("USD", BTreeMap::new()).unwrap();
    let fx = Exchange::new(CurrencyCatalog::default(), parity);
    assert_eq!(fx.exchange_rate("JPY", "EUR"), Decimal::ONE);
}

#[test]
fn rejects_non_positive_rates() {
    let err = RateTable::from_json(r#"{"reference":"USD","rates":{"EUR":"0"}}"#).unwrap_err();
    assert!(matches!(err, RateTableError::NonPositive { ref code, .. } if code == "EUR"));
    let err = RateTable::from_json("{").unwrap_err();
    assert!(matches!(err, RateTableError::Json(_)));
}
