use std::cmp::Ordering;
use std::collections::BTreeMap;

use colored::Colorize;

use crate::schema::{PriceField, PriceQuote};

// ------------------------------------------------------------
// Report rendering
// ------------------------------------------------------------
//
// Turns one cycle's snapshot into the operator-facing arbitrage
// report. The reporter runs twice per cycle against the same
// snapshot, once per price field, and must not mutate it.
//
// Output structure:
// - White banner header naming the field
// - Cyan label per distinct pair
// - Yellow data rows, one exchange per line, sorted ascending
//   by the selected field
//
// DETERMINISM:
// - Pairs are grouped in a BTreeMap, so pair iteration order is
//   lexicographic and identical across the two calls of a cycle
//   (and across cycles)
// - Equal prices are tie-broken by exchange identifier, since
//   snapshot collection order depends on network completion
//   order and must not leak into the output
//

/// Renders the report for one price field.
///
/// Pure function over the snapshot: byte-identical output for
/// identical input. An empty snapshot renders the banner with no
/// pair sections.
pub fn render(snapshot: &[PriceQuote], field: PriceField) -> String {
    let mut groups: BTreeMap<&str, Vec<&PriceQuote>> = BTreeMap::new();
    for quote in snapshot {
        groups.entry(&quote.pair).or_default().push(quote);
    }

    let mut out = String::new();
    let banner = format!("{} {} {}", "-".repeat(30), field.label(), "-".repeat(30));
    out.push_str(&format!("{}\n", banner.white()));

    for (pair, mut quotes) in groups {
        out.push_str(&format!(
            "{}\n",
            format!("{}: {}", field.label(), pair).cyan()
        ));

        quotes.sort_by(|a, b| {
            field
                .value(a)
                .partial_cmp(&field.value(b))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.exchange.cmp(&b.exchange))
        });

        for quote in quotes {
            out.push_str(&format!(
                "{}\n",
                format!(" {:<14} {}", quote.exchange, field.value(quote)).yellow()
            ));
        }
    }

    // Terminating separator line after the pair sections
    out.push('\n');

    out
}

/// Prints the report for one price field to stdout.
pub fn print_sorted(snapshot: &[PriceQuote], field: PriceField) {
    print!("{}", render(snapshot, field));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(exchange: &str, pair: &str, ask: f64, bid: f64) -> PriceQuote {
        PriceQuote {
            exchange: exchange.to_string(),
            pair: pair.to_string(),
            ask,
            bid,
        }
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn two_exchanges_sort_by_selected_field() {
        plain();
        // A asks 10 / bids 9, B asks 8 / bids 7: B must print first
        // on both sides.
        let snapshot = vec![
            quote("exchange-a", "X/Y", 10.0, 9.0),
            quote("exchange-b", "X/Y", 8.0, 7.0),
        ];

        let ask = render(&snapshot, PriceField::Ask);
        let a_pos = ask.find("exchange-a").unwrap();
        let b_pos = ask.find("exchange-b").unwrap();
        assert!(b_pos < a_pos, "cheaper ask must print first:\n{ask}");
        assert!(ask.contains("ASK: X/Y"));
        assert!(ask.contains(" exchange-b     8"));
        assert!(ask.contains(" exchange-a     10"));

        let bid = render(&snapshot, PriceField::Bid);
        assert!(bid.find("exchange-b").unwrap() < bid.find("exchange-a").unwrap());
        assert!(bid.contains(" exchange-b     7"));
        assert!(bid.contains(" exchange-a     9"));
    }

    #[test]
    fn equal_prices_tie_break_on_exchange_name() {
        plain();
        let snapshot = vec![
            quote("zeta", "X/Y", 5.0, 4.0),
            quote("alpha", "X/Y", 5.0, 4.0),
            quote("mid", "X/Y", 5.0, 4.0),
        ];

        let out = render(&snapshot, PriceField::Ask);
        let alpha = out.find("alpha").unwrap();
        let mid = out.find("mid").unwrap();
        let zeta = out.find("zeta").unwrap();
        assert!(alpha < mid && mid < zeta, "tie-break order wrong:\n{out}");
    }

    #[test]
    fn rendering_is_deterministic() {
        plain();
        let snapshot = vec![
            quote("kraken", "ETH/BTC", 0.052, 0.051),
            quote("okx", "BTC/USDT", 61000.0, 60990.0),
            quote("gateio", "ETH/BTC", 0.0519, 0.0518),
        ];

        assert_eq!(
            render(&snapshot, PriceField::Ask),
            render(&snapshot, PriceField::Ask)
        );
        assert_eq!(
            render(&snapshot, PriceField::Bid),
            render(&snapshot, PriceField::Bid)
        );
    }

    #[test]
    fn pair_sections_are_grouped_and_ordered() {
        plain();
        let snapshot = vec![
            quote("kraken", "ETH/BTC", 0.052, 0.051),
            quote("okx", "ADA/BTC", 0.000008, 0.0000079),
            quote("gateio", "ETH/BTC", 0.0519, 0.0518),
        ];

        let out = render(&snapshot, PriceField::Ask);
        let ada = out.find("ASK: ADA/BTC").unwrap();
        let eth = out.find("ASK: ETH/BTC").unwrap();
        assert!(ada < eth, "pairs must iterate lexicographically:\n{out}");

        // Both ETH/BTC rows live under the ETH/BTC label
        assert!(out.find("gateio").unwrap() > eth);
        assert!(out.find("kraken").unwrap() > eth);
    }

    #[test]
    fn empty_snapshot_renders_banner_only() {
        plain();
        let out = render(&[], PriceField::Bid);
        assert!(out.contains("BID"));
        assert!(out.contains("------"));
        // Banner plus the terminating separator line, nothing else
        assert_eq!(out.lines().count(), 2);
        assert_eq!(out.lines().nth(1), Some(""));
        assert!(!out.contains(':'));
    }

    #[test]
    fn report_ends_with_separator_line() {
        plain();
        let snapshot = vec![quote("kraken", "ETH/BTC", 0.052, 0.051)];
        let out = render(&snapshot, PriceField::Ask);
        assert!(out.ends_with("\n\n"), "missing terminating separator:\n{out:?}");
    }

    #[test]
    fn reporter_does_not_mutate_snapshot() {
        plain();
        let snapshot = vec![
            quote("zeta", "X/Y", 1.0, 0.9),
            quote("alpha", "X/Y", 2.0, 1.9),
        ];
        let before = snapshot.clone();
        let _ = render(&snapshot, PriceField::Ask);
        let _ = render(&snapshot, PriceField::Bid);
        assert_eq!(snapshot, before);
    }
}
