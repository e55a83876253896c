//! Accounting invariants over whole fill sequences:
//! cash never goes negative, flat positions are removed, and a
//! buy-then-sell round trip settles to the exact arithmetic result.

use tape_events::{Fill, Observation, Side, MICROS_SCALE};
use tape_ledger::{Ledger, LedgerError};

const M: i64 = MICROS_SCALE;

fn fill(t: i64, symbol: &str, side: Side, qty: i64, price: i64) -> Fill {
    Fill::new(t, symbol, side, qty, price * M)
}

#[test]
fn round_trip_pnl_is_exact() {
    // Buy N @ P then Sell N @ P': realized = N*(P'-P), cash returns to
    // initial + N*(P'-P), position removed.
    let n = 25;
    let p = 40;
    let p2 = 55;

    let mut l = Ledger::new(10_000 * M);
    l.apply_fill(&fill(1, "TSLA", Side::Buy, n, p)).unwrap();
    l.apply_fill(&fill(2, "TSLA", Side::Sell, n, p2)).unwrap();

    assert_eq!(l.realized_pnl_micros(), n * (p2 - p) * M);
    assert_eq!(l.cash_micros(), 10_000 * M + n * (p2 - p) * M);
    assert!(l.is_flat());
}

#[test]
fn cash_stays_non_negative_across_accepted_sequences() {
    let mut l = Ledger::new(2_000 * M);
    let sequence = [
        fill(1, "A", Side::Buy, 10, 100),  // cash 1_000
        fill(2, "A", Side::Sell, 5, 120),  // cash 1_600
        fill(3, "B", Side::Buy, 15, 100),  // cash 100
        fill(4, "A", Side::Sell, 5, 90),   // cash 550
        fill(5, "B", Side::Sell, 15, 110), // cash 2_200
    ];

    for f in &sequence {
        l.apply_fill(f).unwrap();
        assert!(l.cash_micros() >= 0, "cash went negative after {:?}", f);
    }
    assert_eq!(l.cash_micros(), 2_200 * M);
}

#[test]
fn rejected_fill_leaves_every_later_fill_consistent() {
    let mut l = Ledger::new(1_000 * M);
    l.apply_fill(&fill(1, "A", Side::Buy, 5, 100)).unwrap(); // cash 500

    // Too big: would need 1_000 with 500 available.
    let err = l.apply_fill(&fill(2, "A", Side::Buy, 10, 100)).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientCash { .. }));

    // The ledger still accepts a correctly sized follow-up.
    l.apply_fill(&fill(3, "A", Side::Buy, 5, 100)).unwrap();
    assert_eq!(l.cash_micros(), 0);
    assert_eq!(l.qty_signed("A"), 10);
    assert_eq!(l.fills().len(), 2);
}

#[test]
fn positions_never_linger_at_zero_quantity() {
    let mut l = Ledger::new(50_000 * M);

    // Interleave opens and full closes across symbols.
    l.apply_fill(&fill(1, "A", Side::Buy, 10, 100)).unwrap();
    l.apply_fill(&fill(2, "B", Side::Sell, 5, 200)).unwrap();
    l.apply_fill(&fill(3, "A", Side::Sell, 10, 105)).unwrap();
    l.apply_fill(&fill(4, "B", Side::Buy, 5, 190)).unwrap();

    assert!(l.is_flat());
    for (sym, pos) in l.positions() {
        panic!("unexpected residual position {} {:?}", sym, pos);
    }
}

#[test]
fn analysis_contract_one_sample_per_applied_tick() {
    let mut l = Ledger::new(10_000 * M);

    l.handle_observation(&Observation::new(1, "A", 100 * M));
    l.handle_observation(&Observation::new(2, "A", 101 * M));
    l.apply_fill(&fill(2, "A", Side::Buy, 10, 101)).unwrap();
    l.handle_observation(&Observation::new(3, "A", 103 * M));

    let keys: Vec<i64> = l.equity_samples().keys().copied().collect();
    assert_eq!(keys, vec![1, 2, 3]);

    // t=3 equity: cash 8_990 + 10*103
    assert_eq!(l.equity_samples().get(&3), Some(&(10_020 * M)));
}
