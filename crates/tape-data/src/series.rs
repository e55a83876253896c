//! In-memory observation series for tests, demos and quick drivers.

use tape_events::{Observation, MICROS_SCALE};

/// Build a tape from per-symbol price lists (prices in micros).
///
/// Ticks are assigned sequentially across the whole input: the first
/// symbol's prices occupy ticks 0..n, the next symbol continues from
/// there. Interleaving choice is irrelevant to correctness — the
/// scheduler re-establishes global order.
pub fn series<I, S>(items: I) -> Vec<Observation>
where
    I: IntoIterator<Item = (S, Vec<i64>)>,
    S: Into<String>,
{
    let mut out = Vec::new();
    let mut tick: i64 = 0;
    for (symbol, prices) in items {
        let symbol = symbol.into();
        for price_micros in prices {
            out.push(Observation::new(tick, symbol.clone(), price_micros));
            tick += 1;
        }
    }
    out
}

/// Single-symbol tape with one observation per tick (prices in micros).
pub fn single_symbol<S: Into<String>>(symbol: S, prices_micros: &[i64]) -> Vec<Observation> {
    let symbol = symbol.into();
    prices_micros
        .iter()
        .enumerate()
        .map(|(t, p)| Observation::new(t as i64, symbol.clone(), *p))
        .collect()
}

/// The built-in demo tape: a single symbol oscillating around 100,
/// enough movement for the mean-reversion demo to trade.
pub fn demo_tape() -> Vec<Observation> {
    const PRICES: [i64; 12] = [100, 101, 102, 99, 95, 97, 100, 103, 98, 94, 96, 101];
    let prices_micros: Vec<i64> = PRICES.iter().map(|p| p * MICROS_SCALE).collect();
    single_symbol("AAPL", &prices_micros)
}
