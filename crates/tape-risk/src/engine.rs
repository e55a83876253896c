//! The admission gate pipeline.
//!
//! Check order is fixed and short-circuits on the first failure:
//!
//! 1. drawdown (vs the ledger's running equity peak)
//! 2. position sizing (absolute cap, equity fraction, gross exposure)
//! 3. cash availability (Buy intents)
//! 4. position count (Buy intents opening a new symbol)

use std::collections::BTreeMap;

use tape_events::{Intent, Order, Side, MICROS_SCALE};
use tape_ledger::Ledger;

use crate::types::{AdmissionOutcome, CheckKind, Rejection, RiskConfig, RiskError};

fn i128_to_i64_clamp(x: i128) -> i64 {
    if x > i64::MAX as i128 {
        i64::MAX
    } else if x < i64::MIN as i128 {
        i64::MIN
    } else {
        x as i64
    }
}

/// Evaluates intents against the policy set and records rejections.
pub struct AdmissionController {
    config: RiskConfig,
    rejections: Vec<Rejection>,
}

impl AdmissionController {
    pub fn new(config: RiskConfig) -> Self {
        debug_assert!(config.fixed_qty > 0, "fixed_qty must be > 0");
        Self {
            config,
            rejections: Vec::new(),
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// All rejections recorded so far, in evaluation order.
    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Rejection totals keyed by check name.
    pub fn rejection_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.rejections {
            *counts.entry(r.check.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Run the gate pipeline for one intent.
    ///
    /// Reads ledger state as of the most recent observation/fill already
    /// applied — current for this tick because the scheduler dispatches
    /// Observations before Intents at equal logical_time.
    ///
    /// # Errors
    /// [`RiskError::MissingLatestPrice`] when the intent's symbol, or
    /// any held symbol, has no mark (fatal; never valued at zero).
    pub fn evaluate(
        &mut self,
        intent: &Intent,
        ledger: &Ledger,
    ) -> Result<AdmissionOutcome, RiskError> {
        // Fail fast: an intent for a never-observed symbol is a pipeline
        // or data bug, not a rejectable business outcome.
        if ledger.mark(&intent.symbol).is_none() {
            return Err(RiskError::MissingLatestPrice {
                logical_time: intent.logical_time,
                symbol: intent.symbol.clone(),
            });
        }

        let equity = ledger.equity_micros();
        let peak = ledger.peak_equity_micros();

        // 1) Drawdown: fractional decline from the running peak.
        if self.config.max_drawdown_micros > 0 && peak > 0 {
            let drawdown_micros = i128_to_i64_clamp(
                (peak as i128 - equity as i128) * MICROS_SCALE as i128 / peak as i128,
            );
            if drawdown_micros > self.config.max_drawdown_micros {
                return Ok(self.reject(
                    intent,
                    CheckKind::Drawdown,
                    format!(
                        "drawdown {} micros exceeds limit {} micros (peak {}, equity {})",
                        drawdown_micros, self.config.max_drawdown_micros, peak, equity
                    ),
                ));
            }
        }

        let order_value = i128_to_i64_clamp(
            self.config.fixed_qty as i128 * intent.reference_price_micros as i128,
        );

        // 2) Position sizing: absolute cap, equity fraction, exposure.
        if self.config.max_order_value_micros > 0 && order_value > self.config.max_order_value_micros
        {
            return Ok(self.reject(
                intent,
                CheckKind::PositionSize,
                format!(
                    "order value {} exceeds absolute cap {}",
                    order_value, self.config.max_order_value_micros
                ),
            ));
        }

        if self.config.max_position_fraction_micros > 0 {
            // order_value > fraction * equity, compared without division
            let lhs = order_value as i128 * MICROS_SCALE as i128;
            let rhs = self.config.max_position_fraction_micros as i128 * equity as i128;
            if lhs > rhs {
                return Ok(self.reject(
                    intent,
                    CheckKind::PositionSize,
                    format!(
                        "order value {} exceeds {} micros-fraction of equity {}",
                        order_value, self.config.max_position_fraction_micros, equity
                    ),
                ));
            }
        }

        if self.config.max_total_exposure_fraction_micros > 0 {
            let gross = self.gross_exposure_micros(intent.logical_time, ledger)?;
            let prospective = gross as i128 + order_value as i128;
            let lhs = prospective * MICROS_SCALE as i128;
            let rhs = self.config.max_total_exposure_fraction_micros as i128 * equity as i128;
            if lhs > rhs {
                return Ok(self.reject(
                    intent,
                    CheckKind::PositionSize,
                    format!(
                        "prospective exposure {} exceeds {} micros-fraction of equity {}",
                        prospective, self.config.max_total_exposure_fraction_micros, equity
                    ),
                ));
            }
        }

        // 3) Cash availability (Buy only; always on).
        if intent.side == Side::Buy && order_value > ledger.cash_micros() {
            return Ok(self.reject(
                intent,
                CheckKind::Cash,
                format!(
                    "order value {} exceeds available cash {}",
                    order_value,
                    ledger.cash_micros()
                ),
            ));
        }

        // 4) Position count (Buy opening a new symbol).
        if intent.side == Side::Buy && ledger.qty_signed(&intent.symbol) == 0 {
            if let Some(max_open) = self.config.max_open_positions {
                if ledger.open_position_count() >= max_open {
                    return Ok(self.reject(
                        intent,
                        CheckKind::PositionCount,
                        format!(
                            "{} positions already open, limit is {}",
                            ledger.open_position_count(),
                            max_open
                        ),
                    ));
                }
            }
        }

        Ok(AdmissionOutcome::Approved(Order::new(
            intent.logical_time,
            intent.symbol.clone(),
            intent.side,
            self.config.fixed_qty,
            intent.reference_price_micros,
        )))
    }

    /// Gross exposure Σ|qty| × mark over open positions. A held symbol
    /// without a mark is unrepresentable state and fails fast.
    fn gross_exposure_micros(&self, logical_time: i64, ledger: &Ledger) -> Result<i64, RiskError> {
        let mut gross: i128 = 0;
        for (sym, pos) in ledger.positions() {
            let mark = ledger.mark(sym).ok_or_else(|| RiskError::MissingLatestPrice {
                logical_time,
                symbol: sym.clone(),
            })?;
            gross += pos.abs_qty() as i128 * mark as i128;
        }
        Ok(i128_to_i64_clamp(gross))
    }

    fn reject(&mut self, intent: &Intent, check: CheckKind, reason: String) -> AdmissionOutcome {
        let rejection = Rejection {
            logical_time: intent.logical_time,
            symbol: intent.symbol.clone(),
            side: intent.side,
            check,
            reason,
        };
        self.rejections.push(rejection.clone());
        AdmissionOutcome::Rejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_events::{Fill, Observation};

    const M: i64 = MICROS_SCALE;

    fn observed(ledger: &mut Ledger, t: i64, symbol: &str, price: i64) {
        ledger.handle_observation(&Observation::new(t, symbol, price * M));
    }

    fn filled(ledger: &mut Ledger, t: i64, symbol: &str, side: Side, qty: i64, price: i64) {
        ledger
            .apply_fill(&Fill::new(t, symbol, side, qty, price * M))
            .unwrap();
    }

    fn intent(t: i64, symbol: &str, side: Side, price: i64) -> Intent {
        Intent::new(t, symbol, side, price * M)
    }

    #[test]
    fn pass_through_defaults_approve_with_fixed_qty() {
        let mut ledger = Ledger::new(10_000 * M);
        observed(&mut ledger, 1, "AAPL", 100);

        let mut ac = AdmissionController::new(RiskConfig::sane_defaults());
        let out = ac.evaluate(&intent(1, "AAPL", Side::Buy, 100), &ledger).unwrap();

        match out {
            AdmissionOutcome::Approved(order) => {
                assert_eq!(order.qty, 10);
                assert_eq!(order.reference_price_micros, 100 * M);
                assert_eq!(order.logical_time, 1);
            }
            AdmissionOutcome::Rejected(r) => panic!("unexpected rejection: {:?}", r),
        }
        assert!(ac.rejections().is_empty());
    }

    #[test]
    fn never_observed_symbol_is_fatal() {
        let ledger = Ledger::new(10_000 * M);
        let mut ac = AdmissionController::new(RiskConfig::sane_defaults());

        let err = ac
            .evaluate(&intent(4, "GHOST", Side::Buy, 100), &ledger)
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::MissingLatestPrice {
                logical_time: 4,
                symbol: "GHOST".to_string(),
            }
        );
    }

    #[test]
    fn drawdown_gate_fires_after_crash() {
        // Equity peaks at 10_500 then crashes below 8_900 (> 15% off
        // peak); the next intent must be rejected by the drawdown check.
        let mut ledger = Ledger::new(10_000 * M);
        observed(&mut ledger, 1, "MSFT", 100);
        filled(&mut ledger, 1, "MSFT", Side::Buy, 50, 100); // cash 5_000
        observed(&mut ledger, 2, "MSFT", 110); // equity 10_500, peak
        observed(&mut ledger, 3, "MSFT", 39); // equity 6_950

        let mut config = RiskConfig::sane_defaults();
        config.max_drawdown_micros = 150_000; // 15%
        let mut ac = AdmissionController::new(config);

        let out = ac.evaluate(&intent(3, "MSFT", Side::Buy, 39), &ledger).unwrap();
        match out {
            AdmissionOutcome::Rejected(r) => {
                assert_eq!(r.check, CheckKind::Drawdown);
                assert_eq!(r.check.as_str(), "drawdown");
                assert_eq!(r.logical_time, 3);
            }
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }
        assert_eq!(ac.rejection_counts().get("drawdown"), Some(&1));
    }

    #[test]
    fn drawdown_within_limit_passes_through() {
        let mut ledger = Ledger::new(10_000 * M);
        observed(&mut ledger, 1, "MSFT", 100);
        filled(&mut ledger, 1, "MSFT", Side::Buy, 50, 100);
        observed(&mut ledger, 2, "MSFT", 110); // peak 10_500
        observed(&mut ledger, 3, "MSFT", 105); // equity 10_250, dd ~2.4%

        let mut config = RiskConfig::sane_defaults();
        config.max_drawdown_micros = 150_000;
        let mut ac = AdmissionController::new(config);

        let out = ac.evaluate(&intent(3, "MSFT", Side::Sell, 105), &ledger).unwrap();
        assert!(matches!(out, AdmissionOutcome::Approved(_)));
    }

    #[test]
    fn cash_gate_rejects_before_any_fill_is_attempted() {
        // 500 cash, quantity 10, price 100: order value 1_000.
        let mut ledger = Ledger::new(500 * M);
        observed(&mut ledger, 1, "EXPENSIVE", 100);

        let mut ac = AdmissionController::new(RiskConfig::sane_defaults());
        let out = ac
            .evaluate(&intent(1, "EXPENSIVE", Side::Buy, 100), &ledger)
            .unwrap();

        match out {
            AdmissionOutcome::Rejected(r) => {
                assert_eq!(r.check, CheckKind::Cash);
                assert_eq!(r.check.as_str(), "cash");
            }
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }
        // nothing reached the ledger
        assert!(ledger.fills().is_empty());
    }

    #[test]
    fn cash_gate_ignores_sells() {
        let mut ledger = Ledger::new(0);
        // Can't buy with zero cash... but selling is a cash inflow.
        observed(&mut ledger, 1, "AAPL", 100);

        let mut ac = AdmissionController::new(RiskConfig::sane_defaults());
        let out = ac.evaluate(&intent(1, "AAPL", Side::Sell, 100), &ledger).unwrap();
        assert!(matches!(out, AdmissionOutcome::Approved(_)));
    }

    #[test]
    fn absolute_order_value_cap() {
        let mut ledger = Ledger::new(100_000 * M);
        observed(&mut ledger, 1, "AAPL", 500);

        let mut config = RiskConfig::sane_defaults();
        config.max_order_value_micros = 4_000 * M; // qty 10 * 500 = 5_000
        let mut ac = AdmissionController::new(config);

        let out = ac.evaluate(&intent(1, "AAPL", Side::Buy, 500), &ledger).unwrap();
        match out {
            AdmissionOutcome::Rejected(r) => assert_eq!(r.check, CheckKind::PositionSize),
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }
    }

    #[test]
    fn position_fraction_of_equity_cap() {
        // Equity 10_000, order value 10*100 = 1_000 = 10%; cap at 5%.
        let mut ledger = Ledger::new(10_000 * M);
        observed(&mut ledger, 1, "AAPL", 100);

        let mut config = RiskConfig::sane_defaults();
        config.max_position_fraction_micros = 50_000; // 5%
        let mut ac = AdmissionController::new(config);

        let out = ac.evaluate(&intent(1, "AAPL", Side::Buy, 100), &ledger).unwrap();
        match out {
            AdmissionOutcome::Rejected(r) => {
                assert_eq!(r.check, CheckKind::PositionSize);
                assert_eq!(r.check.as_str(), "position_size");
            }
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }
    }

    #[test]
    fn total_exposure_gate_counts_existing_positions() {
        // Equity 10_000; held exposure 50*100 = 5_000; prospective
        // order adds 1_000 => 6_000 > 50% of equity.
        let mut ledger = Ledger::new(10_000 * M);
        observed(&mut ledger, 1, "A", 100);
        observed(&mut ledger, 1, "B", 100);
        filled(&mut ledger, 1, "A", Side::Buy, 50, 100);

        let mut config = RiskConfig::sane_defaults();
        config.max_total_exposure_fraction_micros = 500_000; // 50%
        let mut ac = AdmissionController::new(config);

        let out = ac.evaluate(&intent(2, "B", Side::Buy, 100), &ledger).unwrap();
        match out {
            AdmissionOutcome::Rejected(r) => assert_eq!(r.check, CheckKind::PositionSize),
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }
    }

    #[test]
    fn position_count_gate_blocks_new_symbols_only() {
        let mut ledger = Ledger::new(100_000 * M);
        observed(&mut ledger, 1, "A", 100);
        observed(&mut ledger, 1, "B", 100);
        filled(&mut ledger, 1, "A", Side::Buy, 10, 100);

        let mut config = RiskConfig::sane_defaults();
        config.max_open_positions = Some(1);
        let mut ac = AdmissionController::new(config);

        // Opening a second symbol is blocked.
        let out = ac.evaluate(&intent(2, "B", Side::Buy, 100), &ledger).unwrap();
        match out {
            AdmissionOutcome::Rejected(r) => {
                assert_eq!(r.check, CheckKind::PositionCount);
                assert_eq!(r.check.as_str(), "position_count");
            }
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }

        // Extending the already-open symbol is not.
        let out = ac.evaluate(&intent(3, "A", Side::Buy, 100), &ledger).unwrap();
        assert!(matches!(out, AdmissionOutcome::Approved(_)));
    }

    #[test]
    fn checks_short_circuit_in_declared_order() {
        // Both the drawdown gate and the cash gate would fire; only the
        // earlier (drawdown) is recorded.
        let mut ledger = Ledger::new(10_000 * M);
        observed(&mut ledger, 1, "MSFT", 100);
        filled(&mut ledger, 1, "MSFT", Side::Buy, 90, 100); // cash 1_000
        observed(&mut ledger, 2, "MSFT", 110); // peak 10_900
        observed(&mut ledger, 3, "MSFT", 20); // equity 2_800, dd ~74%

        let mut config = RiskConfig::sane_defaults();
        config.max_drawdown_micros = 150_000;
        config.fixed_qty = 200; // order value 4_000 > cash 1_000 too
        let mut ac = AdmissionController::new(config);

        let out = ac.evaluate(&intent(3, "MSFT", Side::Buy, 20), &ledger).unwrap();
        match out {
            AdmissionOutcome::Rejected(r) => assert_eq!(r.check, CheckKind::Drawdown),
            AdmissionOutcome::Approved(o) => panic!("unexpected approval: {:?}", o),
        }
        assert_eq!(ac.rejections().len(), 1);
    }

    #[test]
    fn rejection_log_accumulates_counts() {
        let mut ledger = Ledger::new(500 * M);
        observed(&mut ledger, 1, "A", 100);

        let mut ac = AdmissionController::new(RiskConfig::sane_defaults());
        for t in 1..=3 {
            let out = ac.evaluate(&intent(t, "A", Side::Buy, 100), &ledger).unwrap();
            assert!(matches!(out, AdmissionOutcome::Rejected(_)));
        }
        assert_eq!(ac.rejections().len(), 3);
        assert_eq!(ac.rejection_counts().get("cash"), Some(&3));
    }
}
