pub mod demo;
pub mod run;

use tape_engine::RunReport;
use tape_events::MICROS_SCALE;
use tape_report::{EquityAnalyzer, TradeMetrics};

/// Render micros as a decimal string for terminal output.
fn fmt_micros(micros: i64) -> String {
    format!("{:.2}", micros as f64 / MICROS_SCALE as f64)
}

/// Print the post-run report: trade history, final state, metrics.
pub(crate) fn print_report(report: &RunReport) {
    println!("\n--- TRADE HISTORY ---");
    if report.fills.is_empty() {
        println!("(no trades)");
    }
    for fill in &report.fills {
        println!(
            "t={} | {} {} {} @ {}",
            fill.logical_time,
            fill.side,
            fill.qty,
            fill.symbol,
            fmt_micros(fill.fill_price_micros)
        );
    }

    println!("\n--- FINAL PORTFOLIO STATE ---");
    println!("Cash: {}", fmt_micros(report.final_cash_micros));
    if report.positions.is_empty() {
        println!("Positions: (flat)");
    } else {
        for (symbol, pos) in &report.positions {
            println!(
                "Position: {} qty={} avg_cost={}",
                symbol,
                pos.qty_signed,
                fmt_micros(pos.avg_cost_micros)
            );
        }
    }
    println!("Realized PnL: {}", fmt_micros(report.realized_pnl_micros));
    println!("Equity: {}", fmt_micros(report.final_equity_micros));

    if !report.rejections.is_empty() {
        println!("\n--- REJECTIONS ---");
        for (check, count) in report.rejection_counts() {
            println!("{}: {}", check, count);
        }
    }

    if let Some(totals) = &report.cost_totals {
        println!("\n--- EXECUTION COSTS ---");
        println!("Spread cost: {}", fmt_micros(totals.spread_cost_micros));
        println!("Slippage cost: {}", fmt_micros(totals.slippage_cost_micros));
    }

    let metrics = TradeMetrics::from_fills(
        &report.fills,
        report.initial_cash_micros,
        report.final_equity_micros,
    );
    let equity_samples = report.equity_curve.iter().copied().collect();
    let drawdown = EquityAnalyzer::from_samples(&equity_samples);

    println!("\n--- PERFORMANCE METRICS ---");
    println!("Initial capital: {}", fmt_micros(report.initial_cash_micros));
    println!(
        "Total return: {} ({:.2}%)",
        fmt_micros(metrics.total_return_micros()),
        metrics.total_return_fraction_micros() as f64 / 10_000.0
    );
    println!("Trades: {}", metrics.num_trades());
    println!("Win rate: {:.1}%", metrics.win_rate() * 100.0);
    println!(
        "Avg PnL per trade: {}",
        fmt_micros(metrics.avg_pnl_per_trade_micros())
    );
    println!(
        "Max drawdown: {:.2}%",
        drawdown.max_drawdown_micros() as f64 / 10_000.0
    );
    println!("Peak equity: {}", fmt_micros(drawdown.peak_equity_micros()));
}
