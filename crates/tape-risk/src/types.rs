use tape_events::{Order, Side};

/// Admission-control configuration (thresholds + sizing policy).
///
/// Fractions are micros-scaled: 1_000_000 = 1.0. A threshold of 0
/// disables that gate; the cash-availability check is always on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiskConfig {
    /// Every approved order carries exactly this quantity.
    pub fixed_qty: i64,

    /// Reject new intents when (peak - equity) / peak exceeds this
    /// fraction (micros). 0 = disabled.
    pub max_drawdown_micros: i64,

    /// Absolute cap on order value (qty * reference price), in micros.
    /// 0 = disabled.
    pub max_order_value_micros: i64,

    /// Cap on order value as a fraction of current equity (micros).
    /// 0 = disabled.
    pub max_position_fraction_micros: i64,

    /// Cap on prospective gross exposure (existing + this order) as a
    /// fraction of current equity (micros). 0 = disabled.
    pub max_total_exposure_fraction_micros: i64,

    /// Maximum number of simultaneously open positions; checked only
    /// when a Buy would open a new symbol. None = unlimited.
    pub max_open_positions: Option<usize>,
}

impl RiskConfig {
    /// Pass-through sizing policy: fixed quantity, every gate disabled.
    pub fn sane_defaults() -> Self {
        Self {
            fixed_qty: 10,
            max_drawdown_micros: 0,
            max_order_value_micros: 0,
            max_position_fraction_micros: 0,
            max_total_exposure_fraction_micros: 0,
            max_open_positions: None,
        }
    }
}

/// Which gate rejected an intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckKind {
    Drawdown,
    PositionSize,
    Cash,
    PositionCount,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::Drawdown => "drawdown",
            CheckKind::PositionSize => "position_size",
            CheckKind::Cash => "cash",
            CheckKind::PositionCount => "position_count",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded rejection: an expected outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub logical_time: i64,
    pub symbol: String,
    pub side: Side,
    pub check: CheckKind,
    pub reason: String,
}

/// Result of evaluating one intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// The intent passed every gate and became a sized order.
    Approved(Order),
    /// A gate fired; no order is produced and the run continues.
    Rejected(Rejection),
}

/// Fatal admission-control failures (distinct from rejections).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RiskError {
    /// A symbol referenced by the intent, or held in the portfolio, has
    /// no latest price. Valuing it at zero would corrupt equity and
    /// drawdown arithmetic, so the run fails fast instead.
    MissingLatestPrice { logical_time: i64, symbol: String },
}

impl std::fmt::Display for RiskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskError::MissingLatestPrice {
                logical_time,
                symbol,
            } => write!(
                f,
                "no latest price for {} at logical_time {}: refusing to value it at zero",
                symbol, logical_time
            ),
        }
    }
}

impl std::error::Error for RiskError {}
