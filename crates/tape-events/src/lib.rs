//! tape-events
//!
//! Event vocabulary for the replay pipeline:
//! - Observation / Intent / Order / Fill value types (immutable facts)
//! - Side (BUY / SELL)
//! - The closed `Event` union with kind tags and dispatch precedence
//!
//! Everything here is pure data: no IO, no time, no randomness.
//! Prices and cash are i64 integer micros (1 unit = 1_000_000 micros);
//! logical time is an integer simulation tick, never wall-clock.

/// Price/cash scale: micros (1e-6).
pub const MICROS_SCALE: i64 = 1_000_000;

/// BUY or SELL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A new piece of market information: `symbol` traded at `price_micros`
/// at simulation tick `logical_time`. Produced by the data feed, never
/// by the pipeline itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub logical_time: i64,
    pub symbol: String,
    pub price_micros: i64,
}

impl Observation {
    pub fn new<S: Into<String>>(logical_time: i64, symbol: S, price_micros: i64) -> Self {
        debug_assert!(price_micros > 0, "Observation.price_micros must be > 0");
        Self {
            logical_time,
            symbol: symbol.into(),
            price_micros,
        }
    }
}

/// A desire to trade, not an order. Carries no quantity: sizing is a
/// policy decision owned by admission control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intent {
    pub logical_time: i64,
    pub symbol: String,
    pub side: Side,
    pub reference_price_micros: i64,
}

impl Intent {
    pub fn new<S: Into<String>>(
        logical_time: i64,
        symbol: S,
        side: Side,
        reference_price_micros: i64,
    ) -> Self {
        debug_assert!(
            reference_price_micros > 0,
            "Intent.reference_price_micros must be > 0"
        );
        Self {
            logical_time,
            symbol: symbol.into(),
            side,
            reference_price_micros,
        }
    }
}

/// An approved, sized trade request. qty is always positive; direction
/// lives in `side`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub logical_time: i64,
    pub symbol: String,
    pub side: Side,
    pub qty: i64,
    pub reference_price_micros: i64,
}

impl Order {
    pub fn new<S: Into<String>>(
        logical_time: i64,
        symbol: S,
        side: Side,
        qty: i64,
        reference_price_micros: i64,
    ) -> Self {
        debug_assert!(qty > 0, "Order.qty must be > 0");
        debug_assert!(
            reference_price_micros > 0,
            "Order.reference_price_micros must be > 0"
        );
        Self {
            logical_time,
            symbol: symbol.into(),
            side,
            qty,
            reference_price_micros,
        }
    }
}

/// An executed order. The only event type permitted to mutate the ledger.
/// Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fill {
    pub logical_time: i64,
    pub symbol: String,
    pub side: Side,
    pub qty: i64,
    pub fill_price_micros: i64,
}

impl Fill {
    pub fn new<S: Into<String>>(
        logical_time: i64,
        symbol: S,
        side: Side,
        qty: i64,
        fill_price_micros: i64,
    ) -> Self {
        debug_assert!(qty > 0, "Fill.qty must be > 0");
        debug_assert!(fill_price_micros >= 0, "Fill.fill_price_micros must be >= 0");
        Self {
            logical_time,
            symbol: symbol.into(),
            side,
            qty,
            fill_price_micros,
        }
    }
}

/// Kind tag for dispatch registration and scheduling precedence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Observation,
    Intent,
    Order,
    Fill,
}

impl EventKind {
    /// Fixed total order: Observation < Intent < Order < Fill.
    ///
    /// At a shared logical_time, all Observations dispatch before any
    /// Intent, Intents before Orders, Orders before Fills. A Fill must
    /// never be invisible to a risk check made at the same instant.
    pub fn precedence(self) -> u8 {
        match self {
            EventKind::Observation => 0,
            EventKind::Intent => 1,
            EventKind::Order => 2,
            EventKind::Fill => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Observation => "OBSERVATION",
            EventKind::Intent => "INTENT",
            EventKind::Order => "ORDER",
            EventKind::Fill => "FILL",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed union of everything that can travel through the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Observation(Observation),
    Intent(Intent),
    Order(Order),
    Fill(Fill),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Observation(_) => EventKind::Observation,
            Event::Intent(_) => EventKind::Intent,
            Event::Order(_) => EventKind::Order,
            Event::Fill(_) => EventKind::Fill,
        }
    }

    pub fn logical_time(&self) -> i64 {
        match self {
            Event::Observation(e) => e.logical_time,
            Event::Intent(e) => e.logical_time,
            Event::Order(e) => e.logical_time,
            Event::Fill(e) => e.logical_time,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Event::Observation(e) => &e.symbol,
            Event::Intent(e) => &e.symbol,
            Event::Order(e) => &e.symbol,
            Event::Fill(e) => &e.symbol,
        }
    }
}

impl From<Observation> for Event {
    fn from(e: Observation) -> Self {
        Event::Observation(e)
    }
}

impl From<Intent> for Event {
    fn from(e: Intent) -> Self {
        Event::Intent(e)
    }
}

impl From<Order> for Event {
    fn from(e: Order) -> Self {
        Event::Order(e)
    }
}

impl From<Fill> for Event {
    fn from(e: Fill) -> Self {
        Event::Fill(e)
    }
}
