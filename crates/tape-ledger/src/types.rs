/// An open position in one symbol.
///
/// `qty_signed` carries direction: positive = long, negative = short.
/// `avg_cost_micros` is meaningful only while `qty_signed != 0`; the
/// ledger removes the record entirely when the quantity returns to
/// exactly zero, so a `Position` with qty 0 never exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub qty_signed: i64,
    pub avg_cost_micros: i64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.qty_signed > 0
    }

    pub fn is_short(&self) -> bool {
        self.qty_signed < 0
    }

    pub fn abs_qty(&self) -> i64 {
        self.qty_signed.abs()
    }
}
