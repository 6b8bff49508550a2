//! Plain data row types written by trace backends.

/// One unit's position and running behavior at a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRow {
    pub tick:        u64,
    pub unit:        u64,
    pub x:           f32,
    pub y:           f32,
    pub z:           f32,
    pub orientation: f32,
    /// Label of the running generator's kind; empty for a torn-down
    /// scheduler.
    pub kind:        &'static str,
    /// `default` or `active`; empty for a torn-down scheduler.
    pub slot:        &'static str,
    /// Raw unit-state bits.
    pub unit_state:  u32,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_ms:   u64,
    pub units_ticked: u64,
}
