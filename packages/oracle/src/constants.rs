// Oracle constants

/// Slots in the mid-term ring
pub const MID_TERM_SLOTS: usize = 51;

/// Slots in the long-term ring
pub const LONG_TERM_SLOTS: usize = 9;

/// Default seconds between mid-term records
pub const DEFAULT_MID_TERM_INTERVAL: u32 = 12;

/// Default seconds between long-term records
pub const DEFAULT_LONG_TERM_INTERVAL: u32 = 900;

/// long_term_interval must be at least this multiple of mid_term_interval
pub const LONG_TERM_INTERVAL_FACTOR: u32 = 14;

/// Ticks of allowed movement per unit of outlier factor
pub const OUTLIER_TICK_STEP: i32 = 10;

/// Narrowest half-width added around the tick range
pub const MIN_TICK_BUFFER: i32 = 20;

/// Extra half-width per doubling of missing long-term confidence
pub const TICK_BUFFER_STEP: i32 = 40;
