// Constants module for DuoSwap
//
// Grouped by functionality, one doc line per constant.

// ============================================================
// FIXED POINT
// ============================================================

/// 2^72, scale of sqrt prices
pub const Q72: u128 = 1u128 << 72;

/// 2^64, scale of log2 values in tick math
pub const Q64: u128 = 1u128 << 64;

/// 1e18, scale of rates, utilizations and saturation
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Basis points denominator
pub const BIPS: u128 = 10_000;

// ============================================================
// TICK CONSTANTS
// ============================================================

/// Lowest tick of the B = 512/511 price ladder
pub const MIN_TICK: i32 = -19855;

/// Highest tick of the price ladder
pub const MAX_TICK: i32 = 19854;

/// sqrt price at MIN_TICK in Q72
pub const MIN_SQRT_PRICE_Q72: u128 = 17_583_615_869_205;

/// sqrt price at MAX_TICK in Q72
pub const MAX_SQRT_PRICE_Q72: u128 = 1_267_029_298_669_175_270_746_367_132_753;

/// price at MIN_TICK in Q128
pub const MIN_PRICE_Q128: u128 = 4_717_766_525_814_177_057_912;

/// price at MAX_TICK in Q128, as (high, low) words of a 256-bit value
pub const MAX_PRICE_Q128_WORDS: (u128, u128) =
    (71_986_977_537_946_944, 322_809_341_524_149_324_189_276_896_754_182_431_248);

/// 1 / log2(512/511) in Q64
pub const INV_LOG2_BASE_Q64: u128 = 6_540_194_788_881_389_179_517;

/// Fractional bits resolved by the squaring loop of get_tick_at_price
pub const LOG2_FRACTION_ITERATIONS: u32 = 9;

// ============================================================
// LEDGER BOUNDS
// ============================================================

/// Asset totals live in 128 bits
pub const MAX_ASSETS: u128 = u128::MAX;

/// Share totals live in 112 bits
pub const MAX_SHARES: u128 = (1u128 << 112) - 1;

/// Reserves live in 112 bits
pub const MAX_RESERVE: u128 = (1u128 << 112) - 1;

/// Liquidity locked forever at the first mint
pub const MINIMUM_LIQUIDITY: u128 = 1000;

// ============================================================
// DEPLETION
// ============================================================

/// Reserve percentage that must cover missing assets before the
/// depletion buffer kicks in
pub const DEPLETION_BUFFER_PERCENT: u128 = 95;

/// Percentage denominator
pub const PERCENT: u128 = 100;

// ============================================================
// SWAP FEES
// ============================================================

/// Fee charged when the swap does not displace the reference reserve
pub const MIN_SWAP_FEE_BIPS: u128 = 30;

/// Upper bound of the quadratic fee
pub const MAX_SWAP_FEE_BIPS: u128 = 4_000;

/// Divisor of the squared displacement (in bips) added to the base fee
pub const SWAP_FEE_QUADRATIC_DIVISOR: u128 = 2_500;
