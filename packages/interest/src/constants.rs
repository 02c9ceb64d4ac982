// Interest rate model constants (WAD = 1e18)

use duoswap_math::WAD;

pub const SECONDS_PER_YEAR: u128 = 31_536_000;

/// End of the shallow segment of the rate curve (80%)
pub const OPTIMAL_UTILIZATION_WAD: u128 = 800_000_000_000_000_000;

/// End of the middle segment of the rate curve (92.5%)
pub const DANGER_UTILIZATION_WAD: u128 = 925_000_000_000_000_000;

pub const SLOPE_LOW_WAD: u128 = 100_000_000_000_000_000;
pub const SLOPE_MID_WAD: u128 = 2 * WAD;
pub const SLOPE_HIGH_WAD: u128 = 20 * WAD;

/// Rate at 80% utilization
pub const OFFSET_MID_WAD: u128 = 80_000_000_000_000_000;
/// Rate at 92.5% utilization
pub const OFFSET_HIGH_WAD: u128 = 330_000_000_000_000_000;

/// Liquidity borrows pay this multiple of the single-asset rate
pub const L_RATE_MULTIPLIER: u128 = 5;

/// Saturation above which L utilization is penalized (85%)
pub const SATURATION_PENALTY_START_WAD: u128 = 850_000_000_000_000_000;
/// Saturation span over which the penalty ramps to full (15%)
pub const SATURATION_PENALTY_RANGE_WAD: u128 = 150_000_000_000_000_000;
/// Utilization the penalty pushes toward (90%)
pub const SATURATION_UTILIZATION_TARGET_WAD: u128 = 900_000_000_000_000_000;

/// Share of X/Y interest taken as protocol fee
pub const PROTOCOL_FEE_PERCENT: u128 = 10;
