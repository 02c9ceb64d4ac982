// DuoSwap Oracle Package
//
// Dual-horizon geometric TWAP over ticks.

#![no_std]

pub mod constants;
pub mod observations;

pub use constants::*;
pub use observations::{ceil_log2, Observations};
