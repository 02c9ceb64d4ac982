// SPDX-License-Identifier: MIT
// Observation rings
//
// Each ring slot holds (cumulative tick-seconds, timestamp). The running
// cumulative is advanced on every record with the previous tick over the
// elapsed time, so any two points give a time-weighted average tick.
// Timestamps are 32-bit and wrap; all differences use wrapping arithmetic.

use duoswap_math::{DuoError, MAX_TICK, MIN_TICK};

use crate::constants::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observations {
    pub mid_term_interval: u32,
    pub long_term_interval: u32,

    pub mid_term_cumulative: [i64; MID_TERM_SLOTS],
    pub mid_term_timestamps: [u32; MID_TERM_SLOTS],
    /// Next slot to write
    pub mid_term_index: u32,
    /// Set once the ring has wrapped
    pub mid_term_initialized: bool,

    pub long_term_cumulative: [i64; LONG_TERM_SLOTS],
    pub long_term_timestamps: [u32; LONG_TERM_SLOTS],
    pub long_term_index: u32,
    pub long_term_initialized: bool,

    pub last_tick: i32,
    pub tick_cumulative: i64,
    pub last_timestamp: u32,

    pub lending_state_tick: i32,
    pub lending_cumulative: i64,
    pub lending_timestamp: u32,
}

/// ceil(log2(n)) for n >= 1
#[inline]
pub fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        return 0;
    }
    32 - (n - 1).leading_zeros()
}

impl Observations {
    /// Fresh buffer seeded with one record in each ring at `now`.
    pub fn new(
        tick: i32,
        now: u32,
        mid_term_interval: u32,
        long_term_interval: u32,
    ) -> Result<Self, DuoError> {
        Self::validate_intervals(mid_term_interval, long_term_interval)?;
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(DuoError::TickOutOfBounds);
        }

        let mut mid_term_timestamps = [0u32; MID_TERM_SLOTS];
        mid_term_timestamps[0] = now;
        let mut long_term_timestamps = [0u32; LONG_TERM_SLOTS];
        long_term_timestamps[0] = now;

        Ok(Self {
            mid_term_interval,
            long_term_interval,
            mid_term_cumulative: [0; MID_TERM_SLOTS],
            mid_term_timestamps,
            mid_term_index: 1,
            mid_term_initialized: false,
            long_term_cumulative: [0; LONG_TERM_SLOTS],
            long_term_timestamps,
            long_term_index: 1,
            long_term_initialized: false,
            last_tick: tick,
            tick_cumulative: 0,
            last_timestamp: now,
            lending_state_tick: tick,
            lending_cumulative: 0,
            lending_timestamp: now,
        })
    }

    pub fn validate_intervals(mid_term_interval: u32, long_term_interval: u32) -> Result<(), DuoError> {
        if mid_term_interval == 0 {
            return Err(DuoError::InvalidObservationConfig);
        }
        let min_long = mid_term_interval
            .checked_mul(LONG_TERM_INTERVAL_FACTOR)
            .ok_or(DuoError::InvalidObservationConfig)?;
        if long_term_interval < min_long {
            return Err(DuoError::InvalidObservationConfig);
        }
        Ok(())
    }

    pub fn set_intervals(&mut self, mid_term_interval: u32, long_term_interval: u32) -> Result<(), DuoError> {
        Self::validate_intervals(mid_term_interval, long_term_interval)?;
        self.mid_term_interval = mid_term_interval;
        self.long_term_interval = long_term_interval;
        Ok(())
    }

    // ========================================================
    // RECORDING
    // ========================================================

    /// Filled long-term slots, 1..=9
    pub fn long_term_filled(&self) -> u32 {
        if self.long_term_initialized {
            LONG_TERM_SLOTS as u32
        } else {
            self.long_term_index
        }
    }

    /// Shrinks from 9 to 1 as the long-term ring fills
    pub fn outlier_factor(&self) -> i32 {
        let remaining = LONG_TERM_SLOTS as u32 + 1 - self.long_term_filled();
        remaining.max(1) as i32
    }

    /// Clamp `tick` to within the outlier bound of the last recorded tick
    pub fn bound_tick(&self, tick: i32) -> i32 {
        let max_move = OUTLIER_TICK_STEP * self.outlier_factor();
        let lower = (self.last_tick - max_move).max(MIN_TICK);
        let upper = (self.last_tick + max_move).min(MAX_TICK);
        tick.clamp(lower, upper)
    }

    /// Running cumulative extrapolated to `now` with the last tick
    pub fn cumulative_at(&self, now: u32) -> i64 {
        let elapsed = now.wrapping_sub(self.last_timestamp) as i64;
        self.tick_cumulative
            .wrapping_add((self.last_tick as i64).wrapping_mul(elapsed))
    }

    /// Record the tick of the reserves after a price-affecting operation.
    /// Returns the tick actually stored after outlier bounding.
    pub fn record(&mut self, tick: i32, now: u32) -> i32 {
        self.tick_cumulative = self.cumulative_at(now);
        self.last_timestamp = now;
        self.last_tick = self.bound_tick(tick);

        let mid_latest = latest_slot(self.mid_term_index, MID_TERM_SLOTS);
        if now.wrapping_sub(self.mid_term_timestamps[mid_latest]) >= self.mid_term_interval {
            let slot = self.mid_term_index as usize;
            self.mid_term_cumulative[slot] = self.tick_cumulative;
            self.mid_term_timestamps[slot] = now;
            self.mid_term_index = ((slot + 1) % MID_TERM_SLOTS) as u32;
            if self.mid_term_index == 0 {
                self.mid_term_initialized = true;
            }
        }

        let long_latest = latest_slot(self.long_term_index, LONG_TERM_SLOTS);
        if now.wrapping_sub(self.long_term_timestamps[long_latest]) >= self.long_term_interval {
            let slot = self.long_term_index as usize;
            self.long_term_cumulative[slot] = self.tick_cumulative;
            self.long_term_timestamps[slot] = now;
            self.long_term_index = ((slot + 1) % LONG_TERM_SLOTS) as u32;
            if self.long_term_index == 0 {
                self.long_term_initialized = true;
            }
        }

        self.last_tick
    }

    // ========================================================
    // QUERIES
    // ========================================================

    /// Average tick across the whole mid-term ring
    pub fn mid_term_tick(&self, now: u32) -> i32 {
        let oldest = oldest_slot(self.mid_term_index, self.mid_term_initialized);
        self.average_since(
            self.mid_term_cumulative[oldest],
            self.mid_term_timestamps[oldest],
            now,
        )
    }

    /// Average tick across the whole long-term ring
    pub fn long_term_tick(&self, now: u32) -> i32 {
        let oldest = oldest_slot(self.long_term_index, self.long_term_initialized);
        self.average_since(
            self.long_term_cumulative[oldest],
            self.long_term_timestamps[oldest],
            now,
        )
    }

    /// `[min, max]` of the long-term, mid-term and current tick, widened
    /// by a buffer that shrinks as the long-term ring fills.
    pub fn tick_range(&self, current_tick: i32, now: u32) -> (i32, i32) {
        let long_term = self.long_term_tick(now);
        let mid_term = self.mid_term_tick(now);

        let low = current_tick.min(mid_term).min(long_term);
        let high = current_tick.max(mid_term).max(long_term);

        let missing = LONG_TERM_SLOTS as u32 + 1 - self.long_term_filled();
        let buffer = MIN_TICK_BUFFER + TICK_BUFFER_STEP * ceil_log2(missing) as i32;

        (
            low.saturating_sub(buffer).max(MIN_TICK),
            high.saturating_add(buffer).min(MAX_TICK),
        )
    }

    /// TWAP since the last lending checkpoint. Falls back to the stored
    /// lending tick when no time has passed.
    pub fn lending_state_tick(&self, now: u32) -> i32 {
        if now.wrapping_sub(self.lending_timestamp) == 0 {
            return self.lending_state_tick;
        }
        self.average_since(self.lending_cumulative, self.lending_timestamp, now)
    }

    /// Consume the lending window: returns its TWAP and starts a new one.
    pub fn checkpoint_lending_state(&mut self, now: u32) -> i32 {
        let tick = self.lending_state_tick(now);
        self.lending_state_tick = tick;
        self.lending_cumulative = self.cumulative_at(now);
        self.lending_timestamp = now;
        tick
    }

    fn average_since(&self, cumulative: i64, timestamp: u32, now: u32) -> i32 {
        let elapsed = now.wrapping_sub(timestamp) as i64;
        if elapsed == 0 {
            return self.last_tick;
        }
        let delta = self.cumulative_at(now).wrapping_sub(cumulative);
        delta.div_euclid(elapsed).clamp(MIN_TICK as i64, MAX_TICK as i64) as i32
    }
}

#[inline]
fn latest_slot(next_index: u32, slots: usize) -> usize {
    (next_index as usize + slots - 1) % slots
}

#[inline]
fn oldest_slot(next_index: u32, initialized: bool) -> usize {
    if initialized {
        next_index as usize
    } else {
        0
    }
}
