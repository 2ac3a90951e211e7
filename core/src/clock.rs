//! # Injected Clock
//!
//! Vault maturity is judged against a wall-clock instant supplied by the
//! caller at each operation — the contract layer never reads the system
//! time itself. This module is the caller's side of that contract: a
//! [`Clock`] that either tracks real time or sits at a fixed, manually
//! advanced instant.
//!
//! The fixed variant is the in-process equivalent of a test harness
//! fast-forwarding chain time: create a `Clock::fixed(start)`, hand its
//! `now()` to each contract call, and `advance()` it to simulate the
//! passage of days without waiting for them.

use chrono::{DateTime, Duration, Utc};

/// A wall-clock source for contract calls.
#[derive(Clone, Debug)]
pub enum Clock {
    /// Reads the real system time on every call.
    System,
    /// Sits at a fixed instant until explicitly moved.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Creates a fixed clock starting at the given instant.
    pub fn fixed(start: DateTime<Utc>) -> Self {
        Clock::Fixed(start)
    }

    /// Returns the current instant according to this clock.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward by `delta`. No effect on the system
    /// clock — real time advances on its own.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Pins a fixed clock to an exact instant. No effect on the system
    /// clock.
    pub fn set(&mut self, instant: DateTime<Utc>) {
        if let Clock::Fixed(t) = self {
            *t = instant;
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_stands_still() {
        let start = Utc::now();
        let clock = Clock::fixed(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn advance_moves_fixed_clock() {
        let start = Utc::now();
        let mut clock = Clock::fixed(start);
        clock.advance(Duration::days(90));
        assert_eq!(clock.now(), start + Duration::days(90));
    }

    #[test]
    fn set_pins_fixed_clock() {
        let start = Utc::now();
        let mut clock = Clock::fixed(start);
        let later = start + Duration::seconds(42);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = Clock::System;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
