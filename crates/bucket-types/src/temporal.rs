use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant of an upload, in nanoseconds since the UNIX epoch.
///
/// The RFC 3339 rendering (always nine fractional digits, `Z` suffix) is the
/// salt fed to the digest ahead of the uploaded bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UploadInstant {
    unix_nanos: i64,
}

impl UploadInstant {
    pub const fn from_unix_nanos(unix_nanos: i64) -> Self {
        Self { unix_nanos }
    }

    /// Current wall-clock time. Not guaranteed to be distinct from the
    /// previous call; use [`UploadClock`] when uniqueness matters.
    pub fn now() -> Self {
        let unix_nanos = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        Self { unix_nanos }
    }

    pub fn unix_nanos(&self) -> i64 {
        self.unix_nanos
    }

    /// RFC 3339 text with nanosecond precision, e.g.
    /// `2024-05-01T12:00:00.000000001Z`.
    pub fn to_rfc3339(&self) -> String {
        DateTime::<Utc>::from_timestamp_nanos(self.unix_nanos)
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

impl fmt::Debug for UploadInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UploadInstant({})", self.to_rfc3339())
    }
}

impl fmt::Display for UploadInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Hands out strictly increasing [`UploadInstant`]s.
///
/// Each tick is the wall clock, or one nanosecond past the previous tick
/// when the clock has not moved (coarse timers, bursts of uploads) or has
/// stepped backwards. Two ticks from the same clock never render to the same
/// salt.
#[derive(Debug, Default)]
pub struct UploadClock {
    last_nanos: AtomicI64,
}

impl UploadClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> UploadInstant {
        self.tick_from(UploadInstant::now())
    }

    /// Advance from an externally observed wall-clock reading.
    pub fn tick_from(&self, wall: UploadInstant) -> UploadInstant {
        let mut last = self.last_nanos.load(Ordering::Relaxed);
        loop {
            let next = wall.unix_nanos.max(last.saturating_add(1));
            match self.last_nanos.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return UploadInstant::from_unix_nanos(next),
                Err(observed) => last = observed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn rfc3339_always_has_nine_fraction_digits() {
        let instant = UploadInstant::from_unix_nanos(1_700_000_000_000_000_000);
        assert_eq!(instant.to_rfc3339(), "2023-11-14T22:13:20.000000000Z");

        let instant = UploadInstant::from_unix_nanos(1_700_000_000_000_000_001);
        assert_eq!(instant.to_rfc3339(), "2023-11-14T22:13:20.000000001Z");
    }

    #[test]
    fn rfc3339_parses_back_to_the_same_instant() {
        let instant = UploadInstant::from_unix_nanos(1_234_567_890_123_456_789);
        let parsed = DateTime::parse_from_rfc3339(&instant.to_rfc3339()).unwrap();
        assert_eq!(parsed.timestamp_nanos_opt(), Some(instant.unix_nanos()));
    }

    #[test]
    fn now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(UploadInstant::now().unix_nanos() > 1_577_836_800_000_000_000);
    }

    #[test]
    fn clock_follows_wall_time_when_it_moves() {
        let clock = UploadClock::new();
        let a = clock.tick_from(UploadInstant::from_unix_nanos(100));
        let b = clock.tick_from(UploadInstant::from_unix_nanos(500));
        assert_eq!(a.unix_nanos(), 100);
        assert_eq!(b.unix_nanos(), 500);
    }

    #[test]
    fn clock_bumps_stalled_or_backwards_time() {
        let clock = UploadClock::new();
        let a = clock.tick_from(UploadInstant::from_unix_nanos(100));
        let b = clock.tick_from(UploadInstant::from_unix_nanos(100));
        let c = clock.tick_from(UploadInstant::from_unix_nanos(50));
        assert_eq!(b.unix_nanos(), 101);
        assert_eq!(c.unix_nanos(), 102);
        assert!(a < b && b < c);
    }

    #[test]
    fn rapid_ticks_render_distinct_salts() {
        let clock = UploadClock::new();
        let salts: HashSet<String> = (0..10_000).map(|_| clock.tick().to_rfc3339()).collect();
        assert_eq!(salts.len(), 10_000);
    }

    #[test]
    fn concurrent_ticks_are_unique() {
        let clock = Arc::new(UploadClock::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                std::thread::spawn(move || {
                    (0..1_000).map(|_| clock.tick().unix_nanos()).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut all = HashSet::new();
        for handle in handles {
            for nanos in handle.join().unwrap() {
                assert!(all.insert(nanos));
            }
        }
        assert_eq!(all.len(), 8_000);
    }
}
