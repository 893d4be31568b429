//! Time-windowed rotating challenge phrases.
//!
//! The phrase for a window is a pure function of the window index, so any
//! process computing the same window independently agrees. The selector is
//! `ChaCha8Rng` seeded with the index; unlike the standard generator it is
//! value-stable across platforms and releases.
//!
//! A small fixed phrase set behind a public, reproducible seed is guessable.
//! This is a demo gate, not suitable as a genuine security boundary.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Candidate phrases. Selection is index-sensitive, so the order is part
/// of the contract.
pub const MEDICAL_PHRASES: [&str; 5] = [
    "Verify Medical Access 782",
    "Emergency Heart Rate Stable",
    "Decrypt Patient Record Alpha",
    "Secure Bio Sync Active",
    "Confirm Identity Now 404",
];

/// A challenge phrase together with the seconds left in its window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub phrase: String,
    pub expires_in: i64,
}

/// Derives the current challenge from a coarse time window.
#[derive(Debug, Clone)]
pub struct ChallengeGenerator {
    window_secs: i64,
    phrases: Vec<String>,
}

impl ChallengeGenerator {
    pub fn new(window_secs: i64) -> Self {
        Self::with_phrases(
            window_secs,
            MEDICAL_PHRASES.iter().map(|p| (*p).to_owned()).collect(),
        )
    }

    pub fn with_phrases(window_secs: i64, phrases: Vec<String>) -> Self {
        debug_assert!(window_secs > 0);
        debug_assert!(!phrases.is_empty());
        Self {
            window_secs,
            phrases,
        }
    }

    /// Returns the challenge for the window containing `now`.
    ///
    /// Calls within one window return the identical phrase; across window
    /// boundaries the phrase may repeat, since selection over a small set
    /// is not collision-free.
    pub fn current(&self, now: DateTime<Utc>) -> Challenge {
        let ts = now.timestamp();
        let window = ts.div_euclid(self.window_secs);

        let mut rng = ChaCha8Rng::seed_from_u64(window as u64);
        let index = rng.gen_range(0..self.phrases.len());

        Challenge {
            phrase: self.phrases[index].clone(),
            expires_in: self.window_secs - ts.rem_euclid(self.window_secs),
        }
    }
}

impl Default for ChallengeGenerator {
    fn default() -> Self {
        Self::new(120)
    }
}
