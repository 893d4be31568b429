//! Placeholder biometric comparison.
//!
//! Stands in for a real face/voice model; the numeric policy (not the
//! intelligence) is the contract.

/// Similarity between two opaque biometric blobs, in `[0, 1]`.
///
/// Identical non-empty blobs score 1.0; comparisons involving an empty
/// blob score 0.0; otherwise the score is the fraction of matching byte
/// positions over the longer blob's length.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let matching = a.bytes().zip(b.bytes()).filter(|(x, y)| x == y).count();
    let total = a.len().max(b.len());
    matching as f64 / total as f64
}

/// Decision rule for biometric acceptance.
#[derive(Debug, Clone, Copy)]
pub struct BiometricPolicy {
    /// Per-channel acceptance threshold, 0.6 by default.
    pub threshold: f64,
}

impl Default for BiometricPolicy {
    fn default() -> Self {
        Self { threshold: 0.6 }
    }
}

impl BiometricPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Both channels must independently clear the threshold; an AND of
    /// face and voice, never an OR.
    pub fn verify(
        &self,
        face_enrolled: &str,
        face_sample: &str,
        voice_enrolled: &str,
        voice_sample: &str,
    ) -> bool {
        similarity(face_enrolled, face_sample) > self.threshold
            && similarity(voice_enrolled, voice_sample) > self.threshold
    }
}
