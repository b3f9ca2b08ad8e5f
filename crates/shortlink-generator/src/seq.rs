use crate::Generator;
use shortlink_core::shortcode::{ALPHABET, GENERATED_LENGTH};
use shortlink_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A sequential short code generator.
///
/// Produces base-36 counters zero-padded to 7 characters: "0000000",
/// "0000001", ... "000000z", "0000010". Codes are unique within a single
/// instance, which makes the sequence predictable in tests and load runs.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self::with_offset(self.counter.load(Ordering::SeqCst))
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn encode(mut value: u64) -> String {
        let mut digits = Vec::with_capacity(GENERATED_LENGTH);
        while value > 0 {
            digits.push(ALPHABET[(value % 36) as usize]);
            value /= 36;
        }
        while digits.len() < GENERATED_LENGTH {
            digits.push(b'0');
        }
        digits.iter().rev().map(|&b| b as char).collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::generated(Self::encode(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_sequential_codes() {
        let generator = SeqGenerator::new();

        assert_eq!(generator.generate().as_str(), "0000000");
        assert_eq!(generator.generate().as_str(), "0000001");
        assert_eq!(generator.generate().as_str(), "0000002");
    }

    #[test]
    fn rolls_over_base36_digits() {
        let generator = SeqGenerator::with_offset(35);

        assert_eq!(generator.generate().as_str(), "000000z");
        assert_eq!(generator.generate().as_str(), "0000010");
    }

    #[test]
    fn codes_are_marked_generated() {
        assert!(SeqGenerator::new().generate().is_generated());
    }

    #[test]
    fn clone_preserves_counter_state() {
        let generator = SeqGenerator::new();
        generator.generate();
        generator.generate();

        let cloned = generator.clone();

        assert_eq!(generator.generate().as_str(), "0000002");
        assert_eq!(cloned.generate().as_str(), "0000002");
    }
}
