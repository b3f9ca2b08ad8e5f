use crate::Generator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shortlink_core::shortcode::{ALPHABET, GENERATED_LENGTH};
use shortlink_core::ShortCode;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
enum Source {
    /// The thread-local generator from `rand::rng()`.
    Thread,
    /// A fixed-seed generator, for reproducible sequences.
    Seeded(Mutex<StdRng>),
}

/// Draws each character of a short code independently and uniformly from
/// the 36 base-36 digits.
///
/// The default length is 7, an output space of 36^7 (about 78 billion).
/// Collisions are possible and are left to the allocator to detect.
#[derive(Debug)]
pub struct RandomGenerator {
    length: usize,
    source: Source,
}

impl RandomGenerator {
    /// Creates a 7-character generator backed by the thread-local RNG.
    pub fn new() -> Self {
        Self::with_length(GENERATED_LENGTH)
    }

    pub fn with_length(length: usize) -> Self {
        Self {
            length,
            source: Source::Thread,
        }
    }

    /// Creates a 7-character generator with a reproducible sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            length: GENERATED_LENGTH,
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn draw<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let code = match &self.source {
            Source::Thread => Self::draw(&mut rand::rng(), self.length),
            Source::Seeded(rng) => {
                // The RNG state stays valid even if a holder panicked.
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                Self::draw(&mut *rng, self.length)
            }
        };
        ShortCode::generated(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ChiSquared, ContinuousCDF};
    use std::collections::HashSet;

    const SAMPLES: usize = 10_000;

    #[test]
    fn generated_codes_have_expected_format() {
        let generator = RandomGenerator::new();

        for _ in 0..SAMPLES {
            let code = generator.generate();
            assert!(code.is_generated());
            assert_eq!(code.as_str().len(), 7);
            assert!(code
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        }
    }

    #[test]
    fn symbol_frequencies_are_uniform() {
        let generator = RandomGenerator::seeded(0x5eed);
        let mut counts = [0u64; 36];

        for _ in 0..SAMPLES {
            for b in generator.generate().as_str().bytes() {
                let index = ALPHABET.iter().position(|&a| a == b).unwrap();
                counts[index] += 1;
            }
        }

        let total = (SAMPLES * GENERATED_LENGTH) as f64;
        let expected = total / ALPHABET.len() as f64;
        let statistic: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        let critical = ChiSquared::new((ALPHABET.len() - 1) as f64)
            .unwrap()
            .inverse_cdf(0.9999);
        assert!(
            statistic < critical,
            "chi-square statistic {statistic} exceeds critical value {critical}"
        );
        assert!(counts.iter().all(|&c| c > 0));
    }

    #[test]
    fn positions_are_drawn_independently() {
        // Every position should see every symbol over a large sample.
        let generator = RandomGenerator::seeded(42);
        let mut seen = vec![HashSet::new(); GENERATED_LENGTH];

        for _ in 0..SAMPLES {
            for (i, b) in generator.generate().as_str().bytes().enumerate() {
                seen[i].insert(b);
            }
        }

        for symbols in seen {
            assert_eq!(symbols.len(), 36);
        }
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let first = RandomGenerator::seeded(7);
        let second = RandomGenerator::seeded(7);

        for _ in 0..100 {
            assert_eq!(first.generate(), second.generate());
        }
    }

    #[test]
    fn thread_generator_rarely_repeats() {
        let generator = RandomGenerator::new();
        let codes: HashSet<_> = (0..1_000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 1_000);
    }

    #[test]
    fn custom_length() {
        let generator = RandomGenerator::with_length(12);
        assert_eq!(generator.length(), 12);
        assert_eq!(generator.generate().as_str().len(), 12);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
