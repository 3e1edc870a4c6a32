//! Product records and their synthetic names.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Prefix of every generated product name.
pub const NAME_PREFIX: &str = "Product_";

/// Number of base-36 characters appended to [`NAME_PREFIX`].
pub const NAME_SUFFIX_LEN: usize = 8;

/// Number of records submitted by a single seeding run.
pub const BATCH_SIZE: usize = 2;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A product document as it is handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub name: String,
    /// Client-side creation time.
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Build a record with a random name, stamped with the current time.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            name: random_name(rng),
            created_at: Utc::now(),
        }
    }
}

/// Generate a product name: [`NAME_PREFIX`] followed by a base-36 suffix.
///
/// Names are not checked for collisions; uniqueness is only probabilistic.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let fraction: f64 = rng.random();
    let suffix = base36_fraction(fraction, NAME_SUFFIX_LEN);
    format!("{NAME_PREFIX}{suffix}")
}

/// Render the fractional digits of `fraction` (in `[0, 1)`) in base 36.
///
/// Always yields exactly `len` characters; positions past the available
/// precision come out as `0`.
pub fn base36_fraction(fraction: f64, len: usize) -> String {
    let mut rest = fraction.fract().abs();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        rest *= 36.0;
        let digit = (rest.trunc() as usize).min(35);
        out.push(BASE36_DIGITS[digit] as char);
        rest = rest.fract();
    }
    out
}

/// Build the fixed-size batch for one seeding run.
pub fn generate_batch<R: Rng + ?Sized>(rng: &mut R) -> Vec<ProductRecord> {
    (0..BATCH_SIZE)
        .map(|_| ProductRecord::generate(rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_generated_name(name: &str) -> bool {
        match name.strip_prefix(NAME_PREFIX) {
            Some(suffix) => {
                suffix.len() == NAME_SUFFIX_LEN
                    && suffix
                        .chars()
                        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
            }
            None => false,
        }
    }

    #[test]
    fn test_base36_fraction_known_values() {
        assert_eq!(base36_fraction(0.0, 8), "00000000");
        assert_eq!(base36_fraction(0.5, 8), "i0000000");
        assert_eq!(base36_fraction(0.25, 8), "90000000");
    }

    #[test]
    fn test_base36_fraction_near_one() {
        let s = base36_fraction(0.999_999_999_999, 8);
        assert_eq!(s.len(), 8);
        assert!(s.starts_with("zzzzzzz"));
    }

    #[test]
    fn test_random_names_match_format() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let name = random_name(&mut rng);
            assert!(is_generated_name(&name), "unexpected name: {name}");
        }
    }

    #[test]
    fn test_same_seed_same_names() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(random_name(&mut a), random_name(&mut b));
    }

    #[test]
    fn test_generate_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        let before = Utc::now();
        let batch = generate_batch(&mut rng);
        let after = Utc::now();

        assert_eq!(batch.len(), BATCH_SIZE);
        for record in &batch {
            assert!(is_generated_name(&record.name));
            assert!(record.created_at >= before && record.created_at <= after);
        }
    }
}
