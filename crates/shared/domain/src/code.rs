//! Human-readable reference codes (`DROP-0042`, `TCKT-482913`).
//!
//! These are display identifiers, not primary keys. Uniqueness is checked
//! against storage by the generator in the service layer and enforced by a
//! unique index.

use rand::Rng;

use crate::constants::{DROPSHIPPER_CODE_PREFIX, TICKET_NUMBER_PREFIX};

/// Shape of a prefixed numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFormat {
    prefix: &'static str,
    low: u32,
    high: u32,
    width: usize,
}

/// `DROP-0000` .. `DROP-9999`
pub const DROPSHIPPER_CODE: CodeFormat = CodeFormat::new(DROPSHIPPER_CODE_PREFIX, 0, 10_000, 4);

/// `TCKT-100000` .. `TCKT-999999`
pub const TICKET_NUMBER: CodeFormat = CodeFormat::new(TICKET_NUMBER_PREFIX, 100_000, 1_000_000, 6);

impl CodeFormat {
    /// Codes are drawn from `low..high`, zero-padded to `width` digits.
    pub const fn new(prefix: &'static str, low: u32, high: u32, width: usize) -> Self {
        Self {
            prefix,
            low,
            high,
            width,
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Number of distinct codes in this format
    pub fn capacity(&self) -> u32 {
        self.high - self.low
    }

    /// Format a number into a code.
    pub fn format(&self, n: u32) -> String {
        format!("{}-{:0width$}", self.prefix, n, width = self.width)
    }

    /// Draw a random candidate code.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.format(rng.gen_range(self.low..self.high))
    }

    /// Check whether `code` is well-formed for this format.
    pub fn matches(&self, code: &str) -> bool {
        let Some(digits) = code
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return false;
        };
        digits.len() == self.width
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits
                .parse::<u32>()
                .map(|n| (self.low..self.high).contains(&n))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dropshipper_code_is_zero_padded() {
        assert_eq!(DROPSHIPPER_CODE.format(42), "DROP-0042");
        assert_eq!(DROPSHIPPER_CODE.capacity(), 10_000);
    }

    #[test]
    fn test_ticket_number_space() {
        assert_eq!(TICKET_NUMBER.format(100_000), "TCKT-100000");
        assert_eq!(TICKET_NUMBER.capacity(), 900_000);
    }

    #[test]
    fn test_drawn_codes_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert!(DROPSHIPPER_CODE.matches(&DROPSHIPPER_CODE.draw(&mut rng)));
            assert!(TICKET_NUMBER.matches(&TICKET_NUMBER.draw(&mut rng)));
        }
    }

    #[test]
    fn test_matches_rejects_foreign_shapes() {
        assert!(!DROPSHIPPER_CODE.matches("DROP-42"));
        assert!(!DROPSHIPPER_CODE.matches("TCKT-0042"));
        assert!(!TICKET_NUMBER.matches("TCKT-012345"));
        assert!(!TICKET_NUMBER.matches("TCKT-12345a"));
    }
}
