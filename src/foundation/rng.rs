//! Seeded pseudo-random source used for cosmetic layout jitter.
//!
//! Both the string hash and the generator constants are part of the layout contract: another
//! implementation using the same key must reproduce the same sequence.

const LCG_MUL: u64 = 9301;
const LCG_INC: u64 = 49297;
const LCG_MOD: u64 = 233_280;

/// 31-multiplier string hash over UTF-16 code units, folded to a non-negative `u32`.
pub fn seed_from_key(key: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in key.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

/// Seed for one page of one book (`"<book_id>-<page_number>"`).
pub fn page_seed(book_id: &str, page_number: u32) -> u32 {
    seed_from_key(&format!("{book_id}-{page_number}"))
}

/// Linear-congruential generator producing floats in `[0, 1)`.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Start a sequence from a numeric seed.
    pub fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    /// Start a sequence from a stable string key.
    pub fn from_key(key: &str) -> Self {
        Self::new(seed_from_key(key))
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MUL + LCG_INC) % LCG_MOD;
        self.state as f64 / LCG_MOD as f64
    }

    /// Next value in `[-bound, bound)`.
    pub fn jitter(&mut self, bound: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * bound
    }
}
