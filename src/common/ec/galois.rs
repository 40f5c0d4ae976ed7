//! GF(256) arithmetic for Reed-Solomon codewords
//!
//! Elements are bytes, addition is XOR and multiplication goes through log/exp
//! tables built from the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 with
//! generator α = 2.

use std::sync::OnceLock;

use super::MAX_EC_SIZE;

const PRIMITIVE_POLY: u16 = 0x11D;

pub struct GaloisField {
    log_table: [u8; 256],
    // 2x size to skip the modulo after adding logs
    exp_table: [u8; 512],
    // Generator polynomials indexed by degree, empty for unused degrees
    generators: Vec<Vec<u8>>,
}

static GALOIS_FIELD: OnceLock<GaloisField> = OnceLock::new();

impl GaloisField {
    /// Process wide field, built on first use.
    pub fn get() -> &'static GaloisField {
        GALOIS_FIELD.get_or_init(GaloisField::new)
    }

    fn new() -> Self {
        let mut gf = GaloisField { log_table: [0; 256], exp_table: [0; 512], generators: vec![] };
        gf.build_tables();
        gf.generators = (0..=MAX_EC_SIZE)
            .map(|k| if EC_LENGTHS.contains(&k) { gf.compute_generator(k) } else { vec![] })
            .collect();
        gf
    }

    fn build_tables(&mut self) {
        let mut value = 1u16;
        for i in 0..255 {
            self.exp_table[i] = value as u8;
            self.log_table[value as usize] = i as u8;
            value <<= 1;
            if value & 0x100 != 0 {
                value ^= PRIMITIVE_POLY;
            }
        }
        for i in 255..512 {
            self.exp_table[i] = self.exp_table[i - 255];
        }
    }

    // Expands (x - α^0)(x - α^1)...(x - α^(k-1)). The leading 1 is implied, the
    // rest is stored from the highest degree down.
    fn compute_generator(&self, degree: usize) -> Vec<u8> {
        let mut poly = vec![1u8];
        for i in 0..degree {
            let root = self.exp(i);
            let mut next = poly.clone();
            next.push(0);
            for (j, &coeff) in poly.iter().enumerate() {
                next[j + 1] ^= self.mul(coeff, root);
            }
            poly = next;
        }
        poly.split_off(1)
    }

    #[inline]
    pub fn exp(&self, power: usize) -> u8 {
        self.exp_table[power % 255]
    }

    #[cfg(test)]
    fn log(&self, a: u8) -> u8 {
        debug_assert!(a != 0, "Log of zero is undefined");
        self.log_table[a as usize]
    }

    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp_table[self.log_table[a as usize] as usize + self.log_table[b as usize] as usize]
    }

    #[cfg(test)]
    fn div(&self, a: u8, b: u8) -> u8 {
        debug_assert!(b != 0, "Division by zero in Galois Field");
        if a == 0 {
            return 0;
        }
        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;
        self.exp_table[log_a + 255 - log_b]
    }

    /// Generator polynomial of the given degree without its leading term, or `None`
    /// when no version uses that many EC codewords per block.
    pub fn generator_poly(&self, degree: usize) -> Option<&[u8]> {
        self.generators.get(degree).filter(|g| !g.is_empty()).map(Vec::as_slice)
    }
}


// Global constants
//------------------------------------------------------------------------------

// Distinct EC codewords per block across all versions & levels
pub static EC_LENGTHS: [usize; 13] = [7, 10, 13, 15, 16, 17, 18, 20, 22, 24, 26, 28, 30];
