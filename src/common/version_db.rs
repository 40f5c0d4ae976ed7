use std::sync::OnceLock;

use super::codec::{Mode, MODES};
use super::metadata::{ECLevel, Version};

// Block layout & capacity queries
//------------------------------------------------------------------------------

impl Version {
    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[*self - 1]
    }

    // Modules left for codewords after function patterns, format & version info
    fn raw_data_modules(self) -> usize {
        let v = *self;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_cnt = v / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][*self - 1] as usize
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][*self - 1] as usize
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    /// Returns (group 1 block size, group 1 block count, group 2 block size, group 2
    /// block count) in data codewords. Group 2 blocks hold one extra data codeword.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ecl);
        let block2_count = total % blocks;
        let block1_count = blocks - block2_count;
        let block1_size = total / blocks - self.ecc_per_block(ecl);
        let block2_size = if block2_count > 0 { block1_size + 1 } else { 0 };
        (block1_size, block1_count, block2_size, block2_count)
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let range = match *self {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][range],
            Mode::Alphanumeric => [9, 11, 13][range],
            Mode::Byte => [8, 16, 16][range],
        }
    }

    /// Maximum number of characters a single segment of the mode can carry.
    pub fn char_capacity(self, ecl: ECLevel, mode: Mode) -> usize {
        let table = CHAR_CAPACITY.get_or_init(build_char_capacity_table);
        table[*self - 1][ecl as usize][mode_index(mode)]
    }
}

fn mode_index(mode: Mode) -> usize {
    match mode {
        Mode::Numeric => 0,
        Mode::Alphanumeric => 1,
        Mode::Byte => 2,
    }
}

fn build_char_capacity_table() -> CharCapacityTable {
    let mut table = [[[0; 3]; 4]; 40];
    for (v, per_ecl) in table.iter_mut().enumerate() {
        let ver = Version::new_unchecked(v + 1);
        for (ecl, per_mode) in ECLevel::ALL.iter().zip(per_ecl.iter_mut()) {
            let bits = ver.data_bit_capacity(*ecl);
            for (mode, cap) in MODES.iter().zip(per_mode.iter_mut()) {
                let cc_bits = ver.char_cnt_bits(*mode);
                let avail = bits - ver.mode_bits() - cc_bits;
                *cap = mode.max_chars(avail).min((1 << cc_bits) - 1);
            }
        }
    }
    table
}


// Global constants
//------------------------------------------------------------------------------

type CharCapacityTable = [[[usize; 3]; 4]; 40];

static CHAR_CAPACITY: OnceLock<CharCapacityTable> = OnceLock::new();

// Indexed by ec level, then version - 1
static ECC_PER_BLOCK: [[u8; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static BLOCK_COUNT: [[u8; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14,
        15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];
