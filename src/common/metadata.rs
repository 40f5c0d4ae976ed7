use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        match ver {
            1..=40 => Ok(Self(ver)),
            _ => Err(QRError::InvalidVersion(ver)),
        }
    }

    // Callers guarantee the range, e.g. when iterating between two valid versions
    pub(crate) const fn new_unchecked(ver: usize) -> Self {
        debug_assert!(1 <= ver && ver <= 40, "Invalid version");
        Self(ver)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn info(self) -> Option<u32> {
        match self.0 {
            7..=40 => {
                let data = self.0 as u32;
                Some(data << 12 | bch_remainder(data, VERSION_INFO_GENERATOR, 12))
            }
            _ => None,
        }
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    // 2 bit indicator used in format info: L 01, M 00, Q 11, H 10
    pub(crate) fn format_bits(self) -> u32 {
        (self as u32) ^ 1
    }
}

impl TryFrom<u8> for ECLevel {
    type Error = QRError;

    fn try_from(value: u8) -> QRResult<Self> {
        Self::ALL.get(value as usize).copied().ok_or(QRError::InvalidECLevel)
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> QRResult<Self> {
        match s {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}


// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Metadata
//------------------------------------------------------------------------------

/// Parameters recorded by a finished symbol.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    version: Version,
    ec_level: ECLevel,
    mask: MaskPattern,
}

impl Metadata {
    pub fn new(version: Version, ec_level: ECLevel, mask: MaskPattern) -> Self {
        Self { version, ec_level, mask }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Version: {}, Ec level: {:?}, Mask: {} }}",
            self.version, self.ec_level, *self.mask
        )
    }
}

// Format information
//------------------------------------------------------------------------------

/// 15 bit format information: 2 bit ec level and 3 bit mask, BCH(15,5) protected and
/// XOR-ed with the fixed format mask.
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = ecl.format_bits() << 3 | *mask as u32;
    (data << 10 | bch_remainder(data, FORMAT_INFO_GENERATOR, 10)) ^ FORMAT_INFO_MASK
}

/// Recovers ec level and mask from a possibly corrupted format information word.
///
/// Returns the valid codeword closest in Hamming distance, provided the distance
/// does not exceed the 3 bit correction capacity of the code.
pub fn decode_format_info(bits: u32) -> Option<(ECLevel, MaskPattern)> {
    let (ecl, mask, dist) = ECLevel::ALL
        .iter()
        .flat_map(|&ecl| MaskPattern::ALL.iter().map(move |&mask| (ecl, mask)))
        .map(|(ecl, mask)| (ecl, mask, (format_info(ecl, mask) ^ bits).count_ones()))
        .min_by_key(|&(_, _, dist)| dist)?;
    (dist <= 3).then_some((ecl, mask))
}

// Remainder of data * x^deg divided by generator over GF(2)
fn bch_remainder(data: u32, generator: u32, deg: u32) -> u32 {
    let mut rem = data << deg;
    let gen_len = 32 - generator.leading_zeros();
    while rem != 0 && 32 - rem.leading_zeros() >= gen_len {
        rem ^= generator << (32 - rem.leading_zeros() - gen_len);
    }
    rem
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

static FORMAT_INFO_GENERATOR: u32 = 0b101_0011_0111;

static FORMAT_INFO_MASK: u32 = 0b101_0100_0001_0010;

static VERSION_INFO_GENERATOR: u32 = 0b1_1111_0010_0101;

// Coordinates are (row, column) and listed from the most significant bit. Negative
// values count from the bottom or right edge.

pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];
