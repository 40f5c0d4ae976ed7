use crate::common::error::{QRError, QRResult};

// Mode
//------------------------------------------------------------------------------

// Declaration order follows density, so the derived ordering ranks the
// narrowest mode lowest
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    /// Bit length of `len` characters encoded in this mode, excluding the header.
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
        }
    }

    /// Largest character count whose encoding fits in `bits`.
    pub fn max_chars(&self, bits: usize) -> usize {
        match *self {
            Self::Numeric => {
                let tail = match bits % 10 {
                    7..=9 => 2,
                    4..=6 => 1,
                    _ => 0,
                };
                bits / 10 * 3 + tail
            }
            Self::Alphanumeric => bits / 11 * 2 + usize::from(bits % 11 >= 6),
            Self::Byte => bits / 8,
        }
    }

    /// Narrowest mode able to represent every byte of `data`.
    pub fn narrowest(data: &[u8]) -> Self {
        MODES
            .iter()
            .copied()
            .find(|m| data.iter().all(|&b| m.contains(b)))
            .unwrap_or(Self::Byte)
    }

    /// Fails on the first byte the mode cannot represent.
    pub fn validate(&self, data: &[u8]) -> QRResult<()> {
        match data.iter().position(|&b| !self.contains(b)) {
            Some(index) => {
                Err(QRError::UnsupportedCharacter { mode: *self, index, byte: data[index] })
            }
            None => Ok(()),
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub mode: Mode,
    pub mode_bits: usize, // Bit len of mode
    pub len_bits: usize,  // Bit len of char count
    pub data: &'a [u8],   // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}

#[cfg(test)]
mod segment_tests {
    use test_case::test_case;

    use super::{Mode, Segment};
    use crate::common::metadata::Version;

    #[test_case(1, Mode::Numeric, "123", 24)]
    #[test_case(1, Mode::Numeric, "45", 21)]
    #[test_case(1, Mode::Numeric, "6", 18)]
    #[test_case(10, Mode::Numeric, "123", 26)]
    #[test_case(10, Mode::Numeric, "6", 20)]
    #[test_case(27, Mode::Numeric, "45", 25)]
    #[test_case(27, Mode::Numeric, "6", 22)]
    #[test_case(1, Mode::Alphanumeric, "AZ", 24)]
    #[test_case(1, Mode::Alphanumeric, "-", 19)]
    #[test_case(10, Mode::Alphanumeric, "AZ", 26)]
    #[test_case(27, Mode::Alphanumeric, "-", 23)]
    #[test_case(1, Mode::Byte, "a", 20)]
    #[test_case(10, Mode::Byte, "ab", 36)]
    #[test_case(27, Mode::Byte, "abc", 44)]
    #[test_case(1, Mode::Numeric, "", 14)]
    fn test_bit_len(v: usize, mode: Mode, data: &str, exp: usize) {
        let ver = Version::new(v).unwrap();
        let seg = Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data.as_bytes());
        assert_eq!(seg.bit_len(), exp);
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

pub static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
