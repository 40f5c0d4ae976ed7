use std::ops::Deref;

use crate::common::bit_utils::BitStream;
use crate::common::error::{QRError, QRResult};
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::*;
use crate::qrcode::QRCode;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

/// Module matrix under construction.
#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    #[cfg(test)]
    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count from the bottom or right edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 pattern centered at (r, c) along with its separator
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Skip the three corners occupied by finder patterns
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_alignment_pattern_1() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_alignment_patterns();
        assert_eq!(qr.count_dark_modules(), 0);
    }

    #[test]
    fn test_alignment_pattern_2() {
        let mut qr = QR::new(Version::new(2).unwrap(), ECLevel::L);
        qr.draw_alignment_patterns();
        // Single pattern centered at (18, 18)
        assert_eq!(qr.count_dark_modules(), 17);
        assert_eq!(qr.get(18, 18), Module::Func(Color::Dark));
        assert_eq!(qr.get(17, 18), Module::Func(Color::Light));
        assert_eq!(qr.get(16, 16), Module::Func(Color::Dark));
        assert_eq!(qr.get(15, 15), Module::Empty);
    }

    #[test]
    fn test_alignment_pattern_7() {
        let mut qr = QR::new(Version::new(7).unwrap(), ECLevel::L);
        qr.draw_alignment_patterns();
        // 3x3 grid minus the finder corners
        assert_eq!(qr.count_dark_modules(), 6 * 17);
        assert_eq!(qr.get(6, 6), Module::Empty);
        assert_eq!(qr.get(6, 22), Module::Func(Color::Dark));
        assert_eq!(qr.get(38, 38), Module::Func(Color::Dark));
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        for coords in [&FORMAT_INFO_COORDS_MAIN, &FORMAT_INFO_COORDS_SIDE] {
            self.draw_number(
                format_info,
                FORMAT_INFO_BIT_LEN,
                Module::Format(Color::Light),
                Module::Format(Color::Dark),
                coords,
            );
        }
    }

    fn draw_version_info(&mut self) {
        let Some(ver_info) = self.ver.info() else {
            return;
        };
        for coords in [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR] {
            self.draw_number(
                ver_info,
                VERSION_INFO_BIT_LEN,
                Module::Version(Color::Light),
                Module::Version(Color::Dark),
                coords,
            );
        }
    }

    fn draw_dark_module(&mut self) {
        self.set(-8, 8, Module::Func(Color::Dark));
    }

    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    /// Draws finder, timing & alignment patterns, reserves the format area and writes
    /// the version info & dark module. Only modules left `Empty` carry data.
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_dark_module();
    }
}

#[cfg(test)]
mod all_function_patterns_test {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffFm....Ffffffff\n\
             fFFFFFfFm....FfFFFFFf\n\
             fFfffFfFm....FfFfffFf\n\
             fFfffFfFm....FfFfffFf\n\
             fFfffFfFm....FfFfffFf\n\
             fFFFFFfFm....FfFFFFFf\n\
             fffffffFfFfFfFfffffff\n\
             FFFFFFFFm....FFFFFFFF\n\
             mmmmmmfmm....mmmmmmmm\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             FFFFFFFFf............\n\
             fffffffFm............\n\
             fFFFFFfFm............\n\
             fFfffFfFm............\n\
             fFfffFfFm............\n\
             fFfffFfFm............\n\
             fFFFFFfFm............\n\
             fffffffFm............\n"
        );
    }

    #[test]
    fn test_empty_modules_match_codewords() {
        for v in 1..=40 {
            let ver = Version::new(v).unwrap();
            let mut qr = QR::new(ver, ECLevel::L);
            qr.draw_all_function_patterns();
            let empty = qr.grid.iter().filter(|m| matches!(m, Module::Empty)).count();
            assert_eq!(empty, ver.total_codewords() * 8 + ver.remainder_bits(), "Version {v}");
        }
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Places the payload bits MSB first into the empty modules in zigzag order. The
    /// modules left over must match the remainder bits of the version; they stay light.
    pub fn draw_payload(&mut self, payload: BitStream) -> QRResult<()> {
        let mut bits = payload;
        let mut remainder = 0;
        for (r, c) in EncRegionIter::new(self.ver) {
            if !matches!(self.get(r, c), Module::Empty) {
                continue;
            }
            match bits.next() {
                Some(bit) => self.set(r, c, Module::Data(Color::from(bit))),
                None => {
                    self.set(r, c, Module::Data(Color::Light));
                    remainder += 1;
                }
            }
        }

        if bits.next().is_some() {
            return Err(QRError::Internal("payload exceeds encoding region"));
        }
        if remainder != self.ver.remainder_bits() {
            return Err(QRError::Internal("remainder modules do not match version"));
        }
        Ok(())
    }

    /// XORs the mask into data modules and writes the matching format info.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = format_info(self.ecl, pattern);
        self.draw_format_info(format_info);
    }

    /// Freezes the matrix into an immutable symbol.
    pub fn into_qrcode(self) -> QRResult<QRCode> {
        let mask = self.mask.ok_or(QRError::Internal("symbol finished without a mask"))?;
        if self.grid.contains(&Module::Empty) {
            return Err(QRError::Internal("empty module left in finished symbol"));
        }
        let modules = self.grid.iter().map(|m| **m == Color::Dark).collect();
        Ok(QRCode::new(Metadata::new(self.ver, self.ecl, mask), self.w, modules))
    }
}
