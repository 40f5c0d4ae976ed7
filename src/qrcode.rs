use crate::common::mask::MaskPattern;
use crate::common::metadata::*;

/// Finished QR symbol. A read-only square grid of dark (`true`) & light modules,
/// quiet zone excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QRCode {
    meta: Metadata,
    w: usize,
    modules: Vec<bool>,
}

impl QRCode {
    pub(crate) fn new(meta: Metadata, w: usize, modules: Vec<bool>) -> Self {
        debug_assert!(modules.len() == w * w, "Module count {} isn't {w}x{w}", modules.len());
        Self { meta, w, modules }
    }

    pub fn metadata(&self) -> Metadata {
        self.meta
    }

    pub fn version(&self) -> Version {
        self.meta.version()
    }

    pub fn ec_level(&self) -> ECLevel {
        self.meta.ec_level()
    }

    pub fn mask(&self) -> MaskPattern {
        self.meta.mask()
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.w
    }

    /// Whether the module at row `r`, column `c` is dark.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the symbol. Use [`QRCode::get`] for a
    /// checked lookup.
    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        assert!(r < self.w && c < self.w, "Module ({r}, {c}) is outside a {0}x{0} symbol", self.w);
        self.modules[r * self.w + c]
    }

    /// Module at row `r`, column `c`, or `None` outside the symbol.
    pub fn get(&self, r: usize, c: usize) -> Option<bool> {
        if r < self.w && c < self.w {
            Some(self.modules[r * self.w + c])
        } else {
            None
        }
    }

    /// Rows top to bottom, modules left to right.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.w)
    }

    pub fn to_bool_grid(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Decodes the main format info copy, falling back to the side copy.
    pub fn read_format_info(&self) -> Option<(ECLevel, MaskPattern)> {
        [&FORMAT_INFO_COORDS_MAIN, &FORMAT_INFO_COORDS_SIDE]
            .into_iter()
            .find_map(|coords| decode_format_info(self.read_number(coords)))
    }

    // Negative coordinates count from the bottom or right edge
    fn read_number(&self, coords: &[(i16, i16)]) -> u32 {
        let w = self.w as i16;
        coords.iter().fold(0, |acc, &(r, c)| {
            let r = if r < 0 { r + w } else { r };
            let c = if c < 0 { c + w } else { c };
            acc << 1 | self.is_dark(r as usize, c as usize) as u32
        })
    }
}
