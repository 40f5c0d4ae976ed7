mod qr;

#[cfg(test)]
pub(crate) use qr::Module;
pub(crate) use qr::QR;

use std::ops::Deref;

use log::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, EncodeOptions, Mode},
    ec::ecc,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};
use crate::qrcode::QRCode;

/// Configures and builds a [`QRCode`]. Defaults to level M, any version, automatic
/// mode & mask, without segment optimization.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: &'a [u8],
    ec_level: ECLevel,
    min_version: Version,
    max_version: Version,
    mode: Option<Mode>,
    optimize: bool,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            ec_level: ECLevel::M,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mode: None,
            optimize: false,
            mask: None,
        }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    /// Pins the symbol to exactly this version.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self.max_version = version;
        self
    }

    /// Lowest version the search may pick.
    pub fn min_version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.min_version = Version::MIN;
        self.max_version = Version::MAX;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Encodes the whole payload in `mode`. Bytes outside the mode's set fail the build.
    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    /// Splits the payload into mixed-mode segments when that shortens the bit stream.
    pub fn optimize(&mut self, optimize: bool) -> &mut Self {
        self.optimize = optimize;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        let version = if self.min_version == self.max_version {
            format!("{}", self.min_version)
        } else {
            format!("{}..={}", self.min_version, self.max_version)
        };
        let mode = match self.mode {
            Some(m) => format!("{m:?}"),
            None => "Auto".to_string(),
        };
        format!("{{ Version: {version}, Ec level: {:?}, Mode: {mode} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QRCode> {
        debug!("Generating QR {}...", self.metadata());

        let opts = EncodeOptions {
            min_version: self.min_version,
            max_version: self.max_version,
            mode: self.mode,
            optimize: self.optimize,
        };
        let (encoded_data, version) = encode(self.data, self.ec_level, &opts)?;

        let total_codewords = version.total_codewords();
        let data_codewords = version.data_codewords(self.ec_level);
        if encoded_data.len() != data_codewords << 3 {
            return Err(QRError::Internal("encoded data does not fill data capacity"));
        }

        // Compute error correction codewords
        let blocks = ecc(encoded_data.data(), version, self.ec_level)?;
        debug!(
            "Split {data_codewords} data codewords into {} blocks with {} ec codewords each",
            blocks.len(),
            version.ecc_per_block(self.ec_level)
        );

        // Interleave data & error correction codewords, and store in payload
        let data_blocks = blocks.iter().map(|b| b.data()).collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();
        let mut payload = BitStream::new(total_codewords << 3);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_payload(payload)?;

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        let total_modules = version.width() * version.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            "Version {version}, mask {}: data capacity {data_codewords}, error capacity {}, \
             payload {} bytes, dark {dark_modules}, light {}, balance {}%",
            *mask,
            Self::ec_capacity(version, self.ec_level),
            self.data.len(),
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );

        qr.into_qrcode()
    }

    /// Number of erroneous codewords the symbol recovers, net of misdecode protection.
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        let p = match (*version, ec_level) {
            (1, ECLevel::L) => 3,
            (1, ECLevel::M) | (2, ECLevel::L) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };

        let ec_bytes = version.block_count(ec_level) * version.ecc_per_block(ec_level);
        (ec_bytes - p) / 2
    }

    /// Column-major read over blocks: the i-th codeword of every block that has one.
    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
