use image::{GrayImage, Luma};

use crate::QRCode;

// Quiet zone width in modules
static QUIET_ZONE: usize = 4;

// Render
//------------------------------------------------------------------------------

impl QRCode {
    /// Grayscale raster with `module_sz` pixels per module & a light quiet zone.
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        GrayImage::from_fn(total_sz, total_sz, |j, i| {
            if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                return Luma([255]);
            }
            let r = ((i - qz_sz) / module_sz) as usize;
            let c = ((j - qz_sz) / module_sz) as usize;
            if self.is_dark(r, c) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    /// Terminal rendering for dark backgrounds: light modules print as blocks.
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;
                canvas.push(if self.is_dark(r, c) { ' ' } else { '█' });
            }
            canvas.push('\n');
        }

        canvas
    }
}
