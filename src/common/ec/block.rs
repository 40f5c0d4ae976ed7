use super::galois::GaloisField;
use crate::common::error::{QRError, QRResult};

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Block {
    // Data codewords followed by ec codewords
    data: Vec<u8>,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], ec_len: usize) -> QRResult<Self> {
        let gen_poly = GaloisField::get()
            .generator_poly(ec_len)
            .ok_or(QRError::Internal("no generator polynomial for ec length"))?;
        let dlen = raw.len();
        let mut data = Vec::with_capacity(dlen + ec_len);
        data.extend_from_slice(raw);
        data.extend(compute_ecc(raw, gen_poly));
        Ok(Self { data, dlen })
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..]
    }
}

// Remainder of data(x) * x^k divided by the generator polynomial, computed with a
// shift register. The remainder coefficients are the ec codewords.
fn compute_ecc(data: &[u8], gen_poly: &[u8]) -> Vec<u8> {
    let gf = GaloisField::get();
    let mut rem = vec![0u8; gen_poly.len()];
    for &b in data {
        let factor = b ^ rem[0];
        rem.rotate_left(1);
        if let Some(last) = rem.last_mut() {
            *last = 0;
        }
        for (r, &g) in rem.iter_mut().zip(gen_poly) {
            *r ^= gf.mul(g, factor);
        }
    }
    rem
}

#[cfg(test)]
mod block_tests {
    use super::Block;
    use crate::common::error::QRError;

    #[test]
    fn test_poly_mod_1() {
        let block = Block::new(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10).unwrap();
        assert_eq!(block.ecc(), b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let block = Block::new(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13).unwrap();
        assert_eq!(block.ecc(), b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let block = Block::new(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18).unwrap();
        assert_eq!(block.ecc(), b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_layout() {
        let raw = b"CUF\x86W&U\xc2w2\x06\x12\x06g&";
        let block = Block::new(raw, 18).unwrap();
        assert_eq!(block.data(), raw);
        assert_eq!(block.ecc().len(), 18);
        assert_eq!(block.data.len(), 33);
        assert_eq!(&block.data[15..], block.ecc());
    }

    #[test]
    fn test_all_zero_data_has_zero_ecc() {
        let block = Block::new(&[0; 19], 7).unwrap();
        assert!(block.ecc().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unknown_ec_length() {
        assert_eq!(Block::new(b"abc", 9), Err(QRError::Internal("no generator polynomial for ec length")));
    }
}
