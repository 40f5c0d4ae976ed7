pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use std::mem::swap;

    use log::debug;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, MODES};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    /// Segmentation choices for [`encode`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EncodeOptions {
        pub min_version: Version,
        pub max_version: Version,
        // Forced mode, narrowest covering mode when absent
        pub mode: Option<Mode>,
        pub optimize: bool,
    }

    impl Default for EncodeOptions {
        fn default() -> Self {
            Self { min_version: Version::MIN, max_version: Version::MAX, mode: None, optimize: false }
        }
    }

    /// Encodes data into a padded bit stream filling the data capacity of the smallest
    /// version in range that fits.
    pub fn encode(
        data: &[u8],
        ecl: ECLevel,
        opts: &EncodeOptions,
    ) -> QRResult<(BitStream, Version)> {
        if opts.min_version > opts.max_version {
            return Err(QRError::InvalidVersionRange {
                min: *opts.min_version,
                max: *opts.max_version,
            });
        }

        let mode = match opts.mode {
            Some(m) => {
                m.validate(data)?;
                m
            }
            None => Mode::narrowest(data),
        };
        // A forced mode pins a single segment
        let optimize = opts.optimize && opts.mode.is_none() && !data.is_empty();

        let (ver, segs) =
            find_version_and_segments(data, ecl, opts.min_version, opts.max_version, mode, optimize)?;
        debug!(
            "Selected version {ver} with {} segment(s): {:?}",
            segs.len(),
            segs.iter().map(|s| (s.mode, s.data.len())).collect::<Vec<_>>()
        );

        Ok((write_segments(segs, ver.data_bit_capacity(ecl)), ver))
    }

    fn write_segments(segs: Vec<Segment<'_>>, bit_capacity: usize) -> BitStream {
        let mut bs = BitStream::new(bit_capacity);
        for seg in segs {
            push_segment(seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        bs
    }

    fn find_version_and_segments(
        data: &[u8],
        ecl: ECLevel,
        min_ver: Version,
        max_ver: Version,
        mode: Mode,
        optimize: bool,
    ) -> QRResult<(Version, Vec<Segment<'_>>)> {
        let mut segs = vec![];
        for v in *min_ver..=*max_ver {
            let ver = Version::new_unchecked(v);
            // Segments only change with the char count indicator width
            if v == *min_ver || v == 10 || v == 27 {
                segs = compute_segments(data, ver, mode, optimize);
            }
            if fits(&segs, ver, ecl) {
                return Ok((ver, segs));
            }
        }
        Err(QRError::CapacityExceeded {
            required: total_bit_len(&segs),
            capacity: max_ver.data_bit_capacity(ecl),
        })
    }

    fn compute_segments(data: &[u8], ver: Version, mode: Mode, optimize: bool) -> Vec<Segment<'_>> {
        let single = vec![Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data)];
        if !optimize {
            return single;
        }
        let optimal = compute_optimal_segments(data, ver);
        if total_bit_len(&optimal) < total_bit_len(&single) {
            optimal
        } else {
            single
        }
    }

    // Single mode is checked against the char capacity table, mixed segments on bits
    fn fits(segs: &[Segment], ver: Version, ecl: ECLevel) -> bool {
        match segs {
            [seg] => seg.data.len() <= ver.char_capacity(ecl, seg.mode),
            _ => {
                segs.iter().all(|s| s.data.len() < 1 << s.len_bits)
                    && total_bit_len(segs) <= ver.data_bit_capacity(ecl)
            }
        }
    }

    fn total_bit_len(segs: &[Segment]) -> usize {
        segs.iter().map(|s| s.bit_len()).sum()
    }

    // Dynamic programming to compute optimum mode segments. Costs are in 1/6 bits
    fn compute_optimal_segments(data: &[u8], ver: Version) -> Vec<Segment<'_>> {
        debug_assert!(!data.is_empty(), "Empty data");

        let len = data.len();
        let mut prev_cost = [0usize; 3];
        MODES.iter().enumerate().for_each(|(i, &m)| prev_cost[i] = (4 + ver.char_cnt_bits(m)) * 6);
        let mut cur_cost = [usize::MAX; 3];
        let mut min_path = vec![[usize::MAX; 3]; len];
        for (i, b) in data.iter().enumerate() {
            for (j, to_mode) in MODES.iter().enumerate() {
                if !to_mode.contains(*b) {
                    continue;
                }
                let encoded_char_size = match to_mode {
                    Mode::Numeric => 20,
                    Mode::Alphanumeric => 33,
                    Mode::Byte => 48,
                };
                for (k, from_mode) in MODES.iter().enumerate() {
                    if prev_cost[k] == usize::MAX {
                        continue;
                    }
                    let mut cost = 0;
                    if to_mode != from_mode {
                        cost += prev_cost[k].div_ceil(6) * 6;
                        cost += (4 + ver.char_cnt_bits(*to_mode)) * 6;
                    } else {
                        cost += prev_cost[k];
                    }
                    cost += encoded_char_size;
                    if cost < cur_cost[j] {
                        cur_cost[j] = cost;
                        min_path[i][j] = k;
                    }
                }
            }
            swap(&mut prev_cost, &mut cur_cost);
            cur_cost.fill(usize::MAX);
        }

        let char_modes = trace_optimal_modes(min_path, prev_cost);
        build_segments(ver, char_modes, data)
    }

    // Backtrack min_path and identify optimal char mode
    fn trace_optimal_modes(min_path: Vec<[usize; 3]>, prev_cost: [usize; 3]) -> Vec<Mode> {
        let len = min_path.len();
        let mut mode_index = 0;
        for i in 1..3 {
            if prev_cost[i] < prev_cost[mode_index] {
                mode_index = i;
            }
        }
        let mut char_modes = (0..len)
            .rev()
            .scan(mode_index, |mi, i| {
                let old_mi = *mi;
                *mi = min_path[i][*mi];
                Some(MODES[old_mi])
            })
            .collect::<Vec<_>>();
        char_modes.reverse();
        char_modes
    }

    // Group consecutive chars of the same mode into segments
    fn build_segments(ver: Version, char_modes: Vec<Mode>, data: &[u8]) -> Vec<Segment<'_>> {
        let mode_bits = ver.mode_bits();
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        for i in 1..=char_modes.len() {
            if i == char_modes.len() || char_modes[i] != char_modes[seg_start] {
                let seg_mode = char_modes[seg_start];
                let len_bits = ver.char_cnt_bits(seg_mode);
                segs.push(Segment::new(seg_mode, mode_bits, len_bits, &data[seg_start..i]));
                seg_start = i;
            }
        }
        segs
    }

    #[cfg(test)]
    mod encode_tests {
        use test_case::test_case;

        use super::{
            build_segments, compute_optimal_segments, encode, find_version_and_segments,
            EncodeOptions, ECLevel, Mode, Segment, Version, MODES,
        };
        use crate::common::error::QRError;

        fn ver(v: usize) -> Version {
            Version::new(v).unwrap()
        }

        #[test]
        fn test_build_segments() {
            let data = "aaaaa11111AAA";
            let ver = ver(1);
            let mode_bits = ver.mode_bits();
            let mut char_modes = vec![Mode::Alphanumeric; 5];
            char_modes.extend([Mode::Numeric; 5]);
            char_modes.extend([Mode::Byte; 3]);
            let segs = build_segments(ver, char_modes, data.as_bytes());
            let seg_1 = Segment::new(
                Mode::Alphanumeric,
                mode_bits,
                ver.char_cnt_bits(Mode::Alphanumeric),
                data[0..5].as_bytes(),
            );
            let seg_2 = Segment::new(
                Mode::Numeric,
                mode_bits,
                ver.char_cnt_bits(Mode::Numeric),
                data[5..10].as_bytes(),
            );
            let seg_3 = Segment::new(
                Mode::Byte,
                mode_bits,
                ver.char_cnt_bits(Mode::Byte),
                data[10..].as_bytes(),
            );
            assert_eq!(segs, vec![seg_1, seg_2, seg_3]);
        }

        #[test_case("1111111".to_string(), 1, vec![(Mode::Numeric, 0, None)])]
        #[test_case("AAAAA".to_string(), 1, vec![(Mode::Alphanumeric, 0, None)])]
        #[test_case("aaaaa".to_string(), 1, vec![(Mode::Byte, 0, None)])]
        #[test_case("1111111AAAA".to_string(), 1, vec![(Mode::Numeric, 0, Some(7)), (Mode::Alphanumeric, 7, None)])]
        #[test_case("111111AAAA".to_string(), 1, vec![(Mode::Alphanumeric, 0,None)])]
        #[test_case("aaa11111a".to_string(), 1, vec![(Mode::Byte, 0, None)])]
        #[test_case("aaa111111a".to_string(), 1, vec![(Mode::Byte, 0, Some(3)), (Mode::Numeric, 3, Some(9)), (Mode::Byte, 9, None)])]
        #[test_case("aaa1111A".to_string(), 1, vec![(Mode::Byte, 0, None)])]
        #[test_case("aaa1111AA".to_string(), 1, vec![(Mode::Byte, 0, Some(3)), (Mode::Alphanumeric, 3, None)])]
        #[test_case("aaa1111111AA".to_string(), 1, vec![(Mode::Byte, 0, Some(3)), (Mode::Numeric, 3, Some(10)), (Mode::Alphanumeric, 10, None)])]
        #[test_case(("A11111111111111".repeat(23) + "A").to_string(), 10, vec![(Mode::Alphanumeric, 0, None)])]
        fn test_compute_optimal_segments(
            data: String,
            v: usize,
            chunks: Vec<(Mode, usize, Option<usize>)>,
        ) {
            let ver = ver(v);
            let mode_bits = ver.mode_bits();
            let segs = compute_optimal_segments(data.as_bytes(), ver);
            assert_eq!(segs.len(), chunks.len());
            for (seg, &(mode, start, end)) in segs.iter().zip(chunks.iter()) {
                let len_bits = ver.char_cnt_bits(mode);
                let exp_seg = match end {
                    Some(e) => Segment::new(mode, mode_bits, len_bits, data[start..e].as_bytes()),
                    None => Segment::new(mode, mode_bits, len_bits, data[start..].as_bytes()),
                };
                assert_eq!(*seg, exp_seg);
            }
        }

        #[test]
        fn test_every_capacity_boundary() {
            let opts = EncodeOptions::default();
            for mode in MODES {
                let ch = match mode {
                    Mode::Numeric => "1",
                    Mode::Alphanumeric => "A",
                    Mode::Byte => "a",
                };
                for ecl in ECLevel::ALL {
                    for v in 1..=40 {
                        let max = ver(v).char_capacity(ecl, mode);
                        let (_, fitted) = encode(ch.repeat(max).as_bytes(), ecl, &opts).unwrap();
                        assert_eq!(*fitted, v, "{max} {mode:?} chars at {ecl:?}");
                        match encode(ch.repeat(max + 1).as_bytes(), ecl, &opts) {
                            Ok((_, next)) => {
                                assert_eq!(*next, v + 1, "{} {mode:?} chars at {ecl:?}", max + 1)
                            }
                            Err(QRError::CapacityExceeded { .. }) => assert_eq!(v, 40),
                            Err(e) => panic!("Unexpected error {e:?} past version {v} {ecl:?}"),
                        }
                    }
                }
            }
        }

        #[test]
        fn test_compute_optimal_segments_alternating() {
            let data = "A11111111111111".repeat(23);
            let ver = ver(9);
            let mode_bits = ver.mode_bits();
            let segs = compute_optimal_segments(data.as_bytes(), ver);
            assert_eq!(segs.len(), 46);
            for (i, c) in data.as_bytes().chunks(15).enumerate() {
                let seg_1 = Segment::new(
                    Mode::Alphanumeric,
                    mode_bits,
                    ver.char_cnt_bits(Mode::Alphanumeric),
                    &c[..1],
                );
                assert_eq!(segs[i * 2], seg_1);
                let seg_2 = Segment::new(
                    Mode::Numeric,
                    mode_bits,
                    ver.char_cnt_bits(Mode::Numeric),
                    &c[1..],
                );
                assert_eq!(segs[i * 2 + 1], seg_2);
            }
        }

        #[test_case("aaaaa11111AAA".to_string(), 1, ECLevel::L)]
        #[test_case("A11111111111111".repeat(2).to_string(), 2, ECLevel::L)]
        #[test_case("A11111111111111".repeat(4).to_string(), 3, ECLevel::L)]
        #[test_case("aAAAAAAAAAAA".repeat(5).to_string(), 4, ECLevel::L)]
        #[test_case("aAAAAAAAAAAA".repeat(21).to_string(), 10, ECLevel::L)]
        #[test_case("a".repeat(2953).to_string(), 40, ECLevel::L)]
        #[test_case("1".repeat(41).to_string(), 1, ECLevel::L)]
        #[test_case("1".repeat(42).to_string(), 2, ECLevel::L)]
        #[test_case("a".repeat(14).to_string(), 2, ECLevel::H)]
        #[test_case("a".repeat(15).to_string(), 3, ECLevel::H)]
        fn test_find_version(data: String, exp_ver: usize, ecl: ECLevel) {
            let mode = Mode::narrowest(data.as_bytes());
            let (ver, _) = find_version_and_segments(
                data.as_bytes(),
                ecl,
                Version::MIN,
                Version::MAX,
                mode,
                false,
            )
            .unwrap();
            assert_eq!(*ver, exp_ver);
        }

        #[test]
        fn test_find_version_overflow() {
            let data = "a".repeat(2954);
            let res = find_version_and_segments(
                data.as_bytes(),
                ECLevel::L,
                Version::MIN,
                Version::MAX,
                Mode::Byte,
                false,
            );
            assert_eq!(res, Err(QRError::CapacityExceeded { required: 23652, capacity: 23648 }));
        }

        #[test]
        fn test_encode_fills_capacity() {
            for ecl in ECLevel::ALL {
                let (bs, ver) = encode(b"HELLO WORLD", ecl, &EncodeOptions::default()).unwrap();
                assert_eq!(bs.len(), ver.data_bit_capacity(ecl));
            }
        }

        #[test]
        fn test_encode_hello_world_1m() {
            let (bs, ver) = encode(b"HELLO WORLD", ECLevel::M, &EncodeOptions::default()).unwrap();
            assert_eq!(*ver, 1);
            assert_eq!(bs.data(), b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11");
        }

        #[test]
        fn test_encode_empty() {
            let (bs, ver) = encode(b"", ECLevel::H, &EncodeOptions::default()).unwrap();
            assert_eq!(*ver, 1);
            assert_eq!(bs.data()[..3], [0b0001_0000, 0b0000_0000, 0b0000_0000]);
            assert_eq!(bs.data()[3..5], [0xEC, 0x11]);
        }

        #[test]
        fn test_encode_min_version() {
            let opts = EncodeOptions { min_version: ver(5), ..Default::default() };
            let (_, v) = encode(b"1234", ECLevel::L, &opts).unwrap();
            assert_eq!(*v, 5);
        }

        #[test]
        fn test_encode_capped_version_overflow() {
            let opts = EncodeOptions { max_version: ver(2), ..Default::default() };
            let res = encode("a".repeat(15).as_bytes(), ECLevel::H, &opts);
            assert_eq!(res.err(), Some(QRError::CapacityExceeded { required: 132, capacity: 128 }));
        }

        #[test]
        fn test_encode_invalid_range() {
            let opts = EncodeOptions { min_version: ver(5), max_version: ver(3), ..Default::default() };
            let res = encode(b"1", ECLevel::L, &opts);
            assert_eq!(res.err(), Some(QRError::InvalidVersionRange { min: 5, max: 3 }));
        }

        #[test]
        fn test_encode_forced_mode() {
            let opts = EncodeOptions { mode: Some(Mode::Byte), ..Default::default() };
            let (bs, _) = encode(b"123", ECLevel::L, &opts).unwrap();
            assert_eq!(bs.data()[0] >> 4, Mode::Byte as u8);

            let opts = EncodeOptions { mode: Some(Mode::Alphanumeric), ..Default::default() };
            let res = encode(b"AB-c", ECLevel::L, &opts);
            assert_eq!(
                res.err(),
                Some(QRError::UnsupportedCharacter { mode: Mode::Alphanumeric, index: 3, byte: b'c' })
            );
        }

        #[test]
        fn test_optimize_never_grows() {
            let data = "aaa1111111111111111111111111AA";
            let plain = EncodeOptions::default();
            let optimized = EncodeOptions { optimize: true, ..Default::default() };
            let (_, v1) = encode(data.as_bytes(), ECLevel::H, &plain).unwrap();
            let (_, v2) = encode(data.as_bytes(), ECLevel::H, &optimized).unwrap();
            assert!(v2 <= v1);
            let (_, v1) = encode(b"HELLO", ECLevel::H, &plain).unwrap();
            let (_, v2) = encode(b"HELLO", ECLevel::H, &optimized).unwrap();
            assert_eq!(v1, v2);
        }
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            let data = Mode::Numeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0_u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0_u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
