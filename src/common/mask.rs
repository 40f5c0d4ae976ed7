use std::ops::Deref;

use log::trace;
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern(0),
        MaskPattern(1),
        MaskPattern(2),
        MaskPattern(3),
        MaskPattern(4),
        MaskPattern(5),
        MaskPattern(6),
        MaskPattern(7),
    ];

    pub fn new(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(QRError::InvalidMaskPattern(pattern)),
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Mask pattern is validated on construction"),
        }
    }
}

/// Scores all 8 masks on copies of the unmasked symbol and commits the one with the
/// lowest penalty. Ties go to the lowest pattern id.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let penalties = MaskPattern::ALL
        .par_iter()
        .map(|&m| {
            let mut candidate = qr.clone();
            candidate.apply_mask(m);
            compute_total_penalty(&candidate)
        })
        .collect::<Vec<_>>();
    trace!("Mask penalties: {penalties:?}");

    let best = penalties
        .iter()
        .enumerate()
        .min_by_key(|&(_, &p)| p)
        .map(|(i, _)| MaskPattern::ALL[i])
        .unwrap_or(MaskPattern(0));
    qr.apply_mask(best);
    best
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// N1: 3 points for a run of 5 same colored modules, 1 more for every extra module
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    let mut cols = vec![(Color::Light, 0); w as usize];
    for r in 0..w {
        let mut row = (Color::Light, 0);
        for (c, col) in cols.iter_mut().enumerate() {
            let clr = *qr.get(r, c as i16);
            pen += extend_run(&mut row, clr, c == 0);
            pen += extend_run(col, clr, r == 0);
        }
    }
    pen
}

fn extend_run(run: &mut (Color, u32), clr: Color, reset: bool) -> u32 {
    if reset || run.0 != clr {
        *run = (clr, 0);
    }
    run.1 += 1;
    match run.1 {
        5 => 3,
        n if n > 5 => 1,
        _ => 0,
    }
}

// N2: 3 points for every 2x2 block of the same color
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: 40 points for a 1:1:3:1:1 finder-like run bordered by 4 light modules on either
// side. Modules beyond the edge count as light.
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];
    for i in 0..w {
        let get = |j: i16| {
            if j < 0 || j >= w {
                Color::Light
            } else if is_hor {
                *qr.get(i, j)
            } else {
                *qr.get(j, i)
            }
        };
        for j in 0..w - 6 {
            if (j..j + 7).map(get).ne(PATTERN.iter().copied()) {
                continue;
            }
            let is_light = |x| get(x) == Color::Light;
            if (j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light) {
                pen += 40;
            }
        }
    }
    pen
}

// N4: 10 points for every full 5% the dark ratio deviates from 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let tot = w * w;
    let k = (dark_cnt * 20).abs_diff(tot * 10) / tot;
    k as u32 * 10
}
