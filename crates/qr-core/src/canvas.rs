//! Module grid construction: function-pattern placement, the zig-zag
//! data/EC traversal, masking, and format/version embedding.
//!
//! The canvas is a scoped builder: built with function patterns and
//! placeholders, filled with data/EC bits, masked, then frozen into a plain
//! `Vec<bool>` module grid for the `QrCode` / decoder to consume.

use crate::alignment::alignment_pattern_positions;
use crate::binary_codes::{format_code, version_code};
use crate::bit_buffer::get_bit;
use crate::code_ecc::CodeEcc;
use crate::finder_penalty::FinderPenalty;
use crate::mask::Mask;
use crate::version::Version;
use crate::{PENALTY_N1, PENALTY_N2, PENALTY_N3, PENALTY_N4};

/// What role a module plays. Only `Data` and `Ec` are subject to masking.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ModuleKind {
    Quiet,
    Finder,
    Separator,
    Timing,
    Alignment,
    Format,
    Version,
    Data,
    Ec,
    Indeterminate,
}

impl ModuleKind {
    fn is_maskable(self) -> bool {
        matches!(self, ModuleKind::Data | ModuleKind::Ec)
    }
}

pub struct Canvas {
    version: Version,
    size: i32,
    kind: Vec<ModuleKind>,
    bit: Vec<bool>,
}

impl Canvas {
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let n = (size * size) as usize;
        Canvas {
            version,
            size,
            kind: vec![ModuleKind::Indeterminate; n],
            bit: vec![false; n],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y)
    }

    pub fn kind_at(&self, x: i32, y: i32) -> ModuleKind {
        self.kind[self.idx(x, y)]
    }

    pub fn bit_at(&self, x: i32, y: i32) -> bool {
        self.bit[self.idx(x, y)]
    }

    fn set(&mut self, x: i32, y: i32, kind: ModuleKind, bit: bool) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.idx(x, y);
        self.kind[i] = kind;
        self.bit[i] = bit;
    }

    fn set_if_indeterminate(&mut self, x: i32, y: i32, kind: ModuleKind, bit: bool) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.idx(x, y);
        if self.kind[i] == ModuleKind::Indeterminate {
            self.kind[i] = kind;
            self.bit[i] = bit;
        }
    }

    /// Builds all function patterns and placeholders (quiet zone, finders,
    /// separators, timing, alignment, format/version regions), leaving every
    /// remaining module `Indeterminate`.
    pub fn build_function_patterns(&mut self) {
        // 4. Timing patterns (drawn first so finders/alignment can overwrite
        // the cells where they legitimately coincide with a timing line).
        for i in 0..self.size {
            self.set_if_indeterminate(6, i, ModuleKind::Timing, i % 2 == 0);
            self.set_if_indeterminate(i, 6, ModuleKind::Timing, i % 2 == 0);
        }

        // 2+3. Finder patterns and their separators (9x9 footprint each).
        self.draw_finder(3, 3);
        self.draw_finder(self.size - 4, 3);
        self.draw_finder(3, self.size - 4);

        // 5. Alignment patterns, skipping the three finder-corner combinations.
        let positions = alignment_pattern_positions(self.version);
        let numalign = positions.len();
        for (i, &px) in positions.iter().enumerate() {
            for (j, &py) in positions.iter().enumerate() {
                let is_corner = (i == 0 && j == 0)
                    || (i == 0 && j == numalign - 1)
                    || (i == numalign - 1 && j == 0);
                if !is_corner {
                    self.draw_alignment(px, py);
                }
            }
        }

        // 6. Format placeholders (dummy content; overwritten after mask choice)
        // plus the fixed dark module.
        self.draw_format_bits_with_kind(Mask::new(0), CodeEcc::Low, ModuleKind::Format);

        // 7. Version placeholders, v >= 7 only.
        self.draw_version_with_kind(ModuleKind::Version);
    }

    fn draw_finder(&mut self, cx: i32, cy: i32) {
        for dy in -4..=4i32 {
            for dx in -4..=4i32 {
                let dist = dx.abs().max(dy.abs());
                let (kind, bit) = if dist == 4 {
                    (ModuleKind::Separator, false)
                } else {
                    (ModuleKind::Finder, dist != 2)
                };
                self.set(cx + dx, cy + dy, kind, bit);
            }
        }
    }

    fn draw_alignment(&mut self, cx: i32, cy: i32) {
        for dy in -2..=2i32 {
            for dx in -2..=2i32 {
                let dist = dx.abs().max(dy.abs());
                self.set(cx + dx, cy + dy, ModuleKind::Alignment, dist != 1);
            }
        }
    }

    fn draw_format_bits_with_kind(&mut self, mask: Mask, level: CodeEcc, kind: ModuleKind) {
        let data = u32::from(level.format_bits()) << 3 | u32::from(mask.value());
        let bits = format_code(data);

        for i in 0..6 {
            self.set(8, i, kind, get_bit(bits, i));
        }
        self.set(8, 7, kind, get_bit(bits, 6));
        self.set(8, 8, kind, get_bit(bits, 7));
        self.set(7, 8, kind, get_bit(bits, 8));
        for i in 9..15 {
            self.set(14 - i, 8, kind, get_bit(bits, i));
        }

        let size = self.size;
        for i in 0..8 {
            self.set(size - 1 - i, 8, kind, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set(8, size - 15 + i, kind, get_bit(bits, i));
        }
        self.set(8, size - 8, kind, true); // fixed dark module
    }

    /// Public re-embedding after the mask has been chosen.
    pub fn draw_format_bits(&mut self, mask: Mask, level: CodeEcc) {
        self.draw_format_bits_with_kind(mask, level, ModuleKind::Format);
    }

    fn draw_version_with_kind(&mut self, kind: ModuleKind) {
        if self.version.value() < 7 {
            return;
        }
        let bits = version_code(u32::from(self.version.value()));
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set(a, b, kind, bit);
            self.set(b, a, kind, bit);
        }
    }

    /// Enumerates the `Indeterminate` module positions in the standard
    /// zig-zag column-pair traversal order, without mutating them. Used to
    /// both size and drive data/EC placement and, on the decode side, to
    /// read bits back in the same order.
    pub fn traversal_positions(&self) -> Vec<(i32, i32)> {
        let mut result = Vec::new();
        let mut right = self.size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..self.size {
                for j in 0..2 {
                    let x = right - j;
                    let upward = (right + 1) & 2 == 0;
                    let y = if upward { self.size - 1 - vert } else { vert };
                    if self.kind_at(x, y) == ModuleKind::Indeterminate {
                        result.push((x, y));
                    }
                }
            }
            right -= 2;
        }
        result
    }

    /// Writes `codewords` MSB-first into the traversal positions, tagging
    /// the first `data_codewords` worth of bits `Data` and the rest `Ec`
    /// (including any trailing remainder bits, which are left `false`).
    pub fn place_codewords(&mut self, codewords: &[u8], data_codewords: usize) {
        let positions = self.traversal_positions();
        let total_bits = codewords.len() * 8;
        let data_bits = data_codewords * 8;
        for (bit_index, &(x, y)) in positions.iter().enumerate() {
            let (kind, bit) = if bit_index < total_bits {
                let byte = codewords[bit_index >> 3];
                let bit = get_bit(u32::from(byte), 7 - (bit_index as i32 & 7));
                (
                    if bit_index < data_bits {
                        ModuleKind::Data
                    } else {
                        ModuleKind::Ec
                    },
                    bit,
                )
            } else {
                (ModuleKind::Ec, false)
            };
            self.set(x, y, kind, bit);
        }
    }

    /// Reads the traversal positions back into a flat bit vector (decode side).
    pub fn read_codeword_bits(&self) -> Vec<bool> {
        self.traversal_positions()
            .into_iter()
            .map(|(x, y)| self.bit_at(x, y))
            .collect()
    }

    /// XORs every `Data`/`Ec` module with `mask`'s predicate. Calling this
    /// twice with the same mask undoes it (XOR is its own inverse).
    pub fn apply_mask(&mut self, mask: Mask) {
        let size = self.size;
        for y in 0..size {
            for x in 0..size {
                let i = self.idx(x, y);
                if self.kind[i].is_maskable() && mask.invert_at(y, x) {
                    self.bit[i] = !self.bit[i];
                }
            }
        }
    }

    /// ISO/IEC 18004 penalty score (rules 1-4), used to select the best of
    /// the 8 masks. Scored with format/version placeholders left blank (the
    /// standard-compliant interpretation).
    pub fn penalty_score(&self) -> i32 {
        let mut result = 0i32;
        let size = self.size;

        for y in 0..size {
            let mut runcolor = false;
            let mut runx = 0i32;
            let mut history = FinderPenalty::new(size);
            for x in 0..size {
                let m = self.bit_at(x, y);
                if m == runcolor {
                    runx += 1;
                    if runx == 5 {
                        result += PENALTY_N1;
                    } else if runx > 5 {
                        result += 1;
                    }
                } else {
                    history.add_history(runx);
                    if !runcolor {
                        result += history.count_patterns() * PENALTY_N3;
                    }
                    runcolor = m;
                    runx = 1;
                }
            }
            result += history.terminate_and_count(runcolor, runx) * PENALTY_N3;
        }

        for x in 0..size {
            let mut runcolor = false;
            let mut runy = 0i32;
            let mut history = FinderPenalty::new(size);
            for y in 0..size {
                let m = self.bit_at(x, y);
                if m == runcolor {
                    runy += 1;
                    if runy == 5 {
                        result += PENALTY_N1;
                    } else if runy > 5 {
                        result += 1;
                    }
                } else {
                    history.add_history(runy);
                    if !runcolor {
                        result += history.count_patterns() * PENALTY_N3;
                    }
                    runcolor = m;
                    runy = 1;
                }
            }
            result += history.terminate_and_count(runcolor, runy) * PENALTY_N3;
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let c = self.bit_at(x, y);
                if c == self.bit_at(x + 1, y)
                    && c == self.bit_at(x, y + 1)
                    && c == self.bit_at(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let dark: i32 = self.bit.iter().copied().map(i32::from).sum();
        let total = size * size;
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }

    /// Flattens into a plain module grid, optionally padded with a light
    /// quiet zone of the given width on every side.
    pub fn freeze(&self, quiet_zone_width: i32) -> (i32, Vec<bool>) {
        let out_size = self.size + 2 * quiet_zone_width;
        let mut out = vec![false; (out_size * out_size) as usize];
        for y in 0..self.size {
            for x in 0..self.size {
                let ox = x + quiet_zone_width;
                let oy = y + quiet_zone_width;
                out[(oy * out_size + ox) as usize] = self.bit_at(x, y);
            }
        }
        (out_size, out)
    }
}
