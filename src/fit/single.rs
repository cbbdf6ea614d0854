use glam::Vec3A;

use super::{BestFit, ColorFit};
use crate::block::{write_color_block3, write_color_block4};
use crate::colorset::ColorSet;
use crate::convert::{n5, n6};

/// Endpoints of one channel that reproduce an 8-bit value through a palette
/// entry, and the error of doing so.
#[derive(Debug, Clone, Copy)]
struct SourceBlock {
    start: u8,
    end: u8,
    /// The absolute error, scaled by 6 so all palette modes use integers.
    error: u16,
}

/// For each 8-bit value, the best source for palette index 0 and index 2.
type Lookup = [[SourceBlock; 2]; 256];

const fn expand(value: u16, bits: u32) -> i32 {
    if bits == 5 {
        n5::n8(value as u8) as i32
    } else {
        n6::n8(value as u8) as i32
    }
}

const fn abs(x: i32) -> i32 {
    if x < 0 {
        -x
    } else {
        x
    }
}

/// Returns the error of palette index 2 for the given 8-bit endpoints,
/// scaled by 6.
const fn interpolation_error(target: i32, start: i32, end: i32, colors: u32) -> i32 {
    if colors == 4 {
        abs(3 * target - (2 * start + end)) * 2
    } else {
        abs(2 * target - (start + end)) * 3
    }
}

const fn build_lookup(bits: u32, colors: u32) -> Lookup {
    let max = (1_u16 << bits) - 1;
    let empty = SourceBlock {
        start: 0,
        end: 0,
        error: u16::MAX,
    };
    let mut lookup = [[empty; 2]; 256];

    let mut target = 0;
    while target < 256 {
        let t = target as i32;

        // index 0: the endpoint itself
        let guess = (t * max as i32 + 127) / 255;
        let mut value = guess - 1;
        while value <= guess + 1 {
            if value >= 0 && value <= max as i32 {
                let error = (abs(t - expand(value as u16, bits)) * 6) as u16;
                if error < lookup[target][0].error {
                    lookup[target][0] = SourceBlock {
                        start: value as u8,
                        end: value as u8,
                        error,
                    };
                }
            }
            value += 1;
        }

        // index 2: the first interpolated color
        let mut start = 0;
        while start <= max {
            let s = expand(start, bits);
            let ideal = if colors == 4 { 3 * t - 2 * s } else { 2 * t - s };
            let guess = (ideal * max as i32 + 127) / 255;

            let mut end = guess - 1;
            while end <= guess + 1 {
                if end >= 0 && end <= max as i32 {
                    let e = expand(end as u16, bits);
                    let error = interpolation_error(t, s, e, colors) as u16;
                    if error < lookup[target][1].error {
                        lookup[target][1] = SourceBlock {
                            start: start as u8,
                            end: end as u8,
                            error,
                        };
                    }
                }
                end += 1;
            }
            start += 1;
        }

        target += 1;
    }
    lookup
}

static LOOKUP_5_3: Lookup = build_lookup(5, 3);
static LOOKUP_6_3: Lookup = build_lookup(6, 3);
static LOOKUP_5_4: Lookup = build_lookup(5, 4);
static LOOKUP_6_4: Lookup = build_lookup(6, 4);

/// Exact fit for blocks with a single color.
///
/// Each channel is looked up independently. All channels must use the same
/// palette index, so the index with the lowest total error wins.
pub(crate) struct SingleColorFit<'a> {
    set: &'a ColorSet,
    color: [u8; 3],
}
impl<'a> SingleColorFit<'a> {
    pub fn new(set: &'a ColorSet) -> Self {
        let p = set.points().first().copied().unwrap_or(Vec3A::ZERO);
        let to_n8 = |x: f32| (x * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
        Self {
            set,
            color: [to_n8(p.x), to_n8(p.y), to_n8(p.z)],
        }
    }

    /// Returns the start and end color and the palette index.
    ///
    /// The index is chosen by the squared lookup errors, which only serve to
    /// rank the two choices against each other.
    fn compute_endpoints(&self, lookups: [&Lookup; 3]) -> (Vec3A, Vec3A, u8) {
        let mut best = (Vec3A::ZERO, Vec3A::ZERO, 0);
        let mut best_error = u32::MAX;

        for (index, palette_index) in [(0, 0), (1, 2)] {
            let sources: [SourceBlock; 3] =
                std::array::from_fn(|c| lookups[c][self.color[c] as usize][index]);
            let error: u32 = sources.iter().map(|s| (s.error as u32).pow(2)).sum();

            if error < best_error {
                best_error = error;
                let [r, g, b] = sources;
                let start = Vec3A::new(r.start as f32 / 31.0, g.start as f32 / 63.0, b.start as f32 / 31.0);
                let end = Vec3A::new(r.end as f32 / 31.0, g.end as f32 / 63.0, b.end as f32 / 31.0);
                best = (start, end, palette_index);
            }
        }
        best
    }
}

impl ColorFit for SingleColorFit<'_> {
    fn compress3(&mut self, best: &mut BestFit) {
        let (start, end, index) = self.compute_endpoints([&LOOKUP_5_3, &LOOKUP_6_3, &LOOKUP_5_3]);
        best.offer(write_color_block3(start, end, &self.set.remap_indexes(&[index])));
    }

    fn compress4(&mut self, best: &mut BestFit) {
        let (start, end, index) = self.compute_endpoints([&LOOKUP_5_4, &LOOKUP_6_4, &LOOKUP_5_4]);
        best.offer(write_color_block4(start, end, &self.set.remap_indexes(&[index])));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::decompress_color_block;

    /// Returns the error and the decoded block.
    fn compress(color: [u8; 4], is_bc1: bool) -> (f32, [[u8; 4]; 16]) {
        let set = ColorSet::new(&[color; 16], 0xFFFF, is_bc1, false);
        let mut best = BestFit::new(&set, Vec3A::ONE, is_bc1);
        SingleColorFit::new(&set).compress(is_bc1, set.is_transparent(), &mut best);
        let decoded = decompress_color_block(best.block, is_bc1);
        (best.error, decoded)
    }

    #[test]
    fn lookup_errors() {
        for (lookup, bits) in [(&LOOKUP_5_4, 5), (&LOOKUP_6_3, 6)] {
            for (target, sources) in lookup.iter().enumerate() {
                let [exact, _] = sources;
                assert_eq!(exact.start, exact.end);
                let expanded = expand(exact.start as u16, bits);
                assert_eq!(exact.error as i32, abs(target as i32 - expanded) * 6);
            }
        }
        // representable values have no error
        assert_eq!(LOOKUP_5_4[255][0].error, 0);
        assert_eq!(LOOKUP_6_4[0][0].error, 0);
    }

    #[test]
    fn interpolation_is_more_precise() {
        let mut improved = 0;
        for target in 0..256 {
            let [exact, interpolated] = LOOKUP_5_4[target];
            if interpolated.error < exact.error {
                improved += 1;
            }
        }
        assert!(improved > 100, "{improved}");
    }

    #[test]
    fn black_and_white_are_exact() {
        for is_bc1 in [true, false] {
            for color in [[0, 0, 0, 255], [255, 255, 255, 255]] {
                let (error, decoded) = compress(color, is_bc1);
                assert_eq!(error, 0.0);
                assert_eq!(decoded, [color; 16]);
            }
        }
    }

    #[test]
    fn arbitrary_colors_are_close() {
        for color in [[1, 2, 3, 255], [100, 150, 200, 255], [254, 7, 128, 255]] {
            for is_bc1 in [true, false] {
                let (_, decoded) = compress(color, is_bc1);
                for pixel in decoded {
                    for c in 0..3 {
                        let diff = (pixel[c] as i32 - color[c] as i32).abs();
                        assert!(diff <= 3, "{color:?} {pixel:?}");
                    }
                    assert_eq!(pixel[3], 255);
                }
            }
        }
    }
}
