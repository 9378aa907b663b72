//! Built-in stroke font for embossed index labels.
//!
//! Labels on these parts are always short digit strings, so instead of
//! loading an outline font the glyphs are drawn as seven-segment stroke
//! skeletons widened into rectangles and unioned into a region. Strokes
//! are axis-aligned with square caps.

use nalgebra::Point2;

use super::region::Region;
use crate::error::KernelError;

/// Glyph cell width as a fraction of the em height.
const CELL_WIDTH: f64 = 0.5;
/// Horizontal advance between glyph origins, in em.
const ADVANCE: f64 = 0.8;
/// Stroke half-width as a fraction of the em height.
const STROKE_HALF_WIDTH: f64 = 0.07;

/// Segment endpoints in em units, y up, baseline at 0.
type Stroke = ((f64, f64), (f64, f64));

const TOP: Stroke = ((0.0, 1.0), (CELL_WIDTH, 1.0));
const TOP_RIGHT: Stroke = ((CELL_WIDTH, 1.0), (CELL_WIDTH, 0.5));
const BOTTOM_RIGHT: Stroke = ((CELL_WIDTH, 0.5), (CELL_WIDTH, 0.0));
const BOTTOM: Stroke = ((0.0, 0.0), (CELL_WIDTH, 0.0));
const BOTTOM_LEFT: Stroke = ((0.0, 0.0), (0.0, 0.5));
const TOP_LEFT: Stroke = ((0.0, 0.5), (0.0, 1.0));
const MIDDLE: Stroke = ((0.0, 0.5), (CELL_WIDTH, 0.5));

fn digit_strokes(digit: u32) -> &'static [Stroke] {
    match digit {
        0 => &[TOP, TOP_RIGHT, BOTTOM_RIGHT, BOTTOM, BOTTOM_LEFT, TOP_LEFT],
        1 => &[TOP_RIGHT, BOTTOM_RIGHT],
        2 => &[TOP, TOP_RIGHT, MIDDLE, BOTTOM_LEFT, BOTTOM],
        3 => &[TOP, TOP_RIGHT, MIDDLE, BOTTOM_RIGHT, BOTTOM],
        4 => &[TOP_LEFT, MIDDLE, TOP_RIGHT, BOTTOM_RIGHT],
        5 => &[TOP, TOP_LEFT, MIDDLE, BOTTOM_RIGHT, BOTTOM],
        6 => &[TOP, TOP_LEFT, MIDDLE, BOTTOM_LEFT, BOTTOM_RIGHT, BOTTOM],
        7 => &[TOP, TOP_RIGHT, BOTTOM_RIGHT],
        8 => &[
            TOP,
            TOP_RIGHT,
            BOTTOM_RIGHT,
            BOTTOM,
            BOTTOM_LEFT,
            TOP_LEFT,
            MIDDLE,
        ],
        _ => &[
            TOP,
            TOP_RIGHT,
            BOTTOM_RIGHT,
            BOTTOM,
            TOP_LEFT,
            MIDDLE,
        ],
    }
}

/// Render a digit string as a filled region with the given em height.
/// The first glyph's cell origin is at (0, 0); the baseline runs along
/// the x axis. Callers center and rotate the result as needed.
pub fn render(text: &str, size: f64) -> Result<Region, KernelError> {
    if size <= 0.0 {
        return Err(KernelError::InvalidFeature {
            reason: format!("label size must be positive, got {size}"),
        });
    }
    if text.is_empty() {
        return Err(KernelError::InvalidFeature {
            reason: "label text is empty".to_string(),
        });
    }

    let hw = STROKE_HALF_WIDTH * size;
    let mut region = Region::empty();
    let mut origin_x = 0.0;
    for ch in text.chars() {
        let digit = ch.to_digit(10).ok_or_else(|| KernelError::InvalidFeature {
            reason: format!("label glyph {ch:?} is not a digit"),
        })?;
        for &((x1, y1), (x2, y2)) in digit_strokes(digit) {
            let rect = stroke_rect(
                Point2::new(origin_x + x1 * size, y1 * size),
                Point2::new(origin_x + x2 * size, y2 * size),
                hw,
            )?;
            region = region.union(&rect);
        }
        origin_x += ADVANCE * size;
    }
    Ok(region)
}

/// Axis-aligned rectangle covering the stroke widened by `hw` on every
/// side (square caps).
fn stroke_rect(a: Point2<f64>, b: Point2<f64>, hw: f64) -> Result<Region, KernelError> {
    let min_x = a.x.min(b.x) - hw;
    let max_x = a.x.max(b.x) + hw;
    let min_y = a.y.min(b.y) - hw;
    let max_y = a.y.max(b.y) + hw;
    Region::from_ring(&[
        Point2::new(min_x, min_y),
        Point2::new(max_x, min_y),
        Point2::new(max_x, max_y),
        Point2::new(min_x, max_y),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_digit_renders_non_empty() {
        for d in 0..10 {
            let r = render(&d.to_string(), 32.0).unwrap();
            assert!(!r.is_empty(), "digit {d} rendered empty");
        }
    }

    #[test]
    fn glyph_fits_its_cell() {
        let r = render("8", 10.0).unwrap();
        let bb = r.bounding_rect().unwrap();
        // The union snaps coordinates onto a grid a few 1e-9 wide, so the
        // bound allows that much slack.
        let hw = STROKE_HALF_WIDTH * 10.0;
        assert!(bb.min().x >= -hw - 1e-6);
        assert!(bb.max().x <= CELL_WIDTH * 10.0 + hw + 1e-6);
        assert!(bb.min().y >= -hw - 1e-6);
        assert!(bb.max().y <= 10.0 + hw + 1e-6);
    }

    #[test]
    fn multi_digit_string_advances() {
        let one = render("1", 10.0).unwrap();
        let ten = render("10", 10.0).unwrap();
        let w1 = one.bounding_rect().unwrap().max().x;
        let w10 = ten.bounding_rect().unwrap().max().x;
        assert!(w10 > w1 + ADVANCE * 10.0 * 0.5);
    }

    #[test]
    fn eight_covers_more_ink_than_one() {
        let one = render("1", 10.0).unwrap();
        let eight = render("8", 10.0).unwrap();
        assert!(eight.area() > one.area());
    }

    #[test]
    fn non_digit_text_rejected() {
        let err = render("A", 10.0);
        assert!(matches!(err, Err(KernelError::InvalidFeature { .. })));
    }

    #[test]
    fn empty_text_rejected() {
        assert!(matches!(
            render("", 10.0),
            Err(KernelError::InvalidFeature { .. })
        ));
    }
}
