//! Synthetic profile drawings used across tests.
//!
//! The fixture models a tapered enclosure silhouette: the big profile is
//! a 100 x 100 rectangle half-outline, the small one a shorter tapered
//! chain. Both start at the shared lowest vertex (50, 0) and end on the
//! vertical axis, already co-rotated, so the alignment solve converges at
//! zero.

use nalgebra::Point2;

use hexplate_kernel::Wire;

/// The (small, big) profile chains in model coordinates (y up).
pub fn profile_chains() -> (Wire, Wire) {
    let small = Wire::open(vec![
        Point2::new(50.0, 0.0),
        Point2::new(40.0, 10.0),
        Point2::new(40.0, 55.0),
        Point2::new(0.0, 60.0),
    ])
    .expect("fixture chain is valid");
    let big = Wire::open(vec![
        Point2::new(50.0, 0.0),
        Point2::new(50.0, 100.0),
        Point2::new(0.0, 100.0),
    ])
    .expect("fixture chain is valid");
    (small, big)
}

/// The same two profiles as an SVG document. SVG's y axis points down, so
/// the path coordinates are the model ones with y negated; the importer
/// flips them back.
pub fn profile_svg() -> String {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
        <path d="M 50 0 L 40 -10 L 40 -55 L 0 -60" fill="none" stroke="black"/>
        <path d="M 50 0 L 50 -100 L 0 -100" fill="none" stroke="black"/>
    </svg>"##
        .to_string()
}

/// A drawing with only one usable curve; the extractor must reject it.
pub fn single_curve_svg() -> String {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
        <path d="M 50 0 L 50 -100 L 0 -100" fill="none" stroke="black"/>
    </svg>"##
        .to_string()
}

/// Two congruent curves; length selection is ambiguous.
pub fn tied_curves_svg() -> String {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
        <path d="M 50 0 L 50 -100 L 0 -100" fill="none" stroke="black"/>
        <path d="M 60 0 L 60 -100 L 10 -100" fill="none" stroke="black"/>
    </svg>"##
        .to_string()
}
