//! End-to-end pipeline scenarios on the synthetic enclosure drawing.

use approx::assert_relative_eq;

use hexplate_harness::{assertions, drawings};
use hexplate_pipeline::{align, build_sections, select_profiles, PipelineError};
use hexplate_types::ParameterSet;

#[test]
fn end_to_end_produces_three_positioned_solids() {
    let params = ParameterSet::default();
    let compound = hexplate_pipeline::run(&drawings::profile_svg(), &params).unwrap();
    assert_eq!(compound.len(), 3);

    for solid in compound.solids() {
        assert_relative_eq!(solid.height(), 4.0 * params.wall_min, epsilon = 1e-12);
        // Every part carries at least one drilled hole, a label recess,
        // and survived the lattice subtraction.
        assert!(!solid.rim_chamfers().is_empty());
        assert_eq!(solid.recesses().len(), 1);
        assert!(!solid.footprint().is_empty());
    }

    let boxes: Vec<_> = compound
        .solids()
        .iter()
        .map(|s| s.bounding_box().unwrap())
        .collect();
    for pair in boxes.windows(2) {
        let gap = pair[1].0.x - pair[0].1.x;
        assert_relative_eq!(gap, params.assembly_gap, epsilon = 1e-9);
    }
    let (min, max) = compound.bounding_box().unwrap();
    assert_relative_eq!(min.x + max.x, 0.0, epsilon = 1e-9);
}

#[test]
fn svg_import_matches_the_native_fixture() {
    let wires = hexplate_format::import_wires(&drawings::profile_svg()).unwrap();
    let profiles = select_profiles(&wires).unwrap();
    let (small, big) = drawings::profile_chains();
    assert_relative_eq!(profiles.small.length(), small.length(), epsilon = 1e-6);
    assert_relative_eq!(profiles.big.length(), big.length(), epsilon = 1e-6);
}

#[test]
fn aligned_sections_hold_the_symmetry_and_area_relations() {
    let params = ParameterSet::default();
    let (small, big) = drawings::profile_chains();
    let aligned = align(&small, &big, &params).unwrap();
    assert_relative_eq!(aligned.rotation, 0.0, epsilon = 1e-6);

    let sections = build_sections(&aligned).unwrap();
    assertions::assert_symmetric_about_vertical_axis(&sections.part1, 1e-6);
    assertions::assert_symmetric_about_vertical_axis(&sections.part3, 1e-6);
    assertions::assert_symmetric_about_horizontal_axis(&sections.part3, 1e-6);
    assert_relative_eq!(
        sections.part3.area(),
        2.0 * sections.part1.area(),
        epsilon = 1e-6
    );
}

#[test]
fn realignment_of_aligned_output_is_a_no_op() {
    let params = ParameterSet::default();
    let (small, big) = drawings::profile_chains();
    let first = align(&small, &big, &params).unwrap();
    let second = align(&first.small, &first.big, &params).unwrap();
    assert_relative_eq!(second.rotation, 0.0, epsilon = 1e-6);
    assert!(second.residual < 1e-6);
    assertions::assert_points_close(
        second.small.lowest_vertex(),
        first.small.lowest_vertex(),
        1e-9,
    );
}

#[test]
fn single_curve_drawing_fails_extraction() {
    let err = hexplate_pipeline::run(&drawings::single_curve_svg(), &ParameterSet::default());
    assert!(matches!(err, Err(PipelineError::TooFewCurves { count: 1 })));
}

#[test]
fn tied_curve_lengths_fail_extraction() {
    let err = hexplate_pipeline::run(&drawings::tied_curves_svg(), &ParameterSet::default());
    assert!(matches!(
        err,
        Err(PipelineError::AmbiguousCurveLengths { .. })
    ));
}

#[test]
fn compound_exports_one_step_file_per_solid() {
    let params = ParameterSet::default();
    let compound = hexplate_pipeline::run(&drawings::profile_svg(), &params).unwrap();

    let dir = std::env::temp_dir().join(format!("hexplate-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let files = hexplate_format::export_compound(&compound, &dir.join("set.step")).unwrap();
    assert_eq!(files.len(), 3);
    for (i, file) in files.iter().enumerate() {
        assert!(file
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with(&format!("_{}.step", i + 1)));
        let text = std::fs::read_to_string(file).unwrap();
        assert!(text.starts_with("ISO-10303-21;"));
        assert!(text.contains("FACETED_BREP("));
    }
    let _ = std::fs::remove_dir_all(&dir);
}
