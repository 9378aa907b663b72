use serde::Deserialize;
use thiserror::Error;

/// Immutable configuration for one pipeline run.
///
/// Constructed once at startup and passed read-only through every stage.
/// Derived fields (`wall`, `height`, `decor`, ...) are computed from the
/// base printing constants so that a caller overriding `wall_min` gets a
/// consistent set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    /// Acceptance tolerance for geometric alignment.
    pub tol: f64,
    /// Strict verification epsilon (drawing/export noise floor).
    pub eps: f64,
    /// Minimum printable wall width.
    pub wall_min: f64,
    /// Recommended wall width for most walls of the print.
    pub wall: f64,
    /// Extrusion height of every part.
    pub height: f64,
    /// Depth of the embossed label.
    pub decor: f64,
    /// Mounting hole diameter.
    pub hole_diameter: f64,
    /// Distance from a reference corner to a hole center.
    pub hole_corner_to_center: f64,
    /// Inward margin kept between the lattice and the outer wall, and
    /// outward margin kept around existing cuts.
    pub decor_offset: f64,
    /// Web width between neighbouring lattice apertures.
    pub decor_width: f64,
    /// Lattice aperture size (hexagon width across flats).
    pub decor_hole: f64,
    /// Gap between part bounding boxes in the assembled compound.
    pub assembly_gap: f64,
    /// Label font size.
    pub label_size: f64,
    /// Hex grid extent (columns).
    pub hex_columns: usize,
    /// Hex grid extent (rows).
    pub hex_rows: usize,
}

/// Caller-overridable subset of the parameters. Everything absent falls
/// back to the built-in printing constants; derived values are recomputed.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterOverrides {
    pub tol: Option<f64>,
    pub eps: Option<f64>,
    pub wall_min: Option<f64>,
    pub hole_diameter: Option<f64>,
    pub assembly_gap: Option<f64>,
    pub label_size: Option<f64>,
    pub hex_columns: Option<usize>,
    pub hex_rows: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("parameter `{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("eps ({eps}) must be strictly smaller than tol ({tol})")]
    EpsNotBelowTol { eps: f64, tol: f64 },
}

impl ParameterSet {
    /// Build a parameter set from the base constants, deriving the rest.
    pub fn derive(
        tol: f64,
        eps: f64,
        wall_min: f64,
        hole_diameter: f64,
        assembly_gap: f64,
        label_size: f64,
        hex_columns: usize,
        hex_rows: usize,
    ) -> Result<Self, ParamError> {
        for (name, value) in [
            ("tol", tol),
            ("eps", eps),
            ("wall_min", wall_min),
            ("hole_diameter", hole_diameter),
            ("assembly_gap", assembly_gap),
            ("label_size", label_size),
        ] {
            if !(value > 0.0) {
                return Err(ParamError::NotPositive { name, value });
            }
        }
        if eps >= tol {
            return Err(ParamError::EpsNotBelowTol { eps, tol });
        }

        let wall = 3.0 * wall_min;
        let height = 4.0 * wall_min;
        let decor_offset = 4.0 * wall;
        Ok(Self {
            tol,
            eps,
            wall_min,
            wall,
            height,
            decor: height / 2.0,
            hole_diameter,
            hole_corner_to_center: 2.0 * hole_diameter,
            decor_offset,
            decor_width: decor_offset / 2.0,
            decor_hole: 3.0 * decor_offset,
            assembly_gap,
            label_size,
            hex_columns,
            hex_rows,
        })
    }

    /// Apply overrides on top of the defaults.
    pub fn with_overrides(ov: &ParameterOverrides) -> Result<Self, ParamError> {
        let d = Self::default();
        Self::derive(
            ov.tol.unwrap_or(d.tol),
            ov.eps.unwrap_or(d.eps),
            ov.wall_min.unwrap_or(d.wall_min),
            ov.hole_diameter.unwrap_or(d.hole_diameter),
            ov.assembly_gap.unwrap_or(d.assembly_gap),
            ov.label_size.unwrap_or(d.label_size),
            ov.hex_columns.unwrap_or(d.hex_columns),
            ov.hex_rows.unwrap_or(d.hex_rows),
        )
    }

    /// Coarse pre-alignment bound: reference vertices farther apart than
    /// this indicate a malformed input pair.
    pub fn coarse_tol(&self) -> f64 {
        10.0 * self.tol
    }

    /// Lattice pitch: aperture size plus the web between apertures.
    pub fn hex_pitch(&self) -> f64 {
        (self.decor_hole + self.decor_width) / 2.0
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        // 0.1 mm tolerance, 0.4 mm minimum wall: FDM printing constants.
        Self::derive(0.1, 1e-5, 0.4, 2.0, 5.0, 32.0, 6, 9)
            .expect("built-in constants are valid")
    }
}
