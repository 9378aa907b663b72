use nalgebra::{Point2, Point3};
use tracing::debug;

use crate::error::KernelError;
use crate::geometry::region::Region;

/// A pocket sunk into the top face of a solid.
#[derive(Debug, Clone)]
pub struct Recess {
    /// Pocket outline, already clipped to the footprint.
    pub region: Region,
    /// How far below the top face the pocket floor sits.
    pub depth: f64,
}

/// A conical chamfer around the top rim of a circular through-hole.
#[derive(Debug, Clone, Copy)]
pub struct RimChamfer {
    pub center: Point2<f64>,
    /// Radius of the hole being chamfered.
    pub radius: f64,
    /// Axial depth of the chamfer cone below the top face.
    pub length: f64,
    /// Radial widening of the hole at the top face.
    pub length2: f64,
}

/// An axis-aligned prism: a planar footprint extruded along +Z from z = 0
/// to z = `height`, with optional top-face pockets and hole-rim chamfers.
///
/// Through-holes live as interior rings of the footprint, so boolean
/// subtraction in the plane is all the solid modelling these parts need.
#[derive(Debug, Clone)]
pub struct Solid {
    footprint: Region,
    height: f64,
    recesses: Vec<Recess>,
    rim_chamfers: Vec<RimChamfer>,
}

impl Solid {
    /// Extrude a non-empty region upward by `height`.
    pub fn extrude(footprint: Region, height: f64) -> Result<Self, KernelError> {
        if footprint.is_empty() {
            return Err(KernelError::EmptyExtrusion);
        }
        if !(height > 0.0) || !height.is_finite() {
            return Err(KernelError::InvalidHeight { height });
        }
        debug!(area = footprint.area(), height, "extruded solid");
        Ok(Self {
            footprint,
            height,
            recesses: Vec::new(),
            rim_chamfers: Vec::new(),
        })
    }

    pub fn footprint(&self) -> &Region {
        &self.footprint
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn recesses(&self) -> &[Recess] {
        &self.recesses
    }

    pub fn rim_chamfers(&self) -> &[RimChamfer] {
        &self.rim_chamfers
    }

    /// Cut a through-hole: subtract `cutter` from the footprint for the
    /// full height. Fails if the cut would consume all material.
    pub fn subtract_through(&self, cutter: &Region) -> Result<Self, KernelError> {
        let footprint = self.footprint.difference(cutter);
        if footprint.is_empty() {
            return Err(KernelError::InvalidFeature {
                reason: "through-cut removed all material".to_string(),
            });
        }
        Ok(Self {
            footprint,
            ..self.clone()
        })
    }

    /// Sink a pocket of the given depth into the top face. The outline is
    /// clipped to the footprint; a pocket that misses the part entirely is
    /// an error, as is one as deep as the part itself.
    pub fn add_recess(&mut self, outline: &Region, depth: f64) -> Result<(), KernelError> {
        if !(depth > 0.0) || depth >= self.height {
            return Err(KernelError::InvalidFeature {
                reason: format!(
                    "recess depth {depth} must be positive and shallower than height {}",
                    self.height
                ),
            });
        }
        let clipped = outline.intersection(&self.footprint);
        if clipped.is_empty() {
            return Err(KernelError::InvalidFeature {
                reason: "recess outline misses the part".to_string(),
            });
        }
        self.recesses.push(Recess {
            region: clipped,
            depth,
        });
        Ok(())
    }

    /// Record a chamfer on the top rim of a circular through-hole.
    pub fn add_rim_chamfer(&mut self, chamfer: RimChamfer) -> Result<(), KernelError> {
        if chamfer.radius <= 0.0 || chamfer.length <= 0.0 || chamfer.length2 <= 0.0 {
            return Err(KernelError::InvalidFeature {
                reason: "chamfer radius and legs must be positive".to_string(),
            });
        }
        if chamfer.length >= self.height {
            return Err(KernelError::InvalidFeature {
                reason: format!(
                    "chamfer depth {} reaches through the {} tall part",
                    chamfer.length, self.height
                ),
            });
        }
        self.rim_chamfers.push(chamfer);
        Ok(())
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            footprint: self.footprint.translated(dx, dy),
            height: self.height,
            recesses: self
                .recesses
                .iter()
                .map(|r| Recess {
                    region: r.region.translated(dx, dy),
                    depth: r.depth,
                })
                .collect(),
            rim_chamfers: self
                .rim_chamfers
                .iter()
                .map(|c| RimChamfer {
                    center: Point2::new(c.center.x + dx, c.center.y + dy),
                    ..*c
                })
                .collect(),
        }
    }

    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let bb = self.footprint.bounding_rect()?;
        Some((
            Point3::new(bb.min().x, bb.min().y, 0.0),
            Point3::new(bb.max().x, bb.max().y, self.height),
        ))
    }
}

/// An ordered collection of solids forming one exported scene.
#[derive(Debug, Clone, Default)]
pub struct Compound {
    solids: Vec<Solid>,
}

impl Compound {
    pub fn new(solids: Vec<Solid>) -> Self {
        Self { solids }
    }

    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut boxes = self.solids.iter().filter_map(Solid::bounding_box);
        let (mut min, mut max) = boxes.next()?;
        for (lo, hi) in boxes {
            min = Point3::new(min.x.min(lo.x), min.y.min(lo.y), min.z.min(lo.z));
            max = Point3::new(max.x.max(hi.x), max.y.max(hi.y), max.z.max(hi.z));
        }
        Some((min, max))
    }
}
