//! Faceted STEP (ISO 10303-21) export.
//!
//! Solids are prisms with top-face pockets and hole-rim chamfers, so the
//! mesh is assembled from triangulated caps, ruled side walls, and cone
//! rings for chamfers, then written as a FACETED_BREP with one planar
//! FACE_SURFACE per triangle. One file is written per solid; multi-solid
//! scenes get a numbered suffix per file.

use std::path::{Path, PathBuf};

use nalgebra::{Point2, Point3, Vector3};
use tracing::info;

use hexplate_kernel::{Compound, Region, RimChamfer, Solid};

use crate::error::FormatError;

type Triangle = [Point3<f64>; 3];

/// Hole rings are matched to chamfer records by center and radius within
/// this distance.
const CHAMFER_MATCH_TOLERANCE: f64 = 1e-6;

/// Write every solid of the compound next to `path`. A single solid goes
/// to `path` itself; with several solids each file gets a `_N` suffix
/// (1-based) before the extension. Returns the written paths.
pub fn export_compound(compound: &Compound, path: &Path) -> Result<Vec<PathBuf>, FormatError> {
    if compound.is_empty() {
        return Err(FormatError::EmptySolid);
    }
    let paths = output_paths(path, compound.len());
    for (solid, file) in compound.solids().iter().zip(&paths) {
        let name = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("solid");
        let text = solid_to_step(solid, name)?;
        std::fs::write(file, text)?;
        info!(path = %file.display(), "wrote STEP file");
    }
    Ok(paths)
}

/// File naming scheme for a scene of `count` solids.
pub fn output_paths(path: &Path, count: usize) -> Vec<PathBuf> {
    if count <= 1 {
        return vec![path.to_path_buf()];
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("solid")
        .to_string();
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("step");
    (1..=count)
        .map(|i| path.with_file_name(format!("{stem}_{i}.{ext}")))
        .collect()
}

/// Serialize one solid as a complete STEP document.
pub fn solid_to_step(solid: &Solid, name: &str) -> Result<String, FormatError> {
    let triangles = tessellate(solid)?;
    if triangles.is_empty() {
        return Err(FormatError::EmptySolid);
    }

    let mut w = StepWriter::new();
    let origin = w.entity("CARTESIAN_POINT('',(0.,0.,0.))");
    let axis_z = w.entity("DIRECTION('',(0.,0.,1.))");
    let axis_x = w.entity("DIRECTION('',(1.,0.,0.))");
    let placement = w.entity(&format!(
        "AXIS2_PLACEMENT_3D('',#{origin},#{axis_z},#{axis_x})"
    ));
    let unit_len = w.entity("(LENGTH_UNIT()NAMED_UNIT(*)SI_UNIT(.MILLI.,.METRE.))");
    let unit_ang = w.entity("(NAMED_UNIT(*)PLANE_ANGLE_UNIT()SI_UNIT($,.RADIAN.))");
    let unit_sol = w.entity("(NAMED_UNIT(*)SI_UNIT($,.STERADIAN.)SOLID_ANGLE_UNIT())");
    let uncertainty = w.entity(&format!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-6),#{unit_len},\
         'distance_accuracy_value','')"
    ));
    let context = w.entity(&format!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3)\
         GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty}))\
         GLOBAL_UNIT_ASSIGNED_CONTEXT((#{unit_len},#{unit_ang},#{unit_sol}))\
         REPRESENTATION_CONTEXT('',''))"
    ));

    let mut faces = Vec::with_capacity(triangles.len());
    for tri in &triangles {
        if let Some(face) = w.triangle_face(tri) {
            faces.push(face);
        }
    }
    let face_list = faces
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(",");
    let shell = w.entity(&format!("CLOSED_SHELL('',({face_list}))"));
    let brep = w.entity(&format!("FACETED_BREP('',#{shell})"));
    let _rep = w.entity(&format!(
        "FACETED_BREP_SHAPE_REPRESENTATION('{name}',(#{placement},#{brep}),#{context})"
    ));

    Ok(format!(
        "ISO-10303-21;\n\
         HEADER;\n\
         FILE_DESCRIPTION((''),'2;1');\n\
         FILE_NAME('{name}','',(''),(''),'','','');\n\
         FILE_SCHEMA(('AUTOMOTIVE_DESIGN {{ 1 0 10303 214 1 1 1 1 }}'));\n\
         ENDSEC;\n\
         DATA;\n\
         {}\
         ENDSEC;\n\
         END-ISO-10303-21;\n",
        w.body
    ))
}

struct StepWriter {
    body: String,
    next: usize,
}

impl StepWriter {
    fn new() -> Self {
        Self {
            body: String::new(),
            next: 1,
        }
    }

    fn entity(&mut self, text: &str) -> usize {
        let id = self.next;
        self.next += 1;
        self.body.push_str(&format!("#{id}={text};\n"));
        id
    }

    fn point(&mut self, p: &Point3<f64>) -> usize {
        self.entity(&format!(
            "CARTESIAN_POINT('',({},{},{}))",
            real(p.x),
            real(p.y),
            real(p.z)
        ))
    }

    /// Emit one planar face for a triangle; returns None for degenerate
    /// (zero-area) triangles, which are dropped.
    fn triangle_face(&mut self, tri: &Triangle) -> Option<usize> {
        let edge1 = tri[1] - tri[0];
        let edge2 = tri[2] - tri[0];
        let normal = edge1.cross(&edge2);
        if normal.norm() < 1e-15 {
            return None;
        }
        let normal = normal.normalize();
        let refdir = edge1.normalize();

        let p1 = self.point(&tri[0]);
        let p2 = self.point(&tri[1]);
        let p3 = self.point(&tri[2]);
        let loop_id = self.entity(&format!("POLY_LOOP('',(#{p1},#{p2},#{p3}))"));
        let bound = self.entity(&format!("FACE_OUTER_BOUND('',#{loop_id},.T.)"));
        let plane_origin = self.point(&tri[0]);
        let normal_id = self.direction(&normal);
        let refdir_id = self.direction(&refdir);
        let plane_axes = self.entity(&format!(
            "AXIS2_PLACEMENT_3D('',#{plane_origin},#{normal_id},#{refdir_id})"
        ));
        let plane = self.entity(&format!("PLANE('',#{plane_axes})"));
        Some(self.entity(&format!("FACE_SURFACE('',(#{bound}),#{plane},.T.)")))
    }

    fn direction(&mut self, v: &Vector3<f64>) -> usize {
        self.entity(&format!(
            "DIRECTION('',({},{},{}))",
            real(v.x),
            real(v.y),
            real(v.z)
        ))
    }
}

/// STEP reals must carry a decimal point.
fn real(v: f64) -> String {
    let s = format!("{v:.9}");
    let trimmed = s.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// Mesh a solid into a closed, outward-oriented triangle soup.
pub fn tessellate(solid: &Solid) -> Result<Vec<Triangle>, FormatError> {
    let h = solid.height();
    let mut triangles = Vec::new();

    // The top cap loses the chamfer cones' widened hole rims and every
    // pocket outline; pockets get their own floors and walls.
    let mut top = solid.footprint().clone();
    for chamfer in solid.rim_chamfers() {
        let widened = Region::circle(
            chamfer.center,
            chamfer.radius + chamfer.length2,
            crate::CIRCLE_SEGMENTS,
        )?;
        top = top.difference(&widened);
    }
    for recess in solid.recesses() {
        top = top.difference(&recess.region);
    }
    cap(&top, h, false, &mut triangles)?;
    cap(solid.footprint(), 0.0, true, &mut triangles)?;

    for recess in solid.recesses() {
        let floor = h - recess.depth;
        cap(&recess.region, floor, false, &mut triangles)?;
        for ring in rings(&recess.region) {
            // Pocket walls face inward, toward the cavity.
            wall(&ring, floor, h, true, &mut triangles);
        }
    }

    for polygon in &solid.footprint().shape().0 {
        wall(&ring_coords(polygon.exterior()), 0.0, h, false, &mut triangles);
        for hole in polygon.interiors() {
            let ring = ring_coords(hole);
            match matching_chamfer(&ring, solid.rim_chamfers()) {
                Some(chamfer) => {
                    let split = h - chamfer.length;
                    wall(&ring, 0.0, split, false, &mut triangles);
                    cone_ring(&ring, chamfer, split, h, &mut triangles);
                }
                None => wall(&ring, 0.0, h, false, &mut triangles),
            }
        }
    }

    Ok(triangles)
}

/// Triangulate a region at the given height. `flip` reverses windings for
/// downward-facing caps.
fn cap(
    region: &Region,
    z: f64,
    flip: bool,
    out: &mut Vec<Triangle>,
) -> Result<(), FormatError> {
    for [a, b, c] in triangulate(region)? {
        let tri = if flip { [a, c, b] } else { [a, b, c] };
        out.push([
            Point3::new(tri[0].x, tri[0].y, z),
            Point3::new(tri[1].x, tri[1].y, z),
            Point3::new(tri[2].x, tri[2].y, z),
        ]);
    }
    Ok(())
}

/// Ear-clip every polygon of a region into 2D triangles. Exteriors are
/// wound counter-clockwise, so output triangles are too.
fn triangulate(region: &Region) -> Result<Vec<[Point2<f64>; 3]>, FormatError> {
    let mut out = Vec::new();
    for polygon in &region.shape().0 {
        let mut coords: Vec<f64> = Vec::new();
        let mut hole_starts: Vec<usize> = Vec::new();
        let mut vertices: Vec<Point2<f64>> = Vec::new();

        for p in ring_coords(polygon.exterior()) {
            coords.extend([p.x, p.y]);
            vertices.push(p);
        }
        for hole in polygon.interiors() {
            hole_starts.push(vertices.len());
            for p in ring_coords(hole) {
                coords.extend([p.x, p.y]);
                vertices.push(p);
            }
        }

        let indices = earcutr::earcut(&coords, &hole_starts, 2)
            .map_err(|e| FormatError::Triangulation(format!("{e:?}")))?;
        for tri in indices.chunks_exact(3) {
            out.push([vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]]);
        }
    }
    Ok(out)
}

/// Ruled wall between the same ring at two heights. With exterior rings
/// counter-clockwise and holes clockwise, the unflipped winding faces
/// away from the material in both cases.
fn wall(ring: &[Point2<f64>], z0: f64, z1: f64, flip: bool, out: &mut Vec<Triangle>) {
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let a0 = Point3::new(a.x, a.y, z0);
        let b0 = Point3::new(b.x, b.y, z0);
        let a1 = Point3::new(a.x, a.y, z1);
        let b1 = Point3::new(b.x, b.y, z1);
        if flip {
            out.push([a0, b1, b0]);
            out.push([a0, a1, b1]);
        } else {
            out.push([a0, b0, b1]);
            out.push([a0, b1, a1]);
        }
    }
}

/// Conical chamfer surface: the hole ring at `z0` widens radially by
/// `length2` at `z1`.
fn cone_ring(
    ring: &[Point2<f64>],
    chamfer: &RimChamfer,
    z0: f64,
    z1: f64,
    out: &mut Vec<Triangle>,
) {
    let scale = (chamfer.radius + chamfer.length2) / chamfer.radius;
    let widen = |p: Point2<f64>| chamfer.center + (p - chamfer.center) * scale;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let (wa, wb) = (widen(a), widen(b));
        let a0 = Point3::new(a.x, a.y, z0);
        let b0 = Point3::new(b.x, b.y, z0);
        let a1 = Point3::new(wa.x, wa.y, z1);
        let b1 = Point3::new(wb.x, wb.y, z1);
        out.push([a0, b0, b1]);
        out.push([a0, b1, a1]);
    }
}

fn matching_chamfer<'a>(
    ring: &[Point2<f64>],
    chamfers: &'a [RimChamfer],
) -> Option<&'a RimChamfer> {
    let n = ring.len() as f64;
    let centroid = ring
        .iter()
        .fold(Point2::new(0.0, 0.0), |acc, p| acc + p.coords / n);
    let mean_radius: f64 = ring.iter().map(|p| (p - centroid).norm()).sum::<f64>() / n;
    chamfers.iter().find(|c| {
        (c.center - centroid).norm() < CHAMFER_MATCH_TOLERANCE
            && (c.radius - mean_radius).abs() < CHAMFER_MATCH_TOLERANCE
    })
}

fn rings(region: &Region) -> Vec<Vec<Point2<f64>>> {
    let mut out = Vec::new();
    for polygon in &region.shape().0 {
        out.push(ring_coords(polygon.exterior()));
        for hole in polygon.interiors() {
            out.push(ring_coords(hole));
        }
    }
    out
}

/// Ring vertices without the duplicated closing coordinate.
fn ring_coords(ring: &geo::LineString<f64>) -> Vec<Point2<f64>> {
    let coords = &ring.0;
    let n = if coords.len() > 1 && coords[0] == coords[coords.len() - 1] {
        coords.len() - 1
    } else {
        coords.len()
    };
    coords[..n].iter().map(|c| Point2::new(c.x, c.y)).collect()
}
