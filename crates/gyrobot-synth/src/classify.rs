//! Distance-based edge classification.
//!
//! Every unordered vertex pair is measured once and compared against the
//! target length of each edge class whose role pair it matches. Pairs outside
//! every tolerance band are not edges.

use std::fmt;

use tracing::debug;

use crate::error::{Result, SynthError};
use crate::vertex::{Vertex, VertexRole};

/// Structural edge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeClass {
    /// Corner–corner, length `scale`. Realized as pistons.
    Cube,
    /// Axis–axis, length `√2·scale`.
    Octahedron,
    /// Axis–corner, length `√0.75·scale`. Realized as tendons.
    Rhombic,
}

impl EdgeClass {
    /// All classes in reporting order.
    pub const ALL: [EdgeClass; 3] = [EdgeClass::Cube, EdgeClass::Octahedron, EdgeClass::Rhombic];

    /// Target length as a multiple of scale.
    pub fn length_factor(self) -> f64 {
        match self {
            EdgeClass::Cube => 1.0,
            EdgeClass::Octahedron => std::f64::consts::SQRT_2,
            EdgeClass::Rhombic => 0.75f64.sqrt(),
        }
    }

    /// Vertex roles this class joins.
    pub fn roles(self) -> RolePair {
        match self {
            EdgeClass::Cube => RolePair::CornerCorner,
            EdgeClass::Octahedron => RolePair::AxisAxis,
            EdgeClass::Rhombic => RolePair::AxisCorner,
        }
    }

    /// Hyphenated label.
    pub fn label(self) -> &'static str {
        match self {
            EdgeClass::Cube => "cube-edge",
            EdgeClass::Octahedron => "octahedron-edge",
            EdgeClass::Rhombic => "rhombic-edge",
        }
    }
}

impl fmt::Display for EdgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which vertex pairs a band considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePair {
    /// Both corners.
    CornerCorner,
    /// Both axis vertices.
    AxisAxis,
    /// One of each.
    AxisCorner,
    /// Any pair.
    Any,
}

impl RolePair {
    fn accepts(self, a: VertexRole, b: VertexRole) -> bool {
        use VertexRole::{Axis, Corner};
        match self {
            RolePair::CornerCorner => a == Corner && b == Corner,
            RolePair::AxisAxis => a == Axis && b == Axis,
            RolePair::AxisCorner => a != b,
            RolePair::Any => true,
        }
    }
}

/// Target length and tolerance for one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassBand {
    /// Class this band assigns.
    pub class: EdgeClass,
    /// Theoretical edge length.
    pub target: f64,
    /// Accepted absolute deviation.
    pub tolerance: f64,
    /// Vertex subset the band is evaluated on.
    pub roles: RolePair,
}

impl ClassBand {
    fn contains(&self, distance: f64) -> bool {
        (distance - self.target).abs() < self.tolerance
    }
}

/// The three standard bands at a scale, each accepting `tolerance` meters.
pub fn class_bands(scale: f64, tolerance: f64) -> [ClassBand; 3] {
    EdgeClass::ALL.map(|class| ClassBand {
        class,
        target: class.length_factor() * scale,
        tolerance,
        roles: class.roles(),
    })
}

/// Verify no band can reach another class's target.
///
/// Returns the margin by which the widest tolerance stays below half the
/// smallest gap between target lengths.
pub fn check_bands(bands: &[ClassBand]) -> Result<f64> {
    let mut min_gap = f64::INFINITY;
    for (i, a) in bands.iter().enumerate() {
        for b in &bands[i + 1..] {
            if a.class != b.class {
                min_gap = min_gap.min((a.target - b.target).abs());
            }
        }
    }
    let half_gap = 0.5 * min_gap;

    let mut widest: f64 = 0.0;
    for band in bands {
        if !(band.tolerance > 0.0 && band.tolerance < half_gap) {
            return Err(SynthError::ToleranceTooWide {
                class: band.class,
                tolerance: band.tolerance,
                half_gap,
            });
        }
        widest = widest.max(band.tolerance);
    }
    Ok(half_gap - widest)
}

/// An unordered vertex pair with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePair {
    /// Lower vertex index.
    pub a: usize,
    /// Higher vertex index.
    pub b: usize,
    /// Measured length.
    pub length: f64,
}

impl EdgePair {
    /// Index pair as a tuple.
    pub fn key(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    /// Look up both endpoints, failing on an index outside `vertices`.
    pub fn endpoints<'v>(&self, vertices: &'v [Vertex]) -> Result<(&'v Vertex, &'v Vertex)> {
        let lookup = |index: usize| {
            vertices.get(index).ok_or(SynthError::UnknownVertex {
                index,
                count: vertices.len(),
            })
        };
        Ok((lookup(self.a)?, lookup(self.b)?))
    }
}

/// Classified edges, one list per class in pair-enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSet {
    /// Corner–corner edges.
    pub cube: Vec<EdgePair>,
    /// Axis–axis edges.
    pub octahedron: Vec<EdgePair>,
    /// Axis–corner edges.
    pub rhombic: Vec<EdgePair>,
    /// How far the widest band stays inside half the smallest target gap.
    pub tolerance_margin: f64,
}

impl EdgeSet {
    /// Edges of one class.
    pub fn get(&self, class: EdgeClass) -> &[EdgePair] {
        match class {
            EdgeClass::Cube => &self.cube,
            EdgeClass::Octahedron => &self.octahedron,
            EdgeClass::Rhombic => &self.rhombic,
        }
    }

    fn get_mut(&mut self, class: EdgeClass) -> &mut Vec<EdgePair> {
        match class {
            EdgeClass::Cube => &mut self.cube,
            EdgeClass::Octahedron => &mut self.octahedron,
            EdgeClass::Rhombic => &mut self.rhombic,
        }
    }

    /// Total number of classified pairs.
    pub fn total(&self) -> usize {
        self.cube.len() + self.octahedron.len() + self.rhombic.len()
    }
}

/// Classify all vertex pairs against the given bands.
///
/// The bands are first checked to be mutually unreachable and the resulting
/// margin is kept on the [`EdgeSet`]. A pair that still lands in two bands is
/// reported as [`SynthError::AmbiguousEdge`].
pub fn classify_edges(vertices: &[Vertex], bands: &[ClassBand]) -> Result<EdgeSet> {
    let tolerance_margin = check_bands(bands)?;
    let edges = EdgeSet {
        tolerance_margin,
        ..match_pairs(vertices, bands)?
    };
    debug!(
        cube = edges.cube.len(),
        octahedron = edges.octahedron.len(),
        rhombic = edges.rhombic.len(),
        margin = tolerance_margin,
        "Classified vertex pairs"
    );
    Ok(edges)
}

pub(crate) fn match_pairs(vertices: &[Vertex], bands: &[ClassBand]) -> Result<EdgeSet> {
    let mut edges = EdgeSet::default();

    for (i, va) in vertices.iter().enumerate() {
        for vb in &vertices[i + 1..] {
            let distance = (vb.position - va.position).norm();
            let mut matched: Option<EdgeClass> = None;

            for band in bands {
                if !band.roles.accepts(va.role, vb.role) || !band.contains(distance) {
                    continue;
                }
                if let Some(first) = matched {
                    return Err(SynthError::AmbiguousEdge {
                        a: va.index,
                        b: vb.index,
                        first,
                        second: band.class,
                    });
                }
                matched = Some(band.class);
            }

            if let Some(class) = matched {
                edges.get_mut(class).push(EdgePair {
                    a: va.index,
                    b: vb.index,
                    length: distance,
                });
            }
        }
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::{generate_vertices, VERTEX_COUNT};
    use approx::assert_relative_eq;

    fn class_of(edges: &EdgeSet, a: usize, b: usize) -> Option<EdgeClass> {
        let key = (a.min(b), a.max(b));
        EdgeClass::ALL
            .into_iter()
            .find(|&class| edges.get(class).iter().any(|e| e.key() == key))
    }

    #[test]
    fn test_counts_are_scale_invariant() {
        for scale in [0.01, 0.2, 1.0, 3.0, 250.0] {
            let vertices = generate_vertices(scale);
            let edges = classify_edges(&vertices, &class_bands(scale, 0.01 * scale)).unwrap();
            assert_eq!(edges.cube.len(), 12, "scale {scale}");
            assert_eq!(edges.octahedron.len(), 12, "scale {scale}");
            assert_eq!(edges.rhombic.len(), 24, "scale {scale}");
        }
    }

    #[test]
    fn test_pairs_ordered_and_disjoint() {
        let vertices = generate_vertices(1.0);
        let edges = classify_edges(&vertices, &class_bands(1.0, 0.01)).unwrap();

        let mut seen = std::collections::HashSet::new();
        for class in EdgeClass::ALL {
            for e in edges.get(class) {
                assert!(e.a < e.b);
                assert!(seen.insert(e.key()), "pair {:?} classified twice", e.key());
                assert_relative_eq!(e.length, class.length_factor(), max_relative = 1e-9);
            }
        }
        assert_eq!(seen.len(), edges.total());
        assert!(edges.total() <= VERTEX_COUNT * (VERTEX_COUNT - 1) / 2);
    }

    #[test]
    fn test_roles_per_class() {
        let vertices = generate_vertices(1.0);
        let edges = classify_edges(&vertices, &class_bands(1.0, 0.01)).unwrap();
        for e in &edges.cube {
            assert_eq!(vertices[e.a].role, VertexRole::Corner);
            assert_eq!(vertices[e.b].role, VertexRole::Corner);
        }
        for e in &edges.octahedron {
            assert_eq!(vertices[e.a].role, VertexRole::Axis);
            assert_eq!(vertices[e.b].role, VertexRole::Axis);
        }
        for e in &edges.rhombic {
            assert_eq!(vertices[e.a].role, VertexRole::Axis);
            assert_eq!(vertices[e.b].role, VertexRole::Corner);
        }
    }

    #[test]
    fn test_each_axis_vertex_has_four_rhombic_edges() {
        let vertices = generate_vertices(0.2);
        let edges = classify_edges(&vertices, &class_bands(0.2, 0.002)).unwrap();
        for axis in 0..6 {
            let n = edges.rhombic.iter().filter(|e| e.a == axis).count();
            assert_eq!(n, 4);
        }
        for corner in 6..14 {
            let n = edges.cube.iter().filter(|e| e.a == corner || e.b == corner).count();
            assert_eq!(n, 3);
        }
    }

    #[test]
    fn test_face_diagonals_are_not_octahedron_edges() {
        // Corner face diagonals have the octahedron length but the wrong roles.
        let vertices = generate_vertices(1.0);
        let edges = classify_edges(&vertices, &class_bands(1.0, 0.01)).unwrap();
        assert_eq!(class_of(&edges, 6, 9), None);
        assert_eq!(class_of(&edges, 7, 6), Some(EdgeClass::Cube));
        assert_eq!(class_of(&edges, 0, 2), Some(EdgeClass::Octahedron));
        assert_eq!(class_of(&edges, 0, 1), None);
    }

    #[test]
    fn test_default_tolerance_margin() {
        let bands = class_bands(1.0, 0.01);
        let margin = check_bands(&bands).unwrap();
        // Closest targets are 1.0 and sqrt(0.75).
        let half_gap = 0.5 * (1.0 - 0.75f64.sqrt());
        assert_relative_eq!(margin, half_gap - 0.01, max_relative = 1e-12);

        let edges = classify_edges(&generate_vertices(1.0), &bands).unwrap();
        assert_eq!(edges.tolerance_margin, margin);
    }

    #[test]
    fn test_endpoints_out_of_range() {
        let vertices = generate_vertices(1.0);
        let edge = EdgePair {
            a: 6,
            b: VERTEX_COUNT,
            length: 1.0,
        };
        assert!(matches!(
            edge.endpoints(&vertices),
            Err(SynthError::UnknownVertex { index: VERTEX_COUNT, count: VERTEX_COUNT })
        ));
        let (a, b) = EdgePair { b: 7, ..edge }.endpoints(&vertices).unwrap();
        assert_eq!((a.index, b.index), (6, 7));
    }

    #[test]
    fn test_wide_tolerance_rejected() {
        let err = classify_edges(&generate_vertices(1.0), &class_bands(1.0, 0.08)).unwrap_err();
        assert!(matches!(err, SynthError::ToleranceTooWide { .. }));
    }

    #[test]
    fn test_overlapping_bands_are_ambiguous() {
        let vertices = generate_vertices(1.0);
        let bands = [
            ClassBand {
                class: EdgeClass::Octahedron,
                target: std::f64::consts::SQRT_2,
                tolerance: 0.01,
                roles: RolePair::Any,
            },
            ClassBand {
                class: EdgeClass::Cube,
                target: std::f64::consts::SQRT_2 + 0.005,
                tolerance: 0.01,
                roles: RolePair::Any,
            },
        ];
        assert!(check_bands(&bands).is_err());
        let err = match_pairs(&vertices, &bands).unwrap_err();
        assert!(matches!(
            err,
            SynthError::AmbiguousEdge {
                first: EdgeClass::Octahedron,
                second: EdgeClass::Cube,
                ..
            }
        ));
    }
}
