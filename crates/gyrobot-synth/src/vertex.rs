//! Canonical vertex set of the rhombic dodecahedron.
//!
//! Six axis vertices (octahedron tips) at distance `scale` from the center,
//! followed by eight corner vertices (cube corners) at `±0.5·scale` per axis.
//! Indices are assigned in that fixed order and are the only cross-reference
//! key used downstream.

use nalgebra::{Point3, Vector3};

/// Number of axis vertices.
pub const AXIS_VERTEX_COUNT: usize = 6;

/// Number of corner vertices.
pub const CORNER_VERTEX_COUNT: usize = 8;

/// Total vertex count.
pub const VERTEX_COUNT: usize = AXIS_VERTEX_COUNT + CORNER_VERTEX_COUNT;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in enumeration order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along the positive direction.
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Lower-case label.
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    fn ordinal(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Role of a vertex in the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRole {
    /// Gimbal-carried anchor on a coordinate axis.
    Axis,
    /// Free-floating cube-corner node.
    Corner,
}

/// A generated vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Stable index (axis vertices first).
    pub index: usize,
    /// Role in the mechanism.
    pub role: VertexRole,
    /// Position relative to the mechanism center.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Coordinate axis and sign for an axis vertex, `None` for corners.
    pub fn axis_direction(&self) -> Option<(Axis, bool)> {
        match self.role {
            VertexRole::Axis => Some((Axis::ALL[self.index / 2], self.index % 2 == 0)),
            VertexRole::Corner => None,
        }
    }
}

/// Index of the axis vertex on `axis` with the given sign.
pub fn axis_vertex_index(axis: Axis, positive: bool) -> usize {
    axis.ordinal() * 2 + usize::from(!positive)
}

/// Generate the 14 vertices at the given scale.
///
/// Axis vertices come in the order +x, −x, +y, −y, +z, −z; corners follow
/// in nested x → y → z loops, negative before positive.
pub fn generate_vertices(scale: f64) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(VERTEX_COUNT);

    for axis in Axis::ALL {
        for sign in [1.0, -1.0] {
            vertices.push(Vertex {
                index: vertices.len(),
                role: VertexRole::Axis,
                position: Point3::from(axis.unit() * (sign * scale)),
            });
        }
    }

    let half = 0.5 * scale;
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                vertices.push(Vertex {
                    index: vertices.len(),
                    role: VertexRole::Corner,
                    position: Point3::new(sx * half, sy * half, sz * half),
                });
            }
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts_and_order() {
        let vertices = generate_vertices(1.0);
        assert_eq!(vertices.len(), VERTEX_COUNT);
        for (i, v) in vertices.iter().enumerate() {
            assert_eq!(v.index, i);
            let expected = if i < AXIS_VERTEX_COUNT {
                VertexRole::Axis
            } else {
                VertexRole::Corner
            };
            assert_eq!(v.role, expected);
        }
    }

    #[test]
    fn test_distances_from_center() {
        for scale in [0.05, 0.2, 1.0, 7.5] {
            for v in generate_vertices(scale) {
                let r = v.position.coords.norm();
                match v.role {
                    VertexRole::Axis => assert_relative_eq!(r, scale, max_relative = 1e-12),
                    VertexRole::Corner => {
                        assert_relative_eq!(r, scale * 0.75f64.sqrt(), max_relative = 1e-12)
                    }
                }
            }
        }
    }

    #[test]
    fn test_axis_enumeration() {
        let vertices = generate_vertices(2.0);
        assert_eq!(vertices[0].position, Point3::new(2.0, 0.0, 0.0));
        assert_eq!(vertices[1].position, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(vertices[3].position, Point3::new(0.0, -2.0, 0.0));
        assert_eq!(vertices[5].position, Point3::new(0.0, 0.0, -2.0));
        assert_eq!(vertices[4].axis_direction(), Some((Axis::Z, true)));
        assert_eq!(vertices[3].axis_direction(), Some((Axis::Y, false)));
        assert_eq!(vertices[6].axis_direction(), None);
        for axis in Axis::ALL {
            for positive in [true, false] {
                let i = axis_vertex_index(axis, positive);
                assert_eq!(vertices[i].axis_direction(), Some((axis, positive)));
            }
        }
    }

    #[test]
    fn test_corner_enumeration() {
        let vertices = generate_vertices(1.0);
        assert_eq!(vertices[6].position, Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(vertices[7].position, Point3::new(-0.5, -0.5, 0.5));
        assert_eq!(vertices[8].position, Point3::new(-0.5, 0.5, -0.5));
        assert_eq!(vertices[13].position, Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_deterministic() {
        let a = generate_vertices(0.2);
        let b = generate_vertices(0.2);
        assert_eq!(a, b);
    }
}
