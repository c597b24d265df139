//! Orientation frames for bodies laid along an edge.

use gyrobot_ir::{Quat, Vec3};
use nalgebra::{Point3, Rotation3, Unit, UnitQuaternion, Vector3};

type Dir3 = Unit<Vector3<f64>>;

/// Edges shorter than this cannot be oriented.
pub const MIN_EDGE_LENGTH: f64 = 1e-12;

/// Right-handed orthonormal frame centred on an edge.
///
/// The primary axis runs from the edge start to its end and becomes the
/// body's local z axis, the axis MJCF capsules, cylinders and slide joints
/// are expressed along.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFrame {
    /// Edge midpoint.
    pub origin: Point3<f64>,
    /// Edge length.
    pub length: f64,
    /// Local x.
    pub normal: Dir3,
    /// Local y.
    pub binormal: Dir3,
    /// Local z, along the edge.
    pub primary: Dir3,
}

impl EdgeFrame {
    /// Frame for the edge `from → to`; `None` if the endpoints coincide.
    pub fn along(from: &Point3<f64>, to: &Point3<f64>) -> Option<Self> {
        let direction = to - from;
        let length = direction.norm();
        if !(length > MIN_EDGE_LENGTH) {
            return None;
        }
        let primary = Dir3::new_normalize(direction);

        // Any vector not parallel to the edge; y keeps z-aligned edges at identity.
        let helper = if primary.y.abs() < 0.9 {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let normal = Dir3::new_normalize(helper.cross(primary.as_ref()));
        let binormal = Dir3::new_normalize(primary.cross(normal.as_ref()));

        Some(Self {
            origin: nalgebra::center(from, to),
            length,
            normal,
            binormal,
            primary,
        })
    }

    /// Rotation taking local coordinates to the parent frame.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        let basis = Rotation3::from_basis_unchecked(&[
            self.normal.into_inner(),
            self.binormal.into_inner(),
            self.primary.into_inner(),
        ]);
        let q = UnitQuaternion::from_rotation_matrix(&basis);
        // q and -q are the same rotation; pick w >= 0 so output is canonical.
        if q.w < 0.0 {
            UnitQuaternion::new_unchecked(-q.into_inner())
        } else {
            q
        }
    }
}

/// Convert a nalgebra quaternion to the IR's `w x y z` form.
pub fn to_ir_quat(q: &UnitQuaternion<f64>) -> Quat {
    Quat::new(q.w, q.i, q.j, q.k)
}

/// Convert a nalgebra vector to the IR vector.
pub fn to_ir_vec(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_primary_axis_follows_edge() {
        let from = Point3::new(1.0, -2.0, 0.5);
        let to = Point3::new(-0.5, 1.0, 3.0);
        let frame = EdgeFrame::along(&from, &to).unwrap();
        let local_z = frame.rotation() * Vector3::z();
        let expected = (to - from).normalize();
        assert_relative_eq!(local_z, expected, epsilon = 1e-12);
        assert_relative_eq!(frame.length, (to - from).norm(), epsilon = 1e-12);
    }

    #[test]
    fn test_frame_is_orthonormal_and_right_handed() {
        let dirs = [
            Vector3::x(),
            Vector3::y(),
            Vector3::z(),
            -Vector3::y(),
            Vector3::new(1.0, 1.0, 1.0),
        ];
        for dir in dirs {
            let frame = EdgeFrame::along(&Point3::origin(), &Point3::from(dir)).unwrap();
            assert_relative_eq!(frame.normal.dot(frame.binormal.as_ref()), 0.0, epsilon = 1e-12);
            assert_relative_eq!(frame.normal.dot(frame.primary.as_ref()), 0.0, epsilon = 1e-12);
            let z = frame.normal.cross(frame.binormal.as_ref());
            assert_relative_eq!(z, frame.primary.into_inner(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_z_aligned_edge_is_identity() {
        let from = Point3::new(0.0, 0.0, -1.0);
        let frame = EdgeFrame::along(&from, &Point3::new(0.0, 0.0, 1.0)).unwrap();
        let q = frame.rotation();
        assert_relative_eq!(q.angle(), 0.0, epsilon = 1e-12);
        assert!(q.w > 0.0);
    }

    #[test]
    fn test_endpoints_map_to_local_axis() {
        let from = Point3::new(0.5, -0.5, 0.5);
        let to = Point3::new(0.5, 0.5, 0.5);
        let frame = EdgeFrame::along(&from, &to).unwrap();
        let inverse = frame.rotation().inverse();
        let start = inverse * (from - frame.origin);
        let end = inverse * (to - frame.origin);
        assert_relative_eq!(start, Vector3::new(0.0, 0.0, -0.5), epsilon = 1e-12);
        assert_relative_eq!(end, Vector3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_edge() {
        let p = Point3::new(0.3, 0.3, 0.3);
        assert!(EdgeFrame::along(&p, &p).is_none());
    }
}
