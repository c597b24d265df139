//! Telescoping pistons on the cube edges.
//!
//! Each piston is a free barrel body with a rod child on a slide joint. The
//! barrel is welded to the lower-index corner and the rod to the other, so
//! driving the slide changes the corner-to-corner distance.

use gyrobot_ir::{Actuator, Body, Contact, Geom, GeomShape, Joint, JointKind, Rgba, Vec3, Weld};
use nalgebra::Vector3;
use tracing::debug;

use crate::classify::{EdgeClass, EdgePair};
use crate::error::{Result, SynthError};
use crate::frame::{to_ir_quat, to_ir_vec, EdgeFrame};
use crate::naming::{self, PistonNames};
use crate::params::SynthParams;
use crate::vertex::{Vertex, VertexRole};

const BARREL_RGBA: Rgba = [0.0, 1.0, 0.0, 1.0];
const ROD_RGBA: Rgba = [0.6, 1.0, 0.6, 1.0];

/// Lengths of one piston along its local z axis.
///
/// The barrel occupies `[-L/2, -L/2 + barrel]` and the rod, at zero slide,
/// `[L/2 - rod, L/2]`, so the closed piston spans exactly the edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PistonGeometry {
    /// Edge length `L`.
    pub edge_length: f64,
    /// Barrel length.
    pub barrel_length: f64,
    /// Rod length.
    pub rod_length: f64,
    /// Slide half-range.
    pub stroke: f64,
}

impl PistonGeometry {
    /// Geometry for an edge of the given length.
    pub fn new(edge_length: f64, params: &SynthParams) -> Self {
        let part = params.piston.length_ratio * edge_length;
        Self {
            edge_length,
            barrel_length: part,
            rod_length: part,
            stroke: params.stroke(),
        }
    }

    /// Barrel/rod overlap at slide position `q`. Positive `q` extends.
    pub fn overlap_at(&self, q: f64) -> f64 {
        self.barrel_length + self.rod_length - self.edge_length - q
    }

    /// Overlap at full extension.
    pub fn min_overlap(&self) -> f64 {
        self.overlap_at(self.stroke)
    }

    /// Barrel length left behind the rod at full retraction.
    pub fn retraction_travel(&self) -> f64 {
        self.edge_length - self.rod_length - self.stroke
    }

    /// Local z span of the barrel.
    pub fn barrel_span(&self) -> (f64, f64) {
        let start = -0.5 * self.edge_length;
        (start, start + self.barrel_length)
    }

    /// Local z span of the rod at zero slide.
    pub fn rod_span(&self) -> (f64, f64) {
        let end = 0.5 * self.edge_length;
        (end - self.rod_length, end)
    }

    fn check(&self, edge: &EdgePair) -> Result<()> {
        let overlap = self.min_overlap();
        let travel = self.retraction_travel();
        if overlap > 0.0 && travel >= 0.0 {
            Ok(())
        } else {
            Err(SynthError::PistonSeparation {
                a: edge.a,
                b: edge.b,
                overlap,
                travel,
            })
        }
    }
}

/// A piston and the constraints binding it to its corners.
#[derive(Debug, Clone)]
pub struct PistonAssembly {
    /// Cube edge the piston spans.
    pub edge: EdgePair,
    /// Along-edge dimensions.
    pub geometry: PistonGeometry,
    /// Barrel body with the rod nested inside.
    pub body: Body,
    /// Barrel-to-corner and rod-to-corner welds.
    pub welds: [Weld; 2],
    /// Position servo on the slide joint.
    pub actuator: Actuator,
}

/// Build one piston per cube edge, in edge order.
pub fn synthesize_pistons(
    vertices: &[Vertex],
    edges: &[EdgePair],
    params: &SynthParams,
) -> Result<Vec<PistonAssembly>> {
    let pistons = edges
        .iter()
        .map(|edge| build_piston(vertices, edge, params))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = pistons.len(), "Built cube-edge pistons");
    Ok(pistons)
}

fn build_piston(
    vertices: &[Vertex],
    edge: &EdgePair,
    params: &SynthParams,
) -> Result<PistonAssembly> {
    let (va, vb) = edge.endpoints(vertices)?;
    if va.role != VertexRole::Corner || vb.role != VertexRole::Corner {
        return Err(SynthError::RoleMismatch {
            class: EdgeClass::Cube,
            a: edge.a,
            b: edge.b,
        });
    }
    let frame = EdgeFrame::along(&va.position, &vb.position).ok_or(SynthError::DegenerateEdge {
        a: edge.a,
        b: edge.b,
    })?;

    let geometry = PistonGeometry::new(frame.length, params);
    geometry.check(edge)?;

    let names = PistonNames::new(edge.a, edge.b);
    let p = &params.piston;
    let z = |t: f64| to_ir_vec(&(Vector3::z() * t));

    let (rod_from, rod_to) = geometry.rod_span();
    let mut rod = Body::new(&names.rod, Vec3::zero());
    rod.joints.push(Joint {
        name: names.slide.clone(),
        kind: JointKind::Slide {
            axis: z(1.0),
            range: Some((-geometry.stroke, geometry.stroke)),
        },
        damping: None,
    });
    rod.geoms.push(Geom {
        name: names.rod_geom.clone(),
        shape: GeomShape::Cylinder {
            radius: p.rod_radius_ratio * params.scale,
            from: z(rod_from),
            to: z(rod_to),
        },
        rgba: ROD_RGBA,
        mass: Some(p.rod_mass),
        contact: Contact::Visual,
    });

    let origin = frame.origin;
    let (barrel_from, barrel_to) = geometry.barrel_span();
    let mut barrel = Body::new(
        &names.barrel,
        Vec3::new(origin.x, origin.y, origin.z + params.height),
    );
    barrel.quat = Some(to_ir_quat(&frame.rotation()));
    barrel.joints.push(Joint {
        name: names.free_joint.clone(),
        kind: JointKind::Free,
        damping: None,
    });
    barrel.geoms.push(Geom {
        name: names.barrel_geom.clone(),
        shape: GeomShape::Cylinder {
            radius: p.barrel_radius_ratio * params.scale,
            from: z(barrel_from),
            to: z(barrel_to),
        },
        rgba: BARREL_RGBA,
        mass: Some(p.barrel_mass),
        contact: Contact::Visual,
    });
    barrel.children.push(rod);

    let welds = [
        Weld {
            name: names.barrel_weld.clone(),
            body1: names.barrel.clone(),
            body2: naming::corner_body(edge.a),
        },
        Weld {
            name: names.rod_weld.clone(),
            body1: names.rod.clone(),
            body2: naming::corner_body(edge.b),
        },
    ];

    let actuator = Actuator {
        name: names.actuator,
        joint: names.slide,
        kp: p.gain,
        ctrl_range: (-geometry.stroke, geometry.stroke),
    };

    Ok(PistonAssembly {
        edge: *edge,
        geometry,
        body: barrel,
        welds,
        actuator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{class_bands, classify_edges};
    use crate::vertex::generate_vertices;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn build(params: &SynthParams) -> Result<Vec<PistonAssembly>> {
        let vertices = generate_vertices(params.scale);
        let bands = class_bands(params.scale, params.tolerance());
        let edges = classify_edges(&vertices, &bands)?;
        synthesize_pistons(&vertices, &edges.cube, params)
    }

    #[test]
    fn test_one_piston_per_cube_edge() {
        let pistons = build(&SynthParams::with_scale(1.0)).unwrap();
        assert_eq!(pistons.len(), 12);
        let first = &pistons[0];
        assert_eq!(first.edge.key(), (6, 7));
        assert_eq!(first.body.name, "piston_6_7_barrel");
        assert_eq!(first.body.children[0].name, "piston_6_7_rod");
        assert_eq!(first.actuator.joint, "piston_6_7_slide");
    }

    #[test]
    fn test_welds_bind_both_ends() {
        for piston in build(&SynthParams::default()).unwrap() {
            let (a, b) = piston.edge.key();
            assert_eq!(piston.welds[0].body1, piston.body.name);
            assert_eq!(piston.welds[0].body2, format!("corner_{a}"));
            assert_eq!(piston.welds[1].body1, piston.body.children[0].name);
            assert_eq!(piston.welds[1].body2, format!("corner_{b}"));
        }
    }

    #[test]
    fn test_barrel_sits_on_raised_midpoint() {
        let params = SynthParams::with_scale(1.0);
        let pistons = build(&params).unwrap();
        // Edge (6, 7) runs along z at x = y = -0.5.
        let barrel = &pistons[0].body;
        assert_relative_eq!(barrel.pos.x, -0.5);
        assert_relative_eq!(barrel.pos.y, -0.5);
        assert_relative_eq!(barrel.pos.z, params.height);
        let q = barrel.quat.unwrap();
        assert_relative_eq!(q.w, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closed_piston_spans_edge() {
        let params = SynthParams::with_scale(0.2);
        let g = PistonGeometry::new(0.2, &params);
        assert_relative_eq!(g.barrel_span().0, -0.1, epsilon = 1e-12);
        assert_relative_eq!(g.rod_span().1, 0.1, epsilon = 1e-12);
        // 0.6 + 0.6 - 1 - 0.15 of the edge.
        assert_relative_eq!(g.min_overlap(), 0.05 * 0.2, epsilon = 1e-12);
        assert!(g.retraction_travel() > 0.0);
    }

    #[test]
    fn test_slide_range_and_actuator_match_stroke() {
        let params = SynthParams::default();
        let stroke = params.stroke();
        for piston in build(&params).unwrap() {
            let rod = &piston.body.children[0];
            match &rod.joints[0].kind {
                JointKind::Slide { axis, range } => {
                    assert_eq!(axis.to_array(), [0.0, 0.0, 1.0]);
                    assert_eq!(*range, Some((-stroke, stroke)));
                }
                other => panic!("expected slide, got {other:?}"),
            }
            assert_eq!(piston.actuator.ctrl_range, (-stroke, stroke));
        }
    }

    #[test]
    fn test_long_stroke_separates() {
        let mut params = SynthParams::with_scale(1.0);
        params.piston.stroke_ratio = 0.3;
        let err = build(&params).unwrap_err();
        assert!(matches!(err, SynthError::PistonSeparation { a: 6, b: 7, .. }));
    }

    #[test]
    fn test_rejects_non_corner_edge() {
        let params = SynthParams::with_scale(1.0);
        let vertices = generate_vertices(1.0);
        let edge = EdgePair {
            a: 0,
            b: 2,
            length: 2f64.sqrt(),
        };
        let err = synthesize_pistons(&vertices, &[edge], &params).unwrap_err();
        assert!(matches!(err, SynthError::RoleMismatch { class: EdgeClass::Cube, .. }));
    }

    #[test]
    fn test_coincident_corners_are_degenerate() {
        let params = SynthParams::with_scale(1.0);
        let corner = |index| Vertex {
            index,
            role: VertexRole::Corner,
            position: Point3::new(0.5, 0.5, 0.5),
        };
        let vertices = [corner(0), corner(1)];
        let edge = EdgePair {
            a: 0,
            b: 1,
            length: 0.0,
        };
        let err = synthesize_pistons(&vertices, &[edge], &params).unwrap_err();
        assert!(matches!(err, SynthError::DegenerateEdge { a: 0, b: 1 }));
    }

    #[test]
    fn test_rejects_unknown_vertex() {
        let params = SynthParams::with_scale(1.0);
        let vertices = generate_vertices(1.0);
        let edge = EdgePair {
            a: 13,
            b: 14,
            length: 1.0,
        };
        let err = synthesize_pistons(&vertices, &[edge], &params).unwrap_err();
        assert!(matches!(err, SynthError::UnknownVertex { index: 14, count: 14 }));
    }
}
