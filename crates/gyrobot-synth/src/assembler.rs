//! Scene graph assembly: root body, nested gimbal rings, corner nodes.
//!
//! The root body floats freely and carries the stabilizing mass. It nests
//! three hinge stages (outer about x, middle about y, inner about z). Each
//! stage draws its ring as two open arcs and carries the two axis vertices on
//! its rotation axis. Corner vertices become independent free bodies.

use std::f64::consts::{FRAC_PI_2, PI};

use gyrobot_ir::{
    Actuator, Body, Contact, Geom, GeomShape, Inertial, Joint, JointKind, Rgba, Site, Vec3,
};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::frame::to_ir_vec;
use crate::naming;
use crate::params::SynthParams;
use crate::vertex::{Axis, Vertex, VertexRole};

pub(crate) const RING_RGBA: Rgba = [0.6, 0.6, 0.7, 1.0];
pub(crate) const AXIS_RGBA: Rgba = [0.2, 0.4, 1.0, 1.0];
pub(crate) const STRUT_RGBA: Rgba = [0.0, 0.0, 1.0, 1.0];
pub(crate) const CORNER_RGBA: Rgba = [0.8, 0.8, 0.8, 1.0];
pub(crate) const SITE_RGBA: Rgba = [1.0, 1.0, 1.0, 0.5];

/// Corner markers are the only geoms that touch the ground.
pub(crate) const CORNER_CONTACT: Contact = Contact::Collide {
    condim: 3,
    friction: [1.0, 0.005, 0.0001],
};

/// One of the three nested gimbal stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingStage {
    /// Child of the root, rotates about x.
    Outer,
    /// Child of the outer ring, rotates about y.
    Middle,
    /// Child of the middle ring, rotates about z.
    Inner,
}

impl RingStage {
    /// Stages from outermost to innermost.
    pub const ALL: [RingStage; 3] = [RingStage::Outer, RingStage::Middle, RingStage::Inner];

    /// Rotation axis of the stage hinge.
    pub fn axis(self) -> Axis {
        match self {
            RingStage::Outer => Axis::X,
            RingStage::Middle => Axis::Y,
            RingStage::Inner => Axis::Z,
        }
    }

    /// Second axis spanning the ring plane. The ring openings sit on it.
    pub fn plane_axis(self) -> Axis {
        match self {
            RingStage::Outer => Axis::Y,
            RingStage::Middle => Axis::Z,
            RingStage::Inner => Axis::X,
        }
    }

    /// Name fragment.
    pub fn label(self) -> &'static str {
        match self {
            RingStage::Outer => "outer",
            RingStage::Middle => "middle",
            RingStage::Inner => "inner",
        }
    }

    fn depth(self) -> usize {
        match self {
            RingStage::Outer => 0,
            RingStage::Middle => 1,
            RingStage::Inner => 2,
        }
    }

    /// Ring radius in meters.
    pub fn radius(self, params: &SynthParams) -> f64 {
        params.gimbal.ring_radius_ratios[self.depth()] * params.scale
    }
}

/// Output of the assembler.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Root body with the nested gimbal.
    pub root: Body,
    /// One free body per corner vertex, in vertex order.
    pub corners: Vec<Body>,
    /// One position actuator per ring hinge, outer first.
    pub gimbal_actuators: Vec<Actuator>,
}

/// Build the gimbal hierarchy and the corner bodies.
pub fn assemble(vertices: &[Vertex], params: &SynthParams) -> Assembly {
    let mut root = Body::new(naming::ROOT_BODY, Vec3::new(0.0, 0.0, params.height));
    root.joints.push(Joint {
        name: naming::ROOT_JOINT.into(),
        kind: JointKind::Free,
        damping: None,
    });
    // Solid-sphere inertia for a core of radius scale/4.
    let core_radius = 0.25 * params.scale;
    let i = 0.4 * params.gimbal.root_mass * core_radius * core_radius;
    root.inertial = Some(Inertial {
        mass: params.gimbal.root_mass,
        diaginertia: Vec3::new(i, i, i),
    });
    root.geoms.push(Geom {
        name: naming::ROOT_CORE.into(),
        shape: GeomShape::Sphere {
            radius: core_radius,
            center: Vec3::zero(),
        },
        rgba: RING_RGBA,
        mass: None,
        contact: Contact::Visual,
    });

    let rings: Vec<Body> = RingStage::ALL
        .iter()
        .map(|&stage| build_ring(stage, vertices, params))
        .collect();
    // Nest inner into middle into outer.
    let gimbal = rings.into_iter().rev().reduce(|child, mut parent| {
        parent.children.push(child);
        parent
    });
    root.children.extend(gimbal);

    let corners: Vec<Body> = vertices
        .iter()
        .filter(|v| v.role == VertexRole::Corner)
        .map(|v| corner_body(v, params))
        .collect();

    let gimbal_actuators = RingStage::ALL
        .iter()
        .map(|stage| Actuator {
            name: naming::ring_actuator(stage.label()),
            joint: naming::ring_hinge(stage.label()),
            kp: params.gimbal.gain,
            ctrl_range: (-PI, PI),
        })
        .collect();

    debug!(corners = corners.len(), "Assembled gimbal and corner nodes");

    Assembly {
        root,
        corners,
        gimbal_actuators,
    }
}

/// One ring stage without its nested child.
fn build_ring(stage: RingStage, vertices: &[Vertex], params: &SynthParams) -> Body {
    let label = stage.label();
    let mut ring = Body::new(naming::ring_body(label), Vec3::zero());
    ring.joints.push(Joint {
        name: naming::ring_hinge(label),
        kind: JointKind::Hinge {
            axis: to_ir_vec(&stage.axis().unit()),
            range: None,
        },
        damping: Some(params.gimbal.damping),
    });
    ring.geoms.extend(ring_arcs(stage, params));

    let radius = stage.radius(params);
    for vertex in vertices {
        let Some((axis, positive)) = vertex.axis_direction() else {
            continue;
        };
        if axis != stage.axis() {
            continue;
        }
        let sign = if positive { 1.0 } else { -1.0 };
        let pivot = Point3::from(axis.unit() * (sign * radius));
        let (geoms, site) = axis_node(vertex, &pivot, params);
        ring.geoms.extend(geoms);
        ring.sites.push(site);
    }

    ring
}

/// Two open arcs of straight capsule segments.
///
/// Arc 0 is centred on the positive rotation axis, arc 1 on the negative one.
/// The openings of width `arc_gap` are centred on the plane axis, where the
/// next stage's pivots pass through.
fn ring_arcs(stage: RingStage, params: &SynthParams) -> Vec<Geom> {
    let g = &params.gimbal;
    let radius = stage.radius(params);
    let u = stage.axis().unit();
    let v = stage.plane_axis().unit();
    let segments = g.arc_segments as usize;
    let half_span = FRAC_PI_2 - 0.5 * g.arc_gap;
    let segment_mass = g.ring_mass / (2 * segments) as f64;
    let point = |theta: f64| -> Vector3<f64> { (u * theta.cos() + v * theta.sin()) * radius };

    let mut geoms = Vec::with_capacity(2 * segments);
    for arc in 0..2 {
        let center = arc as f64 * PI;
        let start = center - half_span;
        let step = 2.0 * half_span / segments as f64;
        for k in 0..segments {
            let from = point(start + k as f64 * step);
            let to = point(start + (k + 1) as f64 * step);
            geoms.push(Geom {
                name: naming::ring_arc(stage.label(), arc, k),
                shape: GeomShape::Capsule {
                    radius: g.tube_radius_ratio * params.scale,
                    from: to_ir_vec(&from),
                    to: to_ir_vec(&to),
                },
                rgba: RING_RGBA,
                mass: Some(segment_mass),
                contact: Contact::Visual,
            });
        }
    }
    geoms
}

/// Marker, strut and anchor site of an axis vertex, in the ring frame.
fn axis_node(vertex: &Vertex, pivot: &Point3<f64>, params: &SynthParams) -> (Vec<Geom>, Site) {
    let n = &params.nodes;
    let pos = to_ir_vec(&vertex.position.coords);
    let marker = Geom {
        name: naming::axis_marker(vertex.index),
        shape: GeomShape::Sphere {
            radius: n.radius_ratio * params.scale,
            center: pos,
        },
        rgba: AXIS_RGBA,
        mass: Some(n.axis_mass),
        contact: Contact::Visual,
    };
    let strut = Geom {
        name: naming::axis_strut(vertex.index),
        shape: GeomShape::Capsule {
            radius: n.strut_radius_ratio * params.scale,
            from: to_ir_vec(&pivot.coords),
            to: pos,
        },
        rgba: STRUT_RGBA,
        mass: None,
        contact: Contact::Visual,
    };
    let site = Site {
        name: naming::axis_site(vertex.index),
        pos,
        size: site_size(params),
        rgba: SITE_RGBA,
    };
    (vec![marker, strut], site)
}

/// Free-floating body for a corner vertex, raised to the placement height.
fn corner_body(vertex: &Vertex, params: &SynthParams) -> Body {
    let p = vertex.position;
    let mut body = Body::new(
        naming::corner_body(vertex.index),
        Vec3::new(p.x, p.y, p.z + params.height),
    );
    body.joints.push(Joint {
        name: naming::corner_joint(vertex.index),
        kind: JointKind::Free,
        damping: None,
    });
    body.geoms.push(Geom {
        name: naming::corner_marker(vertex.index),
        shape: GeomShape::Sphere {
            radius: params.nodes.radius_ratio * params.scale,
            center: Vec3::zero(),
        },
        rgba: CORNER_RGBA,
        mass: Some(params.nodes.corner_mass),
        contact: CORNER_CONTACT,
    });
    body.sites.push(Site {
        name: naming::corner_site(vertex.index),
        pos: Vec3::zero(),
        size: site_size(params),
        rgba: SITE_RGBA,
    });
    body
}

pub(crate) fn site_size(params: &SynthParams) -> f64 {
    0.5 * params.nodes.radius_ratio * params.scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::generate_vertices;
    use approx::assert_relative_eq;

    fn assemble_default() -> (Assembly, SynthParams) {
        let params = SynthParams::with_scale(1.0);
        let vertices = generate_vertices(params.scale);
        (assemble(&vertices, &params), params)
    }

    #[test]
    fn test_gimbal_nesting_order() {
        let (assembly, _) = assemble_default();
        let root = &assembly.root;
        assert_eq!(root.name, "gyro_root");
        assert_eq!(root.children.len(), 1);
        let outer = &root.children[0];
        let middle = &outer.children[0];
        let inner = &middle.children[0];
        assert_eq!(outer.name, "gimbal_outer");
        assert_eq!(middle.name, "gimbal_middle");
        assert_eq!(inner.name, "gimbal_inner");
        assert!(inner.children.is_empty());

        let axes: Vec<_> = [outer, middle, inner]
            .iter()
            .map(|b| match &b.joints[0].kind {
                JointKind::Hinge { axis, .. } => axis.to_array(),
                other => panic!("expected hinge, got {other:?}"),
            })
            .collect();
        assert_eq!(axes, vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_each_ring_carries_its_axis_vertices() {
        let (assembly, _) = assemble_default();
        let outer = &assembly.root.children[0];
        let middle = &outer.children[0];
        let inner = &middle.children[0];
        let sites = |b: &Body| b.sites.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
        assert_eq!(sites(outer), vec!["axis_0_site", "axis_1_site"]);
        assert_eq!(sites(middle), vec!["axis_2_site", "axis_3_site"]);
        assert_eq!(sites(inner), vec!["axis_4_site", "axis_5_site"]);
    }

    #[test]
    fn test_ring_arcs_leave_gaps() {
        let params = SynthParams::with_scale(1.0);
        let arcs = ring_arcs(RingStage::Outer, &params);
        assert_eq!(arcs.len(), 2 * params.gimbal.arc_segments as usize);

        let radius = RingStage::Outer.radius(&params);
        let gap_edge = (0.5 * params.gimbal.arc_gap).sin() * radius;
        for geom in &arcs {
            let GeomShape::Capsule { from, to, .. } = &geom.shape else {
                panic!("arc segment is not a capsule");
            };
            for p in [from, to] {
                // Ring lies in the xy plane at its radius.
                assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
                assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), radius, epsilon = 1e-12);
                // Nothing reaches into the openings around ±y.
                assert!(p.x.abs() >= gap_edge - 1e-12);
            }
        }
    }

    #[test]
    fn test_ring_mass_is_spread_over_segments() {
        let params = SynthParams::default();
        let total: f64 = ring_arcs(RingStage::Middle, &params)
            .iter()
            .filter_map(|g| g.mass)
            .sum();
        assert_relative_eq!(total, params.gimbal.ring_mass, epsilon = 1e-12);
    }

    #[test]
    fn test_struts_connect_ring_to_vertex() {
        let (assembly, params) = assemble_default();
        let middle = &assembly.root.children[0].children[0];
        let strut = middle
            .geoms
            .iter()
            .find(|g| g.name == "axis_3_strut")
            .unwrap();
        let GeomShape::Capsule { from, to, .. } = &strut.shape else {
            panic!("strut is not a capsule");
        };
        let r = RingStage::Middle.radius(&params);
        assert_eq!(from.to_array(), [0.0, -r, 0.0]);
        assert_eq!(to.to_array(), [0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_corner_bodies_are_raised_free_bodies() {
        let (assembly, params) = assemble_default();
        assert_eq!(assembly.corners.len(), 8);
        let first = &assembly.corners[0];
        assert_eq!(first.name, "corner_6");
        assert_eq!(first.joints[0].kind, JointKind::Free);
        assert_relative_eq!(first.pos.z, -0.5 + params.height);
        assert_eq!(first.sites[0].name, "corner_6_site");
        assert!(matches!(first.geoms[0].contact, Contact::Collide { condim: 3, .. }));
    }

    #[test]
    fn test_gimbal_actuators() {
        let (assembly, _) = assemble_default();
        let joints: Vec<_> = assembly
            .gimbal_actuators
            .iter()
            .map(|a| a.joint.as_str())
            .collect();
        assert_eq!(
            joints,
            vec!["gimbal_outer_hinge", "gimbal_middle_hinge", "gimbal_inner_hinge"]
        );
    }
}
