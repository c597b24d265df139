#![warn(missing_docs)]

//! Scene representation for the gyrobot structure synthesizer.
//!
//! This crate defines the entity graph that sits between synthesis and
//! serialization: bodies nested in a tree, their joints, geoms and sites,
//! plus the global tendon, equality and actuator lists.
//!
//! The IR is purely declarative — no simulation state, just the structure.
//! Rendering to the physics engine's text format is handled by `gyrobot-mjcf`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D vector with f64 components (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Components as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Unit quaternion in `w, x, y, z` order, the order MJCF expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    /// Scalar part.
    pub w: f64,
    /// X component of the vector part.
    pub x: f64,
    /// Y component of the vector part.
    pub y: f64,
    /// Z component of the vector part.
    pub z: f64,
}

impl Quat {
    /// Create a new quaternion from its components.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }
}

/// RGBA colour, components in 0.0..1.0.
pub type Rgba = [f64; 4];

/// Degrees of freedom a joint adds between a body and its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JointKind {
    /// Six-DOF floating joint.
    Free,
    /// Rotation about an axis in the body frame.
    Hinge {
        /// Rotation axis (body frame).
        axis: Vec3,
        /// Optional `(lower, upper)` range in radians.
        range: Option<(f64, f64)>,
    },
    /// Translation along an axis in the body frame.
    Slide {
        /// Translation axis (body frame).
        axis: Vec3,
        /// Optional `(lower, upper)` range in meters.
        range: Option<(f64, f64)>,
    },
}

/// A joint attached to a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Globally unique name.
    pub name: String,
    /// Joint type and axis.
    pub kind: JointKind,
    /// Optional passive damping.
    pub damping: Option<f64>,
}

/// Geometric primitive of a geom.
///
/// Capsules and cylinders are given by their end points, in the owning
/// body's frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeomShape {
    /// Sphere at `center`.
    Sphere {
        /// Sphere radius.
        radius: f64,
        /// Center in the body frame.
        center: Vec3,
    },
    /// Capsule between two points.
    Capsule {
        /// Capsule radius.
        radius: f64,
        /// Start point.
        from: Vec3,
        /// End point.
        to: Vec3,
    },
    /// Cylinder between two points.
    Cylinder {
        /// Cylinder radius.
        radius: f64,
        /// Start point.
        from: Vec3,
        /// End point.
        to: Vec3,
    },
}

impl GeomShape {
    /// Characteristic size of the primitive: the radius, or for capsules and
    /// cylinders the smaller of radius and length.
    ///
    /// The serializer refuses geoms whose extent is not positive.
    pub fn extent(&self) -> f64 {
        match self {
            GeomShape::Sphere { radius, .. } => *radius,
            GeomShape::Capsule { radius, from, to } | GeomShape::Cylinder { radius, from, to } => {
                let d = [to.x - from.x, to.y - from.y, to.z - from.z];
                let length = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
                // Not f64::min, which would hide a NaN radius.
                if length < *radius {
                    length
                } else {
                    *radius
                }
            }
        }
    }
}

/// How a geom takes part in contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Contact {
    /// Visual only: never generates contacts.
    Visual,
    /// Collides with the environment.
    Collide {
        /// Contact dimensionality (3 = frictional point contact).
        condim: u32,
        /// Sliding, torsional and rolling friction.
        friction: [f64; 3],
    },
}

/// A geom attached to a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geom {
    /// Globally unique name.
    pub name: String,
    /// Primitive and placement.
    pub shape: GeomShape,
    /// Display colour.
    pub rgba: Rgba,
    /// Explicit mass; `None` lets the engine infer it from density.
    pub mass: Option<f64>,
    /// Contact participation.
    pub contact: Contact,
}

/// A named anchor point inside a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Globally unique name.
    pub name: String,
    /// Position in the body frame.
    pub pos: Vec3,
    /// Display radius.
    pub size: f64,
    /// Display colour.
    pub rgba: Rgba,
}

/// Explicit inertial properties of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertial {
    /// Total mass (kg).
    pub mass: f64,
    /// Diagonal of the inertia tensor.
    pub diaginertia: Vec3,
}

/// A rigid body and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Globally unique name.
    pub name: String,
    /// Position relative to the parent frame.
    pub pos: Vec3,
    /// Orientation relative to the parent frame; `None` means identity.
    pub quat: Option<Quat>,
    /// Explicit inertial; `None` lets the engine derive it from geoms.
    pub inertial: Option<Inertial>,
    /// Joints connecting this body to its parent.
    pub joints: Vec<Joint>,
    /// Attached geoms.
    pub geoms: Vec<Geom>,
    /// Attached sites.
    pub sites: Vec<Site>,
    /// Nested child bodies.
    pub children: Vec<Body>,
}

impl Body {
    /// Create an empty body at `pos`.
    pub fn new(name: impl Into<String>, pos: Vec3) -> Self {
        Self {
            name: name.into(),
            pos,
            quat: None,
            inertial: None,
            joints: Vec::new(),
            geoms: Vec::new(),
            sites: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Visit this body and all descendants depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Body, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a Body, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Find a body in this subtree by name.
    pub fn find(&self, name: &str) -> Option<&Body> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Spring-damper tendon routed through two sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialTendon {
    /// Globally unique name.
    pub name: String,
    /// First endpoint site.
    pub site_from: String,
    /// Second endpoint site.
    pub site_to: String,
    /// Spring stiffness (N/m).
    pub stiffness: f64,
    /// Damping (N·s/m).
    pub damping: f64,
    /// Display width.
    pub width: f64,
    /// Display colour.
    pub rgba: Rgba,
}

/// Rigid weld equality between two bodies at their reference pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weld {
    /// Globally unique name.
    pub name: String,
    /// First body.
    pub body1: String,
    /// Second body.
    pub body2: String,
}

/// Position-servo actuator driving a single joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actuator {
    /// Globally unique name.
    pub name: String,
    /// Driven joint.
    pub joint: String,
    /// Proportional gain.
    pub kp: f64,
    /// `(lower, upper)` control range.
    pub ctrl_range: (f64, f64),
}

/// Global simulation options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Integration timestep (s).
    pub timestep: f64,
    /// Gravity vector (m/s²).
    pub gravity: Vec3,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            timestep: 0.002,
            gravity: Vec3::new(0.0, 0.0, -9.81),
        }
    }
}

/// Reference ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    /// Geom name.
    pub name: String,
    /// Half extent of the visual plane.
    pub half_size: f64,
    /// Display colour.
    pub rgba: Rgba,
}

/// Kind of a named entity, for diagnostics and name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A body.
    Body,
    /// A joint.
    Joint,
    /// A geom.
    Geom,
    /// A site.
    Site,
    /// A tendon.
    Tendon,
    /// An equality constraint.
    Weld,
    /// An actuator.
    Actuator,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Body => "body",
            EntityKind::Joint => "joint",
            EntityKind::Geom => "geom",
            EntityKind::Site => "site",
            EntityKind::Tendon => "tendon",
            EntityKind::Weld => "weld",
            EntityKind::Actuator => "actuator",
        };
        f.write_str(s)
    }
}

/// A complete synthesized scene.
///
/// `bodies` are direct children of the world body, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Model name.
    pub model: String,
    /// Simulation options.
    pub options: SimOptions,
    /// Optional ground plane.
    pub ground: Option<GroundPlane>,
    /// Top-level bodies.
    pub bodies: Vec<Body>,
    /// Spatial tendons.
    pub tendons: Vec<SpatialTendon>,
    /// Weld equalities.
    pub welds: Vec<Weld>,
    /// Actuators.
    pub actuators: Vec<Actuator>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            options: SimOptions::default(),
            ground: None,
            bodies: Vec::new(),
            tendons: Vec::new(),
            welds: Vec::new(),
            actuators: Vec::new(),
        }
    }

    /// Visit every body in the scene depth-first.
    pub fn walk_bodies<'a>(&'a self, visit: &mut dyn FnMut(&'a Body, usize)) {
        for body in &self.bodies {
            body.walk(visit);
        }
    }

    /// Find a body anywhere in the scene by name.
    pub fn find_body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find_map(|b| b.find(name))
    }

    /// Total number of bodies, nested ones included.
    pub fn body_count(&self) -> usize {
        let mut count = 0;
        self.walk_bodies(&mut |_, _| count += 1);
        count
    }

    /// Every named entity with its kind, in document order.
    ///
    /// Bodies come with their joints, geoms and sites before their children;
    /// the global sections follow the body tree.
    pub fn named_entities(&self) -> Vec<(EntityKind, &str)> {
        let mut out = Vec::new();
        if let Some(ground) = &self.ground {
            out.push((EntityKind::Geom, ground.name.as_str()));
        }
        self.walk_bodies(&mut |body, _| {
            out.push((EntityKind::Body, body.name.as_str()));
            out.extend(body.joints.iter().map(|j| (EntityKind::Joint, j.name.as_str())));
            out.extend(body.geoms.iter().map(|g| (EntityKind::Geom, g.name.as_str())));
            out.extend(body.sites.iter().map(|s| (EntityKind::Site, s.name.as_str())));
        });
        out.extend(self.tendons.iter().map(|t| (EntityKind::Tendon, t.name.as_str())));
        out.extend(self.welds.iter().map(|w| (EntityKind::Weld, w.name.as_str())));
        out.extend(self.actuators.iter().map(|a| (EntityKind::Actuator, a.name.as_str())));
        out
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
