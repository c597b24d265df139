//! Entity names.
//!
//! Every name derives from a vertex index or an `(a, b)` edge key, never from
//! emission counters, so names stay stable when anything else changes.
//! Collaborators that index runtime state by name rely on this.

/// Root body carrying the gimbal.
pub const ROOT_BODY: &str = "gyro_root";
/// Free joint of the root body.
pub const ROOT_JOINT: &str = "gyro_root_free";
/// Visual core of the root body.
pub const ROOT_CORE: &str = "gyro_core";
/// Ground plane geom.
pub const GROUND: &str = "floor";

/// Body of a gimbal ring.
pub fn ring_body(stage: &str) -> String {
    format!("gimbal_{stage}")
}

/// Hinge of a gimbal ring.
pub fn ring_hinge(stage: &str) -> String {
    format!("gimbal_{stage}_hinge")
}

/// One straight segment of a ring arc.
pub fn ring_arc(stage: &str, arc: usize, segment: usize) -> String {
    format!("gimbal_{stage}_arc_{arc}_{segment}")
}

/// Actuator driving a gimbal ring.
pub fn ring_actuator(stage: &str) -> String {
    format!("gimbal_{stage}_act")
}

/// Marker geom of an axis vertex.
pub fn axis_marker(index: usize) -> String {
    format!("axis_{index}_marker")
}

/// Ring-to-vertex strut of an axis vertex.
pub fn axis_strut(index: usize) -> String {
    format!("axis_{index}_strut")
}

/// Anchor site of an axis vertex.
pub fn axis_site(index: usize) -> String {
    format!("axis_{index}_site")
}

/// Free body of a corner vertex.
pub fn corner_body(index: usize) -> String {
    format!("corner_{index}")
}

/// Free joint of a corner body.
pub fn corner_joint(index: usize) -> String {
    format!("corner_{index}_free")
}

/// Marker geom of a corner body.
pub fn corner_marker(index: usize) -> String {
    format!("corner_{index}_marker")
}

/// Anchor site of a corner body.
pub fn corner_site(index: usize) -> String {
    format!("corner_{index}_site")
}

/// Spring tendon on the rhombic edge `(a, b)`.
pub fn tendon(a: usize, b: usize) -> String {
    format!("tendon_{a}_{b}")
}

/// Names of every entity in the piston on the cube edge `(a, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PistonNames {
    /// Outer body.
    pub barrel: String,
    /// Free joint of the barrel.
    pub free_joint: String,
    /// Barrel geom.
    pub barrel_geom: String,
    /// Inner sliding body.
    pub rod: String,
    /// Slide joint between barrel and rod.
    pub slide: String,
    /// Rod geom.
    pub rod_geom: String,
    /// Weld binding the barrel to corner `a`.
    pub barrel_weld: String,
    /// Weld binding the rod to corner `b`.
    pub rod_weld: String,
    /// Position actuator on the slide.
    pub actuator: String,
}

impl PistonNames {
    /// Names for the piston on edge `(a, b)`.
    pub fn new(a: usize, b: usize) -> Self {
        let base = format!("piston_{a}_{b}");
        Self {
            barrel: format!("{base}_barrel"),
            free_joint: format!("{base}_free"),
            barrel_geom: format!("{base}_barrel_geom"),
            rod: format!("{base}_rod"),
            slide: format!("{base}_slide"),
            rod_geom: format!("{base}_rod_geom"),
            barrel_weld: format!("{base}_barrel_weld"),
            rod_weld: format!("{base}_rod_weld"),
            actuator: format!("{base}_act"),
        }
    }
}
