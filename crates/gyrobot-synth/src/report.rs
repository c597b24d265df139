//! Summary of a synthesis run.

use serde::Serialize;

use crate::classify::EdgeClass;

/// Counts and margins describing a synthesized mechanism.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthReport {
    /// Model name.
    pub model: String,
    /// Scale the mechanism was built at.
    pub scale: f64,
    /// Axis vertices.
    pub axis_nodes: usize,
    /// Corner vertices, each a free body.
    pub corner_bodies: usize,
    /// Classified corner–corner pairs.
    pub cube_edges: usize,
    /// Classified axis–axis pairs.
    pub octahedron_edges: usize,
    /// Classified axis–corner pairs.
    pub rhombic_edges: usize,
    /// Piston assemblies.
    pub pistons: usize,
    /// Spring tendons.
    pub tendons: usize,
    /// Weld constraints.
    pub welds: usize,
    /// Ring hinge actuators.
    pub gimbal_actuators: usize,
    /// Piston slide actuators.
    pub piston_actuators: usize,
    /// Pistons plus tendons.
    pub force_elements: usize,
    /// Bodies in the scene graph, nested ones included.
    pub bodies: usize,
    /// Distance between the widest tolerance band and half the smallest
    /// gap between class lengths.
    pub tolerance_margin: f64,
    /// Smallest barrel/rod overlap at full extension over all pistons.
    pub min_piston_overlap: f64,
}

impl SynthReport {
    /// Edge count of one class.
    pub fn edges(&self, class: EdgeClass) -> usize {
        match class {
            EdgeClass::Cube => self.cube_edges,
            EdgeClass::Octahedron => self.octahedron_edges,
            EdgeClass::Rhombic => self.rhombic_edges,
        }
    }

    /// Entries in the emitted actuator section.
    pub fn actuators(&self) -> usize {
        self.gimbal_actuators + self.piston_actuators
    }
}
