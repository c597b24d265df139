#![warn(missing_docs)]

//! Procedural structure synthesizer for the gyroscopic tensegrity robot.
//!
//! Builds the rhombic-dodecahedron mechanism as a [`Scene`]: a free root body
//! carrying a three-ring gimbal with the six axis vertices, eight free corner
//! bodies, a telescoping piston on every cube edge and a spring tendon on
//! every rhombic edge.
//!
//! Data flows strictly forward: vertices, then classified edges, then the
//! scene graph. Every name derives from vertex indices, so identical
//! parameters always yield an identical scene.
//!
//! # Example
//!
//! ```
//! use gyrobot_synth::{synthesize, SynthParams};
//!
//! let synthesis = synthesize(&SynthParams::default()).unwrap();
//! assert_eq!(synthesis.report.pistons, 12);
//! assert_eq!(synthesis.report.tendons, 24);
//! ```

pub mod assembler;
pub mod classify;
pub mod error;
pub mod frame;
pub mod naming;
pub mod params;
pub mod piston;
pub mod report;
pub mod tendon;
pub mod vertex;

pub use assembler::{assemble, Assembly, RingStage};
pub use classify::{class_bands, classify_edges, ClassBand, EdgeClass, EdgePair, EdgeSet};
pub use error::{Result, SynthError};
pub use frame::EdgeFrame;
pub use params::{GimbalParams, NodeParams, PistonParams, SynthParams, TendonParams};
pub use piston::{synthesize_pistons, PistonAssembly, PistonGeometry};
pub use report::SynthReport;
pub use tendon::synthesize_tendons;
pub use vertex::{generate_vertices, Axis, Vertex, VertexRole};

use gyrobot_ir::{GroundPlane, Scene};
use tracing::info;

const GROUND_RGBA: gyrobot_ir::Rgba = [0.2, 0.3, 0.4, 1.0];

/// Everything produced by one synthesis run.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Generated vertices.
    pub vertices: Vec<Vertex>,
    /// Classified edges.
    pub edges: EdgeSet,
    /// Piston assemblies, in cube-edge order.
    pub pistons: Vec<PistonAssembly>,
    /// The assembled scene, ready to serialize.
    pub scene: Scene,
    /// Counts and margins.
    pub report: SynthReport,
}

/// Run the full pipeline.
///
/// Octahedron edges are classified and reported but produce no entities:
/// the axis vertices they join are already held by the gimbal rings.
pub fn synthesize(params: &SynthParams) -> Result<Synthesis> {
    params.validate()?;

    let vertices = generate_vertices(params.scale);
    let bands = class_bands(params.scale, params.tolerance());
    let edges = classify_edges(&vertices, &bands)?;

    let assembly = assemble(&vertices, params);
    let pistons = synthesize_pistons(&vertices, &edges.cube, params)?;
    let tendons = synthesize_tendons(&vertices, &edges.rhombic, params)?;

    let mut scene = Scene::new(params.model_name.clone());
    scene.ground = Some(GroundPlane {
        name: naming::GROUND.into(),
        half_size: params.ground_half_size,
        rgba: GROUND_RGBA,
    });
    scene.bodies.push(assembly.root);
    scene.bodies.extend(assembly.corners);
    scene.bodies.extend(pistons.iter().map(|p| p.body.clone()));
    scene.tendons = tendons;
    scene.welds = pistons.iter().flat_map(|p| p.welds.clone()).collect();
    scene.actuators = assembly.gimbal_actuators;
    scene.actuators.extend(pistons.iter().map(|p| p.actuator.clone()));

    let report = build_report(params, &vertices, &edges, &pistons, &scene);
    info!(
        model = %report.model,
        scale = report.scale,
        bodies = report.bodies,
        pistons = report.pistons,
        tendons = report.tendons,
        actuators = report.actuators(),
        "Synthesized mechanism"
    );

    Ok(Synthesis {
        vertices,
        edges,
        pistons,
        scene,
        report,
    })
}

fn build_report(
    params: &SynthParams,
    vertices: &[Vertex],
    edges: &EdgeSet,
    pistons: &[PistonAssembly],
    scene: &Scene,
) -> SynthReport {
    let count_role = |role: VertexRole| vertices.iter().filter(|v| v.role == role).count();
    let gimbal_actuators = scene.actuators.len() - pistons.len();
    let min_piston_overlap = pistons
        .iter()
        .map(|p| p.geometry.min_overlap())
        .fold(f64::INFINITY, f64::min);

    SynthReport {
        model: scene.model.clone(),
        scale: params.scale,
        axis_nodes: count_role(VertexRole::Axis),
        corner_bodies: count_role(VertexRole::Corner),
        cube_edges: edges.cube.len(),
        octahedron_edges: edges.octahedron.len(),
        rhombic_edges: edges.rhombic.len(),
        pistons: pistons.len(),
        tendons: scene.tendons.len(),
        welds: scene.welds.len(),
        gimbal_actuators,
        piston_actuators: pistons.len(),
        force_elements: pistons.len() + scene.tendons.len(),
        bodies: scene.body_count(),
        tolerance_margin: edges.tolerance_margin,
        min_piston_overlap,
    }
}
