//! Spring tendons on the rhombic edges.

use gyrobot_ir::{Rgba, SpatialTendon};
use tracing::debug;

use crate::classify::{EdgeClass, EdgePair};
use crate::error::{Result, SynthError};
use crate::naming;
use crate::params::SynthParams;
use crate::vertex::{Vertex, VertexRole};

const TENDON_RGBA: Rgba = [1.0, 0.4, 0.2, 1.0];

/// One spatial tendon per rhombic edge, from the axis-vertex site to the
/// corner site.
pub fn synthesize_tendons(
    vertices: &[Vertex],
    edges: &[EdgePair],
    params: &SynthParams,
) -> Result<Vec<SpatialTendon>> {
    let t = &params.tendon;
    let tendons = edges
        .iter()
        .map(|edge| {
            let (va, vb) = edge.endpoints(vertices)?;
            if va.role != VertexRole::Axis || vb.role != VertexRole::Corner {
                return Err(SynthError::RoleMismatch {
                    class: EdgeClass::Rhombic,
                    a: edge.a,
                    b: edge.b,
                });
            }
            Ok(SpatialTendon {
                name: naming::tendon(edge.a, edge.b),
                site_from: naming::axis_site(edge.a),
                site_to: naming::corner_site(edge.b),
                stiffness: t.stiffness,
                damping: t.damping,
                width: t.width_ratio * params.scale,
                rgba: TENDON_RGBA,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(count = tendons.len(), "Built rhombic-edge tendons");
    Ok(tendons)
}
