//! Synthesis parameters.
//!
//! Lengths are given as ratios of `scale` so the whole mechanism scales
//! uniformly; masses, gains, stiffness and damping are absolute.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

/// Mass and size of the vertex markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeParams {
    /// Mass of each axis-vertex marker (kg).
    pub axis_mass: f64,
    /// Mass of each corner-node marker (kg).
    pub corner_mass: f64,
    /// Marker sphere radius, as a fraction of scale.
    pub radius_ratio: f64,
    /// Ring-to-vertex strut radius, as a fraction of scale.
    pub strut_radius_ratio: f64,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            axis_mass: 0.05,
            corner_mass: 0.01,
            radius_ratio: 0.06,
            strut_radius_ratio: 0.02,
        }
    }
}

/// Gimbal rings and root body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GimbalParams {
    /// Stabilizing mass carried by the root body (kg).
    pub root_mass: f64,
    /// Mass of each ring, spread over its arc segments (kg).
    pub ring_mass: f64,
    /// Ring radii outer → middle → inner, as fractions of scale.
    pub ring_radius_ratios: [f64; 3],
    /// Ring tube radius, as a fraction of scale.
    pub tube_radius_ratio: f64,
    /// Straight segments per arc (two arcs per ring).
    pub arc_segments: u32,
    /// Angular width of each of the two ring openings (radians).
    pub arc_gap: f64,
    /// Passive hinge damping.
    pub damping: f64,
    /// Position gain of the ring actuators.
    pub gain: f64,
}

impl Default for GimbalParams {
    fn default() -> Self {
        Self {
            root_mass: 1.0,
            ring_mass: 0.1,
            ring_radius_ratios: [0.5, 0.42, 0.34],
            tube_radius_ratio: 0.015,
            arc_segments: 8,
            arc_gap: 0.6,
            damping: 0.01,
            gain: 20.0,
        }
    }
}

/// Telescoping piston assemblies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PistonParams {
    /// Barrel and rod length, as a fraction of the edge length.
    pub length_ratio: f64,
    /// Half-range of the slide joint, as a fraction of scale.
    pub stroke_ratio: f64,
    /// Barrel radius, as a fraction of scale.
    pub barrel_radius_ratio: f64,
    /// Rod radius, as a fraction of scale.
    pub rod_radius_ratio: f64,
    /// Barrel mass (kg).
    pub barrel_mass: f64,
    /// Rod mass (kg).
    pub rod_mass: f64,
    /// Position gain of the piston actuators.
    pub gain: f64,
}

impl Default for PistonParams {
    fn default() -> Self {
        Self {
            length_ratio: 0.6,
            stroke_ratio: 0.15,
            barrel_radius_ratio: 0.04,
            rod_radius_ratio: 0.025,
            barrel_mass: 0.05,
            rod_mass: 0.03,
            gain: 500.0,
        }
    }
}

/// Spring tendons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendonParams {
    /// Spring stiffness (N/m).
    pub stiffness: f64,
    /// Damping (N·s/m).
    pub damping: f64,
    /// Display width, as a fraction of scale.
    pub width_ratio: f64,
}

impl Default for TendonParams {
    fn default() -> Self {
        Self {
            stiffness: 200.0,
            damping: 2.0,
            width_ratio: 0.015,
        }
    }
}

/// Everything the synthesizer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthParams {
    /// Model name written into the scene.
    pub model_name: String,
    /// Distance of the axis vertices from the center (m).
    pub scale: f64,
    /// Height of the mechanism center above the ground plane (m).
    pub height: f64,
    /// Classification tolerance, as a fraction of scale.
    pub tolerance_ratio: f64,
    /// Half extent of the ground plane (m).
    pub ground_half_size: f64,
    /// Vertex markers.
    pub nodes: NodeParams,
    /// Gimbal.
    pub gimbal: GimbalParams,
    /// Pistons.
    pub piston: PistonParams,
    /// Tendons.
    pub tendon: TendonParams,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            model_name: "rd_gyro_tensegrity".into(),
            scale: 0.2,
            height: 1.0,
            tolerance_ratio: 0.01,
            ground_half_size: 5.0,
            nodes: NodeParams::default(),
            gimbal: GimbalParams::default(),
            piston: PistonParams::default(),
            tendon: TendonParams::default(),
        }
    }
}

fn require(ok: bool, msg: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SynthError::InvalidParams(msg.into()))
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl SynthParams {
    /// Parameters at a different scale, everything else default.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Classification tolerance in meters.
    pub fn tolerance(&self) -> f64 {
        self.tolerance_ratio * self.scale
    }

    /// Slide-joint half-range in meters.
    pub fn stroke(&self) -> f64 {
        self.piston.stroke_ratio * self.scale
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        require(!self.model_name.trim().is_empty(), "model_name must not be empty")?;
        require(positive(self.scale), "scale must be positive")?;
        require(non_negative(self.height), "height must be non-negative")?;
        require(positive(self.tolerance_ratio), "tolerance_ratio must be positive")?;
        require(positive(self.ground_half_size), "ground_half_size must be positive")?;

        let n = &self.nodes;
        require(positive(n.axis_mass), "nodes.axis_mass must be positive")?;
        require(positive(n.corner_mass), "nodes.corner_mass must be positive")?;
        require(positive(n.radius_ratio), "nodes.radius_ratio must be positive")?;
        require(
            positive(n.strut_radius_ratio),
            "nodes.strut_radius_ratio must be positive",
        )?;

        let g = &self.gimbal;
        require(positive(g.root_mass), "gimbal.root_mass must be positive")?;
        require(positive(g.ring_mass), "gimbal.ring_mass must be positive")?;
        let [outer, middle, inner] = g.ring_radius_ratios;
        require(
            positive(inner) && inner < middle && middle < outer && outer < 1.0,
            "gimbal.ring_radius_ratios must shrink from outer to inner and stay inside the axis vertices",
        )?;
        require(positive(g.tube_radius_ratio), "gimbal.tube_radius_ratio must be positive")?;
        require(g.arc_segments >= 1, "gimbal.arc_segments must be at least 1")?;
        require(
            positive(g.arc_gap) && g.arc_gap < std::f64::consts::PI,
            "gimbal.arc_gap must be between 0 and pi",
        )?;
        require(non_negative(g.damping), "gimbal.damping must be non-negative")?;
        require(positive(g.gain), "gimbal.gain must be positive")?;

        let p = &self.piston;
        require(
            p.length_ratio > 0.5 && p.length_ratio < 1.0,
            "piston.length_ratio must be between 0.5 and 1",
        )?;
        require(positive(p.stroke_ratio), "piston.stroke_ratio must be positive")?;
        require(
            positive(p.barrel_radius_ratio) && positive(p.rod_radius_ratio),
            "piston radii must be positive",
        )?;
        require(
            p.rod_radius_ratio < p.barrel_radius_ratio,
            "piston.rod_radius_ratio must be smaller than the barrel radius",
        )?;
        require(
            positive(p.barrel_mass) && positive(p.rod_mass),
            "piston masses must be positive",
        )?;
        require(positive(p.gain), "piston.gain must be positive")?;

        let t = &self.tendon;
        require(non_negative(t.stiffness), "tendon.stiffness must be non-negative")?;
        require(non_negative(t.damping), "tendon.damping must be non-negative")?;
        require(positive(t.width_ratio), "tendon.width_ratio must be positive")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        SynthParams::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_scale() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = SynthParams::with_scale(scale);
            assert!(params.validate().is_err(), "scale {scale} accepted");
        }
    }

    #[test]
    fn test_ring_radii_must_shrink() {
        let mut params = SynthParams::default();
        params.gimbal.ring_radius_ratios = [0.3, 0.4, 0.2];
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_arc_gap_bounds() {
        let mut params = SynthParams::default();
        params.gimbal.arc_gap = std::f64::consts::PI;
        assert!(params.validate().is_err());
        params.gimbal.arc_gap = 0.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_piston_length_ratio_bounds() {
        let mut params = SynthParams::default();
        params.piston.length_ratio = 0.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_derived_lengths() {
        let params = SynthParams::with_scale(1.0);
        assert!((params.tolerance() - 0.01).abs() < 1e-12);
        assert!((params.stroke() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: SynthParams =
            serde_json::from_str(r#"{"scale": 1.0, "tendon": {"stiffness": 50.0}}"#).unwrap();
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.tendon.stiffness, 50.0);
        assert_eq!(params.tendon.damping, TendonParams::default().damping);
        assert_eq!(params.height, 1.0);
    }
}
