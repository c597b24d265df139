#![warn(missing_docs)]

//! gyrobot — procedural MJCF synthesis for a gyroscopically stabilized
//! rhombic-dodecahedron tensegrity robot.
//!
//! Loads [`SynthParams`] from TOML, synthesizes the mechanism and writes it
//! as a MuJoCo scene.
//!
//! # Example
//!
//! ```rust,no_run
//! use gyrobot::{generate, SceneFormat, SynthParams};
//!
//! let params = SynthParams::default();
//! let synthesis = generate(&params, "rd_gyro_tensegrity.xml", SceneFormat::Model).unwrap();
//! println!("{} pistons, {} tendons", synthesis.report.pistons, synthesis.report.tendons);
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::info;

pub use gyrobot_ir as ir;
pub use gyrobot_ir::Scene;
pub use gyrobot_mjcf::{check_scene, to_mjcf_string, write_mjcf, MjcfError, SceneFormat};
pub use gyrobot_synth::{
    synthesize, EdgeClass, GimbalParams, NodeParams, PistonParams, SynthError, SynthParams,
    SynthReport, Synthesis, TendonParams,
};

/// Errors returned by the gyrobot pipeline.
#[derive(Error, Debug)]
pub enum GyrobotError {
    /// An I/O error occurred while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for [`SynthParams`].
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Parameters could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    ConfigRender(#[from] toml::ser::Error),
    /// A scene graph dump is not valid JSON for [`Scene`].
    #[error("invalid scene graph: {0}")]
    SceneJson(#[from] serde_json::Error),
    /// Synthesis failed.
    #[error(transparent)]
    Synth(#[from] SynthError),
    /// Serialization failed.
    #[error(transparent)]
    Mjcf(#[from] MjcfError),
}

/// Result type for gyrobot operations.
pub type Result<T> = std::result::Result<T, GyrobotError>;

/// Parse and validate parameters from TOML text.
///
/// Missing keys take their default values.
pub fn params_from_toml_str(text: &str) -> Result<SynthParams> {
    let params: SynthParams = toml::from_str(text)?;
    params.validate()?;
    Ok(params)
}

/// Load and validate parameters from a TOML file.
pub fn load_params(path: impl AsRef<Path>) -> Result<SynthParams> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let params = params_from_toml_str(&text)?;
    info!(path = %path.display(), scale = params.scale, "Loaded parameters");
    Ok(params)
}

/// Render parameters as TOML.
pub fn params_to_toml(params: &SynthParams) -> Result<String> {
    Ok(toml::to_string_pretty(params)?)
}

/// Synthesize and render to a string without touching the filesystem.
pub fn render(params: &SynthParams, format: SceneFormat) -> Result<String> {
    let synthesis = synthesize(params)?;
    Ok(to_mjcf_string(&synthesis.scene, format)?)
}

/// Load a scene graph previously dumped with [`Scene::to_json`].
///
/// The scene is checked the same way a synthesized one is, so an edited dump
/// with broken names or sizes fails here rather than at render time.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let scene = Scene::from_json(&text)?;
    check_scene(&scene)?;
    info!(path = %path.display(), bodies = scene.body_count(), "Loaded scene graph");
    Ok(scene)
}

/// Synthesize and write the scene to `path`, replacing any existing file.
pub fn generate(
    params: &SynthParams,
    path: impl AsRef<Path>,
    format: SceneFormat,
) -> Result<Synthesis> {
    let synthesis = synthesize(params)?;
    write_mjcf(&synthesis.scene, path, format)?;
    Ok(synthesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let params = params_from_toml_str(
            r#"
            scale = 1.0

            [tendon]
            stiffness = 350.0
            "#,
        )
        .unwrap();
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.height, 1.0);
        assert_eq!(params.tendon.stiffness, 350.0);
        assert_eq!(params.tendon.damping, TendonParams::default().damping);
        assert_eq!(params.piston, PistonParams::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let text = params_to_toml(&SynthParams::default()).unwrap();
        let params = params_from_toml_str(&text).unwrap();
        assert_eq!(params, SynthParams::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = params_from_toml_str("scale = 0.0").unwrap_err();
        assert!(matches!(err, GyrobotError::Synth(SynthError::InvalidParams(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let err = params_from_toml_str("scale = [").unwrap_err();
        assert!(matches!(err, GyrobotError::Config(_)));
    }

    #[test]
    fn test_scene_dump_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let synthesis = synthesize(&SynthParams::default()).unwrap();
        std::fs::write(&path, synthesis.scene.to_json().unwrap()).unwrap();

        let scene = load_scene(&path).unwrap();
        assert_eq!(scene, synthesis.scene);
        assert_eq!(
            to_mjcf_string(&scene, SceneFormat::Model).unwrap(),
            render(&SynthParams::default(), SceneFormat::Model).unwrap()
        );
    }

    #[test]
    fn test_bad_scene_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, "{\"model\": 3}").unwrap();
        assert!(matches!(load_scene(&path), Err(GyrobotError::SceneJson(_))));

        let mut scene = synthesize(&SynthParams::default()).unwrap().scene;
        scene.tendons[0].site_to = "corner_99_site".into();
        std::fs::write(&path, scene.to_json().unwrap()).unwrap();
        assert!(matches!(
            load_scene(&path),
            Err(GyrobotError::Mjcf(MjcfError::UnresolvedReference { .. }))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_params("/nonexistent/gyrobot.toml").unwrap_err();
        assert!(matches!(err, GyrobotError::Io(_)));
    }
}
