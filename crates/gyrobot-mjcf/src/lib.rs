#![warn(missing_docs)]

//! MJCF serialization for gyrobot scenes.
//!
//! Renders a [`gyrobot_ir::Scene`] as a MuJoCo XML document, either a
//! standalone model or a `<mujocoinclude>` fragment. Every name in the scene
//! must be unique and every weld, tendon and actuator reference must resolve
//! before anything is rendered. Zero or negative sizes are rejected too.

pub mod error;
pub mod format;
pub mod names;
pub mod writer;

pub use error::{MjcfError, Result};
pub use names::{check_scene, check_sizes, NameRegistry};
pub use writer::{to_mjcf_string, write_mjcf, SceneFormat};
