//! gyrobot CLI - MJCF scene generator
//!
//! Synthesizes the gyroscopic tensegrity robot and writes it as a MuJoCo
//! scene, optionally with a JSON report and a JSON dump of the scene graph.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gyrobot::{EdgeClass, SceneFormat, SynthParams};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "gyrobot")]
#[command(about = "Procedural MJCF generator for a gyroscopic tensegrity robot", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the mechanism and write the MJCF scene
    Generate {
        /// TOML parameter file (defaults apply to missing keys)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output MJCF file
        #[arg(short, long, default_value = "rd_gyro_tensegrity.xml")]
        output: PathBuf,
        /// Standalone model or include fragment
        #[arg(long, value_enum, default_value_t = FormatArg::Model)]
        format: FormatArg,
        /// Override the structure scale (m)
        #[arg(long)]
        scale: Option<f64>,
        /// Override the placement height (m)
        #[arg(long)]
        height: Option<f64>,
        /// Write the synthesis report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the scene graph as JSON
        #[arg(long)]
        ir: Option<PathBuf>,
    },
    /// Render a scene graph dump (from `generate --ir`) as MJCF
    Render {
        /// Scene graph JSON
        input: PathBuf,
        /// Output MJCF file
        #[arg(short, long, default_value = "rd_gyro_tensegrity.xml")]
        output: PathBuf,
        /// Standalone model or include fragment
        #[arg(long, value_enum, default_value_t = FormatArg::Model)]
        format: FormatArg,
    },
    /// Print vertex and edge counts and safety margins
    Info {
        /// TOML parameter file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default parameters as TOML
    Params,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Complete <mujoco> document
    Model,
    /// <mujocoinclude> fragment
    Include,
}

impl From<FormatArg> for SceneFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Model => SceneFormat::Model,
            FormatArg::Include => SceneFormat::Include,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            config,
            output,
            format,
            scale,
            height,
            report,
            ir,
        } => {
            let mut params = load_params(config.as_deref())?;
            if let Some(scale) = scale {
                params.scale = scale;
            }
            if let Some(height) = height {
                params.height = height;
            }
            generate(&params, &output, format.into(), report.as_deref(), ir.as_deref())?;
        }
        Commands::Render {
            input,
            output,
            format,
        } => {
            let scene = gyrobot::load_scene(&input)
                .with_context(|| format!("failed to load {}", input.display()))?;
            gyrobot::write_mjcf(&scene, &output, format.into())
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {}", output.display());
        }
        Commands::Info { config } => {
            let params = load_params(config.as_deref())?;
            show_info(&params)?;
        }
        Commands::Params => {
            print!("{}", gyrobot::params_to_toml(&SynthParams::default())?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_params(config: Option<&Path>) -> Result<SynthParams> {
    match config {
        Some(path) => gyrobot::load_params(path)
            .with_context(|| format!("failed to load parameters from {}", path.display())),
        None => Ok(SynthParams::default()),
    }
}

fn generate(
    params: &SynthParams,
    output: &Path,
    format: SceneFormat,
    report_path: Option<&Path>,
    ir_path: Option<&Path>,
) -> Result<()> {
    let synthesis = gyrobot::generate(params, output, format)
        .with_context(|| format!("failed to generate {}", output.display()))?;
    println!("Wrote {}", output.display());

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&synthesis.report)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote synthesis report");
    }
    if let Some(path) = ir_path {
        let json = synthesis.scene.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote scene graph");
    }

    Ok(())
}

fn show_info(params: &SynthParams) -> Result<()> {
    let synthesis = gyrobot::synthesize(params)?;
    let r = &synthesis.report;

    println!("Model:    {}", r.model);
    println!("Scale:    {} m", r.scale);
    println!("Vertices: {} axis, {} corner", r.axis_nodes, r.corner_bodies);
    println!("Edges:");
    for class in EdgeClass::ALL {
        println!("  {:<16} {}", class.label(), r.edges(class));
    }
    println!("Bodies:    {}", r.bodies);
    println!("Pistons:   {}", r.pistons);
    println!("Tendons:   {}", r.tendons);
    println!("Welds:     {}", r.welds);
    println!(
        "Actuators: {} ({} gimbal, {} piston)",
        r.actuators(),
        r.gimbal_actuators,
        r.piston_actuators
    );
    println!("Force elements: {}", r.force_elements);
    println!("Tolerance margin:    {:.6} m", r.tolerance_margin);
    println!("Min piston overlap:  {:.6} m", r.min_piston_overlap);

    Ok(())
}
