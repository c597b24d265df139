//! MJCF document generation.

use std::io::{Cursor, Write};
use std::path::Path;

use gyrobot_ir::{Body, Contact, Geom, GeomShape, Joint, JointKind, Scene, Site};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{MjcfError, Result};
use crate::format;
use crate::names::check_scene;

/// Output flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SceneFormat {
    /// Standalone `<mujoco>` model with options, ground plane and light.
    #[default]
    Model,
    /// `<mujocoinclude>` fragment holding only the mechanism, for inclusion
    /// into a model that supplies its own world.
    Include,
}

impl SceneFormat {
    fn root_tag(self) -> &'static str {
        match self {
            SceneFormat::Model => "mujoco",
            SceneFormat::Include => "mujocoinclude",
        }
    }
}

struct MjcfWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl MjcfWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>, what: &str) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| MjcfError::Xml(format!("failed to write {what}: {e}")))
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<()> {
        let what = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.event(Event::Start(element), &what)
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<()> {
        let what = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.event(Event::Empty(element), &what)
    }

    fn end(&mut self, tag: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(tag)), tag)
    }

    fn finish(self) -> Result<String> {
        let bytes = self.inner.into_inner().into_inner();
        String::from_utf8(bytes)
            .map_err(|e| MjcfError::Xml(format!("invalid UTF-8 in output: {e}")))
    }
}

fn element<'a>(tag: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(tag);
    for &attr in attrs {
        el.push_attribute(attr);
    }
    el
}

/// Render a scene to an MJCF string.
///
/// Names are checked for collisions and every weld, tendon and actuator
/// reference is resolved before anything is rendered.
pub fn to_mjcf_string(scene: &Scene, format: SceneFormat) -> Result<String> {
    let registry = check_scene(scene)?;
    debug!(names = registry.len(), "Checked scene names");

    let mut w = MjcfWriter::new();
    w.event(
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        "XML declaration",
    )?;

    let root_tag = format.root_tag();
    match format {
        SceneFormat::Model => w.start(element(root_tag, &[("model", &scene.model)]))?,
        SceneFormat::Include => w.start(element(root_tag, &[]))?,
    }

    if format == SceneFormat::Model {
        write_preamble(&mut w, scene)?;
    }

    w.start(element("worldbody", &[]))?;
    if format == SceneFormat::Model {
        write_world_fixtures(&mut w, scene)?;
    }
    for body in &scene.bodies {
        write_body(&mut w, body)?;
    }
    w.end("worldbody")?;

    write_tendons(&mut w, scene)?;
    write_equalities(&mut w, scene)?;
    write_actuators(&mut w, scene)?;

    w.end(root_tag)?;
    w.finish()
}

/// Render a scene and write it to `path`, replacing any existing file.
///
/// The document is written to a temporary file next to `path` and renamed
/// over it, so `path` never holds a partial document. Returns the number of
/// bytes written.
pub fn write_mjcf(scene: &Scene, path: impl AsRef<Path>, format: SceneFormat) -> Result<usize> {
    let path = path.as_ref();
    let xml = to_mjcf_string(scene, format)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(xml.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!(path = %path.display(), bytes = xml.len(), ?format, "Wrote MJCF");
    Ok(xml.len())
}

fn write_preamble(w: &mut MjcfWriter, scene: &Scene) -> Result<()> {
    w.empty(element("compiler", &[("angle", "radian"), ("autolimits", "true")]))?;
    let timestep = format::real(scene.options.timestep);
    let gravity = format::vec3(&scene.options.gravity);
    w.empty(element(
        "option",
        &[("timestep", &timestep), ("gravity", &gravity)],
    ))
}

fn write_world_fixtures(w: &mut MjcfWriter, scene: &Scene) -> Result<()> {
    w.empty(element(
        "light",
        &[("pos", "0 0 4"), ("dir", "0 0 -1"), ("directional", "true")],
    ))?;
    if let Some(ground) = &scene.ground {
        let h = format::real(ground.half_size);
        let size = format!("{h} {h} 0.1");
        let rgba = format::rgba(&ground.rgba);
        w.empty(element(
            "geom",
            &[
                ("name", &ground.name),
                ("type", "plane"),
                ("size", &size),
                ("rgba", &rgba),
                ("condim", "3"),
            ],
        ))?;
    }
    Ok(())
}

fn write_body(w: &mut MjcfWriter, body: &Body) -> Result<()> {
    let pos = format::vec3(&body.pos);
    let mut el = element("body", &[("name", &body.name), ("pos", &pos)]);
    if let Some(q) = &body.quat {
        el.push_attribute(("quat", format::quat(q).as_str()));
    }
    w.start(el)?;

    if let Some(inertial) = &body.inertial {
        let mass = format::real(inertial.mass);
        let diag = format::vec3(&inertial.diaginertia);
        w.empty(element(
            "inertial",
            &[("pos", "0 0 0"), ("mass", &mass), ("diaginertia", &diag)],
        ))?;
    }
    for joint in &body.joints {
        write_joint(w, joint)?;
    }
    for geom in &body.geoms {
        write_geom(w, geom)?;
    }
    for site in &body.sites {
        write_site(w, site)?;
    }
    for child in &body.children {
        write_body(w, child)?;
    }

    w.end("body")
}

fn write_joint(w: &mut MjcfWriter, joint: &Joint) -> Result<()> {
    let (kind, axis, range) = match &joint.kind {
        JointKind::Free => return w.empty(element("freejoint", &[("name", &joint.name)])),
        JointKind::Hinge { axis, range } => ("hinge", axis, range),
        JointKind::Slide { axis, range } => ("slide", axis, range),
    };
    let mut el = element("joint", &[("name", &joint.name), ("type", kind)]);
    el.push_attribute(("axis", format::vec3(axis).as_str()));
    if let Some(r) = range {
        el.push_attribute(("range", format::range(*r).as_str()));
    }
    if let Some(damping) = joint.damping {
        el.push_attribute(("damping", format::real(damping).as_str()));
    }
    w.empty(el)
}

fn write_geom(w: &mut MjcfWriter, geom: &Geom) -> Result<()> {
    let mut el = element("geom", &[("name", &geom.name)]);
    match &geom.shape {
        GeomShape::Sphere { radius, center } => {
            el.push_attribute(("type", "sphere"));
            el.push_attribute(("size", format::real(*radius).as_str()));
            el.push_attribute(("pos", format::vec3(center).as_str()));
        }
        GeomShape::Capsule { radius, from, to } => {
            el.push_attribute(("type", "capsule"));
            el.push_attribute(("size", format::real(*radius).as_str()));
            el.push_attribute(("fromto", format::fromto(from, to).as_str()));
        }
        GeomShape::Cylinder { radius, from, to } => {
            el.push_attribute(("type", "cylinder"));
            el.push_attribute(("size", format::real(*radius).as_str()));
            el.push_attribute(("fromto", format::fromto(from, to).as_str()));
        }
    }
    el.push_attribute(("rgba", format::rgba(&geom.rgba).as_str()));
    if let Some(mass) = geom.mass {
        el.push_attribute(("mass", format::real(mass).as_str()));
    }
    match &geom.contact {
        Contact::Visual => {
            el.push_attribute(("contype", "0"));
            el.push_attribute(("conaffinity", "0"));
        }
        Contact::Collide { condim, friction } => {
            el.push_attribute(("condim", condim.to_string().as_str()));
            el.push_attribute(("friction", format::reals(friction).as_str()));
        }
    }
    w.empty(el)
}

fn write_site(w: &mut MjcfWriter, site: &Site) -> Result<()> {
    let pos = format::vec3(&site.pos);
    let size = format::real(site.size);
    let rgba = format::rgba(&site.rgba);
    w.empty(element(
        "site",
        &[("name", &site.name), ("pos", &pos), ("size", &size), ("rgba", &rgba)],
    ))
}

fn write_tendons(w: &mut MjcfWriter, scene: &Scene) -> Result<()> {
    if scene.tendons.is_empty() {
        return Ok(());
    }
    w.start(element("tendon", &[]))?;
    for tendon in &scene.tendons {
        let stiffness = format::real(tendon.stiffness);
        let damping = format::real(tendon.damping);
        let width = format::real(tendon.width);
        let rgba = format::rgba(&tendon.rgba);
        w.start(element(
            "spatial",
            &[
                ("name", &tendon.name),
                ("stiffness", &stiffness),
                ("damping", &damping),
                ("width", &width),
                ("rgba", &rgba),
            ],
        ))?;
        w.empty(element("site", &[("site", &tendon.site_from)]))?;
        w.empty(element("site", &[("site", &tendon.site_to)]))?;
        w.end("spatial")?;
    }
    w.end("tendon")
}

fn write_equalities(w: &mut MjcfWriter, scene: &Scene) -> Result<()> {
    if scene.welds.is_empty() {
        return Ok(());
    }
    w.start(element("equality", &[]))?;
    for weld in &scene.welds {
        w.empty(element(
            "weld",
            &[("name", &weld.name), ("body1", &weld.body1), ("body2", &weld.body2)],
        ))?;
    }
    w.end("equality")
}

fn write_actuators(w: &mut MjcfWriter, scene: &Scene) -> Result<()> {
    if scene.actuators.is_empty() {
        return Ok(());
    }
    w.start(element("actuator", &[]))?;
    for actuator in &scene.actuators {
        let kp = format::real(actuator.kp);
        let ctrlrange = format::range(actuator.ctrl_range);
        w.empty(element(
            "position",
            &[
                ("name", &actuator.name),
                ("joint", &actuator.joint),
                ("kp", &kp),
                ("ctrllimited", "true"),
                ("ctrlrange", &ctrlrange),
            ],
        ))?;
    }
    w.end("actuator")
}
