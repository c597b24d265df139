//! Global name table and cross-reference checks.

use std::collections::HashMap;

use gyrobot_ir::{EntityKind, Scene};

use crate::error::{MjcfError, Result};

/// Every name in a scene mapped to the kind of entity that owns it.
#[derive(Debug, Default)]
pub struct NameRegistry<'a> {
    kinds: HashMap<&'a str, EntityKind>,
}

impl<'a> NameRegistry<'a> {
    /// Collect the names of a scene, failing on the first collision.
    ///
    /// Names are unique across all kinds, not only within one kind.
    pub fn build(scene: &'a Scene) -> Result<Self> {
        let mut kinds = HashMap::new();
        for (kind, name) in scene.named_entities() {
            if let Some(&first) = kinds.get(name) {
                return Err(MjcfError::DuplicateName {
                    name: name.to_string(),
                    first,
                    second: kind,
                });
            }
            kinds.insert(name, kind);
        }
        Ok(Self { kinds })
    }

    /// Kind of the entity named `name`.
    pub fn kind_of(&self, name: &str) -> Option<EntityKind> {
        self.kinds.get(name).copied()
    }

    /// Number of registered names.
    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Require `name` to exist with the given kind.
    pub fn require(&self, kind: EntityKind, name: &str, referrer: &str) -> Result<()> {
        match self.kind_of(name) {
            Some(found) if found == kind => Ok(()),
            _ => Err(MjcfError::UnresolvedReference {
                kind,
                name: name.to_string(),
                referrer: referrer.to_string(),
            }),
        }
    }

    /// Check that welds, tendons and actuators point at existing entities.
    pub fn resolve_references(&self, scene: &Scene) -> Result<()> {
        for weld in &scene.welds {
            self.require(EntityKind::Body, &weld.body1, &weld.name)?;
            self.require(EntityKind::Body, &weld.body2, &weld.name)?;
        }
        for tendon in &scene.tendons {
            self.require(EntityKind::Site, &tendon.site_from, &tendon.name)?;
            self.require(EntityKind::Site, &tendon.site_to, &tendon.name)?;
        }
        for actuator in &scene.actuators {
            self.require(EntityKind::Joint, &actuator.joint, &actuator.name)?;
        }
        Ok(())
    }
}

/// Reject geoms, sites and tendons whose size is zero, negative or not finite.
///
/// Geoms are measured by [`GeomShape::extent`](gyrobot_ir::GeomShape::extent),
/// so a capsule with coincident end points fails as well.
pub fn check_sizes(scene: &Scene) -> Result<()> {
    let mut degenerate = None;
    scene.walk_bodies(&mut |body, _| {
        if degenerate.is_some() {
            return;
        }
        let geoms = body
            .geoms
            .iter()
            .map(|g| (EntityKind::Geom, &g.name, g.shape.extent()));
        let sites = body.sites.iter().map(|s| (EntityKind::Site, &s.name, s.size));
        degenerate = geoms.chain(sites).find(|&(_, _, size)| !is_loadable(size));
    });
    if degenerate.is_none() {
        degenerate = scene
            .tendons
            .iter()
            .map(|t| (EntityKind::Tendon, &t.name, t.width))
            .find(|&(_, _, size)| !is_loadable(size));
    }
    match degenerate {
        Some((kind, name, size)) => Err(MjcfError::DegenerateSize {
            kind,
            name: name.clone(),
            size,
        }),
        None => Ok(()),
    }
}

fn is_loadable(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// Build the registry, resolve every reference and check sizes in one go.
pub fn check_scene(scene: &Scene) -> Result<NameRegistry<'_>> {
    let registry = NameRegistry::build(scene)?;
    registry.resolve_references(scene)?;
    check_sizes(scene)?;
    Ok(registry)
}
