//! The solar system: an ordered arena of bodies, the per-frame update pass,
//! and the focus-next-body navigation cursor.
//!
//! Parent links are arena indices, and the builder rejects any body whose
//! parent does not appear earlier in the arena. That ordering is what makes
//! the update pass correct: when a body reads its parent's world position,
//! the parent has already been advanced this frame.

use glam::Vec3;
use tracing::debug;

use crate::body::{BodyParams, CelestialBody};

/// Index of a body inside its owning [`SolarSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

impl BodyId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors detected while assembling a solar system.
#[derive(Debug, thiserror::Error)]
pub enum SceneBuildError {
    /// A body referenced itself, a later body, or an id that does not exist
    /// in this builder as parent. Allowing this would make children read a
    /// stale (previous-frame) parent position.
    #[error("body \"{body}\" (index {index}) must come after its parent (index {parent})")]
    ParentNotBefore {
        body: String,
        index: usize,
        parent: usize,
    },
}

/// Incrementally assembles a [`SolarSystem`], validating parent ordering as
/// bodies are added.
#[derive(Debug, Default)]
pub struct SolarSystemBuilder {
    bodies: Vec<CelestialBody>,
}

impl SolarSystemBuilder {
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Adds a body and returns its id, which later bodies may use as their
    /// parent. Fails unless the parent id names an already-added body; ids
    /// at or past this body's own index (self, forward, or from another
    /// builder) are all rejected the same way.
    pub fn add_body(&mut self, params: BodyParams) -> Result<BodyId, SceneBuildError> {
        let index = self.bodies.len();
        if let Some(parent) = params.parent
            && parent.index() >= index
        {
            return Err(SceneBuildError::ParentNotBefore {
                body: params.name.clone(),
                index,
                parent: parent.index(),
            });
        }

        let parent_position = params
            .parent
            .map(|p| self.bodies[p.index()].world_position());
        self.bodies.push(CelestialBody::new(params, parent_position));
        Ok(BodyId(index))
    }

    /// Finishes the build. Animation starts enabled and the focus cursor at
    /// the root body.
    pub fn build(self) -> SolarSystem {
        debug!(bodies = self.bodies.len(), "solar system assembled");
        SolarSystem {
            bodies: self.bodies,
            focus_index: 0,
            animation_enabled: true,
        }
    }
}

/// Owns every body and drives the frame-by-frame simulation.
#[derive(Debug)]
pub struct SolarSystem {
    bodies: Vec<CelestialBody>,
    focus_index: usize,
    animation_enabled: bool,
}

impl SolarSystem {
    /// Advances every body by `dt` seconds, in arena order so parents are
    /// updated before their children. Does nothing while animation is
    /// disabled; the last computed matrices stay readable for drawing.
    pub fn update(&mut self, dt: f32) {
        if !self.animation_enabled {
            return;
        }
        for i in 0..self.bodies.len() {
            let parent_position = self.bodies[i]
                .parent()
                .map(|p| self.bodies[p.index()].world_position());
            self.bodies[i].advance(dt, parent_position);
        }
    }

    /// Flips the animation toggle. No body state changes until the next
    /// update call.
    pub fn toggle_animation(&mut self) {
        self.animation_enabled = !self.animation_enabled;
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.animation_enabled = enabled;
    }

    /// Moves the focus cursor to the next body and returns that body's world
    /// position for the camera to fly to. Wraps to index 1 rather than 0, so
    /// the root sun is only revisited via an explicit return-to-start. With
    /// fewer than two bodies the cursor stays put.
    pub fn focus_next(&mut self) -> Vec3 {
        if self.bodies.len() > 1 {
            self.focus_index += 1;
            if self.focus_index >= self.bodies.len() {
                self.focus_index = 1;
            }
        }
        self.bodies
            .get(self.focus_index)
            .map(CelestialBody::world_position)
            .unwrap_or(Vec3::ZERO)
    }

    /// The body currently under the navigation cursor.
    pub fn focused(&self) -> Option<&CelestialBody> {
        self.bodies.get(self.focus_index)
    }

    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.index()]
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
