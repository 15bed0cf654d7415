use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assets::ImageList;
use crate::error::{CoreError, CoreResult};
use crate::point::Point;

/// Id given to every quake. Quakes are transient and never looked up by id.
pub const QUAKE_ID: &str = "quake";

/// The closed set of entity kinds. A kind never changes after creation;
/// transformations replace the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Static blocker with no behavior.
    Obstacle,
    /// Short-lived forager that matures into a crab.
    Fish,
    /// Predator that hunts sea grass.
    Crab,
    /// Stationary grower that spawns fish.
    SeaGrass,
    /// Collector hunting fish until its resource limit is reached.
    OctoNotFull,
    /// Collector carrying a full load back to Atlantis.
    OctoFull,
    /// Goal site where full collectors unload; sinks after its animation.
    Atlantis,
    /// Transient hazard left behind where a crab fed.
    Quake,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 8] = [
        Self::Obstacle,
        Self::Fish,
        Self::Crab,
        Self::SeaGrass,
        Self::OctoNotFull,
        Self::OctoFull,
        Self::Atlantis,
        Self::Quake,
    ];

    /// Key used for image lookup and in world descriptions.
    pub fn image_key(self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::Fish => "fish",
            Self::Crab => "crab",
            Self::SeaGrass => "seaGrass",
            Self::OctoNotFull | Self::OctoFull => "octo",
            Self::Atlantis => "atlantis",
            Self::Quake => "quake",
        }
    }

    /// Whether entities of this kind advance their frames on a timer.
    pub fn animates(self) -> bool {
        matches!(
            self,
            Self::Crab | Self::OctoNotFull | Self::OctoFull | Self::Atlantis | Self::Quake
        )
    }

    /// Whether entities of this kind run a recurring activity.
    pub fn has_activity(self) -> bool {
        !matches!(self, Self::Obstacle | Self::Atlantis)
    }

    /// Single-character glyph for text dumps.
    pub fn glyph(self) -> char {
        match self {
            Self::Obstacle => '#',
            Self::Fish => 'f',
            Self::Crab => 'c',
            Self::SeaGrass => 'g',
            Self::OctoNotFull => 'o',
            Self::OctoFull => 'O',
            Self::Atlantis => 'A',
            Self::Quake => '*',
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Obstacle => "obstacle",
            Self::Fish => "fish",
            Self::Crab => "crab",
            Self::SeaGrass => "sea grass",
            Self::OctoNotFull => "octo (not full)",
            Self::OctoFull => "octo (full)",
            Self::Atlantis => "atlantis",
            Self::Quake => "quake",
        };
        write!(f, "{name}")
    }
}

/// A simulation object occupying one grid cell.
///
/// Periods are in milliseconds of simulated time, before the scheduler's
/// time scale is applied.
#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    id: String,
    /// Current cell. Written only by the world model.
    pub(crate) position: Point,
    images: ImageList,
    image_index: usize,
    resource_limit: u32,
    resource_count: u32,
    action_period: u64,
    animation_period: u64,
}

impl Entity {
    #[allow(clippy::too_many_arguments)]
    fn build(
        kind: EntityKind,
        id: impl Into<String>,
        position: Point,
        images: ImageList,
        resource_limit: u32,
        resource_count: u32,
        action_period: u64,
        animation_period: u64,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            position,
            images,
            image_index: 0,
            resource_limit,
            resource_count: resource_count.min(resource_limit),
            action_period,
            animation_period,
        }
    }

    /// A static blocker.
    pub fn obstacle(id: impl Into<String>, position: Point, images: ImageList) -> Self {
        Self::build(EntityKind::Obstacle, id, position, images, 0, 0, 0, 0)
    }

    /// A fish that matures after `action_period`.
    pub fn fish(
        id: impl Into<String>,
        position: Point,
        action_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::Fish,
            id,
            position,
            images,
            0,
            0,
            action_period,
            0,
        )
    }

    /// A crab.
    pub fn crab(
        id: impl Into<String>,
        position: Point,
        action_period: u64,
        animation_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::Crab,
            id,
            position,
            images,
            0,
            0,
            action_period,
            animation_period,
        )
    }

    /// A sea grass patch spawning fish every `action_period`.
    pub fn sea_grass(
        id: impl Into<String>,
        position: Point,
        action_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::SeaGrass,
            id,
            position,
            images,
            0,
            0,
            action_period,
            0,
        )
    }

    /// An empty collector.
    pub fn octo_not_full(
        id: impl Into<String>,
        resource_limit: u32,
        position: Point,
        action_period: u64,
        animation_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::OctoNotFull,
            id,
            position,
            images,
            resource_limit,
            0,
            action_period,
            animation_period,
        )
    }

    /// A full collector; its resource count starts at the limit.
    pub fn octo_full(
        id: impl Into<String>,
        resource_limit: u32,
        position: Point,
        action_period: u64,
        animation_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::OctoFull,
            id,
            position,
            images,
            resource_limit,
            resource_limit,
            action_period,
            animation_period,
        )
    }

    /// A goal site.
    pub fn atlantis(
        id: impl Into<String>,
        position: Point,
        animation_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::Atlantis,
            id,
            position,
            images,
            0,
            0,
            0,
            animation_period,
        )
    }

    /// A quake. All quakes share [`QUAKE_ID`].
    pub fn quake(
        position: Point,
        action_period: u64,
        animation_period: u64,
        images: ImageList,
    ) -> Self {
        Self::build(
            EntityKind::Quake,
            QUAKE_ID,
            position,
            images,
            0,
            0,
            action_period,
            animation_period,
        )
    }

    /// The entity's kind.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The entity's textual id. Not unique: successors reuse their
    /// predecessor's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current cell, or [`Point::OFF_GRID`] once removed from a world.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The frames this entity cycles through.
    pub fn images(&self) -> &ImageList {
        &self.images
    }

    /// Index of the frame currently shown.
    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// Advance to the next frame, wrapping around.
    pub fn next_image(&mut self) {
        self.image_index = (self.image_index + 1) % self.images.len();
    }

    /// Resources collected so far.
    pub fn resource_count(&self) -> u32 {
        self.resource_count
    }

    /// Resources needed before a collector is full.
    pub fn resource_limit(&self) -> u32 {
        self.resource_limit
    }

    /// Record one collected resource. The count never exceeds the limit.
    /// Returns the new count.
    pub fn collect_resource(&mut self) -> u32 {
        self.resource_count = (self.resource_count + 1).min(self.resource_limit);
        self.resource_count
    }

    /// Whether the resource count has reached the limit.
    pub fn is_full(&self) -> bool {
        self.resource_count >= self.resource_limit
    }

    /// Delay between activity ticks.
    pub fn action_period(&self) -> u64 {
        self.action_period
    }

    /// Delay between animation frames.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnsupportedAnimation`] for kinds that never animate.
    pub fn animation_period(&self) -> CoreResult<u64> {
        if self.kind.animates() {
            Ok(self.animation_period)
        } else {
            Err(CoreError::UnsupportedAnimation(self.kind))
        }
    }
}

/// The decorative state of one cell, independent of whoever occupies it.
#[derive(Debug, Clone)]
pub struct Background {
    id: String,
    images: ImageList,
}

impl Background {
    /// A background drawn with `images`.
    pub fn new(id: impl Into<String>, images: ImageList) -> Self {
        Self {
            id: id.into(),
            images,
        }
    }

    /// The background's identifier (also its image key).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The frames this background is drawn with.
    pub fn images(&self) -> &ImageList {
        &self.images
    }
}
