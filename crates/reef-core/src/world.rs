use std::collections::BTreeMap;
use std::str::FromStr;

use slotmap::SlotMap;

use crate::assets::ImageStore;
use crate::entity::{Background, Entity, EntityKind};
use crate::error::{CoreError, CoreResult};
use crate::point::Point;

slotmap::new_key_type! {
    /// Stable handle to a live entity. Once the entity is removed the key
    /// never resolves again, even if its slot is reused.
    pub struct EntityKey;
}

/// Radius scanned by [`WorldModel::find_open_around`].
pub const OPEN_CELL_RADIUS: i32 = 1;

/// Animation delay given to goal sites read from a world description.
pub const ATLANTIS_ANIMATION_PERIOD: u64 = 0;

/// The grid world: one background per cell, at most one entity per cell,
/// and the arena of live entities.
///
/// Every live entity sits in exactly the cell named by its position, and
/// every occupied cell points back at a live entity.
#[derive(Debug, Clone)]
pub struct WorldModel {
    num_rows: i32,
    num_cols: i32,
    background: Vec<Background>,
    occupancy: Vec<Option<EntityKey>>,
    entities: SlotMap<EntityKey, Entity>,
}

impl WorldModel {
    /// A `num_rows` × `num_cols` grid with every cell set to `background`.
    /// Negative dimensions produce an empty grid.
    pub fn new(num_rows: i32, num_cols: i32, background: Background) -> Self {
        let num_rows = num_rows.max(0);
        let num_cols = num_cols.max(0);
        let cells = (num_rows as usize) * (num_cols as usize);
        Self {
            num_rows,
            num_cols,
            background: vec![background; cells],
            occupancy: vec![None; cells],
            entities: SlotMap::with_key(),
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> i32 {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_cols(&self) -> i32 {
        self.num_cols
    }

    /// Whether `pos` lies on the grid.
    pub fn within_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.x < self.num_cols && pos.y >= 0 && pos.y < self.num_rows
    }

    fn cell(&self, pos: Point) -> Option<usize> {
        self.within_bounds(pos)
            .then(|| (pos.y as usize) * (self.num_cols as usize) + pos.x as usize)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether an entity sits at `pos`. False off the grid.
    pub fn is_occupied(&self, pos: Point) -> bool {
        self.occupant(pos).is_some()
    }

    /// The entity at `pos`, if any.
    pub fn occupant(&self, pos: Point) -> Option<EntityKey> {
        self.cell(pos).and_then(|i| self.occupancy[i])
    }

    /// Look up a live entity.
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Look up a live entity mutably. Its position stays under the world's
    /// control.
    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Whether `key` still names a live entity.
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity is alive.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All live entities with their keys, in arena order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Live entities of one kind.
    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter().filter(move |(_, e)| e.kind() == kind)
    }

    /// Live entity counts per kind. Kinds with no entities are omitted.
    pub fn census(&self) -> BTreeMap<EntityKind, usize> {
        let mut counts = BTreeMap::new();
        for entity in self.entities.values() {
            *counts.entry(entity.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// The live entity of `kind` closest to `pos`.
    ///
    /// Equal distances resolve to the smallest id, then the smallest key, so
    /// the choice never depends on arena layout alone.
    pub fn find_nearest(&self, pos: Point, kind: EntityKind) -> Option<EntityKey> {
        self.entities_of_kind(kind)
            .min_by_key(|&(key, e)| (e.position.distance_squared(pos), e.id(), key))
            .map(|(key, _)| key)
    }

    /// First free cell around `pos`, scanning rows top to bottom and each
    /// row left to right. `pos` itself is included in the scan.
    pub fn find_open_around(&self, pos: Point) -> Option<Point> {
        for dy in -OPEN_CELL_RADIUS..=OPEN_CELL_RADIUS {
            for dx in -OPEN_CELL_RADIUS..=OPEN_CELL_RADIUS {
                let candidate = pos.offset(dx, dy);
                if self.within_bounds(candidate) && !self.is_occupied(candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Insert `entity` at its own position without a collision check.
    ///
    /// Off-grid positions are ignored and yield `None`. If the cell is
    /// already taken the previous occupant is removed from the world.
    pub fn add_entity(&mut self, entity: Entity) -> Option<EntityKey> {
        let cell = self.cell(entity.position)?;
        let displaced = self.occupancy[cell].and_then(|previous| self.remove_entity(previous));
        if let Some(displaced) = displaced {
            tracing::warn!(
                id = %displaced.id(),
                by = %entity.id(),
                pos = %entity.position,
                "entity displaced on insert"
            );
        }
        let key = self.entities.insert(entity);
        self.occupancy[cell] = Some(key);
        Some(key)
    }

    /// Insert `entity`, refusing occupied or off-grid cells.
    pub fn try_add_entity(&mut self, entity: Entity) -> CoreResult<EntityKey> {
        let pos = entity.position;
        let Some(cell) = self.cell(pos) else {
            return Err(CoreError::OutOfBounds(pos));
        };
        if self.occupancy[cell].is_some() {
            return Err(CoreError::Occupied(pos));
        }
        let key = self.entities.insert(entity);
        self.occupancy[cell] = Some(key);
        Ok(key)
    }

    /// Remove a live entity, returning it parked at [`Point::OFF_GRID`].
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let mut entity = self.entities.remove(key)?;
        let cell = self.cell(entity.position);
        if let Some(cell) = cell.filter(|&i| self.occupancy[i] == Some(key)) {
            self.occupancy[cell] = None;
        }
        entity.position = Point::OFF_GRID;
        Some(entity)
    }

    /// Move a live entity to `pos`.
    ///
    /// Nothing happens when `pos` is off the grid or already the entity's
    /// cell. Whatever occupied `pos` is removed from the world and returned.
    pub fn move_entity(&mut self, key: EntityKey, pos: Point) -> Option<Entity> {
        let from = self.entities.get(key)?.position;
        let target = self.cell(pos)?;
        if from == pos {
            return None;
        }

        if let Some(cell) = self.cell(from) {
            self.occupancy[cell] = None;
        }
        let evicted = match self.occupancy[target] {
            Some(other) => self.remove_entity(other),
            None => None,
        };
        self.occupancy[target] = Some(key);
        if let Some(entity) = self.entities.get_mut(key) {
            entity.position = pos;
        }
        evicted
    }

    /// The background at `pos`, or `None` off the grid.
    pub fn background(&self, pos: Point) -> Option<&Background> {
        self.cell(pos).map(|i| &self.background[i])
    }

    /// Replace the background at `pos`. Ignored off the grid.
    pub fn set_background(&mut self, pos: Point, background: Background) {
        if let Some(i) = self.cell(pos) {
            self.background[i] = background;
        }
    }

    /// One glyph per cell, one line per row: the occupant's glyph or `.`.
    pub fn render_ascii(&self) -> String {
        let width = self.num_cols as usize + 1;
        let mut out = String::with_capacity(width * self.num_rows as usize);
        for y in 0..self.num_rows {
            for x in 0..self.num_cols {
                let glyph = self
                    .occupant(Point::new(x, y))
                    .and_then(|key| self.entities.get(key))
                    .map_or('.', |e| e.kind().glyph());
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    // -----------------------------------------------------------------------
    // Parse factories
    // -----------------------------------------------------------------------

    /// `background id col row`: overwrite that cell's background.
    pub fn parse_background(&mut self, fields: &[&str], images: &ImageStore) -> CoreResult<()> {
        expect_fields(fields, 4)?;
        let pos = parse_position(fields)?;
        if !self.within_bounds(pos) {
            return Err(CoreError::OutOfBounds(pos));
        }
        let id = fields[1];
        self.set_background(pos, Background::new(id, images.image_list(id)));
        Ok(())
    }

    /// `obstacle id col row`
    pub fn parse_obstacle(
        &mut self,
        fields: &[&str],
        images: &ImageStore,
    ) -> CoreResult<EntityKey> {
        expect_fields(fields, 4)?;
        let pos = parse_position(fields)?;
        let images = images.image_list(EntityKind::Obstacle.image_key());
        self.try_add_entity(Entity::obstacle(fields[1], pos, images))
    }

    /// `fish id col row actionPeriod`
    pub fn parse_fish(&mut self, fields: &[&str], images: &ImageStore) -> CoreResult<EntityKey> {
        expect_fields(fields, 5)?;
        let pos = parse_position(fields)?;
        let action_period = parse_number("actionPeriod", fields[4])?;
        let images = images.image_list(EntityKind::Fish.image_key());
        self.try_add_entity(Entity::fish(fields[1], pos, action_period, images))
    }

    /// `seaGrass id col row actionPeriod`
    pub fn parse_sea_grass(
        &mut self,
        fields: &[&str],
        images: &ImageStore,
    ) -> CoreResult<EntityKey> {
        expect_fields(fields, 5)?;
        let pos = parse_position(fields)?;
        let action_period = parse_number("actionPeriod", fields[4])?;
        let images = images.image_list(EntityKind::SeaGrass.image_key());
        self.try_add_entity(Entity::sea_grass(fields[1], pos, action_period, images))
    }

    /// `octo id col row resourceLimit actionPeriod animationPeriod`
    pub fn parse_octo(&mut self, fields: &[&str], images: &ImageStore) -> CoreResult<EntityKey> {
        expect_fields(fields, 7)?;
        let pos = parse_position(fields)?;
        let resource_limit = parse_number("resourceLimit", fields[4])?;
        let action_period = parse_number("actionPeriod", fields[5])?;
        let animation_period = parse_number("animationPeriod", fields[6])?;
        let images = images.image_list(EntityKind::OctoNotFull.image_key());
        self.try_add_entity(Entity::octo_not_full(
            fields[1],
            resource_limit,
            pos,
            action_period,
            animation_period,
            images,
        ))
    }

    /// `atlantis id col row`
    pub fn parse_atlantis(
        &mut self,
        fields: &[&str],
        images: &ImageStore,
    ) -> CoreResult<EntityKey> {
        expect_fields(fields, 4)?;
        let pos = parse_position(fields)?;
        let images = images.image_list(EntityKind::Atlantis.image_key());
        self.try_add_entity(Entity::atlantis(fields[1], pos, ATLANTIS_ANIMATION_PERIOD, images))
    }
}

fn expect_fields(fields: &[&str], expected: usize) -> CoreResult<()> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(CoreError::FieldCount {
            key: fields.first().copied().unwrap_or_default().to_string(),
            expected,
            found: fields.len(),
        })
    }
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> CoreResult<T> {
    value.parse().map_err(|_| CoreError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_position(fields: &[&str]) -> CoreResult<Point> {
    Ok(Point::new(
        parse_number("col", fields[2])?,
        parse_number("row", fields[3])?,
    ))
}
