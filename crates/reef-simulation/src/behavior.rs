use std::ops::Range;

use rand::Rng;
use rand::rngs::StdRng;
use reef_core::{Entity, EntityKey, EntityKind, Point, WorldModel};

use crate::action::{Action, ScheduledEvent};
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::scheduler::EventScheduler;
use crate::transform;

/// Prefix of the id given to a fish spawned by sea grass.
pub const FISH_ID_PREFIX: &str = "fish -- ";
/// Suffix appended to a fish's id when it matures into a crab.
pub const CRAB_ID_SUFFIX: &str = " -- crab";

/// Which occupants stop a mover from stepping into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    /// Fish are pushed aside; anything else blocks.
    OverFish,
    /// Every occupant blocks.
    Clear,
}

impl Passage {
    fn blocks(self, occupant: &Entity) -> bool {
        match self {
            Self::OverFish => occupant.kind() != EntityKind::Fish,
            Self::Clear => true,
        }
    }
}

/// Run one dequeued event.
///
/// Events whose entity has left the world are dropped along with anything
/// else still queued for it.
pub fn dispatch(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    event: &ScheduledEvent,
) -> SimResult<()> {
    let key = event.entity;
    let Some(kind) = ctx.world.entity(key).map(Entity::kind) else {
        let purged = scheduler.unschedule_all_events(key);
        tracing::debug!(time = event.time, purged, "dropping event for removed entity");
        return Ok(());
    };
    match event.action {
        Action::Activity => execute_activity(scheduler, ctx, key, kind),
        Action::Animation { repeat_count } => execute_animation(scheduler, ctx, key, repeat_count),
    }
}

/// Advance the entity's frame and queue the next one.
///
/// A repeat count of 0 animates forever; otherwise the count drops by one
/// per frame and the tick that sees 1 is the last. A goal site sinks on its
/// last frame.
pub fn execute_animation(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
    repeat_count: u32,
) -> SimResult<()> {
    let Some(entity) = ctx.world.entity_mut(key) else {
        return Ok(());
    };
    let period = entity.animation_period()?;
    entity.next_image();
    let kind = entity.kind();

    if repeat_count != 1 {
        let repeat_count = repeat_count.saturating_sub(1);
        scheduler.schedule_event(key, Action::Animation { repeat_count }, period);
    } else if kind == EntityKind::Atlantis {
        sink_atlantis(scheduler, ctx, key);
    }
    Ok(())
}

/// Run the kind's recurring behavior.
pub fn execute_activity(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
    kind: EntityKind,
) -> SimResult<()> {
    match kind {
        EntityKind::Obstacle => Ok(()),
        EntityKind::SeaGrass => sea_grass_activity(scheduler, ctx, key),
        EntityKind::Fish => fish_activity(scheduler, ctx, key),
        EntityKind::Crab => crab_activity(scheduler, ctx, key),
        EntityKind::Quake => {
            quake_activity(scheduler, ctx, key);
            Ok(())
        }
        EntityKind::OctoNotFull => octo_not_full_activity(scheduler, ctx, key),
        EntityKind::OctoFull => octo_full_activity(scheduler, ctx, key),
        EntityKind::Atlantis => {
            sink_atlantis(scheduler, ctx, key);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind activities
// ---------------------------------------------------------------------------

fn sea_grass_activity(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<()> {
    let Some(grass) = ctx.world.entity(key) else {
        return Ok(());
    };
    let id = grass.id().to_string();
    let (pos, period) = (grass.position(), grass.action_period());

    if let Some(open) = ctx.world.find_open_around(pos) {
        let fish_id = format!("{FISH_ID_PREFIX}{id}");
        let lifespan = sample(ctx.rng, &ctx.tuning.fish_lifespan);
        let images = ctx.images.image_list(EntityKind::Fish.image_key());
        let fish = Entity::fish(fish_id.clone(), open, lifespan, images);
        if let Some(fish_key) = ctx.world.add_entity(fish) {
            scheduler.schedule_actions(ctx, fish_key)?;
            tracing::info!(id = %fish_id, ?open, lifespan, "fish spawned");
            ctx.emit(
                SimEventKind::FishSpawned {
                    fish: fish_id.clone(),
                    sea_grass: id.clone(),
                    at: open,
                },
                format!("{id} spawned {fish_id} at {open}"),
            );
        }
    }

    scheduler.schedule_event(key, Action::Activity, period);
    Ok(())
}

fn fish_activity(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<()> {
    scheduler.unschedule_all_events(key);
    let Some(fish) = ctx.world.entity(key) else {
        return Ok(());
    };
    let pos = fish.position();
    let Some(fish) = ctx.world.remove_entity(key) else {
        return Ok(());
    };

    let crab_id = format!("{}{CRAB_ID_SUFFIX}", fish.id());
    let action_period = fish.action_period() / ctx.tuning.crab_period_scale.max(1);
    let animation = sample(ctx.rng, &ctx.tuning.crab_animation);
    let images = ctx.images.image_list(EntityKind::Crab.image_key());
    let crab = Entity::crab(crab_id.clone(), pos, action_period, animation, images);

    if let Some(crab_key) = ctx.world.add_entity(crab) {
        scheduler.schedule_actions(ctx, crab_key)?;
        tracing::info!(id = %crab_id, ?pos, action_period, "fish matured");
        ctx.emit(
            SimEventKind::FishMatured {
                fish: fish.id().to_string(),
                crab: crab_id.clone(),
                at: pos,
            },
            format!("{} became {crab_id} at {pos}", fish.id()),
        );
    }
    Ok(())
}

fn crab_activity(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<()> {
    let Some(crab) = ctx.world.entity(key) else {
        return Ok(());
    };
    let mut next_period = crab.action_period();

    let target = reach_nearest(scheduler, ctx, key, EntityKind::SeaGrass, Passage::OverFish);
    if let Some(target) = target {
        next_period = next_period.saturating_mul(2);
        devour(scheduler, ctx, key, target)?;
    }

    scheduler.schedule_event(key, Action::Activity, next_period);
    Ok(())
}

/// A crab consumes sea grass and leaves a quake in its place.
fn devour(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    crab: EntityKey,
    target: EntityKey,
) -> SimResult<()> {
    let Some(at) = ctx.world.entity(target).map(Entity::position) else {
        return Ok(());
    };
    scheduler.unschedule_all_events(target);
    let Some(grass) = ctx.world.remove_entity(target) else {
        return Ok(());
    };
    let crab_id = ctx
        .world
        .entity(crab)
        .map(|c| c.id().to_string())
        .unwrap_or_default();
    tracing::info!(crab = %crab_id, sea_grass = %grass.id(), ?at, "sea grass devoured");
    ctx.emit(
        SimEventKind::SeaGrassDevoured {
            crab: crab_id.clone(),
            sea_grass: grass.id().to_string(),
            at,
        },
        format!("{crab_id} devoured {} at {at}", grass.id()),
    );

    let tuning = ctx.tuning;
    let quake = Entity::quake(
        at,
        tuning.quake_action_period,
        tuning.quake_animation_period,
        ctx.images.image_list(EntityKind::Quake.image_key()),
    );
    if let Some(quake_key) = ctx.world.add_entity(quake) {
        scheduler.schedule_actions(ctx, quake_key)?;
        ctx.emit(SimEventKind::QuakeStarted { at }, format!("quake at {at}"));
    }
    Ok(())
}

fn quake_activity(scheduler: &mut EventScheduler, ctx: &mut SimContext<'_>, key: EntityKey) {
    scheduler.unschedule_all_events(key);
    let Some(quake) = ctx.world.entity(key) else {
        return;
    };
    let at = quake.position();
    ctx.world.remove_entity(key);
    tracing::debug!(?at, "quake subsided");
    ctx.emit(
        SimEventKind::QuakeSubsided { at },
        format!("quake at {at} subsided"),
    );
}

fn octo_not_full_activity(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<()> {
    let Some(octo) = ctx.world.entity(key) else {
        return Ok(());
    };
    let period = octo.action_period();

    if let Some(target) = reach_nearest(scheduler, ctx, key, EntityKind::Fish, Passage::OverFish) {
        catch_fish(scheduler, ctx, key, target);
        if transform::transform_not_full(scheduler, ctx, key)? {
            return Ok(());
        }
    }

    scheduler.schedule_event(key, Action::Activity, period);
    Ok(())
}

fn catch_fish(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    octo: EntityKey,
    fish: EntityKey,
) {
    let Some(collector) = ctx.world.entity_mut(octo) else {
        return;
    };
    let count = collector.collect_resource();
    let octo_id = collector.id().to_string();

    scheduler.unschedule_all_events(fish);
    let fish_id = ctx
        .world
        .remove_entity(fish)
        .map(|f| f.id().to_string())
        .unwrap_or_default();
    tracing::info!(octo = %octo_id, fish = %fish_id, count, "fish caught");
    ctx.emit(
        SimEventKind::FishCaught {
            octo: octo_id.clone(),
            fish: fish_id.clone(),
            count,
        },
        format!("{octo_id} caught {fish_id} ({count})"),
    );
}

fn octo_full_activity(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<()> {
    let Some(octo) = ctx.world.entity(key) else {
        return Ok(());
    };
    let (period, octo_id) = (octo.action_period(), octo.id().to_string());

    if let Some(target) = reach_nearest(scheduler, ctx, key, EntityKind::Atlantis, Passage::Clear) {
        scheduler.schedule_actions(ctx, target)?;
        let atlantis_id = ctx
            .world
            .entity(target)
            .map(|a| a.id().to_string())
            .unwrap_or_default();
        transform::transform_full(scheduler, ctx, key)?;
        tracing::info!(octo = %octo_id, atlantis = %atlantis_id, "octo unloaded");
        ctx.emit(
            SimEventKind::OctoUnloaded {
                octo: octo_id.clone(),
                atlantis: atlantis_id.clone(),
            },
            format!("{octo_id} unloaded at {atlantis_id}"),
        );
        return Ok(());
    }

    scheduler.schedule_event(key, Action::Activity, period);
    Ok(())
}

/// A goal site cancels everything it had queued and leaves the world.
fn sink_atlantis(scheduler: &mut EventScheduler, ctx: &mut SimContext<'_>, key: EntityKey) {
    scheduler.unschedule_all_events(key);
    let Some(at) = ctx.world.entity(key).map(Entity::position) else {
        return;
    };
    let Some(atlantis) = ctx.world.remove_entity(key) else {
        return;
    };
    let id = atlantis.id().to_string();
    tracing::info!(id = %id, ?at, "atlantis sank");
    ctx.emit(
        SimEventKind::AtlantisSank {
            atlantis: id.clone(),
            at,
        },
        format!("{id} sank at {at}"),
    );
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// The cell one step from `from` toward `dest`.
///
/// The horizontal step is tried first. If there is no horizontal distance
/// to cover, or that cell is blocked, the vertical step is tried; if that
/// fails too the mover stays put.
pub fn next_position(world: &WorldModel, from: Point, dest: Point, passage: Passage) -> Point {
    let blocked = |pos: Point| {
        world
            .occupant(pos)
            .and_then(|key| world.entity(key))
            .is_some_and(|occupant| passage.blocks(occupant))
    };

    let horiz = (dest.x - from.x).signum();
    let step = from.offset(horiz, 0);
    if horiz != 0 && !blocked(step) {
        return step;
    }

    let vert = (dest.y - from.y).signum();
    let step = from.offset(0, vert);
    if vert != 0 && !blocked(step) {
        return step;
    }
    from
}

/// Find the nearest entity of `kind` and step toward it. Returns the target
/// once the mover stands next to it.
fn reach_nearest(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
    kind: EntityKind,
    passage: Passage,
) -> Option<EntityKey> {
    let pos = ctx.world.entity(key)?.position();
    let target = ctx.world.find_nearest(pos, kind)?;
    approach(scheduler, ctx, key, target, passage).then_some(target)
}

/// Step `key` toward `target`. Returns true once the two are adjacent; the
/// mover does not step in that case.
///
/// Whatever occupied the cell stepped into is removed from the world and its
/// events are withdrawn.
pub fn approach(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
    target: EntityKey,
    passage: Passage,
) -> bool {
    let (Some(mover), Some(goal)) = (ctx.world.entity(key), ctx.world.entity(target)) else {
        return false;
    };
    let (from, dest) = (mover.position(), goal.position());
    if from.adjacent(dest) {
        return true;
    }

    let next = next_position(ctx.world, from, dest, passage);
    if next != from {
        if let Some(occupant) = ctx.world.occupant(next) {
            scheduler.unschedule_all_events(occupant);
        }
        if let Some(evicted) = ctx.world.move_entity(key, next) {
            let by = ctx
                .world
                .entity(key)
                .map(|e| e.id().to_string())
                .unwrap_or_default();
            tracing::warn!(id = %evicted.id(), by = %by, at = ?next, "entity displaced");
            ctx.emit(
                SimEventKind::EntityDisplaced {
                    entity: evicted.id().to_string(),
                    by: by.clone(),
                    at: next,
                },
                format!("{by} pushed {} out of {next}", evicted.id()),
            );
        }
    }
    false
}

fn sample(rng: &mut StdRng, range: &Range<u64>) -> u64 {
    if range.is_empty() {
        range.start
    } else {
        rng.random_range(range.clone())
    }
}
