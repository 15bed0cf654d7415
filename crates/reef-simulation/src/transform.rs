use reef_core::{Entity, EntityKey, EntityKind};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::scheduler::EventScheduler;

/// Turn a full collector back into an empty one after it unloads.
///
/// The successor keeps the id, limit, position, periods and frames, starts
/// with an empty load and is armed at once. Returns its key, or `None` if
/// `key` is not a live full collector.
pub fn transform_full(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<Option<EntityKey>> {
    let Some(octo) = ctx.world.entity(key) else {
        return Ok(None);
    };
    if octo.kind() != EntityKind::OctoFull {
        return Ok(None);
    }
    let successor = Entity::octo_not_full(
        octo.id(),
        octo.resource_limit(),
        octo.position(),
        octo.action_period(),
        octo.animation_period()?,
        octo.images().clone(),
    );
    replace(scheduler, ctx, key, successor)
}

/// Turn an empty collector into a full one once its load reaches the limit.
/// Returns whether the change happened.
pub fn transform_not_full(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
) -> SimResult<bool> {
    let Some(octo) = ctx.world.entity(key) else {
        return Ok(false);
    };
    if octo.kind() != EntityKind::OctoNotFull || !octo.is_full() {
        return Ok(false);
    }
    let successor = Entity::octo_full(
        octo.id(),
        octo.resource_limit(),
        octo.position(),
        octo.action_period(),
        octo.animation_period()?,
        octo.images().clone(),
    );
    let id = successor.id().to_string();
    if replace(scheduler, ctx, key, successor)?.is_none() {
        return Ok(false);
    }
    tracing::info!(id = %id, "octo filled");
    ctx.emit(
        SimEventKind::OctoFilled { octo: id.clone() },
        format!("{id} is full"),
    );
    Ok(true)
}

/// Swap `key` for `successor` in the same cell and arm the successor.
fn replace(
    scheduler: &mut EventScheduler,
    ctx: &mut SimContext<'_>,
    key: EntityKey,
    successor: Entity,
) -> SimResult<Option<EntityKey>> {
    scheduler.unschedule_all_events(key);
    ctx.world.remove_entity(key);
    let Some(new_key) = ctx.world.add_entity(successor) else {
        return Ok(None);
    };
    scheduler.schedule_actions(ctx, new_key)?;
    Ok(Some(new_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use reef_core::{Background, ImageList, ImageStore, Point, WorldModel};

    use crate::action::Action;
    use crate::config::BehaviorTuning;
    use crate::event::EventLog;

    fn fixture() -> (WorldModel, ImageStore, EventLog, StdRng, BehaviorTuning) {
        (
            WorldModel::new(4, 4, Background::new("water", ImageList::default())),
            ImageStore::default(),
            EventLog::new(0),
            StdRng::seed_from_u64(1),
            BehaviorTuning::default(),
        )
    }

    fn empty_octo(limit: u32) -> Entity {
        let images = ImageList::default();
        Entity::octo_not_full("otto", limit, Point::new(1, 1), 800, 150, images)
    }

    #[test]
    fn not_full_waits_for_limit() {
        let (mut world, images, mut events, mut rng, tuning) = fixture();
        let key = world.add_entity(empty_octo(2)).unwrap();
        world.entity_mut(key).unwrap().collect_resource();
        let mut scheduler = EventScheduler::default();
        let mut ctx = SimContext {
            world: &mut world,
            images: &images,
            events: &mut events,
            rng: &mut rng,
            tuning: &tuning,
            time: 0,
        };

        assert!(!transform_not_full(&mut scheduler, &mut ctx, key).unwrap());
        assert!(ctx.world.contains(key));
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn not_full_becomes_full_in_place() {
        let (mut world, images, mut events, mut rng, tuning) = fixture();
        let key = world.add_entity(empty_octo(1)).unwrap();
        world.entity_mut(key).unwrap().collect_resource();
        let mut scheduler = EventScheduler::default();
        scheduler.schedule_event(key, Action::Activity, 800);
        let mut ctx = SimContext {
            world: &mut world,
            images: &images,
            events: &mut events,
            rng: &mut rng,
            tuning: &tuning,
            time: 0,
        };

        assert!(transform_not_full(&mut scheduler, &mut ctx, key).unwrap());
        assert!(!ctx.world.contains(key));
        assert_eq!(scheduler.pending_count(key), 0);

        let full = ctx.world.occupant(Point::new(1, 1)).unwrap();
        let octo = ctx.world.entity(full).unwrap();
        assert_eq!(octo.kind(), EntityKind::OctoFull);
        assert_eq!(octo.id(), "otto");
        assert_eq!(octo.resource_limit(), 1);
        // Armed with its activity and endless animation.
        assert_eq!(scheduler.pending_count(full), 2);
        assert_eq!(ctx.events.events_for_entity("otto").len(), 1);
    }

    #[test]
    fn full_becomes_empty_collector() {
        let (mut world, images, mut events, mut rng, tuning) = fixture();
        let octo_images = ImageList::default();
        let octo = Entity::octo_full("otto", 3, Point::new(2, 0), 800, 150, octo_images);
        let key = world.add_entity(octo).unwrap();
        let mut scheduler = EventScheduler::default();
        let mut ctx = SimContext {
            world: &mut world,
            images: &images,
            events: &mut events,
            rng: &mut rng,
            tuning: &tuning,
            time: 0,
        };

        let successor = transform_full(&mut scheduler, &mut ctx, key)
            .unwrap()
            .expect("full collector is replaced");
        let octo = ctx.world.entity(successor).unwrap();
        assert_eq!(octo.kind(), EntityKind::OctoNotFull);
        assert_eq!(octo.resource_count(), 0);
        assert_eq!(octo.position(), Point::new(2, 0));
        assert_eq!(octo.action_period(), 800);

        // Only full collectors unload.
        let again = transform_full(&mut scheduler, &mut ctx, successor).unwrap();
        assert_eq!(again, None);
    }
}
