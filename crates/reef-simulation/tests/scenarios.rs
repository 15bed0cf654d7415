//! Integration tests for reef-simulation scenarios.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reef_core::{
    Background, Entity, EntityKey, EntityKind, ImageList, ImageStore, Point, WorldModel,
};
use reef_simulation::behavior::{Passage, execute_activity, next_position};
use reef_simulation::{
    Action, BehaviorTuning, EventLog, EventScheduler, SimConfig, SimContext, SimEventKind,
    Simulation,
};

fn world(rows: i32, cols: i32) -> WorldModel {
    WorldModel::new(rows, cols, Background::new("water", ImageList::default()))
}

fn sim(world: WorldModel) -> Simulation {
    let mut sim = Simulation::new(world, ImageStore::default(), SimConfig::default())
        .expect("default config is valid");
    sim.arm_all().expect("arming succeeds");
    sim
}

fn place(world: &mut WorldModel, entity: Entity) -> EntityKey {
    world.add_entity(entity).expect("cell is on the grid")
}

fn next_activity(sim: &Simulation, key: EntityKey) -> Option<u64> {
    sim.scheduler()
        .queued()
        .find(|e| e.entity == key && e.action == Action::Activity)
        .map(|e| e.time)
}

fn kind_at(sim: &Simulation, pos: Point) -> Option<EntityKind> {
    let key = sim.world().occupant(pos)?;
    sim.world().entity(key).map(Entity::kind)
}

fn grass(x: i32, y: i32, period: u64) -> Entity {
    Entity::sea_grass("kelp", Point::new(x, y), period, ImageList::default())
}

fn fish(id: &str, x: i32, y: i32) -> Entity {
    Entity::fish(id, Point::new(x, y), 1_000_000, ImageList::default())
}

fn octo(limit: u32, x: i32, y: i32, period: u64) -> Entity {
    let images = ImageList::default();
    Entity::octo_not_full("otto", limit, Point::new(x, y), period, 10_000, images)
}

fn rock(id: &str, x: i32) -> Entity {
    Entity::obstacle(id, Point::new(x, 0), ImageList::default())
}

#[test]
fn sea_grass_spawns_fish_in_open_cell() {
    let mut w = world(6, 6);
    let kelp = place(&mut w, grass(2, 2, 1_000));
    let mut sim = sim(w);

    assert_eq!(sim.update_on_time(1_001).unwrap(), 1);

    let census = sim.world().census();
    assert_eq!(census.get(&EntityKind::Fish), Some(&1));
    // First free cell scanning from the top-left neighbour.
    let spawned = sim.world().occupant(Point::new(1, 1)).unwrap();
    let spawned_fish = sim.world().entity(spawned).unwrap();
    assert_eq!(spawned_fish.kind(), EntityKind::Fish);
    assert_eq!(spawned_fish.id(), "fish -- kelp");
    assert!((20_000..30_000).contains(&spawned_fish.action_period()));
    assert_eq!(
        next_activity(&sim, spawned),
        Some(1_001 + spawned_fish.action_period())
    );

    assert_eq!(next_activity(&sim, kelp), Some(2_001));
    assert_eq!(sim.events().events_for_entity("fish -- kelp").len(), 1);
}

#[test]
fn sea_grass_without_room_only_rearms() {
    let mut w = world(1, 1);
    let kelp = place(&mut w, grass(0, 0, 1_000));
    let mut sim = sim(w);

    sim.update_on_time(1_001).unwrap();
    assert_eq!(sim.world().len(), 1);
    assert_eq!(sim.scheduler().pending_count(kelp), 1);
    assert_eq!(next_activity(&sim, kelp), Some(2_001));
    assert!(sim.events().is_empty());
}

#[test]
fn fish_matures_into_crab() {
    let mut w = world(3, 3);
    let nemo = place(
        &mut w,
        Entity::fish("nemo", Point::new(1, 1), 2_000, ImageList::default()),
    );
    let mut sim = sim(w);

    sim.update_on_time(2_001).unwrap();
    assert!(!sim.world().contains(nemo));
    assert_eq!(sim.scheduler().pending_count(nemo), 0);

    let crab_key = sim.world().occupant(Point::new(1, 1)).unwrap();
    let crab = sim.world().entity(crab_key).unwrap();
    assert_eq!(crab.kind(), EntityKind::Crab);
    assert_eq!(crab.id(), "nemo -- crab");
    assert_eq!(crab.action_period(), 500);
    let animation = crab.animation_period().unwrap();
    assert!((50..150).contains(&animation));
    assert_eq!(sim.scheduler().pending_count(crab_key), 2);
}

#[test]
fn crab_devours_adjacent_sea_grass_and_quakes() {
    let mut w = world(4, 4);
    let crab = place(
        &mut w,
        Entity::crab("crab", Point::new(1, 1), 500, 100, ImageList::default()),
    );
    let kelp = place(&mut w, grass(2, 1, 100_000));
    let mut sim = sim(w);

    sim.update_on_time(501).unwrap();

    assert!(!sim.world().contains(kelp));
    assert_eq!(sim.scheduler().pending_count(kelp), 0);
    assert_eq!(kind_at(&sim, Point::new(2, 1)), Some(EntityKind::Quake));
    let quake = sim.world().occupant(Point::new(2, 1)).unwrap();
    assert_eq!(sim.scheduler().pending_count(quake), 2);
    assert_eq!(next_activity(&sim, quake), Some(501 + 1_100));

    // The crab rests twice as long after feeding.
    assert_eq!(next_activity(&sim, crab), Some(501 + 1_000));
    let crab_pos = sim.world().entity(crab).unwrap().position();
    assert_eq!(crab_pos, Point::new(1, 1));

    let kinds: Vec<&SimEventKind> = sim.events().events().iter().map(|e| &e.kind).collect();
    assert!(matches!(kinds[0], SimEventKind::SeaGrassDevoured { .. }));
    assert!(matches!(kinds[1], SimEventKind::QuakeStarted { .. }));

    sim.update_on_time(1_700).unwrap();
    assert!(!sim.world().contains(quake));
    assert_eq!(sim.scheduler().pending_count(quake), 0);
    assert!(
        sim.events()
            .events()
            .iter()
            .any(|e| matches!(e.kind, SimEventKind::QuakeSubsided { .. }))
    );
}

#[test]
fn devoured_sea_grass_never_spawns_later_in_the_same_drain() {
    let mut w = world(4, 4);
    place(
        &mut w,
        Entity::crab("crab", Point::new(1, 1), 500, 100_000, ImageList::default()),
    );
    let kelp = place(&mut w, grass(2, 1, 600));
    let mut sim = sim(w);
    assert_eq!(next_activity(&sim, kelp), Some(600));

    sim.update_on_time(1_000).unwrap();

    assert!(!sim.world().contains(kelp));
    assert_eq!(sim.scheduler().pending_count(kelp), 0);
    let census = sim.world().census();
    assert_eq!(census.get(&EntityKind::Fish), None);
    assert_eq!(census.get(&EntityKind::SeaGrass), None);
    assert!(
        !sim.events()
            .events()
            .iter()
            .any(|e| matches!(e.kind, SimEventKind::FishSpawned { .. }))
    );
}

#[test]
fn crab_pushes_fish_out_of_its_path() {
    let mut w = world(3, 5);
    let crab = place(
        &mut w,
        Entity::crab("crab", Point::new(0, 0), 500, 100_000, ImageList::default()),
    );
    let nemo = place(&mut w, fish("nemo", 1, 0));
    place(&mut w, grass(4, 0, 100_000));
    let mut sim = sim(w);
    assert_eq!(sim.scheduler().pending_count(nemo), 1);

    sim.update_on_time(501).unwrap();

    assert!(!sim.world().contains(nemo));
    assert_eq!(sim.scheduler().pending_count(nemo), 0);
    assert_eq!(sim.world().occupant(Point::new(1, 0)), Some(crab));
    assert!(!sim.world().is_occupied(Point::new(0, 0)));
    let displaced = sim.events().events_for_entity("nemo");
    assert_eq!(displaced.len(), 1);
    assert!(matches!(
        displaced[0].kind,
        SimEventKind::EntityDisplaced { at, .. } if at == Point::new(1, 0)
    ));
}

#[test]
fn octo_fills_up_and_transforms_in_place() {
    let mut w = world(3, 3);
    let otto = place(&mut w, octo(1, 0, 0, 300));
    let nemo = place(&mut w, fish("nemo", 1, 0));
    let mut sim = sim(w);

    sim.update_on_time(301).unwrap();

    assert!(!sim.world().contains(nemo));
    assert!(!sim.world().contains(otto));
    assert_eq!(sim.scheduler().pending_count(otto), 0);

    let full = sim.world().occupant(Point::new(0, 0)).unwrap();
    let octo = sim.world().entity(full).unwrap();
    assert_eq!(octo.kind(), EntityKind::OctoFull);
    assert_eq!(octo.id(), "otto");
    assert_eq!(octo.action_period(), 300);
    assert_eq!(octo.animation_period(), Ok(10_000));
    assert_eq!(octo.resource_count(), 1);
    assert_eq!(sim.scheduler().pending_count(full), 2);
    assert_eq!(next_activity(&sim, full), Some(601));

    let kinds: Vec<&SimEventKind> = sim.events().events().iter().map(|e| &e.kind).collect();
    assert!(matches!(kinds[0], SimEventKind::FishCaught { count: 1, .. }));
    assert!(matches!(kinds[1], SimEventKind::OctoFilled { .. }));
}

#[test]
fn octo_below_limit_keeps_hunting() {
    let mut w = world(3, 3);
    let otto = place(&mut w, octo(3, 0, 0, 300));
    place(&mut w, fish("nemo", 1, 1));
    let mut sim = sim(w);

    sim.update_on_time(301).unwrap();
    let octo = sim.world().entity(otto).unwrap();
    assert_eq!(octo.kind(), EntityKind::OctoNotFull);
    assert_eq!(octo.resource_count(), 1);
    assert_eq!(next_activity(&sim, otto), Some(601));
}

#[test]
fn empty_octo_without_prey_rearms() {
    let mut w = world(3, 3);
    let otto = place(&mut w, octo(2, 1, 1, 300));
    let mut sim = sim(w);

    sim.update_on_time(301).unwrap();

    let octo = sim.world().entity(otto).unwrap();
    assert_eq!(octo.kind(), EntityKind::OctoNotFull);
    assert_eq!(octo.position(), Point::new(1, 1));
    assert_eq!(octo.resource_count(), 0);
    assert_eq!(sim.scheduler().pending_count(otto), 2);
    assert_eq!(next_activity(&sim, otto), Some(601));
    assert!(sim.events().is_empty());
}

#[test]
fn full_octo_unloads_and_atlantis_sinks() {
    let mut w = world(2, 5);
    let images = ImageList::default();
    let otto = Entity::octo_full("otto", 2, Point::new(0, 0), 100, 100_000, images);
    place(&mut w, otto);
    let city = place(
        &mut w,
        Entity::atlantis("city", Point::new(3, 0), 0, ImageList::default()),
    );
    let mut sim = sim(w);
    assert_eq!(sim.scheduler().pending_count(city), 0);

    sim.update_on_time(101).unwrap();
    assert_eq!(kind_at(&sim, Point::new(1, 0)), Some(EntityKind::OctoFull));
    sim.update_on_time(202).unwrap();
    assert_eq!(kind_at(&sim, Point::new(2, 0)), Some(EntityKind::OctoFull));

    sim.update_on_time(303).unwrap();
    assert_eq!(
        kind_at(&sim, Point::new(2, 0)),
        Some(EntityKind::OctoNotFull)
    );
    assert_eq!(sim.scheduler().pending_count(city), 1);
    assert_eq!(sim.events().events_for_entity("city").len(), 1);

    // Seven frames, then the site sinks.
    for time in 304..310 {
        sim.update_on_time(time).unwrap();
        assert!(sim.world().contains(city), "sank early at {time}");
    }
    sim.update_on_time(310).unwrap();
    assert!(!sim.world().contains(city));
    assert_eq!(sim.scheduler().pending_count(city), 0);
    let city_events = sim.events().events_for_entity("city");
    assert!(matches!(
        city_events.last().map(|e| &e.kind),
        Some(SimEventKind::AtlantisSank { .. })
    ));
}

#[test]
fn atlantis_activity_sinks_it_at_once() {
    let mut w = world(2, 2);
    let city = place(
        &mut w,
        Entity::atlantis("city", Point::new(1, 1), 50, ImageList::default()),
    );
    let images = ImageStore::default();
    let mut events = EventLog::new(0);
    let mut rng = StdRng::seed_from_u64(3);
    let tuning = BehaviorTuning::default();
    let mut ctx = SimContext {
        world: &mut w,
        images: &images,
        events: &mut events,
        rng: &mut rng,
        tuning: &tuning,
        time: 40,
    };
    let mut scheduler = EventScheduler::default();
    scheduler.schedule_event(city, Action::Animation { repeat_count: 7 }, 50);

    execute_activity(&mut scheduler, &mut ctx, city, EntityKind::Atlantis).unwrap();

    assert!(!ctx.world.contains(city));
    assert_eq!(scheduler.pending_count(city), 0);
    assert!(scheduler.is_empty());
    let sank = events.events_for_entity("city");
    assert_eq!(sank.len(), 1);
    assert_eq!(sank[0].time, 40);
    assert!(matches!(
        sank[0].kind,
        SimEventKind::AtlantisSank { at, .. } if at == Point::new(1, 1)
    ));
}

#[test]
fn blocked_steps_fall_back_to_vertical_then_stay() {
    let mut w = world(4, 4);
    let from = Point::new(1, 1);
    let dest = Point::new(3, 3);
    let (right, down) = (Point::new(2, 1), Point::new(1, 2));
    assert_eq!(next_position(&w, from, dest, Passage::Clear), right);

    place(&mut w, fish("nemo", 2, 1));
    assert_eq!(next_position(&w, from, dest, Passage::OverFish), right);
    assert_eq!(next_position(&w, from, dest, Passage::Clear), down);

    place(
        &mut w,
        Entity::obstacle("rock", Point::new(1, 2), ImageList::default()),
    );
    assert_eq!(next_position(&w, from, dest, Passage::Clear), from);

    // Same column: only the vertical step is considered.
    assert_eq!(
        next_position(&w, Point::new(0, 0), Point::new(0, 3), Passage::Clear),
        Point::new(0, 1)
    );
}

#[test]
fn seeded_runs_are_deterministic() {
    let run = || {
        let mut w = world(8, 8);
        place(&mut w, grass(2, 2, 700));
        place(&mut w, grass(5, 5, 900));
        place(&mut w, octo(2, 7, 0, 400));
        place(
            &mut w,
            Entity::atlantis("city", Point::new(0, 7), 0, ImageList::default()),
        );
        let mut sim = Simulation::new(
            w,
            ImageStore::default(),
            SimConfig::default().with_seed(99).with_step_ms(50),
        )
        .unwrap();
        sim.arm_all().unwrap();
        sim.run(400).unwrap();
        sim.events()
            .events()
            .iter()
            .map(|e| format!("{} {}", e.time, e.description))
            .collect::<Vec<_>>()
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

proptest! {
    #[test]
    fn cancelled_entities_never_fire(
        delays_a in prop::collection::vec(0u64..500, 1..10),
        delays_b in prop::collection::vec(0u64..500, 1..10),
        cutoff in 0u64..600,
    ) {
        let mut w = world(1, 2);
        let a = place(&mut w, rock("a", 0));
        let b = place(&mut w, rock("b", 1));
        let mut scheduler = EventScheduler::default();
        for &d in &delays_a {
            scheduler.schedule_event(a, Action::Activity, d);
        }
        for &d in &delays_b {
            scheduler.schedule_event(b, Action::Activity, d);
        }
        scheduler.unschedule_all_events(a);

        let mut last = 0;
        let mut popped = 0;
        while let Some(event) = scheduler.pop_due(cutoff) {
            prop_assert_eq!(event.entity, b);
            prop_assert!(event.time < cutoff);
            prop_assert!(event.time >= last);
            last = event.time;
            popped += 1;
            prop_assert_eq!(scheduler.pending_count(b), delays_b.len() - popped);
        }
        let expected = delays_b.iter().filter(|&&d| d < cutoff).count();
        prop_assert_eq!(popped, expected);
        prop_assert_eq!(scheduler.pending_count(a), 0);
    }
}
