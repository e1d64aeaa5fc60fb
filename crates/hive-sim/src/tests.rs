//! Integration tests for hive-sim.

use std::sync::Arc;

use hive_behavior::{
    BehaviorTree, GoapAction, GoapAgent, NodeKind, Status, TreeInstance,
    presets::{EnemyActor, enemy_behavior_tree},
};
use hive_core::{AgentId, HiveError, Tick, Vec3};
use hive_flock::FormationKind;
use hive_schedule::{FrameReport, ScheduleError};

use crate::{
    AgentBody, Brain, GoapBrain, Intent, NoopObserver, Perception, SimError, SimObserver, SimWorld,
    TreeBrain, WorldBuilder, WorldConfig,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A body that records what it perceives and sends whatever is queued.
#[derive(Default)]
struct Scout {
    last:   Option<Perception>,
    queued: Vec<Intent>,
    log:    Vec<String>,
}

impl AgentBody for Scout {
    fn perceive(&mut self, perception: &Perception) {
        self.last = Some(*perception);
    }

    fn drain_intents(&mut self, out: &mut Vec<Intent>) {
        out.append(&mut self.queued);
    }
}

#[derive(Default)]
struct Recorder {
    starts:    Vec<Tick>,
    ends:      Vec<(Tick, usize)>,
    frames:    Vec<FrameReport>,
    despawned: Vec<AgentId>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }
    fn on_tick_end(&mut self, tick: Tick, thought: usize) {
        self.ends.push((tick, thought));
    }
    fn on_frame(&mut self, report: &FrameReport) {
        self.frames.push(*report);
    }
    fn on_despawn(&mut self, _tick: Tick, agent: AgentId) {
        self.despawned.push(agent);
    }
}

fn config(seed: u64) -> WorldConfig {
    WorldConfig { seed, ..WorldConfig::default() }
}

fn world(seed: u64) -> SimWorld<Scout> {
    SimWorld::new(config(seed)).unwrap()
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn builds_empty_world_with_defaults() {
        let world: SimWorld<Scout> = WorldBuilder::new(WorldConfig::default()).build().unwrap();
        assert_eq!(world.agent_count(), 0);
        assert_eq!(world.tick(), Tick(0));
        assert!(!world.is_running());
    }

    #[test]
    fn spawns_bodies_with_positions() {
        let world = WorldBuilder::new(config(1))
            .bodies(vec![Scout::default(), Scout::default()])
            .positions(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)])
            .build()
            .unwrap();
        assert_eq!(world.agent_count(), 2);
        assert_eq!(world.flock().boid_count(), 2);
        assert_eq!(world.position(AgentId(1)), Some(Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn position_count_mismatch_errors() {
        let result = WorldBuilder::new(config(1))
            .bodies(vec![Scout::default(), Scout::default()])
            .positions(vec![Vec3::ZERO])
            .build();
        match result {
            Err(SimError::AgentCountMismatch { expected, got, .. }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected AgentCountMismatch, got {:?}", other.err()),
        }
    }

    #[test]
    fn invalid_engine_config_rejected() {
        let mut cfg = WorldConfig::default();
        cfg.engine.fixed_step = 0.0;
        let result = SimWorld::<Scout>::new(cfg);
        assert!(matches!(result, Err(SimError::Schedule(ScheduleError::InvalidFixedStep(_)))));
    }

    #[test]
    fn invalid_flock_config_rejected() {
        let mut cfg = WorldConfig::default();
        cfg.flock.max_speed = -1.0;
        assert!(matches!(SimWorld::<Scout>::new(cfg), Err(SimError::Flock(_))));
    }

    #[test]
    fn brain_factory_attaches_selectively() {
        let tree = Arc::new(BehaviorTree::new("Idle", NodeKind::action(|_: &mut Scout, _| {
            Status::Running
        })));
        let mut world = WorldBuilder::new(config(1))
            .bodies(vec![Scout::default(), Scout::default(), Scout::default()])
            .brains(|id, _| {
                (id != AgentId(1)).then(|| {
                    let brain = TreeBrain::new(TreeInstance::new(tree.clone()));
                    Box::new(brain) as Box<dyn Brain<Scout>>
                })
            })
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        world.run_ticks(1, &mut rec);
        assert_eq!(rec.ends, vec![(Tick(0), 2)]);
        assert_eq!(world.activity(AgentId(1)), None);
        assert_eq!(world.activity(AgentId(0)), Some("Idle"));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ticking {
    use super::*;

    #[test]
    fn run_ticks_advances_clock_and_notifies() {
        let mut world = world(3);
        world.spawn(Scout::default(), Some(Vec3::ZERO));
        let mut rec = Recorder::default();
        world.run_ticks(3, &mut rec);

        assert_eq!(world.tick(), Tick(3));
        assert_eq!(rec.starts, vec![Tick(0), Tick(1), Tick(2)]);
        assert_eq!(rec.ends.len(), 3);
        assert!(rec.ends.iter().all(|&(_, thought)| thought == 0));
    }

    #[test]
    fn perception_reflects_start_of_tick() {
        let mut world = world(3);
        let start = Vec3::new(2.0, 0.0, -3.0);
        let with_boid = world.spawn(Scout::default(), Some(start));
        let without = world.spawn(Scout::default(), None);
        world.set_flock_target(Vec3::new(5.0, 0.0, 5.0));

        world.run_ticks(1, &mut NoopObserver);

        let seen = world.body(with_boid).unwrap().last.unwrap();
        assert_eq!(seen.tick, Tick(0));
        assert_eq!(seen.position, Some(start));
        assert_eq!(seen.flock_target, Some(Vec3::new(5.0, 0.0, 5.0)));
        // The boid has since moved.
        assert_ne!(world.position(with_boid), Some(start));

        let blind = world.body(without).unwrap().last.unwrap();
        assert_eq!(blind.position, None);
        assert_eq!(blind.velocity, None);
    }

    #[test]
    fn same_seed_replays_identically() {
        let run = |seed| {
            let mut w = world(seed);
            for i in 0..20 {
                w.spawn(Scout::default(), Some(Vec3::new(i as f32, 0.0, (i % 5) as f32)));
            }
            w.set_flock_target(Vec3::new(10.0, 0.0, 10.0));
            w.run_ticks(120, &mut NoopObserver);
            w.positions()
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn world_seed_overrides_flock_seed() {
        let mut cfg = config(77);
        cfg.flock.seed = 1;
        let world = SimWorld::<Scout>::new(cfg).unwrap();
        assert_eq!(world.flock().config().seed, 77);
    }
}

// ── Intents ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod intents {
    use super::*;

    #[test]
    fn seek_and_stop_seeking() {
        let mut world = world(5);
        let id = world.spawn(Scout::default(), Some(Vec3::ZERO));
        let boid = world.boid_of(id).unwrap();
        let goal = Vec3::new(4.0, 0.0, 4.0);

        world.body_mut(id).unwrap().queued.push(Intent::SeekPosition(goal));
        world.run_ticks(1, &mut NoopObserver);
        assert_eq!(world.flock().boid(boid).unwrap().seek_target, Some(goal));

        world.body_mut(id).unwrap().queued.push(Intent::StopSeeking);
        world.run_ticks(1, &mut NoopObserver);
        assert_eq!(world.flock().boid(boid).unwrap().seek_target, None);
    }

    #[test]
    fn seek_without_boid_is_ignored() {
        let mut world = world(5);
        let id = world.spawn(Scout::default(), None);
        world.body_mut(id).unwrap().queued.push(Intent::SeekPosition(Vec3::ZERO));
        world.run_ticks(1, &mut NoopObserver);
        assert!(world.contains(id));
    }

    #[test]
    fn flock_target_last_registered_wins() {
        let mut world = world(5);
        let a = world.spawn(Scout::default(), None);
        let b = world.spawn(Scout::default(), None);
        world.body_mut(b).unwrap().queued.push(Intent::SetFlockTarget(Vec3::new(2.0, 0.0, 0.0)));
        world.body_mut(a).unwrap().queued.push(Intent::SetFlockTarget(Vec3::new(1.0, 0.0, 0.0)));

        world.run_ticks(1, &mut NoopObserver);
        assert_eq!(world.flock().target(), Some(Vec3::new(2.0, 0.0, 0.0)));

        world.body_mut(a).unwrap().queued.push(Intent::ClearFlockTarget);
        world.run_ticks(1, &mut NoopObserver);
        assert_eq!(world.flock().target(), None);
    }

    #[test]
    fn despawn_is_deferred_and_reported_once() {
        let mut world = world(5);
        let a = world.spawn(Scout::default(), Some(Vec3::ZERO));
        let b = world.spawn(Scout::default(), Some(Vec3::new(1.0, 0.0, 0.0)));
        {
            let body = world.body_mut(a).unwrap();
            body.queued.push(Intent::Despawn);
            body.queued.push(Intent::SetFlockTarget(Vec3::new(3.0, 0.0, 3.0)));
            body.queued.push(Intent::Despawn);
        }

        let mut rec = Recorder::default();
        world.run_ticks(1, &mut rec);

        assert_eq!(rec.despawned, vec![a]);
        assert!(!world.contains(a));
        assert!(world.contains(b));
        assert_eq!(world.flock().boid_count(), 1);
        // Intents queued after Despawn in the same tick still applied.
        assert_eq!(world.flock().target(), Some(Vec3::new(3.0, 0.0, 3.0)));
    }

    #[test]
    fn direct_despawn_returns_body() {
        let mut world = world(5);
        let id = world.spawn(Scout { log: vec!["x".into()], ..Scout::default() }, None);
        let body = world.despawn(id).unwrap();
        assert_eq!(body.log, vec!["x".to_string()]);
        assert!(matches!(
            world.despawn(id),
            Err(SimError::Core(HiveError::AgentNotFound(_)))
        ));
    }

    #[test]
    fn formation_passthrough() {
        let mut world = world(5);
        for i in 0..4 {
            world.spawn(Scout::default(), Some(Vec3::new(i as f32, 0.0, 0.0)));
        }
        world.assign_formation(FormationKind::Line, Vec3::new(0.0, 1.0, 0.0), 2.0);
        assert!(world.flock().boids().iter().all(|b| b.seek_target.is_some_and(|t| t.y == 1.0)));
        world.clear_formation();
        assert!(world.flock().boids().iter().all(|b| b.seek_target.is_none()));
    }
}

// ── Brains ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod brains {
    use super::*;

    struct Guard {
        sees:   bool,
        near:   bool,
        health: f32,
        enemy:  Vec3,
        queued: Vec<Intent>,
    }

    impl Guard {
        fn new() -> Self {
            Self { sees: false, near: false, health: 100.0, enemy: Vec3::ZERO, queued: Vec::new() }
        }
    }

    impl AgentBody for Guard {
        fn drain_intents(&mut self, out: &mut Vec<Intent>) {
            out.append(&mut self.queued);
        }
    }

    impl EnemyActor for Guard {
        fn can_see_enemy(&self) -> bool {
            self.sees
        }
        fn is_enemy_near(&self) -> bool {
            self.near
        }
        fn health(&self) -> f32 {
            self.health
        }
        fn attack(&mut self, _dt: f64) -> Status {
            if self.near { Status::Success } else { Status::Failure }
        }
        fn chase(&mut self, _dt: f64) -> Status {
            self.queued.push(Intent::SeekPosition(self.enemy));
            Status::Running
        }
        fn patrol(&mut self, _dt: f64) -> Status {
            self.queued.push(Intent::StopSeeking);
            Status::Running
        }
        fn flee(&mut self, _dt: f64) -> Status {
            self.queued.push(Intent::Despawn);
            Status::Running
        }
    }

    fn guard_world() -> (SimWorld<Guard>, AgentId) {
        let tree = Arc::new(enemy_behavior_tree::<Guard>().unwrap());
        let mut world = SimWorld::new(config(11)).unwrap();
        let id = world.spawn(Guard::new(), Some(Vec3::ZERO));
        world.set_brain(id, TreeBrain::new(TreeInstance::new(tree))).unwrap();
        (world, id)
    }

    #[test]
    fn tree_brain_chases_then_patrols() {
        let (mut world, id) = guard_world();
        let enemy = Vec3::new(6.0, 0.0, 6.0);
        {
            let guard = world.body_mut(id).unwrap();
            guard.sees = true;
            guard.enemy = enemy;
        }
        world.run_ticks(1, &mut NoopObserver);

        let boid = world.boid_of(id).unwrap();
        assert_eq!(world.flock().boid(boid).unwrap().seek_target, Some(enemy));
        assert_eq!(world.activity(id), Some("Chase"));
        assert_eq!(world.brain_status(id), Some(Status::Running));

        world.body_mut(id).unwrap().sees = false;
        world.run_ticks(1, &mut NoopObserver);
        assert_eq!(world.flock().boid(boid).unwrap().seek_target, None);
        assert_eq!(world.activity(id), Some("Patrol"));
    }

    #[test]
    fn tree_brain_flee_despawns() {
        let (mut world, id) = guard_world();
        {
            let guard = world.body_mut(id).unwrap();
            guard.health = 10.0;
            guard.near = true;
        }
        let mut rec = Recorder::default();
        world.run_ticks(1, &mut rec);
        assert_eq!(rec.despawned, vec![id]);
        assert_eq!(world.agent_count(), 0);
    }

    #[test]
    fn goap_brain_acts_on_current_action() {
        let mut planner: GoapAgent<&'static str> = GoapAgent::default();
        planner.set_state("armed", false);
        planner.add_goal("BeArmed", |s| s.is_true(&"armed"), 1.0);
        planner
            .add_action(GoapAction::new("Arm").requires("armed", false).effect("armed", true))
            .unwrap();

        let brain: GoapBrain<Scout, &'static str> = GoapBrain::new(
            planner,
            |_: &Scout, _| {},
            |action, body: &mut Scout| body.log.push(action.to_owned()),
        );

        let mut world = world(2);
        let id = world.spawn(Scout::default(), None);
        world.set_brain(id, brain).unwrap();

        // Tick 0 plans and reports the first action.
        world.run_ticks(1, &mut NoopObserver);
        assert_eq!(world.activity(id), Some("Arm"));
        assert_eq!(world.brain_status(id), Some(Status::Running));

        // Tick 1 runs it to success; the goal holds and the planner idles.
        world.run_ticks(2, &mut NoopObserver);
        assert_eq!(world.body(id).unwrap().log, vec!["Arm".to_string()]);
        assert_eq!(world.activity(id), Some("idle"));
        assert_eq!(world.brain_status(id), Some(Status::Idle));
    }

    #[test]
    fn clearing_brain_stops_thinking() {
        let (mut world, id) = guard_world();
        world.clear_brain(id).unwrap();
        let mut rec = Recorder::default();
        world.run_ticks(2, &mut rec);
        assert!(rec.ends.iter().all(|&(_, thought)| thought == 0));
        assert_eq!(world.activity(id), None);
    }
}

// ── Frames ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod frames {
    use super::*;

    #[test]
    fn frame_before_start_is_none() {
        let mut world = world(4);
        let mut rec = Recorder::default();
        assert!(world.frame(1.0, &mut rec).is_none());
        assert!(rec.frames.is_empty());
    }

    #[test]
    fn frame_runs_fixed_ticks_and_interpolates() {
        let mut world = world(4);
        let moving = world.spawn(Scout::default(), Some(Vec3::ZERO));
        let ghost = world.spawn(Scout::default(), None);
        world.set_flock_target(Vec3::new(20.0, 0.0, 0.0));

        let mut rec = Recorder::default();
        world.start(0.0);
        let report = world.frame(0.04, &mut rec).unwrap();

        assert_eq!(report.fixed_updates, 2);
        assert_eq!(world.tick(), Tick(2));
        assert_eq!(rec.frames.len(), 1);
        assert_eq!(rec.starts.len(), 2);

        let prev = world.engine().previous_snapshot().unwrap().get(moving).unwrap().position;
        let curr = world.engine().current_snapshot().unwrap().get(moving).unwrap().position;
        let lerped = world.interpolated_position(moving).unwrap();
        let lo = prev.x.min(curr.x) - 1e-5;
        let hi = prev.x.max(curr.x) + 1e-5;
        assert!(lerped.x >= lo && lerped.x <= hi, "{lerped:?} outside {prev:?}..{curr:?}");

        assert!(world.interpolated_position(ghost).is_none());
    }

    #[test]
    fn paused_frames_do_not_tick() {
        let mut world = world(4);
        world.spawn(Scout::default(), Some(Vec3::ZERO));
        world.start(0.0);
        world.frame(0.02, &mut NoopObserver);
        let tick = world.tick();

        world.pause();
        let report = world.frame(0.5, &mut NoopObserver).unwrap();
        assert!(report.paused);
        assert_eq!(report.fixed_updates, 0);
        assert_eq!(world.tick(), tick);

        world.resume(0.5);
        assert!(!world.is_paused());
    }
}
