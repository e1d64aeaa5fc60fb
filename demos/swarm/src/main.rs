//! swarm: a guarded herd shadowing a wandering predator.
//!
//! Forty guards flock around a rally point that a GOAP commander keeps
//! moving away from a predator circling the arena.  Each guard runs the
//! stock enemy behavior tree: chase the predator once it is in sight,
//! strike when close, break away when hurt, patrol otherwise.
//!
//! The world is driven headlessly by synthetic frames with jittered
//! timestamps, so the fixed-step engine's accumulator, substep cap and
//! render interpolation all get exercised.  At the end the herd is pulled
//! into a circle formation.
//!
//! Usage: `swarm [world.json]` (see `demos/swarm/swarm.json`).
//! `RUST_LOG=debug` shows per-agent events.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hive_behavior::presets::{EnemyActor, EnemyFact, enemy_behavior_tree, enemy_goap_with};
use hive_behavior::{Status, TreeInstance, WorldState};
use hive_core::{AgentId, Tick, Vec3};
use hive_flock::{DEFAULT_SPACING, FormationKind};
use hive_schedule::{
    Cooldown, DeltaTimer, FrameReport, Interpolator, ManualClock, TimeSource,
    interpolator::DEFAULT_SMOOTHNESS,
};
use hive_sim::{
    AgentBody, GoapBrain, Intent, Perception, SimObserver, SimWorld, TreeBrain, WorldConfig,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const GUARD_COUNT:      usize = 40;
const SIM_SECONDS:      f64   = 20.0;
const FORMATION_SECS:   f64   = 4.0;
const SIGHT_RANGE:      f32   = 15.0;
const STRIKE_RANGE:     f32   = 2.5;
const STRIKE_COOLDOWN:  f64   = 0.75;
const HEALTH_DRAIN:     f32   = 12.0; // per second spent within strike range
const PREDATOR_ORBIT:   f32   = 20.0;
const PREDATOR_SPEED:   f32   = 0.3;  // radians per second
const REPORT_INTERVAL:  f64   = 5.0;

// ── Bodies ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Guard,
    Commander,
}

struct Unit {
    role:     Role,
    position: Option<Vec3>,
    rally:    Vec3,
    predator: Vec3,
    health:   f32,
    strike:   Cooldown,
    strikes:  u32,
    queued:   Vec<Intent>,
}

impl Unit {
    fn new(role: Role) -> Self {
        Self {
            role,
            position: None,
            rally:    Vec3::ZERO,
            predator: Vec3::ZERO,
            health:   100.0,
            strike:   Cooldown::new(STRIKE_COOLDOWN),
            strikes:  0,
            queued:   Vec::new(),
        }
    }

    fn predator_distance(&self) -> Option<f32> {
        self.position.map(|p| p.distance(self.predator))
    }
}

impl AgentBody for Unit {
    fn perceive(&mut self, perception: &Perception) {
        self.position = perception.position;
        if let Some(target) = perception.flock_target {
            self.rally = target;
        }
    }

    fn drain_intents(&mut self, out: &mut Vec<Intent>) {
        out.append(&mut self.queued);
    }
}

impl EnemyActor for Unit {
    fn can_see_enemy(&self) -> bool {
        self.predator_distance().is_some_and(|d| d <= SIGHT_RANGE)
    }

    fn is_enemy_near(&self) -> bool {
        self.predator_distance().is_some_and(|d| d <= STRIKE_RANGE)
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn attack(&mut self, dt: f64) -> Status {
        self.strike.update(dt);
        if !self.is_enemy_near() {
            return Status::Failure;
        }
        if !self.strike.is_ready() {
            return Status::Running;
        }
        self.strike.start(None);
        self.strikes += 1;
        Status::Success
    }

    fn chase(&mut self, _dt: f64) -> Status {
        self.queued.push(Intent::SeekPosition(self.predator));
        Status::Running
    }

    fn patrol(&mut self, _dt: f64) -> Status {
        self.queued.push(Intent::StopSeeking);
        Status::Running
    }

    fn flee(&mut self, _dt: f64) -> Status {
        let Some(p) = self.position else {
            return Status::Failure;
        };
        let away = (p - self.predator).normalize();
        self.queued.push(Intent::SeekPosition(p + away * SIGHT_RANGE));
        Status::Running
    }
}

// ── Commander ─────────────────────────────────────────────────────────────────

fn commander_sense(unit: &Unit, state: &mut WorldState<EnemyFact>) {
    let gap = unit.rally.distance(unit.predator);
    state.set(EnemyFact::EnemyInRange, gap <= SIGHT_RANGE);
    state.set(EnemyFact::HasEscaped, gap > SIGHT_RANGE * 1.5);
}

fn commander_act(action: &str, unit: &mut Unit) {
    if action == "Flee" {
        let away = (unit.rally - unit.predator).normalize();
        let rally = unit.predator + away * SIGHT_RANGE * 2.0;
        unit.queued.push(Intent::SetFlockTarget(rally));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SwarmStats {
    ticks:         u64,
    brain_runs:    u64,
    frames:        u64,
    capped_frames: u64,
    despawned:     Vec<AgentId>,
}

impl SimObserver for SwarmStats {
    fn on_tick_end(&mut self, _tick: Tick, thought: usize) {
        self.ticks += 1;
        self.brain_runs += thought as u64;
    }

    fn on_frame(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.capped {
            self.capped_frames += 1;
        }
    }

    fn on_despawn(&mut self, _tick: Tick, agent: AgentId) {
        self.despawned.push(agent);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(path: Option<&str>) -> Result<WorldConfig> {
    let Some(path) = path else {
        info!("no config path given, using defaults");
        return Ok(WorldConfig::default());
    };
    let text = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("reading world config {path}"))?;
    let config: WorldConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing world config {path}"))?;
    Ok(config)
}

fn predator_at(secs: f64) -> Vec3 {
    let angle = secs as f32 * PREDATOR_SPEED;
    Vec3::new(PREDATOR_ORBIT * angle.cos(), 0.0, PREDATOR_ORBIT * angle.sin())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // 1. Configuration.
    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref())?;
    info!(
        seed = config.seed,
        fixed_step = config.engine.fixed_step,
        max_substeps = config.engine.max_substeps,
        "world config loaded",
    );

    // 2. World and population.
    let mut world: SimWorld<Unit> = SimWorld::new(config)?;
    let tree = Arc::new(enemy_behavior_tree::<Unit>()?);

    let spread = world.config().flock.bounds_size / 4.0;
    let mut guards = Vec::with_capacity(GUARD_COUNT);
    for _ in 0..GUARD_COUNT {
        let rng = world.rng();
        let spawn = Vec3::new(rng.gen_range(-spread..spread), 0.0, rng.gen_range(-spread..spread));
        let id = world.spawn(Unit::new(Role::Guard), Some(spawn));
        world.set_brain(id, TreeBrain::new(TreeInstance::new(tree.clone())))?;
        guards.push(id);
    }

    let planner = enemy_goap_with(world.config().goap.clone())?;
    let commander = world.spawn(Unit::new(Role::Commander), None);
    world.set_brain(commander, GoapBrain::new(planner, commander_sense, commander_act))?;
    world.set_flock_target(Vec3::ZERO);
    info!(guards = guards.len(), tree_nodes = tree.len(), "population spawned");

    // 3. Drive synthetic frames.
    let mut clock = ManualClock::new(0.0);
    let mut stats = SwarmStats::default();
    let mut smoothing = Interpolator::new(DEFAULT_SMOOTHNESS);
    let mut report_timer = DeltaTimer::new(REPORT_INTERVAL);

    world.start(clock.now_secs());
    while clock.now_secs() < SIM_SECONDS {
        // Mostly 60 Hz with the occasional long hitch.
        let jitter: f64 = world.rng().gen_range(0.010..0.030);
        let hitch = if world.rng().gen_range(0..200) == 0 { 0.12 } else { 0.0 };
        let frame_dt = jitter + hitch;
        let now = clock.advance(frame_dt);

        let predator = predator_at(now);
        for &id in &guards {
            if let Some(unit) = world.body_mut(id) {
                unit.predator = predator;
                if unit.is_enemy_near() {
                    unit.health = (unit.health - HEALTH_DRAIN * frame_dt as f32).max(0.0);
                }
            }
        }
        if let Some(unit) = world.body_mut(commander) {
            unit.predator = predator;
        }

        let Some(report) = world.frame(now, &mut stats) else {
            warn!("world stopped unexpectedly");
            break;
        };

        for &id in &guards {
            if let Some(p) = world.interpolated_position(id) {
                smoothing.set_position(id, p);
            }
        }

        if report_timer.update(report.dt) {
            let fleeing = guards
                .iter()
                .filter(|&&id| world.body(id).is_some_and(|u| u.health < 30.0))
                .count();
            info!(
                secs = now,
                tick = %world.tick(),
                commander = world.activity(commander).unwrap_or("none"),
                fleeing,
                "status",
            );
        }
    }
    world.stop();

    // 4. Settle into a circle around the last rally point.
    let rally = world.flock().target().unwrap_or(Vec3::ZERO);
    world.clear_brain(commander)?;
    for &id in &guards {
        world.clear_brain(id)?;
    }
    world.assign_formation(FormationKind::Circle, rally, DEFAULT_SPACING * 2.0);
    let settle = world.clock().ticks_for_secs(FORMATION_SECS);
    world.run_ticks(settle, &mut stats);

    // 5. Summary.
    let metrics = world.metrics();
    let strikes: u32 = guards.iter().filter_map(|&id| world.body(id)).map(|u| u.strikes).sum();
    info!(
        ticks = stats.ticks,
        brain_runs = stats.brain_runs,
        frames = stats.frames,
        capped_frames = stats.capped_frames,
        despawned = stats.despawned.len(),
        "run complete",
    );
    info!(
        fps = metrics.fps,
        avg_frame_ms = metrics.avg_frame_time_ms,
        fixed_updates = metrics.fixed_updates,
        skipped = metrics.skipped_fixed_updates,
        dropped_secs = metrics.dropped_time,
        "engine metrics",
    );
    info!(strikes, "predator strikes landed");

    println!(
        "{:<10} {:<9} {:>8} {:>8} {:>8} {:>7}",
        "Agent", "Role", "x", "z", "render-x", "health"
    );
    println!("{}", "-".repeat(56));
    for id in world.agent_ids().take(8) {
        let Some(unit) = world.body(id) else { continue };
        let p = world.position(id).unwrap_or(Vec3::ZERO);
        let smoothed = smoothing.position(id).unwrap_or(p);
        println!(
            "{:<10} {:<9} {:>8.2} {:>8.2} {:>8.2} {:>7.1}",
            id.0,
            format!("{:?}", unit.role),
            p.x,
            p.z,
            smoothed.x,
            unit.health,
        );
    }

    Ok(())
}
