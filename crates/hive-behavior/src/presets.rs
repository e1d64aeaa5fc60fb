//! Ready-made decision layers for a basic hostile agent.

use crate::{BehaviorResult, BehaviorTree, GoapAction, GoapAgent, GoapConfig, NodeKind, Status};

/// Health below which an enemy flees when something is close.
pub const FLEE_HEALTH: f32 = 30.0;

// ── Behavior tree ─────────────────────────────────────────────────────────────

/// What [`enemy_behavior_tree`] needs from the agent it drives.
pub trait EnemyActor {
    fn can_see_enemy(&self) -> bool;
    fn is_enemy_near(&self) -> bool;
    fn health(&self) -> f32;

    fn attack(&mut self, dt: f64) -> Status;
    fn chase(&mut self, dt: f64) -> Status;
    fn patrol(&mut self, dt: f64) -> Status;
    fn flee(&mut self, dt: f64) -> Status;
}

/// ```text
/// Root (selector)
/// ├── Flee (sequence):   LowHealth? EnemyNear? -> flee
/// ├── Combat (sequence): CanSeeEnemy? -> (attack | chase)
/// └── Patrol (sequence): NoEnemyVisible? -> patrol
/// ```
pub fn enemy_behavior_tree<A: EnemyActor + 'static>() -> BehaviorResult<BehaviorTree<A>> {
    let mut tree = BehaviorTree::new("Root", NodeKind::Selector);
    let root = tree.root();

    let flee = tree.add_child(root, "Flee", NodeKind::Sequence)?;
    tree.add_child(flee, "LowHealth", NodeKind::condition(|a: &A| a.health() < FLEE_HEALTH))?;
    tree.add_child(flee, "EnemyNear", NodeKind::condition(|a: &A| a.is_enemy_near()))?;
    tree.add_child(flee, "Flee", NodeKind::action(|a: &mut A, dt| a.flee(dt)))?;

    let combat = tree.add_child(root, "Combat", NodeKind::Sequence)?;
    tree.add_child(combat, "CanSeeEnemy", NodeKind::condition(|a: &A| a.can_see_enemy()))?;
    let actions = tree.add_child(combat, "CombatActions", NodeKind::Selector)?;
    tree.add_child(actions, "Attack", NodeKind::action(|a: &mut A, dt| a.attack(dt)))?;
    tree.add_child(actions, "Chase", NodeKind::action(|a: &mut A, dt| a.chase(dt)))?;

    let patrol = tree.add_child(root, "Patrol", NodeKind::Sequence)?;
    tree.add_child(patrol, "NoEnemyVisible", NodeKind::condition(|a: &A| !a.can_see_enemy()))?;
    tree.add_child(patrol, "Patrol", NodeKind::action(|a: &mut A, dt| a.patrol(dt)))?;

    Ok(tree)
}

// ── GOAP ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyFact {
    Alive,
    Health,
    HasWeapon,
    HasPotion,
    EnemyInRange,
    EnemyDefeated,
    HasEscaped,
}

/// Plan length cap for the enemy preset.
pub const ENEMY_MAX_PLAN_LENGTH: usize = 5;

/// An enemy planner.
///
/// Goals: Survive (escaped or enemy defeated, priority 10), AttackEnemy
/// (enemy defeated, 8), HealSelf (health above 70, 5).
///
/// The initial state is a healthy, unarmed enemy out of range.
pub fn enemy_goap() -> BehaviorResult<GoapAgent<EnemyFact>> {
    enemy_goap_with(GoapConfig { max_plan_length: ENEMY_MAX_PLAN_LENGTH })
}

/// [`enemy_goap`] with a caller-chosen planner configuration.
pub fn enemy_goap_with(config: GoapConfig) -> BehaviorResult<GoapAgent<EnemyFact>> {
    use EnemyFact::*;

    let mut agent = GoapAgent::new(config)?;

    agent.set_state(Alive, true);
    agent.set_state(Health, 100.0);
    agent.set_state(HasWeapon, false);
    agent.set_state(HasPotion, false);
    agent.set_state(EnemyInRange, false);
    agent.set_state(EnemyDefeated, false);
    agent.set_state(HasEscaped, false);

    agent.add_goal("Survive", |s| s.is_true(&HasEscaped) || s.is_true(&EnemyDefeated), 10.0);
    agent.add_goal("AttackEnemy", |s| s.is_true(&EnemyDefeated), 8.0);
    agent.add_goal("HealSelf", |s| s.num(&Health).is_some_and(|h| h > 70.0), 5.0);

    agent.add_action(
        GoapAction::new("Attack")
            .requires(HasWeapon, true)
            .requires(EnemyInRange, true)
            .effect(EnemyDefeated, true)
            .cost(1.0),
    )?;
    agent.add_action(
        GoapAction::new("ChaseEnemy")
            .requires(HasWeapon, true)
            .effect(EnemyInRange, true)
            .cost(2.0),
    )?;
    agent.add_action(
        GoapAction::new("FindWeapon")
            .requires(HasWeapon, false)
            .effect(HasWeapon, true)
            .cost(3.0),
    )?;
    agent.add_action(
        GoapAction::new("UsePotion")
            .requires(HasPotion, true)
            .requires(Alive, true)
            .effect(Health, 100.0)
            .effect(HasPotion, false)
            .cost(1.0),
    )?;
    agent.add_action(
        GoapAction::new("Flee")
            .requires(Alive, true)
            .effect(HasEscaped, true)
            .cost(2.0),
    )?;

    Ok(agent)
}
