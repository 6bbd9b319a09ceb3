//! Simulation step
//!
//! The host calls [`tick`] once per frame with the elapsed wall time. Enemy
//! timers run on every call; the player moves only when its accumulator has
//! a full step banked.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::buffs::{BuffId, BuffKind};
use super::enemy::EnemyTransition;
use super::events::{CollisionEvent, SpawnKind, TerminalCause, TickResult};
use super::grid::{GridPosition, Occupancy, is_unit_heading};
use super::state::{FoodKind, GameState, SessionPhase};

/// Host input for a single call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Requested heading (unit vector); buffered until the next player step
    pub intent: Option<IVec2>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn turn(dx: i32, dy: i32) -> Self {
        Self {
            intent: Some(IVec2::new(dx, dy)),
            pause: false,
        }
    }
}

/// Advance the session by `delta_ms` of wall time
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f64) -> TickResult {
    if state.phase == SessionPhase::Terminated {
        log::warn!("tick() called on a finished session; reset() it first");
        return TickResult::ignored();
    }

    if input.pause {
        state.phase = match state.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            other => other,
        };
        log::info!("Session {:?}", state.phase);
    }

    let mut result = TickResult::default();
    if state.phase == SessionPhase::Paused {
        return result;
    }

    let delta_ms = if delta_ms.is_finite() && delta_ms >= 0.0 {
        delta_ms
    } else {
        log::warn!("Ignoring invalid frame delta {delta_ms}");
        0.0
    };

    if let Some(intent) = input.intent {
        state.pending_intent = Some(intent);
    }
    state.now_ms += delta_ms;
    let score_before = state.score.score();
    rearm_legendary_trigger(state);

    result.expired_buff_ids = state.buffs.prune(state.now_ms);
    for id in &result.expired_buff_ids {
        log::info!("Buff {id} expired");
    }
    expire_legendary(state, &mut result);

    advance_enemy(state, delta_ms, &mut result);
    resolve_enemy_collision(state, &mut result);
    rearm_legendary_trigger(state);

    step_player(state, delta_ms, &mut result);

    result.score_delta = state.score.score() as i64 - score_before as i64;
    result
}

fn expire_legendary(state: &mut GameState, result: &mut TickResult) {
    let Some(item) = state.legendary else {
        return;
    };
    if item.is_expired(state.now_ms) {
        state.legendary = None;
        log::debug!("Legendary at {:?} expired", item.position);
        result.spawn(SpawnKind::LegendaryExpired, item.position);
    }
}

fn advance_enemy(state: &mut GameState, delta_ms: f64, result: &mut TickResult) {
    let Some(head) = state.head() else {
        return;
    };
    let score = state.score.score();
    match state
        .enemy
        .advance(delta_ms, score, head, &state.grid, &mut state.rng)
    {
        Some(EnemyTransition::CountdownStarted { reserved }) => {
            result.spawn(SpawnKind::EnemyReserved, reserved)
        }
        Some(EnemyTransition::Spawned { at }) => result.spawn(SpawnKind::Enemy, at),
        Some(EnemyTransition::Moved { to }) => result.spawn(SpawnKind::EnemyMoved, to),
        None => {}
    }
}

fn resolve_enemy_collision(state: &mut GameState, result: &mut TickResult) {
    if !state.enemy.check_collision(&state.snake) {
        return;
    }
    let Some(head) = state.head() else {
        return;
    };
    let position = state.enemy.actor().head().unwrap_or(head);

    if state.buffs.has_effect(BuffKind::DamageImmunity) {
        log::info!("Enemy hit deflected at {:?}", position);
        result.collide(CollisionEvent::Deflected { position });
    } else {
        let penalty = i64::try_from(state.config.enemy.penalty).unwrap_or(i64::MAX);
        let applied = state.score.apply_delta(-penalty);
        log::info!(
            "Enemy hit at {:?}, -{} points (score {})",
            position,
            applied.unsigned_abs(),
            state.score.score()
        );
        result.collide(CollisionEvent::EnemyHit {
            position,
            penalty: applied.unsigned_abs(),
        });
    }

    let reserved = state.enemy.on_hit(head, &state.grid, &mut state.rng);
    result.spawn(SpawnKind::EnemyReserved, reserved);
}

fn step_player(state: &mut GameState, delta_ms: f64, result: &mut TickResult) {
    let slow = state.buffs.aggregate_multiplier(BuffKind::SpeedSlow);
    let boost = state.buffs.aggregate_multiplier(BuffKind::SpeedBoost);
    let interval = f64::from(state.score.step_interval_ms()) * slow / boost;

    state.player_clock.advance(delta_ms);
    if !state.player_clock.consume_step(interval) {
        return;
    }
    result.stepped = true;
    state.steps += 1;

    if let Some(intent) = state.pending_intent.take() {
        if is_unit_heading(intent) && intent != -state.heading {
            state.heading = intent;
        } else {
            log::debug!("Dropped intent {:?} (heading {:?})", intent, state.heading);
        }
    }

    let Some(head) = state.head() else {
        return;
    };
    let new_head = head + state.heading;

    collect_area_items(state, new_head, result);

    // The tail has not moved yet, so stepping onto it is fatal
    let cause = if !state.grid.contains(new_head) {
        Some(TerminalCause::Wall)
    } else if state.snake.contains(&new_head) {
        Some(TerminalCause::SelfCollision)
    } else {
        None
    };
    if let Some(cause) = cause {
        terminate(state, cause, result);
        return;
    }

    state.snake.push_front(new_head);

    let ate_food = state.food.is_some_and(|food| food.position == new_head);
    let ate_legendary = !ate_food && state.legendary.is_some_and(|item| item.occupies(new_head));
    if ate_food {
        eat_normal_food(state, new_head, result);
    } else if ate_legendary {
        eat_legendary(state, new_head, result);
    } else {
        state.snake.pop_back();
    }

    if state.food.is_none() {
        match state.place_normal_food() {
            Some(food) => {
                result.spawn(
                    SpawnKind::NormalFood {
                        visual_index: food.visual_index,
                    },
                    food.position,
                );
                state.food = Some(food);
            }
            None => {
                log::warn!("No room for normal food; retrying next step");
                result
                    .deferred_spawns
                    .push(SpawnKind::NormalFood { visual_index: 0 });
            }
        }
    }

    if state.buffs.has_effect(BuffKind::MovementBonus) {
        let bonus = state.buffs.total_magnitude(BuffKind::MovementBonus).round() as i64;
        state.score.apply_delta(bonus);
    }

    maybe_spawn_legendary(state, result);
}

fn eat_normal_food(state: &mut GameState, position: GridPosition, result: &mut TickResult) {
    let multiplier = state.buffs.aggregate_multiplier(BuffKind::ScoreMultiplier);
    let points = (state.config.scoring.normal_food as f64 * multiplier).round() as u64;
    state.score.apply_delta(i64::try_from(points).unwrap_or(i64::MAX));
    state.food = None;
    log::debug!("Food eaten at {:?}: +{} (score {})", position, points, state.score.score());
    result.collide(CollisionEvent::FoodEaten { position, points });
}

fn eat_legendary(state: &mut GameState, position: GridPosition, result: &mut TickResult) {
    let Some(item) = state.legendary.take() else {
        return;
    };
    let id = match item.kind {
        FoodKind::Legendary { id, .. } => id,
        FoodKind::Normal => None,
    };
    let points = state.config.scoring.legendary_food;
    state.score.apply_delta(i64::try_from(points).unwrap_or(i64::MAX));
    log::info!("Legendary {:?} eaten: +{} (score {})", id, points, state.score.score());
    result.collide(CollisionEvent::LegendaryEaten {
        id,
        position,
        points,
    });
    if let Some(id) = id {
        apply_legendary_buff(state, id, result);
    }
}

fn apply_legendary_buff(state: &mut GameState, id: BuffId, result: &mut TickResult) {
    let Some(def) = state.config.legendary_buffs.get(&id) else {
        return;
    };
    state
        .buffs
        .add(id, def.kind, def.magnitude, def.duration_ms, state.now_ms);
    log::info!(
        "Buff {} ({}) active: {:?} x{} for {}ms",
        id,
        def.name,
        def.kind,
        def.magnitude,
        def.duration_ms
    );
    result.applied_buffs.push(id);
}

/// Keep area items topped up while the effect runs and pick up the one under
/// the new head. Clears them once the effect ends.
fn collect_area_items(state: &mut GameState, new_head: GridPosition, result: &mut TickResult) {
    if !state.buffs.has_effect(BuffKind::AreaItemSpawn) {
        if !state.area_items.is_empty() {
            log::debug!("Clearing {} area items", state.area_items.len());
            state.area_items.clear();
        }
        return;
    }

    while state.area_items.len() < state.config.area_items.cap {
        match state.place_area_item() {
            Some(cell) => {
                state.area_items.push(cell);
                result.spawn(SpawnKind::AreaItem, cell);
            }
            None => {
                result.deferred_spawns.push(SpawnKind::AreaItem);
                break;
            }
        }
    }

    if let Some(index) = state.area_items.iter().position(|cell| *cell == new_head) {
        let position = state.area_items.remove(index);
        let points = state.config.area_items.score_per_item;
        state.score.apply_delta(i64::try_from(points).unwrap_or(i64::MAX));
        result.collide(CollisionEvent::AreaItemCollected { position, points });
    }
}

/// Once the score moves off the value that spawned the last legendary,
/// landing on it again counts as a new crossing.
fn rearm_legendary_trigger(state: &mut GameState) {
    let score = state.score.score();
    if state.legendary_trigger_score.is_some_and(|trigger| trigger != score) {
        state.legendary_trigger_score = None;
    }
}

/// Spawn a legendary when the score lands on a multiple of the threshold.
/// Fires once per arrival at a qualifying score value.
fn maybe_spawn_legendary(state: &mut GameState, result: &mut TickResult) {
    let score = state.score.score();
    rearm_legendary_trigger(state);
    let threshold = state.config.scoring.legendary_spawn_threshold;
    if score == 0
        || score % threshold != 0
        || state.legendary.is_some()
        || state.legendary_trigger_score == Some(score)
    {
        return;
    }
    match state.place_legendary() {
        Some(item) => {
            let id = match item.kind {
                FoodKind::Legendary { id, .. } => id,
                FoodKind::Normal => None,
            };
            log::info!("Legendary {:?} spawned at {:?} (score {})", id, item.position, score);
            result.spawn(
                SpawnKind::Legendary {
                    id,
                    visual_index: item.visual_index,
                },
                item.position,
            );
            state.legendary = Some(item);
            state.legendary_trigger_score = Some(score);
        }
        None => {
            log::warn!("No room for a legendary item; retrying next step");
            result.deferred_spawns.push(SpawnKind::Legendary {
                id: None,
                visual_index: 0,
            });
        }
    }
}

fn terminate(state: &mut GameState, cause: TerminalCause, result: &mut TickResult) {
    let final_score = state.score.score();
    state.phase = SessionPhase::Terminated;
    state.buffs.clear();
    state.area_items.clear();
    result.terminal = true;
    result.collide(CollisionEvent::Terminal { cause, final_score });
    if final_score > state.best_score {
        result.new_best = true;
        state.best_score = final_score;
    }
    log::info!("Game over ({:?}), final score {}", cause, final_score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::enemy::EnemyPhase;
    use crate::sim::state::FoodItem;
    use proptest::prelude::*;

    const STEP: f64 = 100.0;

    fn new_state() -> GameState {
        GameState::new(GameConfig::default(), 12345).unwrap()
    }

    /// Park food far away so it never interferes
    fn park_food(state: &mut GameState) {
        state.food = Some(FoodItem::normal(IVec2::new(0, 0), 0));
    }

    #[test]
    fn test_no_step_before_interval() {
        let mut state = new_state();
        let result = tick(&mut state, &TickInput::default(), 50.0);
        assert!(!result.stepped);
        assert_eq!(state.head(), Some(IVec2::new(10, 15)));
    }

    #[test]
    fn test_moves_one_cell_per_step() {
        let mut state = new_state();
        park_food(&mut state);
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(result.stepped);
        assert_eq!(state.head(), Some(IVec2::new(11, 15)));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_reversal_rejected() {
        let mut state = new_state();
        park_food(&mut state);
        state.place_snake(
            [IVec2::new(5, 5), IVec2::new(4, 5), IVec2::new(3, 5)],
            IVec2::X,
        );
        tick(&mut state, &TickInput::turn(-1, 0), STEP);
        assert_eq!(state.head(), Some(IVec2::new(6, 5)));
    }

    #[test]
    fn test_diagonal_intent_dropped() {
        let mut state = new_state();
        park_food(&mut state);
        tick(&mut state, &TickInput::turn(1, 1), STEP);
        assert_eq!(state.head(), Some(IVec2::new(11, 15)));
        assert_eq!(state.heading, IVec2::X);
    }

    #[test]
    fn test_intent_buffered_until_step() {
        let mut state = new_state();
        park_food(&mut state);
        tick(&mut state, &TickInput::turn(0, -1), 40.0);
        assert_eq!(state.head(), Some(IVec2::new(10, 15)));
        tick(&mut state, &TickInput::default(), 60.0);
        assert_eq!(state.head(), Some(IVec2::new(10, 14)));
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut state = new_state();
        state.food = Some(FoodItem::normal(IVec2::new(11, 15), 3));
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert_eq!(state.score.score(), 10);
        assert_eq!(result.score_delta, 10);
        assert_eq!(state.snake.len(), 4);
        assert!(result.collision_events.contains(&CollisionEvent::FoodEaten {
            position: IVec2::new(11, 15),
            points: 10
        }));
        let food = state.food.expect("food respawned");
        assert!(!state.snake.contains(&food.position));
        assert!(
            result
                .spawn_events
                .iter()
                .any(|e| matches!(e.kind, SpawnKind::NormalFood { .. }) && e.position == food.position)
        );
    }

    #[test]
    fn test_score_multiplier_applies_to_food() {
        let mut state = new_state();
        state.buffs.add(249, BuffKind::ScoreMultiplier, 2.0, 10_000, 0.0);
        state.food = Some(FoodItem::normal(IVec2::new(11, 15), 0));
        tick(&mut state, &TickInput::default(), STEP);
        assert_eq!(state.score.score(), 20);
    }

    #[test]
    fn test_wall_is_terminal() {
        let mut state = new_state();
        park_food(&mut state);
        state.place_snake([IVec2::new(29, 5), IVec2::new(28, 5)], IVec2::X);
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(result.terminal);
        assert!(result.collision_events.contains(&CollisionEvent::Terminal {
            cause: TerminalCause::Wall,
            final_score: 0
        }));
        assert_eq!(state.phase, SessionPhase::Terminated);
        assert_eq!(state.snake.len(), 2);
    }

    #[test]
    fn test_moving_onto_current_tail_is_fatal() {
        // 2x2 loop: head (5,5), tail (5,6); turning down lands on the tail
        let mut state = new_state();
        park_food(&mut state);
        state.place_snake(
            [
                IVec2::new(5, 5),
                IVec2::new(6, 5),
                IVec2::new(6, 6),
                IVec2::new(5, 6),
            ],
            IVec2::NEG_X,
        );
        let result = tick(&mut state, &TickInput::turn(0, 1), STEP);
        assert!(result.terminal);
        assert!(result.collision_events.contains(&CollisionEvent::Terminal {
            cause: TerminalCause::SelfCollision,
            final_score: 0
        }));
    }

    #[test]
    fn test_tick_after_terminal_is_ignored() {
        let mut state = new_state();
        park_food(&mut state);
        state.place_snake([IVec2::new(29, 5)], IVec2::X);
        tick(&mut state, &TickInput::default(), STEP);
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(result.ignored);
        assert!(!result.stepped);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = new_state();
        park_food(&mut state);
        state.buffs.add(151, BuffKind::SpeedBoost, 1.5, 1_000, 0.0);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, 16.0);
        assert_eq!(state.phase, SessionPhase::Paused);
        tick(&mut state, &TickInput::default(), 5_000.0);
        assert_eq!(state.now_ms, 0.0);
        assert!(state.buffs.is_active(151));
        assert_eq!(state.head(), Some(IVec2::new(10, 15)));
        tick(&mut state, &pause, 16.0);
        assert_eq!(state.phase, SessionPhase::Running);
    }

    #[test]
    fn test_speed_buffs_change_interval() {
        let mut state = new_state();
        park_food(&mut state);
        state.buffs.add(150, BuffKind::SpeedSlow, 1.5, 10_000, 0.0);
        // 100ms * 1.5 = 150ms
        assert!(!tick(&mut state, &TickInput::default(), 100.0).stepped);
        assert!(tick(&mut state, &TickInput::default(), 50.0).stepped);

        let mut state = new_state();
        park_food(&mut state);
        state.buffs.add(151, BuffKind::SpeedBoost, 2.0, 10_000, 0.0);
        assert!(tick(&mut state, &TickInput::default(), 50.0).stepped);
    }

    #[test]
    fn test_expired_buffs_reported() {
        let mut state = new_state();
        park_food(&mut state);
        state.buffs.add(151, BuffKind::SpeedBoost, 1.5, 30, 0.0);
        let result = tick(&mut state, &TickInput::default(), 16.0);
        assert!(result.expired_buff_ids.is_empty());
        let result = tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(result.expired_buff_ids, vec![151]);
    }

    #[test]
    fn test_enemy_hit_penalty_and_cooldown() {
        let mut state = new_state();
        park_food(&mut state);
        state.score.apply_delta(30);
        // Start the countdown, then force the spawn right in front of the head
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.enemy.phase(), EnemyPhase::CountingDown);
        state.place_snake(
            [IVec2::new(10, 15), IVec2::new(9, 15), IVec2::new(8, 15)],
            IVec2::X,
        );
        let mut enemy = state.enemy.clone();
        // Drive the scheduler until it spawns, then move its head onto the player tail
        while enemy.phase() != EnemyPhase::Active {
            enemy.advance(1_000.0, 30, IVec2::new(10, 15), &state.grid, &mut state.rng);
        }
        state.enemy = enemy;
        let at = state.enemy.actor().head().unwrap();
        state.place_snake([IVec2::new(at.x, at.y), at - IVec2::X], IVec2::X);

        let result = tick(&mut state, &TickInput::default(), 1.0);
        assert!(
            result
                .collision_events
                .iter()
                .any(|e| matches!(e, CollisionEvent::EnemyHit { penalty: 10, .. }))
        );
        assert_eq!(state.score.score(), 20);
        assert_eq!(state.enemy.phase(), EnemyPhase::Cooldown);
        assert!(!state.enemy.actor().active);
        assert!(state.enemy.reserved_position().is_some());
    }

    #[test]
    fn test_immunity_deflects_hit() {
        let mut state = new_state();
        park_food(&mut state);
        state.score.apply_delta(30);
        tick(&mut state, &TickInput::default(), 0.0);
        let mut enemy = state.enemy.clone();
        while enemy.phase() != EnemyPhase::Active {
            enemy.advance(1_000.0, 30, IVec2::new(10, 15), &state.grid, &mut state.rng);
        }
        state.enemy = enemy;
        let at = state.enemy.actor().head().unwrap();
        state.place_snake([at, at - IVec2::X], IVec2::X);
        state.buffs.add(250, BuffKind::DamageImmunity, 1.0, 10_000, state.now_ms);

        let result = tick(&mut state, &TickInput::default(), 1.0);
        assert!(
            result
                .collision_events
                .iter()
                .any(|e| matches!(e, CollisionEvent::Deflected { .. }))
        );
        assert_eq!(state.score.score(), 30);
        assert_eq!(state.enemy.phase(), EnemyPhase::Cooldown);
    }

    #[test]
    fn test_legendary_spawns_once_per_threshold() {
        let mut state = new_state();
        state.score.apply_delta(90);
        state.food = Some(FoodItem::normal(IVec2::new(11, 15), 0));
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert_eq!(state.score.score(), 100);
        let spawns = result
            .spawn_events
            .iter()
            .filter(|e| matches!(e.kind, SpawnKind::Legendary { .. }))
            .count();
        assert_eq!(spawns, 1);
        let first = state.legendary.expect("legendary spawned");

        // Let it expire: the score is still 100 but no new spawn happens
        state.food = Some(FoodItem::normal(IVec2::new(0, 0), 0));
        state.place_snake([IVec2::new(15, 1), IVec2::new(14, 1)], IVec2::Y);
        state.now_ms = 20_000.0;
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(
            result
                .spawn_events
                .iter()
                .any(|e| e.kind == SpawnKind::LegendaryExpired && e.position == first.position)
        );
        assert!(state.legendary.is_none());
        for _ in 0..5 {
            let result = tick(&mut state, &TickInput::default(), STEP);
            assert!(
                !result
                    .spawn_events
                    .iter()
                    .any(|e| matches!(e.kind, SpawnKind::Legendary { .. }))
            );
        }
    }

    #[test]
    fn test_legendary_respawns_after_score_recrosses_threshold() {
        let mut state = new_state();
        state.score.apply_delta(90);
        state.food = Some(FoodItem::normal(IVec2::new(11, 15), 0));
        tick(&mut state, &TickInput::default(), STEP);
        assert!(state.legendary.is_some());

        state.food = Some(FoodItem::normal(IVec2::new(0, 0), 0));
        state.place_snake([IVec2::new(15, 1), IVec2::new(14, 1)], IVec2::Y);
        state.now_ms = 20_000.0;
        tick(&mut state, &TickInput::default(), STEP);
        assert!(state.legendary.is_none());
        assert_eq!(state.head(), Some(IVec2::new(15, 2)));

        // Penalty takes the score to 90, the next food brings it back to 100
        state.score.apply_delta(-10);
        state.food = Some(FoodItem::normal(IVec2::new(15, 3), 0));
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert_eq!(state.score.score(), 100);
        assert!(
            result
                .spawn_events
                .iter()
                .any(|e| matches!(e.kind, SpawnKind::Legendary { .. }))
        );
        assert!(state.legendary.is_some());
        assert_eq!(state.legendary_trigger_score, Some(100));
    }

    #[test]
    fn test_full_board_defers_spawns_until_room_frees() {
        let mut config = GameConfig::default();
        config.grid.tile_count = 4;
        config.scoring.legendary_spawn_threshold = 5;
        config.area_items.cap = 1;
        let mut state = GameState::new(config, 31).unwrap();

        // Serpentine body covering every cell except (0,0), which holds the food
        let body = [
            (1, 0), (2, 0), (3, 0), (3, 1), (2, 1), (1, 1), (0, 1), (0, 2),
            (1, 2), (2, 2), (3, 2), (3, 3), (2, 3), (1, 3), (0, 3),
        ];
        state.place_snake(body.iter().map(|&(x, y)| IVec2::new(x, y)), IVec2::NEG_X);
        state.food = Some(FoodItem::normal(IVec2::new(0, 0), 0));
        state.legendary = None;
        state.buffs.add(383, BuffKind::AreaItemSpawn, 1.0, 60_000, 0.0);

        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(result.stepped);
        assert!(!result.terminal);
        assert_eq!(state.score.score(), 10);
        assert_eq!(state.snake.len(), 16);
        assert!(state.food.is_none());
        assert!(state.legendary.is_none());
        assert!(result.deferred_spawns.contains(&SpawnKind::AreaItem));
        assert!(result.deferred_spawns.contains(&SpawnKind::NormalFood { visual_index: 0 }));
        assert!(
            result
                .deferred_spawns
                .iter()
                .any(|kind| matches!(kind, SpawnKind::Legendary { .. }))
        );

        // Shrink the body: the next step finds room for everything
        state.place_snake(
            [IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0)],
            IVec2::Y,
        );
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(result.stepped);
        assert!(result.deferred_spawns.is_empty());
        let kinds: Vec<_> = result.spawn_events.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&SpawnKind::AreaItem));
        assert!(kinds.iter().any(|k| matches!(k, SpawnKind::NormalFood { .. })));
        assert!(kinds.iter().any(|k| matches!(k, SpawnKind::Legendary { .. })));
        assert!(state.food.is_some());
        assert!(state.legendary.is_some());
    }

    #[test]
    fn test_eating_legendary_applies_buff() {
        let mut state = new_state();
        park_food(&mut state);
        state.legendary = Some(FoodItem {
            position: IVec2::new(11, 14),
            kind: FoodKind::Legendary {
                id: Some(151),
                spawn_ms: 0.0,
                lifetime_ms: 10_000.0,
            },
            visual_index: 1,
        });
        // Head enters the lower-left cell of the 2x2 footprint
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert_eq!(state.score.score(), 100);
        assert_eq!(state.snake.len(), 4);
        assert!(state.legendary.is_none() || state.legendary_trigger_score == Some(100));
        assert_eq!(result.applied_buffs, vec![151]);
        assert!(state.buffs.is_active(151));
        assert_eq!(state.buffs.remaining_ms(151, state.now_ms), 10_000);
    }

    #[test]
    fn test_movement_bonus_per_step() {
        let mut state = new_state();
        park_food(&mut state);
        state.buffs.add(382, BuffKind::MovementBonus, 10.0, 10_000, 0.0);
        tick(&mut state, &TickInput::default(), STEP);
        tick(&mut state, &TickInput::default(), STEP);
        assert_eq!(state.score.score(), 20);
    }

    #[test]
    fn test_area_items_spawn_collect_and_clear() {
        let mut state = new_state();
        park_food(&mut state);
        state.buffs.add(383, BuffKind::AreaItemSpawn, 1.0, 250, 0.0);
        // Pre-place one item right in front of the head
        state.area_items.push(IVec2::new(11, 15));
        let result = tick(&mut state, &TickInput::default(), STEP);
        assert!(result.collision_events.contains(&CollisionEvent::AreaItemCollected {
            position: IVec2::new(11, 15),
            points: 5
        }));
        assert_eq!(state.score.score(), 5);
        assert_eq!(state.area_items.len(), 4);
        assert_eq!(state.snake.len(), 3);

        // Effect ends at 250ms; the step after that clears the leftovers
        tick(&mut state, &TickInput::default(), STEP);
        assert!(!state.area_items.is_empty());
        tick(&mut state, &TickInput::default(), STEP);
        assert!(state.area_items.is_empty());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = new_state();
        state.score.apply_delta(500);
        state.buffs.add(151, BuffKind::SpeedBoost, 1.5, 10_000, 0.0);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), 250.0);
        }
        state.reset();
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.score.score(), 0);
        assert_eq!(state.score.step_interval_ms(), 100);
        assert!(state.buffs.is_empty());
        assert_eq!(state.enemy.phase(), EnemyPhase::Idle);
        assert_eq!(state.enemy.schedule().remaining_ms, 0.0);
        assert_eq!(state.player_clock.accumulated_ms(), 0.0);
        assert_eq!(state.now_ms, 0.0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.head(), Some(IVec2::new(10, 15)));
        assert!(state.legendary.is_none());
        assert!(state.food.is_some());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(GameConfig::default(), 99_999).unwrap();
        let mut b = GameState::new(GameConfig::default(), 99_999).unwrap();
        let inputs = [
            TickInput::turn(0, -1),
            TickInput::default(),
            TickInput::turn(1, 0),
            TickInput::turn(0, 1),
        ];
        for i in 0..200 {
            let input = inputs[i % inputs.len()];
            let ra = tick(&mut a, &input, 37.0);
            let rb = tick(&mut b, &input, 37.0);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.snake, b.snake);
        assert_eq!(a.food, b.food);
        assert_eq!(a.score, b.score);
    }

    proptest! {
        #[test]
        fn prop_body_never_has_duplicates(
            seed in any::<u64>(),
            moves in proptest::collection::vec(0usize..5, 1..300),
        ) {
            let mut state = GameState::new(GameConfig::default(), seed).unwrap();
            let dirs = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];
            for m in moves {
                let input = TickInput { intent: dirs.get(m).copied(), pause: false };
                let result = tick(&mut state, &input, STEP);
                let mut seen = std::collections::HashSet::new();
                prop_assert!(state.snake.iter().all(|c| seen.insert(*c)));
                if result.terminal {
                    break;
                }
            }
        }
    }
}
