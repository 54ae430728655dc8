//! Session state machine.
//!
//! A [`Session`] owns the physics world and every gameplay component. Hosts
//! drive it through two callbacks, [`Session::physics_step`] and
//! [`Session::sample_danger_zone`], plus the session clock, or through
//! [`Session::tick`] which runs all of them in order. Player input reaches it
//! through [`Session::drop`], [`Session::toggle_pause`] and [`Session::reset`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::danger::{DangerMonitor, DangerVerdict};
use crate::error::{ConfigError, GameError};
use crate::fruit::{self, Fruit, FruitId, FruitLifecycle};
use crate::level::{LevelIndex, LevelTable};
use crate::merge::{MergeController, MergeResolution};
use crate::physics::PhysicsWorld;
use crate::spawn::SpawnController;
use crate::tag::BodyTag;
use crate::walls::{self, WallRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    Paused,
    GameOver,
}

/// Notifications produced while the session runs, drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Dropped {
        fruit: FruitId,
        level: LevelIndex,
        position: [f32; 2],
    },
    MergeCommitted {
        sources: [FruitId; 2],
        level: LevelIndex,
        point: [f32; 2],
    },
    MergeCompleted {
        fruit: FruitId,
        level: LevelIndex,
        position: [f32; 2],
        points: u64,
        score: u64,
    },
    StaleMergeDiscarded {
        sources: [FruitId; 2],
    },
    DangerEntered {
        fruits: usize,
    },
    GameOver {
        score: u64,
    },
    Paused,
    Resumed,
    Reset {
        generation: u64,
    },
}

/// The queued fruit as it should be previewed above the bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    pub level: LevelIndex,
    pub x: f32,
    pub y: f32,
}

/// Read-only view of a body for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyView {
    Fruit {
        id: FruitId,
        level: LevelIndex,
        radius: f32,
        position: [f32; 2],
        merging: bool,
    },
    Wall(WallRect),
}

pub struct Session {
    config: GameConfig,
    world: PhysicsWorld,
    lifecycle: FruitLifecycle,
    merges: MergeController,
    danger: DangerMonitor,
    spawner: SpawnController,
    phase: SessionPhase,
    score: u64,
    next_level: LevelIndex,
    pointer_x: f32,
    /// Incremented on every reset; completions from older generations are discarded.
    generation: u64,
    clock: Duration,
    stepping: bool,
    events: Vec<SessionEvent>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("next_level", &self.next_level)
            .field("generation", &self.generation)
            .field("clock", &self.clock)
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Validates the config, builds the bin and starts playing.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = PhysicsWorld::new();
        walls::build_walls(&mut world, &config);

        let mut spawner =
            SpawnController::new(seed, config.spawn_pool, config.bin_left, config.bin_right);
        let next_level = spawner.pick_next_level(&config.levels);

        tracing::info!(
            "[session] New session (seed={}, levels={})",
            seed,
            config.levels.len()
        );

        Ok(Self {
            lifecycle: FruitLifecycle::new(config.fruit_material),
            merges: MergeController::new(config.merge_delay()),
            danger: DangerMonitor::new(config.danger_line_y, config.danger_dwell()),
            pointer_x: config.bin_center_x(),
            config,
            world,
            spawner,
            phase: SessionPhase::Playing,
            score: 0,
            next_level,
            generation: 0,
            clock: Duration::ZERO,
            stepping: true,
            events: Vec::new(),
        })
    }

    // ========== Input surface ==========

    pub fn set_pointer_x(&mut self, x: f32) {
        self.pointer_x = x;
    }

    /// Drops the queued fruit at the pointer. Returns `None` unless playing.
    pub fn drop(&mut self) -> Result<Option<Fruit>, GameError> {
        if self.phase != SessionPhase::Playing {
            return Ok(None);
        }

        let level = self.next_level;
        let x = self
            .spawner
            .drop_position(&self.config.levels, self.pointer_x, level)?;
        let fruit = self.lifecycle.spawn(
            &mut self.world,
            &self.config.levels,
            level,
            [x, self.config.preview_y],
            self.clock,
        )?;
        self.next_level = self.spawner.pick_next_level(&self.config.levels);

        tracing::debug!("[spawn] Dropped level {} at x={:.1}", level, x);
        self.events.push(SessionEvent::Dropped {
            fruit: fruit.id,
            level,
            position: fruit.position,
        });
        Ok(Some(fruit))
    }

    /// Moves the pointer to `x` and drops.
    pub fn drop_at(&mut self, x: f32) -> Result<Option<Fruit>, GameError> {
        self.set_pointer_x(x);
        self.drop()
    }

    /// Switches between playing and paused. Has no effect after game over.
    pub fn toggle_pause(&mut self) -> SessionPhase {
        match self.phase {
            SessionPhase::Playing => {
                self.phase = SessionPhase::Paused;
                self.stepping = false;
                tracing::info!("[session] Paused");
                self.events.push(SessionEvent::Paused);
            }
            SessionPhase::Paused => {
                self.phase = SessionPhase::Playing;
                self.stepping = true;
                tracing::info!("[session] Resumed");
                self.events.push(SessionEvent::Resumed);
            }
            SessionPhase::GameOver => {}
        }
        self.phase
    }

    /// Clears the world and starts a fresh round.
    pub fn reset(&mut self) {
        self.stepping = false;

        self.world.reset();
        self.merges.clear_pending();
        self.danger.clear();
        self.generation += 1;

        self.score = 0;
        self.phase = SessionPhase::Playing;
        walls::build_walls(&mut self.world, &self.config);
        self.next_level = self.spawner.pick_next_level(&self.config.levels);

        self.stepping = true;
        tracing::info!("[session] Reset (generation={})", self.generation);
        self.events.push(SessionEvent::Reset {
            generation: self.generation,
        });
    }

    /// Ends the session and releases the physics world.
    pub fn teardown(mut self) {
        self.stepping = false;
        self.world.reset();
        tracing::info!(
            "[session] Teardown (score={}, generation={})",
            self.score,
            self.generation
        );
    }

    // ========== Host callbacks ==========

    pub fn advance_clock(&mut self, dt: Duration) {
        self.clock += dt;
    }

    /// Resolves every merge completion due on the session clock.
    pub fn fire_due_merges(&mut self) -> Result<(), GameError> {
        if self.phase == SessionPhase::Paused && self.config.suspend_merges_while_paused {
            return Ok(());
        }

        for completion in self.merges.take_due(self.clock) {
            let resolution = self.merges.complete(
                &mut self.world,
                &self.config.levels,
                &self.lifecycle,
                completion,
                self.clock,
                self.generation,
            )?;
            match resolution {
                MergeResolution::Completed { fruit, points, .. } => {
                    self.score = self.score.saturating_add(points);
                    tracing::debug!(
                        "[merge] Completed level {} (+{}, score={})",
                        fruit.level,
                        points,
                        self.score
                    );
                    self.events.push(SessionEvent::MergeCompleted {
                        fruit: fruit.id,
                        level: fruit.level,
                        position: fruit.position,
                        points,
                        score: self.score,
                    });
                }
                MergeResolution::Stale { sources } => {
                    self.events.push(SessionEvent::StaleMergeDiscarded { sources });
                }
            }
        }
        Ok(())
    }

    /// Advances physics by one tick and handles the collisions it reported.
    pub fn physics_step(&mut self) -> Result<(), GameError> {
        if !self.stepping || self.phase != SessionPhase::Playing {
            return Ok(());
        }

        let pairs = self.world.step_collisions();
        let committed = self.merges.process_batch(
            &mut self.world,
            &self.config.levels,
            &self.lifecycle,
            &pairs,
            self.clock,
            self.generation,
        )?;
        self.events
            .extend(committed.into_iter().map(|c| SessionEvent::MergeCommitted {
                sources: c.sources,
                level: c.level,
                point: c.point,
            }));
        Ok(())
    }

    /// Samples the danger line once; called per display refresh.
    pub fn sample_danger_zone(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        let fruits = fruit::all(&self.world);
        let violating = self.danger.violating_set(&fruits, &self.config.levels);
        match self.danger.sample(violating, self.clock) {
            DangerVerdict::Entered => {
                self.events.push(SessionEvent::DangerEntered {
                    fruits: self.danger.current().len(),
                });
            }
            DangerVerdict::Triggered => self.trigger_game_over(),
            DangerVerdict::Clear | DangerVerdict::Dwelling { .. } => {}
        }
    }

    fn trigger_game_over(&mut self) {
        if self.phase == SessionPhase::GameOver {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.stepping = false;
        tracing::info!("[session] Game over (score={})", self.score);
        self.events.push(SessionEvent::GameOver { score: self.score });
    }

    /// Advances the clock by `dt`, fires due merges, steps physics once and
    /// samples the danger line.
    pub fn tick(&mut self, dt: Duration) -> Result<(), GameError> {
        self.advance_clock(dt);
        self.fire_due_merges()?;
        self.physics_step()?;
        self.sample_danger_zone();
        Ok(())
    }

    /// Returns the accumulated events and clears the buffer.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ========== Read access ==========

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn is_stepping(&self) -> bool {
        self.stepping
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn next_level(&self) -> LevelIndex {
        self.next_level
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelTable {
        &self.config.levels
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn pending_merges(&self) -> usize {
        self.merges.pending().len()
    }

    pub fn is_pending(&self, id: FruitId) -> bool {
        self.merges.is_pending(id)
    }

    /// When the earliest scheduled merge completion is due, if any.
    pub fn next_merge_due(&self) -> Option<Duration> {
        self.merges.next_due()
    }

    pub fn danger_line_y(&self) -> f32 {
        self.danger.line_y()
    }

    pub fn fruits(&self) -> Vec<Fruit> {
        fruit::all(&self.world)
    }

    pub fn fruit_count(&self) -> usize {
        fruit::count(&self.world)
    }

    pub fn wall_count(&self) -> usize {
        walls::wall_count(&self.world)
    }

    /// Where the queued fruit would be dropped right now.
    pub fn preview(&self) -> Preview {
        let x = self
            .spawner
            .drop_position(&self.config.levels, self.pointer_x, self.next_level)
            .unwrap_or(self.pointer_x);
        Preview {
            level: self.next_level,
            x,
            y: self.config.preview_y,
        }
    }

    /// Every tagged body, for drawing.
    pub fn bodies(&self) -> Vec<BodyView> {
        let layout = WallRect::layout(&self.config);
        self.world
            .tagged_bodies()
            .filter_map(|(handle, body, tag)| match tag {
                BodyTag::Fruit(fruit_tag) => {
                    let radius = self.config.levels.get(fruit_tag.level)?.radius;
                    let pos = body.translation();
                    Some(BodyView::Fruit {
                        id: FruitId(handle),
                        level: fruit_tag.level,
                        radius,
                        position: [pos.x, pos.y],
                        merging: fruit_tag.merging,
                    })
                }
                BodyTag::Wall(kind) => layout
                    .iter()
                    .find(|rect| rect.kind == kind)
                    .copied()
                    .map(BodyView::Wall),
            })
            .collect()
    }

    /// Deterministic hash of the physics state.
    pub fn state_hash(&self) -> u64 {
        self.world.compute_hash()
    }

    /// Inserts a fruit directly, bypassing the spawn queue.
    #[cfg(test)]
    pub(crate) fn insert_fruit(
        &mut self,
        level: LevelIndex,
        position: [f32; 2],
    ) -> Result<Fruit, GameError> {
        self.lifecycle
            .spawn(&mut self.world, &self.config.levels, level, position, self.clock)
    }

    /// Moves a fruit and stops it, as if carried there between frames.
    #[cfg(test)]
    pub(crate) fn place_fruit(&mut self, id: FruitId, position: [f32; 2]) {
        use rapier2d::prelude::Vector;

        let body = self
            .world
            .get_rigid_body_mut(id.0)
            .expect("fruit must exist");
        body.set_translation(Vector::new(position[0], position[1]), true);
        body.set_linvel(Vector::new(0.0, 0.0), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Color, Level, MAX_LEVELS};
    use crate::test_utils::{TestSession, frame};

    fn count_events(events: &[SessionEvent], pred: impl Fn(&SessionEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    /// Inserts two overlapping level-0 fruits and runs one frame so they merge.
    fn commit_one_merge(test: &mut TestSession) {
        test.session.insert_fruit(0, [200.0, 600.0]).unwrap();
        test.session.insert_fruit(0, [210.0, 600.0]).unwrap();
        test.step(1);
        assert_eq!(test.session.pending_merges(), 2);
        assert_eq!(test.session.fruit_count(), 0);
    }

    #[test]
    fn test_new_session_is_playing_with_walls() {
        let test = TestSession::new();
        let session = &test.session;

        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.wall_count(), 3);
        assert_eq!(session.fruit_count(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.next_level() < 4);
    }

    #[test]
    fn test_two_dropped_cherries_become_one_strawberry() {
        let mut test = TestSession::with_config(TestSession::smallest_only());

        assert!(test.session.drop_at(200.0).unwrap().is_some());
        test.step(90);
        assert!(test.session.drop_at(200.0).unwrap().is_some());
        assert!(test.step_until(300, |s| s.score() == 2));
        test.step(5);

        let fruits = test.session.fruits();
        assert_eq!(fruits.len(), 1);
        assert_eq!(fruits[0].level, 1);
        assert_eq!(test.session.score(), 2);
        assert_eq!(test.session.pending_merges(), 0);

        let events = test.events();
        let committed: Vec<[f32; 2]> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::MergeCommitted { point, level: 0, .. } => Some(*point),
                _ => None,
            })
            .collect();
        let completed: Vec<([f32; 2], u64)> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::MergeCompleted {
                    position,
                    points,
                    level: 1,
                    ..
                } => Some((*position, *points)),
                _ => None,
            })
            .collect();
        assert_eq!(committed.len(), 1);
        assert_eq!(completed, vec![(committed[0], 2)]);
    }

    #[test]
    fn test_terminal_fruits_do_not_merge() {
        let mut test = TestSession::new();
        let top = test.session.levels().max_level();
        test.session.insert_fruit(top, [110.0, 520.0]).unwrap();
        test.session.insert_fruit(top, [290.0, 520.0]).unwrap();

        test.step(60);

        assert_eq!(test.session.fruit_count(), 2);
        assert_eq!(test.session.score(), 0);
        assert_eq!(test.session.pending_merges(), 0);
        let events = test.events();
        assert_eq!(
            count_events(&events, |e| matches!(e, SessionEvent::MergeCommitted { .. })),
            0
        );
    }

    #[test]
    fn test_game_over_after_sustained_danger() {
        let mut test = TestSession::with_config(GameConfig {
            danger_line_y: 1000.0,
            ..TestSession::smallest_only()
        });
        test.session.drop_at(200.0).unwrap();

        test.step(60);
        assert!(!test.session.is_game_over());

        assert!(test.step_until(10, Session::is_game_over));
        let triggered_at = test.session.clock();
        assert!(triggered_at > Duration::from_millis(1000));

        test.step(30);
        let events = test.events();
        assert_eq!(
            count_events(&events, |e| matches!(e, SessionEvent::GameOver { .. })),
            1
        );
        assert!(test.session.drop().unwrap().is_none());
        assert_eq!(test.session.toggle_pause(), SessionPhase::GameOver);
    }

    #[test]
    fn test_leaving_danger_zone_restarts_dwell() {
        let mut test = TestSession::new();
        let fruit = test.session.insert_fruit(0, [200.0, 300.0]).unwrap().id;
        let above = [200.0, 60.0];
        let below = [200.0, 300.0];

        let hold = |test: &mut TestSession, position: [f32; 2], frames: usize| {
            for _ in 0..frames {
                test.session.place_fruit(fruit, position);
                test.step(1);
            }
        };

        // First stay of 0.5 s, then out for 0.2 s.
        hold(&mut test, above, 30);
        hold(&mut test, below, 12);
        assert!(!test.session.is_game_over());

        // More than a dwell of total time has passed, but the second stay
        // only just began.
        let returned_at = test.session.clock();
        hold(&mut test, above, 55);
        assert!(!test.session.is_game_over());
        assert!(test.session.clock() > Duration::from_millis(1000));

        for _ in 0..20 {
            if test.session.is_game_over() {
                break;
            }
            hold(&mut test, above, 1);
        }
        assert!(test.session.is_game_over());
        let second_stay = test.session.clock() - returned_at;
        assert!(second_stay > Duration::from_millis(1000));
        assert!(second_stay <= Duration::from_millis(1200));

        hold(&mut test, above, 10);
        let events = test.events();
        assert_eq!(
            count_events(&events, |e| matches!(e, SessionEvent::GameOver { .. })),
            1
        );
        assert_eq!(
            count_events(&events, |e| matches!(e, SessionEvent::DangerEntered { .. })),
            2
        );
    }

    #[test]
    fn test_merge_at_level_cap_awards_top_score() {
        let levels = (0..MAX_LEVELS)
            .map(|i| Level::new(format!("L{i}"), 10.0, Color::rgb(0, 0, 0)))
            .collect();
        let mut test = TestSession::with_config(GameConfig {
            levels: LevelTable::new(levels),
            ..GameConfig::default()
        });
        let top_merge = LevelIndex::try_from(MAX_LEVELS - 2).unwrap();
        test.session.insert_fruit(top_merge, [200.0, 600.0]).unwrap();
        test.session.insert_fruit(top_merge, [205.0, 600.0]).unwrap();

        assert!(test.step_until(30, |s| s.fruit_count() == 1 && s.pending_merges() == 0));
        assert_eq!(test.session.score(), 1 << 63);
        assert_eq!(test.session.fruits()[0].level, top_merge + 1);
    }

    #[test]
    fn test_game_over_freezes_physics() {
        let mut test = TestSession::with_config(GameConfig {
            danger_line_y: 1000.0,
            ..TestSession::smallest_only()
        });
        test.session.drop_at(200.0).unwrap();
        assert!(test.step_until(120, Session::is_game_over));

        let frame_at_game_over = test.session.world().current_frame();
        test.step(10);
        assert_eq!(test.session.world().current_frame(), frame_at_game_over);
        assert!(!test.session.is_stepping());
    }

    #[test]
    fn test_reset_discards_in_flight_merge() {
        let mut test = TestSession::new();
        commit_one_merge(&mut test);

        test.session.reset();
        test.step(6);

        assert_eq!(test.session.fruit_count(), 0);
        assert_eq!(test.session.score(), 0);
        assert_eq!(test.session.wall_count(), 3);
        assert_eq!(test.session.pending_merges(), 0);
        let events = test.events();
        assert_eq!(
            count_events(&events, |e| matches!(e, SessionEvent::StaleMergeDiscarded { .. })),
            1
        );
        assert_eq!(
            count_events(&events, |e| matches!(e, SessionEvent::MergeCompleted { .. })),
            0
        );
    }

    #[test]
    fn test_reset_restores_fresh_round() {
        let mut test = TestSession::with_config(GameConfig {
            danger_line_y: 1000.0,
            ..GameConfig::default()
        });
        test.session.drop_at(100.0).unwrap();
        test.session.drop_at(300.0).unwrap();
        assert!(test.step_until(120, Session::is_game_over));

        test.session.reset();

        let session = &test.session;
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(session.is_stepping());
        assert_eq!(session.fruit_count(), 0);
        assert_eq!(session.wall_count(), 3);
        assert_eq!(session.score(), 0);
        assert!(session.next_level() < 4);
        assert_eq!(session.generation(), 1);
        assert!(!session.is_paused());
    }

    #[test]
    fn test_reset_twice_leaves_same_shape() {
        let mut test = TestSession::new();
        test.session.reset();
        test.session.reset();

        assert_eq!(test.session.wall_count(), 3);
        assert_eq!(test.session.fruit_count(), 0);
        assert_eq!(test.session.generation(), 2);
    }

    #[test]
    fn test_pause_blocks_drops_and_physics() {
        let mut test = TestSession::new();
        assert_eq!(test.session.toggle_pause(), SessionPhase::Paused);

        assert!(test.session.drop().unwrap().is_none());
        let frame_before = test.session.world().current_frame();
        test.step(10);
        assert_eq!(test.session.world().current_frame(), frame_before);
        assert_eq!(test.session.fruit_count(), 0);

        assert_eq!(test.session.toggle_pause(), SessionPhase::Playing);
        test.step(1);
        assert_eq!(test.session.world().current_frame(), frame_before + 1);
    }

    #[test]
    fn test_in_flight_merge_completes_while_paused() {
        let mut test = TestSession::new();
        commit_one_merge(&mut test);

        test.session.toggle_pause();
        test.step(6);

        assert_eq!(test.session.fruit_count(), 1);
        assert_eq!(test.session.score(), 2);
        assert_eq!(test.session.pending_merges(), 0);
    }

    #[test]
    fn test_suspended_merge_waits_for_resume() {
        let mut test = TestSession::with_config(GameConfig {
            suspend_merges_while_paused: true,
            ..GameConfig::default()
        });
        commit_one_merge(&mut test);

        test.session.toggle_pause();
        test.step(6);
        assert_eq!(test.session.fruit_count(), 0);
        assert_eq!(test.session.score(), 0);

        test.session.toggle_pause();
        test.step(1);
        assert_eq!(test.session.fruit_count(), 1);
        assert_eq!(test.session.score(), 2);
    }

    #[test]
    fn test_merge_completion_is_delayed() {
        let mut test = TestSession::new();
        commit_one_merge(&mut test);
        let due = test.session.next_merge_due().unwrap();
        assert_eq!(due, frame() + Duration::from_millis(50));

        test.step(2);
        assert_eq!(test.session.fruit_count(), 0);
        test.step(2);
        assert_eq!(test.session.fruit_count(), 1);
    }

    #[test]
    fn test_identical_inputs_produce_identical_worlds() {
        let script = [120.0, 260.0, 80.0, 330.0, 200.0, 150.0];
        let run = || {
            let mut test = TestSession::new();
            for x in script {
                test.session.drop_at(x).unwrap();
                test.step(40);
            }
            (test.session.state_hash(), test.session.score())
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_bodies_lists_walls_and_fruits() {
        let mut test = TestSession::new();
        let level = test.session.next_level();
        test.session.drop_at(200.0).unwrap();

        let bodies = test.session.bodies();
        assert_eq!(bodies.len(), 4);
        let radius = test.session.levels().radius(level).unwrap();
        assert!(bodies.iter().any(|b| matches!(
            b,
            BodyView::Fruit { level: l, radius: r, .. } if *l == level && *r == radius
        )));
        assert_eq!(
            bodies.iter().filter(|b| matches!(b, BodyView::Wall(_))).count(),
            3
        );
    }

    #[test]
    fn test_preview_clamps_pointer_into_bin() {
        let mut test = TestSession::new();
        test.session.set_pointer_x(-100.0);

        let preview = test.session.preview();
        let radius = test.session.levels().radius(preview.level).unwrap();
        assert_eq!(preview.x, radius);
        assert_eq!(preview.y, test.session.config().preview_y);
    }

    #[test]
    fn test_drop_advances_queue() {
        let mut test = TestSession::new();
        let queued = test.session.next_level();
        let fruit = test.session.drop_at(200.0).unwrap().unwrap();

        assert_eq!(fruit.level, queued);
        assert_eq!(fruit.position[1], test.session.config().preview_y);
        let events = test.events();
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Dropped { level, .. }] if *level == queued
        ));
    }
}
