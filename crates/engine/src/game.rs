//! Game module - drives the shared field
//!
//! One [`Game`] owns the field and everything that falls through it:
//!
//! - one active piece per registered controller, spawned side by side from a shared bag
//! - loose fragments produced by line clears
//!
//! Each tick spawns missing pieces, applies queued commands in arrival order, then runs
//! as many gravity steps as the elapsed time allows. A gravity step moves *every*
//! falling piece down at once, so pieces stacked on each other fall together. Pieces
//! that cannot move settle into terrain, which may complete rows.

use std::collections::VecDeque;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::GameConfig;
use crate::core::{shape_template, ConfigError, Field, FieldSnapshot, Piece, ShapeBag};
use crate::scoring::line_clear_score;
use crate::snapshot::{ControllerSnapshot, GameSnapshot, PieceSnapshot};
use crate::types::{Command, ControllerId, Direction, PieceId, ShapeKind};

/// What happened during one [`Game::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub spawned: Vec<PieceId>,
    pub commands_applied: usize,
    pub commands_rejected: usize,
    pub gravity_steps: u32,
    pub settled: Vec<PieceId>,
    /// Cleared rows, floor first per clear.
    pub rows_cleared: Vec<i32>,
    pub fragments: usize,
    pub score_delta: u32,
    pub game_over: bool,
}

impl TickReport {
    /// Nothing spawned, moved by command, landed or cleared.
    pub fn is_quiet(&self) -> bool {
        self.spawned.is_empty()
            && self.commands_applied == 0
            && self.settled.is_empty()
            && self.rows_cleared.is_empty()
            && !self.game_over
    }
}

#[derive(Debug, Clone)]
struct ControllerSlot {
    id: ControllerId,
    active: Option<Piece>,
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    field: Field,
    bag: ShapeBag,
    /// Registration order; the index decides the spawn column.
    controllers: Vec<ControllerSlot>,
    fragments: Vec<Piece>,
    queue: VecDeque<(ControllerId, Command)>,
    next_controller_id: u32,
    gravity_timer_ms: u32,
    ticks: u64,
    score: u32,
    lines: u32,
    game_over: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = Field::new(config.field.clone())?;
        Ok(Self {
            bag: ShapeBag::new(config.seed),
            config,
            field,
            controllers: Vec::new(),
            fragments: Vec::new(),
            queue: VecDeque::new(),
            next_controller_id: 0,
            gravity_timer_ms: 0,
            ticks: 0,
            score: 0,
            lines: 0,
            game_over: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Play advances only while enough controllers are registered.
    pub fn is_running(&self) -> bool {
        !self.game_over && self.controllers.len() >= self.config.min_controllers
    }

    pub fn controllers(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.controllers.iter().map(|slot| slot.id)
    }

    pub fn active_piece(&self, controller: ControllerId) -> Option<&Piece> {
        self.slot(controller).and_then(|slot| slot.active.as_ref())
    }

    pub fn fragments(&self) -> &[Piece] {
        &self.fragments
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    fn slot(&self, controller: ControllerId) -> Option<&ControllerSlot> {
        self.controllers.iter().find(|slot| slot.id == controller)
    }

    pub fn register_controller(&mut self) -> ControllerId {
        let id = ControllerId(self.next_controller_id);
        self.next_controller_id += 1;
        self.controllers.push(ControllerSlot { id, active: None });
        info!(
            "{} joined ({} of {} needed)",
            id,
            self.controllers.len(),
            self.config.min_controllers
        );
        id
    }

    /// Remove a controller. Its piece keeps falling as a loose fragment.
    pub fn unregister_controller(&mut self, controller: ControllerId) -> bool {
        let Some(index) = self.controllers.iter().position(|s| s.id == controller) else {
            return false;
        };
        let slot = self.controllers.remove(index);
        if let Some(piece) = slot.active {
            self.fragments.push(piece);
        }
        self.queue.retain(|(owner, _)| *owner != controller);
        info!("{} left", controller);
        true
    }

    /// Queue a command. Returns false for unknown controllers or after game over.
    pub fn submit(&mut self, controller: ControllerId, command: Command) -> bool {
        if self.game_over || self.slot(controller).is_none() {
            return false;
        }
        self.queue.push_back((controller, command));
        true
    }

    /// Advance the game by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) -> TickReport {
        let mut report = TickReport {
            tick: self.ticks,
            game_over: self.game_over,
            ..TickReport::default()
        };
        if !self.is_running() {
            return report;
        }

        self.ticks += 1;
        report.tick = self.ticks;

        self.spawn_missing(&mut report);
        if !self.game_over {
            self.apply_commands(&mut report);

            self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(elapsed_ms);
            let interval = self.config.gravity_interval_ms;
            while self.gravity_timer_ms >= interval {
                self.gravity_timer_ms -= interval;
                self.gravity_step(&mut report);
            }
        }

        report.game_over = self.game_over;
        report
    }

    fn spawn_missing(&mut self, report: &mut TickReport) {
        let width = self.field.width();
        for (index, slot) in self.controllers.iter_mut().enumerate() {
            if slot.active.is_some() {
                continue;
            }
            let shape = self.bag.draw();
            let x = spawn_x(index, self.config.spawn_spacing, shape, width);
            match self.field.spawn_piece(shape, x) {
                Ok(piece) => {
                    report.spawned.push(piece.id());
                    slot.active = Some(piece);
                }
                Err(err) => {
                    warn!("{} cannot spawn {:?}: {}", slot.id, shape, err);
                    info!("game over after {} ticks, score {}", self.ticks, self.score);
                    self.game_over = true;
                    return;
                }
            }
        }
    }

    fn apply_commands(&mut self, report: &mut TickReport) {
        while let Some((controller, command)) = self.queue.pop_front() {
            let piece = self
                .controllers
                .iter_mut()
                .find(|slot| slot.id == controller)
                .and_then(|slot| slot.active.as_mut());
            let Some(piece) = piece else {
                report.commands_rejected += 1;
                continue;
            };

            let applied = match command {
                // Controllers may not push pieces back up.
                Command::Move(Direction::Up | Direction::None) => false,
                Command::Move(direction) => self.field.collision().try_move_piece(piece, direction),
                Command::Rotate => self
                    .field
                    .collision()
                    .try_rotate(piece, self.config.rotation_degrees),
            };

            if applied {
                report.commands_applied += 1;
            } else {
                report.commands_rejected += 1;
            }
        }
    }

    /// Move every falling piece down as one group. Pieces that cannot move settle.
    fn gravity_step(&mut self, report: &mut TickReport) {
        report.gravity_steps += 1;

        let mut owners = Vec::new();
        let mut falling = Vec::new();
        for (index, slot) in self.controllers.iter_mut().enumerate() {
            if let Some(piece) = slot.active.take() {
                owners.push(Some(index));
                falling.push(piece);
            }
        }
        for piece in self.fragments.drain(..) {
            owners.push(None);
            falling.push(piece);
        }
        if falling.is_empty() {
            return;
        }

        let moved = self
            .field
            .collision()
            .try_move_many(&mut falling, Direction::Down);

        let mut landed = false;
        for ((piece, owner), moved) in falling.into_iter().zip(owners).zip(moved) {
            if moved {
                match owner {
                    Some(index) => self.controllers[index].active = Some(piece),
                    None => self.fragments.push(piece),
                }
            } else {
                self.field.settle_piece(&piece);
                report.settled.push(piece.id());
                landed = true;
            }
        }

        if landed {
            self.clear_lines(report);
        }
    }

    fn clear_lines(&mut self, report: &mut TickReport) {
        let outcome = self.field.line_clearer().clear_full_lines();
        if outcome.rows.is_empty() {
            return;
        }

        // Full rows may run through pieces that are still falling.
        for slot in &mut self.controllers {
            let alive = slot
                .active
                .as_mut()
                .map(|piece| self.field.prune_piece(piece));
            if alive == Some(false) {
                slot.active = None;
            }
        }
        let field = &self.field;
        self.fragments.retain_mut(|piece| field.prune_piece(piece));

        let cleared = outcome.lines_cleared();
        let points = line_clear_score(cleared);
        self.score += points;
        self.lines += cleared as u32;

        info!(
            "cleared {} rows {:?}, {} fragments, +{} points",
            cleared,
            outcome.rows,
            outcome.fragments.len(),
            points
        );
        report.rows_cleared.extend_from_slice(&outcome.rows);
        report.fragments += outcome.fragments.len();
        report.score_delta += points;
        self.fragments.extend(outcome.fragments);
        debug!("{} fragments falling", self.fragments.len());
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tick: self.ticks,
            running: self.is_running(),
            game_over: self.game_over,
            score: self.score,
            lines: self.lines,
            controllers: self
                .controllers
                .iter()
                .map(|slot| ControllerSnapshot {
                    id: slot.id,
                    piece: slot
                        .active
                        .as_ref()
                        .map(|piece| PieceSnapshot::capture(&self.field, piece)),
                })
                .collect(),
            fragments: self
                .fragments
                .iter()
                .map(|piece| PieceSnapshot::capture(&self.field, piece))
                .collect(),
            field: FieldSnapshot::capture(&self.field),
        }
    }
}

/// Spawn column for the controller at `index`, pulled inside the walls for `shape`.
pub fn spawn_x(index: usize, spacing: i32, shape: ShapeKind, width: i32) -> i32 {
    let (min_dx, max_dx) = shape_template(shape).x_extent();
    let wanted = spacing.saturating_mul(index as i32 + 1);
    wanted.max(-min_dx).min(width - 1 - max_dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldConfig;
    use crate::types::Coordinate;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn small_game(width: i32, height: i32, min_controllers: usize) -> Game {
        Game::new(GameConfig {
            field: FieldConfig::with_size(width, height),
            min_controllers,
            ..GameConfig::default()
        })
        .unwrap()
    }

    fn coords(game: &Game, controller: ControllerId) -> Vec<Coordinate> {
        let piece = game.active_piece(controller).unwrap();
        game.field.piece_coordinates(piece).unwrap()
    }

    fn settle_at(game: &mut Game, cells: &[(i32, i32)]) {
        for &(x, y) in cells {
            let id = game.field.spawn_block(c(x, y)).unwrap();
            game.field.set_settled(id, true);
        }
    }

    #[test]
    fn test_waits_for_enough_controllers() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let first = game.register_controller();

        let report = game.tick(1000);
        assert_eq!(report, TickReport::default());
        assert!(report.is_quiet());
        assert!(game.active_piece(first).is_none());
        assert!(!game.is_running());

        let second = game.register_controller();
        let report = game.tick(0);
        assert_eq!(report.spawned.len(), 2);
        assert!(game.active_piece(first).is_some());
        assert!(game.active_piece(second).is_some());
        assert_eq!(game.field().block_count(), 8);
    }

    #[test]
    fn test_spawn_x_is_clamped() {
        assert_eq!(spawn_x(0, 4, ShapeKind::T, 21), 4);
        assert_eq!(spawn_x(1, 4, ShapeKind::T, 21), 8);
        assert_eq!(spawn_x(4, 4, ShapeKind::I, 21), 18);
        assert_eq!(spawn_x(0, 0, ShapeKind::J, 21), 1);
    }

    #[test]
    fn test_commands_apply_in_order() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let a = game.register_controller();
        game.register_controller();
        game.tick(0);
        let before = coords(&game, a);

        assert!(game.submit(a, Command::Move(Direction::Left)));
        assert!(game.submit(a, Command::Move(Direction::Left)));
        assert_eq!(game.pending_commands(), 2);
        let report = game.tick(0);

        assert_eq!(report.commands_applied, 2);
        let after = coords(&game, a);
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(*a, c(b.x - 2, b.y));
        }
    }

    #[test]
    fn test_up_moves_and_unknown_controllers_are_rejected() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let a = game.register_controller();
        game.register_controller();
        game.tick(0);

        assert!(!game.submit(ControllerId(99), Command::Rotate));
        assert!(game.submit(a, Command::Move(Direction::Up)));
        let report = game.tick(0);
        assert_eq!(report.commands_rejected, 1);
        assert_eq!(report.commands_applied, 0);
    }

    #[test]
    fn test_gravity_moves_all_pieces() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let a = game.register_controller();
        let b = game.register_controller();
        game.tick(0);
        let (a0, b0) = (coords(&game, a), coords(&game, b));

        let report = game.tick(250);
        assert_eq!(report.gravity_steps, 0);
        let report = game.tick(250);
        assert_eq!(report.gravity_steps, 1);

        let down = |v: &[Coordinate]| v.iter().map(|p| c(p.x, p.y - 1)).collect::<Vec<_>>();
        assert_eq!(coords(&game, a), down(&a0));
        assert_eq!(coords(&game, b), down(&b0));
    }

    #[test]
    fn test_rotate_after_falling() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let a = game.register_controller();
        game.register_controller();
        game.tick(0);
        game.tick(1500);

        game.submit(a, Command::Rotate);
        let report = game.tick(0);
        assert_eq!(report.commands_applied, 1);
        assert!(game.field().is_consistent());
    }

    #[test]
    fn test_landing_clears_row_and_regroups() {
        let mut game = small_game(4, 6, 1);
        settle_at(&mut game, &[(0, 0), (1, 0), (2, 0), (1, 1)]);
        let block = game.field.spawn_block(c(3, 1)).unwrap();
        let piece = game.field.assemble_piece(vec![block], c(3, 1));
        game.fragments.push(piece);

        let mut report = TickReport::default();
        game.gravity_step(&mut report);
        assert!(report.settled.is_empty());
        assert_eq!(game.field.coordinates_of(block), Some(c(3, 0)));

        let mut report = TickReport::default();
        game.gravity_step(&mut report);
        assert_eq!(report.settled.len(), 1);
        assert_eq!(report.rows_cleared, vec![0]);
        assert_eq!(report.score_delta, 40);
        assert_eq!(report.fragments, 1);
        assert_eq!(game.score(), 40);
        assert_eq!(game.lines(), 1);
        assert_eq!(game.field.block_count(), 1);
        assert_eq!(game.fragments().len(), 1);

        // The orphaned block falls and lands on the floor.
        let mut report = TickReport::default();
        game.gravity_step(&mut report);
        game.gravity_step(&mut report);
        assert_eq!(report.settled.len(), 1);
        assert!(game.fragments().is_empty());
        assert_eq!(game.field.settled_count(), 1);
        assert!(game.field.occupant_at(c(1, 0)).unwrap().is_some());
    }

    #[test]
    fn test_clear_prunes_live_piece() {
        let mut game = small_game(4, 6, 1);
        let controller = game.register_controller();
        settle_at(&mut game, &[(0, 0), (1, 0)]);

        let lower = game.field.spawn_block(c(3, 1)).unwrap();
        let upper = game.field.spawn_block(c(3, 2)).unwrap();
        let live = game.field.assemble_piece(vec![lower, upper], c(3, 1));
        game.controllers[0].active = Some(live);

        let single = game.field.spawn_block(c(2, 0)).unwrap();
        let fragment = game.field.assemble_piece(vec![single], c(2, 0));
        game.fragments.push(fragment);

        let mut report = TickReport::default();
        game.gravity_step(&mut report);

        assert_eq!(report.rows_cleared, vec![0]);
        let piece = game.active_piece(controller).unwrap();
        assert_eq!(piece.blocks(), &[upper]);
        assert_eq!(game.field.coordinates_of(upper), Some(c(3, 1)));
        assert!(game.fragments().is_empty());
        assert!(game.field.is_consistent());
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut game = small_game(10, 4, 1);
        let controller = game.register_controller();
        game.field.spawn_block(c(4, 3)).unwrap();
        game.field.spawn_block(c(4, 2)).unwrap();

        let report = game.tick(0);
        assert!(report.game_over);
        assert!(game.is_game_over());
        assert_eq!(game.field().block_count(), 2);
        assert!(!game.submit(controller, Command::Rotate));
        assert_eq!(game.tick(500).gravity_steps, 0);
    }

    #[test]
    fn test_unregister_leaves_piece_falling() {
        let mut game = small_game(21, 35, 1);
        let a = game.register_controller();
        game.tick(0);
        let piece = game.active_piece(a).unwrap().id();

        assert!(game.unregister_controller(a));
        assert!(!game.unregister_controller(a));
        assert_eq!(game.fragments().len(), 1);
        assert_eq!(game.fragments()[0].id(), piece);
    }

    #[test]
    fn test_snapshot_lists_pieces() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.register_controller();
        game.register_controller();
        game.tick(0);

        let snap = game.snapshot();
        assert!(snap.running);
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.controllers.len(), 2);
        assert!(snap
            .controllers
            .iter()
            .all(|c| c.piece.as_ref().is_some_and(|p| p.blocks.len() == 4)));
        assert_eq!(snap.field.blocks, 8);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["controllers"][0]["id"], 0);
    }
}
