use std::mem;

use rand::{rngs::StdRng, FromEntropy, Rng, SeedableRng};
use tracing::{debug, info};

use crate::actions::{Action, Collect, Rake};
use crate::agent::Robot;
use crate::config::GameConfig;
use crate::environment::{Lawn, Pos};
use crate::error::Result;
use crate::trace::StepSample;

/// Outcome of one successful turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub turn: usize,
    pub action: Action,
    pub reward: f64,
    pub energy: f64,
    pub pos: Pos,
}

/// A lawn, the robot on it and its two tools, driven one action per turn.
pub struct Game {
    lawn: Lawn,
    robot: Robot,
    rake: Rake,
    collect: Collect,
    turn: usize,
    total_reward: f64,
    trace: Vec<StepSample>,
}

impl Game {
    /// Seeds the lawn from `rng_seed` when the config has one, from entropy
    /// otherwise.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let lawn = Lawn::new(&config.lawn(), rng)?;
        let robot = Robot::new(&config.robot(), &lawn)?;
        let rake = Rake::new(&config.rake())?;
        let collect = Collect::new(&config.collect())?;
        info!(
            m = lawn.width(),
            n = lawn.height(),
            leaves = lawn.total_leaves(),
            energy = robot.energy(),
            "game ready"
        );

        Ok(Self {
            lawn,
            robot,
            rake,
            collect,
            turn: 0,
            total_reward: 0.0,
            trace: Vec::new(),
        })
    }

    /// Applies `action`. A failed energy check leaves the game untouched.
    pub fn step(&mut self, action: Action) -> Result<Step> {
        let start = self.robot.pos();
        let reward = match action {
            Action::Move(direction) => self.robot.r#move(direction)?,
            Action::Rake(direction) => self.rake.apply(&mut self.robot, &mut self.lawn, direction)?,
            Action::Collect => self.collect.apply(&mut self.robot, &mut self.lawn)?,
        };

        self.turn += 1;
        self.total_reward += reward;
        let end = self.robot.pos();
        let energy = self.robot.energy();
        self.trace.push(StepSample::new(
            self.turn,
            action,
            start,
            end,
            reward,
            energy,
            self.lawn.total_leaves(),
        ));
        debug!(turn = self.turn, %action, reward, energy, pos = %end, "step");

        Ok(Step {
            turn: self.turn,
            action,
            reward,
            energy,
            pos: end,
        })
    }

    pub fn lawn(&self) -> &Lawn {
        &self.lawn
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Every step since the game started, or since the last `take_trace`.
    /// The trace is kept in memory until taken.
    pub fn trace(&self) -> &[StepSample] {
        &self.trace
    }

    /// Hands over the recorded steps and starts a fresh trace.
    pub fn take_trace(&mut self) -> Vec<StepSample> {
        mem::replace(&mut self.trace, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Direction;

    fn config() -> GameConfig {
        GameConfig {
            m: 3,
            n: 3,
            cell_capacity: 10.0,
            initial_seed: 5.0,
            init_x: 1,
            init_y: 1,
            initial_energy: 10.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn steps_accumulate_reward_and_trace() {
        let mut game = Game::new(&config()).unwrap();
        let step = game.step(Action::Move(Direction::Up)).unwrap();
        assert_eq!(step.turn, 1);
        assert_eq!(step.pos, Pos::new(1, 2));
        game.step(Action::Collect).unwrap();

        assert_eq!(game.turn(), 2);
        // move -1, collect -1 + 2 * min(0.9 * 5, 4)
        assert_eq!(game.total_reward(), -1.0 + 7.0);
        assert_eq!(game.trace().len(), 2);
        assert_eq!(game.trace()[1].action, "collect");
        assert_eq!(game.lawn().cell(Pos::new(1, 2)), 1.0);
        assert_eq!(game.robot().energy(), 8.0);
    }

    #[test]
    fn exhaustion_is_not_recorded() {
        let mut config = config();
        config.initial_energy = 1.5;
        let mut game = Game::new(&config).unwrap();
        game.step(Action::Move(Direction::Left)).unwrap();

        let err = game.step(Action::Rake(Direction::Right)).unwrap_err();
        assert!(err.is_exhaustion());
        assert_eq!(game.turn(), 1);
        assert_eq!(game.trace().len(), 1);
        assert_eq!(game.robot().energy(), 0.5);
    }

    #[test]
    fn taking_the_trace_starts_a_new_one() {
        let mut game = Game::new(&config()).unwrap();
        game.step(Action::Move(Direction::Up)).unwrap();
        game.step(Action::Move(Direction::Down)).unwrap();

        let taken = game.take_trace();
        assert_eq!(taken.len(), 2);
        assert!(game.trace().is_empty());

        game.step(Action::Collect).unwrap();
        assert_eq!(game.trace().len(), 1);
        assert_eq!(game.trace()[0].turn, 3);
    }

    #[test]
    fn seeded_games_share_a_lawn() {
        let mut config = config();
        config.random_seed = true;
        config.rng_seed = Some(11);
        let a = Game::new(&config).unwrap();
        let b = Game::new(&config).unwrap();
        assert_eq!(a.lawn().cells(), b.lawn().cells());
    }

    #[test]
    fn start_off_the_lawn_fails_construction() {
        let mut config = config();
        config.init_y = 3;
        assert!(Game::new(&config).is_err());
    }
}
