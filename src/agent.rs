use tracing::{debug, info, warn};

use crate::actions::ActionKind;
use crate::config::RobotConfig;
use crate::environment::{Direction, Lawn, Pos};
use crate::error::{LawnError, Result};

#[derive(Debug, Clone)]
pub struct Robot {
    pos: Pos,
    x_lim: (usize, usize),
    y_lim: (usize, usize),
    energy: f64,
    move_reward: f64,
}

impl Robot {
    /// Places the robot on `lawn`. Fails if the start is off the lawn.
    pub fn new(config: &RobotConfig, lawn: &Lawn) -> Result<Self>
    {
        config.validate()?;
        let (m, n) = (lawn.width(), lawn.height());
        let out_of_bounds = || LawnError::PositionOutOfBounds {
            x: config.init_x,
            y: config.init_y,
            m,
            n,
        };
        if config.init_x < 0 || config.init_y < 0 {
            return Err(out_of_bounds());
        }
        let pos = Pos::new(config.init_x as usize, config.init_y as usize);
        if !lawn.contains(pos) {
            return Err(out_of_bounds());
        }

        Ok(Self {
            pos,
            x_lim: (0, m - 1),
            y_lim: (0, n - 1),
            energy: config.initial_energy,
            move_reward: config.move_reward,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn move_reward(&self) -> f64 {
        self.move_reward
    }

    pub fn whereis(&self) -> Pos {
        info!("robot is at {}, {}", self.pos.x, self.pos.y);
        self.pos
    }

    /// Adjacent cell in `direction`, or `None` at the lawn edge.
    pub fn neighbour(&self, direction: Direction) -> Option<Pos>
    {
        let (dx, dy) = direction.into_vector();
        let x = self.pos.x as isize + dx;
        let y = self.pos.y as isize + dy;
        if x < self.x_lim.0 as isize || x > self.x_lim.1 as isize {
            return None;
        }
        if y < self.y_lim.0 as isize || y > self.y_lim.1 as isize {
            return None;
        }
        Some(Pos::new(x as usize, y as usize))
    }

    /// Fails unless the robot has strictly more energy than `|cost|`.
    pub fn ensure_energy(&self, action: ActionKind, cost: f64) -> Result<()>
    {
        if self.energy > cost.abs() {
            Ok(())
        } else {
            warn!(%action, energy = self.energy, cost, "robot has no energy");
            Err(LawnError::EnergyExhausted {
                action,
                energy: self.energy,
                cost,
            })
        }
    }

    /// Moves one cell. A move into the lawn edge leaves the robot in place
    /// but still costs `move_reward`.
    pub fn r#move(&mut self, direction: Direction) -> Result<f64>
    {
        self.ensure_energy(ActionKind::Move, self.move_reward)?;
        if let Some(pos) = self.neighbour(direction) {
            self.pos = pos;
        } else {
            debug!(%direction, pos = %self.pos, "move blocked by lawn edge");
        }
        Ok(self.reward())
    }

    pub fn reward(&mut self) -> f64 {
        self.energy += self.move_reward;
        self.move_reward
    }

    pub(crate) fn add_energy(&mut self, delta: f64) {
        self.energy += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn lawn(m: usize, n: usize) -> Lawn {
        Lawn::from_cells(Array2::zeros((m, n)), 10.0, false).unwrap()
    }

    fn robot(x: i64, y: i64, energy: f64) -> Robot {
        let config = RobotConfig {
            init_x: x,
            init_y: y,
            move_reward: -1.0,
            initial_energy: energy,
        };
        Robot::new(&config, &lawn(3, 3)).unwrap()
    }

    #[test]
    fn move_up_changes_position_and_energy() {
        let mut robot = robot(1, 1, 10.0);
        assert_eq!(robot.r#move(Direction::Up).unwrap(), -1.0);
        assert_eq!(robot.pos(), Pos::new(1, 2));
        assert_eq!(robot.energy(), 9.0);
    }

    #[test]
    fn each_direction_follows_the_encoding() {
        let mut robot = robot(1, 1, 10.0);
        robot.r#move(Direction::Down).unwrap();
        assert_eq!(robot.pos(), Pos::new(1, 0));
        robot.r#move(Direction::Left).unwrap();
        assert_eq!(robot.pos(), Pos::new(0, 0));
        robot.r#move(Direction::Right).unwrap();
        assert_eq!(robot.pos(), Pos::new(1, 0));
    }

    #[test]
    fn blocked_move_still_costs_energy() {
        let mut robot = robot(0, 0, 10.0);
        assert_eq!(robot.r#move(Direction::Left).unwrap(), -1.0);
        assert_eq!(robot.r#move(Direction::Down).unwrap(), -1.0);
        assert_eq!(robot.pos(), Pos::new(0, 0));
        assert_eq!(robot.energy(), 8.0);

        let mut robot = self::robot(2, 2, 10.0);
        robot.r#move(Direction::Right).unwrap();
        robot.r#move(Direction::Up).unwrap();
        assert_eq!(robot.pos(), Pos::new(2, 2));
    }

    #[test]
    fn exhausted_robot_does_not_move() {
        let mut robot = robot(1, 1, 0.0);
        match robot.r#move(Direction::Up) {
            Err(LawnError::EnergyExhausted { action, .. }) => assert_eq!(action, ActionKind::Move),
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(robot.pos(), Pos::new(1, 1));
        assert_eq!(robot.energy(), 0.0);
    }

    #[test]
    fn energy_equal_to_cost_is_not_enough() {
        let mut robot = robot(1, 1, 1.0);
        assert!(robot.r#move(Direction::Up).is_err());
    }

    #[test]
    fn start_outside_lawn_is_rejected() {
        for &(x, y) in [(3, 0), (0, 3), (-1, 0), (0, -1)].iter() {
            let config = RobotConfig {
                init_x: x,
                init_y: y,
                move_reward: -1.0,
                initial_energy: 10.0,
            };
            match Robot::new(&config, &lawn(3, 3)) {
                Err(LawnError::PositionOutOfBounds { m: 3, n: 3, .. }) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("({}, {}) should be rejected", x, y),
            }
        }
    }
}
