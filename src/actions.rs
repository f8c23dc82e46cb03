use std::fmt;

use tracing::debug;

use crate::agent::Robot;
use crate::config::{CollectConfig, RakeConfig};
use crate::environment::{Direction, Lawn};
use crate::error::Result;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Rake,
    Collect,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ActionKind::Move => "move",
            ActionKind::Rake => "rake",
            ActionKind::Collect => "collect",
        };
        f.write_str(name)
    }
}

/// One turn's worth of robot activity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Direction),
    Rake(Direction),
    Collect,
}

impl Action {
    pub fn kind(self) -> ActionKind {
        match self {
            Action::Move(_) => ActionKind::Move,
            Action::Rake(_) => ActionKind::Rake,
            Action::Collect => ActionKind::Collect,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Move(d) => write!(f, "move {}", d),
            Action::Rake(d) => write!(f, "rake {}", d),
            Action::Collect => f.write_str("collect"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rake {
    success_rate: f64,
    capacity: f64,
    rake_reward: f64,
}

impl Rake {
    pub fn new(config: &RakeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            success_rate: config.success_rate,
            capacity: config.capacity,
            rake_reward: config.reward,
        })
    }

    /// Rakes part of the robot's cell into the neighbouring cell in
    /// `direction`. Raking against the lawn edge moves nothing but is still
    /// paid for. A robot standing off `lawn` is refused without cost.
    pub fn apply(&self, robot: &mut Robot, lawn: &mut Lawn, direction: Direction) -> Result<f64>
    {
        let pos = robot.pos();
        lawn.check_contains(pos)?;

        // there is a capacity for raking
        let moved_leaves = (self.success_rate * lawn.cell(pos)).min(self.capacity);

        robot.ensure_energy(ActionKind::Rake, self.rake_reward)?;
        match lawn.neighbour(pos, direction) {
            Some(target) => {
                let realized = lawn.apply_transfer(moved_leaves, pos, target);
                debug!(from = %pos, to = %target, requested = moved_leaves, realized, "raked");
            }
            None => {
                debug!(%direction, pos = %pos, "rake blocked by lawn edge");
            }
        }
        Ok(self.reward(robot))
    }

    pub fn reward(&self, robot: &mut Robot) -> f64 {
        robot.add_energy(self.rake_reward);
        self.rake_reward
    }
}

#[derive(Debug, Clone)]
pub struct Collect {
    success_rate: f64,
    capacity: f64,
    collect_reward: (f64, f64),
}

impl Collect {
    pub fn new(config: &CollectConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            success_rate: config.success_rate,
            capacity: config.capacity,
            collect_reward: config.reward,
        })
    }

    /// Collects part of the leaves under the robot.
    pub fn apply(&self, robot: &mut Robot, lawn: &mut Lawn) -> Result<f64>
    {
        let pos = robot.pos();
        lawn.check_contains(pos)?;

        // there is a capacity for collecting
        let collected_leaves = (self.success_rate * lawn.cell(pos)).min(self.capacity);

        robot.ensure_energy(ActionKind::Collect, self.collect_reward.0)?;
        let removed = lawn.apply_removal(collected_leaves, pos);
        debug!(pos = %pos, requested = collected_leaves, removed, "collected");
        Ok(self.reward(removed, robot))
    }

    /// Collecting costs a flat amount of energy and is rewarded per leaf.
    /// Only the flat cost reaches the robot's energy.
    pub fn reward(&self, collected_leaves: f64, robot: &mut Robot) -> f64 {
        let (cost, per_leaf) = self.collect_reward;
        robot.add_energy(cost);
        cost + per_leaf * collected_leaves
    }
}
