//! A lawn covered in leaves and a robot that moves over it, rakes leaves into
//! neighbouring cells and collects them, paying for every action out of an
//! energy budget.

pub mod actions;
pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod game;
pub mod trace;

pub use actions::{Action, ActionKind, Collect, Rake};
pub use agent::Robot;
pub use config::{CollectConfig, GameConfig, LawnConfig, RakeConfig, RobotConfig};
pub use environment::{Direction, Lawn, Pos};
pub use error::{LawnError, Result};
pub use game::{Game, Step};
pub use trace::{write_trace, write_trace_to_path, StepSample};
