use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::actions::Action;
use crate::environment::Pos;
use crate::error::Result;

/// One recorded turn, written as a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSample {
    pub turn: usize,
    pub action: String,
    pub start_x: usize,
    pub start_y: usize,
    pub end_x: usize,
    pub end_y: usize,
    pub reward: f64,
    pub energy: f64,
    pub leaves_on_lawn: f64,
}

impl StepSample {
    pub fn new(turn: usize, action: Action, start: Pos, end: Pos, reward: f64, energy: f64, leaves_on_lawn: f64) -> Self {
        Self {
            turn,
            action: action.to_string(),
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
            reward,
            energy,
            leaves_on_lawn,
        }
    }
}

pub fn write_trace<W: Write>(samples: &[StepSample], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for sample in samples {
        wtr.serialize(sample)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_trace_to_path<P: AsRef<Path>>(samples: &[StepSample], path: P) -> Result<()> {
    let file = File::create(path)?;
    write_trace(samples, file)
}
