use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use domino_geom::{Derived, LeftRight, Params};
use domino_planner::{Path, Planner};
use domino_protocol::Instructions;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// The bare instruction characters, as read by the controller.
    Text,
    /// Instructions along with the geometry and path that produced them.
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    params: &'a Params,
    derived: &'a Derived,
    actions: &'a Path,
    instructions: String,
    dominoes: usize,
    wheel_steps: LeftRight<i64>,
}

pub fn write(
    w: &mut impl Write,
    format: Format,
    planner: &Planner,
    prog: &Instructions,
) -> anyhow::Result<()> {
    match format {
        Format::Text => write!(w, "{prog}")?,
        Format::Json => {
            let report = Report {
                params: planner.geometry().params(),
                derived: planner.geometry().derived(),
                actions: planner.path(),
                instructions: prog.to_string(),
                dominoes: prog.drops(),
                wheel_steps: prog.wheel_steps(),
            };
            serde_json::to_writer_pretty(&mut *w, &report)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Where finalized programs end up.
pub trait Sink {
    fn finalize(&mut self, planner: &Planner, prog: &Instructions) -> anyhow::Result<()>;
}

pub struct FileSink {
    pub path: PathBuf,
    pub format: Format,
}

impl Sink for FileSink {
    fn finalize(&mut self, planner: &Planner, prog: &Instructions) -> anyhow::Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        let mut w = BufWriter::new(file);
        write(&mut w, self.format, planner, prog)?;
        w.flush()?;
        log::info!(
            "wrote {} instructions to {}",
            prog.len(),
            self.path.display()
        );
        Ok(())
    }
}
