use std::{fmt::Write, path::PathBuf};

use crate::modules::inspect::frame_cells;

use super::*;

pub struct Cells {
    pub path: PathBuf,
    pub direction: usize,
    pub frame: usize,
    pub json: bool,
}

impl Cells {
    fn run(&self, config: &Config) -> eyre::Result<String> {
        let cells = frame_cells(
            &self.path,
            self.direction,
            self.frame,
            config.decode_options(),
        )?;

        if self.json {
            return Ok(serde_json::to_string_pretty(&cells)?);
        }

        let mut out = String::new();

        for (index, cell) in cells.iter().enumerate() {
            writeln!(
                out,
                "cell {}: {}x{} at ({}, {})",
                index, cell.width, cell.height, cell.x_offset, cell.y_offset
            )?;
        }

        Ok(out)
    }
}

impl Cli for Cells {
    fn cli(&self, config: &Config) -> CliRes {
        match self.run(config) {
            Ok(out) => {
                print!("{}", out);
                CliRes::Ok
            }
            Err(err) => {
                eprintln!("{}", err);
                CliRes::Err
            }
        }
    }
}
