use std::path::PathBuf;

use crate::modules::inspect::inspect;

use super::*;

pub struct Inspect {
    pub path: PathBuf,
    pub json: bool,
}

impl Inspect {
    fn run(&self, config: &Config) -> eyre::Result<String> {
        let report = inspect(&self.path, config.decode_options())?;

        let out = if self.json {
            serde_json::to_string_pretty(&report)?
        } else {
            report.to_text()?
        };

        Ok(out)
    }
}

impl Cli for Inspect {
    fn cli(&self, config: &Config) -> CliRes {
        match self.run(config) {
            Ok(out) => {
                println!("{}", out);
                CliRes::Ok
            }
            Err(err) => {
                eprintln!("{}", err);
                CliRes::Err
            }
        }
    }
}
