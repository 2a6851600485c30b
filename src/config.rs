//! Parses config file
use std::{
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use std::env;

use clap::ValueEnum;
use dcc::{DecodeOptions, DescriptorLayout};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Plain,
    Packed,
}

impl From<Layout> for DescriptorLayout {
    fn from(value: Layout) -> Self {
        match value {
            Layout::Plain => DescriptorLayout::Plain,
            Layout::Packed => DescriptorLayout::Packed,
        }
    }
}

/// Unlike [`DecodeOptions::default`], the tool decodes in parallel unless
/// `parallel = false` or `--sequential` says otherwise.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub layout: Layout,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: Layout::Plain,
            parallel: true,
        }
    }
}

impl Config {
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            layout: self.layout.into(),
            parallel: self.parallel,
        }
    }
}

pub static CONFIG_FILE_NAME: &str = "dcctool.toml";

/// Parse `dcctool.toml` in the same folder as the binary.
///
/// No file there means default settings.
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path
            .parent()
            .map(|parent| parent.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    parse_config_from_file(path.as_path())
}

pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new().read(true).open(path.as_os_str())?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    parse_config_from_str(&buffer)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(s)?;

    Ok(config)
}
