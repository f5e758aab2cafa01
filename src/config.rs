//! TOML configuration.
//!
//! ```toml
//! [boundaries]
//! sls = "data/5271sls.geojson"
//! lingkungan = "data/boundaries_lingkungan.geojson"
//! kelurahan = "data/boundaries_kelurahan.geojson"
//!
//! [survey]
//! source = "https://docs.google.com/spreadsheets/d/<id>/export?format=csv&gid=<gid>"
//! column = "SLS"
//!
//! [server]
//! listen = "0.0.0.0:3000"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::coverage::SurveySource;
use crate::models::Tier;
use crate::pip::BoundarySources;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub boundaries: BoundaryConfig,
    pub survey: SurveyConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoundaryConfig {
    pub sls: Option<PathBuf>,
    pub lingkungan: Option<PathBuf>,
    pub kelurahan: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SurveyConfig {
    /// URL or local path of the survey CSV
    pub source: Option<String>,
    /// Force a name column instead of the SLS/second/first fallback
    pub column: Option<String>,
}

impl SurveyConfig {
    /// URLs are left alone; a relative file path is joined onto `base`
    fn resolve_relative_to(&mut self, base: &Path) {
        let Some(source) = &mut self.source else {
            return;
        };
        if let SurveySource::Path(path) = SurveySource::from(source.as_str()) {
            if path.is_relative() {
                *source = base.join(path).to_string_lossy().into_owned();
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("data"))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl BoundaryConfig {
    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            sls: Some(dir.join("5271sls.geojson")),
            lingkungan: Some(dir.join("boundaries_lingkungan.geojson")),
            kelurahan: Some(dir.join("boundaries_kelurahan.geojson")),
        }
    }

    pub fn path(&self, tier: Tier) -> Option<&PathBuf> {
        match tier {
            Tier::Sls => self.sls.as_ref(),
            Tier::Lingkungan => self.lingkungan.as_ref(),
            Tier::Kelurahan => self.kelurahan.as_ref(),
        }
    }

    pub fn sources(&self) -> BoundarySources {
        Tier::all()
            .iter()
            .filter_map(|tier| Some((*tier, self.path(*tier)?.clone())))
            .fold(BoundarySources::new(), |sources, (tier, path)| sources.with(tier, path))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.sls, &mut self.lingkungan, &mut self.kelurahan]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl Config {
    /// Relative boundary and survey paths are taken relative to the config file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.boundaries.resolve_relative_to(base);
            config.survey.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Config from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}
