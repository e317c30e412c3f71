use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub count: Option<usize>,
    pub dupe_percent: Option<u32>,
    pub top_dirs: Option<u32>,
    pub fanout: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
}

impl Config {
    /// Load config from dupegen_options.yaml, checking CWD first then exe dir.
    pub fn load() -> Result<Self> {
        let candidates = config_candidates();
        for path in &candidates {
            if path.exists() {
                let text = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&text)?;
                return Ok(config);
            }
        }
        Ok(Config::default())
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let filename = "dupegen_options.yaml";
    let mut candidates = vec![PathBuf::from(filename)];
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(filename));
        }
    }
    candidates
}
