//! Configuration of [`CountingEnv`](super::CountingEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`CountingEnv`](super::CountingEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CountingEnvConfig {
    /// The number of steps after the first one in an episode.
    pub episode_length: usize,

    /// The number of available actions.
    pub num_actions: i64,

    /// The number of elements of an observation.
    pub obs_dim: usize,

    /// If `true`, the environment reports itself as batched.
    pub batched: bool,
}

impl Default for CountingEnvConfig {
    fn default() -> Self {
        Self {
            episode_length: 3,
            num_actions: 2,
            obs_dim: 1,
            batched: false,
        }
    }
}

impl CountingEnvConfig {
    /// Sets the number of steps in an episode.
    pub fn episode_length(mut self, v: usize) -> Self {
        self.episode_length = v;
        self
    }

    /// Sets the number of available actions.
    pub fn num_actions(mut self, v: i64) -> Self {
        self.num_actions = v;
        self
    }

    /// Sets the number of elements of an observation.
    pub fn obs_dim(mut self, v: usize) -> Self {
        self.obs_dim = v;
        self
    }

    /// Sets the batched flag.
    pub fn batched(mut self, v: bool) -> Self {
        self.batched = v;
        self
    }

    /// Constructs [`CountingEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CountingEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
