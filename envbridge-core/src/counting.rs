//! A deterministic toy environment.
mod config;
use crate::{error::BridgeError, ArraySpec, DType, Environment, Nest, TimeStep};
use anyhow::Result;
pub use config::CountingEnvConfig;
use log::{info, trace};
use ndarray::{arr1, ArrayD};

/// An environment that counts its steps.
///
/// The observation is an array of `obs_dim` elements, all set to the number of steps
/// taken in the current episode. An action is an integer in `[0, num_actions)` and the
/// reward is the action itself, reported as an array with a single element. An episode
/// ends after `episode_length` steps. Stepping after the end of an episode, or before
/// the first reset, starts a new episode.
#[derive(Debug)]
pub struct CountingEnv {
    config: CountingEnvConfig,
    observation_spec: Nest<ArraySpec>,
    action_spec: Nest<ArraySpec>,
    discount_spec: Nest<ArraySpec>,
    count: usize,
    current: Option<TimeStep<ArrayD<f32>>>,
    seed: i64,
    closed: bool,
}

impl CountingEnv {
    /// The seed given at the last call of [`Environment::build`] or [`Environment::seed`].
    pub fn current_seed(&self) -> i64 {
        self.seed
    }

    /// Returns `true` after [`Environment::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn observation(&self) -> ArrayD<f32> {
        ArrayD::from_elem(vec![self.config.obs_dim], self.count as f32)
    }
}

impl Environment for CountingEnv {
    type Config = CountingEnvConfig;
    type Obs = ArrayD<f32>;
    type Act = i64;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.episode_length == 0 {
            return Err(BridgeError::InvalidSpec("episode_length must be positive".into()).into());
        }
        if config.num_actions < 1 {
            return Err(BridgeError::InvalidSpec("num_actions must be positive".into()).into());
        }
        info!("Build CountingEnv");

        let observation_spec = ArraySpec::bounded(
            vec![config.obs_dim],
            DType::Float32,
            0.0,
            config.episode_length as f64,
        )?
        .with_name("count");
        let action_spec =
            ArraySpec::bounded(vec![], DType::Int64, 0.0, (config.num_actions - 1) as f64)?
                .with_name("action");
        let discount_spec =
            ArraySpec::bounded(vec![1], DType::Float32, 0.0, 1.0)?.with_name("discount");

        Ok(Self {
            config: config.clone(),
            observation_spec: Nest::leaf(observation_spec),
            action_spec: Nest::leaf(action_spec),
            discount_spec: Nest::leaf(discount_spec),
            count: 0,
            current: None,
            seed,
            closed: false,
        })
    }

    fn batched(&self) -> bool {
        self.config.batched
    }

    fn batch_size(&self) -> Option<usize> {
        if self.config.batched {
            Some(1)
        } else {
            None
        }
    }

    fn observation_spec(&self) -> Nest<ArraySpec> {
        self.observation_spec.clone()
    }

    fn action_spec(&self) -> Nest<ArraySpec> {
        self.action_spec.clone()
    }

    fn reward_spec(&self) -> Nest<ArraySpec> {
        Nest::leaf(ArraySpec::new(vec![1], DType::Float32).with_name("reward"))
    }

    fn discount_spec(&self) -> Nest<ArraySpec> {
        self.discount_spec.clone()
    }

    fn reset(&mut self) -> Result<TimeStep<Self::Obs>> {
        trace!("CountingEnv::reset()");
        self.count = 0;
        let ts = TimeStep::restart(self.observation());
        self.current = Some(ts.clone());
        Ok(ts)
    }

    fn step(&mut self, act: &Self::Act) -> Result<TimeStep<Self::Obs>> {
        trace!("CountingEnv::step()");
        match &self.current {
            Some(ts) if !ts.is_last() => {}
            _ => return self.reset(),
        }
        if *act < 0 || *act >= self.config.num_actions {
            return Err(BridgeError::ValueOutOfSpec(format!(
                "action {} not in [0, {})",
                act, self.config.num_actions
            ))
            .into());
        }

        self.count += 1;
        let reward = arr1(&[*act as f32]).into_dyn();
        let ts = if self.count >= self.config.episode_length {
            TimeStep::termination(self.observation(), reward)
        } else {
            TimeStep::transition(self.observation(), reward, arr1(&[1f32]).into_dyn())
        };
        self.current = Some(ts.clone());
        Ok(ts)
    }

    fn current_time_step(&self) -> Option<&TimeStep<Self::Obs>> {
        self.current.as_ref()
    }

    fn seed(&mut self, seed: i64) -> Result<()> {
        self.seed = seed;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        info!("Close CountingEnv");
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode() -> Result<()> {
        let config = CountingEnvConfig::default().episode_length(2).obs_dim(3);
        let mut env = CountingEnv::build(&config, 42)?;

        let ts = env.reset()?;
        assert!(ts.is_first());
        assert_eq!(ts.observation, ArrayD::from_elem(vec![3], 0f32));

        let ts = env.step(&1)?;
        assert!(ts.is_mid());
        assert_eq!(ts.reward, arr1(&[1f32]).into_dyn());
        assert_eq!(ts.discount, arr1(&[1f32]).into_dyn());

        let ts = env.step(&0)?;
        assert!(ts.is_last());
        assert_eq!(ts.discount, arr1(&[0f32]).into_dyn());
        assert_eq!(ts.observation, ArrayD::from_elem(vec![3], 2f32));

        // Stepping past the end starts a new episode.
        let ts = env.step(&1)?;
        assert!(ts.is_first());
        assert_eq!(env.current_time_step(), Some(&ts));
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = CountingEnv::build(&CountingEnvConfig::default(), 0)?;
        env.reset()?;
        let err = env.step(&2).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BridgeError>(),
            Some(BridgeError::ValueOutOfSpec(_))
        ));
        Ok(())
    }

    #[test]
    fn test_batched_flag() -> Result<()> {
        let env = CountingEnv::build(&CountingEnvConfig::default(), 0)?;
        assert!(!env.batched());
        assert_eq!(env.batch_size(), None);

        let env = CountingEnv::build(&CountingEnvConfig::default().batched(true), 0)?;
        assert!(env.batched());
        assert_eq!(env.batch_size(), Some(1));
        Ok(())
    }

    #[test]
    fn test_build_rejects_empty_action_set() {
        let config = CountingEnvConfig::default().num_actions(0);
        assert!(CountingEnv::build(&config, 0).is_err());
    }

    #[test]
    fn test_time_step_spec() -> Result<()> {
        let env = CountingEnv::build(&CountingEnvConfig::default(), 0)?;
        let spec = env.time_step_spec();
        assert_eq!(spec.step_type.dtype(), DType::Int32);
        assert_eq!(spec.reward.as_leaf().map(|s| s.shape()), Some(&[1usize][..]));
        assert_eq!(spec.observation, env.observation_spec());
        Ok(())
    }
}
