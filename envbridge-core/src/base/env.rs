//! Environment.
use super::{ArraySpec, StepType, TimeStep, TimeStepSpec};
use crate::{error::BridgeError, DType, Nest};
use anyhow::Result;
use std::fmt::Debug;

/// Represents an environment, typically an MDP.
///
/// Specs are nests of [`ArraySpec`]s. Timesteps carry integer step type codes and
/// array-valued rewards and discounts.
pub trait Environment {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Clone + Debug;

    /// Action of the environment.
    type Act;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Returns `true` if the environment simulates several episodes at once.
    fn batched(&self) -> bool {
        false
    }

    /// The number of simultaneous episodes of a batched environment.
    fn batch_size(&self) -> Option<usize> {
        None
    }

    /// Spec of observations.
    fn observation_spec(&self) -> Nest<ArraySpec>;

    /// Spec of actions.
    fn action_spec(&self) -> Nest<ArraySpec>;

    /// Spec of rewards. Defaults to a scalar float.
    fn reward_spec(&self) -> Nest<ArraySpec> {
        Nest::leaf(ArraySpec::new(vec![], DType::Float32).with_name("reward"))
    }

    /// Spec of discounts. Defaults to a scalar float in `[0, 1]`.
    fn discount_spec(&self) -> Nest<ArraySpec> {
        Nest::leaf(
            ArraySpec::scalar_bounded_unchecked(DType::Float32, 0.0, 1.0).with_name("discount"),
        )
    }

    /// Specs of all fields of the timesteps emitted by the environment.
    fn time_step_spec(&self) -> TimeStepSpec {
        TimeStepSpec {
            step_type: ArraySpec::scalar_bounded_unchecked(
                DType::Int32,
                StepType::FIRST.0 as f64,
                StepType::LAST.0 as f64,
            )
            .with_name("step_type"),
            reward: self.reward_spec(),
            discount: self.discount_spec(),
            observation: self.observation_spec(),
        }
    }

    /// Starts a new episode and returns its first timestep.
    fn reset(&mut self) -> Result<TimeStep<Self::Obs>>;

    /// Applies an action and returns the resulting timestep.
    fn step(&mut self, act: &Self::Act) -> Result<TimeStep<Self::Obs>>;

    /// The last timestep returned by [`Environment::reset`] or [`Environment::step`].
    fn current_time_step(&self) -> Option<&TimeStep<Self::Obs>> {
        None
    }

    /// Reseeds the random number generator of the environment.
    fn seed(&mut self, _seed: i64) -> Result<()> {
        Err(BridgeError::NotSupported("seed".to_string()).into())
    }

    /// Releases resources held by the environment.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
