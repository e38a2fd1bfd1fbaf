//! Environment of the dm convention.
use super::{DmSpec, TimeStep};
use anyhow::Result;
use envbridge_core::Nest;

/// An environment in the dm convention.
///
/// Specs are fixed for the lifetime of an environment, so they are returned by
/// reference.
pub trait DmEnvironment {
    /// Observation of the environment.
    type Obs;

    /// Action of the environment.
    type Act;

    /// Starts a new episode and returns its first timestep.
    fn reset(&mut self) -> Result<TimeStep<Self::Obs>>;

    /// Applies an action and returns the resulting timestep.
    fn step(&mut self, act: &Self::Act) -> Result<TimeStep<Self::Obs>>;

    /// Spec of observations.
    fn observation_spec(&self) -> &Nest<DmSpec>;

    /// Spec of actions.
    fn action_spec(&self) -> &Nest<DmSpec>;

    /// Spec of rewards.
    fn reward_spec(&self) -> &Nest<DmSpec>;

    /// Spec of discounts.
    fn discount_spec(&self) -> &Nest<DmSpec>;

    /// Releases resources held by the environment.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
