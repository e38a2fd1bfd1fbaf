//! Wrapper exposing an [`Environment`] as a [`DmEnvironment`].
use crate::{
    convert::{convert_action_spec_nest, convert_spec_nest, convert_timestep},
    DmEnvironment, DmSpec, TimeStep,
};
use anyhow::Result;
use envbridge_core::{error::BridgeError, Environment, Nest};
use log::{debug, info, trace};

/// Exposes an [`Environment`] through the [`DmEnvironment`] interface.
///
/// Specs are converted once, when the wrapper is constructed. Timesteps are converted
/// with [`convert_timestep`] on every call of `reset()` and `step()`. Functionality of
/// the wrapped environment outside of [`DmEnvironment`] is available through
/// [`DmWrapper::environment`] and [`DmWrapper::environment_mut`].
///
/// ```
/// use envbridge_core::counting::{CountingEnv, CountingEnvConfig};
/// use envbridge_dm::{DmEnvironment, DmWrapper};
///
/// let config = CountingEnvConfig::default().num_actions(5);
/// let mut env = DmWrapper::<CountingEnv>::build(&config, 42).unwrap();
/// assert!(env.action_spec().flatten()[0].is_discrete());
///
/// let ts = env.reset().unwrap();
/// assert_eq!(ts.reward_scalar(), Some(0.0));
/// let ts = env.step(&3).unwrap();
/// assert_eq!(ts.reward_scalar(), Some(3.0));
/// ```
#[derive(Debug)]
pub struct DmWrapper<E: Environment> {
    env: E,
    observation_spec: Nest<DmSpec>,
    action_spec: Nest<DmSpec>,
    reward_spec: Nest<DmSpec>,
    discount_spec: Nest<DmSpec>,
}

impl<E: Environment> DmWrapper<E> {
    /// Wraps an environment.
    ///
    /// Fails with [`BridgeError::BatchedEnvironment`] if the environment is batched.
    pub fn new(env: E) -> Result<Self> {
        if env.batched() {
            return Err(BridgeError::BatchedEnvironment.into());
        }

        let observation_spec = convert_spec_nest(&env.observation_spec());
        let action_spec = convert_action_spec_nest(&env.action_spec());
        let reward_spec = convert_spec_nest(&env.reward_spec());
        let discount_spec = convert_spec_nest(&env.discount_spec());
        info!(
            "Wrap environment: {} observation leaves, {} action leaves",
            observation_spec.len(),
            action_spec.len()
        );
        debug!("Observation spec = {:?}", observation_spec);
        debug!("Action spec = {:?}", action_spec);
        debug!("Discount spec = {:?}", discount_spec);

        Ok(Self {
            env,
            observation_spec,
            action_spec,
            reward_spec,
            discount_spec,
        })
    }

    /// Builds the environment with a given random seed and wraps it.
    pub fn build(config: &E::Config, seed: i64) -> Result<Self> {
        Self::new(E::build(config, seed)?)
    }

    /// Returns the wrapped environment.
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Returns the wrapped environment mutably.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwraps the environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Environment> DmEnvironment for DmWrapper<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self) -> Result<TimeStep<Self::Obs>> {
        trace!("DmWrapper::reset()");
        convert_timestep(self.env.reset()?)
    }

    fn step(&mut self, act: &Self::Act) -> Result<TimeStep<Self::Obs>> {
        trace!("DmWrapper::step()");
        convert_timestep(self.env.step(act)?)
    }

    fn observation_spec(&self) -> &Nest<DmSpec> {
        &self.observation_spec
    }

    fn action_spec(&self) -> &Nest<DmSpec> {
        &self.action_spec
    }

    fn reward_spec(&self) -> &Nest<DmSpec> {
        &self.reward_spec
    }

    fn discount_spec(&self) -> &Nest<DmSpec> {
        &self.discount_spec
    }

    fn close(&mut self) -> Result<()> {
        self.env.close()
    }
}
