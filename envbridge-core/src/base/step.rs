//! Environment step.
use super::ArraySpec;
use crate::Nest;
use ndarray::{arr0, ArrayD};
use serde::{Deserialize, Serialize};

/// Phase of a timestep within an episode, stored as an integer code.
///
/// Only [`StepType::FIRST`], [`StepType::MID`] and [`StepType::LAST`] are meaningful.
/// Other codes can be represented so that a misbehaving environment is detected when
/// its timesteps are consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepType(pub i32);

impl StepType {
    /// The first step of an episode.
    pub const FIRST: StepType = StepType(0);

    /// A step that is neither first nor last.
    pub const MID: StepType = StepType(1);

    /// The last step of an episode.
    pub const LAST: StepType = StepType(2);

    /// Returns `true` if the code is [`StepType::FIRST`].
    pub fn is_first(&self) -> bool {
        *self == Self::FIRST
    }

    /// Returns `true` if the code is [`StepType::MID`].
    pub fn is_mid(&self) -> bool {
        *self == Self::MID
    }

    /// Returns `true` if the code is [`StepType::LAST`].
    pub fn is_last(&self) -> bool {
        *self == Self::LAST
    }
}

/// Result of an interaction step.
///
/// `reward` and `discount` are arrays. A scalar reward is often reported as an array
/// with a single element.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStep<O> {
    /// Phase of the step.
    pub step_type: StepType,

    /// Reward.
    pub reward: ArrayD<f32>,

    /// Discount.
    pub discount: ArrayD<f32>,

    /// Observation.
    pub observation: O,
}

impl<O> TimeStep<O> {
    /// Constructs a [`TimeStep`].
    pub fn new(
        step_type: StepType,
        reward: ArrayD<f32>,
        discount: ArrayD<f32>,
        observation: O,
    ) -> Self {
        Self {
            step_type,
            reward,
            discount,
            observation,
        }
    }

    /// The first step of an episode, with zero reward and unit discount.
    pub fn restart(observation: O) -> Self {
        Self::new(
            StepType::FIRST,
            arr0(0f32).into_dyn(),
            arr0(1f32).into_dyn(),
            observation,
        )
    }

    /// A step in the middle of an episode.
    pub fn transition(observation: O, reward: ArrayD<f32>, discount: ArrayD<f32>) -> Self {
        Self::new(StepType::MID, reward, discount, observation)
    }

    /// The last step of an episode ending in a terminal state. Discount is zero.
    pub fn termination(observation: O, reward: ArrayD<f32>) -> Self {
        let discount = ArrayD::zeros(reward.raw_dim());
        Self::new(StepType::LAST, reward, discount, observation)
    }

    /// The last step of an episode cut off before reaching a terminal state.
    pub fn truncation(observation: O, reward: ArrayD<f32>, discount: ArrayD<f32>) -> Self {
        Self::new(StepType::LAST, reward, discount, observation)
    }

    /// Returns `true` on the first step of an episode.
    pub fn is_first(&self) -> bool {
        self.step_type.is_first()
    }

    /// Returns `true` on a step that is neither first nor last.
    pub fn is_mid(&self) -> bool {
        self.step_type.is_mid()
    }

    /// Returns `true` on the last step of an episode.
    pub fn is_last(&self) -> bool {
        self.step_type.is_last()
    }
}

/// Specs of the fields of [`TimeStep`].
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStepSpec {
    /// Spec of the step type code.
    pub step_type: ArraySpec,

    /// Spec of the reward.
    pub reward: Nest<ArraySpec>,

    /// Spec of the discount.
    pub discount: Nest<ArraySpec>,

    /// Spec of the observation.
    pub observation: Nest<ArraySpec>,
}
