//! Timesteps of the dm convention.
use ndarray::{arr0, ArrayD};
use serde::{Deserialize, Serialize};

/// Phase of a timestep within an episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    /// The first step of an episode.
    First,

    /// A step that is neither first nor last.
    Mid,

    /// The last step of an episode.
    Last,
}

impl StepType {
    /// Returns `true` for [`StepType::First`].
    pub fn first(&self) -> bool {
        *self == StepType::First
    }

    /// Returns `true` for [`StepType::Mid`].
    pub fn mid(&self) -> bool {
        *self == StepType::Mid
    }

    /// Returns `true` for [`StepType::Last`].
    pub fn last(&self) -> bool {
        *self == StepType::Last
    }
}

/// Result of an interaction step.
///
/// On the first step of an episode, reward is `0.0` and discount is `1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStep<O> {
    /// Phase of the step.
    pub step_type: StepType,

    /// Reward, a 0-d array for scalar rewards.
    pub reward: ArrayD<f32>,

    /// Discount, a 0-d array for scalar discounts.
    pub discount: ArrayD<f32>,

    /// Observation.
    pub observation: O,
}

impl<O> TimeStep<O> {
    /// The first step of an episode.
    pub fn restart(observation: O) -> Self {
        Self {
            step_type: StepType::First,
            reward: arr0(0f32).into_dyn(),
            discount: arr0(1f32).into_dyn(),
            observation,
        }
    }

    /// A step in the middle of an episode.
    pub fn transition(observation: O, reward: ArrayD<f32>, discount: ArrayD<f32>) -> Self {
        Self {
            step_type: StepType::Mid,
            reward,
            discount,
            observation,
        }
    }

    /// The last step of an episode ending in a terminal state.
    pub fn termination(observation: O, reward: ArrayD<f32>) -> Self {
        Self {
            step_type: StepType::Last,
            discount: ArrayD::zeros(reward.raw_dim()),
            reward,
            observation,
        }
    }

    /// The last step of an episode cut off before reaching a terminal state.
    pub fn truncation(observation: O, reward: ArrayD<f32>, discount: ArrayD<f32>) -> Self {
        Self {
            step_type: StepType::Last,
            reward,
            discount,
            observation,
        }
    }

    /// Returns `true` on the first step of an episode.
    pub fn first(&self) -> bool {
        self.step_type.first()
    }

    /// Returns `true` on a step that is neither first nor last.
    pub fn mid(&self) -> bool {
        self.step_type.mid()
    }

    /// Returns `true` on the last step of an episode.
    pub fn last(&self) -> bool {
        self.step_type.last()
    }

    /// Returns the reward if it is a scalar.
    pub fn reward_scalar(&self) -> Option<f32> {
        scalar(&self.reward)
    }

    /// Returns the discount if it is a scalar.
    pub fn discount_scalar(&self) -> Option<f32> {
        scalar(&self.discount)
    }
}

fn scalar(a: &ArrayD<f32>) -> Option<f32> {
    if a.ndim() == 0 {
        a.iter().next().copied()
    } else {
        None
    }
}
