#![warn(missing_docs)]
//! An environment convention for reinforcement learning.
//!
//! An [`Environment`] describes its observations, actions, rewards and discounts with
//! nests of [`ArraySpec`]s and emits [`TimeStep`]s whose phase is an integer
//! [`StepType`] code. Rewards and discounts are arrays.
pub mod error;
pub mod counting;

mod base;
pub use base::{ArraySpec, Bounds, Environment, StepType, TimeStep, TimeStepSpec};

mod dtype;
pub use dtype::DType;

mod nest;
pub use nest::Nest;
