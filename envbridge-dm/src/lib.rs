#![warn(missing_docs)]
//! Exposes [`envbridge_core`] environments through the dm environment convention.
//!
//! The two conventions describe the same things with different types:
//!
//! * Step types are integer codes in [`envbridge_core::StepType`] and an enum,
//!   [`StepType`], here.
//! * Rewards and discounts are arrays in [`envbridge_core::TimeStep`], often with a
//!   single element. Here, length-one axes are removed, and the first step of an
//!   episode always has reward `0.0` and discount `1.0`.
//! * A bounded [`envbridge_core::ArraySpec`] becomes a [`BoundedArray`], an unbounded one
//!   an [`Array`]. Bounded scalar integer action specs starting at zero become
//!   [`DiscreteArray`]s.
//!
//! [`DmWrapper`] applies these conversions to a wrapped [`envbridge_core::Environment`].
//! The conversion functions are available in [`convert`].
//!
//! Batched environments are not supported.
mod base;
pub mod convert;
mod wrapper;
pub use base::{
    validate_nest, Array, BoundedArray, DiscreteArray, DmEnvironment, DmSpec, StepType, TimeStep,
};
pub use wrapper::DmWrapper;
