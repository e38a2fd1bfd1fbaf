//! The dm environment convention.
mod env;
mod spec;
mod step;
pub use env::DmEnvironment;
pub use spec::{validate_nest, Array, BoundedArray, DiscreteArray, DmSpec};
pub use step::{StepType, TimeStep};
