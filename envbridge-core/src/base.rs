//! Environment convention with coded step types and nested array specs.
mod env;
mod spec;
mod step;
pub use env::Environment;
pub use spec::{ArraySpec, Bounds};
pub use step::{StepType, TimeStep, TimeStepSpec};
