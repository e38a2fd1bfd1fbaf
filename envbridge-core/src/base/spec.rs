//! Array specs.
use crate::{error::BridgeError, DType};
use anyhow::Result;
use ndarray::{arr0, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

/// Inclusive bounds of a [`ArraySpec`].
///
/// Each bound is either a 0-d array, applied to all elements, or an array with the
/// shape of the spec.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    minimum: ArrayD<f64>,
    maximum: ArrayD<f64>,
}

impl Bounds {
    /// Checks bounds against the shape and element type of a spec.
    ///
    /// Fails if a bound can not be broadcast to `shape`, is not finite, is fractional
    /// for an integer `dtype`, or a minimum exceeds the corresponding maximum.
    pub fn new(
        shape: &[usize],
        dtype: DType,
        minimum: ArrayD<f64>,
        maximum: ArrayD<f64>,
    ) -> Result<Self> {
        let dim = IxDyn(shape);
        let (min, max) = match (minimum.broadcast(dim.clone()), maximum.broadcast(dim)) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                return Err(BridgeError::InvalidSpec(format!(
                    "bounds with shapes {:?} and {:?} do not match spec shape {:?}",
                    minimum.shape(),
                    maximum.shape(),
                    shape
                ))
                .into())
            }
        };
        if min.iter().chain(max.iter()).any(|b| !b.is_finite()) {
            return Err(BridgeError::InvalidSpec(format!(
                "bounds {} and {} must be finite",
                minimum, maximum
            ))
            .into());
        }
        if dtype.is_integer() && min.iter().chain(max.iter()).any(|b| b.fract() != 0.0) {
            return Err(BridgeError::InvalidSpec(format!(
                "bounds {} and {} of a {} spec must be integers",
                minimum, maximum, dtype
            ))
            .into());
        }
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo > hi) {
            return Err(BridgeError::InvalidSpec(format!(
                "minimum {} exceeds maximum {}",
                minimum, maximum
            ))
            .into());
        }

        Ok(Self { minimum, maximum })
    }

    /// Lower bound.
    pub fn minimum(&self) -> &ArrayD<f64> {
        &self.minimum
    }

    /// Upper bound.
    pub fn maximum(&self) -> &ArrayD<f64> {
        &self.maximum
    }

    fn contains(&self, value: &ArrayD<f64>) -> bool {
        let shape = IxDyn(value.shape());
        match (self.minimum.broadcast(shape.clone()), self.maximum.broadcast(shape)) {
            (Some(min), Some(max)) => value
                .iter()
                .zip(min.iter().zip(max.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi),
            _ => false,
        }
    }
}

/// Describes shape, element type and optionally bounds of an array.
///
/// A spec with bounds corresponds to a bounded array spec, a spec without bounds to a
/// plain one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArraySpec {
    shape: Vec<usize>,
    dtype: DType,
    name: Option<String>,
    bounds: Option<Bounds>,
}

impl ArraySpec {
    /// Constructs an unbounded spec.
    pub fn new(shape: impl Into<Vec<usize>>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
            name: None,
            bounds: None,
        }
    }

    /// Constructs a bounded spec whose bounds apply to all elements.
    pub fn bounded(
        shape: impl Into<Vec<usize>>,
        dtype: DType,
        minimum: f64,
        maximum: f64,
    ) -> Result<Self> {
        Self::bounded_array(shape, dtype, arr0(minimum).into_dyn(), arr0(maximum).into_dyn())
    }

    /// Constructs a bounded spec with per-element bounds.
    ///
    /// Bounds are checked with [`Bounds::new`].
    pub fn bounded_array(
        shape: impl Into<Vec<usize>>,
        dtype: DType,
        minimum: ArrayD<f64>,
        maximum: ArrayD<f64>,
    ) -> Result<Self> {
        let shape = shape.into();
        let bounds = Bounds::new(&shape, dtype, minimum, maximum)?;

        Ok(Self {
            shape,
            dtype,
            name: None,
            bounds: Some(bounds),
        })
    }

    /// Sets the name of the spec.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn scalar_bounded_unchecked(dtype: DType, minimum: f64, maximum: f64) -> Self {
        Self {
            shape: vec![],
            dtype,
            name: None,
            bounds: Some(Bounds {
                minimum: arr0(minimum).into_dyn(),
                maximum: arr0(maximum).into_dyn(),
            }),
        }
    }

    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element type of the array.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Name of the spec.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Bounds of the spec, if any.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    /// Lower bound, if the spec is bounded.
    pub fn minimum(&self) -> Option<&ArrayD<f64>> {
        self.bounds.as_ref().map(|b| b.minimum())
    }

    /// Upper bound, if the spec is bounded.
    pub fn maximum(&self) -> Option<&ArrayD<f64>> {
        self.bounds.as_ref().map(|b| b.maximum())
    }

    /// Returns `true` if the spec has bounds.
    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }

    /// Returns `true` if the array is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Returns `true` if the elements are integers.
    pub fn is_integer(&self) -> bool {
        self.dtype.is_integer()
    }

    /// Returns `true` if `value` has the shape of the spec and lies within its bounds.
    pub fn check_array(&self, value: &ArrayD<f64>) -> bool {
        if value.shape() != self.shape.as_slice() {
            return false;
        }
        match &self.bounds {
            Some(bounds) => bounds.contains(value),
            None => true,
        }
    }
}
