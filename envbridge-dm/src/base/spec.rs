//! Array specs of the dm convention.
use anyhow::Result;
use envbridge_core::{error::BridgeError, Bounds, DType, Nest};
use ndarray::{arr0, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

fn out_of_spec(name: Option<&str>, msg: String) -> anyhow::Error {
    BridgeError::ValueOutOfSpec(format!("{}: {}", name.unwrap_or("<unnamed>"), msg)).into()
}

fn check_shape(name: Option<&str>, shape: &[usize], value: &ArrayD<f64>) -> Result<()> {
    if value.shape() != shape {
        return Err(out_of_spec(
            name,
            format!("expected shape {:?}, got {:?}", shape, value.shape()),
        ));
    }
    Ok(())
}

/// Spec of an array with a given shape and element type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Array {
    shape: Vec<usize>,
    dtype: DType,
    name: Option<String>,
}

impl Array {
    /// Constructs [`Array`].
    pub fn new(shape: impl Into<Vec<usize>>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
            name: None,
        }
    }

    /// Sets the name of the spec.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn with_opt_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(String::from);
        self
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

    /// Checks that `value` has the shape of the spec.
    pub fn validate(&self, value: &ArrayD<f64>) -> Result<()> {
        check_shape(self.name(), &self.shape, value)
    }

    /// Returns an array of zeros conforming to the spec.
    pub fn generate_value(&self) -> ArrayD<f64> {
        ArrayD::zeros(IxDyn(&self.shape))
    }
}

/// Spec of an array whose elements lie within inclusive bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundedArray {
    shape: Vec<usize>,
    dtype: DType,
    name: Option<String>,
    minimum: ArrayD<f64>,
    maximum: ArrayD<f64>,
}

impl BoundedArray {
    /// Constructs [`BoundedArray`].
    ///
    /// Bounds are checked with [`Bounds::new`].
    pub fn new(
        shape: impl Into<Vec<usize>>,
        dtype: DType,
        minimum: ArrayD<f64>,
        maximum: ArrayD<f64>,
    ) -> Result<Self> {
        let shape = shape.into();
        let bounds = Bounds::new(&shape, dtype, minimum, maximum)?;
        Ok(Self::from_bounds(&shape, dtype, &bounds))
    }

    /// Takes bounds already checked against `shape`.
    pub(crate) fn from_bounds(shape: &[usize], dtype: DType, bounds: &Bounds) -> Self {
        Self {
            shape: shape.to_vec(),
            dtype,
            name: None,
            minimum: bounds.minimum().clone(),
            maximum: bounds.maximum().clone(),
        }
    }

    /// Sets the name of the spec.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn with_opt_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(String::from);
        self
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

    /// Lower bound.
    pub fn minimum(&self) -> &ArrayD<f64> {
        &self.minimum
    }

    /// Upper bound.
    pub fn maximum(&self) -> &ArrayD<f64> {
        &self.maximum
    }

    /// Checks that `value` has the shape of the spec and lies within its bounds.
    pub fn validate(&self, value: &ArrayD<f64>) -> Result<()> {
        check_shape(self.name(), &self.shape, value)?;
        let dim = IxDyn(&self.shape);
        let (min, max) = match (self.minimum.broadcast(dim.clone()), self.maximum.broadcast(dim)) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(out_of_spec(self.name(), "bounds do not match shape".into())),
        };
        let inside = value
            .iter()
            .zip(min.iter().zip(max.iter()))
            .all(|(v, (lo, hi))| lo <= v && v <= hi);
        if !inside {
            return Err(out_of_spec(
                self.name(),
                format!("{} not in [{}, {}]", value, self.minimum, self.maximum),
            ));
        }
        Ok(())
    }

    /// Returns the minimum broadcast to the shape of the spec.
    pub fn generate_value(&self) -> ArrayD<f64> {
        match self.minimum.broadcast(IxDyn(&self.shape)) {
            Some(min) => min.to_owned(),
            None => ArrayD::zeros(IxDyn(&self.shape)),
        }
    }
}

/// Spec of a scalar integer taking one of `num_values` values, `0` to `num_values - 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscreteArray {
    num_values: u64,
    dtype: DType,
    name: Option<String>,
}

impl DiscreteArray {
    /// Constructs [`DiscreteArray`].
    ///
    /// Fails if `num_values` is zero or `dtype` is not an integer type.
    pub fn new(num_values: u64, dtype: DType) -> Result<Self> {
        if num_values == 0 {
            return Err(BridgeError::InvalidSpec("num_values must be positive".into()).into());
        }
        if !dtype.is_integer() {
            return Err(BridgeError::InvalidSpec(format!(
                "dtype of a discrete spec must be an integer type, got {}",
                dtype
            ))
            .into());
        }
        Ok(Self::new_unchecked(num_values, dtype))
    }

    pub(crate) fn new_unchecked(num_values: u64, dtype: DType) -> Self {
        debug_assert!(num_values > 0);
        Self {
            num_values,
            dtype,
            name: None,
        }
    }

    /// Sets the name of the spec.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn with_opt_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(String::from);
        self
    }

    /// The number of values.
    pub fn num_values(&self) -> u64 {
        self.num_values
    }

    /// Shape of the array, always scalar.
    pub fn shape(&self) -> &[usize] {
        &[]
    }

    /// Element type of the array.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Name of the spec.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lower bound, always `0`.
    pub fn minimum(&self) -> u64 {
        0
    }

    /// Upper bound, `num_values - 1`.
    pub fn maximum(&self) -> u64 {
        self.num_values.saturating_sub(1)
    }

    /// Checks that `value` is a scalar integer in `[0, num_values)`.
    pub fn validate(&self, value: &ArrayD<f64>) -> Result<()> {
        check_shape(self.name(), &[], value)?;
        let v = value.iter().next().copied().unwrap_or(f64::NAN);
        if v.fract() != 0.0 || v < 0.0 || v > self.maximum() as f64 {
            return Err(out_of_spec(
                self.name(),
                format!("{} is not an integer in [0, {})", v, self.num_values),
            ));
        }
        Ok(())
    }

    /// Returns `0` as a scalar array.
    pub fn generate_value(&self) -> ArrayD<f64> {
        arr0(0.0).into_dyn()
    }
}

/// Spec of an array-valued quantity in the dm convention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DmSpec {
    /// Unbounded array.
    Array(Array),

    /// Bounded array.
    BoundedArray(BoundedArray),

    /// Discrete scalar.
    DiscreteArray(DiscreteArray),
}

impl DmSpec {
    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        match self {
            DmSpec::Array(s) => s.shape(),
            DmSpec::BoundedArray(s) => s.shape(),
            DmSpec::DiscreteArray(s) => s.shape(),
        }
    }

    /// Element type of the array.
    pub fn dtype(&self) -> DType {
        match self {
            DmSpec::Array(s) => s.dtype(),
            DmSpec::BoundedArray(s) => s.dtype(),
            DmSpec::DiscreteArray(s) => s.dtype(),
        }
    }

    /// Name of the spec.
    pub fn name(&self) -> Option<&str> {
        match self {
            DmSpec::Array(s) => s.name(),
            DmSpec::BoundedArray(s) => s.name(),
            DmSpec::DiscreteArray(s) => s.name(),
        }
    }

    /// Returns `true` for [`DmSpec::DiscreteArray`].
    pub fn is_discrete(&self) -> bool {
        matches!(self, DmSpec::DiscreteArray(_))
    }

    /// Returns `true` for [`DmSpec::BoundedArray`] and [`DmSpec::DiscreteArray`].
    pub fn is_bounded(&self) -> bool {
        !matches!(self, DmSpec::Array(_))
    }

    /// Checks that `value` conforms to the spec.
    pub fn validate(&self, value: &ArrayD<f64>) -> Result<()> {
        match self {
            DmSpec::Array(s) => s.validate(value),
            DmSpec::BoundedArray(s) => s.validate(value),
            DmSpec::DiscreteArray(s) => s.validate(value),
        }
    }

    /// Returns a value conforming to the spec.
    pub fn generate_value(&self) -> ArrayD<f64> {
        match self {
            DmSpec::Array(s) => s.generate_value(),
            DmSpec::BoundedArray(s) => s.generate_value(),
            DmSpec::DiscreteArray(s) => s.generate_value(),
        }
    }
}

/// Checks every leaf of `value` against the corresponding leaf of `spec`.
///
/// Fails if the nests differ in structure or any leaf is out of spec.
pub fn validate_nest(spec: &Nest<DmSpec>, value: &Nest<ArrayD<f64>>) -> Result<()> {
    spec.zip_with(value, |s, v| s.validate(v))?;
    Ok(())
}
