//! Conversion of timesteps and specs into the dm convention.
use crate::{BoundedArray, DiscreteArray, DmSpec, StepType, TimeStep};
use anyhow::Result;
use envbridge_core::{error::BridgeError, ArraySpec, Nest};
use log::warn;
use ndarray::{arr0, ArrayD, Axis};

/// Removes all axes of length one.
///
/// A scalar wrapped in an array of any number of length-one axes becomes a 0-d array.
/// Other axes are kept.
pub fn squeeze<A>(mut a: ArrayD<A>) -> ArrayD<A> {
    for axis in (0..a.ndim()).rev() {
        if a.shape()[axis] == 1 {
            a = a.index_axis_move(Axis(axis), 0);
        }
    }
    a
}

/// Converts a timestep into the dm convention.
///
/// The first step of an episode gets reward `0.0` and discount `1.0` regardless of the
/// given values. Otherwise reward and discount are squeezed with [`squeeze`]. The
/// observation is moved as is.
///
/// Fails with [`BridgeError::InvalidStepType`] if the step type code is not one of
/// first, mid and last.
pub fn convert_timestep<O>(timestep: envbridge_core::TimeStep<O>) -> Result<TimeStep<O>> {
    let step_type = if timestep.is_first() {
        StepType::First
    } else if timestep.is_last() {
        StepType::Last
    } else if timestep.is_mid() {
        StepType::Mid
    } else {
        warn!("Invalid step type: {}", timestep.step_type.0);
        return Err(BridgeError::InvalidStepType(timestep.step_type.0).into());
    };

    let (reward, discount) = match step_type {
        StepType::First => (arr0(0f32).into_dyn(), arr0(1f32).into_dyn()),
        _ => (squeeze(timestep.reward), squeeze(timestep.discount)),
    };

    Ok(TimeStep {
        step_type,
        reward,
        discount,
        observation: timestep.observation,
    })
}

/// Converts a spec into a [`DmSpec::BoundedArray`] if it has bounds, otherwise into a
/// [`DmSpec::Array`].
pub fn convert_spec(spec: &ArraySpec) -> DmSpec {
    match spec.bounds() {
        Some(bounds) => DmSpec::BoundedArray(
            BoundedArray::from_bounds(spec.shape(), spec.dtype(), bounds)
                .with_opt_name(spec.name()),
        ),
        None => DmSpec::Array(
            crate::Array::new(spec.shape(), spec.dtype()).with_opt_name(spec.name()),
        ),
    }
}

/// Converts an action spec.
///
/// A bounded scalar integer spec with minimum `0` becomes a [`DmSpec::DiscreteArray`]
/// with `maximum + 1` values. Other specs are converted with [`convert_spec`].
pub fn convert_action_spec(spec: &ArraySpec) -> DmSpec {
    if let (Some(min), Some(max)) = (spec.minimum(), spec.maximum()) {
        if spec.is_scalar() && spec.is_integer() && min.len() == 1 && max.len() == 1 {
            let lo = min.iter().next().copied().unwrap_or(f64::NAN);
            let hi = max.iter().next().copied().unwrap_or(f64::NAN);
            // Bounds built by `ArraySpec` are finite integers with `lo <= hi`.
            if lo == 0.0 && hi.is_finite() && hi.fract() == 0.0 && hi >= lo {
                let num_values = (hi - lo + 1.0) as u64;
                return DmSpec::DiscreteArray(
                    DiscreteArray::new_unchecked(num_values, spec.dtype())
                        .with_opt_name(spec.name()),
                );
            }
        }
    }
    convert_spec(spec)
}

/// Applies [`convert_spec`] to every leaf of a nest.
pub fn convert_spec_nest(spec: &Nest<ArraySpec>) -> Nest<DmSpec> {
    spec.map(convert_spec)
}

/// Applies [`convert_action_spec`] to every leaf of a nest.
pub fn convert_action_spec_nest(spec: &Nest<ArraySpec>) -> Nest<DmSpec> {
    spec.map(convert_action_spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use envbridge_core::{DType, StepType as CodedStepType};
    use ndarray::{arr1, arr2};

    fn coded(
        step_type: i32,
        reward: ArrayD<f32>,
        discount: ArrayD<f32>,
    ) -> envbridge_core::TimeStep<i32> {
        envbridge_core::TimeStep::new(CodedStepType(step_type), reward, discount, 42)
    }

    #[test]
    fn test_squeeze() {
        assert_eq!(squeeze(arr1(&[3.5f32]).into_dyn()), arr0(3.5f32).into_dyn());
        assert_eq!(squeeze(arr2(&[[3.5f32]]).into_dyn()), arr0(3.5f32).into_dyn());
        assert_eq!(
            squeeze(arr1(&[1f32, 2.0]).into_dyn()),
            arr1(&[1f32, 2.0]).into_dyn()
        );
        assert_eq!(
            squeeze(arr2(&[[1f32, 2.0]]).into_dyn()),
            arr1(&[1f32, 2.0]).into_dyn()
        );
        assert_eq!(squeeze(arr0(1f32).into_dyn()), arr0(1f32).into_dyn());
    }

    #[test]
    fn test_first_step_has_neutral_reward_and_discount() -> Result<()> {
        let ts = convert_timestep(coded(0, arr1(&[5f32]).into_dyn(), arr1(&[0.3f32]).into_dyn()))?;
        assert!(ts.first());
        assert_eq!(ts.reward_scalar(), Some(0.0));
        assert_eq!(ts.discount_scalar(), Some(1.0));
        assert_eq!(ts.observation, 42);
        Ok(())
    }

    #[test]
    fn test_mid_step_squeezes_reward() -> Result<()> {
        let ts = convert_timestep(coded(1, arr1(&[3.5f32]).into_dyn(), arr1(&[0.9f32]).into_dyn()))?;
        assert!(ts.mid());
        assert_eq!(ts.reward_scalar(), Some(3.5));
        assert_eq!(ts.discount_scalar(), Some(0.9));
        Ok(())
    }

    #[test]
    fn test_last_step_keeps_vector_reward() -> Result<()> {
        let reward = arr1(&[1f32, -1.0]).into_dyn();
        let ts = convert_timestep(coded(2, reward.clone(), arr0(0f32).into_dyn()))?;
        assert!(ts.last());
        assert_eq!(ts.reward, reward);
        assert_eq!(ts.discount_scalar(), Some(0.0));
        assert_eq!(ts.observation, 42);
        Ok(())
    }

    #[test]
    fn test_invalid_step_type() {
        let err = convert_timestep(coded(7, arr0(0f32).into_dyn(), arr0(1f32).into_dyn()))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<BridgeError>(),
            Some(&BridgeError::InvalidStepType(7))
        );
    }

    #[test]
    fn test_convert_unbounded_spec() {
        let spec = ArraySpec::new(vec![3, 2], DType::Float32).with_name("pixels");
        let converted = convert_spec(&spec);
        assert!(matches!(converted, DmSpec::Array(_)));
        assert_eq!(converted.shape(), &[3, 2]);
        assert_eq!(converted.dtype(), DType::Float32);
        assert_eq!(converted.name(), Some("pixels"));

        // The action path treats unbounded specs the same way.
        assert_eq!(convert_action_spec(&spec), converted);
    }

    #[test]
    fn test_convert_bounded_spec_keeps_bounds() -> Result<()> {
        let spec = ArraySpec::bounded(vec![], DType::Int32, 0.0, 4.0)?.with_name("action");
        match convert_spec(&spec) {
            DmSpec::BoundedArray(b) => {
                assert_eq!(b.minimum(), &arr0(0.0).into_dyn());
                assert_eq!(b.maximum(), &arr0(4.0).into_dyn());
                assert_eq!(b.name(), Some("action"));
            }
            other => panic!("unexpected spec: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_convert_action_spec_discrete() -> Result<()> {
        let spec = ArraySpec::bounded(vec![], DType::Int64, 0.0, 4.0)?.with_name("action");
        match convert_action_spec(&spec) {
            DmSpec::DiscreteArray(d) => {
                assert_eq!(d.num_values(), 5);
                assert_eq!(d.dtype(), DType::Int64);
                assert_eq!(d.name(), Some("action"));
            }
            other => panic!("unexpected spec: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_bounds_unfit_for_discrete_actions_are_rejected() {
        for hi in [f64::NAN, f64::INFINITY, 4.7].iter() {
            let err = ArraySpec::bounded(vec![], DType::Int64, 0.0, *hi).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<BridgeError>(),
                Some(BridgeError::InvalidSpec(_))
            ));
        }
    }

    #[test]
    fn test_convert_action_spec_falls_back_to_bounded() -> Result<()> {
        let specs = vec![
            // Non-zero minimum.
            ArraySpec::bounded(vec![], DType::Int32, 1.0, 4.0)?,
            // Non-scalar shape.
            ArraySpec::bounded(vec![2], DType::Int32, 0.0, 4.0)?,
            // Float element type.
            ArraySpec::bounded(vec![], DType::Float32, 0.0, 4.0)?,
        ];
        for spec in specs.iter() {
            let converted = convert_action_spec(spec);
            assert!(matches!(converted, DmSpec::BoundedArray(_)));
            assert_eq!(converted, convert_spec(spec));
        }
        Ok(())
    }

    #[test]
    fn test_convert_spec_nest_keeps_keys() -> Result<()> {
        let spec = Nest::map_of(vec![
            ("position", Nest::leaf(ArraySpec::new(vec![2], DType::Float32))),
            ("mode", Nest::leaf(ArraySpec::bounded(vec![], DType::Int32, 0.0, 2.0)?)),
        ]);

        let converted = convert_spec_nest(&spec);
        assert!(spec.same_structure(&converted));
        assert!(matches!(
            converted.get("position").and_then(|n| n.as_leaf()),
            Some(DmSpec::Array(_))
        ));
        // The plain converter never discretizes.
        assert!(matches!(
            converted.get("mode").and_then(|n| n.as_leaf()),
            Some(DmSpec::BoundedArray(_))
        ));

        let converted = convert_action_spec_nest(&spec);
        assert!(matches!(
            converted.get("mode").and_then(|n| n.as_leaf()),
            Some(DmSpec::DiscreteArray(_))
        ));
        Ok(())
    }
}
