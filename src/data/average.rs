use super::model::{Components, PowerMatrix};
use crate::error::CombineError;

/// Element-wise arithmetic mean of the three component power matrices.
///
/// All three must have the same shape. NaN cells propagate.
pub fn average_components(power: Components<&PowerMatrix>) -> Result<PowerMatrix, CombineError> {
    let shape = power.x.shape();
    if power.iter().any(|(_, m)| m.shape() != shape) {
        return Err(CombineError::ShapeMismatch {
            shapes: power.iter().map(|(axis, m)| (axis, m.shape())).collect(),
        });
    }

    let values = power
        .x
        .values()
        .iter()
        .zip(power.y.values())
        .zip(power.z.values())
        .map(|((x, y), z)| (x + y + z) / 3.0)
        .collect();

    PowerMatrix::from_row_major(shape.0, shape.1, values).ok_or_else(|| {
        CombineError::ShapeMismatch {
            shapes: power.iter().map(|(axis, m)| (axis, m.shape())).collect(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Axis;
    use proptest::prelude::*;

    fn matrix(rows: usize, cols: usize, values: Vec<f64>) -> PowerMatrix {
        PowerMatrix::from_row_major(rows, cols, values).unwrap()
    }

    #[test]
    fn zeros_average_to_zeros() {
        let z = PowerMatrix::zeros(5, 4);
        let avg = average_components(Components::new(&z, &z, &z)).unwrap();
        assert_eq!(avg, PowerMatrix::zeros(5, 4));
    }

    #[test]
    fn averages_each_cell() {
        let x = matrix(1, 3, vec![3.0, 0.0, -6.0]);
        let y = matrix(1, 3, vec![6.0, 1.5, -6.0]);
        let z = matrix(1, 3, vec![9.0, 3.0, -6.0]);
        let avg = average_components(Components::new(&x, &y, &z)).unwrap();
        assert_eq!(avg.values(), &[6.0, 1.5, -6.0]);
    }

    #[test]
    fn nan_propagates() {
        let x = matrix(1, 2, vec![f64::NAN, 1.0]);
        let y = matrix(1, 2, vec![1.0, 1.0]);
        let avg = average_components(Components::new(&x, &y, &y)).unwrap();
        assert!(avg.get(0, 0).is_nan());
        assert_eq!(avg.get(0, 1), 1.0);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let a = PowerMatrix::zeros(5, 4);
        let b = PowerMatrix::zeros(5, 3);
        let err = average_components(Components::new(&a, &b, &a)).unwrap_err();
        match err {
            CombineError::ShapeMismatch { shapes } => {
                assert_eq!(
                    shapes,
                    vec![(Axis::X, (5, 4)), (Axis::Y, (5, 3)), (Axis::Z, (5, 4))]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transposed_shape_is_a_mismatch() {
        let a = PowerMatrix::zeros(2, 3);
        let b = PowerMatrix::zeros(3, 2);
        assert!(average_components(Components::new(&a, &a, &b)).is_err());
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    proptest! {
        #[test]
        fn cell_is_mean_of_inputs(
            (rows, cols, cells) in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| {
                (Just(r), Just(c), prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6), r * c))
            })
        ) {
            let x = matrix(rows, cols, cells.iter().map(|t| t.0).collect());
            let y = matrix(rows, cols, cells.iter().map(|t| t.1).collect());
            let z = matrix(rows, cols, cells.iter().map(|t| t.2).collect());
            let avg = average_components(Components::new(&x, &y, &z)).unwrap();

            prop_assert_eq!(avg.shape(), (rows, cols));
            for (i, (a, b, c)) in cells.iter().enumerate() {
                prop_assert!(close(avg.values()[i], (a + b + c) / 3.0));
            }
        }

        #[test]
        fn order_of_components_does_not_matter(
            values in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6), 1..20)
        ) {
            let n = values.len();
            let a = matrix(1, n, values.iter().map(|t| t.0).collect());
            let b = matrix(1, n, values.iter().map(|t| t.1).collect());
            let c = matrix(1, n, values.iter().map(|t| t.2).collect());

            let xyz = average_components(Components::new(&a, &b, &c)).unwrap();
            let zxy = average_components(Components::new(&c, &a, &b)).unwrap();
            let yzx = average_components(Components::new(&b, &c, &a)).unwrap();
            for i in 0..n {
                prop_assert!(close(xyz.values()[i], zxy.values()[i]));
                prop_assert!(close(xyz.values()[i], yzx.values()[i]));
            }
        }
    }
}
