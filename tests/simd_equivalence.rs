#![cfg(feature = "simd")]

use detpost::lowlevel::{BoxColumns, SuppressKernel, SuppressScalar, SuppressSimd};
use detpost::AnchorBox;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_columns(rng: &mut StdRng, n: usize) -> BoxColumns {
    let boxes: Vec<AnchorBox> = (0..n)
        .map(|_| {
            let x0 = rng.random_range(0.0..300.0f32);
            let y0 = rng.random_range(0.0..300.0f32);
            // Some degenerate and inverted boxes on purpose.
            let w = rng.random_range(-5.0..80.0f32);
            let h = rng.random_range(-5.0..80.0f32);
            AnchorBox::new(x0, y0, x0 + w, y0 + h)
        })
        .collect();
    BoxColumns::from_boxes(&boxes)
}

#[test]
fn simd_kernel_matches_scalar_flags() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..300 {
        let n = rng.random_range(1..70);
        let boxes = random_columns(&mut rng, n);
        let anchor = rng.random_range(0..n);
        let threshold = rng.random_range(0.0..1.0f32);
        let valid: Vec<bool> = (0..n).map(|_| rng.random_bool(0.8)).collect();

        let mut scalar = valid.clone();
        let mut simd = valid;
        let a = SuppressScalar::suppress_after(&boxes, anchor, &mut scalar, threshold);
        let b = SuppressSimd::suppress_after(&boxes, anchor, &mut simd, threshold);
        assert_eq!(scalar, simd);
        assert_eq!(a, b);
    }
}
