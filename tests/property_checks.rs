//! Randomized checks of the selection, filtering, remapping and suppression
//! laws over many seeded inputs.

use detpost::lowlevel::{
    filter_scores, greedy_nms, inverse_remap_box, iou_inclusive, mark_valid, remap_box,
    BoxColumns, INVALID_SCORE,
};
use detpost::{select_top_k, AnchorBox, Orientation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TRIALS: usize = 200;

fn random_boxes(rng: &mut StdRng, n: usize, extent: f32) -> Vec<AnchorBox> {
    (0..n)
        .map(|_| {
            let x0 = rng.random_range(0.0..extent);
            let y0 = rng.random_range(0.0..extent);
            let w = rng.random_range(1.0..extent * 0.3);
            let h = rng.random_range(1.0..extent * 0.3);
            AnchorBox::new(x0, y0, x0 + w, y0 + h)
        })
        .collect()
}

#[test]
fn top_k_selects_the_largest_scores() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..TRIALS {
        let n = rng.random_range(0..60);
        let k = rng.random_range(0..80);
        let scores: Vec<f32> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
        let picked = select_top_k(&scores, k);

        assert_eq!(picked.len(), n.min(k));
        assert!(picked.iter().all(|&i| i < n));
        for pair in picked.windows(2) {
            assert!(scores[pair[0]] >= scores[pair[1]]);
        }
        if let Some(&last) = picked.last() {
            let floor = scores[last];
            for (idx, &s) in scores.iter().enumerate() {
                if !picked.contains(&idx) {
                    assert!(s <= floor);
                }
            }
        }
    }
}

#[test]
fn top_k_on_quantized_scores_matches_float_ranking() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..TRIALS {
        let n = rng.random_range(1..40);
        let quantized: Vec<i8> = (0..n).map(|_| rng.random()).collect();
        let widened: Vec<f32> = quantized.iter().map(|&q| f32::from(q)).collect();
        assert_eq!(select_top_k(&quantized, 5), select_top_k(&widened, 5));
    }
}

#[test]
fn filter_leaves_scores_unchanged_or_sentinel() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..TRIALS {
        let threshold = rng.random_range(0.0..1.0);
        let original: Vec<f32> = (0..50).map(|_| rng.random_range(0.0..1.0)).collect();
        let mut filtered = original.clone();
        filter_scores(&mut filtered, threshold);
        for (&before, &after) in original.iter().zip(&filtered) {
            if before >= threshold {
                assert_eq!(after, before);
            } else {
                assert_eq!(after, INVALID_SCORE);
            }
        }
        let mut again = filtered.clone();
        filter_scores(&mut again, threshold);
        assert_eq!(again, filtered);
    }
}

#[test]
fn remap_round_trips_on_integer_grid() {
    let mut rng = StdRng::seed_from_u64(5);
    let (w, h) = (640.0f32, 480.0f32);
    for _ in 0..TRIALS {
        let x0 = rng.random_range(0..600) as f32;
        let y0 = rng.random_range(0..440) as f32;
        let b = AnchorBox::new(x0, y0, x0 + 17.5, y0 + 33.25);
        for o in Orientation::ALL {
            assert_eq!(inverse_remap_box(remap_box(b, o, w, h), o, w, h), b);
        }
        let twice = remap_box(remap_box(b, Orientation::Deg270, w, h), Orientation::Deg270, w, h);
        assert_eq!(twice, b);
    }
}

#[test]
fn nms_survivors_are_valid_bounded_and_disjoint() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..TRIALS {
        let n = rng.random_range(0..120);
        let boxes = random_boxes(&mut rng, n, 200.0);
        let scores: Vec<f32> = (0..n).map(|_| rng.random_range(0.0..1.0)).collect();
        let threshold = 0.3;
        let iou_threshold = rng.random_range(0.1..0.9);
        let max_outputs = rng.random_range(0..25);

        let cols = BoxColumns::from_boxes(&boxes);
        let mut valid = vec![false; n];
        mark_valid(&scores, threshold, &mut valid);
        let mut keep = Vec::new();
        greedy_nms(&cols, &mut valid, max_outputs, iou_threshold, &mut keep);

        assert!(keep.len() <= max_outputs);
        assert!(keep.windows(2).all(|p| p[0] < p[1]));
        for (pos, &i) in keep.iter().enumerate() {
            assert!(scores[i] >= threshold);
            for &j in &keep[pos + 1..] {
                assert!(iou_inclusive(&boxes[i], &boxes[j]) <= iou_threshold);
            }
        }

        // Re-running on the survivors suppresses nothing further.
        let survivors: Vec<AnchorBox> = keep.iter().map(|&i| boxes[i]).collect();
        let cols = BoxColumns::from_boxes(&survivors);
        let mut valid = vec![true; survivors.len()];
        let mut again = Vec::new();
        greedy_nms(&cols, &mut valid, max_outputs, iou_threshold, &mut again);
        assert_eq!(again, (0..survivors.len()).collect::<Vec<_>>());
    }
}
