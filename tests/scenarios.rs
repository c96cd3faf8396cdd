//! End-to-end scenarios: each engine is driven through the public API on
//! small synthetic datasets with known structure.

use osil::{
    asw_from_scratch, effosil, pamsil, scalosil, DistanceMatrix, FosilParameters, InitMethod,
    OsilVariant,
};
use rand::Rng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

fn line_matrix(positions: &[f64]) -> DistanceMatrix {
    let n = positions.len();
    let mut condensed = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            condensed.push((positions[i] - positions[j]).abs());
        }
    }
    DistanceMatrix::from_condensed(condensed, n).unwrap()
}

fn euclidean_matrix(points: &[(f64, f64)]) -> DistanceMatrix {
    let n = points.len();
    let mut condensed = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = points[i].0 - points[j].0;
            let dy = points[i].1 - points[j].1;
            condensed.push((dx * dx + dy * dy).sqrt());
        }
    }
    DistanceMatrix::from_condensed(condensed, n).unwrap()
}

fn jittered_blobs(centers: &[(f64, f64)], per_center: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let jitter = Normal::new(0.0, 1.0).unwrap();
    let mut points = Vec::with_capacity(centers.len() * per_center);
    for &(cx, cy) in centers {
        for _ in 0..per_center {
            points.push((cx + jitter.sample(&mut rng), cy + jitter.sample(&mut rng)));
        }
    }
    points
}

fn uniform_points(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen::<f64>() * 10.0, rng.gen::<f64>() * 10.0))
        .collect()
}

fn zero_based(labels: &[usize]) -> Vec<usize> {
    labels.iter().map(|&l| l - 1).collect()
}

// Relabel by first occurrence so partitions compare independently of label
// numbering.
fn canonical(labels: &[usize]) -> Vec<usize> {
    let mut map = std::collections::HashMap::new();
    let mut next = 0usize;
    labels
        .iter()
        .map(|&l| {
            *map.entry(l).or_insert_with(|| {
                let v = next;
                next += 1;
                v
            })
        })
        .collect()
}

#[test]
fn s1_two_separated_line_clusters() {
    let positions: Vec<f64> = (0..10)
        .map(|i| i as f64)
        .chain((0..10).map(|i| 100.0 + i as f64))
        .collect();
    let d = line_matrix(&positions);
    let sweep = effosil(
        &d,
        &[2, 3, 4, 5],
        &[InitMethod::Average, InitMethod::Pam],
        OsilVariant::Efficient,
        usize::MAX,
    )
    .unwrap();
    assert_eq!(sweep.best_k, 2);
    assert!(sweep.best_asw > 0.95, "asw was {}", sweep.best_asw);
    for i in 1..10 {
        assert_eq!(sweep.best_clustering[i], sweep.best_clustering[0]);
    }
    for i in 11..20 {
        assert_eq!(sweep.best_clustering[i], sweep.best_clustering[10]);
    }
    assert_ne!(sweep.best_clustering[0], sweep.best_clustering[10]);
    // The reported ASW matches an independent from-scratch evaluation.
    let check = asw_from_scratch(&d, &zero_based(&sweep.best_clustering), 2);
    assert!((check - sweep.best_asw).abs() < 1e-10);
    assert!(sweep.asw.iter().all(|&a| (-1.0..=1.0).contains(&a)));
}

#[test]
fn s2_three_blobs_all_engines() {
    let centers = [(0.0, 0.0), (10.0, 0.0), (5.0, 8.66)];
    let points = jittered_blobs(&centers, 10, 4242);
    let d = euclidean_matrix(&points);
    let ks = [2, 3, 4, 5, 6];

    let eff = effosil(&d, &ks, &[InitMethod::Average], OsilVariant::Efficient, usize::MAX)
        .unwrap();
    assert_eq!(eff.best_k, 3);
    assert!(eff.best_asw > 0.7, "effosil asw was {}", eff.best_asw);

    let pam = pamsil(&d, &ks, usize::MAX).unwrap();
    assert_eq!(pam.best_k, 3);
    assert!(pam.best_asw > 0.7, "pamsil asw was {}", pam.best_asw);

    let params = FosilParameters {
        sample_size: Some(20),
        n_trials: 10,
        ..FosilParameters::default()
    };
    let mut rng = Pcg64Mcg::seed_from_u64(7);
    let scal = scalosil(&d, &ks, &[InitMethod::Average], &params, &mut rng).unwrap();
    assert_eq!(scal.best_k, 3);
    assert!(scal.best_asw > 0.7, "scalosil asw was {}", scal.best_asw);
}

#[test]
fn s3_far_outlier_yields_a_clean_singleton() {
    let mut points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64 * 0.01, 0.0)).collect();
    points.push((1000.0, 0.0));
    let d = euclidean_matrix(&points);
    let sweep = effosil(
        &d,
        &[2, 3],
        &[InitMethod::Single, InitMethod::Pam],
        OsilVariant::Efficient,
        usize::MAX,
    )
    .unwrap();
    assert!(sweep.best_asw.is_finite());
    assert_eq!(sweep.best_k, 2);
    // The outlier sits alone and the tight group stays together.
    assert_eq!(sweep.best_clustering[10], 2);
    for i in 0..10 {
        assert_eq!(sweep.best_clustering[i], 1);
    }
    let pam = pamsil(&d, &[2, 3], usize::MAX).unwrap();
    assert!(pam.best_asw.is_finite());
}

#[test]
fn s4_effosil_variants_return_identical_partitions() {
    let d = euclidean_matrix(&uniform_points(50, 314));
    let eff = effosil(&d, &[3], &[InitMethod::Average], OsilVariant::Efficient, usize::MAX)
        .unwrap();
    let orig = effosil(&d, &[3], &[InitMethod::Average], OsilVariant::Original, usize::MAX)
        .unwrap();
    assert_eq!(eff.clusterings, orig.clusterings);
    assert!((eff.best_asw - orig.best_asw).abs() < 1e-9);
}

#[test]
fn s5_full_sample_scalosil_degenerates_to_effosil() {
    let d = euclidean_matrix(&uniform_points(50, 314));
    let params = FosilParameters {
        sample_size: Some(50),
        n_trials: 1,
        n_reps: 1,
        ..FosilParameters::default()
    };
    let mut rng = Pcg64Mcg::seed_from_u64(1);
    let scal = scalosil(&d, &[3], &[InitMethod::Average], &params, &mut rng).unwrap();
    let eff = effosil(&d, &[3], &[InitMethod::Average], OsilVariant::Efficient, usize::MAX)
        .unwrap();
    assert_eq!(scal.best_clustering, eff.best_clustering);
    assert!((scal.best_asw - eff.best_asw).abs() < 1e-10);
}

#[test]
fn s6_pamsil_never_degrades_the_pam_seed() {
    let d = euclidean_matrix(&uniform_points(30, 2718));
    let ks = [2, 3, 4, 5];
    // max_iter = 0 evaluates the PAM BUILD seed without any swap.
    let seeded = pamsil(&d, &ks, 0).unwrap();
    let optimized = pamsil(&d, &ks, usize::MAX).unwrap();
    for idx in 0..ks.len() {
        assert!(
            optimized.asw[idx] >= seeded.asw[idx] - 1e-12,
            "k = {}: {} < {}",
            ks[idx],
            optimized.asw[idx],
            seeded.asw[idx]
        );
    }
}

#[test]
fn relabeling_the_input_relabels_the_output() {
    let points = uniform_points(18, 99);
    let d = euclidean_matrix(&points);
    let mut pi: Vec<usize> = (0..18).collect();
    let mut rng = Pcg64Mcg::seed_from_u64(3);
    for i in (1..18).rev() {
        let j = rng.gen_range(0..=i);
        pi.swap(i, j);
    }
    let permuted: Vec<(f64, f64)> = pi.iter().map(|&i| points[i]).collect();
    let dp = euclidean_matrix(&permuted);

    let base = effosil(&d, &[3], &[InitMethod::Average], OsilVariant::Efficient, usize::MAX)
        .unwrap();
    let perm = effosil(&dp, &[3], &[InitMethod::Average], OsilVariant::Efficient, usize::MAX)
        .unwrap();
    let pushed: Vec<usize> = pi.iter().map(|&i| base.best_clustering[i]).collect();
    assert_eq!(canonical(&perm.best_clustering), canonical(&pushed));
    assert!((perm.best_asw - base.best_asw).abs() < 1e-10);
}
