// Sub-sample search with out-of-sample extension

use crate::dist::DistanceMatrix;
use crate::error::OsilError;
use crate::init::{initial_partition, InitMethod};
use crate::osil::{self, OsilVariant};
use crate::perm::Permutation;
use crate::sil::asw_from_scratch;
use rand::Rng;
use rand_pcg::Pcg64Mcg;

/// How the winning sub-sample partition is extended to the full data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FosilVariant {
    /// One pass over the cached per-cluster sums: each remaining point joins
    /// the cluster with the smallest mean distance to its sub-sample members.
    Scalable,
    /// Re-evaluate the full silhouette objective per extended point: each
    /// remaining point joins the cluster that maximizes the from-scratch ASW
    /// of the augmented sub-sample clustering.
    Original,
}

impl std::str::FromStr for FosilVariant {
    type Err = OsilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scalable" => Ok(Self::Scalable),
            "original" => Ok(Self::Original),
            other => Err(OsilError::InvalidVariant(other.to_string())),
        }
    }
}

/// Tuning knobs for the sub-sample engine.
#[derive(Debug, Clone)]
pub struct FosilParameters {
    /// Sub-sample size; `None` means one tenth of the data, rounded up.
    pub sample_size: Option<usize>,
    /// Sub-sample draws per repeat; the best-ASW draw is extended.
    pub n_trials: usize,
    /// Independent repeats; the best full-data ASW wins.
    pub n_reps: usize,
    pub variant: FosilVariant,
    pub max_iter: usize,
    /// Worker threads for the trials; 0 means all cores.
    pub n_cores: usize,
}

impl Default for FosilParameters {
    fn default() -> Self {
        Self {
            sample_size: None,
            n_trials: 10,
            n_reps: 1,
            variant: FosilVariant::Scalable,
            max_iter: usize::MAX,
            n_cores: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FosilFit {
    pub labels: Vec<usize>,
    pub asw: f64,
}

#[derive(Debug, Clone)]
struct Trial {
    sample: Vec<usize>,
    complement: Vec<usize>,
    labels: Vec<usize>,
    asw: f64,
}

fn run_trial(
    d: &DistanceMatrix,
    k: usize,
    sample_size: usize,
    methods: &[InitMethod],
    max_iter: usize,
    seed: u128,
) -> Trial {
    let n = d.n_items();
    let (sample, complement) = if sample_size == n {
        // Sampling the whole set is a no-op; keep the identity order so the
        // engine degenerates to a plain reassignment search.
        ((0..n).collect::<Vec<_>>(), Vec::new())
    } else {
        let mut rng = Pcg64Mcg::new(seed);
        let mut perm = Permutation::natural(n);
        perm.shuffle(&mut rng);
        (
            perm.head(sample_size).to_vec(),
            perm.tail(sample_size).to_vec(),
        )
    };
    let sub = d.sub_matrix(&sample);
    let seed_part = initial_partition(&sub, k, methods);
    let fit = osil::optimize(&sub, seed_part, OsilVariant::Efficient, max_iter);
    Trial {
        sample,
        complement,
        labels: fit.labels,
        asw: fit.asw,
    }
}

/// Run every trial, in parallel when more than one core is requested, and
/// keep the one with the highest sub-sample ASW (ties go to the lowest trial
/// index). Seeds are pre-drawn per trial, so the winner does not depend on
/// the core count.
fn best_trial(
    d: &DistanceMatrix,
    k: usize,
    sample_size: usize,
    methods: &[InitMethod],
    max_iter: usize,
    seeds: &[u128],
    n_cores: usize,
) -> Option<Trial> {
    let n_trials = seeds.len();
    let n_cores = if n_cores == 0 {
        num_cpus::get()
    } else {
        n_cores
    }
    .min(n_trials)
    .max(1);
    let mut outcomes: Vec<Option<Trial>> = vec![None; n_trials];
    if n_cores == 1 {
        for (slot, &seed) in outcomes.iter_mut().zip(seeds) {
            *slot = Some(run_trial(d, k, sample_size, methods, max_iter, seed));
        }
    } else {
        let per_core = 1 + (n_trials - 1) / n_cores;
        let _result = crossbeam::scope(|s| {
            for (slots, chunk) in outcomes.chunks_mut(per_core).zip(seeds.chunks(per_core)) {
                s.spawn(move |_| {
                    for (slot, &seed) in slots.iter_mut().zip(chunk) {
                        *slot = Some(run_trial(d, k, sample_size, methods, max_iter, seed));
                    }
                });
            }
        });
    }
    let mut best: Option<Trial> = None;
    for trial in outcomes.into_iter().flatten() {
        if best.as_ref().map_or(true, |b| trial.asw > b.asw) {
            best = Some(trial);
        }
    }
    best
}

/// Map the winning sub-sample partition back to original point order and
/// assign every remaining point to a cluster.
fn extend(d: &DistanceMatrix, k: usize, trial: &Trial, variant: FosilVariant) -> Vec<usize> {
    let n = d.n_items();
    let mut full = vec![0usize; n];
    for (p, &item) in trial.sample.iter().enumerate() {
        full[item] = trial.labels[p];
    }
    match variant {
        FosilVariant::Scalable => {
            let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
            for (p, &item) in trial.sample.iter().enumerate() {
                members[trial.labels[p]].push(item);
            }
            for &j in &trial.complement {
                let mut best = (f64::INFINITY, 0);
                for (c, cluster) in members.iter().enumerate() {
                    let mean = d.sum_over(j, cluster) / cluster.len() as f64;
                    if mean < best.0 {
                        best = (mean, c);
                    }
                }
                full[j] = best.1;
            }
        }
        FosilVariant::Original => {
            let mut aug_indices = trial.sample.clone();
            let mut aug_labels = trial.labels.clone();
            aug_indices.push(0);
            aug_labels.push(0);
            let last = aug_labels.len() - 1;
            for &j in &trial.complement {
                aug_indices[last] = j;
                let aug = d.sub_matrix(&aug_indices);
                let mut best = (f64::NEG_INFINITY, 0);
                for c in 0..k {
                    aug_labels[last] = c;
                    let asw = asw_from_scratch(&aug, &aug_labels, k);
                    if asw > best.0 {
                        best = (asw, c);
                    }
                }
                full[j] = best.1;
            }
        }
    }
    full
}

pub(crate) fn optimize<T: Rng>(
    d: &DistanceMatrix,
    k: usize,
    methods: &[InitMethod],
    params: &FosilParameters,
    sample_size: usize,
    rng: &mut T,
) -> FosilFit {
    let n_trials = params.n_trials.max(1);
    let n_reps = params.n_reps.max(1);
    let mut best_labels = Vec::new();
    let mut best_asw = f64::NEG_INFINITY;
    for rep in 0..n_reps {
        let seeds: Vec<u128> = (0..n_trials).map(|_| rng.gen()).collect();
        let Some(trial) = best_trial(
            d,
            k,
            sample_size,
            methods,
            params.max_iter,
            &seeds,
            params.n_cores,
        ) else {
            continue;
        };
        let full = extend(d, k, &trial, params.variant);
        let asw = asw_from_scratch(d, &full, k);
        log::debug!(
            "repeat {}: sub-sample asw {:.6}, extended asw {:.6}",
            rep,
            trial.asw,
            asw
        );
        if asw > best_asw {
            best_asw = asw;
            best_labels = full;
        }
    }
    FosilFit {
        labels: best_labels,
        asw: best_asw,
    }
}
