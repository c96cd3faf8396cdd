// K-sweep driver: run an engine over candidate cluster counts and report
// the argmax-ASW solution.

use crate::dist::DistanceMatrix;
use crate::error::OsilError;
use crate::fosil::{self, FosilParameters};
use crate::init::{initial_partition, pam_build, InitMethod};
use crate::osil::{self, OsilVariant};
use crate::pamsil as pamsil_engine;
use rand::Rng;

/// Results of a sweep over candidate cluster counts.
///
/// Per-k vectors are aligned with `ks` (ascending). Output labels are
/// 1-based; `medoids` and `n_iter` are present for the engines that report
/// them. `best_k` is the smallest k achieving `best_asw`.
#[derive(Debug, Clone)]
pub struct SilSweep {
    pub ks: Vec<usize>,
    pub clusterings: Vec<Vec<usize>>,
    pub asw: Vec<f64>,
    pub n_iter: Option<Vec<usize>>,
    pub medoids: Option<Vec<Vec<usize>>>,
    pub best_k: usize,
    pub best_asw: f64,
    pub best_clustering: Vec<usize>,
    pub best_medoids: Option<Vec<usize>>,
}

fn validated_ks(ks: &[usize], limit: usize) -> Result<Vec<usize>, OsilError> {
    if ks.is_empty() {
        return Err(OsilError::InvalidK("no candidate cluster counts".into()));
    }
    let mut sorted = ks.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(OsilError::InvalidK("duplicate cluster counts".into()));
    }
    if sorted[0] < 2 {
        return Err(OsilError::InvalidK(format!(
            "cluster counts must be at least 2, got {}",
            sorted[0]
        )));
    }
    let max = sorted[sorted.len() - 1];
    if max > limit {
        return Err(OsilError::InvalidK(format!(
            "cluster count {} exceeds the {} available items",
            max, limit
        )));
    }
    Ok(sorted)
}

fn validated_methods(methods: &[InitMethod]) -> Result<(), OsilError> {
    if methods.is_empty() {
        return Err(OsilError::InvalidInitMethod(
            "no initialization methods".into(),
        ));
    }
    Ok(())
}

fn one_based(labels: &[usize]) -> Vec<usize> {
    labels.iter().map(|&l| l + 1).collect()
}

fn assemble(
    ks: Vec<usize>,
    clusterings: Vec<Vec<usize>>,
    asw: Vec<f64>,
    n_iter: Option<Vec<usize>>,
    medoids: Option<Vec<Vec<usize>>>,
) -> SilSweep {
    let mut best = 0;
    for idx in 1..asw.len() {
        if asw[idx] > asw[best] {
            best = idx;
        }
    }
    SilSweep {
        best_k: ks[best],
        best_asw: asw[best],
        best_clustering: clusterings[best].clone(),
        best_medoids: medoids.as_ref().map(|m| m[best].clone()),
        ks,
        clusterings,
        asw,
        n_iter,
        medoids,
    }
}

/// Medoid-swap search maximizing the average silhouette width, for each
/// candidate cluster count in `ks`. Medoids are seeded by PAM BUILD.
pub fn pamsil(
    d: &DistanceMatrix,
    ks: &[usize],
    max_iter: usize,
) -> Result<SilSweep, OsilError> {
    let ks = validated_ks(ks, d.n_items())?;
    let mut clusterings = Vec::with_capacity(ks.len());
    let mut asw = Vec::with_capacity(ks.len());
    let mut n_iter = Vec::with_capacity(ks.len());
    let mut medoids = Vec::with_capacity(ks.len());
    for &k in &ks {
        let fit = pamsil_engine::optimize(d, pam_build(d, k), max_iter);
        log::debug!("pamsil k={}: asw {:.6} after {} swaps", k, fit.asw, fit.n_iter);
        clusterings.push(one_based(&fit.labels));
        asw.push(fit.asw);
        n_iter.push(fit.n_iter);
        medoids.push(fit.medoids);
    }
    Ok(assemble(ks, clusterings, asw, Some(n_iter), Some(medoids)))
}

/// Reassignment search maximizing the average silhouette width, for each
/// candidate cluster count in `ks`, seeded by the best of `methods`.
pub fn effosil(
    d: &DistanceMatrix,
    ks: &[usize],
    methods: &[InitMethod],
    variant: OsilVariant,
    max_iter: usize,
) -> Result<SilSweep, OsilError> {
    let ks = validated_ks(ks, d.n_items())?;
    validated_methods(methods)?;
    let mut clusterings = Vec::with_capacity(ks.len());
    let mut asw = Vec::with_capacity(ks.len());
    let mut n_iter = Vec::with_capacity(ks.len());
    for &k in &ks {
        let seed = initial_partition(d, k, methods);
        let fit = osil::optimize(d, seed, variant, max_iter);
        log::debug!("effosil k={}: asw {:.6} after {} moves", k, fit.asw, fit.n_iter);
        clusterings.push(one_based(&fit.labels));
        asw.push(fit.asw);
        n_iter.push(fit.n_iter);
    }
    Ok(assemble(ks, clusterings, asw, Some(n_iter), None))
}

/// Sub-sample search with out-of-sample extension, for each candidate
/// cluster count in `ks`. Randomness comes from `rng` only, so a seeded
/// generator reproduces the fit exactly.
pub fn scalosil<T: Rng>(
    d: &DistanceMatrix,
    ks: &[usize],
    methods: &[InitMethod],
    params: &FosilParameters,
    rng: &mut T,
) -> Result<SilSweep, OsilError> {
    let n = d.n_items();
    let sample_size = match params.sample_size {
        Some(s) => {
            if s < 2 || s > n {
                return Err(OsilError::InvalidSampleSize {
                    sample_size: s,
                    n_items: n,
                });
            }
            s
        }
        None => ((n + 9) / 10).max(2),
    };
    if params.n_trials < 1 || params.n_reps < 1 {
        return Err(OsilError::InvalidRepeats);
    }
    let ks = validated_ks(ks, sample_size)?;
    validated_methods(methods)?;
    let mut clusterings = Vec::with_capacity(ks.len());
    let mut asw = Vec::with_capacity(ks.len());
    for &k in &ks {
        let fit = fosil::optimize(d, k, methods, params, sample_size, rng);
        log::debug!("scalosil k={}: asw {:.6}", k, fit.asw);
        clusterings.push(one_based(&fit.labels));
        asw.push(fit.asw);
    }
    Ok(assemble(ks, clusterings, asw, None, None))
}
