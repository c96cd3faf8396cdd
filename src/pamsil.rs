// Medoid-swap local search on the average silhouette width

use crate::dist::DistanceMatrix;
use crate::init::assign_to_medoids;
use crate::sil::asw_from_scratch;

#[derive(Debug, Clone)]
pub struct PamsilFit {
    pub labels: Vec<usize>,
    pub asw: f64,
    pub medoids: Vec<usize>,
    pub n_iter: usize,
}

/// Run the swap search from a seed medoid set until no swap strictly
/// improves the average silhouette width, or `max_iter` commits.
///
/// Every iteration evaluates all k(N-k) candidate swaps (m in M, h not in M):
/// the trial labelling assigns each point to its nearest trial medoid and its
/// ASW is computed from scratch. Equal-ASW candidates resolve to the lowest
/// (m, h) pair; only a strictly better swap commits, so the ASW sequence is
/// strictly increasing and the search terminates.
pub(crate) fn optimize(d: &DistanceMatrix, seed: Vec<usize>, max_iter: usize) -> PamsilFit {
    let n = d.n_items();
    let k = seed.len();
    let mut medoids = seed;
    let mut labels = assign_to_medoids(d, &medoids);
    let mut asw = asw_from_scratch(d, &labels, k);
    let mut n_iter = 0;
    while n_iter < max_iter {
        let mut best_asw = asw;
        let mut best: Option<(usize, usize, Vec<usize>)> = None;
        // Scan medoid slots by increasing medoid index so equal-ASW swaps
        // resolve lexicographically on (m, h).
        let mut slots: Vec<usize> = (0..k).collect();
        slots.sort_by_key(|&p| medoids[p]);
        for &pos in &slots {
            for h in 0..n {
                if medoids.contains(&h) {
                    continue;
                }
                let mut trial_medoids = medoids.clone();
                trial_medoids[pos] = h;
                let trial_labels = assign_to_medoids(d, &trial_medoids);
                let trial_asw = asw_from_scratch(d, &trial_labels, k);
                if trial_asw > best_asw {
                    best_asw = trial_asw;
                    best = Some((pos, h, trial_labels));
                }
            }
        }
        let Some((pos, h, trial_labels)) = best else {
            break;
        };
        log::debug!(
            "swapped medoid {} for {}, asw {:.6} -> {:.6}",
            medoids[pos],
            h,
            asw,
            best_asw
        );
        medoids[pos] = h;
        labels = trial_labels;
        asw = best_asw;
        n_iter += 1;
    }
    PamsilFit {
        labels,
        asw,
        medoids,
        n_iter,
    }
}
