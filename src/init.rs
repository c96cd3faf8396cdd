// Seed partitions for the optimizing engines

use crate::clust::Partition;
use crate::dist::DistanceMatrix;
use crate::error::OsilError;
use crate::sil::asw_from_scratch;

/// Initialization methods recognized by the engines. With several methods,
/// the seed with the highest average silhouette width is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMethod {
    /// Single-linkage agglomerative clustering cut at k clusters.
    Single,
    /// Average-linkage agglomerative clustering cut at k clusters.
    Average,
    /// Complete-linkage agglomerative clustering cut at k clusters.
    Complete,
    /// Greedy PAM BUILD medoids with nearest-medoid assignment.
    Pam,
}

impl std::str::FromStr for InitMethod {
    type Err = OsilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "average" => Ok(Self::Average),
            "complete" => Ok(Self::Complete),
            "pam" => Ok(Self::Pam),
            other => Err(OsilError::InvalidInitMethod(other.to_string())),
        }
    }
}

/// Best-ASW seed partition among `methods`. Ties keep the earlier method.
pub(crate) fn initial_partition(
    d: &DistanceMatrix,
    k: usize,
    methods: &[InitMethod],
) -> Partition {
    debug_assert!(!methods.is_empty());
    let mut best_labels = seed_labels(d, k, methods[0]);
    let mut best_asw = asw_from_scratch(d, &best_labels, k);
    for &method in &methods[1..] {
        let labels = seed_labels(d, k, method);
        let asw = asw_from_scratch(d, &labels, k);
        if asw > best_asw {
            best_labels = labels;
            best_asw = asw;
        }
    }
    Partition::from_labels(best_labels, k)
}

fn seed_labels(d: &DistanceMatrix, k: usize, method: InitMethod) -> Vec<usize> {
    match method {
        InitMethod::Pam => assign_to_medoids(d, &pam_build(d, k)),
        _ => linkage_labels(d, k, method),
    }
}

/// Agglomerative clustering with Lance-Williams distance updates, stopped at
/// k clusters. Labels are canonicalized by smallest member index.
fn linkage_labels(d: &DistanceMatrix, k: usize, method: InitMethod) -> Vec<usize> {
    let n = d.n_items();
    let mut cd = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            cd[i * n + j] = d.get(i, j);
        }
    }
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active: Vec<usize> = (0..n).collect();
    while active.len() > k {
        let mut best = (f64::INFINITY, 0, 0);
        for (p, &a) in active.iter().enumerate() {
            for &b in &active[p + 1..] {
                let v = cd[a * n + b];
                if v < best.0 {
                    best = (v, a, b);
                }
            }
        }
        let (_, a, b) = best;
        let (sa, sb) = (members[a].len() as f64, members[b].len() as f64);
        for &x in &active {
            if x == a || x == b {
                continue;
            }
            let dax = cd[a * n + x];
            let dbx = cd[b * n + x];
            let v = match method {
                InitMethod::Single => dax.min(dbx),
                InitMethod::Complete => dax.max(dbx),
                InitMethod::Average => (sa * dax + sb * dbx) / (sa + sb),
                InitMethod::Pam => unreachable!(),
            };
            cd[a * n + x] = v;
            cd[x * n + a] = v;
        }
        let absorbed = std::mem::take(&mut members[b]);
        members[a].extend(absorbed);
        active.retain(|&x| x != b);
    }
    // `active` stays ascending and each surviving cluster keeps its smallest
    // member first, so this ordering is canonical.
    let mut labels = vec![0usize; n];
    for (label, &c) in active.iter().enumerate() {
        for &m in &members[c] {
            labels[m] = label;
        }
    }
    labels
}

/// Greedy PAM BUILD: the first medoid minimizes the total distance, each
/// further medoid maximizes the decrease in nearest-medoid distance. Ties go
/// to the lowest index.
pub(crate) fn pam_build(d: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = d.n_items();
    debug_assert!(k >= 1 && k <= n);
    let mut medoids = Vec::with_capacity(k);
    let mut first = (f64::INFINITY, 0);
    for i in 0..n {
        let total: f64 = (0..n).map(|j| d.get(i, j)).sum();
        if total < first.0 {
            first = (total, i);
        }
    }
    medoids.push(first.1);
    let mut nearest: Vec<f64> = (0..n).map(|j| d.get(j, first.1)).collect();
    while medoids.len() < k {
        let mut best: Option<(f64, usize)> = None;
        for i in 0..n {
            if medoids.contains(&i) {
                continue;
            }
            let mut gain = 0.0;
            for (j, &near) in nearest.iter().enumerate() {
                let dji = d.get(j, i);
                if dji < near {
                    gain += near - dji;
                }
            }
            if best.map_or(true, |(g, _)| gain > g) {
                best = Some((gain, i));
            }
        }
        if let Some((_, m)) = best {
            medoids.push(m);
            for (j, near) in nearest.iter_mut().enumerate() {
                let dj = d.get(j, m);
                if dj < *near {
                    *near = dj;
                }
            }
        }
    }
    medoids
}

/// Label every item by its nearest medoid; equidistant medoids resolve to
/// the lowest medoid index. Each medoid belongs to its own cluster.
pub(crate) fn assign_to_medoids(d: &DistanceMatrix, medoids: &[usize]) -> Vec<usize> {
    let n = d.n_items();
    let mut labels = vec![0usize; n];
    for j in 0..n {
        let mut best_pos = 0;
        let mut best_d = d.get(j, medoids[0]);
        for (pos, &m) in medoids.iter().enumerate().skip(1) {
            let dm = d.get(j, m);
            if dm < best_d || (dm == best_d && m < medoids[best_pos]) {
                best_pos = pos;
                best_d = dm;
            }
        }
        labels[j] = best_pos;
    }
    for (pos, &m) in medoids.iter().enumerate() {
        labels[m] = pos;
    }
    labels
}
