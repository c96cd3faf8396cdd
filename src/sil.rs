// Silhouette evaluation and the per-cluster distance-sum cache

use crate::clust::Partition;
use crate::dist::DistanceMatrix;

/// The matrix S[i, c] = sum of distances from item i to the members of
/// cluster c. Together with the cluster sizes this evaluates any silhouette
/// in O(k) per point, and a single reassignment updates it in O(N).
#[derive(Debug, Clone)]
pub struct SilhouetteSums {
    sums: Vec<f64>,
    n_items: usize,
    n_clusters: usize,
}

impl SilhouetteSums {
    pub fn build(d: &DistanceMatrix, part: &Partition) -> Self {
        let n = part.n_items();
        let k = part.n_clusters();
        let mut sums = vec![0.0; n * k];
        for i in 0..n {
            for j in (i + 1)..n {
                let dij = unsafe { d.get_unchecked(i, j) };
                sums[i * k + part.label(j)] += dij;
                sums[j * k + part.label(i)] += dij;
            }
        }
        Self {
            sums,
            n_items: n,
            n_clusters: k,
        }
    }

    #[inline]
    pub fn get(&self, i: usize, c: usize) -> f64 {
        self.sums[i * self.n_clusters + c]
    }

    /// Commit the reassignment of item `i` to cluster `c_new`, updating every
    /// row of S and the partition. The source cluster must keep a member.
    pub fn move_point(
        &mut self,
        d: &DistanceMatrix,
        part: &mut Partition,
        i: usize,
        c_new: usize,
    ) {
        let c_old = part.label(i);
        debug_assert!(c_old != c_new && part.size_of(c_old) > 1);
        let k = self.n_clusters;
        for j in 0..self.n_items {
            if j == i {
                continue;
            }
            let dij = unsafe { d.get_unchecked(i, j) };
            self.sums[j * k + c_old] -= dij;
            self.sums[j * k + c_new] += dij;
        }
        part.reassign(i, c_new);
    }
}

#[inline]
fn width(a: f64, b: f64) -> f64 {
    let m = if a > b { a } else { b };
    if m > 0.0 {
        (b - a) / m
    } else {
        0.0
    }
}

/// Average silhouette width of the current partition, assuming `sums` is up
/// to date. O(N·k). Singleton clusters contribute 0.
pub fn asw_from_sums(part: &Partition, sums: &SilhouetteSums) -> f64 {
    let n = part.n_items();
    let k = part.n_clusters();
    let mut total = 0.0;
    for i in 0..n {
        let li = part.label(i);
        let sz = part.size_of(li);
        if sz < 2 {
            continue;
        }
        let a = sums.get(i, li) / (sz - 1) as f64;
        let mut b = f64::INFINITY;
        for c in 0..k {
            if c == li {
                continue;
            }
            let v = sums.get(i, c) / part.size_of(c) as f64;
            if v < b {
                b = v;
            }
        }
        total += width(a, b);
    }
    total / n as f64
}

/// Average silhouette width of a labelling, computed from the distance
/// matrix alone. O(N²).
pub fn asw_from_scratch(d: &DistanceMatrix, labels: &[usize], n_clusters: usize) -> f64 {
    let part = Partition::from_labels(labels.to_vec(), n_clusters);
    let sums = SilhouetteSums::build(d, &part);
    asw_from_sums(&part, &sums)
}

#[inline]
fn size_after(part: &Partition, c: usize, c_old: usize, c_new: usize) -> usize {
    let sz = part.size_of(c);
    if c == c_old {
        sz - 1
    } else if c == c_new {
        sz + 1
    } else {
        sz
    }
}

/// Average silhouette width the partition would have after moving item `i`
/// to cluster `c_new`, without committing anything. The hypothetical S and
/// size entries differ from the current ones only for the source and target
/// clusters, so each point is scored in O(k) from the cached sums.
pub fn asw_after_move(
    d: &DistanceMatrix,
    part: &Partition,
    sums: &SilhouetteSums,
    i: usize,
    c_new: usize,
) -> f64 {
    let c_old = part.label(i);
    debug_assert!(c_old != c_new && part.size_of(c_old) > 1);
    let n = part.n_items();
    let k = part.n_clusters();
    let mut total = 0.0;
    for j in 0..n {
        let lj = if j == i { c_new } else { part.label(j) };
        let sz = size_after(part, lj, c_old, c_new);
        if sz < 2 {
            continue;
        }
        let dij = if j == i {
            0.0
        } else {
            unsafe { d.get_unchecked(i, j) }
        };
        let mut a_sum = sums.get(j, lj);
        if lj == c_old {
            a_sum -= dij;
        } else if lj == c_new {
            a_sum += dij;
        }
        let a = a_sum / (sz - 1) as f64;
        let mut b = f64::INFINITY;
        for c in 0..k {
            if c == lj {
                continue;
            }
            let mut s = sums.get(j, c);
            if c == c_old {
                s -= dij;
            } else if c == c_new {
                s += dij;
            }
            let v = s / size_after(part, c, c_old, c_new) as f64;
            if v < b {
                b = v;
            }
        }
        total += width(a, b);
    }
    total / n as f64
}
