// Packed pairwise distance storage

use crate::error::OsilError;

const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// A symmetric zero-diagonal distance matrix over `n_items` observations,
/// stored as the n(n-1)/2 off-diagonal entries in row-major triangular order.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    n_items: usize,
}

impl DistanceMatrix {
    /// Wrap an already-condensed triangular store. The entry for the pair
    /// (i, j) with i < j is expected at `i*n - i*(i+1)/2 + (j-i-1)`.
    pub fn from_condensed(data: Vec<f64>, n_items: usize) -> Result<Self, OsilError> {
        if n_items < 2 {
            return Err(OsilError::InvalidDistance(format!(
                "need at least 2 items, got {}",
                n_items
            )));
        }
        let expected = n_items * (n_items - 1) / 2;
        if data.len() != expected {
            return Err(OsilError::InvalidDistance(format!(
                "expected {} pairwise entries for {} items, got {}",
                expected,
                n_items,
                data.len()
            )));
        }
        if let Some(bad) = data.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(OsilError::InvalidDistance(format!(
                "distances must be finite and nonnegative, got {}",
                bad
            )));
        }
        Ok(Self { data, n_items })
    }

    /// Pack a full square matrix given in row-major order, validating that it
    /// is symmetric with a zero diagonal.
    pub fn from_square(data: &[f64], n_items: usize) -> Result<Self, OsilError> {
        if data.len() != n_items * n_items {
            return Err(OsilError::InvalidDistance(format!(
                "expected a {0}x{0} matrix, got {1} entries",
                n_items,
                data.len()
            )));
        }
        for i in 0..n_items {
            if data[i * n_items + i].abs() > SYMMETRY_TOLERANCE {
                return Err(OsilError::InvalidDistance(format!(
                    "nonzero diagonal at ({i}, {i})"
                )));
            }
            for j in (i + 1)..n_items {
                let lower = data[j * n_items + i];
                if (data[i * n_items + j] - lower).abs() > SYMMETRY_TOLERANCE {
                    return Err(OsilError::InvalidDistance(format!(
                        "asymmetric at ({i}, {j})"
                    )));
                }
            }
        }
        let mut condensed = Vec::with_capacity(n_items * (n_items - 1) / 2);
        for i in 0..n_items {
            for j in (i + 1)..n_items {
                condensed.push(data[i * n_items + j]);
            }
        }
        Self::from_condensed(condensed, n_items)
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < self.n_items);
        i * self.n_items - i * (i + 1) / 2 + (j - i - 1)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => self.data[self.offset(i, j)],
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Greater => self.data[self.offset(j, i)],
        }
    }

    /// # Safety
    ///
    /// You're on your own: `i` and `j` must be distinct and below `n_items`.
    #[inline]
    pub unsafe fn get_unchecked(&self, i: usize, j: usize) -> f64 {
        if i < j {
            *self.data.get_unchecked(self.offset(i, j))
        } else {
            *self.data.get_unchecked(self.offset(j, i))
        }
    }

    /// Sum of distances from `row` to every index in `columns`.
    pub fn sum_over(&self, row: usize, columns: &[usize]) -> f64 {
        let mut sum = 0.0;
        for &j in columns {
            sum += self.get(row, j);
        }
        sum
    }

    /// Extract the sub-matrix over `indices`, so that entry (a, b) of the
    /// result equals the distance between `indices[a]` and `indices[b]`.
    pub fn sub_matrix(&self, indices: &[usize]) -> DistanceMatrix {
        let n = indices.len();
        debug_assert!(n >= 2);
        let mut condensed = Vec::with_capacity(n * (n - 1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                condensed.push(self.get(indices[a], indices[b]));
            }
        }
        DistanceMatrix {
            data: condensed,
            n_items: n,
        }
    }
}
