use rand::prelude::*;

/// A permutation of the item indices 0..n, used to draw uniform sub-samples.
#[derive(Debug, Clone)]
pub struct Permutation {
    order: Vec<usize>,
}

impl Permutation {
    pub fn natural(n_items: usize) -> Self {
        Self {
            order: (0..n_items).collect(),
        }
    }

    pub fn shuffle<T: Rng>(&mut self, rng: &mut T) {
        self.order.shuffle(rng);
    }

    /// The first `n` indices of the permutation.
    pub fn head(&self, n: usize) -> &[usize] {
        &self.order[..n]
    }

    /// The indices not in `head(n)`.
    pub fn tail(&self, n: usize) -> &[usize] {
        &self.order[n..]
    }
}
