//! Clustering by direct optimization of the average silhouette width (ASW)
//! over a precomputed pairwise distance matrix.
//!
//! Three engines share one piece of bookkeeping, the matrix of per-cluster
//! distance sums, which scores any candidate move in O(N·k) instead of
//! recomputing silhouettes from scratch:
//!
//! * [`pamsil`] — medoid-swap local search scored by ASW;
//! * [`effosil`] — exact best-single-reassignment search;
//! * [`scalosil`] — sub-sample search with out-of-sample extension.
//!
//! Each driver sweeps a set of candidate cluster counts and reports the
//! argmax-ASW clustering.
//!
//! ```
//! use osil::{DistanceMatrix, InitMethod, OsilVariant};
//!
//! // Two groups on the line: 0, 1, 2 and 10, 11, 12.
//! let positions = [0.0_f64, 1.0, 2.0, 10.0, 11.0, 12.0];
//! let mut condensed = Vec::new();
//! for i in 0..6 {
//!     for j in (i + 1)..6 {
//!         condensed.push((positions[i] - positions[j]).abs());
//!     }
//! }
//! let d = DistanceMatrix::from_condensed(condensed, 6).unwrap();
//! let sweep = osil::effosil(
//!     &d,
//!     &[2, 3],
//!     &[InitMethod::Average],
//!     OsilVariant::Efficient,
//!     usize::MAX,
//! )
//! .unwrap();
//! assert_eq!(sweep.best_k, 2);
//! assert!(sweep.best_asw > 0.8);
//! ```

mod clust;
mod dist;
mod error;
mod fosil;
mod init;
mod osil;
mod pamsil;
mod perm;
mod sil;
mod sweep;

pub use dist::DistanceMatrix;
pub use error::OsilError;
pub use fosil::{FosilParameters, FosilVariant};
pub use init::InitMethod;
pub use osil::OsilVariant;
pub use sil::asw_from_scratch;
pub use sweep::{effosil, pamsil, scalosil, SilSweep};
