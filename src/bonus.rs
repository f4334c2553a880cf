use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::models::{Selection, MAX_PICKS};

/// Draw up to three unselected positions uniformly without replacement.
///
/// Sampling happens over the precomputed remainder, so a selected position
/// can never appear. Order is the draw order.
pub fn sample_bonus<R: Rng + ?Sized>(corpus_len: usize, selection: &Selection, rng: &mut R) -> Vec<usize> {
    let mut remainder: Vec<usize> = (0..corpus_len).filter(|&i| !selection.contains(i)).collect();
    let remaining = remainder.len();
    let (drawn, _) = remainder.partial_shuffle(rng, remaining.min(MAX_PICKS));
    debug!("Bonus sampled - remainder={}, drawn={:?}", remaining, drawn);
    drawn.to_vec()
}
