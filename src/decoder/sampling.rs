//! Score shaping and sampling over a legal candidate set
//!
//! All functions work on the weights of legal candidates only; the decoder
//! has already dropped every other vocabulary entry.

use rand::Rng;

use super::ScoreKind;

/// Unnormalized weights for legal candidate scores at `temperature`
///
/// Both kinds are shaped in log space: logits as given, probabilities as
/// `ln p`. Weights are `exp((s - max) / T)`, which is `p^(1/T)` rescaled for
/// probabilities and cannot underflow to all zeros at low temperature.
/// Entries at `+inf` share all of the mass. NaN, `-inf` and non-positive
/// probabilities weigh zero; if nothing is left every weight is zero.
pub(crate) fn shape(scores: &[f32], kind: ScoreKind, temperature: f64) -> Vec<f64> {
    let log_scores: Vec<f64> = scores
        .iter()
        .map(|&s| {
            let s = f64::from(s);
            match kind {
                ScoreKind::Logits => s,
                ScoreKind::Probabilities if s > 0.0 => s.ln(),
                ScoreKind::Probabilities => f64::NEG_INFINITY,
            }
        })
        .collect();

    if log_scores.iter().any(|&s| s == f64::INFINITY) {
        return log_scores
            .iter()
            .map(|&s| if s == f64::INFINITY { 1.0 } else { 0.0 })
            .collect();
    }

    let max = log_scores
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; scores.len()];
    }
    log_scores
        .iter()
        .map(|&s| if s.is_finite() { ((s - max) / temperature).exp() } else { 0.0 })
        .collect()
}

/// Zero every weight outside the `k` largest; ties keep the earlier index
pub(crate) fn keep_top_k(weights: &mut [f64], k: usize) {
    if k >= weights.len() {
        return;
    }
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));
    for &index in &order[k..] {
        weights[index] = 0.0;
    }
}

/// Normalize in place, falling back to uniform when there is no usable mass
pub(crate) fn normalize(weights: &mut [f64]) {
    let total: f64 = weights.iter().sum();
    if total.is_finite() && total > 0.0 {
        for w in weights.iter_mut() {
            *w /= total;
        }
    } else {
        let uniform = 1.0 / weights.len() as f64;
        weights.fill(uniform);
    }
}

/// Index of the largest probability, lowest index on ties
pub(crate) fn argmax(probabilities: &[f64]) -> Option<usize> {
    probabilities
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, &p)| match best {
            Some((_, top)) if top >= p => best,
            _ => Some((index, p)),
        })
        .map(|(index, _)| index)
}

/// Draw an index proportional to `probabilities`
///
/// Never returns an index with zero probability.
pub(crate) fn sample<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> Option<usize> {
    let draw: f64 = rng.random::<f64>();
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (index, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(index);
        if draw < cumulative {
            return Some(index);
        }
    }
    // Rounding can leave the cumulative sum just below 1.0
    last_positive
}
