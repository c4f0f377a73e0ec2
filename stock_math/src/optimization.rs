//! Derivative-free minimisation for model parameter estimation
//!
//! The smoothing and ARIMA fits minimise a sum of squared one-step errors
//! over a handful of bounded coefficients; a Nelder-Mead simplex search is
//! enough for that and needs no gradient.

use crate::{MathError, Result};
use std::cmp::Ordering;

/// Tuning knobs for [`nelder_mead`]
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop once the spread of objective values across the simplex drops below this
    pub tolerance: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
    /// Relative size of the initial simplex around the starting point
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex search
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimise `objective` starting from `initial`, clamping every trial point
/// into `bounds` (one `(low, high)` pair per dimension).
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    config: NelderMeadConfig,
) -> Result<NelderMeadResult>
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return Err(MathError::InvalidInput(
            "Cannot optimise over zero parameters".to_string(),
        ));
    }
    if bounds.len() != dim {
        return Err(MathError::InvalidInput(format!(
            "Expected {} bounds, got {}",
            dim,
            bounds.len()
        )));
    }

    let clamp = |point: Vec<f64>| -> Vec<f64> {
        point
            .into_iter()
            .zip(bounds)
            .map(|(x, &(lo, hi))| x.clamp(lo, hi))
            .collect()
    };
    // Non-finite objective values sort last so they are replaced first
    let eval = |point: &[f64]| -> f64 {
        let v = objective(point);
        if v.is_finite() {
            v
        } else {
            f64::MAX
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(clamp(initial.to_vec()));
    for i in 0..dim {
        let mut vertex = initial.to_vec();
        vertex[i] += if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(clamp(vertex));
    }
    let mut scores: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));
        let (best, worst, second_worst) = (order[0], order[dim], order[dim - 1]);

        if scores[worst] - scores[best] < config.tolerance {
            converged = true;
            break;
        }

        let centroid = centroid_without(&simplex, worst);
        let toward = |from: &[f64], coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(from)
                .map(|(c, p)| c + coef * (p - c))
                .collect()
        };

        let reflected = clamp(toward(&simplex[worst], -config.reflection));
        let reflected_score = eval(&reflected);

        if reflected_score < scores[best] {
            let expanded = clamp(toward(&reflected, config.expansion));
            let expanded_score = eval(&expanded);
            if expanded_score < reflected_score {
                simplex[worst] = expanded;
                scores[worst] = expanded_score;
            } else {
                simplex[worst] = reflected;
                scores[worst] = reflected_score;
            }
            continue;
        }

        if reflected_score < scores[second_worst] {
            simplex[worst] = reflected;
            scores[worst] = reflected_score;
            continue;
        }

        // Contract toward whichever of the reflected and worst points is better
        let (anchor, anchor_score) = if reflected_score < scores[worst] {
            (reflected, reflected_score)
        } else {
            (simplex[worst].clone(), scores[worst])
        };
        let contracted = clamp(toward(&anchor, config.contraction));
        let contracted_score = eval(&contracted);
        if contracted_score < anchor_score {
            simplex[worst] = contracted;
            scores[worst] = contracted_score;
            continue;
        }

        let best_point = simplex[best].clone();
        for i in 0..=dim {
            if i == best {
                continue;
            }
            let shrunk: Vec<f64> = best_point
                .iter()
                .zip(&simplex[i])
                .map(|(b, x)| b + config.shrink * (x - b))
                .collect();
            simplex[i] = clamp(shrunk);
            scores[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=dim)
        .min_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal))
        .unwrap_or(0);

    if scores[best] == f64::MAX {
        return Err(MathError::CalculationError(
            "Objective was not finite anywhere in the search region".to_string(),
        ));
    }

    Ok(NelderMeadResult {
        point: simplex[best].clone(),
        value: scores[best],
        iterations,
        converged,
    })
}

fn centroid_without(simplex: &[Vec<f64>], skip: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let mut centroid = vec![0.0; dim];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == skip {
            continue;
        }
        for (c, x) in centroid.iter_mut().zip(vertex) {
            *c += x;
        }
    }
    let count = (simplex.len() - 1) as f64;
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}
