//! Standard normal helpers and truncated Gaussian corrections
//!
//! `v` is the mean shift and `w` the variance shrink factor of a Gaussian
//! performance difference truncated by the observed result. Arguments are
//! already normalized by the total performance spread `c`.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("standard normal parameters are valid")
}

/// Standard normal density
pub fn pdf(x: f64) -> f64 {
    standard_normal().pdf(x)
}

/// Standard normal cumulative distribution
pub fn cdf(x: f64) -> f64 {
    standard_normal().cdf(x)
}

/// Inverse of [`cdf`] for `p` in [0, 1]
pub fn ppf(p: f64) -> f64 {
    standard_normal().inverse_cdf(p.clamp(0.0, 1.0))
}

/// Performance-difference threshold below which a game counts as a draw
pub fn draw_margin(draw_probability: f64, beta: f64, total_players: usize) -> f64 {
    ppf((draw_probability + 1.0) / 2.0) * (total_players as f64).sqrt() * beta
}

/// Mean correction for a win by normalized margin `t`
pub fn v_win(t: f64, epsilon: f64) -> f64 {
    let x = t - epsilon;
    let denom = cdf(x);
    if denom > f64::MIN_POSITIVE {
        pdf(x) / denom
    } else {
        // Deep upset: the ratio tends to -x
        -x
    }
}

/// Variance correction for a win by normalized margin `t`
pub fn w_win(t: f64, epsilon: f64) -> f64 {
    let x = t - epsilon;
    let denom = cdf(x);
    if denom > f64::MIN_POSITIVE {
        let v = v_win(t, epsilon);
        v * (v + x)
    } else if x < 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Mean correction for a draw at normalized margin `t`
pub fn v_draw(t: f64, epsilon: f64) -> f64 {
    let abs_t = t.abs();
    let a = epsilon - abs_t;
    let b = -epsilon - abs_t;
    let denom = cdf(a) - cdf(b);
    // With a vanishing margin the draw pins the difference to zero
    let v = if denom > f64::MIN_POSITIVE {
        (pdf(b) - pdf(a)) / denom
    } else {
        a
    };
    if t < 0.0 {
        -v
    } else {
        v
    }
}

/// Variance correction for a draw at normalized margin `t`
pub fn w_draw(t: f64, epsilon: f64) -> f64 {
    let abs_t = t.abs();
    let a = epsilon - abs_t;
    let b = -epsilon - abs_t;
    let denom = cdf(a) - cdf(b);
    if denom > f64::MIN_POSITIVE {
        let v = v_draw(abs_t, epsilon);
        v * v + (a * pdf(a) - b * pdf(b)) / denom
    } else {
        1.0
    }
}
