use crate::types::DiagnosticResult;

/// Checks whether a slice contains NaN or Inf
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Clamps a value into [0, 1]; NaN becomes 0
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Health check for a flattened weight vector
pub fn diagnose_weights(weights: &[f64]) -> DiagnosticResult {
    let mut has_nan = false;
    let mut has_inf = false;
    let mut min_weight = f64::MAX;
    let mut max_weight = f64::MIN;

    for &w in weights {
        if w.is_nan() {
            has_nan = true;
            continue;
        }
        if w.is_infinite() {
            has_inf = true;
            continue;
        }
        min_weight = min_weight.min(w);
        max_weight = max_weight.max(w);
    }

    if min_weight > max_weight {
        min_weight = 0.0;
        max_weight = 0.0;
    }

    let is_healthy = !has_nan && !has_inf;
    let message = if has_nan {
        "weights contain NaN".to_string()
    } else if has_inf {
        "weights contain Inf".to_string()
    } else {
        format!("{} weights in [{:.4}, {:.4}]", weights.len(), min_weight, max_weight)
    };

    DiagnosticResult {
        is_healthy,
        has_nan,
        has_inf,
        min_weight,
        max_weight,
        message,
    }
}
