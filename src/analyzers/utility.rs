use indexmap::IndexMap;

/// Rounds `x` to three decimal places.
///
/// The decimal point is moved by rewriting the exponent of the shortest
/// decimal representation of `x` instead of multiplying by 1000, so inputs
/// such as `0.5005` (stored as `0.50049999...`) still round up to `0.501`.
/// Halves round toward positive infinity, so `-1.0005` becomes `-1.0`.
/// Non-finite values are returned unchanged.
pub fn round3(x: f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }

    let shifted = shift_decimal(x, 3);
    if !shifted.is_finite() {
        return x;
    }

    // `+ 0.0` folds a rounded `-0.0` into `0.0`
    shift_decimal(round_half_up(shifted), -3) + 0.0
}

/// Nearest integer, halves going up. `shifted - floor` is exact here, unlike
/// `shifted + 0.5` which can round `0.49999999999999994` up to `1.0`.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Multiplies `x` by `10^places` exactly at the decimal string level.
fn shift_decimal(x: f64, places: i32) -> f64 {
    let repr = format!("{x:e}");
    let Some((mantissa, exp)) = repr.split_once('e') else {
        return x * 10f64.powi(places);
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return x * 10f64.powi(places);
    };

    format!("{mantissa}e{}", exp + places)
        .parse()
        .unwrap_or_else(|_| x * 10f64.powi(places))
}

/// Arithmetic mean. `NaN` for empty input.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value of the numerically sorted input; the average of the two
/// middle values for even counts. `NaN` for empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value. Ties go to the value seen first. `NaN` for empty input.
pub fn mode(values: &[f64]) -> f64 {
    let mut counts: IndexMap<u64, (f64, usize)> = IndexMap::new();

    for &v in values {
        counts.entry(value_key(v)).or_insert((v, 0)).1 += 1;
    }

    let mut best = f64::NAN;
    let mut best_count = 0;
    for &(value, count) in counts.values() {
        if count > best_count {
            best = value;
            best_count = count;
        }
    }

    best
}

/// Identity of a value for frequency counting: `0.0 == -0.0` and all NaNs
/// count as one value.
fn value_key(v: f64) -> u64 {
    if v == 0.0 {
        0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}
