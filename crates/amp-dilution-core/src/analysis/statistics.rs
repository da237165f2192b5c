/// Median of the finite values in `data`; even counts average the two middle
/// values.
pub fn median(data: &[f64]) -> Option<f64> {
    let mut v: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;

    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) * 0.5)
    } else {
        Some(v[mid])
    }
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Split the finite values into `n_bins` equal-width bins spanning
/// `[min, max]`. Every bin is half-open except the last, which also holds
/// `max`. A single distinct value is centred in a range one unit wide.
pub fn histogram(data: &[f64], n_bins: usize) -> Vec<Bin> {
    let values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            lower: min + width * i as f64,
            upper: if i + 1 == n_bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }

    bins
}
