//! Qualitative colours for categorical map values.
//!
//! Matplotlib's `tab20` resampled to the number of distinct values: value
//! `i` of `n` sits at `i·(1/(n−1))` on `[0, 1]`, which is scaled by 20 and
//! truncated (1.0 maps to 19). The arithmetic is done in `f64` exactly as
//! the resampling does, so rounding picks the same entries. Small sets spread
//! across the whole table and sets larger than 20 repeat colours.

/// Fill for cells whose value has no assigned colour.
pub const DEFAULT_FILL: &str = "#88d8b0";

pub const TAB20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Colour of the `i`-th of `n` distinct values.
pub fn color(i: usize, n: usize) -> &'static str {
    if n <= 1 {
        return TAB20[0];
    }
    let position = if i + 1 >= n {
        1.0
    } else {
        i as f64 * (1.0 / (n - 1) as f64)
    };
    let idx = ((position * TAB20.len() as f64) as usize).min(TAB20.len() - 1);
    TAB20[idx]
}

/// Colours for `n` distinct values, in order.
pub fn colors(n: usize) -> Vec<&'static str> {
    (0..n).map(|i| color(i, n)).collect()
}
