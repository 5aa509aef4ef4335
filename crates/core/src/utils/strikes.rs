//! Strike ladders around a spot price.

/// `spot` rounded to the nearest multiple of `step`; halves go to the even multiple.
pub fn round_to_step(spot: f64, step: f64) -> f64 {
    (spot / step).round_ties_even() * step
}

/// `2 * each_side + 1` strikes spaced by `step`, centred on the rounded spot.
pub fn strike_ladder(spot: f64, step: f64, each_side: i32) -> Vec<f64> {
    let centre = round_to_step(spot, step);
    (-each_side..=each_side)
        .map(|i| centre + f64::from(i) * step)
        .collect()
}
