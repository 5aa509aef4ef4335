//! Property-based tests for history chunking and gamma exposure.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;

use voldesk_core::analytics::{bin_index, gamma_exposure};
use voldesk_core::bars::{date_chunks, resume_point};
use voldesk_core::constants::CHUNK_DAYS;
use voldesk_core::gex::GammaObservation;
use voldesk_market_data::OptionRight;

// =============================================================================
// Generators
// =============================================================================

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// An import interval of up to 12 years, with an arbitrary end time of day.
fn arb_interval() -> impl Strategy<Value = (NaiveDateTime, NaiveDateTime)> {
    (0i64..4000, 0i64..(12 * 366 * 86_400)).prop_map(|(offset_days, length_secs)| {
        let start = base() + TimeDelta::days(offset_days);
        (start, start + TimeDelta::seconds(length_secs))
    })
}

fn arb_right() -> impl Strategy<Value = OptionRight> {
    prop_oneof![Just(OptionRight::Call), Just(OptionRight::Put)]
}

fn observation(strike: f64, right: OptionRight, open_interest: f64, gamma: f64) -> GammaObservation {
    GammaObservation {
        date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        symbol: "SPY".to_string(),
        expiry: "20250321".to_string(),
        strike,
        right,
        open_interest,
        gamma,
        multiplier: 100.0,
        und_price: 570.0,
    }
}

fn arb_observation() -> impl Strategy<Value = GammaObservation> {
    (0u32..80, arb_right(), 0u32..50_000, 0.0f64..0.2).prop_map(|(step, right, oi, gamma)| {
        observation(400.0 + 5.0 * f64::from(step), right, f64::from(oi), gamma)
    })
}

// =============================================================================
// Chunking
// =============================================================================

proptest! {
    #[test]
    fn chunks_cover_interval_contiguously((start, end) in arb_interval()) {
        let chunks = date_chunks(start, end);

        if start >= end {
            prop_assert!(chunks.is_empty());
        } else {
            let seconds = (end - start).num_seconds();
            let per_chunk = CHUNK_DAYS * 86_400;
            let expected = (seconds + per_chunk - 1) / per_chunk;
            prop_assert_eq!(chunks.len() as i64, expected);
            prop_assert_eq!(chunks[0].0, start);
            prop_assert_eq!(chunks[chunks.len() - 1].1, end);
            for (from, to) in &chunks {
                prop_assert!(from < to);
                prop_assert!(*to - *from <= TimeDelta::days(CHUNK_DAYS));
            }
            for pair in chunks.windows(2) {
                prop_assert_eq!(pair[0].1, pair[1].0);
            }
        }
    }

    #[test]
    fn resume_point_is_day_after_latest(offset in 0u64..5000) {
        let latest = base().date() + chrono::Days::new(offset);
        prop_assert_eq!(resume_point(Some(latest)) - latest, TimeDelta::days(1));
    }
}

// =============================================================================
// Gamma exposure
// =============================================================================

proptest! {
    #[test]
    fn mirrored_positions_net_to_zero(rows in prop::collection::vec(arb_observation(), 0..40)) {
        let mirrored: Vec<GammaObservation> = rows
            .iter()
            .flat_map(|row| {
                let mut put = row.clone();
                let mut call = row.clone();
                call.right = OptionRight::Call;
                put.right = OptionRight::Put;
                [call, put]
            })
            .collect();

        let gex = gamma_exposure(&mirrored);
        for strike in &gex.strikes {
            prop_assert_eq!(strike.net, 0.0);
        }
        prop_assert_eq!(gex.net_total, 0.0);
        prop_assert_eq!(gex.absolute_total, 0.0);
    }

    #[test]
    fn absolute_total_bounds_net_total(rows in prop::collection::vec(arb_observation(), 0..40)) {
        let gex = gamma_exposure(&rows);
        prop_assert!(gex.net_total.abs() <= gex.absolute_total + 1e-9);
        let mut strikes: Vec<f64> = gex.strikes.iter().map(|s| s.strike).collect();
        let mut sorted = strikes.clone();
        sorted.sort_by(f64::total_cmp);
        prop_assert_eq!(&strikes, &sorted);
        strikes.dedup();
        prop_assert_eq!(strikes.len(), gex.strikes.len());
    }

    #[test]
    fn every_finite_return_has_a_bin(ret in -0.5f64..0.5) {
        prop_assert!(bin_index(ret, true).map_or(false, |b| b < 16));
        prop_assert!(bin_index(ret, false).map_or(false, |b| b < 8));
    }
}
