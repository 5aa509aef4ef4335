//! Read-only analytics over stored bars and option observations.

mod distribution;
mod gamma_exposure;
mod har_rv;
mod historical_vol;
mod period;
mod realized_vol;
mod returns;
mod weekday;

pub use distribution::{
    bin_index, return_distribution, DistributionRow, ReturnDistribution, ABSOLUTE_LABELS,
    SIGNED_LABELS,
};
pub use gamma_exposure::{gamma_exposure, observation_exposure, GammaExposure, StrikeExposure};
pub use har_rv::{
    fit_har_rv, variance_to_vol, HarCoefficients, HarForecast, HarRvFit, HarRvPoint,
};
pub use historical_vol::{
    atm_iv_by_date, historical_volatility, HistoricalVolRow, HistoricalVolatility,
};
pub use period::Period;
pub use realized_vol::{realized_volatility, RealizedVolRow, RealizedVolSeries};
pub use returns::{
    daily_returns, rolling_mean, rolling_std, weekday_sessions, DailyReturn, ReturnMeasure,
    ReturnMode,
};
pub use weekday::{weekday_heatmap, WeekdayRow, WEEKDAY_LABELS};
