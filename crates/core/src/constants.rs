/// First date requested for an instrument with no stored series (2015-01-01)
pub const HISTORY_EPOCH: (i32, u32, u32) = (2015, 1, 1);

/// Maximum length of one historical bar request, in days
pub const CHUNK_DAYS: i64 = 365;

/// Date format of every stored date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Spacing of option strike ladders
pub const STRIKE_STEP: f64 = 5.0;

/// Strikes on each side of the centre strike when sampling Greeks
pub const GREEKS_STRIKES_EACH_SIDE: i32 = 2;

/// Strikes on each side of the centre strike when fetching gamma
pub const GEX_STRIKES_EACH_SIDE: i32 = 20;

/// Exchange of future options on futures underlyings
pub const FOP_EXCHANGE: &str = "CME";

/// Routing exchange of equity and index options in the gamma fetch
pub const OPTION_ROUTING_EXCHANGE: &str = "SMART";

/// Contract multiplier recorded for gamma observations
pub const GEX_CONTRACT_MULTIPLIER: f64 = 100.0;

/// Delta of the at-the-money reference option
pub const ATM_DELTA: f64 = 0.5;

/// Sessions per year used to annualise volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Rolling windows (in sessions) of realized and historical volatility
pub const VOLATILITY_WINDOWS: [usize; 5] = [5, 20, 60, 120, 252];

/// Minimum clean rows before a HAR-RV regression is attempted
pub const HAR_MIN_ROWS: usize = 30;

/// Confidence level of the HAR-RV forecast interval
pub const HAR_CONFIDENCE: f64 = 0.95;
