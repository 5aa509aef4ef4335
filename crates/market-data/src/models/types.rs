use std::borrow::Cow;

/// Gateway exchange code (e.g. "CBOE", "SMART") - mostly static
pub type Exchange = Cow<'static, str>;

/// Currency code (ISO 4217) - mostly static
pub type Currency = Cow<'static, str>;

/// Gateway-assigned contract identifier
pub type ContractId = i64;

/// Handle of a live quote subscription
pub type TickerId = u64;
