/// Classification of gateway failures.
///
/// There is no retry anywhere: the class only decides how far a failure propagates.
///
/// # Behavior Summary
///
/// | Class | Continue loop? | Abort operation? |
/// |-------|----------------|------------------|
/// | `Connection` | No | Yes, surfaced once to the user |
/// | `Resolution` | Yes (next instrument) | No |
/// | `Empty` | Yes (next chunk / strike) | No |
/// | `Fatal` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// Gateway unreachable.
    Connection,

    /// The symbol could not be classified or qualified.
    /// Aborts the operation for that instrument only.
    Resolution,

    /// Expected absence of data (no bars in range, no model for a strike).
    Empty,

    /// Any other failure; aborts the current operation.
    Fatal,
}
