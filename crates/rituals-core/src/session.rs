/// How a ritual invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The user backed out before the session began. Nothing was logged.
    Aborted,
    /// The quit key ended a timed phase early.
    Interrupted,
    Completed,
}
