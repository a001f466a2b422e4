//! Reserved parameter keys of the x-callback-url convention.

/// Host component of every URL built by this crate.
pub const CALLBACK_HOST: &str = "x-callback-url";

/// Identity of the requesting application.
pub const SOURCE_APP_KEY: &str = "x-source";
/// Return URL launched when the action succeeds.
pub const SUCCESS_KEY: &str = "x-success";
/// Return URL launched when the action fails.
pub const ERROR_KEY: &str = "x-error";
/// Return URL launched when the action is cancelled.
pub const CANCEL_KEY: &str = "x-cancel";
/// Numeric failure code added to error return URLs.
pub const ERROR_CODE_KEY: &str = "errorCode";
/// Failure message added to error return URLs.
pub const ERROR_MESSAGE_KEY: &str = "errorMessage";

/// The three outcomes a request can embed a return URL for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// `x-success`
    Success,
    /// `x-error`
    Error,
    /// `x-cancel`
    Cancel,
}

impl ReturnKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::Success, Self::Error, Self::Cancel];

    /// Parameter key holding the return URL for this kind.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Success => SUCCESS_KEY,
            Self::Error => ERROR_KEY,
            Self::Cancel => CANCEL_KEY,
        }
    }
}
