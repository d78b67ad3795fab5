//! Error types for FunText.

use thiserror::Error;

use crate::AnimationType;

/// Result type for FunText operations.
pub type Result<T> = std::result::Result<T, FunTextError>;

/// Errors raised by configuration checks and the mount lifecycle.
///
/// The plain compiler never produces these; malformed animations only fail
/// when compiled through [`compile_checked`](crate::compile_checked).
#[derive(Error, Debug)]
pub enum FunTextError {
    /// The container refused a shadow root.
    #[error("couldn't attach shadow root to container: {0}")]
    AttachShadow(String),

    /// The container's shadow root already hosts another instance.
    #[error("container already in use")]
    ContainerInUse,

    /// The container failed to show fragments or its placeholder.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Containers can only be replaced while unmounted.
    #[error("cannot switch containers while mounted")]
    ContainerSwitchWhileMounted,

    /// A lifecycle operation ran before `build()`.
    #[error("object must be built before {action}")]
    NotBuilt {
        /// The operation that was attempted
        action: &'static str,
    },

    /// An animation failed validation.
    #[error("invalid `{kind}` animation: {reason}")]
    InvalidAnimation { kind: AnimationType, reason: String },

    /// A keyword string did not name a known value.
    #[error("unknown {what} `{value}`")]
    UnknownKeyword { what: &'static str, value: String },

    /// A TOML configuration could not be parsed.
    #[cfg(feature = "toml")]
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl FunTextError {
    pub(crate) fn invalid(kind: AnimationType, reason: impl Into<String>) -> Self {
        FunTextError::InvalidAnimation {
            kind,
            reason: reason.into(),
        }
    }
}
