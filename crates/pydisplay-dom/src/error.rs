//! Errors raised by `display()`.

use crate::document::DomError;
use pydisplay_core::ReprError;
use thiserror::Error;

/// Errors that can occur while displaying values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// An explicit empty-string target.
    #[error("Cannot have an empty target")]
    EmptyTarget,

    /// A target that is neither a string nor absent.
    #[error("target must be str or None, not {0}")]
    TargetType(String),

    /// No element has the requested id.
    #[error("Invalid selector with id={0}. Cannot be found in the page.")]
    TargetNotFound(String),

    /// No explicit target and no active display context.
    #[error("No implicit target available: display() was called outside a script or cell body. Pass target= explicitly.")]
    NoImplicitTarget,

    /// A value's own formatter failed.
    #[error(transparent)]
    Repr(#[from] ReprError),

    /// The host document rejected an operation.
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Exception class a host should raise for a [`DisplayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad target value.
    ValueError,
    /// Target of the wrong type.
    TypeError,
    /// Failure inside a value's formatter.
    FormatterError,
    /// Failure inside the host document.
    DocumentError,
}

impl ErrorKind {
    /// The exception class name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ValueError => "ValueError",
            Self::TypeError => "TypeError",
            Self::FormatterError => "FormatterError",
            Self::DocumentError => "DocumentError",
        }
    }
}

impl DisplayError {
    /// The exception class this error maps to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTarget | Self::TargetNotFound(_) | Self::NoImplicitTarget => {
                ErrorKind::ValueError
            }
            Self::TargetType(_) => ErrorKind::TypeError,
            Self::Repr(_) => ErrorKind::FormatterError,
            Self::Dom(_) => ErrorKind::DocumentError,
        }
    }
}
