/// Category of an engine failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionKind {
    InvalidArgument,
    LogicError,
    OutOfRange,
    Io,
}

impl ExceptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionKind::InvalidArgument => "invalid_argument",
            ExceptionKind::LogicError => "logic_error",
            ExceptionKind::OutOfRange => "out_of_range",
            ExceptionKind::Io => "io_error",
        }
    }
}

/// Opaque error raised by the engine.
///
/// The message is only reachable through [`NativeException::into_message`],
/// which consumes the exception: a failure is translated exactly once.
#[derive(Debug, thiserror::Error)]
#[error("native exception ({})", .kind.as_str())]
#[must_use]
pub struct NativeException {
    kind: ExceptionKind,
    message: String,
}

pub type NativeResult<T> = Result<T, NativeException>;

impl NativeException {
    pub(crate) fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::InvalidArgument, message)
    }

    pub(crate) fn logic_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::LogicError, message)
    }

    pub(crate) fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::OutOfRange, message)
    }

    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    /// Message text without the kind; the kind stays available through
    /// [`NativeException::kind`] before the exception is consumed.
    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<std::io::Error> for NativeException {
    fn from(err: std::io::Error) -> Self {
        Self::new(ExceptionKind::Io, err.to_string())
    }
}
