use backend::NativeException;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine exception, already translated to text.
    #[error("engine error: {0}")]
    Engine(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Use of a handle whose native instance has been released.
    #[error("{0} has been released")]
    Released(&'static str),

    #[error("invalid artifact: {0}")]
    Artifact(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NativeException> for Error {
    fn from(e: NativeException) -> Self {
        Error::Engine(e.into_message())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
