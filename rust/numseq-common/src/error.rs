use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn empty_value(context: impl Into<String>) -> Error {
        Error(
            ErrorKind::EmptyValue {
                context: context.into(),
            }
            .into(),
        )
    }

    pub fn reuse(operation: impl Into<String>) -> Error {
        Error(
            ErrorKind::Reuse {
                operation: operation.into(),
            }
            .into(),
        )
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        Error(
            ErrorKind::TypeMismatch {
                expected: expected.into(),
                actual: actual.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    /// Returns `true` if this error reports a terminal operation on a closed sequence.
    pub fn is_reuse(&self) -> bool {
        matches!(self.kind(), ErrorKind::Reuse { .. })
    }

    /// Returns `true` if this error reports a value requested from an empty optional.
    pub fn is_empty_value(&self) -> bool {
        matches!(self.kind(), ErrorKind::EmptyValue { .. })
    }

    /// Returns `true` if this error reports an element of the wrong kind.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), ErrorKind::TypeMismatch { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("no value present: {context}")]
    EmptyValue { context: String },

    #[error("sequence has already been operated upon or closed ({operation})")]
    Reuse { operation: String },

    #[error("element kind mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
