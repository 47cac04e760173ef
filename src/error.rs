use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    IoError(io::Error),
    ReadError(&'static str, io::Error),
    WriteError(&'static str, io::Error),
    // Key computation errors, surfaced to whoever builds the part
    IllegalTypeOfArgument(String),
    IllegalColumn(String),
    BadArguments(String),
    NumberOfArgumentsDoesntMatch(String),
    UnknownFunction(String),
    UnknownIdentifier(String),
    IllegalKey(String),
    // Part loading
    CorruptedData(String),
    ChecksumMismatch(String),
    // Part building
    InvalidPartitionValue(String),
    InvalidOperation(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(err) => write!(f, "I/O error: {}", err),
            Error::ReadError(context, err) => write!(f, "Failed to read {}: {}", context, err),
            Error::WriteError(context, err) => write!(f, "Failed to write {}: {}", context, err),
            Error::IllegalTypeOfArgument(msg) => write!(f, "Illegal type of argument: {}", msg),
            Error::IllegalColumn(msg) => write!(f, "Illegal column: {}", msg),
            Error::BadArguments(msg) => write!(f, "Bad arguments: {}", msg),
            Error::NumberOfArgumentsDoesntMatch(msg) => {
                write!(f, "Number of arguments doesn't match: {}", msg)
            }
            Error::UnknownFunction(name) => write!(f, "Unknown function: {}", name),
            Error::UnknownIdentifier(name) => write!(f, "Unknown identifier: {}", name),
            Error::IllegalKey(msg) => write!(f, "Illegal key: {}", msg),
            Error::CorruptedData(msg) => write!(f, "Corrupted data: {}", msg),
            Error::ChecksumMismatch(file) => write!(f, "Checksum mismatch for {}", file),
            Error::InvalidPartitionValue(msg) => write!(f, "Invalid partition value: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) | Error::ReadError(_, err) | Error::WriteError(_, err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// Whether the error means the stored part cannot be trusted.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptedData(_) | Error::ChecksumMismatch(_))
    }
}
