use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// Path extension is neither `.xlsx` nor `.xls`. The caller decides
    /// what to do; library code never terminates the process.
    UnsupportedFileKind(String),
    /// Requested sheet absent, or a multi-sheet file opened without a
    /// sheet name.
    MissingSheet(String),
    /// Underlying workbook reader/writer failure.
    Workbook(String),
    /// CSV parse failure.
    Csv(String),
    /// Filesystem error.
    Io(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFileKind(msg) => write!(f, "unsupported file kind: {msg}"),
            Self::MissingSheet(msg) => write!(f, "missing sheet: {msg}"),
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::Csv(msg) => write!(f, "csv error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io(e.to_string())
    }
}
