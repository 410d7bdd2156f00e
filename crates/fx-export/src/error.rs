use thiserror::Error;

use crate::overload::OperatorOverload;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no exporter or decomposition for operator {0}")]
    UnsupportedOperator(OperatorOverload),
    #[error("no target type code for dtype argument {0}")]
    UnmappedDataType(String),
    #[error("malformed operator family '{namespace}::{name}': {reason}")]
    MalformedFamily {
        namespace: String,
        name: String,
        reason: String,
    },
    #[error("override for {overload} targets exporter key '{key}' which is not in the catalog")]
    OverrideWithoutExporter { overload: OperatorOverload, key: String },
    #[error("exporter key '{0}' is already registered")]
    DuplicateExporter(String),
    #[error("decomposition source lists {0} more than once")]
    DuplicateDecomposition(OperatorOverload),
    #[error("framework sources are not installed")]
    SourcesNotInstalled,
    #[error("framework sources are already installed")]
    SourcesAlreadyInstalled,
    #[error("{function} expects {expected} inputs, got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("{function} requires attribute '{name}'")]
    MissingAttribute { function: String, name: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;
