use std::fmt;
use std::sync::Arc;

use crate::decomposition::DecompositionTable;
use crate::error::Result;
use crate::registry;

/// ONNX opset targeted when none is requested.
pub const DEFAULT_OPSET_VERSION: i64 = 18;

/// Options for one FX-to-ONNX export.
///
/// Patched with [`update`](Self::update) before the export starts, then
/// treated as read-only for its duration.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// The ONNX opset version to export to.
    pub opset_version: i64,
    /// Whether the model is returned in binary protobuf form.
    pub use_binary_format: bool,
    /// Whether to validate each operator's lowering while exporting.
    pub op_level_debug: bool,
    /// Decompositions applied to operators without a direct exporter.
    pub decomposition_table: Arc<DecompositionTable>,
}

/// Names of the fields [`ExportOptions::update`] recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    OpsetVersion,
    UseBinaryFormat,
    OpLevelDebug,
    DecompositionTable,
}

impl OptionField {
    pub const ALL: [OptionField; 4] = [
        OptionField::OpsetVersion,
        OptionField::UseBinaryFormat,
        OptionField::OpLevelDebug,
        OptionField::DecompositionTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionField::OpsetVersion => "opset_version",
            OptionField::UseBinaryFormat => "use_binary_format",
            OptionField::OpLevelDebug => "op_level_debug",
            OptionField::DecompositionTable => "decomposition_table",
        }
    }

    pub fn from_name(name: &str) -> Option<OptionField> {
        OptionField::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    fn expected_kind(&self) -> &'static str {
        match self {
            OptionField::OpsetVersion => "integer",
            OptionField::UseBinaryFormat | OptionField::OpLevelDebug => "boolean",
            OptionField::DecompositionTable => "decomposition table",
        }
    }
}

impl fmt::Display for OptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value passed to [`ExportOptions::update`].
#[derive(Debug, Clone)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Decompositions(Arc<DecompositionTable>),
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<Arc<DecompositionTable>> for OptionValue {
    fn from(v: Arc<DecompositionTable>) -> Self {
        OptionValue::Decompositions(v)
    }
}

/// A non-fatal problem found by [`ExportOptions::update`]. The offending
/// update is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateIssue {
    UnknownField(String),
    TypeMismatch {
        field: OptionField,
        expected: &'static str,
    },
}

impl fmt::Display for UpdateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateIssue::UnknownField(name) => write!(f, "ExportOptions has no attribute {}", name),
            UpdateIssue::TypeMismatch { field, expected } => {
                write!(f, "ExportOptions.{} expects a {} value", field, expected)
            }
        }
    }
}

impl ExportOptions {
    /// Default options using the process-wide decomposition table.
    ///
    /// # Errors
    /// Propagates a failure to build the process-wide registry.
    pub fn new() -> Result<Self> {
        Ok(Self::with_decomposition_table(registry::global()?.decomposition_table()))
    }

    /// Default options with an explicit decomposition table.
    pub fn with_decomposition_table(decomposition_table: Arc<DecompositionTable>) -> Self {
        Self {
            opset_version: DEFAULT_OPSET_VERSION,
            use_binary_format: true,
            op_level_debug: false,
            decomposition_table,
        }
    }

    /// Overwrite the named fields.
    ///
    /// Unknown names and values of the wrong kind are skipped with a warning
    /// and returned; the remaining updates are still applied.
    pub fn update<I, K>(&mut self, updates: I) -> Vec<UpdateIssue>
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: AsRef<str>,
    {
        let mut issues = Vec::new();
        for (name, value) in updates {
            let name = name.as_ref();
            let issue = match OptionField::from_name(name) {
                Some(field) => self.set(field, value).err(),
                None => Some(UpdateIssue::UnknownField(name.to_string())),
            };
            if let Some(issue) = issue {
                tracing::warn!("{}", issue);
                issues.push(issue);
            }
        }
        issues
    }

    fn set(
        &mut self,
        field: OptionField,
        value: OptionValue,
    ) -> std::result::Result<(), UpdateIssue> {
        match (field, value) {
            (OptionField::OpsetVersion, OptionValue::Int(v)) => self.opset_version = v,
            (OptionField::UseBinaryFormat, OptionValue::Bool(v)) => self.use_binary_format = v,
            (OptionField::OpLevelDebug, OptionValue::Bool(v)) => self.op_level_debug = v,
            (OptionField::DecompositionTable, OptionValue::Decompositions(v)) => {
                self.decomposition_table = v
            }
            (field, _) => {
                return Err(UpdateIssue::TypeMismatch {
                    field,
                    expected: field.expected_kind(),
                })
            }
        }
        Ok(())
    }
}
