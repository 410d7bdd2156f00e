//! `fx-export` - Operator exporter resolution for FX-to-ONNX export.
//!
//! This crate provides:
//! - An `ExporterCatalog` mapping exporter keys to ONNX lowering functions
//! - An `OverloadResolutionTable` collapsing every overload of a catalogued
//!   operator family onto the family's exporter key
//! - A `DecompositionTable` holding the framework decompositions for operators
//!   without a direct exporter, minus reference-only ones
//! - A process-wide, build-once `ExporterRegistry` bundling the three
//! - `ExportOptions`, the per-export configuration record
//! - Normalization of literal arguments and keyword arguments for ONNX
//!
//! The operator overload list and the decomposition table come from the
//! source framework through the `OverloadSource` and `DecompositionSource`
//! traits.

pub mod catalog;
pub mod decomposition;
pub mod error;
pub mod graph;
pub mod literal;
pub mod normalize;
pub mod options;
pub mod overload;
pub mod registry;
pub mod resolution;

// Re-export primary types at the crate root for convenience.
pub use catalog::{ExporterCatalog, ExporterFunction};
pub use decomposition::{
    Argument, DecompositionFunction, DecompositionSource, DecompositionTable, OperatorCall,
    StaticDecompositionSource,
};
pub use error::{ExportError, Result};
pub use graph::{GraphBuilder, ValueHandle};
pub use literal::{KwArgs, Literal, LiteralKind};
pub use normalize::{convert_kwargs, convert_value};
pub use options::{ExportOptions, OptionField, OptionValue, UpdateIssue};
pub use overload::{
    OpNamespace, OperatorOverload, OverloadFamily, OverloadSource, StaticOverloadSource,
};
pub use registry::{ExporterRegistry, FrameworkSources, Resolution};
pub use resolution::{OverloadResolutionTable, ResolutionTableBuilder};
