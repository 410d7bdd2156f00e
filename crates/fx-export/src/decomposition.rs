//! Decomposition table: the subset of the framework's decompositions usable
//! for ONNX export.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{ExportError, Result};
use crate::graph::ValueHandle;
use crate::literal::{KwArgs, Literal};
use crate::overload::OperatorOverload;
use crate::resolution::OverloadResolutionTable;

/// Module path marking reference implementations written in primitive
/// operators, which are not generally expressible in ONNX.
pub const REFERENCE_ONLY_MODULE: &str = "torch._refs";

/// Returns true if a decomposition from `provenance` must not be used.
pub fn is_reference_only(provenance: &str) -> bool {
    provenance.contains(REFERENCE_ONLY_MODULE)
}

/// An argument of an operator call produced by a decomposition.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// An existing graph value.
    Value(ValueHandle),
    /// A literal constant.
    Literal(Literal),
    /// Output `output` of call number `call` earlier in the same decomposition.
    Intermediate { call: usize, output: usize },
}

/// One operator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCall {
    pub overload: OperatorOverload,
    pub args: Vec<Argument>,
    pub kwargs: KwArgs,
}

/// Rewrites one operator into an equivalent sequence of other operators.
pub trait DecompositionFunction: Send + Sync + Debug {
    /// Module the function is defined in (e.g. `torch._decomp.decompositions`).
    fn provenance(&self) -> &str;

    /// Decompose a call taking the same arguments as the decomposed overload.
    /// The result of the last call is the result of the whole computation.
    fn decompose(&self, args: &[Argument], kwargs: &KwArgs) -> Result<Vec<OperatorCall>>;
}

/// The framework's global decomposition table.
pub trait DecompositionSource: Send + Sync {
    fn decompositions(&self) -> Vec<(OperatorOverload, Arc<dyn DecompositionFunction>)>;
}

/// In-memory `DecompositionSource`.
#[derive(Debug, Clone, Default)]
pub struct StaticDecompositionSource {
    entries: Vec<(OperatorOverload, Arc<dyn DecompositionFunction>)>,
}

impl StaticDecompositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Returns self for builder-style usage.
    pub fn with(
        mut self,
        overload: OperatorOverload,
        function: Arc<dyn DecompositionFunction>,
    ) -> Self {
        self.entries.push((overload, function));
        self
    }
}

impl DecompositionSource for StaticDecompositionSource {
    fn decompositions(&self) -> Vec<(OperatorOverload, Arc<dyn DecompositionFunction>)> {
        self.entries.clone()
    }
}

/// Read-only mapping from overload to decomposition function.
#[derive(Debug, Clone, Default)]
pub struct DecompositionTable {
    functions: HashMap<OperatorOverload, Arc<dyn DecompositionFunction>>,
}

impl DecompositionTable {
    pub fn get(&self, overload: &OperatorOverload) -> Option<Arc<dyn DecompositionFunction>> {
        self.functions.get(overload).cloned()
    }

    pub fn contains(&self, overload: &OperatorOverload) -> bool {
        self.functions.contains_key(overload)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// All decomposed overloads, sorted.
    pub fn overloads(&self) -> Vec<&OperatorOverload> {
        let mut keys: Vec<&OperatorOverload> = self.functions.keys().collect();
        keys.sort_unstable();
        keys
    }
}

/// Filter the framework decompositions down to the ones export may use.
///
/// An entry is dropped if its function is reference-only or if the overload
/// already has a direct exporter in `resolution`. Surviving entries are kept
/// unmodified.
///
/// # Errors
/// Fails if the source lists an overload more than once.
pub fn build_decomposition_table(
    source: &dyn DecompositionSource,
    resolution: &OverloadResolutionTable,
) -> Result<DecompositionTable> {
    let mut functions = HashMap::new();
    let mut seen = HashSet::new();
    let mut reference_only = 0usize;
    let mut shadowed = 0usize;

    for (overload, function) in source.decompositions() {
        if !seen.insert(overload.clone()) {
            return Err(ExportError::DuplicateDecomposition(overload));
        }
        if is_reference_only(function.provenance()) {
            reference_only += 1;
            continue;
        }
        if resolution.contains(&overload) {
            shadowed += 1;
            continue;
        }
        functions.insert(overload, function);
    }

    tracing::debug!(
        kept = functions.len(),
        reference_only,
        shadowed_by_exporter = shadowed,
        "built decomposition table"
    );
    Ok(DecompositionTable { functions })
}
