//! Resolved exporter tables and the process-wide instance.
//!
//! The process-wide registry is built on first use from sources installed
//! once with [`install_sources`]. After construction it is immutable and
//! shared through an `Arc`; [`reinitialize`] rebuilds it explicitly.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::catalog::{ExporterCatalog, ExporterFunction};
use crate::decomposition::{
    build_decomposition_table, DecompositionFunction, DecompositionSource, DecompositionTable,
};
use crate::error::{ExportError, Result};
use crate::overload::{OperatorOverload, OverloadSource};
use crate::resolution::{OverloadResolutionTable, ResolutionTableBuilder};

/// How an overload is lowered.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A direct exporter.
    Exporter {
        key: String,
        function: Arc<dyn ExporterFunction>,
    },
    /// No direct exporter; rewrite with this decomposition first.
    Decomposition(Arc<dyn DecompositionFunction>),
    /// Neither; the export must fail.
    Unsupported,
}

/// Catalog plus the two tables derived from it.
#[derive(Debug)]
pub struct ExporterRegistry {
    catalog: Arc<ExporterCatalog>,
    resolution: OverloadResolutionTable,
    decompositions: Arc<DecompositionTable>,
}

impl ExporterRegistry {
    /// Build the resolution table, then the decomposition table excluding
    /// everything the resolution table covers.
    pub fn build(
        catalog: Arc<ExporterCatalog>,
        overloads: &dyn OverloadSource,
        decompositions: &dyn DecompositionSource,
    ) -> Result<Self> {
        let resolution = ResolutionTableBuilder::new(&catalog).build(overloads)?;
        let decompositions = build_decomposition_table(decompositions, &resolution)?;
        Ok(Self {
            catalog,
            resolution,
            decompositions: Arc::new(decompositions),
        })
    }

    pub fn catalog(&self) -> &ExporterCatalog {
        &self.catalog
    }

    pub fn resolution_table(&self) -> &OverloadResolutionTable {
        &self.resolution
    }

    pub fn decomposition_table(&self) -> Arc<DecompositionTable> {
        Arc::clone(&self.decompositions)
    }

    /// Exporter key for `overload`, if it has a direct exporter.
    pub fn exporter_key(&self, overload: &OperatorOverload) -> Option<&str> {
        self.resolution.get(overload)
    }

    /// Look up the exporter first, then the decomposition.
    pub fn resolve(&self, overload: &OperatorOverload) -> Resolution {
        if let Some(key) = self.resolution.get(overload) {
            if let Some(function) = self.catalog.get(key) {
                return Resolution::Exporter {
                    key: key.to_string(),
                    function,
                };
            }
        }
        match self.decompositions.get(overload) {
            Some(function) => Resolution::Decomposition(function),
            None => Resolution::Unsupported,
        }
    }

    /// Like [`resolve`](Self::resolve), failing for unsupported operators.
    ///
    /// # Errors
    /// Returns `UnsupportedOperator` if neither lookup succeeds.
    pub fn require(&self, overload: &OperatorOverload) -> Result<Resolution> {
        match self.resolve(overload) {
            Resolution::Unsupported => Err(ExportError::UnsupportedOperator(overload.clone())),
            resolution => Ok(resolution),
        }
    }
}

/// The framework-provided inputs of the process-wide registry.
#[derive(Clone)]
pub struct FrameworkSources {
    pub catalog: Arc<ExporterCatalog>,
    pub overloads: Arc<dyn OverloadSource>,
    pub decompositions: Arc<dyn DecompositionSource>,
}

impl FrameworkSources {
    /// Sources using the built-in aten function library catalog.
    pub fn with_atenlib(
        overloads: Arc<dyn OverloadSource>,
        decompositions: Arc<dyn DecompositionSource>,
    ) -> Self {
        Self {
            catalog: Arc::new(ExporterCatalog::atenlib()),
            overloads,
            decompositions,
        }
    }

    fn build(&self) -> Result<ExporterRegistry> {
        ExporterRegistry::build(
            Arc::clone(&self.catalog),
            self.overloads.as_ref(),
            self.decompositions.as_ref(),
        )
    }
}

static SOURCES: OnceLock<FrameworkSources> = OnceLock::new();
static GLOBAL: RwLock<Option<Arc<ExporterRegistry>>> = RwLock::new(None);

/// Install the sources the process-wide registry is built from.
///
/// # Errors
/// Returns `SourcesAlreadyInstalled` on every call after the first.
pub fn install_sources(sources: FrameworkSources) -> Result<()> {
    SOURCES
        .set(sources)
        .map_err(|_| ExportError::SourcesAlreadyInstalled)
}

/// The process-wide registry, built on first use.
///
/// Concurrent first callers block until the single build finishes. A failed
/// build is returned to the caller and leaves nothing installed.
pub fn global() -> Result<Arc<ExporterRegistry>> {
    if let Some(registry) = GLOBAL.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
        return Ok(Arc::clone(registry));
    }

    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(registry) = slot.as_ref() {
        return Ok(Arc::clone(registry));
    }
    let registry = Arc::new(SOURCES.get().ok_or(ExportError::SourcesNotInstalled)?.build()?);
    *slot = Some(Arc::clone(&registry));
    Ok(registry)
}

/// Rebuild the process-wide registry from the installed sources.
///
/// Registries handed out earlier stay valid and unchanged.
pub fn reinitialize() -> Result<Arc<ExporterRegistry>> {
    let sources = SOURCES.get().ok_or(ExportError::SourcesNotInstalled)?;
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    let registry = Arc::new(sources.build()?);
    *slot = Some(Arc::clone(&registry));
    tracing::debug!("reinitialized exporter registry");
    Ok(registry)
}
