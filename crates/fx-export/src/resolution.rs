//! Overload resolution table: concrete overload -> canonical exporter key.

use std::collections::HashMap;

use crate::catalog::ExporterCatalog;
use crate::error::{ExportError, Result};
use crate::overload::{OpNamespace, OperatorOverload, OverloadFamily, OverloadSource};

/// Single overloads that resolve to a key other than their family's.
///
/// Applied after the bulk scan, so they always win.
pub fn manual_overrides() -> Vec<(OperatorOverload, String)> {
    vec![(
        OperatorOverload::new(OpNamespace::Aten, "baddbmm", "default"),
        "aten::baddbmm".to_string(),
    )]
}

/// Read-only mapping from overload to exporter key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverloadResolutionTable {
    keys: HashMap<OperatorOverload, String>,
}

impl OverloadResolutionTable {
    /// Returns the exporter key for `overload`, if it has a direct exporter.
    pub fn get(&self, overload: &OperatorOverload) -> Option<&str> {
        self.keys.get(overload).map(String::as_str)
    }

    pub fn contains(&self, overload: &OperatorOverload) -> bool {
        self.keys.contains_key(overload)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OperatorOverload, &str)> {
        self.keys.iter().map(|(o, k)| (o, k.as_str()))
    }
}

/// Builds an [`OverloadResolutionTable`] from a catalog and an overload source.
///
/// Every overload of a family whose qualified name is in the catalog maps to
/// that qualified name. Overloads of one family are not differentiated (for
/// example by type promotion rules); use an override to redirect a single
/// overload.
pub struct ResolutionTableBuilder<'a> {
    catalog: &'a ExporterCatalog,
    overrides: Vec<(OperatorOverload, String)>,
}

impl<'a> ResolutionTableBuilder<'a> {
    /// Create a builder using the [`manual_overrides`] list.
    pub fn new(catalog: &'a ExporterCatalog) -> Self {
        Self {
            catalog,
            overrides: manual_overrides(),
        }
    }

    /// Replace the override list.
    pub fn with_overrides(mut self, overrides: Vec<(OperatorOverload, String)>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Scan every supported namespace of `source` and apply the overrides.
    ///
    /// # Errors
    /// Fails on a malformed family or an override whose key has no exporter.
    pub fn build(&self, source: &dyn OverloadSource) -> Result<OverloadResolutionTable> {
        let mut keys = HashMap::new();
        let mut skipped = 0usize;

        for namespace in OpNamespace::ALL {
            for family in source.families(namespace) {
                validate_family(&family)?;
                let qualified_name = family.qualified_name();
                if !self.catalog.contains(&qualified_name) {
                    tracing::trace!("no exporter for {}, skipping family", qualified_name);
                    skipped += 1;
                    continue;
                }
                for overload in family.overloads() {
                    keys.insert(overload, qualified_name.clone());
                }
            }
        }

        for (overload, key) in &self.overrides {
            if !self.catalog.contains(key) {
                return Err(ExportError::OverrideWithoutExporter {
                    overload: overload.clone(),
                    key: key.clone(),
                });
            }
            keys.insert(overload.clone(), key.clone());
        }

        tracing::debug!(
            overloads = keys.len(),
            skipped_families = skipped,
            overrides = self.overrides.len(),
            "built overload resolution table"
        );
        Ok(OverloadResolutionTable { keys })
    }
}

fn validate_family(family: &OverloadFamily) -> Result<()> {
    let reason = if family.name().is_empty() {
        Some("empty operator name")
    } else if family.name().contains("::") {
        Some("operator name contains '::'")
    } else if family.overload_names().iter().any(|o| o.is_empty()) {
        Some("empty overload name")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ExportError::MalformedFamily {
            namespace: family.namespace().to_string(),
            name: family.name().to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overload::StaticOverloadSource;

    fn source() -> StaticOverloadSource {
        StaticOverloadSource::new()
            .with(OverloadFamily::new(OpNamespace::Aten, "add", ["Tensor", "Scalar", "out"]))
            .with(OverloadFamily::new(OpNamespace::Aten, "foo", ["default"]))
            .with(OverloadFamily::new(OpNamespace::Aten, "baddbmm", ["default", "out"]))
            .with(OverloadFamily::new(OpNamespace::Prims, "convert_element_type", ["default"]))
    }

    #[test]
    fn test_family_collapses_to_qualified_name() {
        let catalog = ExporterCatalog::atenlib();
        let table = ResolutionTableBuilder::new(&catalog).build(&source()).unwrap();
        for overload in ["Tensor", "Scalar", "out"] {
            let o = OperatorOverload::new(OpNamespace::Aten, "add", overload);
            assert_eq!(table.get(&o), Some("aten::add"));
        }
        let cast = OperatorOverload::new(OpNamespace::Prims, "convert_element_type", "default");
        assert_eq!(table.get(&cast), Some("prims::convert_element_type"));
    }

    #[test]
    fn test_uncatalogued_family_skipped() {
        let catalog = ExporterCatalog::atenlib();
        let table = ResolutionTableBuilder::new(&catalog).build(&source()).unwrap();
        assert!(!table.contains(&OperatorOverload::new(OpNamespace::Aten, "foo", "default")));
        // 3 add + 2 baddbmm + 1 convert_element_type
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_override_wins_over_bulk_scan() {
        let catalog = ExporterCatalog::atenlib();
        let redirected = OperatorOverload::new(OpNamespace::Aten, "add", "Scalar");
        let table = ResolutionTableBuilder::new(&catalog)
            .with_overrides(vec![(redirected.clone(), "aten::rsub".to_string())])
            .build(&source())
            .unwrap();
        assert_eq!(table.get(&redirected), Some("aten::rsub"));
        let untouched = OperatorOverload::new(OpNamespace::Aten, "add", "Tensor");
        assert_eq!(table.get(&untouched), Some("aten::add"));
    }

    #[test]
    fn test_default_override_registered_without_family() {
        let catalog = ExporterCatalog::atenlib();
        let table = ResolutionTableBuilder::new(&catalog)
            .build(&StaticOverloadSource::new())
            .unwrap();
        let baddbmm = OperatorOverload::new(OpNamespace::Aten, "baddbmm", "default");
        assert_eq!(table.get(&baddbmm), Some("aten::baddbmm"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_override_without_exporter_fails() {
        let catalog = ExporterCatalog::atenlib();
        let err = ResolutionTableBuilder::new(&catalog)
            .with_overrides(vec![(
                OperatorOverload::new(OpNamespace::Aten, "add", "Tensor"),
                "aten::nope".to_string(),
            )])
            .build(&source())
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::OverrideWithoutExporter { key, .. } if key == "aten::nope"
        ));
    }

    #[test]
    fn test_malformed_family_fails() {
        let catalog = ExporterCatalog::atenlib();
        let bad = StaticOverloadSource::new()
            .with(OverloadFamily::new(OpNamespace::Aten, "", ["default"]));
        let err = ResolutionTableBuilder::new(&catalog).build(&bad).unwrap_err();
        assert!(matches!(err, ExportError::MalformedFamily { .. }));
    }

    #[test]
    fn test_pseudo_operator_not_reachable_by_scan() {
        let catalog = ExporterCatalog::atenlib();
        let table = ResolutionTableBuilder::new(&catalog).build(&source()).unwrap();
        assert!(table.iter().all(|(_, key)| key != "getitem"));
    }
}
