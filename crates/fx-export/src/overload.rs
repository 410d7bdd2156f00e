//! Operator overload identities and the enumeration interface that lists them.

use std::fmt;

/// Operator namespaces the exporter scans, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpNamespace {
    /// Stable ATen operators.
    Aten,
    /// Primitive operators.
    Prims,
}

impl OpNamespace {
    pub const ALL: [OpNamespace; 2] = [OpNamespace::Aten, OpNamespace::Prims];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpNamespace::Aten => "aten",
            OpNamespace::Prims => "prims",
        }
    }
}

impl fmt::Display for OpNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete callable variant of an operator, e.g. `aten::add.Tensor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorOverload {
    namespace: OpNamespace,
    name: String,
    overload: String,
}

impl OperatorOverload {
    pub fn new(
        namespace: OpNamespace,
        name: impl Into<String>,
        overload: impl Into<String>,
    ) -> Self {
        Self {
            namespace,
            name: name.into(),
            overload: overload.into(),
        }
    }

    pub fn namespace(&self) -> OpNamespace {
        self.namespace
    }

    /// Base operator name, e.g. `add`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overload name, e.g. `Tensor` or `default`.
    pub fn overload_name(&self) -> &str {
        &self.overload
    }

    /// Family-qualified name, e.g. `aten::add`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }
}

impl fmt::Display for OperatorOverload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}.{}", self.namespace, self.name, self.overload)
    }
}

/// All overloads sharing one base operator name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadFamily {
    namespace: OpNamespace,
    name: String,
    overloads: Vec<String>,
}

impl OverloadFamily {
    pub fn new<I, S>(namespace: OpNamespace, name: impl Into<String>, overloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace,
            name: name.into(),
            overloads: overloads.into_iter().map(Into::into).collect(),
        }
    }

    pub fn namespace(&self) -> OpNamespace {
        self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family-qualified name, e.g. `aten::add`. This is also the exporter
    /// key every overload of the family resolves to.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    pub fn overload_names(&self) -> &[String] {
        &self.overloads
    }

    /// Fetch a specific overload by name.
    pub fn overload(&self, overload_name: &str) -> Option<OperatorOverload> {
        self.overloads
            .iter()
            .find(|o| o.as_str() == overload_name)
            .map(|o| OperatorOverload::new(self.namespace, self.name.clone(), o.clone()))
    }

    /// Every overload in the family, in declaration order.
    pub fn overloads(&self) -> impl Iterator<Item = OperatorOverload> + '_ {
        self.overloads
            .iter()
            .map(|o| OperatorOverload::new(self.namespace, self.name.clone(), o.clone()))
    }
}

/// Enumerates the operator families the source framework defines.
///
/// Implemented by the framework integration; the resolution builder never
/// inspects framework internals beyond this list.
pub trait OverloadSource: Send + Sync {
    /// Every family registered under `namespace`.
    fn families(&self, namespace: OpNamespace) -> Vec<OverloadFamily>;
}

/// In-memory `OverloadSource` built from an explicit family list.
#[derive(Debug, Clone, Default)]
pub struct StaticOverloadSource {
    families: Vec<OverloadFamily>,
}

impl StaticOverloadSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a family. Returns self for builder-style usage.
    pub fn with(mut self, family: OverloadFamily) -> Self {
        self.families.push(family);
        self
    }
}

impl OverloadSource for StaticOverloadSource {
    fn families(&self, namespace: OpNamespace) -> Vec<OverloadFamily> {
        self.families
            .iter()
            .filter(|f| f.namespace == namespace)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overload_names() {
        let o = OperatorOverload::new(OpNamespace::Aten, "add", "Tensor");
        assert_eq!(o.qualified_name(), "aten::add");
        assert_eq!(o.overload_name(), "Tensor");
        assert_eq!(o.to_string(), "aten::add.Tensor");
    }

    #[test]
    fn test_family_accessors() {
        let family = OverloadFamily::new(OpNamespace::Aten, "add", ["Tensor", "Scalar", "out"]);
        assert_eq!(family.qualified_name(), "aten::add");
        assert_eq!(family.overloads().count(), 3);
        assert_eq!(
            family.overload("Scalar"),
            Some(OperatorOverload::new(OpNamespace::Aten, "add", "Scalar"))
        );
        assert_eq!(family.overload("missing"), None);
    }

    #[test]
    fn test_static_source_filters_namespace() {
        let source = StaticOverloadSource::new()
            .with(OverloadFamily::new(OpNamespace::Aten, "add", ["Tensor"]))
            .with(OverloadFamily::new(OpNamespace::Prims, "convert_element_type", ["default"]));
        assert_eq!(source.families(OpNamespace::Aten).len(), 1);
        assert_eq!(
            source.families(OpNamespace::Prims)[0].qualified_name(),
            "prims::convert_element_type"
        );
    }
}
