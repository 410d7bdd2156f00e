//! Exporter function catalog.
//!
//! Maps canonical exporter keys (`aten::add`, `prims::convert_element_type`,
//! `getitem`, ...) to the function that lowers the operator into ONNX. The
//! built-in catalog points at the ONNX Script aten function library plus two
//! small functions lowered inline into default-domain ONNX operators.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{ExportError, Result};
use crate::graph::{GraphBuilder, ValueHandle};
use crate::literal::{KwArgs, Literal};

/// Domain of the ONNX Script aten function library.
pub const ATENLIB_DOMAIN: &str = "pkg.onnxscript.torch_lib";

/// Lowers one operator invocation into the target graph.
pub trait ExporterFunction: Send + Sync + Debug {
    /// Returns the function's name (e.g., "aten_add").
    fn name(&self) -> &str;

    /// Emit the nodes computing this operator and return its outputs.
    ///
    /// `attributes` are keyword arguments already normalized for the target
    /// format (see [`crate::normalize::convert_kwargs`]).
    fn export(
        &self,
        graph: &mut dyn GraphBuilder,
        inputs: &[ValueHandle],
        attributes: &KwArgs,
    ) -> Result<Vec<ValueHandle>>;
}

/// Sub-library of the aten function library an entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Library {
    Core,
    Nn,
    Special,
}

impl Library {
    pub fn as_str(&self) -> &'static str {
        match self {
            Library::Core => "core",
            Library::Nn => "nn",
            Library::Special => "special",
        }
    }
}

/// A function of the aten function library, invoked as a single function
/// node in [`ATENLIB_DOMAIN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFunction {
    library: Library,
    symbol: &'static str,
}

impl LibraryFunction {
    pub fn new(library: Library, symbol: &'static str) -> Self {
        Self { library, symbol }
    }

    pub fn library(&self) -> Library {
        self.library
    }
}

impl ExporterFunction for LibraryFunction {
    fn name(&self) -> &str {
        self.symbol
    }

    fn export(
        &self,
        graph: &mut dyn GraphBuilder,
        inputs: &[ValueHandle],
        attributes: &KwArgs,
    ) -> Result<Vec<ValueHandle>> {
        graph.add_node(ATENLIB_DOMAIN, self.symbol, inputs, attributes)
    }
}

/// `prims::convert_element_type(tensor, dtype)` lowered to ONNX `Cast`.
///
/// Expects `dtype` already translated to a target type code.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertElementType;

impl ExporterFunction for ConvertElementType {
    fn name(&self) -> &str {
        "prims_convert_element_type"
    }

    fn export(
        &self,
        graph: &mut dyn GraphBuilder,
        inputs: &[ValueHandle],
        attributes: &KwArgs,
    ) -> Result<Vec<ValueHandle>> {
        expect_arity(self.name(), inputs, 1)?;
        let to = match attributes.get("dtype") {
            Some(Literal::Int(code)) => *code,
            _ => {
                return Err(ExportError::MissingAttribute {
                    function: self.name().to_string(),
                    name: "dtype".to_string(),
                })
            }
        };
        let mut cast_attributes = KwArgs::new();
        cast_attributes.insert("to".to_string(), Literal::Int(to));
        graph.add_node("", "Cast", inputs, &cast_attributes)
    }
}

/// `getitem(self, i)` on a sequence value, lowered to ONNX `SequenceAt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetItem;

impl ExporterFunction for GetItem {
    fn name(&self) -> &str {
        "aten_getitem"
    }

    fn export(
        &self,
        graph: &mut dyn GraphBuilder,
        inputs: &[ValueHandle],
        _attributes: &KwArgs,
    ) -> Result<Vec<ValueHandle>> {
        // TODO: tensor receivers need Unsqueeze + Gather(axis=0) instead of SequenceAt.
        expect_arity(self.name(), inputs, 2)?;
        graph.add_node("", "SequenceAt", inputs, &KwArgs::new())
    }
}

fn expect_arity(function: &str, inputs: &[ValueHandle], expected: usize) -> Result<()> {
    if inputs.len() != expected {
        return Err(ExportError::ArityMismatch {
            function: function.to_string(),
            expected,
            got: inputs.len(),
        });
    }
    Ok(())
}

/// Aten function library entries: (exporter key, sub-library, symbol).
pub const ATENLIB_FUNCTIONS: &[(&str, Library, &str)] = &[
    ("aten::abs", Library::Core, "aten_abs"),
    ("aten::acos", Library::Core, "aten_acos"),
    ("aten::acosh", Library::Core, "aten_acosh"),
    ("aten::add", Library::Core, "aten_add"),
    ("aten::addmm", Library::Core, "aten_addmm"),
    ("aten::amax", Library::Core, "aten_amax"),
    ("aten::amin", Library::Core, "aten_amin"),
    ("aten::arange", Library::Core, "aten_arange_start"),
    ("aten::asin", Library::Core, "aten_asin"),
    ("aten::asinh", Library::Core, "aten_asinh"),
    ("aten::atan", Library::Core, "aten_atan"),
    ("aten::atanh", Library::Core, "aten_atanh"),
    ("aten::baddbmm", Library::Core, "aten_baddbmm"),
    ("aten::bmm", Library::Core, "aten_bmm"),
    ("aten::ceil", Library::Core, "aten_ceil"),
    ("aten::clamp_max", Library::Core, "aten_clamp_max"),
    ("aten::clamp_min", Library::Core, "aten_clamp_min"),
    ("aten::clamp", Library::Core, "aten_clamp"),
    ("aten::clone", Library::Core, "aten_clone"),
    ("aten::convolution", Library::Core, "aten_convolution"),
    ("aten::cos", Library::Core, "aten_cos"),
    ("aten::cosh", Library::Core, "aten_cosh"),
    ("aten::detach", Library::Core, "aten_detach"),
    ("aten::div", Library::Core, "aten_div"),
    ("aten::dot", Library::Core, "aten_dot"),
    ("aten::empty", Library::Core, "aten_empty"),
    ("aten::empty_like", Library::Core, "aten_empty_like"),
    ("aten::eq", Library::Core, "aten_eq"),
    ("aten::equal", Library::Core, "aten_equal"),
    ("aten::exp", Library::Core, "aten_exp"),
    ("aten::exp2", Library::Core, "aten_exp2"),
    ("aten::expand", Library::Core, "aten_expand"),
    ("aten::erf", Library::Core, "aten_erf"),
    ("aten::fmod", Library::Core, "aten_fmod"),
    ("aten::full", Library::Core, "aten_full"),
    ("aten::full_like", Library::Core, "aten_full_like"),
    ("aten::ge", Library::Core, "aten_ge"),
    ("aten::gt", Library::Core, "aten_gt"),
    ("aten::isinf", Library::Core, "aten_isinf"),
    ("aten::log", Library::Core, "aten_log"),
    ("aten::le", Library::Core, "aten_le"),
    ("aten::log10", Library::Core, "aten_log10"),
    ("aten::log1p", Library::Core, "aten_log1p"),
    ("aten::log_softmax", Library::Special, "aten_special_log_softmax"),
    ("aten::log2", Library::Core, "aten_log2"),
    ("aten::logaddexp", Library::Core, "aten_logaddexp"),
    ("aten::logaddexp2", Library::Core, "aten_logaddexp2"),
    ("aten::logcumsumexp", Library::Core, "aten_logcumsumexp"),
    ("aten::logdet", Library::Core, "aten_logdet"),
    ("aten::logsumexp", Library::Core, "aten_logsumexp"),
    ("aten::lt", Library::Core, "aten_lt"),
    ("aten::matmul", Library::Core, "aten_matmul"),
    ("aten::maximum", Library::Core, "aten_maximum"),
    ("aten::minimum", Library::Core, "aten_minimum"),
    ("aten::mm", Library::Core, "aten_mm"),
    ("aten::mul", Library::Core, "aten_mul"),
    ("aten::ne", Library::Core, "aten_ne"),
    ("aten::neg", Library::Core, "aten_neg"),
    ("aten::new_full", Library::Core, "aten_new_full"),
    ("aten::adaptive_avg_pool1d", Library::Nn, "aten_adaptive_avg_pool1d"),
    ("aten::adaptive_avg_pool2d", Library::Nn, "aten_adaptive_avg_pool2d"),
    ("aten::adaptive_avg_pool3d", Library::Nn, "aten_adaptive_avg_pool3d"),
    ("aten::celu", Library::Nn, "aten_celu"),
    ("aten::elu", Library::Nn, "aten_elu"),
    ("aten::embedding", Library::Core, "aten_embedding"),
    ("aten::gelu", Library::Nn, "aten_gelu"),
    ("aten::leaky_relu", Library::Nn, "aten_leaky_relu"),
    ("aten::linear", Library::Nn, "aten_linear"),
    ("aten::logsigmoid", Library::Nn, "aten_log_sigmoid"),
    ("aten::relu", Library::Nn, "aten_relu"),
    ("aten::relu6", Library::Nn, "aten_relu6"),
    ("aten::selu", Library::Core, "aten_selu"),
    ("aten::upsample_nearest2d", Library::Nn, "aten_upsample_nearest2d"),
    ("aten::nonzero", Library::Core, "aten_nonzero"),
    ("aten::ones_like", Library::Core, "aten_ones_like"),
    ("aten::ones", Library::Core, "aten_ones"),
    ("aten::permute", Library::Core, "aten_permute"),
    ("aten::pow", Library::Core, "aten_pow"),
    ("aten::reciprocal", Library::Core, "aten_reciprocal"),
    ("aten::remainder", Library::Core, "aten_remainder"),
    ("aten::repeat", Library::Core, "aten_repeat"),
    ("aten::reshape", Library::Core, "aten_reshape"),
    ("aten::round", Library::Core, "aten_round"),
    ("aten::rsqrt", Library::Core, "aten_rsqrt"),
    ("aten::rsub", Library::Core, "aten_rsub"),
    ("aten::sigmoid", Library::Core, "aten_sigmoid"),
    ("aten::sign", Library::Core, "aten_sign"),
    ("aten::sin", Library::Core, "aten_sin"),
    ("aten::sinh", Library::Core, "aten_sinh"),
    ("aten::slice", Library::Core, "aten_slice"),
    ("aten::softmax", Library::Special, "aten_special_softmax"),
    ("aten::split", Library::Core, "aten_split"),
    ("aten::sqrt", Library::Core, "aten_sqrt"),
    ("aten::sub", Library::Core, "aten_sub"),
    ("aten::t", Library::Core, "aten_t"),
    ("aten::tan", Library::Core, "aten_tan"),
    ("aten::tanh", Library::Core, "aten_tanh"),
    ("aten::topk", Library::Core, "aten_topk"),
    ("aten::unsqueeze", Library::Core, "aten_unsqueeze"),
    ("aten::view", Library::Core, "aten_view"),
    ("aten::where", Library::Core, "aten_where"),
    ("aten::xlogy", Library::Special, "aten_special_xlogy"),
    ("aten::zeros", Library::Core, "aten_zeros"),
    ("aten::zeros_like", Library::Core, "aten_zeros_like"),
    ("aten::native_layer_norm", Library::Core, "aten_native_layer_norm"),
    ("aten::transpose", Library::Core, "aten_transpose"),
    ("aten::sum", Library::Core, "aten_sum_dim_IntList"),
    ("aten::argmin", Library::Core, "aten_argmin"),
    ("aten::argmax", Library::Core, "aten_argmax"),
];

/// Mapping from exporter key to exporter function.
///
/// Lookups return `None` for operators without a direct exporter; callers
/// fall back to decomposition.
#[derive(Debug, Clone, Default)]
pub struct ExporterCatalog {
    functions: HashMap<String, Arc<dyn ExporterFunction>>,
}

impl ExporterCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog: every [`ATENLIB_FUNCTIONS`] entry plus the
    /// `getitem` pseudo-operator and `prims::convert_element_type`.
    pub fn atenlib() -> Self {
        let mut functions: HashMap<String, Arc<dyn ExporterFunction>> =
            HashMap::with_capacity(ATENLIB_FUNCTIONS.len() + 2);
        functions.insert("getitem".to_string(), Arc::new(GetItem));
        functions.insert(
            "prims::convert_element_type".to_string(),
            Arc::new(ConvertElementType),
        );
        for &(key, library, symbol) in ATENLIB_FUNCTIONS {
            functions.insert(key.to_string(), Arc::new(LibraryFunction::new(library, symbol)));
        }
        Self { functions }
    }

    /// Register an exporter under `key`.
    ///
    /// # Errors
    /// Returns `DuplicateExporter` if the key is already present.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        function: Arc<dyn ExporterFunction>,
    ) -> Result<()> {
        let key = key.into();
        if self.functions.contains_key(&key) {
            return Err(ExportError::DuplicateExporter(key));
        }
        self.functions.insert(key, function);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ExporterFunction>> {
        self.functions.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.functions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
