//! Common test fixtures: a small in-memory framework and a recording graph.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};

use fx_export::{
    Argument, DecompositionFunction, GraphBuilder, KwArgs, OpNamespace, OperatorCall,
    OperatorOverload, OverloadFamily, Result, StaticDecompositionSource, StaticOverloadSource,
    ValueHandle,
};

pub const DECOMP_MODULE: &str = "torch._decomp.decompositions";
pub const REFS_MODULE: &str = "torch._refs";

pub fn aten(name: &str, overload: &str) -> OperatorOverload {
    OperatorOverload::new(OpNamespace::Aten, name, overload)
}

/// Decomposition that rewrites its operator into a fixed chain of unary calls.
#[derive(Debug)]
pub struct ChainDecomposition {
    pub provenance: &'static str,
    pub chain: Vec<OperatorOverload>,
}

impl ChainDecomposition {
    pub fn new(provenance: &'static str, chain: Vec<OperatorOverload>) -> Arc<Self> {
        Arc::new(Self { provenance, chain })
    }
}

impl DecompositionFunction for ChainDecomposition {
    fn provenance(&self) -> &str {
        self.provenance
    }

    fn decompose(&self, args: &[Argument], kwargs: &KwArgs) -> Result<Vec<OperatorCall>> {
        let mut calls = Vec::with_capacity(self.chain.len());
        for (i, overload) in self.chain.iter().enumerate() {
            let args = if i == 0 {
                args.to_vec()
            } else {
                vec![Argument::Intermediate { call: i - 1, output: 0 }]
            };
            calls.push(OperatorCall {
                overload: overload.clone(),
                args,
                kwargs: if i == 0 { kwargs.clone() } else { KwArgs::new() },
            });
        }
        Ok(calls)
    }
}

/// Operator families of the fixture framework.
///
/// `aten::add`, `aten::mul` and `prims::convert_element_type` have
/// exporters; `aten::foo`, `aten::bar` and `aten::silu` do not.
pub fn overload_source() -> StaticOverloadSource {
    StaticOverloadSource::new()
        .with(OverloadFamily::new(OpNamespace::Aten, "add", ["Tensor", "Scalar", "out"]))
        .with(OverloadFamily::new(OpNamespace::Aten, "mul", ["Tensor", "Scalar"]))
        .with(OverloadFamily::new(OpNamespace::Aten, "baddbmm", ["default", "out"]))
        .with(OverloadFamily::new(OpNamespace::Aten, "foo", ["default", "out"]))
        .with(OverloadFamily::new(OpNamespace::Aten, "bar", ["default"]))
        .with(OverloadFamily::new(OpNamespace::Aten, "silu", ["default"]))
        .with(OverloadFamily::new(OpNamespace::Prims, "convert_element_type", ["default"]))
}

/// The fixture framework's global decomposition table.
pub fn decomposition_source() -> StaticDecompositionSource {
    StaticDecompositionSource::new()
        // shadowed by the aten::add exporter
        .with(
            aten("add", "Tensor"),
            ChainDecomposition::new(DECOMP_MODULE, vec![aten("mul", "Tensor")]),
        )
        .with(
            aten("foo", "default"),
            ChainDecomposition::new(
                DECOMP_MODULE,
                vec![aten("mul", "Scalar"), aten("add", "Scalar")],
            ),
        )
        // reference-only, dropped even though aten::bar has no exporter
        .with(
            aten("bar", "default"),
            ChainDecomposition::new(REFS_MODULE, vec![aten("add", "Tensor")]),
        )
        .with(
            aten("silu", "default"),
            ChainDecomposition::new(
                DECOMP_MODULE,
                vec![aten("sigmoid", "default"), aten("mul", "Tensor")],
            ),
        )
}

/// Records every node and hands out one fresh output per node.
#[derive(Debug, Default)]
pub struct RecordingGraph {
    pub nodes: Vec<RecordedNode>,
    next: u32,
}

#[derive(Debug, Clone)]
pub struct RecordedNode {
    pub domain: String,
    pub op_type: String,
    pub inputs: Vec<ValueHandle>,
    pub attributes: KwArgs,
}

impl GraphBuilder for RecordingGraph {
    fn add_node(
        &mut self,
        domain: &str,
        op_type: &str,
        inputs: &[ValueHandle],
        attributes: &KwArgs,
    ) -> Result<Vec<ValueHandle>> {
        self.nodes.push(RecordedNode {
            domain: domain.to_string(),
            op_type: op_type.to_string(),
            inputs: inputs.to_vec(),
            attributes: attributes.clone(),
        });
        self.next += 1;
        Ok(vec![ValueHandle(1000 + self.next)])
    }
}

/// Counts `WARN` events emitted while it is the current subscriber.
#[derive(Debug, Default)]
pub struct WarnCounter {
    warnings: Arc<AtomicUsize>,
    next_span: AtomicU64,
}

impl WarnCounter {
    /// Run `f` with a fresh counter installed on this thread and return the
    /// number of warnings it emitted alongside its result.
    pub fn count<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let counter = WarnCounter::default();
        let warnings = Arc::clone(&counter.warnings);
        let out = tracing::subscriber::with_default(counter, f);
        (out, warnings.load(Ordering::SeqCst))
    }
}

impl Subscriber for WarnCounter {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(self.next_span.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}
