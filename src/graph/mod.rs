//! # Graph Compilation
//!
//! Builds filter graph text from parsed timelines.
//!
//! ## Pipeline
//!
//! 1. **Parse** effect items into sorted [`EffectSpec`](crate::timeline::EffectSpec)s
//! 2. **Resolve** each spec's parameters through the [`EffectRegistry`](crate::effects::EffectRegistry)
//! 3. **Partition** the timeline into effect and gap [`Segment`]s
//! 4. **Assemble** every segment's fragment plus one final `concat` into `[outv]`
//!
//! ```rust
//! use fxgraph::graph::{compile, Compilation};
//! use fxgraph::timeline::EffectItem;
//!
//! let items = vec![EffectItem::from("0 3 fade in 1.0")];
//! match compile(&items, 10.0).unwrap() {
//!     Compilation::Graph(graph) => {
//!         assert_eq!(graph.segments().len(), 2);
//!         assert!(graph.as_str().ends_with("[seg0][seg1]concat=n=2:v=1:a=0[outv]"));
//!     }
//!     Compilation::CopyInput => unreachable!(),
//! }
//! ```

pub mod assembler;
pub mod batch;
pub mod compiler;
pub mod fragment;
pub mod label;
pub mod segment;
pub mod sync;

pub use assembler::{Compilation, CompiledGraph, PlacedEffect, OUTPUT_LABEL};
pub use batch::{BatchCompiler, TimelineJob};
pub use compiler::{compile, CompileStage, GraphCompiler};
pub use fragment::{num, GraphFragment, StreamInputs, STATEMENT_SEPARATOR};
pub use label::{Label, LabelAllocator};
pub use segment::Segment;
pub use sync::{SyncPlan, DEFAULT_GLITCH_FILTER};
