//! # fxgraph
//!
//! Compile time-tagged video effect timelines into a single ffmpeg filter graph.
//!
//! A timeline is a list of items `START END KIND [PARAMS...]`. The compiler
//! validates and sorts them, resolves each kind's parameters against its
//! defaults, fills uncovered time with passthrough segments and joins every
//! segment into one `concat` ending in `[outv]`.
//!
//! ## Quick Start
//!
//! ```rust
//! use fxgraph::{compile, Compilation, EffectItem};
//!
//! let items = vec![
//!     EffectItem::from("0 3 fade in 1.0"),
//!     EffectItem::from("5 7 gblur sigma=4"),
//! ];
//!
//! let Compilation::Graph(graph) = compile(&items, 10.0)? else {
//!     unreachable!("timeline has effects");
//! };
//!
//! assert_eq!(graph.segments().len(), 4);
//! println!("{}", graph);
//! # Ok::<(), fxgraph::FxGraphError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`timeline`] - Effect item parsing and validation
//! - [`effects`] - Effect kinds, parameter resolution and fragment builders
//! - [`graph`] - Segment partitioning, graph assembly, batch and sync graphs
//! - [`audio`] - Audio delay/mix graphs
//! - [`render`] - ffmpeg/ffprobe command construction and execution, stream-copy edits
//! - [`config`] - Configuration management
//!
//! ## Adding Effect Kinds
//!
//! Custom kinds implement [`Effect`](effects::Effect) and are registered with
//! an [`EffectRegistry`](effects::EffectRegistry):
//!
//! ```rust
//! use fxgraph::effects::{EffectRegistry, KindDescriptor, ResolvedParams};
//! use fxgraph::effects::passthrough::RawChain;
//!
//! const NEGATE: KindDescriptor = KindDescriptor {
//!     name: "negate",
//!     description: "Invert colors",
//!     params: &[],
//! };
//!
//! let mut registry = EffectRegistry::new();
//! registry.register(&NEGATE, |_| {
//!     Ok(ResolvedParams::Chain(RawChain { filters: "negate".into(), speed: None }))
//! });
//! assert!(registry.has_kind("negate"));
//! ```

pub mod audio;
pub mod config;
pub mod effects;
pub mod error;
pub mod graph;
pub mod render;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    effects::{Effect, EffectRegistry},
    error::{FxGraphError, Result},
    graph::{compile, Compilation, CompiledGraph, GraphCompiler},
    timeline::{EffectItem, EffectSpec},
};
