//! # Effect Kinds
//!
//! Every effect kind the compiler understands, with its parameter grammar,
//! defaults and fragment builder.
//!
//! ## Families
//!
//! - **transform**: crop, fade, scale, rotate, transpose, lenscorrection, perspective
//! - **filtering**: boxblur, gblur, smartblur, edgedetect, sobel, unsharp, delogo
//! - **overlay**: overlay, dualoverlay, chromakey, colorkey, lumakey, alphamerge, alphaextract
//! - **blend**: two-branch time-expression blends
//! - **color**: colorbalance, colorchannelmixer, curves, eq, lut, lut3d, haldclut
//! - **text**: drawtext
//! - **passthrough**: passthrough and raw `chain`
//!
//! ## Usage
//!
//! ```rust
//! use fxgraph::effects::EffectRegistry;
//! use fxgraph::timeline::EffectSpec;
//!
//! let registry = EffectRegistry::new();
//! let spec = EffectSpec {
//!     index: 0,
//!     start: 0.0,
//!     end: 3.0,
//!     kind: "fade".into(),
//!     raw_params: vec!["in".into(), "1.0".into()],
//! };
//!
//! let resolved = registry.resolve(&spec).unwrap();
//! assert_eq!(resolved.effect().filters(), vec!["fade=type=in:st=0:d=1"]);
//! ```

pub mod blend;
pub mod color;
pub mod defaults;
pub mod filtering;
pub mod overlay;
pub mod params;
pub mod passthrough;
pub mod registry;
pub mod text;
pub mod traits;
pub mod transform;

pub use params::{ParamReader, ResolvedParams};
pub use registry::{EffectRegistry, KindEntry, Resolver};
pub use traits::{Effect, KindDescriptor, ParamSpec, ParamType};
