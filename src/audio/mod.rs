//! # Audio Mixing
//!
//! Builds the audio side of a render: external tracks delayed to their start
//! times and mixed with the primary input's audio.
//!
//! ## Usage
//!
//! ```rust
//! use fxgraph::audio::MixGraphBuilder;
//!
//! let mix = MixGraphBuilder::new(false)
//!     .add(0.0, "intro.wav")
//!     .add(12.25, "drop.wav")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mix.inputs.len(), 2);
//! assert!(mix.text.ends_with("[a1][a2]amix=inputs=2:duration=shortest[outa]"));
//! ```

pub mod mix;

pub use mix::{MixGraph, MixGraphBuilder, MixTrack, MIX_OUTPUT_LABEL};
