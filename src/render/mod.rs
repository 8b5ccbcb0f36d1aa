//! # Renderer Integration
//!
//! Builds and runs ffmpeg/ffprobe invocations around compiled graphs, plus
//! the stream-copy edits in [`edit`]. The compiler itself never spawns
//! processes; this module is the only place that does.

pub mod command;
pub mod edit;
pub mod probe;
pub mod runner;

pub use command::{check_overlay_inputs, RenderCommand};
pub use edit::{split_segments, AdjustPlan, AudioLoopJob, AudioLoopPlan, SplitSegment};
pub use probe::{has_audio_stream, probe_duration};
pub use runner::run;
