use std::fmt;

use tracing::{debug, warn};

use crate::{
    effects::ResolvedParams,
    graph::{
        fragment::STATEMENT_SEPARATOR,
        segment::Segment,
        LabelAllocator, StreamInputs,
    },
    timeline::TimeWindow,
};

/// Fixed label of the graph's single output
pub const OUTPUT_LABEL: &str = "outv";

/// An effect with resolved parameters, placed on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEffect {
    pub index: usize,
    pub window: TimeWindow,
    pub resolved: ResolvedParams,
}

/// Clip effects to `[0, duration)`
///
/// Effects starting at or after the end are dropped; effects running past
/// it end at `duration`.
pub fn clip_to_duration(effects: Vec<PlacedEffect>, duration: f64) -> Vec<PlacedEffect> {
    effects
        .into_iter()
        .filter_map(|mut effect| {
            if effect.window.start >= duration {
                warn!(
                    "Dropping '{}' (item {}) at {}: starts at or after the {}s duration",
                    effect.resolved.kind(),
                    effect.index,
                    effect.window,
                    duration
                );
                return None;
            }
            if effect.window.end > duration {
                debug!(
                    "Clamping '{}' (item {}) end from {} to {}",
                    effect.resolved.kind(),
                    effect.index,
                    effect.window.end,
                    duration
                );
                effect.window.end = duration;
            }
            Some(effect)
        })
        .collect()
}

/// Walk the sorted, clipped effects and fill the timeline with segments
///
/// Gaps are inserted before each effect that starts after the current
/// position, and after the last effect when it ends before `duration`.
pub fn partition(
    effects: Vec<PlacedEffect>,
    duration: f64,
    labels: &mut LabelAllocator,
) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(effects.len() * 2 + 1);
    let mut current = 0.0;

    for effect in effects {
        let start = effect.window.start.max(current);
        if start >= effect.window.end {
            warn!("Skipping '{}' (item {}): no time left at {}", effect.resolved.kind(), effect.index, effect.window);
            continue;
        }

        if current < start {
            segments.push(Segment::Gap {
                window: TimeWindow::new(current, start),
                label: labels.next_label(),
            });
        }

        segments.push(Segment::Effect {
            window: TimeWindow::new(start, effect.window.end),
            label: labels.next_label(),
            index: effect.index,
            resolved: effect.resolved,
        });
        current = effect.window.end;
    }

    if current < duration {
        segments.push(Segment::Gap {
            window: TimeWindow::new(current, duration),
            label: labels.next_label(),
        });
    }

    segments
}

/// The finished graph text and the segments it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGraph {
    segments: Vec<Segment>,
    text: String,
}

impl CompiledGraph {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any statement reads from input stream `stream`, e.g. `1:v`
    pub fn reads_stream(&self, stream: &str) -> bool {
        self.text.contains(&format!("[{}]", stream))
    }
}

impl fmt::Display for CompiledGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build every segment's fragment in order and join them with the final concat
pub fn assemble(segments: Vec<Segment>, inputs: &StreamInputs) -> CompiledGraph {
    let mut statements = Vec::new();
    let mut outputs = String::new();

    for segment in &segments {
        let fragment = segment.build(inputs);
        debug!(
            "{} {} -> [{}] ({} statement(s))",
            segment.kind(),
            segment.window(),
            fragment.output,
            fragment.statements.len()
        );
        outputs.push_str(&fragment.output.reference());
        statements.extend(fragment.statements);
    }

    statements.push(format!(
        "{}concat=n={}:v=1:a=0[{}]",
        outputs,
        segments.len(),
        OUTPUT_LABEL
    ));

    CompiledGraph {
        text: statements.join(STATEMENT_SEPARATOR),
        segments,
    }
}

/// Result of compiling a timeline
#[derive(Debug, Clone, PartialEq)]
pub enum Compilation {
    Graph(CompiledGraph),
    /// Nothing to apply: the input should be copied as-is
    CopyInput,
}

impl Compilation {
    pub fn graph(&self) -> Option<&CompiledGraph> {
        match self {
            Self::Graph(graph) => Some(graph),
            Self::CopyInput => None,
        }
    }

    pub fn is_copy_input(&self) -> bool {
        matches!(self, Self::CopyInput)
    }
}
