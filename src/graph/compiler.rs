use std::fmt;

use tracing::{debug, info, trace};

use crate::{
    config::{CompilerConfig, EmptyTimeline},
    effects::EffectRegistry,
    error::Result,
    graph::{
        assembler::{self, Compilation, PlacedEffect},
        LabelAllocator, StreamInputs,
    },
    timeline::{EffectItem, EffectParser, EffectSpec},
};

/// Stages of one compile call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStage {
    Start,
    Parsing,
    Resolving,
    Emitting,
    Assembling,
    Done,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Parsing => "parsing",
            Self::Resolving => "resolving",
            Self::Emitting => "emitting",
            Self::Assembling => "assembling",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: CompileStage) {
    trace!("compile stage: {}", stage);
}

/// Compiles effect timelines into a single filter graph
///
/// The compiler keeps no state between calls; every call gets its own label
/// allocator, so compiling the same timeline twice gives identical text.
pub struct GraphCompiler {
    registry: EffectRegistry,
    config: CompilerConfig,
}

impl GraphCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_registry(EffectRegistry::new(), config)
    }

    /// Use a registry with custom kinds
    pub fn with_registry(registry: EffectRegistry, config: CompilerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile raw effect items against a media duration in seconds
    ///
    /// Fails before any graph text is built if an item does not parse or its
    /// parameters do not resolve.
    pub fn compile(&self, items: &[EffectItem], total_duration: f64) -> Result<Compilation> {
        enter(CompileStage::Start);
        enter(CompileStage::Parsing);
        let specs = EffectParser::with_overlap_policy(self.config.overlaps).parse(items)?;
        debug!("Parsed {} effect item(s)", specs.len());

        self.compile_specs(&specs, total_duration)
    }

    /// Compile already-parsed specs, which must be sorted and non-overlapping
    pub fn compile_specs(&self, specs: &[EffectSpec], total_duration: f64) -> Result<Compilation> {
        let duration = if total_duration.is_finite() && total_duration > 0.0 {
            total_duration
        } else {
            0.0
        };

        enter(CompileStage::Resolving);
        let mut effects = Vec::with_capacity(specs.len());
        for spec in specs {
            effects.push(PlacedEffect {
                index: spec.index,
                window: spec.window(),
                resolved: self.registry.resolve(spec)?,
            });
        }

        let effects = assembler::clip_to_duration(effects, duration);
        if effects.is_empty() {
            match self.config.empty_timeline {
                EmptyTimeline::Passthrough if duration > 0.0 => {
                    debug!("No effects to apply, emitting a passthrough graph");
                }
                _ => {
                    info!("No effects to apply, input can be copied unchanged");
                    enter(CompileStage::Done);
                    return Ok(Compilation::CopyInput);
                }
            }
        }

        enter(CompileStage::Emitting);
        let mut labels = LabelAllocator::new();
        let segments = assembler::partition(effects, duration, &mut labels);

        enter(CompileStage::Assembling);
        let graph = assembler::assemble(segments, &StreamInputs::from_config(&self.config));
        info!(
            "Compiled {} segment(s) over {}s ({} bytes of graph text)",
            graph.segments().len(),
            duration,
            graph.as_str().len()
        );

        enter(CompileStage::Done);
        Ok(Compilation::Graph(graph))
    }
}

impl Default for GraphCompiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

/// Compile with the default configuration
pub fn compile(items: &[EffectItem], total_duration: f64) -> Result<Compilation> {
    GraphCompiler::default().compile(items, total_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::OverlapPolicy,
        error::{FxGraphError, ParseError},
        graph::{Segment, STATEMENT_SEPARATOR},
    };
    use proptest::prelude::*;

    fn item(tokens: &[&str]) -> EffectItem {
        EffectItem::from(tokens.to_vec())
    }

    fn graph(compilation: Compilation) -> crate::graph::CompiledGraph {
        match compilation {
            Compilation::Graph(graph) => graph,
            Compilation::CopyInput => panic!("expected a graph"),
        }
    }

    #[test]
    fn test_fade_then_gap() {
        let compilation = compile(&[item(&["0", "3", "fade", "in", "1.0"])], 10.0).unwrap();
        let graph = graph(compilation);

        assert_eq!(graph.segments().len(), 2);
        assert_eq!(
            graph.as_str(),
            "[0:v]trim=start=0:end=3,setpts=PTS-STARTPTS,fade=type=in:st=0:d=1[seg0]; \
             [0:v]trim=start=3:end=10,setpts=PTS-STARTPTS[seg1]; \
             [seg0][seg1]concat=n=2:v=1:a=0[outv]"
        );
    }

    #[test]
    fn test_empty_timeline_copies_input() {
        assert_eq!(compile(&[], 5.0).unwrap(), Compilation::CopyInput);
        assert_eq!(compile(&[], 0.0).unwrap(), Compilation::CopyInput);
    }

    #[test]
    fn test_empty_timeline_passthrough_policy() {
        let config = CompilerConfig {
            empty_timeline: EmptyTimeline::Passthrough,
            ..CompilerConfig::default()
        };
        let compiler = GraphCompiler::new(config);
        let graph = graph(compiler.compile(&[], 5.0).unwrap());

        assert_eq!(graph.segments().len(), 1);
        assert!(graph.segments()[0].is_gap());
        assert_eq!(
            graph.as_str(),
            "[0:v]trim=start=0:end=5,setpts=PTS-STARTPTS[seg0]; [seg0]concat=n=1:v=1:a=0[outv]"
        );

        assert_eq!(compiler.compile(&[], 0.0).unwrap(), Compilation::CopyInput);
    }

    #[test]
    fn test_unknown_kind_passes_through() {
        let graph = graph(compile(&[item(&["0", "2", "unknownkind"])], 2.0).unwrap());
        assert_eq!(graph.segments().len(), 1);
        assert_eq!(
            graph.as_str(),
            "[0:v]trim=start=0:end=2,setpts=PTS-STARTPTS[seg0]; [seg0]concat=n=1:v=1:a=0[outv]"
        );
    }

    #[test]
    fn test_bad_start_fails_without_graph() {
        let err = compile(&[item(&["x", "2", "fade", "in", "1"])], 10.0).unwrap_err();
        match err {
            FxGraphError::Parse(parse) => assert_eq!(parse.index(), 0),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_param_errors_abort_the_compile() {
        let items = [item(&["0", "1", "fade", "in", "1"]), item(&["2", "3", "eq", "1"])];
        assert!(matches!(compile(&items, 5.0), Err(FxGraphError::Param(_))));
    }

    #[test]
    fn test_overlap_policies() {
        let items = [item(&["0", "4", "gblur"]), item(&["2", "6", "sobel"])];

        assert!(matches!(
            compile(&items, 10.0),
            Err(FxGraphError::Parse(ParseError::Overlap { index: 1, previous: 0 }))
        ));

        let compiler = GraphCompiler::new(CompilerConfig {
            overlaps: OverlapPolicy::Truncate,
            ..CompilerConfig::default()
        });
        let graph = graph(compiler.compile(&items, 10.0).unwrap());
        let windows: Vec<_> = graph.segments().iter().map(Segment::window).collect();
        assert_eq!(windows[0].end, 2.0);
        assert_eq!(windows[1].start, 2.0);
        assert_eq!(windows[1].end, 6.0);
    }

    #[test]
    fn test_effects_past_the_duration() {
        let items = [item(&["1", "8", "gblur"]), item(&["8", "9", "sobel"])];
        let graph = graph(compile(&items, 5.0).unwrap());
        let kinds: Vec<_> = graph.segments().iter().map(Segment::kind).collect();
        assert_eq!(kinds, vec!["gap", "gblur"]);
        assert_eq!(graph.segments()[1].window().end, 5.0);

        let only_late = [item(&["6", "7", "sobel"])];
        assert_eq!(compile(&only_late, 5.0).unwrap(), Compilation::CopyInput);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let compiler = GraphCompiler::new(CompilerConfig {
            overlaps: OverlapPolicy::Truncate,
            ..CompilerConfig::default()
        });
        // the later item wins a tie, so input order was kept through the sort
        let items = [item(&["0", "2", "gblur"]), item(&["0", "2", "sobel"])];
        let graph = graph(compiler.compile(&items, 2.0).unwrap());
        assert_eq!(graph.segments()[0].kind(), "sobel");
    }

    #[test]
    fn test_custom_inputs() {
        let compiler = GraphCompiler::new(CompilerConfig {
            video_input: "2:v".into(),
            ..CompilerConfig::default()
        });
        let graph = graph(compiler.compile(&[item(&["0", "1", "sobel"])], 1.0).unwrap());
        assert!(graph.as_str().starts_with("[2:v]trim=start=0:end=1"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let items = [
            item(&["4", "6", "blend", "4", "0.5", "1.5", "rgbashift_rh=8", "vignette=vignette"]),
            item(&["0", "2", "overlay", "10", "10", "0.5"]),
            item(&["7", "9", "drawtext", "hi"]),
        ];
        let first = compile(&items, 12.0).unwrap();
        let second = compile(&items, 12.0).unwrap();
        assert_eq!(first, second);
    }

    /// Labels a statement reads, and the rest of the statement
    fn leading_refs(statement: &str) -> Vec<&str> {
        let mut refs = Vec::new();
        let mut rest = statement;
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(close) = stripped.find(']') else { break };
            refs.push(&stripped[..close]);
            rest = &stripped[close + 1..];
        }
        refs
    }

    fn output_label(statement: &str) -> &str {
        assert!(statement.ends_with(']'), "no output label: {}", statement);
        let open = statement.rfind('[').unwrap();
        &statement[open + 1..statement.len() - 1]
    }

    #[test]
    fn test_labels_defined_once_before_use() {
        let items = [
            item(&["0", "1", "overlay", "10", "10", "0.5"]),
            item(&["1", "2", "dualoverlay", "0", "W/2"]),
            item(&["2", "3", "blend", "4", "0.2", "0.8", "rgbashift_rh=4", "vignette=vignette"]),
            item(&["3", "4", "alphamerge"]),
            item(&["4", "5", "haldclut", "clut.png"]),
            item(&["6", "7", "gblur"]),
        ];
        let graph = graph(compile(&items, 8.0).unwrap());
        assert_eq!(graph.segments().len(), 8);

        let mut defined: Vec<&str> = Vec::new();
        let mut consumed: Vec<&str> = Vec::new();
        for statement in graph.as_str().split(STATEMENT_SEPARATOR) {
            for input in leading_refs(statement) {
                if input == "0:v" || input == "1:v" {
                    continue;
                }
                assert!(defined.contains(&input), "[{}] read before it is defined: {}", input, statement);
                assert!(!consumed.contains(&input), "[{}] read twice", input);
                consumed.push(input);
            }

            let output = output_label(statement);
            assert!(!defined.contains(&output), "[{}] defined twice", output);
            defined.push(output);
        }

        assert_eq!(defined.iter().filter(|l| **l == "outv").count(), 1);
        assert_eq!(defined.last(), Some(&"outv"));

        let unread: Vec<_> = defined
            .iter()
            .filter(|l| **l != "outv" && !consumed.contains(*l))
            .collect();
        assert!(unread.is_empty(), "labels never read: {:?}", unread);
    }

    prop_compose! {
        fn timeline()(raw in prop::collection::vec((0u32..100, 1u32..20), 0..12), extra in 0u32..50)
            -> (Vec<EffectItem>, f64) {
            let mut cursor = 0u32;
            let mut items = Vec::new();
            for (skip, len) in raw {
                let start = cursor + skip;
                let end = start + len;
                cursor = end;
                items.push(EffectItem::from(format!("{} {} gblur", start as f64 / 4.0, end as f64 / 4.0)));
            }
            (items, (cursor + extra) as f64 / 4.0)
        }
    }

    proptest! {
        #[test]
        fn prop_segments_cover_the_timeline((items, duration) in timeline()) {
            let compiler = GraphCompiler::new(CompilerConfig {
                empty_timeline: EmptyTimeline::Passthrough,
                ..CompilerConfig::default()
            });

            match compiler.compile(&items, duration).unwrap() {
                Compilation::CopyInput => prop_assert!(duration == 0.0),
                Compilation::Graph(graph) => {
                    let segments = graph.segments();
                    prop_assert_eq!(segments[0].window().start, 0.0);
                    prop_assert_eq!(segments[segments.len() - 1].window().end, duration);
                    for pair in segments.windows(2) {
                        prop_assert_eq!(pair[0].window().end, pair[1].window().start);
                    }
                    for segment in segments {
                        prop_assert!(segment.window().start < segment.window().end);
                    }

                    let concat: String = segments
                        .iter()
                        .map(|s| s.label().reference())
                        .collect();
                    let expected_tail = format!("{}concat=n={}:v=1:a=0[outv]", concat, segments.len());
                    prop_assert!(graph.as_str().ends_with(&expected_tail));
                }
            }
        }
    }
}
