use crate::{
    effects::{passthrough::Passthrough, Effect, ResolvedParams},
    graph::{GraphFragment, Label, StreamInputs},
    timeline::TimeWindow,
};

/// One contiguous piece of the output timeline
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Uncovered time, reproduced unchanged
    Gap { window: TimeWindow, label: Label },
    /// Time covered by an effect item
    Effect {
        window: TimeWindow,
        label: Label,
        /// Position of the effect item in the caller's input
        index: usize,
        resolved: ResolvedParams,
    },
}

impl Segment {
    pub fn window(&self) -> TimeWindow {
        match self {
            Self::Gap { window, .. } | Self::Effect { window, .. } => *window,
        }
    }

    pub fn label(&self) -> &Label {
        match self {
            Self::Gap { label, .. } | Self::Effect { label, .. } => label,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }

    /// Kind name of the segment, `gap` for gaps
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gap { .. } => "gap",
            Self::Effect { resolved, .. } => resolved.kind(),
        }
    }

    pub fn build(&self, inputs: &StreamInputs) -> GraphFragment {
        match self {
            Self::Gap { window, label } => Passthrough.build(window, label, inputs),
            Self::Effect { window, label, resolved, .. } => {
                resolved.effect().build(window, label, inputs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::transform::Transpose;

    #[test]
    fn test_gap_builds_passthrough() {
        let gap = Segment::Gap {
            window: TimeWindow::new(3.0, 10.0),
            label: Label::new("seg1"),
        };
        assert!(gap.is_gap());
        assert_eq!(gap.kind(), "gap");
        assert_eq!(
            gap.build(&StreamInputs::default()).text(),
            "[0:v]trim=start=3:end=10,setpts=PTS-STARTPTS[seg1]"
        );
    }

    #[test]
    fn test_effect_delegates_to_params() {
        let segment = Segment::Effect {
            window: TimeWindow::new(0.0, 1.0),
            label: Label::new("seg0"),
            index: 0,
            resolved: ResolvedParams::Transpose(Transpose { direction: 2 }),
        };
        assert_eq!(segment.label().as_str(), "seg0");
        assert_eq!(segment.window(), TimeWindow::new(0.0, 1.0));
        assert_eq!(
            segment.build(&StreamInputs::default()).text(),
            "[0:v]trim=start=0:end=1,setpts=PTS-STARTPTS,transpose=2[seg0]"
        );
    }
}
