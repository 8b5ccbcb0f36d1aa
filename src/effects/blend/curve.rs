use crate::{effects::defaults, error::BlendError, graph::num};

/// Time function selecting between the original (`A`) and transformed (`B`)
/// branches of a blend
#[derive(Debug, Clone, PartialEq)]
pub enum BlendCurve {
    /// Phase 1: always the transformed branch
    Constant,
    /// Phase 2: transformed before `at`, original from `at` on
    Step { at: f64 },
    /// Phase 3: transformed before `start` and inside the window, original after `end`
    Window { start: f64, end: f64 },
    /// Phase 4: as `Window`, but fading linearly from transformed to original inside it
    Crossfade { start: f64, end: f64 },
}

impl BlendCurve {
    /// Build the curve for `phase` from the positional crossfade times
    ///
    /// Phase 2 takes the first time. Phases 3 and 4 take the first two, and
    /// fall back to zero for both if fewer than two were given.
    pub fn from_phase(phase: i64, times: &[f64]) -> Result<Self, BlendError> {
        let window = || match times {
            [start, end, ..] => (*start, *end),
            _ => (defaults::BLEND_CROSSFADE, defaults::BLEND_CROSSFADE),
        };

        match phase {
            1 => Ok(Self::Constant),
            2 => Ok(Self::Step {
                at: times.first().copied().unwrap_or(defaults::BLEND_CROSSFADE),
            }),
            3 => {
                let (start, end) = window();
                Ok(Self::Window { start, end })
            }
            4 => {
                let (start, end) = window();
                Ok(Self::Crossfade { start, end })
            }
            _ => Err(BlendError::Phase { phase }),
        }
    }

    /// `all_expr` text, with commas escaped for the graph parser
    pub fn expression(&self) -> String {
        match *self {
            Self::Constant => "B".to_string(),
            Self::Step { at } => format!(r"if(lt(T\,{})\, B\, A)", num(at)),
            Self::Window { start, end } => window_expression(start, end, "B"),
            Self::Crossfade { start, end } if end <= start => window_expression(start, end, "B"),
            Self::Crossfade { start, end } => {
                let (cs, ce) = (num(start), num(end));
                let progress = format!("((T-{cs})/({ce}-{cs}))");
                let inside = format!("B*(1-{progress})+A*{progress}");
                window_expression(start, end, &inside)
            }
        }
    }

    /// Weight of the transformed branch at local time `t`, in `[0, 1]`
    pub fn transformed_weight(&self, t: f64) -> f64 {
        match *self {
            Self::Constant => 1.0,
            Self::Step { at } => {
                if t < at {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Window { start, end } => {
                if t < start || t <= end {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Crossfade { start, end } => {
                if t < start {
                    1.0
                } else if t > end {
                    0.0
                } else if end <= start {
                    1.0
                } else {
                    1.0 - (t - start) / (end - start)
                }
            }
        }
    }
}

fn window_expression(start: f64, end: f64, inside: &str) -> String {
    format!(
        r"if(lt(T\,{})\, B\, if(gt(T\,{})\, A\, {}))",
        num(start),
        num(end),
        inside
    )
}
