//! # Blend
//!
//! Two branches cut from the same window, the original (`A`) and one with
//! an override chain applied (`B`), merged by a time expression:
//!
//! ```text
//! [0:v]trim=...[orig_seg0]; [0:v]trim=...,rgbashift=rh=8[fx_seg0];
//! [orig_seg0][fx_seg0]blend=all_expr='if(lt(T\,2)\, B\, A)'[seg0]
//! ```

mod chain;
mod curve;

pub use chain::{ChainFilter, FilterChain, InvalidOverride, ShiftFamily, ShiftGroup, SHIFT_FAMILIES};
pub use curve::BlendCurve;

use crate::{
    effects::{
        params::ParamReader,
        traits::{KindDescriptor, ParamSpec, ParamType},
        Effect,
    },
    error::Result,
    graph::{GraphFragment, Label, StreamInputs},
    timeline::TimeWindow,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    pub curve: BlendCurve,
    pub chain: FilterChain,
}

impl Blend {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "blend",
        description: "Blend an effected copy of the window back into the original over time (phases 1-4)",
        params: &[
            ParamSpec::required("phase", ParamType::Integer),
            ParamSpec::omittable("crossfade", ParamType::Float),
            ParamSpec::omittable("overrides", ParamType::Overrides),
        ],
    };

    /// `phase`, then crossfade times and `key=value` overrides in any order
    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        let phase = reader.required_int("phase")?;

        let mut times = Vec::new();
        let mut overrides = Vec::new();
        for token in reader.rest() {
            match token.split_once('=') {
                Some((key, value)) => overrides.push((key.to_string(), value.to_string())),
                None => match token.parse::<f64>() {
                    Ok(time) if time.is_finite() => times.push(time),
                    _ => return Err(reader.type_error("crossfade", token).into()),
                },
            }
        }

        let curve = BlendCurve::from_phase(phase, &times)?;
        let chain = FilterChain::parse(&overrides)
            .map_err(|invalid| reader.type_error(&invalid.key, &invalid.value))?;

        Ok(Self { curve, chain })
    }
}

impl Effect for Blend {
    fn kind(&self) -> &'static str {
        "blend"
    }

    fn filters(&self) -> Vec<String> {
        self.chain.to_filters()
    }

    fn build(&self, window: &TimeWindow, label: &Label, inputs: &StreamInputs) -> GraphFragment {
        let original = label.prefixed("orig");
        let transformed = label.prefixed("fx");

        let mut statements =
            GraphFragment::chain(inputs.trim(window), &[], original.clone()).statements;
        statements.extend(
            GraphFragment::chain(inputs.trim(window), &self.filters(), transformed.clone())
                .statements,
        );
        statements.push(format!(
            "{}{}blend=all_expr='{}'{}",
            original.reference(),
            transformed.reference(),
            self.curve.expression(),
            label.reference()
        ));

        GraphFragment::new(statements, label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BlendError, FxGraphError, ParamError};

    fn resolve(tokens: &[&str]) -> Result<Blend> {
        let raw: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        Blend::resolve(&mut ParamReader::new("blend", 0, &raw))
    }

    #[test]
    fn test_blend_fragment() {
        let blend = resolve(&["2", "1.5", "rgbashift_rh=8", "boxblur=4:1"]).unwrap();
        let fragment = blend.build(
            &TimeWindow::new(0.0, 4.0),
            &Label::new("seg0"),
            &StreamInputs::default(),
        );
        assert_eq!(
            fragment.text(),
            "[0:v]trim=start=0:end=4,setpts=PTS-STARTPTS[orig_seg0]; \
             [0:v]trim=start=0:end=4,setpts=PTS-STARTPTS,rgbashift=rh=8,boxblur=4:1[fx_seg0]; \
             [orig_seg0][fx_seg0]blend=all_expr='if(lt(T\\,1.5)\\, B\\, A)'[seg0]"
        );
    }

    #[test]
    fn test_times_and_overrides_interleave() {
        let blend = resolve(&["4", "noise=alls=20", "1", "3"]).unwrap();
        assert_eq!(blend.curve, BlendCurve::Crossfade { start: 1.0, end: 3.0 });
        assert_eq!(blend.filters(), vec!["noise=alls=20"]);
    }

    #[test]
    fn test_unknown_phase_fails() {
        let err = resolve(&["7"]).unwrap_err();
        assert!(matches!(err, FxGraphError::Blend(BlendError::Phase { phase: 7 })));
    }

    #[test]
    fn test_bad_time_is_type_error() {
        let err = resolve(&["2", "soon"]).unwrap_err();
        assert!(matches!(err, FxGraphError::Param(ParamError::Type { .. })));
    }

    #[test]
    fn test_bad_shift_axis_is_type_error() {
        let err = resolve(&["1", "rgbashift_qq=3"]).unwrap_err();
        match err {
            FxGraphError::Param(ParamError::Type { param, value, .. }) => {
                assert_eq!(param, "rgbashift_qq");
                assert_eq!(value, "3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_phase_is_arity_error() {
        let err = resolve(&[]).unwrap_err();
        assert!(matches!(err, FxGraphError::Param(ParamError::Arity { expected: 1, got: 0, .. })));
    }
}
