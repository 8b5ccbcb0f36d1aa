//! Compositing effects that combine the main stream with the overlay stream,
//! and the keying filters.

use crate::{
    effects::{
        defaults,
        params::ParamReader,
        traits::{KindDescriptor, ParamSpec, ParamType},
        Effect,
    },
    error::Result,
    graph::{num, GraphFragment, Label, StreamInputs},
    timeline::TimeWindow,
};

/// Secondary stream composited on top of the main one at `(x, y)`
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub x: String,
    pub y: String,
    /// Alpha applied to the overlay stream, left untouched when `None`
    pub opacity: Option<f64>,
}

impl Overlay {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "overlay",
        description: "Composite the overlay input over the main input",
        params: &[
            ParamSpec::required("x", ParamType::Expr),
            ParamSpec::required("y", ParamType::Expr),
            ParamSpec::omittable("opacity", ParamType::Float),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            x: reader.required_text()?,
            y: reader.required_text()?,
            opacity: reader.float("opacity")?,
        })
    }
}

impl Effect for Overlay {
    fn kind(&self) -> &'static str {
        "overlay"
    }

    fn build(&self, window: &TimeWindow, label: &Label, inputs: &StreamInputs) -> GraphFragment {
        let base = label.suffixed("base");
        let ovl = label.suffixed("ovl");

        let mut overlay_filters = Vec::new();
        if let Some(opacity) = self.opacity {
            overlay_filters.push("format=yuva420p".to_string());
            overlay_filters.push(format!("colorchannelmixer=aa={}", num(opacity)));
        }

        let mut statements = GraphFragment::chain(inputs.trim(window), &[], base.clone()).statements;
        statements.extend(
            GraphFragment::chain(inputs.trim_overlay(window), &overlay_filters, ovl.clone())
                .statements,
        );
        statements.push(format!(
            "{}{}overlay=x={}:y={}{}",
            base.reference(),
            ovl.reference(),
            self.x,
            self.y,
            label.reference()
        ));

        GraphFragment::new(statements, label.clone())
    }
}

/// Two overlay branches at different x offsets, averaged together
#[derive(Debug, Clone, PartialEq)]
pub struct DualOverlay {
    pub left_x: String,
    pub right_x: String,
    pub opacity: f64,
}

impl DualOverlay {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "dualoverlay",
        description: "Two overlays at left/right x offsets, blended 50/50",
        params: &[
            ParamSpec::required("left_x", ParamType::Expr),
            ParamSpec::required("right_x", ParamType::Expr),
            ParamSpec::optional("opacity", ParamType::Float, "1.0"),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            left_x: reader.required_text()?,
            right_x: reader.required_text()?,
            opacity: reader.float_or("opacity", defaults::DUAL_OVERLAY_OPACITY)?,
        })
    }

    fn branch(&self, x: &str) -> Overlay {
        Overlay {
            x: x.to_string(),
            y: "0".to_string(),
            opacity: Some(self.opacity),
        }
    }
}

impl Effect for DualOverlay {
    fn kind(&self) -> &'static str {
        "dualoverlay"
    }

    fn build(&self, window: &TimeWindow, label: &Label, inputs: &StreamInputs) -> GraphFragment {
        let left = label.suffixed("left");
        let right = label.suffixed("right");

        let mut statements = self.branch(&self.left_x).build(window, &left, inputs).statements;
        statements.extend(self.branch(&self.right_x).build(window, &right, inputs).statements);
        statements.push(format!(
            "{}{}blend=all_expr='0.5*A+0.5*B'{}",
            left.reference(),
            right.reference(),
            label.reference()
        ));

        GraphFragment::new(statements, label.clone())
    }
}

pub const CHROMAKEY: KindDescriptor = KindDescriptor {
    name: "chromakey",
    description: "Make a color range transparent (YUV)",
    params: &[
        ParamSpec::optional("color", ParamType::Text, defaults::CHROMAKEY_COLOR),
        ParamSpec::optional("similarity", ParamType::Float, "0.1"),
        ParamSpec::optional("blend", ParamType::Float, "0.0"),
    ],
};

pub const COLORKEY: KindDescriptor = KindDescriptor {
    name: "colorkey",
    description: "Make a color range transparent (RGB)",
    params: &[
        ParamSpec::optional("color", ParamType::Text, defaults::COLORKEY_COLOR),
        ParamSpec::optional("similarity", ParamType::Float, "0.1"),
        ParamSpec::optional("blend", ParamType::Float, "0.0"),
    ],
};

/// `chromakey` or `colorkey`; both share the same parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub filter: &'static str,
    pub color: String,
    pub similarity: f64,
    pub blend: f64,
}

impl Key {
    pub fn resolve(
        filter: &'static str,
        default_color: &str,
        reader: &mut ParamReader<'_>,
    ) -> Result<Self> {
        Ok(Self {
            filter,
            color: reader.text_or(default_color),
            similarity: reader.float_or("similarity", defaults::KEY_SIMILARITY)?,
            blend: reader.float_or("blend", defaults::KEY_BLEND)?,
        })
    }
}

impl Effect for Key {
    fn kind(&self) -> &'static str {
        self.filter
    }

    fn filters(&self) -> Vec<String> {
        vec![format!(
            "{}=color={}:similarity={}:blend={}",
            self.filter,
            self.color,
            num(self.similarity),
            num(self.blend)
        )]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LumaKey {
    pub threshold: f64,
}

impl LumaKey {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "lumakey",
        description: "Make pixels around a luma threshold transparent",
        params: &[ParamSpec::optional("threshold", ParamType::Float, "0.5")],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            threshold: reader.float_or("threshold", defaults::LUMAKEY_THRESHOLD)?,
        })
    }
}

impl Effect for LumaKey {
    fn kind(&self) -> &'static str {
        "lumakey"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("lumakey=threshold={}", num(self.threshold))]
    }
}

/// Uses the overlay stream, converted to gray, as the main stream's alpha
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMerge;

impl AlphaMerge {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "alphamerge",
        description: "Take the alpha plane from the overlay input",
        params: &[],
    };
}

impl Effect for AlphaMerge {
    fn kind(&self) -> &'static str {
        "alphamerge"
    }

    fn build(&self, window: &TimeWindow, label: &Label, inputs: &StreamInputs) -> GraphFragment {
        let base = label.suffixed("base");
        let alpha = label.suffixed("alpha");

        let mut statements = GraphFragment::chain(inputs.trim(window), &[], base.clone()).statements;
        statements.extend(
            GraphFragment::chain(
                inputs.trim_overlay(window),
                &["format=gray".to_string()],
                alpha.clone(),
            )
            .statements,
        );
        statements.push(format!(
            "{}{}alphamerge{}",
            base.reference(),
            alpha.reference(),
            label.reference()
        ));

        GraphFragment::new(statements, label.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlphaExtract;

impl AlphaExtract {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "alphaextract",
        description: "Replace the picture with its alpha plane",
        params: &[],
    };
}

impl Effect for AlphaExtract {
    fn kind(&self) -> &'static str {
        "alphaextract"
    }

    fn filters(&self) -> Vec<String> {
        vec!["alphaextract".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn window() -> TimeWindow {
        TimeWindow::new(1.0, 2.0)
    }

    #[test]
    fn test_overlay_without_opacity() {
        let tokens = raw(&["10", "main_h-overlay_h"]);
        let overlay = Overlay::resolve(&mut ParamReader::new("overlay", 0, &tokens)).unwrap();
        let fragment = overlay.build(&window(), &Label::new("seg1"), &StreamInputs::default());

        assert_eq!(
            fragment.text(),
            "[0:v]trim=start=1:end=2,setpts=PTS-STARTPTS[seg1_base]; \
             [1:v]trim=start=1:end=2,setpts=PTS-STARTPTS[seg1_ovl]; \
             [seg1_base][seg1_ovl]overlay=x=10:y=main_h-overlay_h[seg1]"
        );
    }

    #[test]
    fn test_overlay_with_opacity() {
        let overlay = Overlay { x: "0".into(), y: "0".into(), opacity: Some(0.5) };
        let fragment = overlay.build(&window(), &Label::new("seg0"), &StreamInputs::default());
        assert!(fragment.statements[1].ends_with(
            "setpts=PTS-STARTPTS,format=yuva420p,colorchannelmixer=aa=0.5[seg0_ovl]"
        ));
    }

    #[test]
    fn test_dualoverlay_labels() {
        let tokens = raw(&["0", "W/2"]);
        let dual = DualOverlay::resolve(&mut ParamReader::new("dualoverlay", 0, &tokens)).unwrap();
        assert_eq!(dual.opacity, 1.0);

        let fragment = dual.build(&window(), &Label::new("seg2"), &StreamInputs::default());
        assert_eq!(fragment.statements.len(), 7);
        assert_eq!(
            fragment.statements[6],
            "[seg2_left][seg2_right]blend=all_expr='0.5*A+0.5*B'[seg2]"
        );
        assert!(fragment.statements[2].contains("[seg2_left_base][seg2_left_ovl]overlay=x=0:y=0"));
        assert!(fragment.statements[5].contains("overlay=x=W/2:y=0[seg2_right]"));
    }

    #[test]
    fn test_key_defaults() {
        let chroma = Key::resolve("chromakey", defaults::CHROMAKEY_COLOR, &mut ParamReader::new("chromakey", 0, &[])).unwrap();
        assert_eq!(chroma.filters(), vec!["chromakey=color=green:similarity=0.1:blend=0"]);

        let tokens = raw(&["0xFFFFFF", "0.3"]);
        let color = Key::resolve("colorkey", defaults::COLORKEY_COLOR, &mut ParamReader::new("colorkey", 0, &tokens)).unwrap();
        assert_eq!(color.filters(), vec!["colorkey=color=0xFFFFFF:similarity=0.3:blend=0"]);
    }

    #[test]
    fn test_alphamerge_uses_overlay_stream() {
        let fragment = AlphaMerge.build(&window(), &Label::new("seg3"), &StreamInputs::default());
        assert_eq!(
            fragment.text(),
            "[0:v]trim=start=1:end=2,setpts=PTS-STARTPTS[seg3_base]; \
             [1:v]trim=start=1:end=2,setpts=PTS-STARTPTS,format=gray[seg3_alpha]; \
             [seg3_base][seg3_alpha]alphamerge[seg3]"
        );
    }

    #[test]
    fn test_lumakey_and_alphaextract() {
        let luma = LumaKey::resolve(&mut ParamReader::new("lumakey", 0, &[])).unwrap();
        assert_eq!(luma.filters(), vec!["lumakey=threshold=0.5"]);
        assert_eq!(AlphaExtract.filters(), vec!["alphaextract"]);
    }
}
