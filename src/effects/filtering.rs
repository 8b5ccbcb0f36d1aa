//! Spatial filters that take a single option string, plus delogo.

use crate::{
    effects::{
        defaults,
        params::ParamReader,
        traits::{KindDescriptor, ParamSpec, ParamType},
        Effect,
    },
    error::Result,
};

const fn option_kind(
    name: &'static str,
    description: &'static str,
    params: &'static [ParamSpec],
) -> KindDescriptor {
    KindDescriptor { name, description, params }
}

pub const BOXBLUR: KindDescriptor = option_kind(
    "boxblur",
    "Box blur with `luma_radius:luma_power` style options",
    &[ParamSpec::optional("options", ParamType::Expr, defaults::BOXBLUR)],
);

pub const GBLUR: KindDescriptor = option_kind(
    "gblur",
    "Gaussian blur",
    &[ParamSpec::optional("options", ParamType::Expr, defaults::GBLUR)],
);

pub const SMARTBLUR: KindDescriptor = option_kind(
    "smartblur",
    "Blur preserving outlines",
    &[ParamSpec::optional("options", ParamType::Expr, defaults::SMARTBLUR)],
);

pub const EDGEDETECT: KindDescriptor = option_kind(
    "edgedetect",
    "Detect and draw edges",
    &[ParamSpec::optional("options", ParamType::Expr, defaults::EDGEDETECT)],
);

pub const SOBEL: KindDescriptor = option_kind(
    "sobel",
    "Sobel operator",
    &[ParamSpec::optional("options", ParamType::Expr, defaults::SOBEL)],
);

pub const UNSHARP: KindDescriptor = option_kind(
    "unsharp",
    "Sharpen or blur with an unsharp mask",
    &[ParamSpec::optional("options", ParamType::Expr, defaults::UNSHARP)],
);

/// A filter rendered as `name=options`, or bare `name` when there are no options
#[derive(Debug, Clone, PartialEq)]
pub struct OptionFilter {
    pub name: &'static str,
    pub options: String,
}

impl OptionFilter {
    pub fn resolve(
        name: &'static str,
        default: &str,
        reader: &mut ParamReader<'_>,
    ) -> Result<Self> {
        Ok(Self {
            name,
            options: reader.text_or(default),
        })
    }
}

impl Effect for OptionFilter {
    fn kind(&self) -> &'static str {
        self.name
    }

    fn filters(&self) -> Vec<String> {
        if self.options.is_empty() {
            vec![self.name.to_string()]
        } else {
            vec![format!("{}={}", self.name, self.options)]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delogo {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub show: i64,
}

impl Delogo {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "delogo",
        description: "Suppress a logo inside a rectangle",
        params: &[
            ParamSpec::required("x", ParamType::Integer),
            ParamSpec::required("y", ParamType::Integer),
            ParamSpec::required("w", ParamType::Integer),
            ParamSpec::required("h", ParamType::Integer),
            ParamSpec::optional("show", ParamType::Integer, "0"),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            x: reader.required_int("x")?,
            y: reader.required_int("y")?,
            width: reader.required_int("w")?,
            height: reader.required_int("h")?,
            show: reader.int_or("show", defaults::DELOGO_SHOW)?,
        })
    }
}

impl Effect for Delogo {
    fn kind(&self) -> &'static str {
        "delogo"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!(
            "delogo=x={}:y={}:w={}:h={}:show={}",
            self.x, self.y, self.width, self.height, self.show
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_option_filter_defaults() {
        let mut reader = ParamReader::new("gblur", 0, &[]);
        let gblur = OptionFilter::resolve("gblur", defaults::GBLUR, &mut reader).unwrap();
        assert_eq!(gblur.filters(), vec!["gblur=sigma=1"]);
        assert_eq!(gblur.kind(), "gblur");
    }

    #[test]
    fn test_sobel_is_bare_by_default() {
        let mut reader = ParamReader::new("sobel", 0, &[]);
        let sobel = OptionFilter::resolve("sobel", defaults::SOBEL, &mut reader).unwrap();
        assert_eq!(sobel.filters(), vec!["sobel"]);
    }

    #[test]
    fn test_explicit_options_win() {
        let tokens = raw(&["5:2"]);
        let mut reader = ParamReader::new("boxblur", 0, &tokens);
        let boxblur = OptionFilter::resolve("boxblur", defaults::BOXBLUR, &mut reader).unwrap();
        assert_eq!(boxblur.filters(), vec!["boxblur=5:2"]);
    }

    #[test]
    fn test_delogo_show_default() {
        let tokens = raw(&["10", "20", "100", "50"]);
        let delogo = Delogo::resolve(&mut ParamReader::new("delogo", 0, &tokens)).unwrap();
        assert_eq!(delogo.filters(), vec!["delogo=x=10:y=20:w=100:h=50:show=0"]);
    }

    #[test]
    fn test_delogo_descriptor_arity() {
        assert_eq!(Delogo::DESCRIPTOR.required(), 4);
        assert_eq!(UNSHARP.required(), 0);
    }
}
