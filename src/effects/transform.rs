//! Geometry and timing transforms: crop, fade, scale, rotate, transpose,
//! lens correction and perspective.

use crate::{
    effects::{
        defaults,
        params::ParamReader,
        traits::{KindDescriptor, ParamSpec, ParamType},
        Effect,
    },
    error::Result,
    graph::num,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    pub width: i64,
    pub height: i64,
    pub x: i64,
    pub y: i64,
}

impl Crop {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "crop",
        description: "Crop a width x height region at (x, y)",
        params: &[
            ParamSpec::optional("width", ParamType::Integer, "640"),
            ParamSpec::optional("height", ParamType::Integer, "360"),
            ParamSpec::optional("x", ParamType::Integer, "0"),
            ParamSpec::optional("y", ParamType::Integer, "0"),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            width: reader.int_or("width", defaults::CROP_WIDTH)?,
            height: reader.int_or("height", defaults::CROP_HEIGHT)?,
            x: reader.int_or("x", defaults::CROP_X)?,
            y: reader.int_or("y", defaults::CROP_Y)?,
        })
    }
}

impl Effect for Crop {
    fn kind(&self) -> &'static str {
        "crop"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

impl FadeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Fade starting at the beginning of the window
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    pub direction: FadeDirection,
    pub duration: f64,
}

impl Fade {
    const DIRECTIONS: &'static [&'static str] = &["in", "out"];

    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "fade",
        description: "Fade in or out over the first `duration` seconds of the window",
        params: &[
            ParamSpec::required("type", ParamType::Choice(Self::DIRECTIONS)),
            ParamSpec::required("duration", ParamType::Float),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        let direction = match reader.required_choice("type", Self::DIRECTIONS)? {
            "out" => FadeDirection::Out,
            _ => FadeDirection::In,
        };
        let duration = reader.required_float("duration")?;
        if duration < 0.0 {
            return Err(reader.type_error("duration", &duration.to_string()).into());
        }
        Ok(Self { direction, duration })
    }
}

impl Effect for Fade {
    fn kind(&self) -> &'static str {
        "fade"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!(
            "fade=type={}:st=0:d={}",
            self.direction.as_str(),
            num(self.duration)
        )]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub width: String,
    pub height: String,
}

impl Scale {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "scale",
        description: "Resize to width:height (expressions allowed, e.g. iw/2 or -2)",
        params: &[
            ParamSpec::optional("w", ParamType::Expr, defaults::SCALE_WIDTH),
            ParamSpec::optional("h", ParamType::Expr, defaults::SCALE_HEIGHT),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            width: reader.text_or(defaults::SCALE_WIDTH),
            height: reader.text_or(defaults::SCALE_HEIGHT),
        })
    }
}

impl Effect for Scale {
    fn kind(&self) -> &'static str {
        "scale"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("scale={}:{}", self.width, self.height)]
    }
}

/// Rotation given in degrees, emitted in radians
#[derive(Debug, Clone, PartialEq)]
pub struct Rotate {
    pub degrees: f64,
}

impl Rotate {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "rotate",
        description: "Rotate clockwise by an angle in degrees",
        params: &[ParamSpec::optional("angle", ParamType::Float, "0")],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            degrees: reader.float_or("angle", defaults::ROTATE_DEGREES)?,
        })
    }
}

impl Effect for Rotate {
    fn kind(&self) -> &'static str {
        "rotate"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("rotate={}", num(self.degrees.to_radians()))]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transpose {
    pub direction: i64,
}

impl Transpose {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "transpose",
        description: "Transpose rows with columns (0-3, or 4-7 for landscape passthrough)",
        params: &[ParamSpec::required("dir", ParamType::Integer)],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        let direction = reader.required_int("dir")?;
        if !(0..=7).contains(&direction) {
            return Err(reader.type_error("dir", &direction.to_string()).into());
        }
        Ok(Self { direction })
    }
}

impl Effect for Transpose {
    fn kind(&self) -> &'static str {
        "transpose"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("transpose={}", self.direction)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LensCorrection {
    pub k1: f64,
    pub k2: f64,
}

impl LensCorrection {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "lenscorrection",
        description: "Radial lens distortion correction",
        params: &[
            ParamSpec::optional("k1", ParamType::Float, "0"),
            ParamSpec::optional("k2", ParamType::Float, "0"),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            k1: reader.float_or("k1", defaults::LENS_K1)?,
            k2: reader.float_or("k2", defaults::LENS_K2)?,
        })
    }
}

impl Effect for LensCorrection {
    fn kind(&self) -> &'static str {
        "lenscorrection"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("lenscorrection=k1={}:k2={}", num(self.k1), num(self.k2))]
    }
}

/// Four corner points, in `x0 y0 x1 y1 x2 y2 x3 y3` order
#[derive(Debug, Clone, PartialEq)]
pub struct Perspective {
    pub corners: [i64; 8],
}

impl Perspective {
    const NAMES: [&'static str; 8] = ["x0", "y0", "x1", "y1", "x2", "y2", "x3", "y3"];

    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "perspective",
        description: "Perspective correction from four corner coordinates",
        params: &[
            ParamSpec::required("x0", ParamType::Integer),
            ParamSpec::required("y0", ParamType::Integer),
            ParamSpec::required("x1", ParamType::Integer),
            ParamSpec::required("y1", ParamType::Integer),
            ParamSpec::required("x2", ParamType::Integer),
            ParamSpec::required("y2", ParamType::Integer),
            ParamSpec::required("x3", ParamType::Integer),
            ParamSpec::required("y3", ParamType::Integer),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        let mut corners = [0i64; 8];
        for (slot, name) in corners.iter_mut().zip(Self::NAMES) {
            *slot = reader.required_int(name)?;
        }
        Ok(Self { corners })
    }
}

impl Effect for Perspective {
    fn kind(&self) -> &'static str {
        "perspective"
    }

    fn filters(&self) -> Vec<String> {
        let parts: Vec<String> = Self::NAMES
            .iter()
            .zip(self.corners.iter())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        vec![format!("perspective={}", parts.join(":"))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader<'a>(kind: &'a str, raw: &'a [String]) -> ParamReader<'a> {
        ParamReader::new(kind, 0, raw)
    }

    fn raw(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_crop_defaults() {
        let tokens = raw(&["320"]);
        let crop = Crop::resolve(&mut reader("crop", &tokens)).unwrap();
        assert_eq!(crop.filters(), vec!["crop=320:360:0:0"]);
    }

    #[test]
    fn test_fade_text() {
        let tokens = raw(&["out", "1.0"]);
        let fade = Fade::resolve(&mut reader("fade", &tokens)).unwrap();
        assert_eq!(fade.filters(), vec!["fade=type=out:st=0:d=1"]);
    }

    #[test]
    fn test_fade_rejects_unknown_direction() {
        let tokens = raw(&["sideways", "1"]);
        assert!(Fade::resolve(&mut reader("fade", &tokens)).is_err());
    }

    #[test]
    fn test_scale_defaults() {
        let tokens = raw(&["1280"]);
        let scale = Scale::resolve(&mut reader("scale", &tokens)).unwrap();
        assert_eq!(scale.filters(), vec!["scale=1280:ih"]);
    }

    #[test]
    fn test_rotate_in_radians() {
        let tokens = raw(&["180"]);
        let rotate = Rotate::resolve(&mut reader("rotate", &tokens)).unwrap();
        assert_eq!(rotate.filters(), vec![format!("rotate={}", std::f64::consts::PI)]);

        let rotate = Rotate::resolve(&mut reader("rotate", &[])).unwrap();
        assert_eq!(rotate.filters(), vec!["rotate=0"]);
    }

    #[test]
    fn test_transpose_range() {
        let tokens = raw(&["9"]);
        assert!(Transpose::resolve(&mut reader("transpose", &tokens)).is_err());
        let tokens = raw(&["1"]);
        let transpose = Transpose::resolve(&mut reader("transpose", &tokens)).unwrap();
        assert_eq!(transpose.filters(), vec!["transpose=1"]);
    }

    #[test]
    fn test_lenscorrection_defaults() {
        let tokens = raw(&["-0.2"]);
        let lens = LensCorrection::resolve(&mut reader("lenscorrection", &tokens)).unwrap();
        assert_eq!(lens.filters(), vec!["lenscorrection=k1=-0.2:k2=0"]);
    }

    #[test]
    fn test_perspective_text() {
        let tokens = raw(&["0", "0", "100", "0", "0", "100", "100", "100"]);
        let perspective = Perspective::resolve(&mut reader("perspective", &tokens)).unwrap();
        assert_eq!(
            perspective.filters(),
            vec!["perspective=x0=0:y0=0:x1=100:y1=0:x2=0:y2=100:x3=100:y3=100"]
        );
    }

    #[test]
    fn test_perspective_rejects_floats() {
        let tokens = raw(&["0", "0", "1.5", "0", "0", "1", "1", "1"]);
        assert!(Perspective::resolve(&mut reader("perspective", &tokens)).is_err());
    }
}
