//! Color grading: balance, channel mixing, curves, eq and lookup tables.

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

fn named(names: &[&str], values: &[f64]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}={}", name, num(*value)))
        .collect::<Vec<_>>()
        .join(":")
}

fn read_floats<const N: usize>(
    reader: &mut ParamReader<'_>,
    names: &[&'static str; N],
) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for (slot, name) in values.iter_mut().zip(names.iter()) {
        *slot = reader.required_float(name)?;
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorBalance {
    /// Shadows adjustment for red, green and blue
    pub shadows: [f64; 3],
}

impl ColorBalance {
    const NAMES: [&'static str; 3] = ["rs", "gs", "bs"];

    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "colorbalance",
        description: "Shift shadows toward red, green or blue",
        params: &[
            ParamSpec::required("rs", ParamType::Float),
            ParamSpec::required("gs", ParamType::Float),
            ParamSpec::required("bs", ParamType::Float),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            shadows: read_floats(reader, &Self::NAMES)?,
        })
    }
}

impl Effect for ColorBalance {
    fn kind(&self) -> &'static str {
        "colorbalance"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("colorbalance={}", named(&Self::NAMES, &self.shadows))]
    }
}

/// 3x3 channel matrix, row-major `rr rg rb gr gg gb br bg bb`
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMixer {
    pub matrix: [f64; 9],
}

impl ChannelMixer {
    const NAMES: [&'static str; 9] = ["rr", "rg", "rb", "gr", "gg", "gb", "br", "bg", "bb"];

    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "colorchannelmixer",
        description: "Remix color channels with a 3x3 matrix",
        params: &[
            ParamSpec::required("rr", ParamType::Float),
            ParamSpec::required("rg", ParamType::Float),
            ParamSpec::required("rb", ParamType::Float),
            ParamSpec::required("gr", ParamType::Float),
            ParamSpec::required("gg", ParamType::Float),
            ParamSpec::required("gb", ParamType::Float),
            ParamSpec::required("br", ParamType::Float),
            ParamSpec::required("bg", ParamType::Float),
            ParamSpec::required("bb", ParamType::Float),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            matrix: read_floats(reader, &Self::NAMES)?,
        })
    }
}

impl Effect for ChannelMixer {
    fn kind(&self) -> &'static str {
        "colorchannelmixer"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!("colorchannelmixer={}", named(&Self::NAMES, &self.matrix))]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curves {
    pub preset: String,
}

impl Curves {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "curves",
        description: "Tone curves, e.g. `preset=vintage`; empty leaves the window untouched",
        params: &[ParamSpec::optional("curves", ParamType::Expr, defaults::CURVES)],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            preset: reader.text_or(defaults::CURVES),
        })
    }
}

impl Effect for Curves {
    fn kind(&self) -> &'static str {
        "curves"
    }

    fn filters(&self) -> Vec<String> {
        if self.preset.is_empty() {
            Vec::new()
        } else {
            vec![format!("curves={}", self.preset)]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equalizer {
    pub brightness: f64,
    pub contrast: f64,
    pub gamma: f64,
    pub saturation: f64,
}

impl Equalizer {
    const NAMES: [&'static str; 4] = ["brightness", "contrast", "gamma", "saturation"];

    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "eq",
        description: "Brightness, contrast, gamma and saturation",
        params: &[
            ParamSpec::required("brightness", ParamType::Float),
            ParamSpec::required("contrast", ParamType::Float),
            ParamSpec::required("gamma", ParamType::Float),
            ParamSpec::required("saturation", ParamType::Float),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        let [brightness, contrast, gamma, saturation] = read_floats(reader, &Self::NAMES)?;
        Ok(Self { brightness, contrast, gamma, saturation })
    }
}

impl Effect for Equalizer {
    fn kind(&self) -> &'static str {
        "eq"
    }

    fn filters(&self) -> Vec<String> {
        let values = [self.brightness, self.contrast, self.gamma, self.saturation];
        vec![format!("eq={}", named(&Self::NAMES, &values))]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutTable {
    /// `lut` and `lut3d`: a 3D LUT file (.cube, .3dl, ...)
    Lut3d,
    /// Hald CLUT image, loaded as a second graph input
    HaldClut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    pub kind: &'static str,
    pub table: LutTable,
    /// Empty means no table, which leaves the window untouched
    pub file: String,
}

pub const LUT: KindDescriptor = KindDescriptor {
    name: "lut",
    description: "Apply a 3D LUT file (alias of lut3d)",
    params: &[ParamSpec::optional("file", ParamType::Text, defaults::LUT_FILE)],
};

pub const LUT3D: KindDescriptor = KindDescriptor {
    name: "lut3d",
    description: "Apply a 3D LUT file",
    params: &[ParamSpec::optional("file", ParamType::Text, defaults::LUT_FILE)],
};

pub const HALDCLUT: KindDescriptor = KindDescriptor {
    name: "haldclut",
    description: "Apply a Hald CLUT image",
    params: &[ParamSpec::optional("file", ParamType::Text, defaults::LUT_FILE)],
};

impl Lut {
    pub fn resolve(kind: &'static str, table: LutTable, reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            kind,
            table,
            file: reader.text_or(defaults::LUT_FILE),
        })
    }
}

impl Effect for Lut {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn filters(&self) -> Vec<String> {
        match self.table {
            LutTable::Lut3d if !self.file.is_empty() => vec![format!("lut3d=file={}", self.file)],
            _ => Vec::new(),
        }
    }

    fn build(&self, window: &TimeWindow, label: &Label, inputs: &StreamInputs) -> GraphFragment {
        if self.table == LutTable::Lut3d || self.file.is_empty() {
            return GraphFragment::chain(inputs.trim(window), &self.filters(), label.clone());
        }

        let clut = label.suffixed("clut");
        let base = label.suffixed("base");
        let mut statements = vec![format!("movie={}{}", self.file, clut.reference())];
        statements.extend(GraphFragment::chain(inputs.trim(window), &[], base.clone()).statements);
        statements.push(format!(
            "{}{}haldclut{}",
            base.reference(),
            clut.reference(),
            label.reference()
        ));
        GraphFragment::new(statements, label.clone())
    }
}
