use crate::{
    effects::{
        params::ParamReader,
        traits::{KindDescriptor, ParamSpec, ParamType},
        Effect,
    },
    error::Result,
    graph::num,
};

/// Reproduces the window unchanged
///
/// Also used for gaps and for kinds the registry does not know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Passthrough;

impl Passthrough {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "passthrough",
        description: "Leave the window untouched",
        params: &[],
    };
}

impl Effect for Passthrough {
    fn kind(&self) -> &'static str {
        "passthrough"
    }
}

/// A raw filter chain, optionally retimed by a speed factor
#[derive(Debug, Clone, PartialEq)]
pub struct RawChain {
    pub filters: String,
    pub speed: Option<f64>,
}

impl RawChain {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "chain",
        description: "Raw comma-separated filter chain, with an optional speed factor",
        params: &[
            ParamSpec::required("filters", ParamType::Expr),
            ParamSpec::omittable("speed", ParamType::Float),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        let filters = reader.required_text()?;
        let speed = reader.float("speed")?;
        if let Some(speed) = speed {
            if speed <= 0.0 {
                return Err(reader.type_error("speed", &speed.to_string()).into());
            }
        }
        Ok(Self { filters, speed })
    }
}

impl Effect for RawChain {
    fn kind(&self) -> &'static str {
        "chain"
    }

    fn filters(&self) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(speed) = self.speed {
            filters.push(format!("setpts={}*PTS", num(1.0 / speed)));
        }
        if !self.filters.is_empty() {
            filters.push(self.filters.clone());
        }
        filters
    }
}
