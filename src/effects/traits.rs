use std::fmt;

use crate::{
    graph::{GraphFragment, Label, StreamInputs},
    timeline::TimeWindow,
};

/// Core trait every resolved effect implements
///
/// Most effects are a single filter chain after the trim, so they only
/// provide [`Effect::filters`]. Effects that need extra branches (overlays,
/// blends, merges) override [`Effect::build`].
pub trait Effect: Send + Sync {
    /// Kind name the effect was resolved from
    fn kind(&self) -> &'static str;

    /// Filters appended to the trimmed window, in order
    ///
    /// An empty list leaves the window untouched.
    fn filters(&self) -> Vec<String> {
        Vec::new()
    }

    /// Build the fragment for `window`, ending in `label`
    ///
    /// Must be deterministic: the same inputs always give byte-identical text.
    fn build(&self, window: &TimeWindow, label: &Label, inputs: &StreamInputs) -> GraphFragment {
        GraphFragment::chain(inputs.trim(window), &self.filters(), label.clone())
    }
}

/// Declared type of a positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    Float,
    Choice(&'static [&'static str]),
    /// Free text, quoted where the filter needs it
    Text,
    /// Passed through verbatim as a filter expression
    Expr,
    /// Remaining `key=value` overrides and bare values
    Overrides,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Choice(options) => write!(f, "{{{}}}", options.join(",")),
            Self::Text => f.write_str("text"),
            Self::Expr => f.write_str("expr"),
            Self::Overrides => f.write_str("key=value..."),
        }
    }
}

/// One positional parameter of an effect kind
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    /// Documented fallback, `None` if the parameter has no default
    pub default: Option<&'static str>,
}

impl ParamSpec {
    pub const fn required(name: &'static str, ty: ParamType) -> Self {
        Self { name, ty, required: true, default: None }
    }

    pub const fn optional(name: &'static str, ty: ParamType, default: &'static str) -> Self {
        Self { name, ty, required: false, default: Some(default) }
    }

    /// Optional parameter that is simply left out when omitted
    pub const fn omittable(name: &'static str, ty: ParamType) -> Self {
        Self { name, ty, required: false, default: None }
    }
}

/// Static description of an effect kind: its name, docs and parameter table
#[derive(Debug, Clone, Copy)]
pub struct KindDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl KindDescriptor {
    /// Minimum number of positional parameters
    ///
    /// Required parameters always lead the table.
    pub fn required(&self) -> usize {
        self.params.iter().take_while(|p| p.required).count()
    }

    /// One-line usage string, e.g. `fade <type:{in,out}> <duration:float>`
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for param in self.params {
            usage.push(' ');
            match (param.required, param.default) {
                (true, _) => usage.push_str(&format!("<{}:{}>", param.name, param.ty)),
                (false, Some(default)) if !default.is_empty() => {
                    usage.push_str(&format!("[{}:{}={}]", param.name, param.ty, default))
                }
                (false, _) => usage.push_str(&format!("[{}:{}]", param.name, param.ty)),
            }
        }
        usage
    }
}
