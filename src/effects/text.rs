use crate::{
    effects::{
        defaults,
        params::ParamReader,
        traits::{KindDescriptor, ParamSpec, ParamType},
        Effect,
    },
    error::Result,
};

/// Text drawn over the window, centered by default
#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    pub text: String,
    pub x: String,
    pub y: String,
    pub fontsize: i64,
    pub fontcolor: String,
}

impl DrawText {
    pub const DESCRIPTOR: KindDescriptor = KindDescriptor {
        name: "drawtext",
        description: "Draw a text string",
        params: &[
            ParamSpec::optional("text", ParamType::Text, defaults::DRAWTEXT_TEXT),
            ParamSpec::optional("x", ParamType::Expr, defaults::DRAWTEXT_X),
            ParamSpec::optional("y", ParamType::Expr, defaults::DRAWTEXT_Y),
            ParamSpec::optional("fontsize", ParamType::Integer, "24"),
            ParamSpec::optional("fontcolor", ParamType::Text, defaults::DRAWTEXT_FONTCOLOR),
        ],
    };

    pub fn resolve(reader: &mut ParamReader<'_>) -> Result<Self> {
        Ok(Self {
            text: reader.text_or(defaults::DRAWTEXT_TEXT),
            x: reader.text_or(defaults::DRAWTEXT_X),
            y: reader.text_or(defaults::DRAWTEXT_Y),
            fontsize: reader.int_or("fontsize", defaults::DRAWTEXT_FONTSIZE)?,
            fontcolor: reader.text_or(defaults::DRAWTEXT_FONTCOLOR),
        })
    }
}

/// Quote-safe text for a single-quoted filter argument
fn escape_text(text: &str) -> String {
    text.replace('\'', r"'\''")
}

impl Effect for DrawText {
    fn kind(&self) -> &'static str {
        "drawtext"
    }

    fn filters(&self) -> Vec<String> {
        vec![format!(
            "drawtext=text='{}':x={}:y={}:fontsize={}:fontcolor={}",
            escape_text(&self.text),
            self.x,
            self.y,
            self.fontsize,
            self.fontcolor
        )]
    }
}
