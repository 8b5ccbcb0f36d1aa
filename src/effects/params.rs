use tracing::debug;

use crate::{
    effects::{
        blend::Blend,
        color::{ChannelMixer, ColorBalance, Curves, Equalizer, Lut},
        filtering::{Delogo, OptionFilter},
        overlay::{AlphaExtract, AlphaMerge, DualOverlay, Key, LumaKey, Overlay},
        passthrough::{Passthrough, RawChain},
        text::DrawText,
        transform::{Crop, Fade, LensCorrection, Perspective, Rotate, Scale, Transpose},
        Effect,
    },
    error::ParamError,
    timeline::EffectSpec,
};

/// Cursor over an effect's positional parameters
///
/// Coerces each token to its declared type and reports failures against the
/// effect's kind and input position.
#[derive(Debug)]
pub struct ParamReader<'a> {
    kind: &'a str,
    index: usize,
    raw: &'a [String],
    position: usize,
}

impl<'a> ParamReader<'a> {
    pub fn new(kind: &'a str, index: usize, raw: &'a [String]) -> Self {
        Self { kind, index, raw, position: 0 }
    }

    pub fn for_spec(spec: &'a EffectSpec) -> Self {
        Self::new(&spec.kind, spec.index, &spec.raw_params)
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Fail unless at least `expected` parameters were given
    pub fn ensure_arity(&self, expected: usize) -> Result<(), ParamError> {
        if self.raw.len() < expected {
            return Err(ParamError::Arity {
                kind: self.kind.to_string(),
                index: self.index,
                expected,
                got: self.raw.len(),
            });
        }
        Ok(())
    }

    pub fn type_error(&self, param: &str, value: &str) -> ParamError {
        ParamError::Type {
            kind: self.kind.to_string(),
            index: self.index,
            param: param.to_string(),
            value: value.to_string(),
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.raw.get(self.position)?;
        self.position += 1;
        Some(token.as_str())
    }

    fn missing(&self) -> ParamError {
        ParamError::Arity {
            kind: self.kind.to_string(),
            index: self.index,
            expected: self.position + 1,
            got: self.raw.len(),
        }
    }

    pub fn int(&mut self, param: &str) -> Result<Option<i64>, ParamError> {
        match self.next_token() {
            None => Ok(None),
            Some(token) => token
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.type_error(param, token)),
        }
    }

    pub fn float(&mut self, param: &str) -> Result<Option<f64>, ParamError> {
        match self.next_token() {
            None => Ok(None),
            Some(token) => match token.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Some(value)),
                _ => Err(self.type_error(param, token)),
            },
        }
    }

    /// Case-insensitive match against a fixed set of options
    pub fn choice(
        &mut self,
        param: &str,
        options: &[&'static str],
    ) -> Result<Option<&'static str>, ParamError> {
        match self.next_token() {
            None => Ok(None),
            Some(token) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(token))
                .copied()
                .map(Some)
                .ok_or_else(|| self.type_error(param, token)),
        }
    }

    pub fn text(&mut self) -> Option<String> {
        self.next_token().map(str::to_string)
    }

    pub fn int_or(&mut self, param: &str, default: i64) -> Result<i64, ParamError> {
        Ok(self.int(param)?.unwrap_or(default))
    }

    pub fn float_or(&mut self, param: &str, default: f64) -> Result<f64, ParamError> {
        Ok(self.float(param)?.unwrap_or(default))
    }

    pub fn text_or(&mut self, default: &str) -> String {
        self.text().unwrap_or_else(|| default.to_string())
    }

    pub fn required_int(&mut self, param: &str) -> Result<i64, ParamError> {
        self.int(param)?.ok_or_else(|| self.missing())
    }

    pub fn required_float(&mut self, param: &str) -> Result<f64, ParamError> {
        self.float(param)?.ok_or_else(|| self.missing())
    }

    pub fn required_text(&mut self) -> Result<String, ParamError> {
        self.text().ok_or_else(|| self.missing())
    }

    pub fn required_choice(
        &mut self,
        param: &str,
        options: &[&'static str],
    ) -> Result<&'static str, ParamError> {
        self.choice(param, options)?.ok_or_else(|| self.missing())
    }

    /// Everything not consumed yet
    pub fn rest(&mut self) -> &'a [String] {
        let raw: &'a [String] = self.raw;
        let rest = &raw[self.position.min(raw.len())..];
        self.position = raw.len();
        rest
    }

    /// Log parameters the kind's table has no slot for
    pub fn finish(&self) {
        if self.position < self.raw.len() {
            debug!(
                "Ignoring {} extra parameter(s) for '{}' (item {})",
                self.raw.len() - self.position,
                self.kind,
                self.index
            );
        }
    }
}

/// Fully typed parameters for one effect, after defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedParams {
    Crop(Crop),
    Fade(Fade),
    Scale(Scale),
    Rotate(Rotate),
    Transpose(Transpose),
    LensCorrection(LensCorrection),
    Perspective(Perspective),
    Filter(OptionFilter),
    Delogo(Delogo),
    Overlay(Overlay),
    DualOverlay(DualOverlay),
    Blend(Blend),
    Key(Key),
    LumaKey(LumaKey),
    AlphaMerge(AlphaMerge),
    AlphaExtract(AlphaExtract),
    ColorBalance(ColorBalance),
    ChannelMixer(ChannelMixer),
    Curves(Curves),
    Equalizer(Equalizer),
    Lut(Lut),
    DrawText(DrawText),
    Chain(RawChain),
    Passthrough(Passthrough),
}

impl ResolvedParams {
    /// The builder for these parameters
    pub fn effect(&self) -> &dyn Effect {
        match self {
            Self::Crop(p) => p,
            Self::Fade(p) => p,
            Self::Scale(p) => p,
            Self::Rotate(p) => p,
            Self::Transpose(p) => p,
            Self::LensCorrection(p) => p,
            Self::Perspective(p) => p,
            Self::Filter(p) => p,
            Self::Delogo(p) => p,
            Self::Overlay(p) => p,
            Self::DualOverlay(p) => p,
            Self::Blend(p) => p,
            Self::Key(p) => p,
            Self::LumaKey(p) => p,
            Self::AlphaMerge(p) => p,
            Self::AlphaExtract(p) => p,
            Self::ColorBalance(p) => p,
            Self::ChannelMixer(p) => p,
            Self::Curves(p) => p,
            Self::Equalizer(p) => p,
            Self::Lut(p) => p,
            Self::DrawText(p) => p,
            Self::Chain(p) => p,
            Self::Passthrough(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.effect().kind()
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough(_))
    }
}
