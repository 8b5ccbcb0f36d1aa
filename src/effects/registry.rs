use std::collections::HashMap;

use tracing::warn;

use crate::{
    effects::{
        blend::Blend,
        color::{self, ChannelMixer, ColorBalance, Curves, Equalizer, Lut, LutTable},
        defaults,
        filtering::{self, Delogo, OptionFilter},
        overlay::{self, AlphaExtract, AlphaMerge, DualOverlay, Key, LumaKey, Overlay},
        params::{ParamReader, ResolvedParams},
        passthrough::{Passthrough, RawChain},
        text::DrawText,
        transform::{Crop, Fade, LensCorrection, Perspective, Rotate, Scale, Transpose},
        KindDescriptor,
    },
    error::Result,
    timeline::EffectSpec,
};

/// Turns a kind's positional parameters into typed parameters
pub type Resolver = fn(&mut ParamReader<'_>) -> Result<ResolvedParams>;

/// A registered effect kind
#[derive(Clone, Copy)]
pub struct KindEntry {
    pub descriptor: &'static KindDescriptor,
    pub resolve: Resolver,
}

/// Registry of effect kinds, keyed by lowercase kind name
///
/// Resolution checks the kind's required arity before its resolver runs, so
/// resolvers only see lists that are long enough for their required slots.
pub struct EffectRegistry {
    kinds: HashMap<String, KindEntry>,
}

impl EffectRegistry {
    /// Create a registry with every built-in kind
    pub fn new() -> Self {
        let mut registry = Self {
            kinds: HashMap::new(),
        };

        registry.register_builtin_kinds();
        registry
    }

    fn register_builtin_kinds(&mut self) {
        // Geometry and timing
        self.register(&Crop::DESCRIPTOR, |r| Crop::resolve(r).map(ResolvedParams::Crop));
        self.register(&Fade::DESCRIPTOR, |r| Fade::resolve(r).map(ResolvedParams::Fade));
        self.register(&Scale::DESCRIPTOR, |r| Scale::resolve(r).map(ResolvedParams::Scale));
        self.register(&Rotate::DESCRIPTOR, |r| Rotate::resolve(r).map(ResolvedParams::Rotate));
        self.register(&Transpose::DESCRIPTOR, |r| {
            Transpose::resolve(r).map(ResolvedParams::Transpose)
        });
        self.register(&LensCorrection::DESCRIPTOR, |r| {
            LensCorrection::resolve(r).map(ResolvedParams::LensCorrection)
        });
        self.register(&Perspective::DESCRIPTOR, |r| {
            Perspective::resolve(r).map(ResolvedParams::Perspective)
        });

        // Single-option filters
        self.register(&filtering::BOXBLUR, |r| {
            OptionFilter::resolve("boxblur", defaults::BOXBLUR, r).map(ResolvedParams::Filter)
        });
        self.register(&filtering::GBLUR, |r| {
            OptionFilter::resolve("gblur", defaults::GBLUR, r).map(ResolvedParams::Filter)
        });
        self.register(&filtering::SMARTBLUR, |r| {
            OptionFilter::resolve("smartblur", defaults::SMARTBLUR, r).map(ResolvedParams::Filter)
        });
        self.register(&filtering::EDGEDETECT, |r| {
            OptionFilter::resolve("edgedetect", defaults::EDGEDETECT, r).map(ResolvedParams::Filter)
        });
        self.register(&filtering::SOBEL, |r| {
            OptionFilter::resolve("sobel", defaults::SOBEL, r).map(ResolvedParams::Filter)
        });
        self.register(&filtering::UNSHARP, |r| {
            OptionFilter::resolve("unsharp", defaults::UNSHARP, r).map(ResolvedParams::Filter)
        });
        self.register(&Delogo::DESCRIPTOR, |r| Delogo::resolve(r).map(ResolvedParams::Delogo));

        // Compositing and keying
        self.register(&Overlay::DESCRIPTOR, |r| Overlay::resolve(r).map(ResolvedParams::Overlay));
        self.register(&DualOverlay::DESCRIPTOR, |r| {
            DualOverlay::resolve(r).map(ResolvedParams::DualOverlay)
        });
        self.register(&Blend::DESCRIPTOR, |r| Blend::resolve(r).map(ResolvedParams::Blend));
        self.register(&overlay::CHROMAKEY, |r| {
            Key::resolve("chromakey", defaults::CHROMAKEY_COLOR, r).map(ResolvedParams::Key)
        });
        self.register(&overlay::COLORKEY, |r| {
            Key::resolve("colorkey", defaults::COLORKEY_COLOR, r).map(ResolvedParams::Key)
        });
        self.register(&LumaKey::DESCRIPTOR, |r| LumaKey::resolve(r).map(ResolvedParams::LumaKey));
        self.register(&AlphaMerge::DESCRIPTOR, |_| Ok(ResolvedParams::AlphaMerge(AlphaMerge)));
        self.register(&AlphaExtract::DESCRIPTOR, |_| {
            Ok(ResolvedParams::AlphaExtract(AlphaExtract))
        });

        // Color
        self.register(&ColorBalance::DESCRIPTOR, |r| {
            ColorBalance::resolve(r).map(ResolvedParams::ColorBalance)
        });
        self.register(&ChannelMixer::DESCRIPTOR, |r| {
            ChannelMixer::resolve(r).map(ResolvedParams::ChannelMixer)
        });
        self.register(&Curves::DESCRIPTOR, |r| Curves::resolve(r).map(ResolvedParams::Curves));
        self.register(&Equalizer::DESCRIPTOR, |r| {
            Equalizer::resolve(r).map(ResolvedParams::Equalizer)
        });
        self.register(&color::LUT, |r| {
            Lut::resolve("lut", LutTable::Lut3d, r).map(ResolvedParams::Lut)
        });
        self.register(&color::LUT3D, |r| {
            Lut::resolve("lut3d", LutTable::Lut3d, r).map(ResolvedParams::Lut)
        });
        self.register(&color::HALDCLUT, |r| {
            Lut::resolve("haldclut", LutTable::HaldClut, r).map(ResolvedParams::Lut)
        });

        // Text, raw chains, no-op
        self.register(&DrawText::DESCRIPTOR, |r| DrawText::resolve(r).map(ResolvedParams::DrawText));
        self.register(&RawChain::DESCRIPTOR, |r| RawChain::resolve(r).map(ResolvedParams::Chain));
        self.register(&Passthrough::DESCRIPTOR, |_| {
            Ok(ResolvedParams::Passthrough(Passthrough))
        });
    }

    /// Register a kind, replacing any existing kind of the same name
    pub fn register(&mut self, descriptor: &'static KindDescriptor, resolve: Resolver) {
        self.kinds.insert(
            descriptor.name.to_ascii_lowercase(),
            KindEntry { descriptor, resolve },
        );
    }

    pub fn get(&self, kind: &str) -> Option<&KindEntry> {
        self.kinds.get(kind)
    }

    /// Check if a kind is registered
    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// All kind names, sorted
    pub fn available_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.kinds.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Descriptors of all kinds, sorted by name
    pub fn descriptors(&self) -> Vec<&'static KindDescriptor> {
        let mut descriptors: Vec<_> = self.kinds.values().map(|entry| entry.descriptor).collect();
        descriptors.sort_by_key(|descriptor| descriptor.name);
        descriptors
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Resolve a spec's parameters against its kind
    ///
    /// Unknown kinds are not an error and resolve to passthrough.
    pub fn resolve(&self, spec: &EffectSpec) -> Result<ResolvedParams> {
        let Some(entry) = self.kinds.get(&spec.kind) else {
            warn!(
                "Unknown effect kind '{}' (item {}), leaving {} untouched",
                spec.kind,
                spec.index,
                spec.window()
            );
            return Ok(ResolvedParams::Passthrough(Passthrough));
        };

        let mut reader = ParamReader::for_spec(spec);
        reader.ensure_arity(entry.descriptor.required())?;
        let resolved = (entry.resolve)(&mut reader)?;
        reader.finish();
        Ok(resolved)
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
