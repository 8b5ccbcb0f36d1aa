use tracing::info;

use crate::{
    error::SyncError,
    graph::{num, StreamInputs},
};

/// Filter chain applied to the stretched lead-in unless one is given
pub const DEFAULT_GLITCH_FILTER: &str = "rgbashift=rh=10:rv=10,boxblur=2:1";

/// Lines a splice segment up with a musical cue
///
/// The lead-in `[0, segment_start)` is stretched to last until `audio_cue`
/// and run through the glitch filter. The segment
/// `[segment_start, segment_end)` is then retimed to end at `cue_end`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    pub audio_cue: f64,
    pub cue_end: f64,
    pub segment_start: f64,
    pub segment_end: f64,
    pub glitch_filter: String,
}

impl SyncPlan {
    pub fn new(audio_cue: f64, cue_end: f64, segment_start: f64, segment_end: f64) -> Self {
        Self {
            audio_cue,
            cue_end,
            segment_start,
            segment_end,
            glitch_filter: DEFAULT_GLITCH_FILTER.to_string(),
        }
    }

    pub fn with_glitch_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.glitch_filter = filter.into();
        self
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if !(self.segment_start > 0.0 && self.segment_end > self.segment_start) {
            return Err(SyncError::InvalidSegment {
                start: self.segment_start,
                end: self.segment_end,
            });
        }
        if !(self.audio_cue >= 0.0 && self.cue_end > self.audio_cue) {
            return Err(SyncError::InvalidCue {
                cue: self.audio_cue,
                end: self.cue_end,
            });
        }
        Ok(())
    }

    /// PTS multiplier stretching the lead-in to the cue
    pub fn stretch_factor(&self) -> f64 {
        self.audio_cue / self.segment_start
    }

    /// Playback speed of the splice so it ends on `cue_end`
    pub fn splice_speed(&self) -> f64 {
        (self.segment_end - self.segment_start) / (self.cue_end - self.audio_cue)
    }

    pub fn build(&self, inputs: &StreamInputs) -> Result<String, SyncError> {
        self.validate()?;

        let stretch = self.stretch_factor();
        let speed = self.splice_speed();
        info!(
            "Stretching {}s lead-in by {:.2}, splice speed {:.2}",
            self.segment_start, stretch, speed
        );

        Ok(format!(
            "[{video}]trim=start=0:end={start},setpts=PTS*{stretch}[glitch]; \
             [glitch]{glitch}[glitch_out]; \
             [{video}]trim=start={start}:end={end},setpts=(PTS-STARTPTS)/{speed}[splice]; \
             [glitch_out][splice]concat=n=2:v=1:a=0[outv]",
            video = inputs.video,
            start = num(self.segment_start),
            end = num(self.segment_end),
            stretch = num(stretch),
            glitch = self.glitch_filter,
            speed = num(speed),
        ))
    }
}
