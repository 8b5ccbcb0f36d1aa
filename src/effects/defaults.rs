//! Fallback values for parameters the caller leaves out.
//!
//! Explicit values always win; these are only consulted for omitted
//! positional parameters.

pub const CROP_WIDTH: i64 = 640;
pub const CROP_HEIGHT: i64 = 360;
pub const CROP_X: i64 = 0;
pub const CROP_Y: i64 = 0;

pub const SCALE_WIDTH: &str = "iw";
pub const SCALE_HEIGHT: &str = "ih";

pub const ROTATE_DEGREES: f64 = 0.0;

pub const LENS_K1: f64 = 0.0;
pub const LENS_K2: f64 = 0.0;

pub const BOXBLUR: &str = "0:1";
pub const GBLUR: &str = "sigma=1";
pub const SMARTBLUR: &str = "lr=1:ls=1";
pub const EDGEDETECT: &str = "mode=colormix";
pub const SOBEL: &str = "";
pub const UNSHARP: &str = "luma_msize_x=7:luma_msize_y=7:luma_amount=1.0";

pub const DELOGO_SHOW: i64 = 0;

pub const DUAL_OVERLAY_OPACITY: f64 = 1.0;

pub const CHROMAKEY_COLOR: &str = "green";
pub const COLORKEY_COLOR: &str = "black";
pub const KEY_SIMILARITY: f64 = 0.1;
pub const KEY_BLEND: f64 = 0.0;
pub const LUMAKEY_THRESHOLD: f64 = 0.5;

pub const CURVES: &str = "";
pub const LUT_FILE: &str = "";

pub const DRAWTEXT_TEXT: &str = "";
pub const DRAWTEXT_X: &str = "(w-text_w)/2";
pub const DRAWTEXT_Y: &str = "(h-text_h)/2";
pub const DRAWTEXT_FONTSIZE: i64 = 24;
pub const DRAWTEXT_FONTCOLOR: &str = "white";

/// Crossfade time used when a blend phase needs one that was not given
pub const BLEND_CROSSFADE: f64 = 0.0;
