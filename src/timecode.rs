/*!
 * Timecode conversions between seconds and textual timecodes.
 *
 * Two independent renderings are provided:
 * - clock timecodes (`HH:MM:SS,mmm`) with a configurable decimal separator
 * - frame timecodes (`HH:MM:SS:FF`) for a given frame rate
 *
 * Parsing is the inverse of those renderings and is driven by each format's
 * own grammar; the helpers here only combine already-captured fields.
 */

use log::warn;

/// Frame rate assumed when a frame-based format has none
pub const DEFAULT_FRAMERATE: f64 = 25.0;

/// Direction of a frame rate lookup, used for the defaulting diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerateUse {
    Import,
    Export,
}

impl FramerateUse {
    fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
        }
    }
}

/// Return the given frame rate or 25 fps, warning when defaulting.
///
/// Zero, negative and non-finite rates count as missing.
pub fn framerate_or_default(framerate: Option<f64>, usage: FramerateUse) -> f64 {
    match framerate {
        Some(fps) if fps.is_finite() && fps > 0.0 => fps,
        _ => {
            warn!(
                "No framerate specified for {}, assuming {} FPS.",
                usage.as_str(),
                DEFAULT_FRAMERATE
            );
            DEFAULT_FRAMERATE
        }
    }
}

/// Format seconds as `HH:MM:SS[sep]fff`.
///
/// The value is rounded to `decimal_places` first so that carries propagate
/// into seconds, minutes and hours. Hours are never clamped.
///
/// The separator is written when `decimal_places > 0` or a fraction remains.
/// Rounding happens first, so with zero places no fraction ever remains and
/// `61.6` becomes `00:01:02` rather than a separator with a digit after it.
pub fn seconds_to_clock(seconds: f64, decimal_separator: char, decimal_places: usize) -> String {
    let scale = 10u64.pow(decimal_places as u32);
    let total_units = (seconds.max(0.0) * scale as f64).round() as u64;

    let fraction = total_units % scale;
    let whole = total_units / scale;
    let (hours, minutes, secs) = split_hms(whole);

    let mut timestamp = format!("{:02}:{:02}:{:02}", hours, minutes, secs);
    if decimal_places > 0 || fraction != 0 {
        timestamp.push(decimal_separator);
        timestamp.push_str(&format!("{:0width$}", fraction, width = decimal_places));
    }
    timestamp
}

/// Format seconds as `HH:MM:SS[sep]FF` where `FF` is a frame count.
///
/// The leftover fraction of a second becomes `round(fraction * fps)`.
pub fn seconds_to_frame_clock(seconds: f64, fps: f64, separator: char) -> String {
    let seconds = seconds.max(0.0);
    let whole = seconds.floor();
    let frames = ((seconds - whole) * fps).round() as u64;
    let (hours, minutes, secs) = split_hms(whole as u64);

    format!(
        "{:02}:{:02}:{:02}{}{:02}",
        hours, minutes, secs, separator, frames
    )
}

/// Combine clock fields into seconds; `millis` is the digit string after the separator.
pub fn clock_to_seconds(hours: u64, minutes: u64, seconds: u64, millis: &str) -> f64 {
    let fraction = if millis.is_empty() {
        0.0
    } else {
        millis.parse::<f64>().unwrap_or(0.0) / 10f64.powi(millis.len() as i32)
    };
    (hours * 3600 + minutes * 60 + seconds) as f64 + fraction
}

/// Combine frame timecode fields into seconds at the given frame rate.
pub fn frame_clock_to_seconds(hours: u64, minutes: u64, seconds: u64, frames: u64, fps: f64) -> f64 {
    (hours * 3600 + minutes * 60 + seconds) as f64 + frames as f64 / fps
}

/// Convert a frame number to seconds.
pub fn frames_to_seconds(frames: u64, fps: f64) -> f64 {
    frames as f64 / fps
}

/// Convert seconds to the nearest frame number.
pub fn seconds_to_frames(seconds: f64, fps: f64) -> u64 {
    (seconds.max(0.0) * fps).round() as u64
}

fn split_hms(total_seconds: u64) -> (u64, u64, u64) {
    (
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60,
    )
}
