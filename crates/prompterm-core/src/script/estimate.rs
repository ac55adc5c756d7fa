//! Reading-time estimates
//!
//! Speed levels map to an approximate reading pace so the operator can
//! see how long a script runs before going live.

use serde::Serialize;

use crate::playback::Speed;

/// Words per minute at speed 1; each level adds [`WPM_STEP`]
const BASE_WPM: u32 = 60;
const WPM_STEP: u32 = 20;

/// Approximate reading pace for a speed level (60 wpm at 1 up to 240 at 10)
#[inline]
pub fn wpm_for_speed(speed: Speed) -> u32 {
    BASE_WPM + WPM_STEP * u32::from(speed.level() - 1)
}

/// Whitespace-separated word count
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationEstimate {
    pub words: usize,
    pub wpm: u32,
    pub minutes: u64,
    pub seconds: u64,
    pub total_seconds: u64,
    /// "45s" below a minute, "M:SS" otherwise
    pub formatted: String,
}

pub fn estimate_duration(text: &str, speed: Speed) -> DurationEstimate {
    let words = count_words(text);
    let wpm = wpm_for_speed(speed);
    let total_seconds = if words > 0 {
        (words as f64 / f64::from(wpm) * 60.0).round() as u64
    } else {
        0
    };
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    let formatted = if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    };

    DurationEstimate {
        words,
        wpm,
        minutes,
        seconds,
        total_seconds,
        formatted,
    }
}

/// Percentage of the scrollable range already passed, 0-100
pub fn calculate_progress(position: f64, content_height: f64, viewport_height: f64) -> f64 {
    if content_height <= viewport_height {
        return 0.0;
    }
    let max_scroll = content_height - viewport_height;
    (position / max_scroll * 100.0).clamp(0.0, 100.0)
}

/// Format seconds as "42s", "3:07" or "1:02:09"
pub fn format_time(total_seconds: f64) -> String {
    if total_seconds < 60.0 {
        return format!("{}s", total_seconds.round() as u64);
    }

    let minutes = (total_seconds / 60.0).floor() as u64;
    let seconds = (total_seconds % 60.0).round() as u64;

    if minutes < 60 {
        return format!("{}:{:02}", minutes, seconds);
    }

    let hours = minutes / 60;
    let remaining_minutes = minutes % 60;
    format!("{}:{:02}:{:02}", hours, remaining_minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_table() {
        assert_eq!(wpm_for_speed(Speed::new(1)), 60);
        assert_eq!(wpm_for_speed(Speed::new(5)), 140);
        assert_eq!(wpm_for_speed(Speed::new(10)), 240);
    }

    #[test]
    fn test_estimate_short_script() {
        let text = vec!["word"; 70].join(" ");
        let estimate = estimate_duration(&text, Speed::new(5));
        assert_eq!(estimate.words, 70);
        assert_eq!(estimate.wpm, 140);
        assert_eq!(estimate.total_seconds, 30);
        assert_eq!(estimate.formatted, "30s");
    }

    #[test]
    fn test_estimate_long_script() {
        let text = vec!["word"; 500].join("\n");
        let estimate = estimate_duration(&text, Speed::new(1));
        assert_eq!(estimate.total_seconds, 500);
        assert_eq!(estimate.minutes, 8);
        assert_eq!(estimate.seconds, 20);
        assert_eq!(estimate.formatted, "8:20");
    }

    #[test]
    fn test_estimate_empty() {
        let estimate = estimate_duration("   ", Speed::default());
        assert_eq!(estimate.words, 0);
        assert_eq!(estimate.formatted, "0s");
    }

    #[test]
    fn test_progress() {
        assert_eq!(calculate_progress(100.0, 500.0, 600.0), 0.0);
        assert_eq!(calculate_progress(200.0, 1000.0, 600.0), 50.0);
        assert_eq!(calculate_progress(9000.0, 1000.0, 600.0), 100.0);
        assert_eq!(calculate_progress(-5.0, 1000.0, 600.0), 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(42.0), "42s");
        assert_eq!(format_time(187.0), "3:07");
        assert_eq!(format_time(3729.0), "1:02:09");
    }
}
