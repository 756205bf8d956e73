use std::fmt::Write;

use weather_core::{SearchState, icon_url, weather_icon_url};

/// Human-readable rendering of a settled search state.
pub fn format_state(state: &SearchState) -> String {
    let mut out = String::new();

    if let Some(message) = &state.error {
        let _ = writeln!(out, "error: {message}");
        return out;
    }

    let Some(reading) = &state.reading else {
        return out;
    };

    let temp_unit = if reading.units == "metric" { "°C" } else { "°" };
    let wind_unit = if reading.units == "metric" { "m/s" } else { "" };

    let _ = writeln!(out, "{}", reading.location);
    let _ = writeln!(out, "  {:.1}{temp_unit}  {}", reading.temperature, reading.description);
    let _ = writeln!(out, "  humidity {}%  wind {} {wind_unit}", reading.humidity, reading.wind_speed);
    let _ = writeln!(out, "  icon {}", weather_icon_url(&reading.description));
    if let Some(updated) = &state.last_updated {
        let _ = writeln!(out, "  updated {updated}");
    }

    if !state.forecast.is_empty() {
        let _ = writeln!(out, "forecast:");
        for day in &state.forecast {
            let _ = writeln!(
                out,
                "  {:<9} {}  {:>3}{temp_unit}  {}  {}",
                day.day,
                day.date.format("%b %-d"),
                day.temperature,
                day.description,
                icon_url(&day.icon),
            );
        }
    }

    out
}

/// Tracks what was last printed so only settled, changed states are shown.
#[derive(Debug, Default)]
pub struct SettledPrinter {
    last: String,
}

impl SettledPrinter {
    /// Text to print for `state`, or `None` while loading or when nothing
    /// visible changed (input edits also notify).
    pub fn next(&mut self, state: &SearchState) -> Option<String> {
        if state.loading {
            return None;
        }

        let out = format_state(state);
        if out == self.last {
            return None;
        }
        self.last = out.clone();
        Some(out)
    }
}
