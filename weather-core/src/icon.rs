//! Description to icon mapping for current conditions.

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const DEFAULT_ICON: &str = "01d";

const ICONS: &[(&str, &str)] = &[
    ("clear sky", "01d"),
    ("few clouds", "02d"),
    ("scattered clouds", "03d"),
    ("broken clouds", "04d"),
    ("shower rain", "09d"),
    ("rain", "10d"),
    ("thunderstorm", "11d"),
    ("snow", "13d"),
    ("mist", "50d"),
];

/// Icon code for a description, case-insensitive. Unknown descriptions get the
/// clear sky icon.
pub fn icon_code(description: &str) -> &'static str {
    let lower = description.to_lowercase();

    ICONS
        .iter()
        .find(|(known, _)| *known == lower)
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_ICON)
}

pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE_URL}/{code}@2x.png")
}

pub fn weather_icon_url(description: &str) -> String {
    icon_url(icon_code(description))
}
