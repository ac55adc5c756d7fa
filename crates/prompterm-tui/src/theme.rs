use prompterm_core::config::ThemeName;
use ratatui::style::Color;
use tracing::warn;

/// Chrome colors; the prompter pane uses the configured text/background colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg1: Color,
    pub fg0: Color,
    pub grey: Color,
    pub border: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(ThemeName::default())
    }
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                bg0: Color::Rgb(0x28, 0x28, 0x28),
                bg1: Color::Rgb(0x32, 0x30, 0x2f),
                fg0: Color::Rgb(0xd4, 0xbe, 0x98),
                grey: Color::Rgb(0x92, 0x83, 0x74),
                border: Color::Rgb(0x50, 0x49, 0x45),
                accent: Color::Rgb(0x7d, 0xae, 0xa3),
                success: Color::Rgb(0xa9, 0xb6, 0x65),
                warning: Color::Rgb(0xe7, 0x8a, 0x4e),
            },
            ThemeName::Light => Self {
                bg0: Color::Rgb(0xfb, 0xf1, 0xc7),
                bg1: Color::Rgb(0xf2, 0xe5, 0xbc),
                fg0: Color::Rgb(0x65, 0x47, 0x35),
                grey: Color::Rgb(0x92, 0x83, 0x74),
                border: Color::Rgb(0xd5, 0xc4, 0xa1),
                accent: Color::Rgb(0x45, 0x70, 0x7a),
                success: Color::Rgb(0x6c, 0x78, 0x2e),
                warning: Color::Rgb(0xc3, 0x5e, 0x0a),
            },
            ThemeName::HighContrast => Self {
                bg0: Color::Black,
                bg1: Color::Black,
                fg0: Color::White,
                grey: Color::Gray,
                border: Color::White,
                accent: Color::Cyan,
                success: Color::Green,
                warning: Color::Yellow,
            },
        }
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        // Full form: RRGGBB
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Parse a configured color, falling back when it is malformed
pub fn color_or(value: &str, fallback: Color) -> Color {
    parse_hex_color(value).unwrap_or_else(|| {
        warn!("Invalid color '{}', using theme default", value);
        fallback
    })
}
