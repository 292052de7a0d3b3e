//! Color theme: built-in palettes and the `theme.conf` key=value file.
use ratatui::style::Color;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
    pub accent: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::Red,
            accent: Color::Green,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            accent: Color::Rgb(0xa6, 0xe3, 0xa1),       // green
        }
    }

    fn slots(&self) -> [(&'static str, Color); 12] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("error_fg", self.error_fg),
            ("accent", self.accent),
        ]
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error_fg" => &mut self.error_fg,
            "accent" => &mut self.accent,
            _ => return None,
        })
    }

    /// Load a theme file. Keys that are missing or unparsable keep their `mocha` value.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for (key, val) in super::config::key_values(&contents) {
            if let (Some(slot), Some(color)) = (theme.slot_mut(key), parse_color(val)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# crude-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        for (key, color) in self.slots() {
            let _ = writeln!(&mut buf, "{key} = {}", color_to_str(color));
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the default theme there and return it.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = super::config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        let _ = theme.write_file(path);
        theme
    }
}

/// Parse "#RRGGBB", "RRGGBB" or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    let (r, g, b) = match c {
        Color::Reset => return "reset".to_string(),
        Color::Rgb(r, g, b) => (r, g, b),
        // named colors get a best-effort hex approximation
        Color::Black => (0x00, 0x00, 0x00),
        Color::Red => (0xFF, 0x00, 0x00),
        Color::Green => (0x00, 0xFF, 0x00),
        Color::Yellow => (0xFF, 0xFF, 0x00),
        Color::Blue => (0x00, 0x00, 0xFF),
        Color::Magenta => (0xFF, 0x00, 0xFF),
        Color::Cyan => (0x00, 0xFF, 0xFF),
        Color::Gray => (0xB3, 0xB3, 0xB3),
        Color::DarkGray => (0x4D, 0x4D, 0x4D),
        Color::LightRed => (0xFF, 0x66, 0x66),
        Color::LightGreen => (0x66, 0xFF, 0x66),
        Color::LightYellow => (0xFF, 0xFF, 0x66),
        Color::LightBlue => (0x66, 0x66, 0xFF),
        Color::LightMagenta => (0xFF, 0x66, 0xFF),
        Color::LightCyan => (0x66, 0xFF, 0xFF),
        Color::White => (0xFF, 0xFF, 0xFF),
        Color::Indexed(_) => return "reset".to_string(),
    };
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_reset() {
        assert_eq!(parse_color("#FF0080"), Some(Color::Rgb(0xff, 0x00, 0x80)));
        assert_eq!(parse_color("ff0080"), Some(Color::Rgb(0xff, 0x00, 0x80)));
        assert_eq!(parse_color("Reset"), Some(Color::Reset));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("zzzzzz"), None);
    }

    #[test]
    fn named_colors_are_written_as_hex() {
        assert_eq!(color_to_str(Color::Gray), "#B3B3B3");
        assert_eq!(color_to_str(Color::Rgb(1, 2, 3)), "#010203");
    }
}
