use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Member, Timeframe, UiConfig};
use crate::projection::spatial::CardStyle;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub connector: Color,
    pub weekend: Color,
    pub today_bg: Color,
    pub event_high: Color,
    pub event_low: Color,
    /// Per-member colors, keyed by member code
    pub member_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut member_colors = HashMap::new();
        member_colors.insert("p".into(), Color::Rgb(0x44, 0x88, 0xFF));
        member_colors.insert("m".into(), Color::Rgb(0xFF, 0x66, 0xAA));
        member_colors.insert("a".into(), Color::Rgb(0x44, 0xDD, 0x88));
        member_colors.insert("b".into(), Color::Rgb(0xFF, 0x99, 0x33));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            connector: Color::Rgb(0x7D, 0x78, 0xBF),
            weekend: Color::Rgb(0xFF, 0x88, 0x88),
            today_bg: Color::Rgb(0x44, 0x44, 0x44),
            event_high: Color::Rgb(0x2E, 0xCC, 0x71),
            event_low: Color::Rgb(0xF3, 0x9C, 0x12),
            member_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the board's UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "connector" => theme.connector = color,
                "weekend" => theme.weekend = color,
                "today_bg" => theme.today_bg = color,
                "event_high" => theme.event_high = color,
                "event_low" => theme.event_low = color,
                _ => {}
            }
        }

        for (code, value) in &ui.member_colors {
            if Member::from_code(code).is_none() {
                continue;
            }
            if let Some(color) = parse_hex_color(value) {
                theme.member_colors.insert(code.clone(), color);
            }
        }

        theme
    }

    /// Color for a family member, falling back to text color
    pub fn member_color(&self, member: Member) -> Color {
        self.member_colors
            .get(member.code())
            .copied()
            .unwrap_or(self.text)
    }

    /// Border color for a card; selection wins, then bottleneck, then goal tier
    pub fn card_border(&self, style: CardStyle, selected: bool) -> Color {
        if selected {
            return self.selection_border;
        }
        match style {
            CardStyle::Bottleneck => self.red,
            CardStyle::Goal(Timeframe::Year) => self.yellow,
            CardStyle::Goal(Timeframe::Month) => self.purple,
            CardStyle::Goal(Timeframe::Week) => self.cyan,
            CardStyle::Plain => self.dim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#2ECC71"), Some(Color::Rgb(0x2E, 0xCC, 0x71)));
        for bad in ["2ECC71", "#2ECC", "#2ECC7G", ""] {
            assert_eq!(parse_hex_color(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_default_theme_colors_every_member() {
        let theme = Theme::default();
        for member in Member::ALL {
            assert_ne!(theme.member_color(member), theme.text);
        }
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.member_colors.insert("m".into(), "#112233".into());
        ui.member_colors.insert("zz".into(), "#445566".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.member_color(Member::Mama), Color::Rgb(0x11, 0x22, 0x33));
        assert!(!theme.member_colors.contains_key("zz"));
        // Unchanged defaults still present
        assert_eq!(theme.text, Color::Rgb(0xB0, 0xAA, 0xFF));
    }

    #[test]
    fn test_card_border_precedence() {
        let theme = Theme::default();
        assert_eq!(theme.card_border(CardStyle::Bottleneck, false), theme.red);
        assert_eq!(
            theme.card_border(CardStyle::Bottleneck, true),
            theme.selection_border
        );
        assert_eq!(theme.card_border(CardStyle::Plain, false), theme.dim);
    }
}
