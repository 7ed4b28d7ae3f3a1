use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub table_header_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub statusbar_bg: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub gauge_unfilled: Color,
    /// Gauge fill for low, medium and high utilization.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Rgb(137, 180, 250),
            header_accent_fg: Color::Rgb(17, 17, 27),
            overlay_border: Color::Rgb(88, 91, 112),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(147, 153, 178),
            table_header_fg: Color::Rgb(249, 226, 175),
            selection_bg: Color::Rgb(69, 71, 90),
            selection_fg: Color::Rgb(205, 214, 244),
            statusbar_bg: Color::Rgb(24, 24, 37),
            pill_key_bg: Color::Rgb(137, 180, 250),
            pill_key_fg: Color::Rgb(17, 17, 27),
            pill_desc_fg: Color::Rgb(166, 173, 200),
            gauge_unfilled: Color::Rgb(49, 50, 68),
            heat_colors: [
                Color::Rgb(45, 90, 39),
                Color::Rgb(181, 137, 10),
                Color::Rgb(161, 46, 46),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Rgb(30, 102, 245),
            header_accent_fg: Color::Rgb(239, 241, 245),
            overlay_border: Color::Rgb(156, 160, 176),
            text_primary: Color::Rgb(76, 79, 105),
            text_secondary: Color::Rgb(108, 111, 133),
            table_header_fg: Color::Rgb(223, 142, 29),
            selection_bg: Color::Rgb(204, 208, 218),
            selection_fg: Color::Rgb(76, 79, 105),
            statusbar_bg: Color::Rgb(230, 233, 239),
            pill_key_bg: Color::Rgb(30, 102, 245),
            pill_key_fg: Color::Rgb(239, 241, 245),
            pill_desc_fg: Color::Rgb(92, 95, 119),
            gauge_unfilled: Color::Rgb(220, 224, 232),
            heat_colors: [
                Color::Rgb(64, 160, 43),
                Color::Rgb(223, 142, 29),
                Color::Rgb(210, 15, 57),
            ],
        }
    }

    /// Fill color for a utilization fraction.
    pub fn heat_color(&self, fraction: f64) -> Color {
        if fraction >= 0.8 {
            self.heat_colors[2]
        } else if fraction >= 0.5 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }
}
