//! Transcript and chrome styles, plus the named-color table used by the
//! `/ai` background handler.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    /// Overall background color painted behind every widget. The `/ai`
    /// handler mutates this after a confirmed instruction.
    pub background_color: Color,

    // Transcript line styles
    pub own_prefix_style: Style,
    pub own_text_style: Style,
    pub remote_prefix_style: Style,
    pub remote_text_style: Style,
    pub system_text_style: Style,
    pub error_text_style: Style,
    pub timestamp_style: Style,

    // Chrome
    pub title_style: Style,
    pub tab_style: Style,
    pub tab_selected_style: Style,
    pub status_style: Style,
    pub prompt_style: Style,
    pub input_border_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    /// The default phosphor-green terminal look.
    pub fn green_default() -> Self {
        let green = Color::Rgb(0, 255, 0);
        let dim_green = Color::Rgb(0, 136, 0);
        Theme {
            background_color: Color::Black,
            own_prefix_style: Style::default().fg(green).add_modifier(Modifier::BOLD),
            own_text_style: Style::default().fg(green),
            remote_prefix_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            remote_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(dim_green),
            error_text_style: Style::default().fg(Color::Red),
            timestamp_style: Style::default().fg(Color::DarkGray),
            title_style: Style::default().fg(green).add_modifier(Modifier::BOLD),
            tab_style: Style::default().fg(dim_green),
            tab_selected_style: Style::default().fg(green).add_modifier(Modifier::BOLD),
            status_style: Style::default().fg(dim_green),
            prompt_style: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            input_border_style: Style::default().fg(dim_green),
            input_text_style: Style::default().fg(green),
        }
    }

    pub fn dark() -> Self {
        Theme {
            background_color: Color::Black,
            own_prefix_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            own_text_style: Style::default().fg(Color::Cyan),
            remote_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            remote_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(Color::DarkGray),
            error_text_style: Style::default().fg(Color::Red),
            timestamp_style: Style::default().fg(Color::DarkGray),
            title_style: Style::default().fg(Color::Gray),
            tab_style: Style::default().fg(Color::DarkGray),
            tab_selected_style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            status_style: Style::default().fg(Color::Gray),
            prompt_style: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            input_border_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn find(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "green" => Some(Self::green_default()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::green_default()
    }
}

/// Resolve an alphabetic color word to a terminal color. The `/ai`
/// validator accepts any single alphabetic word; this table decides what
/// can actually be applied.
pub fn named_color(word: &str) -> Option<Color> {
    match word.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Rgb(170, 0, 0)),
        "green" => Some(Color::Rgb(0, 85, 0)),
        "yellow" => Some(Color::Rgb(128, 128, 0)),
        "blue" => Some(Color::Rgb(0, 0, 170)),
        "magenta" => Some(Color::Rgb(170, 0, 170)),
        "cyan" => Some(Color::Rgb(0, 100, 100)),
        "white" => Some(Color::Rgb(220, 220, 220)),
        "gray" | "grey" => Some(Color::Rgb(96, 96, 96)),
        "orange" => Some(Color::Rgb(190, 100, 0)),
        "purple" => Some(Color::Rgb(100, 0, 130)),
        "pink" => Some(Color::Rgb(190, 80, 140)),
        "teal" => Some(Color::Rgb(0, 110, 110)),
        "navy" => Some(Color::Rgb(0, 0, 96)),
        "maroon" => Some(Color::Rgb(96, 0, 0)),
        "olive" => Some(Color::Rgb(96, 96, 0)),
        "brown" => Some(Color::Rgb(120, 70, 20)),
        _ => None,
    }
}
