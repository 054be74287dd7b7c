use clap::ValueEnum;
use ratatui::style::Color;

/// Visual variants of the chat screen. Layout is identical, only colors change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Ocean,
    Slate,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Color,
    pub subtitle: Color,
    pub border: Color,
    pub input: Color,
    pub disabled: Color,
    pub accent: Color,
    pub response: Color,
    pub error: Color,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Ocean => Palette {
                title: Color::White,
                subtitle: Color::Gray,
                border: Color::LightBlue,
                input: Color::White,
                disabled: Color::DarkGray,
                accent: Color::Blue,
                response: Color::LightCyan,
                error: Color::LightRed,
            },
            Theme::Slate => Palette {
                title: Color::Gray,
                subtitle: Color::DarkGray,
                border: Color::Gray,
                input: Color::White,
                disabled: Color::DarkGray,
                accent: Color::Magenta,
                response: Color::White,
                error: Color::Red,
            },
            Theme::Mono => Palette {
                title: Color::White,
                subtitle: Color::White,
                border: Color::White,
                input: Color::White,
                disabled: Color::DarkGray,
                accent: Color::White,
                response: Color::White,
                error: Color::White,
            },
        }
    }
}
