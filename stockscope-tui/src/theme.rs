//! Dark and light theme tokens for the StockScope TUI.
//!
//! # Color Palette
//! - **Background**: base layer (charcoal in dark mode, off-white in light)
//! - **Accent**: focus, highlights, close price line
//! - **Positive**: up candles, Buy markers, gains
//! - **Negative**: down candles, Sell markers, losses
//! - **Warning**: skipped tickers, alerts
//! - **Neutral**: short MA line, secondary series
//! - **Muted**: hints, axis labels, disabled text

use ratatui::style::{Color, Modifier, Style};
use stockscope_core::signals::CrossoverKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    /// Line colors for multi-series charts, cycled in order.
    pub series: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(14, 17, 23),
            accent: Color::Rgb(0, 200, 255),
            positive: Color::Rgb(0, 220, 120),
            negative: Color::Rgb(255, 75, 95),
            warning: Color::Rgb(255, 170, 0),
            neutral: Color::Rgb(170, 130, 255),
            muted: Color::Rgb(110, 130, 160),
            text_primary: Color::Rgb(250, 250, 250),
            text_secondary: Color::Rgb(170, 170, 170),
            series: [
                Color::Rgb(0, 200, 255),
                Color::Rgb(255, 170, 0),
                Color::Rgb(170, 130, 255),
                Color::Rgb(0, 220, 120),
                Color::Rgb(255, 110, 200),
                Color::Rgb(230, 230, 90),
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            accent: Color::Rgb(0, 90, 200),
            positive: Color::Rgb(0, 140, 60),
            negative: Color::Rgb(200, 30, 50),
            warning: Color::Rgb(190, 100, 0),
            neutral: Color::Rgb(110, 60, 190),
            muted: Color::Rgb(110, 110, 120),
            text_primary: Color::Rgb(20, 20, 20),
            text_secondary: Color::Rgb(80, 80, 80),
            series: [
                Color::Rgb(0, 90, 200),
                Color::Rgb(190, 100, 0),
                Color::Rgb(110, 60, 190),
                Color::Rgb(0, 140, 60),
                Color::Rgb(190, 40, 140),
                Color::Rgb(120, 120, 0),
            ],
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn series_color(&self, i: usize) -> Color {
        self.series[i % self.series.len()]
    }

    /// Base style for a whole panel: text on background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn title(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused { self.accent } else { self.text_secondary });
        style.add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Color for a signed change (zero counts as a gain).
    pub fn change_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn crossover_color(&self, kind: CrossoverKind) -> Color {
        match kind {
            CrossoverKind::Buy => self.positive,
            CrossoverKind::Sell => self.negative,
        }
    }
}
