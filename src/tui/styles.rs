//! Medical-themed color palette and styles.
//!
//! Result colors (mortality status and gauge bands) come from the domain so
//! the card and the gauge legend always agree.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{GaugeBand, MortalityStatus};

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color (trust, medical)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    /// Light slate for borders
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Result Colors ===

    /// Rose - Errors
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    // === Background Colors ===

    /// Gauge track background
    pub const BG_SURFACE: Color = Color::Rgb(30, 41, 59); // #1E293B

    // === Text Colors ===

    /// Primary text (white)
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    /// Secondary text (gray)
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for danger/error messages
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Style for focused borders
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the header
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for the choice currently shown in a selector field
    #[must_use]
    pub fn choice() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Mortality status style (green for Alive, red for Dead)
    #[must_use]
    pub fn mortality(status: MortalityStatus) -> Style {
        Style::default()
            .fg(rgb(status.color()))
            .add_modifier(Modifier::BOLD)
    }

    /// Survival gauge style for a band
    #[must_use]
    pub fn gauge_band(band: GaugeBand) -> Style {
        Style::default().fg(rgb(band.color())).bg(Self::BG_SURFACE)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Inline logo for the header
pub const LOGO_SMALL: &str = "Oncosurv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_styles_follow_domain_colors() {
        assert_eq!(
            MedicalTheme::mortality(MortalityStatus::Alive).fg,
            Some(Color::Rgb(40, 167, 69))
        );
        assert_eq!(
            MedicalTheme::mortality(MortalityStatus::Dead).fg,
            Some(Color::Rgb(220, 53, 69))
        );
        for band in [GaugeBand::Low, GaugeBand::Mid, GaugeBand::High] {
            let style = MedicalTheme::gauge_band(band);
            assert_eq!(style.fg, Some(rgb(band.color())));
            assert_eq!(style.bg, Some(MedicalTheme::BG_SURFACE));
        }
    }
}
