//! Theme and Colors
//!
//! The palette is deliberately small: the tip is the only thing on screen.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Tip Colors
// ============================================================================

/// Topic tag - cyan, bold
pub const TOPIC_CYAN: Color = Color::Rgb(0, 255, 255);

/// Tip content
pub const CONTENT_WHITE: Color = Color::Rgb(255, 255, 255);

/// Key binding hint and secondary text
pub const HINT_GRAY: Color = Color::Rgb(128, 128, 128);

/// Status line (confirmations and errors)
pub const STATUS_YELLOW: Color = Color::Rgb(255, 255, 0);

// ============================================================================
// Styles
// ============================================================================

/// `[topic]` tag
#[must_use]
pub fn topic_style() -> Style {
    Style::default().fg(TOPIC_CYAN).add_modifier(Modifier::BOLD)
}

/// Tip body and headline messages
#[must_use]
pub fn content_style() -> Style {
    Style::default().fg(CONTENT_WHITE)
}

/// Control hint
#[must_use]
pub fn hint_style() -> Style {
    Style::default().fg(HINT_GRAY)
}

/// Status line
#[must_use]
pub fn status_style() -> Style {
    Style::default().fg(STATUS_YELLOW)
}
