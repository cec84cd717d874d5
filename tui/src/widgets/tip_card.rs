//! TipCard Widget
//!
//! A borderless block that draws a [`Screen`]: the wrapped tip with its
//! coloured topic tag, the control hint and the status line.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use textwrap::wrap;

use tips_core::render::{control_hint, QUIT_HINT};
use tips_core::Screen;

use crate::theme;

/// Draws one [`Screen`]
pub struct TipCard<'a> {
    screen: &'a Screen,
}

impl<'a> TipCard<'a> {
    /// Card for `screen`
    #[must_use]
    pub fn new(screen: &'a Screen) -> Self {
        Self { screen }
    }

    /// Styled lines for a given width
    #[must_use]
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width.max(1));
        let mut lines = Vec::new();

        match self.screen {
            Screen::Terminated => return lines,
            Screen::Tip {
                topic,
                content,
                refresh_minutes,
                ..
            } => {
                let tag = format!("[{topic}]");
                let full = format!("{tag} {content}");
                for (i, row) in wrap(&full, width).into_iter().enumerate() {
                    if i == 0 && row.starts_with(&tag) {
                        let rest = row[tag.len()..].to_string();
                        lines.push(Line::from(vec![
                            Span::styled(tag.clone(), theme::topic_style()),
                            Span::styled(rest, theme::content_style()),
                        ]));
                    } else if i == 0 {
                        lines.push(Line::styled(row.into_owned(), theme::topic_style()));
                    } else {
                        lines.push(Line::styled(row.into_owned(), theme::content_style()));
                    }
                }
                lines.push(Line::default());
                lines.push(Line::styled(control_hint(*refresh_minutes), theme::hint_style()));
            }
            other => {
                if let Some(message) = other.message() {
                    for row in wrap(&message, width) {
                        lines.push(Line::styled(row.into_owned(), theme::content_style()));
                    }
                }
                if other.shows_quit_hint() {
                    lines.push(Line::default());
                    lines.push(Line::styled(QUIT_HINT, theme::hint_style()));
                }
            }
        }

        if let Some(status) = self.screen.status() {
            lines.push(Line::default());
            for row in wrap(status, width) {
                lines.push(Line::styled(row.into_owned(), theme::status_style()));
            }
        }

        lines
    }
}

impl Widget for TipCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (i, line) in self
            .lines(area.width)
            .iter()
            .take(usize::from(area.height))
            .enumerate()
        {
            // i < area.height, so it fits in u16
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Modifier;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    fn tip_screen(content: &str, status: Option<&str>) -> Screen {
        Screen::Tip {
            topic: "git".into(),
            content: content.into(),
            refresh_minutes: 60,
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_tip_lines() {
        let screen = tip_screen("a", None);
        let lines = TipCard::new(&screen).lines(80);

        assert_eq!(
            text(&lines),
            vec!["[git] a", "", "n:next | k:known | q:quit | refresh:60m"]
        );
        let tag = &lines[0].spans[0];
        assert_eq!(tag.content, "[git]");
        assert_eq!(tag.style.fg, Some(theme::TOPIC_CYAN));
        assert!(tag.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_tip_wraps_to_width() {
        let screen = tip_screen("one two three four five", None);
        let lines = TipCard::new(&screen).lines(12);

        assert_eq!(&text(&lines)[..3], ["[git] one", "two three", "four five"]);
    }

    #[test]
    fn test_status_is_last_and_yellow() {
        let screen = tip_screen("a", Some("Tip marked as known!"));
        let lines = TipCard::new(&screen).lines(80);

        let last = lines.last().unwrap();
        assert_eq!(last.to_string(), "Tip marked as known!");
        assert_eq!(last.style.fg, Some(theme::STATUS_YELLOW));
    }

    #[test]
    fn test_message_screen_has_quit_hint() {
        let screen = Screen::NoTipsAvailable { status: None };
        let lines = TipCard::new(&screen).lines(80);

        assert_eq!(text(&lines), vec!["No tips available!", "", QUIT_HINT]);
    }

    #[test]
    fn test_terminated_draws_nothing() {
        assert!(TipCard::new(&Screen::Terminated).lines(80).is_empty());
    }

    #[test]
    fn test_render_into_buffer() {
        let screen = tip_screen("a", None);
        let area = Rect::new(0, 0, 40, 2);
        let mut buf = Buffer::empty(area);

        TipCard::new(&screen).render(area, &mut buf);

        let first: String = (0..7u16).map(|x| buf[(x, 0u16)].symbol().to_string()).collect();
        assert_eq!(first, "[git] a");
    }
}
