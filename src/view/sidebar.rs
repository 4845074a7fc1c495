//! Sidebar listing books that could not be placed on the timeline.

use crate::model::Book;
use crate::view::helpers::truncate;
use crate::view::styles::TimelineStyles;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// "No historical era" panel.
pub struct NeedsEraSidebar<'a> {
    books: Vec<&'a Book>,
    styles: TimelineStyles,
}

impl<'a> NeedsEraSidebar<'a> {
    /// Panel over the given books.
    pub fn new(books: impl IntoIterator<Item = &'a Book>) -> Self {
        Self {
            books: books.into_iter().collect(),
            styles: TimelineStyles::new(),
        }
    }

    /// Replace the colour scheme.
    pub fn styles(mut self, styles: TimelineStyles) -> Self {
        self.styles = styles;
        self
    }
}

impl Widget for NeedsEraSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" No historical era ")
            .title_style(self.styles.sidebar_title);
        let inner_width = usize::from(area.width.saturating_sub(2));

        let count = match self.books.len() {
            1 => "1 book".to_string(),
            n => format!("{n} books"),
        };
        let mut lines = vec![
            Line::from(Span::styled(count, self.styles.sidebar_dim)),
            Line::from(""),
        ];
        for book in &self.books {
            lines.push(Line::from(truncate(&book.title, inner_width).into_owned()));
            lines.push(Line::from(Span::styled(
                truncate(&book.author, inner_width).into_owned(),
                self.styles.sidebar_dim,
            )));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
