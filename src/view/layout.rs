//! Screen layout: optional sidebar, timeline and status bar.
//!
//! Pure layout logic. The area calculation is exposed separately so the event
//! loop can size the viewport before stacking cards.

use crate::model::Book;
use crate::timeline::{format_year, StackedBook};
use crate::view::constants::{SIDEBAR_WIDTH, STATUS_BAR_HEIGHT};
use crate::view::sidebar::NeedsEraSidebar;
use crate::view::state::ViewState;
use crate::view::styles::TimelineStyles;
use crate::view::timeline::TimelineView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

/// Everything one frame shows.
pub struct Screen<'a> {
    /// Scroll and zoom state.
    pub state: &'a ViewState,
    /// Stacked cards for the current zoom.
    pub cards: &'a [StackedBook<'a>],
    /// Books for the sidebar.
    pub needs_era: &'a [&'a Book],
    /// Colour scheme.
    pub styles: TimelineStyles,
}

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Sidebar, when shown.
    pub sidebar: Option<Rect>,
    /// Timeline.
    pub timeline: Rect,
    /// Status bar.
    pub status: Rect,
}

/// Split `area`. The sidebar is shown only when requested and non-empty.
pub fn calculate_areas(area: Rect, show_sidebar: bool) -> ScreenAreas {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);
    let content_area = vertical_chunks[0];
    let status_area = vertical_chunks[1];

    if !show_sidebar {
        return ScreenAreas {
            sidebar: None,
            timeline: content_area,
            status: status_area,
        };
    }

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(content_area);
    ScreenAreas {
        sidebar: Some(horizontal_chunks[0]),
        timeline: horizontal_chunks[1],
        status: status_area,
    }
}

/// Render the whole screen.
pub fn render_layout(frame: &mut Frame, screen: &Screen<'_>) {
    let show_sidebar = screen.state.sidebar_visible() && !screen.needs_era.is_empty();
    let areas = calculate_areas(frame.area(), show_sidebar);

    if let Some(sidebar_area) = areas.sidebar {
        frame.render_widget(
            NeedsEraSidebar::new(screen.needs_era.iter().copied()).styles(screen.styles),
            sidebar_area,
        );
    }

    frame.render_widget(
        TimelineView::new(screen.state, screen.cards).styles(screen.styles),
        areas.timeline,
    );

    let status = status_text(screen.state, screen.cards.len(), screen.needs_era.len());
    frame.render_widget(
        Paragraph::new(status).style(screen.styles.status),
        areas.status,
    );
}

/// Status bar line: zoom, visible years and library counts.
pub fn status_text(state: &ViewState, placed: usize, pending: usize) -> String {
    let pixels_per_year = state.pixels_per_year();
    let left = state.bounds().pixel_to_year(state.scroll_px(), pixels_per_year);
    let right = state
        .bounds()
        .pixel_to_year(state.scroll_px() + state.viewport_px(), pixels_per_year);
    format!(
        " {} · {} – {} · {placed} on timeline · {pending} without era · q quit",
        state.zoom(),
        format_year(left),
        format_year(right),
    )
}
