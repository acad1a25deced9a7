//! Recently watched side panel

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::history::{RecentPanel, RecentRow};
use crate::ui::Theme;

/// Each row takes a title line and a date line
pub const ROW_HEIGHT: u16 = 2;

fn block(count: usize, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" ⏱ RECENT ({}) ", count), Theme::title()))
}

/// Inner area of the panel (borders excluded)
pub fn inner(area: Rect) -> Rect {
    block(0, false).inner(area)
}

/// Index of the first row drawn so `selected` stays visible
pub fn first_visible(selected: usize, inner: Rect) -> usize {
    let visible = (inner.height / ROW_HEIGHT).max(1) as usize;
    selected.saturating_sub(visible - 1)
}

/// Row under a click, if any
pub fn hit_test(area: Rect, len: usize, selected: usize, column: u16, row: u16) -> Option<usize> {
    let inner = inner(area);
    if !inner.contains(Position::new(column, row)) {
        return None;
    }
    let index = first_visible(selected, inner) + ((row - inner.y) / ROW_HEIGHT) as usize;
    (index < len).then_some(index)
}

fn row_item(row: &RecentRow, is_selected: bool) -> ListItem<'static> {
    let marker = if is_selected { "▸ " } else { "  " };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
            Span::styled(
                row.title.clone(),
                if is_selected {
                    Theme::list_item_selected()
                } else {
                    Theme::list_item()
                },
            ),
        ]),
        Line::from(Span::styled(format!("  {}", row.subtitle), Theme::year())),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, panel: &RecentPanel, selected: usize, focused: bool) {
    let block = block(panel.len(), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match panel {
        RecentPanel::Empty(message) => {
            let empty = Paragraph::new(*message)
                .style(Theme::dimmed())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, inner);
        }
        RecentPanel::Rows(rows) => {
            let items: Vec<ListItem> = rows
                .iter()
                .enumerate()
                .skip(first_visible(selected, inner))
                .map(|(i, row)| row_item(row, i == selected))
                .collect();
            frame.render_widget(List::new(items).style(Theme::text()), inner);
        }
    }
}
