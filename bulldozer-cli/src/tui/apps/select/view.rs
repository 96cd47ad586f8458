//! Rendering for the select step

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::preview::{PreviewCoordinator, PreviewState};
use crate::session::PreviewTable;
use crate::tui::renderer::InteractionRegistry;
use crate::tui::state::Theme;
use crate::tui::widgets::{display_width, truncate_to_width};

use super::msg::Msg;
use super::state::State;

const LIST_WIDTH: u16 = 34;
const MAX_COLUMN_WIDTH: usize = 28;
const CHECKBOX_WIDTH: u16 = 3;

pub fn render(state: &mut State, frame: &mut Frame, area: Rect, registry: &mut InteractionRegistry<Msg>) {
    let theme = &crate::global_runtime_config().theme;

    let Some(preview) = state.preview.as_ref().filter(|_| !state.registry.is_empty()) else {
        render_no_data(frame, area, theme);
        return;
    };

    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Fill(1)]).areas(area);

    let preview_title = preview_title(state, preview);
    render_preview(frame, preview_area, preview, &preview_title, state.preview_column_offset, theme);
    render_node_list(state, frame, list_area, registry, theme);
}

fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_secondary));
    let message = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No data sources available",
            Style::default().fg(theme.accent_warning).bold(),
        )),
        Line::from(Span::styled(
            "Go back and choose a different source to migrate from.",
            Style::default().fg(theme.text_secondary),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(message, area);
}

fn render_node_list(
    state: &mut State,
    frame: &mut Frame,
    area: Rect,
    registry: &mut InteractionRegistry<Msg>,
    theme: &Theme,
) {
    let title = format!(
        " Data Sources ({}/{}) ",
        state.registry.checked_count(),
        state.registry.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    state.node_list.set_viewport_height(height);
    state.node_list.update_scroll(height, state.registry.len());

    let offset = state.node_list.scroll_offset();
    let highlighted = state.node_list.selected();
    let label_width = inner.width.saturating_sub(CHECKBOX_WIDTH + 1) as usize;

    for (row, (index, node)) in state
        .registry
        .list()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .enumerate()
    {
        let y = inner.y + row as u16;
        let row_area = Rect::new(inner.x, y, inner.width, 1);

        let checkbox = if node.checked { "[x]" } else { "[ ]" };
        let label_style = if node.checked {
            Style::default().fg(theme.accent_success)
        } else {
            Style::default().fg(theme.text_primary)
        };
        let row_style = if highlighted == Some(index) {
            Style::default().bg(theme.bg_surface)
        } else {
            Style::default()
        };

        let line = Line::from(vec![
            Span::styled(checkbox, Style::default().fg(theme.accent_primary)),
            Span::raw(" "),
            Span::styled(truncate_to_width(&node.label, label_width), label_style),
        ]);
        frame.render_widget(Paragraph::new(line).style(row_style), row_area);

        let checkbox_area = Rect::new(inner.x, y, CHECKBOX_WIDTH.min(inner.width), 1);
        let label_area = Rect::new(
            inner.x + CHECKBOX_WIDTH + 1,
            y,
            inner.width.saturating_sub(CHECKBOX_WIDTH + 1),
            1,
        );
        registry.register_click(checkbox_area, Msg::CheckboxClicked(node.id.clone()));
        registry.register_click(label_area, Msg::LabelClicked(node.id.clone()));
    }
}

fn preview_title(state: &State, preview: &PreviewCoordinator) -> String {
    let label_of = |id: &str| {
        state
            .registry
            .get(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let shown = preview.pane().node_id().map(label_of);
    match (preview.state(), shown) {
        (PreviewState::Loading { node_id }, _) => format!(" Preview: {} (loading...) ", label_of(node_id)),
        (_, Some(label)) => format!(" Preview: {} ", label),
        (_, None) => " Preview ".to_string(),
    }
}

fn render_preview(
    frame: &mut Frame,
    area: Rect,
    preview: &PreviewCoordinator,
    title: &str,
    column_offset: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pane = preview.pane();
    if let Some(table) = pane.visible_table() {
        render_table(frame, inner, table, column_offset, theme);
        return;
    }

    let lines = if pane.is_empty_state_visible() {
        let mut lines = vec![Line::from(Span::styled(
            "No data to preview for this source",
            Style::default().fg(theme.accent_warning),
        ))];
        if let PreviewState::Failed { reason: Some(reason), .. } = preview.state() {
            lines.push(Line::from(Span::styled(
                reason.clone(),
                Style::default().fg(theme.accent_error),
            )));
        }
        lines
    } else if preview.is_loading() {
        vec![Line::from(Span::styled(
            "Loading preview...",
            Style::default().fg(theme.text_secondary),
        ))]
    } else {
        vec![Line::from(Span::styled(
            "Select a data source to preview it",
            Style::default().fg(theme.text_tertiary),
        ))]
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_table(frame: &mut Frame, area: Rect, table: &PreviewTable, column_offset: usize, theme: &Theme) {
    let offset = column_offset.min(table.column_count().saturating_sub(1));
    let columns: Vec<usize> = (offset..table.column_count()).collect();

    let widths: Vec<usize> = columns
        .iter()
        .map(|&c| {
            let header = display_width(&table.columns[c]);
            let cells = (0..table.row_count())
                .map(|r| display_width(table.cell(r, c)))
                .max()
                .unwrap_or(0);
            header.max(cells).clamp(1, MAX_COLUMN_WIDTH)
        })
        .collect();

    let header = Row::new(
        columns
            .iter()
            .zip(&widths)
            .map(|(&c, &w)| Cell::from(truncate_to_width(&table.columns[c], w))),
    )
    .style(Style::default().fg(theme.accent_primary).bold());

    let rows = (0..table.row_count()).map(|r| {
        Row::new(
            columns
                .iter()
                .zip(&widths)
                .map(|(&c, &w)| Cell::from(truncate_to_width(table.cell(r, c), w))),
        )
        .style(Style::default().fg(theme.text_primary))
    });

    let constraints: Vec<Constraint> = widths.iter().map(|&w| Constraint::Length(w as u16)).collect();

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(Table::new(rows, constraints).header(header).column_spacing(2), table_area);

    let footer = format!(
        "{} rows, columns {}-{} of {}",
        table.row_count(),
        offset + 1,
        table.column_count(),
        table.column_count()
    );
    frame.render_widget(
        Paragraph::new(Span::styled(footer, Style::default().fg(theme.text_tertiary))),
        footer_area,
    );
}
