use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Tabs},
};

use crate::app::{App, FORM_LABELS, Tab, format_amount};

const BG: Color = Color::Rgb(20, 20, 25);
const BORDER: Color = Color::DarkGray;
const ACCENT: Color = Color::Rgb(99, 102, 241);

pub fn ui(f: &mut Frame, app: &App) {
    let base_style = Style::default().bg(BG).fg(Color::White);

    // Fill background
    let size = f.area();
    f.render_widget(Block::default().style(base_style), size);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + tabs
            Constraint::Min(10),   // Active tab
            Constraint::Length(7), // Activity log
        ])
        .split(size);

    render_header(f, app, main_layout[0]);
    match app.selected_tab {
        Tab::Tokens => render_token_list(f, app, main_layout[1]),
        Tab::AddToken => render_token_form(f, app, main_layout[1]),
    }
    render_logs(f, app, main_layout[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.selected_tab {
        Tab::Tokens => 0,
        Tab::AddToken => 1,
    };
    let tabs = Tabs::new(vec!["Tokens", "Add Token"])
        .select(selected)
        .highlight_style(Style::default().fg(Color::White).bg(ACCENT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER))
                .title("Token Management System"),
        );
    f.render_widget(tabs, area);
}

fn render_token_list(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pager
        ])
        .split(area);

    let search = Paragraph::new(Line::from(vec![
        Span::raw(app.search_input.as_str()),
        Span::styled("_", Style::default().fg(ACCENT)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER))
            .title("Search by name, owner or funding source"),
    );
    f.render_widget(search, chunks[0]);

    let view = app.page_view();

    let table_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title("Tokens");

    if view.items.is_empty() {
        let empty = Paragraph::new("No tokens found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(table_block);
        f.render_widget(empty, chunks[1]);
    } else {
        let rows: Vec<Row> = view
            .items
            .iter()
            .map(|t| {
                Row::new(vec![
                    t.owner.clone(),
                    t.token_name.clone(),
                    format_amount(t.balance),
                    t.funding_source.clone(),
                    format!("{}%", format_amount(t.fee)),
                    format_amount(t.liquidity),
                    format!("{}%", format_amount(t.supply_percent_added)),
                    t.timestamp
                        .with_timezone(&Local)
                        .format("%d/%m/%Y %H:%M:%S")
                        .to_string(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(15),
                Constraint::Percentage(12),
                Constraint::Percentage(11),
                Constraint::Percentage(15),
                Constraint::Percentage(7),
                Constraint::Percentage(11),
                Constraint::Percentage(9),
                Constraint::Percentage(20),
            ],
        )
        .header(
            Row::new(vec![
                "Owner",
                "Token Name",
                "Balance",
                "Funding Source",
                "Fee",
                "Liquidity",
                "Supply %",
                "Timestamp",
            ])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(table_block);
        f.render_widget(table, chunks[1]);
    }

    let pager = if view.total_matches == 0 {
        Line::from("")
    } else {
        Line::from(vec![
            Span::raw(format!(
                "Showing {} to {} of {} results",
                view.first_index, view.last_index, view.total_matches
            )),
            Span::styled(
                format!("   [<-] Page {} of {} [->]", view.page, view.total_pages),
                Style::default().fg(Color::Gray),
            ),
        ])
    };
    f.render_widget(Paragraph::new(pager), chunks[2]);
}

fn render_token_form(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::with_capacity(FORM_LABELS.len() * 2 + 2);
    for (i, label) in FORM_LABELS.iter().enumerate() {
        let focused = i == app.form.focused;
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::raw(format!("{:<18}", label)),
            Span::styled(app.form.values[i].clone(), value_style),
            Span::styled(if focused { "_" } else { "" }, Style::default().fg(ACCENT)),
        ]));
        lines.push(Line::from(""));
    }

    let submit_label = if app.submitting {
        "[ SAVING... ]"
    } else {
        "[ENTER TO SAVE TOKEN]"
    };
    lines.push(Line::from(vec![Span::styled(
        submit_label,
        Style::default().bg(Color::Green).fg(Color::Black),
    )]));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER))
            .title("Add New Token"),
    );
    f.render_widget(form, area);
}

fn render_logs(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.logs.len().saturating_sub(visible);
    let lines: Vec<Line> = app.logs[start..]
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();

    let logs = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER))
            .title("Activity  (Tab switch view, F5 refresh, Esc quit)"),
    );
    f.render_widget(logs, area);
}
