use super::state::{AppState, FormField, Mode, Tab};
use cashbook::models::transaction::TransactionType;
use cashbook::operations::summary::DashboardSummary;
use chrono::{Datelike, NaiveDate};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Stylize,
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Points},
    widgets::{Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const INCOME_COLOR: Color = Color::Green;
const EXPENSE_COLOR: Color = Color::Red;
const NO_DATA: &str = "No Data Available";

pub fn draw(frame: &mut ratatui::Frame, state: &mut AppState) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(3)])
        .split(size);

    render_tabs(frame, layout[0], state);
    match state.tab {
        Tab::Transactions => render_table(frame, layout[1], state),
        Tab::Dashboard => render_dashboard(frame, layout[1], &state.summary),
    }
    render_footer(frame, layout[2], state);

    match state.mode {
        Mode::Form => render_form_modal(frame, size, state),
        Mode::ConfirmDelete(id) => render_confirm_modal(frame, size, id),
        Mode::List => {}
    }
}

fn type_color(transaction_type: TransactionType) -> Color {
    match transaction_type {
        TransactionType::Income => INCOME_COLOR,
        TransactionType::Expense => EXPENSE_COLOR,
    }
}

fn render_tabs(frame: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let tabs = Tabs::new(Tab::TITLES)
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL).title("Personal Finance"))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let line = match (&state.status, state.mode) {
        (Some(status), Mode::List) => {
            let color = if status.is_error { Color::Red } else { Color::Green };
            Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
        }
        _ => Line::from(match state.mode {
            Mode::List => match state.tab {
                Tab::Transactions => "a add  e/Enter edit  d delete  ↑/↓ move  Tab dashboard  r refresh  q/Esc exit",
                Tab::Dashboard => "a add  Tab transactions  r refresh  q/Esc exit",
            },
            Mode::Form => "Tab/↑/↓ field  ←/→/Space type  Enter save  Esc cancel",
            Mode::ConfirmDelete(_) => "y/Enter delete  n/Esc keep",
        }),
    };

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Left).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_table(frame: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    let block = Block::default().title("Transactions").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new([
        Cell::from("ID").style(Style::default().bold()),
        Cell::from("Type").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let rows = state.transactions.iter().map(|tx| {
        let mut desc = tx.description.clone();
        if desc.chars().count() > 42 {
            desc = desc.chars().take(39).collect();
            desc.push_str("...");
        }

        Row::new([
            Cell::from(tx.id.to_string()),
            Cell::from(tx.transaction_type.as_str()).style(Style::default().fg(type_color(tx.transaction_type))),
            Cell::from(format!("{:.2}", tx.amount)),
            Cell::from(tx.formatted_date()),
            Cell::from(desc),
        ])
    });

    // Leave room for the header row.
    state.last_page_size = inner.height.saturating_sub(2).max(1) as usize;

    let widths = [
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut state.table_state);

    if state.transactions.is_empty() {
        let empty = Paragraph::new("No transactions yet. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_dashboard(frame: &mut ratatui::Frame, area: Rect, summary: &DashboardSummary) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[0]);

    render_pie_chart(frame, charts[0], summary);
    render_cash_flow_chart(frame, charts[1], summary);

    let balance = Paragraph::new(Line::from(Span::styled(
        summary.balance_label(),
        Style::default().fg(Color::White).bold(),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(balance, layout[1]);
}

fn render_no_data(frame: &mut ratatui::Frame, area: Rect) {
    let empty = Paragraph::new(NO_DATA)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(empty, area);
}

fn render_pie_chart(frame: &mut ratatui::Frame, area: Rect, summary: &DashboardSummary) {
    let block = Block::default().title("Income vs Expense").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if summary.shares.is_empty() {
        render_no_data(frame, inner);
        return;
    }

    // Start at 12 o'clock and sweep each share in order.
    let mut slices = Vec::new();
    let mut start_angle = std::f64::consts::FRAC_PI_2;
    for (transaction_type, percent) in &summary.shares {
        let sweep = percent / 100.0 * std::f64::consts::TAU;
        slices.push((start_angle, start_angle + sweep, *transaction_type, *percent));
        start_angle += sweep;
    }

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            let step = 0.04;
            for (start, end, transaction_type, _) in &slices {
                let mut points = Vec::new();
                let mut r = 0.0;
                while r <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += step;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color: type_color(*transaction_type),
                    });
                }
            }
            ctx.layer();
            for (start, end, transaction_type, percent) in &slices {
                let mid = (start + end) / 2.0;
                ctx.print(
                    0.55 * mid.cos() - 0.2,
                    0.55 * mid.sin(),
                    Line::from(format!("{transaction_type} {percent:.1}%")).fg(Color::White).bold(),
                );
            }
        });

    frame.render_widget(canvas, inner);
}

fn day_number(date: &NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn to_points(points: &[(NaiveDate, Decimal)]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|(date, amount)| (day_number(date), amount.to_f64().unwrap_or(0.0)))
        .collect()
}

fn render_cash_flow_chart(frame: &mut ratatui::Frame, area: Rect, summary: &DashboardSummary) {
    let block = Block::default().title("Cash Flow Over Time").borders(Borders::ALL);

    let Some((first, last)) = summary.series.date_bounds() else {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_no_data(frame, inner);
        return;
    };

    let income = to_points(&summary.series.income);
    let expense = to_points(&summary.series.expense);

    let (mut min_x, mut max_x) = (day_number(&first), day_number(&last));
    if min_x == max_x {
        min_x -= 1.0;
        max_x += 1.0;
    }
    let max_y = summary.series.max_amount().to_f64().unwrap_or(0.0).max(1.0) * 1.1;

    let datasets = vec![
        Dataset::default()
            .name("Income")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(INCOME_COLOR))
            .data(&income),
        Dataset::default()
            .name("Expense")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(EXPENSE_COLOR))
            .data(&expense),
    ];

    let middle = first + (last - first) / 2;
    let x_labels = if first == last {
        vec![first.format("%d-%m-%Y").to_string()]
    } else {
        vec![
            first.format("%d-%m-%Y").to_string(),
            middle.format("%d-%m-%Y").to_string(),
            last.format("%d-%m-%Y").to_string(),
        ]
    };

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds([min_x, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Amount ($)")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_y])
                .labels(vec![
                    "0".to_string(),
                    format!("{:.0}", max_y / 2.0),
                    format!("{:.0}", max_y),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_form_modal(frame: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(70, 50, area);
    frame.render_widget(Clear, popup_area);

    let form = &state.form;
    let title = match form.editing_id {
        Some(id) => format!("Edit Transaction {id}"),
        None => "Add Transaction".to_string(),
    };

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = field == form.focus;
        let value_style = if focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let value = match field {
            FormField::Type => {
                let color = type_color(form.transaction_type);
                Span::styled(format!("◀ {} ▶", form.value(field)), value_style.fg(color))
            }
            _ if focused => Span::styled(format!("{}_", form.value(field)), value_style),
            _ => Span::styled(form.value(field).to_string(), value_style),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:20}", field.label()), Style::default().fg(Color::Cyan)),
            value,
        ]));
        lines.push(Line::from(""));
    }

    if let Some(ref err) = form.error {
        lines.push(Line::from(vec![Span::styled(err.as_str(), Style::default().fg(Color::Red))]));
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

fn render_confirm_modal(frame: &mut ratatui::Frame, area: Rect, id: i64) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(format!("Delete transaction {id}? This cannot be undone.")),
        Line::from(""),
        Line::from(Span::styled("y/Enter delete, n/Esc keep", Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Confirm Delete"))
            .alignment(Alignment::Center),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
