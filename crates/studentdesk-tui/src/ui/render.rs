use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use studentdesk_core::roster::{DeleteConfirm, Dialog, FormField, FormPhase, RecordForm, RosterView};
use studentdesk_core::utils::{format_birth_date, truncate};

use crate::app::{App, AppState};

use super::styles;

const FORM_WIDTH: u16 = 60;
const FORM_HEIGHT: u16 = 13;
const DELETE_WIDTH: u16 = 50;
const DELETE_HEIGHT: u16 = 9;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Search
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_search_bar(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match &app.roster.dialog {
        Dialog::Form(form) => render_form_overlay(frame, form),
        Dialog::ConfirmDelete(confirm) => render_delete_overlay(frame, confirm),
        Dialog::Closed => {}
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

/// Screen area covered by `dialog`, if one is open.
pub fn dialog_area(dialog: &Dialog, screen: Rect) -> Option<Rect> {
    match dialog {
        Dialog::Closed => None,
        Dialog::Form(_) => Some(centered_rect_fixed(FORM_WIDTH, FORM_HEIGHT, screen)),
        Dialog::ConfirmDelete(_) => Some(centered_rect_fixed(DELETE_WIDTH, DELETE_HEIGHT, screen)),
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Studentdesk";
    let store = format!("  {}", app.store_label);
    let help_hint = "[?] Help";
    let used = title.len() + store.chars().count() + help_hint.len() + 2;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(store, styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);
    let query = &app.roster.search_query;

    let line = if searching {
        Line::from(vec![
            Span::styled(" Search: ", styles::search_style()),
            Span::raw(query.as_str()),
            Span::styled("▌", styles::search_style()),
        ])
    } else if !query.is_empty() {
        Line::from(vec![
            Span::styled(" Search: ", styles::muted_style()),
            Span::raw(query.as_str()),
            Span::styled("  [Esc] clear", styles::muted_style()),
        ])
    } else {
        Line::from(Span::styled(" [/] Search by name or school", styles::muted_style()))
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Students ({}) ", app.roster.students.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(!app.roster.dialog.is_open()));

    let rows = match app.roster.view() {
        RosterView::Loading => {
            let text = Paragraph::new(Line::from(Span::styled(" Loading...", styles::muted_style())))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        RosterView::Empty => {
            let message = if app.roster.search_query.is_empty() {
                " No students. Press [a] to add one."
            } else {
                " No students match the search."
            };
            let text = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        RosterView::Populated(rows) => rows,
    };

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Full name"),
        Cell::from("Birth date"),
        Cell::from("School"),
    ])
    .style(styles::title_style())
    .height(1);

    let body: Vec<Row> = rows
        .iter()
        .map(|student| {
            Row::new(vec![
                Cell::from(format!("{:>5}", student.id_display())),
                Cell::from(student.full_name.clone()),
                Cell::from(format_birth_date(student.birth_date, app.date_style)),
                Cell::from(student.school_category.clone()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(6),      // ID
        Constraint::Percentage(40), // Full name
        Constraint::Length(12),     // Birth date
        Constraint::Fill(1),        // School
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.roster.cursor));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[a]dd [e]dit [d]elete [u]pdate [q]uit";

    let (left_text, left_style) = match &app.roster.notice {
        Some(notice) => (format!(" {} ", notice), styles::error_style()),
        None if app.roster.loading => (" Loading... ".to_string(), styles::muted_style()),
        None => {
            let shown = app.roster.visible().len();
            let total = app.roster.students.len();
            let text = if shown == total {
                format!(" {} students ", total)
            } else {
                format!(" {} of {} students ", shown, total)
            };
            (text, styles::muted_style())
        }
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_form_overlay(frame: &mut Frame, form: &RecordForm) {
    let area = centered_rect_fixed(FORM_WIDTH, FORM_HEIGHT, frame.area());
    frame.render_widget(Clear, area);

    let submitted = form.phase == FormPhase::Submitted;
    let field_width = (FORM_WIDTH as usize).saturating_sub(20);

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = form.focus == field && !submitted;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let value = form.value(field);
        // Keep the tail visible while typing
        let shown: String = if value.chars().count() > field_width {
            value.chars().skip(value.chars().count() - field_width).collect()
        } else {
            value.to_string()
        };
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", field.label()), styles::muted_style()),
            Span::styled(format!("{}{}", shown, cursor), style),
        ]));
        if field == FormField::BirthDate {
            lines.push(Line::from(Span::styled(
                format!("  {:<12}YYYY-MM-DD, may be empty", ""),
                styles::muted_style(),
            )));
        }
    }

    lines.push(Line::from(""));
    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        ))),
        None => lines.push(Line::from("")),
    }

    lines.push(Line::from(""));
    if submitted {
        lines.push(Line::from(Span::styled("  Saving...", styles::highlight_style())));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  [Enter]", styles::help_key_style()),
            Span::styled(" save  ", styles::muted_style()),
            Span::styled("[Tab]", styles::help_key_style()),
            Span::styled(" next field  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, confirm: &DeleteConfirm) {
    let area = centered_rect_fixed(DELETE_WIDTH, DELETE_HEIGHT, frame.area());
    frame.render_widget(Clear, area);

    let name = truncate(&confirm.target.full_name, (DELETE_WIDTH as usize).saturating_sub(6));

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Delete this student?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(name, styles::list_item_style()),
            Span::styled(format!(" (#{})", confirm.target_id()), styles::muted_style()),
        ]),
        Line::from(""),
    ];

    if confirm.confirmed {
        lines.push(Line::from(Span::styled("  Deleting...", styles::highlight_style())));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" Delete student ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Studentdesk", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓", "Move selection"),
        help_line("PgUp/PgDn", "Move by a page"),
        help_line("Home/End", "First / last student"),
        help_line("/", "Search by name or school"),
        help_line("Esc", "Clear search or message"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("a", "Add student"),
        help_line("e, Enter", "Edit selected student"),
        help_line("d, Del", "Delete selected student"),
        help_line("u", "Reload from the store"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Dialogs", styles::highlight_style())),
        help_line("Tab", "Next field"),
        help_line("Enter", "Save / confirm"),
        help_line("Esc", "Cancel (or click outside)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use studentdesk_core::roster::RosterEvent;
    use studentdesk_core::StudentRecord;

    use super::*;
    use crate::app::test_support::app_with;

    /// Draw one frame and return the screen as a single string.
    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_table_shows_localized_birth_date() {
        let app = app_with(vec![StudentRecord::new(
            "Nguyen Van An",
            NaiveDate::from_ymd_opt(2000, 1, 1),
            "Primary",
        )
        .with_id(1)]);
        let text = screen_text(&app);
        assert!(text.contains("Nguyen Van An"));
        assert!(text.contains("1/1/2000"));
        assert!(!text.contains("2000-01-01"));
    }

    #[test]
    fn test_loading_hides_rows() {
        let mut app = app_with(vec![StudentRecord::new("Nguyen Van An", None, "").with_id(1)]);
        app.dispatch(RosterEvent::LoadStarted);
        let text = screen_text(&app);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("Nguyen Van An"));

        assert!(screen_text(&crate::app::test_support::app()).contains("Loading..."));
    }

    #[test]
    fn test_empty_states() {
        let mut app = app_with(vec![]);
        assert!(screen_text(&app).contains("No students. Press [a] to add one."));

        app.dispatch(RosterEvent::LoadSucceeded(vec![StudentRecord::new("An", None, "").with_id(1)]));
        app.dispatch(RosterEvent::SearchChanged("zzz".into()));
        assert!(screen_text(&app).contains("No students match the search."));
    }

    #[test]
    fn test_centered_rect_fits_small_screens() {
        let screen = Rect::new(0, 0, 30, 5);
        let area = centered_rect_fixed(FORM_WIDTH, FORM_HEIGHT, screen);
        assert_eq!(area, Rect::new(0, 0, 30, 5));
    }

    #[test]
    fn test_dialog_area_only_when_open() {
        let screen = Rect::new(0, 0, 100, 40);
        assert!(dialog_area(&Dialog::Closed, screen).is_none());

        let area = dialog_area(&Dialog::Form(RecordForm::new(None)), screen).unwrap();
        assert_eq!(area, Rect::new(20, 13, FORM_WIDTH, FORM_HEIGHT));
    }
}
