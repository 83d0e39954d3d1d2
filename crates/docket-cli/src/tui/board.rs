//! TUI board view: one column per status.
//!
//! Key bindings: h/l or arrows switch columns, j/k move inside a column,
//! s/f/c/d apply the start/forward/confirm/finalize actions (gated by the
//! column's affordance table), x deletes, / filters by text, p cycles the
//! priority filter, o toggles sort order, g cycles the sort field, r reloads
//! from disk, q quits.
//!
//! Every mutation goes through the [`Board`] controller and is persisted
//! immediately, so a killed session never loses an applied transition.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use docket_board::actions::{BoardAction, offered_actions};
use docket_board::board::Board;
use docket_core::config::load_project_config;
use docket_core::duration::format_duration;
use docket_core::model::demand::{Demand, Priority, Status};
use docket_core::query::{DemandQuery, SortField, SortOrder};
use docket_core::store::DemandStore;

const STATUS_MSG_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
}

pub struct BoardView {
    store: DemandStore,
    board: Board,
    /// Visible demands per column, parallel to [`Status::ALL`].
    columns: Vec<Vec<Demand>>,
    selected_column: usize,
    selected_rows: [usize; 5],
    input_mode: InputMode,
    status_msg: Option<(String, Instant)>,
}

impl BoardView {
    pub fn new(store: DemandStore, query: DemandQuery) -> Result<Self> {
        let demands = store.load().context("load demand store")?;
        let mut board = Board::new(demands);
        board.set_query(query);

        let mut view = Self {
            store,
            board,
            columns: Vec::new(),
            selected_column: 0,
            selected_rows: [0; 5],
            input_mode: InputMode::Normal,
            status_msg: None,
        };
        view.regroup();
        Ok(view)
    }

    /// Rebuild the column buckets from the controller and clamp selections.
    fn regroup(&mut self) {
        let mut grouped = self.board.group_by_status();
        self.columns = Status::ALL
            .iter()
            .map(|status| grouped.remove(status).unwrap_or_default())
            .collect();

        for (index, rows) in self.columns.iter().enumerate() {
            if rows.is_empty() {
                self.selected_rows[index] = 0;
            } else {
                self.selected_rows[index] = self.selected_rows[index].min(rows.len() - 1);
            }
        }
    }

    fn reload(&mut self) -> Result<()> {
        let demands = self.store.load().context("reload demand store")?;
        let query = self.board.query().clone();
        self.board = Board::new(demands);
        self.board.set_query(query);
        self.regroup();
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.store
            .save(self.board.demands())
            .context("save demand store")
    }

    fn selected_status(&self) -> Status {
        Status::ALL[self.selected_column]
    }

    fn selected_demand(&self) -> Option<&Demand> {
        self.columns
            .get(self.selected_column)
            .and_then(|rows| rows.get(self.selected_rows[self.selected_column]))
    }

    fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    pub fn tick(&mut self) {
        if let Some((_, shown_at)) = &self.status_msg
            && shown_at.elapsed() >= STATUS_MSG_TTL
        {
            self.status_msg = None;
        }
    }

    fn update_query(&mut self, update: impl FnOnce(&mut DemandQuery)) {
        let mut query = self.board.query().clone();
        update(&mut query);
        self.board.set_query(query);
        self.regroup();
    }

    /// Returns `Ok(true)` when the view should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.input_mode == InputMode::Search {
            return self.handle_search_key(key);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('h') | KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.selected_column = (self.selected_column + 1).min(Status::ALL.len() - 1);
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_row(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_row(-1),
            KeyCode::Char('s') => self.apply_action(BoardAction::Start)?,
            KeyCode::Char('f') => self.apply_action(BoardAction::Forward)?,
            KeyCode::Char('c') => self.apply_action(BoardAction::Confirm)?,
            KeyCode::Char('d') => self.apply_action(BoardAction::Finalize)?,
            KeyCode::Char('x') => self.delete_selected()?,
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('p') => {
                self.update_query(|query| query.priority = query.priority.cycled());
                self.set_status(format!("priority filter: {}", self.board.query().priority));
            }
            KeyCode::Char('o') => {
                self.update_query(|query| query.sort_order = query.sort_order.toggled());
                self.set_status(format!("sort order: {}", self.board.query().sort_order.as_str()));
            }
            KeyCode::Char('g') => {
                self.update_query(|query| query.sort_field = cycle_sort(query.sort_field));
                self.set_status(format!("sort field: {}", self.board.query().sort_field.as_str()));
            }
            KeyCode::Char('r') => {
                self.reload()?;
                self.set_status("Reloaded".to_string());
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc => {
                self.update_query(|query| query.text.clear());
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.update_query(|query| {
                    query.text.pop();
                });
            }
            KeyCode::Char(c) => {
                self.update_query(|query| query.text.push(c));
            }
            _ => {}
        }
        Ok(false)
    }

    fn move_row(&mut self, delta: i64) {
        let len = self.columns[self.selected_column].len();
        if len == 0 {
            return;
        }
        let current = self.selected_rows[self.selected_column];
        let next = if delta > 0 {
            if current + 1 >= len { 0 } else { current + 1 }
        } else if current == 0 {
            len - 1
        } else {
            current - 1
        };
        self.selected_rows[self.selected_column] = next;
    }

    fn apply_action(&mut self, action: BoardAction) -> Result<()> {
        let status = self.selected_status();
        if !offered_actions(status).contains(&action) {
            self.set_status(format!("{action} is not offered from {status}"));
            return Ok(());
        }
        let Some(id) = self.selected_demand().map(|demand| demand.id.clone()) else {
            return Ok(());
        };

        let now_ms = chrono::Utc::now().timestamp_millis();
        if let Some(transition) = self.board.request_transition(&id, action.target(), now_ms) {
            self.persist()?;
            self.set_status(format!("{id}: {}", transition.summary()));
        }
        self.regroup();
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_demand().map(|demand| demand.id.clone()) else {
            return Ok(());
        };
        if self.board.remove(&id).is_some() {
            self.persist()?;
            self.set_status(format!("deleted {id}"));
        }
        self.regroup();
        Ok(())
    }

    pub fn render(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        self.render_columns(frame, chunks[0]);
        self.render_footer(frame, chunks[1]);
    }

    fn render_columns(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let constraints: Vec<Constraint> = Status::ALL
            .iter()
            .map(|_| Constraint::Percentage(20))
            .collect();
        let column_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (index, status) in Status::ALL.iter().enumerate() {
            let rows = &self.columns[index];
            let is_active = index == self.selected_column;

            let border_style = if is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let title = format!(" {} ({}) ", status.as_str().to_ascii_uppercase(), rows.len());
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(status_color(*status))
                        .add_modifier(Modifier::BOLD),
                ));

            let items: Vec<ListItem<'_>> = rows.iter().map(render_row).collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

            let mut state = ListState::default();
            if is_active && !rows.is_empty() {
                state.select(Some(self.selected_rows[index]));
            }
            frame.render_stateful_widget(list, column_areas[index], &mut state);
        }
    }

    fn render_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = if self.input_mode == InputMode::Search {
            Line::from(vec![
                Span::styled("/", Style::default().fg(Color::Yellow)),
                Span::raw(self.board.query().text.clone()),
                Span::styled("▏", Style::default().fg(Color::Yellow)),
            ])
        } else if let Some((msg, _)) = &self.status_msg {
            Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from(Span::styled(
                "h/l columns  j/k rows  s start  f forward  c confirm  d finalize  \
                 x delete  / search  p priority  o order  g sort  r reload  q quit",
                Style::default().fg(Color::DarkGray),
            ))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_row(demand: &Demand) -> ListItem<'_> {
    let marker = match demand.priority {
        Priority::High => Span::styled("▲ ", Style::default().fg(Color::Red)),
        Priority::Medium => Span::styled("■ ", Style::default().fg(Color::White)),
        Priority::Low => Span::styled("▽ ", Style::default().fg(Color::DarkGray)),
    };
    let mut spans = vec![marker, Span::raw(demand.title.clone())];
    if demand.status.is_terminal() {
        spans.push(Span::styled(
            format!("  {}", format_duration(demand.processing_duration_ms)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    ListItem::new(Line::from(spans))
}

/// Color for a status value.
fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => Color::Cyan,
        Status::InProgress => Color::Green,
        Status::Forwarded => Color::Yellow,
        Status::Confirmed => Color::Magenta,
        Status::Finalized => Color::DarkGray,
    }
}

const fn cycle_sort(field: SortField) -> SortField {
    match field {
        SortField::Priority => SortField::Created,
        SortField::Created => SortField::Duration,
        SortField::Duration => SortField::Priority,
    }
}

/// Open the interactive board for the project containing `project_root`.
pub fn run_board_tui(project_root: &Path) -> Result<()> {
    let store = DemandStore::open(project_root).context("open demand store")?;
    let config = load_project_config(project_root).unwrap_or_default();
    let query = DemandQuery {
        sort_field: SortField::parse_lossy(&config.board.sort),
        sort_order: SortOrder::parse_lossy(&config.board.order),
        ..DemandQuery::default()
    };
    let mut view = BoardView::new(store, query)?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = run_loop(&mut terminal, &mut view);

    // Best-effort teardown: the original error matters more than cleanup.
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &mut BoardView,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view.render(frame))?;

        if event::poll(Duration::from_millis(200))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && view.handle_key(key)?
        {
            return Ok(());
        }
        view.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardView, cycle_sort};
    use crossterm::event::{KeyCode, KeyEvent};
    use docket_core::model::demand::{Demand, DemandDraft, Priority, Status};
    use docket_core::query::{DemandQuery, SortField};
    use docket_core::store::DemandStore;
    use tempfile::TempDir;

    fn setup_view() -> (TempDir, BoardView) {
        let dir = TempDir::new().expect("temp dir");
        let store = DemandStore::init(dir.path()).expect("init");

        let demands = vec![
            Demand::create(
                "dm-00000001",
                DemandDraft {
                    title: "Serve notice".to_string(),
                    priority: Priority::High,
                    ..DemandDraft::default()
                },
                1,
            ),
            Demand::create(
                "dm-00000002",
                DemandDraft {
                    title: "Call debtor".to_string(),
                    ..DemandDraft::default()
                },
                2,
            ),
        ];
        store.save(&demands).expect("save");

        let view = BoardView::new(store, DemandQuery::default()).expect("view");
        (dir, view)
    }

    fn press(view: &mut BoardView, code: KeyCode) -> bool {
        view.handle_key(KeyEvent::from(code)).expect("handle key")
    }

    #[test]
    fn start_key_moves_selected_demand_and_persists() {
        let (dir, mut view) = setup_view();
        assert_eq!(view.columns[0].len(), 2);

        assert!(!press(&mut view, KeyCode::Char('s')));

        // The demand left the pending column and entered in-progress.
        assert_eq!(view.columns[0].len(), 1);
        assert_eq!(view.columns[1].len(), 1);
        assert_eq!(view.columns[1][0].status, Status::InProgress);

        let persisted = DemandStore::open(dir.path())
            .expect("open")
            .load()
            .expect("load");
        assert!(
            persisted
                .iter()
                .any(|demand| demand.status == Status::InProgress)
        );
    }

    #[test]
    fn action_keys_are_gated_by_affordances() {
        let (_dir, mut view) = setup_view();

        // Confirm is not offered from the pending column: nothing moves.
        assert!(!press(&mut view, KeyCode::Char('c')));
        assert_eq!(view.columns[0].len(), 2);
        assert!(
            view.status_msg
                .as_ref()
                .is_some_and(|(msg, _)| msg.contains("not offered"))
        );
    }

    #[test]
    fn search_mode_filters_columns_incrementally() {
        let (_dir, mut view) = setup_view();

        press(&mut view, KeyCode::Char('/'));
        for c in "call".chars() {
            press(&mut view, KeyCode::Char(c));
        }
        assert_eq!(view.columns[0].len(), 1);
        assert_eq!(view.columns[0][0].title, "Call debtor");

        // Esc clears the filter entirely.
        press(&mut view, KeyCode::Esc);
        assert_eq!(view.columns[0].len(), 2);
    }

    #[test]
    fn delete_key_removes_selected_demand() {
        let (dir, mut view) = setup_view();
        assert!(!press(&mut view, KeyCode::Char('x')));
        assert_eq!(view.columns[0].len(), 1);

        let persisted = DemandStore::open(dir.path())
            .expect("open")
            .load()
            .expect("load");
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn navigation_clamps_to_board_edges() {
        let (_dir, mut view) = setup_view();
        press(&mut view, KeyCode::Char('h'));
        assert_eq!(view.selected_column, 0);
        for _ in 0..10 {
            press(&mut view, KeyCode::Char('l'));
        }
        assert_eq!(view.selected_column, Status::ALL.len() - 1);
    }

    #[test]
    fn quit_key_closes_the_view() {
        let (_dir, mut view) = setup_view();
        assert!(press(&mut view, KeyCode::Char('q')));
    }

    #[test]
    fn sort_cycle_visits_every_field() {
        let mut field = SortField::Priority;
        for _ in 0..3 {
            field = cycle_sort(field);
        }
        assert_eq!(field, SortField::Priority);
    }
}
