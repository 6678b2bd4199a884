use crate::board::{Board, COLUMNS};
use crate::record_store::{Clock, RecordStore};
use crate::storage::StoragePort;
use crate::task::TaskStatus;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

const HELP: &str = "a add  e edit  space complete/restore  d delete  r reload  q quit";

pub async fn run_app<B: Backend, S: StoragePort, C: Clock>(
    terminal: &mut Terminal<B>,
    board: &mut Board,
    store: &RecordStore<S, C>,
) -> io::Result<()> {
    board.refresh(store).await;
    loop {
        terminal.draw(|f| draw(f, board))?;

        if let Event::Key(key) = blocking(event::read).await? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('a') => {
                    if let Some(heading) = ask("Shipment heading").await {
                        if let Some(description) = ask("Shipment description").await {
                            board.add(store, &heading, &description).await;
                        }
                    }
                }
                KeyCode::Char('e') => {
                    if board.selected().is_some() {
                        if let Some(heading) = ask("New heading").await {
                            if let Some(description) = ask("New description").await {
                                board.edit_selected(store, &heading, &description).await;
                            }
                        }
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => board.toggle_selected(store).await,
                KeyCode::Char('d') => board.delete_selected(store).await,
                KeyCode::Char('r') => {
                    board.error = None;
                    board.refresh(store).await;
                }
                KeyCode::Left => board.move_column(-1),
                KeyCode::Right => board.move_column(1),
                KeyCode::Up => board.move_task(-1),
                KeyCode::Down => board.move_task(1),
                _ => {}
            }
        }
    }
}

pub fn draw(f: &mut Frame, board: &Board) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    for (i, status) in COLUMNS.iter().enumerate() {
        let tasks = board.column(*status);
        let items: Vec<ListItem> = tasks
            .iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::styled(&t.heading, Style::default().fg(Color::White)),
                    Span::raw(" - "),
                    Span::raw(&t.description),
                    Span::styled(
                        format!(" ({})", t.updated_at.format("%Y-%m-%d %H:%M")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let title = match status {
            TaskStatus::Active => format!("Active Shipments ({})", tasks.len()),
            TaskStatus::Completed => format!("Completed ({})", tasks.len()),
        };
        let focused = board.selected_column == i;
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if focused && !tasks.is_empty() {
            state.select(Some(board.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut state);
    }

    let footer = match &board.error {
        Some(err) => Paragraph::new(format!("{err} (r to retry)")).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(footer, rows[1]);
}

/// Runs terminal I/O off the async worker threads.
async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> io::Result<T> + Send + 'static,
) -> io::Result<T> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| io::Error::other(format!("terminal task join error: {e}")))?
}

async fn ask(message: &'static str) -> Option<String> {
    blocking(move || Ok(prompt(message))).await.ok().flatten()
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    let result = io::stdin().read_line(&mut input).ok().map(|_| input);
    enable_raw_mode().ok();
    result
}
