use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::catalog::Catalog;
use crate::models::Book;
use crate::store::LoadWarning;

use super::forms::{BookField, BookForm, ConfirmRemove};
use super::helpers::{book_line, centered_rect, cursor_column, surface_error};
use super::screens::{ListCursor, SearchScreen, Tab};

/// Tab bar height, borders included.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the active tab.
enum Mode {
    Normal,
    AddingBook(BookForm),
    ConfirmRemove(ConfirmRemove),
    /// Typing into the search tab's query.
    Searching,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the catalog for the
/// whole session.
pub struct App {
    catalog: Catalog,
    tab: Tab,
    mode: Mode,
    status: Option<StatusMessage>,
    remove_cursor: ListCursor,
    books_cursor: ListCursor,
    search: SearchScreen,
}

impl App {
    pub fn new(catalog: Catalog, warning: Option<LoadWarning>) -> Self {
        let mut app = Self {
            catalog,
            tab: Tab::Add,
            mode: Mode::Normal,
            status: None,
            remove_cursor: ListCursor::default(),
            books_cursor: ListCursor::default(),
            search: SearchScreen::default(),
        };
        if let Some(warning) = warning {
            app.set_status(warning.to_string(), StatusKind::Warning);
        }
        app
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm)?,
            Mode::Searching => self.handle_search(code),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        if let Some(tab) = tab_shortcut(code) {
            self.switch_tab(tab);
            return Ok(Mode::Normal);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.previous()),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.move_cursor(PAGE_STEP),
            KeyCode::Home => {
                if let Some(cursor) = self.active_cursor() {
                    cursor.select_first();
                }
            }
            KeyCode::End => {
                let len = self.active_len();
                if let Some(cursor) = self.active_cursor() {
                    cursor.select_last(len);
                }
            }
            KeyCode::Char('+') => {
                self.clear_status();
                self.tab = Tab::Add;
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Enter => match self.tab {
                Tab::Add => {
                    self.clear_status();
                    return Ok(Mode::AddingBook(BookForm::default()));
                }
                Tab::Remove => return Ok(self.begin_remove()),
                Tab::Search => return Ok(self.begin_search()),
                Tab::AllBooks | Tab::Statistics => {}
            },
            KeyCode::Char('-') if self.tab == Tab::Remove => return Ok(self.begin_remove()),
            KeyCode::Char('f') | KeyCode::Char('/') if self.tab == Tab::Search => {
                return Ok(self.begin_search());
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_remove(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmRemove(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmRemove(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Normal,
            KeyCode::Tab | KeyCode::BackTab => self.search.toggle_field(&self.catalog),
            KeyCode::Backspace => self.search.backspace(&self.catalog),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.move_cursor(PAGE_STEP),
            KeyCode::Char(ch) if !ch.is_control() => self.search.push_char(ch, &self.catalog),
            _ => {}
        }
        Mode::Searching
    }

    fn begin_remove(&mut self) -> Mode {
        let Some(title) = self
            .catalog
            .list_all()
            .get(self.remove_cursor.selected)
            .map(|book| book.title.clone())
        else {
            self.set_status("No books available to remove.", StatusKind::Error);
            return Mode::Normal;
        };

        self.clear_status();
        let count = self
            .catalog
            .titles()
            .into_iter()
            .filter(|candidate| *candidate == title)
            .count();
        Mode::ConfirmRemove(ConfirmRemove { title, count })
    }

    fn begin_search(&mut self) -> Mode {
        self.clear_status();
        self.search.run(&self.catalog);
        Mode::Searching
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let book = form.parse_inputs()?;
        self.catalog.add(book).context("failed to save library")?;
        self.books_cursor.select_last(self.catalog.len());
        self.search.refresh(&self.catalog);
        self.set_status("Book added successfully!", StatusKind::Info);
        Ok(())
    }

    fn perform_remove(&mut self, confirm: &ConfirmRemove) -> Result<()> {
        let removed = self
            .catalog
            .remove(&confirm.title)
            .context("failed to save library")?;
        let len = self.catalog.len();
        self.remove_cursor.ensure_in_bounds(len);
        self.books_cursor.ensure_in_bounds(len);
        self.search.refresh(&self.catalog);

        let message = match removed {
            0 => {
                warn!(title = %confirm.title, "no books matched removal");
                format!("No books titled \"{}\" were found.", confirm.title)
            }
            1 => "Book removed!".to_string(),
            n => format!("Removed {n} books titled \"{}\".", confirm.title),
        };
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clear_status();
    }

    fn active_len(&self) -> usize {
        match self.tab {
            Tab::Remove | Tab::AllBooks => self.catalog.len(),
            Tab::Search => self.search.results.len(),
            Tab::Add | Tab::Statistics => 0,
        }
    }

    fn active_cursor(&mut self) -> Option<&mut ListCursor> {
        match self.tab {
            Tab::Remove => Some(&mut self.remove_cursor),
            Tab::AllBooks => Some(&mut self.books_cursor),
            Tab::Search => Some(&mut self.search.cursor),
            Tab::Add | Tab::Statistics => None,
        }
    }

    fn move_cursor(&mut self, offset: isize) {
        let len = self.active_len();
        if let Some(cursor) = self.active_cursor() {
            cursor.move_selection(offset, len);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Add => self.draw_add_tab(frame, chunks[1]),
            Tab::Remove => self.draw_remove_tab(frame, chunks[1]),
            Tab::Search => self.draw_search_tab(frame, chunks[1]),
            Tab::AllBooks => self.draw_all_books(frame, chunks[1]),
            Tab::Statistics => self.draw_statistics(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Searching | Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Personal Library Manager"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_add_tab(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Add a New Book",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press Enter to open the form."),
            Line::from(""),
            Line::from(Span::styled(
                format!("Library file: {}", self.catalog.path().display()),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_remove_tab(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Remove a Book");
        if self.catalog.is_empty() {
            let message = Paragraph::new("No books available to remove.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .catalog
            .titles()
            .into_iter()
            .map(|title| ListItem::new(title.to_string()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.remove_cursor.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_search_tab(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let block = Block::default().borders(Borders::ALL).title("Search Books");
        let inner = block.inner(chunks[0]);
        let query_style = if matches!(self.mode, Mode::Searching) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::raw("Search by: "),
                Span::styled(
                    self.search.field.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw(SEARCH_PROMPT),
                Span::styled(self.search.query.clone(), query_style),
            ]),
        ])
        .block(block);
        frame.render_widget(header, chunks[0]);

        if matches!(self.mode, Mode::Searching) {
            let offset = SEARCH_PROMPT.len() + self.search.query.chars().count();
            let cursor_x = cursor_column(inner, offset);
            frame.set_cursor_position((cursor_x, inner.y.saturating_add(1)));
        }

        let results_block = Block::default().borders(Borders::ALL).title("Results");
        if !self.search.searched {
            let message = Paragraph::new("Press Enter to search.")
                .alignment(Alignment::Center)
                .block(results_block);
            frame.render_widget(message, chunks[1]);
            return;
        }

        self.render_books(
            frame,
            chunks[1],
            results_block,
            &self.search.results,
            self.search.cursor.selected,
        );
    }

    fn draw_all_books(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("All Books in Library");
        self.render_books(
            frame,
            area,
            block,
            self.catalog.list_all(),
            self.books_cursor.selected,
        );
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect) {
        let stats = self.catalog.statistics();
        let label = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(vec![
                Span::styled("Total Books: ", label),
                Span::raw(stats.total.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Books Read: ", label),
                Span::raw(stats.read_count.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Read Percentage: ", label),
                Span::raw(stats.read_percent_label()),
            ]),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Library Statistics"),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_books(
        &self,
        frame: &mut Frame,
        area: Rect,
        block: Block,
        books: &[Book],
        selected: usize,
    ) {
        if books.is_empty() {
            let message = Paragraph::new("No books to display.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = books
            .iter()
            .enumerate()
            .map(|(idx, book)| ListItem::new(book_line(idx + 1, book)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut list_state = ListState::default();
        list_state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.mode, self.tab) {
            (Mode::AddingBook(_), _) => &[
                ("[Tab]", " Next field   "),
                ("[Space]", " Toggle read   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::ConfirmRemove(_), _) => &[("[y]", " Remove   "), ("[n]", " Keep")],
            (Mode::Searching, _) => &[
                ("[Tab]", " Title/Author   "),
                ("[Up/Down]", " Navigate   "),
                ("[Enter/Esc]", " Done"),
            ],
            (Mode::Normal, Tab::Add) => &[
                ("[Enter]", " Add book   "),
                ("[Tab]", " Next tab   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::Remove) => &[
                ("[Up/Down]", " Navigate   "),
                ("[Enter]", " Remove   "),
                ("[Tab]", " Next tab   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::Search) => &[
                ("[Enter]", " Search   "),
                ("[Up/Down]", " Navigate   "),
                ("[Tab]", " Next tab   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::AllBooks) => &[
                ("[Up/Down]", " Navigate   "),
                ("[+]", " Add book   "),
                ("[Tab]", " Next tab   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::Statistics) => &[
                ("[+]", " Add book   "),
                ("[Tab]", " Next tab   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(action.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add a New Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save - Tab to switch - Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let cursor_x = cursor_column(inner, form.cursor_offset());
        let cursor_y = inner.y.saturating_add(form.cursor_row() as u16);
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(format!("Remove \"{}\"?", confirm.title))];
        if confirm.count > 1 {
            lines.push(Line::from(Span::styled(
                format!("{} books share this title; all of them will be removed.", confirm.count),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Label in front of the search query.
const SEARCH_PROMPT: &str = "Term: ";

/// Tab selected by a `1`-`5` key press, if any.
fn tab_shortcut(code: KeyCode) -> Option<Tab> {
    match code {
        KeyCode::Char(ch) => Tab::from_digit(ch),
        _ => None,
    }
}
