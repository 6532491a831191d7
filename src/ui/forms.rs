use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, MAX_YEAR, MIN_YEAR};

/// Longest year the form will accept as typed input.
const YEAR_DIGITS: usize = 4;

/// Fields of the add-book form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Publication Year",
            BookField::Genre => "Genre",
            BookField::Read => "Have you read this book?",
        }
    }

    fn position(self) -> usize {
        BookField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

/// Internal representation of the add-book form.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl BookForm {
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.position() + 1) % BookField::ALL.len();
        self.active = BookField::ALL[next];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = BookField::ALL.len();
        let previous = (self.active.position() + len - 1) % len;
        self.active = BookField::ALL[previous];
    }

    /// Feed a typed character to the active field. The year only takes
    /// digits; the read flag responds to space, `y`, and `n`.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Genre => self.genre.push(ch),
            BookField::Year => {
                if !ch.is_ascii_digit() || self.year.len() >= YEAR_DIGITS {
                    return false;
                }
                self.year.push(ch);
            }
            BookField::Read => match ch {
                ' ' => self.read = !self.read,
                'y' | 'Y' => self.read = true,
                'n' | 'N' => self.read = false,
                _ => return false,
            },
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre => {
                self.genre.pop();
            }
            BookField::Read => {}
        }
    }

    /// Validate the inputs and build the book to store. A blank year counts
    /// as the lowest allowed year.
    pub(crate) fn parse_inputs(&self) -> Result<Book> {
        let year_raw = self.year.trim();
        let year = if year_raw.is_empty() {
            MIN_YEAR
        } else {
            year_raw
                .parse::<i32>()
                .context("Publication year must be a whole number.")?
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(anyhow!(
                "Publication year must be between {MIN_YEAR} and {MAX_YEAR}."
            ));
        }

        Ok(Book::new(
            self.title.trim(),
            self.author.trim(),
            year,
            self.genre.trim(),
            self.read,
        ))
    }

    fn value(&self, field: BookField) -> String {
        match field {
            BookField::Title => self.title.clone(),
            BookField::Author => self.author.clone(),
            BookField::Year => self.year.clone(),
            BookField::Genre => self.genre.clone(),
            BookField::Read => (if self.read { "Yes" } else { "No" }).to_string(),
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            match field {
                BookField::Year => format!("<{MIN_YEAR}>"),
                _ => "<empty>".to_string(),
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset within the active line.
    pub(crate) fn cursor_offset(&self) -> usize {
        let prefix = self.active.label().chars().count() + 2;
        let value_len = match self.active {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
            BookField::Year => self.year.chars().count(),
            BookField::Genre => self.genre.chars().count(),
            BookField::Read => 0,
        };
        prefix + value_len
    }

    /// Row of the active field within the form body.
    pub(crate) fn cursor_row(&self) -> usize {
        self.active.position()
    }
}

/// Pending removal of every book sharing `title`.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmRemove {
    pub(crate) title: String,
    pub(crate) count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn type_str(form: &mut BookForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn filled_form_builds_book() {
        let mut form = BookForm::default();
        type_str(&mut form, "Dune");
        form.next_field();
        type_str(&mut form, "Herbert");
        form.next_field();
        type_str(&mut form, "1965");
        form.next_field();
        type_str(&mut form, "Sci-Fi");
        form.next_field();
        form.push_char('y');

        let book = form.parse_inputs().unwrap();

        assert_eq!(book, Book::new("Dune", "Herbert", 1965, "Sci-Fi", true));
    }

    #[test]
    fn year_rejects_non_digits_and_extra_length() {
        let mut form = BookForm {
            active: BookField::Year,
            ..BookForm::default()
        };

        assert!(!form.push_char('-'));
        assert!(!form.push_char('a'));
        type_str(&mut form, "199999");

        assert_eq!(form.year, "1999");
    }

    #[test]
    fn year_above_range_is_rejected() {
        let form = BookForm {
            year: "2101".to_string(),
            ..BookForm::default()
        };

        let err = form.parse_inputs().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Publication year must be between 0 and 2100."
        );
    }

    #[test]
    fn blank_year_defaults_to_zero() {
        let form = BookForm {
            title: "Untitled".to_string(),
            ..BookForm::default()
        };

        assert_eq!(form.parse_inputs().unwrap().year, 0);
    }

    #[test]
    fn read_flag_toggles_with_space() {
        let mut form = BookForm {
            active: BookField::Read,
            ..BookForm::default()
        };

        form.push_char(' ');
        assert!(form.read);
        form.push_char(' ');
        assert!(!form.read);
        assert!(!form.push_char('x'));
    }

    #[test]
    fn field_focus_wraps_around() {
        let mut form = BookForm::default();
        form.previous_field();
        assert_eq!(form.active, BookField::Read);
        form.next_field();
        assert_eq!(form.active, BookField::Title);
    }
}
