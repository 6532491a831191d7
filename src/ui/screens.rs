use crate::catalog::Catalog;
use crate::models::{Book, SearchField};

/// Top-level tabs, in the order they are drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tab {
    Add,
    Remove,
    Search,
    AllBooks,
    Statistics,
}

impl Tab {
    pub(crate) const ALL: [Tab; 5] = [
        Tab::Add,
        Tab::Remove,
        Tab::Search,
        Tab::AllBooks,
        Tab::Statistics,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Add => "Add Book",
            Tab::Remove => "Remove Book",
            Tab::Search => "Search",
            Tab::AllBooks => "All Books",
            Tab::Statistics => "Statistics",
        }
    }

    pub(crate) fn index(self) -> usize {
        Tab::ALL
            .iter()
            .position(|tab| *tab == self)
            .unwrap_or_default()
    }

    pub(crate) fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub(crate) fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Map the `1`-`5` shortcut keys onto tabs.
    pub(crate) fn from_digit(ch: char) -> Option<Self> {
        let digit = ch.to_digit(10)? as usize;
        digit.checked_sub(1).and_then(|idx| Tab::ALL.get(idx).copied())
    }
}

/// Highlighted row within a list whose length can change underneath it.
#[derive(Default, Debug, Clone, Copy)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len = len as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Pull the cursor back inside the list after entries were removed.
    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Query, chosen field, and the last result set for the search tab.
#[derive(Default)]
pub(crate) struct SearchScreen {
    pub(crate) field: SearchField,
    pub(crate) query: String,
    pub(crate) results: Vec<Book>,
    /// False until the first search runs, so the tab can show a prompt
    /// instead of an empty result list.
    pub(crate) searched: bool,
    pub(crate) cursor: ListCursor,
}

impl SearchScreen {
    pub(crate) fn run(&mut self, catalog: &Catalog) {
        self.results = catalog.search(&self.query, self.field);
        self.searched = true;
        self.cursor.ensure_in_bounds(self.results.len());
    }

    /// Re-run the current query after the catalog changed, but only if the
    /// user has searched at least once.
    pub(crate) fn refresh(&mut self, catalog: &Catalog) {
        if self.searched {
            self.run(catalog);
        }
    }

    pub(crate) fn toggle_field(&mut self, catalog: &Catalog) {
        self.field = self.field.toggle();
        self.run(catalog);
    }

    pub(crate) fn push_char(&mut self, ch: char, catalog: &Catalog) {
        self.query.push(ch);
        self.run(catalog);
    }

    pub(crate) fn backspace(&mut self, catalog: &Catalog) {
        self.query.pop();
        self.run(catalog);
    }
}
