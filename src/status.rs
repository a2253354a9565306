use console::Term;

/// Narrow wrapper around the console so the poll loop stays free of
/// platform-specific side effects. Writes a single replaceable status line
/// and hides the cursor while active; a no-op when stdout is not a terminal.
pub struct StatusLine {
    term: Option<Term>,
}

impl StatusLine {
    pub fn new() -> Self {
        let term = Term::stdout();
        if term.is_term() {
            let _ = term.hide_cursor();
            Self { term: Some(term) }
        } else {
            Self { term: None }
        }
    }

    /// A status line that never touches the console, for tests and
    /// non-interactive runs.
    pub fn disabled() -> Self {
        Self { term: None }
    }

    pub fn set_status(&self, text: &str) {
        if let Some(term) = &self.term {
            let _ = term.clear_line();
            let _ = term.write_str(text);
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        if let Some(term) = &self.term {
            let _ = term.show_cursor();
            let _ = term.write_line("");
        }
    }
}
