use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use registry_core::{
    models::{NewToken, NumberInput, TokenDraft, TokenRecord},
    query::{self, PageView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tokens,
    AddToken,
}

/// Something the event loop has to do outside the app state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Refresh,
    Submit(NewToken),
}

/// Labels of the entry form, in display order.
pub const FORM_LABELS: [&str; 7] = [
    "Owner",
    "Token Name",
    "Balance",
    "Funding Source",
    "Fee (%)",
    "Liquidity",
    "Supply Added (%)",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenForm {
    pub values: [String; 7],
    pub focused: usize,
}

impl TokenForm {
    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.values.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.values.len() - 1) % self.values.len();
    }

    pub fn push_char(&mut self, c: char) {
        self.values[self.focused].push(c);
    }

    pub fn pop_char(&mut self) {
        self.values[self.focused].pop();
    }

    pub fn to_draft(&self) -> TokenDraft {
        let text = |i: usize| Some(self.values[i].clone());
        let number = |i: usize| Some(NumberInput::Text(self.values[i].clone()));
        TokenDraft {
            owner: text(0),
            token_name: text(1),
            balance: number(2),
            funding_source: text(3),
            fee: number(4),
            liquidity: number(5),
            supply_percent_added: number(6),
        }
    }
}

pub struct App {
    pub should_quit: bool,
    /// Last snapshot fetched from the registry.
    pub tokens: Vec<TokenRecord>,
    pub logs: Vec<String>,
    pub selected_tab: Tab,
    pub search_input: String,
    pub current_page: usize,
    pub form: TokenForm,
    pub submitting: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            tokens: Vec::new(),
            logs: vec!["Welcome to Token Registry".to_string()],
            selected_tab: Tab::Tokens,
            search_input: String::new(),
            current_page: 1,
            form: TokenForm::default(),
            submitting: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn add_log(&mut self, message: String) {
        self.logs.push(message);
    }

    pub fn toggle_tab(&mut self) {
        self.selected_tab = match self.selected_tab {
            Tab::Tokens => Tab::AddToken,
            Tab::AddToken => Tab::Tokens,
        };
    }

    pub fn page_view(&self) -> PageView<'_> {
        query::view(&self.tokens, &self.search_input, self.current_page)
    }

    pub fn prev_page(&mut self) {
        let shown = self.page_view().page;
        self.current_page = shown.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self) {
        let view = self.page_view();
        self.current_page = (view.page + 1).min(view.total_pages).max(1);
    }

    // The page number is left alone on purpose; `query::view` clamps it.
    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    pub fn tokens_loaded(&mut self, tokens: Vec<TokenRecord>) {
        self.tokens = tokens;
        self.add_log(format!("Loaded {} tokens.", self.tokens.len()));
    }

    /// A failed fetch shows an empty table rather than stale rows.
    pub fn tokens_failed(&mut self, message: String) {
        self.tokens.clear();
        self.add_log(format!("Failed to load tokens: {}", message));
    }

    pub fn token_created(&mut self, record: TokenRecord) {
        self.submitting = false;
        self.add_log(format!(
            "Token {} added for {} (id {}).",
            record.token_name, record.owner, record.id
        ));
        self.tokens.push(record);
        self.form = TokenForm::default();
        self.selected_tab = Tab::Tokens;
    }

    /// The form keeps its contents so the user can fix and resubmit.
    pub fn create_failed(&mut self, message: String) {
        self.submitting = false;
        self.add_log(format!("Token not saved: {}", message));
    }

    fn submit(&mut self) -> Option<Action> {
        if self.submitting {
            return None;
        }
        match self.form.to_draft().validate() {
            Ok(token) => {
                self.submitting = true;
                self.add_log("Saving token...".to_string());
                Some(Action::Submit(token))
            }
            Err(err) => {
                self.add_log(err.to_string());
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.quit();
            return Some(Action::Quit);
        }

        match key.code {
            KeyCode::Tab => {
                self.toggle_tab();
                return None;
            }
            KeyCode::F(5) => return Some(Action::Refresh),
            _ => {}
        }

        // Unbound chords are not text input.
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }

        match self.selected_tab {
            Tab::Tokens => {
                match key.code {
                    KeyCode::Left | KeyCode::PageUp => self.prev_page(),
                    KeyCode::Right | KeyCode::PageDown => self.next_page(),
                    KeyCode::Backspace => self.pop_search_char(),
                    KeyCode::Char(c) => self.push_search_char(c),
                    _ => {}
                }
                None
            }
            Tab::AddToken => match key.code {
                KeyCode::Down => {
                    self.form.focus_next();
                    None
                }
                KeyCode::Up | KeyCode::BackTab => {
                    self.form.focus_prev();
                    None
                }
                KeyCode::Backspace => {
                    self.form.pop_char();
                    None
                }
                KeyCode::Char(c) => {
                    self.form.push_char(c);
                    None
                }
                KeyCode::Enter => self.submit(),
                _ => None,
            },
        }
    }
}

/// Whole numbers get thousands separators; fractions keep up to four digits.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole),
    };
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}
