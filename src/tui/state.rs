use cashbook::models::transaction::{DATE_FORMAT, Transaction, TransactionType};
use cashbook::operations::add::{TransactionInput, add_transaction_to_db};
use cashbook::operations::edit::{edit_transaction_in_db, load_transaction_for_edit};
use cashbook::operations::summary::DashboardSummary;
use cashbook::{TransactionError, TransactionStore};
use chrono::NaiveDate;
use ratatui::widgets::TableState;
use std::cmp::{max, min};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transactions,
    Dashboard,
}

impl Tab {
    pub const TITLES: [&'static str; 2] = ["Transactions", "Dashboard"];

    pub fn index(self) -> usize {
        match self {
            Tab::Transactions => 0,
            Tab::Dashboard => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Tab::Transactions => Tab::Dashboard,
            Tab::Dashboard => Tab::Transactions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Form,
    ConfirmDelete(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Type,
    Amount,
    Date,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Type,
        FormField::Amount,
        FormField::Date,
        FormField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Type => "Transaction Type:",
            FormField::Amount => "Amount:",
            FormField::Date => "Date:",
            FormField::Description => "Description:",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Type => FormField::Amount,
            FormField::Amount => FormField::Date,
            FormField::Date => FormField::Description,
            FormField::Description => FormField::Type,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::Type => FormField::Description,
            FormField::Amount => FormField::Type,
            FormField::Date => FormField::Amount,
            FormField::Description => FormField::Date,
        }
    }
}

/// The add/edit form. `editing_id` decides whether saving inserts or updates.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub editing_id: Option<i64>,
    pub transaction_type: TransactionType,
    pub amount: String,
    pub date: String,
    pub description: String,
    pub focus: FormField,
    pub error: Option<String>,
}

impl FormState {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            editing_id: None,
            transaction_type: TransactionType::Income,
            amount: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            description: String::new(),
            focus: FormField::Type,
            error: None,
        }
    }

    fn for_edit(id: i64, input: TransactionInput) -> Result<Self, TransactionError> {
        Ok(Self {
            editing_id: Some(id),
            transaction_type: TransactionType::from_str(&input.transaction_type)?,
            amount: input.amount,
            date: input.date,
            description: input.description,
            focus: FormField::Amount,
            error: None,
        })
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Type => self.transaction_type.as_str(),
            FormField::Amount => &self.amount,
            FormField::Date => &self.date,
            FormField::Description => &self.description,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Type => None,
            FormField::Amount => Some(&mut self.amount),
            FormField::Date => Some(&mut self.date),
            FormField::Description => Some(&mut self.description),
        }
    }

    pub fn to_input(&self) -> TransactionInput {
        TransactionInput::new(
            self.transaction_type.as_str(),
            self.amount.as_str(),
            self.date.as_str(),
            self.description.as_str(),
        )
    }

    pub fn push_char(&mut self, ch: char) {
        match self.focus {
            FormField::Type => match ch {
                ' ' => self.transaction_type = self.transaction_type.toggle(),
                'i' | 'I' => self.transaction_type = TransactionType::Income,
                'e' | 'E' => self.transaction_type = TransactionType::Expense,
                _ => {}
            },
            _ => {
                if let Some(text) = self.text_mut() {
                    text.push(ch);
                }
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    pub fn toggle_type(&mut self) {
        if self.focus == FormField::Type {
            self.transaction_type = self.transaction_type.toggle();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    fn error(error: &TransactionError) -> Self {
        Self {
            text: format!("{}: {}", error.title(), error),
            is_error: true,
        }
    }
}

pub struct AppState {
    pub tab: Tab,
    pub mode: Mode,

    pub transactions: Vec<Transaction>,
    pub summary: DashboardSummary,

    pub table_state: TableState,
    pub form: FormState,
    pub status: Option<StatusMessage>,

    pub today: NaiveDate,

    // Cached per-draw
    pub last_page_size: usize,
}

impl AppState {
    /// Opens on whatever the store returns. A failed first read leaves the table
    /// empty and reports the error in the status line.
    pub fn new(store: &TransactionStore, today: NaiveDate) -> Self {
        let mut state = Self {
            tab: Tab::Transactions,
            mode: Mode::List,
            transactions: Vec::new(),
            summary: DashboardSummary::default(),
            table_state: TableState::default(),
            form: FormState::blank(today),
            status: None,
            today,
            last_page_size: 10,
        };
        state.refresh_or_report(store);
        state
    }

    /// Re-read every transaction and recompute the dashboard. Called after each mutation.
    pub fn refresh(&mut self, store: &TransactionStore) -> Result<(), TransactionError> {
        self.transactions = store.list_all()?;
        self.summary = DashboardSummary::from_transactions(&self.transactions);

        if self.transactions.is_empty() {
            self.table_state.select(None);
        } else {
            let selected = match self.table_state.selected() {
                Some(sel) => min(sel, self.transactions.len() - 1),
                None => 0,
            };
            self.table_state.select(Some(selected));
        }
        Ok(())
    }

    /// Like [AppState::refresh], but a failure clears the table and the dashboard
    /// instead of leaving the previous read on screen.
    fn refresh_or_report(&mut self, store: &TransactionStore) {
        if let Err(e) = self.refresh(store) {
            self.transactions.clear();
            self.summary = DashboardSummary::default();
            self.table_state.select(None);
            self.status = Some(StatusMessage::error(&e));
        }
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.table_state.selected()?)
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.transactions.is_empty() {
            self.table_state.select(None);
            return;
        }

        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = self.transactions.len().saturating_sub(1) as i32;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.table_state.select(Some(next));
    }

    pub fn page_up(&mut self) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(-page);
    }

    pub fn page_down(&mut self) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(page);
    }

    pub fn select_first(&mut self) {
        if !self.transactions.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.transactions.is_empty() {
            self.table_state.select(Some(self.transactions.len() - 1));
        }
    }

    pub fn open_add_form(&mut self) {
        self.form = FormState::blank(self.today);
        self.mode = Mode::Form;
    }

    pub fn open_edit_form(&mut self, store: &TransactionStore) {
        let Some(id) = self.selected_transaction().map(|t| t.id) else {
            self.status = Some(StatusMessage::error(&TransactionError::validation(
                "Please select a transaction to edit.",
            )));
            return;
        };

        match load_transaction_for_edit(store, id).and_then(|input| FormState::for_edit(id, input)) {
            Ok(form) => {
                self.form = form;
                self.mode = Mode::Form;
                self.status = Some(StatusMessage::info(
                    "Transaction details loaded. Make changes and press Enter to save.",
                ));
            }
            Err(e) => {
                self.status = Some(StatusMessage::error(&e));
                self.refresh_or_report(store);
            }
        }
    }

    /// Save the form. Validation errors keep the form open so the user can correct them.
    pub fn submit_form(&mut self, store: &TransactionStore) {
        let input = self.form.to_input();
        let result = match self.form.editing_id {
            Some(id) => {
                edit_transaction_in_db(store, id, &input).map(|_| "Transaction updated successfully!")
            }
            None => add_transaction_to_db(store, &input).map(|_| "Transaction added successfully!"),
        };

        match result {
            Ok(message) => {
                self.form = FormState::blank(self.today);
                self.mode = Mode::List;
                self.status = Some(StatusMessage::info(message));
                self.refresh_or_report(store);
            }
            Err(e @ TransactionError::Validation(_)) => {
                self.form.error = Some(e.to_string());
            }
            Err(e) => {
                self.form = FormState::blank(self.today);
                self.mode = Mode::List;
                self.status = Some(StatusMessage::error(&e));
                self.refresh_or_report(store);
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = FormState::blank(self.today);
        self.mode = Mode::List;
    }

    pub fn request_delete(&mut self) {
        match self.selected_transaction().map(|t| t.id) {
            Some(id) => self.mode = Mode::ConfirmDelete(id),
            None => {
                self.status = Some(StatusMessage::error(&TransactionError::validation(
                    "Please select a transaction to delete.",
                )));
            }
        }
    }

    pub fn confirm_delete(&mut self, store: &TransactionStore) {
        let Mode::ConfirmDelete(id) = self.mode else {
            return;
        };

        self.mode = Mode::List;
        self.status = Some(match store.delete(id) {
            Ok(()) => StatusMessage::info("Transaction deleted successfully!"),
            Err(e) => StatusMessage::error(&e),
        });
        self.refresh_or_report(store);
    }

    pub fn cancel_delete(&mut self) {
        self.mode = Mode::List;
    }

    pub fn reload(&mut self, store: &TransactionStore) {
        self.status = None;
        self.refresh_or_report(store);
    }
}
