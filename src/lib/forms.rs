//! Headless state for the two form widgets of the upload panel.
//!
//! Both views render state owned elsewhere: the parent owns the selection of
//! a [`SelectField`], a remote service owns the options of a
//! [`RemoteOptionsField`]. All they track locally is what the user is
//! pointing at; every decision is handed back through a callback.

use super::i18n::{render, Locale, MessageKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        SelectOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SelectField {
    options: Vec<SelectOption>,
    selected: Option<String>,
    highlighted: Option<usize>,
}

impl SelectField {
    pub fn new(options: Vec<SelectOption>, selected: Option<&str>) -> Self {
        let selected = selected.map(String::from);
        let highlighted = selected
            .as_ref()
            .and_then(|value| options.iter().position(|option| &option.value == value));
        SelectField {
            options,
            selected,
            highlighted,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn highlighted(&self) -> Option<&SelectOption> {
        self.highlighted.and_then(|idx| self.options.get(idx))
    }

    pub fn placeholder(&self, locale: Locale) -> &'static str {
        MessageKey::ChooseOption.text(locale)
    }

    /// Label shown in the closed widget.
    pub fn display_label(&self, locale: Locale) -> &str {
        self.selected
            .as_ref()
            .and_then(|value| self.options.iter().find(|option| &option.value == value))
            .map(|option| option.label.as_str())
            .unwrap_or_else(|| self.placeholder(locale))
    }

    /// The parent changed the selection.
    pub fn set_selected(&mut self, selected: Option<&str>) {
        *self = SelectField::new(std::mem::take(&mut self.options), selected);
    }

    pub fn highlight_next(&mut self) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(self.highlighted.map_or(0, |idx| (idx + 1) % len));
    }

    pub fn highlight_previous(&mut self) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(self.highlighted.map_or(len - 1, |idx| (idx + len - 1) % len));
    }

    pub fn choose_highlighted(&self, on_change: impl FnOnce(&str)) -> bool {
        match self.highlighted() {
            Some(option) => {
                on_change(&option.value);
                true
            }
            None => false,
        }
    }

    /// Hand `value` to the parent if it is one of the options. Choosing the
    /// current selection fires as well.
    pub fn choose(&self, value: &str, on_change: impl FnOnce(&str)) -> bool {
        match self.options.iter().find(|option| option.value == value) {
            Some(option) => {
                on_change(&option.value);
                true
            }
            None => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RemoteOptionsField {
    options: Vec<String>,
    query: String,
}

impl RemoteOptionsField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the options with the result of a fetch.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered(&self) -> Vec<&str> {
        let needle = self.query.trim().to_lowercase();
        self.options
            .iter()
            .filter(|option| option.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn show_add(&self) -> bool {
        let query = self.query.trim().to_lowercase();
        !query.is_empty() && !self.options.iter().any(|option| option.to_lowercase() == query)
    }

    pub fn add_label(&self, locale: Locale) -> String {
        render(
            MessageKey::AddOption.text(locale),
            &[("value", self.query.trim().to_string())],
        )
    }

    pub fn add(&mut self, on_add: impl FnOnce(&str)) -> bool {
        if !self.show_add() {
            return false;
        }
        let value = self.query.trim().to_string();
        self.query.clear();
        on_add(&value);
        true
    }

    pub fn choose(&mut self, value: &str, on_change: impl FnOnce(&str)) -> bool {
        if !self.options.iter().any(|option| option == value) {
            return false;
        }
        self.query.clear();
        on_change(value);
        true
    }
}
