//! Form field value objects

use crate::mask::{self, MaskKind};

/// One entry of a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Id submitted to the API
    pub value: String,
    /// Text shown to the user
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// State of a select field
#[derive(Debug, Clone, Default)]
pub struct Choice {
    pub options: Vec<SelectOption>,
    pub selected: Option<usize>,
    /// Name typed into a creatable select that is not among the options
    pub typed: String,
    pub creatable: bool,
}

/// Type-safe field values
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Choice(Choice),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub is_multiline: bool,
    /// Mask reapplied after every edit
    pub mask: Option<MaskKind>,
    /// Cursor position in chars
    pub cursor: usize,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &str, label: &str, is_multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
            is_multiline,
            mask: None,
            cursor: 0,
        }
    }

    /// Create a text field that reformats itself with `kind`
    pub fn masked(name: &str, label: &str, kind: MaskKind) -> Self {
        Self {
            mask: Some(kind),
            ..Self::text(name, label, false)
        }
    }

    /// Create a select field
    pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self {
            value: FieldValue::Choice(Choice {
                options,
                ..Default::default()
            }),
            ..Self::text(name, label, false)
        }
    }

    /// Create a select field that also accepts a typed new entry
    pub fn creatable_select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self {
            value: FieldValue::Choice(Choice {
                options,
                creatable: true,
                ..Default::default()
            }),
            ..Self::text(name, label, false)
        }
    }

    /// Builder: set the initial text value
    pub fn with_text(mut self, value: &str) -> Self {
        self.set_text(value);
        self
    }

    pub fn is_select(&self) -> bool {
        matches!(self.value, FieldValue::Choice(_))
    }

    /// Get the text value (returns empty string for select fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice(_) => "",
        }
    }

    /// Set the text value, reapplying the mask when there is one
    pub fn set_text(&mut self, value: &str) {
        if let FieldValue::Text(s) = &mut self.value {
            match self.mask {
                Some(kind) => {
                    let masked = mask::reformat(kind, value);
                    *s = masked.text;
                    self.cursor = masked.cursor;
                }
                None => {
                    *s = value.to_string();
                    self.cursor = s.chars().count();
                }
            }
        }
    }

    /// Currently selected option of a select field
    pub fn selected(&self) -> Option<&SelectOption> {
        match &self.value {
            FieldValue::Choice(choice) => choice.selected.and_then(|i| choice.options.get(i)),
            FieldValue::Text(_) => None,
        }
    }

    /// Id of the selected option
    pub fn selected_value(&self) -> Option<String> {
        self.selected().map(|o| o.value.clone())
    }

    /// New entry typed into a creatable select, if any
    pub fn typed_value(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Choice(choice) if !choice.typed.trim().is_empty() => {
                Some(choice.typed.trim())
            }
            _ => None,
        }
    }

    /// Replace the options of a select field, keeping the selection by value
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        let current = self.selected_value();
        if let FieldValue::Choice(choice) = &mut self.value {
            choice.options = options;
            choice.selected = None;
        }
        self.select_value(current.as_deref());
    }

    /// Select the option whose value equals `value`, or clear the selection
    pub fn select_value(&mut self, value: Option<&str>) {
        if let FieldValue::Choice(choice) = &mut self.value {
            choice.selected =
                value.and_then(|v| choice.options.iter().position(|o| o.value == v));
            if choice.selected.is_some() {
                choice.typed.clear();
            }
        }
    }

    /// Clear the selection of a select field
    pub fn clear_selection(&mut self) {
        self.select_value(None);
    }

    /// Select the next option (wraps around)
    pub fn next_option(&mut self) {
        if let FieldValue::Choice(choice) = &mut self.value {
            let count = choice.options.len();
            if count == 0 {
                return;
            }
            choice.selected = Some(match choice.selected {
                Some(i) => (i + 1) % count,
                None => 0,
            });
            choice.typed.clear();
        }
    }

    /// Select the previous option (wraps around)
    pub fn prev_option(&mut self) {
        if let FieldValue::Choice(choice) = &mut self.value {
            let count = choice.options.len();
            if count == 0 {
                return;
            }
            choice.selected = Some(match choice.selected {
                Some(0) | None => count - 1,
                Some(i) => i - 1,
            });
            choice.typed.clear();
        }
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => {
                if let Some(kind) = self.mask {
                    let mut raw = s.clone();
                    raw.push(c);
                    let masked = mask::reformat(kind, &raw);
                    *s = masked.text;
                    self.cursor = masked.cursor;
                } else {
                    let at = byte_offset(s, self.cursor);
                    s.insert(at, c);
                    self.cursor += 1;
                }
            }
            FieldValue::Choice(choice) => {
                if choice.creatable {
                    choice.typed.push(c);
                    choice.selected = None;
                } else if let Some(i) = choice.options.iter().position(|o| {
                    o.label
                        .chars()
                        .next()
                        .is_some_and(|first| first.to_lowercase().eq(c.to_lowercase()))
                }) {
                    choice.selected = Some(i);
                }
            }
        }
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                if let Some(kind) = self.mask {
                    let mut digits = mask::digits_only(s);
                    digits.pop();
                    let masked = mask::reformat(kind, &digits);
                    *s = masked.text;
                    self.cursor = masked.cursor;
                } else if self.cursor > 0 {
                    let at = byte_offset(s, self.cursor - 1);
                    s.remove(at);
                    self.cursor -= 1;
                }
            }
            FieldValue::Choice(choice) => {
                if !choice.typed.is_empty() {
                    choice.typed.pop();
                } else {
                    choice.selected = None;
                }
            }
        }
    }

    /// Move the cursor one char left (select fields cycle instead)
    pub fn cursor_left(&mut self) {
        if self.is_select() {
            self.prev_option();
        } else if self.mask.is_none() {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Move the cursor one char right (select fields cycle instead)
    pub fn cursor_right(&mut self) {
        if self.is_select() {
            self.next_option();
        } else if self.mask.is_none() {
            let len = self.as_text().chars().count();
            self.cursor = (self.cursor + 1).min(len);
        }
    }

    pub fn cursor_home(&mut self) {
        if self.mask.is_none() {
            self.cursor = 0;
        }
    }

    pub fn cursor_end(&mut self) {
        if let FieldValue::Text(s) = &self.value {
            self.cursor = s.chars().count();
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Choice(choice) => {
                choice.selected = None;
                choice.typed.clear();
            }
        }
        self.cursor = 0;
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice(choice) => {
                if !choice.typed.is_empty() {
                    format!("+ {}", choice.typed)
                } else if let Some(option) = self.selected() {
                    option.label.clone()
                } else {
                    String::new()
                }
            }
        }
    }
}

/// Byte index of the char at `char_index`, or the end of `s`
fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cities() -> Vec<SelectOption> {
        vec![
            SelectOption::new("1", "Campinas"),
            SelectOption::new("2", "São Paulo"),
        ]
    }

    #[test]
    fn test_text_insert_at_cursor() {
        let mut field = FormField::text("name", "Nome", false).with_text("Mra");
        field.cursor_left();
        field.cursor_left();
        field.insert_char('a');
        assert_eq!(field.as_text(), "Mara");
        assert_eq!(field.cursor, 2);
    }

    #[test]
    fn test_text_backspace_handles_multibyte() {
        let mut field = FormField::text("street", "Rua", false).with_text("Av. Paulistã");
        field.backspace();
        assert_eq!(field.as_text(), "Av. Paulist");
        field.cursor_home();
        field.backspace();
        assert_eq!(field.as_text(), "Av. Paulist");
    }

    #[test]
    fn test_masked_field_formats_while_typing() {
        let mut field = FormField::masked("tel", "Telefone", MaskKind::Phone);
        for c in "11987654321".chars() {
            field.insert_char(c);
        }
        assert_eq!(field.as_text(), "(11) 98765-4321");
        assert_eq!(field.cursor, field.as_text().chars().count());
    }

    #[test]
    fn test_masked_field_ignores_letters() {
        let mut field = FormField::masked("cep", "CEP", MaskKind::PostalCode);
        field.insert_char('x');
        assert_eq!(field.as_text(), "");
        assert_eq!(field.cursor, 0);
    }

    #[test]
    fn test_masked_backspace_removes_last_digit() {
        let mut field = FormField::masked("cep", "CEP", MaskKind::PostalCode).with_text("013101");
        assert_eq!(field.as_text(), "01310-1");
        field.backspace();
        assert_eq!(field.as_text(), "01310");
        assert_eq!(field.cursor, 5);
    }

    #[test]
    fn test_masked_cursor_stays_at_end() {
        let mut field = FormField::masked("document", "Documento", MaskKind::TaxId)
            .with_text("12345678901");
        field.cursor_left();
        field.cursor_home();
        assert_eq!(field.cursor, 14);
    }

    #[test]
    fn test_select_cycles_options() {
        let mut field = FormField::select("city_id", "Cidade", cities());
        assert!(field.selected().is_none());
        field.cursor_right();
        assert_eq!(field.selected_value().as_deref(), Some("1"));
        field.cursor_right();
        field.cursor_right();
        assert_eq!(field.selected_value().as_deref(), Some("1"));
        field.cursor_left();
        assert_eq!(field.selected_value().as_deref(), Some("2"));
    }

    #[test]
    fn test_select_value_and_clear() {
        let mut field = FormField::select("city_id", "Cidade", cities());
        field.select_value(Some("2"));
        assert_eq!(field.display_value(), "São Paulo");
        field.select_value(Some("missing"));
        assert!(field.selected().is_none());
        field.select_value(Some("1"));
        field.clear_selection();
        assert_eq!(field.display_value(), "");
    }

    #[test]
    fn test_set_options_keeps_selection() {
        let mut field = FormField::select("city_id", "Cidade", cities());
        field.select_value(Some("2"));
        field.set_options(vec![
            SelectOption::new("2", "São Paulo"),
            SelectOption::new("3", "Santos"),
        ]);
        assert_eq!(field.selected_value().as_deref(), Some("2"));
    }

    #[test]
    fn test_creatable_select_accepts_typed_value() {
        let mut field = FormField::creatable_select("brand_id", "Marca", cities());
        field.next_option();
        for c in "Nova".chars() {
            field.insert_char(c);
        }
        assert!(field.selected().is_none());
        assert_eq!(field.typed_value(), Some("Nova"));
        assert_eq!(field.display_value(), "+ Nova");
        field.next_option();
        assert!(field.typed_value().is_none());
    }

    #[test]
    fn test_plain_select_jumps_by_first_letter() {
        let mut field = FormField::select("city_id", "Cidade", cities());
        field.insert_char('s');
        assert_eq!(field.selected_value().as_deref(), Some("2"));
    }
}
