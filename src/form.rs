//! Input forms: new tracker, new entry and their validation.

use thiserror::Error;

/// Units offered by the unit selector. `custom` reveals a free-text field.
pub const UNIT_CHOICES: &[&str] = &[
    "kg", "lbs", "km", "miles", "reps", "minutes", "hours", "pages", "custom",
];

const CUSTOM_UNIT: &str = "custom";

/// Rejected input, shown to the user as a blocking alert
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a unit.")]
    MissingUnit,
    #[error("Enter a custom unit.")]
    EmptyCustomUnit,
    #[error("Please enter a description.")]
    EmptyDescription,
    #[error("Please enter a number greater than 0.")]
    InvalidValue,
}

/// Single-line text input with a byte-offset cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.cursor)
    }

    fn prev_boundary(&self, from: usize) -> usize {
        self.value[..from]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }
}

/// Which field of the new-tracker form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Unit,
    CustomUnit,
}

/// New-tracker form state
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerForm {
    pub description: TextInput,
    /// Index into [`UNIT_CHOICES`]; None is the "Select unit" placeholder
    pub unit: Option<usize>,
    pub custom_unit: TextInput,
    pub focus: FormField,
}

impl Default for TrackerForm {
    fn default() -> Self {
        TrackerForm {
            description: TextInput::new(),
            unit: None,
            custom_unit: TextInput::new(),
            focus: FormField::Description,
        }
    }
}

/// Validated fields for a new tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTracker {
    pub description: String,
    pub unit: String,
}

impl TrackerForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shown only when the "custom" unit is selected
    pub fn custom_unit_visible(&self) -> bool {
        self.selected_unit() == Some(CUSTOM_UNIT)
    }

    pub fn selected_unit(&self) -> Option<&'static str> {
        self.unit.and_then(|i| UNIT_CHOICES.get(i).copied())
    }

    /// Cycle the unit selection; the placeholder is never re-selected
    pub fn cycle_unit(&mut self, forward: bool) {
        let len = UNIT_CHOICES.len();
        self.unit = Some(match (self.unit, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
    }

    /// Move focus to the next visible field
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Description => FormField::Unit,
            FormField::Unit if self.custom_unit_visible() => FormField::CustomUnit,
            FormField::Unit | FormField::CustomUnit => FormField::Description,
        };
    }

    /// Move focus to the previous visible field
    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormField::Description if self.custom_unit_visible() => FormField::CustomUnit,
            FormField::Description => FormField::Unit,
            FormField::Unit => FormField::Description,
            FormField::CustomUnit => FormField::Unit,
        };
    }

    /// The text input under focus, if the focused field is a text field
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FormField::Description => Some(&mut self.description),
            FormField::CustomUnit => Some(&mut self.custom_unit),
            FormField::Unit => None,
        }
    }

    /// Validate without consuming the form: on error every field is kept.
    ///
    /// The unit is checked before the description.
    pub fn validate(&self) -> Result<NewTracker, ValidationError> {
        let unit = match self.selected_unit() {
            None => return Err(ValidationError::MissingUnit),
            Some(CUSTOM_UNIT) => {
                let custom = self.custom_unit.value.trim();
                if custom.is_empty() {
                    return Err(ValidationError::EmptyCustomUnit);
                }
                custom.to_string()
            }
            Some(unit) => unit.to_string(),
        };

        let description = self.description.value.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        Ok(NewTracker {
            description: description.to_string(),
            unit,
        })
    }

    /// Back to a blank form with the placeholder selected
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Parse an entry value: a finite number greater than zero
pub fn parse_entry_value(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidValue),
    }
}
