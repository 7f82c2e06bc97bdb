//! The record form shared by the Add and Edit dialogs.
//!
//! A form is built from an optional initial record: `None` gives an empty
//! Add form, `Some` gives an Edit form pre-populated from a copy of the
//! record. The form never touches the cache; it only yields a candidate.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::StudentRecord;
use crate::sync::{Mutation, MutationKind};

/// Maximum length for the name and school fields.
pub const MAX_TEXT_FIELD_LENGTH: usize = 100;

/// `YYYY-MM-DD`
const BIRTH_DATE_LENGTH: usize = 10;

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    BirthDate,
    SchoolCategory,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::FullName,
        FormField::BirthDate,
        FormField::SchoolCategory,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::FullName => "Full name",
            FormField::BirthDate => "Birth date",
            FormField::SchoolCategory => "School",
        }
    }

    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            FormField::FullName => FormField::BirthDate,
            FormField::BirthDate => FormField::SchoolCategory,
            FormField::SchoolCategory => FormField::FullName,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            FormField::FullName => FormField::SchoolCategory,
            FormField::BirthDate => FormField::FullName,
            FormField::SchoolCategory => FormField::BirthDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    CollectingInput,
    /// Handed to the store; waiting for the outcome.
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Full name is required")]
    MissingName,

    #[error("Birth date must be YYYY-MM-DD")]
    InvalidBirthDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForm {
    id: Option<i64>,
    pub full_name: String,
    pub birth_date: String,
    pub school_category: String,
    pub focus: FormField,
    pub phase: FormPhase,
    pub error: Option<FormError>,
}

impl RecordForm {
    pub fn new(initial: Option<&StudentRecord>) -> Self {
        match initial {
            Some(record) => Self {
                id: record.id,
                full_name: record.full_name.clone(),
                birth_date: record
                    .birth_date
                    .map(|d| d.format(BIRTH_DATE_FORMAT).to_string())
                    .unwrap_or_default(),
                school_category: record.school_category.clone(),
                focus: FormField::FullName,
                phase: FormPhase::CollectingInput,
                error: None,
            },
            None => Self {
                id: None,
                full_name: String::new(),
                birth_date: String::new(),
                school_category: String::new(),
                focus: FormField::FullName,
                phase: FormPhase::CollectingInput,
                error: None,
            },
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn kind(&self) -> MutationKind {
        if self.is_edit() {
            MutationKind::Update
        } else {
            MutationKind::Create
        }
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit student"
        } else {
            "Add student"
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::BirthDate => &self.birth_date,
            FormField::SchoolCategory => &self.school_category,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FullName => &mut self.full_name,
            FormField::BirthDate => &mut self.birth_date,
            FormField::SchoolCategory => &mut self.school_category,
        }
    }

    /// Apply one keystroke. Ignored once the form has been submitted.
    pub fn apply(&mut self, input: FormInput) {
        if self.phase == FormPhase::Submitted {
            return;
        }
        match input {
            FormInput::Char(c) => {
                let field = self.focus;
                let current_len = self.value(field).chars().count();
                if can_add_char(field, current_len, c) {
                    self.value_mut(field).push(c);
                    self.error = None;
                }
            }
            FormInput::Backspace => {
                let field = self.focus;
                self.value_mut(field).pop();
                self.error = None;
            }
            FormInput::NextField => self.focus = self.focus.next(),
            FormInput::PrevField => self.focus = self.focus.prev(),
        }
    }

    /// Build the record to persist from the current field values.
    pub fn candidate(&self) -> Result<StudentRecord, FormError> {
        if self.full_name.is_empty() {
            return Err(FormError::MissingName);
        }
        let birth_date = match self.birth_date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT)
                    .map_err(|_| FormError::InvalidBirthDate)?,
            ),
        };
        Ok(StudentRecord {
            id: self.id,
            full_name: self.full_name.clone(),
            birth_date,
            school_category: self.school_category.clone(),
        })
    }

    /// The create or update this form submits.
    pub fn mutation(&self) -> Result<Mutation, FormError> {
        let candidate = self.candidate()?;
        Ok(if candidate.id.is_some() {
            Mutation::Update(candidate)
        } else {
            Mutation::Create(candidate)
        })
    }
}

/// Check if a character should be accepted into `field`
pub fn can_add_char(field: FormField, current_len: usize, c: char) -> bool {
    match field {
        FormField::BirthDate => current_len < BIRTH_DATE_LENGTH && (c.is_ascii_digit() || c == '-'),
        FormField::FullName | FormField::SchoolCategory => {
            current_len < MAX_TEXT_FIELD_LENGTH && !c.is_control()
        }
    }
}
