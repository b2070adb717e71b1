//! Application state for the renta form.
//!
//! All state lives in [`AppState`] and only changes through [`update`], which
//! is pure: it takes the current state and an [`Action`] and returns the next
//! state. Storage is touched elsewhere (see [`crate::app::RentaApp`]) and its
//! outcomes come back in as actions.

use renta_core::validation::{FormField, ValidationError, parse_salary};
use renta_core::{SalaryRecord, TaxComputation, compute_tax};

/// Raw text of the three form inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub salary: String,
}

impl FormState {
    /// Required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<FormField> {
        [
            (FormField::FirstName, &self.first_name),
            (FormField::LastName, &self.last_name),
            (FormField::Salary, &self.salary),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// True when every required field has text.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FieldsIncomplete(Vec<FormField>),
    InvalidSalary(String),
    NotCalculated,
    Saved,
    Deleted,
    NotFound,
    LoadFailed(String),
    SaveFailed(String),
    DeleteFailed(String),
}

impl Notice {
    /// Maps a rejected save to the notice shown for it.
    pub fn from_validation(err: &ValidationError) -> Self {
        match err {
            ValidationError::MissingField(field) => Notice::FieldsIncomplete(vec![*field]),
            ValidationError::NotCalculated => Notice::NotCalculated,
            other => Notice::InvalidSalary(other.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Saved | Notice::Deleted)
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Notice::FieldsIncomplete(fields) => {
                let names: Vec<&str> = fields.iter().map(FormField::label).collect();
                format!(
                    "Please complete the fields and press Calculate ({} missing).",
                    names.join(", ")
                )
            }
            Notice::InvalidSalary(reason) => format!("The salary could not be used: {reason}."),
            Notice::NotCalculated => "Press Calculate before saving.".to_string(),
            Notice::Saved => "Result saved successfully.".to_string(),
            Notice::Deleted => "Result deleted successfully.".to_string(),
            Notice::NotFound => "No saved result has that id.".to_string(),
            Notice::LoadFailed(reason) => format!("Saved results could not be loaded: {reason}"),
            Notice::SaveFailed(reason) => format!("The result was not saved: {reason}"),
            Notice::DeleteFailed(reason) => format!("The result was not deleted: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EditFirstName(String),
    EditLastName(String),
    EditSalary(String),
    Calculate,
    Dismiss,
    RecordsLoaded(Vec<SalaryRecord>),
    LoadFailed(String),
    SaveRejected(ValidationError),
    Saved(Vec<SalaryRecord>),
    SaveFailed(String),
    Deleted {
        records: Vec<SalaryRecord>,
        removed: bool,
    },
    DeleteFailed(String),
}

/// Everything the screen shows.
///
/// `result` is the transient calculation for the current form. Any edit
/// clears it, so a present result always matches the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub form: FormState,
    pub result: Option<TaxComputation>,
    /// Saved results as last confirmed by storage.
    pub records: Vec<SalaryRecord>,
    pub notice: Option<Notice>,
}

/// Applies `action` to `state`.
pub fn update(
    mut state: AppState,
    action: Action,
) -> AppState {
    match action {
        Action::EditFirstName(text) => {
            state.form.first_name = text;
            state.result = None;
        }
        Action::EditLastName(text) => {
            state.form.last_name = text;
            state.result = None;
        }
        Action::EditSalary(text) => {
            state.form.salary = text;
            state.result = None;
        }
        Action::Calculate => {
            if !state.form.is_complete() {
                state.result = None;
                state.notice = Some(Notice::FieldsIncomplete(state.form.missing_fields()));
                return state;
            }
            let computed = parse_salary(&state.form.salary)
                .and_then(|gross| compute_tax(gross).map_err(ValidationError::from));
            match computed {
                Ok(computation) => {
                    state.result = Some(computation);
                    state.notice = None;
                }
                Err(err) => {
                    state.result = None;
                    state.notice = Some(Notice::InvalidSalary(err.to_string()));
                }
            }
        }
        Action::Dismiss => state.notice = None,
        Action::RecordsLoaded(records) => state.records = records,
        Action::LoadFailed(reason) => {
            state.records.clear();
            state.notice = Some(Notice::LoadFailed(reason));
        }
        Action::SaveRejected(err) => state.notice = Some(Notice::from_validation(&err)),
        Action::Saved(records) => {
            state.records = records;
            state.notice = Some(Notice::Saved);
        }
        Action::SaveFailed(reason) => state.notice = Some(Notice::SaveFailed(reason)),
        Action::Deleted { records, removed } => {
            state.records = records;
            state.notice = Some(if removed {
                Notice::Deleted
            } else {
                Notice::NotFound
            });
        }
        Action::DeleteFailed(reason) => state.notice = Some(Notice::DeleteFailed(reason)),
    }
    state
}

/// Builds the record a save would persist, or explains why the form cannot
/// be saved yet.
pub fn prepare_save(state: &AppState) -> Result<SalaryRecord, ValidationError> {
    if let Some(field) = state.form.missing_fields().first() {
        return Err(ValidationError::MissingField(*field));
    }
    let computation = state.result.as_ref().ok_or(ValidationError::NotCalculated)?;
    Ok(SalaryRecord::new(
        state.form.first_name.trim(),
        state.form.last_name.trim(),
        computation,
    ))
}
