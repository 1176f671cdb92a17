//! Add-entry and edit forms.

use api_types::record::{NewRecord, RecordUpdate};

use crate::{
    Clock, EngineError, ResultEngine,
    record::{Category, Transaction, amount_scalar, display_amount, strip_amount},
};

/// The add-entry form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryForm {
    /// Unset until the user picks lent or borrowed.
    pub mode: Option<Category>,
    pub amount: String,
    /// Who received (lent) or gave (borrowed) the money.
    pub person: String,
    pub given_date: String,
    pub return_date: String,
}

impl EntryForm {
    /// Empty form with the given date set to today.
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            given_date: clock.today_string(),
            ..Self::default()
        }
    }

    /// Clears every field but the mode; the given date goes back to today.
    pub fn reset(&mut self, clock: &impl Clock) {
        *self = Self {
            mode: self.mode,
            ..Self::new(clock)
        };
    }

    /// Checks the form and builds the create request for `user_id`.
    pub fn validate(&self, user_id: &str) -> ResultEngine<NewRecord> {
        let Some(mode) = self.mode else {
            return Err(EngineError::Validation(
                "choose whether you lent or borrowed".to_string(),
            ));
        };
        validate_amount(&self.amount)?;

        Ok(NewRecord {
            user_id: user_id.to_string(),
            amount: amount_scalar(&self.amount),
            person: self.person.trim().to_string(),
            due_date: self.given_date.trim().to_string(),
            return_date: self.return_date.trim().to_string(),
            category: mode.as_str().to_string(),
            returned: false,
        })
    }
}

fn validate_amount(amount: &str) -> ResultEngine<()> {
    if amount.trim().is_empty() {
        return Err(EngineError::Validation("amount is required".to_string()));
    }
    match strip_amount(amount).parse::<f64>() {
        Ok(value) if value > 0.0 => Ok(()),
        _ => Err(EngineError::Validation(format!(
            "invalid amount: {}",
            amount.trim()
        ))),
    }
}

/// The edit modal, pre-filled from one record.
///
/// Only fields the user actually set end up in the update, so fields the
/// form does not touch keep their values both locally and on the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditForm {
    record: Transaction,
    edits: Edits,
}

/// Raw text of the edited fields; `None` means untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Edits {
    amount: Option<String>,
    person: Option<String>,
    due_date: Option<String>,
    return_date: Option<String>,
}

impl EditForm {
    pub fn open(record: &Transaction) -> Self {
        Self {
            record: record.clone(),
            edits: Edits::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn amount(&self) -> &str {
        self.edits.amount.as_deref().unwrap_or(&self.record.amount)
    }

    pub fn person(&self) -> &str {
        self.edits.person.as_deref().unwrap_or(&self.record.person)
    }

    pub fn due_date(&self) -> &str {
        self.edits
            .due_date
            .as_deref()
            .unwrap_or(&self.record.due_date)
    }

    pub fn return_date(&self) -> &str {
        self.edits
            .return_date
            .as_deref()
            .unwrap_or(&self.record.return_date)
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.edits.amount = Some(amount.into());
    }

    pub fn set_person(&mut self, person: impl Into<String>) {
        self.edits.person = Some(person.into());
    }

    pub fn set_due_date(&mut self, date: impl Into<String>) {
        self.edits.due_date = Some(date.into());
    }

    pub fn set_return_date(&mut self, date: impl Into<String>) {
        self.edits.return_date = Some(date.into());
    }

    /// Request body with the fields edited so far.
    ///
    /// The amount goes out as a JSON number whenever its stripped text
    /// parses, the same as on create.
    pub fn to_update(&self) -> RecordUpdate {
        RecordUpdate {
            amount: self.edits.amount.as_deref().map(amount_scalar),
            person: self.edits.person.as_ref().map(|v| v.trim().to_string()),
            due_date: self.edits.due_date.as_ref().map(|v| v.trim().to_string()),
            return_date: self
                .edits
                .return_date
                .as_ref()
                .map(|v| v.trim().to_string()),
        }
    }

    /// Merges the edited fields into `record`, rendering the amount the
    /// way a fetch would.
    pub fn apply_to(&self, record: &mut Transaction) {
        let update = self.to_update();
        if let Some(amount) = &update.amount {
            record.amount = display_amount(amount);
        }
        if let Some(person) = update.person {
            record.person = person;
        }
        if let Some(date) = update.due_date {
            record.due_date = date;
        }
        if let Some(date) = update.return_date {
            record.return_date = date;
        }
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let Some(amount) = &self.edits.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use api_types::raw::RawScalar;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap())
    }

    #[test]
    fn new_form_defaults_given_date_to_today() {
        let form = EntryForm::new(&clock());
        assert_eq!(form.given_date, "2024-02-29");
        assert!(form.mode.is_none());
    }

    #[test]
    fn mode_is_required() {
        let form = EntryForm {
            amount: "100".to_string(),
            ..EntryForm::new(&clock())
        };
        assert!(matches!(form.validate("u1"), Err(EngineError::Validation(_))));
    }

    #[test]
    fn amount_is_required_and_positive() {
        let mut form = EntryForm {
            mode: Some(Category::Lent),
            ..EntryForm::new(&clock())
        };
        assert_eq!(
            form.validate("u1"),
            Err(EngineError::Validation("amount is required".to_string()))
        );
        form.amount = "abc".to_string();
        assert!(form.validate("u1").is_err());
        form.amount = "0".to_string();
        assert!(form.validate("u1").is_err());
    }

    #[test]
    fn valid_form_builds_request() {
        let form = EntryForm {
            mode: Some(Category::Borrow),
            amount: " 250 ".to_string(),
            person: " Karim ".to_string(),
            ..EntryForm::new(&clock())
        };
        let record = form.validate("u1").unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.amount, RawScalar::Number(serde_json::Number::from(250)));
        assert_eq!(record.person, "Karim");
        assert_eq!(record.due_date, "2024-02-29");
        assert_eq!(record.category, "borrow");
        assert!(!record.returned);
    }

    #[test]
    fn reset_keeps_mode() {
        let mut form = EntryForm {
            mode: Some(Category::Borrow),
            amount: "250".to_string(),
            given_date: "2020-01-01".to_string(),
            ..EntryForm::default()
        };
        form.reset(&clock());
        assert_eq!(form.mode, Some(Category::Borrow));
        assert!(form.amount.is_empty());
        assert_eq!(form.given_date, "2024-02-29");
    }

    #[test]
    fn edit_form_tracks_only_set_fields() {
        let record = Transaction {
            id: "1".to_string(),
            amount: "৳100".to_string(),
            person: "Rahim".to_string(),
            ..Default::default()
        };
        let mut form = EditForm::open(&record);
        assert_eq!(form.amount(), "৳100");
        assert!(form.to_update().is_empty());

        form.set_person("Karim");
        assert_eq!(form.person(), "Karim");
        assert_eq!(form.to_update().person.as_deref(), Some("Karim"));
        assert!(form.to_update().amount.is_none());
    }

    #[test]
    fn edited_amount_is_sent_as_number() {
        let mut form = EditForm::open(&Transaction::default());
        form.set_amount("৳1,200.50");
        assert_eq!(
            form.to_update().amount,
            Some(RawScalar::Number(serde_json::Number::from_f64(1200.5).unwrap()))
        );
        assert_eq!(
            serde_json::to_value(form.to_update()).unwrap(),
            serde_json::json!({ "amount": 1200.5 })
        );
    }

    #[test]
    fn apply_to_leaves_other_fields() {
        let mut record = Transaction {
            id: "1".to_string(),
            amount: "৳100".to_string(),
            person: "Rahim".to_string(),
            return_date: "2024-03-01".to_string(),
            category: Category::Borrow,
            ..Default::default()
        };
        let mut form = EditForm::open(&record);
        form.set_amount("150");
        form.apply_to(&mut record);
        assert_eq!(record.amount, "৳150");
        assert_eq!(record.person, "Rahim");
        assert_eq!(record.return_date, "2024-03-01");
        assert_eq!(record.category, Category::Borrow);
    }
}
