//! The expense entity and the field rules checked before it is persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored expense, as returned by every successful read or write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Server-assigned primary key.
    pub id: i32,
    pub title: String,
    pub amount: f64,
    pub note: String,
    pub tags: Vec<String>,
}

/// Request body accepted by create and update.
///
/// Absent fields take their zero value so that an omitted `title` or `tags`
/// is reported by [`ExpenseInput::validate`] instead of failing to parse.
/// Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseInput {
    pub title: String,
    pub amount: f64,
    pub note: String,
    pub tags: Vec<String>,
}

/// A single field rule violated by an [`ExpenseInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title error : this field should not empty.")]
    EmptyTitle,

    #[error("amount error : this field should not less than 0.")]
    NegativeAmount,

    #[error("tags error : this field should have at least 1.")]
    MissingTags,
}

impl ExpenseInput {
    /// Check the field rules in order: title, amount, tags.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered; later fields are not
    /// inspected once one rule fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.amount < 0.0 {
            return Err(ValidationError::NegativeAmount);
        }
        if self.tags.is_empty() {
            return Err(ValidationError::MissingTags);
        }
        Ok(())
    }

    /// Attach a store-assigned id, producing the full [`Expense`].
    pub fn with_id(self, id: i32) -> Expense {
        Expense {
            id,
            title: self.title,
            amount: self.amount,
            note: self.note,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phone() -> ExpenseInput {
        ExpenseInput {
            title: "buy a new phone".into(),
            amount: 39000.0,
            note: "buy a new phone".into(),
            tags: vec!["gadget".into(), "shopping".into()],
        }
    }

    #[test]
    fn valid_input_passes() {
        assert_eq!(phone().validate(), Ok(()));
    }

    #[test]
    fn zero_amount_is_allowed() {
        let input = ExpenseInput { amount: 0.0, ..phone() };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_title_is_reported_first() {
        // Every field is wrong; only the title error comes back.
        let input = ExpenseInput {
            title: String::new(),
            amount: -1.0,
            note: String::new(),
            tags: vec![],
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
        assert_eq!(err.to_string(), "title error : this field should not empty.");
    }

    #[test]
    fn negative_amount_is_reported_before_tags() {
        let input = ExpenseInput {
            amount: -199.0,
            tags: vec![],
            ..phone()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "amount error : this field should not less than 0."
        );
    }

    #[test]
    fn empty_tags_rejected() {
        let input = ExpenseInput { tags: vec![], ..phone() };
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "tags error : this field should have at least 1.");
    }

    #[test]
    fn missing_fields_default_then_fail_validation() {
        let input: ExpenseInput = serde_json::from_value(json!({"amount": 12})).unwrap();
        assert_eq!(input.validate(), Err(ValidationError::EmptyTitle));

        let input: ExpenseInput =
            serde_json::from_value(json!({"title": "lunch", "amount": 12})).unwrap();
        assert_eq!(input.validate(), Err(ValidationError::MissingTags));
    }

    #[test]
    fn client_supplied_id_is_ignored() {
        let input: ExpenseInput = serde_json::from_value(json!({
            "id": 77,
            "title": "buy a new phone",
            "amount": 39000,
            "note": "buy a new phone",
            "tags": ["gadget", "shopping"]
        }))
        .unwrap();
        assert_eq!(input, phone());
    }

    #[test]
    fn with_id_keeps_fields() {
        let expense = phone().with_id(5);
        assert_eq!(expense.id, 5);
        assert_eq!(expense.title, "buy a new phone");
        assert_eq!(expense.tags, vec!["gadget", "shopping"]);
    }
}
