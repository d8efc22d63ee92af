//! Contribution Form Input
//!
//! Raw text as typed into the add/edit form, validated into a
//! `NewContribution` before anything reaches the manager.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::contribution::{Contribution, NewContribution};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionForm {
    pub contributor_id: String,
    pub contributed_at: String,
    pub amount: String,
    pub comment: String,
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    pub contributor_id: Option<String>,
    pub contributed_at: Option<String>,
    pub amount: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.contributor_id.is_none() && self.contributed_at.is_none() && self.amount.is_none()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [&self.contributor_id, &self.contributed_at, &self.amount]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for FormErrors {}

impl ContributionForm {
    /// Form for a new contribution dated `today`
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            contributed_at: today.format(DATE_FORMAT).to_string(),
            ..Default::default()
        }
    }

    /// Form pre-filled from an existing record (edit mode)
    pub fn from_contribution(c: &Contribution) -> Self {
        Self {
            contributor_id: c.contributor_id.clone(),
            contributed_at: c.contributed_at.format(DATE_FORMAT).to_string(),
            amount: c.amount_usd.to_string(),
            comment: c.comment.clone().unwrap_or_default(),
        }
    }

    /// Parsed amount, if the text is a finite number
    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount.trim().parse::<f64>().ok().filter(|a| a.is_finite())
    }

    pub fn validate(&self) -> Result<NewContribution, FormErrors> {
        let mut errors = FormErrors::default();

        let contributor_id = self.contributor_id.trim();
        if contributor_id.is_empty() {
            errors.contributor_id = Some("Contributor is required.".into());
        }

        let date = self.contributed_at.trim();
        let contributed_at = if date.is_empty() {
            errors.contributed_at = Some("Date is required.".into());
            None
        } else {
            match NaiveDate::parse_from_str(date, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.contributed_at = Some("Date must be YYYY-MM-DD.".into());
                    None
                }
            }
        };

        let amount = match self.parsed_amount() {
            Some(a) if a > 0.0 => Some(a),
            _ => {
                errors.amount = Some("Amount must be greater than 0.".into());
                None
            }
        };

        match (contributed_at, amount) {
            (Some(contributed_at), Some(amount_usd)) if errors.is_empty() => {
                let comment = self.comment.trim();
                Ok(NewContribution {
                    contributor_id: contributor_id.to_string(),
                    contributed_at,
                    amount_usd,
                    comment: (!comment.is_empty()).then(|| comment.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}
