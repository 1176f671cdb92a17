//! Canonical record shapes shown by the dashboard and the history.

use std::{fmt, str::FromStr};

use api_types::raw::RawScalar;
use serde::{Deserialize, Serialize};

/// Currency prefix for numeric amounts (Bangladeshi taka).
pub const CURRENCY_GLYPH: char = '৳';

/// Which side of the loan the signed-in user is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// The user gave the money.
    #[default]
    Lent,
    /// The user received the money.
    Borrow,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lent => "lent",
            Self::Borrow => "borrow",
        }
    }

    /// Infers the category from free-form category/type text.
    ///
    /// Matching is a case-insensitive substring test: anything mentioning
    /// "borrow" is [`Category::Borrow`], everything else (including empty
    /// text) is [`Category::Lent`].
    pub fn infer(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if text.contains("borrow") {
            Self::Borrow
        } else {
            Self::Lent
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lent" | "lend" => Ok(Self::Lent),
            "borrow" | "borrowed" => Ok(Self::Borrow),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// An active lending/borrowing record.
///
/// Every field is plain text except `returned`; absent source fields are
/// empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Display amount, currency-prefixed when the source was numeric.
    pub amount: String,
    pub person: String,
    /// Date the money changed hands.
    pub due_date: String,
    pub return_date: String,
    pub category: Category,
    pub returned: bool,
}

/// A record that went through the archive transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(flatten)]
    pub record: Transaction,
    pub archived_at: String,
}

/// Renders a raw amount for display: numbers get the currency prefix,
/// anything else passes through as text.
pub fn display_amount(amount: &RawScalar) -> String {
    match amount {
        RawScalar::Number(number) => format!("{CURRENCY_GLYPH}{number}"),
        other => other.as_text(),
    }
}

/// Drops everything but ASCII digits and the decimal point.
pub fn strip_amount(amount: &str) -> String {
    amount
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect()
}

/// Amount as sent to the API: numeric when the stripped text parses.
pub fn amount_scalar(amount: &str) -> RawScalar {
    let stripped = strip_amount(amount);
    match stripped.parse::<serde_json::Number>() {
        Ok(number) => RawScalar::Number(number),
        Err(_) => RawScalar::Text(stripped),
    }
}

/// Prefix of the placeholder ids given to records the server sent without
/// an id.
pub const DRAFT_PREFIX: &str = "draft-";

/// Whether `id` is a client-side placeholder the server does not know.
pub fn is_draft_id(id: &str) -> bool {
    id.starts_with(DRAFT_PREFIX)
}

/// Whether `id` looks like a server-assigned object id (24 hex digits).
pub fn is_object_id(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|ch| ch.is_ascii_hexdigit())
}
