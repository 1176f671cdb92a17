use serde::{Deserialize, Serialize};

/// Error body returned by the persistence API.
///
/// Both fields are optional: some handlers answer with `{ "error": ... }`,
/// others with `{ "message": ... }`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

pub mod raw {
    use super::*;

    /// A loosely typed scalar as it appears in stored records.
    ///
    /// Records written by older clients carry amounts as numbers or strings
    /// and flags as booleans or strings, so every inbound scalar goes through
    /// this type.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum RawScalar {
        Flag(bool),
        Number(serde_json::Number),
        Text(String),
        Other(serde_json::Value),
    }

    impl RawScalar {
        /// Text rendering of the scalar. Arrays, objects and nulls render
        /// empty.
        pub fn as_text(&self) -> String {
            match self {
                Self::Flag(flag) => flag.to_string(),
                Self::Number(number) => number.to_string(),
                Self::Text(text) => text.clone(),
                Self::Other(_) => String::new(),
            }
        }

        pub fn is_true(&self) -> bool {
            match self {
                Self::Flag(flag) => *flag,
                Self::Text(text) => text.trim().eq_ignore_ascii_case("true"),
                Self::Number(_) | Self::Other(_) => false,
            }
        }
    }

    /// Identifier shapes accepted from the backend.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum RawId {
        /// Extended JSON object id: `{ "$oid": "..." }`.
        ObjectId {
            #[serde(rename = "$oid")]
            oid: String,
        },
        Scalar(RawScalar),
    }

    impl RawId {
        pub fn as_text(&self) -> String {
            match self {
                Self::ObjectId { oid } => oid.clone(),
                Self::Scalar(scalar) => scalar.as_text(),
            }
        }
    }

    /// A stored lending/borrowing record exactly as the API returns it.
    ///
    /// Several fields have legacy aliases; the engine decides which one wins.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct RawRecord {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        pub object_id: Option<RawId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<RawId>,
        /// Set by insert acknowledgements (`{ "insertedId": ... }`).
        #[serde(rename = "insertedId", skip_serializing_if = "Option::is_none")]
        pub inserted_id: Option<RawId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub item: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub person: Option<RawScalar>,
        #[serde(rename = "toFrom", skip_serializing_if = "Option::is_none")]
        pub to_from: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub from: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to: Option<RawScalar>,
        #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
        pub due_date: Option<RawScalar>,
        #[serde(rename = "givenDate", skip_serializing_if = "Option::is_none")]
        pub given_date: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub date: Option<RawScalar>,
        #[serde(rename = "returnDate", skip_serializing_if = "Option::is_none")]
        pub return_date: Option<RawScalar>,
        #[serde(rename = "return_date", skip_serializing_if = "Option::is_none")]
        pub return_date_snake: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<RawScalar>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub kind: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub returned: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<RawScalar>,
        #[serde(rename = "archivedAt", skip_serializing_if = "Option::is_none")]
        pub archived_at: Option<RawScalar>,
        #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
        pub created_at: Option<RawScalar>,
    }

    /// List endpoints answer with either an array or a single object.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum RawPayload {
        Many(Vec<RawRecord>),
        One(RawRecord),
    }

    impl RawPayload {
        pub fn into_records(self) -> Vec<RawRecord> {
            match self {
                Self::Many(records) => records,
                Self::One(record) => vec![record],
            }
        }
    }
}

pub mod record {
    use super::*;
    use crate::raw::RawScalar;

    /// Request body for `POST /new-list`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NewRecord {
        pub user_id: String,
        /// Numeric when the amount parses, text otherwise.
        pub amount: RawScalar,
        pub person: String,
        pub due_date: String,
        pub return_date: String,
        /// `lent` or `borrow`.
        pub category: String,
        pub returned: bool,
    }

    /// Request body for `PUT /new-list/{id}`.
    ///
    /// Absent fields are omitted from the JSON and left untouched by the
    /// server.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecordUpdate {
        /// Numeric when the stripped amount parses, text otherwise.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<RawScalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub person: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub due_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub return_date: Option<String>,
    }

    impl RecordUpdate {
        pub fn is_empty(&self) -> bool {
            self.amount.is_none()
                && self.person.is_none()
                && self.due_date.is_none()
                && self.return_date.is_none()
        }
    }

    /// Request body for `POST /history`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ArchivePayload {
        pub user_id: String,
        /// Id of the active record being archived.
        pub source_id: String,
        /// Numeric when the stripped amount parses, text otherwise.
        pub amount: RawScalar,
        pub person: String,
        pub due_date: String,
        pub return_date: String,
        pub category: String,
        pub returned: bool,
        /// RFC3339 timestamp of the archive transition.
        pub archived_at: String,
    }
}
