//! The "mark returned" transition: copy to history, then drop from the
//! active list.

use api_types::record::ArchivePayload;

use crate::{
    Clock, EngineError, RecordStore, ResultEngine,
    record::{Transaction, amount_scalar},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveStage {
    /// Nothing sent yet.
    Pending,
    /// History holds the copy; the active record still exists.
    HistoryCreated,
    /// The record only exists in history.
    Completed,
}

/// Two dependent remote calls with an explicit intermediate stage.
///
/// The active record is deleted only after the history copy has been
/// acknowledged. A failed delete leaves the saga in
/// [`ArchiveStage::HistoryCreated`]: the record then exists in both stores
/// and no compensating call is made.
#[derive(Clone, Debug)]
pub struct ArchiveSaga {
    record_id: String,
    payload: ArchivePayload,
    stage: ArchiveStage,
}

impl ArchiveSaga {
    /// Builds the history payload for `record`.
    ///
    /// The amount is stripped down to its numeric part and an empty return
    /// date becomes today's date.
    pub fn new(user_id: &str, record: &Transaction, clock: &impl Clock) -> Self {
        let return_date = if record.return_date.trim().is_empty() {
            clock.today_string()
        } else {
            record.return_date.clone()
        };

        let payload = ArchivePayload {
            user_id: user_id.to_string(),
            source_id: record.id.clone(),
            amount: amount_scalar(&record.amount),
            person: record.person.clone(),
            due_date: record.due_date.clone(),
            return_date,
            category: record.category.as_str().to_string(),
            returned: true,
            archived_at: clock.now().to_rfc3339(),
        };

        Self {
            record_id: record.id.clone(),
            payload,
            stage: ArchiveStage::Pending,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn payload(&self) -> &ArchivePayload {
        &self.payload
    }

    pub fn stage(&self) -> ArchiveStage {
        self.stage
    }

    /// Drives the saga forward from its current stage.
    pub async fn run<S: RecordStore>(&mut self, store: &S) -> ResultEngine<()> {
        if self.stage == ArchiveStage::Pending {
            store.create_history(&self.payload).await?;
            self.stage = ArchiveStage::HistoryCreated;
            tracing::debug!("history copy created for {}", self.record_id);
        }

        if self.stage == ArchiveStage::HistoryCreated {
            if let Err(source) = store.delete_active(&self.record_id).await {
                tracing::warn!(
                    "record {} copied to history but not removed from the active list: {source}",
                    self.record_id
                );
                return Err(EngineError::PartialArchive {
                    id: self.record_id.clone(),
                    source,
                });
            }
            self.stage = ArchiveStage::Completed;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, record::Category};
    use api_types::raw::RawScalar;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap())
    }

    fn record(return_date: &str) -> Transaction {
        Transaction {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".to_string(),
            amount: "৳1,500".to_string(),
            person: "Rahim".to_string(),
            due_date: "2024-06-01".to_string(),
            return_date: return_date.to_string(),
            category: Category::Borrow,
            returned: false,
        }
    }

    #[test]
    fn payload_defaults_return_date_to_today() {
        let saga = ArchiveSaga::new("u1", &record(""), &clock());
        assert_eq!(saga.payload().return_date, "2024-06-15");
        assert_eq!(saga.stage(), ArchiveStage::Pending);
    }

    #[test]
    fn payload_keeps_existing_return_date() {
        let saga = ArchiveSaga::new("u1", &record("2024-06-10"), &clock());
        assert_eq!(saga.payload().return_date, "2024-06-10");
    }

    #[test]
    fn payload_strips_amount_and_copies_fields() {
        let saga = ArchiveSaga::new("u1", &record(""), &clock());
        let payload = saga.payload();
        assert_eq!(
            payload.amount,
            RawScalar::Number(serde_json::Number::from(1500))
        );
        assert_eq!(payload.user_id, "u1");
        assert_eq!(payload.source_id, "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(payload.category, "borrow");
        assert!(payload.returned);
        assert_eq!(payload.archived_at, "2024-06-15T08:30:00+00:00");
    }
}
