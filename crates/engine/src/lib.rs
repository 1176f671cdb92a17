//! Lending/borrowing ledger logic for Reeni.
//!
//! The crate turns loosely typed records coming from the persistence API
//! into [`Transaction`] and [`HistoryItem`] values and owns the view state
//! of the dashboard (active records) and the history (archived records).
//!
//! Nothing here talks HTTP or touches the filesystem: the remote API is
//! reached through [`RecordStore`], time through [`Clock`], user
//! confirmation through [`Confirm`] and the history snapshot through
//! [`HistoryCache`].

pub use archive::{ArchiveSaga, ArchiveStage};
pub use clock::{Clock, FixedClock, SystemClock};
pub use confirm::{Confirm, Outcome};
pub use dashboard::{Dashboard, ReturnAction, Tab};
pub use error::EngineError;
pub use forms::{EditForm, EntryForm};
pub use history::{History, HistoryCache, MemoryHistoryCache};
pub use normalize::{normalize, normalize_history, normalize_payload};
pub use pagination::Pager;
pub use profile::{Identity, Profile};
pub use record::{CURRENCY_GLYPH, Category, HistoryItem, Transaction};
pub use signals::{ChangeFeed, ChangeSignal, Subscription};
pub use store::{RecordStore, RemoteError};

mod archive;
mod clock;
mod confirm;
mod dashboard;
mod error;
mod forms;
mod history;
mod normalize;
mod pagination;
mod profile;
pub mod record;
mod signals;
mod store;

pub type ResultEngine<T> = Result<T, EngineError>;

/// Where a view is in its load cycle.
///
/// `Loading { first: true }` means nothing has been shown yet and a full
/// loading indicator is appropriate; `first: false` is a background refresh
/// over data that is already on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Initial,
    Loading {
        first: bool,
    },
    Ready,
}
