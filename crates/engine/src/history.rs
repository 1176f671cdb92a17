//! View state of the archived records.

use std::{collections::HashMap, fmt};

use tokio::sync::watch;

use crate::{
    ChangeFeed, ChangeSignal, Clock, Confirm, EngineError, LoadState, Outcome, Pager, RecordStore,
    ResultEngine, Subscription,
    normalize::normalize_history_payload,
    record::{HistoryItem, is_object_id},
};

/// Per-user snapshot of the history list, used to paint before the server
/// answers.
pub trait HistoryCache {
    type Error: fmt::Display;

    fn load(&self, user_id: &str) -> Option<Vec<HistoryItem>>;

    fn store(&mut self, user_id: &str, items: &[HistoryItem]) -> Result<(), Self::Error>;
}

#[derive(Debug, Default)]
pub struct MemoryHistoryCache {
    entries: HashMap<String, Vec<HistoryItem>>,
}

impl HistoryCache for MemoryHistoryCache {
    type Error = std::convert::Infallible;

    fn load(&self, user_id: &str) -> Option<Vec<HistoryItem>> {
        self.entries.get(user_id).cloned()
    }

    fn store(&mut self, user_id: &str, items: &[HistoryItem]) -> Result<(), Self::Error> {
        self.entries.insert(user_id.to_string(), items.to_vec());
        Ok(())
    }
}

pub struct History<S, C, H> {
    store: S,
    clock: C,
    cache: H,
    user_id: String,
    feed: ChangeFeed,
    subscription: Subscription,
    items: Vec<HistoryItem>,
    pager: Pager,
    error: Option<String>,
    load: watch::Sender<LoadState>,
    loaded_once: bool,
}

impl<S: RecordStore, C: Clock, H: HistoryCache> History<S, C, H> {
    pub fn new(
        store: S,
        clock: C,
        cache: H,
        user_id: impl Into<String>,
        feed: &ChangeFeed,
    ) -> Self {
        Self {
            store,
            clock,
            cache,
            user_id: user_id.into(),
            feed: feed.clone(),
            subscription: feed.subscribe(),
            items: Vec::new(),
            pager: Pager::default(),
            error: None,
            load: watch::Sender::new(LoadState::Initial),
            loaded_once: false,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pager = Pager::new(page_size);
        self
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn load_state(&self) -> LoadState {
        *self.load.borrow()
    }

    /// Follows load-state changes while a fetch is in flight.
    pub fn watch_load(&self) -> watch::Receiver<LoadState> {
        self.load.subscribe()
    }

    pub fn cache(&self) -> &H {
        &self.cache
    }

    /// Paints the cached snapshot, if any, then refreshes from the server.
    ///
    /// With a snapshot on screen the refresh counts as a background one.
    pub async fn open(&mut self) -> ResultEngine<()> {
        if let Some(cached) = self.cache.load(&self.user_id) {
            tracing::debug!("painting {} cached history entries", cached.len());
            self.items = cached;
            self.loaded_once = true;
            self.load.send_replace(LoadState::Ready);
        }
        self.fetch().await
    }

    pub async fn fetch(&mut self) -> ResultEngine<()> {
        if self.user_id.trim().is_empty() {
            let message = "no signed-in user".to_string();
            self.error = Some(message.clone());
            return Err(EngineError::Validation(message));
        }

        self.load.send_replace(LoadState::Loading {
            first: !self.loaded_once,
        });
        self.error = None;

        match self.store.list_history(&self.user_id).await {
            Ok(payload) => {
                self.items = normalize_history_payload(payload, &self.clock);
                self.loaded_once = true;
                self.load.send_replace(LoadState::Ready);
                self.pager.clamp(self.items.len());
                tracing::debug!("loaded {} history entries", self.items.len());
                self.write_cache();
                Ok(())
            }
            Err(err) => {
                self.load.send_replace(if self.loaded_once {
                    LoadState::Ready
                } else {
                    LoadState::Initial
                });
                tracing::error!("load history failed: {err}");
                self.error = Some(err.user_message());
                Err(EngineError::Remote(err))
            }
        }
    }

    /// Re-fetches after a record was archived elsewhere.
    pub async fn sync(&mut self) -> ResultEngine<bool> {
        if !self.subscription.take(ChangeSignal::HistoryChanged) {
            return Ok(false);
        }
        self.fetch().await?;
        Ok(true)
    }

    /// Deletes an archived record for good.
    ///
    /// Ids that are not server object ids are rejected before asking or
    /// calling anything.
    pub async fn delete(&mut self, id: &str, confirm: &impl Confirm) -> ResultEngine<Outcome> {
        if !is_object_id(id) {
            let err = EngineError::InvalidId(id.to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }
        if !confirm.confirm("Delete this history entry permanently?") {
            return Ok(Outcome::Declined);
        }

        if let Err(err) = self.store.delete_history(id).await {
            tracing::error!("delete history entry failed: {err}");
            self.error = Some(err.user_message());
            return Err(EngineError::Remote(err));
        }

        tracing::info!("deleted history entry {id}");
        self.items.retain(|item| item.record.id != id);
        self.pager.clamp(self.items.len());
        self.error = None;
        self.write_cache();
        self.feed.emit(ChangeSignal::HistoryChanged);
        Ok(Outcome::Done)
    }

    pub fn page_items(&self) -> &[HistoryItem] {
        self.pager.slice(&self.items)
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.items.len())
    }

    pub fn set_page(&mut self, page: usize) {
        self.pager.set_page(page, self.items.len());
    }

    pub fn next_page(&mut self) {
        self.pager.next(self.items.len());
    }

    pub fn prev_page(&mut self) {
        self.pager.prev(self.items.len());
    }

    fn write_cache(&mut self) {
        if let Err(err) = self.cache.store(&self.user_id, &self.items) {
            tracing::warn!("failed to cache history snapshot: {err}");
        }
    }
}
