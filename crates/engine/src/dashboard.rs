//! View state of the active list: records, category tab, paging and the
//! edit modal.

use tokio::sync::watch;

use crate::{
    ArchiveSaga, ChangeFeed, ChangeSignal, Clock, Confirm, EngineError, LoadState, Outcome, Pager,
    RecordStore, RemoteError, ResultEngine, Subscription,
    forms::{EditForm, EntryForm},
    normalize::{normalize_payload, record_id},
    record::{Category, Transaction, display_amount, is_draft_id},
};

/// Category tab. Positions are fixed: 0 is borrowed, 1 is lent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Borrow,
    Lent,
}

impl Tab {
    /// Unknown positions fall back to the first tab.
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Lent,
            _ => Self::Borrow,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Borrow => 0,
            Self::Lent => 1,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Borrow => Category::Borrow,
            Self::Lent => Category::Lent,
        }
    }
}

impl From<Category> for Tab {
    fn from(category: Category) -> Self {
        match category {
            Category::Borrow => Self::Borrow,
            Category::Lent => Self::Lent,
        }
    }
}

/// Changing the returned flag is asymmetric on purpose: marking a record
/// returned archives it remotely, un-marking only flips the local flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnAction {
    MarkReturned,
    Unmark,
}

pub struct Dashboard<S, C> {
    store: S,
    clock: C,
    user_id: String,
    feed: ChangeFeed,
    subscription: Subscription,
    items: Vec<Transaction>,
    tab: Tab,
    pager: Pager,
    edit: Option<EditForm>,
    error: Option<String>,
    load: watch::Sender<LoadState>,
    loaded_once: bool,
}

impl<S: RecordStore, C: Clock> Dashboard<S, C> {
    pub fn new(store: S, clock: C, user_id: impl Into<String>, feed: &ChangeFeed) -> Self {
        Self {
            store,
            clock,
            user_id: user_id.into(),
            feed: feed.clone(),
            subscription: feed.subscribe(),
            items: Vec::new(),
            tab: Tab::default(),
            pager: Pager::default(),
            edit: None,
            error: None,
            load: watch::Sender::new(LoadState::Initial),
            loaded_once: false,
        }
    }

    /// Replaces the default page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pager = Pager::new(page_size);
        self
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn tab(&self) -> Tab {
        self.tab
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

    pub fn edit(&self) -> Option<&EditForm> {
        self.edit.as_ref()
    }

    pub fn edit_mut(&mut self) -> Option<&mut EditForm> {
        self.edit.as_mut()
    }

    /// Loads every active record of the user and replaces the local list.
    pub async fn fetch(&mut self) -> ResultEngine<()> {
        if self.user_id.trim().is_empty() {
            return Err(self.invalid("no signed-in user"));
        }

        self.load.send_replace(LoadState::Loading {
            first: !self.loaded_once,
        });
        self.error = None;

        match self.store.list_active(&self.user_id).await {
            Ok(payload) => {
                self.items = normalize_payload(payload, &self.clock);
                self.loaded_once = true;
                self.load.send_replace(LoadState::Ready);
                let len = self.active_len();
                self.pager.clamp(len);
                tracing::debug!(
                    "loaded {} active records ({} lent, {} borrowed)",
                    self.items.len(),
                    self.lent_items().len(),
                    self.borrowed_items().len()
                );
                Ok(())
            }
            Err(err) => {
                self.load.send_replace(if self.loaded_once {
                    LoadState::Ready
                } else {
                    LoadState::Initial
                });
                Err(self.remote_failure("load records", err))
            }
        }
    }

    /// Re-fetches when another view reported a change to the active list.
    /// Returns whether a fetch happened.
    pub async fn sync(&mut self) -> ResultEngine<bool> {
        if !self.subscription.take(ChangeSignal::ActiveChanged) {
            return Ok(false);
        }
        self.fetch().await?;
        Ok(true)
    }

    pub fn set_tab(&mut self, index: usize) {
        self.tab = Tab::from_index(index);
        self.pager.reset();
        tracing::debug!("tab {:?}", self.tab);
    }

    pub fn lent_items(&self) -> Vec<&Transaction> {
        self.by_category(Category::Lent)
    }

    pub fn borrowed_items(&self) -> Vec<&Transaction> {
        self.by_category(Category::Borrow)
    }

    /// Records of the selected tab.
    pub fn active_items(&self) -> Vec<&Transaction> {
        self.by_category(self.tab.category())
    }

    /// The current page of the selected tab.
    pub fn page_items(&self) -> Vec<&Transaction> {
        let active = self.active_items();
        self.pager.slice(&active).to_vec()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.active_len())
    }

    pub fn set_page(&mut self, page: usize) {
        let len = self.active_len();
        self.pager.set_page(page, len);
    }

    pub fn next_page(&mut self) {
        let len = self.active_len();
        self.pager.next(len);
    }

    pub fn prev_page(&mut self) {
        let len = self.active_len();
        self.pager.prev(len);
    }

    /// Creates a record from the add-entry form.
    pub async fn add(&mut self, form: &EntryForm) -> ResultEngine<Transaction> {
        let request = match form.validate(&self.user_id) {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let created = match self.store.create_active(&request).await {
            Ok(created) => created,
            Err(err) => return Err(self.remote_failure("create record", err)),
        };

        let id = record_id(&created)
            .unwrap_or_else(|| format!("draft-{}", self.clock.now().timestamp_millis()));
        let record = Transaction {
            id,
            amount: display_amount(&request.amount),
            person: request.person,
            due_date: request.due_date,
            return_date: request.return_date,
            category: Category::infer(&request.category),
            returned: false,
        };

        tracing::info!("created record {}", record.id);
        self.items.push(record.clone());
        self.error = None;
        self.feed.emit(ChangeSignal::ActiveChanged);
        Ok(record)
    }

    /// Changes the returned flag of a record.
    ///
    /// [`ReturnAction::MarkReturned`] asks for confirmation and archives the
    /// record; the local list changes only once both remote calls
    /// succeeded. [`ReturnAction::Unmark`] flips the local flag and keeps
    /// any return date.
    pub async fn set_returned(
        &mut self,
        id: &str,
        action: ReturnAction,
        confirm: &impl Confirm,
    ) -> ResultEngine<Outcome> {
        let Some(pos) = self.position(id) else {
            return Err(self.not_found(id));
        };

        match action {
            ReturnAction::Unmark => {
                self.items[pos].returned = false;
                Ok(Outcome::Done)
            }
            ReturnAction::MarkReturned => {
                if is_draft_id(id) {
                    return Err(self.unsaved(id));
                }
                let record = &self.items[pos];
                let prompt = format!(
                    "Mark {} with {} as returned and move it to history?",
                    record.amount,
                    if record.person.is_empty() {
                        "-"
                    } else {
                        record.person.as_str()
                    }
                );
                if !confirm.confirm(&prompt) {
                    return Ok(Outcome::Declined);
                }

                let mut saga = ArchiveSaga::new(&self.user_id, record, &self.clock);
                if let Err(err) = saga.run(&self.store).await {
                    tracing::error!("archive of {id} failed: {err}");
                    self.error = Some(err.to_string());
                    return Err(err);
                }

                tracing::info!("archived record {id}");
                self.items.retain(|item| item.id != id);
                let len = self.active_len();
                self.pager.clamp(len);
                self.error = None;
                self.feed.emit(ChangeSignal::ActiveChanged);
                self.feed.emit(ChangeSignal::HistoryChanged);
                Ok(Outcome::Done)
            }
        }
    }

    /// Deletes a record after confirmation.
    pub async fn delete(&mut self, id: &str, confirm: &impl Confirm) -> ResultEngine<Outcome> {
        if self.position(id).is_none() {
            return Err(self.not_found(id));
        }
        if is_draft_id(id) {
            return Err(self.unsaved(id));
        }
        if !confirm.confirm("Delete this entry?") {
            return Ok(Outcome::Declined);
        }

        if let Err(err) = self.store.delete_active(id).await {
            return Err(self.remote_failure("delete record", err));
        }

        tracing::info!("deleted record {id}");
        self.items.retain(|item| item.id != id);
        let len = self.active_len();
        self.pager.clamp(len);
        self.error = None;
        self.feed.emit(ChangeSignal::ActiveChanged);
        Ok(Outcome::Done)
    }

    /// Opens the edit modal pre-filled from record `id`.
    pub fn open_edit(&mut self, id: &str) -> ResultEngine<&mut EditForm> {
        let Some(pos) = self.position(id) else {
            return Err(self.not_found(id));
        };
        if is_draft_id(id) {
            return Err(self.unsaved(id));
        }
        Ok(self.edit.insert(EditForm::open(&self.items[pos])))
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Sends the edited fields and merges them into the local record.
    ///
    /// On failure the modal stays open with its edits.
    pub async fn save_edit(&mut self) -> ResultEngine<Outcome> {
        let Some(form) = self.edit.as_ref() else {
            return Err(self.invalid("no record is being edited"));
        };
        if let Err(err) = form.validate() {
            self.error = Some(err.to_string());
            return Err(err);
        }

        let id = form.id().to_string();
        let update = form.to_update();
        if update.is_empty() {
            self.edit = None;
            return Ok(Outcome::Done);
        }

        if let Err(err) = self.store.update_active(&id, &update).await {
            return Err(self.remote_failure("update record", err));
        }

        if let (Some(form), Some(pos)) = (self.edit.take(), self.position(&id)) {
            form.apply_to(&mut self.items[pos]);
        }
        tracing::info!("updated record {id}");
        self.error = None;
        self.feed.emit(ChangeSignal::ActiveChanged);
        Ok(Outcome::Done)
    }

    fn by_category(&self, category: Category) -> Vec<&Transaction> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    fn active_len(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.category == self.tab.category())
            .count()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn invalid(&mut self, message: &str) -> EngineError {
        self.error = Some(message.to_string());
        EngineError::Validation(message.to_string())
    }

    fn not_found(&mut self, id: &str) -> EngineError {
        let err = EngineError::NotFound(id.to_string());
        self.error = Some(err.to_string());
        err
    }

    /// Placeholder ids never reached the server, so no remote call can
    /// address them.
    fn unsaved(&mut self, id: &str) -> EngineError {
        let err = EngineError::InvalidId(id.to_string());
        self.error = Some(err.to_string());
        err
    }

    fn remote_failure(&mut self, action: &str, err: RemoteError) -> EngineError {
        tracing::error!("{action} failed: {err}");
        self.error = Some(err.user_message());
        EngineError::Remote(err)
    }
}
