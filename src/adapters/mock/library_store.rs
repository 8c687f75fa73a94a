use crate::domain::{
    BranchCode, CardNumber, CatalogueEntry, CheckoutId, CheckoutRecord, EventId, HoldingId,
    HoldingTitle, Occurrence,
};
use crate::ports::library_store::{
    LibraryStore as LibraryStoreTrait, LibraryTransaction, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// 障害を注入できる書き込み操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    InsertSignup,
    InsertReturn,
    SaveCatalogueEntry,
    Commit,
}

/// 検索対象の資料
#[derive(Debug, Clone)]
struct SearchableHolding {
    holding_id: HoldingId,
    title: String,
    contributor_last_names: Vec<String>,
    branches: Vec<BranchCode>,
}

/// インメモリのデータ一式
#[derive(Debug, Clone, Default)]
struct LibraryData {
    patrons: HashSet<CardNumber>,
    occurrences: Vec<Occurrence>,
    signups: HashSet<(CardNumber, EventId)>,
    checkouts: HashMap<CheckoutId, CheckoutRecord>,
    returns: HashMap<CheckoutId, DateTime<Utc>>,
    catalogue: HashMap<(BranchCode, HoldingId), CatalogueEntry>,
    holdings: Vec<SearchableHolding>,
}

/// Mock implementation of LibraryStore
///
/// Each transaction works on a snapshot of the data and publishes it on commit.
/// Dropping a transaction discards the snapshot, which mirrors a rollback.
/// Write failures can be injected per operation for testing error paths.
pub struct LibraryStore {
    data: Arc<Mutex<LibraryData>>,
    failing: Arc<Mutex<HashSet<WriteOperation>>>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(LibraryData::default())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Add a patron for testing purposes
    pub fn add_patron(&self, card_number: CardNumber) {
        self.data.lock().unwrap().patrons.insert(card_number);
    }

    /// Add a scheduled occurrence of an event
    pub fn add_occurrence(&self, occurrence: Occurrence) {
        self.data.lock().unwrap().occurrences.push(occurrence);
    }

    /// Add an existing signup without any rule checks
    pub fn add_signup(&self, card_number: CardNumber, event_id: EventId) {
        self.data
            .lock()
            .unwrap()
            .signups
            .insert((card_number, event_id));
    }

    /// Add a checkout of a copy
    pub fn add_checkout(&self, record: CheckoutRecord) {
        self.data
            .lock()
            .unwrap()
            .checkouts
            .insert(record.checkout_id, record);
    }

    /// Mark a checkout as already returned
    pub fn add_return(&self, checkout_id: CheckoutId, returned_at: DateTime<Utc>) {
        self.data
            .lock()
            .unwrap()
            .returns
            .insert(checkout_id, returned_at);
    }

    /// Set the catalogue counts of a holding at a branch
    pub fn set_catalogue_entry(&self, entry: CatalogueEntry) {
        self.data
            .lock()
            .unwrap()
            .catalogue
            .insert((entry.branch.clone(), entry.holding_id), entry);
    }

    /// Add a searchable holding with its contributors and the branches holding copies
    pub fn add_holding(
        &self,
        holding_id: HoldingId,
        title: &str,
        contributor_last_names: &[&str],
        branches: &[&str],
    ) {
        self.data.lock().unwrap().holdings.push(SearchableHolding {
            holding_id,
            title: title.to_string(),
            contributor_last_names: contributor_last_names
                .iter()
                .map(|name| name.to_string())
                .collect(),
            branches: branches.iter().map(|code| BranchCode::new(*code)).collect(),
        });
    }

    /// Make the given write operation fail in every subsequent transaction
    pub fn fail_on(&self, operation: WriteOperation) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Number of committed signups
    pub fn signup_count(&self) -> usize {
        self.data.lock().unwrap().signups.len()
    }

    /// Whether a committed signup exists for the pair
    pub fn has_signup(&self, card_number: &CardNumber, event_id: EventId) -> bool {
        self.data
            .lock()
            .unwrap()
            .signups
            .contains(&(card_number.clone(), event_id))
    }

    /// Committed return time of a checkout
    pub fn returned_at(&self, checkout_id: CheckoutId) -> Option<DateTime<Utc>> {
        self.data
            .lock()
            .unwrap()
            .returns
            .get(&checkout_id)
            .copied()
    }

    /// Number of committed returns
    pub fn return_count(&self) -> usize {
        self.data.lock().unwrap().returns.len()
    }

    /// Committed catalogue counts of a holding at a branch
    pub fn catalogue_entry(
        &self,
        branch: &BranchCode,
        holding_id: HoldingId,
    ) -> Option<CatalogueEntry> {
        self.data
            .lock()
            .unwrap()
            .catalogue
            .get(&(branch.clone(), holding_id))
            .cloned()
    }
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LibraryStoreTrait for LibraryStore {
    async fn begin(&self) -> Result<Box<dyn LibraryTransaction>> {
        let working = self.data.lock().unwrap().clone();
        let failing = self.failing.lock().unwrap().clone();
        Ok(Box::new(Transaction {
            shared: Arc::clone(&self.data),
            working,
            failing,
        }))
    }

    async fn search_titles(
        &self,
        last_name: &str,
        branch: &BranchCode,
    ) -> Result<Vec<HoldingTitle>> {
        let data = self.data.lock().unwrap();
        let mut titles: Vec<HoldingTitle> = data
            .holdings
            .iter()
            .filter(|h| h.contributor_last_names.iter().any(|name| name == last_name))
            .filter(|h| h.branches.contains(branch))
            .map(|h| HoldingTitle {
                holding_id: h.holding_id,
                title: h.title.clone(),
            })
            .collect();

        titles.sort_by(|a, b| {
            a.title
                .cmp(&b.title)
                .then(a.holding_id.value().cmp(&b.holding_id.value()))
        });
        titles.dedup_by_key(|t| t.holding_id);

        Ok(titles)
    }
}

/// スナップショット上のトランザクション
struct Transaction {
    shared: Arc<Mutex<LibraryData>>,
    working: LibraryData,
    failing: HashSet<WriteOperation>,
}

impl Transaction {
    fn check(&self, operation: WriteOperation) -> Result<()> {
        if self.failing.contains(&operation) {
            return Err(
                std::io::Error::other(format!("injected failure: {:?}", operation)).into(),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl LibraryTransaction for Transaction {
    async fn lock_patron(&mut self, card_number: &CardNumber) -> Result<bool> {
        Ok(self.working.patrons.contains(card_number))
    }

    async fn event_exists(&mut self, event_id: EventId) -> Result<bool> {
        Ok(self
            .working
            .occurrences
            .iter()
            .any(|o| o.event_id == event_id))
    }

    async fn signup_exists(
        &mut self,
        card_number: &CardNumber,
        event_id: EventId,
    ) -> Result<bool> {
        Ok(self
            .working
            .signups
            .contains(&(card_number.clone(), event_id)))
    }

    async fn signed_up_occurrences(
        &mut self,
        card_number: &CardNumber,
    ) -> Result<Vec<Occurrence>> {
        let events: HashSet<EventId> = self
            .working
            .signups
            .iter()
            .filter(|(card, _)| card == card_number)
            .map(|(_, event)| *event)
            .collect();

        Ok(self
            .working
            .occurrences
            .iter()
            .filter(|o| events.contains(&o.event_id))
            .copied()
            .collect())
    }

    async fn event_occurrences(&mut self, event_id: EventId) -> Result<Vec<Occurrence>> {
        Ok(self
            .working
            .occurrences
            .iter()
            .filter(|o| o.event_id == event_id)
            .copied()
            .collect())
    }

    async fn insert_signup(
        &mut self,
        card_number: &CardNumber,
        event_id: EventId,
    ) -> Result<bool> {
        self.check(WriteOperation::InsertSignup)?;
        Ok(self
            .working
            .signups
            .insert((card_number.clone(), event_id)))
    }

    async fn lock_checkout(&mut self, checkout_id: CheckoutId) -> Result<Option<CheckoutRecord>> {
        Ok(self.working.checkouts.get(&checkout_id).cloned())
    }

    async fn return_exists(&mut self, checkout_id: CheckoutId) -> Result<bool> {
        Ok(self.working.returns.contains_key(&checkout_id))
    }

    async fn lock_catalogue_entry(
        &mut self,
        record: &CheckoutRecord,
    ) -> Result<Option<CatalogueEntry>> {
        Ok(self
            .working
            .catalogue
            .get(&(record.branch.clone(), record.holding_id))
            .cloned())
    }

    async fn insert_return(
        &mut self,
        checkout_id: CheckoutId,
        returned_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.check(WriteOperation::InsertReturn)?;
        if self.working.returns.contains_key(&checkout_id) {
            return Ok(false);
        }
        self.working.returns.insert(checkout_id, returned_at);
        Ok(true)
    }

    async fn save_catalogue_entry(&mut self, entry: &CatalogueEntry) -> Result<()> {
        self.check(WriteOperation::SaveCatalogueEntry)?;
        self.working
            .catalogue
            .insert((entry.branch.clone(), entry.holding_id), entry.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.check(WriteOperation::Commit)?;
        let Transaction {
            shared, working, ..
        } = *self;
        *shared.lock().unwrap() = working;
        Ok(())
    }
}
