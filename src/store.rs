use async_trait::async_trait;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::sync::RwLock;

pub const DEFAULT_USER_ID: &str = "default_user";

pub fn default_user_id() -> String {
    DEFAULT_USER_ID.into()
}

/// Current UTC time as RFC 3339, the default `date` of new records.
pub fn timestamp_now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Anything a [`RecordStore`] can hold.
pub trait Record: Clone + Send + Sync + 'static {
    fn user_id(&self) -> &str;
    /// ISO-8601 timestamp used by range queries.
    fn date(&self) -> &str;
}

/// Inclusive range compared as plain strings, so only fixed-width
/// ISO-8601 values order correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

/// Query-string parameters shared by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RecordQuery {
    /// Present only when both bounds are given.
    pub fn range(&self) -> Option<DateRange> {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => Some(DateRange {
                start: start.clone(),
                end: end.clone(),
            }),
            _ => None,
        }
    }
}

#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn append(&self, record: R) -> anyhow::Result<R>;
    async fn by_owner(&self, user_id: &str) -> anyhow::Result<Vec<R>>;
    async fn in_range(&self, user_id: &str, range: &DateRange) -> anyhow::Result<Vec<R>>;

    async fn query(&self, q: &RecordQuery) -> anyhow::Result<Vec<R>> {
        match q.range() {
            Some(range) => self.in_range(&q.user_id, &range).await,
            None => self.by_owner(&q.user_id).await,
        }
    }
}

/// Process-lifetime store; contents are lost on restart.
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn append(&self, record: R) -> anyhow::Result<R> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn by_owner(&self, user_id: &str) -> anyhow::Result<Vec<R>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn in_range(&self, user_id: &str, range: &DateRange) -> anyhow::Result<Vec<R>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id() == user_id && range.contains(r.date()))
            .cloned()
            .collect())
    }
}
