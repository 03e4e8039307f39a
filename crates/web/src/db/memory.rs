//! In-process visitor store.
//!
//! A transaction holds the store's lock from `begin` until it is committed or
//! dropped, so transactions never interleave. Writes are staged and only
//! applied on commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use greeter_core::{Page, PageRequest, SortDirection, SortKey, Visitor, VisitorId};

use super::{RepositoryError, VisitorStore, VisitorTransaction};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    visitors: BTreeMap<VisitorId, Visitor>,
    id_by_name: HashMap<String, VisitorId>,
}

/// Visitor store kept in memory. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryVisitorStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryVisitorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisitorStore for MemoryVisitorStore {
    async fn begin(&self) -> Result<Box<dyn VisitorTransaction>, RepositoryError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(MemoryTransaction {
            state: guard,
            staged: BTreeMap::new(),
            next_id: None,
        }))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Visitor>, RepositoryError> {
        let state = self.state.lock().await;

        let sort = page.sort();
        let mut visitors: Vec<&Visitor> = state.visitors.values().collect();
        visitors.sort_by(|a, b| {
            let ordering = match sort.key {
                SortKey::Id => a.id.cmp(&b.id),
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::VisitCount => a.visit_count.cmp(&b.visit_count),
            };
            let ordering = match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.size()).unwrap_or(usize::MAX);
        let content = visitors.into_iter().skip(skip).take(take).cloned().collect();

        Ok(Page::new(content, &page, state.visitors.len() as u64))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

struct MemoryTransaction {
    state: OwnedMutexGuard<MemoryState>,
    staged: BTreeMap<VisitorId, Visitor>,
    next_id: Option<i64>,
}

impl MemoryTransaction {
    fn current(&self, id: VisitorId) -> Option<&Visitor> {
        self.staged.get(&id).or_else(|| self.state.visitors.get(&id))
    }

    fn owner_of(&self, name: &str) -> Option<VisitorId> {
        self.staged
            .values()
            .find(|v| v.name == name)
            .and_then(|v| v.id)
            .or_else(|| self.state.id_by_name.get(name).copied())
    }

    fn allocate_id(&mut self) -> VisitorId {
        let id = self.next_id.unwrap_or(self.state.last_id) + 1;
        self.next_id = Some(id);
        VisitorId::new(id)
    }
}

#[async_trait]
impl VisitorTransaction for MemoryTransaction {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<Visitor>, RepositoryError> {
        Ok(self.owner_of(name).and_then(|id| self.current(id)).cloned())
    }

    async fn save(&mut self, mut visitor: Visitor) -> Result<Visitor, RepositoryError> {
        let now = Utc::now();

        match visitor.id {
            None => {
                if self.owner_of(&visitor.name).is_some() {
                    return Err(RepositoryError::Conflict(format!(
                        "visitor name '{}' already exists",
                        visitor.name
                    )));
                }
                visitor.id = Some(self.allocate_id());
                visitor.created_at = Some(now);
            }
            Some(id) => {
                let existing = self.current(id).ok_or(RepositoryError::NotFound)?;
                let created_at = existing.created_at;
                if self.owner_of(&visitor.name).is_some_and(|owner| owner != id) {
                    return Err(RepositoryError::Conflict(format!(
                        "visitor name '{}' already exists",
                        visitor.name
                    )));
                }
                visitor.created_at = created_at;
            }
        }

        visitor.updated_at = Some(now);
        if let Some(id) = visitor.id {
            self.staged.insert(id, visitor.clone());
        }
        Ok(visitor)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let Self {
            mut state,
            staged,
            next_id,
        } = *self;

        for (id, visitor) in staged {
            let renamed_from = state
                .visitors
                .get(&id)
                .filter(|previous| previous.name != visitor.name)
                .map(|previous| previous.name.clone());
            if let Some(old_name) = renamed_from {
                state.id_by_name.remove(&old_name);
            }
            state.id_by_name.insert(visitor.name.clone(), id);
            state.visitors.insert(id, visitor);
        }
        if let Some(last_id) = next_id {
            state.last_id = last_id;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use greeter_core::Sort;

    use super::*;

    async fn insert(store: &MemoryVisitorStore, name: &str, visits: u32) -> Visitor {
        let mut tx = store.begin().await.unwrap();
        let mut visitor = Visitor::new(name);
        visitor.visit_count = visits;
        let saved = tx.save(visitor).await.unwrap();
        tx.commit().await.unwrap();
        saved
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryVisitorStore::new();
        let alice = insert(&store, "Alice", 1).await;
        let bob = insert(&store, "Bob", 1).await;

        assert_eq!(alice.id, Some(VisitorId::new(1)));
        assert_eq!(bob.id, Some(VisitorId::new(2)));
        assert!(alice.created_at.is_some());
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = MemoryVisitorStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.save(Visitor::new("Ghost")).await.unwrap();
        }

        let page = store.find_all(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_elements, 0);

        // The id was never handed out
        let real = insert(&store, "Real", 1).await;
        assert_eq!(real.id, Some(VisitorId::new(1)));
    }

    #[tokio::test]
    async fn test_transaction_sees_its_own_writes() {
        let store = MemoryVisitorStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.save(Visitor::new("Alice")).await.unwrap();

        let found = tx.find_by_name("Alice").await.unwrap().unwrap();
        assert_eq!(found.id, Some(VisitorId::new(1)));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_conflict() {
        let store = MemoryVisitorStore::new();
        insert(&store, "Alice", 1).await;

        let mut tx = store.begin().await.unwrap();
        let err = tx.save(Visitor::new("Alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_not_found() {
        let store = MemoryVisitorStore::new();
        let mut visitor = Visitor::new("Nobody");
        visitor.id = Some(VisitorId::new(99));

        let mut tx = store.begin().await.unwrap();
        let err = tx.save(visitor).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = MemoryVisitorStore::new();
        let mut alice = insert(&store, "Alice", 1).await;
        let created_at = alice.created_at;

        alice.visit_count = 2;
        let mut tx = store.begin().await.unwrap();
        let updated = tx.save(alice).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.visit_count, 2);
    }

    #[tokio::test]
    async fn test_find_all_sorts_with_id_tiebreak() {
        let store = MemoryVisitorStore::new();
        insert(&store, "Carol", 2).await;
        insert(&store, "Alice", 5).await;
        insert(&store, "Bob", 2).await;

        let by_id = store.find_all(PageRequest::default()).await.unwrap();
        let names: Vec<_> = by_id.content.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Carol", "Alice", "Bob"]);

        let by_name = store
            .find_all(PageRequest::new(0, 5).with_sort(Sort::new(SortKey::Name, SortDirection::Asc)))
            .await
            .unwrap();
        let names: Vec<_> = by_name.content.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);

        let by_visits = store
            .find_all(
                PageRequest::new(0, 5)
                    .with_sort(Sort::new(SortKey::VisitCount, SortDirection::Desc)),
            )
            .await
            .unwrap();
        let names: Vec<_> = by_visits.content.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Carol", "Bob"]);
    }

    #[tokio::test]
    async fn test_find_all_pages_by_offset() {
        let store = MemoryVisitorStore::new();
        for i in 0..12 {
            insert(&store, &format!("visitor-{i:02}"), 1).await;
        }

        let first = store.find_all(PageRequest::new(0, 5)).await.unwrap();
        assert_eq!(first.content.len(), 5);
        assert_eq!(first.total_elements, 12);

        let last = store.find_all(PageRequest::new(2, 5)).await.unwrap();
        let names: Vec<_> = last.content.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["visitor-10", "visitor-11"]);

        let beyond = store.find_all(PageRequest::new(7, 5)).await.unwrap();
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 12);
    }
}
