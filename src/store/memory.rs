// In-memory entity store
//
// Records live in an id-ordered map behind a RwLock, so list order is id order.

use super::{EntityStore, Record};
use crate::error::{CatalogError, Result};
use crate::filter::Predicate;
use crate::page::{Page, PageRequest};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

struct Inner<E> {
    records: BTreeMap<i64, E>,
    last_id: i64,
}

pub struct MemoryStore<E> {
    inner: Arc<RwLock<Inner<E>>>,
}

impl<E: Record> MemoryStore<E> {
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(RwLock::new(Inner {
                records: BTreeMap::new(),
                last_id: 0,
            })),
        }
    }
}

impl<E: Record> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        MemoryStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Record> EntityStore<E> for MemoryStore<E> {
    fn list_all(&self) -> Result<Vec<E>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.records.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<E> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(E::KIND, id))
    }

    fn save(&self, mut record: E) -> Result<E> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let id = match record.id() {
            Some(id) => {
                inner.last_id = inner.last_id.max(id);
                id
            }
            None => {
                inner.last_id += 1;
                let id = inner.last_id;
                record.set_id(id);
                id
            }
        };

        inner.records.insert(id, record.clone());
        Ok(record)
    }

    fn delete(&self, record: &E) -> Result<()> {
        if let Some(id) = record.id() {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.records.remove(&id);
        }
        Ok(())
    }

    fn find_page(&self, predicate: &Predicate, request: PageRequest) -> Result<Page<E>> {
        predicate.validate(E::FIELDS)?;

        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let matching: Vec<&E> = inner
            .records
            .values()
            .filter(|record| predicate.matches(*record))
            .collect();

        let total = matching.len();
        let content = matching
            .into_iter()
            .skip(request.offset())
            .take(request.size())
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }

    fn count(&self) -> Result<usize> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Criterion, FieldValue, Filterable};

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<i64>,
        text: String,
        score: f64,
    }

    impl Filterable for Note {
        fn field(&self, path: &str) -> Option<FieldValue> {
            match path {
                "text" => Some(self.text.as_str().into()),
                "score" => Some(self.score.into()),
                _ => None,
            }
        }
    }

    impl Record for Note {
        const KIND: &'static str = "Note";
        const FIELDS: &'static [&'static str] = &["text", "score"];

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    fn note(text: &str, score: f64) -> Note {
        Note {
            id: None,
            text: text.to_string(),
            score,
        }
    }

    fn seeded(n: usize) -> MemoryStore<Note> {
        let store = MemoryStore::new();
        for i in 0..n {
            store.save(note(&format!("note {}", i), i as f64)).unwrap();
        }
        store
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.save(note("a", 1.0)).unwrap();
        let b = store.save(note("b", 2.0)).unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(store.find_by_id(2).unwrap().text, "b");
    }

    #[test]
    fn test_save_with_id_overwrites() {
        let store = seeded(2);
        let mut first = store.find_by_id(1).unwrap();
        first.text = "edited".to_string();
        store.save(first).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.find_by_id(1).unwrap().text, "edited");
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let store: MemoryStore<Note> = MemoryStore::new();
        let err = store.find_by_id(42).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "Note", id: 42 }));
    }

    #[test]
    fn test_delete_removes_record() {
        let store = seeded(3);
        let second = store.find_by_id(2).unwrap();
        store.delete(&second).unwrap();

        assert!(store.find_by_id(2).is_err());
        let ids: Vec<_> = store.list_all().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = seeded(2);
        let last = store.find_by_id(2).unwrap();
        store.delete(&last).unwrap();

        let next = store.save(note("c", 0.0)).unwrap();
        assert_eq!(next.id, Some(3));
    }

    #[test]
    fn test_find_page_slices_in_id_order() {
        let store = seeded(25);
        let page = store
            .find_page(&Predicate::always(), PageRequest::new(2, 10).unwrap())
            .unwrap();

        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content.len(), 5);
        assert_eq!(page.content[0].id, Some(21));
    }

    #[test]
    fn test_find_page_applies_predicate() {
        let store = seeded(10);
        let predicate = Predicate::all_of([Criterion::greater_than("score", Some(6.5))]);
        let page = store.find_page(&predicate, PageRequest::default()).unwrap();

        assert_eq!(page.total_elements, 3);
        assert!(page.content.iter().all(|n| n.score > 6.5));
    }

    #[test]
    fn test_find_page_rejects_unknown_field() {
        let store = seeded(1);
        let predicate = Predicate::all_of([Criterion::equals("owner.id", Some(1i64))]);
        let err = store.find_page(&predicate, PageRequest::default()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownField(_)));
    }
}
