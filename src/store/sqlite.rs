// SQLite entity store
//
// Each entity describes its table, the joined source it is read from and how
// filter paths map to columns. Predicates become a parameterised WHERE clause.

use super::{EntityStore, Record};
use crate::db::FOLD_CASE;
use crate::error::{CatalogError, Result};
use crate::filter::{FieldValue, Operator, Predicate, TextMatch};
use crate::page::{Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

// ============================================================================
// SQL MAPPING
// ============================================================================

/// Table mapping for a record. The record's own table is aliased `t` inside
/// `SOURCE`; related tables are joined there under their own aliases.
pub trait SqlRecord: Record {
    /// Table rows are written to
    const TABLE: &'static str;

    /// Selected columns, in the order `from_row` reads them
    const PROJECTION: &'static str;

    /// FROM clause including joins
    const SOURCE: &'static str;

    /// Columns written on insert/update (excluding `id`), matching `values()`
    const COLUMNS: &'static [&'static str];

    /// Column expression for a filter path
    fn column(path: &str) -> Option<&'static str>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn values(&self) -> Vec<Value>;
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Number(n) => Value::Real(*n),
        FieldValue::Integer(i) => Value::Integer(*i),
        FieldValue::Flag(b) => Value::Integer(i64::from(*b)),
        FieldValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
    }
}

/// Render a predicate as ` WHERE ...` (empty when it matches everything).
pub fn where_clause<E: SqlRecord>(predicate: &Predicate) -> Result<(String, Vec<Value>)> {
    let mut parts = Vec::new();
    let mut values = Vec::new();

    for condition in predicate.conditions() {
        let column = E::column(condition.path)
            .ok_or_else(|| CatalogError::UnknownField(condition.path.to_string()))?;

        let sql = match condition.operator {
            Operator::Contains(TextMatch::Sensitive) => format!("instr({}, ?) > 0", column),
            Operator::Contains(TextMatch::Insensitive) => {
                format!("instr({f}({}), {f}(?)) > 0", column, f = FOLD_CASE)
            }
            Operator::GreaterThan => format!("{} > ?", column),
            Operator::Equals => format!("{} = ?", column),
        };

        parts.push(sql);
        values.push(to_sql_value(&condition.value));
    }

    if parts.is_empty() {
        Ok((String::new(), values))
    } else {
        Ok((format!(" WHERE {}", parts.join(" AND ")), values))
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct SqliteStore<E> {
    conn: Arc<Mutex<Connection>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SqlRecord> SqliteStore<E> {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        SqliteStore {
            conn,
            _entity: PhantomData,
        }
    }

    fn select() -> String {
        format!("SELECT {} FROM {}", E::PROJECTION, E::SOURCE)
    }

    fn insert(conn: &Connection, record: &E, id: Option<i64>) -> Result<i64> {
        let mut columns: Vec<&str> = Vec::with_capacity(E::COLUMNS.len() + 1);
        let mut values = Vec::with_capacity(E::COLUMNS.len() + 1);

        if let Some(id) = id {
            columns.push("id");
            values.push(Value::Integer(id));
        }
        columns.extend_from_slice(E::COLUMNS);
        values.extend(record.values());

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &Connection, record: &E, id: i64) -> Result<usize> {
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            E::TABLE,
            assignments.join(", "),
            E::COLUMNS.len() + 1
        );

        let mut values = record.values();
        values.push(Value::Integer(id));

        Ok(conn.execute(&sql, params_from_iter(values.iter()))?)
    }
}

impl<E> Clone for SqliteStore<E> {
    fn clone(&self) -> Self {
        SqliteStore {
            conn: Arc::clone(&self.conn),
            _entity: PhantomData,
        }
    }
}

impl<E: SqlRecord> EntityStore<E> for SqliteStore<E> {
    fn list_all(&self) -> Result<Vec<E>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(&format!("{} ORDER BY t.id", Self::select()))?;

        let records = stmt
            .query_map([], E::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    fn find_by_id(&self, id: i64) -> Result<E> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        conn.query_row(
            &format!("{} WHERE t.id = ?1", Self::select()),
            [id],
            E::from_row,
        )
        .optional()?
        .ok_or_else(|| CatalogError::not_found(E::KIND, id))
    }

    fn save(&self, mut record: E) -> Result<E> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        match record.id() {
            Some(id) => {
                if Self::update(&conn, &record, id)? == 0 {
                    Self::insert(&conn, &record, Some(id))?;
                }
            }
            None => {
                let id = Self::insert(&conn, &record, None)?;
                record.set_id(id);
            }
        }

        Ok(record)
    }

    fn delete(&self, record: &E) -> Result<()> {
        if let Some(id) = record.id() {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.execute(&format!("DELETE FROM {} WHERE id = ?1", E::TABLE), [id])?;
        }
        Ok(())
    }

    fn find_page(&self, predicate: &Predicate, request: PageRequest) -> Result<Page<E>> {
        predicate.validate(E::FIELDS)?;
        let (filter, mut values) = where_clause::<E>(predicate)?;

        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}{}", E::SOURCE, filter),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(Value::Integer(i64::try_from(request.size()).unwrap_or(i64::MAX)));
        values.push(Value::Integer(i64::try_from(request.offset()).unwrap_or(i64::MAX)));

        let mut stmt = conn.prepare(&format!(
            "{}{} ORDER BY t.id LIMIT ? OFFSET ?",
            Self::select(),
            filter
        ))?;
        let content = stmt
            .query_map(params_from_iter(values.iter()), E::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page::new(content, request, usize::try_from(total).unwrap_or(0)))
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", E::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(total).unwrap_or(0))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Criterion, Filterable};

    #[derive(Debug, Clone, PartialEq)]
    struct Shelf {
        id: Option<i64>,
        label: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Book {
        id: Option<i64>,
        title: String,
        pages: i64,
        shelf: Shelf,
    }

    impl Filterable for Book {
        fn field(&self, path: &str) -> Option<FieldValue> {
            match path {
                "title" => Some(self.title.as_str().into()),
                "pages" => Some(self.pages.into()),
                "shelf.id" => self.shelf.id.map(Into::into),
                _ => None,
            }
        }
    }

    impl Record for Book {
        const KIND: &'static str = "Book";
        const FIELDS: &'static [&'static str] = &["title", "pages", "shelf.id"];

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    impl SqlRecord for Book {
        const TABLE: &'static str = "books";
        const PROJECTION: &'static str = "t.id, t.title, t.pages, s.id, s.label";
        const SOURCE: &'static str = "books t JOIN shelves s ON s.id = t.shelf_id";
        const COLUMNS: &'static [&'static str] = &["title", "pages", "shelf_id"];

        fn column(path: &str) -> Option<&'static str> {
            match path {
                "title" => Some("t.title"),
                "pages" => Some("t.pages"),
                "shelf.id" => Some("s.id"),
                _ => None,
            }
        }

        fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
            Ok(Book {
                id: Some(row.get(0)?),
                title: row.get(1)?,
                pages: row.get(2)?,
                shelf: Shelf {
                    id: Some(row.get(3)?),
                    label: row.get(4)?,
                },
            })
        }

        fn values(&self) -> Vec<Value> {
            vec![
                Value::Text(self.title.clone()),
                Value::Integer(self.pages),
                self.shelf.id.map(Value::Integer).unwrap_or(Value::Null),
            ]
        }
    }

    fn store() -> SqliteStore<Book> {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE shelves (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT NOT NULL);
             CREATE TABLE books (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 pages INTEGER NOT NULL,
                 shelf_id INTEGER NOT NULL REFERENCES shelves(id)
             );
             INSERT INTO shelves (label) VALUES ('left'), ('right');",
        )
        .unwrap();
        crate::db::register_functions(&conn).unwrap();
        SqliteStore::new(Arc::new(Mutex::new(conn)))
    }

    fn book(title: &str, pages: i64, shelf_id: i64) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            pages,
            shelf: Shelf {
                id: Some(shelf_id),
                label: if shelf_id == 1 { "left" } else { "right" }.to_string(),
            },
        }
    }

    #[test]
    fn test_insert_then_find() {
        let store = store();
        let saved = store.save(book("Dune", 412, 1)).unwrap();
        assert_eq!(saved.id, Some(1));

        let found = store.find_by_id(1).unwrap();
        assert_eq!(found, saved);
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let store = store();
        let err = store.find_by_id(9).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_in_place() {
        let store = store();
        let mut saved = store.save(book("Dune", 412, 1)).unwrap();
        saved.title = "Dune Messiah".to_string();
        saved.shelf = book("", 0, 2).shelf;
        store.save(saved).unwrap();

        let found = store.find_by_id(1).unwrap();
        assert_eq!(found.title, "Dune Messiah");
        assert_eq!(found.shelf.label, "right");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_delete() {
        let store = store();
        let saved = store.save(book("Dune", 412, 1)).unwrap();
        store.delete(&saved).unwrap();
        assert!(store.find_by_id(1).is_err());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_where_clause_rendering() {
        let predicate = Predicate::all_of([
            Criterion::contains("title", Some("Du")),
            Criterion::greater_than::<i64>("pages", None),
            Criterion::equals("shelf.id", Some(2i64)),
        ]);

        let (sql, values) = where_clause::<Book>(&predicate).unwrap();
        assert_eq!(sql, " WHERE instr(t.title, ?) > 0 AND s.id = ?");
        assert_eq!(values, vec![Value::Text("Du".to_string()), Value::Integer(2)]);

        let (empty, none) = where_clause::<Book>(&Predicate::always()).unwrap();
        assert!(empty.is_empty());
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_page_filters_and_counts() {
        let store = store();
        for i in 0..12 {
            store.save(book(&format!("Volume {}", i), 100 + i, 1 + i % 2)).unwrap();
        }

        let predicate = Predicate::all_of([
            Criterion::greater_than("pages", Some(103i64)),
            Criterion::equals("shelf.id", Some(1i64)),
        ]);
        let page = store.find_page(&predicate, PageRequest::new(0, 3).unwrap()).unwrap();

        // pages 104, 106, 108, 110 sit on shelf 1
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.total_pages, 2);
        let pages: Vec<i64> = page.content.iter().map(|b| b.pages).collect();
        assert_eq!(pages, vec![104, 106, 108]);
    }

    #[test]
    fn test_contains_case_handling() {
        let store = store();
        store.save(book("Dune", 412, 1)).unwrap();

        let sensitive = Predicate::all_of([Criterion::contains("title", Some("dune"))]);
        let insensitive = Predicate::all_of([Criterion::contains_with(
            "title",
            Some("dune"),
            TextMatch::Insensitive,
        )]);

        let request = PageRequest::default();
        assert_eq!(store.find_page(&sensitive, request).unwrap().total_elements, 0);
        assert_eq!(store.find_page(&insensitive, request).unwrap().total_elements, 1);
    }

    #[test]
    fn test_insensitive_contains_folds_non_ascii() {
        let store = store();
        store.save(book("Повест за Охрид", 210, 1)).unwrap();

        let predicate = Predicate::all_of([Criterion::contains_with(
            "title",
            Some("ОХРИД"),
            TextMatch::Insensitive,
        )]);
        let page = store.find_page(&predicate, PageRequest::default()).unwrap();
        assert_eq!(page.total_elements, 1);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let store = store();
        store.save(book("Dune", 412, 1)).unwrap();

        let page = store
            .find_page(&Predicate::always(), PageRequest::new(5, 10).unwrap())
            .unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 1);
    }
}
