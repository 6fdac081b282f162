use crate::query::parser::{ListQuery, PageRange, SortDirection, SortSpec};
use crate::records::collection::Collection;
use crate::records::models::Dataset;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unknown sort field '{field}' for {collection}")]
    UnknownSortField {
        field: String,
        collection: Collection,
    },
    #[error("Failed to serialize {0}: {1}")]
    Serialize(Collection, #[source] serde_json::Error),
}

/// One page of a list view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPage {
    pub collection: String,
    /// Matching rows before pagination
    pub total: usize,
    pub from: usize,
    pub rows: Vec<JsonValue>,
}

pub struct QueryExecutor<'a> {
    dataset: &'a Dataset,
}

fn to_rows<T: Serialize>(records: &[T], collection: Collection) -> Result<Vec<JsonValue>, QueryError> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).map_err(|e| QueryError::Serialize(collection, e)))
        .collect()
}

impl<'a> QueryExecutor<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Filter, sort, then paginate
    pub fn execute(&self, query: &ListQuery) -> Result<QueryPage, QueryError> {
        let mut rows = self.rows(query.collection)?;

        if let Some(term) = &query.search {
            let fields = query.collection.searchable_fields();
            rows.retain(|row| matches_search(row, fields, term));
        }

        if let Some(sort) = &query.sort {
            if !rows.is_empty() && !rows.iter().any(|row| row.get(&sort.field).is_some()) {
                return Err(QueryError::UnknownSortField {
                    field: sort.field.clone(),
                    collection: query.collection,
                });
            }
            sort_rows(&mut rows, sort);
        }

        let total = rows.len();
        let (from, rows) = match query.range {
            Some(range) => (range.from, paginate(rows, range)),
            None => (0, rows),
        };

        Ok(QueryPage {
            collection: query.collection.key().to_string(),
            total,
            from,
            rows,
        })
    }

    /// Rows of a collection as JSON objects. Invoice rows carry the computed
    /// `pending` flag so it can be searched and sorted like a stored field.
    fn rows(&self, collection: Collection) -> Result<Vec<JsonValue>, QueryError> {
        match collection {
            Collection::Restaurants => to_rows(&self.dataset.restaurants, collection),
            Collection::Invoices => {
                let mut rows = to_rows(&self.dataset.invoices, collection)?;
                for (row, invoice) in rows.iter_mut().zip(&self.dataset.invoices) {
                    if let JsonValue::Object(map) = row {
                        map.insert("pending".to_string(), JsonValue::Bool(invoice.is_pending()));
                    }
                }
                Ok(rows)
            }
            Collection::Ingredients => to_rows(&self.dataset.ingredients, collection),
            Collection::MenuItems => to_rows(&self.dataset.menu_items, collection),
            Collection::Prospects => to_rows(&self.dataset.prospects, collection),
            Collection::Activity => to_rows(&self.dataset.activity, collection),
        }
    }
}

/// Case-insensitive substring match against any of `fields`
pub fn matches_search(row: &JsonValue, fields: &[&str], term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    fields.iter().any(|field| match row.get(*field) {
        Some(JsonValue::String(s)) => s.to_lowercase().contains(&term),
        _ => false,
    })
}

fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::String(x), JsonValue::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Stable sort; rows without the field (or with null) always go last
pub fn sort_rows(rows: &mut [JsonValue], sort: &SortSpec) {
    rows.sort_by(|a, b| {
        let a = a.get(&sort.field).filter(|v| !v.is_null());
        let b = b.get(&sort.field).filter(|v| !v.is_null());
        match (a, b) {
            (Some(a), Some(b)) => {
                let ordering = compare_values(a, b);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Inclusive `from..=to`, clamped to what exists
pub fn paginate<T>(rows: Vec<T>, range: PageRange) -> Vec<T> {
    let len = rows.len();
    if range.from >= len {
        return Vec::new();
    }
    let end = range.to.saturating_add(1).min(len);
    rows.into_iter().skip(range.from).take(end - range.from).collect()
}
