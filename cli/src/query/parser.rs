use crate::records::collection::Collection;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Inclusive row range, e.g. `0:24` is the first 25 rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub from: usize,
    pub to: usize,
}

impl PageRange {
    /// Range for a zero-based page number. Pages past `usize::MAX` rows
    /// saturate and come back empty.
    pub fn page(page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let from = page.saturating_mul(page_size);
        Self {
            from,
            to: from.saturating_add(page_size - 1),
        }
    }
}

/// A list view: collection + search box + sort column + page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub collection: Collection,
    pub search: Option<String>,
    pub sort: Option<SortSpec>,
    pub range: Option<PageRange>,
}

impl ListQuery {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            search: None,
            sort: None,
            range: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Query cannot be empty")]
    EmptyQuery,
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Invalid sort '{0}' (expected field or field:asc|desc)")]
    InvalidSort(String),
    #[error("Invalid range '{0}' (expected from:to)")]
    InvalidRange(String),
    #[error("Range start {from} is after range end {to}")]
    ReversedRange { from: usize, to: usize },
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// Decode `+` and `%XX` escapes; malformed escapes are kept as typed
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        out.push(high * 16 + low);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub fn parse_sort(value: &str) -> Result<SortSpec, ParseError> {
    let (field, direction) = match value.split_once(':') {
        Some((field, dir)) => {
            let direction = match dir.trim().to_lowercase().as_str() {
                "asc" | "ascending" => SortDirection::Ascending,
                "desc" | "descending" => SortDirection::Descending,
                _ => return Err(ParseError::InvalidSort(value.to_string())),
            };
            (field, direction)
        }
        None => (value, SortDirection::Ascending),
    };

    let field = field.trim();
    if field.is_empty() {
        return Err(ParseError::InvalidSort(value.to_string()));
    }

    Ok(SortSpec {
        field: field.to_string(),
        direction,
    })
}

pub fn parse_range(value: &str) -> Result<PageRange, ParseError> {
    let invalid = || ParseError::InvalidRange(value.to_string());
    let (from, to) = value.split_once(':').ok_or_else(invalid)?;
    let from = from.trim().parse::<usize>().map_err(|_| invalid())?;
    let to = to.trim().parse::<usize>().map_err(|_| invalid())?;

    if from > to {
        return Err(ParseError::ReversedRange { from, to });
    }

    Ok(PageRange { from, to })
}

/// Parse `collection?search=text&sort=field:dir&range=from:to`
pub fn parse_list_query(query: &str) -> Result<ListQuery, ParseError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ParseError::EmptyQuery);
    }

    let (name, params) = query.split_once('?').unwrap_or((query, ""));
    let collection = Collection::parse(name)
        .ok_or_else(|| ParseError::UnknownCollection(name.to_string()))?;
    let mut list_query = ListQuery::new(collection);

    for pair in params.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(value);
        match key {
            "search" | "q" => {
                let term = value.trim();
                list_query.search = (!term.is_empty()).then(|| term.to_string());
            }
            "sort" => list_query.sort = Some(parse_sort(&value)?),
            "range" => list_query.range = Some(parse_range(&value)?),
            _ => return Err(ParseError::UnknownParameter(key.to_string())),
        }
    }

    Ok(list_query)
}
