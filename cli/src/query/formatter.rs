use crate::query::executor::QueryPage;
use serde_json::Value;

pub fn format_query_result(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// "Showing 1-25 of 130 invoices"
pub fn format_page_summary(page: &QueryPage) -> String {
    if page.rows.is_empty() {
        return format!("No {} on this page ({} total)", page.collection, page.total);
    }
    format!(
        "Showing {}-{} of {} {}",
        page.from + 1,
        page.from + page.rows.len(),
        page.total,
        page.collection
    )
}
