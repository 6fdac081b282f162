#[cfg(test)]
mod tests {
    use super::super::executor::*;
    use super::super::formatter::format_page_summary;
    use super::super::parser::{parse_list_query, ListQuery, PageRange};
    use crate::records::collection::Collection;
    use crate::records::models::*;
    use chrono::NaiveDate;

    fn restaurant(id: &str, name: &str, contact: Option<&str>) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            contact_name: contact.map(str::to_string),
            email: None,
            phone: None,
            address: None,
            created_at: None,
        }
    }

    fn invoice(id: &str, supplier: &str, amount: Option<f64>, day: u32) -> Invoice {
        Invoice {
            id: id.to_string(),
            restaurant_id: "r-1".to_string(),
            invoice_number: Some(format!("N-{}", id)),
            invoice_date: NaiveDate::from_ymd_opt(2026, 9, day),
            supplier: Some(supplier.to_string()),
            amount,
            file_url: None,
            created_at: None,
            items: vec![],
        }
    }

    fn create_test_dataset() -> Dataset {
        Dataset {
            restaurants: vec![
                restaurant("r-1", "Blue Door Bistro", Some("Sam Ortiz")),
                restaurant("r-2", "taqueria luna", None),
                restaurant("r-3", "Harbor Grill", Some("Alex Blue")),
            ],
            invoices: vec![
                invoice("inv-1", "Sysco", Some(120.0), 3),
                invoice("inv-2", "US Foods", None, 1),
                invoice("inv-3", "sysco", Some(80.5), 2),
            ],
            ..Default::default()
        }
    }

    fn ids(page: &QueryPage) -> Vec<&str> {
        page.rows
            .iter()
            .map(|row| row["id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_several_fields() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);

        // "blue" hits r-1 by name and r-3 by contact name
        let page = executor
            .execute(&parse_list_query("restaurants?search=BLUE").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["r-1", "r-3"]);
        assert_eq!(page.total, 2);

        let page = executor
            .execute(&parse_list_query("restaurants?search=zzz").unwrap())
            .unwrap();
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_sort_strings_ignore_case() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);
        let page = executor
            .execute(&parse_list_query("restaurants?sort=name").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["r-1", "r-3", "r-2"]);
    }

    #[test]
    fn test_sort_missing_values_last_both_directions() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);

        let page = executor
            .execute(&parse_list_query("invoices?sort=amount:asc").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["inv-3", "inv-1", "inv-2"]);

        let page = executor
            .execute(&parse_list_query("invoices?sort=amount:desc").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["inv-1", "inv-3", "inv-2"]);
    }

    #[test]
    fn test_sort_dates() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);
        let page = executor
            .execute(&parse_list_query("invoices?sort=invoice_date:desc").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["inv-1", "inv-3", "inv-2"]);
    }

    #[test]
    fn test_invoice_rows_carry_pending_flag() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);
        let page = executor
            .execute(&ListQuery::new(Collection::Invoices))
            .unwrap();
        assert_eq!(page.rows[1]["pending"], serde_json::Value::Bool(true));
        assert_eq!(page.rows[0]["pending"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_range_is_inclusive_and_clamped() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);

        let page = executor
            .execute(&parse_list_query("invoices?sort=invoice_date&range=0:1").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["inv-2", "inv-3"]);
        assert_eq!(page.total, 3);
        assert_eq!(format_page_summary(&page), "Showing 1-2 of 3 invoices");

        let page = executor
            .execute(&parse_list_query("invoices?range=2:50").unwrap())
            .unwrap();
        assert_eq!(ids(&page), vec!["inv-3"]);

        let page = executor
            .execute(&parse_list_query("invoices?range=10:20").unwrap())
            .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_page_far_past_the_end_is_empty() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);
        let mut query = ListQuery::new(Collection::Invoices);
        query.range = Some(PageRange::page(usize::MAX / 2, 25));

        let page = executor.execute(&query).unwrap();
        assert_eq!(page.total, 3);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_search_then_paginate() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);
        let mut query = parse_list_query("invoices?search=sysco&sort=amount").unwrap();
        query.range = Some(PageRange::page(1, 1));
        let page = executor.execute(&query).unwrap();
        assert_eq!(ids(&page), vec!["inv-1"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_unknown_sort_field() {
        let dataset = create_test_dataset();
        let executor = QueryExecutor::new(&dataset);
        let result = executor.execute(&parse_list_query("restaurants?sort=colour").unwrap());
        assert!(matches!(result, Err(QueryError::UnknownSortField { .. })));

        // Nothing to sort, nothing to complain about
        let result = executor.execute(&parse_list_query("prospects?sort=colour").unwrap());
        assert!(result.is_ok());
    }
}
