#[cfg(test)]
mod tests {
    use super::super::collection::Collection;
    use super::super::error::StoreError;
    use super::super::loader::*;
    use super::super::models::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    const RESTAURANTS: &str = r#"
[[restaurants]]
id = "r-1"
name = "Blue Door Bistro"
contact_name = "Sam Ortiz"
"#;

    const INVOICES: &str = r#"
[[invoices]]
id = "inv-1"
restaurant_id = "r-1"
invoice_number = "SY-1001"
invoice_date = "2026-09-14"
supplier = "Sysco"
amount = 50.0

[[invoices.items]]
id = "item-1"
item_name = "Chicken thighs"
quantity = 10.0
unit = "lbs"
amount = 50.0
ingredient_id = "ing-1"

[[invoices]]
id = "inv-2"
restaurant_id = "r-9"
supplier = "US Foods"
"#;

    const INGREDIENTS: &str = r#"
[[ingredients]]
id = "ing-1"
restaurant_id = "r-1"
name = "Chicken thigh"
unit = "lb"
last_price = 4.5
"#;

    fn files(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect()
    }

    #[test]
    fn test_load_dataset_from_files() {
        let (dataset, validation) = load_dataset_from_files(files(&[
            ("restaurants.toml", RESTAURANTS),
            ("invoices.toml", INVOICES),
            ("ingredients.toml", INGREDIENTS),
        ]))
        .unwrap();

        assert_eq!(dataset.restaurants.len(), 1);
        assert_eq!(dataset.invoices.len(), 2);
        assert!(dataset.menu_items.is_empty());

        let invoice = dataset.invoice("inv-1").unwrap();
        assert_eq!(invoice.invoice_date, NaiveDate::from_ymd_opt(2026, 9, 14));
        assert_eq!(invoice.items[0].standardized().standardized_cost, Some(0.3125));
        assert!(!invoice.is_pending());

        // inv-2 points at a restaurant that does not exist
        assert!(validation.is_valid());
        assert_eq!(validation.issues_at("inv-2/restaurant_id").count(), 1);
    }

    #[test]
    fn test_pending_is_derived_from_missing_fields() {
        let (mut dataset, _) =
            load_dataset_from_files(files(&[("invoices.toml", INVOICES)])).unwrap();

        let pending: Vec<&str> = dataset.pending_invoices().map(|i| i.id.as_str()).collect();
        assert_eq!(pending, vec!["inv-2"]);
        assert_eq!(
            dataset.invoice("inv-2").unwrap().missing_fields(),
            vec!["invoice_number", "invoice_date", "amount"]
        );

        // Clearing a required field flips the classification
        dataset.invoice_mut("inv-1").unwrap().supplier = Some("  ".to_string());
        assert!(dataset.invoice("inv-1").unwrap().is_pending());
    }

    #[test]
    fn test_broken_file_reported_not_fatal() {
        let (dataset, validation) = load_dataset_from_files(files(&[
            ("restaurants.toml", RESTAURANTS),
            ("ingredients.toml", "[[ingredients]]\nid = "),
            ("notes.toml", "x = 1"),
        ]))
        .unwrap();

        assert_eq!(dataset.restaurants.len(), 1);
        assert!(dataset.ingredients.is_empty());
        assert_eq!(validation.error_count(), 1);
        assert_eq!(validation.warning_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_warned() {
        let doubled = format!("{}{}", RESTAURANTS, RESTAURANTS);
        let (_, validation) =
            load_dataset_from_files(files(&[("restaurants.toml", &doubled)])).unwrap();
        assert_eq!(validation.issues_at("restaurants/r-1").count(), 1);
    }

    #[test]
    fn test_save_and_reload_directory() {
        let (dataset, _) = load_dataset_from_files(files(&[
            ("restaurants.toml", RESTAURANTS),
            ("invoices.toml", INVOICES),
            ("ingredients.toml", INGREDIENTS),
        ]))
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        save_dataset_to_directory(&dataset, dir.path()).unwrap();
        for collection in Collection::ALL {
            assert!(dir.path().join(collection.file_name()).exists());
        }

        let (reloaded, validation) = load_dataset_from_directory(dir.path()).unwrap();
        assert_eq!(reloaded, dataset);
        assert!(validation.is_valid());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_dataset_from_directory(&missing).is_err());
    }

    #[test]
    fn test_write_load_refuses_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = "[[invoices]]\nid = \"inv-1\"\nrestaurant_id = ";
        std::fs::write(dir.path().join("restaurants.toml"), RESTAURANTS).unwrap();
        std::fs::write(dir.path().join("invoices.toml"), broken).unwrap();

        // A plain load still succeeds for read-only views
        let (dataset, validation) = load_dataset_from_directory(dir.path()).unwrap();
        assert!(dataset.invoices.is_empty());
        assert_eq!(validation.error_count(), 1);

        match load_dataset_for_write(dir.path()) {
            Err(StoreError::Unwritable(validation)) => {
                assert_eq!(validation.issues_at("invoices.toml").count(), 1);
            }
            other => panic!("expected Unwritable, got {:?}", other.map(|_| ())),
        }

        // The unreadable file is left for the user to fix
        let on_disk = std::fs::read_to_string(dir.path().join("invoices.toml")).unwrap();
        assert_eq!(on_disk, broken);
    }

    #[test]
    fn test_write_load_then_save_keeps_other_collections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("restaurants.toml"), RESTAURANTS).unwrap();
        std::fs::write(dir.path().join("invoices.toml"), INVOICES).unwrap();

        let (mut dataset, _) = load_dataset_for_write(dir.path()).unwrap();
        dataset.restaurants[0].phone = Some("555-0100".to_string());
        save_dataset_to_directory(&dataset, dir.path()).unwrap();

        let (reloaded, _) = load_dataset_from_directory(dir.path()).unwrap();
        assert_eq!(reloaded.invoices.len(), 2);
        assert_eq!(reloaded.restaurants[0].phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_next_id() {
        let (dataset, _) =
            load_dataset_from_files(files(&[("invoices.toml", INVOICES)])).unwrap();
        assert_eq!(next_id(&dataset.invoices, "inv"), "inv-3");
        assert_eq!(next_id(&dataset.prospects, "p"), "p-1");
    }
}
