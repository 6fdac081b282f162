use crate::records::collection::Collection;
use crate::records::error::StoreError;
use crate::records::models::*;
use crate::records::validation::{FieldPath, ValidationResult};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Load every collection file found in `directory`
///
/// Missing files are empty collections. A file that fails to parse is
/// reported in the validation result and its collection is left empty, so
/// one broken file does not hide the rest of the data.
pub fn load_dataset_from_directory<P: AsRef<Path>>(
    directory: P,
) -> Result<(Dataset, ValidationResult), StoreError> {
    let dir_path = directory.as_ref();

    if !dir_path.exists() {
        return Err(StoreError::MissingDirectory(dir_path.display().to_string()));
    }

    if !dir_path.is_dir() {
        return Err(StoreError::NotADirectory(dir_path.display().to_string()));
    }

    let mut files = HashMap::new();
    for collection in Collection::ALL {
        let path = dir_path.join(collection.file_name());
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        files.insert(collection.file_name(), content);
    }

    let (dataset, validation) = load_dataset_from_files(files)?;
    info!(
        "Loaded {} restaurants, {} invoices, {} ingredients, {} menu items, {} prospects from {}",
        dataset.restaurants.len(),
        dataset.invoices.len(),
        dataset.ingredients.len(),
        dataset.menu_items.len(),
        dataset.prospects.len(),
        dir_path.display()
    );

    Ok((dataset, validation))
}

/// Load a dataset that will be written back with `save_dataset_to_directory`
///
/// Saving rewrites every collection file, so a file that failed to parse
/// would come back empty. Any load error is returned instead.
pub fn load_dataset_for_write<P: AsRef<Path>>(
    directory: P,
) -> Result<(Dataset, ValidationResult), StoreError> {
    let (dataset, validation) = load_dataset_from_directory(directory)?;
    if !validation.is_valid() {
        return Err(StoreError::Unwritable(validation));
    }
    Ok((dataset, validation))
}

/// Load a dataset from file contents (file name -> content map)
/// Used when a host hands over the files directly (wasm, tests)
pub fn load_dataset_from_files(
    files: HashMap<String, String>,
) -> Result<(Dataset, ValidationResult), StoreError> {
    let mut dataset = Dataset::default();
    let mut validation = ValidationResult::new();

    for (filename, content) in &files {
        let collection = match Collection::parse(filename) {
            Some(collection) => collection,
            None => {
                warn!("Skipping unknown collection file {}", filename);
                validation.add_warning(
                    format!("Unknown collection file '{}' ignored", filename),
                    Some(FieldPath::file(filename)),
                );
                continue;
            }
        };

        let loaded = match collection {
            Collection::Restaurants => {
                parse_collection(content, collection).map(|r| dataset.restaurants = r)
            }
            Collection::Invoices => {
                parse_collection(content, collection).map(|r| dataset.invoices = r)
            }
            Collection::Ingredients => {
                parse_collection(content, collection).map(|r| dataset.ingredients = r)
            }
            Collection::MenuItems => {
                parse_collection(content, collection).map(|r| dataset.menu_items = r)
            }
            Collection::Prospects => {
                parse_collection(content, collection).map(|r| dataset.prospects = r)
            }
            Collection::Activity => {
                parse_collection(content, collection).map(|r| dataset.activity = r)
            }
        };

        if let Err(e) = loaded {
            warn!("{}", e);
            validation.add_error(e.to_string(), Some(FieldPath::file(filename)));
        }
    }

    check_references(&dataset, &mut validation);

    Ok((dataset, validation))
}

/// Parse the array of tables stored under the collection's key
pub fn parse_collection<T: DeserializeOwned>(
    content: &str,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    let parse_err = |source: toml::de::Error| StoreError::Parse {
        file: collection.file_name(),
        source,
    };

    let table: toml::Table = toml::from_str(content).map_err(parse_err)?;
    match table.get(collection.key()) {
        Some(value) => value.clone().try_into().map_err(parse_err),
        None => Ok(Vec::new()),
    }
}

/// Render one collection file
pub fn render_collection<T: Serialize>(
    records: &[T],
    collection: Collection,
) -> Result<String, StoreError> {
    let ser_err = |source: toml::ser::Error| StoreError::Serialize {
        collection: collection.key().to_string(),
        source,
    };

    let mut table = toml::Table::new();
    table.insert(
        collection.key().to_string(),
        toml::Value::try_from(records).map_err(ser_err)?,
    );
    toml::to_string_pretty(&table).map_err(ser_err)
}

/// Write every collection into `directory`, creating it when needed.
/// Last writer wins: files are replaced wholesale.
pub fn save_dataset_to_directory<P: AsRef<Path>>(
    dataset: &Dataset,
    directory: P,
) -> Result<(), StoreError> {
    let dir_path = directory.as_ref();
    let io_err = |path: &Path| {
        let path = path.display().to_string();
        move |source: std::io::Error| StoreError::Io { path, source }
    };

    fs::create_dir_all(dir_path).map_err(io_err(dir_path))?;

    let rendered = [
        (
            Collection::Restaurants,
            render_collection(&dataset.restaurants, Collection::Restaurants)?,
        ),
        (
            Collection::Invoices,
            render_collection(&dataset.invoices, Collection::Invoices)?,
        ),
        (
            Collection::Ingredients,
            render_collection(&dataset.ingredients, Collection::Ingredients)?,
        ),
        (
            Collection::MenuItems,
            render_collection(&dataset.menu_items, Collection::MenuItems)?,
        ),
        (
            Collection::Prospects,
            render_collection(&dataset.prospects, Collection::Prospects)?,
        ),
        (
            Collection::Activity,
            render_collection(&dataset.activity, Collection::Activity)?,
        ),
    ];

    for (collection, content) in rendered {
        let path = dir_path.join(collection.file_name());
        fs::write(&path, content).map_err(io_err(&path))?;
    }

    info!("Saved dataset to {}", dir_path.display());
    Ok(())
}

fn check_duplicates<T: Record>(
    records: &[T],
    collection: Collection,
    validation: &mut ValidationResult,
) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            validation.add_warning(
                format!("Duplicate {} id '{}'", collection.record_kind(), record.id()),
                Some(FieldPath::entry(collection, record.id())),
            );
        }
    }
}

/// Warn about duplicate ids and references to records that do not exist
fn check_references(dataset: &Dataset, validation: &mut ValidationResult) {
    check_duplicates(&dataset.restaurants, Collection::Restaurants, validation);
    check_duplicates(&dataset.invoices, Collection::Invoices, validation);
    check_duplicates(&dataset.ingredients, Collection::Ingredients, validation);
    check_duplicates(&dataset.menu_items, Collection::MenuItems, validation);
    check_duplicates(&dataset.prospects, Collection::Prospects, validation);
    check_duplicates(&dataset.activity, Collection::Activity, validation);

    let restaurant_ids: HashSet<&str> = dataset.restaurants.iter().map(|r| r.id()).collect();
    let ingredient_ids: HashSet<&str> = dataset.ingredients.iter().map(|i| i.id()).collect();

    for invoice in &dataset.invoices {
        if !restaurant_ids.contains(invoice.restaurant_id.as_str()) {
            validation.add_warning(
                format!("Restaurant '{}' does not exist", invoice.restaurant_id),
                Some(FieldPath::record(&invoice.id).field("restaurant_id")),
            );
        }
        for (idx, item) in invoice.items.iter().enumerate() {
            if let Some(ingredient_id) = &item.ingredient_id {
                if !ingredient_ids.contains(ingredient_id.as_str()) {
                    validation.add_warning(
                        format!("Ingredient '{}' does not exist", ingredient_id),
                        Some(
                            FieldPath::record(&invoice.id)
                                .element("items", idx)
                                .field("ingredient_id"),
                        ),
                    );
                }
            }
        }
    }

    for ingredient in &dataset.ingredients {
        if !restaurant_ids.contains(ingredient.restaurant_id.as_str()) {
            validation.add_warning(
                format!("Restaurant '{}' does not exist", ingredient.restaurant_id),
                Some(FieldPath::record(&ingredient.id).field("restaurant_id")),
            );
        }
    }

    for menu_item in &dataset.menu_items {
        if !restaurant_ids.contains(menu_item.restaurant_id.as_str()) {
            validation.add_warning(
                format!("Restaurant '{}' does not exist", menu_item.restaurant_id),
                Some(FieldPath::record(&menu_item.id).field("restaurant_id")),
            );
        }
        for (idx, component) in menu_item.components.iter().enumerate() {
            if !ingredient_ids.contains(component.ingredient_id.as_str()) {
                validation.add_warning(
                    format!("Ingredient '{}' does not exist", component.ingredient_id),
                    Some(
                        FieldPath::record(&menu_item.id)
                            .element("components", idx)
                            .field("ingredient_id"),
                    ),
                );
            }
        }
    }
}
