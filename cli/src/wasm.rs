// WebAssembly bindings for the unit engine and data views
use crate::analytics;
use crate::query;
use crate::records;
use crate::units::{self, UnitResolution};
use chrono::NaiveDate;
use js_sys::Array;
use serde_json::json;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

fn to_js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js_error("Failed to serialize result", e))
}

/// Returns JSON: the matched unit descriptor, or `{"unresolved": input}`
#[wasm_bindgen(js_name = normalizeUnit)]
pub fn normalize_unit(input: &str) -> Result<String, JsValue> {
    match units::normalize_unit(input) {
        UnitResolution::Resolved(descriptor) => to_json(descriptor),
        UnitResolution::Unresolved(original) => to_json(&json!({ "unresolved": original })),
    }
}

/// Returns JSON `{valid, message?}`; never throws for any input text
#[wasm_bindgen(js_name = validateUnit)]
pub fn validate_unit(input: &str) -> String {
    let validation = units::validate_unit(input);
    serde_json::to_string(&validation)
        .unwrap_or_else(|_| json!({ "valid": validation.valid }).to_string())
}

#[wasm_bindgen(js_name = getUnitCategory)]
pub fn get_unit_category(unit: &str) -> Option<String> {
    units::get_unit_category(unit).map(|c| c.as_str().to_string())
}

#[wasm_bindgen(js_name = getStandardUnitForUnit)]
pub fn get_standard_unit_for_unit(unit: &str) -> Option<String> {
    units::get_standard_unit_for_unit(unit).map(str::to_string)
}

#[wasm_bindgen(js_name = getUnitSuggestions)]
pub fn get_unit_suggestions(partial_input: &str) -> Array {
    units::get_unit_suggestions(partial_input)
        .iter()
        .map(JsValue::from_str)
        .collect()
}

/// Returns JSON `{standardizedCost, referenceUnit}` or throws the error kind
/// and message, e.g. "UnresolvedUnit: Unrecognized unit 'bushel'"
#[wasm_bindgen(js_name = calculateStandardizedCost)]
pub fn calculate_standardized_cost(
    quantity: f64,
    unit: &str,
    amount: f64,
) -> Result<String, JsValue> {
    let cost = units::calculate_standardized_cost(quantity, unit, amount)
        .map_err(|e| JsValue::from_str(&e.tagged_message()))?;
    to_json(&cost)
}

fn load_files(files_json: &str) -> Result<records::Dataset, JsValue> {
    let files: HashMap<String, String> = serde_json::from_str(files_json)
        .map_err(|e| to_js_error("Failed to parse files JSON", e))?;
    let (dataset, _validation) = records::load_dataset_from_files(files)
        .map_err(|e| to_js_error("Failed to load data", e))?;
    Ok(dataset)
}

/// Run a list query against collection files supplied by the host
/// files_json: JSON object mapping file name -> TOML content
#[wasm_bindgen(js_name = queryFromFiles)]
pub fn query_from_files(files_json: &str, query_str: &str) -> Result<String, JsValue> {
    let dataset = load_files(files_json)?;
    let list_query = query::parse_list_query(query_str)
        .map_err(|e| to_js_error("Failed to parse query", e))?;
    let page = query::QueryExecutor::new(&dataset)
        .execute(&list_query)
        .map_err(|e| to_js_error("Query error", e))?;
    to_json(&page)
}

/// Dashboard figures; `today` is an ISO date from the host clock
#[wasm_bindgen(js_name = dashboardStats)]
pub fn dashboard_stats(files_json: &str, today: &str) -> Result<String, JsValue> {
    let dataset = load_files(files_json)?;
    let today: NaiveDate = today
        .parse()
        .map_err(|e| to_js_error("Invalid date", e))?;
    to_json(&analytics::dashboard_stats(&dataset, today))
}
