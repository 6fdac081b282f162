//! Sales prospects. Every create, update and delete leaves an entry in the
//! activity log.

use crate::records::error::StoreError;
use crate::records::models::{next_id, ActivityLog, ActivityType, Dataset, ProspectiveClient};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProspectError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Business name is required")]
    BlankName,
}

/// Fields for a new prospect
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProspectDraft {
    pub business_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_contacted_date: Option<NaiveDate>,
}

/// Partial update: `None` leaves a field alone, a blank string clears it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProspectUpdate {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_contacted_date: Option<NaiveDate>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Apply `update` to one optional text field, recording its name when it changes
fn apply_field(
    target: &mut Option<String>,
    update: Option<String>,
    name: &'static str,
    changed: &mut Vec<&'static str>,
) {
    if let Some(value) = update {
        let value = non_blank(Some(value));
        if *target != value {
            *target = value;
            changed.push(name);
        }
    }
}

fn activity(
    activity_type: ActivityType,
    title: String,
    prospect: &ProspectiveClient,
    details: Option<String>,
    now: DateTime<Utc>,
) -> ActivityLog {
    let mut metadata = BTreeMap::new();
    metadata.insert("prospect_id".to_string(), prospect.id.clone());
    ActivityLog {
        id: String::new(),
        activity_type,
        title,
        subtitle: prospect.contact_name.clone(),
        details,
        timestamp: now,
        metadata,
    }
}

pub fn create_prospect(
    dataset: &mut Dataset,
    draft: ProspectDraft,
    now: DateTime<Utc>,
) -> Result<ProspectiveClient, ProspectError> {
    let business_name = draft.business_name.trim().to_string();
    if business_name.is_empty() {
        return Err(ProspectError::BlankName);
    }

    let prospect = ProspectiveClient {
        id: next_id(&dataset.prospects, "p"),
        business_name,
        contact_name: non_blank(draft.contact_name),
        email: non_blank(draft.email),
        phone: non_blank(draft.phone),
        address: non_blank(draft.address),
        city: non_blank(draft.city),
        state: non_blank(draft.state),
        notes: non_blank(draft.notes),
        last_contacted_date: draft.last_contacted_date,
        created_at: now,
    };

    dataset.prospects.push(prospect.clone());
    dataset.append_activity(activity(
        ActivityType::ProspectCreated,
        format!("New prospect: {}", prospect.business_name),
        &prospect,
        prospect.city.clone(),
        now,
    ));
    info!("Created prospect {} ({})", prospect.id, prospect.business_name);

    Ok(prospect)
}

/// Returns the names of the fields that actually changed. No activity is
/// logged when nothing changed.
pub fn update_prospect(
    dataset: &mut Dataset,
    id: &str,
    update: ProspectUpdate,
    now: DateTime<Utc>,
) -> Result<Vec<&'static str>, ProspectError> {
    let prospect = dataset
        .prospect_mut(id)
        .ok_or_else(|| StoreError::not_found("Prospect", id))?;

    let mut changed = Vec::new();
    if let Some(name) = update.business_name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ProspectError::BlankName);
        }
        if prospect.business_name != name {
            prospect.business_name = name;
            changed.push("business_name");
        }
    }
    apply_field(&mut prospect.contact_name, update.contact_name, "contact_name", &mut changed);
    apply_field(&mut prospect.email, update.email, "email", &mut changed);
    apply_field(&mut prospect.phone, update.phone, "phone", &mut changed);
    apply_field(&mut prospect.address, update.address, "address", &mut changed);
    apply_field(&mut prospect.city, update.city, "city", &mut changed);
    apply_field(&mut prospect.state, update.state, "state", &mut changed);
    apply_field(&mut prospect.notes, update.notes, "notes", &mut changed);
    if let Some(date) = update.last_contacted_date {
        if prospect.last_contacted_date != Some(date) {
            prospect.last_contacted_date = Some(date);
            changed.push("last_contacted_date");
        }
    }

    if changed.is_empty() {
        return Ok(changed);
    }

    let snapshot = prospect.clone();
    let mut entry = activity(
        ActivityType::ProspectUpdated,
        format!("Prospect updated: {}", snapshot.business_name),
        &snapshot,
        Some(format!("Changed {}", changed.join(", "))),
        now,
    );
    entry
        .metadata
        .insert("changed_fields".to_string(), changed.join(","));
    dataset.append_activity(entry);
    info!("Updated prospect {} ({})", snapshot.id, changed.join(", "));

    Ok(changed)
}

pub fn delete_prospect(
    dataset: &mut Dataset,
    id: &str,
    now: DateTime<Utc>,
) -> Result<ProspectiveClient, ProspectError> {
    let index = dataset
        .prospects
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| StoreError::not_found("Prospect", id))?;
    let removed = dataset.prospects.remove(index);

    dataset.append_activity(activity(
        ActivityType::ProspectDeleted,
        format!("Prospect removed: {}", removed.business_name),
        &removed,
        None,
        now,
    ));
    info!("Deleted prospect {} ({})", removed.id, removed.business_name);

    Ok(removed)
}

/// Activity feed, newest first
pub fn list_activity(dataset: &Dataset, limit: Option<usize>) -> Vec<&ActivityLog> {
    let mut entries: Vec<&ActivityLog> = dataset.activity.iter().collect();
    // Stable: entries sharing a timestamp keep reverse insertion order
    entries.reverse();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit.unwrap_or(entries.len()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-17T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn draft(name: &str) -> ProspectDraft {
        ProspectDraft {
            business_name: name.to_string(),
            contact_name: Some("Robin Park".to_string()),
            city: Some("Portland".to_string()),
            email: Some("   ".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_logs_activity() {
        let mut dataset = Dataset::default();
        let prospect = create_prospect(&mut dataset, draft(" Corner Cafe "), now()).unwrap();

        assert_eq!(prospect.id, "p-1");
        assert_eq!(prospect.business_name, "Corner Cafe");
        assert_eq!(prospect.email, None);
        assert_eq!(dataset.prospects.len(), 1);

        let entry = &dataset.activity[0];
        assert_eq!(entry.activity_type, ActivityType::ProspectCreated);
        assert_eq!(entry.title, "New prospect: Corner Cafe");
        assert_eq!(entry.metadata["prospect_id"], "p-1");
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut dataset = Dataset::default();
        assert!(matches!(
            create_prospect(&mut dataset, draft("  "), now()),
            Err(ProspectError::BlankName)
        ));
        assert!(dataset.activity.is_empty());
    }

    #[test]
    fn test_update_records_changed_fields() {
        let mut dataset = Dataset::default();
        create_prospect(&mut dataset, draft("Corner Cafe"), now()).unwrap();

        let update = ProspectUpdate {
            city: Some("Portland".to_string()),
            notes: Some("Interested in weekly reports".to_string()),
            contact_name: Some(String::new()),
            ..Default::default()
        };
        let changed = update_prospect(&mut dataset, "p-1", update, now()).unwrap();
        assert_eq!(changed, vec!["contact_name", "notes"]);

        let prospect = dataset.prospect("p-1").unwrap();
        assert_eq!(prospect.contact_name, None);
        assert_eq!(dataset.activity.len(), 2);
        assert_eq!(dataset.activity[1].metadata["changed_fields"], "contact_name,notes");
    }

    #[test]
    fn test_noop_update_logs_nothing() {
        let mut dataset = Dataset::default();
        create_prospect(&mut dataset, draft("Corner Cafe"), now()).unwrap();
        let changed =
            update_prospect(&mut dataset, "p-1", ProspectUpdate::default(), now()).unwrap();
        assert!(changed.is_empty());
        assert_eq!(dataset.activity.len(), 1);
    }

    #[test]
    fn test_delete_and_feed_order() {
        let mut dataset = Dataset::default();
        create_prospect(&mut dataset, draft("Corner Cafe"), now()).unwrap();
        create_prospect(&mut dataset, draft("Night Owl"), now() + Duration::minutes(5)).unwrap();
        let removed =
            delete_prospect(&mut dataset, "p-1", now() + Duration::minutes(10)).unwrap();
        assert_eq!(removed.business_name, "Corner Cafe");
        assert_eq!(dataset.prospects.len(), 1);

        let feed = list_activity(&dataset, Some(2));
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].activity_type, ActivityType::ProspectDeleted);
        assert_eq!(feed[1].title, "New prospect: Night Owl");

        assert!(matches!(
            delete_prospect(&mut dataset, "p-1", now()),
            Err(ProspectError::Store(StoreError::NotFound { .. }))
        ));
    }
}
