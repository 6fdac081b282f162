use crate::records::collection::Collection;
use serde::Serialize;
use std::fmt;

/// Where an issue points: a file, a record, or a field inside a record
///
/// Rendered as slash-separated segments with list indices, e.g.
/// `inv-3/items[2]/unit` or `restaurants/r-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// A collection file as a whole
    pub fn file(name: &str) -> Self {
        Self(name.to_string())
    }

    /// A record addressed by id alone
    pub fn record(id: &str) -> Self {
        Self(id.to_string())
    }

    /// A record addressed within its collection (for ids that may clash)
    pub fn entry(collection: Collection, id: &str) -> Self {
        Self(format!("{}/{}", collection.key(), id))
    }

    pub fn field(mut self, name: &str) -> Self {
        self.0.push('/');
        self.0.push_str(name);
        self
    }

    /// One element of a nested list, e.g. `items[2]`
    pub fn element(mut self, list: &str, index: usize) -> Self {
        self.0.push_str(&format!("/{}[{}]", list, index));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<FieldPath>,
}

/// Issues found while loading or before saving. Errors block a save,
/// warnings are reported alongside it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: IssueSeverity, message: String, location: Option<FieldPath>) {
        self.issues.push(ValidationIssue {
            severity,
            message,
            location,
        });
    }

    pub fn add_error(&mut self, message: impl Into<String>, location: Option<FieldPath>) {
        self.push(IssueSeverity::Error, message.into(), location);
    }

    pub fn add_warning(&mut self, message: impl Into<String>, location: Option<FieldPath>) {
        self.push(IssueSeverity::Warning, message.into(), location);
    }

    fn with_severity(&self, severity: IssueSeverity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(IssueSeverity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Issues whose location is exactly `location`
    pub fn issues_at<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.location.as_ref().map(FieldPath::as_str) == Some(location))
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (severity, heading) in [
            (IssueSeverity::Error, "Errors"),
            (IssueSeverity::Warning, "Warnings"),
        ] {
            let mut issues = self.with_severity(severity).peekable();
            if issues.peek().is_none() {
                continue;
            }
            writeln!(f, "{}:", heading)?;
            for issue in issues {
                match &issue.location {
                    Some(path) => writeln!(f, "  [{}] {}", path, issue.message)?,
                    None => writeln!(f, "  {}", issue.message)?,
                }
            }
        }
        Ok(())
    }
}
