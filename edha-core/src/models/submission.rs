//! Contact form submissions.
//!
//! A submission is an ordered field mapping, as collected from a form, plus
//! metadata injected just before sending. It is never retained after a
//! successful submit.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Hidden field that legitimate users never fill in.
pub const HONEYPOT_FIELD: &str = "_gotcha";

/// Page the form was submitted from.
pub const PAGE_FIELD: &str = "_page";

/// Submission timestamp (RFC 3339).
pub const SUBMITTED_AT_FIELD: &str = "_submitted_at";

/// Human-readable form label.
pub const LABEL_FIELD: &str = "_subject";

/// Ordered key-value mapping collected from form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: Vec<(String, String)>,
}

/// Metadata injected into a submission before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionMeta {
    /// URL of the page hosting the form.
    pub page_url: String,
    /// When the user submitted.
    pub submitted_at: DateTime<Utc>,
    /// Label identifying the form (e.g. "Bénévolat").
    pub label: String,
}

impl SubmissionMeta {
    /// Creates metadata stamped with the current time.
    pub fn now(page_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            submitted_at: Utc::now(),
            label: label.into(),
        }
    }
}

impl FormSubmission {
    /// Creates an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing an earlier value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Returns true when the honeypot field holds any value.
    pub fn honeypot_triggered(&self) -> bool {
        self.get(HONEYPOT_FIELD).is_some_and(|v| !v.is_empty())
    }

    /// Returns a copy augmented with metadata.
    ///
    /// An absent honeypot field is added empty, so the receiving side always
    /// sees it.
    #[must_use]
    pub fn with_metadata(&self, meta: &SubmissionMeta) -> Self {
        let mut out = self.clone();
        out.set(PAGE_FIELD, meta.page_url.as_str());
        out.set(
            SUBMITTED_AT_FIELD,
            meta.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        out.set(LABEL_FIELD, meta.label.as_str());
        if out.get(HONEYPOT_FIELD).is_none() {
            out.set(HONEYPOT_FIELD, "");
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = Self::new();
        for (k, v) in iter {
            submission.set(k, v);
        }
        submission
    }
}

impl Serialize for FormSubmission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_set_replaces_in_place() {
        let mut form = FormSubmission::new()
            .with("name", "Awa")
            .with("email", "awa@example.org");
        form.set("name", "Awa K.");

        let fields: Vec<_> = form.iter().collect();
        assert_eq!(fields, vec![("name", "Awa K."), ("email", "awa@example.org")]);
    }

    #[test]
    fn test_honeypot() {
        let form = FormSubmission::new().with("name", "x");
        assert!(!form.honeypot_triggered());
        assert!(!form.clone().with(HONEYPOT_FIELD, "").honeypot_triggered());
        assert!(form.clone().with(HONEYPOT_FIELD, " ").honeypot_triggered());
        assert!(form.with(HONEYPOT_FIELD, "http://spam").honeypot_triggered());
    }

    #[test]
    fn test_metadata_injection() {
        let meta = SubmissionMeta {
            page_url: "https://edha.org/#contact".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            label: "Bénévolat".to_string(),
        };

        let form = FormSubmission::new().with("name", "Awa");
        let sent = form.with_metadata(&meta);

        assert_eq!(form.len(), 1, "original untouched");
        assert_eq!(sent.get("name"), Some("Awa"));
        assert_eq!(sent.get(PAGE_FIELD), Some("https://edha.org/#contact"));
        assert_eq!(sent.get(SUBMITTED_AT_FIELD), Some("2024-05-01T12:00:00.000Z"));
        assert_eq!(sent.get(LABEL_FIELD), Some("Bénévolat"));
        assert_eq!(sent.get(HONEYPOT_FIELD), Some(""));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let form: FormSubmission = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&form).unwrap(), r#"{"b":"2","a":"1"}"#);
    }
}
