//! Alert record boundary shape.
//!
//! Consumed as a plain structured value. Enumerated fields are enforced by
//! decoding into closed enums; nothing else is validated here.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What produced the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertType {
    Rule,
    Policy,
}

/// Severity at the time the alert was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// User-provided triage status. `Unset` is written as the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    #[default]
    #[serde(rename = "")]
    Unset,
    Open,
    Triaged,
    Closed,
    Resolved,
}

/// One alert as delivered to outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    /// Rule or policy that triggered the alert.
    pub analysis_id: String,

    #[serde(rename = "type")]
    pub alert_type: AlertType,

    pub created_at: DateTime<Utc>,

    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_name: Option<String>,

    /// Object version of the rule or policy body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook: Option<String>,

    /// Always written, empty when unset.
    #[serde(default)]
    pub status: AlertStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Parent alert this record belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AlertRecord {
    pub fn new(
        analysis_id: impl Into<String>,
        alert_type: AlertType,
        created_at: DateTime<Utc>,
        severity: Severity,
    ) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            alert_type,
            created_at,
            severity,
            output_ids: Vec::new(),
            analysis_description: None,
            analysis_name: None,
            version: None,
            runbook: None,
            status: AlertStatus::Unset,
            tags: Vec::new(),
            alert_id: None,
            title: None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "analysisId": "AWS.S3.PublicBucket",
        "type": "POLICY",
        "createdAt": "2020-01-02T03:04:05Z",
        "severity": "HIGH",
        "outputIds": ["slack-1"],
        "analysisName": "Public bucket",
        "status": "TRIAGED",
        "tags": ["aws", "s3"],
        "alertId": "a-123",
        "title": "Bucket is public"
    }"#;

    #[test]
    fn test_decode_full_record() {
        let alert: AlertRecord = serde_json::from_str(FULL).unwrap();
        assert_eq!(alert.alert_type, AlertType::Policy);
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.status, AlertStatus::Triaged);
        assert_eq!(alert.output_ids, vec!["slack-1"]);
        assert_eq!(alert.alert_id.as_deref(), Some("a-123"));
        assert!(alert.runbook.is_none());
    }

    #[test]
    fn test_minimal_record_round_trip() {
        let created = DateTime::parse_from_rfc3339("2020-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let alert = AlertRecord::new("Rule.One", AlertType::Rule, created, Severity::Info);
        let json = serde_json::to_string(&alert).unwrap();
        let expected = concat!(
            r#"{"analysisId":"Rule.One","type":"RULE","#,
            r#""createdAt":"2020-01-02T03:04:05Z","severity":"INFO","status":""}"#
        );
        assert_eq!(json, expected);
        let back: AlertRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alert);
    }

    #[test]
    fn test_enum_constraints() {
        let bad_severity = FULL.replace(r#""HIGH""#, r#""URGENT""#);
        assert!(serde_json::from_str::<AlertRecord>(&bad_severity).is_err());

        let bad_type = FULL.replace(r#""POLICY""#, r#""QUERY""#);
        assert!(serde_json::from_str::<AlertRecord>(&bad_type).is_err());

        let unset = FULL.replace(r#""TRIAGED""#, r#""""#);
        let alert: AlertRecord = serde_json::from_str(&unset).unwrap();
        assert_eq!(alert.status, AlertStatus::Unset);
    }

    #[test]
    fn test_required_fields() {
        let missing = r#"{"analysisId":"x","type":"RULE","severity":"LOW"}"#;
        let err = serde_json::from_str::<AlertRecord>(missing).unwrap_err();
        assert!(err.to_string().contains("createdAt"));
    }
}
