//! Visitor record and summary rendering
//!
//! A `VisitorRecord` holds the slots collected during one intake
//! conversation. Its summary is rendered as a small YAML mapping that is
//! spoken back to the visitor and delivered to the notification sink, so
//! the key order and placeholder text are fixed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::intake::IntakeState;

/// Placeholder rendered for fields that were never provided
pub const UNKNOWN_PLACEHOLDER: &str = "unknown";

/// The four slots collected from a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorField {
    ApartmentNumber,
    ResidentName,
    VisitorName,
    VisitReason,
}

impl VisitorField {
    /// All fields in summary order
    pub const ALL: [VisitorField; 4] = [
        VisitorField::ApartmentNumber,
        VisitorField::ResidentName,
        VisitorField::VisitorName,
        VisitorField::VisitReason,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApartmentNumber => "apartment_number",
            Self::ResidentName => "resident_name",
            Self::VisitorName => "visitor_name",
            Self::VisitReason => "visit_reason",
        }
    }

    /// Human wording used in spoken responses
    pub fn spoken_name(&self) -> &'static str {
        match self {
            Self::ApartmentNumber => "apartment number",
            Self::ResidentName => "resident name",
            Self::VisitorName => "visitor name",
            Self::VisitReason => "reason for visit",
        }
    }
}

impl std::fmt::Display for VisitorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitorField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        VisitorField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Outcome of the resident directory check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResidentValidation {
    /// Not checked yet (or invalidated by a correction)
    #[default]
    Unknown,
    /// Directory confirmed the resident lives at the apartment
    Exists,
    /// Directory reported no such resident at the apartment
    Absent,
}

/// Slot values collected during a single intake conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    apartment_number: Option<String>,
    resident_name: Option<String>,
    resident_validation: ResidentValidation,
    visitor_name: Option<String>,
    visit_reason: Option<String>,
    confirmed: bool,
}

impl VisitorRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apartment_number(&self) -> Option<&str> {
        self.apartment_number.as_deref()
    }

    pub fn resident_name(&self) -> Option<&str> {
        self.resident_name.as_deref()
    }

    pub fn visitor_name(&self) -> Option<&str> {
        self.visitor_name.as_deref()
    }

    pub fn visit_reason(&self) -> Option<&str> {
        self.visit_reason.as_deref()
    }

    pub fn resident_validation(&self) -> ResidentValidation {
        self.resident_validation
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Get a field value by slot
    pub fn get(&self, field: VisitorField) -> Option<&str> {
        match field {
            VisitorField::ApartmentNumber => self.apartment_number(),
            VisitorField::ResidentName => self.resident_name(),
            VisitorField::VisitorName => self.visitor_name(),
            VisitorField::VisitReason => self.visit_reason(),
        }
    }

    /// Set a field value (last write wins)
    ///
    /// The value is trimmed; a blank value clears the field. Changing the
    /// apartment or resident invalidates any earlier directory check.
    pub fn set(&mut self, field: VisitorField, value: impl Into<String>) -> Result<()> {
        self.ensure_open()?;

        let value = value.into();
        let trimmed = value.trim();
        let new_value = (!trimmed.is_empty()).then(|| trimmed.to_string());

        let slot = match field {
            VisitorField::ApartmentNumber => &mut self.apartment_number,
            VisitorField::ResidentName => &mut self.resident_name,
            VisitorField::VisitorName => &mut self.visitor_name,
            VisitorField::VisitReason => &mut self.visit_reason,
        };
        let changed = *slot != new_value;
        *slot = new_value;

        if changed
            && matches!(field, VisitorField::ApartmentNumber | VisitorField::ResidentName)
        {
            self.resident_validation = ResidentValidation::Unknown;
        }

        Ok(())
    }

    /// Record the result of a directory check
    pub fn set_resident_validation(&mut self, validation: ResidentValidation) -> Result<()> {
        self.ensure_open()?;
        self.resident_validation = validation;
        Ok(())
    }

    /// True when all four fields are present
    pub fn is_complete(&self) -> bool {
        VisitorField::ALL.iter().all(|field| self.get(*field).is_some())
    }

    /// Absent fields, in summary order
    pub fn missing_fields(&self) -> Vec<VisitorField> {
        VisitorField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Seal the record as confirmed
    pub fn mark_confirmed(&mut self) -> Result<()> {
        self.ensure_open()?;
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::IncompleteRecord(
                missing.iter().map(|f| f.as_str().to_string()).collect(),
            ));
        }
        self.confirmed = true;
        Ok(())
    }

    /// Snapshot of the current values with placeholders for absent fields
    pub fn summary(&self) -> VisitSummary {
        let render = |value: Option<&str>| value.unwrap_or(UNKNOWN_PLACEHOLDER).to_string();
        VisitSummary {
            apartment_number: render(self.apartment_number()),
            resident_name: render(self.resident_name()),
            visitor_name: render(self.visitor_name()),
            visit_reason: render(self.visit_reason()),
        }
    }

    /// Rendered summary text
    pub fn summarize(&self) -> Result<String> {
        self.summary().render()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.confirmed {
            return Err(Error::RecordSealed {
                state: IntakeState::Confirmed,
            });
        }
        Ok(())
    }
}

/// Rendered form of a visitor record
///
/// Field order here is the rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSummary {
    pub apartment_number: String,
    pub resident_name: String,
    pub visitor_name: String,
    pub visit_reason: String,
}

impl VisitSummary {
    /// Render as a YAML mapping
    pub fn render(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a rendering produced by [`VisitSummary::render`]
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Field value, `None` for the placeholder
    pub fn value(&self, field: VisitorField) -> Option<&str> {
        let raw = match field {
            VisitorField::ApartmentNumber => &self.apartment_number,
            VisitorField::ResidentName => &self.resident_name,
            VisitorField::VisitorName => &self.visitor_name,
            VisitorField::VisitReason => &self.visit_reason,
        };
        (raw != UNKNOWN_PLACEHOLDER).then_some(raw.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> VisitorRecord {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::ApartmentNumber, "12B").unwrap();
        record.set(VisitorField::ResidentName, "Alice").unwrap();
        record.set(VisitorField::VisitorName, "Bob").unwrap();
        record.set(VisitorField::VisitReason, "delivery").unwrap();
        record
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = VisitorRecord::new();
        assert!(!record.is_complete());
        assert!(!record.is_confirmed());
        assert_eq!(record.missing_fields(), VisitorField::ALL.to_vec());
        assert_eq!(record.resident_validation(), ResidentValidation::Unknown);
    }

    #[test]
    fn test_set_trims_and_blank_clears() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::VisitorName, "  Bob ").unwrap();
        assert_eq!(record.visitor_name(), Some("Bob"));

        record.set(VisitorField::VisitorName, "   ").unwrap();
        assert_eq!(record.visitor_name(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::ApartmentNumber, "4A").unwrap();
        record.set(VisitorField::ApartmentNumber, "4C").unwrap();
        assert_eq!(record.apartment_number(), Some("4C"));
    }

    #[test]
    fn test_correction_resets_validation() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::ApartmentNumber, "12B").unwrap();
        record.set(VisitorField::ResidentName, "Alice").unwrap();
        record
            .set_resident_validation(ResidentValidation::Exists)
            .unwrap();

        // Same value again keeps the check
        record.set(VisitorField::ResidentName, "Alice").unwrap();
        assert_eq!(record.resident_validation(), ResidentValidation::Exists);

        // Visitor details don't affect it
        record.set(VisitorField::VisitorName, "Bob").unwrap();
        assert_eq!(record.resident_validation(), ResidentValidation::Exists);

        record.set(VisitorField::ApartmentNumber, "12C").unwrap();
        assert_eq!(record.resident_validation(), ResidentValidation::Unknown);
    }

    #[test]
    fn test_missing_fields_in_order() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::ResidentName, "Alice").unwrap();
        assert_eq!(
            record.missing_fields(),
            vec![
                VisitorField::ApartmentNumber,
                VisitorField::VisitorName,
                VisitorField::VisitReason
            ]
        );
    }

    #[test]
    fn test_mark_confirmed_requires_completion() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::ApartmentNumber, "12B").unwrap();
        let err = record.mark_confirmed().unwrap_err();
        assert!(matches!(err, Error::IncompleteRecord(ref missing) if missing.len() == 3));
        assert!(!record.is_confirmed());
    }

    #[test]
    fn test_sealed_record_rejects_mutation() {
        let mut record = complete_record();
        record.mark_confirmed().unwrap();

        let err = record.set(VisitorField::VisitorName, "Eve").unwrap_err();
        assert!(matches!(
            err,
            Error::RecordSealed {
                state: IntakeState::Confirmed
            }
        ));
        assert_eq!(record.visitor_name(), Some("Bob"));
        assert!(record
            .set_resident_validation(ResidentValidation::Absent)
            .is_err());
    }

    #[test]
    fn test_summary_rendering_order() {
        let text = complete_record().summarize().unwrap();
        assert_eq!(
            text,
            "apartment_number: 12B\nresident_name: Alice\nvisitor_name: Bob\nvisit_reason: delivery\n"
        );
    }

    #[test]
    fn test_summary_placeholders() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::VisitorName, "Bob").unwrap();
        let text = record.summarize().unwrap();
        assert!(text.contains("apartment_number: unknown"));
        assert!(text.contains("visitor_name: Bob"));

        let parsed = VisitSummary::parse(&text).unwrap();
        assert_eq!(parsed.value(VisitorField::ApartmentNumber), None);
        assert_eq!(parsed.value(VisitorField::VisitorName), Some("Bob"));
    }

    #[test]
    fn test_summary_parses_awkward_values() {
        let mut record = VisitorRecord::new();
        record.set(VisitorField::ApartmentNumber, "007").unwrap();
        record.set(VisitorField::ResidentName, "O'Brien: Jr.").unwrap();
        record.set(VisitorField::VisitorName, "yes").unwrap();
        record.set(VisitorField::VisitReason, "# fix the sink").unwrap();

        let parsed = VisitSummary::parse(&record.summarize().unwrap()).unwrap();
        for field in VisitorField::ALL {
            assert_eq!(parsed.value(field), record.get(field));
        }
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!(
            "visit_reason".parse::<VisitorField>().unwrap(),
            VisitorField::VisitReason
        );
        assert!("phone".parse::<VisitorField>().is_err());
    }
}
