//! MARC Holdings (MFHD) record structures and utilities.
//!
//! Holdings records describe where a bib's copies live: the location and call
//! number (852), textual holdings statements (866-868) and links (856). The
//! composition engine grafts these fields onto the bib; the availability code
//! reads the location code and call number from them.

use crate::marc_record::MarcRecord;
use crate::record::{Field, DEFAULT_LEADER};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Location field tag.
pub const LOCATION_TAG: &str = "852";

lazy_static! {
    static ref RECAP_LOCATION: Regex = Regex::new(r"^rcp[a-z]{2}$").unwrap();
}

/// A MARC Holdings record
///
/// Same shape as a bib [`Record`](crate::Record): control fields keyed by tag,
/// data fields in record order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsRecord {
    /// Record leader (24 characters)
    pub leader: String,
    /// Control fields (000-009) - preserves insertion order
    pub control_fields: IndexMap<String, String>,
    /// Variable fields (010+) in record order
    pub fields: Vec<Field>,
}

impl Default for HoldingsRecord {
    fn default() -> Self {
        HoldingsRecord::new(DEFAULT_LEADER)
    }
}

impl HoldingsRecord {
    /// Create a new holdings record with the given leader
    #[must_use]
    pub fn new(leader: impl Into<String>) -> Self {
        HoldingsRecord {
            leader: leader.into(),
            control_fields: IndexMap::new(),
            fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing holdings records
    #[must_use]
    pub fn builder() -> HoldingsRecordBuilder {
        HoldingsRecordBuilder {
            record: HoldingsRecord::default(),
        }
    }

    /// Add a control field
    pub fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.control_fields.insert(tag.into(), value.into());
    }

    /// Get a control field value
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    /// Append a field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// The holding id from `001`, used as the provenance key for merged fields
    #[must_use]
    pub fn holding_id(&self) -> Option<&str> {
        self.control_number()
    }

    /// Get the location field (852)
    ///
    /// Holdings carry at most one 852; if a record has more, the first wins.
    #[must_use]
    pub fn location(&self) -> Option<&Field> {
        self.get_field(LOCATION_TAG)
    }

    /// The location code from 852 `$b`, or `""` when the field or subfield is missing
    #[must_use]
    pub fn location_code(&self) -> &str {
        self.location()
            .and_then(|f| f.get_subfield('b'))
            .unwrap_or("")
    }

    /// The call number assembled from 852 `$h` and `$i`
    ///
    /// Returns `None` when there is no `$h`. Leading blanks are trimmed.
    #[must_use]
    pub fn call_number(&self) -> Option<String> {
        self.location().and_then(call_number_from_location)
    }

    /// Textual holdings notes: each 866 `$a` followed by that field's `$z` public notes
    #[must_use]
    pub fn holdings_notes(&self) -> Vec<&str> {
        let mut notes = Vec::new();
        for field in self.get_fields("866") {
            if let Some(statement) = field.get_subfield('a') {
                notes.push(statement);
            }
            notes.extend(field.subfields_by_code('z'));
        }
        notes
    }

    /// Whether this holding is an electronic resource (location code starts with `elf`)
    #[must_use]
    pub fn is_electronic(&self) -> bool {
        is_electronic_location(self.location_code())
    }

    /// Whether this holding sits in a ReCAP remote-storage location (`rcp` + 2 letters)
    #[must_use]
    pub fn is_recap(&self) -> bool {
        is_recap_location(self.location_code())
    }
}

/// Whether a location code denotes an electronic resource.
#[must_use]
pub fn is_electronic_location(code: &str) -> bool {
    code.starts_with("elf")
}

/// Whether a location code matches the ReCAP pattern `rcp` + 2 lowercase letters.
#[must_use]
pub fn is_recap_location(code: &str) -> bool {
    RECAP_LOCATION.is_match(code)
}

/// Build a call number from an 852: `$h`, then `" " + $i` when present.
#[must_use]
pub fn call_number_from_location(field: &Field) -> Option<String> {
    let mut call_no = field.get_subfield('h')?.to_string();
    if let Some(item_part) = field.get_subfield('i') {
        call_no.push(' ');
        call_no.push_str(item_part);
    }
    Some(call_no.trim_start().to_string())
}

impl MarcRecord for HoldingsRecord {
    fn leader(&self) -> &str {
        &self.leader
    }

    fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.control_fields.insert(tag.into(), value.into());
    }

    fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    fn control_fields_iter(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.control_fields
                .iter()
                .map(|(tag, value)| (tag.as_str(), value.as_str())),
        )
    }

    fn data_fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Builder for fluently constructing holdings records
#[derive(Debug)]
pub struct HoldingsRecordBuilder {
    record: HoldingsRecord,
}

impl HoldingsRecordBuilder {
    /// Add a control field
    #[must_use]
    pub fn control_field(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.add_control_field(tag, value);
        self
    }

    /// Set the location field (852)
    ///
    /// A second call replaces the earlier 852 in place.
    #[must_use]
    pub fn location(mut self, field: Field) -> Self {
        let existing = self.record.fields.iter().position(|f| f.tag == LOCATION_TAG);
        match existing {
            Some(index) => self.record.fields[index] = field,
            None => self.record.add_field(field),
        }
        self
    }

    /// Add any other field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the holdings record
    #[must_use]
    pub fn build(self) -> HoldingsRecord {
        self.record
    }
}
