//! MARC bibliographic record structures and operations.
//!
//! This module provides the core record types used by the composition engine:
//! - [`Record`]: Bibliographic record, and the composite record built from it
//! - [`Field`]: Variable data fields (010+)
//! - [`Subfield`]: Named data elements within fields
//!
//! Data fields are kept in a single ordered sequence. Downstream indexing depends
//! on the exact position of merged holdings fields, so a record never regroups
//! its fields by tag.
//!
//! # Examples
//!
//! ```
//! use marc_liberator::{Field, Record};
//!
//! let record = Record::builder()
//!     .control_field("001", "12345")
//!     .field(
//!         Field::builder("245", '1', '0')
//!             .subfield('a', "Title")
//!             .build(),
//!     )
//!     .build();
//!
//! for field in record.fields_by_tag("245") {
//!     assert_eq!(field.get_subfield('a'), Some("Title"));
//! }
//! ```

use crate::marc_record::MarcRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Leader used for records built in memory (no length or base address yet).
pub const DEFAULT_LEADER: &str = "00000nam a2200000 a 4500";

/// A MARC bibliographic record
///
/// Control fields are keyed by tag in insertion order. Data fields are stored in
/// one `Vec`, so fields with different tags keep their relative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 characters)
    pub leader: String,
    /// Control fields (000-009) - tag -> value, preserves insertion order
    pub control_fields: IndexMap<String, String>,
    /// Data fields (010+) in record order
    pub fields: Vec<Field>,
}

/// A data field in a MARC record (fields 010 and higher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 digits)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Subfield {
    /// Create a subfield
    #[must_use]
    pub fn new(code: char, value: impl Into<String>) -> Self {
        Subfield {
            code,
            value: value.into(),
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new(DEFAULT_LEADER)
    }
}

impl Record {
    /// Create a new record with the given leader
    #[must_use]
    pub fn new(leader: impl Into<String>) -> Self {
        Record {
            leader: leader.into(),
            control_fields: IndexMap::new(),
            fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder {
            record: Record::default(),
        }
    }

    /// Add or replace a control field (000-009)
    pub fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.control_fields.insert(tag.into(), value.into());
    }

    /// Get a control field value
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    /// Append a data field after every existing field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get first field with a given tag
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Iterate over all data fields in record order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate over fields matching a specific tag
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    /// Iterate over fields whose tag is one of `tags`, in record order
    pub fn fields_by_tags<'a>(
        &'a self,
        tags: &'a [&'a str],
    ) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields
            .iter()
            .filter(move |f| tags.contains(&f.tag.as_str()))
    }

    /// Iterate over all control fields as (tag, value) tuples.
    pub fn control_fields_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.control_fields
            .iter()
            .map(|(tag, value)| (tag.as_str(), value.as_str()))
    }

    /// Remove fields matching a predicate
    ///
    /// Returns the removed fields in their original order.
    pub fn remove_fields_where<F>(&mut self, predicate: F) -> Vec<Field>
    where
        F: Fn(&Field) -> bool,
    {
        let mut removed = Vec::new();
        self.fields.retain(|field| {
            if predicate(field) {
                removed.push(field.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove every field whose tag is one of `tags`
    pub fn remove_fields_by_tags(&mut self, tags: &[&str]) -> Vec<Field> {
        self.remove_fields_where(|f| tags.contains(&f.tag.as_str()))
    }
}

impl MarcRecord for Record {
    fn leader(&self) -> &str {
        &self.leader
    }

    fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        Record::add_control_field(self, tag, value);
    }

    fn get_control_field(&self, tag: &str) -> Option<&str> {
        Record::get_control_field(self, tag)
    }

    fn control_fields_iter(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(Record::control_fields_iter(self))
    }

    fn data_fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Builder for fluently constructing records
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Replace the leader of the record being built
    #[must_use]
    pub fn leader(mut self, leader: impl Into<String>) -> Self {
        self.record.leader = leader.into();
        self
    }

    /// Add a control field to the record being built
    #[must_use]
    pub fn control_field(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.add_control_field(tag, value);
        self
    }

    /// Add a data field to the record being built
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl Field {
    /// Create a new data field
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for constructing fields fluently
    ///
    /// # Examples
    ///
    /// ```
    /// use marc_liberator::Field;
    ///
    /// let field = Field::builder("852", '0', '0')
    ///     .subfield('b', "f")
    ///     .subfield('h', "PS3511.I9")
    ///     .build();
    /// assert_eq!(field.get_subfield('b'), Some("f"));
    /// ```
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Append a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield::new(code, value));
    }

    /// Insert a subfield before every existing subfield
    pub fn prepend_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.insert(0, Subfield::new(code, value));
    }

    /// Get all values for a subfield code
    #[must_use]
    pub fn get_subfield_values(&self, code: char) -> Vec<&str> {
        self.subfields_by_code(code).collect()
    }

    /// Get first value for a subfield code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over all subfields
    pub fn subfields(&self) -> impl Iterator<Item = &Subfield> {
        self.subfields.iter()
    }

    /// Iterate over subfields with a specific code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Subfield codes in field order, e.g. `"0bhi"`
    #[must_use]
    pub fn subfield_codes(&self) -> String {
        self.subfields.iter().map(|sf| sf.code).collect()
    }

    /// Remove subfields matching a predicate
    ///
    /// Returns the removed subfields.
    pub fn remove_subfields_where<F>(&mut self, predicate: F) -> Vec<Subfield>
    where
        F: Fn(&Subfield) -> bool,
    {
        let mut removed = Vec::new();
        self.subfields.retain(|sf| {
            if predicate(sf) {
                removed.push(sf.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}

/// Builder for fluently constructing MARC fields
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield to the field being built
    #[must_use]
    pub fn subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Add a subfield only when `value` is present
    #[must_use]
    pub fn subfield_opt(mut self, code: char, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.field.add_subfield(code, value);
        }
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}
