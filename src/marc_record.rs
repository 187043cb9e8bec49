//! Core trait shared by bibliographic and holdings records.
//!
//! Bib records and holdings (MFHD) records have the same shape: a leader, a set
//! of control fields (`001`-`009`) and an ordered sequence of data fields. The
//! [`MarcRecord`] trait lets the composition and availability code read either
//! kind through one interface.

use crate::record::Field;

/// Common trait for all MARC record types.
///
/// # Examples
///
/// ```
/// use marc_liberator::{HoldingsRecord, MarcRecord, Record};
///
/// fn describe<T: MarcRecord>(record: &T) -> String {
///     format!("{} ({} fields)", record.control_number().unwrap_or("?"), record.data_fields().len())
/// }
///
/// let mut bib = Record::default();
/// bib.add_control_field("001", "42");
/// assert_eq!(describe(&bib), "42 (0 fields)");
///
/// let holding = HoldingsRecord::default();
/// assert_eq!(describe(&holding), "? (0 fields)");
/// ```
pub trait MarcRecord {
    /// Get the raw 24-character leader.
    fn leader(&self) -> &str;

    /// Add or replace a control field (000-009).
    fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>);

    /// Get the value of a control field.
    ///
    /// Returns `None` if the field does not exist.
    fn get_control_field(&self, tag: &str) -> Option<&str>;

    /// Iterate over all control fields as (tag, value) tuples.
    fn control_fields_iter(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;

    /// All data fields in record order.
    fn data_fields(&self) -> &[Field];

    /// The record identifier from control field `001`, trimmed.
    ///
    /// Returns `None` when the field is missing or blank.
    #[must_use]
    fn control_number(&self) -> Option<&str> {
        self.get_control_field("001")
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Get all fields with a given tag, in record order.
    #[must_use]
    fn get_fields(&self, tag: &str) -> Vec<&Field> {
        self.data_fields().iter().filter(|f| f.tag == tag).collect()
    }

    /// Get the first field with a given tag.
    #[must_use]
    fn get_field(&self, tag: &str) -> Option<&Field> {
        self.data_fields().iter().find(|f| f.tag == tag)
    }
}
