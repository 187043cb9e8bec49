//! Circulation and acquisitions entities attached to a holding.
//!
//! These are the row-shaped values the data provider hands to the engines:
//! [`Item`] (a circulating copy), [`Order`] (an acquisitions line), [`Location`]
//! and [`Course`] (course-reserve context). All of them are plain owned values
//! scoped to one request.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Numeric identifier of a bib, holding, or item in the catalog.
pub type RecordId = u64;

/// Statuses that mean an item is out on loan and may carry a due date.
pub const CHARGED_STATUSES: [&str; 3] = ["Charged", "Renewed", "Overdue"];

/// The set of raw circulation statuses an item holds at once.
///
/// An item can be `Charged` and `Overdue` simultaneously, so status is a small
/// ordered list rather than a single value. Order is the provider's order and
/// is preserved when the set is joined for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemStatus(SmallVec<[String; 2]>);

impl ItemStatus {
    /// Create an empty status set
    #[must_use]
    pub fn new() -> Self {
        ItemStatus(SmallVec::new())
    }

    /// Add a raw status, ignoring duplicates
    pub fn insert(&mut self, status: impl Into<String>) {
        let status = status.into();
        if !self.contains(&status) {
            self.0.push(status);
        }
    }

    /// Whether the set contains `status` exactly
    #[must_use]
    pub fn contains(&self, status: &str) -> bool {
        self.0.iter().any(|s| s == status)
    }

    /// Whether the set contains any of `statuses`
    #[must_use]
    pub fn contains_any(&self, statuses: &[&str]) -> bool {
        statuses.iter().any(|s| self.contains(s))
    }

    /// Whether the item is charged, renewed, or overdue
    #[must_use]
    pub fn is_charged(&self) -> bool {
        self.contains_any(&CHARGED_STATUSES)
    }

    /// Iterate over raw statuses in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of statuses
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no status is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All statuses joined by `", "`
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for ItemStatus {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ItemStatus::new();
        for status in iter {
            set.insert(status);
        }
        set
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// The catalog's `Y`/`N` on-reserve flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReserveFlag {
    /// `Y` - item is on reserve
    #[serde(rename = "Y")]
    Yes,
    /// `N` - item is not on reserve
    #[default]
    #[serde(rename = "N")]
    No,
}

impl ReserveFlag {
    /// Whether the item is on reserve
    #[must_use]
    pub fn is_on_reserve(self) -> bool {
        self == ReserveFlag::Yes
    }
}

impl fmt::Display for ReserveFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveFlag::Yes => f.write_str("Y"),
            ReserveFlag::No => f.write_str("N"),
        }
    }
}

/// A single circulating copy tied to a holding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item id
    pub id: RecordId,
    /// Concurrent raw circulation statuses
    pub status: ItemStatus,
    /// On-reserve flag
    pub on_reserve: ReserveFlag,
    /// Copy number
    pub copy_number: u32,
    /// Position among the holding's items; `None` sorts last
    pub item_sequence_number: Option<u32>,
    /// Temporary location code, when the item is away from its home location
    pub temp_location: Option<String>,
    /// Permanent location code
    pub perm_location: String,
    /// Enumeration, e.g. `v.2`
    pub enumeration: Option<String>,
    /// Chronology, e.g. `1948`
    pub chronology: Option<String>,
    /// Barcode
    pub barcode: Option<String>,
    /// Current due date for charged items
    pub due_date: Option<NaiveDateTime>,
    /// When the item was created in the catalog
    pub create_date: Option<NaiveDateTime>,
    /// Item type code
    pub item_type: Option<String>,
    /// Circulation group that owns the item
    pub circ_group_id: Option<u32>,
    /// Patron group of the current borrower
    pub patron_group_charged: Option<String>,
}

impl Item {
    /// Combined enumeration/chronology display
    ///
    /// See [`enum_chron_display`].
    #[must_use]
    pub fn enum_chron(&self) -> Option<String> {
        enum_chron_display(self.enumeration.as_deref(), self.chronology.as_deref())
    }
}

/// Combine enumeration and chronology for display.
///
/// `"{enum} ({chron})"` when both are present, otherwise whichever one is.
/// Non-ASCII characters are stripped first; a value that is empty after
/// stripping counts as absent.
///
/// # Examples
///
/// ```
/// use marc_liberator::item::enum_chron_display;
///
/// assert_eq!(enum_chron_display(Some("v.2"), Some("1948")).as_deref(), Some("v.2 (1948)"));
/// assert_eq!(enum_chron_display(Some("v.1"), None).as_deref(), Some("v.1"));
/// assert_eq!(enum_chron_display(None, Some("1992")).as_deref(), Some("1992"));
/// assert_eq!(enum_chron_display(None, None), None);
/// ```
#[must_use]
pub fn enum_chron_display(enumeration: Option<&str>, chronology: Option<&str>) -> Option<String> {
    let enumeration = enumeration.map(valid_ascii).filter(|s| !s.is_empty());
    let chronology = chronology.map(valid_ascii).filter(|s| !s.is_empty());
    match (enumeration, chronology) {
        (Some(e), Some(c)) => Some(format!("{e} ({c})")),
        (Some(e), None) => Some(e),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    }
}

/// Strip every non-ASCII character.
#[must_use]
pub fn valid_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// An acquisitions order line scoped to a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Purchase order status code
    pub po_status: i32,
    /// Line item status code
    pub li_status: i32,
    /// Status date, when recorded
    pub date: Option<NaiveDateTime>,
}

/// A catalog location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location id
    pub id: RecordId,
    /// Location code, e.g. `f` or `rcppa`
    pub code: String,
    /// Display name
    pub display_name: String,
    /// Whether the location is hidden from the public catalog
    pub suppressed: bool,
}

/// Course-reserve context for items on reserve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Course {
    pub reserve_list_id: RecordId,
    pub department_name: Option<String>,
    pub department_code: Option<String>,
    pub course_name: Option<String>,
    pub course_number: Option<String>,
    pub section_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
