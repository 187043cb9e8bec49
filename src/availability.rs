//! Real-time availability of holdings and their items.
//!
//! Two views are provided:
//! - [`AvailabilityResolver::summarize`]: one summary per holding, driven by
//!   the holding's first item (or by its order status when it has no items)
//! - [`AvailabilityResolver::full_listing`]: one entry per item, sorted by
//!   item sequence number, highest first
//!
//! Statuses are reported raw. Use [`status_label`](crate::status_label) to turn
//! them into display labels.

use crate::config::LiberatorConfig;
use crate::due_date::format_due_date;
use crate::error::Result;
use crate::holdings_record::is_electronic_location;
use crate::item::{Course, Item, ItemStatus, RecordId, ReserveFlag};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

/// Status reported for an electronic holding without items or orders.
pub const ONLINE: &str = "Online";
/// Status reported for a physical holding without items or orders.
pub const ON_SHELF: &str = "On Shelf";

/// Availability summary for one holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingAvailability {
    /// Raw status text: the first item's statuses joined by `", "`, the order
    /// status, `Online` or `On Shelf`
    pub status: String,
    /// Holding location code (852 `$b`)
    pub location: String,
    /// Whether the holding has more than one item
    pub more_items: bool,
    /// First item's copy number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_number: Option<u32>,
    /// First item's id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<RecordId>,
    /// First item's on-reserve flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_reserve: Option<ReserveFlag>,
    /// First item's formatted due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// First item's temporary location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_location: Option<String>,
    /// Course reserves for the holding's items, when the first item is in a temporary location
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub course_reserves: Vec<Course>,
}

impl HoldingAvailability {
    fn without_items(status: String, location: &str) -> Self {
        HoldingAvailability {
            status,
            location: location.to_string(),
            more_items: false,
            copy_number: None,
            item_id: None,
            on_reserve: None,
            due_date: None,
            temp_location: None,
            course_reserves: Vec::new(),
        }
    }
}

/// Availability of a single item in a full-holding listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAvailability {
    /// Item id
    pub id: RecordId,
    /// Barcode
    pub barcode: Option<String>,
    /// Permanent location code
    pub location: String,
    /// Temporary location code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_location: Option<String>,
    /// Copy number
    pub copy_number: u32,
    /// Sequence number within the holding
    pub item_sequence_number: Option<u32>,
    /// Raw statuses
    pub status: ItemStatus,
    /// On-reserve flag
    pub on_reserve: ReserveFlag,
    /// Formatted due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Enumeration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<String>,
    /// Chronology
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chronology: Option<String>,
    /// Combined enumeration/chronology display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_display: Option<String>,
    /// Item type code
    pub item_type: Option<String>,
    /// Patron group of the current borrower
    pub patron_group_charged: Option<String>,
    /// Pickup location code for requests
    pub pickup_location_code: Option<String>,
    /// Pickup location id for requests
    pub pickup_location_id: Option<RecordId>,
}

/// Order by sequence number, highest first, with unnumbered items last.
#[must_use]
pub fn compare_sequence_desc(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Computes holding and item availability against a fixed reference time.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver<'a> {
    config: &'a LiberatorConfig,
    now: NaiveDateTime,
}

impl<'a> AvailabilityResolver<'a> {
    /// Create a resolver; `now` is the reference time for due-date display
    #[must_use]
    pub fn new(config: &'a LiberatorConfig, now: NaiveDateTime) -> Self {
        AvailabilityResolver { config, now }
    }

    /// Summarize one holding.
    ///
    /// Without items the status is the order status when there is one, else
    /// `Online` for electronic locations and `On Shelf` otherwise. With items,
    /// the first item as supplied drives the summary. `order_status` is only
    /// called when there are no items; `course_reserves` only when the first
    /// item has a temporary location, and receives every item id.
    ///
    /// # Errors
    ///
    /// Propagates an error from `course_reserves`.
    pub fn summarize<F, C>(
        &self,
        location_code: &str,
        items: &[Item],
        order_status: F,
        course_reserves: C,
    ) -> Result<HoldingAvailability>
    where
        F: FnOnce() -> Option<String>,
        C: FnOnce(&[RecordId]) -> Result<Vec<Course>>,
    {
        let Some(first) = items.first() else {
            let status = order_status().unwrap_or_else(|| {
                if is_electronic_location(location_code) {
                    ONLINE.to_string()
                } else {
                    ON_SHELF.to_string()
                }
            });
            return Ok(HoldingAvailability::without_items(status, location_code));
        };

        let course_reserves = if first.temp_location.is_some() {
            let item_ids: Vec<RecordId> = items.iter().map(|item| item.id).collect();
            course_reserves(&item_ids)?
        } else {
            Vec::new()
        };

        Ok(HoldingAvailability {
            status: first.status.joined(),
            location: location_code.to_string(),
            more_items: items.len() > 1,
            copy_number: Some(first.copy_number),
            item_id: Some(first.id),
            on_reserve: Some(first.on_reserve),
            due_date: self.due_date(first),
            temp_location: first.temp_location.clone(),
            course_reserves,
        })
    }

    /// List every item of a holding, highest sequence number first.
    #[must_use]
    pub fn full_listing(&self, items: &[Item]) -> Vec<ItemAvailability> {
        let mut listing: Vec<ItemAvailability> =
            items.iter().map(|item| self.item_availability(item)).collect();
        listing.sort_by(|a, b| compare_sequence_desc(a.item_sequence_number, b.item_sequence_number));
        listing
    }

    fn item_availability(&self, item: &Item) -> ItemAvailability {
        let pickup = self.config.pickup_locations.for_group(item.circ_group_id);
        ItemAvailability {
            id: item.id,
            barcode: item.barcode.clone(),
            location: item.perm_location.clone(),
            temp_location: item.temp_location.clone(),
            copy_number: item.copy_number,
            item_sequence_number: item.item_sequence_number,
            status: item.status.clone(),
            on_reserve: item.on_reserve,
            due_date: self.due_date(item),
            enumeration: item.enumeration.clone(),
            chronology: item.chronology.clone(),
            enum_display: item.enum_chron(),
            item_type: item.item_type.clone(),
            patron_group_charged: item.patron_group_charged.clone(),
            pickup_location_code: pickup.map(|p| p.code.clone()),
            pickup_location_id: pickup.map(|p| p.id),
        }
    }

    fn due_date(&self, item: &Item) -> Option<String> {
        if !item.status.is_charged() {
            return None;
        }
        format_due_date(
            item.due_date,
            item.on_reserve,
            self.now,
            self.config.long_overdue_days,
        )
    }
}
