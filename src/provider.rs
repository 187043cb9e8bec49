//! The raw data provider seam.
//!
//! [`CatalogProvider`] is everything the engines read from the catalog. It is a
//! pure fetch interface: implementations return materialized rows and apply no
//! business rules beyond excluding suppressed holdings from
//! [`fetch_holdings`](CatalogProvider::fetch_holdings). Connection pooling,
//! timeouts and retries are the implementation's concern; any failure should be
//! reported as [`LiberatorError::Upstream`].

use crate::error::{LiberatorError, Result};
use crate::holdings_record::HoldingsRecord;
use crate::item::{Course, Item, Location, Order, RecordId};
use crate::marc_record::MarcRecord;
use crate::record::Record;
use chrono::NaiveDateTime;

/// Ids an item barcode resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarcodeMatch {
    /// Bib the item belongs to
    pub bib_id: RecordId,
    /// Holding the item belongs to
    pub holding_id: RecordId,
    /// The item itself
    pub item_id: RecordId,
}

/// Read access to bib, holdings, item and acquisitions data.
///
/// Absent entities are `Ok(None)` or an empty list, never an error.
pub trait CatalogProvider {
    /// Fetch a bib record
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_bib(&self, bib_id: RecordId) -> Result<Option<Record>>;

    /// Fetch the unsuppressed holdings of a bib, in catalog order
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_holdings(&self, bib_id: RecordId) -> Result<Vec<HoldingsRecord>>;

    /// Fetch a single holding record
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_holding(&self, holding_id: RecordId) -> Result<Option<HoldingsRecord>>;

    /// Fetch the items of a holding in the holding's canonical item order
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_items(&self, holding_id: RecordId) -> Result<Vec<Item>>;

    /// Fetch a single item
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_item(&self, item_id: RecordId) -> Result<Option<Item>>;

    /// Fetch the acquisitions orders of a holding.
    ///
    /// Rows that cannot be interpreted should be reported as
    /// [`LiberatorError::AmbiguousOrder`] (see [`Order::from_row`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or an order row is ambiguous.
    fn fetch_orders(&self, holding_id: RecordId) -> Result<Vec<Order>>;

    /// Fetch the serial issues of a holding that are still awaiting receipt
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_current_issues(&self, holding_id: RecordId) -> Result<Vec<String>>;

    /// Whether a bib is suppressed from display
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn is_bib_suppressed(&self, bib_id: RecordId) -> Result<bool>;

    /// Whether a holding is suppressed from display
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn is_holding_suppressed(&self, holding_id: RecordId) -> Result<bool>;

    /// When the bib was created in the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_bib_create_date(&self, bib_id: RecordId) -> Result<Option<NaiveDateTime>>;

    /// Course reserves covering any of the given items.
    ///
    /// Providers without course reserve data can rely on the default, which
    /// reports none.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_courses(&self, item_ids: &[RecordId]) -> Result<Vec<Course>> {
        let _ = item_ids;
        Ok(Vec::new())
    }

    /// Resolve an item barcode.
    ///
    /// With `recap` set, only items whose holding sits in a ReCAP location
    /// are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_record_ids_from_barcode(&self, barcode: &str, recap: bool)
        -> Result<Vec<BarcodeMatch>>;

    /// Ids of ReCAP items created or changed since `since`
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_updated_recap_item_ids(&self, since: NaiveDateTime) -> Result<Vec<RecordId>>;

    /// Every location known to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn fetch_locations(&self) -> Result<Vec<Location>>;
}

/// Numeric id from a record's `001`.
///
/// # Errors
///
/// Returns [`LiberatorError::MalformedRecord`] when the `001` is missing or not a number.
pub fn record_id<R: MarcRecord>(record: &R) -> Result<RecordId> {
    let control_number = record.control_number().ok_or_else(|| {
        LiberatorError::MalformedRecord("record has no 001 control field".to_string())
    })?;
    control_number.parse().map_err(|_| {
        LiberatorError::MalformedRecord(format!("001 is not a record id: {control_number:?}"))
    })
}
