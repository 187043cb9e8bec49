//! Common test helpers shared across the integration test suite.
//!
//! [`MemoryCatalog`] is an in-memory [`CatalogProvider`]. Unlike a production
//! provider it does not filter suppressed holdings itself, so tests also
//! exercise the suppression guard in `Liberator`.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use marc_liberator::{
    BarcodeMatch, CatalogProvider, Course, Field, HoldingsRecord, Item, LiberatorError, Location,
    Order, Record, RecordId, Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reference time pinned by the tests: 2024-06-15 10:00.
pub fn reference_time() -> NaiveDateTime {
    at(2024, 6, 15, 10, 0)
}

/// A timestamp.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

/// A bib with a title and stale local holdings fields that composition must strip.
pub fn make_bib(id: RecordId, title: &str) -> Record {
    Record::builder()
        .control_field("001", id.to_string())
        .field(Field::builder("245", '1', '0').subfield('a', title).build())
        .field(Field::builder("852", '0', '0').subfield('b', "stale").build())
        .field(Field::builder("650", ' ', '0').subfield('a', "Whaling").build())
        .build()
}

/// A holding at `location` with a call number split over 852 `$h`/`$i`.
pub fn make_holding(id: RecordId, location: &str) -> HoldingsRecord {
    HoldingsRecord::builder()
        .control_field("001", id.to_string())
        .location(
            Field::builder("852", '0', '0')
                .subfield('b', location)
                .subfield('h', "PS2384")
                .subfield('i', ".M6 1851")
                .build(),
        )
        .field(
            Field::builder("866", ' ', '0')
                .subfield('a', "v.1-3")
                .subfield('z', "Lacks v.2")
                .build(),
        )
        .build()
}

/// An item with the given sequence number and raw statuses.
pub fn make_item(id: RecordId, sequence: Option<u32>, statuses: &[&str]) -> Item {
    Item {
        id,
        item_sequence_number: sequence,
        status: statuses.iter().copied().collect(),
        copy_number: 1,
        perm_location: "f".to_string(),
        barcode: Some(format!("3210100{id}")),
        ..Item::default()
    }
}

/// In-memory catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    pub bibs: HashMap<RecordId, Record>,
    pub bib_create_dates: HashMap<RecordId, NaiveDateTime>,
    /// holding id -> (bib id, holding)
    pub holdings: IndexMap<RecordId, (RecordId, HoldingsRecord)>,
    /// item id -> (holding id, item)
    pub items: IndexMap<RecordId, (RecordId, Item)>,
    pub orders: HashMap<RecordId, Vec<Order>>,
    pub current_issues: HashMap<RecordId, Vec<String>>,
    pub courses: Vec<(RecordId, Course)>,
    pub locations: Vec<Location>,
    pub updated_recap_items: Vec<RecordId>,
    pub suppressed_bibs: HashSet<RecordId>,
    pub suppressed_holdings: HashSet<RecordId>,
    /// Bibs whose holdings lookup fails
    pub failing_bibs: HashSet<RecordId>,
    /// Holdings whose order lookup fails
    pub failing_orders: HashSet<RecordId>,
    /// Number of current-issue lookups made
    pub issue_lookups: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        MemoryCatalog::default()
    }

    pub fn with_bib(mut self, bib: Record, created: Option<NaiveDateTime>) -> Self {
        let id: RecordId = bib
            .get_control_field("001")
            .and_then(|v| v.trim().parse().ok())
            .expect("test bib has a numeric 001");
        if let Some(created) = created {
            self.bib_create_dates.insert(id, created);
        }
        self.bibs.insert(id, bib);
        self
    }

    pub fn with_holding(mut self, bib_id: RecordId, holding: HoldingsRecord) -> Self {
        let id: RecordId = holding
            .get_control_field("001")
            .and_then(|v| v.trim().parse().ok())
            .expect("test holding has a numeric 001");
        self.holdings.insert(id, (bib_id, holding));
        self
    }

    /// Add a holding whose 001 is not a record id.
    pub fn with_raw_holding(mut self, bib_id: RecordId, key: RecordId, holding: HoldingsRecord) -> Self {
        self.holdings.insert(key, (bib_id, holding));
        self
    }

    pub fn with_item(mut self, holding_id: RecordId, item: Item) -> Self {
        self.items.insert(item.id, (holding_id, item));
        self
    }

    pub fn with_orders(mut self, holding_id: RecordId, orders: Vec<Order>) -> Self {
        self.orders.insert(holding_id, orders);
        self
    }

    pub fn issue_lookup_count(&self) -> usize {
        self.issue_lookups.load(Ordering::SeqCst)
    }
}

impl CatalogProvider for MemoryCatalog {
    fn fetch_bib(&self, bib_id: RecordId) -> Result<Option<Record>> {
        Ok(self.bibs.get(&bib_id).cloned())
    }

    fn fetch_holdings(&self, bib_id: RecordId) -> Result<Vec<HoldingsRecord>> {
        if self.failing_bibs.contains(&bib_id) {
            return Err(LiberatorError::Upstream(format!("holdings query for bib {bib_id} timed out")));
        }
        Ok(self
            .holdings
            .values()
            .filter(|(owner, _)| *owner == bib_id)
            .map(|(_, holding)| holding.clone())
            .collect())
    }

    fn fetch_holding(&self, holding_id: RecordId) -> Result<Option<HoldingsRecord>> {
        Ok(self.holdings.get(&holding_id).map(|(_, holding)| holding.clone()))
    }

    fn fetch_items(&self, holding_id: RecordId) -> Result<Vec<Item>> {
        Ok(self
            .items
            .values()
            .filter(|(owner, _)| *owner == holding_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn fetch_item(&self, item_id: RecordId) -> Result<Option<Item>> {
        Ok(self.items.get(&item_id).map(|(_, item)| item.clone()))
    }

    fn fetch_orders(&self, holding_id: RecordId) -> Result<Vec<Order>> {
        if self.failing_orders.contains(&holding_id) {
            return Err(LiberatorError::AmbiguousOrder(format!(
                "unparsable order date for holding {holding_id}"
            )));
        }
        Ok(self.orders.get(&holding_id).cloned().unwrap_or_default())
    }

    fn fetch_current_issues(&self, holding_id: RecordId) -> Result<Vec<String>> {
        self.issue_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.current_issues.get(&holding_id).cloned().unwrap_or_default())
    }

    fn is_bib_suppressed(&self, bib_id: RecordId) -> Result<bool> {
        Ok(self.suppressed_bibs.contains(&bib_id))
    }

    fn is_holding_suppressed(&self, holding_id: RecordId) -> Result<bool> {
        Ok(self.suppressed_holdings.contains(&holding_id))
    }

    fn fetch_bib_create_date(&self, bib_id: RecordId) -> Result<Option<NaiveDateTime>> {
        Ok(self.bib_create_dates.get(&bib_id).copied())
    }

    fn fetch_courses(&self, item_ids: &[RecordId]) -> Result<Vec<Course>> {
        Ok(self
            .courses
            .iter()
            .filter(|(item_id, _)| item_ids.contains(item_id))
            .map(|(_, course)| course.clone())
            .collect())
    }

    fn fetch_record_ids_from_barcode(&self, barcode: &str, recap: bool) -> Result<Vec<BarcodeMatch>> {
        let mut matches = Vec::new();
        for (item_id, (holding_id, item)) in &self.items {
            if item.barcode.as_deref() != Some(barcode) {
                continue;
            }
            let Some((bib_id, holding)) = self.holdings.get(holding_id) else {
                continue;
            };
            if recap && !holding.is_recap() {
                continue;
            }
            matches.push(BarcodeMatch {
                bib_id: *bib_id,
                holding_id: *holding_id,
                item_id: *item_id,
            });
        }
        Ok(matches)
    }

    fn fetch_updated_recap_item_ids(&self, _since: NaiveDateTime) -> Result<Vec<RecordId>> {
        Ok(self.updated_recap_items.clone())
    }

    fn fetch_locations(&self) -> Result<Vec<Location>> {
        Ok(self.locations.clone())
    }
}
