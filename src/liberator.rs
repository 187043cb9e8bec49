//! The operations exposed to dump, API and CLI layers.
//!
//! [`Liberator`] owns a [`CatalogProvider`] and a [`LiberatorConfig`] and runs
//! the composition and availability engines over provider data. Suppressed bibs
//! and holdings are treated as absent by every operation here, whether or not
//! the provider already filtered them.
//!
//! Single-record operations return `Ok(None)` for absent records. Batch
//! operations never stop at the first failure; they return a [`BatchReport`]
//! holding every success and every failure keyed by record id.
//!
//! # Examples
//!
//! ```ignore
//! use marc_liberator::Liberator;
//!
//! let liberator = Liberator::new(catalog);
//! let report = liberator.resolve_availability_for_bibs(&[35345, 4609321], false);
//! for (bib_id, holdings) in &report.successes {
//!     for (holding_id, availability) in holdings {
//!         println!("{bib_id}/{holding_id}: {}", availability.status);
//!     }
//! }
//! ```

use crate::availability::{AvailabilityResolver, HoldingAvailability, ItemAvailability};
use crate::codec::RecordCodec;
use crate::compose::{CatalogDates, Composer};
use crate::config::LiberatorConfig;
use crate::error::{found, LiberatorError, Result};
use crate::holdings_record::HoldingsRecord;
use crate::item::{Item, Location, RecordId};
use crate::order_status::{latest_order, order_status};
use crate::provider::{record_id, BarcodeMatch, CatalogProvider};
use crate::record::Record;
use crate::status_label::status_label;
use chrono::{Local, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Raw status of items still being processed by technical services.
pub const IN_PROCESS: &str = "In Process";

/// Per-id outcome of a batch operation.
///
/// Both maps keep request order. Ids that resolved to nothing (absent or
/// suppressed) appear in neither.
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Results for ids that succeeded
    pub successes: IndexMap<RecordId, T>,
    /// Errors for ids that failed
    pub failures: IndexMap<RecordId, LiberatorError>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        BatchReport {
            successes: IndexMap::new(),
            failures: IndexMap::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Whether every id succeeded or was absent
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, id: RecordId, outcome: Result<Option<T>>) {
        match outcome {
            Ok(Some(value)) => {
                self.successes.insert(id, value);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(record_id = id, error = %err, "record failed in batch");
                self.failures.insert(id, err);
            }
        }
    }
}

impl<T> FromIterator<(RecordId, Result<Option<T>>)> for BatchReport<T> {
    fn from_iter<I: IntoIterator<Item = (RecordId, Result<Option<T>>)>>(iter: I) -> Self {
        let mut report = BatchReport::default();
        for (id, outcome) in iter {
            report.record(id, outcome);
        }
        report
    }
}

/// The items of one holding, for the by-location listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingItems {
    /// Holding id
    pub holding_id: RecordId,
    /// Call number from the holding's 852
    pub call_number: Option<String>,
    /// Textual holdings notes (866 `$a` and `$z`)
    pub notes: Vec<String>,
    /// Items, highest sequence number first
    pub items: Vec<ItemAvailability>,
}

/// Composition and availability over a catalog.
#[derive(Debug)]
pub struct Liberator<P> {
    provider: P,
    config: LiberatorConfig,
    reference_time: Option<NaiveDateTime>,
}

impl<P: CatalogProvider> Liberator<P> {
    /// Create a liberator with the default configuration
    #[must_use]
    pub fn new(provider: P) -> Self {
        Liberator {
            provider,
            config: LiberatorConfig::default(),
            reference_time: None,
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: LiberatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin the reference time used for due-date display instead of the local clock
    #[must_use]
    pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// The data provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The active configuration
    pub fn config(&self) -> &LiberatorConfig {
        &self.config
    }

    fn now(&self) -> NaiveDateTime {
        self.reference_time
            .unwrap_or_else(|| Local::now().naive_local())
    }

    fn resolver(&self) -> AvailabilityResolver<'_> {
        AvailabilityResolver::new(&self.config, self.now())
    }

    /// Map a raw status to its display label
    #[must_use]
    pub fn normalize_status_label<'s>(&self, raw_status: &'s str) -> &'s str {
        status_label(raw_status)
    }

    /// Fetch a bib without merging holdings.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn bib_record(&self, bib_id: RecordId) -> Result<Option<Record>> {
        found(self.visible_bib(bib_id))
    }

    /// Compose a bib with all of its unsuppressed holdings.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails or a record has no usable `001`.
    pub fn compose_bib_with_holdings(&self, bib_id: RecordId) -> Result<Option<Record>> {
        found(self.compose_bib(bib_id))
    }

    fn compose_bib(&self, bib_id: RecordId) -> Result<Record> {
        let bib = self.visible_bib(bib_id)?;
        let holdings = self.visible_holdings(bib_id)?;
        let dates = self.catalog_dates(bib_id, &holdings)?;
        Composer::new(&self.config.recap).compose(&bib, &holdings, None, &dates, false)
    }

    /// Compose one single-item record per catalog item carrying `barcode`.
    ///
    /// With `recap` set, only ReCAP items are considered and their composites
    /// carry ReCAP metadata. Matches whose bib, holding or item is absent or
    /// suppressed are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails or a record has no usable `001`.
    pub fn records_from_barcode(&self, barcode: &str, recap: bool) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for ids in self.provider.fetch_record_ids_from_barcode(barcode, recap)? {
            if let Some(record) = found(self.compose_item_record(ids, recap))? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn compose_item_record(&self, ids: BarcodeMatch, recap: bool) -> Result<Record> {
        let bib = self.visible_bib(ids.bib_id)?;
        let holding = self.visible_holding(ids.holding_id)?;
        let item = self
            .provider
            .fetch_item(ids.item_id)?
            .ok_or_else(|| LiberatorError::NotFound(format!("item {}", ids.item_id)))?;
        let holdings = [holding];
        let dates = self.catalog_dates(ids.bib_id, &holdings)?;
        Composer::new(&self.config.recap).compose(&bib, &holdings, Some(&item), &dates, recap)
    }

    /// Summarize availability for many bibs.
    ///
    /// Each successful bib maps holding id to its summary. Without `full`,
    /// only the first `summary_holdings_limit` holdings of each bib are
    /// inspected.
    pub fn resolve_availability_for_bibs(
        &self,
        bib_ids: &[RecordId],
        full: bool,
    ) -> BatchReport<IndexMap<RecordId, HoldingAvailability>> {
        bib_ids
            .iter()
            .map(|&bib_id| (bib_id, found(self.bib_availability(bib_id, full))))
            .collect()
    }

    fn bib_availability(
        &self,
        bib_id: RecordId,
        full: bool,
    ) -> Result<IndexMap<RecordId, HoldingAvailability>> {
        self.require_visible_bib(bib_id)?;
        let mut holdings = self.visible_holdings(bib_id)?;
        if !full {
            holdings.truncate(self.config.summary_holdings_limit);
        }

        let resolver = self.resolver();
        let mut by_holding = IndexMap::with_capacity(holdings.len());
        for holding in &holdings {
            let holding_id = record_id(holding)?;
            let items = self.provider.fetch_items(holding_id)?;
            let summary = resolver.summarize(
                holding.location_code(),
                &items,
                || self.order_status_for_holding(holding_id),
                |item_ids: &[RecordId]| self.provider.fetch_courses(item_ids),
            )?;
            by_holding.insert(holding_id, summary);
        }
        Ok(by_holding)
    }

    /// List every item of a holding, highest sequence number first.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn resolve_full_holding_availability(
        &self,
        holding_id: RecordId,
    ) -> Result<Option<Vec<ItemAvailability>>> {
        found(self.visible_holding(holding_id).and_then(|_| {
            let items = self.provider.fetch_items(holding_id)?;
            Ok(self.resolver().full_listing(&items))
        }))
    }

    /// Acquisitions status of a holding.
    ///
    /// Never fails: provider errors and ambiguous order data are logged and
    /// reported as no status. Current issues are only fetched when the latest
    /// order is still on order.
    pub fn order_status_for_holding(&self, holding_id: RecordId) -> Option<String> {
        let orders = match self.provider.fetch_orders(holding_id) {
            Ok(orders) => orders,
            Err(err) => {
                warn!(holding_id, error = %err, "order lookup failed");
                return None;
            }
        };
        let has_current_issues = match latest_order(&orders) {
            Some(latest) if latest.is_on_order() => {
                match self.provider.fetch_current_issues(holding_id) {
                    Ok(issues) => !issues.is_empty(),
                    Err(err) => {
                        warn!(holding_id, error = %err, "current issues lookup failed");
                        return None;
                    }
                }
            }
            _ => false,
        };
        order_status(&orders, has_current_issues)
    }

    /// Items of a bib grouped by their holding's permanent location.
    ///
    /// Locations appear in first-seen holding order; holdings without items
    /// are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails or a holding has no usable `001`.
    pub fn items_for_bib(
        &self,
        bib_id: RecordId,
    ) -> Result<Option<IndexMap<String, Vec<HoldingItems>>>> {
        found(self.require_visible_bib(bib_id).and_then(|()| self.items_by_location(bib_id)))
    }

    fn items_by_location(&self, bib_id: RecordId) -> Result<IndexMap<String, Vec<HoldingItems>>> {
        let resolver = self.resolver();
        let mut by_location: IndexMap<String, Vec<HoldingItems>> = IndexMap::new();
        for holding in self.visible_holdings(bib_id)? {
            let holding_id = record_id(&holding)?;
            let items = self.provider.fetch_items(holding_id)?;
            if items.is_empty() {
                continue;
            }
            by_location
                .entry(holding.location_code().to_string())
                .or_default()
                .push(HoldingItems {
                    holding_id,
                    call_number: holding.call_number(),
                    notes: holding.holdings_notes().into_iter().map(str::to_string).collect(),
                    items: resolver.full_listing(&items),
                });
        }
        Ok(by_location)
    }

    /// Barcodes of ReCAP items updated since `since`.
    ///
    /// Items still `In Process` are skipped. Each barcode is reported once, in
    /// first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn recap_barcodes_since(&self, since: NaiveDateTime) -> Result<Vec<String>> {
        let mut barcodes = IndexSet::new();
        for item_id in self.provider.fetch_updated_recap_item_ids(since)? {
            let Some(item) = self.provider.fetch_item(item_id)? else {
                continue;
            };
            if item.status.contains(IN_PROCESS) {
                continue;
            }
            if let Some(barcode) = item.barcode {
                barcodes.insert(barcode);
            }
        }
        Ok(barcodes.into_iter().collect())
    }

    /// All catalog locations keyed by id, in provider order
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn locations(&self) -> Result<IndexMap<RecordId, Location>> {
        Ok(self
            .provider
            .fetch_locations()?
            .into_iter()
            .map(|location| (location.id, location))
            .collect())
    }

    /// Unsuppressed holdings of a bib, in provider order
    fn visible_holdings(&self, bib_id: RecordId) -> Result<Vec<HoldingsRecord>> {
        let mut visible = Vec::new();
        for holding in self.provider.fetch_holdings(bib_id)? {
            let holding_id = record_id(&holding)?;
            if self.provider.is_holding_suppressed(holding_id)? {
                debug!(bib_id, holding_id, "skipping suppressed holding");
                continue;
            }
            visible.push(holding);
        }
        Ok(visible)
    }

    /// `NotFound` when the bib is suppressed
    fn require_visible_bib(&self, bib_id: RecordId) -> Result<()> {
        if self.provider.is_bib_suppressed(bib_id)? {
            debug!(bib_id, "skipping suppressed bib");
            return Err(LiberatorError::NotFound(format!("bib {bib_id} is suppressed")));
        }
        Ok(())
    }

    fn visible_bib(&self, bib_id: RecordId) -> Result<Record> {
        self.require_visible_bib(bib_id)?;
        self.provider
            .fetch_bib(bib_id)?
            .ok_or_else(|| LiberatorError::NotFound(format!("bib {bib_id}")))
    }

    fn visible_holding(&self, holding_id: RecordId) -> Result<HoldingsRecord> {
        if self.provider.is_holding_suppressed(holding_id)? {
            debug!(holding_id, "skipping suppressed holding");
            return Err(LiberatorError::NotFound(format!("holding {holding_id} is suppressed")));
        }
        self.provider
            .fetch_holding(holding_id)?
            .ok_or_else(|| LiberatorError::NotFound(format!("holding {holding_id}")))
    }

    fn catalog_dates(&self, bib_id: RecordId, holdings: &[HoldingsRecord]) -> Result<CatalogDates> {
        if holdings.is_empty() {
            return Ok(CatalogDates::default());
        }
        if holdings.iter().any(HoldingsRecord::is_electronic) {
            return Ok(CatalogDates {
                bib_created: self.provider.fetch_bib_create_date(bib_id)?,
                earliest_item_created: None,
            });
        }
        let mut items: Vec<Item> = Vec::new();
        for holding in holdings {
            items.extend(self.provider.fetch_items(record_id(holding)?)?);
        }
        Ok(CatalogDates::from_items(None, &items))
    }
}

impl<P: CatalogProvider + Sync> Liberator<P> {
    /// Compose and encode many bibs in parallel.
    ///
    /// Absent or suppressed bibs are left out of the report.
    pub fn export_bibs<C: RecordCodec + Sync>(
        &self,
        bib_ids: &[RecordId],
        codec: &C,
    ) -> BatchReport<Vec<u8>> {
        let outcomes: Vec<(RecordId, Result<Option<Vec<u8>>>)> = bib_ids
            .par_iter()
            .map(|&bib_id| {
                let encoded = self
                    .compose_bib_with_holdings(bib_id)
                    .and_then(|record| record.map(|r| codec.encode(&r)).transpose());
                (bib_id, encoded)
            })
            .collect();
        outcomes.into_iter().collect()
    }
}
