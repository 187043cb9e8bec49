//! Merging holdings (and optionally one item) into a bib record.
//!
//! Composition runs in fixed steps over a copy of the bib:
//!
//! 1. Strip the bib's own 852/866/867/868 fields (and 876 for item merges).
//! 2. Graft each holding's 852/856/866/867/868 fields, each with a leading
//!    `$0` holding id, in holding order and field order.
//! 3. Append a 959 catalog date when one can be determined.
//! 4. For item merges, append an 876 describing the item.
//! 5. For ReCAP item merges, rewrite the 852 call number and extend the 876
//!    with ReCAP metadata.
//!
//! The caller's records are never modified.
//!
//! # Examples
//!
//! ```
//! use marc_liberator::{CatalogDates, Composer, Field, HoldingsRecord, Record, RecapTable};
//!
//! let bib = Record::builder()
//!     .control_field("001", "123")
//!     .field(Field::builder("245", '1', '0').subfield('a', "Title").build())
//!     .build();
//! let holding = HoldingsRecord::builder()
//!     .control_field("001", "456")
//!     .location(Field::builder("852", '0', '0').subfield('b', "f").build())
//!     .build();
//!
//! let table = RecapTable::default();
//! let composite = Composer::new(&table)
//!     .compose(&bib, &[holding], None, &CatalogDates::default(), false)?;
//! let f852 = composite.get_field("852").unwrap();
//! assert_eq!(f852.get_subfield('0'), Some("456"));
//! # Ok::<(), marc_liberator::LiberatorError>(())
//! ```

use crate::error::{LiberatorError, Result};
use crate::holdings_record::{call_number_from_location, HoldingsRecord, LOCATION_TAG};
use crate::item::Item;
use crate::marc_record::MarcRecord;
use crate::recap::RecapTable;
use crate::record::{Field, FieldBuilder, Record, Subfield};
use chrono::NaiveDateTime;
use tracing::debug;

/// Bib fields replaced by holdings data.
pub const STRIPPED_TAGS: [&str; 4] = ["852", "866", "867", "868"];
/// Holdings fields copied onto the bib.
pub const GRAFTED_TAGS: [&str; 5] = ["852", "856", "866", "867", "868"];
/// Item information field.
pub const ITEM_TAG: &str = "876";
/// Local catalog date field.
pub const CATALOG_DATE_TAG: &str = "959";
/// Provenance subfield carrying the holding id.
pub const PROVENANCE_CODE: char = '0';

const CATALOG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dates the catalog date is chosen from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogDates {
    /// When the bib was created
    pub bib_created: Option<NaiveDateTime>,
    /// Earliest creation date among the items of all supplied holdings
    pub earliest_item_created: Option<NaiveDateTime>,
}

impl CatalogDates {
    /// Collect dates from a bib creation date and the items of its holdings
    #[must_use]
    pub fn from_items<'a>(
        bib_created: Option<NaiveDateTime>,
        items: impl IntoIterator<Item = &'a Item>,
    ) -> Self {
        CatalogDates {
            bib_created,
            earliest_item_created: items.into_iter().filter_map(|item| item.create_date).min(),
        }
    }
}

/// The catalog date for a set of holdings.
///
/// Electronic holdings (any 852 `$b` starting with `elf`) use the bib creation
/// date; otherwise the earliest item creation date.
#[must_use]
pub fn catalog_date(holdings: &[HoldingsRecord], dates: &CatalogDates) -> Option<NaiveDateTime> {
    if holdings.iter().any(HoldingsRecord::is_electronic) {
        dates.bib_created
    } else {
        dates.earliest_item_created
    }
}

/// Builds composite records.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    recap: &'a RecapTable,
}

impl<'a> Composer<'a> {
    /// Create a composer that resolves ReCAP metadata from `recap`
    #[must_use]
    pub fn new(recap: &'a RecapTable) -> Self {
        Composer { recap }
    }

    /// Compose a bib with its holdings and, for single-item merges, one item.
    ///
    /// With an item, the first holding is the item's holding. `recap_mode`
    /// only affects item merges, and only when that holding's location is a
    /// ReCAP location.
    ///
    /// # Errors
    ///
    /// Returns [`LiberatorError::MalformedRecord`] when the bib or a holding has
    /// no `001`, or when an item is given without a holding.
    pub fn compose(
        &self,
        bib: &Record,
        holdings: &[HoldingsRecord],
        item: Option<&Item>,
        dates: &CatalogDates,
        recap_mode: bool,
    ) -> Result<Record> {
        let bib_id = bib.control_number().ok_or_else(|| {
            LiberatorError::MalformedRecord("bib record has no 001 control field".to_string())
        })?;
        debug!(
            bib_id,
            holdings = holdings.len(),
            item = item.map(|i| i.id),
            recap_mode,
            "composing record"
        );

        let mut composite = bib.clone();
        composite.remove_fields_by_tags(&STRIPPED_TAGS);
        if item.is_some() {
            composite.remove_fields_by_tags(&[ITEM_TAG]);
        }

        for holding in holdings {
            let holding_id = require_holding_id(holding)?;
            for field in holding.fields.iter().filter(|f| GRAFTED_TAGS.contains(&f.tag.as_str())) {
                let mut grafted = field.clone();
                grafted.prepend_subfield(PROVENANCE_CODE, holding_id);
                composite.add_field(grafted);
            }
        }

        if !holdings.is_empty() {
            if let Some(date) = catalog_date(holdings, dates) {
                composite.add_field(
                    Field::builder(CATALOG_DATE_TAG, ' ', ' ')
                        .subfield('a', date.format(CATALOG_DATE_FORMAT).to_string())
                        .build(),
                );
            }
        }

        if let Some(item) = item {
            let holding = holdings.first().ok_or_else(|| {
                LiberatorError::MalformedRecord(format!(
                    "item {} merged into bib {bib_id} without a holding",
                    item.id
                ))
            })?;
            self.merge_item(&mut composite, holding, item, recap_mode)?;
        }

        Ok(composite)
    }

    fn merge_item(
        &self,
        composite: &mut Record,
        holding: &HoldingsRecord,
        item: &Item,
        recap_mode: bool,
    ) -> Result<()> {
        let holding_id = require_holding_id(holding)?;
        let recap_location = holding
            .location()
            .filter(|_| recap_mode && holding.is_recap());

        let Some(location) = recap_location else {
            composite.add_field(item_field(holding_id, item).build());
            return Ok(());
        };

        let mut f852 = location.clone();
        let call_number = call_number_from_location(location);
        f852.remove_subfields_where(|sf| matches!(sf.code, 'h' | 'i'));
        f852.prepend_subfield(PROVENANCE_CODE, holding_id);
        if let Some(call_number) = call_number {
            f852.add_subfield('h', call_number);
        }
        composite.remove_fields_by_tags(&[LOCATION_TAG]);
        composite.add_field(f852);

        let info = self.recap.info(holding.location_code());
        let mut f876 = item_field(holding_id, item).build();
        // ReCAP subfields interleave with the standard ones: 0 3 a h j p t x z.
        let insert_at = f876
            .subfields
            .iter()
            .position(|sf| sf.code == 'j')
            .unwrap_or(f876.subfields.len());
        f876.subfields
            .insert(insert_at, Subfield::new('h', info.use_restriction));
        f876.add_subfield('x', info.group_designation);
        f876.add_subfield('z', info.customer_code);
        composite.add_field(f876);
        Ok(())
    }
}

fn require_holding_id(holding: &HoldingsRecord) -> Result<&str> {
    holding.holding_id().ok_or_else(|| {
        LiberatorError::MalformedRecord("holding record has no 001 control field".to_string())
    })
}

fn item_field(holding_id: &str, item: &Item) -> FieldBuilder {
    Field::builder(ITEM_TAG, '0', '0')
        .subfield(PROVENANCE_CODE, holding_id)
        .subfield_opt('3', item.enum_chron())
        .subfield('a', item.id.to_string())
        .subfield('j', item.status.joined())
        .subfield('p', item.barcode.clone().unwrap_or_default())
        .subfield('t', item.copy_number.to_string())
}
