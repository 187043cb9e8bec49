#![warn(missing_docs)]

//! # marc-liberator
//!
//! Record composition and real-time availability for a library catalog.
//!
//! Bibliographic records are merged with their holdings (and, for barcode
//! lookups, a single item) into composite MARC records for export and
//! indexing. Alongside composition the crate resolves holding and item
//! availability, acquisitions order status, due dates and display labels.
//!
//! ## Quick Start
//!
//! ### Composing a Record
//!
//! ```
//! use marc_liberator::{CatalogDates, Composer, Field, HoldingsRecord, LiberatorConfig, Record};
//!
//! let bib = Record::builder()
//!     .control_field("001", "35345")
//!     .field(Field::builder("245", '1', '0').subfield('a', "Moby Dick").build())
//!     .build();
//! let holding = HoldingsRecord::builder()
//!     .control_field("001", "39176")
//!     .location(
//!         Field::builder("852", '0', '0')
//!             .subfield('b', "f")
//!             .subfield('h', "PS2384")
//!             .subfield('i', ".M6 1851")
//!             .build(),
//!     )
//!     .build();
//!
//! let config = LiberatorConfig::default();
//! let composite = Composer::new(&config.recap)
//!     .compose(&bib, &[holding], None, &CatalogDates::default(), false)?;
//!
//! let location = composite.get_field("852").unwrap();
//! assert_eq!(location.subfield_codes(), "0bhi");
//! assert_eq!(location.get_subfield('0'), Some("39176"));
//! # Ok::<(), marc_liberator::LiberatorError>(())
//! ```
//!
//! ### Display Labels
//!
//! ```
//! use marc_liberator::status_label;
//!
//! assert_eq!(status_label("Renewed"), "Checked out");
//! assert_eq!(status_label("Lost--library applied"), "Lost");
//! ```
//!
//! ### Working Against a Catalog
//!
//! Implement [`CatalogProvider`] over the catalog's data source and hand it to a
//! [`Liberator`], which exposes composition, availability and export over
//! record ids. See the [`liberator`] module.
//!
//! ## Modules
//!
//! - [`record`]: Bib and composite records (`Record`, `Field`, `Subfield`)
//! - [`holdings_record`]: Holdings (MFHD) records and their location accessors
//! - [`marc_record`]: Trait shared by bib and holdings records
//! - [`item`]: Items, orders, locations and course reserves
//! - [`status_label`]: Canonical labels for raw circulation statuses
//! - [`order_status`]: Acquisitions status from order lines
//! - [`due_date`]: Due-date display
//! - [`availability`]: Holding summaries and full item listings
//! - [`recap`]: ReCAP remote-storage metadata
//! - [`compose`]: The record composition engine
//! - [`provider`]: The catalog data provider trait
//! - [`codec`]: Record encoding for export
//! - [`config`]: Engine configuration
//! - [`liberator`]: Provider-backed operations and batch reports
//! - [`error`]: Error types and result type
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (composition at
//! `debug`, order lookup and batch failures at `warn`) and never installs a
//! subscriber.

pub mod availability;
pub mod codec;
pub mod compose;
pub mod config;
pub mod due_date;
pub mod error;
pub mod holdings_record;
pub mod item;
pub mod liberator;
pub mod marc_record;
pub mod order_status;
pub mod provider;
pub mod recap;
/// Core MARC record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod status_label;

pub use availability::{AvailabilityResolver, HoldingAvailability, ItemAvailability};
pub use codec::{JsonCodec, RecordCodec};
pub use compose::{CatalogDates, Composer};
pub use config::{LiberatorConfig, PickupLocation, PickupLocations};
pub use error::{LiberatorError, Result};
pub use holdings_record::{HoldingsRecord, HoldingsRecordBuilder};
pub use item::{Course, Item, ItemStatus, Location, Order, RecordId, ReserveFlag};
pub use liberator::{BatchReport, HoldingItems, Liberator};
pub use marc_record::MarcRecord;
pub use provider::{BarcodeMatch, CatalogProvider};
pub use recap::{RecapInfo, RecapTable};
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use status_label::status_label;
