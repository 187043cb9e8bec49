//! Configuration for composition and availability resolution.
//!
//! This module provides [`LiberatorConfig`], which carries every table the
//! engines consult: the ReCAP location table, the pickup location for each
//! circulation group, and the display heuristics. Values are immutable once
//! built and passed explicitly to whoever needs them.
//!
//! # Examples
//!
//! ```
//! use marc_liberator::LiberatorConfig;
//!
//! // Production defaults
//! let config = LiberatorConfig::default();
//! assert_eq!(config.summary_holdings_limit, 2);
//!
//! // Override a single value from JSON
//! let config = LiberatorConfig::from_json_str(r#"{"long_overdue_days": 45}"#)?;
//! assert_eq!(config.long_overdue_days, 45);
//! assert_eq!(config.summary_holdings_limit, 2);
//! # Ok::<(), marc_liberator::LiberatorError>(())
//! ```

use crate::due_date::DEFAULT_LONG_OVERDUE_DAYS;
use crate::error::Result;
use crate::item::RecordId;
use crate::recap::RecapTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Circulation group used when an item has none, or one the table lacks.
pub const DEFAULT_CIRC_GROUP: u32 = 1;

/// A pickup location for requested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupLocation {
    /// Location code, e.g. `fcirc`
    pub code: String,
    /// Location id
    pub id: RecordId,
}

/// Pickup location per circulation group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickupLocations {
    by_group: IndexMap<u32, PickupLocation>,
}

impl Default for PickupLocations {
    fn default() -> Self {
        let table = [
            (1, "fcirc", 299),      // Firestone
            (5, "uescirc", 356),    // Architecture
            (6, "muscirc", 309),    // Music
            (7, "sacirc", 321),     // Marquand
            (10, "anxacirc", 293),  // Annex A
            (13, "piaprcirc", 333), // Stokes
            (14, "stcirc", 345),    // Engineering
            (15, "gestcirc", 303),  // East Asian
            (16, "pplcirc", 312),   // PPPL
            (17, "muddcirc", 306),  // Mudd
            (18, "rbcirc", 315),    // Rare Books
            (21, "fcirc", 299),     // Video Library
            (22, "fcirc", 299),     // ReCAP
            (24, "scicirc", 489),   // Lewis
        ];
        PickupLocations {
            by_group: table
                .iter()
                .map(|&(group, code, id)| {
                    (
                        group,
                        PickupLocation {
                            code: code.to_string(),
                            id,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl PickupLocations {
    /// Build a table from explicit entries
    #[must_use]
    pub fn new(by_group: IndexMap<u32, PickupLocation>) -> Self {
        PickupLocations { by_group }
    }

    /// Pickup location for a circulation group.
    ///
    /// Missing or unknown groups fall back to [`DEFAULT_CIRC_GROUP`]. Returns
    /// `None` only when the table has no entry for the default group either.
    #[must_use]
    pub fn for_group(&self, circ_group_id: Option<u32>) -> Option<&PickupLocation> {
        circ_group_id
            .and_then(|group| self.by_group.get(&group))
            .or_else(|| self.by_group.get(&DEFAULT_CIRC_GROUP))
    }
}

/// Configuration shared by the composition and availability engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiberatorConfig {
    /// ReCAP location table
    pub recap: RecapTable,
    /// Pickup location per circulation group
    pub pickup_locations: PickupLocations,
    /// Holdings per bib inspected by the summary availability view
    pub summary_holdings_limit: usize,
    /// Due dates older than this many days are not displayed
    pub long_overdue_days: i64,
}

impl Default for LiberatorConfig {
    fn default() -> Self {
        LiberatorConfig {
            recap: RecapTable::default(),
            pickup_locations: PickupLocations::default(),
            summary_holdings_limit: 2,
            long_overdue_days: DEFAULT_LONG_OVERDUE_DAYS,
        }
    }
}

impl LiberatorConfig {
    /// Load a configuration from JSON; omitted keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
