//! ReCAP remote-storage metadata for item-level composites.
//!
//! Items shelved at ReCAP carry a customer code, a group designation (shared or
//! private collection) and a use restriction. The customer code is derived from
//! the location code itself; the other two come from an ordered table of
//! location groups in which the first group containing the code wins.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PG_LOCATION: Regex = Regex::new(r"^rcpx[a-z]$").unwrap();
    static ref RECAP_PREFIX: Regex = Regex::new(r"^rcp([a-z]{2})").unwrap();
}

/// ReCAP metadata for one location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapInfo {
    /// 876 `$z`
    pub customer_code: String,
    /// 876 `$x`
    pub group_designation: String,
    /// 876 `$h`
    pub use_restriction: String,
}

/// A set of ReCAP locations sharing a group designation and use restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapGroup {
    /// Location codes in this group
    pub locations: Vec<String>,
    /// `Shared` or `Private`
    pub group_designation: String,
    /// Use restriction text, possibly empty
    pub use_restriction: String,
}

impl RecapGroup {
    fn new(locations: &[&str], group_designation: &str, use_restriction: &str) -> Self {
        RecapGroup {
            locations: locations.iter().map(ToString::to_string).collect(),
            group_designation: group_designation.to_string(),
            use_restriction: use_restriction.to_string(),
        }
    }
}

/// Ordered ReCAP location table.
///
/// Groups are checked in order; a code listed in two groups takes the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecapTable {
    groups: Vec<RecapGroup>,
}

impl Default for RecapTable {
    fn default() -> Self {
        RecapTable::new(vec![
            RecapGroup::new(&["rcppa", "rcpgp", "rcpqk", "rcppf"], "Shared", ""),
            RecapGroup::new(
                &["rcppj", "rcppk", "rcppl", "rcppm", "rcppn", "rcppt"],
                "Private",
                "In Library Use",
            ),
            RecapGroup::new(
                &[
                    "rcppb", "rcpph", "rcpps", "rcppw", "rcppz", "rcpxc", "rcpxg", "rcpxm",
                    "rcpxn", "rcpxp", "rcpxr", "rcpxw", "rcpxx",
                ],
                "Private",
                "Supervised Use",
            ),
            RecapGroup::new(
                &[
                    "rcpjq", "rcppe", "rcppg", "rcpph", "rcppq", "rcpqb", "rcpql", "rcpqv",
                    "rcpqx",
                ],
                "Private",
                "",
            ),
        ])
    }
}

impl RecapTable {
    /// Build a table from groups in precedence order
    #[must_use]
    pub fn new(groups: Vec<RecapGroup>) -> Self {
        RecapTable { groups }
    }

    /// The groups in precedence order
    #[must_use]
    pub fn groups(&self) -> &[RecapGroup] {
        &self.groups
    }

    /// Look up ReCAP metadata for a location code.
    ///
    /// Unknown codes get an empty group designation and use restriction but
    /// still receive a customer code.
    ///
    /// # Examples
    ///
    /// ```
    /// use marc_liberator::recap::RecapTable;
    ///
    /// let table = RecapTable::default();
    /// let info = table.info("rcppj");
    /// assert_eq!(info.customer_code, "PJ");
    /// assert_eq!(info.group_designation, "Private");
    /// assert_eq!(info.use_restriction, "In Library Use");
    /// ```
    #[must_use]
    pub fn info(&self, location: &str) -> RecapInfo {
        let group = self
            .groups
            .iter()
            .find(|g| g.locations.iter().any(|code| code == location));
        RecapInfo {
            customer_code: customer_code(location),
            group_designation: group
                .map(|g| g.group_designation.clone())
                .unwrap_or_default(),
            use_restriction: group.map(|g| g.use_restriction.clone()).unwrap_or_default(),
        }
    }
}

/// Customer code for a ReCAP location.
///
/// `rcpx` + one letter is `PG`; otherwise the two letters after `rcp`,
/// uppercased. Codes outside the `rcp` namespace have no customer code.
#[must_use]
pub fn customer_code(location: &str) -> String {
    if PG_LOCATION.is_match(location) {
        return "PG".to_string();
    }
    RECAP_PREFIX
        .captures(location)
        .and_then(|caps| caps.get(1))
        .map(|letters| letters.as_str().to_uppercase())
        .unwrap_or_default()
}
