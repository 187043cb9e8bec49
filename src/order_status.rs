//! Acquisitions status for holdings that have no circulating items yet.
//!
//! The latest order line for a holding decides whether the holding is shown as
//! `Pending Order`, `On-Order` or `Order Received`, with the order's status date
//! appended. Serials still awaiting issues get no order status at all: issue
//! level tracking takes precedence over the line item.

use crate::error::{LiberatorError, Result};
use crate::item::Order;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Purchase order status: pending
pub const PO_PENDING: i32 = 0;
/// Purchase order status: approved
pub const PO_APPROVED: i32 = 1;
/// Purchase order status: received, partial
pub const PO_RECEIVED_PARTIAL: i32 = 3;
/// Purchase order status: received, complete
pub const PO_RECEIVED_COMPLETE: i32 = 4;
/// Purchase order status: complete (closed)
pub const PO_COMPLETE: i32 = 5;

/// Line item status: pending
pub const LI_PENDING: i32 = 0;
/// Line item status: received, complete
pub const LI_RECEIVED_COMPLETE: i32 = 1;
/// Line item status: approved
pub const LI_APPROVED: i32 = 8;
/// Line item status: received, partial
pub const LI_RECEIVED_PARTIAL: i32 = 9;

const PO_ON_ORDER: [i32; 4] = [PO_PENDING, PO_APPROVED, PO_RECEIVED_PARTIAL, PO_RECEIVED_COMPLETE];
const LI_ON_ORDER: [i32; 4] = [LI_PENDING, LI_RECEIVED_COMPLETE, LI_APPROVED, LI_RECEIVED_PARTIAL];

/// Date formats accepted for raw order status dates, tried in order.
const ORDER_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d"];

impl Order {
    /// Build an order from raw row values.
    ///
    /// # Errors
    ///
    /// Returns [`LiberatorError::AmbiguousOrder`] when `date` is present but is not
    /// a recognizable timestamp.
    pub fn from_row(po_status: i32, li_status: i32, date: Option<&str>) -> Result<Order> {
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => Some(parse_order_date(text)?),
            None => None,
        };
        Ok(Order {
            po_status,
            li_status,
            date,
        })
    }

    /// Whether the order still counts as "on order"
    ///
    /// True when either status is in its on-order set and the purchase order is
    /// not complete.
    #[must_use]
    pub fn is_on_order(&self) -> bool {
        (PO_ON_ORDER.contains(&self.po_status) || LI_ON_ORDER.contains(&self.li_status))
            && self.po_status != PO_COMPLETE
    }
}

fn parse_order_date(text: &str) -> Result<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Ok(with_offset.naive_local());
    }
    for format in &ORDER_DATE_FORMATS[..2] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(text, ORDER_DATE_FORMATS[2])
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .ok_or_else(|| LiberatorError::AmbiguousOrder(format!("unparsable order date {text:?}")))
}

/// Pick the order with the latest status date.
///
/// Orders without a date sort below every dated order. When several orders
/// share the latest date (or none has a date) the first of them in provider
/// order is chosen.
#[must_use]
pub fn latest_order(orders: &[Order]) -> Option<&Order> {
    orders
        .iter()
        .reduce(|best, candidate| if candidate.date > best.date { candidate } else { best })
}

/// Compute the acquisitions status text for a holding.
///
/// Returns `None` when there are no orders, when the latest order is not on
/// order, or when the holding still has current serial issues pending.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use marc_liberator::item::Order;
/// use marc_liberator::order_status::order_status;
///
/// let date = NaiveDate::from_ymd_opt(2015, 12, 14).unwrap().and_hms_opt(15, 34, 0);
/// let orders = [Order { po_status: 1, li_status: 8, date }];
/// assert_eq!(order_status(&orders, false).as_deref(), Some("On-Order 12-14-2015"));
/// assert_eq!(order_status(&orders, true), None);
/// assert_eq!(order_status(&[], false), None);
/// ```
#[must_use]
pub fn order_status(orders: &[Order], has_current_issues: bool) -> Option<String> {
    let order = latest_order(orders)?;
    if !order.is_on_order() || has_current_issues {
        return None;
    }
    let mut status = match order.li_status {
        LI_RECEIVED_COMPLETE => "Order Received",
        LI_PENDING => "Pending Order",
        _ => "On-Order",
    }
    .to_string();
    if let Some(date) = order.date {
        status.push(' ');
        status.push_str(&date.format("%m-%d-%Y").to_string());
    }
    Some(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|day| day.and_hms_opt(15, 34, 0))
    }

    fn order(po_status: i32, li_status: i32, date: Option<NaiveDateTime>) -> Order {
        Order {
            po_status,
            li_status,
            date,
        }
    }

    #[test]
    fn test_no_orders_is_absent() {
        assert_eq!(order_status(&[], false), None);
    }

    #[test]
    fn test_pending_order_without_date() {
        let orders = [order(PO_PENDING, LI_PENDING, None)];
        assert_eq!(order_status(&orders, false).as_deref(), Some("Pending Order"));
    }

    #[test]
    fn test_approved_order_includes_date() {
        let orders = [order(PO_APPROVED, LI_APPROVED, at(2015, 12, 14))];
        assert_eq!(order_status(&orders, false).as_deref(), Some("On-Order 12-14-2015"));
    }

    #[test]
    fn test_partially_received_order() {
        let orders = [order(PO_RECEIVED_PARTIAL, LI_APPROVED, at(2015, 12, 16))];
        assert_eq!(order_status(&orders, false).as_deref(), Some("On-Order 12-16-2015"));
    }

    #[test]
    fn test_received_order() {
        let orders = [order(PO_RECEIVED_COMPLETE, LI_RECEIVED_COMPLETE, at(2015, 12, 15))];
        assert_eq!(
            order_status(&orders, false).as_deref(),
            Some("Order Received 12-15-2015")
        );
    }

    #[test]
    fn test_complete_po_is_absent_regardless_of_line_item() {
        for li in [LI_PENDING, LI_RECEIVED_COMPLETE, LI_APPROVED, LI_RECEIVED_PARTIAL, 2] {
            let orders = [order(PO_COMPLETE, li, at(2016, 1, 1))];
            assert_eq!(order_status(&orders, false), None, "li_status {li}");
        }
    }

    #[test]
    fn test_statuses_outside_whitelists_are_absent() {
        let orders = [order(2, 4, at(2016, 1, 1))];
        assert_eq!(order_status(&orders, false), None);
    }

    #[test]
    fn test_line_item_whitelist_alone_counts() {
        let orders = [order(7, LI_RECEIVED_PARTIAL, None)];
        assert_eq!(order_status(&orders, false).as_deref(), Some("On-Order"));
    }

    #[test]
    fn test_current_issues_suppress_status() {
        let orders = [order(PO_RECEIVED_COMPLETE, LI_RECEIVED_COMPLETE, at(2015, 12, 15))];
        assert_eq!(order_status(&orders, true), None);
    }

    #[test]
    fn test_latest_order_wins() {
        let orders = [
            order(PO_APPROVED, LI_APPROVED, at(2015, 12, 14)),
            order(PO_RECEIVED_COMPLETE, LI_RECEIVED_COMPLETE, at(2015, 12, 20)),
            order(PO_PENDING, LI_PENDING, None),
        ];
        assert_eq!(
            order_status(&orders, false).as_deref(),
            Some("Order Received 12-20-2015")
        );
    }

    #[test]
    fn test_tie_on_date_picks_first() {
        let orders = [
            order(PO_APPROVED, LI_PENDING, at(2015, 12, 14)),
            order(PO_APPROVED, LI_APPROVED, at(2015, 12, 14)),
        ];
        assert_eq!(latest_order(&orders), Some(&orders[0]));

        let undated = [order(PO_APPROVED, LI_APPROVED, None), order(PO_PENDING, LI_PENDING, None)];
        assert_eq!(latest_order(&undated), Some(&undated[0]));
    }

    #[test]
    fn test_order_from_row_parses_dates() {
        let parsed = Order::from_row(1, 8, Some("2015-12-14 15:34:00")).unwrap();
        assert_eq!(parsed.date, at(2015, 12, 14));

        let parsed = Order::from_row(1, 8, Some("2015-12-14T15:34:00.000-05:00")).unwrap();
        assert_eq!(parsed.date, at(2015, 12, 14));

        let parsed = Order::from_row(1, 8, Some("2015-12-14")).unwrap();
        assert_eq!(parsed.date.map(|d| d.date()), at(2015, 12, 14).map(|d| d.date()));

        let parsed = Order::from_row(0, 0, None).unwrap();
        assert_eq!(parsed.date, None);
    }

    #[test]
    fn test_order_from_row_rejects_garbage_date() {
        let err = Order::from_row(1, 8, Some("last tuesday")).unwrap_err();
        assert!(matches!(err, LiberatorError::AmbiguousOrder(_)));
    }
}
