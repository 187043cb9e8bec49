//! Integration tests for ReCAP barcode updates and bulk export.

mod common;

use common::{at, make_bib, make_holding, make_item, MemoryCatalog};
use marc_liberator::codec::{JsonCodec, RecordCodec};
use marc_liberator::{Item, Liberator, LiberatorError};

#[test]
fn test_recap_barcodes_skip_in_process_and_duplicates() {
    let mut catalog = MemoryCatalog::new()
        .with_holding(1, make_holding(10, "rcppa"))
        .with_item(10, make_item(100, Some(1), &["Not Charged"]))
        .with_item(10, make_item(101, Some(2), &["In Process"]))
        .with_item(10, make_item(102, Some(3), &["Charged"]))
        .with_item(
            10,
            Item {
                barcode: None,
                ..make_item(103, Some(4), &["Not Charged"])
            },
        )
        .with_item(
            10,
            Item {
                barcode: Some("32101000100".to_string()),
                ..make_item(104, Some(5), &["Not Charged"])
            },
        );
    // 100 and 104 share a barcode; 999 no longer exists
    catalog.items.get_mut(&100).unwrap().1.barcode = Some("32101000100".to_string());
    catalog.updated_recap_items = vec![100, 101, 102, 103, 999, 104, 102];

    let liberator = Liberator::new(catalog);
    let barcodes = liberator.recap_barcodes_since(at(2024, 6, 1, 0, 0)).unwrap();
    assert_eq!(barcodes, vec!["32101000100", "3210100102"]);
}

#[test]
fn test_recap_barcodes_empty_window() {
    let liberator = Liberator::new(MemoryCatalog::new());
    assert!(liberator
        .recap_barcodes_since(at(2024, 6, 1, 0, 0))
        .unwrap()
        .is_empty());
}

fn export_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new()
        .with_bib(make_bib(1, "First"), None)
        .with_bib(make_bib(2, "Second"), None)
        .with_bib(make_bib(3, "Suppressed"), None)
        .with_bib(make_bib(4, "Broken provider"), None)
        .with_holding(1, make_holding(10, "f"))
        .with_holding(2, make_holding(20, "mus"))
        .with_item(10, make_item(100, Some(1), &["Not Charged"]));
    catalog.suppressed_bibs.insert(3);
    catalog.failing_bibs.insert(4);
    catalog
}

#[test]
fn test_export_reports_each_bib() {
    let liberator = Liberator::new(export_catalog());
    let codec = JsonCodec::default();
    let report = liberator.export_bibs(&[1, 2, 3, 4, 5], &codec);

    assert_eq!(report.successes.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(report.failures.keys().copied().collect::<Vec<_>>(), vec![4]);
    assert!(matches!(report.failures[&4], LiberatorError::Upstream(_)));

    let decoded = codec.decode(&report.successes[&2]).unwrap();
    let expected = liberator.compose_bib_with_holdings(2).unwrap().unwrap();
    assert_eq!(decoded, expected);
    assert_eq!(
        decoded.get_field("852").and_then(|f| f.get_subfield('0')),
        Some("20")
    );
}

#[test]
fn test_export_keeps_request_order() {
    let liberator = Liberator::new(export_catalog());
    let report = liberator.export_bibs(&[2, 1], &JsonCodec::pretty());
    assert_eq!(report.successes.keys().copied().collect::<Vec<_>>(), vec![2, 1]);
    assert!(report.is_complete());
}
