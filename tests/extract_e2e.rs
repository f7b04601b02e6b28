use parcelink::{
    DocumentText, ExtractedRecord, ExtractionOutcome, InputError, RecordExtractor, ReconConfig,
};

const SALE_LIST_PAGES: &[u8] = b"CITY OF ST. LOUIS SHERIFF'S LAND TAX SALE #231\n\
LAND TAX #   OWNER   ADDRESS   TOTAL\n\
101-202-303 DOE, JANE 4120 Lee Ave. $1,950.00\n\
101-202-304 GRAND HOLDINGS LLC 33 N. Grand Blvd $12,402.17\n\
\x0cPage 2\n\
101-205 O'MALLEY PATRICK 7 St. Louis-Ave $88.10\n\
\x0c";

fn extractor() -> RecordExtractor {
    RecordExtractor::from_config(&ReconConfig::default()).unwrap()
}

#[test]
fn extracts_records_across_pages_in_discovery_order() {
    let document = DocumentText::from_bytes(SALE_LIST_PAGES).unwrap();
    assert_eq!(document.segments_read(), 2);

    let report = extractor().extract_document(&document);
    assert_eq!(report.outcome(), ExtractionOutcome::Records { count: 3 });
    assert_eq!(
        report.records,
        vec![
            ExtractedRecord::new("101-202-303", "DOE, JANE", "4120 Lee Ave.", "1,950.00"),
            ExtractedRecord::new("101-202-304", "GRAND HOLDINGS LLC", "33 N. Grand Blvd", "12,402.17"),
            ExtractedRecord::new("101-205", "O'MALLEY PATRICK", "7 St. Louis-Ave", "88.10"),
        ]
    );
}

#[test]
fn spec_literal_record() {
    let records = extractor().extract("123-456-789 JOHN DOE 456 Main St. $1,234.56");
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(
        (r.land_tax_id(), r.owner(), r.address(), r.total_owed()),
        ("123-456-789", "JOHN DOE", "456 Main St.", "1,234.56")
    );
}

#[test]
fn text_without_identifiers_reports_no_records() {
    let report = extractor().extract_document(&DocumentText::new(
        "NOTICE OF SALE\nAll parcels listed are subject to redemption. 4120 Lee Ave $1.00\n",
    ));
    assert!(report.records.is_empty());
    assert_eq!(report.outcome(), ExtractionOutcome::NoRecordsFound);
}

#[test]
fn extraction_is_idempotent() {
    let document = DocumentText::from_bytes(SALE_LIST_PAGES).unwrap();
    let extractor = extractor();
    assert_eq!(extractor.extract_document(&document), extractor.extract_document(&document));
}

#[test]
fn unreadable_page_is_skipped_and_counted() {
    let mut bytes = b"101-202-303 DOE, JANE 4120 Lee Ave. $1,950.00\n\x0c".to_vec();
    bytes.extend_from_slice(&[0xc3, 0x28, b'\n', 0x0c]);
    bytes.extend_from_slice(b"101-205 ROE RICHARD 9 Elm St $5.00\n");

    let document = DocumentText::from_bytes(&bytes).unwrap();
    let report = extractor().extract_document(&document);
    assert_eq!(report.segments_read, 2);
    assert_eq!(report.segments_skipped, 1);
    assert_eq!(report.records.len(), 2);
}

#[test]
fn every_page_unreadable_is_input_failure() {
    let err = DocumentText::from_bytes(&[0xff, 0x0c, 0xfe]).unwrap_err();
    assert!(matches!(err, InputError::NoReadableSegments { total: 2 }));
}
