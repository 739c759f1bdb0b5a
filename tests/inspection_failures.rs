mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{BUCKET, Breakage, BrokenStore, CountingStore, memory_store_with};
use tabular_inspector::error::ErrorKind;
use tabular_inspector::inspector::{Inspector, InspectorOptions};
use tabular_inspector::store::InMemoryStore;
use tabular_inspector::types::{FormatTag, InspectionRequest};

fn assert_failed(result: &tabular_inspector::StructureResult, kind: ErrorKind) {
    assert!(!result.success);
    assert_eq!(result.error_type, Some(kind), "error: {:?}", result.error);
    assert!(result.error.is_some());
    assert!(result.columns.is_empty());
    assert!(result.sample_rows.is_empty());
    assert_eq!(result.separator, None);
    assert_eq!(result.format, FormatTag::Unsupported);
}

#[test]
fn oversized_object_is_rejected_before_any_read() {
    let store = Arc::new(CountingStore::new(memory_store_with("big.csv", vec![b'a'; 2_000], None)));
    let inspector = Inspector::new(store.clone());

    let result = inspector.inspect_with_ceiling(BUCKET, "big.csv", 1_000);

    assert_failed(&result, ErrorKind::FileTooLarge);
    assert_eq!(result.file_size_bytes, 2_000);
    assert_eq!(store.heads.load(Ordering::SeqCst), 1);
    assert_eq!(store.bulk_reads(), 0);
}

#[test]
fn request_ceiling_overrides_options() {
    let store = memory_store_with("a.csv", "id,name\n1,x\n", None);
    let inspector = Inspector::with_options(
        store,
        InspectorOptions {
            size_ceiling_bytes: 5,
            ..Default::default()
        },
    );

    assert_failed(&inspector.inspect(BUCKET, "a.csv"), ErrorKind::FileTooLarge);
    let relaxed = InspectionRequest::new(BUCKET, "a.csv").with_size_ceiling(1_000);
    assert!(relaxed.run(&inspector).success);
}

#[test]
fn zero_byte_object_is_empty_file() {
    let store = Arc::new(CountingStore::new(memory_store_with("empty.csv", Vec::new(), None)));
    let inspector = Inspector::new(store.clone());

    let result = inspector.inspect(BUCKET, "empty.csv");

    assert_failed(&result, ErrorKind::EmptyFile);
    assert_eq!(store.bulk_reads(), 0);
}

#[test]
fn blank_lines_only_is_empty_file() {
    let store = memory_store_with("blank.csv", "\n\n\n", None);
    let result = Inspector::new(store).inspect(BUCKET, "blank.csv");
    assert_failed(&result, ErrorKind::EmptyFile);
}

#[test]
fn printable_text_without_structure_is_unsupported() {
    let store = memory_store_with("notes", "just a sentence with no structure at all", None);
    let result = Inspector::new(store).inspect(BUCKET, "notes");
    assert_failed(&result, ErrorKind::UnsupportedFormat);
}

#[test]
fn binary_blob_is_unsupported() {
    let bytes: Vec<u8> = [0x00, 0x01, 0x02, 0x1B, 0xFF, 0xFE].into_iter().cycle().take(4_096).collect();
    let store = memory_store_with("blob.bin", bytes, Some("application/octet-stream"));
    let result = Inspector::new(store).inspect(BUCKET, "blob.bin");
    assert_failed(&result, ErrorKind::UnsupportedFormat);
}

#[test]
fn missing_object_is_file_not_found() {
    let inspector = Inspector::new(Arc::new(InMemoryStore::new()));
    let result = inspector.inspect(BUCKET, "nope.csv");
    assert_failed(&result, ErrorKind::FileNotFound);
    assert_eq!(result.file_size_bytes, 0);
}

#[test]
fn probe_failure_is_s3_error() {
    let inspector = Inspector::new(Arc::new(BrokenStore(Breakage::HeadFails)));
    let result = inspector.inspect(BUCKET, "x.csv");
    assert_failed(&result, ErrorKind::S3Error);
    assert!(result.error.unwrap().contains("503"));
}

#[test]
fn read_failure_is_download_error() {
    let inspector = Inspector::new(Arc::new(BrokenStore(Breakage::RangeFails)));
    let result = inspector.inspect(BUCKET, "x.csv");
    assert_failed(&result, ErrorKind::DownloadError);
    assert_eq!(result.file_size_bytes, 20_000);
}

#[test]
fn panicking_store_is_inspection_error() {
    let inspector = Inspector::new(Arc::new(BrokenStore(Breakage::RangePanics)));
    let result = inspector.inspect(BUCKET, "x.csv");
    assert_failed(&result, ErrorKind::InspectionError);
    assert!(result.error.unwrap().contains("range reader exploded"));
}

#[test]
fn missing_bucket_and_key() {
    let inspector = Inspector::new(Arc::new(InMemoryStore::new()));
    assert_failed(&inspector.inspect("", "a.csv"), ErrorKind::ConfigurationError);
    assert_failed(&inspector.inspect(BUCKET, "  "), ErrorKind::ValidationError);
}

#[test]
fn corrupt_workbooks_are_parse_errors() {
    let mut xlsx = vec![0x50, 0x4B, 0x03, 0x04];
    xlsx.extend_from_slice(&[0x11; 512]);
    let mut xls = vec![0xD0, 0xCF, 0x11, 0xE0];
    xls.extend_from_slice(&[0x22; 512]);

    let store = Arc::new(InMemoryStore::new());
    store.put(BUCKET, "broken.xlsx", xlsx, None);
    store.put(BUCKET, "broken.xls", xls, None);
    let inspector = Inspector::new(store);

    assert_failed(&inspector.inspect(BUCKET, "broken.xlsx"), ErrorKind::ParseError);
    assert_failed(&inspector.inspect(BUCKET, "broken.xls"), ErrorKind::ParseError);
}
