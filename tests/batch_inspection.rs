mod common;

use std::sync::Arc;
use std::thread;

use common::BUCKET;
use tabular_inspector::error::ErrorKind;
use tabular_inspector::inspector::Inspector;
use tabular_inspector::store::InMemoryStore;
use tabular_inspector::types::{InspectionRequest, Separator};

fn populated_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for i in 0..16 {
        let body = format!("codigo;quantidade\nX{i};{i}\nY{i};{}\n", i * 2);
        store.put(BUCKET, format!("lote-{i}.csv"), body, None);
    }
    store
}

#[test]
fn batch_results_follow_request_order() {
    let inspector = Inspector::new(populated_store());
    let mut requests: Vec<InspectionRequest> = (0..16)
        .map(|i| InspectionRequest::new(BUCKET, format!("lote-{i}.csv")))
        .collect();
    requests.insert(5, InspectionRequest::new(BUCKET, "missing.csv"));

    let results = inspector.inspect_batch(&requests);

    assert_eq!(results.len(), 17);
    assert_eq!(results[5].error_type, Some(ErrorKind::FileNotFound));
    for (req, res) in requests.iter().zip(&results) {
        if req.key == "missing.csv" {
            continue;
        }
        assert!(res.success);
        assert_eq!(res.separator, Some(Separator::Semicolon));
        let i = req.key.trim_start_matches("lote-").trim_end_matches(".csv");
        assert_eq!(res.sample_rows[0].get("codigo"), Some(format!("X{i}").as_str()));
    }
}

#[test]
fn shared_inspector_across_threads() {
    let inspector = Arc::new(Inspector::new(populated_store()));
    let expected = inspector.inspect(BUCKET, "lote-3.csv");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let inspector = Arc::clone(&inspector);
            thread::spawn(move || inspector.inspect(BUCKET, "lote-3.csv"))
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
