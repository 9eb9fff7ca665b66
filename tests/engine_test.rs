use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use sagedex::{
    DocId, Engine, ErrorKind, FieldValue, Fields, Filter, FindOptions, MatchType, SortOrder,
};

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs.iter().map(|(k, v)| (k.to_string(), FieldValue::from(*v))).collect()
}

fn filter(pairs: &[(&str, &str)]) -> Filter {
    fields(pairs)
}

fn fox_engine() -> Engine {
    let engine = Engine::new();
    engine.index(fields(&[
        ("title", "The quick brown fox jumps over the lazy dog"),
        ("description", "In the forest"),
    ]), "doc1").unwrap();
    engine.index(fields(&[
        ("title", "The quick white bird flies over the lazy fox"),
        ("description", "In the sky"),
    ]), "doc2").unwrap();
    engine.index(fields(&[
        ("title", "An agile fox sprints in the daylight"),
        ("description", "In the wild"),
    ]), "doc3").unwrap();
    engine
}

#[test]
fn test_find_single_term() {
    let engine = fox_engine();
    let result = engine.find(&filter(&[("title", "fox")]), None).unwrap();

    assert_eq!(result.matched(), 3);
    assert_eq!(result.returned(), 3);
    // No Timestamp field anywhere, so ids ascending
    assert_eq!(result.doc_ids(), vec!["doc1", "doc2", "doc3"]);
    assert_eq!(result.meta.as_ref().unwrap().total_records, 3);
}

#[test]
fn test_find_and_across_fields() {
    let engine = fox_engine();
    let result = engine.find(&filter(&[("title", "quick"), ("description", "forest")]), None).unwrap();
    assert_eq!(result.doc_ids(), vec!["doc1"]);
}

#[test]
fn test_find_or_across_fields() {
    let engine = fox_engine();
    let opts = FindOptions::default().match_type(MatchType::Or);
    let result = engine.find(&filter(&[("title", "agile"), ("description", "sky")]), Some(&opts)).unwrap();
    assert_eq!(result.doc_ids(), vec!["doc2", "doc3"]);
}

#[test]
fn test_find_phrase_requires_adjacent_terms() {
    let engine = fox_engine();
    let opts = FindOptions::default().match_type(MatchType::Phrase);

    let result = engine.find(&filter(&[("title", "lazy fox")]), Some(&opts)).unwrap();
    assert_eq!(result.doc_ids(), vec!["doc2"]);

    let result = engine.find(&filter(&[("title", "quick brown")]), Some(&opts)).unwrap();
    assert_eq!(result.doc_ids(), vec!["doc1"]);

    // Both terms occur in doc1 and doc2 but never next to each other
    let result = engine.find(&filter(&[("title", "fox lazy")]), Some(&opts)).unwrap();
    assert!(result.documents.is_empty());
}

#[test]
fn test_find_limit_and_start() {
    let engine = fox_engine();

    let result = engine.find(&filter(&[("title", "fox")]), Some(&FindOptions::with_limit(2))).unwrap();
    assert_eq!(result.matched(), 3);
    assert_eq!(result.returned(), 2);
    assert_eq!(result.doc_ids(), vec!["doc1", "doc2"]);

    let opts = FindOptions::default().start(2).limit(2);
    let result = engine.find(&filter(&[("title", "fox")]), Some(&opts)).unwrap();
    assert_eq!(result.doc_ids(), vec!["doc3"]);
}

#[test]
fn test_find_start_past_matches() {
    let engine = fox_engine();
    let opts = FindOptions::default().start(10);
    let result = engine.find(&filter(&[("title", "fox")]), Some(&opts)).unwrap();

    let meta = result.meta.expect("meta entry");
    assert_eq!(meta.matched_records, 0);
    assert_eq!(meta.returned_records, 0);
    assert_eq!(meta.total_records, 3);
    assert!(result.documents.is_empty());
}

#[test]
fn test_find_negative_limit_is_empty() {
    let engine = fox_engine();
    let result = engine.find(&filter(&[("title", "fox")]), Some(&FindOptions::with_limit(-1))).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_find_on_empty_engine() {
    let engine = Engine::new();
    let result = engine.find(&filter(&[("title", "fox")]), None).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.to_json().unwrap(), serde_json::json!([]));
}

#[test]
fn test_find_only_stopwords_gives_zero_meta() {
    let engine = fox_engine();
    let result = engine.find(&filter(&[("title", "the")]), None).unwrap();
    let meta = result.meta.expect("meta entry");
    assert_eq!((meta.matched_records, meta.total_records, meta.returned_records), (0, 0, 0));
}

#[test]
fn test_find_rejects_non_text_filter() {
    let engine = fox_engine();
    let mut bad: Filter = HashMap::new();
    bad.insert("title".to_string(), FieldValue::from("fox"));
    bad.insert("Timestamp".to_string(), FieldValue::Number(17.0));

    let err = engine.find(&bad, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidFilterValue);

    // Nothing indexed yet: empty answer, values are never looked at
    let result = Engine::new().find(&bad, None).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_find_sorts_by_timestamp() {
    let engine = Engine::new();
    for (id, ts) in [("a", 30.0), ("b", 10.0), ("c", 20.0)] {
        let mut row = fields(&[("Message", "disk full")]);
        row.insert("Timestamp".to_string(), FieldValue::Number(ts));
        engine.index(row, id).unwrap();
    }

    let result = engine.find(&filter(&[("Message", "disk")]), None).unwrap();
    assert_eq!(result.doc_ids(), vec!["a", "c", "b"]);

    let opts = FindOptions::default().sort(SortOrder::Ascending);
    let result = engine.find(&filter(&[("Message", "disk")]), Some(&opts)).unwrap();
    assert_eq!(result.doc_ids(), vec!["b", "c", "a"]);
}

#[test]
fn test_find_mixed_timestamps_fall_back_to_id_order() {
    let engine = Engine::new();
    engine.index(fields(&[("Message", "disk full"), ("Timestamp", "5")]), "z").unwrap();
    engine.index(fields(&[("Message", "disk full")]), "m").unwrap();
    engine.index(fields(&[("Message", "disk full"), ("Timestamp", "9")]), "a").unwrap();

    let result = engine.find(&filter(&[("Message", "disk")]), None).unwrap();
    assert_eq!(result.doc_ids(), vec!["a", "m", "z"]);
}

#[test]
fn test_reindex_retracts_stale_postings() {
    let engine = Engine::new();
    engine.index(fields(&[("title", "red apple")]), "doc1").unwrap();
    engine.index(fields(&[("title", "green pear")]), "doc1").unwrap();

    assert_eq!(engine.get_stats(), 1);
    assert!(engine.posting_list("appl").is_none());
    assert_eq!(engine.posting_list("pear"), Some(vec![DocId::from("doc1")]));

    let result = engine.find(&filter(&[("title", "apple")]), None).unwrap();
    assert!(result.documents.is_empty());
    assert_eq!(result.matched(), 0);
}

#[test]
fn test_index_analyzes_field_values() {
    let engine = Engine::new();
    let report = engine.index(fields(&[("text", "Running, runs! The dogs")]), "d").unwrap();

    assert_eq!(report.term_count, 3);
    assert_eq!(engine.terms(), vec!["dog", "run"]);
    assert_eq!(engine.posting_list("run"), Some(vec![DocId::from("d")]));
    assert!(engine.posting_list("the").is_none());
}

#[test]
fn test_index_posts_every_analyzed_term() {
    let engine = Engine::new();
    engine.index(fields(&[
        ("title", "The quick brown fox jumps over the lazy dog"),
        ("meta", "In the forest"),
    ]), "D").unwrap();

    let terms = engine.terms();
    assert_eq!(terms, vec!["brown", "dog", "forest", "fox", "jump", "lazi", "over", "quick"]);
    for term in &terms {
        assert_eq!(engine.posting_list(term), Some(vec![DocId::from("D")]), "term {}", term);
    }
}

#[test]
fn test_index_rejects_empty_id() {
    let engine = Engine::new();
    let err = engine.index(fields(&[("title", "fox")]), "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert_eq!(engine.get_stats(), 0);
}

#[test]
fn test_get_returns_newest_first() {
    let engine = Engine::new();
    for id in ["docA", "docB", "docC", "docD", "docE"] {
        engine.index(fields(&[("name", id)]), id).unwrap();
    }

    let ids = |docs: Vec<sagedex::Document>| docs.into_iter().map(|d| d.id.0).collect::<Vec<_>>();

    assert_eq!(ids(engine.get(Some(&FindOptions::with_limit(2)))), vec!["docE", "docD"]);
    assert_eq!(ids(engine.get(Some(&FindOptions::default().start(1).limit(2)))), vec!["docD", "docC"]);
    assert_eq!(ids(engine.get(Some(&FindOptions::default().start(4).limit(5)))), vec!["docA"]);
    assert!(engine.get(Some(&FindOptions::default().start(9))).is_empty());
    assert!(engine.get(Some(&FindOptions::with_limit(-3))).is_empty());

    // Re-indexing moves a document to the front without duplicating it
    engine.index(fields(&[("name", "docB again")]), "docB").unwrap();
    let all = ids(engine.get(None));
    assert_eq!(all, vec!["docB", "docE", "docD", "docC", "docA"]);
    assert_eq!(engine.recency_order().len(), 5);
}

#[test]
fn test_get_doc_is_case_insensitive_substring() {
    let engine = fox_engine();

    let result = engine.get_doc("FoX", None);
    assert_eq!(result.matched(), 3);
    assert_eq!(result.doc_ids(), vec!["doc3", "doc2", "doc1"]);

    // Partial words and stopwords match too, unlike find
    let result = engine.get_doc("agi", None);
    assert_eq!(result.doc_ids(), vec!["doc3"]);
    let result = engine.get_doc("THE FOREST", None);
    assert_eq!(result.doc_ids(), vec!["doc1"]);
    assert_eq!(result.meta.unwrap().total_records, 3);
}

#[test]
fn test_get_doc_paginates_over_recency_window() {
    let engine = fox_engine();

    // Window holds doc3 and doc2 only; matched counts the whole store
    let result = engine.get_doc("forest", Some(&FindOptions::with_limit(2)));
    assert_eq!(result.matched(), 1);
    assert!(result.documents.is_empty());

    let result = engine.get_doc("fox", Some(&FindOptions::default().start(1).limit(1)));
    assert_eq!(result.doc_ids(), vec!["doc2"]);
    assert_eq!(result.matched(), 3);
    assert_eq!(result.returned(), 1);
}

#[test]
fn test_to_json_wire_shape() {
    let engine = fox_engine();
    let value = engine.find(&filter(&[("title", "agile")]), None).unwrap().to_json().unwrap();

    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["meta"]["matchedRecords"], 1);
    assert_eq!(entries[0]["meta"]["returnedRecords"], 1);
    assert_eq!(entries[1]["title"], "An agile fox sprints in the daylight");
}

#[test]
fn test_close_and_reset() {
    let engine = fox_engine();
    engine.close();

    assert!(engine.is_closed());
    assert_eq!(engine.get_stats(), 0);
    let err = engine.index(fields(&[("title", "fox")]), "doc9").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert!(engine.find(&filter(&[("title", "fox")]), None).unwrap().is_empty());

    engine.reset();
    assert!(!engine.is_closed());
    engine.index(fields(&[("title", "fox")]), "doc9").unwrap();
    assert_eq!(engine.get_stats(), 1);
}

#[test]
fn test_stats_track_postings() {
    let engine = fox_engine();
    let stats = engine.stats();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.recency_len, 3);
    assert_eq!(stats.distinct_terms, engine.terms().len());
    assert!(stats.total_postings >= stats.distinct_terms);
}

#[test]
fn test_concurrent_index_and_query() {
    let engine = Arc::new(Engine::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("t{}-{}", t, i);
                    engine.index(fields(&[("Message", "shared payload"), ("thread", t.to_string().as_str())]), id).unwrap();
                    let result = engine.find(&filter(&[("Message", "payload")]), Some(&FindOptions::with_limit(5))).unwrap();
                    assert!(result.matched() >= 1);
                    assert!(result.returned() <= 5);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.get_stats(), 400);
    let result = engine.find(&filter(&[("Message", "payload")]), None).unwrap();
    assert_eq!(result.matched(), 400);
    assert_eq!(engine.posting_list("payload").unwrap().len(), 400);

    let order = engine.recency_order();
    assert_eq!(order.len(), 400);
    let unique: HashSet<&DocId> = order.iter().collect();
    assert_eq!(unique.len(), 400);
}
