#![no_main]

use libfuzzer_sys::fuzz_target;
use sift::search::{MemoryIndex, SearchContext};

fuzz_target!(|data: &str| {
    // Decoding arbitrary text must never panic. Anything that decodes and
    // validates must re-encode to an equal tree and compile.
    let Ok(query) = sift::query::parse_query(data) else {
        return;
    };
    if query.validate().is_err() {
        return;
    }
    let text = serde_json::to_string(&query).unwrap();
    assert_eq!(sift::query::parse_query(&text).unwrap(), query);

    let mut index = MemoryIndex::new("body");
    index.add_document(1, &[("body", "fuzz the decoder"), ("title", "sift")]);
    if let Ok(mut searcher) = query.searcher(&SearchContext::new(&index, &index)) {
        let _ = sift::search::collect_doc_ids(searcher.as_mut());
        let _ = searcher.close();
    }
});
