#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First line is a dotted path, the rest a JSON document.
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Some((path, document)) = s.split_once('\n') else {
        return;
    };
    if let Ok(document) = serde_json::from_str::<serde_json::Value>(document) {
        let document = docmatch_core::Value::from(document);
        let _ = docmatch_core::resolve(&document, path);
    }
});
