#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Input is an expression and a document separated by a newline.
    // Evaluation must return a result or an error, never panic.
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Some((expression, document)) = s.split_once('\n') else {
        return;
    };
    let (Ok(expression), Ok(document)) = (
        serde_json::from_str::<serde_json::Value>(expression),
        serde_json::from_str::<serde_json::Value>(document),
    ) else {
        return;
    };
    let _ = docmatch_core::matches(&expression.into(), &document.into());
});
