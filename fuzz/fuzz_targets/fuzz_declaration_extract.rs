//! Fuzz target for declaration extraction.
//!
//! The extractor must never panic, whatever follows a marker.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_declaration_extract
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    max_declaration_len: u16,
}

fuzz_target!(|input: Input<'_>| {
    let _ = selfexpose_repo::fuzz::extract_declarations(input.text);

    // Small bounds exercise the truncated-scan path.
    let _ = selfexpose_repo::fuzz::extract_bounded(input.text, input.max_declaration_len as usize);

    // Same text behind a marker, so the brace scanner always runs.
    let marked = format!("# @self-expose: {}", input.text);
    let _ = selfexpose_repo::fuzz::extract_declarations(&marked);
});
