#![no_main]

//! Fuzz target for the HCL outline parser.
//!
//! Arbitrary text must never panic, the outline must accept exactly what the
//! syntax check accepts, and every span it reports must fall on character
//! boundaries inside the input.

use libfuzzer_sys::fuzz_target;
use tffix_hcl::{Body, Item, parse};

fn check(src: &str, body: &Body) {
    for item in &body.items {
        let span = item.span();
        assert!(span.start <= span.end && span.end <= src.len());
        assert!(src.is_char_boundary(span.start) && src.is_char_boundary(span.end));
        match item {
            Item::Attribute(attr) => {
                assert!(span.contains(&attr.eq));
                assert!(src[span.clone()].starts_with(attr.key.as_str()));
            }
            Item::Block(block) => {
                assert_eq!(&src[block.open..=block.open], "{");
                assert_eq!(&src[block.close..=block.close], "}");
                check(src, &block.body);
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let outline = parse(s);
    if let Ok(body) = &outline {
        check(s, body);
    }
    assert_eq!(outline.is_ok(), tffix_hcl::syntax_error(s).is_none());
});
