//! Parsing, serialization, and visibility toggles over a realistic page.

use xsdoc::{resolve, visibility, xhtml};

const PAGE: &str = r#"<html><body>
<div id="schema">
<div class="element" id="OME">
<p class="documentation">Root element of the model.</p>
<div class="collapsible"><!-- open microscopy --></div>
<div class="reference" ref="Image"/>
</div>
<div class="element" id="Image">
<p class="documentation">One image acquisition.</p>
<div class="reference" ref="Pixels"/>
<a class="typeLink" ref="xsd:dateTime"/>
</div>
<div class="element" id="Pixels">
<p class="documentation">Pixel payload.</p>
</div>
</div>
</body></html>"#;

#[test]
fn test_full_page_resolution_roundtrip() {
    let mut tree = xhtml::parse(PAGE).expect("page should parse");

    let report = resolve(&mut tree).expect("resolution should succeed");
    assert_eq!(report.moved(), 2, "Image and Pixels each move once");
    assert_eq!(report.removed(), 1, "the xsd: type link is dropped");
    assert!(report.is_clean());

    let out = xhtml::serialize(&tree);

    // The spliced hierarchy is visible in the output: Image directly after
    // its reference, with Pixels expanded inside it.
    let image_ref = out.find(r#"<div class="reference" ref="Image"/>"#).unwrap();
    let image_def = out.find(r#"<div class="element linkedElement" id="Image">"#).unwrap();
    assert!(image_def > image_ref);
    assert!(out.contains(r#"<div class="element linkedElement" id="Pixels">"#));
    assert!(!out.contains("xsd:dateTime"));
    // Comments survive the roundtrip
    assert!(out.contains("<!-- open microscopy -->"));
}

#[test]
fn test_visibility_toggles_on_parsed_page() {
    let mut tree = xhtml::parse(PAGE).expect("page should parse");

    assert_eq!(visibility::hide_docs(&mut tree), 3);
    let out = xhtml::serialize(&tree);
    assert_eq!(out.matches("hidden=\"hidden\"").count(), 3);

    assert_eq!(visibility::show_docs(&mut tree), 3);
    assert!(!xhtml::serialize(&tree).contains("hidden"));

    assert_eq!(visibility::collapse_all(&mut tree), 1);
    assert!(xhtml::serialize(&tree).contains(r#"class="collapsible" hidden="hidden""#));
}
