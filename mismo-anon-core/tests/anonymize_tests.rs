// mismo-anon-core/tests/anonymize_tests.rs
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mismo_anon_core::{
    Anonymizer, AnonymizerConfig, AnonymizerError, Document, DocumentParser, Element,
    PiiCategory, RecoveringParser,
};

const CREDIT_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- credit response export -->
<RESPONSE_GROUP MISMOVersionID="2.3.1" xmlns:x="urn:example">
  <REQUESTING_PARTY _Name="Acme Mortgage Brokers" _StreetAddress="500 Market St" _City="Denver" _State="CO" _PostalCode="80202" InternalAccountIdentifier="A-17" LenderCaseIdentifier="LC-2231" _RequestedByName="mjones"/>
  <RESPONSE ResponseDateTime="2024-05-01T10:00:00">
    <RESPONSE_DATA>
      <CREDIT_RESPONSE CreditResponseID="CR1">
        <BORROWER BorrowerID="BOR1" _FirstName="Alice" _MiddleName="Q" _LastName="Zebulon" _UnparsedName="Alice Q Zebulon" _SSN="123-45-6789" _BirthDate="1971-03-04" _AgeYears="53">
          <_RESIDENCE _StreetAddress="77 Birch Ln" _City="Boulder" _State="CO" _PostalCode="80301" BorrowerResidencyType="Current"/>
          <CONTACT_DETAIL>
            <CONTACT_POINT _Type="Phone" _Value="3035550199"/>
            <CONTACT_POINT _Type="Email" _Value="alice@zebulon.test"/>
            <CONTACT_POINT _Type="Other" _Value="Back office"/>
          </CONTACT_DETAIL>
        </BORROWER>
        <x:BORROWER _SSN="987654321"/>
        <CREDIT_LIABILITY CreditLiabilityID="L1" _AccountIdentifier="4111000011112222" _UnpaidBalanceAmount="1200">
          <_CREDITOR _Name="First Zebulon Savings" _StreetAddress="1 Bank Plz"/>
        </CREDIT_LIABILITY>
        <CREDIT_SCORE CreditScoreID="S1" _Value="712">
          <_FACTOR _Code="14" _Text="Length of time accounts have been established"/>
        </CREDIT_SCORE>
        <CREDIT_FILE><_VARIATION _Name="Zebulon Family Trust"/></CREDIT_FILE>
        <![CDATA[raw <payload> & stuff]]>
      </CREDIT_RESPONSE>
    </RESPONSE_DATA>
  </RESPONSE>
</RESPONSE_GROUP>
"#;

fn anonymizer() -> Anonymizer {
    Anonymizer::with_default_config().unwrap()
}

fn parse(xml: &str) -> Document {
    RecoveringParser::default().parse(xml).unwrap()
}

fn run(xml: &str, seed: u64) -> (Document, Document) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (bytes, _) = anonymizer()
        .anonymize_document_with_rng(xml.as_bytes(), &mut rng)
        .unwrap();
    let out = String::from_utf8(bytes).unwrap();
    (parse(xml), parse(&out))
}

fn elements(doc: &Document) -> Vec<&Element> {
    doc.root.descendants()
}

fn find<'a>(doc: &'a Document, tag: &str) -> &'a Element {
    elements(doc).into_iter().find(|e| e.name == tag).unwrap()
}

fn value<'a>(element: &'a Element, name: &str) -> &'a str {
    element.attribute(name).unwrap().raw_value()
}

#[test]
fn test_shape_is_identical_after_anonymization() {
    let (before, after) = run(CREDIT_RESPONSE, 1);
    let before_elements = elements(&before);
    let after_elements = elements(&after);
    assert_eq!(before_elements.len(), after_elements.len());
    for (b, a) in before_elements.iter().zip(after_elements.iter()) {
        assert_eq!(b.name, a.name);
        let b_names: Vec<&str> = b.attributes.iter().map(|x| x.name.as_str()).collect();
        let a_names: Vec<&str> = a.attributes.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(b_names, a_names);
        assert_eq!(b.children.len(), a.children.len());
    }
}

#[test]
fn test_non_pii_values_are_byte_identical() {
    let (before, after) = run(CREDIT_RESPONSE, 2);
    let pii = mismo_anon_core::RuleTable::mismo();
    for (b, a) in elements(&before).iter().zip(elements(&after).iter()) {
        for (battr, aattr) in b.attributes.iter().zip(a.attributes.iter()) {
            let is_named_pii = pii.rules().iter().any(|r| r.attribute == battr.name);
            if !is_named_pii {
                assert_eq!(battr.raw_value(), aattr.raw_value(), "{} on <{}>", battr.name, b.name);
            }
        }
    }
    assert_eq!(value(find(&after, "CREDIT_SCORE"), "_Value"), "712");
}

#[test]
fn test_every_ssn_is_nine_digits() {
    for seed in 0..25 {
        let (_, after) = run(CREDIT_RESPONSE, seed);
        for element in elements(&after) {
            if let Some(attr) = element.attribute("_SSN") {
                assert_eq!(attr.raw_value().len(), 9);
                assert!(attr.raw_value().chars().all(|c| c.is_ascii_digit()));
            }
        }
    }
}

#[test]
fn test_namespaced_element_attributes_are_classified() {
    let (_, after) = run(CREDIT_RESPONSE, 3);
    let ssn = value(find(&after, "x:BORROWER"), "_SSN");
    assert_ne!(ssn, "987654321");
    assert_eq!(ssn.len(), 9);
}

#[test]
fn test_name_is_scoped_by_ancestor() {
    let config = AnonymizerConfig::load_default().unwrap();
    for seed in 0..10 {
        let (_, after) = run(CREDIT_RESPONSE, seed);
        let creditor = value(find(&after, "_CREDITOR"), "_Name");
        assert!(config.generator.creditor_names.iter().any(|n| n == creditor));
        let company = value(find(&after, "REQUESTING_PARTY"), "_Name");
        assert!(config.generator.company_names.iter().any(|n| n == company));
        assert_eq!(value(find(&after, "_VARIATION"), "_Name"), "Zebulon Family Trust");
    }
}

#[test]
fn test_contact_values_follow_type() {
    let (_, after) = run(CREDIT_RESPONSE, 4);
    let points: Vec<&Element> = elements(&after)
        .into_iter()
        .filter(|e| e.name == "CONTACT_POINT")
        .collect();
    assert!(value(points[0], "_Value").starts_with("555-"));
    assert!(value(points[1], "_Value").ends_with("@example.com"));
    assert_eq!(value(points[2], "_Value"), "Back office");
}

#[test]
fn test_address_constants() {
    let (_, after) = run(CREDIT_RESPONSE, 5);
    for tag in ["REQUESTING_PARTY", "_RESIDENCE"] {
        let element = find(&after, tag);
        assert_eq!(value(element, "_City"), "Anytown");
        assert_eq!(value(element, "_State"), "CA");
        assert_eq!(value(element, "_PostalCode"), "90001");
    }
}

#[test]
fn test_no_original_pii_survives() {
    let mut rng = StdRng::seed_from_u64(6);
    let (bytes, summary) = anonymizer()
        .anonymize_document_with_rng(CREDIT_RESPONSE.as_bytes(), &mut rng)
        .unwrap();
    let out = String::from_utf8(bytes).unwrap();
    for original in [
        "Alice", "Zebulon\"", "123-45-6789", "1971-03-04", "77 Birch Ln", "3035550199",
        "alice@zebulon.test", "4111000011112222", "First Zebulon Savings", "Acme Mortgage Brokers",
        "LC-2231", "mjones",
    ] {
        assert!(!out.contains(original), "{} survived", original);
    }
    assert_eq!(summary.occurrences(PiiCategory::SSN), 2);
    assert_eq!(summary.occurrences(PiiCategory::StreetAddress), 3);
}

#[test]
fn test_prolog_comment_and_cdata_preserved() {
    let out = anonymizer().anonymize_str(CREDIT_RESPONSE).unwrap();
    assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(out.contains("<!-- credit response export -->"));
    assert!(out.contains("<![CDATA[raw <payload> & stuff]]>"));
    assert!(out.contains(r#"xmlns:x="urn:example""#));
}

#[test]
fn test_unescaped_ampersand_is_recovered_and_replaced() -> Result<()> {
    let xml = r#"<_RESIDENCE _StreetAddress="123 Smith & Co Ave" _Note="A & B"/>"#;
    let out = anonymizer().anonymize_str(xml)?;
    let doc = parse(&out);
    let street = value(&doc.root, "_StreetAddress");
    assert!(!street.contains("Smith"));
    assert!(street.ends_with(" Main Street"));
    assert_eq!(value(&doc.root, "_Note"), "A &amp; B");
    Ok(())
}

#[test]
fn test_unescaped_lt_before_a_word_is_recovered() -> Result<()> {
    let out = anonymizer().anonymize_str("<A><NOTE>Smith <Jones & Co</NOTE></A>")?;
    assert!(out.contains("<NOTE>Smith &lt;Jones &amp; Co</NOTE>"));

    let out = anonymizer().anonymize_str(r#"<A _City="X"><NOTE>balance a<b limit</NOTE></A>"#)?;
    assert!(out.contains(r#"<A _City="Anytown">"#));
    assert!(out.contains("<NOTE>balance a&lt;b limit</NOTE>"));
    Ok(())
}

#[test]
fn test_generated_values_are_escaped() -> Result<()> {
    let mut config = AnonymizerConfig::load_default()?;
    config.generator.creditor_names = vec!["SMITH & SONS <CREDIT>".to_string()];
    let anonymizer = Anonymizer::new(config)?;
    let out = anonymizer.anonymize_str(r#"<_CREDITOR _Name="x"/>"#)?;
    assert!(out.contains(r#"_Name="SMITH &amp; SONS &lt;CREDIT&gt;""#));
    Ok(())
}

#[test]
fn test_unrecoverable_input_is_rejected() {
    let anonymizer = anonymizer();
    for bad in [
        "",
        "<A><B></A>",
        "<A _SSN=\"123456789\">",
        "<A/><B/>",
        "just text",
    ] {
        let err = anonymizer.anonymize_str(bad).unwrap_err();
        assert!(matches!(err, AnonymizerError::MalformedDocument(_)), "{:?}", bad);
        assert!(!err.to_string().contains("123456789"));
    }
}

#[test]
fn test_byte_order_mark_accepted() {
    let mut raw = vec![0xEF, 0xBB, 0xBF];
    raw.extend_from_slice(br#"<A _City="Reno"/>"#);
    let out = anonymizer().anonymize_document(&raw).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(r#"_City="Anytown""#));
}
