// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
#[case("aa_bb")]
#[case("AA_BB")]
#[case("11_22")]
#[case("aa_BB")]
#[case("aa_11")]
#[case("11_bb")]
#[case("11_BB")]
#[case("aaAA11_aaBB11")]
fn test_valid_qualifiers(#[case] name: &str) {
    assert!(is_valid_qualifier(name));
}

#[rstest]
#[case("")]
#[case("a-b")]
#[case("a.b")]
#[case("a b")]
fn test_invalid_qualifiers(#[case] name: &str) {
    assert!(!is_valid_qualifier(name));
}

#[rstest]
fn test_valid_qualified_name() {
    let name = QualifiedName::new(
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        Some("abcdefghijklmnopqrstuvwxyz".to_string()),
    );
    assert!(name.is_valid());

    let name = QualifiedName::new("0123456789", Some("0123456789".to_string()));
    assert!(name.is_valid());
    assert_eq!(name.to_string(), "0123456789_0123456789");
}

#[rstest]
#[case("à")]
#[case("é")]
#[case("ù")]
#[case("è")]
#[case("ç")]
#[case("!")]
#[case("-")]
#[case("&")]
#[case("#")]
fn test_invalid_qualified_name(#[case] name: &str) {
    let qualified = QualifiedName::new(name, Some("dev".to_string()));
    assert!(!qualified.is_valid());

    let qualified = QualifiedName::new("demo", Some(name.to_string()));
    assert!(!qualified.is_valid());
}

#[rstest]
fn test_empty_qualifier_is_dropped() {
    let name = QualifiedName::new("demo", Some(String::new()));
    assert_eq!(name.qualifier, None);
    assert_eq!(name.to_string(), "demo");
    assert!(name.is_valid());
}
