// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use rstest::rstest;

use super::*;

fn block(pairs: &[(&str, &str)]) -> EnvVars {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

#[rstest]
fn test_override_with_incoming_wins() {
    let base = block(&[("x", "1"), ("y", "2")]);
    let with = block(&[("y", "3"), ("z", "4")]);

    let result = base.override_with(&with);

    assert_eq!(result, block(&[("x", "1"), ("y", "3"), ("z", "4")]));
    // neither side is touched
    assert_eq!(base, block(&[("x", "1"), ("y", "2")]));
    assert_eq!(with, block(&[("y", "3"), ("z", "4")]));
}

#[rstest]
fn test_inherit_receiver_wins() {
    let receiver = block(&[("y", "3"), ("z", "4")]);
    let base = block(&[("x", "1"), ("y", "2")]);

    let result = receiver.inherit(&base);

    assert_eq!(result, block(&[("x", "1"), ("y", "3"), ("z", "4")]));
}

#[rstest]
#[case(&[], &[])]
#[case(&[("a", "1")], &[])]
#[case(&[], &[("a", "1")])]
fn test_empty_sides(#[case] left: &[(&str, &str)], #[case] right: &[(&str, &str)]) {
    let left = block(left);
    let right = block(right);
    let expected_len = left.len() + right.len();

    assert_eq!(left.inherit(&right).len(), expected_len);
    assert_eq!(left.override_with(&right).len(), expected_len);
}

#[rstest]
fn test_keys_are_case_sensitive() {
    let base = block(&[("Key", "1")]);
    let with = block(&[("key", "2")]);

    let result = base.override_with(&with);
    assert_eq!(result.len(), 2);
    assert_eq!(result.get("Key").map(String::as_str), Some("1"));
}

#[rstest]
fn test_self_inherit_is_identity() {
    let params = block(&[("a", "1"), ("b", "2")]);
    assert_eq!(params.inherit(&params), params);
    assert_eq!(params.override_with(&params), params);
}

#[rstest]
fn test_null_parameters_are_dropped() {
    let mut raw = IndexMap::new();
    raw.insert("region".to_string(), serde_yaml::Value::from("eu-west-1"));
    raw.insert("zone".to_string(), serde_yaml::Value::Null);

    let params = Parameters::from_values(&raw);

    assert_eq!(params.len(), 1);
    assert!(!params.contains_key("zone"));
}

#[rstest]
fn test_absent_strings_are_dropped() {
    let mut raw = IndexMap::new();
    raw.insert(HTTP_PROXY_KEY.to_string(), Some("http://proxy:3128".to_string()));
    raw.insert(NO_PROXY_KEY.to_string(), None);

    let proxy = Proxy::from_optional(&raw);

    assert_eq!(proxy.http_proxy(), Some("http://proxy:3128"));
    assert_eq!(proxy.no_proxy(), None);
    assert_eq!(proxy.len(), 1);
}
