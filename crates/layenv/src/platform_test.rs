// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;
use crate::EnvDescriptor;

fn platform(yaml: &str) -> Platform {
    let descriptor = EnvDescriptor::from_yaml(yaml).expect("Should parse descriptor");
    Platform::from_descriptor(
        &descriptor.platform,
        DescriptorLocation::root().append_path("platform"),
    )
}

#[rstest]
fn test_components_are_resolved_against_base() {
    let p = platform(
        r#"
platform:
  base: https://github.com
  auth:
    method: basic
  components:
    distrib:
      repository: acme/distribution
      ref: v1.0.0
"#,
    );

    let distrib = p.components.get("distrib").expect("component should exist");
    assert_eq!(distrib.repository.url, "acme/distribution");
    assert_eq!(
        distrib.repository.resolved_url(&p.base),
        "https://github.com/acme/distribution"
    );
    assert_eq!(distrib.repository.git_ref.as_deref(), Some("v1.0.0"));
    assert_eq!(
        distrib.repository.effective_auth(&p.base).get("method").map(String::as_str),
        Some("basic")
    );
    assert_eq!(distrib.location.to_string(), "platform.components.distrib");
}

#[rstest]
fn test_merge_first_seen_component_wins() {
    let main = platform(
        r#"
platform:
  components:
    aws:
      repository: https://main.example.com/aws.git
"#,
    );
    let imported = platform(
        r#"
platform:
  components:
    aws:
      repository: https://imported.example.com/aws.git
    gcp:
      repository: https://imported.example.com/gcp.git
"#,
    );

    let merged = main.merge(&imported).unwrap();
    let ids: Vec<_> = merged.components.ids().collect();
    assert_eq!(ids, vec!["aws", "gcp"]);
    assert_eq!(
        merged.components.get("aws").unwrap().repository.url,
        "https://main.example.com/aws.git"
    );
}

#[rstest]
fn test_merge_replaces_unset_distribution_wholesale() {
    let main = platform("platform: {}\n");
    let imported = platform(
        r#"
platform:
  distribution:
    component: distrib
    params:
      flavor: ubuntu
"#,
    );

    let merged = main.merge(&imported).unwrap();
    assert_eq!(merged.distribution, imported.distribution);
}

#[rstest]
fn test_merge_keeps_set_distribution() {
    let main = platform(
        r#"
platform:
  distribution:
    component: mine
    params:
      flavor: debian
"#,
    );
    let imported = platform(
        r#"
platform:
  distribution:
    component: theirs
    params:
      flavor: ubuntu
      size: small
"#,
    );

    let merged = main.merge(&imported).unwrap();
    assert_eq!(merged.distribution.component.id(), Some("mine"));
    assert_eq!(
        merged.distribution.parameters.get("flavor"),
        Some(&serde_yaml::Value::from("debian"))
    );
    assert!(merged.distribution.parameters.contains_key("size"));
}

#[rstest]
fn test_customize_overrides_components_and_distribution() {
    let main = platform(
        r#"
platform:
  base: https://github.com
  distribution:
    component: distrib
    env:
      LANG: C
  components:
    distrib:
      repository: acme/distribution
      ref: v1.0.0
"#,
    );
    let custom = platform(
        r#"
platform:
  distribution:
    component: distrib2
    env:
      LANG: en_US.UTF-8
  components:
    distrib:
      repository: https://mirror.example.com/distribution.git
    distrib2:
      repository: https://mirror.example.com/distribution2.git
"#,
    );

    let customized = main.customize(&custom).unwrap();
    assert_eq!(customized.distribution.component.id(), Some("distrib2"));
    assert_eq!(
        customized.distribution.env_vars.get("LANG").map(String::as_str),
        Some("en_US.UTF-8")
    );

    let distrib = customized.components.get("distrib").unwrap();
    assert_eq!(distrib.repository.url, "https://mirror.example.com/distribution.git");
    assert_eq!(distrib.repository.git_ref.as_deref(), Some("v1.0.0"));
    assert!(customized.components.contains("distrib2"));
    assert_eq!(customized.base.repository.as_deref(), Some("https://github.com"));
}

#[rstest]
fn test_self_merge_is_identity() {
    let p = platform(
        r#"
platform:
  base: https://github.com
  distribution:
    component: distrib
  components:
    distrib:
      repository: acme/distribution
"#,
    );
    assert_eq!(p.merge(&p).unwrap(), p);
}

#[rstest]
fn test_base_composition() {
    let mut first = Base {
        repository: Some("https://first.example.com".to_string()),
        auth: Auth::new(),
    };
    first.auth.insert("user", "first".to_string());
    let mut second = Base {
        repository: Some("https://second.example.com".to_string()),
        auth: Auth::new(),
    };
    second.auth.insert("user", "second".to_string());

    let merged = first.merge(&second);
    assert_eq!(merged.repository.as_deref(), Some("https://first.example.com"));
    assert_eq!(merged.auth.get("user").map(String::as_str), Some("first"));

    let customized = first.customize(&second);
    assert_eq!(customized.repository.as_deref(), Some("https://second.example.com"));
    assert_eq!(customized.auth.get("user").map(String::as_str), Some("second"));
}

#[rstest]
fn test_merge_fills_gaps_of_known_components() {
    let main = platform(
        r#"
platform:
  components:
    aws:
      repository: https://main.example.com/aws.git
"#,
    );
    let imported = platform(
        r#"
platform:
  components:
    aws:
      repository: https://imported.example.com/aws.git
      ref: v2
      auth:
        user: deploy
"#,
    );

    let merged = main.merge(&imported).unwrap();
    let aws = merged.components.get("aws").unwrap();
    assert_eq!(aws.repository.url, "https://main.example.com/aws.git");
    assert_eq!(aws.repository.git_ref.as_deref(), Some("v2"));
    assert_eq!(aws.repository.auth.get("user").map(String::as_str), Some("deploy"));
}

#[rstest]
fn test_orchestrator_is_an_optional_reference() {
    let unset = platform("platform: {}\n");
    assert!(!unset.orchestrator.is_set());
    assert!(!unset.orchestrator.is_mandatory());
    assert_eq!(unset.orchestrator.location().to_string(), "platform.orchestrator");

    let main = platform("platform:\n  orchestrator: swarm\n");
    let custom = platform("platform:\n  orchestrator: k8s\n");

    assert_eq!(unset.merge(&main).unwrap().orchestrator.id(), Some("swarm"));
    assert_eq!(main.merge(&custom).unwrap().orchestrator.id(), Some("swarm"));
    assert_eq!(main.customize(&custom).unwrap().orchestrator.id(), Some("k8s"));
    assert_eq!(main.customize(&unset).unwrap().orchestrator.id(), Some("swarm"));
}
