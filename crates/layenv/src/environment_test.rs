// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::{fixture, rstest};

use super::*;
use crate::validation::Severity;

const VALID: &str = r#"
name: demo
qualifier: dev
platform:
  base: https://github.com
  distribution:
    component: distrib
  components:
    distrib:
      repository: acme/distribution
    aws:
      repository: acme/aws-provider
providers:
  aws:
    component: aws
  aws_bis:
    component: aws
nodes:
  managers:
    instances: 3
    provider:
      name: aws
"#;

fn environment(yaml: &str) -> Environment {
    Environment::from_descriptor(&EnvDescriptor::from_yaml(yaml).expect("Should parse descriptor"))
}

#[fixture]
fn valid() -> Environment {
    environment(VALID)
}

#[rstest]
fn test_valid_environment(valid: Environment) {
    assert_eq!(valid.qualified_name().to_string(), "demo_dev");

    let report = valid.validate();
    assert!(report.is_empty(), "unexpected diagnostics: {report:?}");
}

#[rstest]
fn test_self_merge_is_identity(valid: Environment) {
    assert_eq!(valid.merge(&valid).unwrap(), valid);
    assert_eq!(valid.customize(&valid).unwrap(), valid);
}

#[rstest]
fn test_diagnostics_follow_visiting_order() {
    let env = environment(
        r#"
name: demo
providers:
  aws:
    component: aws
"#,
    );
    let report = env.validate();

    let found: Vec<_> = report
        .iter()
        .map(|e| (e.severity, e.location.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (Severity::Error, "platform.distribution.component"),
            (Severity::Error, "providers.aws.component"),
        ]
    );
}

#[rstest]
fn test_unset_mandatory_reference_reports_exactly_once() {
    let env = environment(
        r#"
name: demo
platform:
  components:
    aws:
      repository: https://example.com/aws.git
providers:
  aws:
    component: aws
"#,
    );
    let report = env.validate();

    assert_eq!(report.len(), 1);
    let error = report.iter().next().unwrap();
    assert!(error.is_error());
    assert_eq!(error.location, "platform.distribution.component");
}

#[rstest]
#[case("name: demo-env\n", "name")]
#[case("name: demo\nqualifier: \"d!\"\n", "qualifier")]
#[case("description: fragment\n", "name")]
fn test_invalid_names(#[case] yaml: &str, #[case] location: &str) {
    let report = environment(yaml).validate();
    assert!(report.iter().any(|e| e.is_error() && e.location == location));
}

#[rstest]
fn test_unrelated_environments_are_rejected(valid: Environment) {
    let other = environment("name: other\n");
    assert!(matches!(
        valid.merge(&other),
        Err(crate::Error::UnrelatedEntities { kind: "environment", .. })
    ));
    assert!(valid.customize(&other).is_err());
}

#[rstest]
fn test_unnamed_fragment_adopts_identity(valid: Environment) {
    let fragment = environment("description: shared settings\n");

    let merged = fragment.merge(&valid).unwrap();
    assert_eq!(merged.name, "demo");
    assert_eq!(merged.qualifier.as_deref(), Some("dev"));
    assert_eq!(merged.description.as_deref(), Some("shared settings"));

    let customized = valid.customize(&fragment).unwrap();
    assert_eq!(customized.name, "demo");
    assert_eq!(customized.description.as_deref(), Some("shared settings"));
}

#[rstest]
fn test_used_components_are_deduplicated(valid: Environment) {
    let used = valid.used_components().unwrap();
    let ids: Vec<_> = used.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["distrib", "aws"]);
}

#[rstest]
fn test_used_components_fail_on_unresolved() {
    let env = environment("name: demo\n");
    assert!(matches!(
        env.used_components(),
        Err(crate::Error::UnresolvedReference(_))
    ));
}

#[rstest]
fn test_optional_orchestrator_reference(valid: Environment) {
    // unset: nothing to report
    assert!(valid.platform.orchestrator.id().is_none());
    assert!(valid.validate().is_empty());

    let unknown = valid
        .customize(&environment("platform:\n  orchestrator: swarm\n"))
        .unwrap();
    let report = unknown.validate();
    assert_eq!(report.len(), 1);
    assert!(!report.has_errors());
    assert_eq!(
        report.iter().next().map(|e| e.location.as_str()),
        Some("platform.orchestrator")
    );

    let declared = unknown
        .customize(&environment(
            "platform:\n  components:\n    swarm:\n      repository: acme/swarm\n",
        ))
        .unwrap();
    assert!(declared.validate().is_empty());
    let ids: Vec<_> = declared
        .used_components()
        .unwrap()
        .into_iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["distrib", "swarm", "aws"]);
}

#[rstest]
fn test_crate_documentation_example_is_valid() {
    let env = environment(
        r#"
name: demo
qualifier: dev
platform:
  base: https://github.com
  distribution:
    component: distrib
  components:
    distrib:
      repository: acme/distribution
      ref: v1.0.0
    aws:
      repository: acme/aws-provider
providers:
  aws:
    component: aws
    params:
      region: eu-west-1
"#,
    );
    let report = env.validate();
    assert!(report.is_empty(), "unexpected diagnostics: {report:?}");
}
