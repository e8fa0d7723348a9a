// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
fn test_root_is_empty() {
    let root = DescriptorLocation::root();
    assert!(root.is_root());
    assert_eq!(root.to_string(), "");
}

#[rstest]
fn test_append_path_leaves_parent_untouched() {
    let parent = DescriptorLocation::root().append_path("providers");
    let child = parent.append_path("aws").append_path("component");

    assert_eq!(parent.to_string(), "providers");
    assert_eq!(child.to_string(), "providers.aws.component");
    assert_eq!(child.segments().len(), 3);
}

#[rstest]
fn test_from_segments() {
    let location = DescriptorLocation::from_segments(["platform", "components", "aws"]);
    assert_eq!(
        location,
        DescriptorLocation::root()
            .append_path("platform")
            .append_path("components")
            .append_path("aws")
    );
}
