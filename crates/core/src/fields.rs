//! Per-resource-kind field projections
//!
//! The ordered attribute lists the markup renderer is asked to emit for each
//! resource kind. Names use the hyphen form carried on the wire; the
//! renderer accepts either spelling and always emits underscore tags.

pub const TEST_FIELDS: &[&str] = &[
    "title",
    "description",
    "suite-id",
    "file",
    "priority",
    "state",
    "tags",
    "labels",
    "updated-at",
];

pub const SUITE_FIELDS: &[&str] = &[
    "title",
    "description",
    "parent-id",
    "file-type",
    "emoji",
    "tests-count",
    "updated-at",
];

pub const RUN_FIELDS: &[&str] = &[
    "title",
    "status",
    "env",
    "duration",
    "tests-count",
    "passed-count",
    "failed-count",
    "skipped-count",
    "created-at",
];

pub const PLAN_FIELDS: &[&str] = &["title", "kind", "tests-ids", "created-at", "updated-at"];

pub const LABEL_FIELDS: &[&str] = &["title", "color", "scope", "visibility"];
