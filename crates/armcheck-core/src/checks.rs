// crates/armcheck-core/src/checks.rs
// ============================================================================
// Module: Structural Checks
// Description: Independent shape checks over template and parameters documents.
// Purpose: Turn a profile's expectations into a per-check pass/fail report.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`evaluate`] runs every expectation of a [`TemplateProfile`] against a
//! template and its parameters file and returns a [`CheckReport`].
//!
//! ## Invariants
//! - Every check is evaluated; a failure never short-circuits the rest.
//! - A missing prerequisite (for example an absent virtual network) fails only
//!   the checks that read it.
//! - Report order is deterministic for a given profile.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::document::ParametersDocument;
use crate::document::TemplateDocument;
use crate::document::non_null;
use crate::profile::PARAMETERS_FILE_KEYS;
use crate::profile::TEMPLATE_KEYS;
use crate::profile::TemplateProfile;
use crate::profile::TemplateVariant;
use crate::profile::VIRTUAL_NETWORK_TYPE;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Stable dotted identifier of a check (for example `template.resources.count`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(String);

impl CheckId {
    /// Creates a check identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The expectation holds.
    Pass,
    /// The expectation does not hold.
    Fail {
        /// Why the expectation failed.
        reason: String,
    },
}

impl CheckOutcome {
    /// Returns true for [`CheckOutcome::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Result of a single named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check identifier.
    pub id: CheckId,
    /// Human-readable expectation.
    pub description: String,
    /// Pass or fail with reason.
    pub outcome: CheckOutcome,
}

/// All check results for one template/parameters pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Profile the documents were checked against.
    pub variant: TemplateVariant,
    /// Results in evaluation order.
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    /// Returns true when every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.iter().all(|result| result.outcome.is_pass())
    }

    /// Returns the failed checks in evaluation order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|result| !result.outcome.is_pass())
    }

    /// Number of passed checks.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|result| result.outcome.is_pass()).count()
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// Looks up a result by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CheckResult> {
        self.results.iter().find(|result| result.id.as_str() == id)
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates every expectation of `variant` against the two documents.
#[must_use]
pub fn evaluate(
    variant: TemplateVariant,
    template: &TemplateDocument,
    parameters: &ParametersDocument,
) -> CheckReport {
    let profile = variant.profile();
    let mut checks = Collector::default();
    check_template_keys(&mut checks, template);
    check_parameter_names(&mut checks, profile, template);
    check_resources(&mut checks, profile, template);
    check_virtual_network(&mut checks, profile, template);
    check_outputs(&mut checks, profile, template);
    check_parameters_file(&mut checks, parameters);
    CheckReport {
        variant,
        results: checks.results,
    }
}

/// Accumulates results in evaluation order.
#[derive(Default)]
struct Collector {
    /// Results recorded so far.
    results: Vec<CheckResult>,
}

impl Collector {
    /// Records a check outcome.
    fn record(&mut self, id: String, description: String, outcome: Result<(), String>) {
        let outcome = match outcome {
            Ok(()) => CheckOutcome::Pass,
            Err(reason) => CheckOutcome::Fail {
                reason,
            },
        };
        self.results.push(CheckResult {
            id: CheckId::new(id),
            description,
            outcome,
        });
    }
}

/// Every top-level template key must be non-null.
fn check_template_keys(checks: &mut Collector, template: &TemplateDocument) {
    for key in TEMPLATE_KEYS {
        checks.record(
            format!("template.key.{key}"),
            format!("template defines {key}"),
            require(template.member(key).is_some(), || format!("{key} is missing or null")),
        );
    }
}

/// Parameter names must equal the profile's set exactly.
fn check_parameter_names(
    checks: &mut Collector,
    profile: &TemplateProfile,
    template: &TemplateDocument,
) {
    let description =
        format!("template declares exactly {} parameters", profile.parameters.len());
    let outcome = match template.member("parameters") {
        Some(Value::Object(_)) => {
            let expected: BTreeSet<&str> = profile.parameters.iter().copied().collect();
            let actual: BTreeSet<&str> = template.parameter_names().into_iter().collect();
            compare_name_sets(&expected, &actual)
        }
        _ => Err("parameters is missing or not an object".to_string()),
    };
    checks.record("template.parameters.names".to_string(), description, outcome);
}

/// Resource total and per-type counts must match exactly.
fn check_resources(checks: &mut Collector, profile: &TemplateProfile, template: &TemplateDocument) {
    let count_outcome = match template.member("resources") {
        Some(Value::Array(resources)) => require(resources.len() == profile.resource_count, || {
            format!("expected {} resources, found {}", profile.resource_count, resources.len())
        }),
        _ => Err("resources is missing or not an array".to_string()),
    };
    checks.record(
        "template.resources.count".to_string(),
        format!("template creates {} resources", profile.resource_count),
        count_outcome,
    );

    let types = template.resource_types();
    for expectation in profile.resources {
        let found = types.iter().filter(|kind| **kind == expectation.resource_type).count();
        checks.record(
            format!("template.resources.type.{}", expectation.resource_type),
            format!("template creates {} {}", expectation.count, expectation.resource_type),
            require(found == expectation.count, || {
                format!("expected {} {}, found {found}", expectation.count, expectation.resource_type)
            }),
        );
    }
}

/// Virtual network address space, subnet count, and subnet NSG assignment.
fn check_virtual_network(
    checks: &mut Collector,
    profile: &TemplateProfile,
    template: &TemplateDocument,
) {
    let network = template.find_resource(VIRTUAL_NETWORK_TYPE);
    let properties = network.and_then(|network| lookup(network, &["properties"]));
    let subnets = properties.and_then(|props| lookup(props, &["subnets"])).and_then(Value::as_array);

    let address_space = match (network, properties) {
        (None, _) => Err(missing_network()),
        (Some(_), props) => require(props.and_then(|p| lookup(p, &["addressSpace"])).is_some(), || {
            "virtual network properties.addressSpace is missing or null".to_string()
        }),
    };
    checks.record(
        "template.vnet.address_space".to_string(),
        "virtual network defines addressSpace".to_string(),
        address_space,
    );

    let subnet_count = match (network, subnets) {
        (None, _) => Err(missing_network()),
        (Some(_), None) => Err("virtual network properties.subnets is not an array".to_string()),
        (Some(_), Some(subnets)) => require(subnets.len() == profile.subnet_count, || {
            format!("expected {} subnets, found {}", profile.subnet_count, subnets.len())
        }),
    };
    checks.record(
        "template.vnet.subnet_count".to_string(),
        format!("virtual network defines {} subnets", profile.subnet_count),
        subnet_count,
    );

    let security_groups = match (network, subnets) {
        (None, _) => Err(missing_network()),
        (Some(_), None) => Err("virtual network properties.subnets is not an array".to_string()),
        (Some(_), Some(subnets)) => {
            let unassigned: Vec<String> = subnets
                .iter()
                .enumerate()
                .filter(|(_, subnet)| lookup(subnet, &["properties", "networkSecurityGroup"]).is_none())
                .map(|(index, subnet)| subnet_label(index, subnet))
                .collect();
            require(unassigned.is_empty(), || {
                format!("subnets without networkSecurityGroup: {}", unassigned.join(", "))
            })
        }
    };
    checks.record(
        "template.vnet.subnet_security_groups".to_string(),
        "each subnet has a network security group assigned".to_string(),
        security_groups,
    );
}

/// Each expected output and its `value` fields must be non-null.
fn check_outputs(checks: &mut Collector, profile: &TemplateProfile, template: &TemplateDocument) {
    for expectation in profile.outputs {
        let output = template.output(expectation.name);
        checks.record(
            format!("template.outputs.{}", expectation.name),
            format!("template defines output {}", expectation.name),
            require(output.is_some(), || format!("output {} is missing or null", expectation.name)),
        );
        for field in expectation.value_fields {
            let found = output.and_then(|output| lookup(output, &["value", *field]));
            checks.record(
                format!("template.outputs.{}.value.{field}", expectation.name),
                format!("output {} defines value.{field}", expectation.name),
                require(found.is_some(), || {
                    format!("outputs.{}.value.{field} is missing or null", expectation.name)
                }),
            );
        }
    }
}

/// Every top-level parameters-file key must be non-null.
fn check_parameters_file(checks: &mut Collector, parameters: &ParametersDocument) {
    for key in PARAMETERS_FILE_KEYS {
        checks.record(
            format!("parameters_file.key.{key}"),
            format!("parameters file defines {key}"),
            require(parameters.member(key).is_some(), || format!("{key} is missing or null")),
        );
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a condition into a check outcome.
fn require(condition: bool, reason: impl FnOnce() -> String) -> Result<(), String> {
    if condition { Ok(()) } else { Err(reason()) }
}

/// Walks object keys, returning the final value when every step is non-null.
fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| non_null(current.get(*key)))
}

/// Compares expected and actual name sets, describing any difference.
fn compare_name_sets(expected: &BTreeSet<&str>, actual: &BTreeSet<&str>) -> Result<(), String> {
    let missing: Vec<&str> = expected.difference(actual).copied().collect();
    let unexpected: Vec<&str> = actual.difference(expected).copied().collect();
    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing: {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        problems.push(format!("unexpected: {}", unexpected.join(", ")));
    }
    if problems.is_empty() { Ok(()) } else { Err(problems.join("; ")) }
}

/// Labels a subnet by name when it has one, else by position.
fn subnet_label(index: usize, subnet: &Value) -> String {
    subnet
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| format!("#{index}"), ToString::to_string)
}

/// Failure reason shared by all virtual network checks.
fn missing_network() -> String {
    format!("no {VIRTUAL_NETWORK_TYPE} resource found")
}
