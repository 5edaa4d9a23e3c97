// crates/armcheck-core/src/profile.rs
// ============================================================================
// Module: Template Profiles
// Description: Built-in expectations for the supported template families.
// Purpose: Describe, as static data, what each template variant must contain.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TemplateProfile`] is the fixed set of expectations for one template
//! family. Profiles are static tables; there is deliberately no way to define
//! new ones at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Resource Types
// ============================================================================

/// Virtual network resource type.
pub const VIRTUAL_NETWORK_TYPE: &str = "Microsoft.Network/virtualNetworks";
/// Network security group resource type.
pub const SECURITY_GROUP_TYPE: &str = "Microsoft.Network/networkSecurityGroups";
/// Container registry resource type.
pub const CONTAINER_REGISTRY_TYPE: &str = "Microsoft.ContainerRegistry/registries";
/// Managed cluster resource type.
pub const MANAGED_CLUSTER_TYPE: &str = "Microsoft.ContainerService/managedClusters";

/// Top-level keys every template must define.
pub const TEMPLATE_KEYS: &[&str] =
    &["$schema", "contentVersion", "parameters", "variables", "resources", "outputs"];
/// Top-level keys every parameters file must define.
pub const PARAMETERS_FILE_KEYS: &[&str] = &["$schema", "contentVersion", "parameters"];

// ============================================================================
// SECTION: Expectation Types
// ============================================================================

/// Exact number of resources of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceExpectation {
    /// ARM resource type string.
    pub resource_type: &'static str,
    /// Required number of resources of that type.
    pub count: usize,
}

/// An output entry and the fields required under its `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputExpectation {
    /// Output name.
    pub name: &'static str,
    /// Fields that must be non-null under `outputs.<name>.value`.
    pub value_fields: &'static [&'static str],
}

/// Static expectations for one template family.
///
/// # Invariants
/// - `parameters` has no duplicates.
/// - `subnet_count` applies to the first virtual network resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateProfile {
    /// Exact set of template parameter names.
    pub parameters: &'static [&'static str],
    /// Exact total number of resources.
    pub resource_count: usize,
    /// Exact per-type resource counts.
    pub resources: &'static [ResourceExpectation],
    /// Exact number of subnets on the virtual network.
    pub subnet_count: usize,
    /// Required outputs.
    pub outputs: &'static [OutputExpectation],
}

// ============================================================================
// SECTION: Built-in Profiles
// ============================================================================

/// Network parameters shared by both families.
const NETWORK_PARAMETERS: &[&str] = &["prefix", "vnetPrefix", "subnet1Prefix", "subnet2Prefix"];

/// AKS parameters: the network set plus cluster and identity settings.
const AKS_PARAMETERS: &[&str] = &[
    "prefix",
    "vnetPrefix",
    "subnet1Prefix",
    "subnet2Prefix",
    "kubernetesVersion",
    "dnsPrefix",
    "agentCount",
    "agentVMSize",
    "servicePrincipalClientId",
    "servicePrincipalClientSecret",
    "sshRSAPublicKey",
];

/// Network resources shared by both families.
const NETWORK_RESOURCES: &[ResourceExpectation] = &[
    ResourceExpectation {
        resource_type: VIRTUAL_NETWORK_TYPE,
        count: 1,
    },
    ResourceExpectation {
        resource_type: SECURITY_GROUP_TYPE,
        count: 2,
    },
];

/// AKS resources.
const AKS_RESOURCES: &[ResourceExpectation] = &[
    ResourceExpectation {
        resource_type: VIRTUAL_NETWORK_TYPE,
        count: 1,
    },
    ResourceExpectation {
        resource_type: SECURITY_GROUP_TYPE,
        count: 2,
    },
    ResourceExpectation {
        resource_type: CONTAINER_REGISTRY_TYPE,
        count: 1,
    },
    ResourceExpectation {
        resource_type: MANAGED_CLUSTER_TYPE,
        count: 1,
    },
];

/// Network outputs shared by both families.
const NETWORK_OUTPUTS: &[OutputExpectation] = &[
    OutputExpectation {
        name: "virtualNetwork",
        value_fields: &["id", "name"],
    },
    OutputExpectation {
        name: "subnets",
        value_fields: &["subnet1Id", "subnet2Id"],
    },
    OutputExpectation {
        name: "securityGroups",
        value_fields: &["nsg1Id", "nsg2Id"],
    },
];

/// AKS outputs.
const AKS_OUTPUTS: &[OutputExpectation] = &[
    OutputExpectation {
        name: "virtualNetwork",
        value_fields: &["id", "name"],
    },
    OutputExpectation {
        name: "subnets",
        value_fields: &["subnet1Id", "subnet2Id"],
    },
    OutputExpectation {
        name: "securityGroups",
        value_fields: &["nsg1Id", "nsg2Id"],
    },
    OutputExpectation {
        name: "containerRegistry",
        value_fields: &["id", "name"],
    },
    OutputExpectation {
        name: "controlPlane",
        value_fields: &["fqdn"],
    },
];

/// Network topology profile.
const NETWORK_PROFILE: TemplateProfile = TemplateProfile {
    parameters: NETWORK_PARAMETERS,
    resource_count: 3,
    resources: NETWORK_RESOURCES,
    subnet_count: 2,
    outputs: NETWORK_OUTPUTS,
};

/// Managed cluster profile.
const AKS_PROFILE: TemplateProfile = TemplateProfile {
    parameters: AKS_PARAMETERS,
    resource_count: 5,
    resources: AKS_RESOURCES,
    subnet_count: 2,
    outputs: AKS_OUTPUTS,
};

// ============================================================================
// SECTION: Variant
// ============================================================================

/// Supported template families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    /// Virtual network, two subnets, two NSGs.
    #[default]
    Network,
    /// Network resources plus container registry and managed cluster.
    Aks,
}

impl TemplateVariant {
    /// All supported variants in stable order.
    pub const ALL: [Self; 2] = [Self::Network, Self::Aks];

    /// Returns the stable label for the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Aks => "aks",
        }
    }

    /// Returns the built-in profile for the variant.
    #[must_use]
    pub const fn profile(self) -> &'static TemplateProfile {
        match self {
            Self::Network => &NETWORK_PROFILE,
            Self::Aks => &AKS_PROFILE,
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "network" => Ok(Self::Network),
            "aks" => Ok(Self::Aks),
            other => Err(format!("unknown template variant: {other}")),
        }
    }
}
