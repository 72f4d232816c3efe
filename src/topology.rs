// Deployment topologies and the provider lookup tables.

use serde::Serialize;

/// Hosting topology a benchmark run was executed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Plain virtual machines.
    Instance,
    /// Managed container-orchestration clusters.
    Cluster,
    /// Serverless / scale-to-zero platforms.
    Serverless,
}

/// (identifier, cloud name, category label)
type ProviderEntry = (&'static str, &'static str, &'static str);

const INSTANCE_PROVIDERS: &[ProviderEntry] = &[
    ("aws", "AWS", "VM"),
    ("gcp", "GCP", "VM"),
    ("azure", "AZURE", "VM"),
];

const CLUSTER_PROVIDERS: &[ProviderEntry] = &[
    ("aws-eks", "AWS", "EKS"),
    ("gcp-gke", "GCP", "GKE"),
    ("azure-aks", "Azure", "AKS"),
];

const SERVERLESS_PROVIDERS: &[ProviderEntry] = &[
    ("aws-lambda", "AWS", "Lambda"),
    ("gcp-cloudrun", "GCP", "Cloud Run"),
    ("azure-container-apps", "Azure", "Container Apps"),
];

impl Topology {
    pub const ALL: [Topology; 3] = [Topology::Instance, Topology::Cluster, Topology::Serverless];

    fn providers(self) -> &'static [ProviderEntry] {
        match self {
            Topology::Instance => INSTANCE_PROVIDERS,
            Topology::Cluster => CLUSTER_PROVIDERS,
            Topology::Serverless => SERVERLESS_PROVIDERS,
        }
    }

    /// Category label used for identifiers missing from the lookup table.
    pub fn generic_label(self) -> &'static str {
        match self {
            Topology::Instance => "VM",
            Topology::Cluster => "K8s",
            Topology::Serverless => "Serverless",
        }
    }

    /// Topology whose lookup table knows `identifier`.
    pub fn for_provider(identifier: &str) -> Option<Topology> {
        Self::ALL
            .into_iter()
            .find(|t| t.providers().iter().any(|(id, _, _)| *id == identifier))
    }

    /// Every identifier across all lookup tables, in table order.
    pub fn known_providers() -> Vec<&'static str> {
        Self::ALL
            .into_iter()
            .flat_map(|t| t.providers().iter().map(|(id, _, _)| *id))
            .collect()
    }

    /// Resolve `identifier` to a cloud/category pair. Unknown identifiers fall back to
    /// (uppercased identifier, generic label).
    pub fn identity(self, identifier: &str) -> DeploymentIdentity {
        match self.providers().iter().find(|(id, _, _)| *id == identifier) {
            Some((_, cloud, category)) => DeploymentIdentity {
                cloud: (*cloud).to_string(),
                category: (*category).to_string(),
            },
            None => DeploymentIdentity {
                cloud: identifier.to_uppercase(),
                category: self.generic_label().to_string(),
            },
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Topology::Instance => "instance",
            Topology::Cluster => "cluster",
            Topology::Serverless => "serverless",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentIdentity {
    pub cloud: String,
    pub category: String,
}
