//! Region targets for the remote secret service

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Which flavour of service a target speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KmsVariant {
    /// Shared regional KMS endpoint.
    #[default]
    Standard,
    /// Dedicated KMS instance reached through its own endpoint.
    Dedicated,
}

crate::impl_domain_enum_conversions!(KmsVariant {
    Standard => "standard",
    Dedicated => "dedicated",
});

/// One candidate endpoint for fetching secrets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionTarget {
    pub region_id: String,
    #[serde(default)]
    pub vpc: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub variant: KmsVariant,
}

impl RegionTarget {
    pub fn new(region_id: impl Into<String>) -> Self {
        Self { region_id: region_id.into(), vpc: false, endpoint: None, variant: KmsVariant::Standard }
    }

    /// Dedicated instance target; dedicated instances are always addressed
    /// through an explicit endpoint.
    pub fn dedicated(region_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            vpc: false,
            endpoint: Some(endpoint.into()),
            variant: KmsVariant::Dedicated,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_vpc(mut self, vpc: bool) -> Self {
        self.vpc = vpc;
        self
    }

    /// Host the target resolves to: explicit override, then VPC endpoint,
    /// then the public regional endpoint.
    pub fn resolved_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) if !endpoint.is_empty() => endpoint.clone(),
            _ if self.vpc => format!("kms-vpc.{}.aliyuncs.com", self.region_id),
            _ => format!("kms.{}.aliyuncs.com", self.region_id),
        }
    }
}

/// A region target annotated with the result of a reachability probe.
///
/// Only used while ordering targets at initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRegionTarget {
    pub target: RegionTarget,
    pub latency_ms: f64,
    pub reachable: bool,
}

impl RankedRegionTarget {
    pub fn reachable(target: RegionTarget, latency_ms: f64) -> Self {
        Self { target, latency_ms, reachable: true }
    }

    pub fn unreachable(target: RegionTarget) -> Self {
        Self { target, latency_ms: f64::MAX, reachable: false }
    }

    fn compare(&self, other: &Self) -> Ordering {
        other
            .reachable
            .cmp(&self.reachable)
            .then_with(|| self.latency_ms.total_cmp(&other.latency_ms))
    }

    /// Order by ascending latency with unreachable targets last. Ties keep
    /// their configured order.
    pub fn rank(mut ranked: Vec<Self>) -> Vec<RegionTarget> {
        ranked.sort_by(Self::compare);
        ranked.into_iter().map(|r| r.target).collect()
    }
}
