use cloudmock_core::{BackendError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayState {
    Available,
    Deleted,
}

impl GatewayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentState {
    Attached,
    Detached,
}

impl AttachmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcAttachment {
    pub vpc_id: String,
    pub gateway_id: String,
    pub state: AttachmentState,
}

/// A describe-call filter: matches a gateway when any of `values` equals
/// any of the gateway's values for `name`. Multiple filters AND together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpnGateway {
    pub id: String,
    pub gateway_type: String,
    pub amazon_side_asn: Option<i64>,
    pub availability_zone: Option<String>,
    pub state: GatewayState,
    pub tags: HashMap<String, String>,
    /// Keyed by vpc id, in attachment order. Detached entries stay.
    pub attachments: Vec<VpcAttachment>,
}

impl VpnGateway {
    pub fn attachment(&self, vpc_id: &str) -> Option<&VpcAttachment> {
        self.attachments.iter().find(|a| a.vpc_id == vpc_id)
    }

    fn filter_values(&self, key: &str) -> Vec<String> {
        match key {
            "attachment.vpc-id" => self.attachments.iter().map(|a| a.vpc_id.clone()).collect(),
            "attachment.state" => self
                .attachments
                .iter()
                .map(|a| a.state.as_str().to_string())
                .collect(),
            "vpn-gateway-id" => vec![self.id.clone()],
            "type" => vec![self.gateway_type.clone()],
            "tag-key" => self.tags.keys().cloned().collect(),
            _ => {
                if let Some(tag_key) = key.strip_prefix("tag:") {
                    self.tags.get(tag_key).cloned().into_iter().collect()
                } else {
                    warn!(filter = key, "unsupported describe filter");
                    Vec::new()
                }
            }
        }
    }

    fn passes(&self, filters: &[Filter]) -> bool {
        filters.iter().all(|f| {
            let values = self.filter_values(&f.name);
            f.values.iter().any(|wanted| values.contains(wanted))
        })
    }
}

/// Resolves whether a VPC exists. The VPC resource model lives outside
/// this crate; attach calls validate against it.
pub trait VpcLookup {
    fn vpc_exists(&self, vpc_id: &str) -> bool;
}

fn random_gateway_id() -> String {
    format!("vgw-{:08x}", rand::thread_rng().gen::<u32>())
}

/// Gateways keyed by id, in creation order. Delete and detach mark records
/// in place rather than removing them.
#[derive(Debug, Default)]
pub struct VpnGatewayRegistry {
    gateways: Vec<VpnGateway>,
}

impl VpnGatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        gateway_type: Option<&str>,
        amazon_side_asn: Option<i64>,
        availability_zone: Option<&str>,
        tags: HashMap<String, String>,
    ) -> &VpnGateway {
        let id = random_gateway_id();
        info!(gateway = %id, "creating vpn gateway");
        self.gateways.push(VpnGateway {
            id,
            gateway_type: gateway_type.unwrap_or("ipsec.1").to_string(),
            amazon_side_asn,
            availability_zone: availability_zone.map(str::to_string),
            state: GatewayState::Available,
            tags,
            attachments: Vec::new(),
        });
        &self.gateways[self.gateways.len() - 1]
    }

    pub fn get(&self, gateway_id: &str) -> Result<&VpnGateway> {
        self.gateways
            .iter()
            .find(|g| g.id == gateway_id)
            .ok_or_else(|| not_found(gateway_id))
    }

    fn get_mut(&mut self, gateway_id: &str) -> Result<&mut VpnGateway> {
        self.gateways
            .iter_mut()
            .find(|g| g.id == gateway_id)
            .ok_or_else(|| not_found(gateway_id))
    }

    /// Id filter first, then attribute/tag filters.
    pub fn describe(&self, filters: &[Filter], ids: Option<&[String]>) -> Vec<&VpnGateway> {
        self.gateways
            .iter()
            .filter(|g| ids.map_or(true, |ids| ids.contains(&g.id)))
            .filter(|g| g.passes(filters))
            .collect()
    }

    /// Attaching a VPC supersedes any previous VPC attachment: prior
    /// entries whose key denotes a VPC are dropped, not just detached.
    pub fn attach(
        &mut self,
        gateway_id: &str,
        vpc_id: &str,
        vpcs: &dyn VpcLookup,
    ) -> Result<&VpcAttachment> {
        let gateway = self.get_mut(gateway_id)?;
        if !vpcs.vpc_exists(vpc_id) {
            return Err(BackendError::NotFound(format!(
                "VpcID {} does not exist",
                vpc_id
            )));
        }

        gateway.attachments.retain(|a| !a.vpc_id.starts_with("vpc-"));
        info!(gateway = gateway_id, vpc = vpc_id, "attaching vpn gateway");
        gateway.attachments.push(VpcAttachment {
            vpc_id: vpc_id.to_string(),
            gateway_id: gateway_id.to_string(),
            state: AttachmentState::Attached,
        });
        Ok(&gateway.attachments[gateway.attachments.len() - 1])
    }

    pub fn detach(&mut self, gateway_id: &str, vpc_id: &str) -> Result<&VpcAttachment> {
        let gateway = self.get_mut(gateway_id)?;
        let attachment = gateway
            .attachments
            .iter_mut()
            .find(|a| a.vpc_id == vpc_id)
            .ok_or_else(|| BackendError::InvalidAttachment {
                gateway_id: gateway_id.to_string(),
                vpc_id: vpc_id.to_string(),
            })?;

        info!(gateway = gateway_id, vpc = vpc_id, "detaching vpn gateway");
        attachment.state = AttachmentState::Detached;
        Ok(attachment)
    }

    /// The record is retained in `deleted` state so describe still sees it.
    pub fn delete(&mut self, gateway_id: &str) -> Result<&VpnGateway> {
        let gateway = self.get_mut(gateway_id)?;
        info!(gateway = gateway_id, "deleting vpn gateway");
        gateway.state = GatewayState::Deleted;
        Ok(gateway)
    }
}

fn not_found(gateway_id: &str) -> BackendError {
    BackendError::NotFound(format!("VpnGatewayID {} does not exist", gateway_id))
}
