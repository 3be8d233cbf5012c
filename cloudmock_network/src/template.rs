use crate::gateway::{VpnGateway, VpnGatewayRegistry};
use cloudmock_core::{BackendError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Construction from a declarative template, implemented per resource
/// variant. The tag identifies the resource kind in template documents;
/// `build` creates the resource in the given registry from the template's
/// properties block.
pub trait TemplateResource: Sized {
    const RESOURCE_TYPE: &'static str;

    fn build(registry: &mut VpnGatewayRegistry, properties: &Value) -> Result<Self>;
}

impl TemplateResource for VpnGateway {
    const RESOURCE_TYPE: &'static str = "AWS::EC2::VPNGateway";

    fn build(registry: &mut VpnGatewayRegistry, properties: &Value) -> Result<Self> {
        let gateway_type = properties
            .get("Type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BackendError::InvalidParameter("Type is required in template properties".to_string())
            })?;
        let asn = properties.get("AmazonSideAsn").and_then(Value::as_i64);

        Ok(registry
            .create(Some(gateway_type), asn, None, HashMap::new())
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_from_template() {
        let mut registry = VpnGatewayRegistry::new();
        let properties = json!({"Type": "ipsec.1", "AmazonSideAsn": 64512});

        let gateway = VpnGateway::build(&mut registry, &properties).unwrap();

        assert_eq!(VpnGateway::RESOURCE_TYPE, "AWS::EC2::VPNGateway");
        assert_eq!(gateway.gateway_type, "ipsec.1");
        assert_eq!(gateway.amazon_side_asn, Some(64512));
        // The gateway is registered, not just returned.
        assert!(registry.get(&gateway.id).is_ok());
    }

    #[test]
    fn test_build_requires_type() {
        let mut registry = VpnGatewayRegistry::new();
        let err = VpnGateway::build(&mut registry, &json!({})).unwrap_err();
        assert_eq!(err.error_code(), "InvalidParameterValue");
        assert!(registry.describe(&[], None).is_empty());
    }
}
