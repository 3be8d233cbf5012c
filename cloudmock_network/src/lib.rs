pub mod gateway;
pub mod template;

pub use gateway::{
    AttachmentState, Filter, GatewayState, VpcAttachment, VpcLookup, VpnGateway,
    VpnGatewayRegistry,
};
pub use template::TemplateResource;
