pub mod arn;
pub mod error;
pub mod pagination;
pub mod partition;
pub mod time;

pub use error::{BackendError, Result};
pub use pagination::{Page, Paginator, PAGE_SIZE};
pub use partition::PartitionMap;
