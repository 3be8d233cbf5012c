use std::collections::HashMap;
use std::sync::Mutex;

/// Region names backends are partitioned by when no explicit list is given.
/// Covers the commercial, GovCloud and China partitions the emulated
/// service is available in.
pub const DEFAULT_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "eu-south-1",
    "me-south-1",
    "sa-east-1",
    "us-gov-east-1",
    "us-gov-west-1",
    "cn-north-1",
    "cn-northwest-1",
];

/// One backend instance per account/region partition, constructed once at
/// process start and handed to request handlers by reference. The per-entry
/// mutex gives each partition the single-writer-at-a-time discipline the
/// backends assume; partitions never share state.
pub struct PartitionMap<B> {
    backends: HashMap<String, Mutex<B>>,
}

impl<B: Default> PartitionMap<B> {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backends = regions
            .into_iter()
            .map(|region| (region.into(), Mutex::new(B::default())))
            .collect();
        Self { backends }
    }

    pub fn with_default_regions() -> Self {
        Self::new(DEFAULT_REGIONS.iter().copied())
    }
}

impl<B> PartitionMap<B> {
    /// Unknown regions yield `None`; backends are never created on demand.
    pub fn get(&self, region: &str) -> Option<&Mutex<B>> {
        self.backends.get(region)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_are_isolated() {
        let partitions: PartitionMap<Vec<u32>> = PartitionMap::new(["us-east-1", "eu-west-1"]);

        partitions
            .get("us-east-1")
            .unwrap()
            .lock()
            .unwrap()
            .push(7);

        assert_eq!(partitions.get("us-east-1").unwrap().lock().unwrap().len(), 1);
        assert_eq!(partitions.get("eu-west-1").unwrap().lock().unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_region() {
        let partitions: PartitionMap<Vec<u32>> = PartitionMap::new(["us-east-1"]);
        assert!(partitions.get("mars-north-1").is_none());
    }

    #[test]
    fn test_default_regions_cover_partitions() {
        let partitions: PartitionMap<Vec<u32>> = PartitionMap::with_default_regions();
        assert_eq!(partitions.len(), DEFAULT_REGIONS.len());
        assert!(partitions.get("us-gov-west-1").is_some());
        assert!(partitions.get("cn-north-1").is_some());
    }
}
