/// Account id used when the embedding layer does not supply one.
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

/// Builds the fully qualified resource identifier for a dashboard.
/// Deterministic: same account and name always yield the same ARN.
pub fn dashboard_arn(account_id: &str, name: &str) -> String {
    format!("arn:aws:cloudwatch::{}:dashboard/{}", account_id, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_arn() {
        assert_eq!(
            dashboard_arn(DEFAULT_ACCOUNT_ID, "fleet-overview"),
            "arn:aws:cloudwatch::123456789012:dashboard/fleet-overview"
        );
    }
}
