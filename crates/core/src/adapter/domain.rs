//! Hostname normalization for adapter matching.

/// Normalize a hostname for comparison: trim, lowercase, strip one leading
/// `www.` label.
pub fn normalize(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Reduce a normalized hostname to its registrable base: the last two
/// labels (`cdn.example.com` -> `example.com`). Hosts with fewer than two
/// labels are returned unchanged.
pub fn base_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }
    labels[labels.len() - 2..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Example.COM "), "example.com");
    }

    #[test]
    fn test_normalize_strips_single_www() {
        assert_eq!(normalize("www.example.com"), "example.com");
        // Only one leading www label is stripped.
        assert_eq!(normalize("www.www.example.com"), "www.example.com");
    }

    #[test]
    fn test_base_domain_reduces_subdomains() {
        assert_eq!(base_domain("cdn.assets.example.com"), "example.com");
        assert_eq!(base_domain("cdn.example.com"), "example.com");
    }

    #[test]
    fn test_base_domain_keeps_two_labels() {
        assert_eq!(base_domain("example.com"), "example.com");
    }

    #[test]
    fn test_base_domain_single_label() {
        assert_eq!(base_domain("localhost"), "localhost");
    }

    #[test]
    fn test_base_domain_ignores_empty_labels() {
        assert_eq!(base_domain("example.com."), "example.com");
    }
}
