//! Compiled-in registry of backend services and the endpoints they own.
//!
//! Every endpoint name belongs to exactly one service. Resolution tries an
//! exact match first, then a prefix match with a `/` separator so dynamic
//! path segments (`metadata/get/123`) route through their registered base
//! endpoint (`metadata/get`).

use super::error::{ClientError, ClientResult};
use std::collections::HashMap;

/// Backend services the client can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Dataset and metadata management service.
    AskmeManager,
    /// Analytics engine service.
    AiEngine,
}

impl Service {
    /// All registered services.
    pub const ALL: [Service; 2] = [Service::AskmeManager, Service::AiEngine];

    /// Wire name of the service.
    pub fn name(&self) -> &'static str {
        match self {
            Service::AskmeManager => "askme-manager",
            Service::AiEngine => "ai-engine",
        }
    }

    /// URL path prefix under the server base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Service::AskmeManager => "api/askme-manager",
            Service::AiEngine => "api/ai-engine/mcp",
        }
    }

    /// Endpoint names served by this service.
    pub fn endpoints(&self) -> &'static [&'static str] {
        match self {
            Service::AskmeManager => &["get-domain", "metadata/get"],
            Service::AiEngine => &[
                "get-outlier-data",
                "get-trend-data",
                "get-prediction-data",
                "get-correlation-data",
                "get-change-data",
                "get-pareto-data",
                "nlq-to-data",
            ],
        }
    }
}

/// Resolve the service owning `endpoint_name`.
///
/// Exact match wins; otherwise an endpoint with a trailing dynamic segment
/// (`{registered}/...`) resolves to the owner of its registered base.
pub fn service_for_endpoint(endpoint_name: &str) -> ClientResult<Service> {
    for service in Service::ALL {
        if service.endpoints().contains(&endpoint_name) {
            return Ok(service);
        }
    }

    for service in Service::ALL {
        for registered in service.endpoints() {
            if endpoint_name.starts_with(&format!("{registered}/")) {
                return Ok(service);
            }
        }
    }

    Err(ClientError::validation(format!(
        "Unknown endpoint name: {endpoint_name}"
    )))
}

/// Build the full URL for an endpoint under `base_url`.
pub fn build_url(base_url: &str, endpoint_name: &str) -> ClientResult<String> {
    let service = service_for_endpoint(endpoint_name)?;
    Ok(format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        service.path(),
        endpoint_name
    ))
}

/// All supported endpoints grouped by service name.
pub fn supported_endpoints() -> HashMap<&'static str, Vec<&'static str>> {
    Service::ALL
        .iter()
        .map(|s| (s.name(), s.endpoints().to_vec()))
        .collect()
}

/// Whether `endpoint_name` is registered (exact match only).
pub fn is_endpoint_supported(endpoint_name: &str) -> bool {
    Service::ALL
        .iter()
        .any(|s| s.endpoints().contains(&endpoint_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_endpoint_resolves_to_its_service() {
        for service in Service::ALL {
            for endpoint in service.endpoints() {
                assert_eq!(service_for_endpoint(endpoint).unwrap(), service);
            }
        }
    }

    #[test]
    fn test_no_endpoint_in_two_services() {
        let mut seen = std::collections::HashSet::new();
        for service in Service::ALL {
            for endpoint in service.endpoints() {
                assert!(seen.insert(*endpoint), "duplicate endpoint: {endpoint}");
            }
        }
    }

    #[test]
    fn test_prefix_match_with_separator() {
        assert_eq!(
            service_for_endpoint("metadata/get/777").unwrap(),
            service_for_endpoint("metadata/get").unwrap()
        );
    }

    #[test]
    fn test_no_spurious_prefix_match() {
        assert!(service_for_endpoint("metadata/getx").is_err());
        assert!(service_for_endpoint("get-trend-datax").is_err());
    }

    #[test]
    fn test_unknown_endpoint_fails() {
        let err = service_for_endpoint("bogus-endpoint").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("https://x.test", "get-domain").unwrap(),
            "https://x.test/api/askme-manager/get-domain"
        );
        assert_eq!(
            build_url("https://x.test/", "get-trend-data").unwrap(),
            "https://x.test/api/ai-engine/mcp/get-trend-data"
        );
    }

    #[test]
    fn test_supported_endpoints_grouping() {
        let map = supported_endpoints();
        assert_eq!(map.len(), 2);
        assert!(map["askme-manager"].contains(&"metadata/get"));
        assert!(map["ai-engine"].contains(&"nlq-to-data"));
    }

    #[test]
    fn test_is_endpoint_supported_exact_only() {
        assert!(is_endpoint_supported("get-domain"));
        assert!(!is_endpoint_supported("metadata/get/123"));
        assert!(!is_endpoint_supported("bogus"));
    }
}
