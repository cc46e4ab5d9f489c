//! Best-effort geolocation of requester addresses for the activity ledger.

use std::net::IpAddr;
use std::time::Duration;

/// Looks up a coarse location ("City, Region, Country") for a public IP.
///
/// The endpoint is a URL template with an `{ip}` placeholder returning JSON,
/// e.g. `https://ipapi.co/{ip}/json/` or `http://ip-api.com/json/{ip}`.
pub struct GeoLocator {
    client: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl GeoLocator {
    pub fn new(client: reqwest::Client, url_template: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url_template: url_template.into(),
            timeout,
        }
    }

    /// Resolve `origin` to a location. Never fails: non-public addresses,
    /// network errors and unusable responses all yield `None`.
    pub async fn locate(&self, origin: &str) -> Option<String> {
        let ip = public_ip(origin)?;
        let url = self.url_template.replace("{ip}", &ip.to_string());

        let resp = match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(%ip, error = %e, "geolocation lookup failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::debug!(%ip, status = %resp.status(), "geolocation lookup rejected");
            return None;
        }

        let body: serde_json::Value = resp.json().await.ok()?;
        location_from_json(&body)
    }
}

/// Parse `origin` and keep it only if it is a routable public address.
pub fn public_ip(origin: &str) -> Option<IpAddr> {
    let ip: IpAddr = origin.trim().parse().ok()?;
    let public = match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            let unique_local = (first & 0xfe00) == 0xfc00;
            let link_local = (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    };
    public.then_some(ip)
}

/// Build "City, Region, Country" from the field names common geo-IP APIs use.
pub fn location_from_json(body: &serde_json::Value) -> Option<String> {
    let field = |names: &[&str]| {
        names
            .iter()
            .filter_map(|n| body[*n].as_str())
            .map(str::trim)
            .find(|s| !s.is_empty())
    };

    let parts: Vec<&str> = [
        field(&["city"]),
        field(&["region", "regionName"]),
        field(&["country_name", "country"]),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn private_and_loopback_are_skipped() {
        for origin in ["127.0.0.1", "10.1.2.3", "192.168.0.10", "172.16.5.4", "169.254.1.1", "::1", "fd00::1", "fe80::1", "0.0.0.0", "unknown", ""] {
            assert!(public_ip(origin).is_none(), "{origin} should not be looked up");
        }
    }

    #[test]
    fn public_addresses_are_kept() {
        assert_eq!(public_ip(" 8.8.8.8 "), Some("8.8.8.8".parse().unwrap()));
        assert!(public_ip("2001:4860:4860::8888").is_some());
    }

    #[test]
    fn location_from_ipapi_shape() {
        let body = json!({"ip": "8.8.8.8", "city": "Mountain View", "region": "California", "country_name": "United States"});
        assert_eq!(
            location_from_json(&body).as_deref(),
            Some("Mountain View, California, United States")
        );
    }

    #[test]
    fn location_from_ip_api_shape() {
        let body = json!({"status": "success", "city": "Bandung", "regionName": "West Java", "country": "Indonesia"});
        assert_eq!(
            location_from_json(&body).as_deref(),
            Some("Bandung, West Java, Indonesia")
        );
    }

    #[test]
    fn location_partial_or_empty() {
        assert_eq!(
            location_from_json(&json!({"city": "", "country": "Kenya"})).as_deref(),
            Some("Kenya")
        );
        assert!(location_from_json(&json!({"error": true, "reason": "Reserved IP Address"})).is_none());
    }
}
