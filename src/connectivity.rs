//! Network availability check run before a fetch.
//!
//! There is no portable "is the device online" query, so the check asks the
//! question that matters for the request: can the API host be resolved right
//! now?

use std::time::Duration;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};
use url::{Host, Url};

/// Upper bound on the DNS probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// `true` when a network path to the host of `url` appears to be available.
#[instrument(level = "debug", skip_all, fields(host = ?url.host_str()))]
pub async fn is_network_available(url: &Url) -> bool {
    let domain = match url.host() {
        Some(Host::Domain(domain)) => domain,
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return true,
        None => return false,
    };
    let port = url.port_or_known_default().unwrap_or(443);

    match timeout(PROBE_TIMEOUT, lookup_host((domain, port))).await {
        Ok(Ok(mut addrs)) => {
            let found = addrs.next().is_some();
            debug!(found, "Resolved API host");
            found
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Could not resolve API host");
            false
        }
        Err(_) => {
            warn!(timeout = ?PROBE_TIMEOUT, "Timed out resolving API host");
            false
        }
    }
}
