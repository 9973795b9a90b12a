//! HTTP beacon for usage events.

use cameko_core::analytics::{AnalyticsEvent, AnalyticsSink};
use std::time::Duration;

const BEACON_TIMEOUT: Duration = Duration::from_secs(2);

/// Posts each event as JSON to a fixed endpoint. Failures are dropped.
pub struct HttpBeacon {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpBeacon {
    pub fn new(endpoint: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(BEACON_TIMEOUT)
            .user_agent(concat!("cameko/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            endpoint: endpoint.to_string(),
            agent,
        }
    }
}

impl AnalyticsSink for HttpBeacon {
    fn send(&self, event: &AnalyticsEvent) {
        match self.agent.post(&self.endpoint).send_json(event) {
            Ok(response) => {
                tracing::debug!(
                    event = event.name(),
                    status = response.status(),
                    "analytics event sent"
                );
            }
            Err(err) => {
                tracing::debug!(event = event.name(), error = %err, "analytics beacon failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_endpoint_is_ignored() {
        // Port 9 on localhost: connection refused, well inside the timeout.
        let beacon = HttpBeacon::new("http://127.0.0.1:9/beacon");
        beacon.send(&AnalyticsEvent::Copy);
    }
}
