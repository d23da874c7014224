//! Dash-host parser.
//!
//! Inline host lists given alongside an application, e.g.
//! `node01,node02:4, node03`. A bare host contributes one slot; `host:N`
//! contributes `N`. Repeats add up, as in a hostfile.

use nodegrid_core::AppContext;
use tracing::debug;

use crate::error::{DiscoverResult, DiscoveryError};
use crate::hostfile::HostTally;
use crate::result::Discovery;

/// Parse every dash-host entry of one application.
pub fn parse_dash_host(specs: &[String]) -> DiscoverResult<Discovery> {
    let mut tally = HostTally::new();

    for item in specs.iter().flat_map(|s| s.split(',')) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let err = |reason: &str| DiscoveryError::DashHost {
            item: item.to_string(),
            reason: reason.to_string(),
        };

        let (host, slots) = match item.rsplit_once(':') {
            Some((host, count)) => {
                let count: u32 = count.trim().parse().map_err(|_| err("slot count is not a number"))?;
                if count == 0 {
                    return Err(err("slot count must be at least 1"));
                }
                (host.trim(), Some(count))
            }
            None => (item, None),
        };
        if host.is_empty() {
            return Err(err("missing host name"));
        }

        tally.add(host, slots, None).map_err(|reason| err(&reason))?;
    }

    Ok(tally.finish())
}

/// Parse the dash-host entries of `app`, if any.
pub fn parse_app_dash_host(app: &AppContext) -> DiscoverResult<Discovery> {
    let discovery = parse_dash_host(&app.dash_host)?;
    debug!(
        app = %app.name,
        nodes = discovery.nodes.len(),
        oversubscribe = ?discovery.oversubscribe_hint,
        "parsed dash-host"
    );
    Ok(discovery)
}
