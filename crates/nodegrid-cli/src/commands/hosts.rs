//! `nodegrid hosts` — show what a hostfile or dash-host list contributes.

use std::path::Path;

use anyhow::bail;
use nodegrid_core::Node;
use nodegrid_discovery::{Discovery, dash_host, hostfile};
use serde::Serialize;

use super::render::format_nodes;

#[derive(Debug, Serialize)]
struct HostsReport {
    oversubscribe_hint: Option<bool>,
    nodes: Vec<Node>,
}

pub fn hosts(path: Option<&Path>, dash_hosts: &[String], format: &str) -> anyhow::Result<()> {
    let report = parse(path, dash_hosts)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            print!("{}", format_nodes(&report.nodes));
            if report.oversubscribe_hint == Some(true) {
                println!("\nslot counts incomplete: oversubscription would be allowed");
            }
        }
    }
    Ok(())
}

fn parse(path: Option<&Path>, dash_hosts: &[String]) -> anyhow::Result<HostsReport> {
    let discovery: Discovery = match path {
        Some(path) => hostfile::parse_hostfile(path)?,
        None if !dash_hosts.is_empty() => dash_host::parse_dash_host(dash_hosts)?,
        None => bail!("give a hostfile path or at least one --dash-host list"),
    };

    Ok(HostsReport {
        oversubscribe_hint: discovery.oversubscribe_hint,
        nodes: discovery.nodes.into_nodes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hostfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "a slots=2\nb slots=2\n").unwrap();

        let report = parse(Some(path.as_path()), &[]).unwrap();
        assert_eq!(report.nodes.len(), 2);
        assert_eq!(report.oversubscribe_hint, Some(false));
    }

    #[test]
    fn parses_dash_host() {
        let report = parse(None, &["x,y:3".to_string()]).unwrap();
        assert_eq!(report.nodes[1].slots, 3);
        assert_eq!(report.oversubscribe_hint, Some(true));
    }

    #[test]
    fn requires_some_input() {
        assert!(parse(None, &[]).is_err());
    }
}
