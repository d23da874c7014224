//! Human-readable and JSON output.

use nodegrid_core::Node;
use nodegrid_registry::PoolSnapshot;
use serde::Serialize;

/// Outcome of `nodegrid allocate`.
#[derive(Debug, Serialize)]
pub struct AllocationReport {
    pub job: String,
    pub source: Option<&'static str>,
    pub oversubscribe_override: bool,
    pub pool: PoolSnapshot,
}

pub fn format_report(report: &AllocationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Job:            {}\n", report.job));
    out.push_str(&format!("Source:         {}\n", report.source.unwrap_or("-")));
    out.push_str(&format!(
        "Oversubscribe:  {}\n",
        if report.oversubscribe_override { "override" } else { "enforce limits" }
    ));
    out.push_str(&format!(
        "Pool:           {} nodes, {} slots\n\n",
        report.pool.nodes.len(),
        report.pool.total_slots
    ));
    out.push_str(&format_nodes(&report.pool.nodes));

    out
}

pub fn format_nodes(nodes: &[Node]) -> String {
    let width = nodes
        .iter()
        .map(|n| n.name.len())
        .max()
        .unwrap_or(0)
        .max("NODE".len());

    let mut out = String::new();
    out.push_str(&format!("  {:<width$}  {:<7}  {:>5}  {:>9}\n", "NODE", "STATE", "SLOTS", "MAX_SLOTS"));
    for node in nodes {
        let max = if node.is_bounded() {
            node.slots_max.to_string()
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "  {:<width$}  {:<7}  {:>5}  {:>9}\n",
            node.name,
            node.state.label(),
            node.slots,
            max
        ));
    }
    out
}
