//! Aggregate Statistics
//!
//! Pure derivations over the current contribution and contributor lists.
//! Nothing here is cached; callers recompute on every change.
//!
//! Inclusion policy: a contribution counts toward totals unless its last
//! remote write failed (`RecordState::Errored`). Confirmed records and
//! records with a write still in flight both count.

use serde::Serialize;

use crate::domain::{Contribution, Contributor, DATE_FORMAT};
use crate::format::{format_percent, format_usd};

/// Share of the grand total each contributor is measured against
pub const TARGET_SHARE: f64 = 0.5;

/// Palette for cards and chart slices: purple, pink, green, amber, blue
pub const CHART_COLORS: [&str; 5] = ["#8B5CF6", "#EC4899", "#10B981", "#F59E0B", "#3B82F6"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total: f64,
    /// Percent of the grand total, 0 when nothing has been contributed
    pub percentage_share: f64,
    /// Signed distance from the 50% target amount
    pub diff_to_target: f64,
    /// Percent of the 50% target reached, clamped to [0, 100]
    pub progress_to_target: f64,
    /// What this contributor would need to add to match the largest total
    pub amount_to_match_top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorSummary {
    pub contributor: Contributor,
    pub stats: SummaryStats,
    pub color: &'static str,
}

/// One slice of the breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub contributor_id: String,
    pub name: String,
    pub value: f64,
    /// Fraction of the whole, in [0, 1]
    pub fraction: f64,
    pub color: &'static str,
}

pub fn counts_toward_totals(contribution: &Contribution) -> bool {
    !contribution.has_error()
}

pub fn grand_total(contributions: &[Contribution]) -> f64 {
    contributions
        .iter()
        .filter(|c| counts_toward_totals(c))
        .map(|c| c.amount_usd)
        .sum()
}

pub fn contributor_total(contributions: &[Contribution], contributor_id: &str) -> f64 {
    contributions
        .iter()
        .filter(|c| c.contributor_id == contributor_id && counts_toward_totals(c))
        .map(|c| c.amount_usd)
        .sum()
}

pub fn stats_for(total: f64, grand_total: f64, top_total: f64) -> SummaryStats {
    let target = grand_total * TARGET_SHARE;
    let percentage_share = if grand_total > 0.0 {
        total / grand_total * 100.0
    } else {
        0.0
    };
    let progress_to_target = if grand_total > 0.0 {
        (total / target * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };
    SummaryStats {
        total,
        percentage_share,
        diff_to_target: total - target,
        progress_to_target,
        amount_to_match_top: (top_total - total).max(0.0),
    }
}

/// Per-contributor summaries, in contributor order
pub fn summarize(contributors: &[Contributor], contributions: &[Contribution]) -> Vec<ContributorSummary> {
    let grand = grand_total(contributions);
    let totals: Vec<f64> = contributors
        .iter()
        .map(|c| contributor_total(contributions, &c.id))
        .collect();
    let top = totals.iter().copied().fold(0.0, f64::max);

    contributors
        .iter()
        .zip(totals)
        .enumerate()
        .map(|(index, (contributor, total))| ContributorSummary {
            contributor: contributor.clone(),
            stats: stats_for(total, grand, top),
            color: CHART_COLORS[index % CHART_COLORS.len()],
        })
        .collect()
}

/// Chart slices for contributors who have contributed something
pub fn chart_slices(summaries: &[ContributorSummary]) -> Vec<ChartSlice> {
    let whole: f64 = summaries.iter().map(|s| s.stats.total).sum();
    summaries
        .iter()
        .filter(|s| s.stats.total > 0.0)
        .map(|s| ChartSlice {
            contributor_id: s.contributor.id.clone(),
            name: s.contributor.name.clone(),
            value: s.stats.total,
            fraction: s.stats.total / whole,
            color: s.color,
        })
        .collect()
}

/// A contributor's counted contributions, newest first
pub fn contribution_history<'a>(contributions: &'a [Contribution], contributor_id: &str) -> Vec<&'a Contribution> {
    let mut history: Vec<&Contribution> = contributions
        .iter()
        .filter(|c| c.contributor_id == contributor_id && counts_toward_totals(c))
        .collect();
    history.sort_by(|a, b| b.contributed_at.cmp(&a.contributed_at));
    history
}

/// Hover text for a chart slice: the total and share, then the
/// contributor's individual contributions, newest first
pub fn chart_tooltip(slice: &ChartSlice, contributions: &[Contribution]) -> String {
    let mut lines = vec![
        slice.name.clone(),
        format!(
            "Total: {} ({})",
            format_usd(slice.value),
            format_percent(slice.fraction * 100.0, 2)
        ),
    ];
    let history = contribution_history(contributions, &slice.contributor_id);
    if !history.is_empty() {
        lines.push("Individual Contributions:".to_string());
        lines.extend(history.into_iter().map(|c| {
            let mut line = format!("{}: {}", c.contributed_at.format(DATE_FORMAT), format_usd(c.amount_usd));
            if let Some(comment) = c.comment.as_deref().filter(|s| !s.trim().is_empty()) {
                line.push_str(" - ");
                line.push_str(comment);
            }
            line
        }));
    }
    lines.join("\n")
}
