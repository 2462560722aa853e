use serde::Serialize;

use crate::models::{Direction, HistoryPoint, Metric, MetricStatus};

/// Changes smaller than this many percent are not shown as a trend.
pub const MIN_VISIBLE_CHANGE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub percent_change: f64,
    pub is_improving: bool,
}

impl Trend {
    pub fn text(&self) -> String {
        let arrow = if self.percent_change > 0.0 { "▲" } else { "▼" };
        format!("{} {:.1}%", arrow, self.percent_change.abs())
    }
}

pub fn compute_trend(history: &[HistoryPoint], direction: Direction) -> Option<Trend> {
    let [.., previous, latest] = history else {
        return None;
    };

    if previous.value == 0.0 {
        return None;
    }

    let percent_change = (latest.value - previous.value) / previous.value * 100.0;
    if !percent_change.is_finite() || percent_change.abs() < MIN_VISIBLE_CHANGE {
        return None;
    }

    let is_improving = match direction {
        Direction::LowerIsBetter => percent_change < 0.0,
        Direction::HigherIsBetter => percent_change > 0.0,
    };

    Some(Trend {
        percent_change,
        is_improving,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricTrend {
    pub metric_id: String,
    pub text: String,
    pub trend: Trend,
    pub status: MetricStatus,
}

impl MetricTrend {
    /// A trend is highlighted when it is worsening or the metric already
    /// needs a consult, whatever the direction.
    pub fn needs_attention(&self) -> bool {
        self.status == MetricStatus::Consult || !self.trend.is_improving
    }
}

pub fn metric_trend(metric: &Metric) -> Option<MetricTrend> {
    let trend = compute_trend(&metric.history, metric.direction)?;
    Some(MetricTrend {
        metric_id: metric.id.clone(),
        text: trend.text(),
        trend,
        status: metric.status,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendTally {
    pub improving: usize,
    pub stable: usize,
    pub worsening: usize,
}

pub fn tally_trends(metrics: &[Metric]) -> TrendTally {
    let mut tally = TrendTally::default();

    for metric in metrics.iter().filter(|m| m.history.len() >= 2) {
        match compute_trend(&metric.history, metric.direction) {
            Some(trend) if trend.is_improving => tally.improving += 1,
            Some(_) => tally.worsening += 1,
            None => tally.stable += 1,
        }
    }

    tally
}
