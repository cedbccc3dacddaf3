use crate::fixtures::{ChartKind, WorkflowScript};

/// Chart to render with an answer. Scripts that do not need a
/// visualization get none; an explicit chart in the script wins over
/// the phrasing heuristics.
pub fn select_chart(script: &WorkflowScript) -> Option<ChartKind> {
    if !script.need_visualization {
        return None;
    }
    if let Some(chart) = script.chart {
        return Some(chart);
    }

    let question = &script.question;
    let kind = if question.contains("Year Wise") {
        ChartKind::TrendLine
    } else if question.contains("Bottom 5") {
        ChartKind::BarHorizontalBottom5
    } else if question.contains("Top 5 stores") {
        ChartKind::BarVerticalTop5
    } else {
        ChartKind::Bar
    };
    Some(kind)
}
