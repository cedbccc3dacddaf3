use console::style;

use crate::chat::{AgentReply, ChatSession};
use crate::execution::{AgentStatus, ExecutionState, ExecutionStep, StepStatus};
use crate::fixtures::CuratedQuestion;
use crate::graph::{EdgeStatus, VisualGraph};
use crate::intent::MatchKind;
use crate::repl::commands::{CommandHelp, COMMAND_HELP};
use crate::sequencer::{ThinkingStatus, ThinkingStep};
use crate::utils::formatting::{format_duration, one_line};

const DETAIL_WIDTH: usize = 96;

/// Render the thinking steps of a turn, numbered, with timings.
pub fn render_steps(steps: &[ThinkingStep]) -> String {
    if steps.is_empty() {
        return format!("  {}\n", style("No steps.").dim());
    }

    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        let (icon, label) = match step.status {
            ThinkingStatus::Completed => (style("✓").green(), style(&step.label).green()),
            ThinkingStatus::Active => (style("⏳").yellow(), style(&step.label).yellow()),
            ThinkingStatus::Pending => (style("·").dim(), style(&step.label).dim()),
        };
        let took = step
            .duration_ms
            .map(|ms| format!(" ({})", format_duration(ms)))
            .unwrap_or_default();
        out.push_str(&format!("  {:>2}. {} {}{}\n", i + 1, icon, label, style(took).dim()));
        if let Some(detail) = &step.detail {
            out.push_str(&format!("      {}\n", style(one_line(detail, DETAIL_WIDTH)).dim()));
        }
    }
    out
}

/// Render an agent reply: answer, chart hint and follow-up suggestions.
pub fn render_reply(reply: &AgentReply) -> String {
    let mut out = String::new();
    if !reply.complete {
        out.push_str(&format!(
            "\n  {} {}\n",
            style("⚠").yellow().bold(),
            style("Stopped before the answer was ready.").yellow(),
        ));
        return out;
    }

    out.push_str(&format!("\n{}\n", reply.content));
    if let Some(chart) = reply.chart {
        out.push_str(&format!("\n  {} {}\n", style("Chart:").dim(), style(chart.description()).cyan()));
    }
    if let Some(sql) = &reply.sql {
        out.push_str(&format!("  {} {}\n", style("SQL:").dim(), style(one_line(sql, DETAIL_WIDTH)).dim()));
    }
    if !reply.follow_ups.is_empty() {
        out.push_str(&format!("\n  {}\n", style("You could also ask:").white().bold()));
        for q in &reply.follow_ups {
            out.push_str(&format!("    {} {}\n", style("›").cyan(), q));
        }
    }
    out
}

/// Render the outcome of matching a query against the catalog.
pub fn render_match(query: &str, found: Option<(&str, MatchKind)>) -> String {
    match found {
        Some((question, kind)) => {
            let how = match kind {
                MatchKind::Exact => "exact".to_string(),
                MatchKind::Containment => "containment".to_string(),
                MatchKind::TokenOverlap { score } => format!("token overlap {:.2}", score),
            };
            format!(
                "{} {} {} {}",
                style("✓").green(),
                style(query).white().bold(),
                style("→").dim(),
                format!("{} {}", question, style(format!("({})", how)).dim()),
            )
        }
        None => format!(
            "{} {} {}",
            style("✗").red(),
            style(query).white().bold(),
            style("matches no catalog question").dim(),
        ),
    }
}

fn styled_status(status: AgentStatus) -> String {
    let text = status.as_str();
    match status {
        AgentStatus::Executing => style(text).cyan().bold().to_string(),
        AgentStatus::Completed => style(text).green().to_string(),
        AgentStatus::Failed => style(text).red().to_string(),
        AgentStatus::Idle => style(text).dim().to_string(),
    }
}

fn styled_edge_status(status: EdgeStatus) -> String {
    match status {
        EdgeStatus::Active => style("active").cyan().bold().to_string(),
        EdgeStatus::Completed => style("completed").green().to_string(),
        EdgeStatus::Failed => style("failed").red().to_string(),
        EdgeStatus::Idle => style("idle").dim().to_string(),
    }
}

/// Render the projected agent graph as a node table and an edge table.
pub fn render_visual_graph(graph: &VisualGraph) -> String {
    if graph.nodes.is_empty() {
        return format!("\n  {}\n", style("The graph has no agents.").dim());
    }

    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", style("Agents:").white().bold()));
    for node in &graph.nodes {
        let marker = if node.highlighted {
            style("◆").cyan().bold().to_string()
        } else if node.animated {
            style("●").cyan().to_string()
        } else {
            style("○").dim().to_string()
        };
        let label = if node.dimmed {
            style(&node.label).dim().to_string()
        } else {
            style(&node.label).white().to_string()
        };
        out.push_str(&format!(
            "  {} {:<24} {:<12} {} {}\n",
            marker,
            label,
            styled_status(node.status),
            style(node.color).dim(),
            style(format!("opacity {:.2}", node.opacity)).dim(),
        ));
    }

    if !graph.edges.is_empty() {
        out.push_str(&format!("\n{}\n\n", style("Edges:").white().bold()));
        for edge in &graph.edges {
            let arrow = if edge.animated { "══▶" } else { "──▶" };
            let line = format!("{} {} {}", edge.source, arrow, edge.target);
            let line = if edge.dimmed {
                style(line).dim().to_string()
            } else if edge.highlighted {
                style(line).cyan().to_string()
            } else {
                line
            };
            out.push_str(&format!(
                "  {:<40} {:<10} {}\n",
                line,
                styled_edge_status(edge.status),
                style(format!(
                    "width {} | opacity {:.2} | packets {}",
                    edge.stroke_width, edge.opacity, edge.packet_count
                ))
                .dim(),
            ));
        }
    }
    out
}

/// Render the execution store: agent sets, current agent and step log.
pub fn render_execution(
    state: &ExecutionState,
    current_agent: Option<&str>,
    steps: &[ExecutionStep],
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n  {} {}\n  {} {}\n",
        style("Executing:").dim(),
        if state.is_executing {
            style("yes").green().bold().to_string()
        } else {
            style("no").white().to_string()
        },
        style("Current:").dim(),
        style(current_agent.unwrap_or("none")).white(),
    ));

    out.push_str(&format!("\n{}\n\n", style("Agents:").white().bold()));
    for id in &state.active {
        out.push_str(&format!("  {} {}\n", style("⏳").yellow(), style(id).yellow()));
    }
    for id in &state.completed {
        out.push_str(&format!("  {} {}\n", style("✓").green(), style(id).green()));
    }
    for id in &state.failed {
        out.push_str(&format!("  {} {}\n", style("✗").red(), style(id).red()));
    }
    if state.is_empty() {
        out.push_str(&format!("  {}\n", style("No agents have run yet.").dim()));
    }

    if !steps.is_empty() {
        out.push_str(&format!("\n{}\n\n", style("Step log:").white().bold()));
        for step in steps {
            let status = match step.status {
                StepStatus::Running => style("running").yellow().to_string(),
                StepStatus::Completed => style("completed").green().to_string(),
                StepStatus::Failed => style("failed").red().to_string(),
            };
            let took = step
                .ended_at
                .map(|end| format_duration((end - step.started_at).num_milliseconds().max(0) as u64))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {} {:<36} {:<10} {}\n",
                style(step.started_at.format("%H:%M:%S")).dim(),
                step.message,
                status,
                style(took).dim(),
            ));
        }
    }
    out
}

/// Render curated questions, grouped under their database id.
pub fn render_questions(questions: &[&CuratedQuestion]) -> String {
    if questions.is_empty() {
        return format!("\n  {}\n", style("No questions found.").dim());
    }

    let mut out = String::new();
    let mut current_db: Option<&str> = None;
    for q in questions {
        if current_db != Some(q.database.as_str()) {
            out.push_str(&format!("\n{}\n", style(&q.database).white().bold()));
            current_db = Some(q.database.as_str());
        }
        out.push_str(&format!(
            "  {} {} {}\n",
            style(format!("[{}]", q.id)).cyan(),
            q.question,
            style(&q.category).dim(),
        ));
    }
    out
}

/// Render the session list; the active one is marked.
pub fn render_sessions(sessions: &[ChatSession], active: &ChatSession) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", style("Sessions:").white().bold()));
    for session in sessions {
        let marker = if session.id == active.id {
            style("▶").green().bold().to_string()
        } else {
            " ".to_string()
        };
        out.push_str(&format!(
            "  {} {:<36} {} {}\n",
            marker,
            session.title,
            style(format!("{} messages", session.messages.len())).dim(),
            style(session.created_at.format("%Y-%m-%d %H:%M")).dim(),
        ));
    }
    out
}

/// Render the help listing for all commands.
pub fn render_help(specific_command: Option<&str>) -> String {
    if let Some(cmd_name) = specific_command {
        if let Some(cmd) = COMMAND_HELP.iter().find(|c| c.name == cmd_name) {
            return format_command_detail(cmd);
        } else {
            return format!("{} Unknown command: /{}", style("✗").red(), cmd_name);
        }
    }

    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", style("Available commands:").white().bold()));
    for cmd in COMMAND_HELP {
        out.push_str(&format!(
            "  {:<16} {}\n",
            style(format!("/{}", cmd.name)).cyan().bold(),
            style(cmd.description).dim(),
        ));
    }
    out.push_str(&format!("\n  {}\n", style("Anything else is asked as a question.").dim()));
    out
}

fn format_command_detail(cmd: &CommandHelp) -> String {
    format!(
        "\n{}\n  {}\n\n  {}\n",
        style(format!("/{}", cmd.name)).cyan().bold(),
        style(cmd.description).dim(),
        style(cmd.usage).white(),
    )
}

/// Render the version info.
pub fn render_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");

    format!(
        "\n  {} {}\n  {} {}\n  {} {}\n",
        style("Version:").dim(),
        style(version).white().bold(),
        style("Commit:").dim(),
        style(git_hash).white(),
        style("Built:").dim(),
        style(build_ts).white(),
    )
}

pub fn render_error(msg: &str) -> String {
    format!("{} {}", style("✗").red(), style(msg).red())
}

pub fn render_success(msg: &str) -> String {
    format!("{} {}", style("✓").green(), msg)
}

pub fn render_info(msg: &str) -> String {
    format!("{}", style(msg).dim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{ExecutionEvent, ExecutionTracker};
    use crate::fixtures::ChartKind;
    use crate::graph::{map_to_visual, GraphDefinition, GraphEdge, GraphNode};
    use crate::agents::AgentKind;

    fn step(label: &str, status: ThinkingStatus, detail: Option<&str>) -> ThinkingStep {
        ThinkingStep {
            id: label.to_lowercase(),
            label: label.to_string(),
            detail: detail.map(str::to_string),
            status,
            duration_ms: Some(4000),
        }
    }

    fn reply(complete: bool) -> AgentReply {
        AgentReply {
            query: "top vendors".into(),
            question: "List top 5 vendors by sale amount.".into(),
            matched: Some(MatchKind::Containment),
            content: "Diageo leads.".into(),
            steps: vec![],
            chart: Some(ChartKind::BarVerticalTop5),
            follow_ups: vec!["Bottom 5 vendors".into()],
            sql: Some("SELECT 1".into()),
            tables_used: vec![],
            complete,
        }
    }

    #[test]
    fn test_render_steps_numbered_with_detail() {
        let output = render_steps(&[
            step("Refiner", ThinkingStatus::Completed, Some("Refining \"q\"...")),
            step("Selector", ThinkingStatus::Pending, None),
        ]);
        assert!(output.contains("1."));
        assert!(output.contains("Refiner"));
        assert!(output.contains("Refining \"q\"..."));
        assert!(output.contains("4.0s"));
        assert!(output.contains("2."));
    }

    #[test]
    fn test_render_steps_empty() {
        assert!(render_steps(&[]).contains("No steps"));
    }

    #[test]
    fn test_render_reply_complete() {
        let output = render_reply(&reply(true));
        assert!(output.contains("Diageo leads."));
        assert!(output.contains("Vertical Bar Chart"));
        assert!(output.contains("Bottom 5 vendors"));
    }

    #[test]
    fn test_render_reply_incomplete() {
        let output = render_reply(&reply(false));
        assert!(output.contains("Stopped"));
        assert!(!output.contains("Diageo"));
    }

    #[test]
    fn test_render_match() {
        let hit = render_match("top 5", Some(("List top 5 vendors", MatchKind::TokenOverlap { score: 0.75 })));
        assert!(hit.contains("List top 5 vendors"));
        assert!(hit.contains("0.75"));
        assert!(render_match("zzz", None).contains("matches no catalog question"));
    }

    #[test]
    fn test_render_visual_graph() {
        let graph = GraphDefinition {
            nodes: vec![
                GraphNode { id: "a".into(), label: "Alpha".into(), kind: AgentKind::System },
                GraphNode { id: "b".into(), label: "Beta".into(), kind: AgentKind::System },
            ],
            edges: vec![GraphEdge::new("a", "b")],
        };
        let state = ExecutionState::new().apply(&ExecutionEvent::started("a"));
        let output = render_visual_graph(&map_to_visual(&state, &graph, None));
        assert!(output.contains("Alpha"));
        assert!(output.contains("executing"));
        assert!(output.contains("packets 1"));
    }

    #[test]
    fn test_render_execution_log() {
        let mut tracker = ExecutionTracker::new();
        tracker.apply(&ExecutionEvent::started("refiner"));
        let output = render_execution(tracker.state(), tracker.current_agent(), tracker.steps());
        assert!(output.contains("Processing with refiner..."));
        assert!(output.contains("running"));
        let empty = ExecutionTracker::new();
        assert!(render_execution(empty.state(), None, empty.steps()).contains("No agents have run yet"));
    }

    #[test]
    fn test_render_questions_grouped() {
        let a = CuratedQuestion { id: 1, database: "sales".into(), question: "Top vendors".into(), category: "Vendors".into() };
        let b = CuratedQuestion { id: 2, database: "hr".into(), question: "Who is the CEO?".into(), category: "Roles".into() };
        let output = render_questions(&[&a, &b]);
        assert!(output.contains("sales"));
        assert!(output.contains("[2]"));
        assert!(render_questions(&[]).contains("No questions"));
    }

    #[test]
    fn test_render_sessions_marks_active() {
        let first = ChatSession::new();
        let second = ChatSession::new();
        let output = render_sessions(&[first.clone(), second.clone()], &second);
        assert!(output.contains("New Chat"));
        assert!(output.contains("0 messages"));
    }

    #[test]
    fn test_render_help_all_commands() {
        let output = render_help(None);
        assert!(output.contains("/clear"));
        assert!(output.contains("/graph"));
        assert!(output.contains("/quit"));
    }

    #[test]
    fn test_render_help_specific_command() {
        let output = render_help(Some("graph"));
        assert!(output.contains("--hover"));
    }

    #[test]
    fn test_render_help_unknown_command() {
        assert!(render_help(Some("deploy")).contains("Unknown command"));
    }

    #[test]
    fn test_render_error() {
        assert!(render_error("something went wrong").contains("something went wrong"));
    }

    #[test]
    fn test_render_version() {
        assert!(render_version().contains(env!("CARGO_PKG_VERSION")));
    }
}
