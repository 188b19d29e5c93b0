//! progress CLI — record project progress and print the read models.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use progress_bank::config::Config;
use progress_bank::event::{Event, EventPayload};
use progress_bank::model::{NewMilestone, NewTaskCompletion, NewTechnicalDecision, Phase};
use progress_bank::storage::FileStore;
use progress_bank::telemetry::init_tracing;
use progress_bank::tracker::Tracker;
use progress_bank::view::ProgressView;

#[derive(Parser)]
#[command(name = "progress", about = "Project progress memory bank")]
struct Cli {
    /// Memory bank directory (overrides PROGRESS_MEMORY_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Project plan TOML (overrides PROGRESS_PLAN)
    #[arg(long, global = true)]
    plan: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append an event to the memory bank
    Record {
        #[command(subcommand)]
        what: RecordAction,
    },
    /// Completed vs. planned tasks per phase
    Progress,
    /// Most recent events, newest first
    Activity {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Technical decision log
    Decisions,
    /// Milestones reached
    Milestones,
    /// Upcoming critical-path tasks from the plan
    CriticalPath,
}

#[derive(Subcommand)]
enum RecordAction {
    /// A task was completed
    Task {
        id: String,
        title: String,
        /// foundation, core, advanced or polish
        #[arg(long)]
        phase: Phase,
        #[arg(long, default_value = "development")]
        category: String,
        /// Hours spent; omit to record "unknown"
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// A technical decision was made
    Decision {
        id: String,
        title: String,
        #[arg(long)]
        decision: String,
        #[arg(long)]
        reasoning: String,
        /// Alternative considered (repeatable)
        #[arg(long = "alternative")]
        alternatives: Vec<String>,
        #[arg(long)]
        impact: Option<String>,
        #[arg(long)]
        time_saved: Option<String>,
    },
    /// A milestone was reached
    Milestone {
        id: String,
        title: String,
        #[arg(long)]
        description: String,
        /// Achievement (repeatable)
        #[arg(long = "achievement")]
        achievements: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.dir {
        config.memory_dir = dir;
    }
    if let Some(plan) = cli.plan {
        config.plan_path = Some(plan);
    }

    init_tracing(&config.log_level)?;

    let store = FileStore::new(&config.memory_dir);

    match cli.command {
        Command::Record { what } => cmd_record(&store, what, cli.json),
        read => {
            let plan = config.load_plan()?;
            let view = ProgressView::new(&store, &plan);
            match read {
                Command::Progress => cmd_progress(&view, cli.json),
                Command::Activity { limit } => cmd_activity(&view, limit, cli.json),
                Command::Decisions => cmd_decisions(&view, cli.json),
                Command::Milestones => cmd_milestones(&view, cli.json),
                Command::CriticalPath => cmd_critical_path(&view, cli.json),
                Command::Record { .. } => unreachable!("handled above"),
            }
        }
    }
}

fn cmd_record(store: &FileStore, what: RecordAction, json: bool) -> anyhow::Result<()> {
    let tracker = Tracker::new(store);

    let event = match what {
        RecordAction::Task {
            id,
            title,
            phase,
            category,
            hours,
            description,
        } => {
            let mut new = NewTaskCompletion::new(id, title, phase)
                .category(category)
                .description(description);
            if let Some(h) = hours {
                new = new.hours(h);
            }
            tracker.record_task_completion(new)?
        }
        RecordAction::Decision {
            id,
            title,
            decision,
            reasoning,
            alternatives,
            impact,
            time_saved,
        } => {
            let mut new = NewTechnicalDecision::new(id, title, decision, reasoning);
            if !alternatives.is_empty() {
                new = new.alternatives(alternatives);
            }
            if let Some(impact) = impact {
                new = new.impact(impact);
            }
            if let Some(saved) = time_saved {
                new = new.time_saved(saved);
            }
            tracker.record_technical_decision(new)?
        }
        RecordAction::Milestone {
            id,
            title,
            description,
            achievements,
        } => tracker.record_milestone(
            NewMilestone::new(id, title, description).achievements(achievements),
        )?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        println!("Logged {}: {} - {}", event.kind(), event.id(), event.title());
    }
    Ok(())
}

fn cmd_progress(view: &ProgressView<'_, FileStore>, json: bool) -> anyhow::Result<()> {
    let phases = view.phase_progress();
    let overall = view.overall_progress();

    if json {
        let body = serde_json::json!({ "phases": phases, "overall": overall });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!(
        "{:<12}  {:>9}  {:>7}  STATUS",
        "PHASE", "DONE", "PCT"
    );
    println!("{}", "-".repeat(48));
    for (phase, p) in &phases {
        println!(
            "{:<12}  {:>9}  {:>6.1}%  {}",
            phase.to_string(),
            format!("{}/{}", p.completed, p.total),
            p.percent(),
            p.status()
        );
    }
    println!("{}", "-".repeat(48));
    println!(
        "{:<12}  {:>9}  {:>6.1}%",
        "overall",
        format!("{}/{}", overall.completed, overall.total),
        overall.percent()
    );

    let categories = view.category_counts();
    if !categories.is_empty() {
        println!("\nBy category:");
        for (category, count) in &categories {
            println!("  {category:<20} {count}");
        }
    }
    Ok(())
}

fn cmd_activity(
    view: &ProgressView<'_, FileStore>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let events = view.recent_activity(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    let now = Utc::now();
    for event in &events {
        println!("{:<9} {}", time_ago(event.timestamp, now), headline(event));
        println!("          {}", details(event));
    }
    println!("\n{} event(s)", events.len());
    Ok(())
}

fn cmd_decisions(view: &ProgressView<'_, FileStore>, json: bool) -> anyhow::Result<()> {
    let decisions = view.technical_decisions();

    if json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
        return Ok(());
    }

    if decisions.is_empty() {
        println!("No technical decisions recorded.");
        return Ok(());
    }

    for d in &decisions {
        println!("{} ({})", d.title, d.id);
        println!("  Decision:   {}", d.decision);
        println!("  Reasoning:  {}", d.reasoning);
        if let Some(alternatives) = &d.alternatives_considered {
            println!("  Alternatives considered:");
            for alt in alternatives {
                println!("    - {alt}");
            }
        }
        if let Some(impact) = &d.impact {
            println!("  Impact:     {impact}");
        }
        if let Some(saved) = &d.time_saved {
            println!("  Time saved: {saved}");
        }
        println!();
    }
    Ok(())
}

fn cmd_milestones(view: &ProgressView<'_, FileStore>, json: bool) -> anyhow::Result<()> {
    let milestones = view.milestones();

    if json {
        println!("{}", serde_json::to_string_pretty(&milestones)?);
        return Ok(());
    }

    if milestones.is_empty() {
        println!("No milestones recorded.");
        return Ok(());
    }

    for m in &milestones {
        println!("{} ({})", m.title, m.id);
        if !m.description.is_empty() {
            println!("  {}", m.description);
        }
        for a in &m.achievements {
            println!("    - {a}");
        }
        println!();
    }
    Ok(())
}

fn cmd_critical_path(view: &ProgressView<'_, FileStore>, json: bool) -> anyhow::Result<()> {
    let path = view.critical_path();

    if json {
        println!("{}", serde_json::to_string_pretty(path)?);
        return Ok(());
    }

    println!(
        "{:<12}  {:<9}  {:<10}  {:>6}  TITLE",
        "ID", "PRIORITY", "PHASE", "BLOCKS"
    );
    println!("{}", "-".repeat(80));
    for task in path {
        println!(
            "{:<12}  {:<9}  {:<10}  {:>6}  {}",
            task.id,
            task.priority.to_string(),
            task.phase.to_string(),
            task.blocks,
            task.title
        );
    }
    Ok(())
}

fn headline(event: &Event) -> String {
    match &event.payload {
        EventPayload::TaskCompletion(t) => format!("Completed: {}", t.title),
        EventPayload::TechnicalDecision(d) => format!("Decision: {}", d.title),
        EventPayload::Milestone(m) => format!("Milestone: {}", m.title),
    }
}

fn details(event: &Event) -> String {
    match &event.payload {
        EventPayload::TaskCompletion(t) => {
            format!("Phase: {} | Duration: {}", t.phase, t.duration_hours)
        }
        EventPayload::TechnicalDecision(d) => format!(
            "Impact: {}",
            d.impact.as_deref().unwrap_or("System architecture")
        ),
        EventPayload::Milestone(m) => format!("Achievements: {} items", m.achievements.len()),
    }
}

/// Coarse relative age: days, else hours, else minutes.
fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_days() > 0 {
        format!("{}d ago", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}m ago", elapsed.num_minutes().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::days(3), now), "3d ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5h ago");
        assert_eq!(time_ago(now - Duration::minutes(7), now), "7m ago");
        assert_eq!(time_ago(now + Duration::minutes(1), now), "0m ago");
    }
}
