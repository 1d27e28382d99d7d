//! `fraudintel` — run a fraud-case analysis task, or evaluate it.
//!
//! ```text
//! fraudintel hypotheses  --mode demo
//! fraudintel contradictions --mode eval --cases datasets
//! fraudintel narrative --model anthropic/claude-sonnet-4-5
//! ```
//!
//! Demo mode runs the producer over the first case and prints the prediction
//! next to the gold labels with its judged score. Eval mode runs the full
//! harness and prints the aggregate plus the per-case breakdown.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fraudintel_core::{case_label, CaseExample, Dataset, FieldValue, TaskKind};
use fraudintel_runtime::{
    build_runtime, evaluate_prediction, instrumentation_enabled, EvalHarness, RuntimeConfig,
    DEFAULT_MODEL,
};

#[derive(Parser)]
#[command(name = "fraudintel")]
#[command(about = "Fraud-case analysis tasks and their judged evaluation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate ranked fraud hypotheses with supporting evidence
    Hypotheses(RunArgs),

    /// Find internal contradictions and missing-information requests
    Contradictions(RunArgs),

    /// Draft an investigator-facing narrative and headline
    Narrative(RunArgs),
}

impl Task {
    fn kind(&self) -> TaskKind {
        match self {
            Task::Hypotheses(_) => TaskKind::Hypothesis,
            Task::Contradictions(_) => TaskKind::Contradiction,
            Task::Narrative(_) => TaskKind::Narrative,
        }
    }

    fn args(&self) -> &RunArgs {
        match self {
            Task::Hypotheses(args) | Task::Contradictions(args) | Task::Narrative(args) => args,
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// What to run: a single-case demo or the full evaluation
    #[arg(long, value_enum, default_value = "demo")]
    mode: Mode,

    /// Model identifier in provider/model form
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Dataset root (expects cases/, labels/, analyst_notes/)
    #[arg(long, default_value = "datasets")]
    cases: String,

    /// Worker-pool size for eval mode; defaults to one per processing unit
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let kind = cli.task.kind();
    let args = cli.task.args();

    let mut config = RuntimeConfig::from_env(&args.model)
        .with_context(|| format!("invalid model identifier '{}'", args.model))?;
    if let Some(n) = args.concurrency {
        config = config.with_concurrency(n);
    }

    let examples = Dataset::new(args.cases.as_str())
        .examples(kind)
        .with_context(|| format!("failed to load cases from '{}'", args.cases))?;

    let harness = build_runtime(kind, &config).context("failed to construct runtime")?;

    match args.mode {
        Mode::Demo => run_demo(kind, &harness, &examples).await,
        Mode::Eval => run_eval(kind, &harness, &examples).await,
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Mode {
    Demo,
    Eval,
}

fn init_tracing() {
    // Instrumentation widens the default filter so reasoning spans show up;
    // RUST_LOG always wins when set.
    let default_filter = if instrumentation_enabled() {
        "fraudintel_runtime=debug,info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_demo(
    kind: TaskKind,
    harness: &EvalHarness,
    examples: &[CaseExample],
) -> anyhow::Result<()> {
    let example = examples.first().context("no cases found")?;

    println!("=== {} demo: {} ===", kind, case_label(0));
    let prediction = harness.producer().run(example).await?;

    println!("\n--- predicted ---");
    print_fields(kind, &prediction);

    println!("\n--- gold ---");
    print_fields(kind, example.expected());

    let score = evaluate_prediction(harness.judge(), example, &prediction).await;
    println!("\njudged score: {score:.3}");
    Ok(())
}

async fn run_eval(
    kind: TaskKind,
    harness: &EvalHarness,
    examples: &[CaseExample],
) -> anyhow::Result<()> {
    println!("=== {} evaluation: {} cases ===", kind, examples.len());

    let report = harness.evaluate(examples).await?;

    println!("\nper-case scores:");
    for case in &report.per_case {
        println!("  {:<24} {:.3}", case.label, case.score);
    }
    println!("\naggregate: {:.3}", report.aggregate);
    println!("evaluated at: {}", report.evaluated_at.to_rfc3339());
    Ok(())
}

/// Print a field map in the producer schema's declared order.
fn print_fields(kind: TaskKind, fields: &fraudintel_core::FieldMap) {
    let schema = kind.producer_schema();

    // Hypotheses pair naturally with their confidence scores, so render them
    // zipped rather than as two parallel lists.
    if kind == TaskKind::Hypothesis {
        if let (Some(FieldValue::TextList(hypotheses)), Some(FieldValue::FloatList(scores))) =
            (fields.get("hypotheses"), fields.get("confidence_scores"))
        {
            println!("hypotheses:");
            for (i, hypothesis) in hypotheses.iter().enumerate() {
                match scores.get(i) {
                    Some(score) => println!("  {}. [{score:.2}] {hypothesis}", i + 1),
                    None => println!("  {}. {hypothesis}", i + 1),
                }
            }
            if let Some(FieldValue::TextList(evidence)) = fields.get("supporting_evidence") {
                println!("supporting_evidence:");
                for item in evidence {
                    println!("  - {item}");
                }
            }
            return;
        }
    }

    for spec in &schema.outputs {
        match fields.get(spec.name) {
            Some(FieldValue::Text(text)) => println!("{}: {text}", spec.name),
            Some(FieldValue::TextList(items)) => {
                println!("{}:", spec.name);
                for item in items {
                    println!("  - {item}");
                }
            }
            Some(FieldValue::Float(value)) => println!("{}: {value:.2}", spec.name),
            Some(FieldValue::FloatList(values)) => {
                let rendered: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
                println!("{}: [{}]", spec.name, rendered.join(", "));
            }
            None => println!("{}: <missing>", spec.name),
        }
    }
}
