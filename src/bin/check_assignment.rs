use anyhow::{bail, Context, Result};
use gradeguard::models::{AssignmentResult, Submission};
use gradeguard::services::config_store::ConfigStore;
use gradeguard::services::grader::{get_api_key, HttpGrader};
use gradeguard::services::pipeline::AssignmentPipeline;
use gradeguard::services::result_store::ResultStore;
use gradeguard::services::{integrity_report, is_flagged};

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// Values prefixed with `@` are read from the named file.
fn resolve_text(value: String) -> Result<String> {
    if let Some(path) = value.strip_prefix('@') {
        return std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path));
    }
    Ok(value)
}

fn usage() -> ! {
    eprintln!(
        "Usage:\n  check_assignment --student <name> --question <text|@file> \
         (--answer <text|@file> | --pdf <path>) [--reference <text|@file>] \
         [--out <json_path>] [--save]\n\n\
         Notes:\n  - Set GRADEGUARD_API_KEY (or GOOGLE_API_KEY) for the grading service.\n  \
         - --save persists the graded submission and the result record.\n  \
         - --out writes the flat result record JSON to the given path."
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    gradeguard::init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let student = parse_arg_value(&args, "--student").unwrap_or_else(|| usage());
    let question = resolve_text(parse_arg_value(&args, "--question").unwrap_or_else(|| usage()))?;
    let answer = parse_arg_value(&args, "--answer");
    let pdf_path = parse_arg_value(&args, "--pdf");
    let reference = parse_arg_value(&args, "--reference")
        .map(resolve_text)
        .transpose()?;
    let out_path = parse_arg_value(&args, "--out");
    let save = has_flag(&args, "--save");

    let config = match ConfigStore::default_config_dir() {
        Some(dir) => ConfigStore::new(dir)
            .load()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => Default::default(),
    };

    let api_key = get_api_key().context(
        "no grading API key configured; set GRADEGUARD_API_KEY or GOOGLE_API_KEY",
    )?;

    let grader = HttpGrader::new(&config.grader, api_key);
    let mut pipeline = AssignmentPipeline::new(grader, config.detection.clone());
    if save {
        if let Some(dir) = ResultStore::default_dir() {
            pipeline = pipeline.with_store(ResultStore::new(dir));
        }
    }

    let result = match (answer, pdf_path) {
        (Some(answer), None) => {
            let answer = resolve_text(answer)?;
            let submission = Submission::new(&student, &question, answer, reference);
            pipeline.check_text(&submission).await?
        }
        (None, Some(path)) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("failed to read {}", path))?;
            pipeline
                .check_pdf(&student, &question, &bytes, reference)
                .await?
        }
        _ => bail!("provide exactly one of --answer or --pdf"),
    };

    print_result(&result, &pipeline);

    let flagged = is_flagged(&result.detection, pipeline.thresholds());
    let record = result.to_record(flagged, chrono::Local::now());

    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&out_path, json)
            .with_context(|| format!("failed to write {}", out_path))?;
        println!("\nWrote result record: {}", out_path);
    }

    if save {
        if let Some(dir) = ResultStore::default_dir() {
            let path = ResultStore::new(dir).save_record(&record)?;
            println!("Saved result record: {}", path.display());
        }
    }

    Ok(())
}

fn print_result<G>(result: &AssignmentResult, pipeline: &AssignmentPipeline<G>)
where
    G: gradeguard::services::grader::AssignmentGrader,
{
    let report = integrity_report(&result.detection, pipeline.thresholds());

    println!("Student: {}", result.student_name);
    println!();
    println!("Plagiarism & AI Content Analysis");
    println!(
        "  AI Content Score: {:.2}% - {}",
        result.detection.score, report.headline
    );
    println!("  Severity: {}", report.severity.as_str());
    println!("  Perplexity: {:.2}", result.detection.perplexity);
    println!("  Burstiness: {:.3}", result.detection.burstiness);
    println!("  Pattern Analysis: {}", result.detection.verdict);
    if let Some(warning) = &report.warning {
        println!("  ⚠️  {}", warning);
    }
    if !result.detection.similarity_scores.is_empty() {
        let rendered: Vec<String> = result
            .detection
            .similarity_scores
            .iter()
            .map(|s| format!("{:.1}%", s))
            .collect();
        println!("  Reference similarity: {}", rendered.join(", "));
    }

    println!();
    println!("Grade: {}", result.outcome.grade);
    println!();
    println!("Feedback:\n{}", result.outcome.feedback);
    if let Some(analysis) = &result.outcome.analysis {
        println!();
        println!("Detailed Analysis:\n{}", analysis);
    }
    if let Some(doc_id) = &result.outcome.document_id {
        println!();
        println!("Document ID: {}", doc_id);
    }
    if let Some(file_id) = &result.outcome.file_id {
        println!("File ID: {}", file_id);
    }
}
