// src/ui.rs
// =============================================================================
// Terminal output: the progress bar and the final summary.
//
// The checker never touches the terminal. It sends ProgressEvents into a
// channel and this module's task draws them, so drawing happens on its own
// task no matter where the checker runs.
// =============================================================================

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::checker::{CheckResult, Classification, ProgressEvent, RunReport};
use crate::config::RunConfig;

// Draws events from the channel until the sender is dropped
pub fn spawn_progress_bar(mut rx: UnboundedReceiver<ProgressEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);

        while let Some(event) = rx.recv().await {
            bar.set_position(u64::from(event.percent));
            bar.set_message(event.message);
        }

        bar.finish();
    })
}

// Prints the broken links as a table, then the counts
pub fn print_summary(report: &RunReport, config: &RunConfig) {
    let broken: Vec<&CheckResult> = report.results.iter().filter(|r| r.is_broken()).collect();

    if !broken.is_empty() {
        println!();
        println!("{:<6} {:<60} {:<30}", "LINE", "URL", "ERROR");
        println!("{}", "=".repeat(96));
        for result in &broken {
            println!(
                "{:<6} {:<60} {:<30}",
                result.line,
                truncate(&result.link, 57),
                format_status(&result.classification)
            );
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", report.checked - report.broken);
    println!("   ❌ Broken: {}", report.broken);
    println!("   📋 Total: {}", report.checked);
    println!("   ⏱️  Took: {:.1}s", report.elapsed.as_secs_f64());
    println!(
        "💾 Report saved to {} ({})",
        config.output_path.display(),
        config.output_format
    );
}

fn format_status(classification: &Classification) -> String {
    match classification {
        Classification::Ok => "✅ OK".to_string(),
        Classification::NotFound => "❌ 404 NOT FOUND".to_string(),
        Classification::ClientOrServerError { code } => format!("❌ HTTP {}", code),
        Classification::Timeout => "⏱️  TIMEOUT".to_string(),
        Classification::ConnectionFailure => "🌐 CONNECTION ERROR".to_string(),
        Classification::OtherError { message } => format!("⚠️  {}", message),
    }
}

// Truncates on a char boundary so multi-byte URLs don't panic
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
