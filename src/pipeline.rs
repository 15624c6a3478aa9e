// src/pipeline.rs
// =============================================================================
// One complete run: read the input, check every link, write the report.
//
// Fatal problems (unreadable input, unwritable output, cancellation) are
// returned as a single CheckError. Broken links are just results.
// =============================================================================

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::checker::{Dispatcher, ProgressEvent, ProgressSink, RunReport, Transport};
use crate::config::RunConfig;
use crate::error::CheckError;
use crate::input::read_entries;
use crate::report::write_report;

pub async fn check_file(
    config: &RunConfig,
    transport: Arc<dyn Transport>,
    sink: &dyn ProgressSink,
    cancel: CancellationToken,
) -> Result<RunReport, CheckError> {
    // Nothing is reported until the input is known to be readable
    let entries = read_entries(&config.input_path).await?;
    sink.emit(ProgressEvent::new(
        0,
        format!("Reading links from {}", config.input_path.display()),
        0,
    ));

    let report = Dispatcher::new(transport, config.dispatch_options())
        .with_cancellation(cancel)
        .run(&entries, sink)
        .await?;

    write_report(
        &config.output_path,
        config.output_format,
        config.report_mode,
        &report.results,
    )?;
    info!(
        path = %config.output_path.display(),
        format = %config.output_format,
        rows = report.results.len(),
        "report written"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::mock::{MockTransport, Reply};
    use crate::checker::ReportMode;
    use crate::config::OutputFormat;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    fn config(input: PathBuf, output: PathBuf, format: OutputFormat) -> RunConfig {
        RunConfig {
            input_path: input,
            output_path: output,
            output_format: format,
            max_workers: 3,
            timeout: Duration::from_secs(1),
            report_mode: ReportMode::BrokenOnly,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_writes_broken_links() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("links.txt");
        let output = dir.path().join("broken.csv");
        std::fs::write(
            &input,
            "https://good.test\n\nhttps://404.test\nhttps://timeout.test\n",
        )
        .unwrap();

        let transport = Arc::new(
            MockTransport::new()
                .route("https://good.test", Reply::Status(200))
                .route("https://404.test", Reply::Status(404))
                .route("https://timeout.test", Reply::Timeout),
        );
        let events = Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| events.lock().unwrap().push(event);

        let report = check_file(
            &config(input, output.clone(), OutputFormat::Csv),
            transport,
            &sink,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.checked, 3);
        assert_eq!(report.broken, 2);

        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            csv,
            "Link,Error\nhttps://404.test,404 Not Found\nhttps://timeout.test,Timeout\n"
        );

        let events = events.lock().unwrap();
        assert_eq!(events.first().unwrap().percent, 0);
        assert_eq!(events.last().unwrap().percent, 100);
        assert_eq!(events.last().unwrap().broken_so_far, 2);
    }

    #[tokio::test]
    async fn test_missing_input_fails_without_progress() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("broken.txt");
        let transport = Arc::new(MockTransport::new());
        let events = Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| events.lock().unwrap().push(event);

        let err = check_file(
            &config(dir.path().join("nope.txt"), output.clone(), OutputFormat::Txt),
            transport,
            &sink,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckError::InputUnreadable { .. }));
        assert!(events.lock().unwrap().is_empty());
        assert!(!output.exists());
    }
}
