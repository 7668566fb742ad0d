use crate::image::Normalizer;
use webimg_core::{BatchReport, ImageJob, NormalizeOptions};

/// Run `normalizer` over `jobs` in order.
///
/// Successes record the output file name, failures the source file name. One
/// job failing never stops the rest.
pub fn process_batch<N: Normalizer + ?Sized>(
    normalizer: &N,
    jobs: &[ImageJob],
    options: &NormalizeOptions,
) -> BatchReport {
    let start = std::time::Instant::now();

    let report = jobs.iter().fold(BatchReport::default(), |mut report, job| {
        match normalizer.normalize(job, options) {
            Ok(output) => report.processed.push(
                output
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| job.file_name()),
            ),
            Err(_) => report.failed.push(job.file_name()),
        }
        report
    });

    tracing::info!(
        jobs = jobs.len(),
        processed = report.processed.len(),
        failed = report.failed.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Batch processed"
    );

    report
}
