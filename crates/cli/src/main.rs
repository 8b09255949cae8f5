use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use signit_core::capture::infrastructure::csv_dataset_writer::CsvDatasetWriter;
use signit_core::capture::infrastructure::dataset_summary::DatasetSummary;
use signit_core::classification::domain::label_table::LabelTable;
use signit_core::classification::domain::sign_classifier::SignClassifier;
use signit_core::classification::infrastructure::onnx_sign_classifier::OnnxSignClassifier;
use signit_core::landmarks::domain::landmark_source::LandmarkSource;
use signit_core::landmarks::infrastructure::jsonl_landmark_source::JsonlLandmarkSource;
use signit_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use signit_core::pipeline::recognize_signs_use_case::{FrameReport, RecognizeSignsUseCase};
use signit_core::shared::constants::{
    BUNDLED_MODEL_DIR, CLASSIFIER_MODEL_NAME, DEFAULT_DATASET_PATH, DEFAULT_LABELS_PATH,
    DEFAULT_NUM_THREADS,
};
use signit_core::shared::model_resolver::{self, ModelLocation};

/// Static hand sign recognition and training data capture.
///
/// Keys in the recording: '0' normal mode, '1' capture mode,
/// 'a'..'z' capture one sample for that letter, ESC stops.
#[derive(Parser)]
#[command(name = "signit")]
struct Cli {
    /// Recorded hand detections, one JSON frame per line.
    #[arg(long, required_unless_present = "summary")]
    landmarks: Option<PathBuf>,

    /// Classifier model (ONNX). Defaults to the cached or bundled model.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Download URL used when no local model is found.
    #[arg(long)]
    model_url: Option<String>,

    /// Label table, one label per line.
    #[arg(long, default_value = DEFAULT_LABELS_PATH)]
    labels: PathBuf,

    /// Dataset file captured samples are appended to.
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Intra-op threads for the classifier.
    #[arg(long, default_value_t = DEFAULT_NUM_THREADS)]
    threads: usize,

    /// Only capture samples; do not load the classifier.
    #[arg(long)]
    collect_only: bool,

    /// Print per-label sample counts of the dataset and exit.
    #[arg(long)]
    summary: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    if cli.summary {
        return print_summary(&cli.dataset);
    }

    let (classifier, labels) = if cli.collect_only {
        log::info!("Collect-only mode: classifier disabled");
        (None, None)
    } else {
        let classifier = build_classifier(&cli)?;
        let labels = LabelTable::load(&cli.labels)?;
        (Some(classifier), Some(labels))
    };

    let mut use_case = RecognizeSignsUseCase::new(
        classifier,
        labels,
        Box::new(CsvDatasetWriter::new(&cli.dataset)),
        Box::new(StdoutPipelineLogger::default()),
    )?;

    let Some(landmarks) = cli.landmarks.as_deref() else {
        return Err("--landmarks is required".into());
    };
    let mut source = JsonlLandmarkSource::new();
    let metadata = source.open(landmarks)?;
    log::info!("Reading landmarks from {}", metadata.source_name);

    let summary = use_case.execute(&mut source, report_frame);
    source.close();
    let summary = summary?;

    log::info!(
        "{} frames ({} unreadable), {} hands ({} skipped), {} predictions, {} samples written to {}",
        summary.frames,
        summary.skipped_frames,
        summary.hands,
        summary.skipped_hands,
        summary.predictions,
        summary.samples,
        cli.dataset.display()
    );
    Ok(())
}

fn build_classifier(cli: &Cli) -> Result<Box<dyn SignClassifier>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {CLASSIFIER_MODEL_NAME}");
    let location = ModelLocation {
        explicit: cli.model.as_deref(),
        bundled_dir: Some(Path::new(BUNDLED_MODEL_DIR)),
        url: cli.model_url.as_deref(),
    };
    let model_path = model_resolver::resolve(
        CLASSIFIER_MODEL_NAME,
        &location,
        Some(Box::new(download_progress)),
    )?;
    Ok(Box::new(OnnxSignClassifier::new(&model_path, cli.threads)?))
}

fn report_frame(report: &FrameReport) {
    for (i, hand) in report.hands.iter().enumerate() {
        let Some(result) = hand.result else {
            continue;
        };
        match (result.label, hand.label_name.as_deref()) {
            (Some(_), Some(name)) => log::info!(
                "frame {} hand {i}: {name} ({:.2})",
                report.index,
                result.confidence
            ),
            (Some(label), None) => log::info!(
                "frame {} hand {i}: class {label} ({:.2})",
                report.index,
                result.confidence
            ),
            (None, _) => log::debug!(
                "frame {} hand {i}: no confident sign ({:.2})",
                report.index,
                result.confidence
            ),
        }
    }
}

fn print_summary(dataset: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let summary = DatasetSummary::scan(dataset)?;
    println!("{}: {} samples", dataset.display(), summary.total());
    for (label, count) in &summary.counts {
        let letter = char::from(b'a' + label);
        println!("  {label:2} ({letter}): {count}");
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.summary {
        if !cli.dataset.exists() {
            return Err(format!("Dataset not found: {}", cli.dataset.display()).into());
        }
        return Ok(());
    }
    if let Some(landmarks) = &cli.landmarks {
        if !landmarks.exists() {
            return Err(format!("Landmark file not found: {}", landmarks.display()).into());
        }
    }
    if cli.threads == 0 {
        return Err("Threads must be at least 1".into());
    }
    if !cli.collect_only && !cli.labels.exists() {
        return Err(format!(
            "Label table not found: {} (use --collect-only to skip classification)",
            cli.labels.display()
        )
        .into());
    }
    if cli.collect_only && (cli.model.is_some() || cli.model_url.is_some()) {
        return Err("--model/--model-url cannot be combined with --collect-only".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading sign classifier model... {pct}%");
    } else {
        eprint!("\rDownloading sign classifier model... {downloaded} bytes");
    }
}
