//! score_reliability - audit one sampled clip and write the reliability report

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use roi_reliability::roi::parse_roi_csv;
use roi_reliability::{calculate_redundancy, AuditConfig, FrameDocument, ReliabilityPipeline};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Frame document (JSON) produced by the sampling/detection stage.
    #[arg(long)]
    input: PathBuf,
    /// Config file (JSON or TOML).
    #[arg(long, env = "RELIABILITY_CONFIG")]
    config: Option<PathBuf>,
    /// ROI as x1,y1,x2,y2; overrides the document and config.
    #[arg(long)]
    roi: Option<String>,
    /// Sampling rate; overrides the document and config.
    #[arg(long)]
    fps: Option<f64>,
    /// Report path. Printed to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Pretty-print the report JSON.
    #[arg(long)]
    pretty: bool,
    /// UI mode for stderr progress.
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto, value_name = "MODE")]
    ui: ui::UiMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::new(
        args.ui,
        std::io::stderr().is_terminal(),
        args.output.is_none() && !std::io::stdout().is_terminal(),
    );

    let cfg = {
        let _stage = ui.stage("Load config");
        AuditConfig::load_from(args.config.as_deref())?
    };

    let doc = {
        let _stage = ui.stage("Read frames");
        let raw = std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        FrameDocument::from_json(&raw)?
    };

    let roi = match (&args.roi, doc.roi.clone()) {
        (Some(csv), _) => parse_roi_csv(csv)?,
        (None, Some(roi)) => roi.into_roi()?,
        (None, None) => cfg.roi,
    };
    let fps = args.fps.or(doc.fps).unwrap_or(cfg.fps);

    let mut pipeline = ReliabilityPipeline::from_config(&cfg);
    if let (Some(primary), Some(peer)) = (&doc.coverage_cells, &doc.peer_coverage_cells) {
        pipeline = pipeline.with_redundancy(calculate_redundancy(primary, peer));
    }

    let report = {
        let _stage = ui.stage("Score reliability");
        pipeline.report(&doc.frames, &roi, fps)?
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    match &args.output {
        Some(path) => {
            let _stage = ui.stage("Write report");
            std::fs::write(path, json)?;
            log::info!("report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    log::info!(
        "{} ({}) flip_at_s={} standard_ai_alert_at_s={}",
        report.reliability_label,
        report.reliability_score,
        report.timestamps.flip_at_s,
        report.timestamps.standard_ai_alert_at_s
    );
    Ok(())
}
