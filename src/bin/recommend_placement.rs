//! recommend_placement - rank candidate camera positions around a zone

use anyhow::Result;
use clap::Parser;

use roi_reliability::{recommend_placement, CameraPosition, Rect};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Zone footprint on the ground plane as x1,y1,x2,y2 (metres).
    #[arg(long, value_parser = parse_rect)]
    roi: Rect,
    /// Installed camera as x,y,height. Repeatable.
    #[arg(long = "existing", value_name = "X,Y,H")]
    existing: Vec<CameraPosition>,
    /// Candidate position as x,y,height. Repeatable; defaults surround the zone.
    #[arg(long = "candidate", value_name = "X,Y,H")]
    candidates: Vec<CameraPosition>,
}

fn parse_rect(value: &str) -> Result<Rect> {
    let coords = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()?;
    match coords.as_slice() {
        [x1, y1, x2, y2] => Ok(Rect::new(*x1, *y1, *x2, *y2)),
        _ => Err(anyhow::anyhow!("expected x1,y1,x2,y2")),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ranked = recommend_placement(&args.roi, &args.existing, Some(&args.candidates));
    if let Some(best) = ranked.first() {
        log::info!(
            "best position ({:.1}, {:.1}, h={:.1}) score={:.3} {:?}",
            best.position.x,
            best.position.y,
            best.position.height,
            best.total_score,
            best.grade
        );
    }
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
