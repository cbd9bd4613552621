use std::{
    collections::BTreeMap,
    error::Error,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use clap::{
    Parser,
    ValueHint,
};
use kuhn::history::HistoryRecord;
use log::{
    info,
    warn,
};
use plotters::{
    self,
    prelude::*,
};

/// Renders the training history written by `cfr train` to SVG.
#[derive(Parser)]
struct AppArgs {
    /// history.csv files.
    #[clap(value_parser, value_hint(ValueHint::FilePath), required = true)]
    inputs: Vec<PathBuf>,

    #[clap(long, short, value_parser, value_hint(ValueHint::DirPath), default_value = "graphs")]
    output_dir: PathBuf,
}

type Series = Vec<(u64, f64)>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    fs::create_dir_all(&args.output_dir)?;
    for input in &args.inputs {
        plot_history(input, &args.output_dir)?;
    }
    Ok(())
}

/// Names a chart after the run directory, e.g. `output/history.csv` -> `output`.
fn chart_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .or_else(|| path.file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "history".to_string())
}

fn plot_history(path: &Path, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(path)?;
    if records.is_empty() {
        warn!("no records in {}", path.display());
        return Ok(());
    }

    let mut strategies: BTreeMap<String, Series> = BTreeMap::new();
    let mut payoffs: BTreeMap<u64, f64> = BTreeMap::new();
    for r in &records {
        strategies.entry(r.info_set.clone()).or_default().push((r.iteration, r.bet_probability));
        payoffs.insert(r.iteration, r.expected_payoff);
    }
    let payoffs: Series = limit_len(payoffs.into_iter().collect(), 800);
    let xmax = payoffs.last().map(|p| p.0).unwrap_or(1).max(1);

    let name = chart_name(path);
    let img_path = output_dir.join(&name).with_extension("svg");
    let root_area = SVGBackend::new(&img_path, (1000, 1200)).into_drawing_area();
    root_area.fill(&WHITE)?;
    let areas = root_area.split_evenly((2, 1));

    let mut chart = ChartBuilder::on(&areas[0])
        .caption(format!("{}: BET probability", name), ("sans-serif", 20).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..xmax, 0.0..1.0)?;

    chart
        .configure_mesh()
        .y_desc("P(BET)")
        .y_label_style(("sans-serif", 18).into_font())
        .x_desc("Iteration")
        .x_label_style(("sans-serif", 18).into_font())
        .draw()?;

    for (i, (info_set, series)) in strategies.into_iter().enumerate() {
        let color = Palette99::pick(i).mix(0.8);
        info!("plotting: {}", info_set);
        chart
            .draw_series(LineSeries::new(limit_len(series, 800), color))?
            .label(info_set)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE)
        .border_style(BLACK)
        .label_font(("sans-serif", 18).into_font())
        .draw()?;

    let (ymin, ymax) = value_range(&payoffs);
    let mut chart = ChartBuilder::on(&areas[1])
        .caption(format!("{}: average game value", name), ("sans-serif", 20).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .y_desc("Player 0 payoff")
        .y_label_formatter(&|y| format!("{:.3}", y))
        .y_label_style(("sans-serif", 18).into_font())
        .x_desc("Iteration")
        .x_label_style(("sans-serif", 18).into_font())
        .draw()?;

    chart.draw_series(LineSeries::new(payoffs, &BLUE))?;

    root_area.present()?;
    info!("{} created", img_path.display());

    Ok(())
}

fn value_range(series: &Series) -> (f64, f64) {
    let ymin = series.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let ymax = series.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((ymax - ymin) * 0.05).max(0.05);
    (ymin - pad, ymax + pad)
}

fn load_records(path: &Path) -> Result<Vec<HistoryRecord>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut v = vec![];
    for r in reader.deserialize() {
        match r {
            Ok(r) => v.push(r),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(v)
}

fn limit_len<T>(v: Vec<T>, max: usize) -> Vec<T> {
    if v.len() < max {
        return v;
    }

    let mut new_v = Vec::with_capacity(max);
    let step = v.len() as f64 / max as f64;
    let mut next = 0.0f64;
    for (i, elem) in v.into_iter().enumerate() {
        if (i + 1) > next as usize {
            new_v.push(elem);
            next += step;
        }
    }
    new_v
}
