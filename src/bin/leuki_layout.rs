use leuki::core::FixedDensity;
use leuki::layout::{ChartLayoutEngine, LayoutConfig, LayoutRequest};
use leuki::{AppSettings, LeukiError, PatientRecord};
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: leuki_layout --input <patient.json> [--output <path>] [--settings <settings.json>] [--pixels-per-unit <f64>]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    settings: Option<PathBuf>,
    pixels_per_unit: f64,
}

fn main() {
    let _ = leuki::telemetry::init_default_tracing();
    if let Err(err) = parse_args(std::env::args().skip(1)).and_then(|args| run(&args)) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    let record = PatientRecord::load(&args.input).map_err(|err| err.to_string())?;
    let settings = match &args.settings {
        Some(path) => AppSettings::load_or_init(path).map_err(|err| err.to_string())?,
        None => AppSettings::default(),
    };

    let engine = ChartLayoutEngine::new(LayoutConfig::default()).map_err(|err| err.to_string())?;
    let enabled_kinds = settings.enabled_kinds();
    let request = LayoutRequest::new(&record.blood_samples, &record.medications)
        .with_enabled_kinds(&enabled_kinds)
        .with_annotations(settings.shows_annotations());
    let density = FixedDensity::new(args.pixels_per_unit, args.pixels_per_unit);

    let layout = match engine.layout(request, &density) {
        Ok(layout) => layout,
        Err(LeukiError::NoValidDates) => {
            return Err("nothing to plot: no blood sample has a valid dd.MM.yyyy date".to_owned());
        }
        Err(err) => return Err(err.to_string()),
    };
    let json = layout.to_json_pretty().map_err(|err| err.to_string())?;

    match &args.output {
        Some(path) => fs::write(path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut settings = None::<PathBuf>;
    let mut pixels_per_unit = 1.0;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--settings" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --settings".to_owned())?;
                settings = Some(PathBuf::from(value));
            }
            "--pixels-per-unit" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --pixels-per-unit".to_owned())?;
                pixels_per_unit = value
                    .parse::<f64>()
                    .map_err(|err| format!("invalid --pixels-per-unit `{value}`: {err}"))?;
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        input: input.ok_or_else(|| USAGE.to_owned())?,
        output,
        settings,
        pixels_per_unit,
    })
}
