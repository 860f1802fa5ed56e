use anyhow::Result;
use cardio_signal::data_loading::{extract_channels, read_txt_file};
use std::path::Path;

fn range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} <signal.txt>", args[0]);
        std::process::exit(1);
    }

    let matrix = read_txt_file(Path::new(&args[1]))?;
    let (rows, cols) = matrix.dim();
    println!("\nMatrix: {} rows x {} columns", rows, cols);

    let channels = extract_channels(&matrix);
    for (name, codes) in [
        ("PCG (col 7)", &channels.amp1),
        ("PPG (col 8)", &channels.amp2),
        ("ECG (col 9)", &channels.amp3),
    ] {
        let (lo, hi) = range(&codes.to_vec());
        println!("{}: codes {} .. {}", name, lo, hi);
    }

    Ok(())
}
