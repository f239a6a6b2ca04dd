use std::env;
use std::path::PathBuf;

use hospital_eda_generate::{GenerateOptions, GenerationEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut options = GenerateOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => options.out_dir = args.next().map(PathBuf::from).ok_or("missing --out value")?,
            "--patients" => {
                options.num_patients = args.next().ok_or("missing --patients value")?.parse()?
            }
            "--seed" => options.seed = args.next().ok_or("missing --seed value")?.parse()?,
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let result = GenerationEngine::new(options).run()?;
    println!("raw_dir={}", result.out_dir.display());
    Ok(())
}
