use anyhow::Result;
use clap::Parser;
use enhance_tools::{
    cli::{init_logging, ExtractArgs},
    extract::{self, ExtractConfig},
};

fn main() -> Result<()> {
    init_logging();
    let args = ExtractArgs::parse();

    let config = ExtractConfig::for_root(&args.root.root);
    let report = extract::run(&config)?;

    println!(
        "Extracted {} train and {} test pairs into {}",
        report.train_pairs,
        report.test_pairs,
        config.layout.root().display()
    );
    Ok(())
}
