use anyhow::Result;
use clap::Parser;
use enhance_core::{layout::project_path, DatasetLayout};
use enhance_tools::{
    cli::{init_logging, ManifestArgs},
    manifest,
};

fn main() -> Result<()> {
    init_logging();
    let args = ManifestArgs::parse();

    let layout = DatasetLayout::under(&args.root.root);
    let output = project_path(&args.root.root, &args.output);
    manifest::run(&layout, &output)?;
    Ok(())
}
