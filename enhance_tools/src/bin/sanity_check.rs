use anyhow::Result;
use clap::Parser;
use enhance_tools::{
    cli::{init_logging, SanityArgs},
    sanity::{self, SanityConfig},
};

fn main() -> Result<()> {
    init_logging();
    let args = SanityArgs::parse();

    let config = SanityConfig {
        num_samples: args.samples,
        seed: args.seed,
        ..SanityConfig::for_root(&args.root.root)
    };
    sanity::run(&config)?;
    Ok(())
}
