use dynform_input::mask_check;

#[derive(clap::Args)]
pub struct Args {
    /// Dotted-decimal address
    pub address: String,
    /// Dotted-decimal network mask
    pub mask: String,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let inside = mask_check(&args.address, &args.mask);
    println!("{inside}");
    Ok(())
}
