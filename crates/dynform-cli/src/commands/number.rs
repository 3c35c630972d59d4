use dynform_input::{NumberKind, filter_number};

#[derive(clap::Args)]
pub struct Args {
    /// Text as typed into the control
    #[arg(allow_hyphen_values = true)]
    pub text: String,
    /// Filter as a decimal rather than an integer
    #[arg(short, long)]
    pub float: bool,
    /// Value of the control's `min` attribute
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<f64>,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let kind = if args.float {
        NumberKind::Float
    } else {
        NumberKind::Int
    };
    println!("{}", filter_number(&args.text, kind, args.min));
    Ok(())
}
