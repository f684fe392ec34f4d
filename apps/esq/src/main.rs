use clap::Parser;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = esq::Args::parse();
	esq::run(args)
}
