use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = afisha_loader::Args::parse();

	afisha_loader::run(args).await
}
