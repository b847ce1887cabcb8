use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = afisha_api::Args::parse();

	afisha_api::run(args).await
}
