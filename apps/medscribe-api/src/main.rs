use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	dotenvy::dotenv().ok();

	let args = medscribe_api::Args::parse();

	medscribe_api::run(args).await
}
