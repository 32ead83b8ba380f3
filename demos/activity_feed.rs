//! Authorizes against Strava once, keeps the token in a JSON file, and prints the latest
//! activities with their decoded route geometry.
//!
//! Set `STRAVA_CLIENT_ID`, `STRAVA_CLIENT_SECRET`, and `STRAVA_REDIRECT_URI`. On the first run
//! the consent URL is printed; paste the full redirect URL back into the terminal.

// std
use std::{env, io, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use stravakit::{
	config::StravaConfig,
	endpoint::Pagination,
	flows::ReqwestStravaClient,
	models::StravaItem,
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = StravaConfig::builder(
		env::var("STRAVA_CLIENT_ID").map_err(|_| eyre!("STRAVA_CLIENT_ID is not set"))?,
		env::var("STRAVA_CLIENT_SECRET").map_err(|_| eyre!("STRAVA_CLIENT_SECRET is not set"))?,
	)
	.redirect_uri(Url::parse(
		&env::var("STRAVA_REDIRECT_URI")
			.unwrap_or_else(|_| "http://localhost/exchange_token".into()),
	)?)
	.scopes(["read", "activity:read_all"])
	.build()?;
	let token_file = env::temp_dir().join("stravakit_activity_feed.json");
	let store: Arc<dyn TokenStore> = Arc::new(FileStore::open(&token_file)?);
	let client = ReqwestStravaClient::new(store, config)?;

	if !client.is_authenticated().await {
		let request = client.authorization_request()?;

		println!("Open {} and approve access.", request.web_url);
		println!("Paste the redirect URL:");

		let mut line = String::new();

		io::stdin().read_line(&mut line)?;
		client.handle_redirect(&Url::parse(line.trim())?).await?;
		println!("Token stored at {}.", token_file.display());
	}

	let athlete = client.get_athlete().await?;

	println!("Signed in as {}.", athlete.display_name().unwrap_or_else(|| "unknown".into()));

	for activity in client.list_activities(Pagination::new(1, 10)).await? {
		let points = activity.decode_polyline()?.map(|path| path.len()).unwrap_or_default();

		println!(
			"{:<40} {:>10} {:>8} {:>5} points",
			activity.name().unwrap_or("(untitled)"),
			activity.formatted_distance(),
			activity.formatted_elevation(),
			points,
		);
	}

	Ok(())
}
