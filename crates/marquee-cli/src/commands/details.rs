use std::path::Path;

use marquee_core::api::MovieSearch;

use crate::commands::common::{
    build_client, format_details_lines, load_config, open_database, parse_movie_id,
};
use crate::error::CliError;

pub async fn run_details(
    id: &str,
    as_json: bool,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let movie_id = parse_movie_id(id)?;
    let config = load_config(config_path)?;
    let client = build_client(&config)?;
    let db = open_database(db_path)?;

    let details = client.details(&movie_id).await?;
    let is_favorite = db.is_favorite(&movie_id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        for line in format_details_lines(&details, is_favorite) {
            println!("{line}");
        }
    }

    Ok(())
}
