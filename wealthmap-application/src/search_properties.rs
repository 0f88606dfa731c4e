use super::{
    track::{details, track},
    *,
};

/// Searches properties and records the query in the activity log.
pub fn search_properties<D: Db>(
    db: &D,
    actor: &Actor,
    request: &usecases::SearchRequest,
) -> Result<Vec<Property>> {
    let results = usecases::search_properties(db, request).map_err(|err| {
        warn!("Search of user {} failed: {err}", actor.user_id);
        err
    })?;
    let filters = &request.filters;
    let mut details = details([
        ("query", request.text().unwrap_or_default().to_owned()),
        ("results_count", results.len().to_string()),
    ]);
    for (key, value) in [
        ("min_value_usd", filters.min_value_usd.map(|v| v.to_string())),
        ("max_value_usd", filters.max_value_usd.map(|v| v.to_string())),
        ("min_size_sqft", filters.min_size_sqft.map(|v| v.to_string())),
        ("max_size_sqft", filters.max_size_sqft.map(|v| v.to_string())),
        ("zip_code", filters.zip_code().map(ToOwned::to_owned)),
    ] {
        if let Some(value) = value {
            details.insert(key.to_owned(), value);
        }
    }
    track(db, &actor.user_id, ActivityType::Search, details);
    Ok(results)
}
