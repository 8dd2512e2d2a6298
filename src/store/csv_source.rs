use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Catalog, Item, ItemId, User, UserId},
};

use super::RatingSource;

/// Loads MovieLens-style delimited files
///
/// Items are `id,name[,...]`, ratings are `user_id,item_id,score[,...]`.
/// Malformed records are skipped and counted. The rating file is expected to
/// be grouped by user: reading stops at the first record that would introduce
/// a user beyond `max_users`.
#[derive(Debug, Clone)]
pub struct CsvRatingSource {
    items_path: PathBuf,
    ratings_path: PathBuf,
    has_headers: bool,
    max_users: usize,
}

/// Outcome of parsing one file
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    /// Records dropped as malformed or pointing outside the catalog
    pub skipped: usize,
}

impl CsvRatingSource {
    pub fn new(items_path: impl Into<PathBuf>, ratings_path: impl Into<PathBuf>) -> Self {
        Self {
            items_path: items_path.into(),
            ratings_path: ratings_path.into(),
            has_headers: true,
            max_users: usize::MAX,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.items_path, &config.ratings_path)
            .with_headers(config.csv_has_headers)
            .with_max_users(config.max_users)
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_max_users(mut self, max_users: usize) -> Self {
        self.max_users = max_users;
        self
    }
}

#[async_trait::async_trait]
impl RatingSource for CsvRatingSource {
    async fn load_items(&self) -> AppResult<Catalog> {
        let bytes = read_source(&self.items_path).await?;
        let parsed = parse_items(bytes.as_slice(), self.has_headers);

        tracing::info!(
            path = %self.items_path.display(),
            items = parsed.value.len(),
            skipped = parsed.skipped,
            "Items loaded"
        );

        Ok(parsed.value)
    }

    async fn load_ratings(&self, catalog: &Catalog) -> AppResult<Vec<User>> {
        let bytes = read_source(&self.ratings_path).await?;
        let parsed = parse_ratings(bytes.as_slice(), self.has_headers, catalog, self.max_users);

        tracing::info!(
            path = %self.ratings_path.display(),
            users = parsed.value.len(),
            skipped = parsed.skipped,
            "Ratings loaded"
        );

        Ok(parsed.value)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

async fn read_source(path: &Path) -> AppResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| AppError::SourceUnavailable {
            path: path.display().to_string(),
            source,
        })
}

fn reader<R: Read>(input: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Parses an item file; a repeated id keeps the later record
pub fn parse_items<R: Read>(input: R, has_headers: bool) -> Parsed<Catalog> {
    let mut catalog = Catalog::new();
    let mut skipped = 0usize;

    for (row, record) in reader(input, has_headers).records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(row, error = %e, "Unable to read item record");
                skipped += 1;
                continue;
            }
        };

        let id = record.get(0).and_then(|s| s.parse::<i64>().ok());
        let (Some(id), Some(name)) = (id, record.get(1)) else {
            tracing::debug!(row, "Skipping malformed item record");
            skipped += 1;
            continue;
        };

        catalog.insert(ItemId(id), Item::new(ItemId(id), name));
    }

    Parsed {
        value: catalog,
        skipped,
    }
}

/// Parses a rating file into users in first-appearance order
///
/// Ratings for items not in `catalog`, unparsable fields and non-finite
/// scores are skipped. A repeated `(user, item)` keeps the later score.
pub fn parse_ratings<R: Read>(
    input: R,
    has_headers: bool,
    catalog: &Catalog,
    max_users: usize,
) -> Parsed<Vec<User>> {
    let mut users: IndexMap<UserId, User> = IndexMap::new();
    let mut skipped = 0usize;

    for (row, record) in reader(input, has_headers).records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(row, error = %e, "Unable to read rating record");
                skipped += 1;
                continue;
            }
        };

        let user_id = record.get(0).and_then(|s| s.parse::<i64>().ok());
        let item_id = record.get(1).and_then(|s| s.parse::<i64>().ok());
        let score = record
            .get(2)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|score| score.is_finite());

        let (Some(user_id), Some(item_id), Some(score)) = (user_id, item_id, score) else {
            tracing::debug!(row, "Skipping malformed rating record");
            skipped += 1;
            continue;
        };

        let (user_id, item_id) = (UserId(user_id), ItemId(item_id));

        if !catalog.contains_key(&item_id) {
            skipped += 1;
            continue;
        }

        if !users.contains_key(&user_id) && users.len() >= max_users {
            tracing::info!(max_users, row, "User limit reached, ignoring remaining ratings");
            break;
        }

        users
            .entry(user_id)
            .or_insert_with(|| User::new(user_id))
            .rate(item_id, score);
    }

    Parsed {
        value: users.into_values().collect(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
movieId,title,genres
1,Toy Story (1995),Adventure|Animation
2,Jumanji (1995),Adventure|Children
3,\"American President, The (1995)\",Comedy|Drama
not-a-number,Broken,Drama
4
";

    const RATINGS: &str = "\
userId,movieId,rating,timestamp
7,1,4.0,964982703
7,3,4.5,964981247
7,99,5.0,964982224
7,2,abc,964983815
5,2,3.0,964982931
5,1,NaN,964982400
5,2,3.5,964982931
9,1,2.0,964982224
";

    fn catalog() -> Catalog {
        parse_items(MOVIES.as_bytes(), true).value
    }

    #[test]
    fn test_parse_items() {
        let parsed = parse_items(MOVIES.as_bytes(), true);
        assert_eq!(parsed.value.len(), 3);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(
            parsed.value.get(&ItemId(3)).map(|i| i.name.as_str()),
            Some("American President, The (1995)")
        );
    }

    #[test]
    fn test_header_is_skipped_when_not_declared() {
        let parsed = parse_items(MOVIES.as_bytes(), false);
        assert_eq!(parsed.value.len(), 3);
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn test_parse_ratings_keeps_file_order() {
        let parsed = parse_ratings(RATINGS.as_bytes(), true, &catalog(), usize::MAX);
        let ids: Vec<UserId> = parsed.value.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![UserId(7), UserId(5), UserId(9)]);
        // unknown item, bad score, NaN score
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn test_parse_ratings_values() {
        let parsed = parse_ratings(RATINGS.as_bytes(), true, &catalog(), usize::MAX);
        let user7 = &parsed.value[0];
        assert_eq!(user7.ratings.len(), 2);
        assert_eq!(user7.rating_for(ItemId(3)), Some(4.5));
        assert!(!user7.has_rated(ItemId(99)));

        // later duplicate wins
        let user5 = &parsed.value[1];
        assert_eq!(user5.rating_for(ItemId(2)), Some(3.5));
        assert!(!user5.has_rated(ItemId(1)));
    }

    #[test]
    fn test_parse_ratings_stops_at_user_limit() {
        let parsed = parse_ratings(RATINGS.as_bytes(), true, &catalog(), 2);
        let ids: Vec<UserId> = parsed.value.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![UserId(7), UserId(5)]);
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let source = CsvRatingSource::new(
            "/nonexistent/cinematch/movies.csv",
            "/nonexistent/cinematch/ratings.csv",
        );
        let result = source.load_items().await;
        assert!(matches!(result, Err(AppError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let dir = std::env::temp_dir().join(format!("cinematch-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let items_path = dir.join("movies.csv");
        let ratings_path = dir.join("ratings.csv");
        tokio::fs::write(&items_path, MOVIES).await.unwrap();
        tokio::fs::write(&ratings_path, RATINGS).await.unwrap();

        let source = CsvRatingSource::new(&items_path, &ratings_path).with_max_users(10);
        let store = crate::store::load_store(&source).await.unwrap();

        assert_eq!(store.catalog().len(), 3);
        assert_eq!(store.users().len(), 3);
        assert_eq!(store.rating_count(), 4);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
