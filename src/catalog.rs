use std::str::FromStr;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::{
    auth,
    entities::catalog::{movie, user},
    error::{AppError, AppResult},
    models::{Credentials, Movie, MovieQuery, MovieRequest, RELEASE_DATE_FORMAT},
};

/// Columns a movie listing may be sorted by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortField {
    Id,
    Title,
    Genre,
    ReleaseDate,
    Rating,
    Director,
}

impl SortField {
    fn column(self) -> movie::Column {
        match self {
            SortField::Id => movie::Column::Id,
            SortField::Title => movie::Column::Title,
            SortField::Genre => movie::Column::Genre,
            SortField::ReleaseDate => movie::Column::ReleaseDate,
            SortField::Rating => movie::Column::Rating,
            SortField::Director => movie::Column::Director,
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "genre" => Ok(SortField::Genre),
            "release_date" => Ok(SortField::ReleaseDate),
            "rating" => Ok(SortField::Rating),
            "director" => Ok(SortField::Director),
            other => Err(AppError::BadRequest(format!("cannot sort by '{other}'"))),
        }
    }
}

#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn register(&self, creds: &Credentials) -> AppResult<user::Model> {
        let username = creds.username.trim();
        if username.is_empty() || creds.password.is_empty() {
            return Err(AppError::BadRequest("username and password are required".to_string()));
        }

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(AppError::Conflict(format!("username '{username}' is already taken")));
        }

        let user = user::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            password: Set(auth::hash_password(&creds.password)?),
        }
        .insert(&self.db)
        .await?;

        debug!(user_id = user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// `None` covers both an unknown username and a wrong password.
    pub async fn authenticate(&self, creds: &Credentials) -> AppResult<Option<user::Model>> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(creds.username.trim()))
            .one(&self.db)
            .await?;

        Ok(user.filter(|u| auth::verify_password(&creds.password, &u.password)))
    }

    pub async fn list_movies(&self, query: &MovieQuery) -> AppResult<Vec<Movie>> {
        let mut select = movie::Entity::find();

        if let Some(title) = non_empty(&query.title) {
            select = select.filter(movie::Column::Title.contains(title));
        }
        if let Some(genre) = non_empty(&query.genre) {
            select = select.filter(movie::Column::Genre.eq(genre));
        }
        if let Some(director) = non_empty(&query.director) {
            select = select.filter(movie::Column::Director.contains(director));
        }

        select = match non_empty(&query.sort) {
            Some(sort) => {
                let field: SortField = sort.parse()?;
                let order = match query.order.as_deref() {
                    Some(o) if o.eq_ignore_ascii_case("desc") => Order::Desc,
                    _ => Order::Asc,
                };
                select.order_by(field.column(), order)
            },
            None => select.order_by_asc(movie::Column::Id),
        };

        let rows = select.all(&self.db).await?;
        debug!(count = rows.len(), ?query, "listed movies");
        rows.into_iter().map(Movie::try_from).collect()
    }

    pub async fn create_movie(&self, req: &MovieRequest) -> AppResult<Movie> {
        let release_date = req.validate()?;

        let row = movie::ActiveModel {
            id: NotSet,
            title: Set(req.title.trim().to_string()),
            genre: Set(req.genre.trim().to_string()),
            release_date: Set(release_date.strftime(RELEASE_DATE_FORMAT).to_string()),
            rating: Set(req.rating),
            director: Set(req.director.trim().to_string()),
        }
        .insert(&self.db)
        .await?;

        debug!(movie_id = row.id, title = %row.title, "created movie");
        Movie::try_from(row)
    }

    pub async fn update_movie(&self, id: i32, req: &MovieRequest) -> AppResult<Movie> {
        let release_date = req.validate()?;

        let changes = movie::ActiveModel {
            id: NotSet,
            title: Set(req.title.trim().to_string()),
            genre: Set(req.genre.trim().to_string()),
            release_date: Set(release_date.strftime(RELEASE_DATE_FORMAT).to_string()),
            rating: Set(req.rating),
            director: Set(req.director.trim().to_string()),
        };

        let result = movie::Entity::update_many()
            .set(changes)
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }

        debug!(movie_id = id, "updated movie");
        Ok(Movie {
            id,
            title: req.title.trim().to_string(),
            genre: req.genre.trim().to_string(),
            release_date,
            rating: req.rating,
            director: req.director.trim().to_string(),
        })
    }

    pub async fn delete_movie(&self, id: i32) -> AppResult<()> {
        let result = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }
        debug!(movie_id = id, "deleted movie");
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn catalog() -> Catalog {
        Catalog::new(db::connect_catalog("sqlite::memory:").await.unwrap())
    }

    fn request(title: &str, genre: &str, date: &str, rating: f64, director: &str) -> MovieRequest {
        MovieRequest {
            title: title.to_string(),
            genre: genre.to_string(),
            release_date: date.to_string(),
            rating,
            director: director.to_string(),
        }
    }

    async fn seeded() -> Catalog {
        let catalog = catalog().await;
        for req in [
            request("Inception", "Sci-Fi", "2010-07-16", 8.8, "Christopher Nolan"),
            request("The Shawshank Redemption", "Drama", "1994-09-23", 9.3, "Frank Darabont"),
            request("The Dark Knight", "Action", "2008-07-18", 9.0, "Christopher Nolan"),
            request("Forrest Gump", "Drama", "1994-07-06", 8.8, "Robert Zemeckis"),
        ] {
            catalog.create_movie(&req).await.unwrap();
        }
        catalog
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let catalog = catalog().await;
        let creds = Credentials { username: "alice".into(), password: "s3cret".into() };
        let user = catalog.register(&creds).await.unwrap();
        assert_ne!(user.password, "s3cret");

        let found = catalog.authenticate(&creds).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let wrong = Credentials { username: "alice".into(), password: "nope".into() };
        assert!(catalog.authenticate(&wrong).await.unwrap().is_none());

        let unknown = Credentials { username: "bob".into(), password: "s3cret".into() };
        assert!(catalog.authenticate(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let catalog = catalog().await;
        let creds = Credentials { username: "alice".into(), password: "a".into() };
        catalog.register(&creds).await.unwrap();
        assert!(matches!(catalog.register(&creds).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn empty_credentials_rejected() {
        let catalog = catalog().await;
        let creds = Credentials { username: " ".into(), password: "a".into() };
        assert!(matches!(catalog.register(&creds).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn filters_by_title_genre_and_director() {
        let catalog = seeded().await;

        let q = MovieQuery { title: Some("the".into()), ..Default::default() };
        let found = catalog.list_movies(&q).await.unwrap();
        assert_eq!(titles(&found), ["The Shawshank Redemption", "The Dark Knight"]);

        let q = MovieQuery { genre: Some("Drama".into()), ..Default::default() };
        assert_eq!(catalog.list_movies(&q).await.unwrap().len(), 2);

        // Genre is an exact match, unlike title and director.
        let q = MovieQuery { genre: Some("Dram".into()), ..Default::default() };
        assert!(catalog.list_movies(&q).await.unwrap().is_empty());

        let q = MovieQuery { director: Some("nolan".into()), ..Default::default() };
        let found = catalog.list_movies(&q).await.unwrap();
        assert_eq!(titles(&found), ["Inception", "The Dark Knight"]);
    }

    #[tokio::test]
    async fn sorts_by_whitelisted_column() {
        let catalog = seeded().await;

        let q = MovieQuery {
            sort: Some("release_date".into()),
            order: Some("desc".into()),
            ..Default::default()
        };
        let found = catalog.list_movies(&q).await.unwrap();
        assert_eq!(
            titles(&found),
            ["Inception", "The Dark Knight", "The Shawshank Redemption", "Forrest Gump"]
        );

        let q = MovieQuery { sort: Some("title".into()), ..Default::default() };
        let found = catalog.list_movies(&q).await.unwrap();
        assert_eq!(found[0].title, "Forrest Gump");

        let q = MovieQuery { sort: Some("title; DROP TABLE movies".into()), ..Default::default() };
        assert!(matches!(catalog.list_movies(&q).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn rejects_bad_release_date() {
        let catalog = catalog().await;
        let err = catalog
            .create_movie(&request("Heat", "Crime", "16/07/1995", 8.3, "Michael Mann"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid date format. Use YYYY-MM-DD");
    }

    #[tokio::test]
    async fn title_and_release_date_are_unique() {
        let catalog = catalog().await;
        let req = request("Heat", "Crime", "1995-12-15", 8.3, "Michael Mann");
        catalog.create_movie(&req).await.unwrap();
        assert!(matches!(catalog.create_movie(&req).await, Err(AppError::Conflict(_))));

        let remake = request("Heat", "Crime", "2025-12-15", 7.0, "Someone Else");
        catalog.create_movie(&remake).await.unwrap();
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let catalog = seeded().await;
        let req = request("Inception", "Sci-Fi", "2010-07-16", 9.1, "Christopher Nolan");

        let updated = catalog.update_movie(1, &req).await.unwrap();
        assert_eq!(updated.rating, 9.1);

        assert!(matches!(catalog.update_movie(999, &req).await, Err(AppError::NotFound(_))));

        catalog.delete_movie(1).await.unwrap();
        assert!(matches!(catalog.delete_movie(1).await, Err(AppError::NotFound(_))));
    }
}
