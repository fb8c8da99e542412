use migration::{BoxOfficeMigrator, CatalogMigrator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, Set, Statement,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::{
    auth,
    entities::{
        box_office::{customer, movie as feature, screening},
        catalog::user,
    },
    error::AppResult,
};

const PRAGMAS: [&str; 3] =
    ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA foreign_keys=ON"];

pub async fn connect_catalog(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = connect(database_url).await?;
    CatalogMigrator::up(&db, None).await?;
    Ok(db)
}

pub async fn connect_box_office(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = connect(database_url).await?;
    BoxOfficeMigrator::up(&db, None).await?;
    Ok(db)
}

async fn connect(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    // Every pooled connection to `:memory:` would open its own empty database.
    if database_url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;

    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    Ok(db)
}

/// Adds the demo account `testuser` / `password` unless it already exists.
pub async fn seed_catalog(db: &DatabaseConnection) -> AppResult<()> {
    let exists = user::Entity::find()
        .filter(user::Column::Username.eq("testuser"))
        .count(db)
        .await?
        > 0;
    if exists {
        return Ok(());
    }

    user::ActiveModel {
        username: Set("testuser".to_string()),
        password: Set(auth::hash_password("password")?),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username = "testuser", "seeded demo user");
    Ok(())
}

const SEED_MOVIES: [(&str, i32, feature::AgeRating); 5] = [
    ("Dune: Part Two", 166, feature::AgeRating::Twelve),
    ("Oppenheimer", 180, feature::AgeRating::Sixteen),
    ("Spider-Man: Across the Spider-Verse", 140, feature::AgeRating::Six),
    ("Barbie", 114, feature::AgeRating::Twelve),
    ("Leave the World Behind", 138, feature::AgeRating::Sixteen),
];

// (index into SEED_MOVIES, screen time, hall, price)
const SEED_SCREENINGS: [(usize, &str, i32, f64); 5] = [
    (0, "2024-03-20 18:00:00", 1, 450.0),
    (0, "2024-03-20 21:00:00", 2, 500.0),
    (1, "2024-03-20 17:30:00", 3, 400.0),
    (2, "2024-03-20 15:00:00", 1, 350.0),
    (3, "2024-03-20 19:30:00", 2, 380.0),
];

/// Fills an empty box office database with a small demo program.
pub async fn seed_box_office(db: &DatabaseConnection) -> AppResult<()> {
    if feature::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let mut movie_ids = Vec::with_capacity(SEED_MOVIES.len());
    for (title, duration, age_rating) in SEED_MOVIES {
        let movie = feature::ActiveModel {
            title: Set(title.to_string()),
            duration: Set(duration),
            age_rating: Set(age_rating),
            ..Default::default()
        }
        .insert(db)
        .await?;
        movie_ids.push(movie.id);
    }

    for (movie, screen_time, hall_number, price) in SEED_SCREENINGS {
        screening::ActiveModel {
            movie_id: Set(movie_ids[movie]),
            screen_time: Set(screen_time.to_string()),
            hall_number: Set(hall_number),
            price: Set(price),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    customer::ActiveModel {
        name: Set("Zhambal Ayurov".to_string()),
        email: Set("zhambal@mail.com".to_string()),
        phone: Set(Some("+7-900-111-22-33".to_string())),
        loyalty_points: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        movies = SEED_MOVIES.len(),
        screenings = SEED_SCREENINGS.len(),
        customers = 1,
        "seeded box office data"
    );
    Ok(())
}
