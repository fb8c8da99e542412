use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        box_office::{customer, movie as feature, screening, ticket},
        catalog::movie,
    },
    error::{AppError, AppResult},
};

pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Layout of every timestamp column in the box office database.
pub const STORED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Layout operators type screening times in.
pub const ENTRY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub release_date: Date,
    pub rating: f64,
    pub director: String,
}

impl TryFrom<movie::Model> for Movie {
    type Error = AppError;

    fn try_from(row: movie::Model) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            title: row.title,
            genre: row.genre,
            release_date: Date::strptime(RELEASE_DATE_FORMAT, &row.release_date)?,
            rating: row.rating,
            director: row.director,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MovieRequest {
    pub title: String,
    pub genre: String,
    pub release_date: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub director: String,
}

impl MovieRequest {
    /// Checks the request and returns the parsed release date.
    pub fn validate(&self) -> AppResult<Date> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        if self.genre.trim().is_empty() {
            return Err(AppError::BadRequest("genre is required".to_string()));
        }
        Date::strptime(RELEASE_DATE_FORMAT, self.release_date.trim()).map_err(|_| {
            AppError::BadRequest("Invalid date format. Use YYYY-MM-DD".to_string())
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Screening {
    pub id: i32,
    pub movie_id: i32,
    pub screen_time: DateTime,
    pub hall_number: i32,
    pub price: f64,
}

impl TryFrom<screening::Model> for Screening {
    type Error = AppError;

    fn try_from(row: screening::Model) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            movie_id: row.movie_id,
            screen_time: DateTime::strptime(STORED_TIME_FORMAT, &row.screen_time)?,
            hall_number: row.hall_number,
            price: row.price,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    pub id: i32,
    pub screening_id: i32,
    pub seat_number: i32,
    pub purchase_time: DateTime,
    pub customer_name: String,
}

impl TryFrom<ticket::Model> for Ticket {
    type Error = AppError;

    fn try_from(row: ticket::Model) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            screening_id: row.screening_id,
            seat_number: row.seat_number,
            purchase_time: DateTime::strptime(STORED_TIME_FORMAT, &row.purchase_time)?,
            customer_name: row.customer_name,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewMovie {
    pub title: String,
    pub duration: i32,
    pub age_rating: feature::AgeRating,
}

#[derive(Clone, Debug)]
pub struct NewScreening {
    pub movie_id: i32,
    pub screen_time: DateTime,
    pub hall_number: i32,
    pub price: f64,
}

#[derive(Clone, Debug)]
pub struct NewTicket {
    pub screening_id: i32,
    pub seat_number: i32,
    pub customer_name: String,
}

#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Everything the report screen lists.
#[derive(Clone, Debug)]
pub struct Overview {
    pub movies: Vec<feature::Model>,
    pub screenings: Vec<Screening>,
    pub customers: Vec<customer::Model>,
}
