use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::{
    entities::box_office::{customer, movie, screening, ticket},
    error::{AppError, AppResult},
    models::{
        NewCustomer, NewMovie, NewScreening, NewTicket, Overview, STORED_TIME_FORMAT, Screening,
        Ticket,
    },
};

/// Seats per hall; seats are numbered from 1.
pub const HALL_CAPACITY: i32 = 50;

/// Data access for the console tool: movies, screenings, tickets and customers.
#[derive(Clone)]
pub struct BoxOffice {
    db: DatabaseConnection,
}

impl BoxOffice {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create_movie(&self, new: NewMovie) -> AppResult<movie::Model> {
        if new.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }

        let movie = movie::ActiveModel {
            id: NotSet,
            title: Set(new.title.trim().to_string()),
            duration: Set(new.duration),
            age_rating: Set(new.age_rating),
        }
        .insert(&self.db)
        .await?;

        debug!(movie_id = movie.id, title = %movie.title, "created movie");
        Ok(movie)
    }

    pub async fn all_movies(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Title).all(&self.db).await?)
    }

    pub async fn movie_by_id(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie with ID {id} not found")))
    }

    pub async fn update_movie(&self, movie: &movie::Model) -> AppResult<()> {
        let changes = movie::ActiveModel {
            id: NotSet,
            title: Set(movie.title.clone()),
            duration: Set(movie.duration),
            age_rating: Set(movie.age_rating),
        };

        let result = movie::Entity::update_many()
            .set(changes)
            .filter(movie::Column::Id.eq(movie.id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("movie with ID {} not found", movie.id)));
        }
        Ok(())
    }

    /// Screenings and their tickets go with the movie.
    pub async fn delete_movie(&self, id: i32) -> AppResult<()> {
        let result = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("movie with ID {id} not found")));
        }
        debug!(movie_id = id, "deleted movie");
        Ok(())
    }

    pub async fn create_screening(&self, new: NewScreening) -> AppResult<Screening> {
        let row = screening::ActiveModel {
            id: NotSet,
            movie_id: Set(new.movie_id),
            screen_time: Set(new.screen_time.strftime(STORED_TIME_FORMAT).to_string()),
            hall_number: Set(new.hall_number),
            price: Set(new.price),
        }
        .insert(&self.db)
        .await?;

        debug!(screening_id = row.id, movie_id = row.movie_id, "created screening");
        Screening::try_from(row)
    }

    pub async fn all_screenings(&self) -> AppResult<Vec<Screening>> {
        screening::Entity::find()
            .order_by_asc(screening::Column::ScreenTime)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Screening::try_from)
            .collect()
    }

    pub async fn screenings_for_movie(&self, movie_id: i32) -> AppResult<Vec<Screening>> {
        screening::Entity::find()
            .filter(screening::Column::MovieId.eq(movie_id))
            .order_by_asc(screening::Column::ScreenTime)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Screening::try_from)
            .collect()
    }

    pub async fn delete_screening(&self, id: i32) -> AppResult<()> {
        let result = screening::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("screening with ID {id} not found")));
        }
        debug!(screening_id = id, "deleted screening");
        Ok(())
    }

    pub async fn buy_ticket(&self, new: NewTicket) -> AppResult<Ticket> {
        if !(1..=HALL_CAPACITY).contains(&new.seat_number) {
            return Err(AppError::BadRequest(format!(
                "seat {} does not exist, seats are numbered 1 to {HALL_CAPACITY}",
                new.seat_number
            )));
        }

        let taken = ticket::Entity::find()
            .filter(ticket::Column::ScreeningId.eq(new.screening_id))
            .filter(ticket::Column::SeatNumber.eq(new.seat_number))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(AppError::Conflict(format!("seat {} is already taken", new.seat_number)));
        }

        let purchase_time = jiff::Timestamp::now().strftime(STORED_TIME_FORMAT).to_string();
        let row = ticket::ActiveModel {
            id: NotSet,
            screening_id: Set(new.screening_id),
            seat_number: Set(new.seat_number),
            purchase_time: Set(purchase_time),
            customer_name: Set(new.customer_name.trim().to_string()),
        }
        .insert(&self.db)
        .await?;

        debug!(
            ticket_id = row.id,
            screening_id = row.screening_id,
            seat = row.seat_number,
            "sold ticket"
        );
        Ticket::try_from(row)
    }

    pub async fn tickets_for_screening(&self, screening_id: i32) -> AppResult<Vec<Ticket>> {
        ticket::Entity::find()
            .filter(ticket::Column::ScreeningId.eq(screening_id))
            .order_by_asc(ticket::Column::SeatNumber)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Ticket::try_from)
            .collect()
    }

    pub async fn return_ticket(&self, id: i32) -> AppResult<()> {
        let result = ticket::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("ticket with ID {id} not found")));
        }
        debug!(ticket_id = id, "returned ticket");
        Ok(())
    }

    /// Free seats of a screening in ascending order. The screening id is not
    /// checked, so an unknown screening reports every seat as free.
    pub async fn available_seats(&self, screening_id: i32) -> AppResult<Vec<i32>> {
        let taken: HashSet<i32> = ticket::Entity::find()
            .select_only()
            .column(ticket::Column::SeatNumber)
            .filter(ticket::Column::ScreeningId.eq(screening_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(free_seats(HALL_CAPACITY, &taken))
    }

    pub async fn create_customer(&self, new: NewCustomer) -> AppResult<customer::Model> {
        let name = new.name.trim();
        let email = new.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(AppError::BadRequest("name and email are required".to_string()));
        }

        let customer = customer::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(new.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty())),
            loyalty_points: Set(0),
        }
        .insert(&self.db)
        .await?;

        debug!(customer_id = customer.id, "created customer");
        Ok(customer)
    }

    pub async fn all_customers(&self) -> AppResult<Vec<customer::Model>> {
        Ok(customer::Entity::find().order_by_asc(customer::Column::Name).all(&self.db).await?)
    }

    pub async fn customer_by_email(&self, email: &str) -> AppResult<customer::Model> {
        customer::Entity::find()
            .filter(customer::Column::Email.eq(email.trim()))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer with email {email} not found")))
    }

    /// Writes name, phone and loyalty points; the email is the lookup key and stays put.
    pub async fn update_customer(&self, customer: &customer::Model) -> AppResult<()> {
        let changes = customer::ActiveModel {
            name: Set(customer.name.clone()),
            phone: Set(customer.phone.clone()),
            loyalty_points: Set(customer.loyalty_points),
            ..Default::default()
        };

        let result = customer::Entity::update_many()
            .set(changes)
            .filter(customer::Column::Id.eq(customer.id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("customer with ID {} not found", customer.id)));
        }
        Ok(())
    }

    pub async fn delete_customer(&self, id: i32) -> AppResult<()> {
        let result = customer::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("customer with ID {id} not found")));
        }
        debug!(customer_id = id, "deleted customer");
        Ok(())
    }

    pub async fn overview(&self) -> AppResult<Overview> {
        Ok(Overview {
            movies: self.all_movies().await?,
            screenings: self.all_screenings().await?,
            customers: self.all_customers().await?,
        })
    }
}

fn free_seats(capacity: i32, taken: &HashSet<i32>) -> Vec<i32> {
    (1..=capacity).filter(|seat| !taken.contains(seat)).collect()
}
