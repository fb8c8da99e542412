//! Numbered text menus driving the box office.
//!
//! Input and output are generic so the console binary hands in stdin/stdout
//! and tests hand in byte buffers. A store error is printed and the menu
//! carries on; only I/O failures end the session. Closing the input ends it
//! cleanly.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use jiff::civil::DateTime;

use crate::{
    box_office::BoxOffice,
    entities::box_office::movie::AgeRating,
    error::AppError,
    models::{ENTRY_TIME_FORMAT, NewCustomer, NewMovie, NewScreening, NewTicket},
    report::{self, RULE},
};

#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

type Step = anyhow::Result<()>;

pub struct Menu<R, W> {
    office: BoxOffice,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(office: BoxOffice, input: R, out: W) -> Self {
        Self { office, input, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run(&mut self) -> Step {
        match self.main_menu().await {
            Err(err) if err.is::<InputClosed>() => {
                writeln!(self.out)?;
                Ok(())
            },
            other => other,
        }
    }

    async fn main_menu(&mut self) -> Step {
        loop {
            self.say("\n=== CINEMA MAIN MENU ===")?;
            self.say("1. Manage movies")?;
            self.say("2. Manage screenings")?;
            self.say("3. Sell tickets")?;
            self.say("4. Manage customers")?;
            self.say("5. Show all data")?;
            self.say("6. Exit")?;

            match self.ask("Choose an action (1-6): ")?.as_str() {
                "1" => self.movies_menu().await?,
                "2" => self.screenings_menu().await?,
                "3" => self.tickets_menu().await?,
                "4" => self.customers_menu().await?,
                "5" => self.show_overview().await?,
                "6" => {
                    self.say("Exiting...")?;
                    return Ok(());
                },
                _ => self.say("Invalid choice. Please choose 1 to 6.")?,
            }

            self.ask("\nPress Enter to continue...")?;
        }
    }

    async fn movies_menu(&mut self) -> Step {
        loop {
            self.say("\n=== MOVIES ===")?;
            self.say("1. Show all movies")?;
            self.say("2. Add a movie")?;
            self.say("3. Update a movie")?;
            self.say("4. Delete a movie")?;
            self.say("5. Back to main menu")?;

            match self.ask("Choose an action (1-5): ")?.as_str() {
                "1" => self.show_movies().await?,
                "2" => self.add_movie().await?,
                "3" => self.update_movie().await?,
                "4" => self.delete_movie().await?,
                "5" => return Ok(()),
                _ => self.say("Invalid choice.")?,
            }
        }
    }

    async fn show_movies(&mut self) -> Step {
        let movies = match self.office.all_movies().await {
            Ok(movies) => movies,
            Err(err) => return self.error(err),
        };

        self.say(&format!("\nAll movies:\n{RULE}"))?;
        for movie in &movies {
            self.say(&report::movie_line(movie))?;
        }
        self.say(&format!("Movies in total: {}", movies.len()))
    }

    async fn add_movie(&mut self) -> Step {
        self.say("\nNew movie:")?;
        let title = self.ask("Title: ")?;
        let Some(duration) = self.ask_number::<i32>("Duration in minutes: ", "duration")? else {
            return Ok(());
        };
        let rating = self.ask("Age rating (0+, 6+, 12+, 16+, 18+): ")?;
        let age_rating = match rating.parse::<AgeRating>() {
            Ok(rating) => rating,
            Err(err) => return self.error(err),
        };

        match self.office.create_movie(NewMovie { title, duration, age_rating }).await {
            Ok(movie) => self.say(&format!("Movie '{}' added with ID {}", movie.title, movie.id)),
            Err(err) => self.error(err),
        }
    }

    async fn update_movie(&mut self) -> Step {
        let Some(id) = self.ask_number::<i32>("Movie ID to update: ", "ID")? else {
            return Ok(());
        };
        let mut movie = match self.office.movie_by_id(id).await {
            Ok(movie) => movie,
            Err(err) => return self.error(err),
        };

        self.say(&format!(
            "Current: {}, {} min, {}",
            movie.title, movie.duration, movie.age_rating
        ))?;

        let title = self.ask("New title (Enter keeps current): ")?;
        if !title.is_empty() {
            movie.title = title;
        }

        let duration = self.ask("New duration (Enter keeps current): ")?;
        if !duration.is_empty() {
            let Some(duration) = self.parse_number(&duration, "duration")? else {
                return Ok(());
            };
            movie.duration = duration;
        }

        let rating = self.ask("New age rating (Enter keeps current): ")?;
        if !rating.is_empty() {
            match rating.parse() {
                Ok(rating) => movie.age_rating = rating,
                Err(err) => return self.error(err),
            }
        }

        match self.office.update_movie(&movie).await {
            Ok(()) => self.say(&format!("Movie with ID {} updated", movie.id)),
            Err(err) => self.error(err),
        }
    }

    async fn delete_movie(&mut self) -> Step {
        let Some(id) = self.ask_number::<i32>("Movie ID to delete: ", "ID")? else {
            return Ok(());
        };
        let movie = match self.office.movie_by_id(id).await {
            Ok(movie) => movie,
            Err(err) => return self.error(err),
        };

        if !self.confirm(&format!("Delete movie '{}'? (y/n): ", movie.title))? {
            return self.say("Deletion cancelled");
        }

        match self.office.delete_movie(id).await {
            Ok(()) => self.say(&format!("Movie '{}' deleted", movie.title)),
            Err(err) => self.error(err),
        }
    }

    async fn screenings_menu(&mut self) -> Step {
        loop {
            self.say("\n=== SCREENINGS ===")?;
            self.say("1. Show all screenings")?;
            self.say("2. Show screenings of a movie")?;
            self.say("3. Add a screening")?;
            self.say("4. Delete a screening")?;
            self.say("5. Back to main menu")?;

            match self.ask("Choose an action (1-5): ")?.as_str() {
                "1" => self.show_screenings().await?,
                "2" => self.show_movie_screenings().await?,
                "3" => self.add_screening().await?,
                "4" => self.delete_screening().await?,
                "5" => return Ok(()),
                _ => self.say("Invalid choice.")?,
            }
        }
    }

    async fn show_screenings(&mut self) -> Step {
        let screenings = match self.office.all_screenings().await {
            Ok(screenings) => screenings,
            Err(err) => return self.error(err),
        };

        self.say(&format!("\nAll screenings:\n{RULE}"))?;
        for screening in &screenings {
            self.say(&report::screening_line(screening))?;
        }
        Ok(())
    }

    async fn show_movie_screenings(&mut self) -> Step {
        let Some(movie_id) = self.ask_number::<i32>("Movie ID: ", "ID")? else {
            return Ok(());
        };
        let screenings = match self.office.screenings_for_movie(movie_id).await {
            Ok(screenings) => screenings,
            Err(err) => return self.error(err),
        };

        self.say(&format!("\nScreenings of movie {movie_id}:\n{RULE}"))?;
        for screening in &screenings {
            self.say(&report::movie_screening_line(screening))?;
        }
        Ok(())
    }

    async fn add_screening(&mut self) -> Step {
        self.say("\nNew screening:")?;
        let Some(movie_id) = self.ask_number::<i32>("Movie ID: ", "ID")? else {
            return Ok(());
        };

        let raw_time = self.ask("Date and time (YYYY-MM-DD HH:MM): ")?;
        let Ok(screen_time) = DateTime::strptime(ENTRY_TIME_FORMAT, &raw_time) else {
            return self.say("Error: invalid date format");
        };

        let Some(hall_number) = self.ask_number::<i32>("Hall number: ", "hall number")? else {
            return Ok(());
        };
        let Some(price) = self.ask_number::<f64>("Ticket price: ", "price")? else {
            return Ok(());
        };

        let new = NewScreening { movie_id, screen_time, hall_number, price };
        match self.office.create_screening(new).await {
            Ok(screening) => self.say(&format!("Screening added with ID {}", screening.id)),
            Err(err) => self.error(err),
        }
    }

    async fn delete_screening(&mut self) -> Step {
        let Some(id) = self.ask_number::<i32>("Screening ID to delete: ", "ID")? else {
            return Ok(());
        };

        if !self.confirm("Delete screening? (y/n): ")? {
            return self.say("Deletion cancelled");
        }

        match self.office.delete_screening(id).await {
            Ok(()) => self.say(&format!("Screening with ID {id} deleted")),
            Err(err) => self.error(err),
        }
    }

    async fn tickets_menu(&mut self) -> Step {
        loop {
            self.say("\n=== TICKETS ===")?;
            self.say("1. Buy a ticket")?;
            self.say("2. Show tickets of a screening")?;
            self.say("3. Show free seats")?;
            self.say("4. Return a ticket")?;
            self.say("5. Back to main menu")?;

            match self.ask("Choose an action (1-5): ")?.as_str() {
                "1" => self.buy_ticket().await?,
                "2" => self.show_tickets().await?,
                "3" => self.show_free_seats().await?,
                "4" => self.return_ticket().await?,
                "5" => return Ok(()),
                _ => self.say("Invalid choice.")?,
            }
        }
    }

    async fn buy_ticket(&mut self) -> Step {
        self.say("\nBuy a ticket:")?;
        let Some(screening_id) = self.ask_number::<i32>("Screening ID: ", "ID")? else {
            return Ok(());
        };

        let free = match self.office.available_seats(screening_id).await {
            Ok(free) => free,
            Err(err) => return self.error(err),
        };
        self.say(&format!("Free seats: {}", report::seats(&free)))?;

        let Some(seat_number) = self.ask_number::<i32>("Seat number: ", "seat number")? else {
            return Ok(());
        };
        let customer_name = self.ask("Customer name: ")?;

        let new = NewTicket { screening_id, seat_number, customer_name };
        match self.office.buy_ticket(new).await {
            Ok(ticket) => self.say(&format!("Ticket purchased with ID {}", ticket.id)),
            Err(err) => self.error(err),
        }
    }

    async fn show_tickets(&mut self) -> Step {
        let Some(screening_id) = self.ask_number::<i32>("Screening ID: ", "ID")? else {
            return Ok(());
        };
        let tickets = match self.office.tickets_for_screening(screening_id).await {
            Ok(tickets) => tickets,
            Err(err) => return self.error(err),
        };

        self.say(&format!("\nTickets for screening {screening_id}:\n{RULE}"))?;
        for ticket in &tickets {
            self.say(&report::ticket_line(ticket))?;
        }
        self.say(&format!("Tickets in total: {}", tickets.len()))
    }

    async fn show_free_seats(&mut self) -> Step {
        let Some(screening_id) = self.ask_number::<i32>("Screening ID: ", "ID")? else {
            return Ok(());
        };
        let free = match self.office.available_seats(screening_id).await {
            Ok(free) => free,
            Err(err) => return self.error(err),
        };

        self.say(&format!("\nFree seats for screening {screening_id}:\n{RULE}"))?;
        self.say(&format!("Seats: {}", report::seats(&free)))?;
        self.say(&format!("Free seats in total: {}", free.len()))
    }

    async fn return_ticket(&mut self) -> Step {
        let Some(id) = self.ask_number::<i32>("Ticket ID to return: ", "ID")? else {
            return Ok(());
        };

        if !self.confirm("Return ticket? (y/n): ")? {
            return self.say("Return cancelled");
        }

        match self.office.return_ticket(id).await {
            Ok(()) => self.say(&format!("Ticket with ID {id} returned")),
            Err(err) => self.error(err),
        }
    }

    async fn customers_menu(&mut self) -> Step {
        loop {
            self.say("\n=== CUSTOMERS ===")?;
            self.say("1. Show all customers")?;
            self.say("2. Add a customer")?;
            self.say("3. Update a customer")?;
            self.say("4. Delete a customer")?;
            self.say("5. Back to main menu")?;

            match self.ask("Choose an action (1-5): ")?.as_str() {
                "1" => self.show_customers().await?,
                "2" => self.add_customer().await?,
                "3" => self.update_customer().await?,
                "4" => self.delete_customer().await?,
                "5" => return Ok(()),
                _ => self.say("Invalid choice.")?,
            }
        }
    }

    async fn show_customers(&mut self) -> Step {
        let customers = match self.office.all_customers().await {
            Ok(customers) => customers,
            Err(err) => return self.error(err),
        };

        self.say(&format!("\nAll customers:\n{RULE}"))?;
        for customer in &customers {
            self.say(&report::customer_line(customer))?;
        }
        self.say(&format!("Customers in total: {}", customers.len()))
    }

    async fn add_customer(&mut self) -> Step {
        self.say("\nNew customer:")?;
        let name = self.ask("Name: ")?;
        let email = self.ask("Email: ")?;
        let phone = self.ask("Phone: ")?;

        let new = NewCustomer { name, email, phone: Some(phone) };
        match self.office.create_customer(new).await {
            Ok(customer) => {
                self.say(&format!("Customer '{}' added with ID {}", customer.name, customer.id))
            },
            Err(err) => self.error(err),
        }
    }

    async fn update_customer(&mut self) -> Step {
        let email = self.ask("Email of the customer to update: ")?;
        let mut customer = match self.office.customer_by_email(&email).await {
            Ok(customer) => customer,
            Err(err) => return self.error(err),
        };

        self.say(&format!(
            "Current: {}, {}, points: {}",
            customer.name,
            customer.phone.as_deref().unwrap_or("-"),
            customer.loyalty_points
        ))?;

        let name = self.ask("New name (Enter keeps current): ")?;
        if !name.is_empty() {
            customer.name = name;
        }

        let phone = self.ask("New phone (Enter keeps current): ")?;
        if !phone.is_empty() {
            customer.phone = Some(phone);
        }

        let points = self.ask("New loyalty points (Enter keeps current): ")?;
        if !points.is_empty() {
            let Some(points) = self.parse_number(&points, "loyalty points")? else {
                return Ok(());
            };
            customer.loyalty_points = points;
        }

        match self.office.update_customer(&customer).await {
            Ok(()) => self.say(&format!("Customer with email {} updated", customer.email)),
            Err(err) => self.error(err),
        }
    }

    async fn delete_customer(&mut self) -> Step {
        let email = self.ask("Email of the customer to delete: ")?;
        let customer = match self.office.customer_by_email(&email).await {
            Ok(customer) => customer,
            Err(err) => return self.error(err),
        };

        if !self.confirm(&format!("Delete customer {}? (y/n): ", customer.name))? {
            return self.say("Deletion cancelled");
        }

        match self.office.delete_customer(customer.id).await {
            Ok(()) => self.say(&format!("Customer '{}' deleted", customer.name)),
            Err(err) => self.error(err),
        }
    }

    async fn show_overview(&mut self) -> Step {
        match self.office.overview().await {
            Ok(overview) => {
                write!(self.out, "{}", report::overview(&overview))?;
                Ok(())
            },
            Err(err) => self.error(err),
        }
    }

    fn say(&mut self, line: &str) -> Step {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn error(&mut self, err: AppError) -> Step {
        self.say(&format!("Error: {err}"))
    }

    /// Prints `prompt` and reads one trimmed line.
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    fn ask_number<T: FromStr>(&mut self, prompt: &str, what: &str) -> anyhow::Result<Option<T>> {
        let raw = self.ask(prompt)?;
        self.parse_number(&raw, what)
    }

    /// `None` after telling the operator the value was not a number.
    fn parse_number<T: FromStr>(&mut self, raw: &str, what: &str) -> anyhow::Result<Option<T>> {
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.say(&format!("Error: {what} must be a number"))?;
                Ok(None)
            },
        }
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        let answer = self.ask(prompt)?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
