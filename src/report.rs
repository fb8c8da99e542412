//! Plain-text rendering for the box office console.

use crate::{
    entities::box_office::{customer, movie},
    models::{Overview, Screening, Ticket},
};

pub const RULE: &str = "----------------------------------";
const DISPLAY_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn movie_line(movie: &movie::Model) -> String {
    format!("ID: {} | {} | {} min | {}", movie.id, movie.title, movie.duration, movie.age_rating)
}

pub fn screening_line(screening: &Screening) -> String {
    format!(
        "ID: {} | Movie ID: {} | {} | Hall: {} | {:.2}",
        screening.id,
        screening.movie_id,
        screening.screen_time.strftime(DISPLAY_TIME_FORMAT),
        screening.hall_number,
        screening.price
    )
}

/// Same as [`screening_line`] without the movie, for per-movie listings.
pub fn movie_screening_line(screening: &Screening) -> String {
    format!(
        "ID: {} | {} | Hall: {} | {:.2}",
        screening.id,
        screening.screen_time.strftime(DISPLAY_TIME_FORMAT),
        screening.hall_number,
        screening.price
    )
}

pub fn ticket_line(ticket: &Ticket) -> String {
    format!("ID: {} | Seat: {} | Customer: {}", ticket.id, ticket.seat_number, ticket.customer_name)
}

pub fn customer_line(customer: &customer::Model) -> String {
    format!(
        "ID: {} | {} | {} | {} | Points: {}",
        customer.id,
        customer.name,
        customer.email,
        customer.phone.as_deref().unwrap_or("-"),
        customer.loyalty_points
    )
}

pub fn seats(seats: &[i32]) -> String {
    let list = seats.iter().map(i32::to_string).collect::<Vec<_>>().join(", ");
    format!("[{list}]")
}

/// The full "all data" report.
pub fn overview(overview: &Overview) -> String {
    let mut out = String::from("\n=== CINEMA OVERVIEW ===\n");

    out.push_str(&format!("\nMOVIES:\n{RULE}\n"));
    for m in &overview.movies {
        out.push_str(&movie_line(m));
        out.push('\n');
    }

    out.push_str(&format!("\nSCREENINGS:\n{RULE}\n"));
    for s in &overview.screenings {
        out.push_str(&screening_line(s));
        out.push('\n');
    }

    out.push_str(&format!("\nCUSTOMERS:\n{RULE}\n"));
    for c in &overview.customers {
        out.push_str(&format!(
            "ID: {} | {} | {} | Points: {}\n",
            c.id, c.name, c.email, c.loyalty_points
        ));
    }

    out.push_str(&format!(
        "\nTotal: {} movies, {} screenings, {} customers\n",
        overview.movies.len(),
        overview.screenings.len(),
        overview.customers.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::entities::box_office::movie::AgeRating;

    fn dune() -> movie::Model {
        movie::Model {
            id: 1,
            title: "Dune: Part Two".into(),
            duration: 166,
            age_rating: AgeRating::Twelve,
        }
    }

    fn evening() -> Screening {
        Screening {
            id: 4,
            movie_id: 1,
            screen_time: date(2024, 3, 20).at(18, 5, 0, 0),
            hall_number: 2,
            price: 450.0,
        }
    }

    #[test]
    fn renders_movie() {
        assert_eq!(movie_line(&dune()), "ID: 1 | Dune: Part Two | 166 min | 12+");
    }

    #[test]
    fn renders_screening_with_local_date_format() {
        assert_eq!(
            screening_line(&evening()),
            "ID: 4 | Movie ID: 1 | 20.03.2024 18:05 | Hall: 2 | 450.00"
        );
        assert_eq!(
            movie_screening_line(&evening()),
            "ID: 4 | 20.03.2024 18:05 | Hall: 2 | 450.00"
        );
    }

    #[test]
    fn renders_customer_without_phone() {
        let c = customer::Model {
            id: 3,
            name: "Anna".into(),
            email: "anna@mail.com".into(),
            phone: None,
            loyalty_points: 10,
        };
        assert_eq!(customer_line(&c), "ID: 3 | Anna | anna@mail.com | - | Points: 10");
    }

    #[test]
    fn renders_seat_list() {
        assert_eq!(seats(&[1, 2, 5]), "[1, 2, 5]");
        assert_eq!(seats(&[]), "[]");
    }

    #[test]
    fn overview_ends_with_totals() {
        let report = overview(&Overview {
            movies: vec![dune()],
            screenings: vec![evening()],
            customers: vec![],
        });
        assert!(report.contains("ID: 1 | Dune: Part Two | 166 min | 12+"));
        assert!(report.trim_end().ends_with("Total: 1 movies, 1 screenings, 0 customers"));
    }
}
