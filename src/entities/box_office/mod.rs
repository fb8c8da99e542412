pub mod customer;
pub mod movie;
pub mod screening;
pub mod ticket;
