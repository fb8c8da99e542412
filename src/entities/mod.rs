pub mod box_office;
pub mod catalog;
