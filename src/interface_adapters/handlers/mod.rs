pub mod feedback;
pub mod guests;
