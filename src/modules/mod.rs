pub mod registrations;
pub mod roles;
pub mod semesters;
