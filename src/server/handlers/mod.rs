pub mod bookings;
pub mod locations;
pub mod session;
pub mod waypoints;
