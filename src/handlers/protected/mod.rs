pub mod cities;
pub mod provinces;
pub mod users;
