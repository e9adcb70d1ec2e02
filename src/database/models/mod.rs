pub mod city;
pub mod province;
pub mod user;

pub use city::{City, CityWithProvince};
pub use province::{Province, ProvinceWithCities};
pub use user::User;
