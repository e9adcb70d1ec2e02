pub mod cities;
pub mod provinces;
pub mod users;

pub use cities::CityStore;
pub use provinces::ProvinceStore;
pub use users::UserStore;
