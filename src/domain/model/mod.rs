//! Request/response shapes for the four relational entities.
//!
//! Each entity has a flat response, a create payload, and a tri-state
//! partial-update payload; Person, Car and Sale additionally have an
//! "expanded" response that inlines the related entity.

pub mod car;
pub mod country;
pub mod patch;
pub mod person;
pub mod sale;

pub use car::{CarResponse, CarWithSales, CreateCar, UpdateCar};
pub use country::{CountryResponse, CreateCountry, UpdateCountry};
pub use patch::Patch;
pub use person::{CreatePerson, PersonResponse, PersonWithCountry, UpdatePerson};
pub use sale::{CreateSale, SaleResponse, SaleWithCar, UpdateSale};
