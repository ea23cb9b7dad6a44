//! World city reference records (SimpleMaps dataset).
//!
//! ## Endpoints
//!
//! All endpoints require a bearer token.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/world-cities` | List all world cities |
//! | GET | `/api/world-cities/{id}` | Get a world city (`data: null` when absent) |
//! | POST | `/api/world-cities` | Create a world city |
//! | PATCH/PUT | `/api/world-cities/{id}` | Update the fields present in the body |
//! | DELETE | `/api/world-cities/{id}` | Delete a world city, returning it |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{InMemoryWorldCityRepository, PgWorldCityRepository, WorldCityRepository};
pub use services::WorldCityService;
