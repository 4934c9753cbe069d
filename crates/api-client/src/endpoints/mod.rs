//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one provider endpoint.
//!
//! | Module | Provider path | Description |
//! |--------|---------------|-------------|
//! | `matrix` | `POST /v2/matrix/{profile}` | One-to-many driving distance and duration |
//! | `geocode` | `GET /geocode/search` | Free-text place search |
//! | `directions` | `POST /v2/directions/{profile}` | Turn-by-turn route with encoded geometry |

pub mod directions;
pub mod geocode;
pub mod matrix;

pub use directions::DirectionsApi;
pub use geocode::GeocodeApi;
pub use matrix::MatrixApi;
