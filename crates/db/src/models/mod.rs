//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! DTOs deserialized from the public customer surface use camelCase field
//! names (the wire format of the quote page); admin DTOs stay snake_case.

pub mod analytics;
pub mod line_item;
pub mod quote;
pub mod quote_image;
