//! Database access layer
//!
//! One module per table. Functions return row models from
//! `abuddy_common::db`; turning them into API views (derived statuses,
//! nested children) happens in [`appliances::load_view`] and the handlers.

pub mod appliances;
pub mod contacts;
pub mod documents;
pub mod maintenance;
pub mod sample_data;
pub mod users;
