//! Wire types shared by the tavern client and backend, plus the slug codec
//! both sides derive path keys with.

pub mod api;
pub mod models;
pub mod slug;
