//! Flutter-facing bindings for the Dayfolio data layer.

pub mod api;
