//! Conversions between this crate's geometries and [`geo_types`].
//!
//! `geo_types` geometries are 2d, so conversion to them drops `z` and `m` values.

mod from_geo;
mod to_geo;
