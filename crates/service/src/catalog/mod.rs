//! Catalog business services: product listing/filtering/search and
//! category listing/aggregation, shared by every HTTP surface.

pub mod category_service;
pub mod product_service;
