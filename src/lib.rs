// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
// Suppress clippy warnings about unknown/renamed dylint lint names
#![allow(unknown_lints, renamed_and_removed_lints, max_lines_per_file)]
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod api;
pub mod catalog;
pub mod config;
pub mod cors;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use api::{build_router, ApiError, ApiResult, AppState};
pub use catalog::{
    parse_iso_date, Catalog, CatalogError, CatalogItem, CatalogRepository, FieldPatch,
    ItemFilters, ItemPatch, NewItem, TitleMatch,
};
pub use config::{default_store_path, load_user_config, ConfigError, UserConfig};
pub use store::{parse_on_corrupt, CatalogStore, JsonFileStore, OnCorrupt, StoreError};
