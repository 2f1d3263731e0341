//! Client code for the shelf backend.
//!
//! This crate provides the Open Library search client and the transformation
//! of raw catalog results into the response shape the server returns.

pub mod openlibrary;

pub use openlibrary::{
    BookSummary, OpenLibraryClient, OpenLibraryConfig, OpenLibraryError, SearchResponse, build_cover_url,
};
