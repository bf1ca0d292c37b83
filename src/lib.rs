//! Client for the Xiaohongshu (XHS) private web API.
//!
//! Authenticates with a browser session cookie and generates the `x-s`/`x-t`
//! request signatures locally, via the vendor's JavaScript routine running in
//! an embedded engine. Both a blocking [`XhsClient`] and an
//! [`AsyncXhsClient`] are provided, with the same method surface.
//!
//! # Example
//!
//! ```no_run
//! use xhs_client::{NoteType, SearchSort, XhsClient};
//!
//! let client = XhsClient::new("a1=abc; web_session=xyz")?;
//!
//! let me = client.current_user()?;
//! println!("logged in as {}", me.nickname);
//!
//! let notes = client.search_notes("咖啡", 20, SearchSort::Hot, NoteType::All)?;
//! for note in &notes {
//!     println!("{}  ({} likes)", note.title, note.likes);
//! }
//! # Ok::<(), xhs_client::XhsError>(())
//! ```
//!
//! The session cookie comes from a logged-in browser session; [`config`]
//! helps pick it up from the `XHS_COOKIE` environment variable or a local
//! config file instead of hardcoding it.

mod async_client;
mod client;
pub mod config;
mod constants;
mod error;
pub mod models;
mod requests;
mod response;
mod sign;
mod transport;

pub use async_client::AsyncXhsClient;
pub use client::{XhsClient, XhsClientBuilder};
pub use constants::API_BASE_URL;
pub use error::XhsError;
pub use requests::{NoteType, SearchSort};
pub use sign::{SignHeaders, Signer};
