//! Minimal end-to-end walkthrough: log in with a cookie, look up the
//! current user, run a search, and read some comments.
//!
//! Provide the cookie through `XHS_COOKIE` or a `config.local.json` file
//! with a `"cookie"` field, then run:
//!
//! ```text
//! cargo run --example basic_usage
//! ```

use xhs_client::{config, NoteType, SearchSort, XhsClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xhs_client=debug".into()),
        )
        .init();

    let Some(cookie) = config::resolve_cookie(None)? else {
        eprintln!("no cookie found; set XHS_COOKIE or create config.local.json");
        std::process::exit(1);
    };
    let client = XhsClient::new(cookie)?;

    let me = client.current_user()?;
    println!("logged in as {} ({})", me.nickname, me.user_id);

    let notes = client.search_notes("咖啡", 5, SearchSort::Hot, NoteType::All)?;
    for note in &notes {
        println!("{}  by {}  ({} likes)", note.title, note.author.nickname, note.likes);
    }

    Ok(())
}
