//! `shopfront browse`: an interactive listing.
//!
//! Each input line is one edit. Edits go through the filter synchronizer, so
//! quick successive edits land as a single URL change and a single fetch.
//!
//! ```text
//! search=green tea
//! category=tea
//! min=5          max=        (empty clears a bound)
//! sort=price:asc
//! page=2
//! clear
//! quit
//! ```

use std::sync::Arc;

use shopfront_core::{FilterChange, FilterState, Price, SortDirection, SortField};
use shopfront_storefront::{AppError, HistoryNavigator, ScopeGuard, StorefrontSession, ViewScope};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CliError;
use crate::output;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Edit(FilterChange),
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a message describing the problem for unrecognized input.
pub fn parse_line(line: &str) -> Result<Option<BrowseInput>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    match line {
        "quit" | "exit" | "q" => return Ok(Some(BrowseInput::Quit)),
        "clear" => return Ok(Some(BrowseInput::Edit(FilterChange::Clear))),
        _ => {}
    }

    let Some((key, value)) = line.split_once('=') else {
        return Err(format!("unrecognized input '{line}'"));
    };
    let value = value.trim();

    let change = match key.trim() {
        "search" => FilterChange::Search(value.to_string()),
        "category" => FilterChange::Category(value.to_string()),
        "min" => FilterChange::MinPrice(parse_bound(value)?),
        "max" => FilterChange::MaxPrice(parse_bound(value)?),
        "sort" => {
            let (field, direction) = value.split_once(':').unwrap_or((value, ""));
            let field: SortField = field.trim().parse()?;
            let direction = if direction.trim().is_empty() {
                SortDirection::default()
            } else {
                direction.trim().parse()?
            };
            FilterChange::Sort { field, direction }
        }
        "page" => FilterChange::Page(
            value
                .parse()
                .map_err(|_| format!("invalid page '{value}'"))?,
        ),
        other => return Err(format!("unknown filter '{other}'")),
    };
    Ok(Some(BrowseInput::Edit(change)))
}

fn parse_bound(value: &str) -> Result<Option<Price>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|e| format!("{e}"))
}

/// Run the listing until `quit` or end of input.
pub async fn run(session: &StorefrontSession, query: &str) -> Result<(), CliError> {
    let navigator = Arc::new(HistoryNavigator::new(session.config().listing_url()));
    let mut filters = session.mount_filters(query, navigator.clone());
    let mut commits = filters.subscribe();

    let scope = ViewScope::new();
    let guard = scope.guard();

    output::url(&navigator.current());
    show_page(session, &guard, &filters.committed()).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(Some(BrowseInput::Quit)) => break,
                    Ok(Some(BrowseInput::Edit(change))) => {
                        filters.apply(change);
                    }
                    Ok(None) => {}
                    Err(message) => output::line(&message),
                }
            }
            changed = commits.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = commits.borrow_and_update().clone();
                output::url(&navigator.current());
                show_page(session, &guard, &state).await;
            }
        }
    }

    // Whatever was typed last still counts.
    filters.flush();
    if commits.has_changed().unwrap_or(false) {
        let state = commits.borrow_and_update().clone();
        output::url(&navigator.current());
        show_page(session, &guard, &state).await;
    }

    filters.unmount();
    scope.unmount();
    Ok(())
}

async fn show_page(session: &StorefrontSession, guard: &ScopeGuard, filter: &FilterState) {
    let request = session
        .api()
        .list_products(filter, session.config().page_size);
    match guard.run(request).await {
        Some(Ok(page)) => output::products(&page),
        Some(Err(e)) => {
            let err = AppError::from(e);
            err.report();
            output::line(&err.user_message());
        }
        None => {}
    }
}
