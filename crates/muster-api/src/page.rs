//! Server list page served at `/`.
//!
//! Field values are sanitized on ingest but field names are not, so every
//! piece of listing data is HTML-escaped on the way out.

use std::fmt::{self, Write};

use axum::extract::State;
use axum::response::Html;
use chrono::{DateTime, Utc};

use muster_core::{AggregateStats, ListingKey, ListingRecord};
use muster_services::RegistrySnapshot;

use crate::handlers::ApiState;

pub async fn handle_index(State(state): State<ApiState>) -> Html<String> {
    Html(render(&state.registry.snapshot(), Utc::now()))
}

/// Render the listing page for `snapshot` as of `now`.
pub fn render(snapshot: &RegistrySnapshot, now: DateTime<Utc>) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(HEAD);

    let _ = write!(
        html,
        "<header><h1>Server list</h1><p class=\"meta\">Players: <b>{}</b> [ {} capacity ]</p></header>\n",
        snapshot.stats.total_players,
        capacity_label(&snapshot.stats),
    );

    if snapshot.listings.is_empty() {
        html.push_str("<p class=\"empty\">No servers are reporting right now.</p>\n");
    } else {
        html.push_str(
            "<table>\n<thead><tr><th>Name</th><th>Address</th><th>Players</th><th>Details</th><th>Last seen</th></tr></thead>\n<tbody>\n",
        );
        for (key, record) in &snapshot.listings {
            render_row(&mut html, key, record, now);
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_row(html: &mut String, key: &ListingKey, record: &ListingRecord, now: DateTime<Utc>) {
    let details = record
        .extra
        .iter()
        .map(|(k, v)| format!("{}: {}", Escaped(k), Escaped(v)))
        .collect::<Vec<_>>()
        .join(", ");
    let seen = (now - record.added).num_seconds().max(0);

    let _ = writeln!(
        html,
        "<tr><td>{}</td><td><code>{}</code></td><td>{} / {}</td><td>{}</td><td>{}s ago</td></tr>",
        Escaped(&record.name),
        Escaped(&key.to_string()),
        Escaped(&record.players),
        Escaped(&record.max_players),
        details,
        seen,
    );
}

/// Writes the wrapped text with `&`, `<`, `>`, `"` and `'` escaped.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(i) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..i])?;
            f.write_str(match rest.as_bytes()[i] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            })?;
            rest = &rest[i + 1..];
        }
        f.write_str(rest)
    }
}

fn capacity_label(stats: &AggregateStats) -> String {
    if stats.capacity.is_finite() {
        format!("{:.0}%", stats.capacity)
    } else {
        "n/a".to_string()
    }
}

const HEAD: &str = "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>Server list</title>
<link rel=\"stylesheet\" href=\"/css/style.css\">
</head>
<body>
";
