//! Event append span helpers.

use std::path::Path;

use tracing::Span;

use crate::event::EventKind;

/// Start a span for one append.
///
/// The `event.path` field is declared empty and filled in by
/// [`record_path`] once the record has a name.
pub fn append_span(kind: EventKind, id: &str) -> Span {
    tracing::info_span!(
        "event.append",
        "event.kind" = %kind,
        "event.id" = id,
        "event.path" = tracing::field::Empty,
    )
}

/// Record where the event was written.
pub fn record_path(span: &Span, path: &Path) {
    span.record("event.path", tracing::field::display(path.display()));
}
