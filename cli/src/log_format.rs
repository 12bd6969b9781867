//! File log layout that prefixes each line with the turn it belongs to.
//!
//! `RavlRunner` opens a `ravl_turn{turn_id=...}` span per question, so interleaved
//! turns in one `LOG_FILE` can be told apart by that prefix.

use std::fmt::{self, Write as _};

use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::{LookupSpan, SpanRef};

/// `TIMESTAMP ravl_turn{turn_id=..} > ravl_node{node=..} LEVEL target: message fields`
///
/// The outermost span is always shown; the innermost one only when it is a different
/// span. Events outside any span have no prefix.
#[derive(Default)]
pub struct TurnTaggedText {
    timer: SystemTime,
}

impl TurnTaggedText {
    pub fn new() -> Self {
        Self::default()
    }
}

fn write_span<S, N>(writer: &mut Writer<'_>, span: &SpanRef<'_, S>) -> fmt::Result
where
    S: for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let extensions = span.extensions();
    let fields = extensions
        .get::<FormattedFields<N>>()
        .map_or("", |f| f.fields.as_str());
    write!(writer, "{}{{{}}}", span.name(), fields)
}

impl<S, N> FormatEvent<S, N> for TurnTaggedText
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;

        if let Some(innermost) = ctx.parent_span() {
            if let Some(turn) = innermost.scope().from_root().next() {
                writer.write_char(' ')?;
                write_span::<S, N>(&mut writer, &turn)?;
                if turn.id() != innermost.id() {
                    writer.write_str(" > ")?;
                    write_span::<S, N>(&mut writer, &innermost)?;
                }
            }
        }

        let meta = event.metadata();
        write!(writer, " {} {}: ", meta.level(), meta.target())?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
