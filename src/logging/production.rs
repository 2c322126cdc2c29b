//! Plain text log format for log aggregation: `LEVEL target: message fields`.

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Single-line formatter without ANSI colors or timestamps.
///
/// ```text
/// DEBUG goodies::web::request_rules: Request denied remote="10.1.2.3" reason="blacklisted"
/// ```
pub struct ProductionLogFormat;

impl<S, N> FormatEvent<S, N> for ProductionLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        write!(writer, "{:<5} {}: ", metadata.level(), metadata.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
