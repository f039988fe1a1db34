pub mod highlight;
pub mod output;

pub use highlight::JsonHighlighter;
pub use output::{
    describe_message, display_decode_failure, display_headers, display_summary,
    format_headers, MessagePrinter,
};
