use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "mcp-probe")]
#[command(
    about = "Stream JSON-RPC messages from an MCP server over SSE and print them by role",
    long_about = None
)]
pub struct Args {
    #[arg(
        short = 'H',
        long = "header",
        help = "Connection header (format: 'Name: value', repeatable)"
    )]
    pub headers: Vec<String>,

    #[arg(
        short = 'd',
        long = "data",
        help = "POST this JSON body and stream the response instead of opening a GET stream"
    )]
    pub data: Option<String>,

    #[arg(long = "connect-timeout", help = "Connect timeout in seconds")]
    pub connect_timeout: Option<u64>,

    #[arg(
        long = "idle-timeout",
        help = "Give up when no data arrives for this many seconds (0 disables)"
    )]
    pub idle_timeout: Option<u64>,

    #[arg(long = "show-headers", help = "Print the response headers after the handshake")]
    pub show_headers: bool,

    #[arg(
        long = "config-init",
        help = "Write an example .mcp-probe.yaml in the current directory"
    )]
    pub config_init: bool,

    #[arg(short = 'v', long = "verbose", help = "Verbose output")]
    pub verbose: bool,

    #[arg(help = "MCP SSE endpoint URL")]
    pub endpoint: Option<String>,
}
