//! Tracing setup with secret redaction.
//!
//! Everything written by the fmt layer passes through [`RedactingWriter`], so
//! Telegram bot tokens (which appear in Bot API URLs inside transport errors)
//! and `OpenRouter` keys never reach stderr.

use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::{prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "openrouter_relay_bot=info,teloxide=info,hyper=warn,h2=error,reqwest=warn,tokio=warn,tower=warn";

/// Regex patterns for redacting sensitive data
pub struct RedactionPatterns {
    token_in_url: Regex,
    bare_token: Regex,
    bot_prefixed_token: Regex,
    openrouter_key: Regex,
    bearer: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token_in_url: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)(/['\s]*)")?,
            bare_token: Regex::new(r"([0-9]{8,10}:[A-Za-z0-9_-]{35})")?,
            bot_prefixed_token: Regex::new(r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+")?,
            openrouter_key: Regex::new(r"sk-or-[A-Za-z0-9_-]+")?,
            bearer: Regex::new(r"(Bearer\s+)[A-Za-z0-9._-]+")?,
        })
    }

    /// Replace every secret found in `input` with a placeholder
    #[must_use]
    pub fn redact(&self, input: &str) -> String {
        let output = self
            .token_in_url
            .replace_all(input, "$1[TELEGRAM_TOKEN]$3");
        let output = self.bare_token.replace_all(&output, "[TELEGRAM_TOKEN]");
        let output = self
            .bot_prefixed_token
            .replace_all(&output, "$1[TELEGRAM_TOKEN]");
        let output = self.openrouter_key.replace_all(&output, "[OPENROUTER_KEY]");
        let output = self.bearer.replace_all(&output, "${1}[MASKED]");
        output.into_owned()
    }
}

/// Writer that redacts secrets before forwarding to `inner`
pub struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    /// Wrap `inner`
    pub const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // Report the original length even though the written text may differ
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

/// Install the global subscriber writing redacted output to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `DEBUG_MODE=true|1` selects a
/// verbose `debug` filter.
pub fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter {
        make_inner: io::stderr,
        patterns,
    };

    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let default_filter = if debug_mode { "debug" } else { DEFAULT_FILTER };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}
