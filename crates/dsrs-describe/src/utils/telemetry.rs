//! Subscriber setup for watching the description walker.
//!
//! The extractor and adapter emit `trace!` events from inside the
//! `dsrs.describe.fields` and `dsrs.adapter.chat.format_field_description` spans
//! (depth limit reached, model already on the path, model not registered). These
//! helpers install a `tracing-subscriber` fmt subscriber that shows them.

use std::sync::OnceLock;

use bon::Builder;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Filter used when neither an explicit directive nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "dsrs_describe=debug";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// How the global subscriber is set up.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingOptions {
    /// `EnvFilter` directive, e.g. `dsrs_describe=trace`. When unset, `RUST_LOG` is
    /// read, falling back to [`DEFAULT_FILTER`].
    #[builder(into)]
    pub filter: Option<String>,
    /// Log each walker and adapter span as it closes, with its busy/idle time.
    #[builder(default)]
    pub span_timings: bool,
    /// Route output through the test harness so it is captured per test.
    #[builder(default)]
    pub test_writer: bool,
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("`{directive}` is not a valid tracing filter: {source}")]
    Filter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("another global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// [`init_tracing_with`] default options.
pub fn init_tracing() -> Result<(), TracingInitError> {
    init_tracing_with(&TracingOptions::default())
}

/// Installs the process-global subscriber. Calls after the first successful one
/// are no-ops, whatever their options.
pub fn init_tracing_with(options: &TracingOptions) -> Result<(), TracingInitError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let span_events = if options.span_timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(build_filter(options.filter.as_deref())?)
        .with_span_events(span_events)
        .with_target(false);

    if options.test_writer {
        tracing::subscriber::set_global_default(subscriber.with_test_writer().finish())?;
    } else {
        tracing::subscriber::set_global_default(subscriber.finish())?;
    }
    INSTALLED.get_or_init(|| ());
    Ok(())
}

fn build_filter(directive: Option<&str>) -> Result<EnvFilter, TracingInitError> {
    let parse = |directive: &str| {
        EnvFilter::try_new(directive).map_err(|source| TracingInitError::Filter {
            directive: directive.to_string(),
            source,
        })
    };

    match directive {
        Some(directive) => parse(directive),
        None => EnvFilter::try_from_default_env().or_else(|_| parse(DEFAULT_FILTER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_is_validated() {
        assert!(build_filter(Some("dsrs_describe=trace")).is_ok());

        let err = build_filter(Some("dsrs_describe=loud")).expect_err("unknown level");
        assert!(matches!(
            err,
            TracingInitError::Filter { ref directive, .. } if directive == "dsrs_describe=loud"
        ));
    }

    #[test]
    fn options_default_to_env_filter() {
        let options = TracingOptions::builder().build();
        assert_eq!(options, TracingOptions::default());
        assert_eq!(options.filter, None);
        assert!(!options.span_timings);
    }
}
