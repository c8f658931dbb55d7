use {
    crate::Config,
    std::{io::IsTerminal, sync::Once},
    time::macros::format_description,
    tracing::Level,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{
            MakeWriter,
            time::UtcTime,
            writer::{MakeWriterExt as _, OrElse, WithMaxLevel},
        },
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the global tracing subscriber from `config`.
///
/// Panics if a global subscriber was already installed.
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(config: &Config) {
    // The subscriber is a process wide global so a second initialization
    // from another test thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(config);
        crate::panic_hook::install();
    });
}

fn set_tracing_subscriber(config: &Config) {
    let stderr_threshold = config.stderr_threshold.unwrap_or(Level::ERROR);

    // The json and plain text layers have different types, which is why the
    // shared part of the setup lives in a macro.
    macro_rules! fmt_layer {
        ($layer:expr) => {{
            $layer
                .with_writer(split_writer(
                    std::io::stdout,
                    std::io::stderr,
                    stderr_threshold,
                ))
                .with_timer(UtcTime::new(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                )))
                .with_filter(EnvFilter::new(&config.env_filter))
        }};
    }

    if config.use_json_format {
        tracing_subscriber::registry()
            .with(fmt_layer!(tracing_subscriber::fmt::layer().json()))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer!(
                tracing_subscriber::fmt::layer().with_ansi(std::io::stdout().is_terminal())
            ))
            .init();
    }
    tracing::debug!(filter = %config.env_filter, json = config.use_json_format, "logging initialized");
}

/// Writes events at `stderr_threshold` or more severe to `stderr` and
/// everything else to `stdout`.
fn split_writer<O, E>(stdout: O, stderr: E, stderr_threshold: Level) -> OrElse<WithMaxLevel<E>, O>
where
    O: for<'a> MakeWriter<'a>,
    E: for<'a> MakeWriter<'a>,
{
    stderr.with_max_level(stderr_threshold).or_else(stdout)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{
            io,
            sync::{Arc, Mutex},
        },
    };

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn log_to(stdout: &Buffer, stderr: &Buffer, stderr_threshold: Level) {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(split_writer(stdout.clone(), stderr.clone(), stderr_threshold))
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("migration failed");
            tracing::warn!("migration interrupted");
            tracing::info!("deployed");
        });
    }

    #[test]
    fn errors_go_to_stderr_by_default() {
        let (stdout, stderr) = (Buffer::default(), Buffer::default());
        log_to(&stdout, &stderr, Level::ERROR);

        let (stdout, stderr) = (stdout.contents(), stderr.contents());
        assert!(stderr.contains("migration failed"));
        assert!(!stderr.contains("migration interrupted"));
        assert!(!stderr.contains("deployed"));
        assert!(!stdout.contains("migration failed"));
        assert!(stdout.contains("migration interrupted"));
        assert!(stdout.contains("deployed"));
    }

    #[test]
    fn lower_threshold_moves_warnings_to_stderr() {
        let (stdout, stderr) = (Buffer::default(), Buffer::default());
        log_to(&stdout, &stderr, Level::WARN);

        let (stdout, stderr) = (stdout.contents(), stderr.contents());
        assert!(stderr.contains("migration failed"));
        assert!(stderr.contains("migration interrupted"));
        assert!(!stderr.contains("deployed"));
        assert!(stdout.contains("deployed"));
        assert!(!stdout.contains("migration"));
    }
}
