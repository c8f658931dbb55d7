use std::panic::PanicHookInfo;

/// Replaces the default panic hook with one that emits the panic message and
/// a backtrace as a `tracing::error!` event, so panics keep the configured log
/// format.
pub fn install() {
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
