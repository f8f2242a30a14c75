use std::{any::Any, backtrace::Backtrace};

use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins over the configured default directives.
pub fn init_tracing(default_directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    fmt().with_env_filter(filter).with_target(false).init();
    install_panic_logger();
}

fn panic_message(payload: &dyn Any) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}

fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());

        tracing::error!(
            panic = %panic_message(info.payload()),
            %location,
            backtrace = %Backtrace::capture(),
            "panic"
        );
    }));
}

#[cfg(test)]
mod tests {
    use super::panic_message;

    #[test]
    fn panic_payloads_render_as_text() {
        assert_eq!(panic_message(&"boom"), "boom");

        let owned = String::from("kaput");
        assert_eq!(panic_message(&owned), "kaput");

        assert_eq!(panic_message(&42_u32), "unknown panic");
    }
}
