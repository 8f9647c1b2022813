use tracing_subscriber::{filter::Directive, EnvFilter};

/// Install the global `fmt` subscriber. `RUST_LOG` directives are honoured;
/// both crates of the service default to `info`.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["price_plan_service=info", "pricing_core=info"] {
        if let Ok(d) = directive.parse::<Directive>() {
            filter = filter.add_directive(d);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
