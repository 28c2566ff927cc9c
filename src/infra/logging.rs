use tracing_subscriber::EnvFilter;

/// RUST_LOG 优先，否则按 verbose 选择级别；日志写 stderr，不干扰命令输出
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "table_query_builder=debug,qbuilder=debug"
    } else {
        "table_query_builder=info,qbuilder=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
