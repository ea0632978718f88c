use chronicle::utils::errors::{ChronicleError, ErrorCode};

fn main() -> Result<(), ChronicleError> {
    tokio::runtime::Builder::new_multi_thread()
        // Cap the number of blocking threads - heavy argon use can otherwise explode the thread count.
        .max_blocking_threads(num_cpus::get())
        .enable_all()
        .build()
        .map_err(|err| ErrorCode::RuntimeStartError.with_msg(&format!("Unable to start the runtime: {}", err)))?
        .block_on(async {
            chronicle::lib_main().await
        })
}
