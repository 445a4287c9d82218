use anyhow::Context;
use api_patcher::core::builtin::{DEFAULT_TARGET, DUPLICATE_RETURN_LINE, FIX_SYNTAX_MESSAGE};
use api_patcher::utils::logger;
use api_patcher::{CollapsePipeline, LocalStorage, PatchEngine, PatchTarget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_script_logger();

    let pipeline = CollapsePipeline::new(
        "fix_api_syntax",
        DUPLICATE_RETURN_LINE,
        LocalStorage::current_dir(),
        PatchTarget::new(DEFAULT_TARGET),
    );

    PatchEngine::new(pipeline)
        .run()
        .await
        .with_context(|| format!("failed to patch {}", DEFAULT_TARGET))?;

    println!("{}", FIX_SYNTAX_MESSAGE);
    Ok(())
}
