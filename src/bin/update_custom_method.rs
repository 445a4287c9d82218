use anyhow::Context;
use api_patcher::core::builtin::{BuiltinMethod, DEFAULT_TARGET};
use api_patcher::utils::logger;
use api_patcher::{LocalStorage, PatchEngine, PatchTarget, ReplaceMethodPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_script_logger();

    let builtin = BuiltinMethod::SendCustomWebPushWithUrl;
    let pipeline = ReplaceMethodPipeline::new(
        builtin.step_name(),
        builtin.replacer(),
        LocalStorage::current_dir(),
        PatchTarget::new(DEFAULT_TARGET),
    );

    // 找不到方法時只會記錄警告，仍然回報成功
    PatchEngine::new(pipeline)
        .run()
        .await
        .with_context(|| format!("failed to patch {}", DEFAULT_TARGET))?;

    println!("{}", builtin.success_message());
    Ok(())
}
