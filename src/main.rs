use api_patcher::utils::{logger, validation::Validate};
use api_patcher::{CliConfig, LocalStorage, PatchSequence, PatchTarget};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting api-patcher");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入並驗證計畫
    let plan = match config.to_plan().and_then(|plan| plan.validate().map(|_| plan)) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "📋 Plan '{}' on {} ({} step(s))",
        plan.plan.name,
        plan.target(),
        plan.enabled_steps().count()
    );

    let target = PatchTarget::new(plan.target()).with_dry_run(config.dry_run);
    let sequence = match plan.build_sequence(LocalStorage::current_dir(), target) {
        Ok(sequence) => sequence,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    match sequence.execute_all().await {
        Ok(reports) => {
            for report in &reports {
                if let Some(diff) = &report.diff {
                    print!("{}", diff);
                }
                let status = match (report.written, report.changes) {
                    (false, _) => "dry run",
                    (true, 0) => "unchanged",
                    (true, _) => "patched",
                };
                println!("✅ {}: {} ({} change(s))", report.step, status, report.changes);
            }

            let summary = PatchSequence::get_execution_summary(&reports);
            tracing::info!("📊 Summary: {}", serde_json::to_string(&summary)?);
            println!("✅ {} step(s) completed on {}", reports.len(), plan.target());
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Patch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
