mod common;

use api_patcher::core::builtin::{
    BuiltinMethod, DUPLICATE_RETURN_LINE, SEND_CUSTOM_WEB_PUSH_WITH_URL, SEND_WEB_PUSH_TO_STORE,
};
use api_patcher::core::method_span::MatchStrategy;
use api_patcher::{CollapsePipeline, PatchEngine, PatchError, PatchTarget, ReplaceMethodPipeline};
use common::{Workspace, API_SERVICE, TARGET};

async fn run_collapse(ws: &Workspace) -> api_patcher::Result<usize> {
    let pipeline = CollapsePipeline::new(
        "fix_api_syntax",
        DUPLICATE_RETURN_LINE,
        ws.storage(),
        PatchTarget::new(TARGET),
    );
    Ok(PatchEngine::new(pipeline).run().await?.changes)
}

async fn run_builtin(
    ws: &Workspace,
    builtin: BuiltinMethod,
    strategy: MatchStrategy,
) -> api_patcher::Result<usize> {
    let pipeline = ReplaceMethodPipeline::new(
        builtin.step_name(),
        builtin.replacer().with_strategy(strategy),
        ws.storage(),
        PatchTarget::new(TARGET),
    );
    Ok(PatchEngine::new(pipeline).run().await?.changes)
}

#[tokio::test]
async fn test_fix_api_syntax_removes_one_duplicate() {
    let ws = Workspace::with_target(API_SERVICE);

    let removed = run_collapse(&ws).await.unwrap();

    assert_eq!(removed, 1);
    let expected = API_SERVICE.replacen(
        "    return response.data;\n    return response.data;\n",
        "    return response.data;\n",
        1,
    );
    assert_eq!(ws.read_target(), expected);
}

#[tokio::test]
async fn test_update_api_replaces_only_the_method_span() {
    let ws = Workspace::with_target(API_SERVICE);

    let replaced = run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();

    assert_eq!(replaced, 1);
    let old_method = "async sendWebPushToStore(storeId, notification) {\n    const response = await api.post('/webpush/sendToStore', notification);\n    return response.data;\n  },";
    let expected = API_SERVICE.replacen(old_method, &format!("{},", SEND_WEB_PUSH_TO_STORE), 1);
    assert_ne!(expected, API_SERVICE);
    assert_eq!(ws.read_target(), expected);
}

#[tokio::test]
async fn test_scripts_in_sequence() {
    let ws = Workspace::with_target(API_SERVICE);

    run_collapse(&ws).await.unwrap();
    run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();
    run_builtin(&ws, BuiltinMethod::SendCustomWebPushWithUrl, MatchStrategy::FirstBrace)
        .await
        .unwrap();

    let patched = ws.read_target();
    assert!(patched.contains(&format!("  {},\n\n  async sendCustomWebPushWithUrl(", SEND_WEB_PUSH_TO_STORE)));
    assert!(patched.contains(&format!("  {},\n\n  async getProfile()", SEND_CUSTOM_WEB_PUSH_WITH_URL)));
    assert!(!patched.contains("/webpush/"));
    assert!(!patched.contains("    return response.data;\n    return response.data;\n"));
    assert!(patched.starts_with("import api from './api';\n"));
    assert!(patched.ends_with("    return response.data;\n  }\n};\n"));
}

#[tokio::test]
async fn test_missing_method_is_reported_as_success_without_changes() {
    let content = "export const apiService = {\n  async getProfile() {\n    return null;\n  }\n};\n";
    let ws = Workspace::with_target(content);

    let replaced = run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();

    assert_eq!(replaced, 0);
    assert_eq!(ws.read_target(), content);
}

#[tokio::test]
async fn test_update_api_replaces_every_definition() {
    let content = "export const apiService = {\n  async sendWebPushToStore(storeId, notification) {\n    return api.post('/webpush/a', notification);\n  },\n\n  async sendWebPushToStore(storeId) {\n    return api.post('/webpush/b', storeId);\n  },\n};\n";
    let ws = Workspace::with_target(content);

    let replaced = run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();

    assert_eq!(replaced, 2);
    assert_eq!(
        ws.read_target(),
        format!(
            "export const apiService = {{\n  {block},\n\n  {block},\n}};\n",
            block = SEND_WEB_PUSH_TO_STORE
        )
    );
}

#[tokio::test]
async fn test_missing_target_file_fails() {
    let ws = Workspace::empty();

    let err = run_collapse(&ws).await.unwrap_err();

    assert!(matches!(err, PatchError::IoError { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_first_brace_is_not_idempotent_for_shipped_block() {
    let ws = Workspace::with_target(API_SERVICE);

    run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();
    let once = ws.read_target();
    run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();
    let twice = ws.read_target();

    // 第二次只匹配到 `|| {}` 的 `}`，留下舊內容的尾巴
    assert_ne!(once, twice);
    assert_eq!(once.matches("link: customUrl").count(), 1);
    assert_eq!(twice.matches("link: customUrl").count(), 2);
    assert!(twice.contains("  },),\n        link: customUrl\n"));
}

#[tokio::test]
async fn test_balanced_is_idempotent_for_shipped_block() {
    let ws = Workspace::with_target(API_SERVICE);

    run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::Balanced)
        .await
        .unwrap();
    let once = ws.read_target();
    run_builtin(&ws, BuiltinMethod::SendWebPushToStore, MatchStrategy::Balanced)
        .await
        .unwrap();

    assert_eq!(ws.read_target(), once);
}

#[tokio::test]
async fn test_nested_braces_truncate_with_first_brace_only() {
    let content = "export const apiService = {\n  async sendWebPushToStore(storeId, notification) {\n    const response = await api.post('/push', { storeId, ...notification });\n    return response.data;\n  },\n\n  async getProfile() {\n    return null;\n  }\n};\n";

    let naive = Workspace::with_target(content);
    run_builtin(&naive, BuiltinMethod::SendWebPushToStore, MatchStrategy::FirstBrace)
        .await
        .unwrap();
    // 舊主體的後半段被留下來
    assert!(naive.read_target().contains(");\n    return response.data;\n  },\n\n  async getProfile"));

    let balanced = Workspace::with_target(content);
    run_builtin(&balanced, BuiltinMethod::SendWebPushToStore, MatchStrategy::Balanced)
        .await
        .unwrap();
    assert_eq!(
        balanced.read_target(),
        format!(
            "export const apiService = {{\n  {},\n\n  async getProfile() {{\n    return null;\n  }}\n}};\n",
            SEND_WEB_PUSH_TO_STORE
        )
    );
}
