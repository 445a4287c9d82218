//! apiService.js 的三個既有修補步驟

use crate::core::replacer::MethodReplacer;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET: &str = "src/services/apiService.js";

pub const DUPLICATE_RETURN_LINE: &str = "return response.data;";

pub const SEND_WEB_PUSH_TO_STORE: &str = r#"async sendWebPushToStore(storeId, notification, customUrl = null) {
    // v7.1: Usar a API de notificações modificada (SEM BRANDING AUTOMÁTICO)
    const response = await api.post('/notifications/sendImmediateNotification', {
      ...notification,
      target: 'subscribers',
      data: {
        ...(notification.data || {}),
        link: customUrl
      }
    });
    return response.data;
  }"#;

pub const SEND_CUSTOM_WEB_PUSH_WITH_URL: &str = r#"async sendCustomWebPushWithUrl(notificationData, customUrl, targetUserId = null) {
    // v7.1: Usar a API de notificações modificada (SEM BRANDING AUTOMÁTICO)
    const response = await api.post('/notifications/sendImmediateNotification', {
      ...notificationData,
      target: targetUserId ? 'user' : 'subscribers',
      targetId: targetUserId,
      data: {
        ...(notificationData.data || {}),
        link: customUrl
      }
    });
    return response.data;
  }"#;

pub const FIX_SYNTAX_MESSAGE: &str = "✅ Sintaxe corrigida - removida duplicação!";
pub const UPDATE_API_MESSAGE: &str = "✅ Método sendWebPushToStore atualizado para v7.1!";
pub const UPDATE_CUSTOM_METHOD_MESSAGE: &str =
    "✅ Método sendCustomWebPushWithUrl atualizado para v7.1!";

/// 內建的替換內容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum BuiltinMethod {
    SendWebPushToStore,
    SendCustomWebPushWithUrl,
}

impl BuiltinMethod {
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::SendWebPushToStore => "sendWebPushToStore",
            Self::SendCustomWebPushWithUrl => "sendCustomWebPushWithUrl",
        }
    }

    pub fn replacement(&self) -> &'static str {
        match self {
            Self::SendWebPushToStore => SEND_WEB_PUSH_TO_STORE,
            Self::SendCustomWebPushWithUrl => SEND_CUSTOM_WEB_PUSH_WITH_URL,
        }
    }

    /// 原本腳本的名稱
    pub fn step_name(&self) -> &'static str {
        match self {
            Self::SendWebPushToStore => "update_api",
            Self::SendCustomWebPushWithUrl => "update_custom_method",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::SendWebPushToStore => UPDATE_API_MESSAGE,
            Self::SendCustomWebPushWithUrl => UPDATE_CUSTOM_METHOD_MESSAGE,
        }
    }

    pub fn replacer(&self) -> MethodReplacer {
        MethodReplacer::new(self.method_name(), self.replacement())
    }
}
