#![allow(dead_code)]

use api_patcher::LocalStorage;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TARGET: &str = "src/services/apiService.js";

/// 與 apiService.js 結構相同的測試內容
pub const API_SERVICE: &str = r#"import api from './api';

export const apiService = {
  async getStoreOrders(storeId) {
    const response = await api.get(`/stores/${storeId}/orders`);
    return response.data;
    return response.data;
  },

  async sendWebPushToStore(storeId, notification) {
    const response = await api.post('/webpush/sendToStore', notification);
    return response.data;
  },

  async sendCustomWebPushWithUrl(notificationData, customUrl) {
    const response = await api.post('/webpush/sendCustom', notificationData);
    return response.data;
  },

  async getProfile() {
    const response = await api.get('/auth/getUserProfile');
    return response.data;
  }
};
"#;

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn with_target(content: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let services = dir.path().join("src/services");
        std::fs::create_dir_all(&services).unwrap();
        std::fs::write(services.join("apiService.js"), content).unwrap();
        Self { dir }
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir.path().join(TARGET)
    }

    pub fn read_target(&self) -> String {
        std::fs::read_to_string(self.target_path()).unwrap()
    }

    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.root())
    }
}
