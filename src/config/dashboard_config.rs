// ==========================================
// 线材事业部经营看板 - 看板配置
// ==========================================
// 职责: 数据文档位置 + 初始选中工厂
// 来源: JSON 配置文件 / 环境变量 / 默认值（字段级覆写）
// ==========================================

use crate::domain::types::{deserialize_plant_label, PlantKey};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 数据目录环境变量
pub const DATA_DIR_ENV: &str = "WIRES_DASHBOARD_DATA_DIR";

pub mod config_keys {
    pub const CAPEX_FILE: &str = "capex_data.json";
    pub const KRA_FILE: &str = "kra_data.json";
    pub const SUMMARY_FILE: &str = "Final_json_sept.json";
    pub const PRODUCTION_FILE: &str = "production_series.json";
}

// ==========================================
// DashboardConfig - 看板配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// 数据文档目录（相对文件名基于此解析）
    pub data_dir: PathBuf,
    pub capex_file: PathBuf,
    pub kra_file: PathBuf,
    pub summary_file: PathBuf,
    pub production_file: PathBuf,
    /// 表格导出的 capex 清单（.csv/.xlsx/.xls），设置后替代 capex_file
    pub capex_sheet: Option<PathBuf>,
    /// 初始选中工厂（接受显示名与拼写变体）
    #[serde(deserialize_with = "deserialize_plant_label")]
    pub default_plant: PlantKey,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: get_default_data_dir(),
            capex_file: PathBuf::from(config_keys::CAPEX_FILE),
            kra_file: PathBuf::from(config_keys::KRA_FILE),
            summary_file: PathBuf::from(config_keys::SUMMARY_FILE),
            production_file: PathBuf::from(config_keys::PRODUCTION_FILE),
            capex_sheet: None,
            default_plant: PlantKey::Bobbili,
        }
    }
}

impl DashboardConfig {
    /// 以指定数据目录创建（其余字段取默认）
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// 从 JSON 配置文件加载，缺省字段取默认值
    ///
    /// # 返回
    /// - Err(ImportError::ConfigReadError): 文件不存在或格式错误
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|e| ImportError::ConfigReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!("已加载配置: {}", path.display());
        Ok(config)
    }

    pub fn capex_path(&self) -> PathBuf {
        self.resolve(&self.capex_file)
    }

    pub fn kra_path(&self) -> PathBuf {
        self.resolve(&self.kra_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.resolve(&self.summary_file)
    }

    pub fn production_path(&self) -> PathBuf {
        self.resolve(&self.production_file)
    }

    pub fn capex_sheet_path(&self) -> Option<PathBuf> {
        self.capex_sheet.as_deref().map(|p| self.resolve(p))
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}

/// 获取默认数据目录
///
/// 优先级: 环境变量 WIRES_DASHBOARD_DATA_DIR → 用户数据目录/wires-dashboard → ./data
pub fn get_default_data_dir() -> PathBuf {
    // 允许通过环境变量显式指定（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("wires-dashboard"),
        None => PathBuf::from("./data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::with_data_dir("/srv/wires");
        assert_eq!(config.capex_path(), PathBuf::from("/srv/wires/capex_data.json"));
        assert_eq!(config.default_plant, PlantKey::Bobbili);
        assert_eq!(config.capex_sheet_path(), None);
    }

    #[test]
    fn test_load_部分字段覆写() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{ "data_dir": "/srv/wires", "kra_file": "/opt/kra.json", "default_plant": "bokaro", "capex_sheet": "capex.xlsx" }}"#
        )
        .unwrap();

        let config = DashboardConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.kra_path(), PathBuf::from("/opt/kra.json"));
        assert_eq!(config.summary_path(), PathBuf::from("/srv/wires/Final_json_sept.json"));
        assert_eq!(config.capex_sheet_path(), Some(PathBuf::from("/srv/wires/capex.xlsx")));
        assert_eq!(config.default_plant, PlantKey::Bokaro);
    }

    #[test]
    fn test_load_工厂显示名与拼写变体() {
        for (label, expected) in [
            ("Bobilli", PlantKey::Bobbili),
            ("BOKARO", PlantKey::Bokaro),
            (" Roopangarh ", PlantKey::Roopangarh),
        ] {
            let mut temp_file = NamedTempFile::new().unwrap();
            write!(temp_file, r#"{{ "default_plant": "{}" }}"#, label).unwrap();

            let config = DashboardConfig::load(temp_file.path()).unwrap();
            assert_eq!(config.default_plant, expected);
        }
    }

    #[test]
    fn test_load_未知工厂() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, r#"{{ "default_plant": "Jamshedpur" }}"#).unwrap();

        let result = DashboardConfig::load(temp_file.path());
        match result {
            Err(ImportError::ConfigReadError { message, .. }) => {
                assert!(message.contains("未知工厂: Jamshedpur"))
            }
            other => panic!("期望 ConfigReadError, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_load_文件不存在() {
        let result = DashboardConfig::load("no_such_dashboard_config.json");
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }

    #[test]
    fn test_get_default_data_dir() {
        assert!(!get_default_data_dir().as_os_str().is_empty());
    }
}
