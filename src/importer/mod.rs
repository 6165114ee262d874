// ==========================================
// 线材事业部经营看板 - 导入层
// ==========================================
// 职责: 外部文档读取 + 规范化,生成只读快照
// 支持: JSON 文档, Excel/CSV 表格导出
// ==========================================

// 模块声明
pub mod document_loader;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod key_resolver;
pub mod record_normalizer;
pub mod summary_normalizer;

// 重导出核心类型
pub use document_loader::{DocumentLoader, RawDocuments};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, JsonDocumentParser, UniversalFileParser};
pub use key_resolver::{normalize_tech_value, resolve_plant_section_key, resolve_tech_key};
pub use record_normalizer::{derive_serial_number, PlantCollections, RecordNormalizer};
pub use summary_normalizer::SummaryNormalizer;
