//! Project configuration (Pipeline.toml)

pub mod pipeline_toml;
pub mod validation;

pub use pipeline_toml::{
    CommandConfig, ContentConfig, PipelineConfig, ProjectConfig, SceneConfig, CONFIG_FILE_NAME,
};
