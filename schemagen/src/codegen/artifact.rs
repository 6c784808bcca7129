//! Artifact kinds and their file layout

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::GenerationOptions;

/// One kind of generated source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Entity,
    Dto,
    Mapper,
    MapperXml,
    Service,
    ServiceImpl,
    Controller,
    BaseResponseDto,
    Result,
}

/// Package layer an artifact is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Entity,
    Dto,
    Mapper,
    Service,
    ServiceImpl,
    Controller,
    Util,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 9] = [
        ArtifactKind::Entity,
        ArtifactKind::Dto,
        ArtifactKind::Mapper,
        ArtifactKind::MapperXml,
        ArtifactKind::Service,
        ArtifactKind::ServiceImpl,
        ArtifactKind::Controller,
        ArtifactKind::BaseResponseDto,
        ArtifactKind::Result,
    ];

    /// Template file name, shared by embedded defaults and override directories
    pub fn template_name(self) -> &'static str {
        match self {
            ArtifactKind::Entity => "entity.tera",
            ArtifactKind::Dto => "dto.tera",
            ArtifactKind::Mapper => "mapper.tera",
            ArtifactKind::MapperXml => "mapper_xml.tera",
            ArtifactKind::Service => "service.tera",
            ArtifactKind::ServiceImpl => "service_impl.tera",
            ArtifactKind::Controller => "controller.tera",
            ArtifactKind::BaseResponseDto => "base_response_dto.tera",
            ArtifactKind::Result => "result.tera",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::MapperXml => "xml",
            _ => "java",
        }
    }

    pub fn layer(self) -> Layer {
        match self {
            ArtifactKind::Entity => Layer::Entity,
            ArtifactKind::Dto => Layer::Dto,
            ArtifactKind::Mapper | ArtifactKind::MapperXml => Layer::Mapper,
            ArtifactKind::Service => Layer::Service,
            ArtifactKind::ServiceImpl => Layer::ServiceImpl,
            ArtifactKind::Controller => Layer::Controller,
            ArtifactKind::BaseResponseDto | ArtifactKind::Result => Layer::Util,
        }
    }

    /// Shared artifacts are rendered once per run rather than once per table
    pub fn is_shared(self) -> bool {
        matches!(self, ArtifactKind::BaseResponseDto | ArtifactKind::Result)
    }

    /// File name without extension.
    ///
    /// Per-table kinds use the entity name plus the configured layer
    /// suffix; shared kinds have a fixed name.
    pub fn file_stem(self, entity_name: &str, options: &GenerationOptions) -> String {
        let suffixes = &options.suffixes;
        let suffix = match self {
            ArtifactKind::Entity => &suffixes.entity,
            ArtifactKind::Dto => &suffixes.dto,
            ArtifactKind::Mapper | ArtifactKind::MapperXml => &suffixes.mapper,
            ArtifactKind::Service => &suffixes.service,
            ArtifactKind::ServiceImpl => &suffixes.service_impl,
            ArtifactKind::Controller => &suffixes.controller,
            ArtifactKind::BaseResponseDto => return "BaseResponseDto".to_string(),
            ArtifactKind::Result => return "Result".to_string(),
        };
        format!("{}{}", entity_name, suffix)
    }

    /// `<base>/<layer package as directories>/<stem>.<ext>`
    pub fn output_path(self, base: &Path, entity_name: &str, options: &GenerationOptions) -> PathBuf {
        let layers = &options.layers;
        let package = match self.layer() {
            Layer::Entity => &layers.entity,
            Layer::Dto => &layers.dto,
            Layer::Mapper => &layers.mapper,
            Layer::Service => &layers.service,
            Layer::ServiceImpl => &layers.service_impl,
            Layer::Controller => &layers.controller,
            Layer::Util => &layers.util,
        };

        let mut path = base.to_path_buf();
        for segment in package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!(
            "{}.{}",
            self.file_stem(entity_name, options),
            self.extension()
        ));
        path
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Entity => "entity",
            ArtifactKind::Dto => "dto",
            ArtifactKind::Mapper => "mapper",
            ArtifactKind::MapperXml => "mapper_xml",
            ArtifactKind::Service => "service",
            ArtifactKind::ServiceImpl => "service_impl",
            ArtifactKind::Controller => "controller",
            ArtifactKind::BaseResponseDto => "base_response_dto",
            ArtifactKind::Result => "result",
        };
        f.write_str(name)
    }
}
