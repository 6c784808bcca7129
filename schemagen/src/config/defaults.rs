//! Default configuration values - single source of truth

/// Config file searched for when none is given (any supported extension)
pub const CONFIG_FILE_STEM: &str = "schemagen";

/// Prefix for environment overrides, e.g. `SCHEMAGEN_DATABASE__PASSWORD`
pub const ENV_PREFIX: &str = "SCHEMAGEN";

/// Default base output directory
pub const BASE_OUTPUT_DIR: &str = "./generated";

/// Whether existing files are overwritten by default
pub const OVERWRITE_ENABLE: bool = false;

/// Whether Lombok annotations are emitted by default
pub const LOMBOK_ENABLE: bool = false;

/// Whether API documentation annotations are emitted by default
pub const API_DOC_ENABLE: bool = false;

/// Default API documentation flavour
pub const API_DOC_TYPE: &str = "swagger";

/// Default API documentation version
pub const API_DOC_VERSION: &str = "3.0";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Default layer package segments
pub mod layer_package {
    pub const DTO: &str = "dto";
    pub const ENTITY: &str = "domain";
    pub const SERVICE: &str = "service";
    pub const SERVICE_IMPL: &str = "service.impl";
    pub const MAPPER: &str = "mapper";
    pub const CONTROLLER: &str = "controller";
    pub const UTIL: &str = "utils";
}

/// Default class-name suffixes per layer
pub mod layer_suffix {
    pub const ENTITY: &str = "";
    pub const DTO: &str = "Dto";
    pub const SERVICE: &str = "Service";
    pub const SERVICE_IMPL: &str = "ServiceImpl";
    pub const MAPPER: &str = "Mapper";
    pub const CONTROLLER: &str = "Controller";
}
