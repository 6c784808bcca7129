//! Default templates compiled into the binary

const DEFAULTS: &[(&str, &str)] = &[
    ("entity.tera", include_str!("../../templates/entity.tera")),
    ("dto.tera", include_str!("../../templates/dto.tera")),
    ("mapper.tera", include_str!("../../templates/mapper.tera")),
    ("mapper_xml.tera", include_str!("../../templates/mapper_xml.tera")),
    ("service.tera", include_str!("../../templates/service.tera")),
    ("service_impl.tera", include_str!("../../templates/service_impl.tera")),
    ("controller.tera", include_str!("../../templates/controller.tera")),
    (
        "base_response_dto.tera",
        include_str!("../../templates/base_response_dto.tera"),
    ),
    ("result.tera", include_str!("../../templates/result.tera")),
];

/// Embedded default for a template name
pub fn default_template(name: &str) -> Option<&'static str> {
    DEFAULTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, content)| *content)
}
