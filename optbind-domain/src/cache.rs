use crate::error::GenerationError;
use crate::targets::GenerateRequest;
use crate::template::TemplateSet;
use optbind_hash::CacheKeyBuilder;
use optbind_types::options::OptionSchema;
use optbind_types::target::TargetId;
use serde::Serialize;

/// Version of the generator; part of every cache key.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key over everything that can change generated output: generator version,
/// target, request, canonical schema JSON and every template in the set.
pub fn cache_key(
    target: TargetId,
    request: &GenerateRequest,
    schema: &OptionSchema,
    templates: &TemplateSet,
) -> Result<String, GenerationError> {
    let mut builder = CacheKeyBuilder::new()
        .field("generator", GENERATOR_VERSION)
        .field("target", target.as_str())
        .field("request", canonical_json("request", request)?)
        .field("schema", canonical_json("schema", schema)?);

    for (name, contents) in templates.iter() {
        builder.push("template", name.as_bytes());
        builder.push("contents", contents.as_bytes());
    }
    Ok(builder.finish())
}

fn canonical_json<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, GenerationError> {
    serde_json::to_vec(value).map_err(|e| GenerationError::Encode {
        what,
        message: e.to_string(),
    })
}
