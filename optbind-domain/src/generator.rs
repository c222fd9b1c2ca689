use crate::cache::cache_key;
use crate::defaults::typed_default;
use crate::describe::option_doc;
use crate::error::GenerationError;
use crate::targets::{BoundOption, GenerateRequest, RenderContext, Target, TargetProfile};
use crate::template::{self, TemplateSet};
use optbind_types::generation::{GeneratedFile, Generation, GenerationSummary};
use optbind_types::options::{OptionDescriptor, OptionSchema};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Schema options split into what the target exposes and what it skips.
#[derive(Debug, Clone)]
pub struct BoundSchema<'a> {
    /// Schema order.
    pub bound: Vec<BoundOption<'a>>,
    /// Options the profile marks unsupported, schema order.
    pub unsupported: Vec<&'a OptionDescriptor>,
}

impl BoundSchema<'_> {
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            bound: self.bound.len() as u64,
            unsupported: self.unsupported.len() as u64,
            deprecated: self.bound.iter().filter(|b| b.binding.deprecated).count() as u64,
        }
    }
}

/// Bind every option up front, so an option the target cannot express fails
/// the run even when no template renders it.
pub fn bind_schema<'a>(
    schema: &'a OptionSchema,
    target: &dyn Target,
    profile: &TargetProfile,
) -> Result<BoundSchema<'a>, GenerationError> {
    for id in profile.unsupported.iter().chain(profile.renames.keys()) {
        if schema.find(id).is_none() {
            warn!(target = %target.id(), option = %id, "profile names an option the schema does not declare");
        }
    }

    let mut bound = Vec::with_capacity(schema.options.len());
    let mut unsupported = Vec::new();
    let mut names: BTreeMap<String, &str> = BTreeMap::new();

    for opt in &schema.options {
        if profile.unsupported.contains(&opt.id) {
            unsupported.push(opt);
            continue;
        }

        let binding = target.bind(opt, profile)?;
        if let Some(other) = names.insert(binding.accessor.clone(), &opt.id) {
            return Err(GenerationError::UnsupportedType {
                option: opt.id.clone(),
                target: target.id(),
                reason: format!(
                    "accessor {} collides with option '{other}'",
                    binding.accessor
                ),
            });
        }

        bound.push(BoundOption {
            option: opt,
            doc: option_doc(opt, schema, &profile.renames)?,
            default: typed_default(opt)?,
            binding,
        });
    }

    Ok(BoundSchema { bound, unsupported })
}

/// Render every output of `target`.
///
/// Pure: no I/O, no globals. Identical inputs give byte-identical files,
/// sorted by path.
pub fn generate(
    schema: &OptionSchema,
    target: &dyn Target,
    templates: &TemplateSet,
    request: &GenerateRequest,
) -> Result<Generation, GenerationError> {
    let cache_key = cache_key(target.id(), request, schema, templates)?;
    let bound = bind_schema(schema, target, &request.profile)?;

    let mut files = Vec::with_capacity(target.outputs().len());
    for output in target.outputs() {
        let ctx = RenderContext {
            request,
            output,
            bound: &bound.bound,
            unsupported: &bound.unsupported,
        };
        let contents = template::render(templates, output.template, |d| target.expand(d, &ctx))?;
        let path = output.path(request);
        debug!(target = %target.id(), path = %path, bytes = contents.len(), "rendered");
        files.push(GeneratedFile { path, contents });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(Generation {
        target: target.id(),
        cache_key,
        files,
        summary: bound.summary(),
    })
}
