#![no_main]

//! Fuzz target for template expansion.
//!
//! Arbitrary template text (unknown directives, include loops, stray `${`)
//! must produce an error or output, never a panic or a hang.

use libfuzzer_sys::fuzz_target;
use optbind_domain::{GenerateRequest, TemplateSet, builtin_template_files, generate, target_for};
use optbind_types::options::{OptionDescriptor, OptionKind, OptionSchema};
use optbind_types::target::TargetId;

#[derive(Debug, arbitrary::Arbitrary)]
struct TemplateInput {
    maven: bool,
    /// Replaces the template at this index of the builtin set.
    slot: u8,
    text: String,
}

fuzz_target!(|input: TemplateInput| {
    let id = if input.maven {
        TargetId::Maven
    } else {
        TargetId::Gradle
    };
    let files = builtin_template_files(id);
    let slot = usize::from(input.slot) % files.len();

    let mut set: TemplateSet = files.iter().copied().collect();
    set.insert(files[slot].0, input.text);

    let schema = OptionSchema::new(vec![
        OptionDescriptor::flag("dry-run", "Run without writing."),
        OptionDescriptor::new("config", "Configuration files.", OptionKind::Repeatable),
    ]);
    let request = GenerateRequest::new("org.example", "Options");
    let _ = generate(&schema, target_for(id).as_ref(), &set, &request);
});
