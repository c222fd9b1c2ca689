use crate::template::TemplateSet;
use optbind_types::target::TargetId;

const GRADLE: &[(&str, &str)] = &[
    ("Args.tpl", include_str!("../templates/gradle/Args.tpl")),
    (
        "GradleConfiguration.tpl",
        include_str!("../templates/gradle/GradleConfiguration.tpl"),
    ),
    (
        "GradleOptions.tpl",
        include_str!("../templates/gradle/GradleOptions.tpl"),
    ),
    (
        "GradleTaskBase.tpl",
        include_str!("../templates/gradle/GradleTaskBase.tpl"),
    ),
];

const MAVEN: &[(&str, &str)] = &[("Maven.tpl", include_str!("../templates/maven/Maven.tpl"))];

/// Raw `(name, contents)` pairs of the templates shipped with the crate.
pub fn builtin_template_files(target: TargetId) -> &'static [(&'static str, &'static str)] {
    match target {
        TargetId::Gradle => GRADLE,
        TargetId::Maven => MAVEN,
    }
}

pub fn builtin_templates(target: TargetId) -> TemplateSet {
    builtin_template_files(target).iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::target_for;

    #[test]
    fn every_output_template_is_shipped() {
        for id in TargetId::ALL {
            let set = builtin_templates(id);
            for output in target_for(id).outputs() {
                assert!(set.get(output.template).is_some(), "{id}: {}", output.template);
            }
        }
    }
}
