//! Target explanations for the `optbind explain` and `list-targets` commands.

use optbind_types::target::TargetId;

/// How one schema option shape maps onto a target construct.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    pub shape: &'static str,
    pub construct: &'static str,
}

/// Human-facing documentation for a target.
#[derive(Debug, Clone)]
pub struct TargetExplanation {
    pub id: TargetId,
    pub title: &'static str,
    pub details: &'static str,
    pub mappings: &'static [TypeMapping],
}

pub static TARGET_REGISTRY: &[TargetExplanation] = &[
    TargetExplanation {
        id: TargetId::Gradle,
        title: "Gradle extension, task base and argument converter",
        details: r#"Every supported option becomes a lazy Gradle property on an interface
named after the requested class. A second interface adds the task input
annotations, and an internal converter class turns configured properties
back into command-line arguments.

Option defaults become `convention(..)` calls in `applyDefaultConventions`.
File defaults are documented only, since they depend on the project layout.
Deprecated options keep their property, carry `@Deprecated`, and log a
warning when they are set."#,
        mappings: &[
            TypeMapping {
                shape: "flag",
                construct: "Property<Boolean>",
            },
            TypeMapping {
                shape: "value / choice (string)",
                construct: "Property<String>",
            },
            TypeMapping {
                shape: "value integer",
                construct: "Property<Integer>",
            },
            TypeMapping {
                shape: "value long",
                construct: "Property<Long>",
            },
            TypeMapping {
                shape: "value file",
                construct: "RegularFileProperty",
            },
            TypeMapping {
                shape: "repeatable file",
                construct: "ConfigurableFileCollection",
            },
            TypeMapping {
                shape: "repeatable string / integer / long",
                construct: "ListProperty<..>",
            },
            TypeMapping {
                shape: "repeatable counter",
                construct: "MapProperty<String, Integer>",
            },
            TypeMapping {
                shape: "value counter",
                construct: "(unsupported)",
            },
        ],
    },
    TargetExplanation {
        id: TargetId::Maven,
        title: "Maven abstract mojo",
        details: r#"Every supported option becomes a setter on an abstract mojo, annotated
with `@Parameter`. Single-valued options get a user property when a
property prefix is configured (`rat` gives `-Drat.addLicense`), and
options that are not deprecated carry their default as `defaultValue`.

Counter options have no parameter form and fail generation unless the
profile marks them unsupported."#,
        mappings: &[
            TypeMapping {
                shape: "flag",
                construct: "boolean",
            },
            TypeMapping {
                shape: "value / choice",
                construct: "String",
            },
            TypeMapping {
                shape: "repeatable",
                construct: "String[]",
            },
            TypeMapping {
                shape: "counter",
                construct: "(unsupported)",
            },
        ],
    },
];

pub fn lookup_target(key: &str) -> Option<&'static TargetExplanation> {
    let id: TargetId = key.parse().ok()?;
    TARGET_REGISTRY.iter().find(|t| t.id == id)
}

pub fn list_target_keys() -> Vec<&'static str> {
    TARGET_REGISTRY.iter().map(|t| t.id.as_str()).collect()
}
