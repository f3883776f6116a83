//! Gradle configuration templates for the Hibernate test suite
//!
//! Rendering is plain string formatting: identical input yields identical
//! bytes. Values are inserted verbatim; quotes inside them are not escaped.

use crate::error::Result;
use crate::variant::ResolvedConfig;
use regex::Regex;
use std::path::PathBuf;

/// Destination of the database bundle file, relative to the workspace root
pub const DATABASE_GRADLE_PATH: &str = "hibernate-orm/gradle/databases.gradle";

/// Destination of the documentation module build file, relative to the workspace root
pub const DOCUMENTATION_GRADLE_PATH: &str = "hibernate-orm/documentation/documentation.gradle";

/// A generated file and where it goes inside the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Path relative to the workspace root
    pub target_path: PathBuf,
    /// Exact file contents
    pub content: String,
}

/// Render `gradle/databases.gradle`
///
/// Declares a single `spanner` entry in `dbBundle` and selects it as `db`.
pub fn render_database_config(config: &ResolvedConfig) -> String {
    format!(
        r#"
ext {{
        db = 'spanner'
        dbBundle = [
                spanner : [
                        'db.dialect' : '{dialect_class}',
                        'jdbc.driver' : '{driver_class}',
                        'jdbc.user' : '',
                        'jdbc.pass' : '',
                        'jdbc.url' : '{jdbc_url}',
                ],
        ]
}}
"#,
        dialect_class = config.dialect_class_name,
        driver_class = config.driver_class_name,
        jdbc_url = config.jdbc_url,
    )
}

/// Render `documentation/documentation.gradle`
///
/// The driver jar is pulled from `libs/` in the root project; the subject
/// artifact comes from the local Maven repository.
pub fn render_documentation_config(config: &ResolvedConfig) -> String {
    format!(
        r#"
apply from: rootProject.file( 'gradle/java-module.gradle' )

apply plugin: 'hibernate-matrix-testing'

repositories {{
    mavenLocal()
}}

dependencies {{
    ext.pressgangVersion = '3.0.0'

    // Spanner-Hibernate testing deps
    compile files("$rootProject.projectDir/libs/{jdbc_jar}")
    testCompile "our-team:spanner-hibernate-comparison:1.0-SNAPSHOT"

    compile( libraries.jpa )
    compile( project( ':hibernate-core' ) )
    annotationProcessor( project( ':hibernate-jpamodelgen' ) )

    testCompile( 'org.apache.commons:commons-lang3:3.4' )

    testCompile( project(':hibernate-envers') )
    testCompile( project(':hibernate-spatial') )
    testCompile( project(path: ':hibernate-core', configuration: 'tests') )

    testCompile( project(':hibernate-testing') )

    testCompile "org.osgi:org.osgi.core:4.3.1"

    testCompile( libraries.mockito )
    testCompile( libraries.mockito_inline )

    testCompile( project( ':hibernate-jcache' ) )
    testRuntime( libraries.ehcache3 )
}}

// Not used; needed because this task is referenced in other gradle files.
task buildDocsForPublishing {{
    group 'Documentation'
    description 'Grouping task for building all documentation for publishing (release)'
}}
"#,
        jdbc_jar = config.jar_file_name,
    )
}

/// Render both files paired with their destinations
pub fn render_artifacts(config: &ResolvedConfig) -> [RenderedArtifact; 2] {
    [
        RenderedArtifact {
            target_path: PathBuf::from(DATABASE_GRADLE_PATH),
            content: render_database_config(config),
        },
        RenderedArtifact {
            target_path: PathBuf::from(DOCUMENTATION_GRADLE_PATH),
            content: render_documentation_config(config),
        },
    ]
}

/// Extract `'key' : 'value'` map entries from Groovy text, in order
pub fn bundle_entries(text: &str) -> Result<Vec<(String, String)>> {
    let regex = Regex::new(r"'([^']+)'\s*:\s*'([^']*)'")?;
    Ok(regex
        .captures_iter(text)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect())
}

/// Extract jar names referenced via `files("$rootProject.projectDir/libs/...")`
pub fn local_jars(text: &str) -> Result<Vec<String>> {
    let regex = Regex::new(r#"files\("\$rootProject\.projectDir/libs/([^"]+)"\)"#)?;
    Ok(regex
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect())
}
