//! End-to-end installs into a temporary project.

use std::fs;

use pretty_assertions::assert_eq;
use rulekit_core::{
    ErrorCode, InstallConfig, InstallRequest, InstallStrategy, Installer, Severity,
    list_packages,
};
use rulekit_test_utils::{PackageFixture, rule_document};

fn installer() -> Installer {
    Installer::with_builtins().with_config(InstallConfig::default())
}

fn request(fixture: &PackageFixture) -> InstallRequest {
    InstallRequest::new(fixture.package_dir(), fixture.workdir())
}

fn project_is_empty(fixture: &PackageFixture) -> bool {
    fs::read_dir(fixture.workdir()).unwrap().next().is_none()
}

#[test]
fn document_installs_reference_stub_for_cursor() {
    let fixture = PackageFixture::new();
    let src = fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));

    let report = installer().install("style", &request(&fixture)).unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].target, "cursor");
    assert_eq!(report.results[0].output_dir, ".cursor/rules");
    assert_eq!(report.results[0].strategy, InstallStrategy::Copy);
    assert!(report.issues.is_empty());

    let canonical = fs::canonicalize(&src).unwrap();
    fixture.assert_file_contains(".cursor/rules/style.mdc", "description: Style");
    fixture.assert_file_contains(
        ".cursor/rules/style.mdc",
        &format!("@file {}", canonical.display()),
    );
}

#[test]
fn document_name_may_carry_extension() {
    let fixture = PackageFixture::new();
    fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));

    installer().install("style.mdc", &request(&fixture)).unwrap();
    fixture.assert_file_exists(".cursor/rules/style.mdc");
}

#[test]
fn existing_stub_is_left_alone() {
    let fixture = PackageFixture::new();
    fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));
    let installer = installer();

    installer.install("style", &request(&fixture)).unwrap();
    fs::write(fixture.project_path(".cursor/rules/style.mdc"), "local").unwrap();

    let report = installer.install("style", &request(&fixture)).unwrap();
    assert!(report.files[0].skipped);
    assert_eq!(fixture.read(".cursor/rules/style.mdc"), "local");
}

#[cfg(unix)]
#[test]
fn symlink_config_links_to_source() {
    let fixture = PackageFixture::new();
    let src = fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));
    let installer = Installer::with_builtins().with_config(InstallConfig {
        prefer_symlink: true,
        prefer_stow: false,
    });

    let report = installer.install("style", &request(&fixture)).unwrap();
    assert_eq!(report.results[0].strategy, InstallStrategy::Symlink);
    assert_eq!(
        fs::read_link(fixture.project_path(".cursor/rules/style.mdc")).unwrap(),
        fs::canonicalize(src).unwrap()
    );
}

#[test]
fn instructions_target_rewrites_metadata() {
    let fixture = PackageFixture::new();
    fixture.write_rule(
        "style.mdc",
        "---\ndescription: Style\napply_to:\n  - src/**/*.rs\n  - tests/**/*.rs\n---\n\nBe terse.\n",
    );

    let report = installer()
        .install("style", &request(&fixture).with_target("copilot-instr"))
        .unwrap();

    assert_eq!(report.results[0].output_dir, ".github/instructions");
    let out = fixture.read(".github/instructions/style.instructions.md");
    assert!(out.contains("description: Style"));
    assert!(out.contains("applyTo:"));
    assert!(out.contains("src/**/*.rs,tests/**/*.rs"));
    assert!(!out.contains("apply_to"));
    assert!(out.ends_with("Be terse."));
}

#[test]
fn materialized_output_is_not_rewritten_when_unchanged() {
    let fixture = PackageFixture::new();
    fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));
    let installer = installer();
    let req = request(&fixture).with_target("copilot-instr");

    let first = installer.install("style", &req).unwrap();
    assert!(!first.files[0].skipped);
    let second = installer.install("style", &req).unwrap();
    assert!(second.files[0].skipped);
}

#[test]
fn missing_document_is_not_found() {
    let fixture = PackageFixture::new();
    let err = installer().install("ghost", &request(&fixture)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.to_string().contains("ghost.mdc"));
}

#[test]
fn unknown_target_fails_before_writing() {
    let fixture = PackageFixture::new();
    fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));

    let err = installer()
        .install("style", &request(&fixture).with_target("windsurf"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert!(err.to_string().contains("copilot-instr"));
    assert!(project_is_empty(&fixture));
}

#[test]
fn installer_without_registry_is_a_precondition_failure() {
    let fixture = PackageFixture::new();
    fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));

    let err = Installer::new()
        .with_config(InstallConfig::default())
        .install("style", &request(&fixture))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::FailedPrecondition);
}

#[test]
fn escaping_name_is_rejected() {
    let fixture = PackageFixture::new();
    let err = installer().install("../etc", &request(&fixture)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn package_dir_that_is_a_file_is_rejected() {
    let fixture = PackageFixture::new();
    let file = fixture.root().join("not-a-dir");
    fs::write(&file, "x").unwrap();

    let err = installer()
        .install("style", &InstallRequest::new(file, fixture.workdir()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::FailedPrecondition);
}

#[test]
fn malformed_single_document_fails_the_install() {
    let fixture = PackageFixture::new();
    fixture.write_rule("broken.mdc", "no header here\n");

    let err = installer().install("broken", &request(&fixture)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn package_flattens_and_honours_excludes() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_rule("frontend/nested/vue.mdc", &rule_document("Vue", "SFCs."));
    fixture.write_rule("frontend/drafts/wip.mdc", &rule_document("WIP", "Later."));
    fixture.write_rule("frontend/old.mdc", &rule_document("Old", "Gone."));
    fixture.write_rule("frontend/notes.txt", "not a rule");
    fixture.write_ignore("frontend", &["# drafts", "drafts"]);

    let report = installer()
        .install(
            "frontend",
            &request(&fixture)
                .with_target("copilot-instr")
                .with_excludes(["old.mdc"]),
        )
        .unwrap();

    assert_eq!(report.files.len(), 2);
    fixture.assert_file_exists(".github/instructions/react.instructions.md");
    fixture.assert_file_exists(".github/instructions/vue.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/wip.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/old.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/notes.instructions.md");
}

#[test]
fn no_flatten_keeps_package_layout() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/nested/vue.mdc", &rule_document("Vue", "SFCs."));

    installer()
        .install(
            "frontend",
            &request(&fixture)
                .with_target("copilot-instr")
                .with_no_flatten(true),
        )
        .unwrap();
    fixture.assert_file_exists(".github/instructions/nested/vue.instructions.md");
}

#[test]
fn invalid_caller_exclude_is_rejected() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));

    let err = installer()
        .install("frontend", &request(&fixture).with_excludes(["[unclosed"]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert!(project_is_empty(&fixture));
}

#[test]
fn manifest_targets_and_overrides_apply_with_all_targets() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_manifest(
        "frontend",
        "version: \"1.0\"\ntargets: [cursor, copilot-prompt]\noverrides:\n  copilot-prompt:\n    defaultMode: agent\n    defaultTools: [codebase]\n",
    );

    let report = installer()
        .install("frontend", &request(&fixture).with_all_targets(true))
        .unwrap();

    let targets: Vec<_> = report.results.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, vec!["cursor", "copilot-prompt"]);
    assert!(report.issues.is_empty());

    fixture.assert_file_exists(".cursor/rules/react.mdc");
    let prompt = fixture.read(".github/prompts/react.prompt.md");
    assert!(prompt.contains("mode: agent"));
    assert!(prompt.contains("- codebase"));
    assert!(!prompt.contains("applyTo"));
}

#[test]
fn without_all_targets_manifest_targets_are_ignored() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_manifest("frontend", "targets: [copilot-instr]\n");

    let report = installer().install("frontend", &request(&fixture)).unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].target, "cursor");
}

#[test]
fn malformed_manifest_is_ignored() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_manifest("frontend", "targets: {not: [closed\n");

    let report = installer()
        .install("frontend", &request(&fixture).with_all_targets(true))
        .unwrap();
    assert_eq!(report.results[0].target, "cursor");
    fixture.assert_file_exists(".cursor/rules/react.mdc");
}

#[test]
fn failing_file_does_not_stop_the_package() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/good.mdc", &rule_document("Good", "Fine."));
    fixture.write_rule("frontend/bad.mdc", "no header here\n");

    let report = installer()
        .install("frontend", &request(&fixture).with_target("copilot-instr"))
        .unwrap();

    assert!(report.has_errors());
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].source.ends_with("bad.mdc"));
    assert_eq!(errors[0].code, ErrorCode::InvalidArgument);
    fixture.assert_file_exists(".github/instructions/good.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/bad.instructions.md");
}

#[test]
fn validation_failure_is_a_warning_and_file_is_written() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_manifest(
        "frontend",
        "overrides:\n  copilot-prompt:\n    defaultMode: bogus\n",
    );

    let report = installer()
        .install("frontend", &request(&fixture).with_target("copilot-prompt"))
        .unwrap();

    assert!(!report.has_errors());
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert!(warnings[0].message.contains("bogus"));
    fixture.assert_file_contains(".github/prompts/react.prompt.md", "mode: bogus");
}

#[test]
fn install_all_visits_packages_with_direct_documents() {
    let fixture = PackageFixture::new();
    fixture.write_rule("backend/api.mdc", &rule_document("API", "REST."));
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_rule("deep/only/nested.mdc", &rule_document("Nested", "Skip."));
    fixture.write_rule(".hidden/secret.mdc", &rule_document("Secret", "Skip."));
    fixture.write_rule("loose.mdc", &rule_document("Loose", "Skip."));

    assert_eq!(
        list_packages(&fixture.package_dir()).unwrap(),
        vec!["backend", "frontend"]
    );

    let report = installer()
        .install_all(&request(&fixture).with_target("copilot-instr"))
        .unwrap();
    assert_eq!(report.packages, vec!["backend", "frontend"]);
    assert_eq!(report.results.len(), 2);
    fixture.assert_file_exists(".github/instructions/api.instructions.md");
    fixture.assert_file_exists(".github/instructions/react.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/nested.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/loose.instructions.md");
}

#[test]
fn install_all_with_missing_package_dir_is_not_found() {
    let fixture = PackageFixture::new();
    let req = InstallRequest::new(fixture.root().join("nowhere"), fixture.workdir());
    let err = installer().install_all(&req).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn preview_renders_without_writing() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_rule("frontend/bad.mdc", "no header here\n");

    let items = installer()
        .preview("frontend", &request(&fixture).with_target("copilot-instr"))
        .unwrap();

    assert_eq!(items.len(), 2);
    let bad = items.iter().find(|i| i.source.ends_with("bad.mdc")).unwrap();
    assert!(bad.output.is_none());
    assert!(bad.error.is_some());

    let react = items.iter().find(|i| i.source.ends_with("react.mdc")).unwrap();
    assert_eq!(react.output_path, ".github/instructions/react.instructions.md");
    assert!(react.output.as_deref().unwrap().contains("applyTo:"));
    assert!(project_is_empty(&fixture));
}

#[cfg(unix)]
#[test]
fn symlinked_rule_is_not_parsed() {
    let fixture = PackageFixture::new();
    let src = fixture.write_rule("frontend/raw.mdc", "no header, linked as is\n");
    let installer = Installer::with_builtins().with_config(InstallConfig {
        prefer_symlink: true,
        prefer_stow: false,
    });

    let report = installer.install("frontend", &request(&fixture)).unwrap();
    assert!(report.issues.is_empty());
    assert_eq!(report.results[0].strategy, InstallStrategy::Symlink);
    assert_eq!(
        fs::read_link(fixture.project_path(".cursor/rules/raw.mdc")).unwrap(),
        fs::canonicalize(src).unwrap()
    );
}

#[test]
fn copied_rule_with_bad_header_still_fails() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/raw.mdc", "no header here\n");

    let report = installer().install("frontend", &request(&fixture)).unwrap();
    assert_eq!(report.errors().count(), 1);
    fixture.assert_file_not_exists(".cursor/rules/raw.mdc");
}

// ============================================================================
// remove
// ============================================================================

#[test]
fn remove_deletes_installed_stub() {
    let fixture = PackageFixture::new();
    let src = fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));
    let installer = installer();
    installer.install("style", &request(&fixture)).unwrap();

    let report = installer.remove("style", &request(&fixture)).unwrap();
    assert_eq!(report.name, "style");
    assert_eq!(report.removed.len(), 1);
    fixture.assert_file_not_exists(".cursor/rules/style.mdc");
    assert!(src.exists());
}

#[test]
fn remove_works_after_source_is_gone() {
    let fixture = PackageFixture::new();
    let src = fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));
    let installer = installer();
    let req = request(&fixture).with_target("copilot-prompt");
    installer.install("style.mdc", &req).unwrap();
    fs::remove_file(src).unwrap();

    installer.remove("style.mdc", &req).unwrap();
    fixture.assert_file_not_exists(".github/prompts/style.prompt.md");
}

#[test]
fn remove_package_deletes_every_output() {
    let fixture = PackageFixture::new();
    fixture.write_rule("frontend/react.mdc", &rule_document("React", "Hooks."));
    fixture.write_rule("frontend/nested/vue.mdc", &rule_document("Vue", "SFCs."));
    fixture.write_rule("other.mdc", &rule_document("Other", "Stays."));
    let installer = installer();
    let req = request(&fixture).with_target("copilot-instr");
    installer.install("frontend", &req).unwrap();
    installer.install("other", &req).unwrap();

    let report = installer.remove("frontend", &req).unwrap();
    assert_eq!(report.removed.len(), 2);
    fixture.assert_file_not_exists(".github/instructions/react.instructions.md");
    fixture.assert_file_not_exists(".github/instructions/vue.instructions.md");
    fixture.assert_file_exists(".github/instructions/other.instructions.md");
}

#[cfg(unix)]
#[test]
fn remove_unlinks_symlink_and_keeps_source() {
    let fixture = PackageFixture::new();
    let src = fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));
    let installer = Installer::with_builtins().with_config(InstallConfig {
        prefer_symlink: true,
        prefer_stow: false,
    });
    installer.install("style", &request(&fixture)).unwrap();

    installer.remove("style", &request(&fixture)).unwrap();
    fixture.assert_file_not_exists(".cursor/rules/style.mdc");
    assert_eq!(fs::read_to_string(src).unwrap(), rule_document("Style", "Be terse."));
}

#[test]
fn remove_without_installed_output_is_not_found() {
    let fixture = PackageFixture::new();
    fixture.write_rule("style.mdc", &rule_document("Style", "Be terse."));

    let err = installer().remove("style", &request(&fixture)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.to_string().contains(".cursor/rules/style.mdc"));
}

#[test]
fn remove_rejects_escaping_name_and_unknown_target() {
    let fixture = PackageFixture::new();
    let err = installer().remove("../etc", &request(&fixture)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);

    let err = installer()
        .remove("style", &request(&fixture).with_target("windsurf"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}
