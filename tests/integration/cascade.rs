//! Cascade loading against real files.

use dual_env::cascade::{EffectiveEnvironment, EnvCascadeLoader, Tier};
use dual_env::service::{ServiceLayout, ServiceName};
use dual_env::CascadeError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::write_file;

#[test]
fn base_and_service_files_resolve_with_provenance() {
    let root = TempDir::new().unwrap();
    write_file(
        root.path(),
        ".env.base",
        "DATABASE_URL=postgres://base\nLOG_LEVEL=info\n",
    );
    write_file(
        root.path(),
        "apps/api/.env",
        "DATABASE_URL=postgres://override\n",
    );

    let layout = ServiceLayout::new(root.path(), ServiceName::Api).unwrap();
    let (env, provenance) = EnvCascadeLoader::new()
        .load(&layout.sources(), EffectiveEnvironment::new())
        .unwrap();

    assert_eq!(env.get("DATABASE_URL"), Some("postgres://override"));
    assert_eq!(env.get("LOG_LEVEL"), Some("info"));
    assert_eq!(
        provenance.variables(Tier::BASE),
        ["DATABASE_URL", "LOG_LEVEL"]
    );
    assert_eq!(provenance.variables(Tier::SERVICE), ["DATABASE_URL"]);
}

#[test]
fn services_share_base_but_not_service_files() {
    let root = TempDir::new().unwrap();
    write_file(root.path(), ".env.base", "REDIS_URL=redis://shared\n");
    write_file(root.path(), "apps/api/.env", "API_KEY=api-only\n");

    let layout = ServiceLayout::new(root.path(), ServiceName::Worker).unwrap();
    let (env, provenance) = EnvCascadeLoader::new()
        .load(&layout.sources(), EffectiveEnvironment::new())
        .unwrap();

    assert_eq!(env.get("REDIS_URL"), Some("redis://shared"));
    assert_eq!(env.get("API_KEY"), None);
    assert!(!provenance.get(Tier::SERVICE).unwrap().parsed.existed);
}

#[test]
fn missing_files_leave_inherited_environment_intact() {
    let root = TempDir::new().unwrap();
    let inherited: EffectiveEnvironment = [("NODE_ENV", "production")].into_iter().collect();

    let layout = ServiceLayout::new(root.path(), ServiceName::Api).unwrap();
    let (env, provenance) = EnvCascadeLoader::new()
        .load(&layout.sources(), inherited.clone())
        .unwrap();

    assert_eq!(env, inherited);
    assert_eq!(provenance.len(), 2);
    assert!(provenance.iter().all(|loaded| !loaded.parsed.existed));
}

#[test]
fn context_override_wins_over_both_tiers() {
    let root = TempDir::new().unwrap();
    let parent = TempDir::new().unwrap();
    write_file(root.path(), ".env.base", "DEBUG=false\nLOG_LEVEL=info\n");
    write_file(root.path(), "apps/worker/.env", "DEBUG=maybe\n");
    write_file(
        parent.path(),
        ".dual/.local/service/worker/.env",
        "# local override\nDEBUG=true\n",
    );

    let layout = ServiceLayout::new(root.path(), ServiceName::Worker)
        .unwrap()
        .with_context_root(parent.path())
        .unwrap();
    let (env, provenance) = EnvCascadeLoader::new()
        .load(&layout.sources(), EffectiveEnvironment::new())
        .unwrap();

    assert_eq!(env.get("DEBUG"), Some("true"));
    assert_eq!(env.get("LOG_LEVEL"), Some("info"));
    assert_eq!(provenance.variables(Tier::CONTEXT), ["DEBUG"]);
}

#[test]
fn non_utf8_file_aborts_loading() {
    let root = TempDir::new().unwrap();
    write_file(root.path(), ".env.base", [b'A', b'=', 0xff, 0xfe, b'\n']);

    let layout = ServiceLayout::new(root.path(), ServiceName::Api).unwrap();
    let err = EnvCascadeLoader::new()
        .load(&layout.sources(), EffectiveEnvironment::new())
        .unwrap_err();

    match err {
        CascadeError::SourceUnreadable { path, .. } => assert_eq!(path, layout.base_file()),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn symlink_loop_aborts_loading() {
    let root = TempDir::new().unwrap();
    let base = root.path().join(".env.base");
    std::os::unix::fs::symlink(&base, &base).unwrap();

    let layout = ServiceLayout::new(root.path(), ServiceName::Api).unwrap();
    let err = EnvCascadeLoader::new()
        .load(&layout.sources(), EffectiveEnvironment::new())
        .unwrap_err();

    match err {
        CascadeError::SourceUnreadable { path, .. } => assert_eq!(path, layout.base_file()),
        other => panic!("unexpected error: {other}"),
    }
}
