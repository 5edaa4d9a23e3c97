// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Template Workspaces
// Description: Temporary project layouts seeded from the shipped templates.
// Purpose: Give each scenario an isolated templates/ tree and armcheck.toml.
// Dependencies: armcheck-core, serde_json, tempfile
// ============================================================================

//! A [`Workspace`] mirrors the repository layout the CLI expects by default:
//! `templates/<variant>/azuredeploy.json` plus the parameters file, with an
//! `armcheck.toml` next to them.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use armcheck_core::TemplateVariant;
use serde_json::Value;
use tempfile::TempDir;

/// Template file name inside a family directory.
pub const TEMPLATE_FILE: &str = "azuredeploy.json";
/// Parameters file name inside a family directory.
pub const PARAMETERS_FILE: &str = "azuredeploy.parameters.json";

/// Repository copy of a shipped family directory.
pub fn shipped_dir(variant: TemplateVariant) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../templates").join(variant.as_str())
}

/// Isolated project directory with both template families.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a workspace holding copies of every shipped template family.
    pub fn new() -> io::Result<Self> {
        let dir = TempDir::new()?;
        for variant in TemplateVariant::ALL {
            let target = dir.path().join("templates").join(variant.as_str());
            fs::create_dir_all(&target)?;
            for name in [TEMPLATE_FILE, PARAMETERS_FILE] {
                fs::copy(shipped_dir(variant).join(name), target.join(name))?;
            }
        }
        Ok(Self {
            dir,
        })
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Template path for `variant` inside the workspace.
    pub fn template_path(&self, variant: TemplateVariant) -> PathBuf {
        self.family_dir(variant).join(TEMPLATE_FILE)
    }

    /// Parameters path for `variant` inside the workspace.
    pub fn parameters_path(&self, variant: TemplateVariant) -> PathBuf {
        self.family_dir(variant).join(PARAMETERS_FILE)
    }

    /// Writes `armcheck.toml` at the workspace root.
    pub fn write_config(&self, contents: &str) -> io::Result<PathBuf> {
        let path = self.root().join("armcheck.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Rewrites the template for `variant` through `edit`.
    pub fn edit_template(
        &self,
        variant: TemplateVariant,
        edit: impl FnOnce(&mut Value),
    ) -> io::Result<()> {
        let path = self.template_path(variant);
        let mut value: Value = serde_json::from_slice(&fs::read(&path)?)?;
        edit(&mut value);
        fs::write(&path, serde_json::to_vec_pretty(&value)?)
    }

    /// Writes an executable shell script named `name` and returns its path.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> io::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
        let mut permissions = fs::metadata(&path)?.permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions)?;
        Ok(path)
    }

    fn family_dir(&self, variant: TemplateVariant) -> PathBuf {
        self.root().join("templates").join(variant.as_str())
    }
}
