//! # Relationship Linker
//!
//! Adds foreign-key relationship properties to modules that are already on
//! disk. For a foreign key `owner.column -> referenced`:
//!
//! - the owning module gains `<referenced>: <referenced>[]` and an import of
//!   the referenced module (unless it references itself);
//! - the referenced module gains `<owner>: <owner>[]` and an import of the
//!   owning module (again, unless they are the same module).
//!
//! If the referenced module does not exist, a placeholder is written first
//! so there is something to patch.
//!
//! Every file is loaded into a [`TypeModule`], changed through set-gated
//! additions and written back only if something changed. A second pass over
//! the same foreign keys therefore finds every property and import already
//! present and writes nothing.
//!
//! The referenced module is written back once per foreign key; the owning
//! module once at the end of its pass. Owning tables must be linked one at a
//! time, since two of them can patch the same referenced module.

use std::path::Path;

use crate::codegen::module::TypeModule;
use crate::codegen::naming::ReservedWords;
use crate::error::Result;
use crate::output::workspace::Workspace;
use crate::schema::types::ForeignKey;

/// Counts of what a linking pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub properties_added: usize,
    pub imports_added: usize,
    pub placeholders_created: usize,
    pub modules_written: usize,
}

impl LinkReport {
    pub fn is_unchanged(&self) -> bool {
        *self == LinkReport::default()
    }

    pub fn merge(&mut self, other: LinkReport) {
        self.properties_added += other.properties_added;
        self.imports_added += other.imports_added;
        self.placeholders_created += other.placeholders_created;
        self.modules_written += other.modules_written;
    }
}

pub struct Linker<'a> {
    workspace: &'a Workspace,
    reserved: &'a ReservedWords,
}

impl<'a> Linker<'a> {
    pub fn new(workspace: &'a Workspace, reserved: &'a ReservedWords) -> Self {
        Self {
            workspace,
            reserved,
        }
    }

    /// Link every foreign key owned by `owner`.
    ///
    /// The owning module must exist; a missing or unreadable owning module
    /// is an error. Missing referenced modules are created as placeholders.
    pub fn link_table(&self, owner: &str, foreign_keys: &[ForeignKey]) -> Result<LinkReport> {
        let mut report = LinkReport::default();
        if foreign_keys.is_empty() {
            return Ok(report);
        }

        let owner_ident = self.reserved.module_identifier(owner).into_owned();
        let owner_path = self.workspace.module_path(&owner_ident);
        let mut owning = TypeModule::load(&owner_path)?;
        let mut owning_changed = false;

        for fk in foreign_keys {
            let target_ident = self.reserved.module_identifier(&fk.referenced_table).into_owned();

            // Forward property on the owning module.
            if owning.add_relationship(&target_ident) {
                report.properties_added += 1;
                owning_changed = true;
            } else {
                tracing::debug!(
                    "{}.{}: property '{}' already present",
                    owner,
                    fk.column_name,
                    target_ident
                );
            }

            if target_ident == owner_ident {
                // Self reference: the reverse property is the forward one,
                // and a module never imports itself.
                continue;
            }

            if owning.add_import(&target_ident) {
                report.imports_added += 1;
                owning_changed = true;
            }

            let target_path = self.workspace.module_path(&target_ident);
            if !target_path.exists() {
                TypeModule::placeholder(target_ident.as_str()).save(&target_path)?;
                report.placeholders_created += 1;
                report.modules_written += 1;
                tracing::info!("Created placeholder file: {}", target_path.display());
            }

            let reverse = self.link_reverse(&target_path, &owner_ident)?;
            report.merge(reverse);
        }

        if owning_changed {
            owning.save(&owner_path)?;
            report.modules_written += 1;
            tracing::info!("Updated file with foreign keys: {}", owner_path.display());
        }

        Ok(report)
    }

    /// Patch the referenced module at `target_path` with a property and an
    /// import pointing back at `owner_ident`.
    fn link_reverse(&self, target_path: &Path, owner_ident: &str) -> Result<LinkReport> {
        let mut report = LinkReport::default();
        let mut target = TypeModule::load(target_path)?;

        if target.add_relationship(owner_ident) {
            report.properties_added += 1;
        }
        if target.add_import(owner_ident) {
            report.imports_added += 1;
        }

        if report.is_unchanged() {
            tracing::debug!(
                "{}: reverse relationship to '{}' already present",
                target_path.display(),
                owner_ident
            );
            return Ok(report);
        }

        target.save(target_path)?;
        report.modules_written += 1;
        tracing::info!(
            "Updated file with reverse relationship: {}",
            target_path.display()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::module::Property;
    use crate::output::workspace::prepare;
    use tempfile::tempdir;

    fn write(workspace: &Workspace, module: &TypeModule) {
        module
            .save(&workspace.module_path(module.identifier()))
            .unwrap();
    }

    fn read(workspace: &Workspace, ident: &str) -> String {
        std::fs::read_to_string(workspace.module_path(ident)).unwrap()
    }

    fn module(ident: &str, props: &[&str]) -> TypeModule {
        let mut m = TypeModule::new(ident);
        for p in props {
            m.add_property(Property::new(*p, "number", false));
        }
        m
    }

    #[test]
    fn test_links_both_directions() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();
        write(&workspace, &module("users", &["id"]));
        write(&workspace, &module("posts", &["id", "user_id"]));

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        let report = linker
            .link_table("posts", &[ForeignKey::new("user_id", "users")])
            .unwrap();

        assert_eq!(
            read(&workspace, "posts"),
            "import type { users } from './users';\n\nexport type posts = {\n    id: number;\n    user_id: number;\n    users: users[];\n}\n"
        );
        assert_eq!(
            read(&workspace, "users"),
            "import type { posts } from './posts';\n\nexport type users = {\n    id: number;\n    posts: posts[];\n}\n"
        );
        assert_eq!(report.properties_added, 2);
        assert_eq!(report.imports_added, 2);
        assert_eq!(report.modules_written, 2);
        assert_eq!(report.placeholders_created, 0);
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();
        write(&workspace, &module("users", &["id"]));
        write(&workspace, &module("posts", &["id", "user_id", "editor_id"]));

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        let fks = [
            ForeignKey::new("user_id", "users"),
            ForeignKey::new("editor_id", "users"),
        ];
        linker.link_table("posts", &fks).unwrap();
        let posts = read(&workspace, "posts");
        let users = read(&workspace, "users");

        let report = linker.link_table("posts", &fks).unwrap();
        assert!(report.is_unchanged());
        assert_eq!(read(&workspace, "posts"), posts);
        assert_eq!(read(&workspace, "users"), users);
        assert_eq!(posts.matches("users: users[];").count(), 1);
        assert_eq!(posts.matches("import type { users }").count(), 1);
    }

    #[test]
    fn test_self_reference() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();
        write(&workspace, &module("employees", &["id", "manager_id"]));

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        linker
            .link_table("employees", &[ForeignKey::new("manager_id", "employees")])
            .unwrap();

        assert_eq!(
            read(&workspace, "employees"),
            "export type employees = {\n    id: number;\n    manager_id: number;\n    employees: employees[];\n}\n"
        );
    }

    #[test]
    fn test_missing_target_gets_placeholder() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();
        write(&workspace, &module("posts", &["id", "user_id"]));

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        let report = linker
            .link_table("posts", &[ForeignKey::new("user_id", "users")])
            .unwrap();

        assert_eq!(report.placeholders_created, 1);
        assert_eq!(
            read(&workspace, "users"),
            "import type { posts } from './posts';\n\nexport type users = {\n    posts: posts[];\n}\n"
        );
    }

    #[test]
    fn test_reserved_names_are_escaped() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();
        write(&workspace, &module("_class", &["id"]));
        write(&workspace, &module("students", &["id", "class_id"]));

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        linker
            .link_table("students", &[ForeignKey::new("class_id", "class")])
            .unwrap();

        assert!(read(&workspace, "students").contains("import type { _class } from './_class';"));
        assert!(read(&workspace, "students").contains("    _class: _class[];\n"));
        assert!(read(&workspace, "_class").contains("    students: students[];\n"));
        assert!(!workspace.module_path("class").exists());
    }

    #[test]
    fn test_missing_owning_module_is_fatal() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        let result = linker.link_table("posts", &[ForeignKey::new("user_id", "users")]);
        assert!(result.is_err());
        assert!(!workspace.module_path("users").exists());
    }

    #[test]
    fn test_no_foreign_keys_does_not_touch_disk() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        let report = linker.link_table("ghost", &[]).unwrap();
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_existing_column_named_after_target_blocks_forward_property() {
        let root = tempdir().unwrap();
        let workspace = prepare(root.path()).unwrap();
        write(&workspace, &module("users", &["id"]));
        write(&workspace, &module("posts", &["id", "users"]));

        let reserved = ReservedWords::typescript();
        let linker = Linker::new(&workspace, &reserved);
        linker
            .link_table("posts", &[ForeignKey::new("users", "users")])
            .unwrap();

        let posts = read(&workspace, "posts");
        assert!(posts.contains("    users: number;\n"));
        assert!(!posts.contains("users[]"));
        assert!(posts.contains("import type { users } from './users';"));
    }
}
