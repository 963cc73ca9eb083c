use super::{Database, Resource};
use crate::{bail, Result};

use std::collections::HashSet;

struct Verify<'a> {
    database: &'a Database,
}

impl Database {
    /// Checks the structural invariants of the document.
    ///
    /// The assembler only produces documents that pass; this exists so tests
    /// and downstream tools can check documents they construct or modify.
    pub fn verify(&self) -> Result<()> {
        Verify { database: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        self.verify_datapackage_names_are_unique()?;

        for datapackage in &self.database.datapackages {
            for resource in &datapackage.resources {
                self.verify_field_names_are_unique(&datapackage.name, resource)?;
                self.verify_primary_key_fields_exist(&datapackage.name, resource)?;
                self.verify_foreign_key_arity(&datapackage.name, resource)?;
            }
        }

        Ok(())
    }

    fn verify_datapackage_names_are_unique(&self) -> Result<()> {
        let mut names = HashSet::new();

        for datapackage in &self.database.datapackages {
            if !names.insert(&datapackage.name) {
                bail!("duplicate datapackage `{}`", datapackage.name);
            }
        }

        Ok(())
    }

    fn verify_field_names_are_unique(&self, datapackage: &str, resource: &Resource) -> Result<()> {
        let mut names = HashSet::new();

        for field in &resource.fields {
            if !names.insert(&field.name) {
                bail!(
                    "duplicate field `{}` in `{datapackage}.{}`",
                    field.name,
                    resource.name
                );
            }
        }

        Ok(())
    }

    fn verify_primary_key_fields_exist(&self, datapackage: &str, resource: &Resource) -> Result<()> {
        for name in &resource.primary_key {
            if !resource.has_field(name) {
                bail!(
                    "primary key field `{name}` missing from `{datapackage}.{}`",
                    resource.name
                );
            }
        }

        Ok(())
    }

    fn verify_foreign_key_arity(&self, datapackage: &str, resource: &Resource) -> Result<()> {
        for fk in &resource.foreign_keys {
            if fk.fields.len() != fk.reference.fields.len() {
                bail!(
                    "foreign key on `{datapackage}.{}` has {} local and {} referenced fields",
                    resource.name,
                    fk.fields.len(),
                    fk.reference.fields.len()
                );
            }
        }

        Ok(())
    }
}
