use crate::error::TableError;
use std::collections::BTreeSet;
use tffix_types::table::{FixTable, ModuleFixEntry};

/// Check every entry against the fix-table invariants.
pub fn validate_table(table: &FixTable) -> Result<(), TableError> {
    for entry in &table.modules {
        validate_entry(entry)?;
    }
    Ok(())
}

fn validate_entry(entry: &ModuleFixEntry) -> Result<(), TableError> {
    let module = entry.label();

    if entry.version_file.is_none() && entry.variables_file.is_none() {
        return Err(TableError::EmptyModule { module });
    }
    if entry.version_file.is_none() && !entry.providers.is_empty() {
        return Err(TableError::ProvidersWithoutVersionFile { module });
    }
    if entry.variables_file.is_none() && !entry.variables.is_empty() {
        return Err(TableError::VariablesWithoutVariablesFile { module });
    }

    let mut seen = BTreeSet::new();
    for provider in &entry.providers {
        if !is_identifier(&provider.name) {
            return Err(TableError::InvalidProviderName {
                module,
                provider: provider.name.clone(),
            });
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(TableError::DuplicateProvider {
                module,
                provider: provider.name.clone(),
            });
        }
        for (field, value) in [("source", &provider.source), ("version", &provider.version)] {
            if value.trim().is_empty() {
                return Err(TableError::EmptyProviderField {
                    module,
                    provider: provider.name.clone(),
                    field,
                });
            }
        }
    }

    let mut seen = BTreeSet::new();
    for fix in &entry.variables {
        if !is_identifier(&fix.name) {
            return Err(TableError::InvalidVariableName {
                module,
                variable: fix.name.clone(),
            });
        }
        if !seen.insert(fix.name.as_str()) {
            return Err(TableError::DuplicateVariable {
                module,
                variable: fix.name.clone(),
            });
        }
        if fix.ty.is_none() && fix.description.is_none() {
            return Err(TableError::EmptyVariableFix {
                module,
                variable: fix.name.clone(),
            });
        }
        if let Some(ty) = &fix.ty
            && (ty.trim().is_empty() || ty.contains('\n'))
        {
            return Err(TableError::InvalidTypeExpression {
                module,
                variable: fix.name.clone(),
                ty: ty.clone(),
            });
        }
    }

    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tffix_types::table::{ProviderSpec, VariableFix};

    fn vault() -> ModuleFixEntry {
        ModuleFixEntry::named("helm-vault")
            .version_file(
                "helm-vault/version.tf",
                vec![ProviderSpec::new("time", "hashicorp/time", "~> 0.7")],
            )
            .variables_file(
                "helm-vault/variables.tf",
                vec![VariableFix::new("enable_traefik_ingress").with_type("bool")],
            )
    }

    fn check(entry: ModuleFixEntry) -> Result<(), TableError> {
        validate_table(&FixTable::new(vec![entry]))
    }

    #[test]
    fn accepts_well_formed_entry() {
        assert_eq!(check(vault()), Ok(()));
    }

    #[test]
    fn rejects_entry_without_files() {
        let err = check(ModuleFixEntry::named("nothing")).unwrap_err();
        assert_eq!(
            err,
            TableError::EmptyModule {
                module: "nothing".to_string()
            }
        );
    }

    #[test]
    fn rejects_providers_without_version_file() {
        let mut entry = vault();
        entry.version_file = None;
        assert!(matches!(
            check(entry),
            Err(TableError::ProvidersWithoutVersionFile { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_provider() {
        let mut entry = vault();
        entry
            .providers
            .push(ProviderSpec::new("time", "hashicorp/time", "~> 0.9"));
        assert!(matches!(
            check(entry),
            Err(TableError::DuplicateProvider { provider, .. }) if provider == "time"
        ));
    }

    #[test]
    fn rejects_bad_provider_fields() {
        let mut entry = vault();
        entry.providers[0].version = "  ".to_string();
        assert!(matches!(
            check(entry),
            Err(TableError::EmptyProviderField { field: "version", .. })
        ));

        let mut entry = vault();
        entry.providers[0].name = "bad name".to_string();
        assert!(matches!(
            check(entry),
            Err(TableError::InvalidProviderName { .. })
        ));
    }

    #[test]
    fn rejects_bad_variable_fixes() {
        let mut entry = vault();
        entry.variables.push(VariableFix::new("enable_traefik_ingress").with_type("bool"));
        assert!(matches!(check(entry), Err(TableError::DuplicateVariable { .. })));

        let mut entry = vault();
        entry.variables.push(VariableFix::new("bare"));
        assert!(matches!(check(entry), Err(TableError::EmptyVariableFix { .. })));

        let mut entry = vault();
        entry
            .variables
            .push(VariableFix::new("multi").with_type("object({\n})"));
        assert!(matches!(
            check(entry),
            Err(TableError::InvalidTypeExpression { .. })
        ));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("traefik_cert_resolver"));
        assert!(is_identifier("kube-proxy"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1password"));
        assert!(!is_identifier("a.b"));
    }
}
