//! Pure text patchers for version and variable files.
//!
//! Both patchers locate their targets on a fresh outline before every
//! insertion, so each edit sees the result of the previous one.

use tffix_hcl::{
    Block, INDENT_UNIT, OutlineError, align_group, expand_block, inner_indent,
    insert_before_attribute, insert_before_close, parse, quote,
};
use tffix_types::apply::EditNote;
use tffix_types::table::{ProviderSpec, VariableFix};
use tracing::debug;

/// Content written to a version file that does not exist yet.
pub const DEFAULT_VERSION_TEMPLATE: &str = r#"terraform {
  required_version = ">= 0.14"
  required_providers {
    kubernetes = {
      source  = "hashicorp/kubernetes"
      version = "~> 2.0"
    }
    helm = {
      source  = "hashicorp/helm"
      version = "~> 3.0"
    }
  }
}
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub text: String,
    pub notes: Vec<EditNote>,
}

impl PatchOutcome {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            notes: Vec::new(),
        }
    }
}

/// Declare every provider in `providers` that the first
/// `terraform { required_providers { ... } }` block does not already declare.
///
/// `existing` is `None` when the file is missing; the result then starts from
/// [`DEFAULT_VERSION_TEMPLATE`].
pub fn ensure_providers_in(
    existing: Option<&str>,
    providers: &[ProviderSpec],
) -> Result<PatchOutcome, OutlineError> {
    let mut out = match existing {
        Some(text) => PatchOutcome::unchanged(text),
        None => PatchOutcome {
            text: DEFAULT_VERSION_TEMPLATE.to_string(),
            notes: vec![EditNote::TemplateCreated],
        },
    };
    if providers.is_empty() {
        return Ok(out);
    }

    for spec in providers {
        let Some(block) = locate_required_providers(&mut out.text)? else {
            debug!("no required_providers block");
            out.notes.push(EditNote::ProvidersBlockMissing);
            break;
        };

        let note = if block.body.has_attribute(&spec.name) {
            EditNote::ProviderPresent {
                provider: spec.name.clone(),
            }
        } else {
            let fragment = provider_fragment(&inner_indent(&out.text, &block), spec);
            out.text = insert_before_close(&out.text, &block, &fragment);
            EditNote::ProviderAdded {
                provider: spec.name.clone(),
            }
        };
        debug!("{}", note);
        out.notes.push(note);
    }

    Ok(out)
}

/// Find the first `required_providers` block nested in a top-level
/// `terraform` block, expanding it first when it sits on one line.
fn locate_required_providers(text: &mut String) -> Result<Option<Block>, OutlineError> {
    loop {
        let body = parse(text)?;
        let Some(providers) = body
            .blocks()
            .filter(|b| b.ident == "terraform" && b.labels.is_empty())
            .find_map(|b| b.body.block("required_providers", &[]))
        else {
            return Ok(None);
        };
        if providers.is_single_line(text) {
            *text = expand_block(text, providers);
            continue;
        }
        return Ok(Some(providers.clone()));
    }
}

fn provider_fragment(indent: &str, spec: &ProviderSpec) -> String {
    format!(
        "{indent}{name} = {{\n\
         {indent}{INDENT_UNIT}source  = {source}\n\
         {indent}{INDENT_UNIT}version = {version}\n\
         {indent}}}\n",
        name = spec.name,
        source = quote(&spec.source),
        version = quote(&spec.version),
    )
}

/// Add missing `type` and `description` attributes to top-level
/// `variable "<name>"` blocks.
///
/// `type` goes before `default`; `description` goes before whichever of
/// `default` or `type` comes first. Blocks without an anchor are left alone.
/// The `=` signs of the attribute group a new line joins are realigned.
pub fn ensure_variable_metadata_in(
    existing: &str,
    fixes: &[VariableFix],
) -> Result<PatchOutcome, OutlineError> {
    let mut out = PatchOutcome::unchanged(existing);

    for fix in fixes {
        let requested = [
            ("type", fix.ty.clone(), &["default"][..]),
            (
                "description",
                fix.description.as_deref().map(quote),
                &["default", "type"][..],
            ),
        ];
        for (attribute, value, anchors) in requested {
            let Some(value) = value else { continue };
            let note = ensure_attribute(&mut out.text, &fix.name, attribute, &value, anchors)?;
            debug!("{}", note);
            let missing = matches!(note, EditNote::VariableMissing { .. });
            out.notes.push(note);
            if missing {
                break;
            }
        }
    }

    Ok(out)
}

fn ensure_attribute(
    text: &mut String,
    variable: &str,
    attribute: &str,
    value: &str,
    anchors: &[&str],
) -> Result<EditNote, OutlineError> {
    loop {
        let body = parse(text)?;
        let Some(block) = body.block("variable", &[variable]) else {
            return Ok(EditNote::VariableMissing {
                variable: variable.to_string(),
            });
        };
        if block.body.has_attribute(attribute) {
            return Ok(EditNote::AttributePresent {
                variable: variable.to_string(),
                attribute: attribute.to_string(),
            });
        }
        let Some(anchor) = block.body.first_attribute_of(anchors) else {
            return Ok(EditNote::AnchorMissing {
                variable: variable.to_string(),
                attribute: attribute.to_string(),
            });
        };
        if block.is_single_line(text) {
            *text = expand_block(text, block);
            continue;
        }

        *text = insert_before_attribute(text, anchor, &format!("{attribute} = {value}"));
        // A value that breaks the syntax is left for output validation to report.
        if let Ok(body) = parse(text)
            && let Some(block) = body.block("variable", &[variable])
        {
            *text = align_group(text, &block.body, attribute);
        }
        return Ok(EditNote::AttributeAdded {
            variable: variable.to_string(),
            attribute: attribute.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn provider(name: &str, source: &str, version: &str) -> ProviderSpec {
        ProviderSpec::new(name, source, version)
    }

    const VAULT_VERSION: &str = r#"terraform {
  required_version = ">= 0.14"
  required_providers {
    vault = {
      source  = "hashicorp/vault"
      version = "~> 3.0"
    }
    helm = {
      source  = "hashicorp/helm"
      version = "~> 2.0"
    }
  }
}
"#;

    #[test]
    fn missing_file_gets_template_verbatim() {
        let out = ensure_providers_in(None, &[]).unwrap();
        assert_eq!(out.text, DEFAULT_VERSION_TEMPLATE);
        assert_eq!(out.notes, vec![EditNote::TemplateCreated]);
    }

    #[test]
    fn adds_missing_provider_after_existing_entries() {
        let out = ensure_providers_in(
            Some(VAULT_VERSION),
            &[provider("time", "hashicorp/time", "~> 0.7")],
        )
        .unwrap();

        let expected = VAULT_VERSION.replace(
            "      version = \"~> 2.0\"\n    }\n  }\n}\n",
            "      version = \"~> 2.0\"\n    }\n    time = {\n      source  = \"hashicorp/time\"\n      version = \"~> 0.7\"\n    }\n  }\n}\n",
        );
        assert_eq!(out.text, expected);
        assert_eq!(out.text.matches("time = {").count(), 1);
        assert_eq!(
            out.notes,
            vec![EditNote::ProviderAdded {
                provider: "time".into()
            }]
        );
    }

    #[test]
    fn providers_accumulate_in_order_on_template() {
        let out = ensure_providers_in(
            None,
            &[
                provider("random", "hashicorp/random", "~> 3.0"),
                provider("kubernetes", "hashicorp/kubernetes", "~> 2.0"),
                provider("null", "hashicorp/null", "~> 3.0"),
            ],
        )
        .unwrap();

        let random = out.text.find("random = {").unwrap();
        let null = out.text.find("null = {").unwrap();
        assert!(out.text.find("helm = {").unwrap() < random);
        assert!(random < null);
        assert_eq!(out.text.matches("kubernetes = {").count(), 1);
        assert_eq!(
            out.notes,
            vec![
                EditNote::TemplateCreated,
                EditNote::ProviderAdded {
                    provider: "random".into()
                },
                EditNote::ProviderPresent {
                    provider: "kubernetes".into()
                },
                EditNote::ProviderAdded {
                    provider: "null".into()
                },
            ]
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let providers = [
            provider("time", "hashicorp/time", "~> 0.7"),
            provider("null", "hashicorp/null", "~> 3.0"),
        ];
        let first = ensure_providers_in(Some(VAULT_VERSION), &providers).unwrap();
        let second = ensure_providers_in(Some(&first.text), &providers).unwrap();
        assert_eq!(second.text, first.text);
        assert!(second.notes.iter().all(|n| !n.is_change()));
    }

    #[test]
    fn name_in_comment_does_not_count_as_declared() {
        let src = format!("# time is pinned by the platform team\n{VAULT_VERSION}");
        let out =
            ensure_providers_in(Some(&src), &[provider("time", "hashicorp/time", "~> 0.7")])
                .unwrap();
        assert_eq!(out.text.matches("time = {").count(), 1);
        assert!(out.text.starts_with("# time is pinned"));
    }

    #[test]
    fn empty_single_line_block_is_expanded() {
        let src = "terraform {\n  required_providers {}\n}\n";
        let out =
            ensure_providers_in(Some(src), &[provider("null", "hashicorp/null", "~> 3.0")])
                .unwrap();
        assert_eq!(
            out.text,
            "terraform {\n  required_providers {\n    null = {\n      source  = \"hashicorp/null\"\n      version = \"~> 3.0\"\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn missing_providers_block_leaves_text_alone() {
        let src = "terraform {\n  required_version = \">= 1.0\"\n}\n";
        let out =
            ensure_providers_in(Some(src), &[provider("null", "hashicorp/null", "~> 3.0")])
                .unwrap();
        assert_eq!(out.text, src);
        assert_eq!(out.notes, vec![EditNote::ProvidersBlockMissing]);
    }

    #[test]
    fn unparseable_version_file_is_an_error() {
        let err = ensure_providers_in(
            Some("terraform {\n"),
            &[provider("null", "hashicorp/null", "~> 3.0")],
        )
        .unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.offset <= "terraform {\n".len());
    }

    #[test]
    fn single_line_providers_block_with_entry_is_expanded() {
        let src = "terraform {\n  required_providers { helm = { source = \"hashicorp/helm\" } }\n}\n";
        let out =
            ensure_providers_in(Some(src), &[provider("null", "hashicorp/null", "~> 3.0")])
                .unwrap();
        assert_eq!(
            out.text,
            "terraform {\n  required_providers {\n    helm = { source = \"hashicorp/helm\" }\n    null = {\n      source  = \"hashicorp/null\"\n      version = \"~> 3.0\"\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn crlf_version_file_stays_crlf() {
        let src = VAULT_VERSION.replace('\n', "\r\n");
        let out =
            ensure_providers_in(Some(&src), &[provider("time", "hashicorp/time", "~> 0.7")])
                .unwrap();
        assert!(out.text.contains("    time = {\r\n      source  = \"hashicorp/time\"\r\n"));
        assert_eq!(out.text.matches('\n').count(), out.text.matches("\r\n").count());
    }

    #[test]
    fn type_goes_before_default_of_single_line_block() {
        let src = "variable \"namespace\" { default = \"kube-system\" }\n";
        let out =
            ensure_variable_metadata_in(src, &[VariableFix::new("namespace").with_type("string")])
                .unwrap();
        assert_eq!(
            out.text,
            "variable \"namespace\" {\n  type    = string\n  default = \"kube-system\"\n}\n"
        );
    }

    #[test]
    fn description_goes_before_type_when_both_requested() {
        let src = "variable \"enable_ingress\" {\n  default = false\n}\n";
        let out = ensure_variable_metadata_in(
            src,
            &[VariableFix::new("enable_ingress")
                .with_type("bool")
                .with_description("Enable ingress")],
        )
        .unwrap();
        assert_eq!(
            out.text,
            "variable \"enable_ingress\" {\n  description = \"Enable ingress\"\n  type        = bool\n  default     = false\n}\n"
        );
    }

    #[test]
    fn inserted_type_aligns_with_wider_existing_keys() {
        let src = "variable \"vault_image\" {\n  description = \"Vault image\"\n  default     = \"vault\"\n}\n";
        let out =
            ensure_variable_metadata_in(src, &[VariableFix::new("vault_image").with_type("string")])
                .unwrap();
        assert_eq!(
            out.text,
            "variable \"vault_image\" {\n  description = \"Vault image\"\n  type        = string\n  default     = \"vault\"\n}\n"
        );
    }

    #[test]
    fn crlf_variables_file_stays_crlf() {
        let src = "variable \"namespace\" { default = \"kube-system\" }\r\n";
        let out = ensure_variable_metadata_in(
            src,
            &[VariableFix::new("namespace").with_type("string").with_description("Namespace")],
        )
        .unwrap();
        assert_eq!(
            out.text,
            "variable \"namespace\" {\r\n  description = \"Namespace\"\r\n  type        = string\r\n  default     = \"kube-system\"\r\n}\r\n"
        );
    }

    #[test]
    fn present_attributes_are_not_duplicated() {
        let src = "variable \"domain_name\" {\n  type    = string\n  default = \"\"\n}\n";
        let fixes = [VariableFix::new("domain_name").with_type("string")];
        let out = ensure_variable_metadata_in(src, &fixes).unwrap();
        assert_eq!(out.text, src);
        assert_eq!(
            out.notes,
            vec![EditNote::AttributePresent {
                variable: "domain_name".into(),
                attribute: "type".into()
            }]
        );
    }

    #[test]
    fn no_anchor_means_no_insertion() {
        let src = "variable \"x\" {\n  sensitive = true\n}\n";
        let out = ensure_variable_metadata_in(
            src,
            &[VariableFix::new("x").with_type("string").with_description("X")],
        )
        .unwrap();
        assert_eq!(out.text, src);
        assert!(matches!(out.notes[0], EditNote::AnchorMissing { .. }));
        assert!(matches!(out.notes[1], EditNote::AnchorMissing { .. }));
    }

    #[test]
    fn missing_variable_is_noted_once() {
        let src = "variable \"other\" {\n  default = 1\n}\n";
        let out = ensure_variable_metadata_in(
            src,
            &[VariableFix::new("absent").with_type("number").with_description("A")],
        )
        .unwrap();
        assert_eq!(out.text, src);
        assert_eq!(
            out.notes,
            vec![EditNote::VariableMissing {
                variable: "absent".into()
            }]
        );
    }

    #[test]
    fn only_top_level_variable_blocks_match() {
        let src = "module \"m\" {\n  variable \"x\" {\n    default = 1\n  }\n}\n";
        let out =
            ensure_variable_metadata_in(src, &[VariableFix::new("x").with_type("number")]).unwrap();
        assert_eq!(out.text, src);
    }

    #[test]
    fn description_is_escaped() {
        let src = "variable \"le_email\" {\n  default = \"\"\n}\n";
        let out = ensure_variable_metadata_in(
            src,
            &[VariableFix::new("le_email").with_description("Let's \"Encrypt\" ${email}")],
        )
        .unwrap();
        assert!(
            out.text
                .contains(r#"  description = "Let's \"Encrypt\" $${email}""#)
        );
    }
}
