//! The built-in fix table: providers and variable metadata that TFLint flagged
//! as missing across the Helm modules.

use tffix_types::table::{FixTable, ModuleFixEntry, ProviderSpec, VariableFix};

fn random() -> ProviderSpec {
    ProviderSpec::new("random", "hashicorp/random", "~> 3.0")
}

fn null() -> ProviderSpec {
    ProviderSpec::new("null", "hashicorp/null", "~> 3.0")
}

fn typed(name: &str, ty: &str) -> VariableFix {
    VariableFix::new(name).with_type(ty)
}

fn described(name: &str, ty: &str, description: &str) -> VariableFix {
    VariableFix::new(name)
        .with_type(ty)
        .with_description(description)
}

/// Fix table applied when no table is configured. Order is significant.
pub fn builtin_fix_table() -> FixTable {
    FixTable::new(vec![
        ModuleFixEntry::named("helm-metallb")
            .version_file("helm-metallb/version.tf", vec![])
            .variables_file(
                "helm-metallb/variables.tf",
                vec![
                    described("enable_ingress", "bool", "Enable ingress"),
                    described("persistent_disc_size", "string", "Persistent disk size"),
                    described("domain_name", "string", "Domain name"),
                    described("workspace", "string", "Workspace name"),
                    described("le_email", "string", "Let's Encrypt email"),
                    described("address_pool", "string", "MetalLB address pool"),
                ],
            ),
        ModuleFixEntry::named("helm-prometheus-stack")
            .version_file("helm-prometheus-stack/version.tf", vec![random(), null()]),
        ModuleFixEntry::named("helm-traefik")
            .version_file("helm-traefik/version.tf", vec![random(), null()]),
        ModuleFixEntry::named("helm-traefik/ingress")
            .version_file(
                "helm-traefik/ingress/version.tf",
                vec![
                    random(),
                    ProviderSpec::new("kubernetes", "hashicorp/kubernetes", "~> 2.0"),
                ],
            )
            .variables_file(
                "helm-traefik/ingress/variables.tf",
                vec![
                    typed("dashboard_auth", "string"),
                    typed("label_app", "string"),
                    typed("label_role", "string"),
                    typed("namespace", "string"),
                    typed("domain_name", "string"),
                    typed("service_name", "string"),
                    typed("traefik_cert_resolver", "string"),
                ],
            ),
        ModuleFixEntry::named("helm-vault")
            .version_file(
                "helm-vault/version.tf",
                vec![ProviderSpec::new("time", "hashicorp/time", "~> 0.7")],
            )
            .variables_file(
                "helm-vault/variables.tf",
                vec![
                    described(
                        "traefik_cert_resolver",
                        "string",
                        "Traefik certificate resolver",
                    ),
                    described("enable_traefik_ingress", "bool", "Enable Traefik ingress"),
                ],
            ),
        ModuleFixEntry::named("helm-prometheus-stack-crds")
            .version_file("helm-prometheus-stack-crds/version.tf", vec![null()])
            .variables_file(
                "helm-prometheus-stack-crds/variables.tf",
                vec![
                    typed("domain_name", "string"),
                    described("prometheus_url", "string", "Prometheus URL"),
                    described("cpu_arch", "string", "CPU architecture"),
                    described(
                        "prometheus_storage_size",
                        "string",
                        "Prometheus storage size",
                    ),
                    described(
                        "alertmanager_storage_size",
                        "string",
                        "AlertManager storage size",
                    ),
                    described("grafana_storage_size", "string", "Grafana storage size"),
                ],
            ),
    ])
}
