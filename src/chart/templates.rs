//! Template reference files emitted into generated charts.
//!
//! Each reference is a one-line `include` of a named template defined by the
//! base library. Some are always written; the rest depend on a feature block
//! being enabled in the merged values.

use serde_yaml::Value;

/// A template reference file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRef {
    /// Workload deployment.
    Deployment,
    /// Service definition.
    Service,
    /// Service account.
    ServiceAccount,
    /// Ingress, when `ingress.enabled`.
    Ingress,
    /// TLS certificate, when `certificate.enabled`.
    Certificate,
    /// Mutual TLS policy, when `mtls.enabled`.
    Mtls,
    /// Horizontal pod autoscaler, when `autoscaling.enabled`.
    Autoscaler,
}

impl TemplateRef {
    /// Every reference, in write order.
    pub const ALL: [Self; 7] = [
        Self::Deployment,
        Self::Service,
        Self::ServiceAccount,
        Self::Ingress,
        Self::Certificate,
        Self::Mtls,
        Self::Autoscaler,
    ];

    /// File name inside `templates/`.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Deployment => "deployment.yaml",
            Self::Service => "service.yaml",
            Self::ServiceAccount => "serviceaccount.yaml",
            Self::Ingress => "ingress.yaml",
            Self::Certificate => "certificate.yaml",
            Self::Mtls => "mtls.yaml",
            Self::Autoscaler => "hpa.yaml",
        }
    }

    /// Name of the library template being included.
    #[must_use]
    pub const fn include_name(self) -> &'static str {
        match self {
            Self::Deployment => "platform.deployment",
            Self::Service => "platform.service",
            Self::ServiceAccount => "platform.serviceAccount",
            Self::Ingress => "platform.ingress",
            Self::Certificate => "platform.certificate",
            Self::Mtls => "platform.mtls",
            Self::Autoscaler => "platform.hpa",
        }
    }

    /// Feature block gating this reference, or `None` if unconditional.
    #[must_use]
    pub const fn feature(self) -> Option<&'static str> {
        match self {
            Self::Deployment | Self::Service | Self::ServiceAccount => None,
            Self::Ingress => Some("ingress"),
            Self::Certificate => Some("certificate"),
            Self::Mtls => Some("mtls"),
            Self::Autoscaler => Some("autoscaling"),
        }
    }

    /// File content.
    #[must_use]
    pub fn render(self) -> String {
        format!("{{{{- include \"{}\" . }}}}\n", self.include_name())
    }

    /// Returns true if this reference belongs in a chart with `values`.
    #[must_use]
    pub fn applies_to(self, values: &Value) -> bool {
        self.feature().is_none_or(|feature| feature_enabled(values, feature))
    }
}

/// Returns true only if `<feature>.enabled` is the boolean `true`.
#[must_use]
pub fn feature_enabled(values: &Value, feature: &str) -> bool {
    values
        .get(feature)
        .and_then(|block| block.get("enabled"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// References that belong in a chart with `values`, in write order.
#[must_use]
pub fn selected(values: &Value) -> Vec<TemplateRef> {
    TemplateRef::ALL
        .into_iter()
        .filter(|template| template.applies_to(values))
        .collect()
}
