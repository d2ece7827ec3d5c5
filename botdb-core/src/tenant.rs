use std::borrow::Cow;

/// Computes the physical table name of an entity for a tenant context.
///
/// Must be pure: the same arguments always produce the same name.
pub type TableNameFn = fn(service: &str, tenant: Option<&str>, suffix: Option<&str>) -> String;

/// Selects which physical table an entity operation targets.
///
/// Every entity operation takes one explicitly, there is no ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantContext {
    service: Cow<'static, str>,
    tenant: Option<String>,
    suffix: Option<String>,
}

impl TenantContext {
    pub fn new(service: impl Into<Cow<'static, str>>) -> Self {
        Self {
            service: service.into(),
            tenant: None,
            suffix: None,
        }
    }

    /// Tenant identifiers are trimmed, lowercased and lose a leading `#`,
    /// so `"#General "` and `"general"` select the same table.
    pub fn with_tenant(mut self, tenant: impl AsRef<str>) -> Self {
        let tenant = tenant.as_ref().trim();
        let tenant = tenant.strip_prefix('#').unwrap_or(tenant);
        self.tenant = Some(tenant.to_lowercase());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::TenantContext;

    #[test]
    fn tenant_is_normalized() {
        let a = TenantContext::new("irc").with_tenant("#General ");
        let b = TenantContext::new("irc").with_tenant("general");
        assert_eq!(a, b);
        assert_eq!(a.tenant(), Some("general"));
        assert_eq!(a.suffix(), None);
        assert_eq!(a.service(), "irc");
    }
}
