use std::collections::BTreeSet;

use crate::errors::SnipcatError;

/// A capability that can be granted to a sandboxed frame
///
/// Variants map one-to-one onto `sandbox` attribute tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Scripts,
    Modals,
    Popups,
    Forms,
    Downloads,
    SameOrigin,
    TopNavigation,
}

impl Capability {
    pub fn token(&self) -> &'static str {
        match self {
            Capability::Scripts => "allow-scripts",
            Capability::Modals => "allow-modals",
            Capability::Popups => "allow-popups",
            Capability::Forms => "allow-forms",
            Capability::Downloads => "allow-downloads",
            Capability::SameOrigin => "allow-same-origin",
            Capability::TopNavigation => "allow-top-navigation",
        }
    }

    /// Whether granting this lets framed code reach the embedding page
    pub fn escapes_isolation(&self) -> bool {
        matches!(self, Capability::SameOrigin | Capability::TopNavigation)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// The capability set a preview context runs with
///
/// A policy can never hold a capability that escapes isolation; `new`
/// refuses them, so every value of this type is safe to load under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    capabilities: BTreeSet<Capability>,
}

impl SandboxPolicy {
    /// Scripts only: no forms, popups, modals, downloads, storage or navigation
    pub fn preview() -> Self {
        Self {
            capabilities: BTreeSet::from([Capability::Scripts]),
        }
    }

    /// # Errors
    /// `UnsafeSandboxCapability` for `allow-same-origin` or `allow-top-navigation`.
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> crate::Result<Self> {
        let capabilities: BTreeSet<Capability> = capabilities.into_iter().collect();
        if let Some(cap) = capabilities.iter().find(|c| c.escapes_isolation()) {
            return Err(SnipcatError::UnsafeSandboxCapability {
                capability: cap.token().to_string(),
            });
        }
        Ok(Self { capabilities })
    }

    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    /// Value for an iframe `sandbox` attribute
    ///
    /// Empty string means every capability is withheld.
    pub fn sandbox_attribute(&self) -> String {
        self.capabilities
            .iter()
            .map(Capability::token)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `Content-Security-Policy` header equivalent to the frame sandbox
    ///
    /// Used when the document is served directly rather than through srcdoc.
    /// The document may only run its own inline code and pull images and
    /// fonts over https or from data URLs.
    pub fn content_security_policy(&self) -> String {
        let sandbox = self.sandbox_attribute();
        let sandbox_directive = if sandbox.is_empty() {
            "sandbox".to_string()
        } else {
            format!("sandbox {}", sandbox)
        };
        let script_src = if self.allows(Capability::Scripts) {
            "script-src 'unsafe-inline'"
        } else {
            "script-src 'none'"
        };
        let form_action = if self.allows(Capability::Forms) {
            "form-action 'self'"
        } else {
            "form-action 'none'"
        };

        [
            sandbox_directive.as_str(),
            "default-src 'none'",
            script_src,
            "style-src 'unsafe-inline'",
            "img-src https: data:",
            "font-src https: data:",
            "connect-src 'none'",
            form_action,
            "base-uri 'none'",
        ]
        .join("; ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::preview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_policy_is_scripts_only() {
        let policy = SandboxPolicy::preview();
        assert_eq!(policy.sandbox_attribute(), "allow-scripts");
        assert!(!policy.allows(Capability::SameOrigin));
        assert!(!policy.allows(Capability::Forms));
    }

    #[test]
    fn test_same_origin_rejected() {
        let err = SandboxPolicy::new([Capability::Scripts, Capability::SameOrigin]).unwrap_err();
        assert_eq!(
            err,
            SnipcatError::UnsafeSandboxCapability {
                capability: "allow-same-origin".to_string()
            }
        );
    }

    #[test]
    fn test_top_navigation_rejected() {
        assert!(SandboxPolicy::new([Capability::TopNavigation]).is_err());
    }

    #[test]
    fn test_csp_for_preview() {
        assert_eq!(
            SandboxPolicy::preview().content_security_policy(),
            "sandbox allow-scripts; default-src 'none'; script-src 'unsafe-inline'; \
             style-src 'unsafe-inline'; img-src https: data:; font-src https: data:; \
             connect-src 'none'; form-action 'none'; base-uri 'none'"
        );
    }

    #[test]
    fn test_empty_policy_withholds_everything() {
        let policy = SandboxPolicy::new(Vec::<Capability>::new()).unwrap();
        assert_eq!(policy.sandbox_attribute(), "");
        assert!(policy
            .content_security_policy()
            .starts_with("sandbox; default-src 'none'; script-src 'none'"));
    }

    #[test]
    fn test_attribute_order_is_stable() {
        let policy = SandboxPolicy::new([Capability::Forms, Capability::Scripts]).unwrap();
        assert_eq!(policy.sandbox_attribute(), "allow-scripts allow-forms");
    }
}
